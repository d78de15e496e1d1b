use crate::errors::MapperError;
use crate::graph::ReconModel;
use crate::query::IMPORTANT_RELATIONS;
use log::debug;
use std::collections::HashMap;
use std::fmt::Write as _;

pub mod html;

pub use html::HtmlGenerator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DotTheme { Light, Dark }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankDir { LR, TB }

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeStyle { Curved, Ortho, Polyline }

#[derive(Debug, Clone, Copy)]
pub struct DotOptions {
    pub show_ips: bool,
    pub show_orgs: bool,
    pub legend: bool,
    pub theme: DotTheme,
    pub rankdir: RankDir,
    pub splines: EdgeStyle,
}

impl Default for DotOptions {
    fn default() -> Self {
        Self { show_ips: true, show_orgs: false, legend: true, theme: DotTheme::Light, rankdir: RankDir::TB, splines: EdgeStyle::Ortho }
    }
}

/// Output formats Graphviz is asked to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat { Svg, Png, Pdf }

impl ImageFormat {
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self { ImageFormat::Svg => "svg", ImageFormat::Png => "png", ImageFormat::Pdf => "pdf" }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub dot: DotOptions,
    pub format: ImageFormat,
    /// Inject hover CSS/JS; only meaningful for SVG.
    pub interactive: bool,
}

impl Default for RenderOptions {
    fn default() -> Self { Self { dot: DotOptions::default(), format: ImageFormat::Svg, interactive: true } }
}

/// `domain_map_<root with dots replaced>.<ext>`
#[must_use]
pub fn default_output_name(model: &ReconModel, ext: &str) -> String {
    format!("domain_map_{}.{ext}", model.root_name().replace('.', "_"))
}

#[derive(Debug, Default)]
pub struct GraphvizRenderer;

impl GraphvizRenderer {
    #[must_use]
    pub fn new() -> Self { Self {} }

    /// Render the domain map through Graphviz `dot -T<format>`.
    ///
    /// # Errors
    /// Returns `MapperError::Visualization` if invoking Graphviz fails or
    /// the process exits with a non-success status.
    pub fn render(&self, model: &ReconModel, opts: RenderOptions) -> Result<Vec<u8>, MapperError> {
        let dot = DotGenerator::new().generate_dot_with_options(model, opts.dot)?;
        let fmt = opts.format.extension();
        debug!("piping {} bytes of DOT into 'dot -T{fmt}'", dot.len());
        let output = std::process::Command::new("dot")
            .arg(format!("-T{fmt}"))
            .stdin(std::process::Stdio::piped())
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .spawn()
            .and_then(|mut child| {
                use std::io::Write;
                if let Some(mut stdin) = child.stdin.take() {
                    stdin.write_all(dot.as_bytes())?;
                }
                child.wait_with_output()
            })
            .map_err(|e| MapperError::Visualization(format!("Failed to run graphviz 'dot': {e}")))?;
        if !output.status.success() {
            return Err(MapperError::Visualization(format!(
                "Graphviz 'dot' failed with code {:?}: {}",
                output.status.code(),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        if opts.format == ImageFormat::Svg && opts.interactive {
            let svg = String::from_utf8(output.stdout)
                .map_err(|e| MapperError::Visualization(format!("Invalid UTF-8 from dot: {e}")))?;
            return Ok(enhance_svg(&svg).into_bytes());
        }
        Ok(output.stdout)
    }
}

fn enhance_svg(svg: &str) -> String {
    // Hover highlight plus a tooltip-friendly cursor on nodes
    let injection = r"
<style>
svg .node:hover ellipse, svg .node:hover polygon, svg .node:hover path { filter: brightness(1.1); stroke-width: 2; }
svg .node { cursor: pointer; }
svg .edge:hover path { stroke-width: 2.2; }
</style>
<script><![CDATA[
(function(){
  document.querySelectorAll('g.node').forEach(function(n){
    n.addEventListener('click', function(){
      const t = n.querySelector('title');
      if (t) { console.log('node', t.textContent); }
    });
  });
})();
]]></script>
";
    if let Some(pos) = svg.rfind("</svg>") {
        let mut out = String::with_capacity(svg.len() + injection.len());
        out.push_str(&svg[..pos]);
        out.push_str(injection);
        out.push_str(&svg[pos..]);
        out
    } else {
        let mut out = svg.to_string();
        out.push_str(injection);
        out
    }
}

/// Visual role of a node in the domain map.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeRole { Root, Subdomain, External, Address, Organization }

struct NodeStyle {
    fill: &'static str,
    font: &'static str,
    shape: &'static str,
}

#[derive(Debug, Default)]
pub struct DotGenerator;

impl DotGenerator {
    #[must_use]
    pub fn new() -> Self { Self {} }

    /// Generate DOT with default options.
    ///
    /// # Errors
    /// Returns a `MapperError` if DOT generation fails for any reason.
    pub fn generate_dot(&self, model: &ReconModel) -> Result<String, MapperError> {
        self.generate_dot_with_options(model, DotOptions::default())
    }

    /// Generate DOT with the given `opts`.
    ///
    /// # Errors
    /// Returns a `MapperError` if DOT generation fails for any reason.
    pub fn generate_dot_with_options(&self, model: &ReconModel, opts: DotOptions) -> Result<String, MapperError> {
        let root = model.root_name();
        let mut s = String::new();
        let _ = writeln!(s, "// Map of {}", escape_label(root));
        s.push_str("digraph DomainMap\n{\n");
        let rank = match opts.rankdir { RankDir::LR => "LR", RankDir::TB => "TB" };
        let splines = match opts.splines { EdgeStyle::Curved => "curved", EdgeStyle::Ortho => "ortho", EdgeStyle::Polyline => "polyline" };
        let _ = write!(
            s,
            "  rankdir={rank};\n  graph [fontname=Arial, splines={splines}, nodesep=0.5, ranksep=1.0] ;\n  node [style=filled, fontname=Arial] ;\n  edge [fontname=Arial, fontsize=10];\n"
        );

        // name -> node id for every emitted node
        let mut ids: HashMap<&str, String> = HashMap::new();

        if !root.is_empty() {
            let id = sanitize_id(root);
            write_node(&mut s, &id, root, root, NodeRole::Root, opts.theme);
            ids.insert(root, id);
        }
        for domain in model.discovered_names().filter(|d| *d != root) {
            let id = sanitize_id(domain);
            let (role, label) = if !root.is_empty() && domain.contains(root) {
                let short = domain.replace(&format!(".{root}"), "");
                (NodeRole::Subdomain, truncate(&short, 20, 17))
            } else {
                (NodeRole::External, truncate(domain, 25, 22))
            };
            write_node(&mut s, &id, &label, domain, role, opts.theme);
            ids.insert(domain, id);
        }
        if opts.show_ips {
            for ip in model.addresses() {
                let id = sanitize_id(ip);
                let label = if ip.contains(':') { truncate(ip, 20, 15) } else { ip.clone() };
                write_node(&mut s, &id, &label, ip, NodeRole::Address, opts.theme);
                ids.insert(ip, id);
            }
        }
        if opts.show_orgs {
            for org in model.organizations() {
                let id = sanitize_id(org);
                write_node(&mut s, &id, &truncate(org, 15, 12), org, NodeRole::Organization, opts.theme);
                ids.insert(org, id);
            }
        }

        let mut edges = 0usize;
        for rel in model.relations() {
            if !IMPORTANT_RELATIONS.contains(&rel.relation.as_str()) {
                continue;
            }
            if !opts.show_ips && model.addresses().contains(&rel.target) {
                continue;
            }
            if !opts.show_orgs && model.organizations().contains(&rel.target) {
                continue;
            }
            let (Some(from), Some(to)) = (ids.get(rel.source.as_str()), ids.get(rel.target.as_str())) else {
                continue;
            };
            let color = relation_color(&rel.relation);
            let attrs = match rel.relation.as_str() {
                "node" => format!("color=\"{color}\", penwidth=2"),
                "a_record" => format!("label=\"IP\", color=\"{color}\", style=\"dashed\""),
                "cname_record" => format!("label=\"CNAME\", color=\"{color}\", style=\"dotted\""),
                "mx_record" => format!("label=\"MAIL\", color=\"{color}\""),
                "ns_record" => format!("label=\"DNS\", color=\"{color}\""),
                _ => format!("color=\"{color}\""),
            };
            let _ = writeln!(s, "  \"{from}\" -> \"{to}\" [{attrs}];");
            edges += 1;
        }
        debug!("DOT map: {} nodes, {edges} edges", ids.len());

        if opts.legend {
            s.push_str("  subgraph cluster_legend {\n    label=\"Legend\";\n    color=grey;\n");
            let legend_items = [
                ("Primary domain", NodeRole::Root),
                ("Subdomain", NodeRole::Subdomain),
                ("External", NodeRole::External),
                ("IP address", NodeRole::Address),
                ("Organization", NodeRole::Organization),
            ];
            for (name, role) in legend_items {
                let st = style_for_role(role, opts.theme);
                let id = sanitize_id(&format!("legend_{name}"));
                let _ = writeln!(
                    s,
                    "    \"{id}\" [label=\"{name}\", fillcolor=\"{}\", fontcolor=\"{}\", shape=\"{}\"]; ",
                    st.fill, st.font, st.shape
                );
            }
            s.push_str("  }\n");
        }

        s.push_str("}\n");
        Ok(s)
    }
}

fn write_node(out: &mut String, id: &str, label: &str, tooltip: &str, role: NodeRole, theme: DotTheme) {
    let st = style_for_role(role, theme);
    let extra = if role == NodeRole::Root { ", style=\"filled,bold\", penwidth=3" } else { "" };
    let _ = writeln!(
        out,
        "  \"{id}\" [label=\"{}\", tooltip=\"{}\", fillcolor=\"{}\", fontcolor=\"{}\", shape=\"{}\"{extra}];",
        escape_label(label),
        escape_label(tooltip),
        st.fill,
        st.font,
        st.shape
    );
}

/// Keep `s` when it has at most `max` chars, otherwise its first `keep` chars plus `...`.
fn truncate(s: &str, max: usize, keep: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(keep).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

pub(crate) fn relation_color(relation: &str) -> &'static str {
    match relation {
        "node" => "#2196f3",
        "a_record" => "#4caf50",
        "aaaa_record" => "#8bc34a",
        "cname_record" => "#ff9800",
        "mx_record" => "#f44336",
        "ns_record" => "#9c27b0",
        _ => "#666666",
    }
}

fn sanitize_id(s: &str) -> String {
    let id: String = s
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '_' => c,
            _ => '_',
        })
        .collect();
    if id.starts_with(|c: char| c.is_ascii_digit()) {
        format!("n_{id}")
    } else {
        id
    }
}

fn escape_label(s: &str) -> String {
    s.replace('\\', "\\\\").replace('"', "\\\"")
}

fn style_for_role(role: NodeRole, theme: DotTheme) -> NodeStyle {
    let (fill, font, shape) = match (theme, role) {
        (DotTheme::Light, NodeRole::Root) => ("#e1f5fe", "#01579b", "box"),
        (DotTheme::Light, NodeRole::Subdomain) => ("#f3e5f5", "#4a148c", "ellipse"),
        (DotTheme::Light, NodeRole::External) => ("#fce4ec", "#880e4f", "box"),
        (DotTheme::Light, NodeRole::Address) => ("#fff3e0", "#e65100", "diamond"),
        (DotTheme::Light, NodeRole::Organization) => ("#e8f5e8", "#1b5e20", "house"),

        (DotTheme::Dark, NodeRole::Root) => ("#01579b", "#e1f5fe", "box"),
        (DotTheme::Dark, NodeRole::Subdomain) => ("#4a148c", "#f3e5f5", "ellipse"),
        (DotTheme::Dark, NodeRole::External) => ("#880e4f", "#fce4ec", "box"),
        (DotTheme::Dark, NodeRole::Address) => ("#e65100", "#fff3e0", "diamond"),
        (DotTheme::Dark, NodeRole::Organization) => ("#1b5e20", "#e8f5e8", "house"),
    };
    NodeStyle { fill, font, shape }
}
