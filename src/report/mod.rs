//! Text presenters and file exports.
//!
//! Every presenter renders into a `String`; the caller decides where it goes.
use crate::errors::MapperError;
use crate::graph::ReconModel;
use log::info;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

const WIDE_RULE: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListMode {
    Simple,
    Categorized,
    Detailed,
}

/// File export layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// One name per line.
    Simple,
    /// `name → ip, ip` when addresses are known.
    WithIps,
    /// `[Category]` headers followed by names.
    Categorized,
    /// Names only, same layout as `Simple`.
    Clean,
}

#[must_use]
pub fn render_list(model: &ReconModel, mode: ListMode) -> String {
    match mode {
        ListMode::Simple => render_simple(model),
        ListMode::Categorized => render_categorized(model),
        ListMode::Detailed => render_detailed(model),
    }
}

/// Numbered listing with up to two addresses and root/external markers.
#[must_use]
pub fn render_simple(model: &ReconModel) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\nAll discovered domains (scan of {})", model.root_name());
    let _ = writeln!(s, "{}", "=".repeat(70));
    for (i, domain) in model.discovered_names().enumerate() {
        let ips = model.addresses_of(domain);
        let ip_info = if ips.is_empty() {
            String::new()
        } else {
            let shown = ips.iter().take(2).map(String::as_str).collect::<Vec<_>>().join(", ");
            let more = if ips.len() > 2 { "..." } else { "" };
            format!(" → {shown}{more}")
        };
        let marker = if domain == model.root_name() { " [root]" } else { "" };
        let external = if model.is_external(domain) { " [external]" } else { "" };
        let _ = writeln!(s, "{:2}. {domain}{ip_info}{marker}{external}", i + 1);
    }
    let _ = writeln!(s, "\nTotal: {} domains discovered", model.domain_count());
    let _ = writeln!(s, "[root] = primary domain | [external] = external domain");
    s
}

/// Non-empty categories with their members and first address.
#[must_use]
pub fn render_categorized(model: &ReconModel) -> String {
    let categories = model.categorize();
    let mut s = String::new();
    let _ = writeln!(s, "\nDomain analysis (scan of {})", model.root_name());
    let _ = writeln!(s, "{}", "=".repeat(WIDE_RULE));
    let mut total = 0usize;
    for (category, domains) in categories.non_empty() {
        let _ = writeln!(s, "\n{category} ({})", domains.len());
        let _ = writeln!(s, "{}", "-".repeat(40));
        for domain in domains {
            let ips = model.addresses_of(domain);
            let ip_info = match ips.split_first() {
                None => String::new(),
                Some((first, [])) => format!(" → {first}"),
                Some((first, rest)) => format!(" → {first} (+{})", rest.len()),
            };
            let _ = writeln!(s, "  ├── {domain}{ip_info}");
            total += 1;
        }
    }
    let _ = writeln!(s, "\nSummary: {total} domains in total");
    s
}

/// Every name with all addresses and its first three relation records.
#[must_use]
pub fn render_detailed(model: &ReconModel) -> String {
    let mut s = String::new();
    let _ = writeln!(s, "\nDetailed domain analysis (scan of {})", model.root_name());
    let _ = writeln!(s, "{}", "=".repeat(WIDE_RULE));
    for domain in model.discovered_names() {
        let _ = writeln!(s, "\n{domain}");
        for ip in model.addresses_of(domain) {
            let _ = writeln!(s, "  └── ip: {ip}");
        }
        let relations = model.relations_of(domain);
        for relation in relations.iter().take(3) {
            let _ = writeln!(s, "  └── rel: {relation}");
        }
        if relations.len() > 3 {
            let _ = writeln!(s, "  └── ... and {} more", relations.len() - 3);
        }
    }
    s
}

/// Tree-shaped text map: root, subdomains with resolutions, external names, counters.
#[must_use]
pub fn render_text_map(model: &ReconModel) -> String {
    let root = model.root_name();
    let subdomains: Vec<&str> = model.subdomains().collect();
    let external: Vec<&str> = model.external_names().collect();

    let mut s = String::new();
    let _ = writeln!(s, "\nMAP OF {}", root.to_uppercase());
    let _ = writeln!(s, "{}", "=".repeat(60));

    let _ = writeln!(s, "\nPRIMARY DOMAIN");
    let _ = writeln!(s, "├── {root}");
    for rel in model.relations().iter().filter(|r| r.source == root) {
        if rel.relation == "a_record" || rel.relation == "aaaa_record" {
            let _ = writeln!(s, "│   └── {}", rel.target);
        }
    }

    let _ = writeln!(s, "\nSUBDOMAINS ({})", subdomains.len());
    for sub in &subdomains {
        let _ = writeln!(s, "├── {sub}");
        let resolved = model
            .relations()
            .iter()
            .filter(|r| r.source == *sub)
            .filter_map(|r| match r.relation.as_str() {
                "a_record" | "aaaa_record" => Some(r.target.clone()),
                "cname_record" => Some(format!("→ {}", r.target)),
                _ => None,
            })
            .take(2);
        for target in resolved {
            let _ = writeln!(s, "│   └── {target}");
        }
    }

    if !external.is_empty() {
        let _ = writeln!(s, "\nEXTERNAL DOMAINS ({})", external.len());
        for domain in external.iter().take(10) {
            let _ = writeln!(s, "├── {domain}");
        }
    }

    let _ = writeln!(s, "\nSUMMARY");
    let _ = writeln!(s, "├── Subdomains: {}", subdomains.len());
    let _ = writeln!(s, "├── External domains: {}", external.len());
    let _ = writeln!(s, "├── Unique IP addresses: {}", model.addresses().len());
    let _ = writeln!(s, "└── Total relations: {}", model.relations().len());
    s
}

/// Render the export body for `format`.
#[must_use]
pub fn render_export(model: &ReconModel, format: ExportFormat) -> String {
    let mut s = String::new();
    match format {
        ExportFormat::Simple | ExportFormat::Clean => {
            for domain in model.discovered_names() {
                let _ = writeln!(s, "{domain}");
            }
        }
        ExportFormat::WithIps => {
            for domain in model.discovered_names() {
                let ips = model.addresses_of(domain);
                if ips.is_empty() {
                    let _ = writeln!(s, "{domain}");
                } else {
                    let _ = writeln!(s, "{domain} → {}", ips.join(", "));
                }
            }
        }
        ExportFormat::Categorized => {
            for (category, domains) in model.categorize().non_empty() {
                let _ = writeln!(s, "\n[{category}]");
                for domain in domains {
                    let _ = writeln!(s, "{domain}");
                }
            }
        }
    }
    s
}

/// Write an export to `path`, returning the number of names exported.
///
/// # Errors
/// Returns `MapperError::Export` if the file cannot be written.
pub fn export_to_file(model: &ReconModel, path: &Path, format: ExportFormat) -> Result<usize, MapperError> {
    let body = render_export(model, format);
    fs::write(path, body)
        .map_err(|source| MapperError::Export { path: path.to_path_buf(), source })?;
    info!("exported {} domains ({format:?}) to {}", model.domain_count(), path.display());
    Ok(model.domain_count())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AmassParser;

    fn model() -> ReconModel {
        AmassParser::new().parse_str(
            "\
corp.com (FQDN) --> a_record --> 192.0.2.1 (IPAddress)
corp.com (FQDN) --> a_record --> 192.0.2.2 (IPAddress)
corp.com (FQDN) --> a_record --> 192.0.2.3 (IPAddress)
corp.com (FQDN) --> node --> www.corp.com (FQDN)
www.corp.com (FQDN) --> cname_record --> edge.cdnvendor.net (FQDN)
corp.com (FQDN) --> ns_record --> ns1.dnshost.org (FQDN)
",
        )
    }

    #[test]
    fn test_simple_listing_markers_and_truncation() {
        let out = render_simple(&model());
        assert!(out.contains(" 1. corp.com → 192.0.2.1, 192.0.2.2... [root]"));
        assert!(out.contains("edge.cdnvendor.net [external]"));
        assert!(out.contains("Total: 4 domains discovered"));
    }

    #[test]
    fn test_categorized_listing() {
        let out = render_categorized(&model());
        assert!(out.contains("Primary (1)"));
        assert!(out.contains("  ├── corp.com → 192.0.2.1 (+2)"));
        assert!(out.contains("Web Services (1)"));
        assert!(out.contains("External/Third-party (2)"));
        assert!(!out.contains("Other ("));
        assert!(out.contains("Summary: 4 domains in total"));
    }

    #[test]
    fn test_detailed_listing_caps_relations() {
        let out = render_detailed(&model());
        assert!(out.contains("  └── ip: 192.0.2.3"));
        assert!(out.contains("  └── rel: a_record → 192.0.2.1"));
        assert!(!out.contains("rel: node → www.corp.com"));
        assert!(out.contains("... and 2 more"));
    }

    #[test]
    fn test_text_map_sections() {
        let out = render_text_map(&model());
        assert!(out.contains("MAP OF CORP.COM"));
        assert!(out.contains("SUBDOMAINS (1)"));
        assert!(out.contains("│   └── → edge.cdnvendor.net"));
        assert!(out.contains("EXTERNAL DOMAINS (2)"));
        assert!(out.contains("└── Total relations: 6"));
    }

    #[test]
    fn test_export_layouts() {
        let m = model();
        assert_eq!(
            render_export(&m, ExportFormat::Simple),
            "corp.com\nedge.cdnvendor.net\nns1.dnshost.org\nwww.corp.com\n"
        );
        assert_eq!(render_export(&m, ExportFormat::Clean), render_export(&m, ExportFormat::Simple));
        assert!(render_export(&m, ExportFormat::WithIps)
            .starts_with("corp.com → 192.0.2.1, 192.0.2.2, 192.0.2.3\nedge.cdnvendor.net\n"));
        let cat = render_export(&m, ExportFormat::Categorized);
        assert!(cat.starts_with("\n[Primary]\ncorp.com\n"));
        assert!(cat.contains("[External/Third-party]\nedge.cdnvendor.net\nns1.dnshost.org\n"));
    }

    #[test]
    fn test_export_to_file_reports_count_and_errors() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("domains.txt");
        let n = export_to_file(&model(), &out, ExportFormat::Simple).unwrap();
        assert_eq!(n, 4);
        assert!(std::fs::read_to_string(&out).unwrap().contains("www.corp.com"));

        let bad = dir.path().join("missing").join("domains.txt");
        assert!(matches!(
            export_to_file(&model(), &bad, ExportFormat::Simple),
            Err(MapperError::Export { .. })
        ));
    }
}
