//! Self-contained interactive map built on vis-network.
use crate::errors::MapperError;
use crate::graph::ReconModel;
use serde_json::{json, Value};
use std::collections::HashMap;

use super::relation_color;

/// Relation kinds drawn as edges in the HTML map.
const HTML_RELATIONS: [&str; 4] = ["node", "a_record", "cname_record", "mx_record"];

#[derive(Debug, Default)]
pub struct HtmlGenerator;

impl HtmlGenerator {
    #[must_use]
    pub fn new() -> Self { Self {} }

    /// Build the vis-network node list. Ids are assigned root first, then
    /// names in sorted order, then addresses.
    #[must_use]
    pub fn nodes(&self, model: &ReconModel) -> (Vec<Value>, HashMap<String, usize>) {
        let root = model.root_name();
        let mut nodes = Vec::new();
        let mut ids: HashMap<String, usize> = HashMap::new();

        if !root.is_empty() {
            nodes.push(json!({
                "id": 0,
                "label": root,
                "title": root,
                "group": "main",
                "color": {"background": "#e1f5fe", "border": "#01579b"},
                "size": 40,
                "font": {"color": "#01579b", "size": 18, "face": "Segoe UI"},
            }));
            ids.insert(root.to_string(), 0);
        }
        for domain in model.discovered_names().filter(|d| *d != root) {
            let id = nodes.len();
            let node = if !root.is_empty() && domain.contains(root) {
                json!({
                    "id": id,
                    "label": domain.replace(&format!(".{root}"), ""),
                    "title": domain,
                    "group": "subdomain",
                    "color": {"background": "#f3e5f5", "border": "#4a148c"},
                    "size": 25,
                    "font": {"color": "#4a148c", "size": 14},
                })
            } else {
                json!({
                    "id": id,
                    "label": shorten(domain, 20),
                    "title": domain,
                    "group": "external",
                    "color": {"background": "#fce4ec", "border": "#880e4f"},
                    "size": 20,
                    "font": {"color": "#880e4f", "size": 12},
                })
            };
            nodes.push(node);
            ids.insert(domain.to_string(), id);
        }
        for ip in model.addresses() {
            let id = nodes.len();
            nodes.push(json!({
                "id": id,
                "label": shorten(ip, 15),
                "title": ip,
                "group": "ip",
                "color": {"background": "#fff3e0", "border": "#e65100"},
                "size": 15,
                "shape": "diamond",
                "font": {"color": "#e65100", "size": 10},
            }));
            ids.insert(ip.clone(), id);
        }
        (nodes, ids)
    }

    #[must_use]
    pub fn edges(&self, model: &ReconModel, ids: &HashMap<String, usize>) -> Vec<Value> {
        model
            .relations()
            .iter()
            .filter(|r| HTML_RELATIONS.contains(&r.relation.as_str()))
            .filter_map(|r| {
                let from = ids.get(&r.source)?;
                let to = ids.get(&r.target)?;
                Some(json!({
                    "from": from,
                    "to": to,
                    "label": r.relation.replace("_record", ""),
                    "color": relation_color(&r.relation),
                    "width": 2,
                    "smooth": {"type": "continuous"},
                }))
            })
            .collect()
    }

    /// Render the full HTML page.
    ///
    /// # Errors
    /// Returns `MapperError::Json` if node or edge data cannot be encoded.
    pub fn generate_html(&self, model: &ReconModel) -> Result<String, MapperError> {
        let (nodes, ids) = self.nodes(model);
        let edges = self.edges(model, &ids);
        let relation_count = model
            .relations()
            .iter()
            .filter(|r| HTML_RELATIONS.contains(&r.relation.as_str()))
            .count();
        let root = model.root_name();
        // Data blocks go in last so names never get substituted as placeholders
        let html = TEMPLATE
            .replace("__DOMAIN_COUNT__", &model.domain_count().to_string())
            .replace("__SUBDOMAIN_COUNT__", &model.subdomains().count().to_string())
            .replace("__IP_COUNT__", &model.addresses().len().to_string())
            .replace("__RELATION_COUNT__", &relation_count.to_string())
            .replace("__FILE_STEM__", &root.replace('.', "_"))
            .replace("__DOMAIN__", &html_escape(root))
            .replace("__NODES__", &script_json(&nodes)?)
            .replace("__EDGES__", &script_json(&edges)?);
        Ok(html)
    }
}

fn shorten(s: &str, max: usize) -> String {
    if s.chars().count() > max {
        let mut out: String = s.chars().take(max).collect();
        out.push_str("...");
        out
    } else {
        s.to_string()
    }
}

// JSON embedded in a <script> block must not close it early
fn script_json(values: &[Value]) -> Result<String, MapperError> {
    Ok(serde_json::to_string_pretty(values)?.replace("</", "<\\/"))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;").replace('"', "&quot;")
}

const TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Map of __DOMAIN__</title>
    <script src="https://unpkg.com/vis-network/standalone/umd/vis-network.min.js"></script>
    <style>
        * { margin: 0; padding: 0; box-sizing: border-box; }
        body { font-family: 'Segoe UI', Tahoma, Geneva, Verdana, sans-serif; background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); min-height: 100vh; color: #333; }
        .container { max-width: 1400px; margin: 0 auto; padding: 20px; }
        .panel { background: rgba(255, 255, 255, 0.95); border-radius: 15px; padding: 20px; margin-bottom: 20px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.1); }
        .panel h1 { font-size: 2.2em; color: #2c3e50; margin-bottom: 10px; }
        .stats-grid { display: grid; grid-template-columns: repeat(auto-fit, minmax(200px, 1fr)); gap: 20px; margin-top: 20px; }
        .stat-card { background: linear-gradient(135deg, #667eea, #764ba2); color: white; padding: 20px; border-radius: 12px; text-align: center; }
        .stat-number { font-size: 2.5em; font-weight: bold; margin-bottom: 5px; }
        .stat-label { font-size: 0.9em; opacity: 0.9; }
        .control-group { display: flex; flex-wrap: wrap; gap: 15px; align-items: center; }
        .btn { background: linear-gradient(135deg, #667eea, #764ba2); color: white; border: none; padding: 10px 20px; border-radius: 25px; cursor: pointer; font-weight: 500; }
        .btn.active { background: linear-gradient(135deg, #f093fb, #f5576c); }
        .network-container { position: relative; height: 70vh; }
        #network { width: 100%; height: 100%; border-radius: 10px; }
        .legend { position: absolute; top: 30px; right: 30px; background: rgba(255, 255, 255, 0.95); padding: 15px; border-radius: 10px; box-shadow: 0 5px 15px rgba(0, 0, 0, 0.1); }
        .legend-item { display: flex; align-items: center; gap: 10px; margin-bottom: 8px; font-size: 0.9em; }
        .legend-color { width: 20px; height: 20px; border-radius: 50%; border: 2px solid #fff; }
        .info-panel { position: absolute; bottom: 30px; left: 30px; background: rgba(255, 255, 255, 0.95); padding: 15px; border-radius: 10px; max-width: 300px; display: none; }
        @media (max-width: 768px) { .stats-grid { grid-template-columns: repeat(2, 1fr); } .legend, .info-panel { position: relative; } .network-container { height: 60vh; } }
    </style>
</head>
<body>
    <div class="container">
        <div class="panel">
            <h1>Map of __DOMAIN__</h1>
            <div class="stats-grid">
                <div class="stat-card"><div class="stat-number">__DOMAIN_COUNT__</div><div class="stat-label">Domains</div></div>
                <div class="stat-card"><div class="stat-number">__SUBDOMAIN_COUNT__</div><div class="stat-label">Subdomains</div></div>
                <div class="stat-card"><div class="stat-number">__IP_COUNT__</div><div class="stat-label">IP addresses</div></div>
                <div class="stat-card"><div class="stat-number">__RELATION_COUNT__</div><div class="stat-label">Relations</div></div>
            </div>
        </div>
        <div class="panel">
            <div class="control-group">
                <button class="btn active" id="physicsBtn" onclick="togglePhysics()">Physics</button>
                <button class="btn" onclick="network.fit()">Center</button>
                <button class="btn" id="ipBtn" onclick="toggleIPs()">Hide IPs</button>
                <button class="btn" onclick="exportImage()">Export PNG</button>
            </div>
        </div>
        <div class="panel network-container">
            <div class="legend">
                <div class="legend-item"><div class="legend-color" style="background: #e1f5fe;"></div><span>Primary domain</span></div>
                <div class="legend-item"><div class="legend-color" style="background: #f3e5f5;"></div><span>Subdomains</span></div>
                <div class="legend-item"><div class="legend-color" style="background: #fff3e0;"></div><span>IP addresses</span></div>
                <div class="legend-item"><div class="legend-color" style="background: #fce4ec;"></div><span>External services</span></div>
            </div>
            <div class="info-panel" id="infoPanel"></div>
            <div id="network"></div>
        </div>
    </div>
    <script>
        const nodesData = __NODES__;
        const edgesData = __EDGES__;
        let network, nodes, edges;
        let physicsEnabled = true;
        let showIPs = true;

        function initNetwork() {
            nodes = new vis.DataSet(nodesData);
            edges = new vis.DataSet(edgesData);
            const options = {
                physics: { enabled: true, stabilization: { enabled: true, iterations: 100, updateInterval: 25 },
                           barnesHut: { gravitationalConstant: -8000, centralGravity: 0.3, springLength: 120, springConstant: 0.04, damping: 0.09 } },
                nodes: { borderWidth: 2, shadow: { enabled: true, color: 'rgba(0,0,0,0.2)', size: 10, x: 2, y: 2 } },
                edges: { arrows: { to: { enabled: true, scaleFactor: 1.2 } }, font: { size: 12, color: '#555' }, smooth: { type: 'continuous', roundness: 0.5 }, width: 2 },
                layout: { improvedLayout: true, clusterThreshold: 150 },
                interaction: { hover: true, hoverConnectedEdges: true, selectConnectedEdges: false, tooltipDelay: 200 }
            };
            network = new vis.Network(document.getElementById('network'), { nodes: nodes, edges: edges }, options);
            network.on('click', function (params) {
                if (params.nodes.length > 0) { showNodeInfo(params.nodes[0]); }
            });
        }

        function togglePhysics() {
            physicsEnabled = !physicsEnabled;
            network.setOptions({ physics: { enabled: physicsEnabled } });
            const btn = document.getElementById('physicsBtn');
            btn.classList.toggle('active');
            btn.textContent = physicsEnabled ? 'Physics' : 'Static';
        }

        function toggleIPs() {
            showIPs = !showIPs;
            const ipNodes = nodesData.filter(n => n.group === 'ip');
            if (showIPs) { nodes.add(ipNodes); } else { nodes.remove(ipNodes.map(n => n.id)); }
            document.getElementById('ipBtn').textContent = showIPs ? 'Hide IPs' : 'Show IPs';
        }

        function exportImage() {
            const link = document.createElement('a');
            link.download = 'map___FILE_STEM__.png';
            link.href = network.canvas.frame.canvas.toDataURL();
            link.click();
        }

        function showNodeInfo(nodeId) {
            const node = nodes.get(nodeId);
            const panel = document.getElementById('infoPanel');
            panel.textContent = (node.title || node.label) + ' [' + node.group + '] - ' +
                network.getConnectedNodes(nodeId).length + ' connections';
            panel.style.display = 'block';
            setTimeout(() => { panel.style.display = 'none'; }, 3000);
        }

        document.addEventListener('DOMContentLoaded', initNetwork);
    </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::AmassParser;

    fn model() -> ReconModel {
        AmassParser::new().parse_str(
            "\
corp.com (FQDN) --> node --> api.corp.com (FQDN)
corp.com (FQDN) --> a_record --> 192.0.2.1 (IPAddress)
api.corp.com (FQDN) --> cname_record --> a-rather-long-load-balancer.vendor.net (FQDN)
corp.com (FQDN) --> ns_record --> ns1.dnshost.org (FQDN)
",
        )
    }

    #[test]
    fn test_nodes_assign_root_first() {
        let (nodes, ids) = HtmlGenerator::new().nodes(&model());
        assert_eq!(ids["corp.com"], 0);
        assert_eq!(nodes[0]["group"], "main");
        let api = &nodes[ids["api.corp.com"]];
        assert_eq!(api["label"], "api");
        assert_eq!(api["group"], "subdomain");
        let ext = &nodes[ids["a-rather-long-load-balancer.vendor.net"]];
        assert_eq!(ext["label"], "a-rather-long-load-b...");
        assert_eq!(nodes[ids["192.0.2.1"]]["shape"], "diamond");
    }

    #[test]
    fn test_edges_skip_ns_records() {
        let g = HtmlGenerator::new();
        let m = model();
        let (_, ids) = g.nodes(&m);
        let edges = g.edges(&m, &ids);
        assert_eq!(edges.len(), 3);
        assert!(edges.iter().any(|e| e["label"] == "cname"));
        assert!(!edges.iter().any(|e| e["label"] == "ns"));
    }

    #[test]
    fn test_page_is_filled_in() {
        let html = HtmlGenerator::new().generate_html(&model()).unwrap();
        assert!(html.contains("<title>Map of corp.com</title>"));
        assert!(html.contains("map_corp_com.png"));
        assert!(!html.contains("__NODES__"));
        assert!(!html.contains("__RELATION_COUNT__"));
        assert!(html.contains("\"group\": \"subdomain\""));
    }

    #[test]
    fn test_script_json_escapes_closing_tags() {
        let v = vec![json!({"label": "</script>"})];
        assert!(!script_json(&v).unwrap().contains("</script>"));
    }
}
