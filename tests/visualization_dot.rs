use amass_mapper::parser::AmassParser;
use amass_mapper::visualization::{
    default_output_name, DotGenerator, DotOptions, DotTheme, EdgeStyle, HtmlGenerator, RankDir,
};

const REPORT: &str = "\
corp.com (FQDN) --> node --> intranet-collaboration-suite.corp.com (FQDN)
corp.com (FQDN) --> a_record --> 192.0.2.1 (IPAddress)
corp.com (FQDN) --> aaaa_record --> 2001:db8::1 (IPAddress)
corp.com (FQDN) --> cname_record --> a-really-long-third-party-host.example.net (FQDN)
192.0.2.0/24 (Netblock) --> contains --> 192.0.2.1 (IPAddress)
64500 (ASN) --> managed_by --> VERY-LONG-ORG-NAME-LTD (RIROrganization)
192.0.2.1 (IPAddress) --> ptr_record --> 1.2.0.192.in-addr.arpa (FQDN)
";

#[test]
fn dot_defaults_render_roles_and_edges() {
    let model = AmassParser::new().parse_str(REPORT);
    let dot = DotGenerator::new().generate_dot(&model).unwrap();

    assert!(dot.starts_with("// Map of corp.com\ndigraph DomainMap\n{\n"));
    assert!(dot.contains("rankdir=TB;"));
    assert!(dot.contains("splines=ortho"));
    // root drawn bold
    assert!(dot.contains("\"corp_com\" [label=\"corp.com\""));
    assert!(dot.contains("penwidth=3"));
    // subdomain label drops the root suffix and is truncated
    assert!(dot.contains("label=\"intranet-collabor...\""));
    // external label truncated at 22 chars
    assert!(dot.contains("label=\"a-really-long-third-pa...\""));
    // IPv4 kept, edges labelled
    assert!(dot.contains("\"n_192_0_2_1\" [label=\"192.0.2.1\""));
    assert!(dot.contains("\"corp_com\" -> \"n_192_0_2_1\" [label=\"IP\""));
    assert!(dot.contains("[label=\"CNAME\""));
    // organizations hidden by default, legend shown
    assert!(!dot.contains("VERY-LONG-ORG"));
    assert!(dot.contains("subgraph cluster_legend"));
    // ptr_record is not drawn
    assert!(!dot.contains("\"n_192_0_2_1\" -> "));
}

#[test]
fn dot_options_toggle_nodes_and_layout() {
    let model = AmassParser::new().parse_str(REPORT);
    let opts = DotOptions {
        show_ips: false,
        show_orgs: true,
        legend: false,
        theme: DotTheme::Dark,
        rankdir: RankDir::LR,
        splines: EdgeStyle::Polyline,
    };
    let dot = DotGenerator::new().generate_dot_with_options(&model, opts).unwrap();

    assert!(dot.contains("rankdir=LR;"));
    assert!(dot.contains("splines=polyline"));
    assert!(!dot.contains("cluster_legend"));
    assert!(!dot.contains("label=\"192.0.2.1\""));
    assert!(!dot.contains("[label=\"IP\""));
    // org label truncated to 12 chars plus ellipsis
    assert!(dot.contains("label=\"VERY-LONG-OR...\""));
}

#[test]
fn default_output_name_uses_root() {
    let model = AmassParser::new().parse_str(REPORT);
    assert_eq!(default_output_name(&model, "svg"), "domain_map_corp_com.svg");
}

#[test]
fn html_nodes_and_edges() {
    let model = AmassParser::new().parse_str(REPORT);
    let generator = HtmlGenerator::new();
    let (nodes, ids) = generator.nodes(&model);
    assert_eq!(nodes[0]["label"], "corp.com");
    assert_eq!(nodes[0]["group"], "main");
    assert_eq!(ids["corp.com"], 0);
    assert!(nodes.iter().any(|n| n["group"] == "ip" && n["label"] == "2001:db8::1"));

    let edges = generator.edges(&model, &ids);
    // node, a_record, cname_record are drawn; aaaa_record, contains, managed_by, ptr_record are not
    assert_eq!(edges.len(), 3);
    assert!(edges.iter().any(|e| e["label"] == "cname"));
}
