//! amass-mapper: inventory and maps for Amass relation reports
//!
//! Parse the textual relation report produced by Amass into a relation table,
//! classify every discovered name and render listings, exports and maps.
//!
//! # Features
//! - Line parser for `SOURCE (TYPE) --> RELATION --> TARGET (TYPE)`; anything else is skipped
//! - Root-domain heuristic (shortest dotted FQDN not starting with `www.`)
//! - Ordered keyword classifier into nine categories
//! - Queries: categories, subdomains, external, resolve, relations, stats
//! - Text listings and exports, Graphviz DOT/SVG/PNG/PDF and interactive HTML maps
//!
//! # Quickstart (Library)
//! ```
//! use amass_mapper::parser::AmassParser;
//!
//! let model = AmassParser::new().parse_str(
//!     "corp.com (FQDN) --> node --> api.corp.com (FQDN)\n\
//!      api.corp.com (FQDN) --> a_record --> 192.0.2.7 (IPAddress)\n",
//! );
//! assert_eq!(model.root_name(), "corp.com");
//! assert_eq!(model.addresses_of("api.corp.com"), ["192.0.2.7".to_string()]);
//! for (category, names) in model.categorize().non_empty() {
//!     println!("{category}: {names:?}");
//! }
//! ```
//!
//! # Quickstart (CLI)
//! ```text
//! amass-mapper list amass.txt --mode categorized --export domains.txt --export-ips
//! amass-mapper map amass.txt --renderer html
//! amass-mapper query stats amass.txt --format json
//! ```
pub mod app;
pub mod classify;
pub mod cli;
pub mod errors;
pub mod graph;
pub mod parser;
pub mod query;
pub mod report;
pub mod utils;
pub mod visualization;
