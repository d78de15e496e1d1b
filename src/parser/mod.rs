use crate::errors::InputError;
use crate::graph::{ModelBuilder, NodeKind, ReconModel, Relation};
use log::debug;
use regex::Regex;
use std::fs;
use std::io::BufRead;
use std::path::Path;

/// Line parser for Amass `viz`/`track` style relation reports.
///
/// Lines that are blank, start with `#`, or do not match
/// `SOURCE (TYPE) --> RELATION --> TARGET (TYPE)` are skipped without notice.
#[derive(Debug, Default)]
pub struct AmassParser {
    patterns: RegexPatterns,
}

#[derive(Debug)]
pub struct RegexPatterns {
    pub relation_line: Regex,
}

impl RegexPatterns {
    /// # Panics
    /// Never in practice: the pattern is a compile-time constant.
    #[must_use]
    pub fn compile() -> Self {
        // Lazy captures so the first " (" and ") --> " delimit the fields
        let relation_line =
            Regex::new(r"^(.+?) \((.+?)\) --> (.+?) --> (.+?) \((.+?)\)$").expect("valid regex");
        Self { relation_line }
    }
}

impl Default for RegexPatterns {
    fn default() -> Self {
        Self::compile()
    }
}

impl AmassParser {
    #[must_use]
    pub fn new() -> Self {
        Self { patterns: RegexPatterns::compile() }
    }

    /// Parse a single line. `None` means the line is skipped.
    #[must_use]
    pub fn parse_line(&self, line: &str) -> Option<Relation> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return None;
        }
        let cap = self.patterns.relation_line.captures(line)?;
        let field = |i: usize| cap.get(i).map_or("", |m| m.as_str().trim());
        Some(Relation {
            source: field(1).to_string(),
            source_type: NodeKind::from_tag(field(2)),
            relation: field(3).to_string(),
            target: field(4).to_string(),
            target_type: NodeKind::from_tag(field(5)),
        })
    }

    /// Fold every line of `content` into a model.
    #[must_use]
    pub fn parse_str(&self, content: &str) -> ReconModel {
        let mut builder = ModelBuilder::new();
        let mut matched = 0usize;
        for line in content.lines() {
            if let Some(rel) = self.parse_line(line) {
                builder.ingest(rel);
                matched += 1;
            }
        }
        let model = builder.finish();
        debug!(
            "parsed {matched} relation lines: {} names, root '{}'",
            model.domain_count(),
            model.root_name()
        );
        model
    }

    /// Parse from any buffered reader. Invalid UTF-8 or a read failure aborts the whole parse.
    ///
    /// # Errors
    /// Returns `InputError::Unreadable` attributed to `origin` when reading fails.
    pub fn parse_reader<R: BufRead>(&self, reader: R, origin: &Path) -> Result<ReconModel, InputError> {
        let mut builder = ModelBuilder::new();
        for line in reader.lines() {
            let line = line.map_err(|e| InputError::Unreadable { path: origin.to_path_buf(), source: e })?;
            if let Some(rel) = self.parse_line(&line) {
                builder.ingest(rel);
            }
        }
        Ok(builder.finish())
    }

    /// Read and parse the report at `path`.
    ///
    /// # Errors
    /// `InputError::NotFound` when the file does not exist, `InputError::Unreadable`
    /// for any other failure (permissions, directory, invalid UTF-8).
    pub fn parse_file(&self, path: &Path) -> Result<ReconModel, InputError> {
        let content = fs::read_to_string(path).map_err(|e| InputError::from_io(path, e))?;
        debug!("read {} bytes from {}", content.len(), path.display());
        Ok(self.parse_str(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_line_a_record() {
        let p = AmassParser::new();
        let rel = p.parse_line("foo.example.com (FQDN) --> a_record --> 10.0.0.1 (IPAddress)").unwrap();
        assert_eq!(rel.source, "foo.example.com");
        assert_eq!(rel.source_type, NodeKind::Fqdn);
        assert_eq!(rel.relation, "a_record");
        assert_eq!(rel.target, "10.0.0.1");
        assert_eq!(rel.target_type, NodeKind::IpAddress);
    }

    #[test]
    fn test_parse_line_skips_noise() {
        let p = AmassParser::new();
        assert!(p.parse_line("").is_none());
        assert!(p.parse_line("   ").is_none());
        assert!(p.parse_line("# a.com (FQDN) --> node --> b.a.com (FQDN)").is_none());
        assert!(p.parse_line("   # indented comment").is_none());
        assert!(p.parse_line("not a valid amass line").is_none());
        assert!(p.parse_line("a.com (FQDN) --> node --> b.a.com").is_none());
    }

    #[test]
    fn test_parse_line_trims_and_keeps_unknown_tags() {
        let p = AmassParser::new();
        let rel = p
            .parse_line("  13335 (ASN) --> managed_by --> CLOUDFLARENET - Cloudflare, Inc. (RIROrganization)  ")
            .unwrap();
        assert_eq!(rel.source, "13335");
        assert_eq!(rel.source_type, NodeKind::Asn);
        assert_eq!(rel.target, "CLOUDFLARENET - Cloudflare, Inc.");
        assert_eq!(rel.target_type, NodeKind::RirOrganization);

        let odd = p.parse_line("x.io (Service) --> port --> 443 (Port)").unwrap();
        assert_eq!(odd.source_type, NodeKind::Other("Service".into()));
        assert_eq!(odd.target_type.as_str(), "Port");
    }

    #[test]
    fn test_parse_str_single_line_contract() {
        let p = AmassParser::new();
        let model = p.parse_str("foo.example.com (FQDN) --> a_record --> 10.0.0.1 (IPAddress)\n");
        assert!(model.contains("foo.example.com"));
        assert_eq!(model.addresses_of("foo.example.com"), ["10.0.0.1"]);
        assert_eq!(model.relations_of("foo.example.com"), ["a_record → 10.0.0.1"]);
    }

    #[test]
    fn test_root_follows_line_order() {
        let p = AmassParser::new();
        let src = "\
a.b.c (FQDN) --> node --> d.a.b.c (FQDN)
x.y (FQDN) --> node --> z.x.y (FQDN)
www.x.y (FQDN) --> a_record --> 1.1.1.1 (IPAddress)
";
        assert_eq!(p.parse_str(src).root_name(), "x.y");
        let first_only = p.parse_str("a.b.c (FQDN) --> node --> d.a.b.c (FQDN)\n");
        assert_eq!(first_only.root_name(), "a.b.c");
    }

    #[test]
    fn test_targets_never_become_root() {
        let p = AmassParser::new();
        let model = p.parse_str("long.example.com (FQDN) --> cname_record --> e.io (FQDN)\n");
        assert_eq!(model.root_name(), "long.example.com");
        assert!(model.contains("e.io"));
    }

    #[test]
    fn test_parse_file_missing_vs_unreadable() {
        let p = AmassParser::new();
        let dir = std::env::temp_dir().join("amass_mapper_parser_missing");
        let missing = dir.join("nope.txt");
        match p.parse_file(&missing) {
            Err(InputError::NotFound { path }) => assert_eq!(path, missing),
            other => panic!("expected NotFound, got {other:?}"),
        }
        // A directory exists but cannot be read as a file
        let here = std::env::temp_dir();
        assert!(matches!(p.parse_file(&here), Err(InputError::Unreadable { .. })));
    }

    #[test]
    fn test_parse_reader_rejects_invalid_utf8() {
        let p = AmassParser::new();
        let bytes: &[u8] = b"a.com (FQDN) --> node --> b.a.com (FQDN)\n\xff\xfe\n";
        let res = p.parse_reader(std::io::BufReader::new(bytes), Path::new("mem"));
        assert!(matches!(res, Err(InputError::Unreadable { .. })));
    }
}
