//! Relation model for a parsed Amass report.
//!
//! `ReconModel` is the relation table every presenter reads: the set of
//! discovered names, per-name address bindings, per-name relation records and
//! the heuristically chosen root name. It is populated in one forward pass by
//! `ModelBuilder` and is read-only afterwards.
//!
//! You typically obtain a model through `crate::parser::AmassParser` and then
//! hand it to `crate::classify`, `crate::query`, `crate::report` or
//! `crate::visualization`.
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Relation kinds that carry an address binding when their target is an `IPAddress`.
pub const ADDRESS_RELATIONS: [&str; 2] = ["a_record", "aaaa_record"];

/// Entity type tag attached to each side of a relation line.
///
/// Tags are opaque: anything not recognised is kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Fqdn,
    IpAddress,
    RirOrganization,
    Netblock,
    Asn,
    Other(String),
}

impl NodeKind {
    #[must_use]
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "FQDN" => NodeKind::Fqdn,
            "IPAddress" => NodeKind::IpAddress,
            "RIROrganization" => NodeKind::RirOrganization,
            "Netblock" => NodeKind::Netblock,
            "ASN" => NodeKind::Asn,
            other => NodeKind::Other(other.to_string()),
        }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            NodeKind::Fqdn => "FQDN",
            NodeKind::IpAddress => "IPAddress",
            NodeKind::RirOrganization => "RIROrganization",
            NodeKind::Netblock => "Netblock",
            NodeKind::Asn => "ASN",
            NodeKind::Other(s) => s,
        }
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NodeKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// One matched report line: `SOURCE (SOURCE_TYPE) --> RELATION --> TARGET (TARGET_TYPE)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Relation {
    pub source: String,
    pub source_type: NodeKind,
    pub relation: String,
    pub target: String,
    pub target_type: NodeKind,
}

impl Relation {
    /// Human readable record stored per source name, e.g. `a_record → 1.2.3.4`.
    #[must_use]
    pub fn record(&self) -> String {
        format!("{} → {}", self.relation, self.target)
    }

    #[must_use]
    pub fn is_address_binding(&self) -> bool {
        ADDRESS_RELATIONS.contains(&self.relation.as_str()) && self.target_type == NodeKind::IpAddress
    }
}

/// Shortest-qualifying-name accumulator used to pick the root name.
///
/// A candidate must contain a `.` and must not start with `www.`. It replaces
/// the current choice when none exists yet or when it is strictly shorter, so
/// the earliest name wins ties. Lengths are counted in characters.
#[derive(Debug, Clone, Default)]
pub struct RootTracker {
    current: String,
}

impl RootTracker {
    pub fn offer(&mut self, name: &str) {
        if !name.contains('.') || name.starts_with("www.") {
            return;
        }
        if self.current.is_empty() || name.chars().count() < self.current.chars().count() {
            self.current = name.to_string();
        }
    }

    #[must_use]
    pub fn current(&self) -> &str {
        &self.current
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.current
    }
}

/// Parsed relation table. Built once by `ModelBuilder`, immutable afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconModel {
    root_name: String,
    domains: BTreeSet<String>,
    address_bindings: BTreeMap<String, Vec<String>>,
    relation_records: BTreeMap<String, Vec<String>>,
    addresses: BTreeSet<String>,
    organizations: BTreeSet<String>,
    relations: Vec<Relation>,
}

impl ReconModel {
    /// Discovered names in ordinal order, each exactly once.
    pub fn discovered_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.domains.iter().map(String::as_str)
    }

    #[must_use]
    pub fn domain_set(&self) -> &BTreeSet<String> {
        &self.domains
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.domains.contains(name)
    }

    #[must_use]
    pub fn domain_count(&self) -> usize {
        self.domains.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Root name, possibly empty when no qualifying source was seen.
    #[must_use]
    pub fn root_name(&self) -> &str {
        &self.root_name
    }

    #[must_use]
    pub fn address_bindings(&self) -> &BTreeMap<String, Vec<String>> {
        &self.address_bindings
    }

    #[must_use]
    pub fn relation_records(&self) -> &BTreeMap<String, Vec<String>> {
        &self.relation_records
    }

    /// Addresses bound to `name` in encounter order (duplicates preserved).
    #[must_use]
    pub fn addresses_of(&self, name: &str) -> &[String] {
        self.address_bindings.get(name).map_or(&[], Vec::as_slice)
    }

    #[must_use]
    pub fn relations_of(&self, name: &str) -> &[String] {
        self.relation_records.get(name).map_or(&[], Vec::as_slice)
    }

    /// Every matched line, in input order.
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Unique `IPAddress` targets.
    #[must_use]
    pub fn addresses(&self) -> &BTreeSet<String> {
        &self.addresses
    }

    /// Unique `RIROrganization` targets.
    #[must_use]
    pub fn organizations(&self) -> &BTreeSet<String> {
        &self.organizations
    }

    /// True when a root exists and does not occur anywhere inside `name`.
    ///
    /// This is plain substring containment: `evilshop.io.attacker.net` is not
    /// external to `shop.io`.
    #[must_use]
    pub fn is_external(&self, name: &str) -> bool {
        !self.root_name.is_empty() && !name.contains(self.root_name.as_str())
    }

    /// Names that embed the root and are not the root itself, sorted.
    pub fn subdomains(&self) -> impl Iterator<Item = &str> + '_ {
        self.discovered_names()
            .filter(move |d| *d != self.root_name && d.contains(self.root_name.as_str()))
    }

    /// Names classified as external, sorted.
    pub fn external_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.discovered_names().filter(move |d| self.is_external(d))
    }
}

/// Single-pass builder that folds relation lines into a `ReconModel`.
#[derive(Debug, Default)]
pub struct ModelBuilder {
    root: RootTracker,
    model: ReconModel,
}

impl ModelBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one matched line into the table.
    pub fn ingest(&mut self, rel: Relation) {
        let m = &mut self.model;
        if rel.source_type == NodeKind::Fqdn {
            m.domains.insert(rel.source.clone());
            self.root.offer(&rel.source);
        }
        match rel.target_type {
            NodeKind::Fqdn => {
                m.domains.insert(rel.target.clone());
            }
            NodeKind::IpAddress => {
                m.addresses.insert(rel.target.clone());
            }
            NodeKind::RirOrganization => {
                m.organizations.insert(rel.target.clone());
            }
            _ => {}
        }
        if rel.is_address_binding() {
            m.address_bindings.entry(rel.source.clone()).or_default().push(rel.target.clone());
        }
        m.relation_records.entry(rel.source.clone()).or_default().push(rel.record());
        m.relations.push(rel);
    }

    /// Root chosen so far.
    #[must_use]
    pub fn current_root(&self) -> &str {
        self.root.current()
    }

    #[must_use]
    pub fn finish(self) -> ReconModel {
        let mut model = self.model;
        model.root_name = self.root.into_inner();
        model
    }
}

impl FromIterator<Relation> for ReconModel {
    fn from_iter<I: IntoIterator<Item = Relation>>(iter: I) -> Self {
        let mut b = ModelBuilder::new();
        for rel in iter {
            b.ingest(rel);
        }
        b.finish()
    }
}
