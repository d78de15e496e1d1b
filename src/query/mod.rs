use serde::Serialize;

use crate::classify::Categories;
use crate::graph::ReconModel;

/// Relation kinds drawn as edges by the map renderers.
pub const IMPORTANT_RELATIONS: [&str; 5] =
    ["node", "a_record", "cname_record", "mx_record", "ns_record"];

/// Query trait implemented by all query types.
///
/// Given an immutable reference to a `ReconModel`, returns a result of type `R`.
pub trait Query<R> {
    fn run(&self, model: &ReconModel) -> R;
}

/// Partition of every discovered name into categories.
#[derive(Debug, Default)]
pub struct CategorizeQuery;

impl Query<Categories> for CategorizeQuery {
    fn run(&self, model: &ReconModel) -> Categories {
        model.categorize()
    }
}

/// Names embedding the root name, excluding the root itself. Sorted.
#[derive(Debug, Default)]
pub struct SubdomainsQuery;

impl Query<Vec<String>> for SubdomainsQuery {
    fn run(&self, model: &ReconModel) -> Vec<String> {
        model.subdomains().map(str::to_string).collect()
    }
}

/// Names that do not contain the root name. Sorted.
#[derive(Debug, Default)]
pub struct ExternalQuery;

impl Query<Vec<String>> for ExternalQuery {
    fn run(&self, model: &ReconModel) -> Vec<String> {
        model.external_names().map(str::to_string).collect()
    }
}

/// Addresses bound to one name through `a_record`/`aaaa_record`, in report order.
pub struct ResolveQuery {
    pub name: String,
}

impl ResolveQuery {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Query<Vec<String>> for ResolveQuery {
    fn run(&self, model: &ReconModel) -> Vec<String> {
        model.addresses_of(&self.name).to_vec()
    }
}

/// Outgoing relation records (`kind → target`) of one name, in report order.
pub struct RelationsQuery {
    pub name: String,
}

impl RelationsQuery {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string() }
    }
}

impl Query<Vec<String>> for RelationsQuery {
    fn run(&self, model: &ReconModel) -> Vec<String> {
        model.relations_of(&self.name).to_vec()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub root: String,
    pub domains: usize,
    pub subdomains: usize,
    pub external: usize,
    pub addresses: usize,
    pub organizations: usize,
    pub relations: usize,
    pub important_relations: usize,
}

/// Summary counters shown by the text map and the HTML header.
#[derive(Debug, Default)]
pub struct StatsQuery;

impl Query<Stats> for StatsQuery {
    fn run(&self, model: &ReconModel) -> Stats {
        Stats {
            root: model.root_name().to_string(),
            domains: model.domain_count(),
            subdomains: model.subdomains().count(),
            external: model.external_names().count(),
            addresses: model.addresses().len(),
            organizations: model.organizations().len(),
            relations: model.relations().len(),
            important_relations: model
                .relations()
                .iter()
                .filter(|r| IMPORTANT_RELATIONS.contains(&r.relation.as_str()))
                .count(),
        }
    }
}
