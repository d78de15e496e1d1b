//! Name classification.
//!
//! Every discovered name lands in exactly one `Category`. The decision is a
//! first-match-wins walk over: root equality, external test, the ordered
//! `KEYWORD_RULES` table, and finally `Other`.
use crate::graph::ReconModel;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    Primary,
    Web,
    Api,
    Mail,
    Admin,
    DevTest,
    Infrastructure,
    External,
    Other,
}

impl Category {
    /// All categories in display order.
    pub const ALL: [Category; 9] = [
        Category::Primary,
        Category::Web,
        Category::Api,
        Category::Mail,
        Category::Admin,
        Category::DevTest,
        Category::Infrastructure,
        Category::External,
        Category::Other,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Category::Primary => "Primary",
            Category::Web => "Web Services",
            Category::Api => "API & Applications",
            Category::Mail => "Mail & Communication",
            Category::Admin => "Admin & Management",
            Category::DevTest => "Development & Testing",
            Category::Infrastructure => "Infrastructure",
            Category::External => "External/Third-party",
            Category::Other => "Other",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// A keyword group: a name belongs to `category` if its lower-cased form
/// contains any of `keywords`.
#[derive(Debug, Clone, Copy)]
pub struct KeywordRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

impl KeywordRule {
    #[must_use]
    pub fn matches(&self, lowered: &str) -> bool {
        self.keywords.iter().any(|k| lowered.contains(k))
    }
}

/// Keyword groups in priority order.
pub const KEYWORD_RULES: [KeywordRule; 6] = [
    KeywordRule {
        category: Category::Web,
        keywords: &["www", "web", "site", "portal", "portail", "app", "application"],
    },
    KeywordRule {
        category: Category::Api,
        keywords: &["api", "rest", "graphql", "service", "microservice", "backend", "back"],
    },
    KeywordRule {
        category: Category::Mail,
        keywords: &["mail", "webmail", "smtp", "pop", "imap", "mx", "mta"],
    },
    KeywordRule {
        category: Category::Admin,
        keywords: &["admin", "manage", "control", "panel", "dashboard", "semafore", "collaboration"],
    },
    KeywordRule {
        category: Category::DevTest,
        keywords: &["dev", "test", "stage", "staging", "demo", "beta", "preprod", "sandbox"],
    },
    KeywordRule {
        category: Category::Infrastructure,
        keywords: &["ns", "dns", "ftp", "sftp", "ssh", "vpn", "proxy", "cdn"],
    },
];

/// Classifier bound to one root name.
#[derive(Debug, Clone)]
pub struct Classifier<'a> {
    root: &'a str,
    rules: &'a [KeywordRule],
}

impl<'a> Classifier<'a> {
    #[must_use]
    pub fn new(root: &'a str) -> Self {
        Self { root, rules: &KEYWORD_RULES }
    }

    /// Classifier with a custom ordered rule table.
    #[must_use]
    pub fn with_rules(root: &'a str, rules: &'a [KeywordRule]) -> Self {
        Self { root, rules }
    }

    #[must_use]
    pub fn classify(&self, name: &str) -> Category {
        if name == self.root {
            return Category::Primary;
        }
        // Substring containment, not a domain-boundary suffix test
        if !self.root.is_empty() && !name.contains(self.root) {
            return Category::External;
        }
        let lowered = name.to_lowercase();
        self.rules
            .iter()
            .find(|r| r.matches(&lowered))
            .map_or(Category::Other, |r| r.category)
    }

    /// Partition `names` into categories.
    pub fn categorize<'n, I>(&self, names: I) -> Categories
    where
        I: IntoIterator<Item = &'n str>,
    {
        let mut out = Categories::default();
        for name in names {
            out.buckets[self.classify(name).index()].insert(name.to_string());
        }
        out
    }
}

/// Result of `categorize`: one sorted bucket per category, in display order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories {
    buckets: [BTreeSet<String>; 9],
}

impl Categories {
    #[must_use]
    pub fn get(&self, category: Category) -> Vec<&str> {
        self.buckets[category.index()].iter().map(String::as_str).collect()
    }

    #[must_use]
    pub fn len_of(&self, category: Category) -> usize {
        self.buckets[category.index()].len()
    }

    /// All categories in display order, including empty ones.
    pub fn iter(&self) -> impl Iterator<Item = (Category, Vec<&str>)> + '_ {
        Category::ALL.into_iter().map(move |c| (c, self.get(c)))
    }

    /// Categories with at least one member, in display order.
    pub fn non_empty(&self) -> impl Iterator<Item = (Category, Vec<&str>)> + '_ {
        self.iter().filter(|(_, names)| !names.is_empty())
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.buckets.iter().map(BTreeSet::len).sum()
    }
}

impl Serialize for Categories {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeMap;
        let mut map = serializer.serialize_map(Some(Category::ALL.len()))?;
        for (c, names) in self.iter() {
            map.serialize_entry(c.label(), &names)?;
        }
        map.end()
    }
}

impl ReconModel {
    /// Categorize every discovered name against this model's root.
    #[must_use]
    pub fn categorize(&self) -> Categories {
        Classifier::new(self.root_name()).categorize(self.discovered_names())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_order() {
        let c = Classifier::new("corp.com");
        assert_eq!(c.classify("corp.com"), Category::Primary);
        assert_eq!(c.classify("cdn.cloudflare.net"), Category::External);
        // "webmail" hits Web before Mail
        assert_eq!(c.classify("webmail.corp.com"), Category::Web);
        assert_eq!(c.classify("api.corp.com"), Category::Api);
        assert_eq!(c.classify("smtp.corp.com"), Category::Mail);
        assert_eq!(c.classify("admin.corp.com"), Category::Admin);
        assert_eq!(c.classify("staging.corp.com"), Category::DevTest);
        assert_eq!(c.classify("vpn.corp.com"), Category::Infrastructure);
        assert_eq!(c.classify("hr.corp.com"), Category::Other);
    }

    #[test]
    fn test_keywords_are_case_insensitive_substrings() {
        let c = Classifier::new("corp.com");
        assert_eq!(c.classify("MyAPP.corp.com"), Category::Web);
        // "ns" occurs inside "transfer"
        assert_eq!(c.classify("transfer.corp.com"), Category::Infrastructure);
    }

    #[test]
    fn test_root_check_is_case_sensitive_containment() {
        let c = Classifier::new("shop.io");
        assert_eq!(c.classify("evilshop.io.attacker.net"), Category::Other);
        assert_eq!(c.classify("SHOP.IO"), Category::External);
    }

    #[test]
    fn test_empty_root_skips_primary_and_external() {
        let c = Classifier::new("");
        assert_eq!(c.classify("mail.example.org"), Category::Mail);
        assert_eq!(c.classify("unrelated.org"), Category::Other);
    }

    #[test]
    fn test_categorize_partition_and_order() {
        let names = ["z.corp.com", "corp.com", "api.corp.com", "a.corp.com", "gmail.com"];
        let cats = Classifier::new("corp.com").categorize(names);
        assert_eq!(cats.total(), names.len());
        assert_eq!(cats.get(Category::Other), ["a.corp.com", "z.corp.com"]);
        let order: Vec<Category> = cats.non_empty().map(|(c, _)| c).collect();
        assert_eq!(order, [Category::Primary, Category::Api, Category::External, Category::Other]);
    }

    #[test]
    fn test_custom_rules() {
        const RULES: [KeywordRule; 1] = [KeywordRule { category: Category::Mail, keywords: &["post"] }];
        let c = Classifier::with_rules("corp.com", &RULES);
        assert_eq!(c.classify("postfix.corp.com"), Category::Mail);
        assert_eq!(c.classify("www.corp.com"), Category::Other);
    }

    #[test]
    fn test_labels_in_display_order() {
        let labels: Vec<&str> = Category::ALL.iter().map(|c| c.label()).collect();
        assert_eq!(
            labels,
            [
                "Primary",
                "Web Services",
                "API & Applications",
                "Mail & Communication",
                "Admin & Management",
                "Development & Testing",
                "Infrastructure",
                "External/Third-party",
                "Other",
            ]
        );
    }
}
