//! Deterministic naming of generated types and fields.
//!
//! Every name is a pure function of catalog facts and [`InflectionOptions`],
//! so rebuilding the registry from the same catalog yields the same surface.

use crate::InflectionOptions;
use tether_catalog::{Cardinality, Relationship, TableDescriptor, UniqueConstraint};

// ==================== Case Helpers ====================

fn words(parts: &[&str]) -> Vec<String> {
    parts
        .iter()
        .flat_map(|p| p.split(['_', '-', ' ']))
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Join parts as UpperCamelCase, splitting each on `_`, `-` and spaces.
pub fn upper_camel(parts: &[&str]) -> String {
    words(parts).iter().map(|w| capitalize(w)).collect()
}

/// Join parts as lowerCamelCase.
pub fn lower_camel(parts: &[&str]) -> String {
    let words = words(parts);
    let mut out = String::new();
    for (i, word) in words.iter().enumerate() {
        if i == 0 {
            out.push_str(&word.to_lowercase());
        } else {
            out.push_str(&capitalize(word));
        }
    }
    out
}

fn is_vowel(c: char) -> bool {
    matches!(c, 'a' | 'e' | 'i' | 'o' | 'u')
}

/// Simple English plural. Words already ending in a single `s` are left alone.
pub fn pluralize(word: &str) -> String {
    if word.ends_with("ss") || word.ends_with('x') || word.ends_with("ch") || word.ends_with("sh") {
        return format!("{}es", word);
    }
    if word.ends_with('s') {
        return word.to_string();
    }
    if let Some(stem) = word.strip_suffix('y') {
        if stem.chars().last().is_some_and(|c| !is_vowel(c)) {
            return format!("{}ies", stem);
        }
    }
    format!("{}s", word)
}

/// Simple English singular, the inverse of [`pluralize`] for regular words.
pub fn singularize(word: &str) -> String {
    if let Some(stem) = word.strip_suffix("ies") {
        return format!("{}y", stem);
    }
    for suffix in ["sses", "xes", "ches", "shes"] {
        if word.ends_with(suffix) {
            return word[..word.len() - 2].to_string();
        }
    }
    if word.ends_with('s') && !word.ends_with("ss") {
        return word[..word.len() - 1].to_string();
    }
    word.to_string()
}

// ==================== Inflector ====================

/// Naming functions bound to a set of options.
#[derive(Debug, Clone, Default)]
pub struct Inflector {
    options: InflectionOptions,
}

impl Inflector {
    pub fn new(options: InflectionOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &InflectionOptions {
        &self.options
    }

    /// `"pk"` for the primary key, the joined attribute names otherwise.
    pub fn key_label(unique: &UniqueConstraint) -> String {
        if unique.is_primary {
            "pk".to_string()
        } else {
            unique.attributes.join("_")
        }
    }

    fn fk_prefix<'r>(rel: &'r Relationship) -> Vec<&'r str> {
        let mut parts = vec![rel.fk_table()];
        parts.extend(rel.fk_attributes().iter().map(String::as_str));
        parts.push("fkey");
        if rel.is_reverse {
            parts.push("inverse");
        }
        parts
    }

    // ---------- Type names ----------

    /// `PostsAuthorIdFkeyInput`, `PostsAuthorIdFkeyInverseInput`.
    pub fn connector_type(&self, rel: &Relationship) -> String {
        let mut parts = Self::fk_prefix(rel);
        parts.push("input");
        upper_camel(&parts)
    }

    /// `PostsAuthorIdFkeyCreateInput`.
    pub fn create_type(&self, rel: &Relationship) -> String {
        let mut parts = Self::fk_prefix(rel);
        parts.extend(["create", "input"]);
        upper_camel(&parts)
    }

    /// `UsersPkConnect`, `UsersEmailConnect`.
    pub fn connect_by_key_type(&self, remote: &str, unique: &UniqueConstraint) -> String {
        upper_camel(&[remote, &Self::key_label(unique), "connect"])
    }

    /// `UsersNodeIdConnect`.
    pub fn connect_by_node_id_type(&self, remote: &str) -> String {
        upper_camel(&[remote, &self.options.node_id_label, "connect"])
    }

    fn update_prefix<'r>(rel: &'r Relationship) -> Vec<&'r str> {
        let mut parts = vec![rel.remote_table.as_str(), "on", rel.local_table.as_str(), "for", rel.fk_table()];
        parts.extend(rel.fk_attributes().iter().map(String::as_str));
        // Both directions of a self-reference would otherwise share one name.
        if rel.is_reverse && rel.local_table == rel.remote_table {
            parts.push("inverse");
        }
        parts
    }

    /// `UsersOnPostsForPostsAuthorIdUsingPkUpdate`.
    pub fn update_by_key_type(&self, rel: &Relationship, unique: &UniqueConstraint) -> String {
        let label = Self::key_label(unique);
        let mut parts = Self::update_prefix(rel);
        parts.extend(["using", label.as_str(), "update"]);
        upper_camel(&parts)
    }

    /// `UsersOnPostsForPostsAuthorIdNodeIdUpdate`.
    pub fn update_by_node_id_type(&self, rel: &Relationship) -> String {
        let mut parts = Self::update_prefix(rel);
        parts.extend([self.options.node_id_label.as_str(), "update"]);
        upper_camel(&parts)
    }

    /// `PostsPkDelete`.
    pub fn delete_by_key_type(&self, remote: &str, unique: &UniqueConstraint) -> String {
        upper_camel(&[remote, &Self::key_label(unique), "delete"])
    }

    /// `PostsNodeIdDelete`.
    pub fn delete_by_node_id_type(&self, remote: &str) -> String {
        upper_camel(&[remote, &self.options.node_id_label, "delete"])
    }

    /// `UsersPatch`.
    pub fn patch_type(&self, table: &str) -> String {
        upper_camel(&[table, "patch"])
    }

    // ---------- Field names ----------

    pub fn attribute_field(&self, attribute: &str) -> String {
        lower_camel(&[attribute])
    }

    pub fn node_id_field(&self) -> String {
        lower_camel(&[&self.options.node_id_label])
    }

    pub fn patch_field(&self) -> String {
        lower_camel(&[&self.options.patch_field])
    }

    pub fn create_field(&self) -> String {
        "create".to_string()
    }

    fn by_key(verb: &str, unique: &UniqueConstraint) -> String {
        lower_camel(&[verb, "by", &unique.attributes.join("_and_")])
    }

    fn by_node_id(&self, verb: &str) -> String {
        lower_camel(&[verb, "by", &self.options.node_id_label])
    }

    /// `connectById`, `connectByOrgAndHandle`.
    pub fn connect_by_key_field(&self, unique: &UniqueConstraint) -> String {
        Self::by_key("connect", unique)
    }

    /// `connectByNodeId`.
    pub fn connect_by_node_id_field(&self) -> String {
        self.by_node_id("connect")
    }

    pub fn update_by_key_field(&self, unique: &UniqueConstraint) -> String {
        Self::by_key("update", unique)
    }

    pub fn update_by_node_id_field(&self) -> String {
        self.by_node_id("update")
    }

    pub fn delete_by_key_field(&self, unique: &UniqueConstraint) -> String {
        Self::by_key("delete", unique)
    }

    pub fn delete_by_node_id_field(&self) -> String {
        self.by_node_id("delete")
    }

    /// Connector field names for every relationship of `table`, in order.
    ///
    /// Names never collide with each other or with the table's attribute fields.
    pub fn connector_fields(&self, table: &TableDescriptor, relationships: &[Relationship]) -> Vec<String> {
        let mut taken: Vec<String> = table
            .attributes
            .iter()
            .map(|a| self.attribute_field(&a.name))
            .collect();
        let mut names = Vec::with_capacity(relationships.len());

        for rel in relationships {
            let preferred = if rel.is_reverse {
                self.reverse_field(rel, relationships)
            } else {
                self.forward_field(rel)
            };

            let name = if taken.contains(&preferred) {
                let fallback = if rel.is_reverse {
                    self.disambiguated_reverse_field(rel)
                } else {
                    self.forward_fallback(rel)
                };
                // Constraint names are unique per table, so the suffix always settles it.
                if taken.contains(&fallback) {
                    lower_camel(&[&fallback, &rel.constraint_name])
                } else {
                    fallback
                }
            } else {
                preferred
            };

            taken.push(name.clone());
            names.push(name);
        }

        names
    }

    fn forward_field(&self, rel: &Relationship) -> String {
        if self.options.strip_id_suffix {
            if let [single] = rel.local_attributes.as_slice() {
                if let Some(stem) = single.strip_suffix("_id").filter(|s| !s.is_empty()) {
                    return lower_camel(&[stem]);
                }
            }
        }
        self.forward_fallback(rel)
    }

    fn forward_fallback(&self, rel: &Relationship) -> String {
        lower_camel(&[&rel.remote_table, "to", &rel.local_attributes.join("_and_")])
    }

    fn reverse_base(&self, rel: &Relationship) -> String {
        match rel.cardinality {
            Cardinality::Many => pluralize(&rel.remote_table),
            Cardinality::One => singularize(&rel.remote_table),
        }
    }

    fn reverse_field(&self, rel: &Relationship, siblings: &[Relationship]) -> String {
        let paths = siblings
            .iter()
            .filter(|r| r.is_reverse && r.remote_table == rel.remote_table)
            .count();
        if paths > 1 {
            self.disambiguated_reverse_field(rel)
        } else {
            lower_camel(&[&self.reverse_base(rel)])
        }
    }

    fn disambiguated_reverse_field(&self, rel: &Relationship) -> String {
        lower_camel(&[&self.reverse_base(rel), "by", &rel.remote_attributes.join("_and_")])
    }
}
