use rustc_hash::FxHashSet;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Type names written when no mapping exists and the operator gives none.
pub const DEFAULT_TYPE_NAMES: &[&str] = &["uncategorized", "nouns"];

/// Ordered mapping of category-type name to its member category names.
///
/// Order is the order of the backing JSON object. It only matters for
/// display and for the order in which type placeholders are expanded.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CategoryTypes {
    entries: Vec<(String, Vec<String>)>,
}

impl CategoryTypes {
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in fallback mapping: `{uncategorized: [], nouns: []}`.
    pub fn builtin_default() -> Self {
        let mut types = Self::new();
        for name in DEFAULT_TYPE_NAMES {
            types.insert(*name, Vec::new());
        }
        types
    }

    /// Build a mapping from an operator-supplied comma list such as
    /// `"uncategorized, nouns"`. Every type starts with no categories.
    /// Returns `None` when the list names no types at all.
    pub fn from_comma_list(input: &str) -> Option<Self> {
        let mut types = Self::new();
        for name in input.split(',').map(str::trim).filter(|n| !n.is_empty()) {
            types.insert(name, Vec::new());
        }
        if types.is_empty() {
            None
        } else {
            Some(types)
        }
    }

    /// Insert or replace a type. A replaced type keeps its position.
    pub fn insert(&mut self, name: impl Into<String>, categories: Vec<String>) {
        let name = name.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some(entry) => entry.1 = categories,
            None => self.entries.push((name, categories)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, cats)| cats.as_slice())
    }

    pub fn contains_type(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Whether `category` is listed under any type.
    pub fn lists_category(&self, category: &str) -> bool {
        self.entries
            .iter()
            .any(|(_, cats)| cats.iter().any(|c| c == category))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries
            .iter()
            .map(|(name, cats)| (name.as_str(), cats.as_slice()))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Every listed category, in type order then list order, without repeats.
    pub fn all_categories(&self) -> Vec<String> {
        let mut seen = FxHashSet::default();
        let mut out = Vec::new();
        for (_, cats) in &self.entries {
            for cat in cats {
                if seen.insert(cat.as_str()) {
                    out.push(cat.clone());
                }
            }
        }
        out
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for CategoryTypes {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(name, cats)| (name, cats)))
    }
}

struct CategoryTypesVisitor;

impl<'de> Visitor<'de> for CategoryTypesVisitor {
    type Value = CategoryTypes;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("an object mapping type names to arrays of category names")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<CategoryTypes, A::Error> {
        let mut types = CategoryTypes::new();
        while let Some((name, cats)) = map.next_entry::<String, Vec<String>>()? {
            types.insert(name, cats);
        }
        Ok(types)
    }
}

impl<'de> Deserialize<'de> for CategoryTypes {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CategoryTypesVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_default_has_two_empty_types() {
        let types = CategoryTypes::builtin_default();
        let names: Vec<&str> = types.names().collect();
        assert_eq!(names, vec!["uncategorized", "nouns"]);
        assert!(types.iter().all(|(_, cats)| cats.is_empty()));
    }

    #[test]
    fn comma_list_trims_and_skips_blanks() {
        let types = CategoryTypes::from_comma_list(" places , ,people,").unwrap();
        let names: Vec<&str> = types.names().collect();
        assert_eq!(names, vec!["places", "people"]);
        assert!(CategoryTypes::from_comma_list(" , ").is_none());
    }

    #[test]
    fn json_keeps_file_order() {
        let json = r#"{"zeta": ["z"], "alpha": ["a", "b"], "mid": []}"#;
        let types: CategoryTypes = serde_json::from_str(json).unwrap();
        let names: Vec<&str> = types.names().collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
        assert_eq!(types.get("alpha").unwrap(), ["a", "b"]);

        let written = serde_json::to_string(&types).unwrap();
        assert_eq!(written, r#"{"zeta":["z"],"alpha":["a","b"],"mid":[]}"#);
    }

    #[test]
    fn rejects_non_array_values() {
        let result: Result<CategoryTypes, _> = serde_json::from_str(r#"{"a": "colors"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut types = CategoryTypes::new();
        types.insert("first", vec!["a".to_string()]);
        types.insert("second", vec![]);
        types.insert("first", vec!["b".to_string()]);
        let names: Vec<&str> = types.names().collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(types.get("first").unwrap(), ["b"]);
    }

    #[test]
    fn all_categories_dedups_across_types() {
        let mut types = CategoryTypes::new();
        types.insert("t1", vec!["colors".to_string(), "animals".to_string()]);
        types.insert("t2", vec!["animals".to_string(), "tools".to_string()]);
        assert_eq!(types.all_categories(), vec!["colors", "animals", "tools"]);
        assert!(types.lists_category("tools"));
        assert!(!types.lists_category("t1"));
    }
}
