//! Named numeric feature vector

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat map of feature name to value, ordered by name
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector(BTreeMap<String, f64>);

impl FeatureVector {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    pub fn insert(&mut self, name: impl Into<String>, value: f64) {
        self.0.insert(name.into(), value);
    }

    /// Insert a 0/1 indicator
    pub fn insert_flag(&mut self, name: impl Into<String>, flag: bool) {
        self.insert(name, if flag { 1.0 } else { 0.0 });
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.0.get(name).copied()
    }

    /// Value of a feature, 0.0 when absent
    pub fn value(&self, name: &str) -> f64 {
        self.get(name).unwrap_or(0.0)
    }

    pub fn is_set(&self, name: &str) -> bool {
        self.value(name) != 0.0
    }

    pub fn extend(&mut self, other: FeatureVector) {
        self.0.extend(other.0);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_and_missing_values() {
        let mut v = FeatureVector::new();
        v.insert_flag("on", true);
        v.insert_flag("off", false);
        v.insert("age", 70.0);

        assert!(v.is_set("on"));
        assert!(!v.is_set("off"));
        assert!(!v.is_set("missing"));
        assert_eq!(v.get("missing"), None);
        assert_eq!(v.value("age"), 70.0);
        assert_eq!(v.len(), 3);
    }

    #[test]
    fn test_iteration_is_name_ordered() {
        let mut v = FeatureVector::new();
        v.insert("b", 2.0);
        v.insert("a", 1.0);
        let names: Vec<_> = v.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["a", "b"]);
    }
}
