use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Admissible values of one free variable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Domain {
    /// Contiguous range [0, max).
    UpTo(u32),
    /// Explicit enumeration, in declaration order.
    List(Vec<u32>),
}

impl Domain {
    pub fn values(&self) -> Vec<u32> {
        match self {
            Domain::UpTo(max) => (0..*max).collect(),
            Domain::List(vals) => vals.clone(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Domain::UpTo(max) => *max as usize,
            Domain::List(vals) => vals.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Variables declared by one register definition.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VarCatalog {
    vars: BTreeMap<String, Domain>,
}

impl VarCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, domain: Domain) {
        self.vars.insert(name.into(), domain);
    }

    pub fn resolve(&self, name: &str) -> Option<&Domain> {
        self.vars.get(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounded_domain_starts_at_zero() {
        assert_eq!(Domain::UpTo(4).values(), vec![0, 1, 2, 3]);
        assert_eq!(Domain::UpTo(0).values(), Vec::<u32>::new());
    }

    #[test]
    fn list_domain_keeps_declaration_order() {
        let d = Domain::List(vec![5, 1, 2]);
        assert_eq!(d.values(), vec![5, 1, 2]);
        assert_eq!(d.len(), 3);
    }

    #[test]
    fn catalog_resolves_by_name() {
        let mut cat = VarCatalog::new();
        cat.insert("n", Domain::UpTo(2));
        assert_eq!(cat.resolve("n"), Some(&Domain::UpTo(2)));
        assert!(cat.resolve("m").is_none());
    }
}
