//! Field projections and rule synthesis
//!
//! An equivalence rule is a pair of shared function values: an equality
//! check and a 64-bit hash. Rules are either supplied directly or derived
//! from an ordered list of field projections.

use std::any::Any;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use ahash::AHasher;

/// Equality rule shared between a builder and its wrappers
pub type EqualsFn<T> = Arc<dyn Fn(&T, &T) -> bool + Send + Sync>;

/// Hash rule shared between a builder and its wrappers
pub type HashFn<T> = Arc<dyn Fn(&T) -> u64 + Send + Sync>;

/// Extractor producing one projection of an element
pub type KeyFn<T> = Arc<dyn Fn(&T) -> Box<dyn Key> + Send + Sync>;

/// Object-safe equality and hashing for field projections.
///
/// Projections from different extractors may have different concrete types,
/// so comparisons go through `Any`: two projections are equal only when they
/// have the same runtime type and equal values.
pub trait Key {
    /// Compare against another projection
    fn eq_key(&self, other: &dyn Key) -> bool;

    /// Feed this projection into a hasher
    fn hash_key(&self, state: &mut dyn Hasher);

    /// Upcast for runtime type comparison
    fn as_any(&self) -> &dyn Any;
}

impl<K: Eq + Hash + 'static> Key for K {
    fn eq_key(&self, other: &dyn Key) -> bool {
        other
            .as_any()
            .downcast_ref::<K>()
            .map_or(false, |other| self == other)
    }

    fn hash_key(&self, mut state: &mut dyn Hasher) {
        self.hash(&mut state);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Turn a plain projection closure into a shareable field extractor.
///
/// The projected value can be any `Eq + Hash` type; extractors over
/// different projection types can be mixed in one field list.
pub fn key<T, K, F>(f: F) -> KeyFn<T>
where
    T: 'static,
    F: Fn(&T) -> K + Send + Sync + 'static,
    K: Eq + Hash + 'static,
{
    Arc::new(move |value: &T| -> Box<dyn Key> { Box::new(f(value)) })
}

/// Derive an (equals, hash) rule pair from an ordered field list.
///
/// Equality holds when every projection matches in type and value; hashing
/// feeds every projection into a single hasher in list order. An empty list
/// yields a constant hash and an always-true equality, which collapses any
/// input to one representative.
pub(crate) fn rules_from_fields<T: 'static>(fields: Vec<KeyFn<T>>) -> (EqualsFn<T>, HashFn<T>) {
    let fields: Arc<[KeyFn<T>]> = fields.into();
    let eq_fields = Arc::clone(&fields);

    let equals: EqualsFn<T> = Arc::new(move |a: &T, b: &T| {
        if std::ptr::eq(a, b) {
            return true;
        }
        eq_fields.iter().all(|f| f(a).eq_key(f(b).as_ref()))
    });

    let hash: HashFn<T> = Arc::new(move |value: &T| {
        let mut hasher = AHasher::default();
        for f in fields.iter() {
            f(value).hash_key(&mut hasher);
        }
        hasher.finish()
    });

    (equals, hash)
}

/// Rule pair backed by the element type's own `Eq` and `Hash`.
pub(crate) fn native_rules<T: Eq + Hash + 'static>() -> (EqualsFn<T>, HashFn<T>) {
    let equals: EqualsFn<T> = Arc::new(|a: &T, b: &T| a == b);
    let hash: HashFn<T> = Arc::new(|value: &T| {
        let mut hasher = AHasher::default();
        value.hash(&mut hasher);
        hasher.finish()
    });
    (equals, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keys_of_equal_values_match() {
        assert!(1_i32.eq_key(&1_i32));
        assert!(!1_i32.eq_key(&2_i32));
    }

    #[test]
    fn test_keys_of_different_types_never_match() {
        assert!(!1_i32.eq_key(&1_u32));
        assert!(!String::from("1").eq_key(&1_i32));
    }

    #[test]
    fn test_derived_rule_compares_every_field() {
        let (equals, hash) = rules_from_fields::<(i32, i32)>(vec![
            key(|p: &(i32, i32)| p.0),
            key(|p: &(i32, i32)| p.1),
        ]);

        assert!(equals(&(1, 2), &(1, 2)));
        assert!(!equals(&(1, 2), &(1, 3)));
        assert!(!equals(&(1, 2), &(2, 2)));
        assert_eq!(hash(&(1, 2)), hash(&(1, 2)));
    }

    #[test]
    fn test_derived_hash_is_order_sensitive() {
        let (_, hash_fwd) = rules_from_fields::<(i32, i32)>(vec![
            key(|p: &(i32, i32)| p.0),
            key(|p: &(i32, i32)| p.1),
        ]);
        let (_, hash_rev) = rules_from_fields::<(i32, i32)>(vec![
            key(|p: &(i32, i32)| p.1),
            key(|p: &(i32, i32)| p.0),
        ]);

        assert_ne!(hash_fwd(&(1, 2)), hash_rev(&(1, 2)));
    }

    #[test]
    fn test_empty_field_list_is_constant() {
        let (equals, hash) = rules_from_fields::<(i32, i32)>(Vec::new());

        assert!(equals(&(1, 2), &(9, 9)));
        assert_eq!(hash(&(1, 2)), hash(&(9, 9)));
    }

    #[test]
    fn test_native_rule_follows_element_equality() {
        let (equals, hash) = native_rules::<(i32, i32)>();

        assert!(equals(&(1, 2), &(1, 2)));
        assert!(!equals(&(1, 2), &(1, 3)));
        assert_eq!(hash(&(1, 2)), hash(&(1, 2)));
    }
}
