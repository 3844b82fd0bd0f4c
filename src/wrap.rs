//! Wrappers that carry an equivalence rule into a hash set

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use crate::key::{rules_from_fields, EqualsFn, HashFn, KeyFn};

/// One element paired with an equivalence rule.
///
/// `Wrapped` implements `Eq` and `Hash` by delegating to the rule instead of
/// the element type, so it can be inserted into any hash-based set to get
/// membership tests under the custom rule. The deduplication builder creates
/// these internally during a terminal operation; the [`Wrapped::with_rules`]
/// and [`Wrapped::on_fields`] constructors build one directly for use in a
/// caller-owned set.
///
/// Equality invokes the rule with the subject wrapper's element as the first
/// argument. The rule is not required to be symmetric; an asymmetric rule
/// gives order-dependent membership results.
pub struct Wrapped<T> {
    value: T,
    equals: EqualsFn<T>,
    hash: HashFn<T>,
}

impl<T> Wrapped<T> {
    pub(crate) fn new(value: T, equals: EqualsFn<T>, hash: HashFn<T>) -> Self {
        Self {
            value,
            equals,
            hash,
        }
    }

    /// Wrap one element with an explicit equals/hash pair.
    ///
    /// No consistency check is performed between the two functions; a hash
    /// that disagrees with equality gives the usual broken-bucket behavior
    /// of any hash map keyed by an inconsistent type.
    pub fn with_rules<E, H>(value: T, equals: E, hash: H) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
        H: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        Self::new(value, Arc::new(equals), Arc::new(hash))
    }

    /// Wrap one element with a rule derived from a field list.
    pub fn on_fields(value: T, fields: Vec<KeyFn<T>>) -> Self
    where
        T: 'static,
    {
        let (equals, hash) = rules_from_fields(fields);
        Self::new(value, equals, hash)
    }

    /// Borrow the underlying element
    pub fn get(&self) -> &T {
        &self.value
    }

    /// Unwrap into the underlying element
    pub fn into_inner(self) -> T {
        self.value
    }
}

impl<T> PartialEq for Wrapped<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.equals)(&self.value, &other.value)
    }
}

impl<T> Eq for Wrapped<T> {}

impl<T> Hash for Wrapped<T> {
    fn hash<S: Hasher>(&self, state: &mut S) {
        state.write_u64((self.hash)(&self.value));
    }
}

impl<T: fmt::Debug> fmt::Debug for Wrapped<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Wrapped").field(&self.value).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::key;
    use std::collections::HashSet;

    #[derive(Debug, Clone, PartialEq, Eq, Hash)]
    struct Record {
        field1: i32,
        field2: i32,
    }

    fn records() -> Vec<Record> {
        vec![
            Record { field1: 1, field2: 2 },
            Record { field1: 1, field2: 2 },
            Record { field1: 1, field2: 3 },
            Record { field1: 2, field2: 2 },
        ]
    }

    #[test]
    fn test_wrapped_with_rules_in_native_set() {
        let set: HashSet<Wrapped<Record>> = records()
            .into_iter()
            .map(|r| {
                Wrapped::with_rules(
                    r,
                    |a: &Record, b: &Record| a.field1 == b.field1,
                    |r: &Record| r.field1 as u64,
                )
            })
            .collect();

        assert_eq!(set.len(), 2);
        let mut field1: Vec<i32> = set.iter().map(|w| w.get().field1).collect();
        field1.sort_unstable();
        assert_eq!(field1, vec![1, 2]);
    }

    #[test]
    fn test_wrapped_on_all_fields() {
        let set: HashSet<Wrapped<Record>> = records()
            .into_iter()
            .map(|r| {
                Wrapped::on_fields(
                    r,
                    vec![key(|x: &Record| x.field1), key(|x: &Record| x.field2)],
                )
            })
            .collect();

        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_wrapped_on_one_field() {
        let set: HashSet<Wrapped<Record>> = records()
            .into_iter()
            .map(|r| Wrapped::on_fields(r, vec![key(|x: &Record| x.field2)]))
            .collect();

        assert_eq!(set.len(), 2);
        let mut field2: Vec<i32> = set.iter().map(|w| w.get().field2).collect();
        field2.sort_unstable();
        assert_eq!(field2, vec![2, 3]);
    }

    #[test]
    fn test_wrapped_exposes_element() {
        let wrapped = Wrapped::on_fields(
            Record { field1: 7, field2: 9 },
            vec![key(|x: &Record| x.field1)],
        );

        assert_eq!(wrapped.get().field2, 9);
        let record = wrapped.into_inner();
        assert_eq!(record.field1, 7);
    }
}
