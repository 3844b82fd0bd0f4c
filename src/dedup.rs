//! The deduplication builder and its terminal operations

use std::collections::HashSet;
use std::hash::Hash;
use std::sync::Arc;

use ahash::AHashSet;
use tracing::debug;

use crate::error::{Error, Result};
use crate::key::{native_rules, rules_from_fields, EqualsFn, HashFn, KeyFn};
use crate::wrap::Wrapped;

/// Statistics for one deduplication pass
#[derive(Debug, Clone, Default)]
pub struct DedupStats {
    /// Total number of elements seen
    pub total_seen: usize,
    /// Number of unique elements kept
    pub unique_count: usize,
    /// Number of duplicates dropped
    pub duplicates_found: usize,
}

impl DedupStats {
    /// Get the deduplication rate as a percentage
    pub fn dedup_rate(&self) -> f64 {
        if self.total_seen == 0 {
            0.0
        } else {
            (self.duplicates_found as f64 / self.total_seen as f64) * 100.0
        }
    }
}

/// Builder that deduplicates a collection under a configurable rule.
///
/// The source collection is taken by value and never mutated; terminal
/// operations produce a new container. The active rule is either an explicit
/// equals/hash pair ([`with_equals`](Deduplicator::with_equals) plus
/// [`with_hash`](Deduplicator::with_hash)) or one derived from a field list
/// ([`constraint_on`](Deduplicator::constraint_on)); installing one overwrites
/// the other. [`Deduplicator::new`] starts from the element type's own `Eq`
/// and `Hash`.
///
/// A single instance is not synchronized; reconfigure it before running a
/// terminal operation, not concurrently with one. Independent instances
/// share nothing and may live on independent threads.
pub struct Deduplicator<T> {
    source: Vec<T>,
    equals: Option<EqualsFn<T>>,
    hash: Option<HashFn<T>>,
}

impl<T> Deduplicator<T> {
    /// Create a builder over `source` with the native rule installed.
    pub fn new<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Eq + Hash + 'static,
    {
        let (equals, hash) = native_rules();
        Self {
            source: source.into_iter().collect(),
            equals: Some(equals),
            hash: Some(hash),
        }
    }

    /// Create a builder over `source` with no rule installed.
    ///
    /// Available for element types without `Eq` or `Hash`. A terminal
    /// operation fails with [`Error::MissingRule`] until both rules are
    /// configured.
    pub fn without_rules<I>(source: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        Self {
            source: source.into_iter().collect(),
            equals: None,
            hash: None,
        }
    }

    /// Override the equality rule, leaving the hash rule untouched.
    ///
    /// No consistency check is performed between the pair: a rule that is
    /// not reflexive, symmetric, transitive, and hash-consistent silently
    /// produces order-dependent results instead of failing.
    pub fn with_equals<E>(mut self, equals: E) -> Self
    where
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        self.equals = Some(Arc::new(equals));
        self
    }

    /// Override the hash rule, leaving the equality rule untouched.
    ///
    /// The same non-equivalence hazard as [`with_equals`](Self::with_equals)
    /// applies.
    pub fn with_hash<H>(mut self, hash: H) -> Self
    where
        H: Fn(&T) -> u64 + Send + Sync + 'static,
    {
        self.hash = Some(Arc::new(hash));
        self
    }

    /// Install both rules derived from an ordered field list, overwriting
    /// any previously configured equals or hash.
    ///
    /// Two elements are duplicates when every projection matches in type and
    /// value. An empty list collapses the whole input to one element.
    pub fn constraint_on(mut self, fields: Vec<KeyFn<T>>) -> Self
    where
        T: 'static,
    {
        let (equals, hash) = rules_from_fields(fields);
        self.equals = Some(equals);
        self.hash = Some(hash);
        self
    }

    /// Run the pass: wrap every element with the active rule, bucket through
    /// a hash set (first insert wins), and keep the survivors.
    fn evaluate(self) -> Result<(AHashSet<Wrapped<T>>, DedupStats)> {
        let equals = self.equals.ok_or(Error::MissingRule("equals"))?;
        let hash = self.hash.ok_or(Error::MissingRule("hash"))?;

        let mut stats = DedupStats::default();
        let mut seen: AHashSet<Wrapped<T>> = AHashSet::with_capacity(self.source.len());
        for value in self.source {
            stats.total_seen += 1;
            let wrapped = Wrapped::new(value, Arc::clone(&equals), Arc::clone(&hash));
            if seen.insert(wrapped) {
                stats.unique_count += 1;
            } else {
                stats.duplicates_found += 1;
            }
        }

        debug!(
            "deduplicated {} elements to {} unique ({} duplicates)",
            stats.total_seen, stats.unique_count, stats.duplicates_found
        );
        Ok((seen, stats))
    }

    /// Get the unique elements as an iterator, in unspecified order.
    ///
    /// The pass buckets through an intermediate hash set, so the source
    /// order does not survive. On a collision the first-inserted element is
    /// the one kept.
    pub fn into_unique(self) -> Result<impl Iterator<Item = T>> {
        let (seen, _) = self.evaluate()?;
        Ok(seen.into_iter().map(Wrapped::into_inner))
    }

    /// Get the unique elements as a vector, in unspecified order.
    pub fn into_vec(self) -> Result<Vec<T>> {
        Ok(self.into_unique()?.collect())
    }

    /// Get the unique elements together with the pass statistics.
    pub fn into_vec_with_stats(self) -> Result<(Vec<T>, DedupStats)> {
        let (seen, stats) = self.evaluate()?;
        let unique = seen.into_iter().map(Wrapped::into_inner).collect();
        Ok((unique, stats))
    }

    /// Get the unique elements as a native set.
    ///
    /// Inserting into the set re-applies the element type's OWN `Eq` and
    /// `Hash`, so the result can hold fewer elements than
    /// [`into_vec`](Self::into_vec): elements the custom rule kept apart are
    /// merged again whenever the native equality is coarser.
    pub fn into_set(self) -> Result<HashSet<T>>
    where
        T: Eq + Hash,
    {
        Ok(self.into_unique()?.collect())
    }
}
