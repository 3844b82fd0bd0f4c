//! Collection deduplication with caller-supplied equivalence rules
//!
//! This crate provides a builder for removing duplicates from an in-memory
//! collection using a custom equals/hash pair, or a list of field
//! projections, instead of the element type's own `Eq` and `Hash`. It avoids
//! having to write a wrapper type every time a collection should be unique
//! by some of its fields only.
//!
//! ```
//! use keydedup::{key, Deduplicator};
//!
//! let pairs = vec![(1, 2), (1, 2), (1, 3), (2, 2)];
//! let unique = Deduplicator::new(pairs)
//!     .constraint_on(vec![key(|p: &(i32, i32)| p.0)])
//!     .into_vec()?;
//! assert_eq!(unique.len(), 2);
//! # Ok::<(), keydedup::Error>(())
//! ```

pub mod dedup;
pub mod error;
pub mod key;
pub mod wrap;

pub use dedup::{DedupStats, Deduplicator};
pub use error::{Error, Result};
pub use key::{key, EqualsFn, HashFn, Key, KeyFn};
pub use wrap::Wrapped;
