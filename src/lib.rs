//! Containers built on square-root bucket decomposition.
//!
//! Elements are kept in a list of short `Vec` buckets. Finding the bucket
//! for a position walks the bucket list, and an insertion only shifts the
//! elements of one bucket, so positional access, insertion and removal all
//! cost O(√N) amortized. A bucket that outgrows
//! `bucket_count * split_ratio` is split in half; a bucket that empties is
//! dropped. Neighbouring buckets are never merged.
//!
//! * [`BucketList`]: a sequence with caller-chosen positions.
//! * [`SortedSet`]: distinct values in increasing order.
//! * [`SortedMultiset`]: values in non-decreasing order, equal values kept
//!   in insertion order.
//!
//! The sorted containers add value queries on top: membership, neighbours
//! (`lt`, `le`, `gt`, `ge`) and rank (`index`, `index_right`).
//!
//! Bucket sizing is process-wide per container kind, see [`Tuning`].
//!
//! ```
//! use bucketlist::{BucketList, SortedMultiset};
//!
//! let mut list: BucketList<_> = (1..=5).collect();
//! list.insert(0, 10)?;
//! assert_eq!(list, [10, 1, 2, 3, 4, 5]);
//!
//! let mut bag = SortedMultiset::from([3, 1, 3]);
//! bag.add(2);
//! assert_eq!(bag.to_string(), "{1, 2, 3, 3}");
//! assert_eq!(bag.index_right(&3), 4);
//! # Ok::<(), bucketlist::Error>(())
//! ```

mod config;
mod error;
mod iter;
mod list;
mod sorted;
mod store;

pub use config::{DEFAULT_BUCKET_RATIO, DEFAULT_SPLIT_RATIO, Ratios, Tuning, TuningGuard};
pub use error::{Error, Result};
pub use iter::{IntoIter, Iter};
pub use list::BucketList;
pub use sorted::{Multi, Placement, SortedBuckets, SortedMultiset, SortedSet, Unique};
