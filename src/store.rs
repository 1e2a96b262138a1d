use ftree::FenwickTree;
use std::fmt;

use crate::error::{Error, Result};
use crate::iter::{IntoIter, Iter};

/// Whether an index addresses an existing element or a gap between two.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Probe {
    /// `0..len`: the element at the index.
    Read,
    /// `0..=len`: the slot before the element at the index.
    Insert,
}

/// The bucket engine shared by every container.
///
/// Elements live in a list of non-empty buckets. `size` caches the total
/// element count and `lens` mirrors the bucket lengths as a Fenwick tree so
/// that the number of elements before any bucket is a prefix sum.
#[derive(Clone)]
pub(crate) struct BucketStore<T> {
    buckets: Vec<Vec<T>>,
    lens: FenwickTree<usize>,
    size: usize,
}

impl<T> BucketStore<T> {
    pub(crate) fn new() -> Self {
        BucketStore {
            buckets: Vec::new(),
            lens: FenwickTree::new(),
            size: 0,
        }
    }

    /// Cuts `values` into `ceil(sqrt(n / bucket_ratio))` near-equal buckets,
    /// keeping their order.
    pub(crate) fn from_vec(values: Vec<T>, bucket_ratio: usize) -> Self {
        let n = values.len();
        if n == 0 {
            return Self::new();
        }
        let num_bucket = ((n as f64 / bucket_ratio as f64).sqrt().ceil() as usize).clamp(1, n);

        let mut values = values.into_iter();
        let buckets: Vec<Vec<T>> = (0..num_bucket)
            .map(|i| {
                let take = n * (i + 1) / num_bucket - n * i / num_bucket;
                values.by_ref().take(take).collect()
            })
            .collect();
        tracing::trace!(len = n, buckets = num_bucket, "built buckets");

        let mut store = BucketStore {
            buckets,
            lens: FenwickTree::new(),
            size: n,
        };
        store.rebuild_lens();
        store
    }

    pub(crate) fn len(&self) -> usize {
        self.size
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn buckets(&self) -> &[Vec<T>] {
        &self.buckets
    }

    pub(crate) fn bucket(&self, bucket: usize) -> &[T] {
        &self.buckets[bucket]
    }

    /// Number of elements stored in the buckets before `bucket`.
    pub(crate) fn prefix_len(&self, bucket: usize) -> usize {
        if bucket == 0 {
            0
        } else {
            self.lens.prefix_sum(bucket, 0)
        }
    }

    fn rebuild_lens(&mut self) {
        let sizes = self.buckets.iter().map(Vec::len);
        self.lens = FenwickTree::from_iter(sizes);
    }

    // --- Locating ---

    /// Walks the buckets front to back.
    pub(crate) fn locate_forward(&self, mut index: usize, probe: Probe) -> Option<(usize, usize)> {
        for (b, bucket) in self.buckets.iter().enumerate() {
            let len = bucket.len();
            let fits = match probe {
                Probe::Read => index < len,
                Probe::Insert => index <= len,
            };
            if fits {
                return Some((b, index));
            }
            index -= len;
        }
        None
    }

    /// Walks the buckets back to front; `distance` is `1` for the last
    /// element. Costs O(distance) rather than O(len).
    pub(crate) fn locate_backward(&self, mut distance: usize) -> Option<(usize, usize)> {
        for (b, bucket) in self.buckets.iter().enumerate().rev() {
            let len = bucket.len();
            if distance <= len {
                return Some((b, len - distance));
            }
            distance -= len;
        }
        None
    }

    /// Resolves a possibly negative index to `(bucket, offset)`.
    pub(crate) fn locate(&self, index: isize, probe: Probe) -> Result<(usize, usize)> {
        let found = if index < 0 {
            self.locate_backward(index.unsigned_abs())
        } else {
            self.locate_forward(index as usize, probe)
        };
        found.ok_or(Error::IndexOutOfRange { index, len: self.size })
    }

    // --- Access ---

    pub(crate) fn get(&self, bucket: usize, offset: usize) -> &T {
        &self.buckets[bucket][offset]
    }

    pub(crate) fn get_mut(&mut self, bucket: usize, offset: usize) -> &mut T {
        &mut self.buckets[bucket][offset]
    }

    pub(crate) fn first(&self) -> Option<&T> {
        self.buckets.first().and_then(|bucket| bucket.first())
    }

    pub(crate) fn last(&self) -> Option<&T> {
        self.buckets.last().and_then(|bucket| bucket.last())
    }

    // --- Mutation ---

    /// Seeds an empty store with a single one-element bucket.
    pub(crate) fn push_first(&mut self, value: T) {
        debug_assert!(self.buckets.is_empty());
        self.buckets.push(vec![value]);
        self.size = 1;
        self.rebuild_lens();
    }

    /// Appends to the last bucket.
    pub(crate) fn push_back(&mut self, value: T, split_ratio: usize) {
        match self.buckets.len().checked_sub(1) {
            None => self.push_first(value),
            Some(last) => {
                let offset = self.buckets[last].len();
                self.insert_at(last, offset, value, split_ratio);
            }
        }
    }

    pub(crate) fn insert_at(&mut self, bucket: usize, offset: usize, value: T, split_ratio: usize) {
        let limit = self.buckets.len().saturating_mul(split_ratio);
        let sublist = &mut self.buckets[bucket];
        sublist.insert(offset, value);
        let len = sublist.len();
        self.size += 1;
        self.lens.add_at(bucket, 1);
        if len > limit {
            self.split(bucket);
        }
    }

    fn split(&mut self, bucket: usize) {
        let sublist = &mut self.buckets[bucket];
        let mid = sublist.len() >> 1;
        let upper = sublist.split_off(mid);
        tracing::trace!(
            bucket,
            lower = mid,
            upper = upper.len(),
            buckets = self.buckets.len() + 1,
            "split bucket"
        );
        self.buckets.insert(bucket + 1, upper);
        self.rebuild_lens();
    }

    /// Removes one element; a bucket left empty is dropped. Under-full
    /// neighbours are never merged.
    pub(crate) fn remove_at(&mut self, bucket: usize, offset: usize) -> T {
        let sublist = &mut self.buckets[bucket];
        let value = sublist.remove(offset);
        self.size -= 1;
        if sublist.is_empty() {
            self.buckets.remove(bucket);
            self.rebuild_lens();
            tracing::trace!(bucket, buckets = self.buckets.len(), "dropped empty bucket");
        } else {
            self.lens.sub_at(bucket, 1);
        }
        value
    }

    pub(crate) fn reverse(&mut self) {
        self.buckets.reverse();
        for bucket in &mut self.buckets {
            bucket.reverse();
        }
        self.rebuild_lens();
    }

    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    // --- Iteration & rendering ---

    pub(crate) fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.buckets, self.size)
    }

    pub(crate) fn into_iter(self) -> IntoIter<T> {
        IntoIter::new(self.buckets, self.size)
    }

    /// `open e1, e2, ... close`
    pub(crate) fn fmt_elements(&self, f: &mut fmt::Formatter<'_>, open: &str, close: &str) -> fmt::Result
    where
        T: fmt::Display,
    {
        f.write_str(open)?;
        for (i, value) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            fmt::Display::fmt(value, f)?;
        }
        f.write_str(close)
    }

    /// `Name[[bucket], [bucket], ...]`
    pub(crate) fn fmt_layout(&self, f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result
    where
        T: fmt::Debug,
    {
        f.write_str(name)?;
        f.debug_list().entries(self.buckets.iter()).finish()
    }

    /// Panics if the cached size, the length index or any bucket is off.
    pub(crate) fn validate(&self) {
        let mut total = 0;
        for (b, bucket) in self.buckets.iter().enumerate() {
            assert!(!bucket.is_empty(), "bucket {b} is empty");
            assert_eq!(self.prefix_len(b), total, "prefix length before bucket {b}");
            total += bucket.len();
        }
        assert_eq!(self.size, total, "cached size");
        assert_eq!(self.prefix_len(self.buckets.len()), total, "total of length index");
    }
}
