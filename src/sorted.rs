//! Value-ordered bucket containers.
//!
//! [`SortedSet`] and [`SortedMultiset`] are the same type,
//! [`SortedBuckets`], with a different [`Placement`]: the set looks up the
//! lower bound and refuses duplicates, the multiset inserts at the upper
//! bound so equal values stay in insertion order.
//!
//! Buckets stay sorted and every bucket's minimum is no smaller than the
//! previous bucket's maximum. A value is located by binary-searching the
//! bucket minima, then binary-searching inside the chosen bucket.

use std::fmt;
use std::iter::Rev;
use std::marker::PhantomData;

use crate::config::{Ratios, Tuning};
use crate::error::Result;
use crate::iter::{IntoIter, Iter};
use crate::store::{BucketStore, Probe};

static SET_TUNING: Tuning = Tuning::new(Ratios::DEFAULT);
static MULTISET_TUNING: Tuning = Tuning::new(Ratios::DEFAULT);

mod sealed {
    pub trait Sealed {}
    impl Sealed for super::Unique {}
    impl Sealed for super::Multi {}
}

/// Where a new value lands inside its bucket.
pub trait Placement: sealed::Sealed {
    const NAME: &'static str;

    fn tuning() -> &'static Tuning;

    /// Offset for `value` in the sorted `bucket`, or `None` to reject it.
    fn insertion_offset<T: Ord>(bucket: &[T], value: &T) -> Option<usize>;

    /// Puts bulk input into the order (and multiplicity) the container keeps.
    fn normalize<T: Ord>(values: &mut Vec<T>);
}

/// Distinct values; inserts at the lower bound.
#[derive(Debug)]
pub enum Unique {}

/// Repeated values; inserts at the upper bound.
#[derive(Debug)]
pub enum Multi {}

impl Placement for Unique {
    const NAME: &'static str = "SortedSet";

    fn tuning() -> &'static Tuning {
        &SET_TUNING
    }

    fn insertion_offset<T: Ord>(bucket: &[T], value: &T) -> Option<usize> {
        let offset = bucket.partition_point(|y| y < value);
        match bucket.get(offset) {
            Some(y) if y == value => None,
            _ => Some(offset),
        }
    }

    fn normalize<T: Ord>(values: &mut Vec<T>) {
        if !values.is_sorted() {
            values.sort_unstable();
        }
        values.dedup();
    }
}

impl Placement for Multi {
    const NAME: &'static str = "SortedMultiset";

    fn tuning() -> &'static Tuning {
        &MULTISET_TUNING
    }

    fn insertion_offset<T: Ord>(bucket: &[T], value: &T) -> Option<usize> {
        Some(bucket.partition_point(|y| y <= value))
    }

    fn normalize<T: Ord>(values: &mut Vec<T>) {
        if !values.is_sorted() {
            values.sort();
        }
    }
}

/// A sorted bucket container. Use it through [`SortedSet`] or
/// [`SortedMultiset`].
pub struct SortedBuckets<T, P> {
    store: BucketStore<T>,
    placement: PhantomData<fn() -> P>,
}

/// Sorted set with O(√N) add/discard. Membership is a binary search over
/// bucket minima and then within one bucket; rank adds an O(log B) prefix
/// sum over the B bucket lengths.
///
/// ```
/// use bucketlist::SortedSet;
///
/// let mut set = SortedSet::from(vec![50, 10, 40, 20, 30, 10]);
/// assert_eq!(set.to_string(), "{10, 20, 30, 40, 50}");
/// assert_eq!(set.lt(&35), Some(&30));
/// assert_eq!(set.ge(&35), Some(&40));
/// assert_eq!(set.lt(&10), None);
/// assert!(!set.add(20));
/// assert_eq!(set.index(&30), 2);
/// ```
pub type SortedSet<T> = SortedBuckets<T, Unique>;

/// Sorted multiset; equal values are kept together in insertion order.
///
/// ```
/// use bucketlist::SortedMultiset;
///
/// let set = SortedMultiset::from(vec![10, 20, 30, 30, 40, 50]);
/// assert_eq!(set.index(&30), 2);
/// assert_eq!(set.index_right(&30), 4);
/// assert_eq!(set.count(&30), 2);
/// ```
pub type SortedMultiset<T> = SortedBuckets<T, Multi>;

impl<T, P: Placement> SortedBuckets<T, P> {
    pub fn new() -> Self {
        SortedBuckets {
            store: BucketStore::new(),
            placement: PhantomData,
        }
    }

    /// Sizing shared by every container with this placement.
    pub fn tuning() -> &'static Tuning {
        P::tuning()
    }

    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    pub fn bucket_count(&self) -> usize {
        self.store.bucket_count()
    }

    pub fn iter(&self) -> Iter<'_, T> {
        self.store.iter()
    }

    /// Elements from largest to smallest.
    pub fn reversed(&self) -> Rev<Iter<'_, T>> {
        self.store.iter().rev()
    }

    pub fn first(&self) -> Option<&T> {
        self.store.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.store.last()
    }

    /// The element of rank `index`; negative indices count from the largest.
    pub fn get(&self, index: isize) -> Result<&T> {
        let (bucket, offset) = self.store.locate(index, Probe::Read)?;
        Ok(self.store.get(bucket, offset))
    }

    /// Removes and returns the element of rank `index`.
    pub fn pop(&mut self, index: isize) -> Result<T> {
        let (bucket, offset) = self.store.locate(index, Probe::Read)?;
        Ok(self.store.remove_at(bucket, offset))
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.pop(0).ok()
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.pop(-1).ok()
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }
}

impl<T: Ord, P: Placement> SortedBuckets<T, P> {
    // --- Locating ---

    /// Last bucket whose minimum satisfies `pred`, or the first bucket.
    fn bucket_where(&self, mut pred: impl FnMut(&T) -> bool) -> usize {
        self.store
            .buckets()
            .partition_point(|bucket| pred(&bucket[0]))
            .saturating_sub(1)
    }

    /// Steps past the end of a bucket onto the head of the next one.
    fn normalize_position(&self, bucket: usize, offset: usize) -> (usize, usize) {
        if offset == self.store.bucket(bucket).len() && bucket + 1 < self.store.bucket_count() {
            (bucket + 1, 0)
        } else {
            (bucket, offset)
        }
    }

    /// Position of the first element `>= value`. The store must not be empty.
    fn lower_bound(&self, value: &T) -> (usize, usize) {
        let bucket = self.bucket_where(|min| min < value);
        let offset = self.store.bucket(bucket).partition_point(|y| y < value);
        self.normalize_position(bucket, offset)
    }

    /// Position of the first element `> value`. The store must not be empty.
    fn upper_bound(&self, value: &T) -> (usize, usize) {
        let bucket = self.bucket_where(|min| min <= value);
        let offset = self.store.bucket(bucket).partition_point(|y| y <= value);
        self.normalize_position(bucket, offset)
    }

    fn at(&self, (bucket, offset): (usize, usize)) -> Option<&T> {
        self.store.bucket(bucket).get(offset)
    }

    fn before(&self, (bucket, offset): (usize, usize)) -> Option<&T> {
        if offset > 0 {
            Some(&self.store.bucket(bucket)[offset - 1])
        } else if bucket > 0 {
            self.store.bucket(bucket - 1).last()
        } else {
            None
        }
    }

    fn rank(&self, (bucket, offset): (usize, usize)) -> usize {
        self.store.prefix_len(bucket) + offset
    }

    // --- Public API ---

    /// Inserts `value`. A set returns `false` and keeps its contents when an
    /// equal value is already present; a multiset always returns `true`.
    pub fn add(&mut self, value: T) -> bool {
        if self.store.is_empty() {
            self.store.push_first(value);
            return true;
        }
        let bucket = self.bucket_where(|min| min <= &value);
        let Some(offset) = P::insertion_offset(self.store.bucket(bucket), &value) else {
            return false;
        };
        self.store.insert_at(bucket, offset, value, P::tuning().split_ratio());
        true
    }

    /// Removes one element equal to `value`, reporting whether there was one.
    pub fn discard(&mut self, value: &T) -> bool {
        if self.store.is_empty() {
            return false;
        }
        let (bucket, offset) = self.lower_bound(value);
        if self.store.bucket(bucket).get(offset) != Some(value) {
            return false;
        }
        self.store.remove_at(bucket, offset);
        true
    }

    pub fn contains(&self, value: &T) -> bool {
        self.ge(value) == Some(value)
    }

    /// Largest element `< value`.
    pub fn lt(&self, value: &T) -> Option<&T> {
        if self.store.is_empty() {
            return None;
        }
        self.before(self.lower_bound(value))
    }

    /// Largest element `<= value`.
    pub fn le(&self, value: &T) -> Option<&T> {
        if self.store.is_empty() {
            return None;
        }
        self.before(self.upper_bound(value))
    }

    /// Smallest element `> value`.
    pub fn gt(&self, value: &T) -> Option<&T> {
        if self.store.is_empty() {
            return None;
        }
        self.at(self.upper_bound(value))
    }

    /// Smallest element `>= value`.
    pub fn ge(&self, value: &T) -> Option<&T> {
        if self.store.is_empty() {
            return None;
        }
        self.at(self.lower_bound(value))
    }

    /// Number of elements `< value`.
    pub fn index(&self, value: &T) -> usize {
        if self.store.is_empty() {
            return 0;
        }
        self.rank(self.lower_bound(value))
    }

    /// Number of elements `<= value`.
    pub fn index_right(&self, value: &T) -> usize {
        if self.store.is_empty() {
            return 0;
        }
        self.rank(self.upper_bound(value))
    }

    pub fn count(&self, value: &T) -> usize {
        self.index_right(value) - self.index(value)
    }

    /// Asserts the bucket invariants and the ordering between and inside
    /// buckets. Meant for tests and fuzzing.
    #[doc(hidden)]
    pub fn validate_buckets(&self) {
        self.store.validate();
        let mut values = self.iter();
        if let Some(mut prev) = values.next() {
            for value in values {
                match P::insertion_offset(std::slice::from_ref(prev), value) {
                    Some(1) => {}
                    _ => panic!("{} out of order", P::NAME),
                }
                prev = value;
            }
        }
    }
}

impl<T, P: Placement> Clone for SortedBuckets<T, P>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        SortedBuckets {
            store: self.store.clone(),
            placement: PhantomData,
        }
    }
}

impl<T, P: Placement> Default for SortedBuckets<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord, P: Placement> From<Vec<T>> for SortedBuckets<T, P> {
    fn from(mut values: Vec<T>) -> Self {
        P::normalize(&mut values);
        SortedBuckets {
            store: BucketStore::from_vec(values, P::tuning().bucket_ratio()),
            placement: PhantomData,
        }
    }
}

impl<T: Ord, P: Placement, const N: usize> From<[T; N]> for SortedBuckets<T, P> {
    fn from(values: [T; N]) -> Self {
        Self::from(Vec::from(values))
    }
}

impl<T: Ord, P: Placement> FromIterator<T> for SortedBuckets<T, P> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T: Ord, P: Placement> Extend<T> for SortedBuckets<T, P> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.add(value);
        }
    }
}

impl<T, P: Placement> IntoIterator for SortedBuckets<T, P> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.store.into_iter()
    }
}

impl<'a, T, P: Placement> IntoIterator for &'a SortedBuckets<T, P> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: PartialEq, P: Placement> PartialEq for SortedBuckets<T, P> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq, P: Placement> Eq for SortedBuckets<T, P> {}

impl<T: PartialEq<U>, U, P: Placement> PartialEq<[U]> for SortedBuckets<T, P> {
    fn eq(&self, other: &[U]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(x, y)| x == y)
    }
}

impl<T: PartialEq<U>, U, P: Placement> PartialEq<Vec<U>> for SortedBuckets<T, P> {
    fn eq(&self, other: &Vec<U>) -> bool {
        *self == other[..]
    }
}

impl<T: PartialEq<U>, U, P: Placement, const N: usize> PartialEq<[U; N]> for SortedBuckets<T, P> {
    fn eq(&self, other: &[U; N]) -> bool {
        *self == other[..]
    }
}

impl<T: fmt::Display, P: Placement> fmt::Display for SortedBuckets<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt_elements(f, "{", "}")
    }
}

impl<T: fmt::Debug, P: Placement> fmt::Debug for SortedBuckets<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt_layout(f, P::NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rstest::rstest;

    fn set(values: &[i32]) -> SortedSet<i32> {
        SortedSet::from(values.to_vec())
    }

    fn multiset(values: &[i32]) -> SortedMultiset<i32> {
        SortedMultiset::from(values.to_vec())
    }

    /// Buckets `[10, 20] [30, 30] [30, 40]`, so runs of equal values and
    /// probes cross bucket boundaries.
    fn straddling() -> SortedMultiset<i32> {
        SortedMultiset {
            store: BucketStore::from_vec(vec![10, 20, 30, 30, 30, 40], 1),
            placement: PhantomData,
        }
    }

    #[rstest]
    fn set_construction() {
        assert_eq!(set(&[1, 4, 3, 2, 5]), [1, 2, 3, 4, 5]);
        assert_eq!(set(&[1, 1, 2, 2, 3, 3]), [1, 2, 3]);
        assert_eq!(set(&[5, 4, 3, 2, 1]), [1, 2, 3, 4, 5]);
        assert!(SortedSet::<i32>::new().is_empty());
    }

    #[rstest]
    fn multiset_construction() {
        assert_eq!(multiset(&[1, 4, 3, 2, 5]), [1, 2, 3, 4, 5]);
        assert_eq!(multiset(&[3, 1, 2, 1, 3, 2]), [1, 1, 2, 2, 3, 3]);
    }

    #[rstest]
    fn iteration_both_ways() {
        let values = multiset(&[1, 2, 2, 3, 4, 5]);
        assert_eq!(values.iter().copied().collect::<Vec<_>>(), vec![1, 2, 2, 3, 4, 5]);
        assert_eq!(values.reversed().copied().collect::<Vec<_>>(), vec![5, 4, 3, 2, 2, 1]);
    }

    #[rstest]
    fn equality() {
        assert_eq!(set(&[1, 2, 3]), set(&[3, 2, 1]));
        assert_ne!(set(&[1, 2, 3]), set(&[1, 2, 4]));
        assert_ne!(multiset(&[1, 2, 3]), multiset(&[1, 2, 2, 3]));
        assert_eq!(set(&[1, 2, 3]), vec![1, 2, 3]);
    }

    #[rstest]
    fn rendering() {
        assert_eq!(set(&[1, 2, 3]).to_string(), "{1, 2, 3}");
        assert_eq!(set(&[]).to_string(), "{}");
        assert_eq!(multiset(&[1, 2, 2]).to_string(), "{1, 2, 2}");
        assert_eq!(format!("{:?}", set(&[2, 1])), "SortedSet[[1, 2]]");
        assert_eq!(format!("{:?}", straddling()), "SortedMultiset[[10, 20], [30, 30], [30, 40]]");
    }

    #[rstest]
    fn set_add() {
        let mut values = SortedSet::new();
        assert!(values.add(1));
        assert!(values.add(3));
        assert!(values.add(2));
        assert!(!values.add(2));
        assert_eq!(values, [1, 2, 3]);
        values.validate_buckets();
    }

    #[rstest]
    fn multiset_add_keeps_equal_values_stable() {
        #[derive(Debug)]
        struct Tagged(i32, char);
        impl PartialEq for Tagged {
            fn eq(&self, other: &Self) -> bool {
                self.0 == other.0
            }
        }
        impl Eq for Tagged {}
        impl PartialOrd for Tagged {
            fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
                Some(self.cmp(other))
            }
        }
        impl Ord for Tagged {
            fn cmp(&self, other: &Self) -> std::cmp::Ordering {
                self.0.cmp(&other.0)
            }
        }

        let mut values = SortedMultiset::new();
        for (key, tag) in [(2, 'a'), (1, 'b'), (2, 'c'), (3, 'd'), (2, 'e')] {
            assert!(values.add(Tagged(key, tag)));
        }
        let tags: String = values.iter().map(|t| t.1).collect();
        assert_eq!(tags, "baced");
    }

    #[rstest]
    fn set_discard() {
        let mut values = set(&[1, 2, 3, 4, 5]);
        assert!(values.discard(&3));
        assert!(!values.discard(&3));
        assert!(values.discard(&1));
        assert!(values.discard(&5));
        assert_eq!(values, [2, 4]);
        assert!(!SortedSet::new().discard(&1));
    }

    #[rstest]
    fn multiset_discard_one_at_a_time() {
        let mut values = multiset(&[1, 2, 2, 3, 4, 5]);
        assert!(values.discard(&2));
        assert_eq!(values, [1, 2, 3, 4, 5]);
        assert!(values.discard(&2));
        assert!(!values.discard(&2));
        assert_eq!(values, [1, 3, 4, 5]);
    }

    #[rstest]
    fn discard_at_bucket_head() {
        let mut values = straddling();
        assert!(values.discard(&30));
        assert!(values.discard(&30));
        assert!(values.discard(&30));
        assert!(!values.discard(&30));
        assert_eq!(values, [10, 20, 40]);
        values.validate_buckets();
    }

    #[rstest]
    #[case(&[1, 3, 5, 7, 10, 20, 30], 1, true)]
    #[case(&[1, 3, 5, 7, 10, 20, 30], 2, false)]
    #[case(&[1, 3, 5, 7, 10, 20, 30], 0, false)]
    #[case(&[1, 3, 5, 7, 10, 20, 30], 30, true)]
    #[case(&[1, 3, 5, 7, 10, 20, 30], 31, false)]
    #[case(&[], 1, false)]
    fn contains(#[case] values: &[i32], #[case] probe: i32, #[case] expected: bool) {
        assert_eq!(set(values).contains(&probe), expected);
        assert_eq!(multiset(values).contains(&probe), expected);
    }

    #[rstest]
    #[case(30, Some(20), Some(30), Some(40), Some(30))]
    #[case(35, Some(30), Some(30), Some(40), Some(40))]
    #[case(10, None, Some(10), Some(20), Some(10))]
    #[case(50, Some(40), Some(50), None, Some(50))]
    #[case(5, None, None, Some(10), Some(10))]
    #[case(55, Some(50), Some(50), None, None)]
    fn neighbours(
        #[case] probe: i32,
        #[case] lt: Option<i32>,
        #[case] le: Option<i32>,
        #[case] gt: Option<i32>,
        #[case] ge: Option<i32>,
    ) {
        let values = set(&[10, 20, 30, 40, 50]);
        assert_eq!(values.lt(&probe).copied(), lt);
        assert_eq!(values.le(&probe).copied(), le);
        assert_eq!(values.gt(&probe).copied(), gt);
        assert_eq!(values.ge(&probe).copied(), ge);
    }

    #[rstest]
    #[case(30, Some(20), Some(30), Some(40), Some(30))]
    #[case(25, Some(20), Some(20), Some(30), Some(30))]
    #[case(20, Some(10), Some(20), Some(30), Some(20))]
    #[case(40, Some(30), Some(40), None, Some(40))]
    fn neighbours_across_buckets(
        #[case] probe: i32,
        #[case] lt: Option<i32>,
        #[case] le: Option<i32>,
        #[case] gt: Option<i32>,
        #[case] ge: Option<i32>,
    ) {
        let values = straddling();
        assert_eq!(values.lt(&probe).copied(), lt);
        assert_eq!(values.le(&probe).copied(), le);
        assert_eq!(values.gt(&probe).copied(), gt);
        assert_eq!(values.ge(&probe).copied(), ge);
    }

    #[rstest]
    fn empty_queries() {
        let values = SortedSet::<i32>::new();
        assert_eq!(values.lt(&10), None);
        assert_eq!(values.le(&10), None);
        assert_eq!(values.gt(&10), None);
        assert_eq!(values.ge(&10), None);
        assert_eq!(values.index(&10), 0);
        assert_eq!(values.index_right(&10), 0);
        assert_eq!(values.get(0), Err(Error::IndexOutOfRange { index: 0, len: 0 }));
    }

    #[rstest]
    #[case(30, 2, 3)]
    #[case(35, 3, 3)]
    #[case(5, 0, 0)]
    #[case(55, 5, 5)]
    fn set_rank(#[case] probe: i32, #[case] index: usize, #[case] index_right: usize) {
        let values = set(&[10, 20, 30, 40, 50]);
        assert_eq!(values.index(&probe), index);
        assert_eq!(values.index_right(&probe), index_right);
    }

    #[rstest]
    #[case(10, 0, 1)]
    #[case(25, 2, 2)]
    #[case(30, 2, 5)]
    #[case(40, 5, 6)]
    #[case(45, 6, 6)]
    fn multiset_rank_across_buckets(#[case] probe: i32, #[case] index: usize, #[case] index_right: usize) {
        let values = straddling();
        assert_eq!(values.index(&probe), index);
        assert_eq!(values.index_right(&probe), index_right);
        assert_eq!(values.count(&probe), index_right - index);
    }

    #[rstest]
    fn multiset_count() {
        let values = multiset(&[1, 2, 2, 2, 3, 3]);
        assert_eq!(values.count(&1), 1);
        assert_eq!(values.count(&2), 3);
        assert_eq!(values.count(&3), 2);
        assert_eq!(values.count(&4), 0);
        assert_eq!(SortedMultiset::new().count(&1), 0);
    }

    #[rstest]
    fn positional() {
        let mut values = multiset(&[10, 20, 30, 30, 40, 50]);
        assert_eq!(values.get(3), Ok(&30));
        assert_eq!(values.get(-6), Ok(&10));
        assert!(values.get(6).is_err());
        assert!(values.get(-7).is_err());
        assert_eq!(values.pop(2), Ok(30));
        assert_eq!(values.pop_last(), Some(50));
        assert_eq!(values.pop(0), Ok(10));
        assert_eq!(values, [20, 30, 40]);
        assert!(values.pop(3).is_err());
        assert!(values.pop(-4).is_err());
        assert_eq!(values.first(), Some(&20));
        assert_eq!(values.last(), Some(&40));
        assert_eq!(values.pop_first(), Some(20));
    }

    #[rstest]
    fn extend_and_clone() {
        let mut values = set(&[3, 1]);
        let copy = values.clone();
        values.extend([2, 3, 4]);
        assert_eq!(values, [1, 2, 3, 4]);
        assert_eq!(copy, [1, 3]);
        values.clear();
        assert_eq!(values.bucket_count(), 0);
    }
}
