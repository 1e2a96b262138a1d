use std::fmt;
use std::iter::Rev;

use crate::config::{Ratios, Tuning};
use crate::error::{Error, Result};
use crate::iter::{IntoIter, Iter};
use crate::store::{BucketStore, Probe};

static TUNING: Tuning = Tuning::new(Ratios::DEFAULT);

/// A sequence with O(√N) insertion and removal at any position.
///
/// Elements keep the positions the caller gives them; duplicates and any
/// order are allowed. Indices are `isize`: negative values count from the
/// end (`-1` is the last element) and are resolved by scanning the buckets
/// from the back, so touching the tail stays cheap however long the list is.
///
/// ```
/// use bucketlist::BucketList;
///
/// let mut list = BucketList::from(vec![1, 2, 3, 4, 5]);
/// list.insert(0, 10)?;
/// assert_eq!(list, [10, 1, 2, 3, 4, 5]);
/// assert_eq!(list.pop(-1)?, 5);
/// assert_eq!(list.to_string(), "[10, 1, 2, 3, 4]");
/// # Ok::<(), bucketlist::Error>(())
/// ```
#[derive(Clone)]
pub struct BucketList<T> {
    store: BucketStore<T>,
}

impl<T> BucketList<T> {
    pub fn new() -> Self {
        BucketList { store: BucketStore::new() }
    }

    /// Sizing shared by every `BucketList`, whatever its element type.
    pub fn tuning() -> &'static Tuning {
        &TUNING
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

    /// Elements from last to first.
    pub fn reversed(&self) -> Rev<Iter<'_, T>> {
        self.store.iter().rev()
    }

    pub fn first(&self) -> Option<&T> {
        self.store.first()
    }

    pub fn last(&self) -> Option<&T> {
        self.store.last()
    }

    /// Inserts `value` before position `index`; `index == len` appends.
    ///
    /// Accepts `-len..=len`. An empty list only accepts `0` and `-1`.
    pub fn insert(&mut self, index: isize, value: T) -> Result<()> {
        if self.store.is_empty() {
            if index != 0 && index != -1 {
                return Err(Error::IndexOutOfRange { index, len: 0 });
            }
            self.store.push_first(value);
            return Ok(());
        }
        let (bucket, offset) = self.store.locate(index, Probe::Insert)?;
        self.store.insert_at(bucket, offset, value, TUNING.split_ratio());
        Ok(())
    }

    /// Amortized O(1) unless the last bucket has to split.
    pub fn append(&mut self, value: T) {
        self.store.push_back(value, TUNING.split_ratio());
    }

    pub fn get(&self, index: isize) -> Result<&T> {
        let (bucket, offset) = self.store.locate(index, Probe::Read)?;
        Ok(self.store.get(bucket, offset))
    }

    pub fn get_mut(&mut self, index: isize) -> Result<&mut T> {
        let (bucket, offset) = self.store.locate(index, Probe::Read)?;
        Ok(self.store.get_mut(bucket, offset))
    }

    /// Removes and returns the element at `index`. O(-index) for negative
    /// indices.
    pub fn pop(&mut self, index: isize) -> Result<T> {
        let (bucket, offset) = self.store.locate(index, Probe::Read)?;
        Ok(self.store.remove_at(bucket, offset))
    }

    pub fn pop_last(&mut self) -> Option<T> {
        self.pop(-1).ok()
    }

    pub fn pop_first(&mut self) -> Option<T> {
        self.pop(0).ok()
    }

    /// Reverses in place without comparing any elements.
    pub fn reverse(&mut self) {
        self.store.reverse();
    }

    pub fn clear(&mut self) {
        self.store.clear();
    }

    /// Asserts the bucket invariants. Meant for tests and fuzzing.
    #[doc(hidden)]
    pub fn validate_buckets(&self) {
        self.store.validate();
    }
}

impl<T: PartialEq> BucketList<T> {
    /// O(N).
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|y| y == value)
    }

    /// O(N).
    pub fn count(&self, value: &T) -> usize {
        self.iter().filter(|&y| y == value).count()
    }

    /// Position of the first element equal to `value`. O(N).
    pub fn index(&self, value: &T) -> Result<usize> {
        self.iter().position(|y| y == value).ok_or(Error::ValueNotFound)
    }

    /// Removes the first element equal to `value`. O(N).
    pub fn remove(&mut self, value: &T) -> Result<()> {
        let index = self.index(value)?;
        let (bucket, offset) = self
            .store
            .locate_forward(index, Probe::Read)
            .ok_or(Error::ValueNotFound)?;
        self.store.remove_at(bucket, offset);
        Ok(())
    }
}

impl<T> Default for BucketList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for BucketList<T> {
    fn from(values: Vec<T>) -> Self {
        BucketList {
            store: BucketStore::from_vec(values, TUNING.bucket_ratio()),
        }
    }
}

impl<T, const N: usize> From<[T; N]> for BucketList<T> {
    fn from(values: [T; N]) -> Self {
        Self::from(Vec::from(values))
    }
}

impl<T> FromIterator<T> for BucketList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> Extend<T> for BucketList<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.append(value);
        }
    }
}

impl<T> IntoIterator for BucketList<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> IntoIter<T> {
        self.store.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a BucketList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: PartialEq> PartialEq for BucketList<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for BucketList<T> {}

impl<T: PartialEq<U>, U> PartialEq<[U]> for BucketList<T> {
    fn eq(&self, other: &[U]) -> bool {
        self.len() == other.len() && self.iter().zip(other).all(|(x, y)| x == y)
    }
}

impl<T: PartialEq<U>, U> PartialEq<Vec<U>> for BucketList<T> {
    fn eq(&self, other: &Vec<U>) -> bool {
        *self == other[..]
    }
}

impl<T: PartialEq<U>, U, const N: usize> PartialEq<[U; N]> for BucketList<T> {
    fn eq(&self, other: &[U; N]) -> bool {
        *self == other[..]
    }
}

impl<T: fmt::Display> fmt::Display for BucketList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt_elements(f, "[", "]")
    }
}

impl<T: fmt::Debug> fmt::Debug for BucketList<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.store.fmt_layout(f, "BucketList")
    }
}
