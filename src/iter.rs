use std::iter::{Flatten, FusedIterator};

/// Borrowing iterator over the elements of a bucket container, in order.
///
/// Double-ended, so `iter().rev()` walks the buckets back to front.
pub struct Iter<'a, T: 'a> {
    inner: Flatten<std::slice::Iter<'a, Vec<T>>>,
    remaining: usize,
}

/// Owning iterator returned by `into_iter` on a bucket container.
pub struct IntoIter<T> {
    inner: Flatten<std::vec::IntoIter<Vec<T>>>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(buckets: &'a [Vec<T>], len: usize) -> Self {
        Iter {
            inner: buckets.iter().flatten(),
            remaining: len,
        }
    }
}

impl<T> IntoIter<T> {
    pub(crate) fn new(buckets: Vec<Vec<T>>, len: usize) -> Self {
        IntoIter {
            inner: buckets.into_iter().flatten(),
            remaining: len,
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            inner: self.inner.clone(),
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.inner.next_back()?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let value = self.inner.next()?;
        self.remaining -= 1;
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let value = self.inner.next_back()?;
        self.remaining -= 1;
        Some(value)
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}
impl<T> FusedIterator for IntoIter<T> {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn meets_in_the_middle() {
        let buckets = vec![vec![1, 2], vec![3], vec![4, 5, 6]];
        let mut iter = Iter::new(&buckets, 6);
        assert_eq!(iter.len(), 6);
        assert_eq!(iter.next(), Some(&1));
        assert_eq!(iter.next_back(), Some(&6));
        assert_eq!(iter.next_back(), Some(&5));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.clone().collect::<Vec<_>>(), vec![&2, &3, &4]);
        assert_eq!(iter.rev().collect::<Vec<_>>(), vec![&4, &3, &2]);
    }

    #[rstest]
    fn owning() {
        let iter = IntoIter::new(vec![vec!['a'], vec!['b', 'c']], 3);
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.rev().collect::<String>(), "cba");
    }
}
