//
// Copyright (c) 2025 Nathan Fiedler
//

//! Non-destructive traversal of a bucket array.

use crate::BucketArray;
use crate::segment::Segment;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;
use std::ops::Sub;

///
/// Random-access position within a bucket array, in the range `0..=len()`.
///
/// A cursor is a plain `(array, index)` pair that can be copied freely,
/// moved forward or backward by any signed step, and compared with another
/// cursor of the same array by index.
///
pub struct Cursor<'a, T> {
    array: &'a BucketArray<T>,
    index: usize,
}

impl<'a, T> Cursor<'a, T> {
    pub(crate) fn new(array: &'a BucketArray<T>, index: usize) -> Self {
        Self { array, index }
    }

    /// Logical index of the cursor.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor by `step` elements, backward when negative.
    ///
    /// # Panics
    ///
    /// Panics if the cursor would move before the first element.
    pub fn advance(&mut self, step: isize) {
        match self.index.checked_add_signed(step) {
            Some(index) => self.index = index,
            None => panic!("cursor at {} cannot move by {}", self.index, step),
        }
    }

    /// Return a copy of this cursor moved by `step` elements.
    pub fn offset(mut self, step: isize) -> Self {
        self.advance(step);
        self
    }

    /// Signed number of elements from this cursor to `other`, computed as
    /// `other - self`.
    pub fn distance_to(&self, other: &Self) -> isize {
        other.index as isize - self.index as isize
    }

    /// Element under the cursor, or `None` at or past the end.
    pub fn get(&self) -> Option<&'a T> {
        self.array.get(self.index)
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T> PartialOrd for Cursor<'_, T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Cursor<'_, T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.index.cmp(&other.index)
    }
}

impl<'a, T> Sub for Cursor<'a, T> {
    type Output = isize;

    fn sub(self, rhs: Self) -> isize {
        rhs.distance_to(&self)
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor").field("index", &self.index).finish()
    }
}

/// Immutable bucket array iterator.
pub struct Iter<'a, T> {
    array: &'a BucketArray<T>,
    front: usize,
    back: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(array: &'a BucketArray<T>) -> Self {
        Self {
            array,
            front: 0,
            back: array.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            array: self.array,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        let value = self.array.get(self.front);
        self.front += 1;
        value
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.back - self.front;
        (remaining, Some(remaining))
    }

    fn nth(&mut self, n: usize) -> Option<Self::Item> {
        self.front = self.front.saturating_add(n).min(self.back);
        self.next()
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.front >= self.back {
            return None;
        }
        self.back -= 1;
        self.array.get(self.back)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Mutable bucket array iterator.
pub struct IterMut<'a, T> {
    segments: std::slice::IterMut<'a, Option<Segment<T>>>,
    current: std::slice::IterMut<'a, T>,
    remaining: usize,
}

impl<'a, T> IterMut<'a, T> {
    pub(crate) fn new(array: &'a mut BucketArray<T>) -> Self {
        Self {
            remaining: array.count,
            segments: array.segments.iter_mut(),
            current: Default::default(),
        }
    }
}

impl<'a, T> Iterator for IterMut<'a, T> {
    type Item = &'a mut T;

    fn next(&mut self) -> Option<Self::Item> {
        while self.remaining > 0 {
            if let Some(value) = self.current.next() {
                self.remaining -= 1;
                return Some(value);
            }
            match self.segments.next() {
                Some(Some(segment)) => self.current = segment.as_mut_slice().iter_mut(),
                _ => self.remaining = 0,
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for IterMut<'_, T> {}

impl<T> FusedIterator for IterMut<'_, T> {}
