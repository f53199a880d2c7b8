//
// Copyright (c) 2025 Nathan Fiedler
//

//! A growable array built from a list of fixed-size segments ("buckets"),
//! meant for very large, build-once-then-consume collections such as the
//! intermediate edge and node lists of a graph build.
//!
//! Two properties set it apart from `Vec`:
//!
//! * Growth never reallocates or copies. A full array gains one more segment,
//!   so the memory peak of a doubling copy never happens and references to
//!   existing elements are never invalidated by an append.
//! * A consuming drain, [`BucketArray::into_draining_iter()`], releases each
//!   segment as soon as the traversal moves past it, bounding the resident
//!   memory of a single pass that moves elements into some final structure.
//!
//! Every segment holds the same number of elements. By default that number is
//! chosen so one segment occupies [`DEFAULT_SEGMENT_BYTES`] (8 MiB).
//!
//! # Default-filled segments
//!
//! Segments are allocated as whole blocks of `T::default()` values. Appending
//! and "in-place" construction are therefore assignments over a default
//! value, which is why every growth operation requires `T: Default`.
//!
//! # Indexing
//!
//! The `Index` implementation only checks that the segment for an index has
//! been allocated. It does not compare the index with [`BucketArray::len()`],
//! so an index in `len()..capacity()` yields a default-valued slot rather than
//! a panic. Use [`BucketArray::get()`] for an access checked against the
//! length.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Index, IndexMut};
use tracing::{debug, trace};

mod drain;
mod error;
mod iter;
mod segment;
mod sort;

pub use drain::DrainIter;
pub use error::{BucketError, BucketResult};
pub use iter::{Cursor, Iter, IterMut};

use error::or_escalate;
use segment::Segment;
use sort::IndexedAccess;

/// Byte budget of a single segment when no segment length is given.
pub const DEFAULT_SEGMENT_BYTES: usize = 8 * 1024 * 1024;

/// Number of elements of type `T` that fit into `bytes`, never less than one.
pub const fn segment_len_for_bytes<T>(bytes: usize) -> usize {
    let size = if std::mem::size_of::<T>() == 0 {
        1
    } else {
        std::mem::size_of::<T>()
    };
    let len = bytes / size;
    if len == 0 { 1 } else { len }
}

///
/// Growable array that stores its elements in a list of equally sized
/// segments, allocating one more segment whenever it runs out of room.
///
/// The type is deliberately not `Clone`; use [`BucketArray::swap()`] or a
/// plain move to hand the contents elsewhere.
///
pub struct BucketArray<T> {
    count: usize,
    segment_len: usize,
    // a `None` slot is a segment released by the draining iterator
    segments: Vec<Option<Segment<T>>>,
}

impl<T: Default> BucketArray<T> {
    /// Return an empty array holding one pre-allocated segment sized by
    /// [`DEFAULT_SEGMENT_BYTES`].
    ///
    /// # Panics
    ///
    /// Aborts through `handle_alloc_error` if the first segment cannot be
    /// allocated.
    pub fn new() -> Self {
        Self::with_segment_len(segment_len_for_bytes::<T>(DEFAULT_SEGMENT_BYTES))
    }

    /// Return an empty array whose segments each hold `segment_len` elements.
    ///
    /// # Panics
    ///
    /// Panics if `segment_len` is zero or a segment would exceed `isize::MAX`
    /// bytes.
    pub fn with_segment_len(segment_len: usize) -> Self {
        or_escalate(Self::try_with_segment_len(segment_len))
    }

    /// Return an empty array whose segments each occupy at most `bytes` bytes
    /// (but always hold at least one element).
    pub fn with_segment_bytes(bytes: usize) -> Self {
        Self::with_segment_len(segment_len_for_bytes::<T>(bytes))
    }

    /// Fallible form of [`BucketArray::with_segment_len()`].
    pub fn try_with_segment_len(segment_len: usize) -> BucketResult<Self> {
        if segment_len == 0 {
            return Err(BucketError::ZeroSegmentLength);
        }
        let mut array = Self {
            count: 0,
            segment_len,
            segments: Vec::new(),
        };
        array.grow()?;
        Ok(array)
    }

    /// Appends an element to the back of the array.
    ///
    /// # Panics
    ///
    /// Aborts through `handle_alloc_error` if a new segment is needed and
    /// cannot be allocated.
    ///
    /// # Time complexity
    ///
    /// Amortized constant time.
    pub fn push(&mut self, value: T) {
        or_escalate(self.try_push(value))
    }

    /// Appends an element, reporting allocation failure instead of aborting.
    pub fn try_push(&mut self, value: T) -> BucketResult<()> {
        self.try_emplace_with(|| value).map(|_| ())
    }

    /// Builds an element from `value` and assigns it over the default value
    /// held by the next free slot, returning a reference to it.
    pub fn emplace<A: Into<T>>(&mut self, value: A) -> &mut T {
        or_escalate(self.try_emplace_with(|| value.into()))
    }

    /// Like [`BucketArray::emplace()`] but builds the element with `f`, which
    /// runs after any needed segment has been allocated.
    pub fn emplace_with<F: FnOnce() -> T>(&mut self, f: F) -> &mut T {
        or_escalate(self.try_emplace_with(f))
    }

    /// Fallible form of [`BucketArray::emplace_with()`].
    pub fn try_emplace_with<F: FnOnce() -> T>(&mut self, f: F) -> BucketResult<&mut T> {
        if self.count == self.capacity() {
            self.grow()?;
        }
        let index = self.count;
        let capacity = self.capacity();
        let (segment, offset) = self.locate(index);
        let Some(Some(block)) = self.segments.get_mut(segment) else {
            return Err(BucketError::OutOfRange { index, capacity });
        };
        let slot = &mut block.as_mut_slice()[offset];
        *slot = f();
        self.count += 1;
        Ok(slot)
    }

    /// Removes the last element and returns it, or `None` if the array is
    /// empty. The vacated slot is reset to its default value; no segment is
    /// released.
    pub fn pop(&mut self) -> Option<T> {
        if self.count == 0 {
            return None;
        }
        let index = self.count - 1;
        let slot = self.at_mut(index).ok()?;
        let value = std::mem::take(slot);
        self.count = index;
        Some(value)
    }

    /// Set the length of the array to `new_len`.
    ///
    /// Growing appends whole default-filled segments until the capacity
    /// covers `new_len`; the new elements all hold `T::default()`.
    ///
    /// Shrinking keeps the first `new_len` elements intact. Segments past
    /// the one holding index `new_len` are released, and the truncated slots
    /// of that segment are reset to their default value.
    ///
    /// # Panics
    ///
    /// Aborts through `handle_alloc_error` if a segment cannot be allocated.
    pub fn resize(&mut self, new_len: usize) {
        or_escalate(self.try_resize(new_len))
    }

    /// Fallible form of [`BucketArray::resize()`]. On failure the length is
    /// unchanged, although some segments may already have been added.
    pub fn try_resize(&mut self, new_len: usize) -> BucketResult<()> {
        if new_len >= self.count {
            while self.capacity() < new_len {
                self.grow()?;
            }
        } else {
            let keep = 1 + new_len / self.segment_len;
            let released = self.segments.len().saturating_sub(keep);
            self.segments.truncate(keep);
            let (segment, offset) = self.locate(new_len);
            let end = self.count.min(keep * self.segment_len) - segment * self.segment_len;
            if let Some(Some(tail)) = self.segments.get_mut(segment) {
                for slot in &mut tail.as_mut_slice()[offset..end] {
                    *slot = T::default();
                }
            }
            debug!(
                from = self.count,
                to = new_len,
                released,
                "shrank bucket array"
            );
        }
        self.count = new_len;
        Ok(())
    }

    /// Returns a consuming iterator that yields every element by value and
    /// releases each segment as soon as the traversal has moved past it.
    ///
    /// This is the one-pass path for moving a very large collection into
    /// some other structure without holding both in memory at full size.
    pub fn into_draining_iter(self) -> DrainIter<T> {
        DrainIter::new(self)
    }

    /// Sorts the elements in place with a stable merge sort.
    ///
    /// Elements are moved through a scratch buffer half the length of the
    /// array, leaving defaults in their slots until they are written back.
    pub fn sort(&mut self)
    where
        T: Ord,
    {
        let len = self.count;
        sort::merge_sort(self, 0, len, &mut |a, b| a < b);
    }

    /// Sorts the elements with a comparison function, preserving the order
    /// of equal elements.
    pub fn sort_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = self.count;
        sort::merge_sort(self, 0, len, &mut |a, b| compare(a, b) == Ordering::Less);
    }

    /// Sorts the elements with a key extraction function, preserving the
    /// order of equal elements.
    pub fn sort_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        self.sort_by(|a, b| f(a).cmp(&f(b)));
    }

    // Append one default-filled segment to the slot list.
    fn grow(&mut self) -> BucketResult<()> {
        let segment = Segment::try_new(self.segment_len)?;
        trace!(
            segment = self.segments.len(),
            bytes = segment.byte_len(),
            "allocated segment"
        );
        self.segments.push(Some(segment));
        Ok(())
    }
}

impl<T> BucketArray<T> {
    /// Return the number of elements in the array.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the array has a length of 0.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Total number of element slots across all segment slots; always a
    /// multiple of [`BucketArray::segment_len()`].
    pub fn capacity(&self) -> usize {
        self.segments.len() * self.segment_len
    }

    /// Number of elements held by each segment.
    pub fn segment_len(&self) -> usize {
        self.segment_len
    }

    /// Number of segment slots.
    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// Does nothing. Capacity is only ever added one segment at a time as
    /// elements arrive, so reserving ahead gives no guarantee about later
    /// allocation.
    pub fn reserve(&self, _additional: usize) {}

    // Map a logical index to its (segment, offset) pair.
    #[inline]
    fn locate(&self, index: usize) -> (usize, usize) {
        (index / self.segment_len, index % self.segment_len)
    }

    /// Retrieve the slot for `index`, checking only that its segment exists.
    ///
    /// Indices in `len()..capacity()` are not rejected; they address
    /// default-valued slots.
    pub fn at(&self, index: usize) -> BucketResult<&T> {
        let (segment, offset) = self.locate(index);
        match self.segments.get(segment) {
            Some(Some(block)) => Ok(&block.as_slice()[offset]),
            _ => Err(BucketError::OutOfRange {
                index,
                capacity: self.capacity(),
            }),
        }
    }

    /// Mutable form of [`BucketArray::at()`].
    pub fn at_mut(&mut self, index: usize) -> BucketResult<&mut T> {
        let (segment, offset) = self.locate(index);
        let capacity = self.capacity();
        match self.segments.get_mut(segment) {
            Some(Some(block)) => Ok(&mut block.as_mut_slice()[offset]),
            _ => Err(BucketError::OutOfRange { index, capacity }),
        }
    }

    /// Retrieve a reference to the element at the given index, or `None` if
    /// the index is not less than the length.
    ///
    /// # Time complexity
    ///
    /// Constant time.
    pub fn get(&self, index: usize) -> Option<&T> {
        if index >= self.count {
            None
        } else {
            self.at(index).ok()
        }
    }

    /// Mutable form of [`BucketArray::get()`].
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        if index >= self.count {
            None
        } else {
            self.at_mut(index).ok()
        }
    }

    /// Returns the last element, or `None` if the array is empty.
    pub fn back(&self) -> Option<&T> {
        self.count.checked_sub(1).and_then(|index| self.get(index))
    }

    /// Returns the last element mutably, or `None` if the array is empty.
    pub fn back_mut(&mut self) -> Option<&mut T> {
        match self.count.checked_sub(1) {
            Some(index) => self.get_mut(index),
            None => None,
        }
    }

    /// Returns an iterator over the elements in index order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(self)
    }

    /// Returns an iterator that allows modifying each element.
    pub fn iter_mut(&mut self) -> IterMut<'_, T> {
        IterMut::new(self)
    }

    /// Cursor positioned at the first element.
    pub fn begin(&self) -> Cursor<'_, T> {
        Cursor::new(self, 0)
    }

    /// Cursor positioned one past the last element.
    pub fn end(&self) -> Cursor<'_, T> {
        Cursor::new(self, self.count)
    }

    /// Iterate the allocated segments as slices. Each slice has the full
    /// segment length, so the last one may end in default-valued slots.
    pub fn segments(&self) -> impl Iterator<Item = &[T]> {
        self.segments
            .iter()
            .filter_map(|slot| slot.as_ref().map(Segment::as_slice))
    }

    /// Release every segment and reset the length to zero. Unlike a freshly
    /// constructed array, the capacity afterwards is zero; the next append
    /// allocates a new first segment.
    pub fn clear(&mut self) {
        let released = self.segments.iter().filter(|slot| slot.is_some()).count();
        self.segments.clear();
        self.segments.shrink_to_fit();
        self.count = 0;
        debug!(released, "cleared bucket array");
    }

    /// Exchange the contents of two arrays without moving any element or
    /// segment.
    pub fn swap(&mut self, other: &mut Self) {
        std::mem::swap(self, other);
    }

    /// Swap the elements at indices `a` and `b`, which may live in different
    /// segments.
    ///
    /// # Panics
    ///
    /// Panics if either index is not less than the length.
    pub fn swap_elements(&mut self, a: usize, b: usize) {
        for index in [a, b] {
            if index >= self.count {
                panic!("index {index} out of bounds for length {}", self.count);
            }
        }
        if a == b {
            return;
        }
        let (segment_a, offset_a) = self.locate(a);
        let (segment_b, offset_b) = self.locate(b);
        let capacity = self.capacity();
        if segment_a == segment_b {
            match self.segments.get_mut(segment_a) {
                Some(Some(block)) => block.as_mut_slice().swap(offset_a, offset_b),
                _ => panic!("{}", BucketError::OutOfRange { index: a, capacity }),
            }
            return;
        }
        let (low, low_offset, high, high_offset) = if segment_a < segment_b {
            (segment_a, offset_a, segment_b, offset_b)
        } else {
            (segment_b, offset_b, segment_a, offset_a)
        };
        let (head, tail) = self.segments.split_at_mut(high);
        match (&mut head[low], &mut tail[0]) {
            (Some(first), Some(second)) => std::mem::swap(
                &mut first.as_mut_slice()[low_offset],
                &mut second.as_mut_slice()[high_offset],
            ),
            _ => panic!("{}", BucketError::OutOfRange { index: a.max(b), capacity }),
        }
    }

    /// Sorts the elements in place without preserving the order of equal
    /// elements (introsort: quicksort with a heapsort fallback).
    ///
    /// # Time complexity
    ///
    /// O(n log n) in the worst case.
    pub fn sort_unstable(&mut self)
    where
        T: Ord,
    {
        let len = self.count;
        sort::quicksort(self, 0, len, &mut |a, b| a < b);
    }

    /// Unstable sort with a comparison function.
    pub fn sort_unstable_by<F>(&mut self, mut compare: F)
    where
        F: FnMut(&T, &T) -> Ordering,
    {
        let len = self.count;
        sort::quicksort(self, 0, len, &mut |a, b| compare(a, b) == Ordering::Less);
    }

    /// Unstable sort with a key extraction function.
    pub fn sort_unstable_by_key<K, F>(&mut self, mut f: F)
    where
        F: FnMut(&T) -> K,
        K: Ord,
    {
        self.sort_unstable_by(|a, b| f(a).cmp(&f(b)));
    }
}

impl<T> IndexedAccess<T> for BucketArray<T> {
    fn get_ref(&self, index: usize) -> &T {
        &self[index]
    }

    fn slot_mut(&mut self, index: usize) -> &mut T {
        &mut self[index]
    }

    fn swap_at(&mut self, a: usize, b: usize) {
        self.swap_elements(a, b)
    }
}

impl<T: Default> Default for BucketArray<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Index<usize> for BucketArray<T> {
    type Output = T;

    fn index(&self, index: usize) -> &Self::Output {
        match self.at(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T> IndexMut<usize> for BucketArray<T> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        match self.at_mut(index) {
            Ok(item) => item,
            Err(err) => panic!("{err}"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BucketArray<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<A: Default> FromIterator<A> for BucketArray<A> {
    fn from_iter<T: IntoIterator<Item = A>>(iter: T) -> Self {
        let mut arr: BucketArray<A> = BucketArray::new();
        for value in iter {
            arr.push(value)
        }
        arr
    }
}

impl<T: Default> Extend<T> for BucketArray<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value)
        }
    }
}

impl<T: Default> IntoIterator for BucketArray<T> {
    type Item = T;
    type IntoIter = DrainIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.into_draining_iter()
    }
}

impl<'a, T> IntoIterator for &'a BucketArray<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut BucketArray<T> {
    type Item = &'a mut T;
    type IntoIter = IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_segment_len_for_bytes() {
        assert_eq!(segment_len_for_bytes::<u64>(DEFAULT_SEGMENT_BYTES), 1_048_576);
        assert_eq!(segment_len_for_bytes::<u8>(64), 64);
        assert_eq!(segment_len_for_bytes::<[u8; 100]>(64), 1);
        assert_eq!(segment_len_for_bytes::<()>(64), 64);
    }

    #[test]
    fn test_new_has_one_segment() {
        let sut: BucketArray<u64> = BucketArray::new();
        assert_eq!(sut.len(), 0);
        assert!(sut.is_empty());
        assert_eq!(sut.segment_count(), 1);
        assert_eq!(sut.capacity(), 1_048_576);
    }

    #[test]
    fn test_zero_segment_len() {
        let result: BucketResult<BucketArray<u8>> = BucketArray::try_with_segment_len(0);
        assert_eq!(result.err(), Some(BucketError::ZeroSegmentLength));
    }

    #[test]
    fn test_with_segment_bytes() {
        let sut: BucketArray<u32> = BucketArray::with_segment_bytes(64);
        assert_eq!(sut.segment_len(), 16);
        assert_eq!(sut.capacity(), 16);
    }

    #[test]
    fn test_push_three_layout() {
        let mut sut: BucketArray<i32> = BucketArray::with_segment_len(2);
        sut.push(1);
        sut.push(2);
        sut.push(3);
        assert_eq!(sut.len(), 3);
        assert_eq!(sut.capacity(), 4);
        let layout: Vec<&[i32]> = sut.segments().collect();
        assert_eq!(layout, vec![&[1, 2][..], &[3, 0][..]]);
        assert_eq!(sut[0], 1);
        assert_eq!(sut[2], 3);
    }

    #[test]
    fn test_add_get_several_strings() {
        let inputs = [
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
        ];
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(4);
        for item in inputs {
            sut.push(item.to_owned());
        }
        assert_eq!(sut.len(), 9);
        assert_eq!(sut.capacity(), 12);
        for idx in 0..=8 {
            let maybe = sut.get(idx);
            assert!(maybe.is_some(), "{idx} is none");
            assert_eq!(inputs[idx], maybe.unwrap());
        }
        assert!(sut.get(9).is_none());
        assert_eq!(sut[3], "four");
    }

    #[test]
    fn test_index_past_len_within_capacity() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(4);
        sut.push(7);
        // the offset is not checked against the length
        assert_eq!(sut[3], 0);
        assert!(sut.get(3).is_none());
    }

    #[test]
    fn test_index_past_capacity() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(4);
        sut.push(7);
        assert_eq!(
            sut.at(4),
            Err(BucketError::OutOfRange {
                index: 4,
                capacity: 4
            })
        );
    }

    #[test]
    #[should_panic(expected = "index 8 out of range for capacity 4")]
    fn test_index_panics_past_capacity() {
        let sut: BucketArray<u32> = BucketArray::with_segment_len(4);
        let _value = sut[8];
    }

    #[test]
    fn test_index_mut() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(2);
        sut.extend([1, 2, 3]);
        sut[2] = 30;
        *sut.get_mut(0).unwrap() = 10;
        assert_eq!(sut[0], 10);
        assert_eq!(sut[2], 30);
        assert!(sut.get_mut(3).is_none());
    }

    #[test]
    fn test_references_stable_across_growth() {
        let mut sut: BucketArray<u64> = BucketArray::with_segment_len(2);
        sut.push(41);
        let before: *const u64 = &sut[0];
        for value in 0..100 {
            sut.push(value);
        }
        let after: *const u64 = &sut[0];
        assert_eq!(before, after);
        assert_eq!(sut[0], 41);
    }

    #[test]
    fn test_emplace() {
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(2);
        sut.emplace("alpha");
        let third = {
            sut.emplace_with(|| String::from("beta"));
            sut.emplace('c')
        };
        third.push('!');
        assert_eq!(sut.len(), 3);
        assert_eq!(sut[0], "alpha");
        assert_eq!(sut[1], "beta");
        assert_eq!(sut[2], "c!");
        assert_eq!(sut.segment_count(), 2);
    }

    #[test]
    fn test_push_and_pop() {
        let inputs = [
            "one", "two", "three", "four", "five", "six", "seven", "eight", "nine",
        ];
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(4);
        assert!(sut.pop().is_none());
        for item in inputs {
            sut.push(item.to_owned());
        }
        let value = sut.pop();
        assert_eq!(value.as_deref(), Some("nine"));
        assert_eq!(sut.len(), 8);
        // the vacated slot went back to its default
        assert_eq!(sut[8], "");
        sut.push(String::from("nine"));
        for (idx, elem) in sut.iter().enumerate() {
            assert_eq!(inputs[idx], elem);
        }
    }

    #[test]
    fn test_back() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(2);
        assert!(sut.back().is_none());
        assert!(sut.back_mut().is_none());
        sut.extend([1, 2, 3, 4]);
        assert_eq!(sut.back(), Some(&4));
        *sut.back_mut().unwrap() = 40;
        assert_eq!(sut[3], 40);
    }

    #[test]
    fn test_reserve_is_noop() {
        let sut: BucketArray<u32> = BucketArray::with_segment_len(2);
        sut.reserve(1_000);
        assert_eq!(sut.capacity(), 2);
    }

    #[test]
    fn test_resize_grow() {
        let mut sut: BucketArray<i32> = BucketArray::with_segment_len(2);
        sut.extend([1, 2, 3]);
        sut.resize(5);
        assert_eq!(sut.len(), 5);
        assert_eq!(sut.capacity(), 6);
        assert_eq!(sut[3], 0);
        assert_eq!(sut[4], 0);
        assert_eq!(sut[2], 3);
    }

    #[test]
    fn test_resize_shrink_preserves_prefix() {
        // shrinking keeps the surviving elements rather than releasing every
        // segment
        let mut sut: BucketArray<i32> = BucketArray::with_segment_len(2);
        sut.extend([1, 2, 3]);
        sut.resize(5);
        sut.resize(1);
        assert_eq!(sut.len(), 1);
        assert_eq!(sut.segment_count(), 1);
        assert_eq!(sut.capacity(), 2);
        assert_eq!(sut[0], 1);
        // truncated slot went back to default
        assert_eq!(sut[1], 0);
        sut.resize(4);
        let values: Vec<i32> = sut.iter().copied().collect();
        assert_eq!(values, vec![1, 0, 0, 0]);
    }

    #[test]
    fn test_resize_shrink_on_segment_boundary() {
        let mut sut: BucketArray<i32> = BucketArray::with_segment_len(2);
        sut.extend([1, 2, 3, 4, 5, 6]);
        sut.resize(4);
        // the segment starting at index 4 is kept, emptied
        assert_eq!(sut.segment_count(), 3);
        assert_eq!(sut[4], 0);
        assert_eq!(sut[5], 0);
        sut.resize(0);
        assert_eq!(sut.segment_count(), 1);
        assert!(sut.is_empty());
        assert_eq!(sut[0], 0);
    }

    #[test]
    fn test_resize_shrink_drops_strings() {
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(64);
        for _ in 0..512 {
            sut.push(ulid::Ulid::new().to_string());
        }
        sut.resize(100);
        assert_eq!(sut.len(), 100);
        assert_eq!(sut.segment_count(), 2);
        assert_eq!(sut[100], "");
        assert_eq!(sut[99].len(), 26);
        // implicitly drop()
    }

    #[test]
    fn test_clear_and_reuse() {
        let mut sut: BucketArray<i32> = BucketArray::with_segment_len(2);
        sut.extend([1, 2, 3]);
        sut.clear();
        assert_eq!(sut.len(), 0);
        assert_eq!(sut.capacity(), 0);
        assert_eq!(sut.segment_count(), 0);
        sut.push(9);
        assert_eq!(sut.len(), 1);
        assert_eq!(sut[0], 9);
        assert_eq!(sut.capacity(), 2);
    }

    #[test]
    fn test_clear_and_reuse_strings() {
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(64);
        for _ in 0..512 {
            sut.push(ulid::Ulid::new().to_string());
        }
        assert_eq!(sut.len(), 512);
        sut.clear();
        assert_eq!(sut.len(), 0);
        for _ in 0..512 {
            sut.push(ulid::Ulid::new().to_string());
        }
        assert_eq!(sut.len(), 512);
        // implicitly drop()
    }

    #[derive(Default)]
    struct Counted {
        value: u32,
        clones: Rc<Cell<u32>>,
    }

    impl Clone for Counted {
        fn clone(&self) -> Self {
            self.clones.set(self.clones.get() + 1);
            Counted {
                value: self.value,
                clones: Rc::clone(&self.clones),
            }
        }
    }

    #[test]
    fn test_swap_copies_nothing() {
        let clones = Rc::new(Cell::new(0));
        let mut first: BucketArray<Counted> = BucketArray::with_segment_len(2);
        let mut second: BucketArray<Counted> = BucketArray::with_segment_len(3);
        for value in 0..5 {
            first.push(Counted {
                value,
                clones: Rc::clone(&clones),
            });
        }
        second.push(Counted {
            value: 99,
            clones: Rc::clone(&clones),
        });
        let first_addr: *const Counted = &first[0];
        first.swap(&mut second);
        assert_eq!(clones.get(), 0);
        assert_eq!(first.len(), 1);
        assert_eq!(first.segment_len(), 3);
        assert_eq!(first[0].value, 99);
        assert_eq!(second.len(), 5);
        assert_eq!(second[4].value, 4);
        let moved_addr: *const Counted = &second[0];
        assert_eq!(first_addr, moved_addr);
    }

    #[test]
    fn test_swap_elements_across_segments() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(3);
        sut.extend(0..8);
        sut.swap_elements(1, 7);
        sut.swap_elements(2, 0);
        sut.swap_elements(4, 4);
        let values: Vec<u32> = sut.iter().copied().collect();
        assert_eq!(values, vec![2, 7, 0, 3, 4, 5, 6, 1]);
    }

    #[test]
    #[should_panic(expected = "index 8 out of bounds for length 8")]
    fn test_swap_elements_past_len() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(3);
        sut.extend(0..8);
        // index 8 still has a slot, but it is not an element
        sut.swap_elements(0, 8);
    }

    #[test]
    fn test_sort_edge_list() {
        // the build-sort-drain flow of a graph edge list
        let mut sut: BucketArray<(u32, u32)> = BucketArray::with_segment_len(16);
        for i in 0..1_000u32 {
            sut.push(((i * 7_919) % 97, i));
        }
        sut.sort();
        assert_eq!(sut.len(), 1_000);
        assert!(sut.iter().is_sorted());
        // untouched tail slot past the length stays default
        assert_eq!(sut[1_000], (0, 0));
        let drained: Vec<(u32, u32)> = sut.into_iter().collect();
        assert!(drained.is_sorted());
    }

    #[test]
    fn test_sort_by_key_is_stable() {
        let mut sut: BucketArray<(u8, usize)> = BucketArray::with_segment_len(5);
        for i in 0..200 {
            sut.push(((i % 3) as u8, i));
        }
        sut.sort_by_key(|pair| pair.0);
        let values: Vec<(u8, usize)> = sut.iter().copied().collect();
        let mut expected: Vec<(u8, usize)> = (0..200).map(|i| ((i % 3) as u8, i)).collect();
        expected.sort_by_key(|pair| pair.0);
        assert_eq!(values, expected);
    }

    #[test]
    fn test_sort_by_descending_strings() {
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(64);
        for _ in 0..512 {
            sut.push(ulid::Ulid::new().to_string());
        }
        sut.sort_by(|a, b| b.cmp(a));
        assert_eq!(sut.len(), 512);
        for idx in 1..512 {
            assert!(sut[idx - 1] >= sut[idx]);
            assert_eq!(sut[idx].len(), 26);
        }
    }

    #[test]
    fn test_sort_unstable_variants() {
        let mut sut: BucketArray<i64> = BucketArray::with_segment_len(7);
        sut.extend((0..500).map(|i| (i * 37) % 113 - 56));
        sut.sort_unstable();
        assert!(sut.iter().is_sorted());
        sut.sort_unstable_by(|a, b| b.cmp(a));
        assert!(sut.iter().rev().is_sorted());
        sut.sort_unstable_by_key(|v| v.abs());
        assert!(sut.iter().map(|v| v.abs()).is_sorted());
        assert_eq!(sut.len(), 500);
    }

    #[test]
    fn test_sort_empty_and_single() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(2);
        sut.sort();
        sut.sort_unstable();
        assert!(sut.is_empty());
        sut.push(5);
        sut.sort();
        sut.sort_unstable();
        assert_eq!(sut[0], 5);
    }

    #[test]
    fn test_add_get_many_ints() {
        let mut sut: BucketArray<i32> = BucketArray::with_segment_len(1_000);
        for value in 0..1_000_000 {
            sut.push(value);
        }
        assert_eq!(sut.len(), 1_000_000);
        assert_eq!(sut.segment_count(), 1_000);
        for idx in 0..1_000_000 {
            assert_eq!(sut.get(idx), Some(&(idx as i32)));
        }
        assert_eq!(sut[99_999], 99_999);
    }

    #[test]
    fn test_array_fromiterator() {
        let sut: BucketArray<i32> = (0..10_000).collect();
        assert_eq!(sut.len(), 10_000);
        for idx in 0..10_000 {
            assert_eq!(sut[idx], idx as i32);
        }
    }

    #[test]
    fn test_debug_format() {
        let mut sut: BucketArray<u8> = BucketArray::with_segment_len(2);
        sut.extend([1, 2, 3]);
        assert_eq!(format!("{sut:?}"), "[1, 2, 3]");
    }

    #[test]
    fn test_zero_sized_elements() {
        let mut sut: BucketArray<()> = BucketArray::new();
        for _ in 0..10_000 {
            sut.push(());
        }
        assert_eq!(sut.len(), 10_000);
        assert_eq!(sut.iter().count(), 10_000);
    }

    #[test]
    fn test_add_get_many_instances() {
        for _ in 0..1_000 {
            let mut sut: BucketArray<usize> = BucketArray::with_segment_len(256);
            for value in 0..10_000 {
                sut.push(value);
            }
            assert_eq!(sut.len(), 10_000);
        }
    }
}
