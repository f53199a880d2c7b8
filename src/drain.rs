//
// Copyright (c) 2025 Nathan Fiedler
//

//! Consuming iterator that frees segments as it goes.

use crate::BucketArray;
use std::fmt;
use std::iter::FusedIterator;
use tracing::trace;

///
/// An iterator that moves elements out of a bucket array and releases each
/// segment as soon as the traversal crosses out of it.
///
/// Taking the array by value means nothing else can observe the partially
/// released segments. Dropping the iterator early releases whatever is left;
/// [`DrainIter::into_cleared()`] does the same but hands back the emptied
/// array for reuse.
///
pub struct DrainIter<T> {
    array: BucketArray<T>,
    index: usize,
}

impl<T: Default> DrainIter<T> {
    pub(crate) fn new(array: BucketArray<T>) -> Self {
        Self { array, index: 0 }
    }

    /// Number of elements consumed so far.
    pub fn position(&self) -> usize {
        self.index
    }

    /// Number of segments that still hold memory. Zero once the drain has
    /// been exhausted.
    pub fn live_segments(&self) -> usize {
        self.array
            .segments
            .iter()
            .filter(|slot| slot.is_some())
            .count()
    }

    /// Stop draining, release every remaining segment, and return the empty
    /// array. Like [`BucketArray::clear()`], the returned array has zero
    /// capacity until the next append.
    pub fn into_cleared(mut self) -> BucketArray<T> {
        self.array.clear();
        self.array
    }

    fn release(&mut self, segment: usize) {
        if let Some(slot) = self.array.segments.get_mut(segment) {
            if let Some(block) = slot.take() {
                trace!(segment, bytes = block.byte_len(), "released segment");
            }
        }
    }

    fn release_all(&mut self) {
        for segment in 0..self.array.segments.len() {
            self.release(segment);
        }
    }
}

impl<T: Default> Iterator for DrainIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index >= self.array.count {
            self.release_all();
            return None;
        }
        let (segment, offset) = self.array.locate(self.index);
        let value = match self.array.segments.get_mut(segment) {
            Some(Some(block)) => std::mem::take(&mut block.as_mut_slice()[offset]),
            _ => return None,
        };
        self.index += 1;
        if self.index == self.array.count {
            self.release_all();
        } else if offset + 1 == self.array.segment_len {
            self.release(segment);
        }
        Some(value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.array.count - self.index;
        (remaining, Some(remaining))
    }
}

impl<T: Default> ExactSizeIterator for DrainIter<T> {}

impl<T: Default> FusedIterator for DrainIter<T> {}

impl<T> fmt::Debug for DrainIter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DrainIter")
            .field("index", &self.index)
            .field("count", &self.array.count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use crate::BucketArray;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn test_drain_releases_crossed_segment() {
        let mut sut: BucketArray<u32> = BucketArray::with_segment_len(2);
        sut.extend([10, 20, 30]);
        let mut drain = sut.into_draining_iter();
        assert_eq!(drain.live_segments(), 2);
        assert_eq!(drain.next(), Some(10));
        assert_eq!(drain.live_segments(), 2);
        assert_eq!(drain.next(), Some(20));
        // crossed from segment 0 into segment 1
        assert_eq!(drain.live_segments(), 1);
        assert_eq!(drain.position(), 2);
        assert_eq!(drain.len(), 1);
        assert_eq!(drain.next(), Some(30));
        assert_eq!(drain.live_segments(), 0);
        assert_eq!(drain.next(), None);
    }

    #[test]
    fn test_drain_visits_in_order() {
        let sut: BucketArray<usize> = {
            let mut arr = BucketArray::with_segment_len(7);
            arr.extend(0..1_000);
            arr
        };
        for (idx, value) in sut.into_iter().enumerate() {
            assert_eq!(idx, value);
        }
    }

    #[test]
    fn test_drain_empty() {
        let sut: BucketArray<u8> = BucketArray::with_segment_len(4);
        let mut drain = sut.into_draining_iter();
        assert_eq!(drain.live_segments(), 1);
        // an exhausted drain holds no segments, even with nothing to yield
        assert_eq!(drain.next(), None);
        assert_eq!(drain.live_segments(), 0);
        assert_eq!(drain.next(), None);
    }

    #[test]
    fn test_drain_after_resize_grow() {
        let mut sut: BucketArray<u8> = BucketArray::with_segment_len(2);
        sut.push(1);
        sut.resize(3);
        sut.resize(1);
        sut.resize(5);
        assert_eq!(sut.segment_count(), 3);
        let mut drain = sut.into_draining_iter();
        let values: Vec<u8> = drain.by_ref().collect();
        assert_eq!(values, vec![1, 0, 0, 0, 0]);
        assert_eq!(drain.live_segments(), 0);
    }

    #[test]
    fn test_drain_into_cleared() {
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(64);
        for _ in 0..512 {
            sut.push(ulid::Ulid::new().to_string());
        }
        let mut drain = sut.into_draining_iter();
        for _ in 0..200 {
            drain.next();
        }
        assert_eq!(drain.live_segments(), 5);
        let mut sut = drain.into_cleared();
        assert_eq!(sut.len(), 0);
        assert_eq!(sut.capacity(), 0);
        sut.push(String::from("again"));
        assert_eq!(sut[0], "again");
    }

    #[test]
    fn test_array_intoiterator_drop_large() {
        // stop partway through the third segment, leaving released, partially
        // consumed, and untouched segments to be dropped together
        let mut sut: BucketArray<String> = BucketArray::with_segment_len(64);
        for _ in 0..512 {
            sut.push(ulid::Ulid::new().to_string());
        }
        for (idx, _) in sut.into_iter().enumerate() {
            if idx >= 150 {
                break;
            }
        }
        // implicitly drop()
    }

    #[derive(Default)]
    struct Tracked(Option<Rc<Cell<u32>>>);

    impl Drop for Tracked {
        fn drop(&mut self) {
            if let Some(drops) = &self.0 {
                drops.set(drops.get() + 1);
            }
        }
    }

    #[test]
    fn test_drain_drops_each_element_once() {
        let drops = Rc::new(Cell::new(0));
        let mut sut: BucketArray<Tracked> = BucketArray::with_segment_len(3);
        for _ in 0..10 {
            sut.push(Tracked(Some(Rc::clone(&drops))));
        }
        let mut drain = sut.into_draining_iter();
        for _ in 0..4 {
            drain.next();
        }
        assert_eq!(drops.get(), 4);
        drop(drain);
        assert_eq!(drops.get(), 10);
    }
}
