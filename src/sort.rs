//
// Copyright (c) 2025 Nathan Fiedler
//

//! Sorting over segmented storage.
//!
//! The elements never sit in one contiguous slice, so these routines work
//! through indexed access and element swaps. The unstable sort is an
//! introsort (quicksort falling back to heapsort); the stable sort is a merge
//! sort that moves the left run into a scratch buffer with `mem::take`,
//! relying on the same `T: Default` bound the array needs for growth.
//!
//! If the comparison panics during a stable merge, the elements held in the
//! scratch buffer are dropped and their slots are left holding defaults.

/// Threshold for switching to insertion sort.
const INSERTION_SORT_THRESHOLD: usize = 20;

/// Indexed access to a collection that is not a contiguous slice.
pub(crate) trait IndexedAccess<T> {
    fn get_ref(&self, index: usize) -> &T;

    fn slot_mut(&mut self, index: usize) -> &mut T;

    fn swap_at(&mut self, a: usize, b: usize);
}

/// Sorts `v[start..end]` with insertion sort; stable.
pub(crate) fn insertion_sort<T, F>(
    v: &mut impl IndexedAccess<T>,
    start: usize,
    end: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    for i in (start + 1)..end {
        let mut j = i;
        while j > start && is_less(v.get_ref(j), v.get_ref(j - 1)) {
            v.swap_at(j, j - 1);
            j -= 1;
        }
    }
}

/// Sorts `v[start..end]` with heapsort, O(n log n) in the worst case.
pub(crate) fn heapsort<T, F>(v: &mut impl IndexedAccess<T>, start: usize, end: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = end - start;
    if len < 2 {
        return;
    }
    for node in (0..len / 2).rev() {
        sift_down(v, start, node, len, is_less);
    }
    for last in (1..len).rev() {
        v.swap_at(start, start + last);
        sift_down(v, start, 0, last, is_less);
    }
}

fn sift_down<T, F>(
    v: &mut impl IndexedAccess<T>,
    start: usize,
    mut node: usize,
    heap_len: usize,
    is_less: &mut F,
) where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let mut child = 2 * node + 1;
        if child >= heap_len {
            break;
        }
        if child + 1 < heap_len && is_less(v.get_ref(start + child), v.get_ref(start + child + 1))
        {
            child += 1;
        }
        if !is_less(v.get_ref(start + node), v.get_ref(start + child)) {
            break;
        }
        v.swap_at(start + node, start + child);
        node = child;
    }
}

/// Sorts `v[start..end]` with quicksort, falling back to heapsort once the
/// recursion gets deeper than `2 * log2(len)`.
pub(crate) fn quicksort<T, F>(v: &mut impl IndexedAccess<T>, start: usize, end: usize, is_less: &mut F)
where
    F: FnMut(&T, &T) -> bool,
{
    let len = end - start;
    if len < 2 {
        return;
    }
    let limit = 2 * (usize::BITS - len.leading_zeros());
    quicksort_limited(v, start, end, is_less, limit);
}

fn quicksort_limited<T, F>(
    v: &mut impl IndexedAccess<T>,
    mut start: usize,
    mut end: usize,
    is_less: &mut F,
    mut limit: u32,
) where
    F: FnMut(&T, &T) -> bool,
{
    loop {
        let len = end - start;
        if len <= INSERTION_SORT_THRESHOLD {
            insertion_sort(v, start, end, is_less);
            return;
        }
        if limit == 0 {
            heapsort(v, start, end, is_less);
            return;
        }
        limit -= 1;

        let pivot = median_of_three(v, start, start + len / 2, end - 1, is_less);
        v.swap_at(start, pivot);
        let split = partition(v, start, end, is_less);

        // recurse into the smaller side, loop on the larger
        if split - start < end - split - 1 {
            quicksort_limited(v, start, split, is_less, limit);
            start = split + 1;
        } else {
            quicksort_limited(v, split + 1, end, is_less, limit);
            end = split;
        }
    }
}

fn median_of_three<T, F>(
    v: &impl IndexedAccess<T>,
    a: usize,
    b: usize,
    c: usize,
    is_less: &mut F,
) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    if is_less(v.get_ref(a), v.get_ref(b)) {
        if is_less(v.get_ref(b), v.get_ref(c)) {
            b
        } else if is_less(v.get_ref(a), v.get_ref(c)) {
            c
        } else {
            a
        }
    } else if is_less(v.get_ref(a), v.get_ref(c)) {
        a
    } else if is_less(v.get_ref(b), v.get_ref(c)) {
        c
    } else {
        b
    }
}

// Partition `v[start..end]` around the pivot at `v[start]` and return the
// pivot's final position.
fn partition<T, F>(v: &mut impl IndexedAccess<T>, start: usize, end: usize, is_less: &mut F) -> usize
where
    F: FnMut(&T, &T) -> bool,
{
    let mut left = start + 1;
    let mut right = end - 1;
    loop {
        while left <= right && is_less(v.get_ref(left), v.get_ref(start)) {
            left += 1;
        }
        while left <= right && !is_less(v.get_ref(right), v.get_ref(start)) {
            right -= 1;
        }
        if left > right {
            break;
        }
        v.swap_at(left, right);
        left += 1;
        right -= 1;
    }
    v.swap_at(start, right);
    right
}

/// Sorts `v[start..end]` with a stable merge sort.
pub(crate) fn merge_sort<T, F>(v: &mut impl IndexedAccess<T>, start: usize, end: usize, is_less: &mut F)
where
    T: Default,
    F: FnMut(&T, &T) -> bool,
{
    let len = end - start;
    if len <= INSERTION_SORT_THRESHOLD {
        if len > 1 {
            insertion_sort(v, start, end, is_less);
        }
        return;
    }
    let mut scratch: Vec<T> = Vec::with_capacity(len / 2 + 1);
    merge_sort_with_scratch(v, start, end, &mut scratch, is_less);
}

fn merge_sort_with_scratch<T, F>(
    v: &mut impl IndexedAccess<T>,
    start: usize,
    end: usize,
    scratch: &mut Vec<T>,
    is_less: &mut F,
) where
    T: Default,
    F: FnMut(&T, &T) -> bool,
{
    let len = end - start;
    if len <= INSERTION_SORT_THRESHOLD {
        insertion_sort(v, start, end, is_less);
        return;
    }
    let mid = start + len / 2;
    merge_sort_with_scratch(v, start, mid, scratch, is_less);
    merge_sort_with_scratch(v, mid, end, scratch, is_less);
    if !is_less(v.get_ref(mid), v.get_ref(mid - 1)) {
        return;
    }
    merge(v, start, mid, end, scratch, is_less);
}

// Merge the sorted runs `v[start..mid]` and `v[mid..end]`. The left run is
// moved out to `scratch`, leaving defaults behind that get overwritten as the
// merged output is written back from `start`.
fn merge<T, F>(
    v: &mut impl IndexedAccess<T>,
    start: usize,
    mid: usize,
    end: usize,
    scratch: &mut Vec<T>,
    is_less: &mut F,
) where
    T: Default,
    F: FnMut(&T, &T) -> bool,
{
    scratch.clear();
    for index in start..mid {
        scratch.push(std::mem::take(v.slot_mut(index)));
    }
    let mut left = 0;
    let mut right = mid;
    let mut write = start;
    while left < scratch.len() && right < end {
        if is_less(v.get_ref(right), &scratch[left]) {
            let value = std::mem::take(v.slot_mut(right));
            *v.slot_mut(write) = value;
            right += 1;
        } else {
            *v.slot_mut(write) = std::mem::take(&mut scratch[left]);
            left += 1;
        }
        write += 1;
    }
    while left < scratch.len() {
        *v.slot_mut(write) = std::mem::take(&mut scratch[left]);
        left += 1;
        write += 1;
    }
    // anything left on the right is already in place
    scratch.clear();
}
