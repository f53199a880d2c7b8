//
// Copyright (c) 2025 Nathan Fiedler
//

//! Fixed-capacity blocks of default-initialized elements.

use crate::error::{BucketError, BucketResult};
use std::alloc::{Layout, alloc, dealloc};
use std::ptr::NonNull;

///
/// A single heap block holding exactly `len` initialized elements. The block
/// is allocated once and never moved or resized, which is what keeps
/// references into a bucket array stable across appends.
///
pub(crate) struct Segment<T> {
    ptr: NonNull<T>,
    len: usize,
    layout: Layout,
}

// Frees a partially filled block if `T::default()` panics mid-fill.
struct FillGuard<T> {
    ptr: NonNull<T>,
    layout: Layout,
    filled: usize,
}

impl<T> Drop for FillGuard<T> {
    fn drop(&mut self) {
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.filled,
            ));
            if self.layout.size() != 0 {
                dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout);
            }
        }
    }
}

impl<T: Default> Segment<T> {
    /// Allocate a block of `len` elements, each set to `T::default()`.
    pub(crate) fn try_new(len: usize) -> BucketResult<Self> {
        let layout = Layout::array::<T>(len)
            .map_err(|_| BucketError::CapacityOverflow { segment_len: len })?;
        let ptr = if layout.size() == 0 {
            NonNull::dangling()
        } else {
            let raw = unsafe { alloc(layout) }.cast::<T>();
            NonNull::new(raw).ok_or(BucketError::AllocFailed { layout })?
        };
        let mut guard = FillGuard {
            ptr,
            layout,
            filled: 0,
        };
        while guard.filled < len {
            unsafe {
                std::ptr::write(ptr.as_ptr().add(guard.filled), T::default());
            }
            guard.filled += 1;
        }
        std::mem::forget(guard);
        Ok(Self { ptr, len, layout })
    }
}

impl<T> Segment<T> {
    pub(crate) fn as_slice(&self) -> &[T] {
        // every slot was initialized when the block was allocated
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Number of bytes owned by this block.
    pub(crate) fn byte_len(&self) -> usize {
        self.layout.size()
    }
}

impl<T> Drop for Segment<T> {
    fn drop(&mut self) {
        unsafe {
            std::ptr::drop_in_place(std::ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            ));
            if self.layout.size() != 0 {
                dealloc(self.ptr.as_ptr().cast::<u8>(), self.layout);
            }
        }
    }
}

// A segment exclusively owns its elements, just like `Box<[T]>`.
unsafe impl<T: Send> Send for Segment<T> {}
unsafe impl<T: Sync> Sync for Segment<T> {}
