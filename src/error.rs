//
// Copyright (c) 2025 Nathan Fiedler
//

//! Error types for the bucket array.

use std::alloc::{Layout, handle_alloc_error};
use thiserror::Error;

/// Result type for fallible bucket array operations.
pub type BucketResult<T> = Result<T, BucketError>;

/// Errors that can occur while growing or addressing a bucket array.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BucketError {
    /// The segment for the index lies beyond the allocated segment slots.
    #[error("index {index} out of range for capacity {capacity}")]
    OutOfRange {
        /// The requested logical index.
        index: usize,
        /// The capacity at the time of the request.
        capacity: usize,
    },

    /// The allocator could not provide memory for a new segment.
    #[error("failed to allocate {} bytes for a segment", layout.size())]
    AllocFailed {
        /// Layout of the segment that could not be allocated.
        layout: Layout,
    },

    /// A segment of the requested length would exceed `isize::MAX` bytes.
    #[error("segment of {segment_len} elements exceeds the maximum allocation size")]
    CapacityOverflow {
        /// The number of elements per segment.
        segment_len: usize,
    },

    /// Segments must hold at least one element.
    #[error("segment length must be greater than zero")]
    ZeroSegmentLength,
}

impl BucketError {
    /// Abort via the allocation error handler, or panic with the message for
    /// anything that is not an allocation failure.
    pub(crate) fn escalate(self) -> ! {
        match self {
            BucketError::AllocFailed { layout } => handle_alloc_error(layout),
            other => panic!("{other}"),
        }
    }
}

/// Unwrap the result of an infallible-by-contract operation.
pub(crate) fn or_escalate<R>(result: BucketResult<R>) -> R {
    match result {
        Ok(value) => value,
        Err(err) => err.escalate(),
    }
}
