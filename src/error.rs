//! Error types for offset-array primitives
//!
//! Precondition violations that are cheap to detect are reported here instead of
//! turning into out-of-bounds panics deep inside a parallel pass.

use thiserror::Error;

/// Errors reported by the offset primitives
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OffsetError {
    /// Offset array has no entries (at least one is required)
    #[error("Offset array is empty")]
    Empty,

    /// First offset is not zero
    #[error("Offset array must start at 0, found {first}")]
    NonZeroBase {
        /// Value found at position 0
        first: usize,
    },

    /// Offsets decrease at `index` (`offsets[index] < offsets[index - 1]`)
    #[error("Offsets decrease at index {index}")]
    NotMonotonic {
        /// First position whose value is below its predecessor
        index: usize,
    },

    /// Offset array length does not match the group count
    #[error("Expected {expected} offsets, found {actual}")]
    LengthMismatch {
        /// Required length (`num_vertices + 1`)
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Final offset does not match the declared entry count
    #[error("Final offset {last} does not match entry count {expected}")]
    TotalMismatch {
        /// Declared total (`num_edges`)
        expected: usize,
        /// Value found at the end of the offset array
        last: usize,
    },

    /// Chunk size of zero requested
    #[error("Chunk size must be greater than zero")]
    ZeroChunkSize,

    /// Value does not fit in the requested index type
    #[error("Value {value} does not fit in the target index type")]
    IndexOverflow {
        /// Offending value
        value: usize,
    },

    /// Group id outside `0..num_groups`
    #[error("Group id {id} out of range for {num_groups} groups")]
    GroupOutOfRange {
        /// Offending id
        id: usize,
        /// Number of groups
        num_groups: usize,
    },

    /// Group ids passed to a histogram are not sorted
    #[error("Group ids are not sorted at index {index}")]
    UnsortedGroups {
        /// First position whose id is below its predecessor
        index: usize,
    },

    /// Allocation would exceed the allocator's byte budget
    #[error("Allocation of {requested} bytes exceeds budget ({available} bytes available)")]
    AllocationLimit {
        /// Bytes requested
        requested: usize,
        /// Bytes still available in the budget
        available: usize,
    },

    /// Invalid configuration value
    #[error("Invalid configuration {key}={value}")]
    InvalidConfig {
        /// Configuration key (environment variable name)
        key: &'static str,
        /// Raw value
        value: String,
    },
}
