//! Execution context and allocation capabilities
//!
//! Every primitive receives its stream and allocator explicitly instead of
//! reaching for globals, so callers control threading and memory accounting.

mod alloc;
mod stream;

pub use alloc::{BufferAllocator, SystemAllocator, TrackingAllocator};
pub use stream::HostStream;
