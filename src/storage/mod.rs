//! Graph storage layer
//!
//! Validated offset arrays and the CSR graph built on them.

pub mod csr;
pub mod offsets;

pub use csr::{CsrGraph, NodeId};
pub use offsets::{validate_offsets, OffsetArray};
