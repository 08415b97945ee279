//! Holder module orchestrator following the RSB module specification.

mod core;

pub use core::AnchorHolder;
