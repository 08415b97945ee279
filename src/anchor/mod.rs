//! Anchor boundary module orchestrator following the RSB module
//! specification.

mod core;

pub use core::{Anchor, AnchorHandle, AnchorRuntime};
