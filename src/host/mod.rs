//! Host identity module orchestrator following the RSB module
//! specification.

mod core;

pub use core::{Host, HostId, HostTag, concrete_type_of};
