//! Shared pieces of the `takehost` and `takehost-batch` binaries.

pub mod common;
