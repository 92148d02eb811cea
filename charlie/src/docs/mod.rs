//! Documentation that doesn't belong to any one crate.

pub mod api;
pub mod testing;
