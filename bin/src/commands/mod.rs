//! CLI command implementations.

pub(crate) mod extract;
pub(crate) mod info;
pub(crate) mod list;
