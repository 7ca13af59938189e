//! CLI command implementations.

pub(crate) mod channels;
pub(crate) mod search;
