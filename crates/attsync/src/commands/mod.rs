//! CLI command implementations.

pub(crate) mod sync;

pub(crate) use sync::SyncArgs;
