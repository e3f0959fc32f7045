//! Environment file sources.

mod local;
mod memory;

pub use local::LocalEnvSource;
pub use memory::MemoryEnvSource;
