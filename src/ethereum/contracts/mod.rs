//! Smart contract bindings.

pub mod counter;

pub use counter::ICounter;
