//! Type definitions module.
//!
//! Contains shared types used across the application.

pub mod block;
pub mod transaction;

pub use block::*;
pub use transaction::*;
