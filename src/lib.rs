//! Deep Intelligence client for Rust
//!
//! Umbrella crate over [`deepint_sdk`]; see [`DeepintClient`] to get started.

pub use deepint_sdk::*;
