//! CLI commands

pub mod call;
pub mod listing;
pub mod open;
pub mod wait;
