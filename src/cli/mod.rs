//! Command-line interface for islgen

pub mod commands;
pub mod handlers;
pub mod output;
