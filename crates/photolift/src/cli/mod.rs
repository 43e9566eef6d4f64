//! CLI commands

pub mod error;
pub mod init;
pub mod plan;
