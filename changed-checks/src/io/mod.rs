//! I/O adapters: git queries, config loading, tool execution.

pub mod config;
pub mod git;
pub mod process;
