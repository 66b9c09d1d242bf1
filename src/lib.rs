//! askframe - ask natural-language questions about a tabular dataset.
//!
//! This library exposes the core modules for use in integration tests.

pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod error;
pub mod llm;
pub mod logging;
pub mod output;
pub mod query;
pub mod tui;
