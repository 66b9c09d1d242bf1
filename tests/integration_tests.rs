//! Integration tests for askframe.
//!
//! Everything runs offline: the sample dataset or temp files for data, the
//! mock client or a local `httpmock` server for the model.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
