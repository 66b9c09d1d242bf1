//! Integration tests for askframe.

pub mod gemini_test;
pub mod loader_test;
pub mod pipeline_test;
