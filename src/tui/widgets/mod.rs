//! TUI widgets for askframe.

pub mod header;
pub mod input;
pub mod output;
pub mod spinner;
pub mod table;
