pub mod ids;
pub mod parse;
pub mod tui;
