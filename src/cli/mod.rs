pub mod commands;
pub mod ui;

pub use commands::{RunSummary, Source};
pub use ui::Output;
