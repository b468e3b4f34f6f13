pub mod config;
pub mod run;

pub use run::{Digest, RunSummary, Source, print_summary};
