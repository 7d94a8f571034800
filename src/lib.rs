//! Song list deduplication library - shared modules for the CLI.

pub mod dedup;
pub mod errors;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod safety;
pub mod source;
