//! clipforge core - content transformation pipeline for short-form clips.
//!
//! This crate contains all transformation logic with zero I/O dependencies:
//! timeline fusion, content policy, layout planning, render composition,
//! and the job orchestrator. External engines (speech-to-text, diarization,
//! media rendering) are reached only through the traits in
//! [`orchestrator`]; process spawning and network belong to sibling crates.

pub mod compose;
pub mod config;
pub mod fusion;
pub mod layout;
pub mod logging;
pub mod models;
pub mod orchestrator;
pub mod policy;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_returns_value() {
        assert!(!version().is_empty());
    }
}
