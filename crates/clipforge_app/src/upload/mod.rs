//! Upload dispatch layer.
//!
//! A thin resilience wrapper around external platform uploaders: shared
//! content mapping, bounded parallel fan-out, and per-target retry with
//! exponential backoff. No platform protocol is implemented here.

mod content;
mod dispatcher;

pub use content::PostContent;
pub use dispatcher::{
    DryRunTarget, UploadDispatcher, UploadError, UploadOutcome, UploadTarget,
};
