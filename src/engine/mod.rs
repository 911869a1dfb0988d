//! Streaming digest engine.
//!
//! - [`StreamDigestEngine`] - Stateful engine with `begin_file()`/`ingest()`/`end_file()`/`finalize()` API
//! - [`BoundaryPolicy`] - How a piece window behaves at file boundaries

#[allow(clippy::module_inception)]
mod engine;
mod window;

pub use engine::{CrossFilePieceStream, FileDigestResult, StreamDigestEngine};
pub use window::BoundaryPolicy;
