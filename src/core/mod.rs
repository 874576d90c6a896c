// evtx-triage - core/mod.rs
//
// Core parsing and classification layer.
// Accepts byte slices, produces classified events; no filesystem access.

pub mod classify;
pub mod export;
pub mod fallback;
pub mod fields;
pub mod model;
pub mod parser;
pub mod record;
