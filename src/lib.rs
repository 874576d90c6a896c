// evtx-triage - lib.rs
//
// Resilient Windows Event Log (.evtx) container parser and security event
// classifier: bytes in, an ordered sequence of classified events out.
//
// The pipeline decodes the container defensively (file -> chunks -> records
// -> embedded markup) with bounded resource usage, skip-and-continue error
// handling at every level, and a synthetic fallback path so callers never
// receive a silent empty success. See `core::parser::parse_container`.

pub mod core;
pub mod util;

pub use crate::core::model::{ExtractionMethod, ParsedEvent, RiskLevel};
pub use crate::core::parser::{parse_container, ParseConfig, ParseResult};
pub use crate::util::error::{EvtxTriageError, ParseError};
