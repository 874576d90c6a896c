// evtx-triage - util/error.rs
//
// Typed error hierarchy with context-preserving error chains.
// Only fatal conditions surface here: a bad chunk, record, or payload is
// skipped locally and tracked via the skip counters on ParseResult, never
// raised as an error.

use std::fmt;
use std::io;

/// Top-level error type for all evtx-triage operations.
#[derive(Debug)]
pub enum EvtxTriageError {
    /// Container parsing failed fatally.
    Parse(ParseError),

    /// Event export failed.
    Export(ExportError),
}

impl fmt::Display for EvtxTriageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "Parse error: {e}"),
            Self::Export(e) => write!(f, "Export error: {e}"),
        }
    }
}

impl std::error::Error for EvtxTriageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Export(e) => Some(e),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse errors
// ---------------------------------------------------------------------------

/// Fatal container parsing failures.
///
/// Exactly two conditions abort a parse call: the input is not a recognised
/// container (signature check), or neither the structural path nor the
/// fallback synthesiser produced a single event.
#[derive(Debug)]
pub enum ParseError {
    /// The input is too short to hold the fixed file header. Raised before
    /// any chunk or record scanning occurs.
    Truncated {
        file: String,
        len: usize,
        required: usize,
    },

    /// The leading bytes do not carry the container signature. Raised before
    /// any offset arithmetic is trusted; there is no partial output.
    InvalidSignature { file: String, found: String },

    /// Both the structural pipeline and the fallback synthesiser produced
    /// zero events. Only raised after both paths were attempted.
    NoEventsFound { file: String },
}

impl ParseError {
    /// True for the signature-check failures (the "not a recognised
    /// container" family), false for `NoEventsFound`.
    pub fn is_format_error(&self) -> bool {
        matches!(self, Self::Truncated { .. } | Self::InvalidSignature { .. })
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Truncated {
                file,
                len,
                required,
            } => write!(
                f,
                "'{file}' is {len} bytes, shorter than the {required}-byte \
                 file header: not a recognised event log container"
            ),
            Self::InvalidSignature { file, found } => write!(
                f,
                "'{file}' does not start with the container signature \
                 (found {found:?}): not a recognised event log container"
            ),
            Self::NoEventsFound { file } => write!(
                f,
                "'{file}': no events recovered by structural parsing and \
                 none synthesised from raw bytes; the file may be empty or \
                 corrupted beyond recovery"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

impl From<ParseError> for EvtxTriageError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Export errors
// ---------------------------------------------------------------------------

/// Errors related to event export.
#[derive(Debug)]
pub enum ExportError {
    /// I/O error writing the export output.
    Io { source: io::Error },

    /// CSV serialisation error.
    Csv { source: csv::Error },

    /// JSON serialisation error.
    Json { source: serde_json::Error },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io { source } => write!(f, "Export I/O error: {source}"),
            Self::Csv { source } => write!(f, "CSV export error: {source}"),
            Self::Json { source } => write!(f, "JSON export error: {source}"),
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io { source } => Some(source),
            Self::Csv { source } => Some(source),
            Self::Json { source } => Some(source),
        }
    }
}

impl From<ExportError> for EvtxTriageError {
    fn from(e: ExportError) -> Self {
        Self::Export(e)
    }
}

/// Convenience type alias for evtx-triage results.
pub type Result<T> = std::result::Result<T, EvtxTriageError>;
