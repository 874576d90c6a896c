// evtx-triage - core/model.rs
//
// Core data model types. Pure data definitions with no I/O.
//
// ParsedEvent is the durable output unit; the chunk and record descriptors
// are transient scan products owned by the loop iteration that produced them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

// =============================================================================
// Parsed Event (normalised output of the whole pipeline)
// =============================================================================

/// A single classified event recovered from the container.
///
/// Produced once per structurally valid record, or once per synthetic
/// fallback entry, and immutable thereafter. The serde field names are the
/// wire vocabulary the downstream enrichment services key on.
#[derive(Debug, Clone, Serialize)]
pub struct ParsedEvent {
    /// 64-bit record identifier, assembled from two little-endian u32
    /// halves as `low + high * 2^32`. Synthetic events number from 1.
    pub record_id: u64,

    /// Record timestamp in UTC, converted from the on-disk FILETIME tick
    /// count. `None` when the tick count is outside the representable
    /// calendar range, and always `None` for synthetic events.
    pub timestamp: Option<DateTime<Utc>>,

    /// Number of the chunk this record was extracted from (0 for synthetic
    /// events, which have no owning chunk).
    pub chunk_number: u64,

    /// Declared name of the uploaded file. Provenance only; never consulted
    /// for parsing decisions.
    pub source_file: String,

    /// Raw payload length in bytes (declared record length minus the fixed
    /// header), before any decode bounding.
    pub payload_len: usize,

    /// Bounded preview of the cleaned payload text, for display and
    /// diagnostics.
    pub payload_preview: String,

    /// Which extraction path produced this event.
    pub extraction_method: ExtractionMethod,

    /// Windows event type code, e.g. "4625".
    pub event_id: Option<String>,

    /// Severity level name (LogAlways, Critical, Error, Warning,
    /// Information, Verbose, or the raw code when out of range).
    pub level: Option<String>,

    /// Task category.
    pub task: Option<String>,

    /// Opcode value.
    pub opcode: Option<String>,

    /// Keywords bitmask, as text.
    pub keywords: Option<String>,

    /// Log channel, e.g. "Security".
    pub channel: Option<String>,

    /// Computer name the event was generated on.
    pub computer: Option<String>,

    /// Event provider name.
    pub provider: Option<String>,

    /// Free-text name/value pairs from the payload's data fragments.
    /// Ordered map so repeated parses serialise identically.
    pub event_data: BTreeMap<String, String>,

    /// Static classification of the event type code. Never absent: unknown
    /// codes carry the default low-risk "System" entry.
    #[serde(flatten)]
    pub classification: Classification,

    /// Boolean security-context flags for fast downstream filtering.
    pub security_context: SecurityContext,
}

// =============================================================================
// Extraction method (provenance marker)
// =============================================================================

/// Which path produced an event. The serde tags are load-bearing: downstream
/// consumers distinguish best-effort output by these exact strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Primary path: structural parse, UTF-16LE payload decode.
    Structural,

    /// Structural parse, but the payload only decoded under the single-byte
    /// fallback encoding.
    EncodingFallback,

    /// Fully synthetic entry derived from raw byte statistics because the
    /// structural pipeline recovered nothing.
    BinaryAnalysis,
}

impl ExtractionMethod {
    /// The wire tag, identical to the serde representation.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Structural => "structural",
            Self::EncodingFallback => "encoding_fallback",
            Self::BinaryAnalysis => "binary_analysis",
        }
    }
}

impl std::fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Risk level
// =============================================================================

/// Classifier risk levels, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
    #[default]
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Human-readable label for display.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Classification
// =============================================================================

/// Static classification of an event type code: human category, risk level,
/// and description. Total — every code classifies, unknown ones to the
/// default "System"/low entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Classification {
    /// Human category: Authentication, Privilege, Process, Network, File,
    /// or System.
    pub category: &'static str,

    /// Risk level for triage ordering.
    pub risk_level: RiskLevel,

    /// Human description of the event type.
    pub description: String,
}

// =============================================================================
// Security context
// =============================================================================

/// Boolean membership flags of an event type code in the five fixed
/// security-relevant id sets, plus the risk level for convenience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SecurityContext {
    pub is_authentication_event: bool,
    pub is_process_event: bool,
    pub is_privilege_event: bool,
    pub is_network_event: bool,
    pub is_file_event: bool,
    pub risk_level: RiskLevel,
}

// =============================================================================
// Transient scan descriptors
// =============================================================================

/// A located chunk, decoded from its self-describing header. Created by the
/// chunk scanner and consumed immediately by record extraction.
#[derive(Debug, Clone, Copy)]
pub struct ChunkDescriptor {
    /// Byte offset of the chunk signature within the file.
    pub offset: usize,

    /// 64-bit chunk sequence number (`low + high * 2^32`).
    pub chunk_number: u64,

    /// First record number the chunk claims to hold.
    pub first_record: u64,

    /// Last record number the chunk claims to hold.
    pub last_record: u64,
}

/// A record candidate located by the marker scan, not yet decoded. Valid
/// only if its declared length is within bounds and the record fits entirely
/// inside its chunk's byte range.
#[derive(Debug, Clone, Copy)]
pub struct RecordCandidate {
    /// Byte offset of the record marker within the file.
    pub offset: usize,

    /// Declared record length in bytes, header included.
    pub declared_len: usize,

    /// Number of the owning chunk.
    pub chunk_number: u64,
}
