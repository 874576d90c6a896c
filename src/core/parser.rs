// evtx-triage - core/parser.rs
//
// Top-level parse pipeline: signature validation, chunk scanning, and the
// hand-off to fallback synthesis when the structural path recovers nothing.
// Core layer: accepts a byte slice, never touches the filesystem.
//
// Error policy is "skip and continue, never abort the file": a chunk or
// record that fails to decode is counted and stepped over, and the only
// fatal outcomes are a failed signature check and a doubly-empty result.

use crate::core::fallback;
use crate::core::model::{ChunkDescriptor, ParsedEvent};
use crate::core::record;
use crate::util::constants;
use crate::util::error::ParseError;
use serde::{Deserialize, Serialize};

/// Configuration for a parse call.
///
/// The safety ceilings are explicit here rather than hidden constants so
/// embedding applications can tune them and tests can exercise boundary
/// behaviour cheaply. Defaults come from `util::constants`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Hard ceiling on total events produced by the structural path.
    pub max_events: usize,

    /// Ceiling on records extracted from a single chunk.
    pub max_records_per_chunk: usize,

    /// Maximum payload bytes fed to the primary (UTF-16LE) decode.
    pub max_wide_decode_bytes: usize,

    /// Maximum payload bytes fed to the fallback (windows-1252) decode.
    pub max_narrow_decode_bytes: usize,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_events: constants::DEFAULT_MAX_EVENTS,
            max_records_per_chunk: constants::DEFAULT_MAX_RECORDS_PER_CHUNK,
            max_wide_decode_bytes: constants::DEFAULT_MAX_WIDE_DECODE_BYTES,
            max_narrow_decode_bytes: constants::DEFAULT_MAX_NARROW_DECODE_BYTES,
        }
    }
}

/// Result of parsing a single container.
#[derive(Debug)]
pub struct ParseResult {
    /// Recovered events, in scan order. Never empty: a successful return
    /// carries at least one structural or synthetic event.
    pub events: Vec<ParsedEvent>,

    /// Chunks whose headers decoded and whose ranges were scanned.
    pub chunks_scanned: usize,

    /// Chunk signature hits whose headers could not be decoded.
    pub chunks_skipped: usize,

    /// Record marker hits whose candidates failed validation.
    pub records_skipped: usize,
}

/// Parse one uploaded container.
///
/// `file_name` is provenance only — it tags the output events and error
/// messages, and is never consulted for parsing decisions.
///
/// Returns a non-empty event sequence (possibly entirely synthetic, but
/// labelled via `extraction_method`), or one of the two fatal error kinds.
pub fn parse_container(
    data: &[u8],
    file_name: &str,
    config: &ParseConfig,
) -> Result<ParseResult, ParseError> {
    validate_signature(data, file_name)?;

    let mut result = scan_chunks(data, file_name, config);

    tracing::debug!(
        file = file_name,
        events = result.events.len(),
        chunks_scanned = result.chunks_scanned,
        chunks_skipped = result.chunks_skipped,
        records_skipped = result.records_skipped,
        "Structural parse complete"
    );

    if result.events.is_empty() {
        tracing::debug!(
            file = file_name,
            "Structural parse produced no events; synthesising from raw bytes"
        );
        result.events = fallback::synthesize_events(data, file_name);
    }

    if result.events.is_empty() {
        return Err(ParseError::NoEventsFound {
            file: file_name.to_string(),
        });
    }

    Ok(result)
}

// =============================================================================
// Signature validation
// =============================================================================

/// Confirms the byte stream is plausibly a supported container before any
/// offset arithmetic is trusted. This is the single point that prevents
/// treating arbitrary uploads as valid input.
fn validate_signature(data: &[u8], file_name: &str) -> Result<(), ParseError> {
    if data.len() < constants::FILE_HEADER_SIZE {
        return Err(ParseError::Truncated {
            file: file_name.to_string(),
            len: data.len(),
            required: constants::FILE_HEADER_SIZE,
        });
    }

    if !data.starts_with(constants::FILE_SIGNATURE) {
        return Err(ParseError::InvalidSignature {
            file: file_name.to_string(),
            found: String::from_utf8_lossy(&data[..8]).into_owned(),
        });
    }

    Ok(())
}

// =============================================================================
// Chunk scanning
// =============================================================================

/// Walks the file at fixed strides from the end of the file header, locating
/// self-describing chunks and handing each to record extraction.
///
/// A non-matching position advances by the probe stride, tolerating padding
/// and unknown sub-structures. A chunk that fails to decode is skipped; the
/// scan of subsequent chunks continues.
fn scan_chunks(data: &[u8], file_name: &str, config: &ParseConfig) -> ParseResult {
    let mut result = ParseResult {
        events: Vec::new(),
        chunks_scanned: 0,
        chunks_skipped: 0,
        records_skipped: 0,
    };

    let mut offset = constants::FILE_HEADER_SIZE;
    while offset + constants::CHUNK_SCAN_TAIL_MARGIN <= data.len() {
        if result.events.len() >= config.max_events {
            tracing::debug!(
                file = file_name,
                max_events = config.max_events,
                "Event ceiling reached; stopping chunk scan"
            );
            break;
        }

        if data[offset..].starts_with(constants::CHUNK_SIGNATURE) {
            match decode_chunk_header(data, offset) {
                Some(chunk) => {
                    let scan =
                        record::extract_records(data, &chunk, file_name, config, &mut result.events);
                    result.chunks_scanned += 1;
                    result.records_skipped += scan.skipped;
                    tracing::trace!(
                        chunk_number = chunk.chunk_number,
                        offset,
                        extracted = scan.extracted,
                        skipped = scan.skipped,
                        "Chunk scanned"
                    );
                }
                None => result.chunks_skipped += 1,
            }
            offset += constants::CHUNK_SIZE;
        } else {
            offset += constants::CHUNK_PROBE_STRIDE;
        }
    }

    result
}

/// Decodes a chunk header at `offset`: chunk number, first and last record
/// numbers, each stored as two little-endian u32 halves.
fn decode_chunk_header(data: &[u8], offset: usize) -> Option<ChunkDescriptor> {
    Some(ChunkDescriptor {
        offset,
        chunk_number: record::read_u64_halves(data, offset + 16)?,
        first_record: record::read_u64_halves(data, offset + 24)?,
        last_record: record::read_u64_halves(data, offset + 32)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::ExtractionMethod;

    fn signed_buffer(len: usize) -> Vec<u8> {
        let mut data = vec![0u8; len];
        data[..7].copy_from_slice(constants::FILE_SIGNATURE);
        data
    }

    // -------------------------------------------------------------------------
    // Signature validation
    // -------------------------------------------------------------------------

    /// Inputs shorter than the file header fail before any scanning.
    #[test]
    fn test_short_input_is_truncated_error() {
        for len in [0, 1, 7, 8, 512, constants::FILE_HEADER_SIZE - 1] {
            let data = vec![0u8; len];
            let result = parse_container(&data, "short.evtx", &ParseConfig::default());
            assert!(
                matches!(result, Err(ParseError::Truncated { .. })),
                "len {len} should be Truncated, got {result:?}"
            );
        }
    }

    #[test]
    fn test_wrong_signature_is_rejected() {
        let mut data = vec![0u8; constants::FILE_HEADER_SIZE];
        data[..4].copy_from_slice(b"PK\x03\x04");
        let result = parse_container(&data, "archive.zip", &ParseConfig::default());
        assert!(matches!(result, Err(ParseError::InvalidSignature { .. })));
    }

    /// A signed buffer just under the header size is still truncated — the
    /// length check runs before the signature check.
    #[test]
    fn test_signed_but_short_is_truncated() {
        let mut data = vec![0u8; 64];
        data[..7].copy_from_slice(constants::FILE_SIGNATURE);
        let result = parse_container(&data, "stub.evtx", &ParseConfig::default());
        assert!(matches!(result, Err(ParseError::Truncated { .. })));
    }

    // -------------------------------------------------------------------------
    // Chunk scanning
    // -------------------------------------------------------------------------

    #[test]
    fn test_zero_chunks_falls_back_to_synthesis() {
        let data = signed_buffer(8192);
        let result = parse_container(&data, "empty.evtx", &ParseConfig::default()).unwrap();

        assert_eq!(result.chunks_scanned, 0);
        assert!(!result.events.is_empty());
        assert!(result
            .events
            .iter()
            .all(|e| e.extraction_method == ExtractionMethod::BinaryAnalysis));
    }

    #[test]
    fn test_chunk_header_decoding() {
        let mut data = vec![0u8; 64];
        data[..7].copy_from_slice(constants::CHUNK_SIGNATURE);
        data[16..20].copy_from_slice(&3u32.to_le_bytes()); // chunk number low
        data[20..24].copy_from_slice(&1u32.to_le_bytes()); // chunk number high
        data[24..28].copy_from_slice(&100u32.to_le_bytes()); // first record low
        data[32..36].copy_from_slice(&200u32.to_le_bytes()); // last record low

        let chunk = decode_chunk_header(&data, 0).unwrap();
        assert_eq!(chunk.chunk_number, 3 + (1u64 << 32));
        assert_eq!(chunk.first_record, 100);
        assert_eq!(chunk.last_record, 200);
    }

    #[test]
    fn test_config_defaults_track_constants() {
        let config = ParseConfig::default();
        assert_eq!(config.max_events, constants::DEFAULT_MAX_EVENTS);
        assert_eq!(
            config.max_records_per_chunk,
            constants::DEFAULT_MAX_RECORDS_PER_CHUNK
        );
        assert_eq!(
            config.max_wide_decode_bytes,
            constants::DEFAULT_MAX_WIDE_DECODE_BYTES
        );
        assert_eq!(
            config.max_narrow_decode_bytes,
            constants::DEFAULT_MAX_NARROW_DECODE_BYTES
        );
    }

    /// ParseConfig deserialises with partial overrides (embedding
    /// applications carry it inside their own config files).
    #[test]
    fn test_config_partial_deserialisation() {
        let config: ParseConfig = serde_json::from_str(r#"{"max_events": 5}"#).unwrap();
        assert_eq!(config.max_events, 5);
        assert_eq!(
            config.max_records_per_chunk,
            constants::DEFAULT_MAX_RECORDS_PER_CHUNK
        );
    }
}
