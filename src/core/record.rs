// evtx-triage - core/record.rs
//
// Record extraction and decoding within a chunk's byte range.
//
// The marker scan tolerates arbitrary garbage: a marker miss advances the
// cursor by a fine-grained resync stride, a marker hit advances by the
// declared length with a forward-progress floor, so no input can stall the
// scan. Invalid candidates are discarded without raising an error.

use crate::core::classify;
use crate::core::fields;
use crate::core::model::{ChunkDescriptor, ExtractionMethod, ParsedEvent, RecordCandidate};
use crate::core::parser::ParseConfig;
use crate::util::constants;
use chrono::{DateTime, Utc};
use encoding_rs::{UTF_16LE, WINDOWS_1252};

// =============================================================================
// Bounds-checked little-endian reads
// =============================================================================

/// Reads a little-endian u32, or `None` if the read would run off the end.
pub(crate) fn read_u32_le(data: &[u8], offset: usize) -> Option<u32> {
    let bytes = data.get(offset..offset.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Reads a 64-bit value stored as two little-endian u32 halves, combined as
/// `low + high * 2^32`. The low half is at `offset`, the high at `offset+4`.
pub(crate) fn read_u64_halves(data: &[u8], offset: usize) -> Option<u64> {
    let low = read_u32_le(data, offset)? as u64;
    let high = read_u32_le(data, offset.checked_add(4)?)? as u64;
    Some(low + (high << 32))
}

// =============================================================================
// Record extraction
// =============================================================================

/// Outcome of scanning one chunk for records.
#[derive(Debug, Default)]
pub(crate) struct ChunkScan {
    /// Records decoded into events.
    pub extracted: usize,

    /// Marker hits whose candidate failed validation (length out of bounds
    /// or overrunning the chunk). Skipped, never fatal.
    pub skipped: usize,
}

/// Walks a chunk's byte range looking for record markers and decodes every
/// valid candidate into `events`.
///
/// Stops at the chunk end, at the per-chunk record ceiling, or once the
/// global event ceiling is reached.
pub(crate) fn extract_records(
    data: &[u8],
    chunk: &ChunkDescriptor,
    file_name: &str,
    config: &ParseConfig,
    events: &mut Vec<ParsedEvent>,
) -> ChunkScan {
    let chunk_end = chunk
        .offset
        .saturating_add(constants::CHUNK_SIZE)
        .min(data.len());
    let mut cursor = chunk.offset + constants::CHUNK_HEADER_SIZE;
    let mut scan = ChunkScan::default();

    while cursor + constants::RECORD_HEADER_SIZE <= chunk_end {
        if events.len() >= config.max_events || scan.extracted >= config.max_records_per_chunk {
            break;
        }

        match read_u32_le(data, cursor) {
            Some(constants::RECORD_SIGNATURE) => {
                let declared_len = read_u32_le(data, cursor + 4).unwrap_or(0) as usize;

                let candidate = RecordCandidate {
                    offset: cursor,
                    declared_len,
                    chunk_number: chunk.chunk_number,
                };

                if candidate_is_valid(&candidate, chunk_end) {
                    match decode_record(data, &candidate, file_name, config) {
                        Some(event) => {
                            events.push(event);
                            scan.extracted += 1;
                        }
                        None => scan.skipped += 1,
                    }
                } else {
                    tracing::trace!(
                        offset = candidate.offset,
                        declared_len,
                        "Record candidate rejected"
                    );
                    scan.skipped += 1;
                }

                // Forward-progress floor: a zero or garbage length field
                // still moves the cursor by a full header.
                cursor = cursor.saturating_add(declared_len.max(constants::MIN_RECORD_SIZE));
            }
            _ => cursor += constants::RECORD_RESYNC_STRIDE,
        }
    }

    scan
}

/// A candidate is valid only if its declared length is within the fixed
/// bounds and the whole record fits inside the chunk's byte range.
fn candidate_is_valid(candidate: &RecordCandidate, chunk_end: usize) -> bool {
    candidate.declared_len >= constants::MIN_RECORD_SIZE
        && candidate.declared_len <= constants::MAX_RECORD_SIZE
        && candidate.offset + candidate.declared_len <= chunk_end
}

// =============================================================================
// Record decoding
// =============================================================================

/// Decodes a valid candidate into a classified event.
///
/// Every structurally valid candidate produces an event; payload decoding is
/// bounded and best-effort, never a reason to drop the record. Returns
/// `None` only if the header reads run off the buffer, which validation has
/// already ruled out.
fn decode_record(
    data: &[u8],
    candidate: &RecordCandidate,
    file_name: &str,
    config: &ParseConfig,
) -> Option<ParsedEvent> {
    let record_id = read_u64_halves(data, candidate.offset + 8)?;
    let ticks = read_u64_halves(data, candidate.offset + 16)?;
    let timestamp = filetime_to_datetime(ticks);

    let payload_len = candidate.declared_len - constants::RECORD_HEADER_SIZE;
    let payload = &data[candidate.offset + constants::RECORD_HEADER_SIZE
        ..candidate.offset + candidate.declared_len];

    let (text, extraction_method) = decode_payload(payload, config);
    let clean = fields::clean_payload_text(&text);
    let extracted = fields::extract_fields(&clean);

    let classification =
        classify::classify(extracted.event_id.as_deref().unwrap_or("Unknown"));
    let security_context = classify::security_context(
        extracted.event_id.as_deref().unwrap_or("Unknown"),
        classification.risk_level,
    );

    Some(ParsedEvent {
        record_id,
        timestamp,
        chunk_number: candidate.chunk_number,
        source_file: file_name.to_string(),
        payload_len,
        payload_preview: clean
            .chars()
            .take(constants::PAYLOAD_PREVIEW_CHARS)
            .collect(),
        extraction_method,
        event_id: extracted.event_id,
        level: extracted.level.map(|l| classify::level_name(&l)),
        task: extracted.task,
        opcode: extracted.opcode,
        keywords: extracted.keywords,
        channel: extracted.channel,
        computer: extracted.computer,
        provider: extracted.provider,
        event_data: extracted.event_data,
        classification,
        security_context,
    })
}

/// Decodes payload bytes as text.
///
/// Primary: UTF-16LE over a bounded prefix. If that decode reports
/// malformed sequences, fall back to windows-1252 over a smaller bounded
/// prefix and tag the result so callers can tell best-effort decodes from
/// primary ones. windows-1252 maps every byte, so the fallback always
/// produces text.
fn decode_payload(payload: &[u8], config: &ParseConfig) -> (String, ExtractionMethod) {
    if payload.is_empty() {
        return (String::new(), ExtractionMethod::Structural);
    }

    // When the cap truncates, round down to a whole UTF-16 code unit so
    // the cut itself cannot fake a malformed sequence and reroute a valid
    // payload through the single-byte fallback. An odd-length payload is
    // left alone; its trailing byte is genuinely malformed.
    let mut wide_len = payload.len().min(config.max_wide_decode_bytes);
    if wide_len < payload.len() {
        wide_len &= !1;
    }
    let (decoded, had_errors) = UTF_16LE.decode_without_bom_handling(&payload[..wide_len]);
    if !had_errors {
        return (decoded.into_owned(), ExtractionMethod::Structural);
    }

    let narrow_prefix = &payload[..payload.len().min(config.max_narrow_decode_bytes)];
    let (decoded, _) = WINDOWS_1252.decode_without_bom_handling(narrow_prefix);
    (decoded.into_owned(), ExtractionMethod::EncodingFallback)
}

/// Converts a FILETIME tick count (100 ns intervals since 1601-01-01 UTC)
/// to a UTC calendar time.
///
/// Pure and deterministic: tick 0 maps to exactly 1601-01-01T00:00:00Z.
/// Every u64 tick count lands inside chrono's representable range (the
/// full span reaches only to year ~60056), so in practice this always
/// returns `Some`; the `Option` is kept as the natural shape of the
/// underlying conversion.
pub(crate) fn filetime_to_datetime(ticks: u64) -> Option<DateTime<Utc>> {
    let ms_since_1601 = (ticks / constants::FILETIME_TICKS_PER_MS) as i64;
    let unix_ms = ms_since_1601 - constants::FILETIME_UNIX_OFFSET_MS;
    DateTime::from_timestamp_millis(unix_ms)
}
