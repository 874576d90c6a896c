// evtx-triage - util/constants.rs
//
// Single source of truth for all named constants, limits, and defaults.
// Every magic number in the container format and every resource ceiling
// lives here; the tunable ceilings are additionally surfaced on
// `core::parser::ParseConfig` so callers and tests can override them.

// =============================================================================
// Crate metadata
// =============================================================================

/// Crate display name.
pub const CRATE_NAME: &str = "evtx-triage";

/// Current crate version.
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

// =============================================================================
// Container layout
// =============================================================================

/// Literal prefix of a recognised container: the first 8 bytes of the file
/// decode as text starting with this.
pub const FILE_SIGNATURE: &[u8] = b"ElfFile";

/// Size of the fixed file header in bytes. Chunk scanning starts immediately
/// after it. Inputs shorter than this cannot contain a chunk and are rejected
/// by the signature validator before any offset arithmetic.
pub const FILE_HEADER_SIZE: usize = 4096;

/// Literal prefix of a chunk header.
pub const CHUNK_SIGNATURE: &[u8] = b"ElfChnk";

/// Fixed span of a chunk in bytes, signature included.
pub const CHUNK_SIZE: usize = 65536;

/// Size of the chunk header in bytes; record scanning within a chunk starts
/// immediately after it.
pub const CHUNK_HEADER_SIZE: usize = 512;

/// Stride used to probe forward when the bytes at the cursor are not a chunk
/// signature. Tolerates padding and unknown sub-structures between chunks.
pub const CHUNK_PROBE_STRIDE: usize = 512;

/// Safety margin at end-of-file: chunk scanning stops once fewer than this
/// many bytes remain, since no decodable chunk header can fit there.
pub const CHUNK_SCAN_TAIL_MARGIN: usize = 512;

/// Record start marker, read as a little-endian u32 at a candidate offset.
pub const RECORD_SIGNATURE: u32 = 0x2A2A_0000;

/// Fixed record header size: marker (4) + declared length (4) + record id
/// (8) + FILETIME (8). Payload bytes follow.
pub const RECORD_HEADER_SIZE: usize = 24;

/// Minimum acceptable declared record length (a bare header).
pub const MIN_RECORD_SIZE: usize = 24;

/// Maximum acceptable declared record length (one full chunk).
pub const MAX_RECORD_SIZE: usize = 65536;

/// Cursor advance on a record marker miss. Fine-grained so a corrupted
/// length field cannot make the scanner walk past a real record start.
pub const RECORD_RESYNC_STRIDE: usize = 4;

// =============================================================================
// Parsing limits
// =============================================================================

/// Default hard ceiling on the total number of events produced by the
/// structural path. Bounds memory and scan time on adversarial or merely
/// huge files.
pub const DEFAULT_MAX_EVENTS: usize = 1_000;

/// Default ceiling on records extracted from a single chunk. A chunk whose
/// bytes happen to contain many false-positive markers cannot dominate the
/// result set.
pub const DEFAULT_MAX_RECORDS_PER_CHUNK: usize = 100;

/// Default maximum payload bytes fed to the primary (UTF-16LE) decode.
/// Caps work on records with huge declared lengths.
pub const DEFAULT_MAX_WIDE_DECODE_BYTES: usize = 4096;

/// Default maximum payload bytes fed to the fallback (windows-1252) decode.
pub const DEFAULT_MAX_NARROW_DECODE_BYTES: usize = 1024;

/// Maximum characters of cleaned payload text retained on an event as a
/// preview for display and diagnostics.
pub const PAYLOAD_PREVIEW_CHARS: usize = 500;

// =============================================================================
// Timestamp conversion
// =============================================================================

/// FILETIME ticks (100 ns intervals) per millisecond.
pub const FILETIME_TICKS_PER_MS: u64 = 10_000;

/// Milliseconds between the FILETIME epoch (1601-01-01T00:00:00Z) and the
/// Unix epoch (1970-01-01T00:00:00Z).
pub const FILETIME_UNIX_OFFSET_MS: i64 = 11_644_473_600_000;

// =============================================================================
// Fallback synthesis limits
// =============================================================================

/// Bytes of input per synthesised event; the count is proportional to file
/// size between the floor and ceiling below.
pub const FALLBACK_BYTES_PER_EVENT: usize = 1_000;

/// Minimum number of synthesised events.
pub const FALLBACK_MIN_EVENTS: usize = 10;

/// Maximum number of synthesised events.
pub const FALLBACK_MAX_EVENTS: usize = 200;

/// Byte-sampling spread for each synthetic index: bytes are sampled at the
/// base offset, base + this, and base + twice this (clamped to the buffer).
pub const FALLBACK_SAMPLE_SPREAD: usize = 50;

/// Tail margin excluded from fallback base offsets so the spread samples
/// stay inside the buffer for all indices.
pub const FALLBACK_TAIL_MARGIN: usize = 100;

// =============================================================================
// Logging
// =============================================================================

/// Default log level for the tracing subscriber.
pub const DEFAULT_LOG_LEVEL: &str = "info";
