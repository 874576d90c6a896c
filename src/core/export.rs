// evtx-triage - core/export.rs
//
// CSV and JSON export of parsed events.
// Core layer: writes to any Write trait object.

use crate::core::model::ParsedEvent;
use crate::util::error::ExportError;
use std::io::Write;

/// Export events to CSV format.
///
/// Writes: record_id, timestamp, event_id, level, channel, computer,
/// category, risk_level, description, extraction_method, source_file
pub fn export_csv<W: Write>(events: &[ParsedEvent], writer: W) -> Result<usize, ExportError> {
    let mut csv_writer = csv::Writer::from_writer(writer);

    csv_writer
        .write_record([
            "record_id",
            "timestamp",
            "event_id",
            "level",
            "channel",
            "computer",
            "category",
            "risk_level",
            "description",
            "extraction_method",
            "source_file",
        ])
        .map_err(|e| ExportError::Csv { source: e })?;

    let mut count = 0;
    for event in events {
        let ts = event.timestamp.map(|t| t.to_rfc3339()).unwrap_or_default();

        csv_writer
            .write_record([
                &event.record_id.to_string(),
                &ts,
                event.event_id.as_deref().unwrap_or(""),
                event.level.as_deref().unwrap_or(""),
                event.channel.as_deref().unwrap_or(""),
                event.computer.as_deref().unwrap_or(""),
                event.classification.category,
                event.classification.risk_level.label(),
                &event.classification.description,
                event.extraction_method.label(),
                &event.source_file,
            ])
            .map_err(|e| ExportError::Csv { source: e })?;
        count += 1;
    }

    csv_writer
        .flush()
        .map_err(|e| ExportError::Io { source: e })?;

    Ok(count)
}

/// Export events to JSON format (pretty-printed array of objects).
pub fn export_json<W: Write>(events: &[ParsedEvent], writer: W) -> Result<usize, ExportError> {
    serde_json::to_writer_pretty(writer, events).map_err(|e| ExportError::Json { source: e })?;
    Ok(events.len())
}
