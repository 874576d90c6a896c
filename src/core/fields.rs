// evtx-triage - core/fields.rs
//
// Field extraction from decoded record payload text.
//
// The payload is only lightly structured XML-ish markup with no schema
// guarantee, so extraction is pattern-based and per-field best-effort: a
// field that fails to match is simply absent, never an error.

use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// Header tags extracted into the typed fields of `ExtractedFields`.
const HEADER_TAGS: &[&str] = &[
    "EventID",
    "Level",
    "Task",
    "Opcode",
    "Keywords",
    "Channel",
    "Computer",
    "Provider Name",
];

/// Well-known data field names filled by the secondary pass when the
/// generic `<Data Name=...>` pass did not already capture them.
const COMMON_DATA_FIELDS: &[&str] = &[
    "SubjectUserName",
    "TargetUserName",
    "LogonType",
    "IpAddress",
    "WorkstationName",
    "ProcessName",
    "CommandLine",
    "ParentProcessName",
    "SourceNetworkAddress",
    "TargetDomainName",
    "SubjectDomainName",
    "Status",
    "SubStatus",
    "FailureReason",
];

/// The fixed set of named fields pulled from a payload, plus the open
/// name/value map for everything else.
#[derive(Debug, Default, Clone)]
pub struct ExtractedFields {
    pub event_id: Option<String>,
    pub level: Option<String>,
    pub task: Option<String>,
    pub opcode: Option<String>,
    pub keywords: Option<String>,
    pub channel: Option<String>,
    pub computer: Option<String>,
    pub provider: Option<String>,
    pub event_data: BTreeMap<String, String>,
}

/// Strips embedded NUL bytes and surrounding whitespace from decoded
/// payload text. UTF-16LE payloads of single-byte text decode to strings
/// riddled with NULs; the extraction patterns require them gone.
pub fn clean_payload_text(raw: &str) -> String {
    raw.replace('\u{0}', "").trim().to_string()
}

/// Extracts the fixed header fields and the free-text data map from cleaned
/// payload text.
pub fn extract_fields(text: &str) -> ExtractedFields {
    let mut fields = ExtractedFields {
        event_id: extract_value(text, "EventID"),
        level: extract_value(text, "Level"),
        task: extract_value(text, "Task"),
        opcode: extract_value(text, "Opcode"),
        keywords: extract_value(text, "Keywords"),
        channel: extract_value(text, "Channel"),
        computer: extract_value(text, "Computer"),
        provider: extract_value(text, "Provider Name"),
        event_data: extract_event_data(text),
    };

    // Secondary pass: fill well-known data fields the generic pattern
    // missed (value outside a <Data> element, or attribute form).
    for name in COMMON_DATA_FIELDS {
        if !fields.event_data.contains_key(*name) {
            if let Some(value) = extract_value(text, name) {
                fields.event_data.insert((*name).to_string(), value);
            }
        }
    }

    fields
}

/// Extracts a single named value by trying, in order: markup pair,
/// open-tag-only capture, double-quoted attribute, single-quoted attribute.
/// First match wins; the value is trimmed.
///
/// Only the fixed tag vocabulary above is supported — unknown names return
/// `None` rather than compiling patterns at extraction time.
pub fn extract_value(text: &str, tag: &str) -> Option<String> {
    let patterns = tag_patterns().get(tag)?;
    for pattern in patterns {
        if let Some(caps) = pattern.captures(text) {
            if let Some(m) = caps.get(1) {
                let value = m.as_str().trim();
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Extracts every `<Data Name="...">value<` fragment into an ordered map.
/// Later duplicates overwrite earlier ones, matching the reference
/// behaviour of repeated assignment.
fn extract_event_data(text: &str) -> BTreeMap<String, String> {
    static DATA_PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = DATA_PATTERN.get_or_init(|| {
        Regex::new(r#"(?i)<Data Name="([^"]+)"[^>]*>([^<]*)<"#)
            .expect("extract_event_data: invalid regex")
    });

    let mut data = BTreeMap::new();
    for caps in pattern.captures_iter(text) {
        if let (Some(name), Some(value)) = (caps.get(1), caps.get(2)) {
            data.insert(name.as_str().to_string(), value.as_str().to_string());
        }
    }
    data
}

/// Pre-compiled pattern set per supported tag name.
///
/// Compiled once on first use. The patterns are exercised by the unit tests
/// below, so a pattern mistake shows up as a failing test rather than a
/// runtime panic.
fn tag_patterns() -> &'static HashMap<&'static str, Vec<Regex>> {
    static PATTERNS: OnceLock<HashMap<&'static str, Vec<Regex>>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        fn re(pat: String) -> Regex {
            Regex::new(&pat).expect("tag_patterns: invalid regex")
        }

        let mut map = HashMap::new();
        for tag in HEADER_TAGS.iter().chain(COMMON_DATA_FIELDS.iter()) {
            map.insert(
                *tag,
                vec![
                    re(format!("(?i)<{tag}[^>]*>([^<]+)</{tag}>")),
                    re(format!("(?i)<{tag}[^>]*>([^<]+)")),
                    re(format!(r#"(?i){tag}="([^"]+)""#)),
                    re(format!("(?i){tag}='([^']+)'")),
                ],
            );
        }
        map
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"<Event><System><Provider Name="Microsoft-Windows-Security-Auditing"/><EventID>4625</EventID><Level>0</Level><Task>12544</Task><Opcode>0</Opcode><Keywords>0x8010000000000000</Keywords><Channel>Security</Channel><Computer>WORKSTATION-01</Computer></System><EventData><Data Name="TargetUserName">admin</Data><Data Name="IpAddress">10.0.0.5</Data><Data Name="Status">0xc000006d</Data></EventData></Event>"#;

    #[test]
    fn test_extract_header_fields() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields.event_id.as_deref(), Some("4625"));
        assert_eq!(fields.level.as_deref(), Some("0"));
        assert_eq!(fields.task.as_deref(), Some("12544"));
        assert_eq!(fields.opcode.as_deref(), Some("0"));
        assert_eq!(fields.keywords.as_deref(), Some("0x8010000000000000"));
        assert_eq!(fields.channel.as_deref(), Some("Security"));
        assert_eq!(fields.computer.as_deref(), Some("WORKSTATION-01"));
        assert_eq!(
            fields.provider.as_deref(),
            Some("Microsoft-Windows-Security-Auditing")
        );
    }

    #[test]
    fn test_extract_event_data_map() {
        let fields = extract_fields(SAMPLE);
        assert_eq!(fields.event_data.get("TargetUserName").unwrap(), "admin");
        assert_eq!(fields.event_data.get("IpAddress").unwrap(), "10.0.0.5");
        assert_eq!(fields.event_data.get("Status").unwrap(), "0xc000006d");
    }

    /// The four patterns are tried in order; the markup pair wins over the
    /// attribute forms.
    #[test]
    fn test_pattern_priority_markup_pair_first() {
        let text = r#"<Channel>Security</Channel> Channel="Application""#;
        assert_eq!(extract_value(text, "Channel").as_deref(), Some("Security"));
    }

    #[test]
    fn test_attribute_forms() {
        assert_eq!(
            extract_value(r#"<Data Status="0x0"/>"#, "Status").as_deref(),
            Some("0x0")
        );
        assert_eq!(
            extract_value("<Data Status='0x0'/>", "Status").as_deref(),
            Some("0x0")
        );
    }

    #[test]
    fn test_open_tag_only_capture() {
        // Truncated payload: closing tag lost to corruption.
        let text = "<EventID>4688 and then garbage";
        assert_eq!(
            extract_value(text, "EventID").as_deref(),
            Some("4688 and then garbage")
        );
    }

    #[test]
    fn test_missing_fields_are_absent_not_errors() {
        let fields = extract_fields("no markup at all");
        assert!(fields.event_id.is_none());
        assert!(fields.channel.is_none());
        assert!(fields.event_data.is_empty());
    }

    #[test]
    fn test_unknown_tag_returns_none() {
        assert!(extract_value(SAMPLE, "NotARealTag").is_none());
    }

    #[test]
    fn test_secondary_pass_fills_common_fields() {
        // TargetUserName appears as a bare markup pair, not a <Data> element;
        // the generic pass misses it, the secondary pass picks it up.
        let text = "<TargetUserName>svc-backup</TargetUserName>";
        let fields = extract_fields(text);
        assert_eq!(
            fields.event_data.get("TargetUserName").unwrap(),
            "svc-backup"
        );
    }

    #[test]
    fn test_clean_payload_text_strips_nuls() {
        let dirty = "\u{0}  <EventID>4624</EventID>\u{0}\u{0}  ";
        let clean = clean_payload_text(dirty);
        assert_eq!(clean, "<EventID>4624</EventID>");
    }

    #[test]
    fn test_values_are_trimmed() {
        let text = "<Computer>  HOST-7  </Computer>";
        assert_eq!(extract_value(text, "Computer").as_deref(), Some("HOST-7"));
    }
}
