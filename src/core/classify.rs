// evtx-triage - core/classify.rs
//
// Pure classification of Windows event type codes: category, risk level,
// description, severity level names, and security-context set membership.
// Total functions — classification never fails and is never empty.

use crate::core::model::{Classification, RiskLevel, SecurityContext};

// =============================================================================
// Security-relevant id sets
// =============================================================================
//
// These deliberately differ slightly from the classification table below
// (e.g. 4674 and 5158 flag but do not classify); downstream filters rely on
// the set membership, triage ordering relies on the table.

/// Authentication events: logon, logoff, explicit-credential logon.
pub const AUTHENTICATION_EVENT_IDS: &[&str] = &["4624", "4625", "4634", "4647", "4648"];

/// Process lifecycle events.
pub const PROCESS_EVENT_IDS: &[&str] = &["4688", "4689"];

/// Privilege use events.
pub const PRIVILEGE_EVENT_IDS: &[&str] = &["4672", "4673", "4674"];

/// Windows Filtering Platform network events.
pub const NETWORK_EVENT_IDS: &[&str] = &["5156", "5157", "5158"];

/// Object/file access events.
pub const FILE_EVENT_IDS: &[&str] = &["4656", "4658", "4660", "4663"];

// =============================================================================
// Classification
// =============================================================================

/// Maps an event type code to its category, risk level, and description.
///
/// Backed by a static table of well-known Security and System channel event
/// ids. Unknown codes resolve to a default low-risk "System" entry carrying
/// the code itself in the description, so the result is never absent.
pub fn classify(event_id: &str) -> Classification {
    let (category, risk_level, description) = match event_id {
        "4624" => ("Authentication", RiskLevel::Low, "An account was successfully logged on"),
        "4625" => ("Authentication", RiskLevel::High, "An account failed to log on"),
        "4634" => ("Authentication", RiskLevel::Low, "An account was logged off"),
        "4647" => ("Authentication", RiskLevel::Low, "User initiated logoff"),
        "4648" => ("Authentication", RiskLevel::Medium, "A logon was attempted using explicit credentials"),
        "4672" => ("Privilege", RiskLevel::High, "Special privileges assigned to new logon"),
        "4673" => ("Privilege", RiskLevel::Medium, "A privileged service was called"),
        "4688" => ("Process", RiskLevel::Medium, "A new process has been created"),
        "4689" => ("Process", RiskLevel::Low, "A process has exited"),
        "5156" => ("Network", RiskLevel::Low, "The Windows Filtering Platform has allowed a connection"),
        "5157" => ("Network", RiskLevel::Medium, "The Windows Filtering Platform has blocked a connection"),
        "4656" => ("File", RiskLevel::Low, "A handle to an object was requested"),
        "4658" => ("File", RiskLevel::Low, "The handle to an object was closed"),
        "4663" => ("File", RiskLevel::Medium, "An attempt was made to access an object"),
        "7034" => ("System", RiskLevel::Medium, "A service terminated unexpectedly"),
        "7035" => ("System", RiskLevel::Low, "A service was successfully sent a start or stop control"),
        "7036" => ("System", RiskLevel::Low, "A service was started or stopped"),
        other => {
            return Classification {
                category: "System",
                risk_level: RiskLevel::Low,
                description: format!("Windows Event ID {other}"),
            }
        }
    };

    Classification {
        category,
        risk_level,
        description: description.to_string(),
    }
}

/// Derives the boolean security-context flags for an event type code.
pub fn security_context(event_id: &str, risk_level: RiskLevel) -> SecurityContext {
    SecurityContext {
        is_authentication_event: AUTHENTICATION_EVENT_IDS.contains(&event_id),
        is_process_event: PROCESS_EVENT_IDS.contains(&event_id),
        is_privilege_event: PRIVILEGE_EVENT_IDS.contains(&event_id),
        is_network_event: NETWORK_EVENT_IDS.contains(&event_id),
        is_file_event: FILE_EVENT_IDS.contains(&event_id),
        risk_level,
    }
}

/// Maps a numeric severity level code to its display name.
///
/// Out-of-range codes echo the raw text so information is never dropped.
pub fn level_name(raw_level: &str) -> String {
    match raw_level {
        "0" => "LogAlways".to_string(),
        "1" => "Critical".to_string(),
        "2" => "Error".to_string(),
        "3" => "Warning".to_string(),
        "4" => "Information".to_string(),
        "5" => "Verbose".to_string(),
        other => other.to_string(),
    }
}

/// Derives the log channel an event type code would normally appear in.
/// Used by the fallback synthesiser, which has no payload to extract a
/// channel from.
pub fn channel_for(event_id: &str) -> &'static str {
    if AUTHENTICATION_EVENT_IDS.contains(&event_id)
        || PROCESS_EVENT_IDS.contains(&event_id)
        || PRIVILEGE_EVENT_IDS.contains(&event_id)
        || NETWORK_EVENT_IDS.contains(&event_id)
        || FILE_EVENT_IDS.contains(&event_id)
    {
        "Security"
    } else if matches!(event_id, "7034" | "7035" | "7036") {
        "System"
    } else {
        "Application"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_ids() {
        let c = classify("4625");
        assert_eq!(c.category, "Authentication");
        assert_eq!(c.risk_level, RiskLevel::High);
        assert_eq!(c.description, "An account failed to log on");

        let c = classify("7036");
        assert_eq!(c.category, "System");
        assert_eq!(c.risk_level, RiskLevel::Low);
    }

    #[test]
    fn test_classify_unknown_id_is_total() {
        let c = classify("9999");
        assert_eq!(c.category, "System");
        assert_eq!(c.risk_level, RiskLevel::Low);
        assert!(c.description.contains("9999"));

        // Degenerate inputs still classify.
        for code in ["", "not-a-number", "4625x", "\u{0}"] {
            let c = classify(code);
            assert_eq!(c.category, "System");
            assert_eq!(c.risk_level, RiskLevel::Low);
        }
    }

    #[test]
    fn test_security_context_set_membership() {
        let ctx = security_context("4625", RiskLevel::High);
        assert!(ctx.is_authentication_event);
        assert!(!ctx.is_process_event);
        assert_eq!(ctx.risk_level, RiskLevel::High);

        // 4674 flags as privilege use even though the classification table
        // has no entry for it.
        let ctx = security_context("4674", RiskLevel::Low);
        assert!(ctx.is_privilege_event);

        let ctx = security_context("9999", RiskLevel::Low);
        assert!(!ctx.is_authentication_event);
        assert!(!ctx.is_process_event);
        assert!(!ctx.is_privilege_event);
        assert!(!ctx.is_network_event);
        assert!(!ctx.is_file_event);
    }

    #[test]
    fn test_level_name_mapping() {
        assert_eq!(level_name("0"), "LogAlways");
        assert_eq!(level_name("1"), "Critical");
        assert_eq!(level_name("2"), "Error");
        assert_eq!(level_name("3"), "Warning");
        assert_eq!(level_name("4"), "Information");
        assert_eq!(level_name("5"), "Verbose");
        // Out of range: raw code as text.
        assert_eq!(level_name("17"), "17");
        assert_eq!(level_name("Information"), "Information");
    }

    #[test]
    fn test_channel_derivation() {
        assert_eq!(channel_for("4624"), "Security");
        assert_eq!(channel_for("5158"), "Security");
        assert_eq!(channel_for("7034"), "System");
        assert_eq!(channel_for("1000"), "Application");
    }
}
