//! Classification of `protonvpn` output into a canonical state.
//!
//! The client prints free-form text for both `status` and the connect /
//! disconnect subcommands. [`classify`] walks an ordered rule list and the
//! first rule whose predicate holds produces the record:
//!
//! 1. `connected`: the output contains `Connected`, or names a server via
//!    `Connecting to <server> via` or `Server: <server>`.
//! 2. `disconnected`: `Disconnected` or `No connection found`.
//! 3. `error`: a lowercase `error` anywhere.
//!
//! Later rules are only reachable when every earlier one failed, so output
//! mentioning both `Connected` and `error` is `Connected`. Anything unmatched
//! falls back to `Disconnected`.

use std::sync::LazyLock;

use regex::Regex;

use crate::constants;
use crate::logger::{self, LogLevel};
use crate::state::{CanonicalState, StatusRecord};

/// `Connecting to <server> via` | `Server: <server>`. `.` stops at newlines.
static SERVER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Connecting to (.*) via|Server:[[:space:]]*(.*)").unwrap());

/// One classification step.
struct Rule {
    name: &'static str,
    matches: fn(&str) -> bool,
    extract: fn(&str) -> StatusRecord,
}

/// Evaluated top to bottom; the order is part of the contract.
const RULES: [Rule; 3] = [
    Rule {
        name: "connected",
        matches: is_connected,
        extract: connected_record,
    },
    Rule {
        name: "disconnected",
        matches: is_disconnected,
        extract: disconnected_record,
    },
    Rule {
        name: "error",
        matches: is_error,
        extract: error_record,
    },
];

/// Maps raw client output to a status record. Total over all inputs.
pub fn classify(output: &str) -> StatusRecord {
    if let Some(rule) = RULES.iter().find(|rule| (rule.matches)(output)) {
        logger::log(
            LogLevel::Debug,
            "CLASSIFY",
            format!("Matched rule '{}'", rule.name),
        );
        return (rule.extract)(output);
    }

    logger::log(
        LogLevel::Debug,
        "CLASSIFY",
        "No rule matched, assuming disconnected",
    );
    StatusRecord::disconnected()
}

fn is_connected(output: &str) -> bool {
    output.contains("Connected") || SERVER_REGEX.is_match(output)
}

fn is_disconnected(output: &str) -> bool {
    output.contains("Disconnected") || output.contains("No connection found")
}

fn is_error(output: &str) -> bool {
    output.contains("error")
}

fn disconnected_record(_output: &str) -> StatusRecord {
    StatusRecord::disconnected()
}

fn error_record(_output: &str) -> StatusRecord {
    StatusRecord::new(CanonicalState::Error, "")
}

/// Prefers the `Connecting to` capture when it is non-empty.
///
/// `Connected` output with no server line still reports `Connected`, carrying
/// the generic error message as detail.
fn connected_record(output: &str) -> StatusRecord {
    let Some(caps) = SERVER_REGEX.captures(output) else {
        return StatusRecord::connected(constants::MSG_GENERIC_ERROR);
    };

    let server = caps
        .get(1)
        .map(|m| m.as_str())
        .filter(|s| !s.is_empty())
        .or_else(|| caps.get(2).map(|m| m.as_str()))
        .unwrap_or_default();

    StatusRecord::connected(server.trim())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_record(output: &str, state: CanonicalState, detail: &str) {
        let record = classify(output);
        assert_eq!(record.state, state, "state for {output:?}");
        assert_eq!(record.detail, detail, "detail for {output:?}");
    }

    #[test]
    fn test_server_line() {
        assert_record("Server: Tokyo-01", CanonicalState::Connected, "Tokyo-01");
    }

    #[test]
    fn test_connecting_line() {
        assert_record(
            "Connecting to Amsterdam-03 via TCP",
            CanonicalState::Connected,
            "Amsterdam-03",
        );
    }

    #[test]
    fn test_full_status_output() {
        let output = "Status:       Connected\n\
                      Time:         0:12:04\n\
                      IP:           185.159.157.10\n\
                      Server:       JP#12\n\
                      Features:     Normal\n\
                      Protocol:     UDP\n";
        assert_record(output, CanonicalState::Connected, "JP#12");
    }

    #[test]
    fn test_connect_output_prefers_connecting_capture() {
        let output = "Connecting to NL#7 via UDP...\nConnected!\nServer: ignored";
        assert_record(output, CanonicalState::Connected, "NL#7");
    }

    #[test]
    fn test_connected_without_server_keeps_generic_detail() {
        assert_record(
            "Connected!",
            CanonicalState::Connected,
            constants::MSG_GENERIC_ERROR,
        );
    }

    #[test]
    fn test_connected_wins_over_error() {
        let record = classify("Connected to X\nerror: retry");
        assert_eq!(record.state, CanonicalState::Connected);
    }

    #[test]
    fn test_server_pattern_wins_over_error_without_connected_token() {
        // A bare server line is enough for Connected, even next to an error.
        assert_record(
            "Connecting to JP#1 via UDP\n[!] error: handshake timed out\n",
            CanonicalState::Connected,
            "JP#1",
        );
    }

    #[test]
    fn test_disconnected_wins_over_error() {
        assert_record(
            "Disconnected.\nerror while cleaning up",
            CanonicalState::Disconnected,
            "",
        );
    }

    #[test]
    fn test_no_connection_found() {
        assert_record("No connection found", CanonicalState::Disconnected, "");
    }

    #[test]
    fn test_lowercase_error() {
        assert_record("internal error occurred", CanonicalState::Error, "");
    }

    #[test]
    fn test_error_match_is_case_sensitive() {
        assert_record("ERROR: Something", CanonicalState::Disconnected, "");
    }

    #[test]
    fn test_unmatched_defaults_to_disconnected() {
        assert_record("garbled nonsense", CanonicalState::Disconnected, "");
    }

    #[test]
    fn test_disconnected_is_not_connected() {
        // "Disconnected" has a lowercase 'c' and must not trip the first rule.
        assert_record("Disconnected", CanonicalState::Disconnected, "");
    }

    #[test]
    fn test_empty_server_capture() {
        assert_record("Status: Connected\nServer:", CanonicalState::Connected, "");
    }

    #[test]
    fn test_total_over_odd_inputs() {
        let garbage = String::from_utf8_lossy(&[0xff, 0x00, 0xfe, b'\n', 0x80]).to_string();
        let huge = "x".repeat(4 * 1024 * 1024);
        for input in ["", "\n\n", garbage.as_str(), huge.as_str()] {
            let record = classify(input);
            assert!(CanonicalState::ALL.contains(&record.state));
        }
        assert_eq!(classify("").state, CanonicalState::Disconnected);
    }
}
