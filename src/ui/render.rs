//! Plain-text rendering of a session snapshot.

use std::fmt::Write;

use alloy::primitives::Address;
use chrono::{DateTime, Utc};

use crate::ledger::Entry;
use crate::session::SessionState;
use crate::ui::input::BoundedInput;

/// Renders session snapshots for a terminal.
#[derive(Debug, Clone)]
pub struct Renderer {
    explorer_url: String,
    input: BoundedInput,
}

impl Renderer {
    pub fn new(explorer_url: &str, input: BoundedInput) -> Self {
        Self {
            explorer_url: explorer_url.trim_end_matches('/').to_string(),
            input,
        }
    }

    /// Explorer page for `address`.
    pub fn address_link(&self, address: &Address) -> String {
        format!("{}/address/{}", self.explorer_url, address)
    }

    /// The entry list, one block per entry.
    pub fn entries(&self, entries: &[Entry], now: DateTime<Utc>) -> String {
        let mut out = String::new();
        match entries.len() {
            0 => out.push_str("No proverbs yet.\n"),
            1 => out.push_str("1 proverb\n"),
            n => {
                let _ = writeln!(out, "{} proverbs", n);
            }
        }
        for entry in entries {
            let _ = writeln!(out, "\n  \"{}\"", entry.message);
            let _ = writeln!(
                out,
                "  by {} · {} · {}",
                short_address(&entry.author),
                relative_time(entry.timestamp, now),
                self.address_link(&entry.author)
            );
        }
        out
    }

    /// Full view: account, banners, input and entries.
    pub fn session(&self, state: &SessionState, now: DateTime<Utc>) -> String {
        let mut out = String::new();

        if let Some(prompt) = &state.prompt {
            let _ = writeln!(out, "[!] {}", prompt);
        }
        match &state.account {
            Some(account) => {
                let _ = writeln!(
                    out,
                    "Account: {} ({})",
                    short_address(account),
                    self.address_link(account)
                );
            }
            None => out.push_str("Not connected.\n"),
        }
        if let Some(network) = &state.network_error {
            let _ = writeln!(out, "[network] {}", network.message);
        }
        if let Some(notice) = state.visible_notice() {
            let _ = writeln!(out, "[error] {}", notice.message);
        }
        if let Some(tx_hash) = &state.pending_tx {
            let _ = writeln!(out, "[pending] {}", tx_hash);
        }

        let input = self.input.with_disabled(state.input_disabled());
        let _ = write!(out, "Draft: \"{}\" {}", state.draft, input.counter(&state.draft));
        if input.is_disabled() {
            out.push_str(" (disabled)");
        } else if !state.can_submit() {
            out.push_str(" (connect to post)");
        }
        out.push('\n');
        if state.loading {
            out.push_str("Submitting...\n");
        }

        out.push('\n');
        out.push_str(&self.entries(&state.entries, now));
        out
    }
}

/// `0x1234…abcd` form of an address.
pub fn short_address(address: &Address) -> String {
    let full = address.to_string();
    format!("{}…{}", &full[..6], &full[full.len() - 4..])
}

/// Human phrasing of the time between `then` and `now`.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds();
    if secs < 0 {
        return "just now".to_string();
    }

    let minutes = (secs + 30) / 60;
    let hours = (secs + 1800) / 3600;
    let days = (secs + 43_200) / 86_400;

    match secs {
        0..=44 => "a few seconds ago".to_string(),
        45..=89 => "a minute ago".to_string(),
        90..=2699 => format!("{} minutes ago", minutes),
        2700..=5399 => "an hour ago".to_string(),
        5400..=79_199 => format!("{} hours ago", hours),
        79_200..=129_599 => "a day ago".to_string(),
        129_600..=2_203_199 => format!("{} days ago", days),
        2_203_200..=3_887_999 => "a month ago".to_string(),
        3_888_000..=27_647_999 => format!("{} months ago", (days + 15) / 30),
        27_648_000..=47_347_199 => "a year ago".to_string(),
        _ => format!("{} years ago", (days + 182) / 365),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::session::{Notice, SessionError};

    fn renderer() -> Renderer {
        Renderer::new("https://rinkeby.etherscan.io/", BoundedInput::new(220))
    }

    fn now() -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
    }

    #[test]
    fn test_relative_time_buckets() {
        let now = now();
        let ago = |secs: i64| relative_time(now - Duration::seconds(secs), now);

        assert_eq!(ago(5), "a few seconds ago");
        assert_eq!(ago(60), "a minute ago");
        assert_eq!(ago(5 * 60), "5 minutes ago");
        assert_eq!(ago(3600), "an hour ago");
        assert_eq!(ago(3 * 3600), "3 hours ago");
        assert_eq!(ago(26 * 3600), "a day ago");
        assert_eq!(ago(4 * 86_400), "4 days ago");
        assert_eq!(ago(30 * 86_400), "a month ago");
        assert_eq!(ago(90 * 86_400), "3 months ago");
        assert_eq!(ago(400 * 86_400), "a year ago");
        assert_eq!(ago(3 * 365 * 86_400), "3 years ago");
        assert_eq!(ago(-10), "just now");
    }

    #[test]
    fn test_address_link_and_short_form() {
        let address: Address = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266".parse().unwrap();
        assert_eq!(
            renderer().address_link(&address),
            "https://rinkeby.etherscan.io/address/0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(short_address(&address), "0xf39F…2266");
    }

    #[test]
    fn test_entries_view() {
        let entries = vec![Entry {
            author: Address::repeat_byte(0xab),
            timestamp: now() - Duration::minutes(3),
            message: "Measure twice, cut once.".to_string(),
        }];
        let text = renderer().entries(&entries, now());
        assert!(text.starts_with("1 proverb\n"));
        assert!(text.contains("\"Measure twice, cut once.\""));
        assert!(text.contains("3 minutes ago"));
        assert!(text.to_lowercase().contains("/address/0xabababab"));

        assert_eq!(renderer().entries(&[], now()), "No proverbs yet.\n");
    }

    #[test]
    fn test_session_view_banners() {
        let mut hidden = Notice::new(&SessionError::Busy);
        hidden.visible = false;
        let state = SessionState {
            account: Some(Address::ZERO),
            network_error: Some(Notice::new(&SessionError::WrongNetwork {
                expected: 4,
                actual: 1,
            })),
            notice: Some(hidden),
            draft: "hi".to_string(),
            ..SessionState::default()
        };

        let text = renderer().session(&state, now());
        assert!(text.contains("[network] Wrong network"));
        assert!(!text.contains("[error]"));
        assert!(text.contains("Draft: \"hi\" 2/220 (disabled)"));
    }

    #[test]
    fn test_session_view_input_states() {
        let loading = SessionState {
            account: Some(Address::ZERO),
            loading: true,
            draft: "hi".to_string(),
            ..SessionState::default()
        };
        let text = renderer().session(&loading, now());
        assert!(text.contains("Draft: \"hi\" 2/220 (disabled)"));
        assert!(text.contains("Submitting..."));

        let disconnected = SessionState {
            draft: "hi".to_string(),
            ..SessionState::default()
        };
        let text = renderer().session(&disconnected, now());
        assert!(text.contains("Draft: \"hi\" 2/220 (connect to post)"));
    }

    #[test]
    fn test_session_view_prompt_when_disconnected() {
        let state = SessionState {
            prompt: Some(SessionError::NoProvider.to_string()),
            ..SessionState::default()
        };
        let text = renderer().session(&state, now());
        assert!(text.starts_with("[!] No Ethereum wallet found"));
        assert!(text.contains("Not connected."));
    }
}
