//! Operator-facing log lines for every MAC check decision.
//!
//! Operators grep the server log for [`MAC_CHECK_MARKER`], so the line
//! layout and field order are kept stable.

use tracing::{info, warn};

/// Prefix of every MAC check log line.
pub const MAC_CHECK_MARKER: &str = "***** POST_AUTH MAC CHECK";

/// Log target for post-auth diagnostics.
pub const LOG_TARGET: &str = "post_auth";

/// What the evaluator did about the reported address.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MacCheckAction {
    /// Compared against a registered address.
    Compared,
    /// Registered the address as the user's binding.
    Learned,
    /// Refused to register from an unapproved location.
    RegistrationDenied,
    /// The client reported no address.
    NoneReported,
}

impl MacCheckAction {
    fn description(&self) -> Option<&'static str> {
        match self {
            Self::Learned => Some("MAC address learned and locked."),
            Self::RegistrationDenied => Some(
                "attempt to register client MAC address from unknown system denied.",
            ),
            Self::Compared | Self::NoneReported => None,
        }
    }
}

/// One MAC check decision as written to the operational log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MacCheckRecord {
    /// Account user name.
    pub username: String,
    /// Client IP address.
    pub client_ip: String,
    /// Address reported by the client.
    pub hw_addr: Option<String>,
    /// Address registered for the account.
    pub expected_hw_addr: Option<String>,
    /// Action taken.
    pub action: MacCheckAction,
    /// Whether the connection attempt is allowed.
    pub success: bool,
}

impl MacCheckRecord {
    /// Renders the record as the labelled lines operators grep for.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![
            labelled("account user name", &self.username),
            labelled("client IP address", &self.client_ip),
        ];

        match self.action {
            MacCheckAction::NoneReported => {
                lines.push(labelled("MAC address reported", "NONE"));
            }
            MacCheckAction::RegistrationDenied => {}
            MacCheckAction::Compared | MacCheckAction::Learned => {
                if let Some(hw_addr) = &self.hw_addr {
                    lines.push(labelled("locked MAC address", hw_addr));
                }
            }
        }
        if let Some(expected) = &self.expected_hw_addr {
            lines.push(labelled("expected MAC address", expected));
        }
        if let Some(action) = self.action.description() {
            lines.push(labelled("action taken", action));
        }
        lines.push(labelled("connection attempt", self.verdict()));
        lines
    }

    /// `SUCCESS` or `FAILED`.
    pub fn verdict(&self) -> &'static str {
        if self.success { "SUCCESS" } else { "FAILED" }
    }

    /// Writes the record to the log: `info` when allowed, `warn` when denied.
    pub fn emit(&self) {
        let hw_addr = self.hw_addr.as_deref().unwrap_or("NONE");
        let expected = self.expected_hw_addr.as_deref();

        for line in self.lines() {
            if self.success {
                info!(
                    target: LOG_TARGET,
                    username = %self.username,
                    client_ip = %self.client_ip,
                    hw_addr = %hw_addr,
                    expected_hw_addr = expected,
                    verdict = self.verdict(),
                    "{line}"
                );
            } else {
                warn!(
                    target: LOG_TARGET,
                    username = %self.username,
                    client_ip = %self.client_ip,
                    hw_addr = %hw_addr,
                    expected_hw_addr = expected,
                    verdict = self.verdict(),
                    "{line}"
                );
            }
        }
    }
}

fn labelled(label: &str, value: &str) -> String {
    format!("{MAC_CHECK_MARKER}: {label:<20} : {value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(action: MacCheckAction, success: bool) -> MacCheckRecord {
        MacCheckRecord {
            username: "alice".to_string(),
            client_ip: "203.0.113.7".to_string(),
            hw_addr: Some("aa:bb:cc:dd:ee:ff".to_string()),
            expected_hw_addr: None,
            action,
            success,
        }
    }

    #[test]
    fn test_line_layout() {
        let lines = record(MacCheckAction::Learned, true).lines();
        assert_eq!(
            lines,
            vec![
                "***** POST_AUTH MAC CHECK: account user name    : alice",
                "***** POST_AUTH MAC CHECK: client IP address    : 203.0.113.7",
                "***** POST_AUTH MAC CHECK: locked MAC address   : aa:bb:cc:dd:ee:ff",
                "***** POST_AUTH MAC CHECK: action taken         : MAC address learned and locked.",
                "***** POST_AUTH MAC CHECK: connection attempt   : SUCCESS",
            ]
        );
    }

    #[test]
    fn test_mismatch_lists_expected_address() {
        let mut rec = record(MacCheckAction::Compared, false);
        rec.expected_hw_addr = Some("11:22:33:44:55:66".to_string());
        let lines = rec.lines();
        assert_eq!(lines.len(), 5);
        assert!(lines[3].ends_with("expected MAC address : 11:22:33:44:55:66"));
        assert!(lines[4].ends_with("FAILED"));
    }

    #[test]
    fn test_missing_address_reports_none() {
        let mut rec = record(MacCheckAction::NoneReported, false);
        rec.hw_addr = None;
        let lines = rec.lines();
        assert!(lines[2].ends_with("MAC address reported : NONE"));
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_registration_denied_omits_address() {
        let lines = record(MacCheckAction::RegistrationDenied, false).lines();
        assert_eq!(lines.len(), 4);
        assert!(lines.iter().all(|l| !l.contains("locked MAC address")));
        assert!(lines[2].contains("unknown system denied"));
    }

    #[test]
    fn test_every_line_carries_marker() {
        let lines = record(MacCheckAction::Compared, true).lines();
        assert!(lines.iter().all(|l| l.starts_with(MAC_CHECK_MARKER)));
    }

    mod fields {
        use std::sync::{Arc, Mutex};

        use tracing::field::{Field, Visit};
        use tracing_subscriber::Layer;
        use tracing_subscriber::layer::{Context, SubscriberExt};

        /// Records the field names of every event.
        #[derive(Clone, Default)]
        struct FieldNames(Arc<Mutex<Vec<Vec<String>>>>);

        struct Names(Vec<String>);

        impl Visit for Names {
            fn record_debug(&mut self, field: &Field, _value: &dyn std::fmt::Debug) {
                self.0.push(field.name().to_string());
            }
        }

        impl<S: tracing::Subscriber> Layer<S> for FieldNames {
            fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
                let mut names = Names(Vec::new());
                event.record(&mut names);
                self.0.lock().unwrap().push(names.0);
            }
        }

        pub fn emitted_fields(record: &super::MacCheckRecord) -> Vec<Vec<String>> {
            let layer = FieldNames::default();
            let subscriber = tracing_subscriber::registry().with(layer.clone());
            tracing::subscriber::with_default(subscriber, || record.emit());
            layer.0.lock().unwrap().clone()
        }
    }

    #[test]
    fn test_learned_record_omits_expected_field() {
        let rec = record(MacCheckAction::Learned, true);
        let events = fields::emitted_fields(&rec);
        assert_eq!(events.len(), rec.lines().len());
        for names in &events {
            assert!(names.iter().any(|n| n == "hw_addr"));
            assert!(names.iter().all(|n| n != "expected_hw_addr"));
        }
    }

    #[test]
    fn test_compared_record_carries_expected_field() {
        let mut rec = record(MacCheckAction::Compared, false);
        rec.expected_hw_addr = Some("11:22:33:44:55:66".to_string());
        let events = fields::emitted_fields(&rec);
        assert_eq!(events.len(), rec.lines().len());
        assert!(
            events
                .iter()
                .all(|names| names.iter().any(|n| n == "expected_hw_addr"))
        );
    }
}
