use std::io::{self, Write};

use sms_core::DispatchResult;
use time::format_description::well_known::Rfc3339;

use crate::config::ConfigurationError;

/// Exit status of a successful send.
pub const EXIT_OK: u8 = 0;
/// Exit status when the provider call failed.
pub const EXIT_DISPATCH_ERROR: u8 = 1;
/// Exit status when required input was missing. Matches clap's usage-error code.
pub const EXIT_CONFIG_ERROR: u8 = 2;

/// Prints the outcome of a run and picks the exit status.
pub struct Reporter<O: Write, E: Write> {
    out: O,
    err: E,
    raw: bool,
}

impl Reporter<io::Stdout, io::Stderr> {
    pub fn stdio(raw: bool) -> Self {
        Self::new(io::stdout(), io::stderr(), raw)
    }
}

impl<O: Write, E: Write> Reporter<O, E> {
    pub fn new(out: O, err: E, raw: bool) -> Self {
        Self { out, err, raw }
    }

    // Write failures (e.g. a closed pipe) must not change the exit status.
    pub fn report(&mut self, result: &DispatchResult) -> u8 {
        if !result.success {
            let _ = writeln!(
                self.err,
                "Failed to send message via {}: {}",
                result.via,
                result.error.as_deref().unwrap_or("unknown error")
            );
            return EXIT_DISPATCH_ERROR;
        }

        let _ = match (&result.message_sid, &result.status) {
            (Some(sid), Some(status)) => writeln!(
                self.out,
                "Sent via {}. Message SID: {} (status: {})",
                result.via, sid, status
            ),
            (Some(sid), None) => {
                writeln!(self.out, "Sent via {}. Message SID: {}", result.via, sid)
            }
            (None, _) => writeln!(
                self.out,
                "Sent via {}. The provider returned no message SID.",
                result.via
            ),
        };
        if let Some(created) = result.created_at.and_then(|t| t.format(&Rfc3339).ok()) {
            let _ = writeln!(self.out, "Created: {}", created);
        }
        if self.raw {
            if let Some(raw) = &result.raw {
                let pretty = serde_json::to_string_pretty(raw).unwrap_or_else(|_| raw.to_string());
                let _ = writeln!(self.out, "{}", pretty);
            }
        }
        EXIT_OK
    }

    pub fn configuration_error(&mut self, error: &ConfigurationError) -> u8 {
        let _ = writeln!(self.err, "error: {}", error);
        if matches!(error, ConfigurationError::Missing { .. }) {
            let _ = writeln!(
                self.err,
                "hint: credentials are read from TWILIO_* environment variables; see --help"
            );
        }
        EXIT_CONFIG_ERROR
    }

    pub fn into_inner(self) -> (O, E) {
        (self.out, self.err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sms_core::{DispatchError, SendResponse};

    fn buffered(raw: bool) -> Reporter<Vec<u8>, Vec<u8>> {
        Reporter::new(Vec::new(), Vec::new(), raw)
    }

    fn finish(reporter: Reporter<Vec<u8>, Vec<u8>>) -> (String, String) {
        let (out, err) = reporter.into_inner();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    fn sent(sid: Option<&str>) -> DispatchResult {
        DispatchResult::sent(SendResponse {
            sid: sid.map(str::to_string),
            status: Some("queued".into()),
            created_at: None,
            via: "direct-http",
            raw: serde_json::json!({ "sid": sid, "status": "queued" }),
        })
    }

    #[test]
    fn success_goes_to_stdout() {
        let mut reporter = buffered(false);
        assert_eq!(reporter.report(&sent(Some("SM123"))), EXIT_OK);
        let (out, err) = finish(reporter);
        assert_eq!(out, "Sent via direct-http. Message SID: SM123 (status: queued)\n");
        assert!(err.is_empty());
    }

    #[test]
    fn success_without_sid_still_exits_zero() {
        let mut reporter = buffered(false);
        assert_eq!(reporter.report(&sent(None)), EXIT_OK);
        let (out, _) = finish(reporter);
        assert!(out.contains("no message SID"));
    }

    #[test]
    fn raw_flag_prints_payload() {
        let mut reporter = buffered(true);
        reporter.report(&sent(Some("SM123")));
        let (out, _) = finish(reporter);
        assert!(out.contains("\"status\": \"queued\""));
    }

    #[test]
    fn dispatch_failure_goes_to_stderr() {
        let error = DispatchError::Status {
            status: 500,
            body: "boom".into(),
        };
        let mut reporter = buffered(false);
        let code = reporter.report(&DispatchResult::failed("twilio-client", &error));
        assert_eq!(code, EXIT_DISPATCH_ERROR);
        let (out, err) = finish(reporter);
        assert!(out.is_empty());
        assert_eq!(err, "Failed to send message via twilio-client: HTTP 500: boom\n");
    }

    #[test]
    fn configuration_failure_exits_two() {
        let error = ConfigurationError::Missing {
            fields: vec!["--to"],
        };
        let mut reporter = buffered(false);
        assert_eq!(reporter.configuration_error(&error), EXIT_CONFIG_ERROR);
        let (out, err) = finish(reporter);
        assert!(out.is_empty());
        assert!(err.starts_with("error: missing required configuration: --to\n"));
    }
}
