//! Debounced, sequence-checked email uniqueness check
//!
//! Every edit supersedes the previous check. A check becomes due once the
//! input has been stable for the debounce window; its result is applied only
//! if no newer check was issued in the meantime.

use crate::api::{ApiError, UsersApi};
use std::time::{Duration, Instant};

/// Default quiet period before a check is sent
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// A check that is due and should be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailCheckTicket {
    pub seq: u64,
    pub email: String,
}

/// Result of a sent check, tagged with the sequence it was issued under
#[derive(Debug)]
pub struct EmailCheckResolution {
    pub seq: u64,
    /// `Ok(true)` when the email is already taken
    pub outcome: Result<bool, ApiError>,
}

#[derive(Debug, Clone)]
struct ScheduledCheck {
    seq: u64,
    email: String,
    due: Instant,
}

#[derive(Debug, Clone)]
pub struct EmailCheck {
    debounce: Duration,
    latest_seq: u64,
    scheduled: Option<ScheduledCheck>,
    in_flight: Option<u64>,
}

impl EmailCheck {
    pub fn new(debounce: Duration) -> Self {
        Self {
            debounce,
            latest_seq: 0,
            scheduled: None,
            in_flight: None,
        }
    }

    /// Last sequence number handed out
    pub fn latest_seq(&self) -> u64 {
        self.latest_seq
    }

    /// Continue numbering after `seq`, so results issued under it never match
    pub fn resume_after(&mut self, seq: u64) {
        self.latest_seq = self.latest_seq.max(seq);
    }

    /// Schedule a check for `email`, superseding anything earlier
    pub fn schedule(&mut self, email: String, now: Instant) -> u64 {
        self.latest_seq += 1;
        self.scheduled = Some(ScheduledCheck {
            seq: self.latest_seq,
            email,
            due: now + self.debounce,
        });
        self.in_flight = None;
        self.latest_seq
    }

    /// Drop any scheduled or in-flight check
    pub fn cancel(&mut self) {
        self.latest_seq += 1;
        self.scheduled = None;
        self.in_flight = None;
    }

    /// Hand out the scheduled check once its debounce window has elapsed
    pub fn take_due(&mut self, now: Instant) -> Option<EmailCheckTicket> {
        if self.scheduled.as_ref().is_some_and(|s| s.due <= now) {
            let check = self.scheduled.take()?;
            self.in_flight = Some(check.seq);
            tracing::debug!(seq = check.seq, "email check due");
            return Some(EmailCheckTicket {
                seq: check.seq,
                email: check.email,
            });
        }
        None
    }

    /// Whether a resolution for `seq` may be applied. Consumes the in-flight slot.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq == self.latest_seq && self.in_flight == Some(seq) {
            self.in_flight = None;
            true
        } else {
            tracing::debug!(seq, latest = self.latest_seq, "discarding stale email check");
            false
        }
    }

    /// Scheduled or in flight
    pub fn is_outstanding(&self) -> bool {
        self.scheduled.is_some() || self.in_flight.is_some()
    }
}

impl Default for EmailCheck {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

/// Ask the API whether `candidate` is taken. An empty candidate is never
/// sent and reports as free.
pub async fn check_email_uniqueness(
    api: &dyn UsersApi,
    candidate: &str,
) -> Result<bool, ApiError> {
    if candidate.is_empty() {
        return Ok(false);
    }
    api.check_exists(candidate).await
}
