//! Resolution of the client/server clock offset.
//!
//! Lesson times cross the client/server boundary shifted by a single
//! quantity, the [`OffsetAdjustment`]: the server's UTC offset minus the
//! client's. The client reports its offset once (the front end keeps it in
//! the [`CLIENT_OFFSET_COOKIE`] cookie) and every later request carries it.
//!
//! A client that has not reported yet is assumed to be on UTC-7 until its
//! offset is recorded.

use chrono::{DateTime, Local, Offset, Utc};
use serde::{Deserialize, Serialize};

/// Offset assumed for a client that has not reported one yet.
pub const DEFAULT_CLIENT_OFFSET_MINUTES: i32 = -420;

/// Cookie the front end records its UTC offset in.
pub const CLIENT_OFFSET_COOKIE: &str = "browserUtcOffset";

/// Real-world offsets stay within a day of UTC.
pub const MAX_OFFSET_MINUTES: i32 = 24 * 60;

/// Minutes a client's clock is ahead of UTC (`-420` for UTC-7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientOffset(pub i32);

impl Default for ClientOffset {
    fn default() -> Self {
        ClientOffset(DEFAULT_CLIENT_OFFSET_MINUTES)
    }
}

impl ClientOffset {
    /// Parse a raw offset as reported by the client. Anything missing, not
    /// an integer, or more than a day away from UTC falls back to the
    /// default.
    pub fn from_raw(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        match raw.trim().parse::<i32>() {
            Ok(minutes) if Self::is_plausible(minutes) => ClientOffset(minutes),
            Ok(minutes) => {
                tracing::debug!("Ignoring out of range client offset {}", minutes);
                Self::default()
            }
            Err(e) => {
                tracing::debug!("Ignoring invalid client offset {:?}: {}", raw, e);
                Self::default()
            }
        }
    }

    pub fn is_plausible(minutes: i32) -> bool {
        minutes > -MAX_OFFSET_MINUTES && minutes < MAX_OFFSET_MINUTES
    }

    pub fn minutes(self) -> i32 {
        self.0
    }
}

/// Minutes added to a client-local instant to obtain the stored instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetAdjustment(i32);

impl OffsetAdjustment {
    pub const fn from_minutes(minutes: i32) -> Self {
        OffsetAdjustment(minutes)
    }

    pub fn minutes(self) -> i32 {
        self.0
    }

    /// Whole hours, truncated toward zero.
    pub fn whole_hours(self) -> i32 {
        self.0 / 60
    }

    pub fn as_duration(self) -> chrono::Duration {
        chrono::Duration::minutes(i64::from(self.0))
    }
}

/// Source of "now" and of the host's UTC offset.
pub trait Clock: Send + Sync {
    fn now_utc(&self) -> DateTime<Utc>;

    /// The host's current offset from UTC in minutes.
    fn utc_offset_minutes(&self) -> i32;
}

/// The host clock. The offset is read on every call so DST changes and
/// servers outside UTC are picked up.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_utc(&self) -> DateTime<Utc> {
        Utc::now()
    }

    fn utc_offset_minutes(&self) -> i32 {
        Local::now().offset().fix().local_minus_utc() / 60
    }
}

/// A clock frozen at a given instant and offset.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    pub now: DateTime<Utc>,
    pub utc_offset_minutes: i32,
}

impl FixedClock {
    pub fn new(now: DateTime<Utc>, utc_offset_minutes: i32) -> Self {
        Self {
            now,
            utc_offset_minutes,
        }
    }
}

impl Clock for FixedClock {
    fn now_utc(&self) -> DateTime<Utc> {
        self.now
    }

    fn utc_offset_minutes(&self) -> i32 {
        self.utc_offset_minutes
    }
}

/// Compute the adjustment for one request.
pub fn resolve(client_offset: ClientOffset, server_utc_offset_minutes: i32) -> OffsetAdjustment {
    OffsetAdjustment(server_utc_offset_minutes - client_offset.minutes())
}

/// Compute the adjustment for one request from the raw client offset and the
/// live server offset. Must not be cached across requests.
pub fn resolve_with_clock(raw_client_offset: Option<&str>, clock: &dyn Clock) -> OffsetAdjustment {
    resolve(
        ClientOffset::from_raw(raw_client_offset),
        clock.utc_offset_minutes(),
    )
}
