// src/schedule.rs

//! Wall-clock policy for announcements.
//!
//! The watcher itself never looks at the clock. The caller asks this policy
//! whether the current local minute is one at which an unchanged result is
//! still worth a message, whether screenshots should go with it, and whether
//! a start/stop announcement is due.

use chrono::{FixedOffset, NaiveTime, Offset, Timelike, Utc};

use crate::config::ScheduleSection;
use crate::errors::{PagewatchError, Result};

/// Parse a local `HH:MM` time.
pub fn parse_hhmm(s: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(s.trim(), "%H:%M").map_err(|e| {
        PagewatchError::ConfigError(format!("invalid time '{s}' (expected HH:MM): {e}"))
    })
}

/// Parse a UTC offset such as `+03:30`, `-05:00`, `Z` or `UTC`.
pub fn parse_utc_offset(s: &str) -> Result<FixedOffset> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("utc") || s.eq_ignore_ascii_case("z") {
        return Ok(utc());
    }
    let invalid = || {
        PagewatchError::ConfigError(format!("invalid utc_offset '{s}' (expected ±HH:MM)"))
    };

    let (sign, rest) = match s.as_bytes().first() {
        Some(b'+') => (1, &s[1..]),
        Some(b'-') => (-1, &s[1..]),
        _ => return Err(invalid()),
    };
    let (hours, minutes) = rest.split_once(':').ok_or_else(invalid)?;
    let two_digits = |part: &str| part.len() == 2 && part.bytes().all(|b| b.is_ascii_digit());
    if !two_digits(hours) || !two_digits(minutes) {
        return Err(invalid());
    }
    let hours: i32 = hours.parse().map_err(|_| invalid())?;
    let minutes: i32 = minutes.parse().map_err(|_| invalid())?;
    if minutes >= 60 {
        return Err(invalid());
    }
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60)).ok_or_else(invalid)
}

fn utc() -> FixedOffset {
    Utc.fix()
}

fn same_minute(a: NaiveTime, b: NaiveTime) -> bool {
    a.hour() == b.hour() && a.minute() == b.minute()
}

/// Parsed `[schedule]` section.
#[derive(Debug, Clone)]
pub struct SchedulePolicy {
    offset: FixedOffset,
    report_times: Vec<NaiveTime>,
    snapshot_times: Vec<NaiveTime>,
    start_time: Option<NaiveTime>,
    stop_time: Option<NaiveTime>,
}

impl SchedulePolicy {
    /// Policy used when no `[schedule]` is configured: unchanged results are
    /// never announced and there are no start/stop messages.
    pub fn silent() -> Self {
        Self {
            offset: utc(),
            report_times: Vec::new(),
            snapshot_times: Vec::new(),
            start_time: None,
            stop_time: None,
        }
    }

    pub fn from_config(section: Option<&ScheduleSection>) -> Result<Self> {
        let Some(section) = section else {
            return Ok(Self::silent());
        };

        let offset = match section.utc_offset.as_deref() {
            Some(s) => parse_utc_offset(s)?,
            None => utc(),
        };
        let parse_all = |times: &[String]| -> Result<Vec<NaiveTime>> {
            times.iter().map(|t| parse_hhmm(t)).collect()
        };

        Ok(Self {
            offset,
            report_times: parse_all(&section.report_times)?,
            snapshot_times: parse_all(&section.snapshot_times)?,
            start_time: section.start_time.as_deref().map(parse_hhmm).transpose()?,
            stop_time: section.stop_time.as_deref().map(parse_hhmm).transpose()?,
        })
    }

    /// Current local time in the configured offset.
    pub fn local_now(&self) -> NaiveTime {
        Utc::now().with_timezone(&self.offset).time()
    }

    pub fn reports_unchanged_at(&self, at: NaiveTime) -> bool {
        self.report_times.iter().any(|t| same_minute(*t, at))
    }

    pub fn snapshots_at(&self, at: NaiveTime) -> bool {
        self.snapshot_times.iter().any(|t| same_minute(*t, at))
    }

    pub fn is_start(&self, at: NaiveTime) -> bool {
        self.start_time.is_some_and(|t| same_minute(t, at))
    }

    pub fn is_stop(&self, at: NaiveTime) -> bool {
        self.stop_time.is_some_and(|t| same_minute(t, at))
    }
}
