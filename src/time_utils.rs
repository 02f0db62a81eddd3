// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared helpers for date/time formatting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Format a UTC timestamp as RFC3339 using a `Z` suffix.
pub fn format_utc_rfc3339(date: DateTime<Utc>) -> String {
    date.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Current time as stored in record timestamps.
pub fn now_rfc3339() -> String {
    format_utc_rfc3339(Utc::now())
}

/// Today's calendar day in UTC.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}
