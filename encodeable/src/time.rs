// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Time tick generation.
//!
//! Time is modeled as a numeric value in **milliseconds since the Unix epoch (UTC)**.
//! Tick intervals span milliseconds through years; month and year steps follow the
//! calendar rather than a fixed duration.

extern crate alloc;

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use chrono::{DateTime, Datelike, NaiveDate, Utc};

use crate::scale::nice_step;

const SECOND: f64 = 1000.0;
const MINUTE: f64 = 60.0 * SECOND;
const HOUR: f64 = 60.0 * MINUTE;
const DAY: f64 = 24.0 * HOUR;
const WEEK: f64 = 7.0 * DAY;
const MONTH: f64 = 30.0 * DAY;
const YEAR: f64 = 365.0 * DAY;

/// 1970-01-01 was a Thursday; weeks start on Sunday.
const WEEK_OFFSET: f64 = 3.0 * DAY;

const MAX_TICKS: usize = 10_000;

#[derive(Clone, Copy, Debug, PartialEq)]
enum TimeInterval {
    /// Fixed-duration steps aligned to `offset + k * step`.
    Fixed { step: f64, offset: f64 },
    /// Calendar months, aligned to multiples of `n` months from January.
    Months(u32),
    /// Calendar years, aligned to multiples of `n`.
    Years(u32),
}

const INTERVALS: &[(f64, TimeInterval)] = &[
    (SECOND, fixed(SECOND)),
    (5.0 * SECOND, fixed(5.0 * SECOND)),
    (15.0 * SECOND, fixed(15.0 * SECOND)),
    (30.0 * SECOND, fixed(30.0 * SECOND)),
    (MINUTE, fixed(MINUTE)),
    (5.0 * MINUTE, fixed(5.0 * MINUTE)),
    (15.0 * MINUTE, fixed(15.0 * MINUTE)),
    (30.0 * MINUTE, fixed(30.0 * MINUTE)),
    (HOUR, fixed(HOUR)),
    (3.0 * HOUR, fixed(3.0 * HOUR)),
    (6.0 * HOUR, fixed(6.0 * HOUR)),
    (12.0 * HOUR, fixed(12.0 * HOUR)),
    (DAY, fixed(DAY)),
    (2.0 * DAY, fixed(2.0 * DAY)),
    (
        WEEK,
        TimeInterval::Fixed {
            step: WEEK,
            offset: WEEK_OFFSET,
        },
    ),
    (MONTH, TimeInterval::Months(1)),
    (3.0 * MONTH, TimeInterval::Months(3)),
    (YEAR, TimeInterval::Years(1)),
];

const fn fixed(step: f64) -> TimeInterval {
    TimeInterval::Fixed { step, offset: 0.0 }
}

/// Picks the interval whose duration is closest to `span / count`.
fn choose_interval(span: f64, count: usize) -> Option<TimeInterval> {
    if !span.is_finite() || span <= 0.0 {
        return None;
    }
    let target = span / count.max(1) as f64;
    let i = INTERVALS.partition_point(|(duration, _)| *duration <= target);
    if i == INTERVALS.len() {
        let years = nice_step(target / YEAR).max(1.0).min(f64::from(u32::MAX));
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clamped to 1..=u32::MAX"
        )]
        let years = years as u32;
        return Some(TimeInterval::Years(years));
    }
    if i == 0 {
        let step = nice_step(target).max(1.0);
        return Some(fixed(step));
    }
    let (lo, lo_interval) = INTERVALS[i - 1];
    let (hi, hi_interval) = INTERVALS[i];
    if target / lo < hi / target {
        Some(lo_interval)
    } else {
        Some(hi_interval)
    }
}

fn month_index(t: f64) -> Option<i64> {
    let dt = to_datetime(t)?;
    Some(i64::from(dt.year()) * 12 + i64::from(dt.month0()))
}

fn from_month_index(index: i64) -> Option<f64> {
    let year = i32::try_from(index.div_euclid(12)).ok()?;
    #[allow(clippy::cast_possible_truncation, reason = "rem_euclid(12) is in 0..12")]
    let month = index.rem_euclid(12) as u32 + 1;
    let date = NaiveDate::from_ymd_opt(year, month, 1)?;
    let millis = date.and_hms_opt(0, 0, 0)?.and_utc().timestamp_millis();
    #[allow(
        clippy::cast_precision_loss,
        reason = "millisecond timestamps of representable dates fit in f64's mantissa"
    )]
    let millis = millis as f64;
    Some(millis)
}

fn to_datetime(t: f64) -> Option<DateTime<Utc>> {
    if !t.is_finite() {
        return None;
    }
    #[allow(
        clippy::cast_possible_truncation,
        reason = "finite millisecond timestamps; `as` saturates out of range"
    )]
    let millis = t.floor() as i64;
    DateTime::<Utc>::from_timestamp_millis(millis)
}

impl TimeInterval {
    /// Latest interval boundary at or before `t`.
    fn floor(self, t: f64) -> Option<f64> {
        match self {
            Self::Fixed { step, offset } => Some(((t - offset) / step).floor() * step + offset),
            Self::Months(n) => {
                let index = month_index(t)?;
                from_month_index(index - index.rem_euclid(i64::from(n)))
            }
            Self::Years(n) => {
                let index = month_index(t)?;
                let year = index.div_euclid(12);
                from_month_index((year - year.rem_euclid(i64::from(n))) * 12)
            }
        }
    }

    /// The boundary following the aligned boundary `t`.
    fn next(self, t: f64) -> Option<f64> {
        match self {
            Self::Fixed { step, .. } => Some(t + step),
            Self::Months(n) => from_month_index(month_index(t)? + i64::from(n)),
            Self::Years(n) => from_month_index(month_index(t)? + 12 * i64::from(n)),
        }
    }
}

fn ordered(min: f64, max: f64) -> (f64, f64) {
    if min > max { (max, min) } else { (min, max) }
}

/// Returns tick values (ms) inside `[min, max]`, about `count` of them.
pub fn nice_time_ticks_ms(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    let (min, max) = ordered(min, max);
    let Some(interval) = choose_interval(max - min, count) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let Some(mut t) = interval.floor(min) else {
        return out;
    };
    while t <= max && out.len() < MAX_TICKS {
        if t >= min {
            out.push(t);
        }
        match interval.next(t) {
            Some(next) if next > t => t = next,
            _ => break,
        }
    }
    out
}

/// Extends `[min, max]` outward to the boundaries of the tick interval.
pub fn nice_time_domain(min: f64, max: f64, count: usize) -> (f64, f64) {
    if !min.is_finite() || !max.is_finite() || min == max {
        return (min, max);
    }
    let (lo, hi) = ordered(min, max);
    let Some(interval) = choose_interval(hi - lo, count) else {
        return (min, max);
    };
    let start = interval.floor(lo).unwrap_or(lo);
    let stop = match interval.floor(hi) {
        Some(f) if f < hi => interval.next(f).unwrap_or(hi),
        Some(f) => f,
        None => hi,
    };
    if min > max { (stop, start) } else { (start, stop) }
}
