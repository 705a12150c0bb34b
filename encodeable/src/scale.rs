// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales.
//!
//! A [`ScaleConfig`] is the declarative form found on a channel definition. It is
//! resolved against the channel's field type and data into a runtime [`Scale`],
//! which axis layout only reads: [`Scale::domain`], [`Scale::ticks`] and
//! [`Scale::category`].
//!
//! Positional scales are created with a unit range `(0, 1)`; callers re-range them
//! with [`Scale::with_range`] once the plot extent is known.

extern crate alloc;

use alloc::string::{String, ToString};
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use hashbrown::{HashMap, HashSet};
use peniko::Color;
use peniko::color::palette::css;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::channel::{Channel, FieldType};
use crate::format::{value_as_datetime, value_as_f64};
use crate::time;

/// Default tick count used when applying `nice` to a domain.
const NICE_TICK_COUNT: usize = 10;

/// Scale kinds accepted in a [`ScaleConfig`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleType {
    /// Continuous linear scale.
    Linear,
    /// Continuous log scale.
    Log,
    /// Continuous square-root scale.
    Sqrt,
    /// Continuous time scale (epoch milliseconds).
    Time,
    /// Continuous time scale in UTC. Equivalent to [`ScaleType::Time`] here; all
    /// time handling is UTC.
    Utc,
    /// Discrete band scale.
    Band,
    /// Discrete point scale.
    Point,
    /// Discrete ordinal color scale.
    Ordinal,
    /// Continuous domain split into discrete color buckets.
    Quantize,
}

/// Broad family of a scale, used by axis layout to decide label flushing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScaleTypeCategory {
    /// Continuous domain and range.
    Continuous,
    /// Discrete domain.
    Categorical,
    /// Continuous domain, discrete range.
    Discretizing,
}

impl ScaleType {
    /// Returns the family this scale type belongs to.
    pub fn category(self) -> ScaleTypeCategory {
        match self {
            Self::Linear | Self::Log | Self::Sqrt | Self::Time | Self::Utc => {
                ScaleTypeCategory::Continuous
            }
            Self::Band | Self::Point | Self::Ordinal => ScaleTypeCategory::Categorical,
            Self::Quantize => ScaleTypeCategory::Discretizing,
        }
    }
}

/// Declarative scale options on a channel definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScaleConfig {
    /// Scale kind. Defaults from the field type and channel.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub scale_type: Option<ScaleType>,
    /// Explicit domain: `[min, max]` for continuous scales, the category list otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<Vec<Value>>,
    /// Explicit range: numbers for positional scales, CSS colors for color scales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<Vec<Value>>,
    /// Extend a continuous domain to nice round values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nice: Option<bool>,
    /// Log base.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base: Option<f64>,
    /// Padding for band (inner and outer) or point (outer) scales.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<f64>,
    /// Inner band padding; overrides `padding`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_inner: Option<f64>,
    /// Outer band padding; overrides `padding`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding_outer: Option<f64>,
}

impl ScaleConfig {
    /// Creates an empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the scale type.
    pub fn with_type(mut self, scale_type: ScaleType) -> Self {
        self.scale_type = Some(scale_type);
        self
    }

    /// Sets an explicit domain.
    pub fn with_domain(mut self, domain: Vec<Value>) -> Self {
        self.domain = Some(domain);
        self
    }

    /// Sets an explicit range.
    pub fn with_range(mut self, range: Vec<Value>) -> Self {
        self.range = Some(range);
        self
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = Some(nice);
        self
    }
}

/// A runtime scale.
#[derive(Clone, Debug)]
pub enum Scale {
    /// Linear scale.
    Linear(ScaleLinear),
    /// Log scale.
    Log(ScaleLog),
    /// Power scale (square root).
    Pow(ScalePow),
    /// Time scale.
    Time(ScaleTime),
    /// Band scale.
    Band(ScaleBand),
    /// Point scale.
    Point(ScalePoint),
    /// Ordinal color scale.
    Ordinal(ScaleOrdinal),
    /// Quantize color scale.
    Quantize(ScaleQuantize),
}

impl Scale {
    /// The family of this scale.
    pub fn category(&self) -> ScaleTypeCategory {
        match self {
            Self::Linear(_) | Self::Log(_) | Self::Pow(_) | Self::Time(_) => {
                ScaleTypeCategory::Continuous
            }
            Self::Band(_) | Self::Point(_) | Self::Ordinal(_) => ScaleTypeCategory::Categorical,
            Self::Quantize(_) => ScaleTypeCategory::Discretizing,
        }
    }

    /// Returns `true` for discrete scales mapping categories to colors.
    pub fn is_categorical_color(&self) -> bool {
        matches!(self, Self::Ordinal(_))
    }

    /// The scale's domain as data values.
    ///
    /// Continuous scales return `[min, max]` (as authored, or after `nice`).
    pub fn domain(&self) -> Vec<Value> {
        let pair = |(a, b): (f64, f64)| alloc::vec![number(a), number(b)];
        match self {
            Self::Linear(s) => pair(s.domain),
            Self::Log(s) => pair(s.domain),
            Self::Pow(s) => pair(s.domain),
            Self::Time(s) => pair(s.inner.domain),
            Self::Quantize(s) => pair(s.domain),
            Self::Band(s) => s.domain.values.clone(),
            Self::Point(s) => s.domain.values.clone(),
            Self::Ordinal(s) => s.domain.values.clone(),
        }
    }

    /// Tick values, or `None` if this scale has no tick generator (band, point
    /// and ordinal scales).
    pub fn ticks(&self, count: usize) -> Option<Vec<Value>> {
        let ticks = match self {
            Self::Linear(s) => s.ticks(count),
            Self::Log(s) => s.ticks(count),
            Self::Pow(s) => s.ticks(count),
            Self::Time(s) => s.ticks(count),
            Self::Quantize(s) => s.ticks(count),
            Self::Band(_) | Self::Point(_) | Self::Ordinal(_) => return None,
        };
        Some(ticks.into_iter().map(number).collect())
    }

    /// Maps a number through a continuous positional scale.
    pub fn map_f64(&self, x: f64) -> Option<f64> {
        match self {
            Self::Linear(s) => Some(s.map(x)),
            Self::Log(s) => Some(s.map(x)),
            Self::Pow(s) => Some(s.map(x)),
            Self::Time(s) => Some(s.map(x)),
            _ => None,
        }
    }

    /// Maps a data value to a position.
    ///
    /// Band scales return the start of the band.
    pub fn map_value(&self, value: &Value) -> Option<f64> {
        match self {
            Self::Time(s) => value_as_datetime(value)
                .map(|dt| dt.and_utc().timestamp_millis())
                .map(|ms| s.map(ms_to_f64(ms))),
            Self::Band(s) => s.domain.index_of(value).map(|i| s.x(i)),
            Self::Point(s) => s.domain.index_of(value).map(|i| s.x(i)),
            Self::Ordinal(_) | Self::Quantize(_) => None,
            _ => self.map_f64(value_as_f64(value)?),
        }
    }

    /// Maps a data value to a color.
    pub fn map_color(&self, value: &Value) -> Option<Color> {
        match self {
            Self::Ordinal(s) => s.map(value),
            Self::Quantize(s) => s.map(value_as_f64(value)?),
            _ => None,
        }
    }

    /// Band width for band scales, `0` otherwise.
    pub fn bandwidth(&self) -> f64 {
        match self {
            Self::Band(s) => s.band_width(),
            _ => 0.0,
        }
    }

    /// Returns this scale with a new output range. Color scales are unchanged.
    #[must_use]
    pub fn with_range(self, range: (f64, f64)) -> Self {
        match self {
            Self::Linear(s) => Self::Linear(ScaleLinear { range, ..s }),
            Self::Log(s) => Self::Log(ScaleLog { range, ..s }),
            Self::Pow(s) => Self::Pow(ScalePow { range, ..s }),
            Self::Time(s) => Self::Time(ScaleTime {
                inner: ScaleLinear { range, ..s.inner },
            }),
            Self::Band(s) => Self::Band(ScaleBand { range, ..s }),
            Self::Point(s) => Self::Point(ScalePoint { range, ..s }),
            other => other,
        }
    }
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}

fn ms_to_f64(ms: i64) -> f64 {
    #[allow(
        clippy::cast_precision_loss,
        reason = "millisecond timestamps of representable dates fit in f64's mantissa"
    )]
    {
        ms as f64
    }
}

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Extends the domain to nice round values.
    #[must_use]
    pub fn nice(mut self, count: usize) -> Self {
        self.domain = nice_domain(self.domain, count);
        self
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        self.domain.0
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }

    /// Returns “nice-ish” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Returns about `count` round tick values inside `[min, max]`.
pub(crate) fn nice_ticks(min: f64, max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    let reverse = min > max;
    let (lo, hi) = if reverse { (max, min) } else { (min, max) };
    let step = nice_step((hi - lo) / count.max(1) as f64);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    // Fractional steps divide by the inverse step, which keeps 0.1 * 3 == 0.3.
    let inverse = if step < 1.0 { (1.0 / step).round() } else { 0.0 };
    let (i0, i1) = if inverse > 0.0 {
        ((lo * inverse).ceil(), (hi * inverse).floor())
    } else {
        ((lo / step).ceil(), (hi / step).floor())
    };
    let n_f = i1 - i0;
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    let mut ticks: Vec<f64> = (0..=n)
        .map(|i| {
            let k = i0 + i as f64;
            if inverse > 0.0 { k / inverse } else { k * step }
        })
        .filter(|t| *t >= lo && *t <= hi)
        .collect();
    if reverse {
        ticks.reverse();
    }
    ticks
}

/// Extends a domain outward to multiples of its nice tick step.
pub(crate) fn nice_domain(domain: (f64, f64), count: usize) -> (f64, f64) {
    let (d0, d1) = domain;
    if !d0.is_finite() || !d1.is_finite() || d0 == d1 || count == 0 {
        return domain;
    }
    let reverse = d0 > d1;
    let (mut lo, mut hi) = if reverse { (d1, d0) } else { (d0, d1) };
    // Two passes: extending the domain can change the step.
    for _ in 0..2 {
        let step = nice_step((hi - lo) / count as f64);
        if step == 0.0 {
            break;
        }
        lo = (lo / step).floor() * step;
        hi = (hi / step).ceil() * step;
    }
    if reverse { (hi, lo) } else { (lo, hi) }
}

pub(crate) fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// An ordered set of category values with constant-time lookup.
#[derive(Clone, Debug, Default)]
pub struct CategoricalDomain {
    values: Vec<Value>,
    index: HashMap<String, usize>,
}

impl CategoricalDomain {
    /// Builds a domain from values, dropping duplicates but keeping first-seen order.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        let mut out = Self::default();
        for value in values {
            let key = value.to_string();
            if !out.index.contains_key(&key) {
                out.index.insert(key, out.values.len());
                out.values.push(value);
            }
        }
        out
    }

    /// The values in order.
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Number of categories.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if there are no categories.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Position of `value` in the domain.
    pub fn index_of(&self, value: &Value) -> Option<usize> {
        self.index.get(&value.to_string()).copied()
    }
}

/// A discrete band scale for categorical charts.
#[derive(Clone, Debug)]
pub struct ScaleBand {
    domain: CategoricalDomain,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering the `domain` categories over `range`.
    pub fn new(domain: CategoricalDomain, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    #[must_use]
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count() as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }

    /// Returns the position of the band at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let bw = self.band_width();
        let step = bw * (1.0 + self.padding_inner);
        let start = if r1 >= r0 { r0 } else { r1 };
        start + bw * self.padding_outer + step * index as f64
    }
}

/// A discrete point scale (like band without width).
#[derive(Clone, Debug)]
pub struct ScalePoint {
    domain: CategoricalDomain,
    range: (f64, f64),
    padding: f64,
}

impl ScalePoint {
    /// Creates a new point scale.
    pub fn new(domain: CategoricalDomain, range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    #[must_use]
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.domain.len() as f64;
        if n <= 1.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = (n - 1.0) + 2.0 * self.padding;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the position of the point at `index`.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let step = self.step();
        let start = if r1 >= r0 { r0 } else { r1 };
        start + self.padding * step + step * index as f64
    }
}

/// A log-scale mapping from a positive domain to a range.
#[derive(Clone, Copy, Debug)]
pub struct ScaleLog {
    domain: (f64, f64),
    range: (f64, f64),
    base: f64,
}

impl ScaleLog {
    /// Creates a new log scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            base: 10.0,
        }
    }

    /// Sets the log base.
    #[must_use]
    pub fn with_base(mut self, base: f64) -> Self {
        self.base = if base.is_finite() && base > 0.0 && base != 1.0 {
            base
        } else {
            10.0
        };
        self
    }

    fn log_base(&self, x: f64) -> f64 {
        let denom = self.base.ln();
        if denom == 0.0 { x.ln() } else { x.ln() / denom }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        if x <= 0.0 || d0 <= 0.0 || d1 <= 0.0 {
            return r0;
        }
        let ld0 = self.log_base(d0);
        let ld1 = self.log_base(d1);
        let denom = ld1 - ld0;
        if denom == 0.0 {
            return r0;
        }
        let t = (self.log_base(x) - ld0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Returns powers of `base` that fall within the domain, capped by `count`.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        let (mut min, mut max) = self.domain;
        if min > max {
            core::mem::swap(&mut min, &mut max);
        }
        if min <= 0.0 || !min.is_finite() || !max.is_finite() {
            return Vec::new();
        }
        let exponent = |v: f64| {
            let e = v.clamp(f64::from(i32::MIN), f64::from(i32::MAX));
            #[allow(clippy::cast_possible_truncation, reason = "clamped to the i32 range")]
            {
                e as i32
            }
        };
        let min_e = exponent(self.log_base(min).floor());
        let max_e = exponent(self.log_base(max).ceil());
        let mut out = Vec::new();
        for e in min_e..=max_e {
            let t = self.base.powi(e);
            if t < min || t > max {
                continue;
            }
            out.push(t);
            if count != 0 && out.len() >= count {
                break;
            }
        }
        out
    }

    /// Extends the domain to whole powers of the base.
    #[must_use]
    pub fn nice(mut self) -> Self {
        let (d0, d1) = self.domain;
        if d0 > 0.0 && d1 > 0.0 && d0.is_finite() && d1.is_finite() {
            let lo = self.base.powf(self.log_base(d0.min(d1)).floor());
            let hi = self.base.powf(self.log_base(d0.max(d1)).ceil());
            self.domain = if d0 > d1 { (hi, lo) } else { (lo, hi) };
        }
        self
    }
}

/// A power scale, `y = sign(x) * |x|^exponent`.
#[derive(Clone, Copy, Debug)]
pub struct ScalePow {
    domain: (f64, f64),
    range: (f64, f64),
    exponent: f64,
}

impl ScalePow {
    /// Creates a square-root scale.
    pub fn sqrt(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            exponent: 0.5,
        }
    }

    fn transform(&self, x: f64) -> f64 {
        let y = if self.exponent == 0.5 {
            x.abs().sqrt()
        } else {
            x.abs().powf(self.exponent)
        };
        if x < 0.0 { -y } else { y }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = (self.transform(self.domain.0), self.transform(self.domain.1));
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        r0 + (self.transform(x) - d0) / denom * (r1 - r0)
    }

    /// Returns linear “nice-ish” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// A time scale: a linear scale over epoch milliseconds with calendar-aware ticks.
#[derive(Clone, Copy, Debug)]
pub struct ScaleTime {
    inner: ScaleLinear,
}

impl ScaleTime {
    /// Creates a new time scale.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            inner: ScaleLinear::new(domain, range),
        }
    }

    /// Maps a timestamp value into range space.
    pub fn map(&self, t: f64) -> f64 {
        self.inner.map(t)
    }

    /// Returns time tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        time::nice_time_ticks_ms(self.inner.domain_min(), self.inner.domain_max(), count)
    }

    /// Extends the domain to tick interval boundaries.
    #[must_use]
    pub fn nice(mut self, count: usize) -> Self {
        self.inner.domain = time::nice_time_domain(self.inner.domain.0, self.inner.domain.1, count);
        self
    }
}

/// The default categorical palette. Repeats when the domain is longer.
pub const DEFAULT_PALETTE: [Color; 8] = [
    css::CORNFLOWER_BLUE,
    css::ORANGE,
    css::MEDIUM_SEA_GREEN,
    css::CRIMSON,
    css::GOLDENROD,
    css::SLATE_BLUE,
    css::DARK_CYAN,
    css::HOT_PINK,
];

/// Maps categories to colors by position.
#[derive(Clone, Debug)]
pub struct ScaleOrdinal {
    domain: CategoricalDomain,
    range: Vec<Color>,
}

impl ScaleOrdinal {
    /// Creates an ordinal color scale. An empty `range` uses [`DEFAULT_PALETTE`].
    pub fn new(domain: CategoricalDomain, range: Vec<Color>) -> Self {
        let range = if range.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            range
        };
        Self { domain, range }
    }

    /// Returns the color for `value`, or `None` if it is not in the domain.
    pub fn map(&self, value: &Value) -> Option<Color> {
        let i = self.domain.index_of(value)?;
        self.range.get(i % self.range.len()).copied()
    }
}

/// Splits a continuous domain into equal buckets, one per range color.
#[derive(Clone, Debug)]
pub struct ScaleQuantize {
    domain: (f64, f64),
    range: Vec<Color>,
}

impl ScaleQuantize {
    /// Creates a quantize scale. An empty `range` uses [`DEFAULT_PALETTE`].
    pub fn new(domain: (f64, f64), range: Vec<Color>) -> Self {
        let range = if range.is_empty() {
            DEFAULT_PALETTE.to_vec()
        } else {
            range
        };
        Self { domain, range }
    }

    /// Returns the bucket color for `x`.
    pub fn map(&self, x: f64) -> Option<Color> {
        if !x.is_finite() {
            return None;
        }
        let (d0, d1) = self.domain;
        let n = self.range.len();
        let span = d1 - d0;
        let t = if span == 0.0 { 0.0 } else { (x - d0) / span };
        let bucket = (t * n as f64).floor().clamp(0.0, (n - 1) as f64);
        #[allow(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "clamped to 0..n"
        )]
        let bucket = bucket as usize;
        self.range.get(bucket).copied()
    }

    /// Returns “nice-ish” tick values inside the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

/// Infer a `(min, max)` domain from numbers.
///
/// Non-finite values are ignored. Returns `None` if no finite values are present.
pub fn infer_domain_f64(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() {
        Some((min, max))
    } else {
        None
    }
}

/// Distinct non-null values in first-seen order.
pub fn distinct_values<'a>(values: impl IntoIterator<Item = &'a Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    values
        .into_iter()
        .filter(|v| !v.is_null())
        .filter(|v| seen.insert(v.to_string()))
        .cloned()
        .collect()
}

fn default_scale_type(channel: Channel, field_type: FieldType) -> Option<ScaleType> {
    Some(match (field_type, channel.is_positional()) {
        (FieldType::Quantitative, _) => {
            if channel.is_color() {
                ScaleType::Quantize
            } else {
                ScaleType::Linear
            }
        }
        (FieldType::Temporal, _) => ScaleType::Time,
        (FieldType::Nominal | FieldType::Ordinal, true) => ScaleType::Band,
        (FieldType::Nominal | FieldType::Ordinal, false) => {
            if channel.is_color() {
                ScaleType::Ordinal
            } else {
                return None;
            }
        }
    })
}

fn continuous_domain(
    config: Option<&ScaleConfig>,
    values: &[Value],
    temporal: bool,
) -> (f64, f64) {
    let read = |v: &Value| {
        if temporal {
            value_as_datetime(v).map(|dt| ms_to_f64(dt.and_utc().timestamp_millis()))
        } else {
            value_as_f64(v)
        }
    };
    if let Some(domain) = config.and_then(|c| c.domain.as_deref())
        && let [a, b, ..] = domain
        && let (Some(a), Some(b)) = (read(a), read(b))
    {
        return (a, b);
    }
    infer_domain_f64(values.iter().filter_map(read)).unwrap_or((0.0, 1.0))
}

fn categorical_domain(config: Option<&ScaleConfig>, values: &[Value]) -> CategoricalDomain {
    match config.and_then(|c| c.domain.clone()) {
        Some(domain) => CategoricalDomain::new(domain),
        None => CategoricalDomain::new(distinct_values(values)),
    }
}

fn numeric_range(config: Option<&ScaleConfig>) -> (f64, f64) {
    config
        .and_then(|c| c.range.as_deref())
        .and_then(|r| match r {
            [a, b, ..] => Some((value_as_f64(a)?, value_as_f64(b)?)),
            _ => None,
        })
        .unwrap_or((0.0, 1.0))
}

fn color_range(config: Option<&ScaleConfig>) -> Vec<Color> {
    let Some(range) = config.and_then(|c| c.range.as_deref()) else {
        return Vec::new();
    };
    range
        .iter()
        .filter_map(|v| {
            let s = v.as_str()?;
            match parse_color(s) {
                Ok(color) => Some(color.to_alpha_color::<Srgb>()),
                Err(_) => {
                    log::warn!("ignoring unparseable color `{s}` in scale range");
                    None
                }
            }
        })
        .collect()
}

/// Resolves the runtime scale for a channel.
///
/// `values` are the channel's data values (used to infer a domain when the config
/// has none). Returns `None` when neither the config nor the field type calls for
/// a scale (constant channels, shape/text/tooltip channels).
pub fn resolve_scale(
    channel: Channel,
    field_type: Option<FieldType>,
    config: Option<&ScaleConfig>,
    values: &[Value],
) -> Option<Scale> {
    let scale_type = config
        .and_then(|c| c.scale_type)
        .or_else(|| default_scale_type(channel, field_type?))?;
    let nice = config.and_then(|c| c.nice).unwrap_or(false);
    let range = numeric_range(config);

    let scale = match scale_type {
        ScaleType::Linear => {
            let s = ScaleLinear::new(continuous_domain(config, values, false), range);
            Scale::Linear(if nice { s.nice(NICE_TICK_COUNT) } else { s })
        }
        ScaleType::Log => {
            let mut s = ScaleLog::new(continuous_domain(config, values, false), range);
            if let Some(base) = config.and_then(|c| c.base) {
                s = s.with_base(base);
            }
            Scale::Log(if nice { s.nice() } else { s })
        }
        ScaleType::Sqrt => {
            let domain = continuous_domain(config, values, false);
            let domain = if nice {
                nice_domain(domain, NICE_TICK_COUNT)
            } else {
                domain
            };
            Scale::Pow(ScalePow::sqrt(domain, range))
        }
        ScaleType::Time | ScaleType::Utc => {
            let s = ScaleTime::new(continuous_domain(config, values, true), range);
            Scale::Time(if nice { s.nice(NICE_TICK_COUNT) } else { s })
        }
        ScaleType::Band => {
            let padding = config.and_then(|c| c.padding);
            let inner = config.and_then(|c| c.padding_inner).or(padding).unwrap_or(0.1);
            let outer = config.and_then(|c| c.padding_outer).or(padding).unwrap_or(0.1);
            Scale::Band(
                ScaleBand::new(categorical_domain(config, values), range)
                    .with_padding(inner, outer),
            )
        }
        ScaleType::Point => {
            let padding = config.and_then(|c| c.padding).unwrap_or(0.5);
            Scale::Point(
                ScalePoint::new(categorical_domain(config, values), range).with_padding(padding),
            )
        }
        ScaleType::Ordinal => Scale::Ordinal(ScaleOrdinal::new(
            categorical_domain(config, values),
            color_range(config),
        )),
        ScaleType::Quantize => Scale::Quantize(ScaleQuantize::new(
            continuous_domain(config, values, false),
            color_range(config),
        )),
    };
    Some(scale)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn point_scale_positions_are_monotonic() {
        let domain = CategoricalDomain::new([json!("a"), json!("b"), json!("c")]);
        let scale = ScalePoint::new(domain, (0.0, 100.0));
        let a = scale.x(0);
        let b = scale.x(1);
        let c = scale.x(2);
        assert!(a < b);
        assert!(b < c);
    }

    #[test]
    fn log_scale_maps_endpoints_to_range() {
        let s = ScaleLog::new((1.0, 100.0), (0.0, 10.0));
        assert!((s.map(1.0) - 0.0).abs() < 1e-9);
        assert!((s.map(100.0) - 10.0).abs() < 1e-9);
        assert_eq!(s.ticks(10), alloc::vec![1.0, 10.0, 100.0]);
    }

    #[test]
    fn linear_ticks_stay_inside_domain() {
        let ticks = nice_ticks(-11.0, 55.0, 5);
        assert_eq!(ticks, alloc::vec![-10.0, 0.0, 10.0, 20.0, 30.0, 40.0, 50.0]);
    }

    #[test]
    fn fractional_ticks_avoid_float_noise() {
        let ticks = nice_ticks(0.0, 1.0, 10);
        assert_eq!(ticks[3], 0.3);
        assert_eq!(ticks.len(), 11);
    }

    #[test]
    fn nice_domain_extends_outward() {
        assert_eq!(nice_domain((-11.0, 55.0), 10), (-15.0, 55.0));
        assert_eq!(nice_domain((0.2, 9.7), 10), (0.0, 10.0));
    }

    #[test]
    fn categorical_domain_dedupes_in_first_seen_order() {
        let values = [json!("b"), json!("a"), json!("b"), json!(null), json!(1)];
        let domain = distinct_values(&values);
        assert_eq!(domain, alloc::vec![json!("b"), json!("a"), json!(1)]);
    }

    #[test]
    fn defaults_follow_field_type_and_channel() {
        let values = [json!("a"), json!("b")];
        let x = resolve_scale(Channel::X, Some(FieldType::Nominal), None, &values);
        assert!(matches!(x, Some(Scale::Band(_))));
        let color = resolve_scale(Channel::Color, Some(FieldType::Nominal), None, &values);
        assert!(color.as_ref().is_some_and(Scale::is_categorical_color));
        let y = resolve_scale(Channel::Y, Some(FieldType::Quantitative), None, &[json!(3)]);
        assert_eq!(y.map(|s| s.category()), Some(ScaleTypeCategory::Continuous));
        assert!(resolve_scale(Channel::Text, Some(FieldType::Nominal), None, &values).is_none());
        assert!(resolve_scale(Channel::X, None, None, &values).is_none());
    }

    #[test]
    fn explicit_domain_wins_over_data() {
        let config = ScaleConfig::new().with_domain(alloc::vec![json!(-11), json!(55)]);
        let scale = resolve_scale(
            Channel::Y,
            Some(FieldType::Quantitative),
            Some(&config),
            &[json!(0), json!(10)],
        )
        .expect("linear scale");
        assert_eq!(scale.domain(), alloc::vec![json!(-11.0), json!(55.0)]);
    }

    #[test]
    fn band_and_ordinal_scales_have_no_tick_generator() {
        let values = [json!("a"), json!("b")];
        let band = resolve_scale(Channel::X, Some(FieldType::Ordinal), None, &values)
            .expect("band scale");
        assert!(band.ticks(5).is_none());
        assert_eq!(band.domain().len(), 2);
    }

    #[test]
    fn band_positions_use_padding() {
        let band = resolve_scale(
            Channel::X,
            Some(FieldType::Nominal),
            None,
            &[json!("a"), json!("b")],
        )
        .expect("band scale")
        .with_range((0.0, 210.0));
        // 2 bands + 0.1 inner + 0.2 outer = 2.3 band units.
        assert!((band.bandwidth() - 210.0 / 2.3).abs() < 1e-9);
        let a = band.map_value(&json!("a")).expect("a is in the domain");
        assert!((a - 0.1 * band.bandwidth()).abs() < 1e-9);
        assert!(band.map_value(&json!("z")).is_none());
    }

    #[test]
    fn ordinal_colors_cycle_and_parse_css() {
        let config = ScaleConfig::new().with_range(alloc::vec![json!("#ff0000"), json!("blue")]);
        let values = [json!("a"), json!("b"), json!("c")];
        let scale = resolve_scale(Channel::Color, Some(FieldType::Nominal), Some(&config), &values)
            .expect("ordinal scale");
        let a = scale.map_color(&json!("a")).expect("mapped");
        let c = scale.map_color(&json!("c")).expect("mapped");
        assert_eq!(a.to_rgba8(), c.to_rgba8());
        assert_eq!(a.to_rgba8().r, 255);
    }

    #[test]
    fn quantize_buckets_cover_domain() {
        let scale = ScaleQuantize::new(
            (0.0, 100.0),
            alloc::vec![css::RED, css::GREEN, css::BLUE, css::BLACK],
        );
        let rgba = |x: f64| scale.map(x).map(|c| c.to_rgba8());
        assert_eq!(rgba(0.0), Some(css::RED.to_rgba8()));
        assert_eq!(rgba(49.0), Some(css::GREEN.to_rgba8()));
        assert_eq!(rgba(100.0), Some(css::BLACK.to_rgba8()));
    }

    #[test]
    fn time_scale_maps_iso_strings() {
        let values = [json!("2021-01-01T00:00:00Z"), json!("2021-01-02T00:00:00Z")];
        let scale = resolve_scale(Channel::X, Some(FieldType::Temporal), None, &values)
            .expect("time scale")
            .with_range((0.0, 100.0));
        let mid = scale.map_value(&json!("2021-01-01T12:00:00Z")).expect("mapped");
        assert!((mid - 50.0).abs() < 1e-9);
    }
}
