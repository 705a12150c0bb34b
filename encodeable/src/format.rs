// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Value formatting for tick labels.
//!
//! [`resolve_format`] turns a field type plus a format string into a [`Formatter`]:
//! - temporal fields get a `strftime`-style time formatter (values are epoch
//!   milliseconds or RFC 3339 strings),
//! - everything else gets a d3-style number formatter
//!   (`[[fill]align][sign][symbol][0][width][,][.precision][~][type]`).
//!
//! Unrecognized format strings never fail a render: they are logged and the
//! resulting formatter passes values through unchanged.

extern crate alloc;

use alloc::borrow::ToOwned;
use alloc::format;
use alloc::string::{String, ToString};
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt::Write as _;
use core::str::FromStr;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Timelike, Utc, Weekday};
use serde_json::Value;

use crate::channel::FieldType;
use crate::error::FormatError;

/// Named format resolving to [`smart_number_formatter`].
pub const SMART_NUMBER: &str = "SMART_NUMBER";

/// Named format resolving to [`smart_time_formatter`].
pub const SMART_DATE: &str = "SMART_DATE";

/// Widest padding a number specifier may request.
const MAX_WIDTH: usize = 1024;

const SI_PREFIXES: [&str; 17] = [
    "y", "z", "a", "f", "p", "n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z", "Y",
];

/// A shareable `value -> label` function.
#[derive(Clone)]
pub struct Formatter(Arc<dyn Fn(&Value) -> String + Send + Sync>);

impl core::fmt::Debug for Formatter {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("Formatter(..)")
    }
}

impl Formatter {
    /// Wraps a formatting closure.
    pub fn new(f: impl Fn(&Value) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    /// A formatter that renders values as-is (strings without quotes).
    pub fn identity() -> Self {
        Self::new(value_to_string)
    }

    /// Formats a single value.
    pub fn format(&self, value: &Value) -> String {
        (self.0)(value)
    }

    /// Formats a plain number.
    pub fn format_f64(&self, value: f64) -> String {
        match serde_json::Number::from_f64(value) {
            Some(n) => self.format(&Value::Number(n)),
            None => non_finite_label(value).to_owned(),
        }
    }
}

/// Renders a value the way a string conversion would: strings verbatim, other
/// values in their JSON form.
pub fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Resolves a format string for a field of the given type.
///
/// `SMART_NUMBER` and `SMART_DATE` name the smart formatters. Otherwise a
/// temporal field gets a time formatter and a quantitative field a number
/// formatter. Nominal, ordinal and untyped fields render their values as is.
/// A format string that cannot be interpreted yields a pass-through formatter.
pub fn resolve_format(field_type: Option<FieldType>, format: &str) -> Formatter {
    match format {
        SMART_NUMBER => return smart_number_formatter(),
        SMART_DATE => return smart_time_formatter(),
        _ => {}
    }
    match field_type {
        Some(FieldType::Temporal) => time_formatter(format),
        Some(FieldType::Quantitative) => match NumberFormat::parse(format) {
            Ok(number_format) => number_formatter(number_format),
            Err(err) => {
                log::warn!("{err}; labels will be rendered unformatted");
                Formatter::identity()
            }
        },
        _ => {
            log::debug!("format `{format}` ignored for {field_type:?} field");
            Formatter::identity()
        }
    }
}

/// Wraps a parsed [`NumberFormat`]. Non-numeric values pass through.
pub fn number_formatter(number_format: NumberFormat) -> Formatter {
    Formatter::new(move |value| match value_as_f64(value) {
        Some(v) => number_format.format(v),
        None => value_to_string(value),
    })
}

/// Number formatting that picks a precision by magnitude.
///
/// - `0` renders as `0`
/// - `|v| >= 1000` uses SI prefixes with 3 significant digits (`1.23k`)
/// - `|v| >= 1` uses grouped fixed notation with up to 3 decimals (`12.5`)
/// - `|v| >= 0.001` rounds to 3 significant digits (`0.0123`)
/// - smaller values use SI prefixes again (`12.3µ`)
pub fn smart_number_formatter() -> Formatter {
    let si = NumberFormat {
        precision: Some(3),
        trim: true,
        kind: FormatKind::SiPrefix,
        ..NumberFormat::default()
    };
    let fixed = NumberFormat {
        comma: true,
        precision: Some(3),
        trim: true,
        kind: FormatKind::Fixed,
        ..NumberFormat::default()
    };
    let rounded = NumberFormat {
        precision: Some(3),
        trim: true,
        kind: FormatKind::Rounded,
        ..NumberFormat::default()
    };
    Formatter::new(move |value| {
        let Some(v) = value_as_f64(value) else {
            return value_to_string(value);
        };
        let abs = v.abs();
        if v == 0.0 {
            String::from("0")
        } else if abs >= 1000.0 {
            si.format(v)
        } else if abs >= 1.0 {
            fixed.format(v)
        } else if abs >= 0.001 {
            rounded.format(v)
        } else {
            si.format(v)
        }
    })
}

/// A time formatter for a `strftime`-style pattern.
///
/// The d3 millisecond directive `%L` is accepted as an alias of `%3f`. A pattern
/// with unknown directives yields a pass-through formatter.
pub fn time_formatter(pattern: &str) -> Formatter {
    let pattern = pattern.replace("%L", "%3f");
    if StrftimeItems::new(&pattern).any(|item| matches!(item, Item::Error)) {
        log::warn!("invalid time format `{pattern}`; labels will be rendered unformatted");
        return Formatter::identity();
    }
    Formatter::new(move |value| match value_as_datetime(value) {
        Some(dt) => format_datetime(&dt, &pattern).unwrap_or_else(|| value_to_string(value)),
        None => value_to_string(value),
    })
}

/// Multi-scale time labels: the coarsest unit that is not at its start decides
/// the pattern (`.%L`, `:%S`, `%I:%M`, `%I %p`, `%a %d`/`%b %d`, `%B`, `%Y`).
pub fn smart_time_formatter() -> Formatter {
    Formatter::new(|value| match value_as_datetime(value) {
        Some(dt) => format_datetime(&dt, smart_time_pattern(&dt))
            .unwrap_or_else(|| value_to_string(value)),
        None => value_to_string(value),
    })
}

fn smart_time_pattern(dt: &NaiveDateTime) -> &'static str {
    if dt.nanosecond() / 1_000_000 != 0 {
        ".%3f"
    } else if dt.second() != 0 {
        ":%S"
    } else if dt.minute() != 0 {
        "%I:%M"
    } else if dt.hour() != 0 {
        "%I %p"
    } else if dt.day() != 1 {
        if dt.weekday() == Weekday::Sun {
            "%b %d"
        } else {
            "%a %d"
        }
    } else if dt.month() != 1 {
        "%B"
    } else {
        "%Y"
    }
}

fn format_datetime(dt: &NaiveDateTime, pattern: &str) -> Option<String> {
    let mut out = String::new();
    write!(out, "{}", dt.format(pattern)).ok()?;
    Some(out)
}

/// Reads a value as a number: JSON numbers, or strings holding a number.
pub(crate) fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

/// Reads a value as a UTC timestamp: epoch milliseconds, RFC 3339 or `YYYY-MM-DD`.
pub(crate) fn value_as_datetime(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::Number(n) => {
            let ms = n.as_f64()?;
            if !ms.is_finite() {
                return None;
            }
            #[allow(
                clippy::cast_possible_truncation,
                reason = "finite millisecond timestamps fit i64; `as` saturates otherwise"
            )]
            let ms = ms.round() as i64;
            DateTime::<Utc>::from_timestamp_millis(ms).map(|dt| dt.naive_utc())
        }
        Value::String(s) => DateTime::parse_from_rfc3339(s)
            .ok()
            .map(|dt| dt.naive_utc())
            .or_else(|| {
                NaiveDate::parse_from_str(s, "%Y-%m-%d")
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            }),
        _ => None,
    }
}

fn non_finite_label(value: f64) -> &'static str {
    if value.is_nan() {
        "NaN"
    } else if value > 0.0 {
        "Infinity"
    } else {
        "-Infinity"
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Align {
    Left,
    Right,
    Center,
    /// Padding goes between the sign/symbol and the digits.
    SignFirst,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Sign {
    Minus,
    Plus,
    Space,
    Parens,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Symbol {
    None,
    Currency,
    Alternate,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum FormatKind {
    Exponent,
    Fixed,
    General,
    Rounded,
    SiPrefix,
    Percent,
    PercentRounded,
    Decimal,
    Binary,
    Octal,
    Hex,
    HexUpper,
    Char,
}

impl FormatKind {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'e' => Self::Exponent,
            'f' => Self::Fixed,
            'g' => Self::General,
            'r' => Self::Rounded,
            's' => Self::SiPrefix,
            '%' => Self::Percent,
            'p' => Self::PercentRounded,
            'd' => Self::Decimal,
            'b' => Self::Binary,
            'o' => Self::Octal,
            'x' => Self::Hex,
            'X' => Self::HexUpper,
            'c' => Self::Char,
            _ => return None,
        })
    }

    fn significant_digits(self) -> bool {
        matches!(
            self,
            Self::General | Self::Rounded | Self::SiPrefix | Self::PercentRounded
        )
    }

    fn splits_suffix(self) -> bool {
        matches!(
            self,
            Self::Decimal
                | Self::Exponent
                | Self::Fixed
                | Self::General
                | Self::Rounded
                | Self::SiPrefix
                | Self::Percent
                | Self::PercentRounded
        )
    }

    fn is_percent(self) -> bool {
        matches!(self, Self::Percent | Self::PercentRounded)
    }
}

/// A parsed d3-style number format specifier.
///
/// ```text
/// [[fill]align][sign][symbol][0][width][,][.precision][~][type]
/// ```
///
/// Supported types: `e f g r s % p d b o x X c`, plus `n` (grouped `g`) and no
/// type (like `g` with 12 significant digits and trailing zeros trimmed).
#[derive(Clone, Debug, PartialEq)]
pub struct NumberFormat {
    fill: char,
    align: Align,
    sign: Sign,
    symbol: Symbol,
    zero: bool,
    width: usize,
    comma: bool,
    precision: Option<usize>,
    trim: bool,
    kind: FormatKind,
}

impl Default for NumberFormat {
    fn default() -> Self {
        Self {
            fill: ' ',
            align: Align::Right,
            sign: Sign::Minus,
            symbol: Symbol::None,
            zero: false,
            width: 0,
            comma: false,
            precision: None,
            trim: false,
            kind: FormatKind::General,
        }
    }
}

impl FromStr for NumberFormat {
    type Err = FormatError;

    fn from_str(specifier: &str) -> Result<Self, Self::Err> {
        Self::parse(specifier)
    }
}

fn align_from_char(c: char) -> Option<Align> {
    match c {
        '<' => Some(Align::Left),
        '>' => Some(Align::Right),
        '^' => Some(Align::Center),
        '=' => Some(Align::SignFirst),
        _ => None,
    }
}

impl NumberFormat {
    /// Parses a specifier.
    pub fn parse(specifier: &str) -> Result<Self, FormatError> {
        let invalid = || FormatError::InvalidSpecifier {
            specifier: specifier.to_owned(),
        };
        let chars: Vec<char> = specifier.chars().collect();
        let n = chars.len();
        let mut i = 0;
        let mut out = Self::default();

        if n >= 2
            && let Some(align) = align_from_char(chars[1])
        {
            out.fill = chars[0];
            out.align = align;
            i = 2;
        } else if let Some(align) = chars.first().copied().and_then(align_from_char) {
            out.align = align;
            i = 1;
        }

        if let Some(sign) = chars.get(i).and_then(|c| match c {
            '-' => Some(Sign::Minus),
            '+' => Some(Sign::Plus),
            ' ' => Some(Sign::Space),
            '(' => Some(Sign::Parens),
            _ => None,
        }) {
            out.sign = sign;
            i += 1;
        }

        match chars.get(i) {
            Some('$') => {
                out.symbol = Symbol::Currency;
                i += 1;
            }
            Some('#') => {
                out.symbol = Symbol::Alternate;
                i += 1;
            }
            _ => {}
        }

        if chars.get(i) == Some(&'0') {
            out.zero = true;
            i += 1;
        }

        let width_start = i;
        while i < n && chars[i].is_ascii_digit() {
            i += 1;
        }
        if i > width_start {
            let digits: String = chars[width_start..i].iter().collect();
            out.width = digits.parse().map_err(|_| invalid())?;
            if out.width > MAX_WIDTH {
                return Err(invalid());
            }
        }

        if chars.get(i) == Some(&',') {
            out.comma = true;
            i += 1;
        }

        if chars.get(i) == Some(&'.') {
            i += 1;
            let start = i;
            while i < n && chars[i].is_ascii_digit() {
                i += 1;
            }
            if i == start {
                return Err(invalid());
            }
            let digits: String = chars[start..i].iter().collect();
            out.precision = Some(digits.parse().map_err(|_| invalid())?);
        }

        if chars.get(i) == Some(&'~') {
            out.trim = true;
            i += 1;
        }

        match chars.get(i) {
            None => {
                out.precision.get_or_insert(12);
                out.trim = true;
                out.kind = FormatKind::General;
            }
            Some(&c) => {
                if c == 'n' {
                    out.comma = true;
                    out.kind = FormatKind::General;
                } else if let Some(kind) = FormatKind::from_char(c) {
                    out.kind = kind;
                } else if c.is_ascii_alphabetic() {
                    out.precision.get_or_insert(12);
                    out.trim = true;
                    out.kind = FormatKind::General;
                } else {
                    return Err(invalid());
                }
                i += 1;
            }
        }

        if i != n {
            return Err(invalid());
        }

        if out.zero || (out.fill == '0' && out.align == Align::SignFirst) {
            out.zero = true;
            out.fill = '0';
            out.align = Align::SignFirst;
        }

        if out.kind == FormatKind::Decimal {
            out.precision = Some(0);
        }

        Ok(out)
    }

    fn effective_precision(&self) -> usize {
        let p = self.precision.unwrap_or(6);
        if self.kind.significant_digits() {
            p.clamp(1, 21)
        } else {
            p.min(20)
        }
    }

    /// Formats `value` according to this specifier.
    pub fn format(&self, value: f64) -> String {
        let mut negative = value < 0.0 || (value == 0.0 && value.is_sign_negative());
        let mut si_exponent = 0;
        let mut body = if value.is_finite() {
            let (body, exponent) = self.format_abs(value.abs());
            si_exponent = exponent;
            body
        } else if value.is_nan() {
            negative = false;
            String::from("NaN")
        } else {
            String::from("Infinity")
        };
        if self.trim {
            body = trim_insignificant(&body);
        }
        if negative && self.sign != Sign::Plus && body.parse::<f64>().is_ok_and(|v| v == 0.0) {
            negative = false;
        }

        let mut prefix = String::new();
        if negative {
            prefix.push(if self.sign == Sign::Parens { '(' } else { '-' });
        } else {
            match self.sign {
                Sign::Plus => prefix.push('+'),
                Sign::Space => prefix.push(' '),
                Sign::Minus | Sign::Parens => {}
            }
        }
        match self.symbol {
            Symbol::Currency => prefix.push('$'),
            Symbol::Alternate => match self.kind {
                FormatKind::Binary => prefix.push_str("0b"),
                FormatKind::Octal => prefix.push_str("0o"),
                FormatKind::Hex | FormatKind::HexUpper => prefix.push_str("0x"),
                _ => {}
            },
            Symbol::None => {}
        }

        let mut suffix = String::new();
        if self.kind == FormatKind::SiPrefix {
            suffix.push_str(si_prefix(si_exponent));
        }
        if self.symbol != Symbol::Currency && self.kind.is_percent() {
            suffix.push('%');
        }
        if negative && self.sign == Sign::Parens {
            suffix.push(')');
        }

        if self.kind.splits_suffix()
            && let Some(split) = body.find(|c: char| !c.is_ascii_digit())
        {
            let tail = body.split_off(split);
            suffix.insert_str(0, &tail);
        }

        if self.comma && !self.zero {
            body = group_thousands(&body, usize::MAX);
        }

        let length = prefix.chars().count() + body.chars().count() + suffix.chars().count();
        let mut padding: String = if length < self.width {
            core::iter::repeat_n(self.fill, self.width - length).collect()
        } else {
            String::new()
        };
        if self.comma && self.zero {
            let limit = if padding.is_empty() {
                usize::MAX
            } else {
                self.width.saturating_sub(suffix.chars().count())
            };
            padding.push_str(&body);
            body = group_thousands(&padding, limit);
            padding.clear();
        }

        match self.align {
            Align::Left => format!("{prefix}{body}{suffix}{padding}"),
            Align::SignFirst => format!("{prefix}{padding}{body}{suffix}"),
            Align::Center => {
                let half = padding.chars().count() / 2;
                let (left, right): (String, String) = {
                    let left = padding.chars().take(half).collect();
                    let right = padding.chars().skip(half).collect();
                    (left, right)
                };
                format!("{left}{prefix}{body}{suffix}{right}")
            }
            Align::Right => format!("{padding}{prefix}{body}{suffix}"),
        }
    }

    /// Formats a finite, non-negative value. Returns the SI exponent used (for `s`).
    fn format_abs(&self, x: f64) -> (String, i32) {
        let p = self.effective_precision();
        match self.kind {
            FormatKind::Exponent => (to_exponential(x, p), 0),
            FormatKind::Fixed => (format!("{x:.p$}"), 0),
            FormatKind::General => (to_precision(x, p), 0),
            FormatKind::Rounded => (format_rounded(x, p), 0),
            FormatKind::SiPrefix => format_si(x, p),
            FormatKind::Percent => (format!("{:.p$}", x * 100.0), 0),
            FormatKind::PercentRounded => (format_rounded(x * 100.0, p), 0),
            FormatKind::Decimal => (format!("{:.0}", x.round()), 0),
            FormatKind::Binary => (format!("{:b}", round_to_u128(x)), 0),
            FormatKind::Octal => (format!("{:o}", round_to_u128(x)), 0),
            FormatKind::Hex => (format!("{:x}", round_to_u128(x)), 0),
            FormatKind::HexUpper => (format!("{:X}", round_to_u128(x)), 0),
            FormatKind::Char => (format!("{x}"), 0),
        }
    }
}

fn round_to_u128(x: f64) -> u128 {
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "input is non-negative; `as` saturates beyond u128::MAX"
    )]
    {
        x.round() as u128
    }
}

fn si_prefix(exponent: i32) -> &'static str {
    let index = (exponent / 3 + 8).clamp(0, 16);
    #[allow(clippy::cast_sign_loss, reason = "clamped to 0..=16")]
    let index = index as usize;
    SI_PREFIXES[index]
}

/// Significant digits and decimal exponent of `x`, rounded to `p` significant
/// digits (`None` for the shortest round-trip representation).
fn decimal_parts(x: f64, p: Option<usize>) -> (String, i32) {
    let repr = match p {
        Some(p) if p > 0 => format!("{:.*e}", p - 1, x),
        _ => format!("{x:e}"),
    };
    let (mantissa, exponent) = repr.split_once('e').unwrap_or((repr.as_str(), "0"));
    let digits = mantissa.chars().filter(char::is_ascii_digit).collect();
    (digits, exponent.parse().unwrap_or(0))
}

fn zeros(n: usize) -> String {
    core::iter::repeat_n('0', n).collect()
}

fn exponent_suffix(exponent: i32) -> String {
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("e{sign}{}", exponent.unsigned_abs())
}

fn to_exponential(x: f64, p: usize) -> String {
    let repr = format!("{x:.p$e}");
    match repr.split_once('e') {
        Some((mantissa, exponent)) => {
            let exponent = exponent.parse().unwrap_or(0);
            format!("{mantissa}{}", exponent_suffix(exponent))
        }
        None => repr,
    }
}

fn to_precision(x: f64, p: usize) -> String {
    let (digits, e) = decimal_parts(x, Some(p));
    let p_i32 = i32::try_from(p).unwrap_or(i32::MAX);
    if e < -6 || e >= p_i32 {
        let mut out = String::from(&digits[..1]);
        if digits.len() > 1 {
            out.push('.');
            out.push_str(&digits[1..]);
        }
        out.push_str(&exponent_suffix(e));
        out
    } else if e >= 0 {
        #[allow(clippy::cast_sign_loss, reason = "checked non-negative")]
        let split = (e as usize + 1).min(digits.len());
        let (int, frac) = digits.split_at(split);
        if frac.is_empty() {
            int.to_owned()
        } else {
            format!("{int}.{frac}")
        }
    } else {
        format!("0.{}{digits}", zeros(e.unsigned_abs() as usize - 1))
    }
}

fn format_rounded(x: f64, p: usize) -> String {
    let (digits, e) = decimal_parts(x, Some(p));
    if e < 0 {
        return format!("0.{}{digits}", zeros(e.unsigned_abs() as usize - 1));
    }
    #[allow(clippy::cast_sign_loss, reason = "checked non-negative")]
    let e = e as usize;
    if digits.len() > e + 1 {
        format!("{}.{}", &digits[..=e], &digits[e + 1..])
    } else {
        format!("{digits}{}", zeros(e + 1 - digits.len()))
    }
}

fn format_si(x: f64, p: usize) -> (String, i32) {
    let (digits, e) = decimal_parts(x, Some(p));
    let prefix_exponent = (e.div_euclid(3)).clamp(-8, 8) * 3;
    let i = e - prefix_exponent + 1;
    let n = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let out = if i == n {
        digits
    } else if i > n {
        #[allow(clippy::cast_sign_loss, reason = "i > n")]
        let pad = (i - n) as usize;
        format!("{digits}{}", zeros(pad))
    } else if i > 0 {
        #[allow(clippy::cast_sign_loss, reason = "i > 0")]
        let split = i as usize;
        format!("{}.{}", &digits[..split], &digits[split..])
    } else {
        let p_rest = usize::try_from(i32::try_from(p).unwrap_or(i32::MAX) + i - 1).unwrap_or(0);
        let (rest, _) = decimal_parts(x, Some(p_rest));
        format!("0.{}{rest}", zeros(i.unsigned_abs() as usize))
    };
    (out, prefix_exponent)
}

/// Removes insignificant trailing zeros after the decimal point, keeping any
/// trailing non-digit suffix (exponents, SI prefixes).
fn trim_insignificant(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let n = chars.len();
    let mut i0: isize = -1;
    let mut i1: usize = 0;
    let mut i = 1;
    while i < n {
        match chars[i] {
            '.' => {
                i0 = i as isize;
                i1 = i;
            }
            '0' => {
                if i0 == 0 {
                    i0 = i as isize;
                }
                i1 = i;
            }
            c if c.is_ascii_digit() => {
                if i0 > 0 {
                    i0 = 0;
                }
            }
            _ => break,
        }
        i += 1;
    }
    if i0 > 0 {
        #[allow(clippy::cast_sign_loss, reason = "checked positive")]
        let i0 = i0 as usize;
        let mut out: String = chars[..i0].iter().collect();
        out.extend(&chars[i1 + 1..]);
        out
    } else {
        s.to_owned()
    }
}

/// Inserts `,` every three digits from the right, limiting output to `width`
/// characters when zero-padding.
fn group_thousands(value: &str, width: usize) -> String {
    let chars: Vec<char> = value.chars().collect();
    let mut end = chars.len();
    let mut groups: Vec<String> = Vec::new();
    let mut g = 3_usize;
    let mut length = 0_usize;
    while end > 0 && g > 0 {
        if length.saturating_add(g + 1) > width {
            g = width.saturating_sub(length).max(1);
        }
        let start = end.saturating_sub(g);
        groups.push(chars[start..end].iter().collect());
        end = start;
        length = length.saturating_add(g + 1);
        if length > width {
            break;
        }
        g = 3;
    }
    groups.reverse();
    groups.join(",")
}
