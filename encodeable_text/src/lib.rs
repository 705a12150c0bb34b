// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement hooks for axis layout.
//!
//! Axis layout needs rendered tick label extents before anything is drawn: the
//! margin an axis claims depends on how wide and tall its labels are. Shaping and
//! glyph layout stay downstream, so layout code depends on this tiny text
//! measurement interface instead.
//!
//! This crate is:
//! - small and dependency-light,
//! - `no_std`-friendly (it uses `alloc` for owned font family names and caches), and
//! - renderer-agnostic (native shaping engines and web canvas measurement can
//!   both implement the same trait).
//!
//! Style is always passed explicitly. There is no ambient or global style lookup,
//! so two calls with the same text and style always measure the same thing.

#![no_std]

extern crate alloc;

use alloc::string::String;
use alloc::sync::Arc;
use core::cell::RefCell;

use hashbrown::HashMap;

/// A minimal text measurement interface used by axis layout.
///
/// Implementations can be:
/// - heuristic (fast, but inaccurate),
/// - fixed-advance (deterministic, useful for tests and headless layout),
/// - backed by a shaping engine, or
/// - backed by web platform text measurement (e.g. HTML canvas).
///
/// Measurement must be deterministic for identical `(text, style)` inputs within
/// one measurement environment. [`CachedTextMeasurer`] relies on that.
pub trait TextMeasurer {
    /// Measure a single line of text.
    ///
    /// `text` is treated as a single line; callers should split on `\n` if they
    /// want multi-line layout.
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics;
}

impl<T: TextMeasurer + ?Sized> TextMeasurer for &T {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        (**self).measure(text, style)
    }
}

/// Text styling inputs relevant to measurement.
///
/// This is intentionally minimal: it’s just enough to make chart layout
/// consistent. More detailed typography (attributed text, shaping options,
/// fallback, etc.) belongs in a higher-level text system.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in the chart’s coordinate system (typically pixels).
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (e.g. `400` for normal, `700` for bold).
    pub font_weight: FontWeight,
    /// Font style (normal/italic/oblique).
    pub font_style: FontStyle,
}

impl TextStyle {
    /// Creates a default `TextStyle` with the given `font_size`.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
            font_style: FontStyle::Normal,
        }
    }

    /// Sets the font family.
    #[must_use]
    pub fn with_family(mut self, font_family: FontFamily) -> Self {
        self.font_family = font_family;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_weight(mut self, font_weight: FontWeight) -> Self {
        self.font_weight = font_weight;
        self
    }

    /// Sets the font style.
    #[must_use]
    pub fn with_style(mut self, font_style: FontStyle) -> Self {
        self.font_style = font_style;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Font family selection for measurement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// A generic serif family (CSS `serif`).
    Serif,
    /// A generic sans-serif family (CSS `sans-serif`).
    SansSerif,
    /// A generic monospace family (CSS `monospace`).
    Monospace,
    /// A named family (e.g. `"Inter"`, `"Helvetica Neue"`).
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the font family string for CSS-style font declarations.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// CSS-style font styles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FontStyle {
    /// Normal style.
    Normal,
    /// Italic style.
    Italic,
    /// Oblique style.
    Oblique,
}

/// Measured metrics for a single line of text.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// The advance width (useful for horizontal layout).
    pub advance_width: f64,
    /// Distance from baseline to the top of typical glyphs.
    pub ascent: f64,
    /// Distance from baseline to the bottom of typical glyphs.
    pub descent: f64,
    /// Additional line spacing beyond ascent+descent.
    pub leading: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent + leading`.
    #[must_use]
    pub fn line_height(&self) -> f64 {
        self.ascent + self.descent + self.leading
    }
}

/// A tiny heuristic text measurer suitable for demos and early layout.
///
/// It assumes an average glyph width of ~0.6em and a baseline at ~0.8em.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let advance_width = 0.6 * style.font_size * text.chars().count() as f64;
        let ascent = 0.8 * style.font_size;
        let descent = 0.2 * style.font_size;
        TextMetrics {
            advance_width,
            ascent,
            descent,
            leading: 0.0,
        }
    }
}

/// A measurer with a fixed advance per character and a fixed line height.
///
/// Ignores the style entirely. Layout computed with it is exactly reproducible,
/// which makes it the measurer of choice for tests and golden layouts.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedTextMeasurer {
    /// Advance width of every character.
    pub char_width: f64,
    /// Line height reported for every string.
    pub line_height: f64,
}

impl FixedTextMeasurer {
    /// Creates a fixed measurer.
    #[must_use]
    pub fn new(char_width: f64, line_height: f64) -> Self {
        Self {
            char_width,
            line_height,
        }
    }
}

impl TextMeasurer for FixedTextMeasurer {
    fn measure(&self, text: &str, _style: &TextStyle) -> TextMetrics {
        TextMetrics {
            advance_width: self.char_width * text.chars().count() as f64,
            ascent: self.line_height,
            descent: 0.0,
            leading: 0.0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct StyleKey {
    text: String,
    font_size_bits: u64,
    font_family: FontFamily,
    font_weight: FontWeight,
    font_style: FontStyle,
}

impl StyleKey {
    fn new(text: &str, style: &TextStyle) -> Self {
        Self {
            text: String::from(text),
            font_size_bits: style.font_size.to_bits(),
            font_family: style.font_family.clone(),
            font_weight: style.font_weight,
            font_style: style.font_style,
        }
    }
}

/// Memoizes another measurer by `(text, style)`.
///
/// Purely a performance aid: it returns exactly what the inner measurer would.
/// The cache uses interior mutability and is meant for a single layout thread.
pub struct CachedTextMeasurer<M> {
    inner: M,
    cache: RefCell<HashMap<StyleKey, TextMetrics>>,
}

impl<M: core::fmt::Debug> core::fmt::Debug for CachedTextMeasurer<M> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CachedTextMeasurer")
            .field("inner", &self.inner)
            .field("entries", &self.cache.borrow().len())
            .finish()
    }
}

impl<M: TextMeasurer> CachedTextMeasurer<M> {
    /// Wraps `inner` with an empty cache.
    pub fn new(inner: M) -> Self {
        Self {
            inner,
            cache: RefCell::new(HashMap::new()),
        }
    }

    /// Number of memoized measurements.
    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    /// Returns `true` if nothing has been measured yet.
    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Drops every memoized measurement.
    ///
    /// Call this when the measurement environment changes (fonts loaded, display
    /// scale changed, ...).
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }

    /// Returns the wrapped measurer.
    pub fn into_inner(self) -> M {
        self.inner
    }
}

impl<M: TextMeasurer> TextMeasurer for CachedTextMeasurer<M> {
    fn measure(&self, text: &str, style: &TextStyle) -> TextMetrics {
        let key = StyleKey::new(text, style);
        if let Some(metrics) = self.cache.borrow().get(&key) {
            return *metrics;
        }
        let metrics = self.inner.measure(text, style);
        self.cache.borrow_mut().insert(key, metrics);
        metrics
    }
}
