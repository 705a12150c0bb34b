// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis configuration and layout.
//!
//! An [`AxisAgent`] wraps one positional [`ChannelEncoder`]. It merges the axis
//! defaults for its direction with the options on the channel definition, produces
//! tick labels, and computes an [`AxisLayout`]: label rotation, label offset, text
//! anchor and the margin the axis must claim on its side of the plot.
//!
//! Layout runs before the final chart box exists, so it takes the available axis
//! extent as an input estimate (typically from a previous layout pass).

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use encodeable_text::{TextMeasurer, TextStyle};
use kurbo::Size;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::channel::ChannelEncoder;
use crate::format::{Formatter, resolve_format};
use crate::scale::ScaleTypeCategory;

/// Default tick label angle (degrees) for x-axes.
pub const DEFAULT_LABEL_ANGLE: f64 = 40.0;

/// Extra space reserved below x-axis labels.
const X_LABEL_SAFETY_PAD: f64 = 8.0;

/// Axis orientation, matching Vega’s axis `orient` values.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisOrient {
    /// A horizontal axis placed above the plot area.
    Top,
    /// A horizontal axis placed below the plot area.
    Bottom,
    /// A vertical axis placed to the left of the plot area.
    Left,
    /// A vertical axis placed to the right of the plot area.
    Right,
}

impl AxisOrient {
    /// The lowercase name, as used for margin keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }
}

/// Configured policy for overlapping tick labels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelOverlap {
    /// Pick a strategy from the measured labels.
    #[default]
    Auto,
    /// Keep labels horizontal.
    Flat,
    /// Rotate labels by the label angle.
    Rotate,
}

/// The strategy actually used by a layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LabelOverlapStrategy {
    /// Horizontal labels.
    Flat,
    /// Rotated labels.
    Rotate,
}

/// Horizontal anchor for rotated tick labels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    /// Anchor at the start of the text.
    Start,
    /// Anchor at the middle of the text.
    Middle,
    /// Anchor at the end of the text.
    End,
}

/// Axis title setting.
///
/// In JSON, `true` (or no title at all) is [`AxisTitle::Auto`], `false` and `""` are
/// [`AxisTitle::Hidden`], and any other string is [`AxisTitle::Text`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AxisTitle {
    /// Use the channel's derived title.
    #[default]
    Auto,
    /// No title.
    Hidden,
    /// An explicit title.
    Text(String),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawTitle {
    Flag(bool),
    Text(String),
}

impl Serialize for AxisTitle {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Auto => RawTitle::Flag(true),
            Self::Hidden => RawTitle::Flag(false),
            Self::Text(text) => RawTitle::Text(text.clone()),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AxisTitle {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawTitle::deserialize(deserializer)? {
            RawTitle::Flag(true) => Self::Auto,
            RawTitle::Flag(false) => Self::Hidden,
            RawTitle::Text(text) if text.is_empty() => Self::Hidden,
            RawTitle::Text(text) => Self::Text(text),
        })
    }
}

/// Whether the first and last tick labels are flushed inside the axis extent.
///
/// In JSON, a boolean maps to [`LabelFlush::Enabled`]/[`LabelFlush::Disabled`]
/// and a number to [`LabelFlush::Offset`].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum LabelFlush {
    /// Enabled for continuous scales only. Never present in an [`AxisLayout`].
    #[default]
    Auto,
    /// Flush the end labels.
    Enabled,
    /// Do not flush.
    Disabled,
    /// Flush, with an extra offset in pixels.
    Offset(f64),
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawFlush {
    Flag(bool),
    Offset(f64),
}

impl Serialize for LabelFlush {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match *self {
            Self::Auto => serializer.serialize_none(),
            Self::Enabled => RawFlush::Flag(true).serialize(serializer),
            Self::Disabled => RawFlush::Flag(false).serialize(serializer),
            Self::Offset(offset) => RawFlush::Offset(offset).serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for LabelFlush {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match RawFlush::deserialize(deserializer)? {
            RawFlush::Flag(true) => Self::Enabled,
            RawFlush::Flag(false) => Self::Disabled,
            RawFlush::Offset(offset) => Self::Offset(offset),
        })
    }
}

/// User-supplied axis options, as found on a channel definition.
///
/// Every field is optional; unset fields take the direction defaults when merged
/// into an [`AxisConfig`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisOptions {
    /// Axis placement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orient: Option<AxisOrient>,
    /// Tick label angle in degrees.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_angle: Option<f64>,
    /// Label overlap policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_overlap: Option<LabelOverlap>,
    /// Padding between tick labels and the axis title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_padding: Option<f64>,
    /// Desired number of ticks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tick_count: Option<usize>,
    /// Explicit tick values.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub values: Option<Vec<Value>>,
    /// Label flushing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_flush: Option<LabelFlush>,
    /// Axis title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
    /// Tick label format string.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl AxisOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the orientation.
    pub fn with_orient(mut self, orient: AxisOrient) -> Self {
        self.orient = Some(orient);
        self
    }

    /// Sets the tick label angle in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = Some(angle_degrees);
        self
    }

    /// Sets the label overlap policy.
    pub fn with_label_overlap(mut self, label_overlap: LabelOverlap) -> Self {
        self.label_overlap = Some(label_overlap);
        self
    }

    /// Sets the label padding.
    pub fn with_label_padding(mut self, label_padding: f64) -> Self {
        self.label_padding = Some(label_padding);
        self
    }

    /// Sets the desired tick count.
    pub fn with_tick_count(mut self, tick_count: usize) -> Self {
        self.tick_count = Some(tick_count);
        self
    }

    /// Sets explicit tick values.
    pub fn with_values(mut self, values: Vec<Value>) -> Self {
        self.values = Some(values);
        self
    }

    /// Sets label flushing.
    pub fn with_label_flush(mut self, label_flush: LabelFlush) -> Self {
        self.label_flush = Some(label_flush);
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: AxisTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Sets the tick label format.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }
}

/// Fully-resolved axis configuration. Immutable once built by an [`AxisAgent`].
#[derive(Clone, Debug, PartialEq)]
pub struct AxisConfig {
    /// Axis placement.
    pub orient: AxisOrient,
    /// Tick label angle in degrees.
    pub label_angle: f64,
    /// Label overlap policy.
    pub label_overlap: LabelOverlap,
    /// Padding between tick labels and the axis title.
    pub label_padding: f64,
    /// Desired number of ticks.
    pub tick_count: usize,
    /// Explicit tick values.
    pub values: Option<Vec<Value>>,
    /// Label flushing; [`LabelFlush::Auto`] until a layout resolves it.
    pub label_flush: LabelFlush,
    /// Axis title.
    pub title: AxisTitle,
    /// Tick label format string.
    pub format: Option<String>,
}

impl AxisConfig {
    fn base(orient: AxisOrient, label_angle: f64) -> Self {
        Self {
            orient,
            label_angle,
            label_overlap: LabelOverlap::Auto,
            label_padding: 4.0,
            tick_count: 5,
            values: None,
            label_flush: LabelFlush::Auto,
            title: AxisTitle::Auto,
            format: None,
        }
    }

    /// Defaults for horizontal axes: bottom, slanted labels.
    pub fn x_default() -> Self {
        Self::base(AxisOrient::Bottom, DEFAULT_LABEL_ANGLE)
    }

    /// Defaults for vertical axes: left, horizontal labels.
    pub fn y_default() -> Self {
        Self::base(AxisOrient::Left, 0.0)
    }

    /// Overrides every field set in `options`.
    #[must_use]
    pub fn merged(self, options: &AxisOptions) -> Self {
        let options = options.clone();
        Self {
            orient: options.orient.unwrap_or(self.orient),
            label_angle: options.label_angle.unwrap_or(self.label_angle),
            label_overlap: options.label_overlap.unwrap_or(self.label_overlap),
            label_padding: options.label_padding.unwrap_or(self.label_padding),
            tick_count: options.tick_count.unwrap_or(self.tick_count),
            values: options.values.or(self.values),
            label_flush: options.label_flush.unwrap_or(self.label_flush),
            title: options.title.unwrap_or(self.title),
            format: options.format.or(self.format),
        }
    }
}

/// Inputs to [`AxisAgent::compute_layout`].
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutOptions {
    /// Extent available along the axis (pixels).
    pub axis_width: f64,
    /// Height reserved for the axis title.
    pub axis_title_height: f64,
    /// Gap between the tick labels (or title) and the chart border.
    pub gap_between_axis_label_and_border: f64,
    /// Gap between a tick and its label.
    pub gap_between_tick_and_tick_label: f64,
    /// Label angle override; defaults to the configured angle.
    pub label_angle: Option<f64>,
    /// Tick length.
    pub tick_size: f64,
    /// Style used to measure tick labels.
    pub tick_text_style: TextStyle,
}

impl LayoutOptions {
    /// Options with the default gaps, tick size and title height.
    pub fn new(axis_width: f64) -> Self {
        Self {
            axis_width,
            axis_title_height: 20.0,
            gap_between_axis_label_and_border: 4.0,
            gap_between_tick_and_tick_label: 4.0,
            label_angle: None,
            tick_size: 8.0,
            tick_text_style: TextStyle::default(),
        }
    }

    /// Sets the axis title height.
    pub fn with_axis_title_height(mut self, axis_title_height: f64) -> Self {
        self.axis_title_height = axis_title_height;
        self
    }

    /// Sets the gap between labels and the chart border.
    pub fn with_gap_between_axis_label_and_border(mut self, gap: f64) -> Self {
        self.gap_between_axis_label_and_border = gap;
        self
    }

    /// Sets the gap between ticks and labels.
    pub fn with_gap_between_tick_and_tick_label(mut self, gap: f64) -> Self {
        self.gap_between_tick_and_tick_label = gap;
        self
    }

    /// Overrides the label angle in degrees.
    pub fn with_label_angle(mut self, angle_degrees: f64) -> Self {
        self.label_angle = Some(angle_degrees);
        self
    }

    /// Sets the tick length.
    pub fn with_tick_size(mut self, tick_size: f64) -> Self {
        self.tick_size = tick_size;
        self
    }

    /// Sets the tick label style.
    pub fn with_tick_text_style(mut self, style: TextStyle) -> Self {
        self.tick_text_style = style;
        self
    }
}

/// The margin an axis needs on its own side.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MinMargin {
    /// The side (equal to the axis orient).
    pub side: AxisOrient,
    /// Margin in whole pixels.
    pub value: f64,
}

impl Serialize for MinMargin {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.side.as_str(), &self.value)?;
        map.end()
    }
}

/// Output of [`AxisAgent::compute_layout`].
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisLayout {
    /// The axis extent the layout was computed for.
    pub axis_width: f64,
    /// Label angle in degrees; `0` for flat labels.
    pub label_angle: f64,
    /// Resolved label flushing.
    pub label_flush: LabelFlush,
    /// Distance from the axis line to the label block.
    pub label_offset: f64,
    /// Resolved overlap strategy.
    pub label_overlap: LabelOverlapStrategy,
    /// Margin required on the axis side.
    pub min_margin: MinMargin,
    /// Axis placement.
    pub orient: AxisOrient,
    /// Measured size of each tick label, parallel to `tick_labels`.
    pub tick_label_dimensions: Vec<Size>,
    /// Formatted tick labels.
    pub tick_labels: Vec<String>,
    /// Anchor for rotated x-axis labels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tick_text_anchor: Option<TextAnchor>,
}

/// Computes tick labels and layout for one positional channel.
#[derive(Clone, Debug)]
pub struct AxisAgent<'a> {
    channel_encoder: &'a ChannelEncoder,
    format: Option<Formatter>,
    config: AxisConfig,
}

impl<'a> AxisAgent<'a> {
    /// Creates an agent for `channel_encoder`, merging the direction defaults with
    /// the channel's axis options.
    pub fn new(channel_encoder: &'a ChannelEncoder) -> Self {
        let defaults = if channel_encoder.is_x() {
            AxisConfig::x_default()
        } else {
            AxisConfig::y_default()
        };
        let config = match &channel_encoder.definition().axis {
            Some(options) => defaults.merged(options),
            None => defaults,
        };
        let format = config
            .format
            .as_deref()
            .map(|format| resolve_format(channel_encoder.field_type(), format));
        Self {
            channel_encoder,
            format,
            config,
        }
    }

    /// The merged configuration.
    pub fn config(&self) -> &AxisConfig {
        &self.config
    }

    /// The channel this axis belongs to.
    pub fn channel_encoder(&self) -> &'a ChannelEncoder {
        self.channel_encoder
    }

    /// The tick label formatter: the axis format if set, else the channel's.
    pub fn get_format(&self) -> &Formatter {
        self.format
            .as_ref()
            .unwrap_or_else(|| self.channel_encoder.formatter())
    }

    /// Returns `true` unless the title resolves to an empty string.
    pub fn has_title(&self) -> bool {
        !self.get_title().is_empty()
    }

    /// The axis title.
    pub fn get_title(&self) -> String {
        match &self.config.title {
            AxisTitle::Auto => self.channel_encoder.get_title(),
            AxisTitle::Hidden => String::new(),
            AxisTitle::Text(text) => text.clone(),
        }
    }

    /// Tick values.
    ///
    /// Explicit `values` win; otherwise the scale's ticks, or its whole domain when
    /// it has no tick generator. Categorical color scales and unbound channels have
    /// no ticks.
    pub fn get_tick_values(&self) -> Vec<Value> {
        if let Some(values) = &self.config.values {
            return values.clone();
        }
        match self.channel_encoder.scale() {
            Some(scale) if !scale.is_categorical_color() => scale
                .ticks(self.config.tick_count)
                .unwrap_or_else(|| scale.domain()),
            _ => Vec::new(),
        }
    }

    /// Formatted tick labels, parallel to [`AxisAgent::get_tick_values`].
    pub fn get_tick_labels(&self) -> Vec<String> {
        let format = self.get_format();
        self.get_tick_values()
            .iter()
            .map(|v| format.format(v))
            .collect()
    }

    fn resolve_label_flush(&self) -> LabelFlush {
        match self.config.label_flush {
            LabelFlush::Auto => {
                let continuous = self
                    .channel_encoder
                    .scale()
                    .is_some_and(|s| s.category() == ScaleTypeCategory::Continuous);
                if continuous {
                    LabelFlush::Enabled
                } else {
                    LabelFlush::Disabled
                }
            }
            explicit => explicit,
        }
    }

    /// Computes the axis layout for the given options.
    ///
    /// A pure function of the options, the configuration, the bound scale and the
    /// measurer.
    pub fn compute_layout(
        &self,
        options: &LayoutOptions,
        measurer: &dyn TextMeasurer,
    ) -> AxisLayout {
        let is_x = self.channel_encoder.is_x();
        let tick_labels = self.get_tick_labels();
        let tick_label_dimensions: Vec<Size> = tick_labels
            .iter()
            .map(|label| {
                let metrics = measurer.measure(label, &options.tick_text_style);
                Size::new(metrics.advance_width, metrics.line_height())
            })
            .collect();

        let AxisConfig {
            label_overlap,
            label_padding,
            orient,
            ..
        } = self.config;
        let label_angle = options.label_angle.unwrap_or(self.config.label_angle);

        let max_width = tick_label_dimensions
            .iter()
            .map(|d| d.width)
            .fold(0.0_f64, f64::max);

        let strategy = if !is_x {
            LabelOverlapStrategy::Flat
        } else {
            match label_overlap {
                LabelOverlap::Flat => LabelOverlapStrategy::Flat,
                LabelOverlap::Rotate => LabelOverlapStrategy::Rotate,
                LabelOverlap::Auto if tick_labels.is_empty() => LabelOverlapStrategy::Flat,
                LabelOverlap::Auto => {
                    let width_per_tick = options.axis_width / tick_labels.len() as f64;
                    if max_width <= width_per_tick {
                        LabelOverlapStrategy::Flat
                    } else {
                        LabelOverlapStrategy::Rotate
                    }
                }
            }
        };

        let space_for_axis_title = if self.has_title() {
            label_padding + options.axis_title_height
        } else {
            0.0
        };
        let mut required_margin = options.tick_size
            + options.gap_between_tick_and_tick_label
            + space_for_axis_title
            + options.gap_between_axis_label_and_border;

        let mut tick_text_anchor = None;
        let label_offset;
        if is_x {
            let label_height = match strategy {
                LabelOverlapStrategy::Flat => tick_label_dimensions
                    .first()
                    .map_or(0.0, |d| d.height),
                LabelOverlapStrategy::Rotate => {
                    let anchor_end = (orient == AxisOrient::Top && label_angle > 0.0)
                        || (orient == AxisOrient::Bottom && label_angle < 0.0);
                    tick_text_anchor = Some(if anchor_end {
                        TextAnchor::End
                    } else {
                        TextAnchor::Start
                    });
                    (max_width * label_angle.to_radians().sin()).abs().ceil()
                }
            };
            label_offset = label_height + label_padding;
            required_margin += label_height + X_LABEL_SAFETY_PAD;
        } else {
            label_offset = max_width + space_for_axis_title;
            required_margin += max_width;
        }

        let min_margin = MinMargin {
            side: orient,
            value: required_margin.ceil(),
        };
        log::debug!(
            "axis {:?}: {} labels, strategy {:?}, min margin {} = {}",
            self.channel_encoder.channel(),
            tick_labels.len(),
            strategy,
            orient.as_str(),
            min_margin.value
        );

        AxisLayout {
            axis_width: options.axis_width,
            label_angle: match strategy {
                LabelOverlapStrategy::Flat => 0.0,
                LabelOverlapStrategy::Rotate => label_angle,
            },
            label_flush: self.resolve_label_flush(),
            label_offset,
            label_overlap: strategy,
            min_margin,
            orient,
            tick_label_dimensions,
            tick_labels,
            tick_text_anchor,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use encodeable_text::FixedTextMeasurer;
    use serde_json::json;

    use super::*;
    use crate::channel::{Channel, ChannelDef, FieldType};
    use crate::scale::ScaleConfig;

    /// Ten pixels per character, twelve pixel line height.
    const MEASURER: FixedTextMeasurer = FixedTextMeasurer {
        char_width: 10.0,
        line_height: 12.0,
    };

    fn categories(channel: Channel, labels: &[&str], axis: AxisOptions) -> ChannelEncoder {
        let domain = labels.iter().map(|s| json!(s)).collect();
        let def = ChannelDef::field("category", FieldType::Nominal)
            .with_scale(ScaleConfig::new().with_domain(domain))
            .with_axis(axis);
        ChannelEncoder::new(channel, def).expect("valid channel")
    }

    fn untitled() -> AxisOptions {
        AxisOptions::new().with_title(AxisTitle::Hidden)
    }

    #[test]
    fn short_labels_stay_flat() {
        let x = categories(Channel::X, &["aaaa", "bbbb", "cccc"], untitled());
        let agent = AxisAgent::new(&x);
        let layout = agent.compute_layout(&LayoutOptions::new(200.0), &MEASURER);

        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Flat);
        assert_eq!(layout.label_angle, 0.0);
        assert!((layout.label_offset - 16.0).abs() < 1e-9);
        assert_eq!(layout.min_margin.side, AxisOrient::Bottom);
        assert_eq!(layout.min_margin.value, 36.0);
        assert_eq!(layout.tick_text_anchor, None);
        assert_eq!(layout.tick_label_dimensions, alloc::vec![Size::new(40.0, 12.0); 3]);
    }

    #[test]
    fn long_labels_rotate() {
        let x = categories(Channel::X, &["aaaaaaaa", "bbbbbbbb", "cccccccc"], untitled());
        let agent = AxisAgent::new(&x);
        let options = LayoutOptions::new(100.0).with_label_angle(-45.0);
        let layout = agent.compute_layout(&options, &MEASURER);

        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Rotate);
        assert_eq!(layout.label_angle, -45.0);
        assert!((layout.label_offset - 61.0).abs() < 1e-9);
        assert_eq!(layout.tick_text_anchor, Some(TextAnchor::End));
        // 8 + 4 + 0 + 4 + 57 + 8
        assert_eq!(layout.min_margin.value, 81.0);
    }

    #[test]
    fn rotated_anchor_depends_on_orient_and_sign() {
        let labels = ["aaaaaaaa", "bbbbbbbb", "cccccccc"];
        let bottom = categories(Channel::X, &labels, untitled());
        let top = categories(Channel::X, &labels, untitled().with_orient(AxisOrient::Top));
        let options = LayoutOptions::new(100.0);

        // Default angle is positive.
        let layout = AxisAgent::new(&bottom).compute_layout(&options, &MEASURER);
        assert_eq!(layout.tick_text_anchor, Some(TextAnchor::Start));
        let layout = AxisAgent::new(&top).compute_layout(&options, &MEASURER);
        assert_eq!(layout.tick_text_anchor, Some(TextAnchor::End));
        assert_eq!(layout.min_margin.side, AxisOrient::Top);
    }

    #[test]
    fn title_resolution() {
        let def = ChannelDef::field("revenue", FieldType::Quantitative);
        let auto = ChannelEncoder::new(Channel::Y, def.clone()).expect("valid channel");
        assert_eq!(AxisAgent::new(&auto).get_title(), "Revenue");

        let flagged = ChannelEncoder::new(
            Channel::Y,
            def.clone()
                .with_axis(AxisOptions::new().with_title(AxisTitle::Auto)),
        )
        .expect("valid channel");
        assert_eq!(AxisAgent::new(&flagged).get_title(), "Revenue");

        let hidden = ChannelEncoder::new(
            Channel::Y,
            def.clone()
                .with_axis(AxisOptions::new().with_title(AxisTitle::Hidden)),
        )
        .expect("valid channel");
        let agent = AxisAgent::new(&hidden);
        assert!(!agent.has_title());
        assert_eq!(agent.get_title(), "");

        let text = ChannelEncoder::new(
            Channel::Y,
            def.with_axis(AxisOptions::new().with_title(AxisTitle::Text("Net".into()))),
        )
        .expect("valid channel");
        assert_eq!(AxisAgent::new(&text).get_title(), "Net");
    }

    #[test]
    fn title_json_forms() {
        let parse = |s: &str| serde_json::from_str::<AxisTitle>(s).expect("valid title");
        assert_eq!(parse("true"), AxisTitle::Auto);
        assert_eq!(parse("false"), AxisTitle::Hidden);
        assert_eq!(parse("\"\""), AxisTitle::Hidden);
        assert_eq!(parse("\"Sales\""), AxisTitle::Text("Sales".into()));
        let flush = |s: &str| serde_json::from_str::<LabelFlush>(s).expect("valid flush");
        assert_eq!(flush("true"), LabelFlush::Enabled);
        assert_eq!(flush("3"), LabelFlush::Offset(3.0));
    }

    #[test]
    fn explicit_flat_forces_zero_angle() {
        let labels = ["aaaaaaaa", "bbbbbbbb", "cccccccc"];
        let x = categories(
            Channel::X,
            &labels,
            untitled()
                .with_label_overlap(LabelOverlap::Flat)
                .with_label_angle(30.0),
        );
        let layout = AxisAgent::new(&x).compute_layout(&LayoutOptions::new(50.0), &MEASURER);
        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Flat);
        assert_eq!(layout.label_angle, 0.0);
    }

    #[test]
    fn y_axes_never_rotate_or_anchor() {
        let y = categories(
            Channel::Y,
            &["aaaaaaaaaa", "bbbbbbbbbb"],
            untitled().with_label_overlap(LabelOverlap::Rotate),
        );
        let layout = AxisAgent::new(&y).compute_layout(&LayoutOptions::new(10.0), &MEASURER);
        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Flat);
        assert_eq!(layout.label_angle, 0.0);
        assert_eq!(layout.tick_text_anchor, None);
        assert_eq!(layout.orient, AxisOrient::Left);
        assert!((layout.label_offset - 100.0).abs() < 1e-9);
        // 8 + 4 + 0 + 4 + 100
        assert_eq!(layout.min_margin.value, 116.0);
    }

    #[test]
    fn y_title_adds_to_offset_and_margin() {
        let y = categories(
            Channel::Y,
            &["abc"],
            AxisOptions::new().with_title(AxisTitle::Text("Count".into())),
        );
        let layout = AxisAgent::new(&y).compute_layout(&LayoutOptions::new(300.0), &MEASURER);
        // title space = label padding 4 + title height 20
        assert!((layout.label_offset - 54.0).abs() < 1e-9);
        assert_eq!(layout.min_margin.value, (8.0_f64 + 4.0 + 24.0 + 4.0 + 30.0).ceil());
    }

    #[test]
    fn x_title_adds_to_margin_on_both_strategies() {
        let titled = || AxisOptions::new().with_title(AxisTitle::Text("Region".into()));

        let flat = categories(Channel::X, &["aaaa", "bbbb", "cccc"], titled());
        let layout = AxisAgent::new(&flat).compute_layout(&LayoutOptions::new(200.0), &MEASURER);
        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Flat);
        assert!((layout.label_offset - 16.0).abs() < 1e-9);
        // 8 + 4 + 24 + 4 + 12 + 8
        assert_eq!(layout.min_margin.value, 60.0);

        let rotated = categories(Channel::X, &["aaaaaaaa", "bbbbbbbb", "cccccccc"], titled());
        let options = LayoutOptions::new(100.0).with_label_angle(-45.0);
        let layout = AxisAgent::new(&rotated).compute_layout(&options, &MEASURER);
        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Rotate);
        assert!((layout.label_offset - 61.0).abs() < 1e-9);
        // 8 + 4 + 24 + 4 + 57 + 8
        assert_eq!(layout.min_margin.value, 105.0);
    }

    #[test]
    fn empty_labels_give_minimal_margins() {
        let x = categories(Channel::X, &[], untitled());
        let layout = AxisAgent::new(&x).compute_layout(&LayoutOptions::new(0.0), &MEASURER);
        assert!(layout.tick_labels.is_empty());
        assert_eq!(layout.label_overlap, LabelOverlapStrategy::Flat);
        assert_eq!(layout.min_margin.value, 8.0 + 4.0 + 4.0 + 8.0);

        let y = categories(Channel::Y, &[], untitled());
        let layout = AxisAgent::new(&y).compute_layout(&LayoutOptions::new(0.0), &MEASURER);
        assert_eq!(layout.min_margin.value, 8.0 + 4.0 + 4.0);
        assert_eq!(layout.label_offset, 0.0);
    }

    #[test]
    fn layout_is_idempotent() {
        let x = categories(Channel::X, &["a", "bb", "ccc"], AxisOptions::new());
        let agent = AxisAgent::new(&x);
        let options = LayoutOptions::new(20.0).with_tick_text_style(TextStyle::new(14.0));
        let a = agent.compute_layout(&options, &MEASURER);
        let b = agent.compute_layout(&options, &MEASURER);
        assert_eq!(a, b);
        assert_eq!(a.tick_labels.len(), a.tick_label_dimensions.len());
    }

    #[test]
    fn tick_labels_prefer_explicit_values() {
        let def = ChannelDef::field("price", FieldType::Quantitative)
            .with_scale(ScaleConfig::new().with_domain(alloc::vec![json!(0), json!(100)]))
            .with_axis(
                AxisOptions::new()
                    .with_values(alloc::vec![json!(5), json!(50)])
                    .with_format(".1f"),
            );
        let x = ChannelEncoder::new(Channel::X, def).expect("valid channel");
        assert_eq!(AxisAgent::new(&x).get_tick_labels(), ["5.0", "50.0"]);
    }

    #[test]
    fn tick_labels_come_from_scale_ticks() {
        let def = ChannelDef::field("price", FieldType::Quantitative)
            .with_scale(ScaleConfig::new().with_domain(alloc::vec![json!(0), json!(100)]))
            .with_axis(AxisOptions::new().with_tick_count(2).with_format("d"));
        let y = ChannelEncoder::new(Channel::Y, def).expect("valid channel");
        let agent = AxisAgent::new(&y);
        assert_eq!(agent.get_tick_labels(), ["0", "50", "100"]);
        let layout = agent.compute_layout(&LayoutOptions::new(100.0), &MEASURER);
        assert_eq!(layout.label_flush, LabelFlush::Enabled);
    }

    #[test]
    fn band_scales_label_their_domain_without_flush() {
        let x = categories(Channel::X, &["north", "south"], AxisOptions::new());
        let agent = AxisAgent::new(&x);
        assert_eq!(agent.get_tick_labels(), ["north", "south"]);
        let layout = agent.compute_layout(&LayoutOptions::new(400.0), &MEASURER);
        assert_eq!(layout.label_flush, LabelFlush::Disabled);
    }

    #[test]
    fn configured_label_flush_overrides_scale_default() {
        let def = ChannelDef::field("price", FieldType::Quantitative)
            .with_scale(ScaleConfig::new().with_domain(alloc::vec![json!(0), json!(100)]))
            .with_axis(AxisOptions::new().with_label_flush(LabelFlush::Disabled));
        let linear = ChannelEncoder::new(Channel::X, def).expect("valid channel");
        let layout =
            AxisAgent::new(&linear).compute_layout(&LayoutOptions::new(300.0), &MEASURER);
        assert_eq!(layout.label_flush, LabelFlush::Disabled);

        let band = categories(
            Channel::X,
            &["north", "south"],
            AxisOptions::new().with_label_flush(LabelFlush::Enabled),
        );
        let layout = AxisAgent::new(&band).compute_layout(&LayoutOptions::new(300.0), &MEASURER);
        assert_eq!(layout.label_flush, LabelFlush::Enabled);
    }

    #[test]
    fn category_labels_ignore_number_formats() {
        let x = categories(
            Channel::X,
            &["02134", "90210"],
            AxisOptions::new().with_format(".2f"),
        );
        assert_eq!(AxisAgent::new(&x).get_tick_labels(), ["02134", "90210"]);
    }

    #[test]
    fn categorical_color_scales_have_no_labels() {
        let def = ChannelDef::field("kind", FieldType::Nominal);
        let color = ChannelEncoder::with_data(
            Channel::Color,
            def,
            &[json!({"kind": "a"}), json!({"kind": "b"})],
        )
        .expect("valid channel");
        assert!(AxisAgent::new(&color).get_tick_labels().is_empty());
    }

    #[test]
    fn axis_format_falls_back_to_channel_format() {
        let def = ChannelDef::field("share", FieldType::Quantitative).with_format(".0%");
        let y = ChannelEncoder::new(Channel::Y, def).expect("valid channel");
        let agent = AxisAgent::new(&y);
        assert_eq!(agent.get_format().format(&json!(0.25)), "25%");
    }

    #[test]
    fn min_margin_serializes_as_single_key() {
        let margin = MinMargin {
            side: AxisOrient::Bottom,
            value: 36.0,
        };
        assert_eq!(
            serde_json::to_value(margin).expect("serializable"),
            json!({"bottom": 36.0})
        );
    }
}
