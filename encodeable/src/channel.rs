// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Channels and channel encoders.
//!
//! A [`ChannelDef`] binds one visual channel to either a data field or a constant
//! value. A [`ChannelEncoder`] is the runtime form: the definition plus its resolved
//! [`Scale`] and default [`Formatter`]. Encoders are cheap to rebuild and are meant
//! to be recreated whenever the chart props change.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use peniko::Color;
use peniko::color::{Srgb, parse_color};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::axis::{AxisAgent, AxisOptions, AxisTitle};
use crate::error::EncodingError;
use crate::format::{
    Formatter, resolve_format, smart_number_formatter, smart_time_formatter, value_as_f64,
};
use crate::scale::{Scale, ScaleConfig, resolve_scale};

/// A visual channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Horizontal position.
    X,
    /// Secondary horizontal position (range end).
    X2,
    /// Vertical position.
    Y,
    /// Secondary vertical position (range end).
    Y2,
    /// Primary color.
    Color,
    /// Fill color.
    Fill,
    /// Stroke color.
    Stroke,
    /// Opacity.
    Opacity,
    /// Mark size.
    Size,
    /// Mark shape.
    Shape,
    /// Text content.
    Text,
    /// Tooltip content.
    Tooltip,
}

impl Channel {
    /// Every channel, in encoding order.
    pub const ALL: [Self; 12] = [
        Self::X,
        Self::Y,
        Self::X2,
        Self::Y2,
        Self::Color,
        Self::Fill,
        Self::Stroke,
        Self::Opacity,
        Self::Size,
        Self::Shape,
        Self::Text,
        Self::Tooltip,
    ];

    /// The channel name, as used in encodings.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::X => "x",
            Self::X2 => "x2",
            Self::Y => "y",
            Self::Y2 => "y2",
            Self::Color => "color",
            Self::Fill => "fill",
            Self::Stroke => "stroke",
            Self::Opacity => "opacity",
            Self::Size => "size",
            Self::Shape => "shape",
            Self::Text => "text",
            Self::Tooltip => "tooltip",
        }
    }

    /// Horizontal position channels.
    pub fn is_x(self) -> bool {
        matches!(self, Self::X | Self::X2)
    }

    /// Vertical position channels.
    pub fn is_y(self) -> bool {
        matches!(self, Self::Y | Self::Y2)
    }

    /// Position channels.
    pub fn is_positional(self) -> bool {
        self.is_x() || self.is_y()
    }

    /// Channels whose scale maps to colors.
    pub fn is_color(self) -> bool {
        matches!(self, Self::Color | Self::Fill | Self::Stroke)
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Measurement type of a data field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    /// Unordered categories.
    Nominal,
    /// Ordered categories.
    Ordinal,
    /// Numbers.
    Quantitative,
    /// Dates and times.
    Temporal,
}

/// Declarative definition of one channel.
///
/// Exactly one of `field` and `value` must be set; see [`ChannelDef::validate`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChannelDef {
    /// Data field, possibly a dot path into nested rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Constant value.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    /// Field type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<FieldType>,
    /// Scale options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleConfig>,
    /// Axis options (positional channels).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub axis: Option<AxisOptions>,
    /// Value format for labels and tooltips.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Channel title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<AxisTitle>,
}

impl ChannelDef {
    /// A definition bound to a data field.
    pub fn field(field: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            field: Some(field.into()),
            field_type: Some(field_type),
            ..Self::default()
        }
    }

    /// A definition with a constant value.
    pub fn value(value: Value) -> Self {
        Self {
            value: Some(value),
            ..Self::default()
        }
    }

    /// Sets the scale options.
    pub fn with_scale(mut self, scale: ScaleConfig) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the axis options.
    pub fn with_axis(mut self, axis: AxisOptions) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Sets the format string.
    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Sets the title.
    pub fn with_title(mut self, title: AxisTitle) -> Self {
        self.title = Some(title);
        self
    }

    /// Returns the scale options, inserting empty ones if absent.
    pub fn scale_mut(&mut self) -> &mut ScaleConfig {
        self.scale.get_or_insert_with(ScaleConfig::default)
    }

    /// Returns the axis options, inserting empty ones if absent.
    pub fn axis_mut(&mut self) -> &mut AxisOptions {
        self.axis.get_or_insert_with(AxisOptions::default)
    }

    /// Checks that exactly one of `field` and `value` is set.
    pub fn validate(&self, channel: Channel) -> Result<(), EncodingError> {
        match (&self.field, &self.value) {
            (Some(_), Some(_)) => Err(EncodingError::ConflictingFieldAndValue { channel }),
            (None, None) => Err(EncodingError::MissingFieldOrValue { channel }),
            _ => Ok(()),
        }
    }
}

/// Looks up `field` in a row: the literal key first, then as a dot path
/// (`"values.Q1"`, `"points.0.x"`).
pub fn get_field<'a>(row: &'a Value, field: &str) -> Option<&'a Value> {
    if let Some(v) = row.get(field) {
        return Some(v);
    }
    field.split('.').try_fold(row, |node, key| match node {
        Value::Array(items) => items.get(key.parse::<usize>().ok()?),
        _ => node.get(key),
    })
}

/// Turns a field name into a title: underscores become spaces and the first letter
/// is capitalized (`"total_sales"` -> `"Total sales"`).
pub fn humanize(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn default_formatter(field_type: Option<FieldType>) -> Formatter {
    match field_type {
        Some(FieldType::Quantitative) => smart_number_formatter(),
        Some(FieldType::Temporal) => smart_time_formatter(),
        _ => Formatter::identity(),
    }
}

/// Runtime binding of a [`ChannelDef`] to its scale and formatter.
#[derive(Clone, Debug)]
pub struct ChannelEncoder {
    channel: Channel,
    definition: ChannelDef,
    scale: Option<Scale>,
    formatter: Formatter,
}

impl ChannelEncoder {
    /// Binds a definition without data. Scales use the configured domain, or a
    /// default one.
    pub fn new(channel: Channel, definition: ChannelDef) -> Result<Self, EncodingError> {
        Self::with_data(channel, definition, &[])
    }

    /// Binds a definition, inferring the scale domain from `rows` when the
    /// definition does not set one.
    pub fn with_data(
        channel: Channel,
        definition: ChannelDef,
        rows: &[Value],
    ) -> Result<Self, EncodingError> {
        definition.validate(channel)?;
        let values: Vec<Value> = match &definition.field {
            Some(field) => rows
                .iter()
                .filter_map(|row| get_field(row, field))
                .cloned()
                .collect(),
            None => Vec::new(),
        };
        let scale = resolve_scale(
            channel,
            definition.field_type,
            definition.scale.as_ref(),
            &values,
        );
        Self::with_scale(channel, definition, scale)
    }

    /// Binds a definition to an externally resolved scale.
    pub fn with_scale(
        channel: Channel,
        definition: ChannelDef,
        scale: Option<Scale>,
    ) -> Result<Self, EncodingError> {
        definition.validate(channel)?;
        let formatter = match &definition.format {
            Some(format) => resolve_format(definition.field_type, format),
            None => default_formatter(definition.field_type),
        };
        Ok(Self {
            channel,
            definition,
            scale,
            formatter,
        })
    }

    /// The bound channel.
    pub fn channel(&self) -> Channel {
        self.channel
    }

    /// The definition.
    pub fn definition(&self) -> &ChannelDef {
        &self.definition
    }

    /// The declared field type.
    pub fn field_type(&self) -> Option<FieldType> {
        self.definition.field_type
    }

    /// Horizontal position channel.
    pub fn is_x(&self) -> bool {
        self.channel.is_x()
    }

    /// Vertical position channel.
    pub fn is_y(&self) -> bool {
        self.channel.is_y()
    }

    /// The resolved scale, if any.
    pub fn scale(&self) -> Option<&Scale> {
        self.scale.as_ref()
    }

    /// Replaces the scale's output range.
    pub fn set_range(&mut self, range: (f64, f64)) {
        self.scale = self.scale.take().map(|s| s.with_range(range));
    }

    /// The channel title: the definition's title if set, else the humanized field.
    pub fn get_title(&self) -> String {
        match &self.definition.title {
            Some(AxisTitle::Text(text)) => text.clone(),
            Some(AxisTitle::Hidden) => String::new(),
            Some(AxisTitle::Auto) | None => self
                .definition
                .field
                .as_deref()
                .map(humanize)
                .unwrap_or_default(),
        }
    }

    /// The default formatter.
    pub fn formatter(&self) -> &Formatter {
        &self.formatter
    }

    /// Formats a value with the default formatter.
    pub fn format_value(&self, value: &Value) -> String {
        self.formatter.format(value)
    }

    /// The channel's raw value for `row`: the field value, or the constant.
    pub fn get<'a>(&'a self, row: &'a Value) -> Option<&'a Value> {
        match &self.definition.field {
            Some(field) => get_field(row, field),
            None => self.definition.value.as_ref(),
        }
    }

    /// Encodes `row` as a position.
    ///
    /// Constant numbers are already in range space and are returned as-is.
    pub fn encode_position(&self, row: &Value) -> Option<f64> {
        let value = self.get(row)?;
        if self.definition.field.is_none() {
            return value_as_f64(value);
        }
        self.scale.as_ref()?.map_value(value)
    }

    /// Encodes `row` as a color. Constant CSS colors are parsed.
    pub fn encode_color(&self, row: &Value) -> Option<Color> {
        let value = self.get(row)?;
        if self.definition.field.is_none() {
            let color = parse_color(value.as_str()?).ok()?;
            return Some(color.to_alpha_color::<Srgb>());
        }
        self.scale.as_ref()?.map_color(value)
    }

    /// Encodes `row` for this channel: a number for positions, a `#rrggbbaa` string
    /// for colors, and the raw value for every other channel.
    pub fn encode_value(&self, row: &Value) -> Option<Value> {
        if self.channel.is_positional() {
            let position = self.encode_position(row)?;
            return serde_json::Number::from_f64(position).map(Value::Number);
        }
        if self.channel.is_color() {
            let rgba = self.encode_color(row)?.to_rgba8();
            return Some(Value::String(alloc::format!(
                "#{:02x}{:02x}{:02x}{:02x}",
                rgba.r,
                rgba.g,
                rgba.b,
                rgba.a
            )));
        }
        self.get(row).cloned()
    }

    /// Returns `true` if this channel gets an axis: field-bound `x`/`y`, or
    /// `x2`/`y2` with explicit axis options.
    pub fn has_axis(&self) -> bool {
        if self.definition.field.is_none() {
            return false;
        }
        match self.channel {
            Channel::X | Channel::Y => true,
            Channel::X2 | Channel::Y2 => self.definition.axis.is_some(),
            _ => false,
        }
    }

    /// The axis agent for this channel, if it has an axis.
    pub fn axis(&self) -> Option<AxisAgent<'_>> {
        self.has_axis().then(|| AxisAgent::new(self))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn field_and_value_are_exclusive() {
        let both = ChannelDef {
            field: Some("a".into()),
            value: Some(json!(1)),
            ..ChannelDef::default()
        };
        assert_eq!(
            ChannelEncoder::new(Channel::X, both).err(),
            Some(EncodingError::ConflictingFieldAndValue { channel: Channel::X })
        );
        assert_eq!(
            ChannelEncoder::new(Channel::Size, ChannelDef::default()).err(),
            Some(EncodingError::MissingFieldOrValue {
                channel: Channel::Size
            })
        );
    }

    #[test]
    fn error_messages_name_the_channel() {
        let err = EncodingError::MissingFieldOrValue {
            channel: Channel::Y2,
        };
        assert_eq!(
            alloc::format!("{err}"),
            "channel `y2` needs either a `field` or a constant `value`"
        );
    }

    #[test]
    fn titles_are_humanized() {
        assert_eq!(humanize("revenue"), "Revenue");
        assert_eq!(humanize("total_sales"), "Total sales");
        assert_eq!(humanize(""), "");
        let enc = ChannelEncoder::new(
            Channel::X,
            ChannelDef::field("net_income", FieldType::Quantitative),
        )
        .expect("valid channel");
        assert_eq!(enc.get_title(), "Net income");
        let enc = ChannelEncoder::new(
            Channel::X,
            ChannelDef::field("a", FieldType::Quantitative)
                .with_title(AxisTitle::Text("Custom".into())),
        )
        .expect("valid channel");
        assert_eq!(enc.get_title(), "Custom");
    }

    #[test]
    fn position_role_comes_from_channel_identity() {
        let x2 = ChannelEncoder::new(Channel::X2, ChannelDef::field("a", FieldType::Quantitative))
            .expect("valid channel");
        assert!(x2.is_x());
        assert!(!x2.is_y());
        assert!(!x2.has_axis());
        let y = ChannelEncoder::new(Channel::Y, ChannelDef::field("a", FieldType::Quantitative))
            .expect("valid channel");
        assert!(y.is_y());
        assert!(y.axis().is_some());
        let color = ChannelEncoder::new(Channel::Color, ChannelDef::value(json!("red")))
            .expect("valid channel");
        assert!(color.axis().is_none());
    }

    #[test]
    fn get_follows_dot_paths() {
        let row = json!({"label": "a", "values": {"Q1": 3}, "pts": [{"x": 1}], "a.b": 7});
        assert_eq!(get_field(&row, "label"), Some(&json!("a")));
        assert_eq!(get_field(&row, "values.Q1"), Some(&json!(3)));
        assert_eq!(get_field(&row, "pts.0.x"), Some(&json!(1)));
        assert_eq!(get_field(&row, "a.b"), Some(&json!(7)));
        assert_eq!(get_field(&row, "values.Q9"), None);
    }

    #[test]
    fn data_drives_scale_domain() {
        let rows = [json!({"v": 4}), json!({"v": -2}), json!({"v": 10})];
        let enc = ChannelEncoder::with_data(
            Channel::Y,
            ChannelDef::field("v", FieldType::Quantitative),
            &rows,
        )
        .expect("valid channel");
        let scale = enc.scale().expect("linear scale");
        assert_eq!(scale.domain(), alloc::vec![json!(-2.0), json!(10.0)]);
    }

    #[test]
    fn encodes_positions_and_colors() {
        let rows = [json!({"v": 0}), json!({"v": 10})];
        let mut enc = ChannelEncoder::with_data(
            Channel::X,
            ChannelDef::field("v", FieldType::Quantitative),
            &rows,
        )
        .expect("valid channel");
        enc.set_range((0.0, 200.0));
        assert_eq!(enc.encode_position(&json!({"v": 5})), Some(100.0));

        let constant = ChannelEncoder::new(Channel::Fill, ChannelDef::value(json!("#00ff00")))
            .expect("valid channel");
        let green = constant.encode_color(&json!({})).expect("parsed");
        assert_eq!(green.to_rgba8().g, 255);
        assert_eq!(constant.encode_value(&json!({})), Some(json!("#00ff00ff")));

        let text = ChannelEncoder::new(Channel::Text, ChannelDef::field("name", FieldType::Nominal))
            .expect("valid channel");
        assert_eq!(text.encode_value(&json!({"name": "q"})), Some(json!("q")));
    }

    #[test]
    fn default_formatter_follows_field_type() {
        let enc = ChannelEncoder::new(Channel::Y, ChannelDef::field("v", FieldType::Quantitative))
            .expect("valid channel");
        assert_eq!(enc.format_value(&json!(12_345)), "12.3k");
        let enc = ChannelEncoder::new(Channel::X, ChannelDef::field("c", FieldType::Nominal))
            .expect("valid channel");
        assert_eq!(enc.format_value(&json!("east")), "east");
    }

    #[test]
    fn definitions_decode_from_json() {
        let def: ChannelDef = serde_json::from_value(json!({
            "field": "score",
            "type": "quantitative",
            "scale": {"type": "log", "domain": [1, 1000]},
            "axis": {"orient": "right", "labelAngle": 30, "title": false},
            "title": "Score"
        }))
        .expect("valid definition");
        assert_eq!(def.field_type, Some(FieldType::Quantitative));
        let axis = def.axis.as_ref().expect("axis options");
        assert_eq!(axis.label_angle, Some(30.0));
        assert_eq!(axis.title, Some(AxisTitle::Hidden));
        assert_eq!(def.title, Some(AxisTitle::Text("Score".into())));
    }
}
