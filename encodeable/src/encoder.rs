// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Whole-chart encodings.
//!
//! An [`Encoding`] is the declarative channel map found in chart form data. An
//! [`Encoder`] binds every defined channel against the chart's rows.

extern crate alloc;

use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::axis::AxisAgent;
use crate::channel::{Channel, ChannelDef, ChannelEncoder};
use crate::error::EncodingError;

/// Channel definitions keyed by channel.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(missing_docs, reason = "one field per `Channel` variant")]
pub struct Encoding {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x2: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y2: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fill: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stroke: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub opacity: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shape: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<ChannelDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tooltip: Option<ChannelDef>,
}

impl Encoding {
    /// Decodes an encoding from its JSON form.
    pub fn from_json(value: Value) -> Result<Self, EncodingError> {
        serde_json::from_value(value).map_err(|err| EncodingError::json(&err))
    }

    /// Sets the definition for `channel`.
    pub fn with(mut self, channel: Channel, definition: ChannelDef) -> Self {
        self.set(channel, Some(definition));
        self
    }

    /// The definition for `channel`.
    pub fn get(&self, channel: Channel) -> Option<&ChannelDef> {
        self.slot(channel).as_ref()
    }

    /// Mutable access to the definition for `channel`.
    pub fn get_mut(&mut self, channel: Channel) -> Option<&mut ChannelDef> {
        self.slot_mut(channel).as_mut()
    }

    /// Replaces the definition for `channel`.
    pub fn set(&mut self, channel: Channel, definition: Option<ChannelDef>) {
        *self.slot_mut(channel) = definition;
    }

    /// Defined channels in [`Channel::ALL`] order.
    pub fn iter(&self) -> impl Iterator<Item = (Channel, &ChannelDef)> + '_ {
        Channel::ALL
            .into_iter()
            .filter_map(|channel| Some((channel, self.get(channel)?)))
    }

    fn slot(&self, channel: Channel) -> &Option<ChannelDef> {
        match channel {
            Channel::X => &self.x,
            Channel::Y => &self.y,
            Channel::X2 => &self.x2,
            Channel::Y2 => &self.y2,
            Channel::Color => &self.color,
            Channel::Fill => &self.fill,
            Channel::Stroke => &self.stroke,
            Channel::Opacity => &self.opacity,
            Channel::Size => &self.size,
            Channel::Shape => &self.shape,
            Channel::Text => &self.text,
            Channel::Tooltip => &self.tooltip,
        }
    }

    fn slot_mut(&mut self, channel: Channel) -> &mut Option<ChannelDef> {
        match channel {
            Channel::X => &mut self.x,
            Channel::Y => &mut self.y,
            Channel::X2 => &mut self.x2,
            Channel::Y2 => &mut self.y2,
            Channel::Color => &mut self.color,
            Channel::Fill => &mut self.fill,
            Channel::Stroke => &mut self.stroke,
            Channel::Opacity => &mut self.opacity,
            Channel::Size => &mut self.size,
            Channel::Shape => &mut self.shape,
            Channel::Text => &mut self.text,
            Channel::Tooltip => &mut self.tooltip,
        }
    }
}

/// Channel encoders for every channel of an [`Encoding`].
#[derive(Clone, Debug)]
pub struct Encoder {
    channels: Vec<ChannelEncoder>,
}

impl Encoder {
    /// Binds every defined channel, inferring scale domains from `rows`.
    ///
    /// Fails on the first definition that sets both or neither of `field` and
    /// `value`.
    pub fn new(encoding: &Encoding, rows: &[Value]) -> Result<Self, EncodingError> {
        let channels = encoding
            .iter()
            .map(|(channel, def)| ChannelEncoder::with_data(channel, def.clone(), rows))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { channels })
    }

    /// The encoder for `channel`, if defined.
    pub fn channel(&self, channel: Channel) -> Option<&ChannelEncoder> {
        self.channels.iter().find(|c| c.channel() == channel)
    }

    /// Mutable access to the encoder for `channel`.
    pub fn channel_mut(&mut self, channel: Channel) -> Option<&mut ChannelEncoder> {
        self.channels.iter_mut().find(|c| c.channel() == channel)
    }

    /// All channel encoders.
    pub fn channels(&self) -> &[ChannelEncoder] {
        &self.channels
    }

    /// The `x` channel encoder.
    pub fn x(&self) -> Option<&ChannelEncoder> {
        self.channel(Channel::X)
    }

    /// The `y` channel encoder.
    pub fn y(&self) -> Option<&ChannelEncoder> {
        self.channel(Channel::Y)
    }

    /// Axis agents for every channel that has an axis.
    pub fn axes(&self) -> Vec<AxisAgent<'_>> {
        self.channels.iter().filter_map(ChannelEncoder::axis).collect()
    }

    /// Encodes one row on every channel.
    pub fn encode_row(&self, row: &Value) -> Vec<(Channel, Option<Value>)> {
        self.channels
            .iter()
            .map(|c| (c.channel(), c.encode_value(row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::axis::AxisOrient;
    use crate::channel::FieldType;

    #[test]
    fn decodes_and_binds_channels() {
        let encoding = Encoding::from_json(json!({
            "x": {"field": "label", "type": "nominal"},
            "y": {"field": "value", "type": "quantitative", "axis": {"orient": "right"}},
            "color": {"value": "steelblue"}
        }))
        .expect("valid encoding");
        let rows = [json!({"label": "a", "value": 1}), json!({"label": "b", "value": 3})];
        let encoder = Encoder::new(&encoding, &rows).expect("valid channels");
        assert_eq!(encoder.channels().len(), 3);
        let y = encoder.y().expect("y channel");
        assert_eq!(y.scale().expect("scale").domain(), alloc::vec![json!(1.0), json!(3.0)]);

        let axes = encoder.axes();
        assert_eq!(axes.len(), 2);
        assert_eq!(axes[1].config().orient, AxisOrient::Right);
        assert!(encoder.channel(Channel::Color).expect("color").axis().is_none());
    }

    #[test]
    fn invalid_definitions_fail_to_bind() {
        let encoding = Encoding::default().with(Channel::Size, ChannelDef::default());
        assert_eq!(
            Encoder::new(&encoding, &[]).err(),
            Some(EncodingError::MissingFieldOrValue {
                channel: Channel::Size
            })
        );
        assert!(matches!(
            Encoding::from_json(json!({"x": {"type": "bogus"}})),
            Err(EncodingError::Json { .. })
        ));
    }

    #[test]
    fn channel_access_by_name() {
        let mut encoding =
            Encoding::default().with(Channel::Y, ChannelDef::field("v", FieldType::Quantitative));
        encoding
            .get_mut(Channel::Y)
            .expect("y")
            .axis_mut()
            .format = Some(".2f".into());
        assert_eq!(
            encoding
                .get(Channel::Y)
                .and_then(|d| d.axis.as_ref())
                .and_then(|a| a.format.as_deref()),
            Some(".2f")
        );
        encoding.set(Channel::Y, None);
        assert_eq!(encoding.iter().count(), 0);
    }

    #[test]
    fn rows_encode_on_every_channel() {
        let encoding = Encoding::default()
            .with(Channel::X, ChannelDef::field("v", FieldType::Quantitative))
            .with(Channel::Tooltip, ChannelDef::field("v", FieldType::Quantitative));
        let rows = [json!({"v": 0}), json!({"v": 4})];
        let mut encoder = Encoder::new(&encoding, &rows).expect("valid channels");
        encoder
            .channel_mut(Channel::X)
            .expect("x")
            .set_range((0.0, 100.0));
        let encoded = encoder.encode_row(&json!({"v": 1}));
        assert_eq!(
            encoded,
            alloc::vec![
                (Channel::X, Some(json!(25.0))),
                (Channel::Tooltip, Some(json!(1))),
            ]
        );
    }
}
