// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Declarative channel encodings and axis layout for XY charts.
//!
//! A chart is described by an [`Encoding`]: each visual channel (`x`, `y`, `color`,
//! ...) is bound to a data field or a constant, with optional scale, axis and
//! format settings. This crate turns that description into:
//! - **Formatters**: d3-style number specifiers, `strftime` time patterns and the
//!   smart number/date formatters ([`resolve_format`]).
//! - **Scales**: linear, log, sqrt, time, band, point, ordinal and quantize
//!   ([`resolve_scale`]).
//! - **Channel encoders**: scale + formatter per channel ([`ChannelEncoder`]).
//! - **Axis layout**: tick labels, rotation, label offset, anchor and the margin
//!   an axis needs ([`AxisAgent::compute_layout`]).
//! - **XY layout**: a two-pass margin solve producing the plot rectangle
//!   ([`XyChartLayout`]).
//!
//! Rendering is out of scope; text measurement is delegated to an
//! [`encodeable_text::TextMeasurer`].
//!
//! ```
//! use encodeable::{ChannelDef, ChannelEncoder, Channel, FieldType, LayoutOptions};
//! use encodeable::encodeable_text::FixedTextMeasurer;
//! use serde_json::json;
//!
//! let rows = [json!({"v": 0}), json!({"v": 100})];
//! let x = ChannelEncoder::with_data(
//!     Channel::X,
//!     ChannelDef::field("v", FieldType::Quantitative),
//!     &rows,
//! )
//! .unwrap();
//! let measurer = FixedTextMeasurer { char_width: 6.0, line_height: 12.0 };
//! let layout = x.axis().unwrap().compute_layout(&LayoutOptions::new(300.0), &measurer);
//! assert_eq!(layout.tick_labels.len(), layout.tick_label_dimensions.len());
//! ```

#![no_std]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub use encodeable_text;

mod axis;
mod channel;
mod encoder;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod layout;
mod scale;
mod time;

pub use axis::{
    AxisAgent, AxisConfig, AxisLayout, AxisOptions, AxisOrient, AxisTitle, DEFAULT_LABEL_ANGLE,
    LabelFlush, LabelOverlap, LabelOverlapStrategy, LayoutOptions, MinMargin, TextAnchor,
};
pub use channel::{Channel, ChannelDef, ChannelEncoder, FieldType, get_field, humanize};
pub use encoder::{Encoder, Encoding};
pub use error::{EncodingError, FormatError};
pub use format::{
    Formatter, NumberFormat, SMART_DATE, SMART_NUMBER, number_formatter, resolve_format,
    smart_number_formatter, smart_time_formatter, time_formatter, value_to_string,
};
pub use layout::{DEFAULT_MARGIN, Margin, XyChartLayout, XyLayoutOptions};
pub use scale::{
    CategoricalDomain, DEFAULT_PALETTE, Scale, ScaleBand, ScaleConfig, ScaleLinear, ScaleLog,
    ScaleOrdinal, ScalePoint, ScalePow, ScaleQuantize, ScaleTime, ScaleType, ScaleTypeCategory,
    distinct_values, infer_domain_f64, resolve_scale,
};
pub use time::{nice_time_domain, nice_time_ticks_ms};
