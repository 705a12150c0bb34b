// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Props transformers for `encodeable` charts.
//!
//! Hosts hand a chart its container size, form data and the raw query payload
//! ([`ChartProps`]). A [`PropsTransformer`] turns that into [`RendererProps`]: records
//! in the shape the chart's renderer draws, plus an encoding that may have been
//! adjusted for the data (for example a padded y domain).
//!
//! Transformers are synchronous and pure apart from consuming their input.

#![no_std]

extern crate alloc;

mod box_plot;
mod domain;
mod error;
mod props;

pub use box_plot::{BOX_PLOT_DOMAIN_PADDING, BoxPlotDatum, BoxPlotTransformer, parse_row};
pub use domain::{extent, pad_domain};
pub use error::TransformError;
pub use props::{
    ChartProps, FormData, Payload, PassthroughTransformer, PropsTransformer, RendererProps,
};
