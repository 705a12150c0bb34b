// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box plot props.
//!
//! Payload rows carry precomputed statistics per group:
//!
//! ```json
//! {"label": "east", "values": {"whisker_low": 1, "Q1": 2, "Q2": 3, "Q3": 4, "whisker_high": 5, "outliers": [9]}}
//! ```
//!
//! The transformer flattens them into [`BoxPlotDatum`] records and fixes the y
//! domain so whiskers and outliers never touch the plot edge.

extern crate alloc;

use alloc::vec::Vec;

use encodeable::{Channel, SMART_NUMBER};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::pad_domain;
use crate::error::TransformError;
use crate::props::{ChartProps, PropsTransformer, RendererProps};

/// Fraction of each bound's magnitude added to the value domain.
pub const BOX_PLOT_DOMAIN_PADDING: f64 = 0.1;

/// One box: whiskers, quartiles and outliers for a group.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoxPlotDatum {
    /// Group label.
    pub label: Value,
    /// Low whisker.
    pub min: f64,
    /// High whisker.
    pub max: f64,
    /// First quartile.
    pub first_quartile: f64,
    /// Median.
    pub median: f64,
    /// Third quartile.
    pub third_quartile: f64,
    /// Points beyond the whiskers.
    pub outliers: Vec<f64>,
}

impl BoxPlotDatum {
    /// Every value that must fit in the y domain.
    pub fn extent_values(&self) -> impl Iterator<Item = f64> + '_ {
        [self.min, self.max]
            .into_iter()
            .chain(self.outliers.iter().copied())
    }
}

#[derive(Deserialize)]
struct Row {
    #[serde(default)]
    label: Value,
    values: Stats,
}

#[derive(Deserialize)]
struct Stats {
    whisker_low: f64,
    whisker_high: f64,
    #[serde(rename = "Q1")]
    q1: f64,
    #[serde(rename = "Q2")]
    q2: f64,
    #[serde(rename = "Q3")]
    q3: f64,
    #[serde(default)]
    outliers: Vec<f64>,
}

impl From<Row> for BoxPlotDatum {
    fn from(row: Row) -> Self {
        let Row { label, values } = row;
        Self {
            label,
            min: values.whisker_low,
            max: values.whisker_high,
            first_quartile: values.q1,
            median: values.q2,
            third_quartile: values.q3,
            outliers: values.outliers,
        }
    }
}

/// Parses one payload row.
pub fn parse_row(index: usize, row: &Value) -> Result<BoxPlotDatum, TransformError> {
    Row::deserialize(row)
        .map(BoxPlotDatum::from)
        .map_err(|err| TransformError::MalformedRow {
            index,
            message: alloc::format!("{err}"),
        })
}

/// Box plot transformer.
///
/// Writes the padded value domain to `encoding.y.scale.domain` and sets the y-axis
/// format to [`SMART_NUMBER`]. With no values the domain is left untouched.
#[derive(Clone, Copy, Debug, Default)]
pub struct BoxPlotTransformer;

impl PropsTransformer for BoxPlotTransformer {
    type Record = BoxPlotDatum;

    fn transform(&self, props: ChartProps) -> Result<RendererProps<BoxPlotDatum>, TransformError> {
        let ChartProps {
            width,
            height,
            form_data,
            payload,
        } = props;
        let mut encoding = form_data.encoding;

        let data = payload
            .data
            .iter()
            .enumerate()
            .map(|(index, row)| parse_row(index, row))
            .collect::<Result<Vec<_>, _>>()?;

        let y = encoding
            .get_mut(Channel::Y)
            .ok_or(TransformError::MissingChannel { channel: Channel::Y })?;
        match pad_domain(
            data.iter().flat_map(BoxPlotDatum::extent_values),
            BOX_PLOT_DOMAIN_PADDING,
        ) {
            Some((lo, hi)) => {
                y.scale_mut().domain = Some(alloc::vec![number(lo), number(hi)]);
            }
            None => log::debug!("box plot: no finite values, keeping the y domain"),
        }
        y.axis_mut().format = Some(SMART_NUMBER.into());

        Ok(RendererProps {
            data,
            width,
            height,
            encoding,
        })
    }
}

fn number(v: f64) -> Value {
    serde_json::Number::from_f64(v).map_or(Value::Null, Value::Number)
}
