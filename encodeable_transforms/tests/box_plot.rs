// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Box plot transformer behavior, end to end from JSON chart props.

use encodeable::encodeable_text::FixedTextMeasurer;
use encodeable::{Channel, Encoder, SMART_NUMBER, XyChartLayout, XyLayoutOptions};
use encodeable_transforms::{BoxPlotTransformer, ChartProps, PropsTransformer, TransformError};
use serde_json::{Value, json};

fn props(rows: Value) -> ChartProps {
    ChartProps::from_json(json!({
        "width": 400,
        "height": 300,
        "formData": {
            "encoding": {
                "x": {"field": "label", "type": "nominal"},
                "y": {"field": "median", "type": "quantitative", "scale": {}, "axis": {}}
            }
        },
        "payload": {"data": rows}
    }))
    .expect("valid chart props")
}

fn domain_bounds(domain: &[Value]) -> (f64, f64) {
    let lo = domain[0].as_f64().expect("numeric bound");
    let hi = domain[1].as_f64().expect("numeric bound");
    (lo, hi)
}

#[test]
fn rows_are_flattened_and_domain_padded() {
    let out = BoxPlotTransformer
        .transform(props(json!([
            {"label": "east", "values": {"whisker_low": -10, "Q1": 0, "Q2": 5, "Q3": 10, "whisker_high": 20, "outliers": [50]}},
            {"label": "west", "values": {"whisker_low": -2, "Q1": 1, "Q2": 2, "Q3": 3, "whisker_high": 4, "outliers": []}}
        ])))
        .expect("box plot transform");

    assert_eq!(out.data.len(), 2);
    let east = &out.data[0];
    assert_eq!(east.label, json!("east"));
    assert_eq!(east.min, -10.0);
    assert_eq!(east.max, 20.0);
    assert_eq!(east.first_quartile, 0.0);
    assert_eq!(east.median, 5.0);
    assert_eq!(east.third_quartile, 10.0);
    assert_eq!(east.outliers, vec![50.0]);
    assert_eq!((out.width, out.height), (400.0, 300.0));

    let y = out.encoding.get(Channel::Y).expect("y channel");
    let domain = y
        .scale
        .as_ref()
        .and_then(|s| s.domain.as_deref())
        .expect("padded domain");
    let (lo, hi) = domain_bounds(domain);
    assert!((lo - -11.0).abs() < 1e-9);
    assert!((hi - 55.0).abs() < 1e-9);
    assert_eq!(
        y.axis.as_ref().and_then(|a| a.format.as_deref()),
        Some(SMART_NUMBER)
    );
}

#[test]
fn missing_outliers_default_to_empty() {
    let out = BoxPlotTransformer
        .transform(props(json!([
            {"label": "a", "values": {"whisker_low": 1, "Q1": 2, "Q2": 3, "Q3": 4, "whisker_high": 5}}
        ])))
        .expect("box plot transform");
    assert!(out.data[0].outliers.is_empty());
    let y = out.encoding.get(Channel::Y).expect("y channel");
    let domain = y
        .scale
        .as_ref()
        .and_then(|s| s.domain.as_deref())
        .expect("padded domain");
    let (lo, hi) = domain_bounds(domain);
    assert!((lo - 0.9).abs() < 1e-9);
    assert!((hi - 5.5).abs() < 1e-9);
}

#[test]
fn empty_payload_leaves_domain_unset() {
    let out = BoxPlotTransformer
        .transform(props(json!([])))
        .expect("box plot transform");
    assert!(out.data.is_empty());
    let y = out.encoding.get(Channel::Y).expect("y channel");
    assert_eq!(y.scale.as_ref().and_then(|s| s.domain.as_ref()), None);
    assert_eq!(
        y.axis.as_ref().and_then(|a| a.format.as_deref()),
        Some(SMART_NUMBER)
    );
}

#[test]
fn malformed_rows_name_their_index() {
    let err = BoxPlotTransformer
        .transform(props(json!([
            {"label": "ok", "values": {"whisker_low": 1, "Q1": 2, "Q2": 3, "Q3": 4, "whisker_high": 5}},
            {"label": "bad", "values": {"Q1": 2}}
        ])))
        .expect_err("second row is missing statistics");
    assert!(matches!(err, TransformError::MalformedRow { index: 1, .. }));
}

#[test]
fn missing_y_channel_is_reported() {
    let mut props = props(json!([]));
    props.form_data.encoding.set(Channel::Y, None);
    assert_eq!(
        BoxPlotTransformer.transform(props).err(),
        Some(TransformError::MissingChannel {
            channel: Channel::Y
        })
    );
}

#[test]
fn transformed_props_drive_axis_layout() {
    let out = BoxPlotTransformer
        .transform(props(json!([
            {"label": "east", "values": {"whisker_low": -10, "Q1": 0, "Q2": 5, "Q3": 10, "whisker_high": 20, "outliers": [50]}}
        ])))
        .expect("box plot transform");
    let rows: Vec<Value> = out
        .data
        .iter()
        .map(|d| serde_json::to_value(d).expect("serializable datum"))
        .collect();
    let encoder = Encoder::new(&out.encoding, &rows).expect("valid encoding");

    let y = encoder.y().expect("y channel");
    let domain = y.scale().expect("y scale").domain();
    let (lo, hi) = domain_bounds(&domain);
    assert!((lo - -11.0).abs() < 1e-9);
    assert!((hi - 55.0).abs() < 1e-9);

    let measurer = FixedTextMeasurer {
        char_width: 6.0,
        line_height: 12.0,
    };
    let layout = XyChartLayout::for_encoder(
        &XyLayoutOptions::new(out.width, out.height),
        &encoder,
        &measurer,
    );
    let y_layout = layout.y_layout.expect("y axis layout");
    assert_eq!(y_layout.tick_labels.len(), y_layout.tick_label_dimensions.len());
    assert!(y_layout.tick_labels.iter().all(|l| !l.is_empty()));
    assert!(layout.margin.left >= y_layout.min_margin.value);
}
