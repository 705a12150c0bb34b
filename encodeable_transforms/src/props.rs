// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Chart props in and renderer props out.

extern crate alloc;

use alloc::string::String;
use alloc::vec::Vec;

use encodeable::Encoding;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::TransformError;

/// Props handed to a chart by the host: container size, form data and the query
/// payload.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartProps {
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
    /// Chart configuration.
    #[serde(default)]
    pub form_data: FormData,
    /// Query results.
    #[serde(default)]
    pub payload: Payload,
}

impl ChartProps {
    /// Decodes chart props from their JSON form.
    pub fn from_json(value: Value) -> Result<Self, TransformError> {
        serde_json::from_value(value).map_err(|err| TransformError::json(&err))
    }
}

/// Chart configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormData {
    /// Channel encoding.
    #[serde(default)]
    pub encoding: Encoding,
    /// Every other form field, kept as-is.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Query results.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Payload {
    /// Result rows.
    #[serde(default)]
    pub data: Vec<Value>,
}

/// Props consumed by a renderer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RendererProps<R> {
    /// Records, one per mark.
    pub data: Vec<R>,
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
    /// Encoding, possibly rewritten by the transformer.
    pub encoding: Encoding,
}

/// Reshapes [`ChartProps`] into renderer props for one chart type.
pub trait PropsTransformer {
    /// Record type the renderer consumes.
    type Record;

    /// Transforms the props. Consumes them: the encoding may be rewritten.
    fn transform(&self, props: ChartProps) -> Result<RendererProps<Self::Record>, TransformError>;
}

/// Forwards flat payload rows unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct PassthroughTransformer;

impl PropsTransformer for PassthroughTransformer {
    type Record = Value;

    fn transform(&self, props: ChartProps) -> Result<RendererProps<Value>, TransformError> {
        let ChartProps {
            width,
            height,
            form_data,
            payload,
        } = props;
        Ok(RendererProps {
            data: payload.data,
            width,
            height,
            encoding: form_data.encoding,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn decodes_form_data_and_keeps_extra_fields() {
        let props = ChartProps::from_json(json!({
            "width": 300,
            "height": 200,
            "formData": {
                "vizType": "box_plot",
                "encoding": {"x": {"field": "label", "type": "nominal"}}
            },
            "payload": {"data": [{"label": "a"}]}
        }))
        .expect("valid props");
        assert_eq!(props.width, 300.0);
        assert!(props.form_data.encoding.x.is_some());
        assert_eq!(props.form_data.extra.get("vizType"), Some(&json!("box_plot")));
        assert_eq!(props.payload.data.len(), 1);
    }

    #[test]
    fn passthrough_forwards_rows() {
        let props = ChartProps {
            width: 10.0,
            height: 20.0,
            payload: Payload {
                data: alloc::vec![json!({"a": 1}), json!({"a": 2})],
            },
            ..ChartProps::default()
        };
        let out = PassthroughTransformer.transform(props).expect("passthrough");
        assert_eq!(out.data, alloc::vec![json!({"a": 1}), json!({"a": 2})]);
        assert_eq!((out.width, out.height), (10.0, 20.0));
    }

    #[test]
    fn invalid_props_report_json_errors() {
        assert!(matches!(
            ChartProps::from_json(json!({"width": "wide"})),
            Err(TransformError::Json { .. })
        ));
    }
}
