// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A small two-pass margin solve for XY charts.
//!
//! Axes claim margin before the plot rectangle is known, so layout runs in order:
//! - **Measure y**: lay out the y-axis against the height left by the initial margin.
//! - **Measure x**: lay out the x-axis against the width left after the y-axis has
//!   claimed its side.
//! - **Arrange**: derive the plot rectangle from the merged margin.
//!
//! The x-axis sees the final left/right margin; the y-axis sees only the initial
//! top/bottom margin. This accepts one layer of approximation instead of
//! iterating to a fixed point.

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

use encodeable_text::TextMeasurer;
use kurbo::Rect;
use serde::{Deserialize, Serialize};

use crate::axis::{AxisAgent, AxisLayout, AxisOrient, LayoutOptions, MinMargin};
use crate::encoder::Encoder;

/// Default margin on each side of a chart.
pub const DEFAULT_MARGIN: f64 = 20.0;

/// Space reserved around the plot rectangle.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    /// Space above the plot.
    pub top: f64,
    /// Space right of the plot.
    pub right: f64,
    /// Space below the plot.
    pub bottom: f64,
    /// Space left of the plot.
    pub left: f64,
}

impl Default for Margin {
    fn default() -> Self {
        Self::uniform(DEFAULT_MARGIN)
    }
}

impl Margin {
    /// The same margin on all sides.
    pub const fn uniform(value: f64) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
        }
    }

    /// The margin on `side`.
    pub fn side(&self, side: AxisOrient) -> f64 {
        match side {
            AxisOrient::Top => self.top,
            AxisOrient::Right => self.right,
            AxisOrient::Bottom => self.bottom,
            AxisOrient::Left => self.left,
        }
    }

    /// Grows the side named by `min` to at least `min.value`.
    #[must_use]
    pub fn merge(mut self, min: MinMargin) -> Self {
        let slot = match min.side {
            AxisOrient::Top => &mut self.top,
            AxisOrient::Right => &mut self.right,
            AxisOrient::Bottom => &mut self.bottom,
            AxisOrient::Left => &mut self.left,
        };
        *slot = slot.max(min.value);
        self
    }

    /// Per-side maximum of two margins.
    #[must_use]
    pub fn merged(&self, other: &Self) -> Self {
        Self {
            top: self.top.max(other.top),
            right: self.right.max(other.right),
            bottom: self.bottom.max(other.bottom),
            left: self.left.max(other.left),
        }
    }

    fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// Inputs to [`XyChartLayout::compute`].
#[derive(Clone, Debug, PartialEq)]
pub struct XyLayoutOptions {
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
    /// Initial margin.
    pub margin: Margin,
    /// Grow the margin to fit the axes.
    pub auto_adjust_margin: bool,
    /// Smallest plot width; the container grows past `width` to fit it.
    pub min_content_width: f64,
    /// Smallest plot height; the container grows past `height` to fit it.
    pub min_content_height: f64,
    /// Shared axis options. `axis_width` is replaced per axis.
    pub axis: LayoutOptions,
}

impl XyLayoutOptions {
    /// Options for a `width` x `height` container with the default margin.
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            margin: Margin::default(),
            auto_adjust_margin: true,
            min_content_width: 0.0,
            min_content_height: 0.0,
            axis: LayoutOptions::new(0.0),
        }
    }

    /// Sets the initial margin.
    pub fn with_margin(mut self, margin: Margin) -> Self {
        self.margin = margin;
        self
    }

    /// Enables or disables margin growth.
    pub fn with_auto_adjust_margin(mut self, auto_adjust_margin: bool) -> Self {
        self.auto_adjust_margin = auto_adjust_margin;
        self
    }

    /// Sets the smallest plot size.
    pub fn with_min_content_size(mut self, width: f64, height: f64) -> Self {
        self.min_content_width = width;
        self.min_content_height = height;
        self
    }

    /// Sets the shared axis options.
    pub fn with_axis_options(mut self, axis: LayoutOptions) -> Self {
        self.axis = axis;
        self
    }
}

/// Resolved layout of an XY chart.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct XyChartLayout {
    /// Final margin.
    pub margin: Margin,
    /// Plot width.
    pub chart_width: f64,
    /// Plot height.
    pub chart_height: f64,
    /// Container width, grown to fit the minimum content width.
    pub container_width: f64,
    /// Container height, grown to fit the minimum content height.
    pub container_height: f64,
    /// Plot rectangle in container coordinates.
    pub plot: Rect,
    /// The x-axis layout, if there is an x-axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_layout: Option<AxisLayout>,
    /// The y-axis layout, if there is a y-axis.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_layout: Option<AxisLayout>,
}

impl XyChartLayout {
    /// Lays out a chart with optional x and y axes.
    pub fn compute(
        options: &XyLayoutOptions,
        x_axis: Option<&AxisAgent<'_>>,
        y_axis: Option<&AxisAgent<'_>>,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let mut margin = options.margin;

        let y_layout = y_axis.map(|axis| {
            let axis_width =
                (options.height - margin.vertical()).max(options.min_content_height);
            axis.compute_layout(&with_axis_width(&options.axis, axis_width), measurer)
        });
        if options.auto_adjust_margin
            && let Some(layout) = &y_layout
        {
            margin = margin.merge(layout.min_margin);
        }

        let x_layout = x_axis.map(|axis| {
            let axis_width = (options.width - margin.horizontal()).max(options.min_content_width);
            axis.compute_layout(&with_axis_width(&options.axis, axis_width), measurer)
        });
        if options.auto_adjust_margin
            && let Some(layout) = &x_layout
        {
            margin = margin.merge(layout.min_margin);
        }

        let chart_width = (options.width - margin.horizontal())
            .max(options.min_content_width)
            .round();
        let chart_height = (options.height - margin.vertical())
            .max(options.min_content_height)
            .round();
        let container_width = options.width.max(chart_width + margin.horizontal());
        let container_height = options.height.max(chart_height + margin.vertical());
        let plot = Rect::new(
            margin.left,
            margin.top,
            margin.left + chart_width,
            margin.top + chart_height,
        );

        log::debug!(
            "xy layout: plot {chart_width}x{chart_height}, margin {margin:?}, container {container_width}x{container_height}"
        );

        Self {
            margin,
            chart_width,
            chart_height,
            container_width,
            container_height,
            plot,
            x_layout,
            y_layout,
        }
    }

    /// Lays out a chart using the `x` and `y` axes of `encoder`.
    pub fn for_encoder(
        options: &XyLayoutOptions,
        encoder: &Encoder,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let x_axis = encoder.x().and_then(|c| c.axis());
        let y_axis = encoder.y().and_then(|c| c.axis());
        Self::compute(options, x_axis.as_ref(), y_axis.as_ref(), measurer)
    }

    /// Output range for the x scale.
    pub fn x_range(&self) -> (f64, f64) {
        (self.plot.x0, self.plot.x1)
    }

    /// Output range for the y scale; inverted so larger values sit higher.
    pub fn y_range(&self) -> (f64, f64) {
        (self.plot.y1, self.plot.y0)
    }
}

fn with_axis_width(options: &LayoutOptions, axis_width: f64) -> LayoutOptions {
    LayoutOptions {
        axis_width,
        ..options.clone()
    }
}

#[cfg(test)]
mod tests {
    use encodeable_text::FixedTextMeasurer;
    use serde_json::json;

    use super::*;
    use crate::channel::{Channel, ChannelDef, FieldType};
    use crate::encoder::Encoding;
    use crate::scale::ScaleConfig;

    const MEASURER: FixedTextMeasurer = FixedTextMeasurer {
        char_width: 10.0,
        line_height: 12.0,
    };

    fn encoder() -> Encoder {
        let encoding = Encoding::default()
            .with(Channel::X, ChannelDef::field("label", FieldType::Nominal))
            .with(
                Channel::Y,
                ChannelDef::field("value", FieldType::Quantitative).with_scale(
                    ScaleConfig::new().with_domain(alloc::vec![json!(0), json!(100)]),
                ),
            );
        let rows = [
            json!({"label": "a", "value": 10}),
            json!({"label": "b", "value": 60}),
            json!({"label": "c", "value": 90}),
        ];
        Encoder::new(&encoding, &rows).expect("valid encoding")
    }

    #[test]
    fn margins_grow_to_fit_axes() {
        let layout =
            XyChartLayout::for_encoder(&XyLayoutOptions::new(400.0, 300.0), &encoder(), &MEASURER);
        // y: tick 8 + gap 4 + title 24 + border 4 + widest label "100" 30
        assert_eq!(layout.margin.left, 70.0);
        // x: tick 8 + gap 4 + title 24 + border 4 + label 12 + pad 8
        assert_eq!(layout.margin.bottom, 60.0);
        assert_eq!(layout.margin.top, DEFAULT_MARGIN);
        assert_eq!(layout.margin.right, DEFAULT_MARGIN);
        assert_eq!(layout.chart_width, 310.0);
        assert_eq!(layout.chart_height, 220.0);
        assert_eq!(layout.plot, Rect::new(70.0, 20.0, 380.0, 240.0));
        assert_eq!(layout.container_width, 400.0);

        let x = layout.x_layout.as_ref().expect("x layout");
        assert_eq!(x.axis_width, 310.0);
        let y = layout.y_layout.as_ref().expect("y layout");
        assert_eq!(y.axis_width, 260.0);
    }

    #[test]
    fn fixed_margins_are_kept() {
        let options = XyLayoutOptions::new(400.0, 300.0).with_auto_adjust_margin(false);
        let layout = XyChartLayout::for_encoder(&options, &encoder(), &MEASURER);
        assert_eq!(layout.margin, Margin::default());
        assert_eq!(layout.chart_width, 360.0);
    }

    #[test]
    fn container_grows_for_minimum_content() {
        let options = XyLayoutOptions::new(100.0, 300.0).with_min_content_size(200.0, 0.0);
        let layout = XyChartLayout::for_encoder(&options, &encoder(), &MEASURER);
        assert_eq!(layout.chart_width, 200.0);
        assert_eq!(layout.container_width, 290.0);
        assert_eq!(layout.container_height, 300.0);
    }

    #[test]
    fn chart_without_axes_uses_initial_margin() {
        let options = XyLayoutOptions::new(120.0, 80.0).with_margin(Margin::uniform(10.0));
        let layout = XyChartLayout::compute(&options, None, None, &MEASURER);
        assert_eq!(layout.plot, Rect::new(10.0, 10.0, 110.0, 70.0));
        assert_eq!(layout.x_range(), (10.0, 110.0));
        assert_eq!(layout.y_range(), (70.0, 10.0));
        assert!(layout.x_layout.is_none());
    }

    #[test]
    fn margin_merge_is_per_side_max() {
        let m = Margin::uniform(20.0).merge(MinMargin {
            side: AxisOrient::Left,
            value: 45.0,
        });
        assert_eq!(m.side(AxisOrient::Left), 45.0);
        let m = m.merge(MinMargin {
            side: AxisOrient::Top,
            value: 5.0,
        });
        assert_eq!(m.top, 20.0);
        let wide = Margin {
            top: 0.0,
            right: 50.0,
            bottom: 0.0,
            left: 0.0,
        };
        assert_eq!(
            m.merged(&wide),
            Margin {
                top: 20.0,
                right: 50.0,
                bottom: 20.0,
                left: 45.0,
            }
        );
    }
}
