// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line demo for `encodeable`.
//!
//! Reads chart props JSON (or uses a built-in box plot), runs the props transformer,
//! binds the encoding, solves the XY layout and prints the result as JSON.
//! `--svg` additionally writes a preview of the axes and marks.

mod svg;

use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use encodeable::{Channel, Encoder, Encoding, LayoutOptions, XyChartLayout, XyLayoutOptions};
use encodeable_text::{CachedTextMeasurer, HeuristicTextMeasurer, TextStyle};
use encodeable_transforms::{
    BoxPlotTransformer, ChartProps, PassthroughTransformer, PropsTransformer, RendererProps,
};
use log::{error, info};
use serde::Serialize;
use serde_json::{Value, json};

/// Transform chart props and compute axis layout
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Chart props JSON file; a built-in box plot when omitted
    props: Option<PathBuf>,

    /// Chart type used to transform the payload
    #[arg(long, value_enum, default_value_t = ChartKind::BoxPlot)]
    chart: ChartKind,

    /// Override the container width
    #[arg(long)]
    width: Option<f64>,

    /// Override the container height
    #[arg(long)]
    height: Option<f64>,

    /// Tick label font size in pixels
    #[arg(long, default_value_t = 12.0)]
    font_size: f64,

    /// Write an SVG preview to this path
    #[arg(long)]
    svg: Option<PathBuf>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum ChartKind {
    /// Rows of `{label, values: {whisker_low, Q1, Q2, Q3, whisker_high, outliers}}`
    BoxPlot,
    /// Flat rows, forwarded unchanged
    Passthrough,
}

#[derive(Serialize)]
struct Report<'a, R> {
    data: &'a [R],
    encoding: &'a Encoding,
    layout: &'a XyChartLayout,
}

fn sample_props() -> Value {
    json!({
        "width": 480,
        "height": 320,
        "formData": {
            "vizType": "box_plot",
            "encoding": {
                "x": {"field": "label", "type": "nominal", "title": "Region"},
                "y": {"field": "median", "type": "quantitative", "title": "Order value"},
                "color": {"field": "label", "type": "nominal"}
            }
        },
        "payload": {
            "data": [
                {"label": "North America", "values": {"whisker_low": 120, "Q1": 340, "Q2": 410, "Q3": 520, "whisker_high": 760, "outliers": [980, 1105]}},
                {"label": "Europe", "values": {"whisker_low": 90, "Q1": 260, "Q2": 330, "Q3": 450, "whisker_high": 640, "outliers": [12]}},
                {"label": "Asia Pacific", "values": {"whisker_low": 60, "Q1": 180, "Q2": 250, "Q3": 390, "whisker_high": 610}},
                {"label": "Latin America", "values": {"whisker_low": 40, "Q1": 150, "Q2": 210, "Q3": 300, "whisker_high": 470, "outliers": [720]}}
            ]
        }
    })
}

fn load_props(cli: &Cli) -> Result<ChartProps, Box<dyn Error>> {
    let value = match &cli.props {
        Some(path) => {
            info!("reading chart props from {}", path.display());
            serde_json::from_str(&fs::read_to_string(path)?)?
        }
        None => {
            info!("no props file given, using the built-in box plot");
            sample_props()
        }
    };
    let mut props = ChartProps::from_json(value)?;
    if let Some(width) = cli.width {
        props.width = width;
    }
    if let Some(height) = cli.height {
        props.height = height;
    }
    Ok(props)
}

fn render<R: Serialize>(cli: &Cli, props: &RendererProps<R>) -> Result<(), Box<dyn Error>> {
    let rows = props
        .data
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    let mut encoder = Encoder::new(&props.encoding, &rows)?;

    let options = XyLayoutOptions::new(props.width, props.height).with_axis_options(
        LayoutOptions::new(0.0).with_tick_text_style(TextStyle::new(cli.font_size)),
    );
    let measurer = CachedTextMeasurer::new(HeuristicTextMeasurer);
    let layout = XyChartLayout::for_encoder(&options, &encoder, &measurer);
    info!(
        "plot {}x{} at ({}, {}), {} labels measured",
        layout.chart_width,
        layout.chart_height,
        layout.plot.x0,
        layout.plot.y0,
        measurer.len()
    );

    let report = Report {
        data: &props.data,
        encoding: &props.encoding,
        layout: &layout,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    if let Some(path) = &cli.svg {
        if let Some(x) = encoder.channel_mut(Channel::X) {
            x.set_range(layout.x_range());
        }
        if let Some(y) = encoder.channel_mut(Channel::Y) {
            y.set_range(layout.y_range());
        }
        fs::write(path, svg::render_svg(&layout, &options, &encoder, &rows))?;
        info!("wrote {}", path.display());
    }
    Ok(())
}

fn run(cli: &Cli) -> Result<(), Box<dyn Error>> {
    let props = load_props(cli)?;
    match cli.chart {
        ChartKind::BoxPlot => render(cli, &BoxPlotTransformer.transform(props)?),
        ChartKind::Passthrough => render(cli, &PassthroughTransformer.transform(props)?),
    }
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = run(&cli) {
        error!("{err}");
        std::process::exit(1);
    }
}
