// Copyright 2025 the Encodeable Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG preview of a laid-out XY chart.
//!
//! Draws the plot frame, both axes from their computed layouts, and one mark per
//! row: a box for box plot records, a dot otherwise. Channel scales must already
//! be ranged to the plot rectangle.

use encodeable::{
    AxisAgent, AxisLayout, AxisOrient, Channel, ChannelEncoder, Encoder, TextAnchor, XyChartLayout,
    XyLayoutOptions,
};
use kurbo::Rect;
use peniko::Color;
use peniko::color::palette::css;
use serde_json::Value;

const AXIS_COLOR: &str = "#444444";

pub(crate) fn render_svg(
    layout: &XyChartLayout,
    options: &XyLayoutOptions,
    encoder: &Encoder,
    rows: &[Value],
) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="sans-serif">"#,
        w = layout.container_width,
        h = layout.container_height,
    ));
    out.push('\n');
    let plot = layout.plot;
    out.push_str(&format!(
        r#"<rect x="{}" y="{}" width="{}" height="{}" fill="none" stroke="{AXIS_COLOR}"/>"#,
        plot.x0,
        plot.y0,
        plot.width(),
        plot.height()
    ));
    out.push('\n');

    if let (Some(x), Some(x_layout)) = (encoder.x(), &layout.x_layout)
        && let Some(agent) = x.axis()
    {
        write_x_axis(&mut out, plot, options, &agent, x_layout);
    }
    if let (Some(y), Some(y_layout)) = (encoder.y(), &layout.y_layout)
        && let Some(agent) = y.axis()
    {
        write_y_axis(&mut out, plot, options, &agent, y_layout);
    }
    if let (Some(x), Some(y)) = (encoder.x(), encoder.y()) {
        let color = encoder.channel(Channel::Color);
        for row in rows {
            write_mark(&mut out, x, y, color, row);
        }
    }

    out.push_str("</svg>\n");
    out
}

/// Position of a tick on its axis; band ticks sit mid-band.
fn tick_position(channel: &ChannelEncoder, value: &Value) -> Option<f64> {
    let scale = channel.scale()?;
    Some(scale.map_value(value)? + scale.bandwidth() / 2.0)
}

fn write_x_axis(
    out: &mut String,
    plot: Rect,
    options: &XyLayoutOptions,
    agent: &AxisAgent<'_>,
    layout: &AxisLayout,
) {
    let (base, dir, baseline) = match layout.orient {
        AxisOrient::Top => (plot.y0, -1.0, "alphabetic"),
        _ => (plot.y1, 1.0, "hanging"),
    };
    let tick_size = options.axis.tick_size;
    let label_y = base + dir * (tick_size + options.axis.gap_between_tick_and_tick_label);
    let anchor = match layout.tick_text_anchor {
        Some(TextAnchor::Start) => "start",
        Some(TextAnchor::End) => "end",
        Some(TextAnchor::Middle) | None => "middle",
    };
    let channel = agent.channel_encoder();
    for (value, label) in agent.get_tick_values().iter().zip(&layout.tick_labels) {
        let Some(x) = tick_position(channel, value) else {
            continue;
        };
        out.push_str(&format!(
            r#"<line x1="{x}" y1="{base}" x2="{x}" y2="{}" stroke="{AXIS_COLOR}"/>"#,
            base + dir * tick_size
        ));
        out.push_str(&format!(
            r#"<text x="{x}" y="{label_y}" font-size="{}" text-anchor="{anchor}" dominant-baseline="{baseline}""#,
            options.axis.tick_text_style.font_size
        ));
        if layout.label_angle != 0.0 {
            out.push_str(&format!(
                r#" transform="rotate({} {x} {label_y})""#,
                layout.label_angle
            ));
        }
        out.push('>');
        out.push_str(&escape_xml(label));
        out.push_str("</text>\n");
    }
    if agent.has_title() {
        let title_y = label_y + dir * (layout.label_offset + 0.5 * options.axis.axis_title_height);
        out.push_str(&format!(
            r#"<text x="{}" y="{title_y}" text-anchor="middle" dominant-baseline="middle" font-weight="bold">{}</text>"#,
            plot.center().x,
            escape_xml(&agent.get_title())
        ));
        out.push('\n');
    }
}

fn write_y_axis(
    out: &mut String,
    plot: Rect,
    options: &XyLayoutOptions,
    agent: &AxisAgent<'_>,
    layout: &AxisLayout,
) {
    let (base, dir, anchor) = match layout.orient {
        AxisOrient::Right => (plot.x1, 1.0, "start"),
        _ => (plot.x0, -1.0, "end"),
    };
    let tick_size = options.axis.tick_size;
    let label_x = base + dir * (tick_size + options.axis.gap_between_tick_and_tick_label);
    let channel = agent.channel_encoder();
    for (value, label) in agent.get_tick_values().iter().zip(&layout.tick_labels) {
        let Some(y) = tick_position(channel, value) else {
            continue;
        };
        out.push_str(&format!(
            r#"<line x1="{base}" y1="{y}" x2="{}" y2="{y}" stroke="{AXIS_COLOR}"/>"#,
            base + dir * tick_size
        ));
        out.push_str(&format!(
            r#"<text x="{label_x}" y="{y}" font-size="{}" text-anchor="{anchor}" dominant-baseline="middle">{}</text>"#,
            options.axis.tick_text_style.font_size,
            escape_xml(label)
        ));
        out.push('\n');
    }
    if agent.has_title() {
        let title_x = base + dir * (tick_size + layout.label_offset);
        let y = plot.center().y;
        out.push_str(&format!(
            r#"<text x="{title_x}" y="{y}" text-anchor="middle" font-weight="bold" transform="rotate(-90 {title_x} {y})">{}</text>"#,
            escape_xml(&agent.get_title())
        ));
        out.push('\n');
    }
}

fn write_mark(
    out: &mut String,
    x: &ChannelEncoder,
    y: &ChannelEncoder,
    color: Option<&ChannelEncoder>,
    row: &Value,
) {
    let fill = color
        .and_then(|c| c.encode_color(row))
        .unwrap_or(css::STEEL_BLUE);
    let fill = svg_color(fill);
    let Some(x0) = x.encode_position(row) else {
        return;
    };
    let bandwidth = x.scale().map_or(0.0, encodeable::Scale::bandwidth);
    let cx = x0 + bandwidth / 2.0;
    let map_y = |key: &str| -> Option<f64> { y.scale()?.map_f64(row.get(key)?.as_f64()?) };

    if let (Some(lo), Some(q1), Some(q2), Some(q3), Some(hi)) = (
        map_y("min"),
        map_y("firstQuartile"),
        map_y("median"),
        map_y("thirdQuartile"),
        map_y("max"),
    ) {
        let half = bandwidth / 4.0;
        out.push_str(&format!(
            r#"<line x1="{cx}" y1="{lo}" x2="{cx}" y2="{hi}" stroke="{AXIS_COLOR}"/>"#
        ));
        out.push_str(&format!(
            r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}" stroke="{AXIS_COLOR}"/>"#,
            cx - half,
            q3.min(q1),
            2.0 * half,
            (q1 - q3).abs()
        ));
        out.push_str(&format!(
            r#"<line x1="{}" y1="{q2}" x2="{}" y2="{q2}" stroke="{AXIS_COLOR}" stroke-width="2"/>"#,
            cx - half,
            cx + half
        ));
        let outliers = row.get("outliers").and_then(Value::as_array);
        for outlier in outliers.into_iter().flatten() {
            if let Some(oy) = outlier.as_f64().and_then(|v| y.scale()?.map_f64(v)) {
                out.push_str(&format!(
                    r#"<circle cx="{cx}" cy="{oy}" r="3" fill="none" stroke="{fill}"/>"#
                ));
            }
        }
        out.push('\n');
    } else if let Some(cy) = y.encode_position(row) {
        out.push_str(&format!(
            r#"<circle cx="{cx}" cy="{cy}" r="3" fill="{fill}"/>"#
        ));
        out.push('\n');
    }
}

fn svg_color(color: Color) -> String {
    let rgba = color.to_rgba8();
    format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b)
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
