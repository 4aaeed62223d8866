//! # ganttplot-render
//!
//! Drawing backends for ganttplot.
//!
//! Backends consume the ordered [`RenderPrimitive`] list produced by the
//! layout engine and know nothing about tasks, dates, or dependencies; any
//! rendering surface (raster canvas, vector export, terminal output) can
//! implement [`Backend`] against the same primitive stream.
//!
//! This crate ships the SVG backend.
//!
//! ## Example
//!
//! ```rust,ignore
//! use ganttplot_core::Backend;
//! use ganttplot_render::SvgBackend;
//!
//! let svg = SvgBackend::new().paint(&primitives)?;
//! std::fs::write("chart.svg", svg)?;
//! ```

use ganttplot_core::{bounding_box, Backend, BackendError, RenderPrimitive, TextAlign};
use svg::node::element::{Group, Polyline, Rectangle, Text};
use svg::Document;

/// SVG vector export backend
#[derive(Clone, Debug)]
pub struct SvgBackend {
    /// Padding around the primitives' bounding box
    pub padding: f64,
    /// Background color; None leaves the canvas transparent
    pub background_color: Option<String>,
    /// Font family applied to every text primitive
    pub font_family: String,
    /// Font size in pixels
    pub font_size: u32,
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self {
            padding: 20.0,
            background_color: Some("#ffffff".into()),
            font_family: "system-ui, -apple-system, sans-serif".into(),
            font_size: 12,
        }
    }
}

impl SvgBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the canvas padding
    pub fn padding(mut self, padding: f64) -> Self {
        self.padding = padding;
        self
    }

    /// Use a transparent background
    pub fn transparent(mut self) -> Self {
        self.background_color = None;
        self
    }

    fn add_primitive(&self, group: Group, primitive: &RenderPrimitive) -> Group {
        match primitive {
            RenderPrimitive::Rect { bounds, fill } => group.add(
                Rectangle::new()
                    .set("x", bounds.x)
                    .set("y", bounds.y)
                    .set("width", bounds.width)
                    .set("height", bounds.height)
                    .set("fill", fill.as_str()),
            ),
            RenderPrimitive::Polyline {
                points,
                stroke,
                stroke_width,
            } => {
                let point_list = points
                    .iter()
                    .map(|p| format!("{},{}", p.x, p.y))
                    .collect::<Vec<_>>()
                    .join(" ");
                group.add(
                    Polyline::new()
                        .set("points", point_list)
                        .set("fill", "none")
                        .set("stroke", stroke.as_str())
                        .set("stroke-width", *stroke_width),
                )
            }
            RenderPrimitive::Text {
                anchor,
                content,
                align,
            } => {
                let text_anchor = match align {
                    TextAlign::Start => "start",
                    TextAlign::Middle => "middle",
                    TextAlign::End => "end",
                };
                group.add(
                    Text::new(content.clone())
                        .set("x", anchor.x)
                        .set("y", anchor.y)
                        .set("font-family", self.font_family.as_str())
                        .set("font-size", self.font_size)
                        .set("text-anchor", text_anchor)
                        .set("dominant-baseline", "middle"),
                )
            }
        }
    }
}

impl Backend for SvgBackend {
    type Output = String;

    fn paint(&self, primitives: &[RenderPrimitive]) -> Result<String, BackendError> {
        let bbox = bounding_box(primitives)
            .unwrap_or(ganttplot_core::Rect::new(0.0, 0.0, 0.0, 0.0));

        let x = bbox.x - self.padding;
        let y = bbox.y - self.padding;
        let width = bbox.width + 2.0 * self.padding;
        let height = bbox.height + 2.0 * self.padding;

        let mut document = Document::new()
            .set("width", width)
            .set("height", height)
            .set("viewBox", (x, y, width, height));

        if let Some(background) = &self.background_color {
            document = document.add(
                Rectangle::new()
                    .set("x", x)
                    .set("y", y)
                    .set("width", width)
                    .set("height", height)
                    .set("fill", background.as_str()),
            );
        }

        let mut group = Group::new().set("class", "chart");
        for primitive in primitives {
            group = self.add_primitive(group, primitive);
        }
        document = document.add(group);

        Ok(document.to_string())
    }
}
