//! Figure assembly: orchestrates the layout pass into one primitive list.

use chrono::NaiveDate;
use ganttplot_core::{
    AvgCharWidth, ChartConfig, LayoutError, Point, RenderPrimitive, TaskRecord, TextAlign,
    WidthEstimator,
};
use tracing::debug;

use crate::arrows::ArrowRouter;
use crate::axis::{TickKind, TimeAxis};
use crate::bars::build_frame;
use crate::color::ColorAssigner;
use crate::legend::LegendBuilder;
use crate::rows::RowLayout;

const GRID_COLOR: &str = "#bdbdbd";
const EMPHASIS_COLOR: &str = "#e53935";
const FRAME_COLOR: &str = "#212121";
const ARROW_COLOR: &str = "#424242";

/// Vertical band under the chart reserved for the weekday axis labels.
const AXIS_BAND: f64 = 20.0;
/// Gap between the axis band and the first legend row.
const LEGEND_PAD: f64 = 10.0;
/// Weekday labels are dropped below this day width; they would overlap.
const MIN_LABELED_DAY_WIDTH: f64 = 10.0;

/// The single entry point consumed by drawing backends.
///
/// `draw` is stateless with respect to task data: every call recomputes the
/// full layout from the given records and the configuration captured at
/// construction. Nothing is retained between calls, so identical input
/// yields an identical primitive list.
pub struct Figure {
    config: ChartConfig,
    estimator: Box<dyn WidthEstimator>,
}

impl Figure {
    /// Validate the configuration and build a figure.
    ///
    /// All configuration errors surface here, before any layout work.
    pub fn new(config: ChartConfig) -> Result<Self, LayoutError> {
        config.validate()?;
        Ok(Self {
            config,
            estimator: Box::new(AvgCharWidth::default()),
        })
    }

    /// Replace the legend width estimator (builder pattern).
    ///
    /// Callers with real font metrics from their drawing backend inject
    /// them here; the default is the character-count approximation.
    pub fn with_estimator(mut self, estimator: impl WidthEstimator + 'static) -> Self {
        self.estimator = Box::new(estimator);
        self
    }

    pub fn config(&self) -> &ChartConfig {
        &self.config
    }

    /// Run one layout pass.
    ///
    /// Primitive order: task bars and dependency arrows in row order, then
    /// gridlines, frame, axis and row labels, then the legend last so it
    /// paints on top. The first component failure aborts the call; no
    /// partial list is ever returned.
    pub fn draw(&self, records: &[TaskRecord]) -> Result<Vec<RenderPrimitive>, LayoutError> {
        let config = &self.config;
        if records.is_empty() {
            debug!("no records, nothing to lay out");
            return Ok(Vec::new());
        }

        let rows = RowLayout::build(records, config)?;
        let axis = TimeAxis::new(config.project_start, config.pixels_per_day, config.left_margin)?;
        let mut colors = ColorAssigner::new(config.palette.clone())?;
        colors.assign(records.iter().map(|r| r.id.as_str()));
        let frame = build_frame(records, &rows, &axis, config)?;
        let arrows = ArrowRouter::default().route(records, &frame, &rows)?;

        debug!(
            tasks = records.len(),
            arrows = arrows.len(),
            "layout frame complete"
        );

        let chart_left = config.left_margin;
        let chart_top = config.top_margin;
        let chart_bottom = rows.bottom(rows.len() - 1);
        let last_date = latest_date(records);
        let chart_right = last_date
            .map(|d| axis.x(d))
            .unwrap_or(chart_left)
            .max(chart_left + axis.day_width());

        let mut primitives = Vec::new();

        // Bars, in row order. Planned and actual share the task's color.
        for id in rows.ordered_ids() {
            let bars = frame.get(id).expect("frame covers every row");
            let fill = colors
                .color_of(id)
                .expect("every task id is registered")
                .clone();
            if let Some(planned) = bars.planned {
                primitives.push(RenderPrimitive::Rect {
                    bounds: planned,
                    fill: fill.clone(),
                });
            }
            if let Some(actual) = bars.actual {
                primitives.push(RenderPrimitive::Rect {
                    bounds: actual,
                    fill,
                });
            }
        }

        // Arrows, already in successor row order.
        for points in arrows {
            primitives.push(RenderPrimitive::Polyline {
                points,
                stroke: ARROW_COLOR.into(),
                stroke_width: 1.5,
            });
        }

        // Gridlines and axis labels.
        if config.show_grid {
            if let Some(last) = last_date {
                self.emit_grid(
                    &axis,
                    config.project_start,
                    last,
                    chart_top,
                    chart_bottom,
                    chart_left,
                    chart_right,
                    &mut primitives,
                );
            }
        }

        // Chart frame.
        primitives.push(RenderPrimitive::Polyline {
            points: vec![
                Point::new(chart_left, chart_top),
                Point::new(chart_right, chart_top),
                Point::new(chart_right, chart_bottom),
                Point::new(chart_left, chart_bottom),
                Point::new(chart_left, chart_top),
            ],
            stroke: FRAME_COLOR.into(),
            stroke_width: 1.5,
        });

        // Title, centered over the chart area.
        if let Some(title) = &config.title {
            primitives.push(RenderPrimitive::Text {
                anchor: Point::new((chart_left + chart_right) / 2.0, chart_top / 2.0),
                content: title.clone(),
                align: TextAlign::Middle,
            });
        }

        // Row labels in the left margin.
        if config.show_row_labels {
            for (row, id) in rows.ordered_ids().iter().enumerate() {
                let record = records
                    .iter()
                    .find(|r| &r.id == id)
                    .expect("row ids come from records");
                let content = if record.description.is_empty() {
                    record.id.clone()
                } else {
                    format!("{}: {}", record.id, record.description)
                };
                primitives.push(RenderPrimitive::Text {
                    anchor: Point::new(chart_left - 6.0, rows.center_y(row)),
                    content,
                    align: TextAlign::End,
                });
            }
        }

        // Legend last, so it renders on top.
        let legend = LegendBuilder::new(config.legend_max_width);
        let legend_origin = Point::new(chart_left, chart_bottom + AXIS_BAND + LEGEND_PAD);
        primitives.extend(legend.build(colors.entries(), legend_origin, self.estimator.as_ref()));

        Ok(primitives)
    }

    #[allow(clippy::too_many_arguments)]
    fn emit_grid(
        &self,
        axis: &TimeAxis,
        first: NaiveDate,
        last: NaiveDate,
        chart_top: f64,
        chart_bottom: f64,
        chart_left: f64,
        chart_right: f64,
        primitives: &mut Vec<RenderPrimitive>,
    ) {
        let label_days = axis.day_width() >= MIN_LABELED_DAY_WIDTH;

        for tick in axis.ticks(first, last) {
            let (stroke, stroke_width) = match tick.kind {
                TickKind::Day => (GRID_COLOR, 0.5),
                TickKind::WeekStart => (EMPHASIS_COLOR, 0.75),
                TickKind::MonthStart => (EMPHASIS_COLOR, 2.5),
            };
            primitives.push(RenderPrimitive::Polyline {
                points: vec![
                    Point::new(tick.x, chart_top),
                    Point::new(tick.x, chart_bottom),
                ],
                stroke: stroke.into(),
                stroke_width,
            });

            // Weekday labels under the chart; emphasis-only when days are
            // too narrow for one label each.
            if label_days || tick.kind != TickKind::Day {
                primitives.push(RenderPrimitive::Text {
                    anchor: Point::new(tick.x + axis.day_width() / 2.0, chart_bottom + 14.0),
                    content: tick.label.clone(),
                    align: TextAlign::Middle,
                });
            }

            if let Some(month) = tick.month_label {
                primitives.push(RenderPrimitive::Text {
                    anchor: Point::new(tick.x + 2.0, chart_top - 8.0),
                    content: month,
                    align: TextAlign::Start,
                });
            }
        }

        // Horizontal separators, one per row boundary.
        let row_count = ((chart_bottom - chart_top) / self.config.row_height).round() as usize;
        for i in 0..=row_count {
            let y = chart_top + i as f64 * self.config.row_height;
            primitives.push(RenderPrimitive::Polyline {
                points: vec![Point::new(chart_left, y), Point::new(chart_right, y)],
                stroke: GRID_COLOR.into(),
                stroke_width: 0.5,
            });
        }
    }
}

/// Latest date appearing anywhere in the records
fn latest_date(records: &[TaskRecord]) -> Option<NaiveDate> {
    records
        .iter()
        .flat_map(|r| {
            [
                r.planned_start,
                r.planned_end,
                r.actual_start,
                r.actual_end,
            ]
        })
        .flatten()
        .max()
}
