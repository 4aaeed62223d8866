//! Bar geometry: planned and actual rectangles per task row.

use std::collections::HashMap;

use chrono::NaiveDate;
use ganttplot_core::{ChartConfig, LayoutError, Rect, TaskId, TaskRecord};
use tracing::debug;

use crate::axis::TimeAxis;
use crate::rows::RowLayout;

/// Bars never collapse below this width, no matter how small the scale.
const MIN_BAR_PX: f64 = 4.0;

/// Resolved geometry of one task
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TaskBars {
    pub row: usize,
    /// Upper sub-band rectangle; absent when either planned date is missing
    pub planned: Option<Rect>,
    /// Lower sub-band rectangle; absent when either actual date is missing
    pub actual: Option<Rect>,
}

/// The transient per-pass mapping from task id to row index and bar bounds.
///
/// Built fresh on every `draw` call and discarded with the pass; nothing is
/// cached across calls.
#[derive(Clone, Debug, Default)]
pub struct LayoutFrame {
    bars: HashMap<TaskId, TaskBars>,
}

impl LayoutFrame {
    pub fn get(&self, id: &str) -> Option<&TaskBars> {
        self.bars.get(id)
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }
}

/// Build the layout frame for a record sequence.
///
/// Fails fast on violated record invariants: records reaching the layout
/// engine must already have passed loader validation.
pub fn build_frame(
    records: &[TaskRecord],
    rows: &RowLayout,
    axis: &TimeAxis,
    config: &ChartConfig,
) -> Result<LayoutFrame, LayoutError> {
    let row_height = config.row_height;
    // Leftover row space is split into three equal gaps: above the planned
    // bar, between the bands, and below the actual bar.
    let gap = row_height * (1.0 - config.planned_band_fraction - config.actual_band_fraction) / 3.0;
    let planned_height = row_height * config.planned_band_fraction;
    let actual_height = row_height * config.actual_band_fraction;

    let mut frame = LayoutFrame::default();
    for record in records {
        record.check_invariants()?;
        let row = rows
            .index_of(&record.id)
            .expect("row layout covers every record");
        let row_top = rows.top(row);

        let planned = record
            .planned_range()
            .map(|(start, end)| span_rect(axis, start, end, row_top + gap, planned_height));
        let actual = record.actual_range().map(|(start, end)| {
            span_rect(
                axis,
                start,
                end,
                row_top + gap + planned_height + gap,
                actual_height,
            )
        });

        if planned.is_none() {
            debug!(task = %record.id, "no planned range, emitting no planned bar");
        }

        frame.bars.insert(
            record.id.clone(),
            TaskBars {
                row,
                planned,
                actual,
            },
        );
    }
    Ok(frame)
}

/// Rectangle spanning `[x(start), x(end)]`.
///
/// A start == end range gets a one-day-equivalent marker floored at
/// `MIN_BAR_PX`, never a zero-width rectangle.
fn span_rect(axis: &TimeAxis, start: NaiveDate, end: NaiveDate, y: f64, height: f64) -> Rect {
    let x = axis.x(start);
    let mut width = axis.x(end) - x;
    if width <= 0.0 {
        width = axis.day_width().max(MIN_BAR_PX);
    }
    Rect::new(x, y, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ganttplot_core::RowOrder;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn setup(records: &[TaskRecord]) -> (RowLayout, TimeAxis, ChartConfig) {
        let mut config = ChartConfig::new(date(2024, 1, 1));
        config.pixels_per_day = 10.0;
        config.row_height = 20.0;
        config.top_margin = 0.0;
        config.left_margin = 0.0;
        config.planned_band_fraction = 0.4;
        config.actual_band_fraction = 0.4;
        config.row_order = RowOrder::Input;
        let rows = RowLayout::build(records, &config).unwrap();
        let axis = TimeAxis::new(config.project_start, config.pixels_per_day, 0.0).unwrap();
        (rows, axis, config)
    }

    #[test]
    fn planned_bar_spans_mapped_dates() {
        let records = vec![TaskRecord::new("a").planned(date(2024, 1, 1), date(2024, 1, 5))];
        let (rows, axis, config) = setup(&records);
        let frame = build_frame(&records, &rows, &axis, &config).unwrap();
        let bars = frame.get("a").unwrap();
        let planned = bars.planned.unwrap();
        assert_eq!(planned.left(), 0.0);
        assert_eq!(planned.right(), 40.0);
        assert_eq!(planned.height, 8.0);
        assert!(bars.actual.is_none());
    }

    #[test]
    fn bands_stack_inside_the_row() {
        let records = vec![TaskRecord::new("a")
            .planned(date(2024, 1, 1), date(2024, 1, 5))
            .actual(date(2024, 1, 2), date(2024, 1, 6))];
        let (rows, axis, config) = setup(&records);
        let frame = build_frame(&records, &rows, &axis, &config).unwrap();
        let bars = frame.get("a").unwrap();
        let planned = bars.planned.unwrap();
        let actual = bars.actual.unwrap();
        // 20% leftover split into three gaps of 4/3 px each.
        assert!((planned.top() - 4.0 / 3.0).abs() < 1e-9);
        assert!(actual.top() > planned.bottom());
        assert!(actual.bottom() <= 20.0 + 1e-9);
    }

    #[test]
    fn zero_length_range_gets_minimum_width_marker() {
        let records = vec![TaskRecord::new("m").planned(date(2024, 1, 3), date(2024, 1, 3))];
        let (rows, axis, config) = setup(&records);
        let frame = build_frame(&records, &rows, &axis, &config).unwrap();
        let planned = frame.get("m").unwrap().planned.unwrap();
        assert_eq!(planned.width, 10.0); // one day-equivalent at 10 px/day
    }

    #[test]
    fn tiny_scale_still_yields_visible_marker() {
        let axis = TimeAxis::new(date(2024, 1, 1), 0.5, 0.0).unwrap();
        let rect = span_rect(&axis, date(2024, 1, 2), date(2024, 1, 2), 0.0, 8.0);
        assert_eq!(rect.width, MIN_BAR_PX);
    }

    #[test]
    fn single_actual_date_emits_no_actual_bar() {
        let mut record = TaskRecord::new("a").planned(date(2024, 1, 1), date(2024, 1, 2));
        record.actual_start = Some(date(2024, 1, 1));
        let records = vec![record];
        let (rows, axis, config) = setup(&records);
        let frame = build_frame(&records, &rows, &axis, &config).unwrap();
        assert!(frame.get("a").unwrap().actual.is_none());
    }

    #[test]
    fn invalid_record_fails_fast() {
        let records = vec![TaskRecord::new("a").planned(date(2024, 1, 5), date(2024, 1, 1))];
        let (rows, axis, config) = setup(&records);
        let err = build_frame(&records, &rows, &axis, &config).unwrap_err();
        assert!(matches!(err, LayoutError::DataIntegrity { .. }));
    }
}
