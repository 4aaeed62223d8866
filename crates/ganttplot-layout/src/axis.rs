//! Time axis: calendar dates to horizontal pixel offsets.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use ganttplot_core::LayoutError;

/// Converts calendar dates into x offsets given a project start and a
/// pixels-per-day scale.
///
/// Dates before the origin map left of the margin; clipping is the caller's
/// decision.
#[derive(Clone, Copy, Debug)]
pub struct TimeAxis {
    origin: NaiveDate,
    px_per_day: f64,
    left_margin: f64,
}

/// Emphasis class of a calendar day on the axis
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickKind {
    /// Plain day boundary
    Day,
    /// Monday
    WeekStart,
    /// First of the month; takes precedence over `WeekStart`
    MonthStart,
}

/// One day boundary on the axis
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    pub date: NaiveDate,
    pub x: f64,
    pub kind: TickKind,
    /// Two-letter weekday label ("Mo", "Tu", ...)
    pub label: String,
    /// "%B %Y" label, present only on month starts
    pub month_label: Option<String>,
}

impl TimeAxis {
    pub fn new(origin: NaiveDate, px_per_day: f64, left_margin: f64) -> Result<Self, LayoutError> {
        if !(px_per_day > 0.0) {
            return Err(LayoutError::InvalidConfiguration(format!(
                "pixels_per_day must be positive, got {px_per_day}"
            )));
        }
        Ok(Self {
            origin,
            px_per_day,
            left_margin,
        })
    }

    /// Horizontal offset of a date: `left_margin + days-from-origin * scale`
    pub fn x(&self, date: NaiveDate) -> f64 {
        self.left_margin + (date - self.origin).num_days() as f64 * self.px_per_day
    }

    /// Width of one calendar day in pixels
    pub fn day_width(&self) -> f64 {
        self.px_per_day
    }

    pub fn origin(&self) -> NaiveDate {
        self.origin
    }

    /// One tick per day in `[first, last]`, in calendar order.
    ///
    /// Mondays are promoted to `WeekStart`, month firsts to `MonthStart`.
    pub fn ticks(&self, first: NaiveDate, last: NaiveDate) -> Vec<AxisTick> {
        let mut ticks = Vec::new();
        let mut current = first;
        while current <= last {
            let kind = if current.day() == 1 {
                TickKind::MonthStart
            } else if current.weekday() == Weekday::Mon {
                TickKind::WeekStart
            } else {
                TickKind::Day
            };
            let month_label = (current.day() == 1).then(|| current.format("%B %Y").to_string());
            ticks.push(AxisTick {
                date: current,
                x: self.x(current),
                kind,
                label: current.format("%a").to_string()[..2].to_string(),
                month_label,
            });
            current += Duration::days(1);
        }
        ticks
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn maps_days_linearly() {
        let axis = TimeAxis::new(date(2024, 1, 1), 10.0, 0.0).unwrap();
        assert_eq!(axis.x(date(2024, 1, 1)), 0.0);
        assert_eq!(axis.x(date(2024, 1, 5)), 40.0);
    }

    #[test]
    fn dates_before_origin_map_negative() {
        let axis = TimeAxis::new(date(2024, 1, 10), 10.0, 0.0).unwrap();
        assert_eq!(axis.x(date(2024, 1, 8)), -20.0);
    }

    #[test]
    fn left_margin_shifts_offsets() {
        let axis = TimeAxis::new(date(2024, 1, 1), 10.0, 100.0).unwrap();
        assert_eq!(axis.x(date(2024, 1, 1)), 100.0);
        assert_eq!(axis.x(date(2024, 1, 3)), 120.0);
    }

    #[test]
    fn rejects_non_positive_scale() {
        assert!(TimeAxis::new(date(2024, 1, 1), 0.0, 0.0).is_err());
        assert!(TimeAxis::new(date(2024, 1, 1), -1.0, 0.0).is_err());
        assert!(TimeAxis::new(date(2024, 1, 1), f64::NAN, 0.0).is_err());
    }

    #[test]
    fn one_tick_per_day_with_emphasis() {
        // 2024-01-29 is a Monday, 2024-02-01 a Thursday.
        let axis = TimeAxis::new(date(2024, 1, 28), 10.0, 0.0).unwrap();
        let ticks = axis.ticks(date(2024, 1, 28), date(2024, 2, 2));
        assert_eq!(ticks.len(), 6);
        assert_eq!(ticks[0].kind, TickKind::Day);
        assert_eq!(ticks[1].kind, TickKind::WeekStart);
        assert_eq!(ticks[4].kind, TickKind::MonthStart);
        assert_eq!(ticks[4].month_label.as_deref(), Some("February 2024"));
        assert_eq!(ticks[1].label, "Mo");
    }

    #[test]
    fn month_start_on_monday_promotes_to_month() {
        // 2024-07-01 is a Monday.
        let axis = TimeAxis::new(date(2024, 7, 1), 5.0, 0.0).unwrap();
        let ticks = axis.ticks(date(2024, 7, 1), date(2024, 7, 1));
        assert_eq!(ticks[0].kind, TickKind::MonthStart);
    }
}
