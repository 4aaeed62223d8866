//! # ganttplot-core
//!
//! Core domain model and traits for the ganttplot chart engine.
//!
//! This crate provides:
//! - Task records (one validated row of schedule data)
//! - Render primitives (the flat drawable list handed to backends)
//! - Chart configuration and its validation rules
//! - The `Backend` trait implemented by drawing surfaces
//! - The `WidthEstimator` capability injected for legend sizing
//!
//! The layout engine itself lives in `ganttplot-layout`; backends that paint
//! primitives live in `ganttplot-render`. Nothing in this crate performs I/O.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ganttplot_core::TaskRecord;
//!
//! let task = TaskRecord::new("1.0")
//!     .description("Site survey")
//!     .planned(
//!         NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 5).unwrap(),
//!     )
//!     .predecessor("0.9");
//!
//! assert!(task.planned_range().is_some());
//! assert!(task.actual_range().is_none());
//! ```

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================================
// Type Aliases
// ============================================================================

/// Unique identifier for a task
pub type TaskId = String;

/// A color value as understood by backends (CSS hex notation)
pub type Color = String;

/// Fallback palette used when the caller supplies none.
///
/// Eight qualitative colors; the assigner cycles when a chart has more
/// distinct keys than the palette has entries.
pub const DEFAULT_PALETTE: [&str; 8] = [
    "#003f5c", "#2f4b7c", "#665191", "#a05195", "#d45087", "#f95d6a", "#ff7c43", "#ffa600",
];

/// The fallback palette as an owned list, ready for `ChartConfig`.
pub fn default_palette() -> Vec<Color> {
    DEFAULT_PALETTE.iter().map(|c| (*c).to_string()).collect()
}

// ============================================================================
// Geometry
// ============================================================================

/// A point in chart space (pixels, y grows downward)
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle in chart space
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }

    /// Smallest rectangle covering both `self` and `other`
    pub fn union(&self, other: &Rect) -> Rect {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(x, y, right - x, bottom - y)
    }
}

// ============================================================================
// Task Record
// ============================================================================

/// One validated row of schedule data.
///
/// Planned and actual dates are individually optional: a task that has not
/// started yet carries no actual dates, and a task that is still being
/// estimated may carry no planned dates. The loader owns cross-field
/// validation (date ordering, predecessor resolution); the layout engine
/// treats a violated invariant as a fatal precondition failure.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    /// Unique, non-empty identifier
    pub id: TaskId,
    /// Free-text description, may be empty
    #[serde(default)]
    pub description: String,
    /// Planned start date
    pub planned_start: Option<NaiveDate>,
    /// Planned end date (inclusive)
    pub planned_end: Option<NaiveDate>,
    /// Actual start date
    pub actual_start: Option<NaiveDate>,
    /// Actual end date (inclusive)
    pub actual_end: Option<NaiveDate>,
    /// Ids of predecessor tasks in the same schedule
    #[serde(default)]
    pub predecessors: Vec<TaskId>,
}

impl TaskRecord {
    pub fn new(id: impl Into<TaskId>) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            planned_start: None,
            planned_end: None,
            actual_start: None,
            actual_end: None,
            predecessors: Vec::new(),
        }
    }

    /// Set the description (builder pattern)
    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = text.into();
        self
    }

    /// Set both planned dates (builder pattern)
    pub fn planned(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.planned_start = Some(start);
        self.planned_end = Some(end);
        self
    }

    /// Set both actual dates (builder pattern)
    pub fn actual(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.actual_start = Some(start);
        self.actual_end = Some(end);
        self
    }

    /// Add a predecessor id (builder pattern)
    pub fn predecessor(mut self, id: impl Into<TaskId>) -> Self {
        self.predecessors.push(id.into());
        self
    }

    /// The planned range, if both endpoints are present
    pub fn planned_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.planned_start, self.planned_end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    /// The actual range, if both endpoints are present
    pub fn actual_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        match (self.actual_start, self.actual_end) {
            (Some(s), Some(e)) => Some((s, e)),
            _ => None,
        }
    }

    /// Check the record's local invariants.
    ///
    /// Used by the layout engine as a precondition: records reaching it must
    /// already have passed loader validation, so a violation here is fatal.
    pub fn check_invariants(&self) -> Result<(), LayoutError> {
        if self.id.is_empty() {
            return Err(LayoutError::DataIntegrity {
                task: self.id.clone(),
                message: "task id must not be empty".into(),
            });
        }
        if let Some((start, end)) = self.planned_range() {
            if end < start {
                return Err(LayoutError::DataIntegrity {
                    task: self.id.clone(),
                    message: format!("planned end {end} precedes planned start {start}"),
                });
            }
        }
        if let Some((start, end)) = self.actual_range() {
            if end < start {
                return Err(LayoutError::DataIntegrity {
                    task: self.id.clone(),
                    message: format!("actual end {end} precedes actual start {start}"),
                });
            }
        }
        Ok(())
    }
}

// ============================================================================
// Render Primitives
// ============================================================================

/// Horizontal alignment of a text primitive relative to its anchor
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    #[default]
    Start,
    Middle,
    End,
}

/// One atomic drawable instruction.
///
/// Produced only by the layout engine, consumed only by drawing backends.
/// Primitives carry no task identifiers or dates: the backend needs no
/// knowledge of the schedule that produced them.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum RenderPrimitive {
    /// Filled rectangle
    Rect { bounds: Rect, fill: Color },
    /// Stroked open polyline
    Polyline {
        points: Vec<Point>,
        stroke: Color,
        stroke_width: f64,
    },
    /// Text anchored at a point
    Text {
        anchor: Point,
        content: String,
        align: TextAlign,
    },
}

impl RenderPrimitive {
    /// Extent of this primitive, for document sizing.
    ///
    /// Text extent is the zero-sized anchor point: glyph metrics belong to
    /// the backend.
    pub fn extent(&self) -> Rect {
        match self {
            RenderPrimitive::Rect { bounds, .. } => *bounds,
            RenderPrimitive::Polyline { points, .. } => {
                let mut rect: Option<Rect> = None;
                for p in points {
                    let r = Rect::new(p.x, p.y, 0.0, 0.0);
                    rect = Some(match rect {
                        Some(acc) => acc.union(&r),
                        None => r,
                    });
                }
                rect.unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0))
            }
            RenderPrimitive::Text { anchor, .. } => Rect::new(anchor.x, anchor.y, 0.0, 0.0),
        }
    }
}

/// Smallest rectangle covering every primitive in the list
pub fn bounding_box(primitives: &[RenderPrimitive]) -> Option<Rect> {
    primitives
        .iter()
        .map(RenderPrimitive::extent)
        .reduce(|acc, r| acc.union(&r))
}

// ============================================================================
// Configuration
// ============================================================================

/// Vertical ordering of task rows
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RowOrder {
    /// Rows appear in input order (the order the loader produced)
    #[default]
    Input,
    /// Predecessors are placed above their successors; ties keep input order
    Topological,
}

/// Configuration surface consumed by the figure assembler.
///
/// Plain data, cloneable, serializable. The width estimator used for legend
/// wrapping is injected separately on the `Figure` because it is a
/// capability, not data.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Date mapped to the left edge of the chart area
    pub project_start: NaiveDate,
    /// Horizontal scale; must be positive
    pub pixels_per_day: f64,
    /// Height of one task row; must be positive
    pub row_height: f64,
    /// Space above the first row (chart frame, title, axis labels)
    pub top_margin: f64,
    /// Space left of day zero (row labels)
    pub left_margin: f64,
    /// Ordered color palette; must not be empty
    pub palette: Vec<Color>,
    /// Maximum accumulated width of one legend row; must be positive
    pub legend_max_width: f64,
    /// Fraction of the row height taken by the planned bar, in (0, 1)
    pub planned_band_fraction: f64,
    /// Fraction of the row height taken by the actual bar, in (0, 1)
    pub actual_band_fraction: f64,
    /// Vertical ordering of rows
    #[serde(default)]
    pub row_order: RowOrder,
    /// Optional chart title, centered above the chart area
    #[serde(default)]
    pub title: Option<String>,
    /// Emit day gridlines and week/month emphasis lines
    #[serde(default = "default_true")]
    pub show_grid: bool,
    /// Emit per-row "id: description" labels in the left margin
    #[serde(default = "default_true")]
    pub show_row_labels: bool,
}

fn default_true() -> bool {
    true
}

impl ChartConfig {
    /// Configuration with defaults for everything but the project start
    pub fn new(project_start: NaiveDate) -> Self {
        Self {
            project_start,
            pixels_per_day: 20.0,
            row_height: 28.0,
            top_margin: 60.0,
            left_margin: 160.0,
            palette: default_palette(),
            legend_max_width: 600.0,
            planned_band_fraction: 0.4,
            actual_band_fraction: 0.4,
            row_order: RowOrder::Input,
            title: None,
            show_grid: true,
            show_row_labels: true,
        }
    }

    /// Set the chart title (builder pattern)
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the horizontal scale (builder pattern)
    pub fn pixels_per_day(mut self, px: f64) -> Self {
        self.pixels_per_day = px;
        self
    }

    /// Set the row height (builder pattern)
    pub fn row_height(mut self, px: f64) -> Self {
        self.row_height = px;
        self
    }

    /// Use topological row ordering (builder pattern)
    pub fn topological_rows(mut self) -> Self {
        self.row_order = RowOrder::Topological;
        self
    }

    /// Validate every field, before any layout work begins.
    ///
    /// All violations are `LayoutError::InvalidConfiguration`; the first one
    /// found is returned.
    pub fn validate(&self) -> Result<(), LayoutError> {
        if !(self.pixels_per_day > 0.0) {
            return Err(LayoutError::InvalidConfiguration(format!(
                "pixels_per_day must be positive, got {}",
                self.pixels_per_day
            )));
        }
        if !(self.row_height > 0.0) {
            return Err(LayoutError::InvalidConfiguration(format!(
                "row_height must be positive, got {}",
                self.row_height
            )));
        }
        if !(self.top_margin >= 0.0) {
            return Err(LayoutError::InvalidConfiguration(format!(
                "top_margin must be non-negative, got {}",
                self.top_margin
            )));
        }
        if !(self.left_margin >= 0.0) {
            return Err(LayoutError::InvalidConfiguration(format!(
                "left_margin must be non-negative, got {}",
                self.left_margin
            )));
        }
        if self.palette.is_empty() {
            return Err(LayoutError::InvalidConfiguration(
                "palette must contain at least one color".into(),
            ));
        }
        if !(self.legend_max_width > 0.0) {
            return Err(LayoutError::InvalidConfiguration(format!(
                "legend_max_width must be positive, got {}",
                self.legend_max_width
            )));
        }
        for (name, value) in [
            ("planned_band_fraction", self.planned_band_fraction),
            ("actual_band_fraction", self.actual_band_fraction),
        ] {
            if !(value > 0.0 && value < 1.0) {
                return Err(LayoutError::InvalidConfiguration(format!(
                    "{name} must lie in (0, 1), got {value}"
                )));
            }
        }
        let band_sum = self.planned_band_fraction + self.actual_band_fraction;
        if band_sum > 1.0 {
            return Err(LayoutError::InvalidConfiguration(format!(
                "band fractions must sum to at most 1.0, got {band_sum}"
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Capabilities
// ============================================================================

/// Text width estimation, injected by the caller.
///
/// Exact metrics require a font engine, which belongs to the drawing
/// backend; the layout engine only ever asks "roughly how wide is this
/// label" when wrapping the legend.
pub trait WidthEstimator {
    fn width_of(&self, text: &str) -> f64;
}

impl<F> WidthEstimator for F
where
    F: Fn(&str) -> f64,
{
    fn width_of(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Character-count estimator: `chars * px_per_char`.
///
/// The default 7 px per character approximates a 12 px sans-serif face.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AvgCharWidth {
    pub px_per_char: f64,
}

impl Default for AvgCharWidth {
    fn default() -> Self {
        Self { px_per_char: 7.0 }
    }
}

impl WidthEstimator for AvgCharWidth {
    fn width_of(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.px_per_char
    }
}

/// A drawing surface consuming render primitives.
///
/// Backends rasterize or serialize the primitive list and know nothing about
/// tasks, dates, or dependencies.
pub trait Backend {
    type Output;

    /// Paint an ordered primitive list into the backend's output format
    fn paint(&self, primitives: &[RenderPrimitive]) -> Result<Self::Output, BackendError>;
}

// ============================================================================
// Errors
// ============================================================================

/// Layout error
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Invalid margins, fractions, scale or palette; raised before any
    /// layout work begins
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Dangling predecessor reference, inverted date range, dependency
    /// cycle; fatal, no partial output
    #[error("data integrity violation for task '{task}': {message}")]
    DataIntegrity { task: TaskId, message: String },
}

/// Backend error
#[derive(Debug, Error)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("format error: {0}")]
    Format(String),
}

// ============================================================================
// Tests
// ============================================================================
