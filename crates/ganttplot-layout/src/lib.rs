//! # ganttplot-layout
//!
//! The layout engine: maps abstract schedule data onto concrete 2D geometry.
//!
//! This crate provides:
//! - Time axis mapping (calendar dates to horizontal pixel offsets)
//! - Deterministic palette-cycling color assignment
//! - Row layout (task ordering to vertical pixel slots)
//! - Bar geometry (planned/actual rectangles per row)
//! - Dependency arrow routing (elbow paths, overlap and same-row fallbacks)
//! - Legend layout with injected text-width estimation
//! - The figure assembler tying it all together
//!
//! The entire pass is a pure computation: no I/O, no shared state across
//! calls, and byte-identical output for identical input and configuration.
//!
//! ## Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use ganttplot_core::{ChartConfig, TaskRecord};
//! use ganttplot_layout::Figure;
//!
//! let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
//! let tasks = vec![
//!     TaskRecord::new("a").planned(start, NaiveDate::from_ymd_opt(2024, 1, 5).unwrap()),
//!     TaskRecord::new("b")
//!         .planned(
//!             NaiveDate::from_ymd_opt(2024, 1, 3).unwrap(),
//!             NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
//!         )
//!         .predecessor("a"),
//! ];
//!
//! let figure = Figure::new(ChartConfig::new(start)).unwrap();
//! let primitives = figure.draw(&tasks).unwrap();
//! assert!(!primitives.is_empty());
//! ```

pub mod arrows;
pub mod axis;
pub mod bars;
pub mod color;
pub mod figure;
pub mod legend;
pub mod rows;

pub use arrows::ArrowRouter;
pub use axis::{AxisTick, TickKind, TimeAxis};
pub use bars::{LayoutFrame, TaskBars};
pub use color::ColorAssigner;
pub use figure::Figure;
pub use legend::LegendBuilder;
pub use rows::RowLayout;
