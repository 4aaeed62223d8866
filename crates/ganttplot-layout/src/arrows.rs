//! Dependency arrow routing between predecessor and successor bars.

use std::collections::HashMap;

use ganttplot_core::{LayoutError, Point, TaskRecord};
use tracing::debug;

use crate::bars::LayoutFrame;
use crate::rows::RowLayout;

/// Routes one polyline per (predecessor, successor) edge, from the
/// predecessor's planned-bar right edge at its row center to the successor's
/// planned-bar left edge at its row center.
///
/// Degenerate inputs never produce degenerate output: a successor starting
/// at or before its predecessor's end gets an elbow through the inter-row
/// gap, and a shared row gets a loop dropped to the row boundary. Backward
/// or zero-length straight lines are structurally impossible.
#[derive(Clone, Copy, Debug)]
pub struct ArrowRouter {
    /// Horizontal clearance of the first and last elbow segments
    stub: f64,
    /// Below this gap between bar edges the overlap route is taken
    min_separation: f64,
}

impl Default for ArrowRouter {
    fn default() -> Self {
        Self {
            stub: 8.0,
            min_separation: 16.0,
        }
    }
}

impl ArrowRouter {
    pub fn new(stub: f64, min_separation: f64) -> Self {
        Self {
            stub,
            min_separation,
        }
    }

    /// Route every predecessor edge in the schedule.
    ///
    /// Edges are visited in successor row order, predecessors in record
    /// order, so the output sequence is deterministic. A predecessor id
    /// absent from the layout frame is fatal; an endpoint without a planned
    /// bar contributes no arrow (there is nothing to anchor to).
    pub fn route(
        &self,
        records: &[TaskRecord],
        frame: &LayoutFrame,
        rows: &RowLayout,
    ) -> Result<Vec<Vec<Point>>, LayoutError> {
        let by_id: HashMap<&str, &TaskRecord> =
            records.iter().map(|r| (r.id.as_str(), r)).collect();

        let mut paths = Vec::new();
        for id in rows.ordered_ids() {
            let record = by_id[id.as_str()];
            let succ = frame.get(id).expect("frame covers every record");
            for pred_id in &record.predecessors {
                let pred = frame.get(pred_id).ok_or_else(|| LayoutError::DataIntegrity {
                    task: record.id.clone(),
                    message: format!("predecessor '{pred_id}' is missing from the layout frame"),
                })?;

                let (Some(pred_bar), Some(succ_bar)) = (pred.planned, succ.planned) else {
                    debug!(
                        from = %pred_id,
                        to = %record.id,
                        "endpoint has no planned bar, skipping arrow"
                    );
                    continue;
                };

                let start = Point::new(pred_bar.right(), rows.center_y(pred.row));
                let end = Point::new(succ_bar.left(), rows.center_y(succ.row));
                paths.push(self.route_edge(start, end, pred.row, succ.row, rows));
            }
        }
        Ok(paths)
    }

    fn route_edge(
        &self,
        start: Point,
        end: Point,
        from_row: usize,
        to_row: usize,
        rows: &RowLayout,
    ) -> Vec<Point> {
        if from_row == to_row {
            // Loop through the row's bottom boundary.
            let loop_y = rows.bottom(from_row);
            return vec![
                start,
                Point::new(start.x + self.stub, start.y),
                Point::new(start.x + self.stub, loop_y),
                Point::new(end.x - self.stub, loop_y),
                Point::new(end.x - self.stub, end.y),
                end,
            ];
        }

        if end.x >= start.x + self.min_separation {
            // Forward elbow: out, down/up, in.
            let mid_x = start.x + self.stub;
            return vec![
                start,
                Point::new(mid_x, start.y),
                Point::new(mid_x, end.y),
                end,
            ];
        }

        // Scheduling overlap: the successor starts at or before the
        // predecessor's end. Travel along the row boundary nearest the
        // successor instead of drawing a backward line through the bars.
        let channel_y = if to_row > from_row {
            rows.top(to_row)
        } else {
            rows.bottom(to_row)
        };
        vec![
            start,
            Point::new(start.x + self.stub, start.y),
            Point::new(start.x + self.stub, channel_y),
            Point::new(end.x - self.stub, channel_y),
            Point::new(end.x - self.stub, end.y),
            end,
        ]
    }
}
