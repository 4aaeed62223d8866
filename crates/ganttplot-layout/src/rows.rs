//! Row layout: task ordering to vertical pixel slots.

use std::collections::HashMap;

use ganttplot_core::{ChartConfig, LayoutError, RowOrder, TaskId, TaskRecord};

/// Assigns each task a 0-based, contiguous row index.
///
/// Default order is input order, exactly as loaded. `RowOrder::Topological`
/// places predecessors above successors (Kahn traversal, ties broken by
/// input position), so re-running with the same input always yields the same
/// indices.
#[derive(Clone, Debug)]
pub struct RowLayout {
    row_height: f64,
    top_margin: f64,
    order: Vec<TaskId>,
    index: HashMap<TaskId, usize>,
}

impl RowLayout {
    pub fn build(records: &[TaskRecord], config: &ChartConfig) -> Result<Self, LayoutError> {
        let mut input_pos: HashMap<&str, usize> = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if input_pos.insert(record.id.as_str(), i).is_some() {
                return Err(LayoutError::DataIntegrity {
                    task: record.id.clone(),
                    message: "duplicate task id".into(),
                });
            }
        }

        let order = match config.row_order {
            RowOrder::Input => records.iter().map(|r| r.id.clone()).collect(),
            RowOrder::Topological => topological_order(records, &input_pos)?,
        };

        let index = order
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        Ok(Self {
            row_height: config.row_height,
            top_margin: config.top_margin,
            order,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Row index of a task id
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Task ids in row order
    pub fn ordered_ids(&self) -> &[TaskId] {
        &self.order
    }

    /// Pixel top of a row: `top_margin + index * row_height`
    pub fn top(&self, row: usize) -> f64 {
        self.top_margin + row as f64 * self.row_height
    }

    pub fn bottom(&self, row: usize) -> f64 {
        self.top(row) + self.row_height
    }

    pub fn center_y(&self, row: usize) -> f64 {
        self.top(row) + self.row_height / 2.0
    }

    pub fn row_height(&self) -> f64 {
        self.row_height
    }
}

/// Kahn's algorithm over predecessor edges.
///
/// The ready set is drained in input order, so the result is a deterministic
/// function of the input sequence. A dangling predecessor or a cycle is a
/// fatal data error.
fn topological_order(
    records: &[TaskRecord],
    input_pos: &HashMap<&str, usize>,
) -> Result<Vec<TaskId>, LayoutError> {
    let n = records.len();
    let mut in_degree = vec![0usize; n];
    let mut successors: Vec<Vec<usize>> = vec![Vec::new(); n];

    for (i, record) in records.iter().enumerate() {
        for pred in &record.predecessors {
            let &p = input_pos
                .get(pred.as_str())
                .ok_or_else(|| LayoutError::DataIntegrity {
                    task: record.id.clone(),
                    message: format!("predecessor '{pred}' is not defined in the schedule"),
                })?;
            successors[p].push(i);
            in_degree[i] += 1;
        }
    }

    // Ready tasks sorted by input position. The vector stays small and is
    // scanned for the minimum, which keeps ordering stable without a heap.
    let mut ready: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);

    while !ready.is_empty() {
        let (slot, &next) = ready
            .iter()
            .enumerate()
            .min_by_key(|(_, &i)| i)
            .expect("ready set is non-empty");
        ready.swap_remove(slot);
        order.push(records[next].id.clone());
        for &succ in &successors[next] {
            in_degree[succ] -= 1;
            if in_degree[succ] == 0 {
                ready.push(succ);
            }
        }
    }

    if order.len() != n {
        let stuck = records
            .iter()
            .enumerate()
            .find(|(i, _)| in_degree[*i] > 0)
            .map(|(_, r)| r.id.clone())
            .unwrap_or_default();
        return Err(LayoutError::DataIntegrity {
            task: stuck,
            message: "dependency cycle detected".into(),
        });
    }

    Ok(order)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn config(order: RowOrder) -> ChartConfig {
        let mut config = ChartConfig::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        config.row_order = order;
        config.row_height = 20.0;
        config.top_margin = 50.0;
        config
    }

    #[test]
    fn input_order_is_preserved() {
        let records = vec![
            TaskRecord::new("c"),
            TaskRecord::new("a"),
            TaskRecord::new("b"),
        ];
        let rows = RowLayout::build(&records, &config(RowOrder::Input)).unwrap();
        assert_eq!(rows.index_of("c"), Some(0));
        assert_eq!(rows.index_of("a"), Some(1));
        assert_eq!(rows.index_of("b"), Some(2));
    }

    #[test]
    fn indices_are_a_contiguous_permutation() {
        let records: Vec<_> = (0..7).map(|i| TaskRecord::new(format!("t{i}"))).collect();
        let rows = RowLayout::build(&records, &config(RowOrder::Input)).unwrap();
        let mut seen: Vec<usize> = records
            .iter()
            .map(|r| rows.index_of(&r.id).unwrap())
            .collect();
        seen.sort_unstable();
        assert_eq!(seen, (0..7).collect::<Vec<_>>());
    }

    #[test]
    fn row_pixels_follow_margin_and_height() {
        let records = vec![TaskRecord::new("a"), TaskRecord::new("b")];
        let rows = RowLayout::build(&records, &config(RowOrder::Input)).unwrap();
        assert_eq!(rows.top(0), 50.0);
        assert_eq!(rows.top(1), 70.0);
        assert_eq!(rows.center_y(1), 80.0);
        assert_eq!(rows.bottom(1), 90.0);
    }

    #[test]
    fn topological_puts_predecessors_first() {
        let records = vec![
            TaskRecord::new("late").predecessor("early"),
            TaskRecord::new("early"),
        ];
        let rows = RowLayout::build(&records, &config(RowOrder::Topological)).unwrap();
        assert!(rows.index_of("early").unwrap() < rows.index_of("late").unwrap());
    }

    #[test]
    fn topological_ties_keep_input_order() {
        let records = vec![
            TaskRecord::new("x"),
            TaskRecord::new("y"),
            TaskRecord::new("z"),
        ];
        let rows = RowLayout::build(&records, &config(RowOrder::Topological)).unwrap();
        assert_eq!(rows.ordered_ids(), &["x", "y", "z"]);
    }

    #[test]
    fn topological_cycle_is_fatal() {
        let records = vec![
            TaskRecord::new("a").predecessor("b"),
            TaskRecord::new("b").predecessor("a"),
        ];
        let err = RowLayout::build(&records, &config(RowOrder::Topological)).unwrap_err();
        assert!(matches!(err, LayoutError::DataIntegrity { .. }));
    }

    #[test]
    fn duplicate_id_is_fatal() {
        let records = vec![TaskRecord::new("a"), TaskRecord::new("a")];
        assert!(RowLayout::build(&records, &config(RowOrder::Input)).is_err());
    }
}
