//! Legend layout: swatch and label pairs with width-constrained wrapping.

use ganttplot_core::{Color, Point, Rect, RenderPrimitive, TextAlign, WidthEstimator};

/// Lays out one swatch+label pair per (key, color) entry, left to right,
/// wrapping to a new legend row when the accumulated width would exceed the
/// configured maximum.
///
/// Label widths come from the injected estimator; the layout engine never
/// owns font metrics. Callers with access to real metrics pass them in,
/// everyone else gets the character-count approximation.
#[derive(Clone, Copy, Debug)]
pub struct LegendBuilder {
    max_width: f64,
    swatch_size: f64,
    swatch_gap: f64,
    item_spacing: f64,
    row_spacing: f64,
}

impl LegendBuilder {
    pub fn new(max_width: f64) -> Self {
        Self {
            max_width,
            swatch_size: 12.0,
            swatch_gap: 6.0,
            item_spacing: 18.0,
            row_spacing: 8.0,
        }
    }

    /// Height of one legend row including its vertical gap
    pub fn row_height(&self) -> f64 {
        self.swatch_size + self.row_spacing
    }

    /// Lay the legend out below-right of `origin`.
    ///
    /// Emits a filled swatch rectangle and a start-aligned label per entry,
    /// in entry order.
    pub fn build(
        &self,
        entries: &[(String, Color)],
        origin: Point,
        estimator: &dyn WidthEstimator,
    ) -> Vec<RenderPrimitive> {
        let mut primitives = Vec::with_capacity(entries.len() * 2);
        let mut cursor_x = 0.0;
        let mut row = 0usize;

        for (key, color) in entries {
            let item_width = self.swatch_size + self.swatch_gap + estimator.width_of(key);
            if cursor_x > 0.0 && cursor_x + item_width > self.max_width {
                cursor_x = 0.0;
                row += 1;
            }

            let x = origin.x + cursor_x;
            let y = origin.y + row as f64 * self.row_height();
            primitives.push(RenderPrimitive::Rect {
                bounds: Rect::new(x, y, self.swatch_size, self.swatch_size),
                fill: color.clone(),
            });
            primitives.push(RenderPrimitive::Text {
                anchor: Point::new(
                    x + self.swatch_size + self.swatch_gap,
                    y + self.swatch_size / 2.0,
                ),
                content: key.clone(),
                align: TextAlign::Start,
            });

            cursor_x += item_width + self.item_spacing;
        }
        primitives
    }
}
