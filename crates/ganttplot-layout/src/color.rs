//! Deterministic palette-cycling color assignment.

use std::collections::HashMap;

use ganttplot_core::{Color, LayoutError};

/// Maps categorical keys to palette colors in first-seen order.
///
/// Key *i* receives `palette[i % palette.len()]`; when there are more keys
/// than colors the palette cycles rather than failing, so rendering is never
/// blocked on palette size. Bars and legend share one assigner per pass,
/// which is what keeps their colors consistent.
#[derive(Clone, Debug)]
pub struct ColorAssigner {
    palette: Vec<Color>,
    entries: Vec<(String, Color)>,
    index: HashMap<String, usize>,
}

impl ColorAssigner {
    pub fn new(palette: Vec<Color>) -> Result<Self, LayoutError> {
        if palette.is_empty() {
            return Err(LayoutError::InvalidConfiguration(
                "palette must contain at least one color".into(),
            ));
        }
        Ok(Self {
            palette,
            entries: Vec::new(),
            index: HashMap::new(),
        })
    }

    /// Register keys in order; keys already seen keep their color.
    pub fn assign<'a>(&mut self, keys: impl IntoIterator<Item = &'a str>) {
        for key in keys {
            if self.index.contains_key(key) {
                continue;
            }
            let i = self.entries.len();
            let color = self.palette[i % self.palette.len()].clone();
            self.index.insert(key.to_string(), i);
            self.entries.push((key.to_string(), color));
        }
    }

    /// Color of a registered key
    pub fn color_of(&self, key: &str) -> Option<&Color> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    /// All (key, color) pairs in first-seen order
    pub fn entries(&self) -> &[(String, Color)] {
        &self.entries
    }
}
