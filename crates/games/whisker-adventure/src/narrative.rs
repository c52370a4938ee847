use serde::{Deserialize, Serialize};

/// Ordered dialogue thresholds along the x axis with a cursor to the next one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeTrack {
    thresholds: Vec<f32>,
    cursor: usize,
}

impl NarrativeTrack {
    pub fn new(thresholds: Vec<f32>) -> Self {
        Self {
            thresholds,
            cursor: 0,
        }
    }

    /// Fire at most one threshold per call: the next one, if `x` is past it.
    /// Returns the fired threshold's index.
    pub fn check(&mut self, x: f32) -> Option<usize> {
        let next = *self.thresholds.get(self.cursor)?;
        if x > next {
            self.cursor += 1;
            Some(self.cursor - 1)
        } else {
            None
        }
    }

    pub fn threshold(&self, index: usize) -> Option<f32> {
        self.thresholds.get(index).copied()
    }

    pub fn fired(&self) -> usize {
        self.cursor
    }

    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.thresholds.len()
    }

    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}
