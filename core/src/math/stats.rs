use serde::{Deserialize, Serialize};

/// Running count/min/max/mean of a parameter over a window of samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Extent {
    pub count: usize,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub sum: f64,
}

impl Extent {
    pub fn push(&mut self, value: f64) {
        self.count += 1;
        self.sum += value;
        self.min = Some(self.min.map_or(value, |m| m.min(value)));
        self.max = Some(self.max.map_or(value, |m| m.max(value)));
    }

    pub fn mean(&self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum / self.count as f64)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}

impl FromIterator<f64> for Extent {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        let mut extent = Extent::default();
        for value in iter {
            extent.push(value);
        }
        extent
    }
}

/// Fixed-length trailing window used for the rolling AGL mean.
#[derive(Debug, Clone)]
pub struct RollingMean {
    values: std::collections::VecDeque<f64>,
    capacity: usize,
}

impl RollingMean {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            values: std::collections::VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, value: f64) {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(value);
    }

    /// Mean of the window once it is full.
    pub fn mean(&self) -> Option<f64> {
        if self.values.len() < self.capacity {
            return None;
        }
        Some(self.values.iter().sum::<f64>() / self.capacity as f64)
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}
