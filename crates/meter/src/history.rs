/// Fixed-capacity ring buffer of fuel used per turn.
#[derive(Debug, Clone)]
pub struct UsageHistory {
    history: Vec<u32>,
    capacity: usize,
    index: usize,
    filled: bool,
}

impl UsageHistory {
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "usage history needs a non-zero capacity");
        Self {
            history: vec![0; capacity],
            capacity,
            index: 0,
            filled: false,
        }
    }

    pub fn record(&mut self, used: u32) {
        self.history[self.index] = used;
        self.index = (self.index + 1) % self.capacity;
        if self.index == 0 {
            self.filled = true;
        }
    }

    fn recorded(&self) -> &[u32] {
        let count = if self.filled { self.capacity } else { self.index };
        &self.history[..count]
    }

    pub fn count(&self) -> usize {
        self.recorded().len()
    }

    pub fn average(&self) -> f64 {
        let recorded = self.recorded();
        if recorded.is_empty() {
            return 0.0;
        }
        let total: u64 = recorded.iter().map(|u| *u as u64).sum();
        total as f64 / recorded.len() as f64
    }

    pub fn max(&self) -> u32 {
        self.recorded().iter().copied().max().unwrap_or(0)
    }

    pub fn min(&self) -> u32 {
        self.recorded().iter().copied().min().unwrap_or(0)
    }
}
