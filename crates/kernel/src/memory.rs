use arbor_common::Team;
use serde::{Deserialize, Serialize};

fn slot(team: Team) -> Option<usize> {
    match team {
        Team::A => Some(0),
        Team::B => Some(1),
        Team::Neutral => None,
    }
}

/// Fixed-length `i64` arrays that survive from one match to the next.
///
/// `previous` is what the team saved in the prior match; `current` is what it
/// is saving now. Neutral has no memory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamMemoryBank {
    previous: [Vec<i64>; 2],
    current: [Vec<i64>; 2],
}

impl TeamMemoryBank {
    pub fn new(length: usize) -> Self {
        Self {
            previous: [vec![0; length], vec![0; length]],
            current: [vec![0; length], vec![0; length]],
        }
    }

    /// Start a match with memory carried over from the last one. Arrays are
    /// resized to `length`, padding with zeros.
    pub fn with_previous(length: usize, a: Vec<i64>, b: Vec<i64>) -> Self {
        let fit = |mut v: Vec<i64>| {
            v.resize(length, 0);
            v
        };
        Self {
            previous: [fit(a), fit(b)],
            current: [vec![0; length], vec![0; length]],
        }
    }

    pub fn len(&self) -> usize {
        self.current[0].len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn previous(&self, team: Team) -> &[i64] {
        match slot(team) {
            Some(i) => &self.previous[i],
            None => &[],
        }
    }

    pub fn current(&self, team: Team) -> &[i64] {
        match slot(team) {
            Some(i) => &self.current[i],
            None => &[],
        }
    }

    /// # Panics
    ///
    /// Panics if `index` is outside the memory length.
    pub fn set(&mut self, team: Team, index: usize, value: i64) {
        if let Some(i) = slot(team) {
            self.current[i][index] = value;
        }
    }

    /// Overwrite only the bits selected by `mask`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is outside the memory length.
    pub fn set_masked(&mut self, team: Team, index: usize, value: i64, mask: i64) {
        if let Some(i) = slot(team) {
            let cell = &mut self.current[i][index];
            *cell = (*cell & !mask) | (value & mask);
        }
    }
}
