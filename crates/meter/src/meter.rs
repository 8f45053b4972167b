use crate::history::UsageHistory;

/// Turns of usage kept for instrumentation.
const HISTORY_CAPACITY: usize = 64;

/// Fuel counter and ceiling for the robot whose turn is in progress.
///
/// Owned by the driver and lent to each turn's gateway, so there is no shared
/// process-wide counter.
#[derive(Debug, Clone)]
pub struct ExecutionMeter {
    used: u32,
    limit: u32,
    history: UsageHistory,
}

impl Default for ExecutionMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionMeter {
    pub fn new() -> Self {
        Self {
            used: 0,
            limit: 0,
            history: UsageHistory::new(HISTORY_CAPACITY),
        }
    }

    /// Reset the counter and install the acting robot's ceiling.
    pub fn begin_turn(&mut self, limit: u32) {
        self.used = 0;
        self.limit = limit;
    }

    /// Add `units` to the counter. Returns the new total.
    pub fn charge(&mut self, units: u32) -> u32 {
        self.used = self.used.saturating_add(units);
        tracing::trace!(units, used = self.used, limit = self.limit, "fuel charged");
        self.used
    }

    /// Debit the fault penalty after agent code raised an unhandled error.
    pub fn penalize_fault(&mut self, penalty: u32) {
        self.used = self.used.saturating_add(penalty);
        tracing::debug!(penalty, used = self.used, "fault penalty applied");
    }

    /// Close the turn, recording its usage. Returns fuel used.
    pub fn end_turn(&mut self) -> u32 {
        self.history.record(self.used);
        self.used
    }

    pub fn used(&self) -> u32 {
        self.used
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Fuel left before the ceiling. Zero once exhausted.
    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.used)
    }

    pub fn is_exhausted(&self) -> bool {
        self.used >= self.limit
    }

    /// Fuel used past the ceiling.
    pub fn overrun(&self) -> u32 {
        self.used.saturating_sub(self.limit)
    }

    pub fn history(&self) -> &UsageHistory {
        &self.history
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_turn_resets_counter() {
        let mut m = ExecutionMeter::new();
        m.begin_turn(100);
        m.charge(40);
        assert_eq!(m.used(), 40);
        assert_eq!(m.remaining(), 60);
        m.begin_turn(20_000);
        assert_eq!(m.used(), 0);
        assert_eq!(m.limit(), 20_000);
    }

    #[test]
    fn charging_past_the_ceiling_is_counted_not_refused() {
        let mut m = ExecutionMeter::new();
        m.begin_turn(10);
        m.charge(8);
        assert!(!m.is_exhausted());
        m.charge(5);
        assert!(m.is_exhausted());
        assert_eq!(m.remaining(), 0);
        assert_eq!(m.overrun(), 3);
    }

    #[test]
    fn fault_penalty_is_an_extra_debit() {
        let mut m = ExecutionMeter::new();
        m.begin_turn(10_000);
        m.charge(100);
        m.penalize_fault(500);
        assert_eq!(m.used(), 600);
    }

    #[test]
    fn end_turn_feeds_history() {
        let mut m = ExecutionMeter::new();
        for used in [10, 30] {
            m.begin_turn(1000);
            m.charge(used);
            m.end_turn();
        }
        assert_eq!(m.history().count(), 2);
        assert_eq!(m.history().average(), 20.0);
    }
}
