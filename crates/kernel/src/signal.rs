//! Team broadcast channels.
//!
//! Writes land in a pending buffer and become readable only when the round
//! is committed, so every robot of a team reads the same values during a round.

use arbor_common::{MapLocation, RobotId, Team};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

fn slot(team: Team) -> Option<usize> {
    match team {
        Team::A => Some(0),
        Team::B => Some(1),
        Team::Neutral => None,
    }
}

/// Per-team channel arrays plus the ledger of who broadcast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BroadcastBoard {
    committed: [Vec<i32>; 2],
    pending: [BTreeMap<usize, i32>; 2],
    /// Broadcasters of the round being played, with their location when they broadcast.
    pending_broadcasters: BTreeMap<RobotId, MapLocation>,
    /// Broadcasters of the last completed round.
    last_broadcasters: BTreeMap<RobotId, MapLocation>,
}

impl BroadcastBoard {
    pub fn new(channels: usize) -> Self {
        Self {
            committed: [vec![0; channels], vec![0; channels]],
            pending: [BTreeMap::new(), BTreeMap::new()],
            pending_broadcasters: BTreeMap::new(),
            last_broadcasters: BTreeMap::new(),
        }
    }

    pub fn channels(&self) -> usize {
        self.committed[0].len()
    }

    /// Committed value of `channel` for `team`. Unwritten channels read 0.
    pub fn read(&self, team: Team, channel: usize) -> i32 {
        slot(team)
            .and_then(|i| self.committed[i].get(channel))
            .copied()
            .unwrap_or(0)
    }

    /// Queue a write for the next commit. Later writes in a round win.
    pub fn write(&mut self, team: Team, channel: usize, data: i32) {
        if channel >= self.channels() {
            return;
        }
        if let Some(i) = slot(team) {
            self.pending[i].insert(channel, data);
        }
    }

    /// Record that `robot` broadcast from `location` this round.
    pub fn note_broadcaster(&mut self, robot: RobotId, location: MapLocation) {
        self.pending_broadcasters.insert(robot, location);
    }

    /// Broadcasters of the last completed round.
    pub fn last_broadcasters(&self) -> impl Iterator<Item = (RobotId, MapLocation)> + '_ {
        self.last_broadcasters.iter().map(|(id, loc)| (*id, *loc))
    }

    /// Apply pending writes and rotate the broadcaster ledger.
    pub fn commit(&mut self) {
        for i in 0..2 {
            for (channel, data) in std::mem::take(&mut self.pending[i]) {
                self.committed[i][channel] = data;
            }
        }
        self.last_broadcasters = std::mem::take(&mut self.pending_broadcasters);
    }
}
