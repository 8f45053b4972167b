/// Category of a rejected gateway call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameActionErrorKind {
    /// Target is outside sensor, stride or map range.
    OutOfRange,
    /// Wrong archetype, state, cooldown or missing target.
    CantDoThat,
    /// Destination blocked, off the map, or already moved this turn.
    CantMoveThere,
    /// Broadcast channel outside `0..channels`.
    InvalidChannel,
    /// Team balance below the action's cost.
    InsufficientFunds,
}

/// A recoverable rejection returned to agent code. The world is untouched
/// whenever one of these is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("{context}: {kind:?}")]
pub struct GameActionError {
    pub kind: GameActionErrorKind,
    /// The operation that was rejected.
    pub context: &'static str,
}

impl GameActionError {
    pub fn new(kind: GameActionErrorKind, context: &'static str) -> Self {
        Self { kind, context }
    }

    pub fn out_of_range(context: &'static str) -> Self {
        Self::new(GameActionErrorKind::OutOfRange, context)
    }

    pub fn cant_do_that(context: &'static str) -> Self {
        Self::new(GameActionErrorKind::CantDoThat, context)
    }

    pub fn cant_move_there(context: &'static str) -> Self {
        Self::new(GameActionErrorKind::CantMoveThere, context)
    }

    pub fn invalid_channel(context: &'static str) -> Self {
        Self::new(GameActionErrorKind::InvalidChannel, context)
    }

    pub fn insufficient_funds(context: &'static str) -> Self {
        Self::new(GameActionErrorKind::InsufficientFunds, context)
    }
}

pub type GameResult<T> = Result<T, GameActionError>;
