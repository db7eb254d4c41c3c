//! Abstract player actions
//!
//! The host maps raw keys (arrows, WASD, space) onto these. Engines never see
//! key codes, and every engine ignores the intents it has no use for.

/// A single player action, delivered between ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    MoveUp,
    MoveDown,
    Fire,
    Jump,
    TogglePause,
    /// Restart after a terminal state (or at any time for the simple games)
    Restart,
    /// Start over from scratch, discarding saved progress
    NewGame,
    QuitToMenu,
}
