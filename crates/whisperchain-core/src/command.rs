//! Command abstractions.

use uuid::Uuid;

/// Implemented by every command that crosses the application boundary.
pub trait Command: Send + Sync + std::fmt::Debug {
    /// Stable type name used in logs, e.g. `game.submit_prompt`.
    fn command_type(&self) -> &'static str;

    /// Correlation ID tying the command to the request that caused it.
    fn correlation_id(&self) -> Uuid;
}
