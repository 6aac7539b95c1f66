use serde::Serialize;

/// Phases of the session controller.
///
/// ```text
/// Idle ──start──▶ Running ──stop──▶ Stopping ──persisted──▶ Idle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// No session; a subject may be chosen and a session started.
    #[default]
    Idle,

    /// Tickers are producing caption lines.
    Running,

    /// Tickers are halted and the record is being written.
    Stopping,
}

impl SessionPhase {
    /// `true` while a session record is open.
    pub fn is_active(&self) -> bool {
        matches!(self, SessionPhase::Running | SessionPhase::Stopping)
    }

    pub fn label(&self) -> &'static str {
        match self {
            SessionPhase::Idle => "Idle",
            SessionPhase::Running => "Running",
            SessionPhase::Stopping => "Saving",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_phase_is_idle() {
        assert_eq!(SessionPhase::default(), SessionPhase::Idle);
        assert!(!SessionPhase::Idle.is_active());
    }

    #[test]
    fn test_running_and_stopping_are_active() {
        assert!(SessionPhase::Running.is_active());
        assert!(SessionPhase::Stopping.is_active());
        assert_eq!(SessionPhase::Stopping.label(), "Saving");
    }
}
