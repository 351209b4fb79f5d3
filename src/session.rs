use crate::notification::SessionChange;

/// Lock status of the interactive session as last reported by the OS.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionLockState {
    #[default]
    Unlocked,
    Locked,
}

impl SessionLockState {
    pub fn is_locked(self) -> bool {
        self == Self::Locked
    }

    /// Next state after a session change. Reasons other than lock/unlock leave it as is.
    pub fn apply(self, change: SessionChange) -> Self {
        match change {
            SessionChange::Lock => Self::Locked,
            SessionChange::Unlock => Self::Unlocked,
            SessionChange::Other(_) => self,
        }
    }
}
