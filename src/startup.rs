use thiserror::Error;

/// One-shot setup failures. Each aborts startup with its own exit code.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("Cannot create the message window! ({0})")]
    Window(String),
    #[error("Can't register one or more of the hotkeys")]
    Hotkeys,
    #[error("Cannot register for lid state events! ({0})")]
    LidNotification(String),
    #[error("Cannot register for session (un)lock events! ({0})")]
    SessionNotification(String),
    #[error("COM library initialization failed! ({0})")]
    Com(String),
}

impl StartupError {
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Window(_) => -1,
            Self::Hotkeys => -2,
            Self::LidNotification(_) => -3,
            Self::SessionNotification(_) => -4,
            Self::Com(_) => -5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_setup_site_has_a_distinct_exit_code() {
        let errors = [
            StartupError::Window("class".into()),
            StartupError::Hotkeys,
            StartupError::LidNotification("denied".into()),
            StartupError::SessionNotification("denied".into()),
            StartupError::Com("0x80010106".into()),
        ];
        let codes: Vec<i32> = errors.iter().map(StartupError::exit_code).collect();
        assert_eq!(codes, vec![-1, -2, -3, -4, -5]);
    }

    #[test]
    fn messages_carry_the_cause() {
        let e = StartupError::LidNotification("access denied".into());
        assert_eq!(
            e.to_string(),
            "Cannot register for lid state events! (access denied)"
        );
    }
}
