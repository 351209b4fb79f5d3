//! Events delivered to the dispatch loop.
//!
//! The Win32 window procedure decodes raw messages into these values, and
//! tests construct them directly.

/// Power setting a `PBT_POWERSETTINGCHANGE` broadcast refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PowerSetting {
    LidSwitch,
    Other,
}

/// `WM_WTSSESSION_CHANGE` reason codes we care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionChange {
    Lock,
    Unlock,
    Other(u32),
}

impl SessionChange {
    const WTS_SESSION_LOCK: u32 = 0x7;
    const WTS_SESSION_UNLOCK: u32 = 0x8;

    pub fn from_code(code: u32) -> Self {
        match code {
            Self::WTS_SESSION_LOCK => Self::Lock,
            Self::WTS_SESSION_UNLOCK => Self::Unlock,
            other => Self::Other(other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyTrigger {
    pub id: i32,
    pub modifiers: u32,
    pub key: u32,
}

impl HotkeyTrigger {
    /// `WM_HOTKEY` carries the id in wParam and modifiers/key in the low/high words of lParam.
    pub fn from_message(wparam: usize, lparam: isize) -> Self {
        let lparam = lparam as usize;
        Self {
            id: wparam as i32,
            modifiers: (lparam & 0xFFFF) as u32,
            key: ((lparam >> 16) & 0xFFFF) as u32,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Notification {
    /// `lid_open` is only meaningful for [`PowerSetting::LidSwitch`].
    Power { setting: PowerSetting, lid_open: bool },
    Session(SessionChange),
    Hotkey(HotkeyTrigger),
    /// The pump saw `WM_QUIT`; carries the exit code.
    Quit(i32),
    Other,
}

impl Notification {
    /// Lid switch data is a DWORD: 0 closed, 1 open.
    pub fn lid_switch(data: u32) -> Self {
        Self::Power {
            setting: PowerSetting::LidSwitch,
            lid_open: data != 0,
        }
    }

    pub fn is_lid_close(&self) -> bool {
        matches!(
            self,
            Self::Power {
                setting: PowerSetting::LidSwitch,
                lid_open: false
            }
        )
    }
}
