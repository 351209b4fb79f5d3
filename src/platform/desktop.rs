use windows::{
    core::{w, PCWSTR},
    Win32::{
        System::Shutdown::LockWorkStation,
        UI::{
            Input::KeyboardAndMouse::{keybd_event, KEYBD_EVENT_FLAGS, KEYEVENTF_KEYUP},
            WindowsAndMessaging::{GetForegroundWindow, MessageBoxW, MB_ICONWARNING, MB_OK},
        },
    },
};

use crate::{
    actions::{Desktop, KeyDirection},
    utility::to_wstring,
};

pub struct Win32Desktop;

impl Desktop for Win32Desktop {
    fn lock_workstation(&mut self) -> Result<(), String> {
        unsafe { LockWorkStation() }.map_err(|e| format!("{e:?}"))
    }

    fn inject_key(&mut self, vk: u16, direction: KeyDirection) {
        let flags = match direction {
            KeyDirection::Down => KEYBD_EVENT_FLAGS(0),
            KeyDirection::Up => KEYEVENTF_KEYUP,
        };
        unsafe { keybd_event(vk as u8, 0, flags, 0) };
    }

    fn alert(&mut self, message: &str) {
        alert(message);
    }
}

/// Modal warning box over whatever window has focus.
pub fn alert(message: &str) {
    let text = to_wstring(message);
    unsafe {
        let _ = MessageBoxW(
            Some(GetForegroundWindow()),
            PCWSTR(text.as_ptr()),
            w!("Error!"),
            MB_OK | MB_ICONWARNING,
        );
    }
}
