use windows::Win32::{
    Foundation::HWND,
    UI::Input::KeyboardAndMouse::{RegisterHotKey, UnregisterHotKey, HOT_KEY_MODIFIERS},
};

use crate::hotkeys::{self, HotkeyBinding, HotkeyRegistrar};

/// `RegisterHotKey` table bound to the message window. Unregisters everything on drop.
pub struct Win32Hotkeys {
    hwnd: HWND,
}

impl Win32Hotkeys {
    pub fn new(hwnd: HWND) -> Self {
        Self { hwnd }
    }
}

impl HotkeyRegistrar for Win32Hotkeys {
    fn register(&mut self, binding: &HotkeyBinding) -> Result<(), String> {
        unsafe {
            RegisterHotKey(
                Some(self.hwnd),
                binding.id,
                HOT_KEY_MODIFIERS(binding.modifiers),
                binding.key,
            )
        }
        .map_err(|e| format!("{e:?}"))
    }

    fn unregister(&mut self, id: i32) -> Result<(), String> {
        unsafe { UnregisterHotKey(Some(self.hwnd), id) }.map_err(|e| format!("{e:?}"))
    }
}

impl Drop for Win32Hotkeys {
    fn drop(&mut self) {
        hotkeys::unregister_all(self);
    }
}
