//! Win32 and COM bindings for the daemon's seams.

mod desktop;
mod hotkeys;
mod wallpaper;
mod window;

pub use desktop::{alert, Win32Desktop};
pub use hotkeys::Win32Hotkeys;
pub use wallpaper::ShellWallpaperFactory;
pub use window::{MessagePump, MessageWindow};

use windows::Win32::{
    Foundation::HANDLE,
    System::{
        Com::{CoInitializeEx, CoUninitialize, COINIT_APARTMENTTHREADED},
        Power::{
            RegisterPowerSettingNotification, UnregisterPowerSettingNotification, HPOWERNOTIFY,
        },
        RemoteDesktop::{
            WTSRegisterSessionNotification, WTSUnRegisterSessionNotification,
            NOTIFY_FOR_THIS_SESSION,
        },
        SystemServices::GUID_LIDSWITCH_STATE_CHANGE,
        Threading::{GetCurrentProcess, SetPriorityClass, REALTIME_PRIORITY_CLASS},
    },
    UI::WindowsAndMessaging::DEVICE_NOTIFY_WINDOW_HANDLE,
};

use crate::{info, startup::StartupError, warn, DEBUG_NAME};

/// Single-threaded COM apartment for the lifetime of the value.
pub struct ComApartment;

impl ComApartment {
    pub fn init() -> Result<Self, StartupError> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .map_err(|e| StartupError::Com(format!("{e:?}")))?;
        info!("[{}][SETUP] COM initialized", DEBUG_NAME);
        Ok(Self)
    }
}

impl Drop for ComApartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

/// Lid switch power-setting subscription for the message window.
pub struct LidSubscription(HPOWERNOTIFY);

impl LidSubscription {
    pub fn register(window: &MessageWindow) -> Result<Self, StartupError> {
        let handle = unsafe {
            RegisterPowerSettingNotification(
                HANDLE(window.hwnd().0),
                &GUID_LIDSWITCH_STATE_CHANGE,
                DEVICE_NOTIFY_WINDOW_HANDLE,
            )
        }
        .map_err(|e| StartupError::LidNotification(format!("{e:?}")))?;
        info!("[{}][SETUP] Registered for lid switch notifications", DEBUG_NAME);
        Ok(Self(handle))
    }
}

impl Drop for LidSubscription {
    fn drop(&mut self) {
        unsafe {
            let _ = UnregisterPowerSettingNotification(self.0);
        }
    }
}

/// WTS lock/unlock subscription for the current session.
pub struct SessionSubscription<'a> {
    window: &'a MessageWindow,
}

impl<'a> SessionSubscription<'a> {
    pub fn register(window: &'a MessageWindow) -> Result<Self, StartupError> {
        unsafe { WTSRegisterSessionNotification(window.hwnd(), NOTIFY_FOR_THIS_SESSION) }
            .map_err(|e| StartupError::SessionNotification(format!("{e:?}")))?;
        info!("[{}][SETUP] Registered for session notifications", DEBUG_NAME);
        Ok(Self { window })
    }
}

impl Drop for SessionSubscription<'_> {
    fn drop(&mut self) {
        unsafe {
            let _ = WTSUnRegisterSessionNotification(self.window.hwnd());
        }
    }
}

/// Lid closes must be handled before the machine suspends.
pub fn elevate_priority() {
    unsafe {
        if SetPriorityClass(GetCurrentProcess(), REALTIME_PRIORITY_CLASS).is_err() {
            warn!("[{}][SETUP] Failed to raise process priority class", DEBUG_NAME);
        }
    }
}
