use std::{cell::RefCell, collections::VecDeque};

use windows::{
    core::{w, PCWSTR},
    Win32::{
        Foundation::{HINSTANCE, HWND, LPARAM, LRESULT, WPARAM},
        System::{
            LibraryLoader::GetModuleHandleW, Power::POWERBROADCAST_SETTING,
            SystemServices::GUID_LIDSWITCH_STATE_CHANGE,
        },
        UI::WindowsAndMessaging::{
            CreateWindowExW, DefWindowProcW, DestroyWindow, DispatchMessageW, GetMessageW,
            PostMessageW, PostQuitMessage, RegisterClassW, TranslateMessage, CW_USEDEFAULT,
            HWND_MESSAGE, MSG, PBT_POWERSETTINGCHANGE, WINDOW_EX_STYLE, WM_APP, WM_CLOSE,
            WM_DESTROY, WM_HOTKEY, WM_POWERBROADCAST, WM_WTSSESSION_CHANGE, WNDCLASSW,
            WS_OVERLAPPEDWINDOW,
        },
    },
};

use crate::{
    dispatch::NotificationSource,
    error, info,
    notification::{HotkeyTrigger, Notification, PowerSetting, SessionChange},
    startup::StartupError,
    DEBUG_NAME,
};

const CLASS_NAME: PCWSTR = w!("LidLock");

/// Posted to ourselves so `GetMessageW` returns after a sent message was queued.
const WM_LIDLOCK_WAKE: u32 = WM_APP + 1;

thread_local! {
    static PENDING: RefCell<VecDeque<Notification>> = RefCell::new(VecDeque::new());
}

/// Hidden message-only window that receives power, session and hotkey messages.
pub struct MessageWindow {
    hwnd: HWND,
}

impl MessageWindow {
    pub fn create() -> Result<Self, StartupError> {
        let hinstance = unsafe {
            GetModuleHandleW(None)
                .map(|h| HINSTANCE(h.0))
                .map_err(|e| StartupError::Window(format!("GetModuleHandleW failed: {e:?}")))?
        };

        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance,
            lpszClassName: CLASS_NAME,
            ..Default::default()
        };

        if unsafe { RegisterClassW(&wc) } == 0 {
            return Err(StartupError::Window("RegisterClassW failed".to_string()));
        }

        let hwnd = unsafe {
            CreateWindowExW(
                WINDOW_EX_STYLE::default(),
                CLASS_NAME,
                w!(""),
                WS_OVERLAPPEDWINDOW,
                CW_USEDEFAULT,
                CW_USEDEFAULT,
                0,
                0,
                Some(HWND_MESSAGE),
                None,
                Some(hinstance),
                None,
            )
        }
        .map_err(|e| StartupError::Window(format!("CreateWindowExW failed: {e:?}")))?;

        info!("[{}][SETUP] Message window created: {:?}", DEBUG_NAME, hwnd);
        Ok(Self { hwnd })
    }

    pub fn hwnd(&self) -> HWND {
        self.hwnd
    }
}

impl Drop for MessageWindow {
    fn drop(&mut self) {
        unsafe {
            let _ = DestroyWindow(self.hwnd);
        }
    }
}

unsafe extern "system" fn window_proc(
    hwnd: HWND,
    msg: u32,
    wparam: WPARAM,
    lparam: LPARAM,
) -> LRESULT {
    if let Some(notification) = translate(msg, wparam, lparam) {
        PENDING.with(|queue| queue.borrow_mut().push_back(notification));
        let _ = PostMessageW(Some(hwnd), WM_LIDLOCK_WAKE, WPARAM(0), LPARAM(0));
        return LRESULT(0);
    }

    match msg {
        WM_LIDLOCK_WAKE => LRESULT(0),
        WM_CLOSE => {
            let _ = DestroyWindow(hwnd);
            LRESULT(0)
        }
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

/// Decodes the three message kinds we subscribe to. The power setting payload is
/// only valid for the duration of the call, so it is copied out here.
unsafe fn translate(msg: u32, wparam: WPARAM, lparam: LPARAM) -> Option<Notification> {
    match msg {
        WM_POWERBROADCAST if wparam.0 as u32 == PBT_POWERSETTINGCHANGE => {
            let setting = (lparam.0 as *const POWERBROADCAST_SETTING).as_ref()?;
            if setting.PowerSetting == GUID_LIDSWITCH_STATE_CHANGE && setting.DataLength > 0 {
                Some(Notification::lid_switch(setting.Data[0] as u32))
            } else {
                Some(Notification::Power {
                    setting: PowerSetting::Other,
                    lid_open: false,
                })
            }
        }
        WM_WTSSESSION_CHANGE => Some(Notification::Session(SessionChange::from_code(
            wparam.0 as u32,
        ))),
        WM_HOTKEY => Some(Notification::Hotkey(HotkeyTrigger::from_message(
            wparam.0, lparam.0,
        ))),
        _ => None,
    }
}

/// Thread message queue as a [`NotificationSource`].
pub struct MessagePump;

impl NotificationSource for MessagePump {
    fn next_notification(&mut self) -> Notification {
        loop {
            if let Some(notification) = PENDING.with(|queue| queue.borrow_mut().pop_front()) {
                return notification;
            }

            let mut msg = MSG::default();
            let res = unsafe { GetMessageW(&mut msg, None, 0, 0) };
            match res.0 {
                0 => return Notification::Quit(msg.wParam.0 as i32),
                -1 => {
                    error!("[{}][DISPATCH] GetMessageW failed; stopping", DEBUG_NAME);
                    return Notification::Quit(1);
                }
                _ => unsafe {
                    let _ = TranslateMessage(&msg);
                    DispatchMessageW(&msg);
                },
            }
        }
    }
}
