use crate::{
    actions::{self, Desktop},
    debug,
    hotkeys::{self, HotkeyAction},
    info,
    notification::{HotkeyTrigger, Notification, SessionChange},
    session::SessionLockState,
    wallpaper::{WallpaperAccessor, WallpaperFactory},
    DEBUG_NAME,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit(i32),
}

/// Blocking supplier of notifications. Returns [`Notification::Quit`] once the
/// OS asks the process to shut down.
pub trait NotificationSource {
    fn next_notification(&mut self) -> Notification;
}

/// Everything the daemon remembers between notifications.
///
/// Only the dispatch loop's thread touches this, so none of it is synchronized.
pub struct LidLock<D: Desktop, F: WallpaperFactory> {
    session: SessionLockState,
    wallpaper: WallpaperAccessor<F>,
    desktop: D,
}

impl<D: Desktop, F: WallpaperFactory> LidLock<D, F> {
    pub fn new(desktop: D, factory: F) -> Self {
        Self {
            session: SessionLockState::default(),
            wallpaper: WallpaperAccessor::new(factory),
            desktop,
        }
    }

    pub fn session_state(&self) -> SessionLockState {
        self.session
    }

    /// Routes one notification to its handler.
    pub fn dispatch(&mut self, notification: Notification) -> Flow {
        debug!("[{}][DISPATCH] {:?}", DEBUG_NAME, notification);

        match notification {
            Notification::Power { .. } => {
                if notification.is_lid_close() {
                    self.on_lid_closed();
                }
            }
            Notification::Session(change) => self.on_session_change(change),
            Notification::Hotkey(trigger) => self.on_hotkey(&trigger),
            Notification::Quit(code) => return Flow::Exit(code),
            Notification::Other => {}
        }

        Flow::Continue
    }

    /// Pumps `source` until it reports shutdown, returning the exit code.
    pub fn run<S: NotificationSource>(&mut self, source: &mut S) -> i32 {
        info!("[{}][DISPATCH] Entering event loop", DEBUG_NAME);
        loop {
            if let Flow::Exit(code) = self.dispatch(source.next_notification()) {
                info!("[{}][DISPATCH] Quit received (code {})", DEBUG_NAME, code);
                return code;
            }
        }
    }

    /// Releases the wallpaper handle. Safe to call more than once.
    pub fn shutdown(&mut self) {
        self.wallpaper.release();
    }

    fn on_lid_closed(&mut self) {
        if self.session.is_locked() {
            debug!("[{}][SESSION] Lid closed while already locked; ignoring", DEBUG_NAME);
            return;
        }

        info!("[{}][SESSION] Lid closed while unlocked", DEBUG_NAME);
        // The state only flips once the OS confirms with a lock notification.
        actions::lock_workstation(&mut self.desktop);
    }

    fn on_session_change(&mut self, change: SessionChange) {
        let next = self.session.apply(change);
        if next != self.session {
            info!(
                "[{}][SESSION] {:?} -> {:?}",
                DEBUG_NAME, self.session, next
            );
        }
        self.session = next;
    }

    fn on_hotkey(&mut self, trigger: &HotkeyTrigger) {
        let Some(action) = hotkeys::action_for(trigger) else {
            return;
        };

        debug!("[{}][HOTKEY] {:?}", DEBUG_NAME, action);
        match action {
            HotkeyAction::AdvanceSlideshow => {
                actions::advance_slideshow(&mut self.wallpaper, &mut self.desktop)
            }
            HotkeyAction::ToggleSolidColor => {
                actions::toggle_solid_color(&mut self.wallpaper, &mut self.desktop)
            }
            HotkeyAction::ToggleMute => actions::toggle_mute(&mut self.desktop),
        }
    }
}

impl<D: Desktop, F: WallpaperFactory> Drop for LidLock<D, F> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        actions::{
            fakes::{DesktopCall, FakeDesktop},
            KeyDirection, VK_VOLUME_MUTE,
        },
        hotkeys::{HOTKEY_MUTE, HOTKEY_NEXT_WALLPAPER, HOTKEY_SOLID_COLOR},
        notification::PowerSetting,
        wallpaper::fakes::{FakeFactory, SharedLog, WallpaperCall},
    };
    use std::{cell::RefCell, collections::VecDeque, rc::Rc};

    type Calls = Rc<RefCell<Vec<DesktopCall>>>;

    fn daemon(script: &[bool]) -> (LidLock<FakeDesktop, FakeFactory>, Calls, SharedLog) {
        let desktop = FakeDesktop::default();
        let calls = desktop.calls.clone();
        let log = SharedLog::default();
        let factory = FakeFactory::failing(log.clone(), script);
        (LidLock::new(desktop, factory), calls, log)
    }

    fn lock_count(calls: &Calls) -> usize {
        calls
            .borrow()
            .iter()
            .filter(|c| **c == DesktopCall::Lock)
            .count()
    }

    fn hotkey(id: i32) -> Notification {
        Notification::Hotkey(HotkeyTrigger {
            id,
            modifiers: 0,
            key: 0,
        })
    }

    const LID_CLOSE: Notification = Notification::Power {
        setting: PowerSetting::LidSwitch,
        lid_open: false,
    };

    struct Scripted(VecDeque<Notification>);

    impl NotificationSource for Scripted {
        fn next_notification(&mut self) -> Notification {
            self.0.pop_front().unwrap_or(Notification::Quit(0))
        }
    }

    #[test]
    fn lid_close_while_unlocked_locks_once() {
        let (mut lidlock, calls, _) = daemon(&[]);

        assert_eq!(lidlock.dispatch(LID_CLOSE), Flow::Continue);
        assert_eq!(lock_count(&calls), 1);
        // State waits for the OS confirmation.
        assert_eq!(lidlock.session_state(), SessionLockState::Unlocked);
    }

    #[test]
    fn lid_close_while_locked_is_ignored() {
        let (mut lidlock, calls, _) = daemon(&[]);

        lidlock.dispatch(Notification::Session(SessionChange::Lock));
        lidlock.dispatch(LID_CLOSE);
        lidlock.dispatch(LID_CLOSE);
        assert_eq!(lock_count(&calls), 0);
    }

    #[test]
    fn lid_open_and_other_settings_do_nothing() {
        let (mut lidlock, calls, _) = daemon(&[]);

        lidlock.dispatch(Notification::lid_switch(1));
        lidlock.dispatch(Notification::Power {
            setting: PowerSetting::Other,
            lid_open: false,
        });
        lidlock.dispatch(Notification::Other);
        assert!(calls.borrow().is_empty());
    }

    #[test]
    fn failed_lock_alerts_and_keeps_state() {
        let (mut lidlock, calls, _) = daemon(&[]);
        lidlock.desktop.lock_fails = true;

        lidlock.dispatch(LID_CLOSE);
        assert_eq!(lidlock.session_state(), SessionLockState::Unlocked);
        assert_eq!(
            calls.borrow().last(),
            Some(&DesktopCall::Alert(actions::LOCK_FAILED_MESSAGE.to_string()))
        );

        // No automatic retry; the next lid close tries again.
        lidlock.dispatch(LID_CLOSE);
        assert_eq!(lock_count(&calls), 2);
    }

    #[test]
    fn lock_requests_follow_session_confirmations() {
        let (mut lidlock, calls, _) = daemon(&[]);
        let sequence = [
            LID_CLOSE,
            Notification::Session(SessionChange::Lock),
            LID_CLOSE,
            Notification::Session(SessionChange::Unlock),
            LID_CLOSE,
        ];

        let mut locks_after = Vec::new();
        for n in sequence {
            lidlock.dispatch(n);
            locks_after.push(lock_count(&calls));
        }

        // Requests at notifications 1 and 5 only.
        assert_eq!(locks_after, vec![1, 1, 1, 1, 2]);
    }

    #[test]
    fn hotkeys_route_to_their_actions() {
        let (mut lidlock, calls, log) = daemon(&[]);

        lidlock.dispatch(hotkey(HOTKEY_NEXT_WALLPAPER));
        lidlock.dispatch(hotkey(HOTKEY_SOLID_COLOR));
        lidlock.dispatch(hotkey(HOTKEY_MUTE));

        assert_eq!(
            log.borrow().calls,
            vec![
                WallpaperCall::Create,
                WallpaperCall::Advance(1),
                WallpaperCall::Probe(1),
                WallpaperCall::Enable(1, true),
            ]
        );
        assert_eq!(
            *calls.borrow(),
            vec![
                DesktopCall::Key(VK_VOLUME_MUTE, KeyDirection::Down),
                DesktopCall::Key(VK_VOLUME_MUTE, KeyDirection::Up),
            ]
        );
    }

    #[test]
    fn advance_survives_repeated_creation_failures() {
        let (mut lidlock, calls, log) = daemon(&[true, true]);

        lidlock.dispatch(hotkey(HOTKEY_NEXT_WALLPAPER));
        lidlock.dispatch(hotkey(HOTKEY_NEXT_WALLPAPER));

        assert_eq!(
            log.borrow().calls,
            vec![WallpaperCall::Create, WallpaperCall::Create]
        );
        assert_eq!(calls.borrow().len(), 2);
        assert!(calls
            .borrow()
            .iter()
            .all(|c| matches!(c, DesktopCall::Alert(_))));
    }

    #[test]
    fn run_stops_on_quit_with_its_code() {
        let (mut lidlock, calls, _) = daemon(&[]);
        let mut source = Scripted(VecDeque::from([
            Notification::Session(SessionChange::Lock),
            LID_CLOSE,
            Notification::Quit(3),
            LID_CLOSE,
        ]));

        assert_eq!(lidlock.run(&mut source), 3);
        assert_eq!(lidlock.session_state(), SessionLockState::Locked);
        assert_eq!(lock_count(&calls), 0);
        // The notification after the quit is never consumed.
        assert_eq!(source.0.len(), 1);
    }

    #[test]
    fn shutdown_releases_the_handle_once() {
        let (mut lidlock, _, log) = daemon(&[]);

        lidlock.dispatch(hotkey(HOTKEY_NEXT_WALLPAPER));
        lidlock.shutdown();
        drop(lidlock);

        let dropped = log
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, WallpaperCall::Dropped(_)))
            .count();
        assert_eq!(dropped, 1);
    }
}
