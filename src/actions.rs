use crate::{
    error, info,
    wallpaper::{EnableOutcome, WallpaperAccessor, WallpaperControl, WallpaperFactory},
    warn, DEBUG_NAME,
};

pub const VK_VOLUME_MUTE: u16 = 0xAD;

pub const LOCK_FAILED_MESSAGE: &str = "There was an error while locking the workstation!";
pub const WALLPAPER_UNAVAILABLE_MESSAGE: &str = "Cannot initialize the wallpaper interface!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyDirection {
    Down,
    Up,
}

/// Session-level side effects the daemon can trigger.
pub trait Desktop {
    fn lock_workstation(&mut self) -> Result<(), String>;
    fn inject_key(&mut self, vk: u16, direction: KeyDirection);
    /// Non-fatal, user-visible warning.
    fn alert(&mut self, message: &str);
}

/// Asks the OS to lock the session. Failures are surfaced to the user, never retried.
pub fn lock_workstation<D: Desktop>(desktop: &mut D) -> bool {
    info!("[{}][SESSION] Requesting workstation lock", DEBUG_NAME);
    match desktop.lock_workstation() {
        Ok(()) => true,
        Err(e) => {
            error!("[{}][SESSION] LockWorkStation failed: {}", DEBUG_NAME, e);
            desktop.alert(LOCK_FAILED_MESSAGE);
            false
        }
    }
}

fn wallpaper_or_alert<'a, F: WallpaperFactory, D: Desktop>(
    accessor: &'a mut WallpaperAccessor<F>,
    desktop: &mut D,
) -> Option<&'a F::Handle> {
    match accessor.acquire_or_recover() {
        Ok(handle) => Some(handle),
        Err(_) => {
            desktop.alert(WALLPAPER_UNAVAILABLE_MESSAGE);
            None
        }
    }
}

pub fn advance_slideshow<F: WallpaperFactory, D: Desktop>(
    accessor: &mut WallpaperAccessor<F>,
    desktop: &mut D,
) {
    let Some(wallpaper) = wallpaper_or_alert(accessor, desktop) else {
        return;
    };

    if let Err(e) = wallpaper.advance_slideshow() {
        warn!("[{}][WALLPAPER] AdvanceSlideshow failed: {}", DEBUG_NAME, e);
    }
}

/// Switches between the picture background and a solid color.
///
/// Enabling the background when the shell says it is already enabled means the
/// user is on the picture, so it gets disabled instead. The post-disable state is
/// not checked.
pub fn toggle_solid_color<F: WallpaperFactory, D: Desktop>(
    accessor: &mut WallpaperAccessor<F>,
    desktop: &mut D,
) {
    let Some(wallpaper) = wallpaper_or_alert(accessor, desktop) else {
        return;
    };

    match wallpaper.enable(true) {
        Ok(EnableOutcome::AlreadySet) => {
            if let Err(e) = wallpaper.enable(false) {
                warn!("[{}][WALLPAPER] Enable(false) failed: {}", DEBUG_NAME, e);
            }
        }
        Ok(EnableOutcome::Changed) => {}
        Err(e) => warn!("[{}][WALLPAPER] Enable(true) failed: {}", DEBUG_NAME, e),
    }
}

/// Taps the volume-mute key; the OS keeps the mute state.
pub fn toggle_mute<D: Desktop>(desktop: &mut D) {
    desktop.inject_key(VK_VOLUME_MUTE, KeyDirection::Down);
    desktop.inject_key(VK_VOLUME_MUTE, KeyDirection::Up);
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use std::{cell::RefCell, rc::Rc};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum DesktopCall {
        Lock,
        Key(u16, KeyDirection),
        Alert(String),
    }

    #[derive(Default)]
    pub struct FakeDesktop {
        pub calls: Rc<RefCell<Vec<DesktopCall>>>,
        pub lock_fails: bool,
    }

    impl Desktop for FakeDesktop {
        fn lock_workstation(&mut self) -> Result<(), String> {
            self.calls.borrow_mut().push(DesktopCall::Lock);
            if self.lock_fails {
                return Err("access denied".to_string());
            }
            Ok(())
        }

        fn inject_key(&mut self, vk: u16, direction: KeyDirection) {
            self.calls.borrow_mut().push(DesktopCall::Key(vk, direction));
        }

        fn alert(&mut self, message: &str) {
            self.calls
                .borrow_mut()
                .push(DesktopCall::Alert(message.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{DesktopCall, FakeDesktop};
    use super::*;
    use crate::wallpaper::fakes::{FakeFactory, SharedLog, WallpaperCall};

    #[test]
    fn lock_success_raises_no_alert() {
        let mut desktop = FakeDesktop::default();
        assert!(lock_workstation(&mut desktop));
        assert_eq!(*desktop.calls.borrow(), vec![DesktopCall::Lock]);
    }

    #[test]
    fn lock_failure_alerts_once_without_retry() {
        let mut desktop = FakeDesktop {
            lock_fails: true,
            ..Default::default()
        };
        assert!(!lock_workstation(&mut desktop));
        assert_eq!(
            *desktop.calls.borrow(),
            vec![
                DesktopCall::Lock,
                DesktopCall::Alert(LOCK_FAILED_MESSAGE.to_string())
            ]
        );
    }

    #[test]
    fn mute_sends_press_then_release() {
        let mut desktop = FakeDesktop::default();
        toggle_mute(&mut desktop);
        assert_eq!(
            *desktop.calls.borrow(),
            vec![
                DesktopCall::Key(VK_VOLUME_MUTE, KeyDirection::Down),
                DesktopCall::Key(VK_VOLUME_MUTE, KeyDirection::Up),
            ]
        );
    }

    #[test]
    fn solid_color_toggle_disables_when_already_enabled() {
        let log = SharedLog::default();
        log.borrow_mut().enabled = true;
        let mut accessor = WallpaperAccessor::new(FakeFactory::new(log.clone()));
        let mut desktop = FakeDesktop::default();

        toggle_solid_color(&mut accessor, &mut desktop);

        let disables = log
            .borrow()
            .calls
            .iter()
            .filter(|c| matches!(c, WallpaperCall::Enable(_, false)))
            .count();
        assert_eq!(disables, 1);
        assert!(!log.borrow().enabled);
    }

    #[test]
    fn solid_color_toggle_enables_without_disable() {
        let log = SharedLog::default();
        let mut accessor = WallpaperAccessor::new(FakeFactory::new(log.clone()));
        let mut desktop = FakeDesktop::default();

        toggle_solid_color(&mut accessor, &mut desktop);

        assert_eq!(
            log.borrow().calls,
            vec![WallpaperCall::Create, WallpaperCall::Enable(1, true)]
        );
        assert!(log.borrow().enabled);
    }

    #[test]
    fn advance_is_skipped_with_alert_when_unavailable() {
        let log = SharedLog::default();
        let mut accessor = WallpaperAccessor::new(FakeFactory::failing(log.clone(), &[true]));
        let mut desktop = FakeDesktop::default();

        advance_slideshow(&mut accessor, &mut desktop);

        assert_eq!(log.borrow().calls, vec![WallpaperCall::Create]);
        assert_eq!(
            *desktop.calls.borrow(),
            vec![DesktopCall::Alert(WALLPAPER_UNAVAILABLE_MESSAGE.to_string())]
        );
    }
}
