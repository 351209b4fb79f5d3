use crate::{info, warn, DEBUG_NAME};

/// Result of asking the shell to switch the background on or off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnableOutcome {
    Changed,
    /// The shell reported the requested state was already in effect (`S_FALSE`).
    AlreadySet,
}

/// A live handle to the desktop wallpaper control object.
pub trait WallpaperControl {
    /// Cheap status query; an error means the handle is stale.
    fn probe(&self) -> Result<(), String>;
    fn advance_slideshow(&self) -> Result<(), String>;
    fn enable(&self, enable: bool) -> Result<EnableOutcome, String>;
}

pub trait WallpaperFactory {
    type Handle: WallpaperControl;

    fn create(&mut self) -> Result<Self::Handle, String>;
}

/// Owns at most one wallpaper handle and recreates it whenever it stops answering.
///
/// The shell's wallpaper object dies with explorer, so every caller goes through
/// [`WallpaperAccessor::acquire_or_recover`] instead of keeping the handle around.
/// The handle can still go stale between the probe and its use; wallpaper actions
/// are best-effort and the next call recovers.
pub struct WallpaperAccessor<F: WallpaperFactory> {
    factory: F,
    handle: Option<F::Handle>,
}

impl<F: WallpaperFactory> WallpaperAccessor<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            handle: None,
        }
    }

    pub fn acquire_or_recover(&mut self) -> Result<&F::Handle, String> {
        let healthy = match &self.handle {
            Some(handle) => match handle.probe() {
                Ok(()) => true,
                Err(e) => {
                    warn!("[{}][WALLPAPER] Handle failed status probe: {}", DEBUG_NAME, e);
                    false
                }
            },
            None => false,
        };

        if !healthy {
            if self.handle.take().is_some() {
                info!("[{}][WALLPAPER] Released stale handle", DEBUG_NAME);
            }

            let created = self.factory.create().map_err(|e| {
                warn!("[{}][WALLPAPER] Handle creation failed: {}", DEBUG_NAME, e);
                e
            })?;
            info!("[{}][WALLPAPER] Acquired wallpaper handle", DEBUG_NAME);
            self.handle = Some(created);
        }

        self.handle
            .as_ref()
            .ok_or_else(|| "wallpaper handle unavailable".to_string())
    }

    pub fn is_held(&self) -> bool {
        self.handle.is_some()
    }

    /// Drops the held handle, if any. Returns whether one was released.
    pub fn release(&mut self) -> bool {
        let released = self.handle.take().is_some();
        if released {
            info!("[{}][WALLPAPER] Wallpaper handle released", DEBUG_NAME);
        }
        released
    }
}
