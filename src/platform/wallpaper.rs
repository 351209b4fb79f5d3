use windows::{
    core::{Interface, BOOL, PCWSTR},
    Win32::{
        Foundation::S_FALSE,
        System::Com::{CoCreateInstance, CLSCTX_ALL},
        UI::Shell::{DesktopWallpaper, IDesktopWallpaper, DSD_FORWARD},
    },
};

use crate::wallpaper::{EnableOutcome, WallpaperControl, WallpaperFactory};

/// `IDesktopWallpaper` from the shell. Released when dropped.
pub struct ShellWallpaper(IDesktopWallpaper);

impl WallpaperControl for ShellWallpaper {
    fn probe(&self) -> Result<(), String> {
        unsafe { self.0.GetStatus() }
            .map(|_| ())
            .map_err(|e| format!("GetStatus failed: {e:?}"))
    }

    fn advance_slideshow(&self) -> Result<(), String> {
        unsafe { self.0.AdvanceSlideshow(PCWSTR::null(), DSD_FORWARD) }
            .map_err(|e| format!("{e:?}"))
    }

    fn enable(&self, enable: bool) -> Result<EnableOutcome, String> {
        // The projected Enable() folds S_FALSE into Ok; go through the vtable to see it.
        let hr = unsafe {
            (Interface::vtable(&self.0).Enable)(Interface::as_raw(&self.0), BOOL::from(enable))
        };

        if hr == S_FALSE {
            return Ok(EnableOutcome::AlreadySet);
        }
        hr.ok()
            .map(|()| EnableOutcome::Changed)
            .map_err(|e| format!("{e:?}"))
    }
}

pub struct ShellWallpaperFactory;

impl WallpaperFactory for ShellWallpaperFactory {
    type Handle = ShellWallpaper;

    fn create(&mut self) -> Result<ShellWallpaper, String> {
        let wallpaper: IDesktopWallpaper = unsafe {
            CoCreateInstance(&DesktopWallpaper, None, CLSCTX_ALL)
                .map_err(|e| format!("CoCreateInstance(DesktopWallpaper) failed: {e:?}"))?
        };
        Ok(ShellWallpaper(wallpaper))
    }
}
