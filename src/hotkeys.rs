// Global hotkey table and registration

use crate::{error, info, notification::HotkeyTrigger, warn, DEBUG_NAME};

pub const MOD_NONE: u32 = 0x0000;
pub const MOD_ALT: u32 = 0x0001;
pub const MOD_CONTROL: u32 = 0x0002;

/// `~` / backtick on US layouts.
pub const VK_OEM_3: u32 = 0xC0;
pub const VK_F1: u32 = 0x70;

pub const HOTKEY_NEXT_WALLPAPER: i32 = 101;
pub const HOTKEY_SOLID_COLOR: i32 = 102;
pub const HOTKEY_MUTE: i32 = 103;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyAction {
    AdvanceSlideshow,
    ToggleSolidColor,
    ToggleMute,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HotkeyBinding {
    pub id: i32,
    pub modifiers: u32,
    pub key: u32,
    pub action: HotkeyAction,
}

pub const BINDINGS: [HotkeyBinding; 3] = [
    // Alt + ~ -> next wallpaper in the slideshow
    HotkeyBinding {
        id: HOTKEY_NEXT_WALLPAPER,
        modifiers: MOD_ALT,
        key: VK_OEM_3,
        action: HotkeyAction::AdvanceSlideshow,
    },
    // Ctrl + ~ -> switch to (or from) a single color wallpaper
    HotkeyBinding {
        id: HOTKEY_SOLID_COLOR,
        modifiers: MOD_CONTROL,
        key: VK_OEM_3,
        action: HotkeyAction::ToggleSolidColor,
    },
    // F1 acts as the mute button
    HotkeyBinding {
        id: HOTKEY_MUTE,
        modifiers: MOD_NONE,
        key: VK_F1,
        action: HotkeyAction::ToggleMute,
    },
];

/// OS-side hotkey table.
pub trait HotkeyRegistrar {
    fn register(&mut self, binding: &HotkeyBinding) -> Result<(), String>;
    fn unregister(&mut self, id: i32) -> Result<(), String>;
}

/// Registers every binding. Returns true only if all of them succeeded; a failure
/// does not stop the remaining registrations.
pub fn register_all<R: HotkeyRegistrar>(registrar: &mut R) -> bool {
    let mut ok = true;
    for binding in &BINDINGS {
        match registrar.register(binding) {
            Ok(()) => info!(
                "[{}][HOTKEY] Registered id={} mods=0x{:X} key=0x{:X}",
                DEBUG_NAME, binding.id, binding.modifiers, binding.key
            ),
            Err(e) => {
                error!(
                    "[{}][HOTKEY] Failed to register id={} mods=0x{:X} key=0x{:X}: {}",
                    DEBUG_NAME, binding.id, binding.modifiers, binding.key, e
                );
                ok = false;
            }
        }
    }
    ok
}

/// Best-effort removal of every binding id, registered or not.
pub fn unregister_all<R: HotkeyRegistrar>(registrar: &mut R) {
    for binding in &BINDINGS {
        let _ = registrar.unregister(binding.id);
    }
    info!("[{}][HOTKEY] Hotkeys unregistered", DEBUG_NAME);
}

/// Resolves a trigger by id, then by its modifier/key pair.
pub fn action_for(trigger: &HotkeyTrigger) -> Option<HotkeyAction> {
    let binding = BINDINGS.iter().find(|b| b.id == trigger.id).or_else(|| {
        BINDINGS
            .iter()
            .find(|b| b.modifiers == trigger.modifiers && b.key == trigger.key)
    });

    if binding.is_none() {
        warn!(
            "[{}][HOTKEY] Unknown trigger id={} mods=0x{:X} key=0x{:X}",
            DEBUG_NAME, trigger.id, trigger.modifiers, trigger.key
        );
    }

    binding.map(|b| b.action)
}
