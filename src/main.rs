#![windows_subsystem = "windows"]
#![cfg_attr(not(windows), allow(dead_code))]

mod actions;
mod data_loaders;
mod dispatch;
mod hotkeys;
mod logging;
mod notification;
#[cfg(windows)]
mod platform;
mod session;
mod startup;
mod utility;
mod wallpaper;

use crate::{data_loaders::config::LidLockSettings, utility::app_file};

pub const DEBUG_NAME: &str = "LIDLOCK";

fn main() {
	let settings_path = app_file("lidlock.yaml");
	let settings = LidLockSettings::load(&settings_path).unwrap_or_default();

	logging::init(settings.diagnostics.debug, &settings.diagnostics.log_level);
	std::panic::set_hook(Box::new(|panic_info| {
		error!("[{}] Panic: {}", DEBUG_NAME, panic_info);
		logging::flush();
	}));

	info!("!---------- [{}] Starting LidLock ----------!", DEBUG_NAME);
	info!("[{}] Settings path {}", DEBUG_NAME, settings_path.display());

	let code = run(&settings);

	info!("[{}] Exiting with code {}", DEBUG_NAME, code);
	logging::flush();
	std::process::exit(code);
}

#[cfg(windows)]
fn run(settings: &LidLockSettings) -> i32 {
	if settings.runtime.realtime_priority {
		platform::elevate_priority();
	}

	match serve() {
		Ok(code) => code,
		Err(e) => {
			error!("[{}][SETUP] {}", DEBUG_NAME, e);
			platform::alert(&e.to_string());
			e.exit_code()
		}
	}
}

/// Sets up every subscription in order, pumps until quit, then tears down in reverse.
#[cfg(windows)]
fn serve() -> Result<i32, startup::StartupError> {
	use crate::{
		dispatch::LidLock,
		platform::{
			ComApartment, LidSubscription, MessagePump, MessageWindow, SessionSubscription,
			ShellWallpaperFactory, Win32Desktop, Win32Hotkeys,
		},
		startup::StartupError,
	};

	let window = MessageWindow::create()?;

	let mut registrar = Win32Hotkeys::new(window.hwnd());
	if !hotkeys::register_all(&mut registrar) {
		return Err(StartupError::Hotkeys);
	}

	let _lid = LidSubscription::register(&window)?;
	let _session = SessionSubscription::register(&window)?;
	let _com = ComApartment::init()?;

	let mut lidlock = LidLock::new(Win32Desktop, ShellWallpaperFactory);
	let code = lidlock.run(&mut MessagePump);

	// The wallpaper handle must go before COM is torn down.
	lidlock.shutdown();
	drop(lidlock);

	Ok(code)
}

#[cfg(not(windows))]
fn run(_settings: &LidLockSettings) -> i32 {
	error!("[{}] LidLock only runs on Windows", DEBUG_NAME);
	eprintln!("lidlock: this program only runs on Windows");
	1
}
