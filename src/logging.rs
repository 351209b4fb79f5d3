use std::{
    fs::OpenOptions,
    io::Write,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, AtomicU8, Ordering},
        mpsc::{self, Sender},
        OnceLock,
    },
    thread,
    time::Duration,
};

use crate::utility::app_file;

/* =========================
   GLOBAL STATE
   ========================= */

static DEBUG: AtomicBool = AtomicBool::new(false);
static LEVEL: AtomicU8 = AtomicU8::new(Level::Warn as u8);
static LOG_PATH: OnceLock<PathBuf> = OnceLock::new();
static LOG_TX: OnceLock<Sender<LogMsg>> = OnceLock::new();

enum LogMsg {
    Line(String),
    Flush(Sender<()>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[repr(u8)]
pub enum Level {
    Error = 0,
    Warn = 1,
    Info = 2,
    Debug = 3,
}

impl Level {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(Self::Error),
            "warn" | "warning" => Some(Self::Warn),
            "info" => Some(Self::Info),
            "debug" | "trace" => Some(Self::Debug),
            _ => None,
        }
    }

    fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::Error,
            1 => Self::Warn,
            2 => Self::Info,
            _ => Self::Debug,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Warn => "WARN",
            Self::Info => "INFO",
            Self::Debug => "DEBUG",
        }
    }
}

/* =========================
   PUBLIC API
   ========================= */

pub fn init(debug: bool, level: &str) {
    if LOG_TX.get().is_some() {
        panic!("logging::init() called more than once");
    }

    configure(debug, level);
    let path = log_path().clone();
    let (tx, rx) = mpsc::channel::<LogMsg>();
    if LOG_TX.set(tx).is_err() {
        return;
    }

    thread::spawn(move || {
        let Ok(mut file) = OpenOptions::new().create(true).append(true).open(&path) else {
            return;
        };

        while let Ok(msg) = rx.recv() {
            match msg {
                LogMsg::Line(line) => {
                    let _ = writeln!(file, "{line}");
                    let _ = file.flush();
                }
                LogMsg::Flush(ack) => {
                    let _ = ack.send(());
                }
            }
        }
    });
}

/// Blocks until every line queued so far is written, or a short timeout passes.
pub fn flush() {
    let Some(tx) = LOG_TX.get() else {
        return;
    };
    let (ack_tx, ack_rx) = mpsc::channel();
    if tx.send(LogMsg::Flush(ack_tx)).is_ok() {
        let _ = ack_rx.recv_timeout(Duration::from_millis(500));
    }
}

/// Applies the debug switch and level threshold without touching the writer thread.
pub fn configure(debug: bool, level: &str) {
    DEBUG.store(debug, Ordering::Relaxed);
    let level = Level::parse(level).unwrap_or(Level::Warn);
    LEVEL.store(level as u8, Ordering::Relaxed);
}

#[inline]
pub fn should_log(level: Level) -> bool {
    passes(
        level,
        DEBUG.load(Ordering::Relaxed),
        Level::from_u8(LEVEL.load(Ordering::Relaxed)),
    )
}

fn passes(level: Level, debug: bool, threshold: Level) -> bool {
    if level <= Level::Warn {
        return true;
    }
    if debug && level == Level::Info {
        return true;
    }
    level <= threshold
}

/* =========================
   INTERNAL
   ========================= */

#[inline]
pub fn enqueue(level: Level, msg: String) {
    if let Some(tx) = LOG_TX.get() {
        let ts = timestamp();
        let _ = tx.send(LogMsg::Line(format!("{ts} [{}] {msg}", level.as_str())));
    }
}

fn timestamp() -> String {
    let now = chrono::Local::now();
    now.format("%Y-%m-%d %H:%M:%S%.3f").to_string()
}

/* =========================
   MACROS
   ========================= */

#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {{
        if $crate::logging::should_log($crate::logging::Level::Debug) {
            $crate::logging::enqueue(
                $crate::logging::Level::Debug,
                format!($($arg)*)
            );
        }
    }};
}

#[macro_export]
macro_rules! info {
    ($($arg:tt)*) => {{
        if $crate::logging::should_log($crate::logging::Level::Info) {
            $crate::logging::enqueue(
                $crate::logging::Level::Info,
                format!($($arg)*)
            );
        }
    }};
}

#[macro_export]
macro_rules! warn {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            $crate::logging::Level::Warn,
            format!($($arg)*)
        );
    }};
}

#[macro_export]
macro_rules! error {
    ($($arg:tt)*) => {{
        $crate::logging::enqueue(
            $crate::logging::Level::Error,
            format!($($arg)*)
        );
    }};
}

/* =========================
   PATH
   ========================= */

fn log_path() -> &'static PathBuf {
    LOG_PATH.get_or_init(|| app_file("lidlock.log"))
}
