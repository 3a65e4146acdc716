use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock};

use tracing_subscriber::EnvFilter;
use chrono::{DateTime, Local};

use crate::get_create_hymnal_dir;

/// Log levels representing increasing verbosity.
///
/// Setting a level enables that level and all less verbose levels below it:
///
/// - **Silent (0)**: No logging output
/// - **Error (1)**: Only error messages
/// - **Warn (2)**: Warning and error messages
/// - **Info (3)**: Informational, warning, and error messages (default)
/// - **Debug (4)**: All messages
///
/// The level can be set with the `LOG_LEVEL` environment variable or at runtime
/// with `set_log_level()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Silent = 0,
    Error = 1,
    Warn = 2,
    Info = 3,
    Debug = 4,
}

impl Level {
    /// Parse a log level from a string (case insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "silent" => Some(Level::Silent),
            "error" => Some(Level::Error),
            "warn" => Some(Level::Warn),
            "info" => Some(Level::Info),
            "debug" => Some(Level::Debug),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Silent => "Silent",
            Level::Error => "Error",
            Level::Warn => "Warn",
            Level::Info => "Info",
            Level::Debug => "Debug",
        }
    }
}

/// Rotates log files, keeping only the last 5 log files
fn rotate_log_files(log_file: &Path) -> Result<(), Box<dyn std::error::Error>> {
    match log_file.try_exists() {
        Ok(true) => {}
        Ok(false) | Err(_) => return Ok(()),
    }

    let metadata = std::fs::metadata(log_file)?;
    let datetime: DateTime<Local> = metadata.modified()?.into();
    let timestamp = datetime.format("%Y-%m-%dT%H-%M-%S");

    let parent = log_file.parent().ok_or("No parent directory")?;
    let new_path = parent.join(format!("log.{}.txt", timestamp));

    std::fs::rename(log_file, &new_path)?;

    let mut log_files: Vec<PathBuf> = std::fs::read_dir(parent)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            if let Some(filename) = path.file_name().and_then(|n| n.to_str()) {
                filename.starts_with("log.") && filename.ends_with(".txt") && filename != "log.txt"
            } else {
                false
            }
        })
        .collect();

    // Sorts by datetime
    log_files.sort();

    if log_files.len() > 5 {
        for file in &log_files[0..log_files.len() - 5] {
            if let Err(e) = std::fs::remove_file(file) {
                eprintln!("Failed to remove old log file {:?}: {}", file, e);
            }
        }
    }

    Ok(())
}

pub struct Logger {
    log_file: PathBuf,
    disable_log: bool,
    enable_print_log: bool,
    level: Arc<Mutex<Level>>,
}

impl Logger {
    pub fn new() -> Result<Self, Box<dyn std::error::Error>> {
        let data_dir = get_create_hymnal_dir()
            .map_err(|e| format!("Failed to get hymnal_dir: {}", e))?;

        std::fs::create_dir_all(&data_dir)?;
        let log_file = data_dir.join("log.txt");

        if let Err(e) = rotate_log_files(&log_file) {
            eprintln!("Failed to rotate log files: {}", e);
        }

        let disable_log = std::env::var("DISABLE_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let enable_print_log = std::env::var("ENABLE_PRINT_LOG")
            .map(|v| v.to_lowercase() == "true")
            .unwrap_or(false);

        let level = std::env::var("LOG_LEVEL")
            .ok()
            .and_then(|v| Level::from_str(&v))
            .unwrap_or(Level::Info);

        Ok(Logger {
            log_file,
            disable_log,
            enable_print_log,
            level: Arc::new(Mutex::new(level)),
        })
    }

    fn disabled() -> Self {
        Logger {
            log_file: PathBuf::new(),
            disable_log: true,
            enable_print_log: false,
            level: Arc::new(Mutex::new(Level::Info)),
        }
    }

    pub fn init_tracing() -> Result<(), Box<dyn std::error::Error>> {
        let env_filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .with_file(false)
            .with_line_number(false)
            .with_writer(std::io::stderr)
            .finish();

        tracing::subscriber::set_global_default(subscriber)?;

        Ok(())
    }

    fn write_to_file(&self, message: &str) -> Result<(), Box<dyn std::error::Error>> {
        if self.disable_log {
            return Ok(());
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)?;

        let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S%.3fZ");
        let log_line = format!("[{}] {}\n", timestamp, message);

        file.write_all(log_line.as_bytes())?;

        Ok(())
    }

    fn enabled(&self, at: Level) -> bool {
        self.level.lock().map(|level| *level >= at).unwrap_or(true)
    }

    pub fn debug(&self, msg: &str) {
        if !self.enabled(Level::Debug) {
            return;
        }
        if self.enable_print_log {
            tracing::debug!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("DEBUG: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn info(&self, msg: &str) {
        if !self.enabled(Level::Info) {
            return;
        }
        if self.enable_print_log {
            tracing::info!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("INFO: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn warn(&self, msg: &str) {
        if !self.enabled(Level::Warn) {
            return;
        }
        if self.enable_print_log {
            tracing::warn!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("WARN: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    pub fn error(&self, msg: &str) {
        if !self.enabled(Level::Error) {
            return;
        }
        if self.enable_print_log {
            tracing::error!("{}", msg);
        }
        if let Err(e) = self.write_to_file(&format!("ERROR: {}", msg)) {
            eprintln!("Failed to write to log file: {}", e);
        }
    }

    /// Returns Level::Info if the lock cannot be acquired.
    pub fn get_level(&self) -> Level {
        self.level.lock().map(|l| *l).unwrap_or(Level::Info)
    }

    pub fn set_level(&self, new_level: Level) {
        if let Ok(mut level) = self.level.lock() {
            *level = new_level;
        }
    }
}

pub static LOGGER: OnceLock<Logger> = OnceLock::new();
static TRACING_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Set up the `tracing` subscriber. Safe to call more than once.
pub fn init_tracing() {
    TRACING_INITIALIZED.get_or_init(|| {
        if let Err(e) = Logger::init_tracing() {
            eprintln!("Failed to initialize tracing: {}", e);
        }
    });
}

fn with_logger<F, R>(f: F) -> R
where
    F: FnOnce(&Logger) -> R,
{
    init_tracing();

    let logger = LOGGER.get_or_init(|| {
        match Logger::new() {
            Ok(logger) => logger,
            Err(e) => {
                eprintln!("Failed to create logger: {}", e);
                Logger::disabled()
            }
        }
    });

    f(logger)
}

pub fn info(msg: &str) {
    with_logger(|logger| logger.info(msg));
}

pub fn warn(msg: &str) {
    with_logger(|logger| logger.warn(msg));
}

pub fn error(msg: &str) {
    with_logger(|logger| logger.error(msg));
}

pub fn debug(msg: &str) {
    with_logger(|logger| logger.debug(msg));
}

pub fn get_log_level() -> Level {
    with_logger(|logger| logger.get_level())
}

pub fn set_log_level(level: Level) {
    with_logger(|logger| logger.set_level(level));
}
