use std::fs::{self, OpenOptions};
use std::path::PathBuf;

use env_logger::{Builder, Env, Target};

use crate::config::LogConfig;

/// Route `log` output to a file; the terminal belongs to the UI.
///
/// `RUST_LOG` wins over the configured level. Returns the file in use, or
/// `None` when no log file could be opened (logging is then disabled).
pub fn init(config: &LogConfig) -> Option<PathBuf> {
    let path = config.file_path()?;
    if let Some(dir) = path.parent() {
        if let Err(err) = fs::create_dir_all(dir) {
            eprintln!("Cannot create log directory {}: {}", dir.display(), err);
            return None;
        }
    }
    let file = match OpenOptions::new().create(true).append(true).open(&path) {
        Ok(file) => file,
        Err(err) => {
            eprintln!("Cannot open log file {}: {}", path.display(), err);
            return None;
        }
    };

    let result = Builder::from_env(Env::default().default_filter_or(config.level.as_str()))
        .target(Target::Pipe(Box::new(file)))
        .format_timestamp_millis()
        .try_init();
    match result {
        Ok(()) => Some(path),
        Err(_) => None,
    }
}
