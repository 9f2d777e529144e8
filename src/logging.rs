use std::fs::OpenOptions;
use std::io;
use std::path::Path;

use env_logger::{Builder, Env, Target};
use log::LevelFilter;

/// Route log output to `path`. The terminal belongs to the TUI, so nothing
/// is ever written to stderr. `RUST_LOG` applies unless `level` is given.
pub fn init_file(path: &Path, level: Option<LevelFilter>) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;

    let mut builder = Builder::from_env(Env::default().default_filter_or("info"));
    if let Some(level) = level {
        builder.filter_level(level);
    }
    builder.target(Target::Pipe(Box::new(file)));

    if builder.try_init().is_err() {
        log::debug!("logger already initialised");
    }
    Ok(())
}
