use std::fs::{self, OpenOptions};
use std::io;
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Where log lines go.
pub enum LogTarget<'a> {
    Stderr,
    /// Used by the terminal UI so log lines do not land on the alternate screen.
    File(&'a Path),
}

/// Installs the global subscriber. `RUST_LOG` wins over `filter` when set.
pub fn init_tracing(target: LogTarget<'_>, filter: &str) -> io::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    let registry = tracing_subscriber::registry().with(env_filter);
    let installed = match target {
        LogTarget::Stderr => registry
            .with(fmt::layer().with_writer(io::stderr).with_target(false))
            .try_init(),
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            let file = OpenOptions::new().create(true).append(true).open(path)?;
            registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init()
        }
    };
    installed.map_err(|err| io::Error::new(io::ErrorKind::Other, err.to_string()))
}
