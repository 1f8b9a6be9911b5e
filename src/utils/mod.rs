use std::{
    env,
    io::{self, IsTerminal},
    sync::Once,
};

use tracing_subscriber::{fmt, EnvFilter};

static TRACING_INIT: Once = Once::new();

const DEFAULT_DIRECTIVE: &str = "savings_core=info";

/// Installs the global tracing subscriber on stderr. A non-empty, valid
/// `RUST_LOG` replaces the `savings_core=info` default; colour is only used
/// when stderr is a terminal.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        let filter = build_filter(env::var("RUST_LOG").ok().as_deref());
        let _ = fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_ansi(io::stderr().is_terminal())
            .try_init();
    });
}

pub(crate) fn build_filter(rust_log: Option<&str>) -> EnvFilter {
    rust_log
        .filter(|raw| !raw.trim().is_empty())
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_DIRECTIVE))
}
