use tracing_subscriber::EnvFilter;

/// Install the stderr subscriber. `LARDER_LOG` takes precedence over
/// `RUST_LOG`; without either, `-v` flags pick the level.
pub fn init_tracing(verbose: u8) {
    let default_filter = match verbose {
        0 => "warn",
        1 => "info,larder=info,larder_core=info",
        _ => "debug,larder=debug,larder_core=debug",
    };

    let filter = std::env::var("LARDER_LOG")
        .ok()
        .and_then(|value| EnvFilter::try_new(value).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(verbose > 1)
        .compact()
        .try_init();
}
