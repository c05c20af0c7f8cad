use tracing_subscriber::EnvFilter;

/// Filter for a `-v` count; zero keeps the configured level.
pub fn level_for(verbose: u8, configured: &str) -> &str {
    match verbose {
        0 => configured,
        1 => "debug",
        _ => "trace",
    }
}

/// Install the stderr subscriber. `RUST_LOG` overrides `filter`.
pub fn init(filter: &str) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbosity_raises_level() {
        assert_eq!(level_for(0, "warn"), "warn");
        assert_eq!(level_for(1, "warn"), "debug");
        assert_eq!(level_for(4, "warn"), "trace");
    }
}
