//! Process-wide tracing setup.
use std::sync::Once;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Environment variable holding a tracing filter directive.
pub const LOG_ENV: &str = "NETLAUNCH_LOG";

static INIT: Once = Once::new();

/// Filter used when neither `NETLAUNCH_LOG` nor `RUST_LOG` is set.
pub fn default_directive(verbose: bool) -> &'static str {
    if verbose {
        "netlaunch=debug"
    } else {
        "netlaunch=warn"
    }
}

/// Install the stderr subscriber once; later calls are no-ops.
pub fn init(verbose: bool) {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(LOG_ENV)
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new(default_directive(verbose)));
        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .without_time()
                    .with_writer(std::io::stderr),
            )
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_raises_crate_level() {
        assert_eq!(default_directive(false), "netlaunch=warn");
        assert_eq!(default_directive(true), "netlaunch=debug");
    }

    #[test]
    fn repeated_init_is_harmless() {
        init(false);
        init(true);
        tracing::debug!("after init");
    }
}
