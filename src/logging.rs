use tracing_subscriber::{fmt, EnvFilter};

/// Set to `1` or `true` to emit JSON lines instead of the compact format.
pub const LOG_JSON_ENV: &str = "TOKENLAUNCH_LOG_JSON";

const DEFAULT_DIRECTIVE: &str = "tokenlaunch=info";

/// Install the stderr subscriber for the launcher binary. `RUST_LOG` overrides
/// the default `tokenlaunch=info` filter. Calling this twice is harmless.
pub fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_DIRECTIVE));
    let json = json_requested(std::env::var(LOG_JSON_ENV).ok().as_deref());

    let builder = fmt::Subscriber::builder().with_env_filter(env_filter).with_writer(std::io::stderr);
    let _ = if json {
        builder.json().try_init()
    } else {
        builder.compact().with_target(false).try_init()
    };
}

fn json_requested(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some(v) if v == "1" || v.eq_ignore_ascii_case("true"))
}
