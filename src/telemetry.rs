use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "portfolio_tracker=info,tower_http=info";

/// Installs the global subscriber. `RUST_LOG` overrides the default filter;
/// `format == "json"` selects JSON lines.
pub fn init_tracing(format: &str) -> Result<(), String> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|err| format!("invalid log filter: {err}"))?;

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if format.trim().eq_ignore_ascii_case("json") {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|err| format!("failed to install tracing subscriber: {err}"))
}
