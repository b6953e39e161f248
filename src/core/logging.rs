use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install the global subscriber. `RUST_LOG` wins over
/// `default_level`, which applies to this crate only.
pub fn init_tracing(default_level: &str) {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                // axum logs rejections from built-in extractors with the `axum::rejection`
                // target, at `TRACE` level. `axum::rejection=trace` enables showing those events
                format! {
                    "{}={},tower_http=debug,axum::rejection=trace",
                    env!("CARGO_CRATE_NAME"),
                    default_level
                }
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
