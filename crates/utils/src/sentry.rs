use std::sync::OnceLock;

use sentry_tracing::{EventFilter, SentryLayer};
use tracing::Level;

static INIT_GUARD: OnceLock<Option<sentry::ClientInitGuard>> = OnceLock::new();

/// Start the Sentry client once per process. Without a DSN nothing is sent.
pub fn init_once(dsn: Option<String>) {
    INIT_GUARD.get_or_init(|| {
        let dsn = dsn.filter(|d| !d.trim().is_empty())?;
        Some(sentry::init((
            dsn,
            sentry::ClientOptions {
                release: sentry::release_name!(),
                environment: Some(
                    if cfg!(debug_assertions) { "dev" } else { "production" }.into(),
                ),
                ..Default::default()
            },
        )))
    });
}

/// Errors become Sentry events, warnings become breadcrumbs
pub fn sentry_layer<S>() -> SentryLayer<S>
where
    S: tracing::Subscriber,
    S: for<'a> tracing_subscriber::registry::LookupSpan<'a>,
{
    SentryLayer::default().event_filter(|meta| match *meta.level() {
        Level::ERROR => EventFilter::Event,
        Level::WARN | Level::INFO => EventFilter::Breadcrumb,
        _ => EventFilter::Ignore,
    })
}
