use std::sync::Once;

use metrics::{Unit, describe_counter, describe_histogram};
use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

static METRIC_DESCRIPTIONS: Once = Once::new();

/// Install a global tracing subscriber using the provided logging settings.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    describe_metrics();

    let env_filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .from_env_lossy();

    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer().compact().with_target(true).boxed(),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| {
            InfraError::telemetry(format!("failed to install tracing subscriber: {err}"))
        })
}

pub fn describe_metrics() {
    METRIC_DESCRIPTIONS.call_once(|| {
        describe_counter!(
            "tintero_content_api_requests_total",
            Unit::Count,
            "Content API requests by endpoint and outcome."
        );
        describe_histogram!(
            "tintero_content_api_latency_ms",
            Unit::Milliseconds,
            "Content API round-trip latency in milliseconds."
        );
        describe_counter!(
            "tintero_render_unsupported_blocks_total",
            Unit::Count,
            "Blocks rendered through the unsupported fallback, by kind."
        );
        describe_counter!(
            "tintero_render_truncated_total",
            Unit::Count,
            "Toggle subtrees cut off at the maximum nesting depth."
        );
        describe_histogram!(
            "tintero_render_ms",
            Unit::Milliseconds,
            "Article render latency in milliseconds."
        );
    });
}
