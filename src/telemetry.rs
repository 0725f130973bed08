//! Logging and OpenTelemetry export
//!
//! Console logs always go to stderr. When an OTLP endpoint is configured,
//! spans and log records are also exported over OTLP/HTTP.

use anyhow::{Context, Result};
use opentelemetry::{KeyValue, trace::TracerProvider as _};
use opentelemetry_appender_tracing::layer::OpenTelemetryTracingBridge;
use opentelemetry_otlp::{LogExporter, SpanExporter, WithExportConfig};
use opentelemetry_sdk::{Resource, logs::SdkLoggerProvider, trace::SdkTracerProvider};
use opentelemetry_semantic_conventions::resource::SERVICE_VERSION;
use tracing_subscriber::{
    EnvFilter, Layer, Registry, layer::SubscriberExt, util::SubscriberInitExt,
};

use crate::config::{LoggingConfig, TelemetryConfig};

/// Flushes and shuts down the exporters when dropped
#[derive(Default)]
pub struct TelemetryGuard {
    tracer_provider: Option<SdkTracerProvider>,
    logger_provider: Option<SdkLoggerProvider>,
}

impl Drop for TelemetryGuard {
    fn drop(&mut self) {
        if let Some(provider) = self.tracer_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down tracer provider: {e}");
            }
        }
        if let Some(provider) = self.logger_provider.take() {
            if let Err(e) = provider.shutdown() {
                eprintln!("Failed to shut down logger provider: {e}");
            }
        }
    }
}

/// `RUST_LOG` wins over the configured level
fn env_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{level},hyper=warn,h2=warn,reqwest=warn")))
}

pub fn init(logging: &LoggingConfig, telemetry: &TelemetryConfig, verbose: bool) -> Result<TelemetryGuard> {
    let level = if verbose { "debug" } else { logging.level.as_str() };

    let mut layers: Vec<Box<dyn Layer<Registry> + Send + Sync>> = Vec::new();
    layers.push(match logging.format.as_str() {
        "json" => tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .boxed(),
        _ => tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .boxed(),
    });

    let mut guard = TelemetryGuard::default();
    if let Some(endpoint) = &telemetry.otlp_endpoint {
        let endpoint = endpoint.trim_end_matches('/');
        let resource = Resource::builder()
            .with_service_name(telemetry.service_name.clone())
            .with_attribute(KeyValue::new(SERVICE_VERSION, crate::VERSION))
            .build();

        let span_exporter = SpanExporter::builder()
            .with_http()
            .with_endpoint(format!("{endpoint}/v1/traces"))
            .build()
            .context("Failed to create OTLP span exporter")?;
        let tracer_provider = SdkTracerProvider::builder()
            .with_resource(resource.clone())
            .with_batch_exporter(span_exporter)
            .build();
        let tracer = tracer_provider.tracer(telemetry.service_name.clone());
        layers.push(tracing_opentelemetry::layer().with_tracer(tracer).boxed());

        let log_exporter = LogExporter::builder()
            .with_http()
            .with_endpoint(format!("{endpoint}/v1/logs"))
            .build()
            .context("Failed to create OTLP log exporter")?;
        let logger_provider = SdkLoggerProvider::builder()
            .with_resource(resource)
            .with_batch_exporter(log_exporter)
            .build();
        layers.push(OpenTelemetryTracingBridge::new(&logger_provider).boxed());

        guard.tracer_provider = Some(tracer_provider);
        guard.logger_provider = Some(logger_provider);
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(env_filter(level))
        .try_init()
        .context("Failed to install tracing subscriber")?;

    if let Some(endpoint) = &telemetry.otlp_endpoint {
        tracing::info!("Exporting traces and logs to {}", endpoint);
    }
    Ok(guard)
}
