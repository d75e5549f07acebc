//! Prometheus-backed metrics and HTTP exporter.
//!
//! This module defines a [`MetricsRegistry`] that owns a Prometheus
//! registry and a set of strongly-typed ledger metrics, and an async HTTP
//! exporter that serves `/metrics` using `hyper`.

use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use bytes::Bytes;
use http_body_util::Full;
use hyper::{
    Method, Request, Response, StatusCode, body::Incoming, header, header::HeaderValue,
    server::conn::http1, service::service_fn,
};
use hyper_util::rt::TokioIo;
use tokio::net::TcpListener;

use prometheus::{
    self, Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Opts, Registry, TextEncoder,
};

/// Ledger-related Prometheus metrics.
///
/// These are registered into a [`Registry`] and updated by
/// [`SharedLedger`](crate::chain::SharedLedger) when attached to it.
#[derive(Clone)]
pub struct LedgerMetrics {
    /// Certificates accepted into the pending batch.
    pub certificates_added: IntCounter,
    /// Submissions rejected because the hash was already known.
    pub duplicate_certificates: IntCounter,
    /// Blocks sealed from the pending batch.
    pub blocks_mined: IntCounter,
    /// Integrity checks that found a broken chain.
    pub integrity_failures: IntCounter,
    /// Committed blocks, genesis included.
    pub chain_length: IntGauge,
    /// Certificates waiting for the next block.
    pub pending_certificates: IntGauge,
    /// Latency of a full chain-integrity check, in seconds.
    pub integrity_check_seconds: Histogram,
}

impl LedgerMetrics {
    /// Registers ledger metrics into the given `Registry`.
    pub fn register(registry: &Registry) -> Result<Self, prometheus::Error> {
        let certificates_added = IntCounter::with_opts(Opts::new(
            "ledger_certificates_added_total",
            "Total number of certificates accepted into the pending batch",
        ))?;
        registry.register(Box::new(certificates_added.clone()))?;

        let duplicate_certificates = IntCounter::with_opts(Opts::new(
            "ledger_duplicate_certificates_total",
            "Total number of submissions rejected as already present",
        ))?;
        registry.register(Box::new(duplicate_certificates.clone()))?;

        let blocks_mined = IntCounter::with_opts(Opts::new(
            "ledger_blocks_mined_total",
            "Total number of blocks sealed from the pending batch",
        ))?;
        registry.register(Box::new(blocks_mined.clone()))?;

        let integrity_failures = IntCounter::with_opts(Opts::new(
            "ledger_integrity_failures_total",
            "Total number of integrity checks that found a broken chain",
        ))?;
        registry.register(Box::new(integrity_failures.clone()))?;

        let chain_length = IntGauge::with_opts(Opts::new(
            "ledger_chain_length",
            "Number of committed blocks, genesis included",
        ))?;
        registry.register(Box::new(chain_length.clone()))?;

        let pending_certificates = IntGauge::with_opts(Opts::new(
            "ledger_pending_certificates",
            "Number of certificates waiting for the next block",
        ))?;
        registry.register(Box::new(pending_certificates.clone()))?;

        let integrity_check_seconds = Histogram::with_opts(
            HistogramOpts::new(
                "ledger_integrity_check_seconds",
                "Time to verify linkage and hashes across the whole chain in seconds",
            )
            .buckets(vec![
                0.0001, 0.0005, 0.001, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0,
            ]),
        )?;
        registry.register(Box::new(integrity_check_seconds.clone()))?;

        Ok(Self {
            certificates_added,
            duplicate_certificates,
            blocks_mined,
            integrity_failures,
            chain_length,
            pending_certificates,
            integrity_check_seconds,
        })
    }

    /// Sets both size gauges from the current ledger state.
    pub fn observe_sizes(&self, chain_length: usize, pending: usize) {
        self.chain_length.set(chain_length as i64);
        self.pending_certificates.set(pending as i64);
    }
}

/// Wrapper around a Prometheus registry and the ledger metrics.
///
/// This is the main handle you pass around in the service. It can be
/// wrapped in an [`Arc`] and shared across threads/tasks.
#[derive(Clone)]
pub struct MetricsRegistry {
    registry: Registry,
    pub ledger: LedgerMetrics,
}

impl MetricsRegistry {
    /// Creates a new `MetricsRegistry` with a fresh underlying `Registry`
    /// and registers the ledger metrics.
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new_custom(Some("certledger".to_string()), None)?;
        let ledger = LedgerMetrics::register(&registry)?;
        Ok(Self { registry, ledger })
    }

    /// Encodes all metrics in this registry into the Prometheus text format.
    pub fn gather_text(&self) -> String {
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        let encoder = TextEncoder::new();
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("failed to encode Prometheus metrics: {e}");
            return String::new();
        }
        String::from_utf8(buffer).unwrap_or_default()
    }
}

/// Runs an HTTP server that exposes Prometheus metrics.
///
/// The server listens on `addr` and serves `GET /metrics` with the
/// Prometheus text exposition format. All other paths return 404.
///
/// This function is `async` and is intended to be spawned onto a Tokio
/// runtime, e.g.:
///
/// ```ignore
/// let registry = Arc::new(MetricsRegistry::new()?);
/// let addr: SocketAddr = "127.0.0.1:9898".parse()?;
/// tokio::spawn(run_prometheus_http_server(registry.clone(), addr));
/// ```
pub async fn run_prometheus_http_server(
    metrics: Arc<MetricsRegistry>,
    addr: SocketAddr,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let listener = TcpListener::bind(addr).await?;

    loop {
        let (stream, _) = listener.accept().await?;
        let io = TokioIo::new(stream);
        let metrics = metrics.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let metrics = metrics.clone();
                handle_request(req, metrics)
            });

            if let Err(err) = http1::Builder::new().serve_connection(io, svc).await {
                tracing::warn!("prometheus HTTP server error: {err}");
            }
        });
    }
}

async fn handle_request(
    req: Request<Incoming>,
    metrics: Arc<MetricsRegistry>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    Ok(route(req.method(), req.uri().path(), &metrics))
}

fn route(method: &Method, path: &str, metrics: &MetricsRegistry) -> Response<Full<Bytes>> {
    match (method, path) {
        (&Method::GET, "/metrics") => {
            let mut response = Response::new(Full::new(Bytes::from(metrics.gather_text())));
            response.headers_mut().insert(
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/plain; version=0.0.4"),
            );
            response
        }
        _ => {
            let mut response = Response::new(Full::new(Bytes::from("not found")));
            *response.status_mut() = StatusCode::NOT_FOUND;
            response
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prometheus::Registry;

    #[test]
    fn ledger_metrics_register_and_record() {
        let registry = Registry::new();
        let metrics = LedgerMetrics::register(&registry).expect("register metrics");

        metrics.certificates_added.inc();
        metrics.duplicate_certificates.inc();
        metrics.blocks_mined.inc();
        metrics.integrity_failures.inc();
        metrics.observe_sizes(3, 1);
        metrics.integrity_check_seconds.observe(0.002);

        assert_eq!(metrics.chain_length.get(), 3);
        assert_eq!(metrics.pending_certificates.get(), 1);
        assert!(!registry.gather().is_empty());
    }

    #[test]
    fn metrics_registry_gather_text_works() {
        let registry = MetricsRegistry::new().expect("create metrics registry");
        registry.ledger.blocks_mined.inc();
        let text = registry.gather_text();
        assert!(text.contains("certledger_ledger_blocks_mined_total"));
    }

    #[test]
    fn exporter_routes_only_get_metrics() {
        let registry = MetricsRegistry::new().expect("create metrics registry");

        let ok = route(&Method::GET, "/metrics", &registry);
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(
            ok.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );

        let missing = route(&Method::GET, "/other", &registry);
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);

        let wrong_method = route(&Method::POST, "/metrics", &registry);
        assert_eq!(wrong_method.status(), StatusCode::NOT_FOUND);
    }
}
