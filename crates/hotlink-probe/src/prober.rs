//! Prober and background probe worker
//!
//! The adapter query blocks on an external process, so probes run on the
//! tokio blocking pool. Results go into a single-slot watch channel: each
//! completed probe replaces the previous report, so the last probe to finish
//! wins. In-flight probes are never cancelled.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::runtime::Handle;
use tokio::sync::watch;

use crate::error::ProbeError;
use crate::parser::{parse_adapter_status, ProbeOutcome, DEFAULT_ADAPTER_HEADER};
use crate::query::AdapterQuery;
use crate::Result;

pub struct Prober {
    query: Arc<dyn AdapterQuery>,
    adapter_header: String,
}

impl Prober {
    pub fn new(query: Arc<dyn AdapterQuery>) -> Self {
        Self::with_header(query, DEFAULT_ADAPTER_HEADER.to_string())
    }

    pub fn with_header(query: Arc<dyn AdapterQuery>, adapter_header: String) -> Self {
        Self {
            query,
            adapter_header,
        }
    }

    /// Run one probe. Never fails: an adapter query that cannot run is
    /// reported as no adapter.
    pub fn probe(&self) -> ProbeOutcome {
        let text = match self.query.query() {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(error = %e, "Adapter status query failed");
                return ProbeOutcome::NoAdapter;
            }
        };

        let outcome = parse_adapter_status(&text, &self.adapter_header);
        match &outcome {
            ProbeOutcome::NoAdapter => tracing::info!("Wireless adapter is not available"),
            ProbeOutcome::NotConnected { reason } => {
                tracing::info!(?reason, "Wireless adapter is not connected to a hotspot")
            }
            ProbeOutcome::Reachable { gateway } => {
                tracing::info!(gateway = %gateway, "Hotspot gateway found")
            }
        }
        outcome
    }
}

/// A completed probe
#[derive(Debug, Clone, Serialize)]
pub struct ProbeReport {
    /// Request number, increasing per `spawn` call
    pub generation: u64,
    pub outcome: ProbeOutcome,
    pub completed_at: DateTime<Utc>,
}

pub struct ProbeWorker {
    prober: Arc<Prober>,
    runtime: Handle,
    generation: AtomicU64,
    reports: Arc<watch::Sender<Option<ProbeReport>>>,
}

impl ProbeWorker {
    pub fn new(prober: Prober, runtime: Handle) -> Self {
        let (reports, _) = watch::channel(None);
        Self {
            prober: Arc::new(prober),
            runtime,
            generation: AtomicU64::new(0),
            reports: Arc::new(reports),
        }
    }

    /// Create a worker on the runtime the caller is running in
    pub fn from_current(prober: Prober) -> Result<Self> {
        let runtime = Handle::try_current().map_err(|_| ProbeError::NoRuntime)?;
        Ok(Self::new(prober, runtime))
    }

    /// Start a probe in the background and return its generation
    pub fn spawn(&self) -> u64 {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let prober = Arc::clone(&self.prober);
        let reports = Arc::clone(&self.reports);

        tracing::debug!(generation, "Starting probe");

        self.runtime.spawn_blocking(move || {
            let report = ProbeReport {
                generation,
                outcome: prober.probe(),
                completed_at: Utc::now(),
            };
            reports.send_modify(|slot| {
                if let Some(previous) = slot.as_ref() {
                    if previous.generation > generation {
                        tracing::debug!(
                            generation,
                            newer = previous.generation,
                            "Older probe finished last and replaces the newer result"
                        );
                    }
                }
                *slot = Some(report);
            });
        });

        generation
    }

    /// Generation of the most recently requested probe
    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<ProbeReport>> {
        self.reports.subscribe()
    }
}
