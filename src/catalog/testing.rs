//! Shared mocks for cache and service tests.

use super::clock::ManualClock;
use super::models::{DetailsRecord, MetadataRecord};
use super::source::RecordSource;
use crate::error::SourceError;
use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

/// Mock record source that counts loads and can fail, block or panic on demand.
#[derive(Default)]
pub struct MockSource {
    metadata: Mutex<Vec<MetadataRecord>>,
    details: Mutex<Vec<DetailsRecord>>,
    metadata_calls: AtomicU32,
    details_calls: AtomicU32,
    fail: AtomicBool,
    panic_once: AtomicBool,
    /// Signalled when a metadata load starts
    pub started: Notify,
    /// When set, metadata loads wait for a permit before returning
    gate: Option<Notify>,
}

impl MockSource {
    pub fn new(metadata: Vec<MetadataRecord>, details: Vec<DetailsRecord>) -> Self {
        Self { metadata: Mutex::new(metadata), details: Mutex::new(details), ..Default::default() }
    }

    /// Makes every load block until [`MockSource::release`] is called.
    pub fn gated(mut self) -> Self {
        self.gate = Some(Notify::new());
        self
    }

    pub fn release(&self) {
        if let Some(gate) = &self.gate {
            gate.notify_one();
        }
    }

    pub fn set_fail(&self, fail: bool) {
        self.fail.store(fail, Ordering::SeqCst);
    }

    pub fn panic_next(&self) {
        self.panic_once.store(true, Ordering::SeqCst);
    }

    pub fn set_records(&self, metadata: Vec<MetadataRecord>, details: Vec<DetailsRecord>) {
        *self.metadata.lock().unwrap() = metadata;
        *self.details.lock().unwrap() = details;
    }

    pub fn metadata_calls(&self) -> u32 {
        self.metadata_calls.load(Ordering::SeqCst)
    }

    pub fn details_calls(&self) -> u32 {
        self.details_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RecordSource for MockSource {
    async fn load_metadata(&self, _cancel: &CancellationToken) -> Result<Vec<MetadataRecord>, SourceError> {
        self.metadata_calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        if self.panic_once.swap(false, Ordering::SeqCst) {
            panic!("mock source panicked");
        }
        if self.fail.load(Ordering::SeqCst) {
            return Err(SourceError::Other("metadata unavailable".to_string()));
        }
        Ok(self.metadata.lock().unwrap().clone())
    }

    async fn load_details(&self, _cancel: &CancellationToken) -> Result<Vec<DetailsRecord>, SourceError> {
        self.details_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.details.lock().unwrap().clone())
    }
}

pub fn meta(id: &str, name: &str, base_price: f64) -> MetadataRecord {
    MetadataRecord {
        id: id.to_string(),
        name: name.to_string(),
        base_price,
        image_url: format!("https://img.example/{id}.jpg"),
        category: "shoes".to_string(),
        brand: "acme".to_string(),
    }
}

pub fn details(id: &str) -> DetailsRecord {
    DetailsRecord { id: id.to_string(), stock: 1, colors: vec!["black".to_string()], ..Default::default() }
}

/// Three-product source: Alpha (10.00), Beta (20.00), Gamma (30.00).
pub fn sample_source() -> MockSource {
    MockSource::new(
        vec![meta("p1", "Alpha", 10.0), meta("p2", "Beta", 20.0), meta("p3", "Gamma", 30.0)],
        vec![details("p1"), details("p2"), details("p3")],
    )
}

pub fn manual_clock() -> Arc<ManualClock> {
    Arc::new(ManualClock::new())
}
