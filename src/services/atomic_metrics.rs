use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Contadores do processo. Independentes entre si, sem relação de ordem com o
/// processamento dos pagamentos.
#[derive(Debug, Default)]
pub struct AtomicMetrics {
    requests: AtomicU64,
    approved: AtomicU64,
    declined: AtomicU64,
    rejected: AtomicU64,
    throttled: AtomicU64,
    processing_micros: AtomicU64,
    broadcasts: AtomicU64,
    deliveries_ok: AtomicU64,
    deliveries_failed: AtomicU64,
}

impl AtomicMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_requests(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_approved(&self) {
        self.approved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_declined(&self) {
        self.declined.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_rejected(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_throttled(&self) {
        self.throttled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_processing_time(&self, elapsed: Duration) {
        let micros = u64::try_from(elapsed.as_micros()).unwrap_or(u64::MAX);
        self.processing_micros.fetch_add(micros, Ordering::Relaxed);
    }

    pub fn increment_broadcasts(&self) {
        self.broadcasts.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_delivered(&self) {
        self.deliveries_ok.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_delivery_failed(&self) {
        self.deliveries_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    pub fn get_approved(&self) -> u64 {
        self.approved.load(Ordering::Relaxed)
    }

    pub fn get_declined(&self) -> u64 {
        self.declined.load(Ordering::Relaxed)
    }

    pub fn get_rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }

    pub fn get_throttled(&self) -> u64 {
        self.throttled.load(Ordering::Relaxed)
    }

    pub fn get_broadcasts(&self) -> u64 {
        self.broadcasts.load(Ordering::Relaxed)
    }

    pub fn get_delivered(&self) -> u64 {
        self.deliveries_ok.load(Ordering::Relaxed)
    }

    pub fn get_delivery_failed(&self) -> u64 {
        self.deliveries_failed.load(Ordering::Relaxed)
    }

    /// Tempo médio por request em milissegundos; zero antes do primeiro request.
    pub fn avg_processing_ms(&self) -> f64 {
        let requests = self.get_requests();
        if requests == 0 {
            return 0.0;
        }
        self.processing_micros.load(Ordering::Relaxed) as f64 / requests as f64 / 1000.0
    }
}
