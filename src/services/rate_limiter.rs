use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tracing::debug;

/// Um request aceito por cliente a cada `cooldown`. Cooldown zero desliga.
pub struct RateLimiter {
    cooldown: Duration,
    last_seen: DashMap<String, Instant>,
}

impl RateLimiter {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            last_seen: DashMap::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::new(Duration::ZERO)
    }

    pub fn cooldown(&self) -> Duration {
        self.cooldown
    }

    pub fn is_enabled(&self) -> bool {
        !self.cooldown.is_zero()
    }

    // Err carrega quanto o cliente ainda precisa esperar
    pub fn check(&self, client: &str) -> Result<(), Duration> {
        self.check_at(client, Instant::now())
    }

    fn check_at(&self, client: &str, now: Instant) -> Result<(), Duration> {
        if !self.is_enabled() {
            return Ok(());
        }

        // entry() segura o shard: check-and-set atômico por cliente
        match self.last_seen.entry(client.to_string()) {
            Entry::Vacant(vacant) => {
                vacant.insert(now);
                Ok(())
            }
            Entry::Occupied(mut occupied) => {
                let elapsed = now.saturating_duration_since(*occupied.get());
                if elapsed < self.cooldown {
                    return Err(self.cooldown - elapsed);
                }
                occupied.insert(now);
                Ok(())
            }
        }
    }

    pub fn prune(&self) -> usize {
        self.prune_at(Instant::now())
    }

    fn prune_at(&self, now: Instant) -> usize {
        let before = self.last_seen.len();
        self.last_seen
            .retain(|_, last| now.saturating_duration_since(*last) < self.cooldown);
        let pruned = before.saturating_sub(self.last_seen.len());
        if pruned > 0 {
            debug!("Pruned {} rate limiter entries", pruned);
        }
        pruned
    }

    pub fn tracked_clients(&self) -> usize {
        self.last_seen.len()
    }
}
