use std::env;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_port: u16,
    pub allowed_origin: String,
    pub rate_limit_cooldown_ms: u64,
    pub rate_limit_prune_interval_secs: u64,
    pub delivery_timeout_ms: u64,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            server_port: env_or("PORT", 8081),
            allowed_origin: env::var("CORS_ALLOWED_ORIGIN")
                .unwrap_or_else(|_| "http://localhost:4200".to_string()),
            rate_limit_cooldown_ms: env_or("RATE_LIMIT_COOLDOWN_MS", 2000),
            rate_limit_prune_interval_secs: env_or("RATE_LIMIT_PRUNE_INTERVAL_SECS", 60),
            delivery_timeout_ms: env_or("DELIVERY_TIMEOUT_MS", 5000),
        }
    }

    pub fn rate_limit_cooldown(&self) -> Duration {
        Duration::from_millis(self.rate_limit_cooldown_ms)
    }

    pub fn rate_limit_prune_interval(&self) -> Duration {
        // intervalo zero faria o tokio::time::interval entrar em pânico
        Duration::from_secs(self.rate_limit_prune_interval_secs.max(1))
    }

    pub fn delivery_timeout(&self) -> Duration {
        // zero derrubaria todo subscriber cuja escrita não termina no primeiro poll
        Duration::from_millis(self.delivery_timeout_ms.max(1))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server_port: 8081,
            allowed_origin: "http://localhost:4200".to_string(),
            rate_limit_cooldown_ms: 2000,
            rate_limit_prune_interval_secs: 60,
            delivery_timeout_ms: 5000,
        }
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(default)
}
