use serde::Deserialize;
use spacefy_booking::BookingPolicy;
use spacefy_shared::{ListingRecord, Locale};
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    /// Listings loaded into the in-memory catalog at startup
    #[serde(default)]
    pub listings: Vec<ListingRecord>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct BookingConfig {
    #[serde(default)]
    pub minimum_duration_minutes: u32,
    #[serde(default)]
    pub max_advance_days: Option<u32>,
    #[serde(default)]
    pub default_locale: Locale,
    /// Idle minutes before an open detail view is discarded
    #[serde(default)]
    pub session_ttl_minutes: Option<u32>,
}

impl BookingConfig {
    pub fn policy(&self) -> BookingPolicy {
        BookingPolicy {
            minimum_duration_minutes: self.minimum_duration_minutes,
            max_advance_days: self.max_advance_days,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // e.g. `SPACEFY__SERVER__PORT=8080`
            .add_source(config::Environment::with_prefix("SPACEFY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_toml_source() {
        let toml = r#"
            [server]
            port = 3000

            [booking]
            minimum_duration_minutes = 30
            max_advance_days = 180
            default_locale = "pt-BR"
            session_ttl_minutes = 45

            [[listings]]
            id = "6f1c3f0e-8d53-4d0a-9b7c-2b8f7c1d2e3f"
            title = "Sala Paulista"
            display_price = "R$ 2.000"
        "#;
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.server.port, 3000);
        assert_eq!(cfg.booking.policy().minimum_duration_minutes, 30);
        assert_eq!(cfg.booking.policy().max_advance_days, Some(180));
        assert_eq!(cfg.booking.session_ttl_minutes, Some(45));
        assert_eq!(cfg.listings.len(), 1);
        assert_eq!(cfg.listings[0].locale, Locale::PtBr);
    }

    #[test]
    fn test_booking_section_is_optional() {
        let cfg: Config = config::Config::builder()
            .add_source(config::File::from_str("[server]\nport = 8080", config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(cfg.booking.policy(), BookingPolicy::default());
        assert_eq!(cfg.booking.session_ttl_minutes, None);
        assert!(cfg.listings.is_empty());
    }
}
