use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub business_rules: BusinessRules,
}

#[derive(Debug, Deserialize, Clone)]
pub struct BusinessRules {
    #[serde(default = "default_car_rental_bps")]
    pub car_rental_commission_bps: i64,
    #[serde(default = "default_hotel_bps")]
    pub hotel_commission_bps: i64,
    #[serde(default = "default_hotel_featured_bps")]
    pub hotel_featured_commission_bps: i64,
    /// "allow" mirrors the historical pass-through for ungated routes;
    /// "deny" closes the perimeter.
    #[serde(default = "default_route_access")]
    pub route_access_default: String,
}

fn default_car_rental_bps() -> i64 { 500 }
fn default_hotel_bps() -> i64 { 1000 }
fn default_hotel_featured_bps() -> i64 { 1500 }
fn default_route_access() -> String { "allow".to_string() }

#[derive(Debug, Deserialize, Clone)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_expiration_seconds: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Add in the current environment file
            // Default to 'development' env
            // Note that this file is _optional_
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add in a local configuration file
            // This file shouldn't be checked in to git
            .add_source(config::File::with_name("config/local").required(false))
            // Add in settings from the environment (with a prefix of TRIPWAY)
            // Eg.. `TRIPWAY__SERVER__PORT=9000` would set the server port
            .add_source(config::Environment::with_prefix("TRIPWAY").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
