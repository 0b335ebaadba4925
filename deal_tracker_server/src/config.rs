use std::{env, fmt::Display, str::FromStr};

use log::*;

const DEFAULT_DT_HOST: &str = "127.0.0.1";
const DEFAULT_DT_PORT: u16 = 8370;
const DEFAULT_DT_DATABASE_URL: &str = "sqlite://data/deal_tracker.db";
const DEFAULT_MAX_CONNECTIONS: u32 = 25;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// The size of the database connection pool.
    pub max_connections: u32,
    /// If true, the database file is created if it does not exist, and the schema migrations are run on start-up.
    pub create_database: bool,
    /// If true, a sample deal is inserted on start-up. Handy for inspecting the JSON shape of a deal.
    pub seed_demo_deal: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_DT_HOST.to_string(),
            port: DEFAULT_DT_PORT,
            database_url: DEFAULT_DT_DATABASE_URL.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            create_database: true,
            seed_demo_deal: false,
        }
    }
}

impl ServerConfig {
    pub fn new(host: &str, port: u16) -> Self {
        Self { host: host.to_string(), port, ..Default::default() }
    }

    pub fn from_env_or_default() -> Self {
        let host = env::var("DT_HOST").ok().unwrap_or_else(|| DEFAULT_DT_HOST.into());
        let port = parse_or_default("DT_PORT", env::var("DT_PORT").ok(), DEFAULT_DT_PORT);
        let database_url = env::var("DT_DATABASE_URL").ok().unwrap_or_else(|| {
            info!("🪛️ DT_DATABASE_URL is not set. Using the default, {DEFAULT_DT_DATABASE_URL}.");
            DEFAULT_DT_DATABASE_URL.into()
        });
        let max_connections =
            parse_or_default("DT_MAX_CONNECTIONS", env::var("DT_MAX_CONNECTIONS").ok(), DEFAULT_MAX_CONNECTIONS);
        let create_database = flag_or_default(env::var("DT_CREATE_DATABASE").ok(), true);
        let seed_demo_deal = flag_or_default(env::var("DT_SEED_DEMO_DEAL").ok(), false);
        Self { host, port, database_url, max_connections, create_database, seed_demo_deal }
    }
}

fn parse_or_default<T>(name: &str, value: Option<String>, default: T) -> T
where
    T: FromStr + Display + Copy,
    T::Err: Display,
{
    match value {
        None => default,
        Some(s) => s.parse::<T>().unwrap_or_else(|e| {
            error!("🪛️ {s} is not a valid value for {name}. {e} Using the default, {default}, instead.");
            default
        }),
    }
}

/// "1", "true" and "yes" switch a flag on, "0", "false" and "no" switch it off. Anything else leaves the default.
fn flag_or_default(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(|s| s.trim().to_ascii_lowercase()) {
        None => default,
        Some(s) => match s.as_str() {
            "1" | "true" | "yes" => true,
            "0" | "false" | "no" => false,
            _ => {
                warn!("🪛️ '{s}' is not a valid flag value. Using the default, {default}, instead.");
                default
            },
        },
    }
}
