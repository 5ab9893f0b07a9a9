use std::env;

use chrono::{FixedOffset, NaiveDateTime, Utc};

use crate::error::ConfigError;

const DEFAULT_DB_PATH: &str = "bicho_db";
const DEFAULT_LOTTERY_CATALOG: &str = "config/loterias.ron";
// Brasília time, no DST since 2019.
const DEFAULT_UTC_OFFSET_HOURS: i32 = -3;

#[derive(Debug, Clone)]
pub struct Config {
    pub supabase_url: String,
    pub supabase_anon_key: String,
    pub supabase_access_token: Option<String>,
    pub db_path: String,
    pub lottery_catalog: String,
    pub utc_offset: FixedOffset,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let supabase_url = lookup("SUPABASE_URL").ok_or(ConfigError::Missing("SUPABASE_URL"))?;
        let supabase_anon_key =
            lookup("SUPABASE_ANON_KEY").ok_or(ConfigError::Missing("SUPABASE_ANON_KEY"))?;
        let supabase_access_token = lookup("SUPABASE_ACCESS_TOKEN").filter(|t| !t.is_empty());
        let db_path = lookup("BICHO_DB_PATH").unwrap_or_else(|| DEFAULT_DB_PATH.to_string());
        let lottery_catalog =
            lookup("LOTTERY_CATALOG").unwrap_or_else(|| DEFAULT_LOTTERY_CATALOG.to_string());

        let offset_hours = match lookup("BICHO_UTC_OFFSET_HOURS") {
            Some(raw) => raw.trim().parse::<i32>().map_err(|_| ConfigError::Invalid {
                key: "BICHO_UTC_OFFSET_HOURS",
                value: raw.clone(),
            })?,
            None => DEFAULT_UTC_OFFSET_HOURS,
        };
        let utc_offset =
            FixedOffset::east_opt(offset_hours * 3600).ok_or_else(|| ConfigError::Invalid {
                key: "BICHO_UTC_OFFSET_HOURS",
                value: offset_hours.to_string(),
            })?;

        Ok(Self {
            supabase_url,
            supabase_anon_key,
            supabase_access_token,
            db_path,
            lottery_catalog,
            utc_offset,
        })
    }

    /// Wall-clock time at the draw venue, used for cutoff checks.
    pub fn local_now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.utc_offset).naive_local()
    }
}
