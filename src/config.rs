use anyhow::Context;
use time::{macros::format_description, UtcOffset};

#[derive(Debug, Clone)]
pub struct CookieConfig {
    pub name: String,
    pub max_age_days: i64,
    pub secure: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// `None` runs the service on the in-memory store.
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub cookie: CookieConfig,
    /// Offset used to decide which calendar day a meal belongs to.
    pub metrics_offset: UtcOffset,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            host: "0.0.0.0".into(),
            port: 8080,
            cookie: CookieConfig {
                name: "userId".into(),
                max_age_days: 7,
                secure: false,
            },
            metrics_offset: UtcOffset::UTC,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let database_url = lookup("DATABASE_URL").filter(|v| !v.trim().is_empty());
        let host = lookup("APP_HOST").unwrap_or(defaults.host);
        let port = match lookup("APP_PORT") {
            Some(v) => v.parse::<u16>().context("APP_PORT must be a port number")?,
            None => defaults.port,
        };

        let cookie = CookieConfig {
            name: lookup("COOKIE_NAME").unwrap_or(defaults.cookie.name),
            max_age_days: match lookup("COOKIE_MAX_AGE_DAYS") {
                Some(v) => parse_max_age_days(&v)?,
                None => defaults.cookie.max_age_days,
            },
            secure: lookup("COOKIE_SECURE")
                .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
                .unwrap_or(defaults.cookie.secure),
        };

        let metrics_offset = match lookup("METRICS_UTC_OFFSET") {
            Some(v) => parse_offset(&v)?,
            None => defaults.metrics_offset,
        };

        Ok(Self {
            database_url,
            host,
            port,
            cookie,
            metrics_offset,
        })
    }
}

const MAX_COOKIE_AGE_DAYS: i64 = 3650;

fn parse_max_age_days(raw: &str) -> anyhow::Result<i64> {
    let days = raw
        .trim()
        .parse::<i64>()
        .context("COOKIE_MAX_AGE_DAYS must be an integer")?;
    if !(1..=MAX_COOKIE_AGE_DAYS).contains(&days) {
        anyhow::bail!("COOKIE_MAX_AGE_DAYS must be between 1 and {MAX_COOKIE_AGE_DAYS}, got {days}");
    }
    Ok(days)
}

/// Parses `+HH:MM` / `-HH:MM`.
fn parse_offset(raw: &str) -> anyhow::Result<UtcOffset> {
    let format = format_description!("[offset_hour sign:mandatory]:[offset_minute]");
    UtcOffset::parse(raw.trim(), format)
        .with_context(|| format!("METRICS_UTC_OFFSET must look like +02:00, got {raw:?}"))
}
