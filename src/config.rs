use std::{
    env,
    fmt::{Debug, Display},
    str::FromStr,
    time::Duration,
};

use tracing::{info, warn};

use crate::models::{DisplayConfig, DisplayVariant, ListOrder, OrderKey};

pub struct Config {
    pub port: u16,
    pub redis_url: Option<String>,
    pub allowed_origins: Vec<String>,
    pub display: DisplayConfig,
}

impl Config {
    pub fn load() -> Self {
        let variant: DisplayVariant = try_load("GUESTBOOK_VARIANT", DisplayVariant::default());
        let mut display = DisplayConfig::for_variant(variant);

        display.theme = try_load("GUESTBOOK_THEME", display.theme);
        display.order = ListOrder {
            key: try_load("GUESTBOOK_ORDER", OrderKey::default()),
            ascending: try_load("GUESTBOOK_ASCENDING", false),
        };
        display.page_size = try_load("GUESTBOOK_PAGE_SIZE", display.page_size).max(1);
        display.confirm_delay = Duration::from_millis(try_load(
            "GUESTBOOK_CONFIRM_DELAY_MS",
            display.confirm_delay.as_millis() as u64,
        ));

        Self {
            port: try_load("PORT", 3001),
            redis_url: var("REDIS_URL"),
            allowed_origins: var("ALLOWED_ORIGINS")
                .unwrap_or_else(|| "http://localhost:3000".to_string())
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
            display,
        }
    }
}

fn var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn try_load<T>(key: &str, default: T) -> T
where
    T: FromStr + Debug,
    T::Err: Display,
{
    match var(key) {
        None => {
            info!("{key} not set, using default: {default:?}");
            default
        }
        Some(raw) => raw.parse().unwrap_or_else(|e| {
            warn!("Invalid {key} value {raw:?}: {e}, using default: {default:?}");
            default
        }),
    }
}
