use std::{str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{errors::AppError, models::feedback::ListOrder};

pub const CAROUSEL_ADVANCE_PERIOD: Duration = Duration::from_millis(4500);
pub const TREE_ADVANCE_PERIOD: Duration = Duration::from_secs(5);
pub const INTERACTION_COOLDOWN: Duration = Duration::from_secs(10);
pub const CONFIRM_DELAY: Duration = Duration::from_secs(3);
pub const DEFAULT_PAGE_SIZE: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DisplayVariant {
    #[default]
    Carousel,
    Grid,
    Tree,
}

impl FromStr for DisplayVariant {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "carousel" => Ok(DisplayVariant::Carousel),
            "grid" => Ok(DisplayVariant::Grid),
            "tree" => Ok(DisplayVariant::Tree),
            other => Err(AppError::BadRequest(format!("Unknown display variant: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Theme {
    #[default]
    Holographic,
    Classic,
    Forest,
}

impl FromStr for Theme {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "holographic" => Ok(Theme::Holographic),
            "classic" => Ok(Theme::Classic),
            "forest" => Ok(Theme::Forest),
            other => Err(AppError::BadRequest(format!("Unknown theme: {other}"))),
        }
    }
}

/// How a display surface presents the guest book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayConfig {
    pub variant: DisplayVariant,
    pub theme: Theme,
    pub order: ListOrder,
    pub page_size: usize,
    /// `None` disables auto-advance (grid).
    pub advance_period: Option<Duration>,
    pub interaction_cooldown: Duration,
    pub confirm_delay: Duration,
}

impl DisplayConfig {
    pub fn for_variant(variant: DisplayVariant) -> Self {
        let (theme, advance_period) = match variant {
            DisplayVariant::Carousel => (Theme::Holographic, Some(CAROUSEL_ADVANCE_PERIOD)),
            DisplayVariant::Grid => (Theme::Classic, None),
            DisplayVariant::Tree => (Theme::Forest, Some(TREE_ADVANCE_PERIOD)),
        };

        Self {
            variant,
            theme,
            order: ListOrder::default(),
            page_size: DEFAULT_PAGE_SIZE,
            advance_period,
            interaction_cooldown: INTERACTION_COOLDOWN,
            confirm_delay: CONFIRM_DELAY,
        }
    }

    /// Hover pauses the carousel; the tree pauses on clicks and resumes on its own.
    pub fn pauses_on_hover(&self) -> bool {
        self.variant == DisplayVariant::Carousel
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self::for_variant(DisplayVariant::default())
    }
}
