use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    guestbook::{
        avatar::{avatar_color, initials},
        stars::{DEFAULT_MAX_STARS, render_stars},
        stats::format_position,
        time::time_ago,
    },
    models::FeedbackEntry,
};

/// An entry prepared for display. Name and comment are HTML-escaped.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayCard {
    pub id: i64,
    pub name: String,
    pub comment: String,
    pub rating: i16,
    pub rating_label: String,
    pub stars: String,
    pub time_ago: String,
    pub avatar_color: String,
    pub initials: String,
    pub position: String,
}

impl DisplayCard {
    pub fn new(entry: &FeedbackEntry, index: usize, total: usize, now: DateTime<Utc>) -> Self {
        Self {
            id: entry.id,
            name: html_escape::encode_text(&entry.name).to_string(),
            comment: html_escape::encode_text(&entry.comment).to_string(),
            rating: entry.rating,
            rating_label: format!("{:.1} / {}", entry.rating as f64, DEFAULT_MAX_STARS),
            stars: render_stars(entry.rating as i64, DEFAULT_MAX_STARS),
            time_ago: time_ago(entry.created_at, now),
            avatar_color: avatar_color(&entry.name),
            initials: initials(&entry.name),
            position: format_position(index, total),
        }
    }
}

pub fn display_cards(entries: &[FeedbackEntry], now: DateTime<Utc>) -> Vec<DisplayCard> {
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| DisplayCard::new(entry, index, entries.len(), now))
        .collect()
}
