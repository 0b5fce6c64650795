use serde::{Deserialize, Serialize};

use crate::{guestbook::stars::average_stars, models::FeedbackEntry};

pub const DEFAULT_MODAL_RATING: i16 = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackStats {
    pub total: usize,
    pub average_rating: f64,
    pub modal_rating: i16,
    /// Counts of 1..=5 star entries. Out-of-range ratings are not counted here.
    pub distribution: [usize; 5],
    pub average_stars: String,
}

impl FeedbackStats {
    pub fn compute(entries: &[FeedbackEntry]) -> Self {
        let average_rating = average_rating(entries);

        let mut distribution = [0usize; 5];
        for entry in entries {
            if (1..=5).contains(&entry.rating) {
                distribution[(entry.rating - 1) as usize] += 1;
            }
        }

        Self {
            total: entries.len(),
            average_rating,
            modal_rating: modal_rating(entries),
            distribution,
            average_stars: average_stars(average_rating),
        }
    }

    pub fn entries_label(&self) -> String {
        entries_label(self.total)
    }
}

impl Default for FeedbackStats {
    fn default() -> Self {
        Self::compute(&[])
    }
}

pub fn average_rating(entries: &[FeedbackEntry]) -> f64 {
    if entries.is_empty() {
        return 0.0;
    }
    let sum: i64 = entries.iter().map(|e| e.rating as i64).sum();
    sum as f64 / entries.len() as f64
}

/// Most frequent rating. On a tie the value seen first in `entries` wins.
pub fn modal_rating(entries: &[FeedbackEntry]) -> i16 {
    // (rating, count) in first-seen order
    let mut counts: Vec<(i16, usize)> = Vec::new();
    for entry in entries {
        match counts.iter_mut().find(|(rating, _)| *rating == entry.rating) {
            Some((_, count)) => *count += 1,
            None => counts.push((entry.rating, 1)),
        }
    }

    let mut best: Option<(i16, usize)> = None;
    for (rating, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((rating, count));
        }
    }

    best.map(|(rating, _)| rating).unwrap_or(DEFAULT_MODAL_RATING)
}

pub fn entries_label(total: usize) -> String {
    if total == 1 {
        "Based on 1 entry".to_string()
    } else {
        format!("Based on {total} entries")
    }
}

/// Carousel position as `"01 / 04"`.
pub fn format_position(index: usize, total: usize) -> String {
    format!("{:02} / {:02}", index + 1, total)
}
