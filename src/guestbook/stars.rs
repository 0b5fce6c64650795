use serde::{Deserialize, Serialize};

pub const DEFAULT_MAX_STARS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Star {
    Filled,
    Empty,
}

impl Star {
    pub fn glyph(self) -> char {
        match self {
            Star::Filled => '★',
            Star::Empty => '☆',
        }
    }
}

/// `max` stars where position `i` is filled when `i + 1 <= rating`.
/// Ratings outside `0..=max` simply fill everything or nothing.
pub fn star_glyphs(rating: i64, max: usize) -> Vec<Star> {
    (0..max)
        .map(|i| {
            if (i as i64) < rating {
                Star::Filled
            } else {
                Star::Empty
            }
        })
        .collect()
}

pub fn render_stars(rating: i64, max: usize) -> String {
    star_glyphs(rating, max).into_iter().map(Star::glyph).collect()
}

/// Stars for a mean rating, rounded half away from zero.
pub fn average_stars(average: f64) -> String {
    render_stars(average.round() as i64, DEFAULT_MAX_STARS)
}
