use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    guestbook::stars::{DEFAULT_MAX_STARS, render_stars},
    models::FeedbackEntry,
};

pub const LEAF_DELAY_STEP: f64 = 0.3;
pub const MAX_SWAY_DELAY: f64 = 3.0;
pub const SNIPPET_LENGTH: usize = 60;

/// Where a group of leaves hangs on the tree. Positions are percentages of
/// the canvas, `spread` is in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Branch {
    pub x: f64,
    pub y: f64,
    pub capacity: usize,
    pub spread: f64,
}

pub const BRANCHES: [Branch; 8] = [
    Branch { x: 50.0, y: 12.0, capacity: 3, spread: 24.0 },
    Branch { x: 32.0, y: 22.0, capacity: 4, spread: 30.0 },
    Branch { x: 68.0, y: 22.0, capacity: 4, spread: 30.0 },
    Branch { x: 50.0, y: 30.0, capacity: 3, spread: 20.0 },
    Branch { x: 20.0, y: 38.0, capacity: 5, spread: 36.0 },
    Branch { x: 80.0, y: 38.0, capacity: 5, spread: 36.0 },
    Branch { x: 28.0, y: 54.0, capacity: 4, spread: 28.0 },
    Branch { x: 72.0, y: 54.0, capacity: 4, spread: 28.0 },
];

pub fn tree_capacity() -> usize {
    BRANCHES.iter().map(|b| b.capacity).sum()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeafPlacement {
    /// Position of the entry in the input list.
    pub index: usize,
    pub entry_id: i64,
    pub branch: usize,
    pub offset: f64,
    pub x: f64,
    pub y: f64,
    pub delay: f64,
    pub sway_delay: f64,
}

/// Hangs entries on the tree in input order, filling each branch before
/// moving to the next. Entries past the total capacity get no leaf.
pub fn layout_tree<R: Rng>(entries: &[FeedbackEntry], rng: &mut R) -> Vec<LeafPlacement> {
    let mut placements = Vec::with_capacity(entries.len().min(tree_capacity()));
    let mut remaining = entries.iter().enumerate();

    for (branch_index, branch) in BRANCHES.iter().enumerate() {
        let on_branch: Vec<_> = remaining.by_ref().take(branch.capacity).collect();
        if on_branch.is_empty() {
            break;
        }

        let count = on_branch.len() as f64;
        for (local, (index, entry)) in on_branch.into_iter().enumerate() {
            let offset = (local as f64 - count / 2.0) * (branch.spread / count);
            placements.push(LeafPlacement {
                index,
                entry_id: entry.id,
                branch: branch_index,
                offset,
                x: branch.x + offset,
                y: branch.y,
                delay: index as f64 * LEAF_DELAY_STEP,
                sway_delay: rng.random_range(0.0..MAX_SWAY_DELAY),
            });
        }
    }

    placements
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FloatingSlot {
    pub top: f64,
    pub left: f64,
}

pub const FLOATING_SLOTS: [FloatingSlot; 8] = [
    FloatingSlot { top: 2.0, left: -19.0 },
    FloatingSlot { top: 4.0, left: 98.0 },
    FloatingSlot { top: 82.0, left: -19.0 },
    FloatingSlot { top: 88.0, left: 96.0 },
    FloatingSlot { top: 46.0, left: -19.0 },
    FloatingSlot { top: 50.0, left: 95.0 },
    FloatingSlot { top: 20.0, left: 4.0 },
    FloatingSlot { top: 76.0, left: 88.0 },
];

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FloatingSnippet {
    pub entry_id: i64,
    pub top: f64,
    pub left: f64,
    pub stars: String,
    pub text: String,
}

pub fn truncate_comment(comment: &str, limit: usize) -> String {
    if comment.chars().count() > limit {
        let mut cut: String = comment.chars().take(limit).collect();
        cut.push('…');
        cut
    } else {
        comment.to_string()
    }
}

/// The first eight entries pinned around the carousel.
pub fn floating_snippets(entries: &[FeedbackEntry]) -> Vec<FloatingSnippet> {
    entries
        .iter()
        .zip(FLOATING_SLOTS.iter())
        .map(|(entry, slot)| FloatingSnippet {
            entry_id: entry.id,
            top: slot.top,
            left: slot.left,
            stars: render_stars(entry.rating as i64, DEFAULT_MAX_STARS),
            text: truncate_comment(&entry.comment, SNIPPET_LENGTH),
        })
        .collect()
}
