use std::{collections::HashMap, fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::AppError;

pub type FeedbackId = i64;

/// One submitted guest book entry. Immutable once the backend has stored it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackEntry {
    pub id: FeedbackId,
    pub name: String,
    pub comment: String,
    pub rating: i16,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewFeedback {
    pub name: String,
    pub comment: String,
    pub rating: i16,
}

impl FeedbackEntry {
    pub fn from_new(id: FeedbackId, record: NewFeedback, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: record.name,
            comment: record.comment,
            rating: record.rating,
            created_at,
        }
    }

    pub fn to_redis_hash(&self) -> HashMap<String, String> {
        let mut map = HashMap::new();
        map.insert("id".into(), self.id.to_string());
        map.insert("name".into(), self.name.clone());
        map.insert("comment".into(), self.comment.clone());
        map.insert("rating".into(), self.rating.to_string());
        map.insert("created_at".into(), self.created_at.to_rfc3339());
        map
    }

    pub fn from_redis_hash(map: &HashMap<String, String>) -> Result<Self, AppError> {
        Ok(Self {
            id: map
                .get("id")
                .ok_or_else(|| AppError::Deserialization("Missing id".into()))?
                .parse()
                .map_err(|_| AppError::Deserialization("Invalid id".into()))?,

            name: map
                .get("name")
                .ok_or_else(|| AppError::Deserialization("Missing name".into()))?
                .clone(),

            comment: map
                .get("comment")
                .ok_or_else(|| AppError::Deserialization("Missing comment".into()))?
                .clone(),

            rating: map
                .get("rating")
                .ok_or_else(|| AppError::Deserialization("Missing rating".into()))?
                .parse()
                .map_err(|_| AppError::Deserialization("Invalid rating".into()))?,

            created_at: map
                .get("created_at")
                .ok_or_else(|| AppError::Deserialization("Missing created_at".into()))
                .and_then(|s| {
                    DateTime::parse_from_rfc3339(s)
                        .map(|dt| dt.with_timezone(&Utc))
                        .map_err(|_| AppError::Deserialization("Invalid created_at".into()))
                })?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChangeKind {
    Inserted,
    Updated,
    Deleted,
}

/// A change notification for the feedback collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeEvent {
    pub kind: ChangeKind,
    pub id: Option<FeedbackId>,
}

impl ChangeEvent {
    pub fn inserted(id: FeedbackId) -> Self {
        Self {
            kind: ChangeKind::Inserted,
            id: Some(id),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OrderKey {
    #[default]
    Id,
    CreatedAt,
}

impl FromStr for OrderKey {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "id" => Ok(OrderKey::Id),
            "createdat" | "created_at" => Ok(OrderKey::CreatedAt),
            other => Err(AppError::BadRequest(format!("Unknown order key: {other}"))),
        }
    }
}

impl fmt::Display for OrderKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OrderKey::Id => write!(f, "id"),
            OrderKey::CreatedAt => write!(f, "createdAt"),
        }
    }
}

/// Ordering requested from the backend. Defaults to newest first by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListOrder {
    pub key: OrderKey,
    pub ascending: bool,
}

impl Default for ListOrder {
    fn default() -> Self {
        Self {
            key: OrderKey::Id,
            ascending: false,
        }
    }
}

impl ListOrder {
    pub fn sort(&self, entries: &mut [FeedbackEntry]) {
        match self.key {
            OrderKey::Id => entries.sort_by_key(|e| e.id),
            OrderKey::CreatedAt => entries.sort_by(|a, b| {
                a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
            }),
        }
        if !self.ascending {
            entries.reverse();
        }
    }
}
