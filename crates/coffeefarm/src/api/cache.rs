//! Query result cache with tag-based invalidation.
//!
//! Each cached read declares the tags it provides; each mutation declares
//! the tags it invalidates. A type-wide tag (no id) invalidates every query
//! of that type, an id tag only queries providing that same id.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use log::debug;
use moka::sync::Cache;
use serde::de::DeserializeOwned;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TagKind {
    Farmer,
    Farm,
    Attendance,
    Performance,
    FaceEnrollment,
    Statistics,
}

impl TagKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TagKind::Farmer => "Farmer",
            TagKind::Farm => "Farm",
            TagKind::Attendance => "Attendance",
            TagKind::Performance => "Performance",
            TagKind::FaceEnrollment => "FaceEnrollment",
            TagKind::Statistics => "Statistics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TagId {
    List,
    Today,
    Active,
    History,
    Entity(String),
}

impl fmt::Display for TagId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagId::List => f.write_str("LIST"),
            TagId::Today => f.write_str("TODAY"),
            TagId::Active => f.write_str("ACTIVE"),
            TagId::History => f.write_str("HISTORY"),
            TagId::Entity(id) => f.write_str(id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Tag {
    pub kind: TagKind,
    pub id: Option<TagId>,
}

impl Tag {
    /// Every query of `kind`.
    pub fn all(kind: TagKind) -> Self {
        Self { kind, id: None }
    }

    pub fn new(kind: TagKind, id: TagId) -> Self {
        Self { kind, id: Some(id) }
    }

    pub fn list(kind: TagKind) -> Self {
        Self::new(kind, TagId::List)
    }

    pub fn entity(kind: TagKind, id: impl Into<String>) -> Self {
        Self::new(kind, TagId::Entity(id.into()))
    }

    /// Whether invalidating `self` drops a query that provided `provided`.
    pub fn invalidates(&self, provided: &Tag) -> bool {
        self.kind == provided.kind && (self.id.is_none() || self.id == provided.id)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.id {
            Some(id) => write!(f, "{}:{}", self.kind.as_str(), id),
            None => f.write_str(self.kind.as_str()),
        }
    }
}

pub struct QueryCache {
    entries: Cache<String, serde_json::Value>,
    tags: Mutex<HashMap<String, Vec<Tag>>>,
}

impl QueryCache {
    pub fn new(ttl: Duration, max_entries: u64) -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(max_entries)
                .time_to_live(ttl)
                .build(),
            tags: Mutex::new(HashMap::new()),
        }
    }

    /// The cached value under `key`, or `None` on a miss or when the stored
    /// value no longer fits `T`.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.entries.get(key)?;
        match serde_json::from_value(value) {
            Ok(typed) => {
                debug!("cache hit {}", key);
                Some(typed)
            }
            Err(e) => {
                debug!("cache entry {} has wrong shape, dropping: {}", key, e);
                self.entries.invalidate(key);
                None
            }
        }
    }

    pub fn insert<T: Serialize>(&self, key: &str, value: &T, provides: Vec<Tag>) {
        let Ok(json) = serde_json::to_value(value) else {
            return;
        };
        self.entries.insert(key.to_string(), json);

        let mut tags = self.tags.lock().unwrap_or_else(PoisonError::into_inner);
        tags.insert(key.to_string(), provides);
        // Drop index rows for entries moka already expired.
        if tags.len() as u64 > self.entries.policy().max_capacity().unwrap_or(u64::MAX) {
            tags.retain(|k, _| self.entries.contains_key(k));
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Drops every query providing a tag matched by `invalidated`. Returns
    /// the number of keys dropped.
    pub fn invalidate(&self, invalidated: &[Tag]) -> usize {
        if invalidated.is_empty() {
            return 0;
        }

        let mut tags = self.tags.lock().unwrap_or_else(PoisonError::into_inner);
        let doomed: Vec<String> = tags
            .iter()
            .filter(|(_, provided)| {
                provided
                    .iter()
                    .any(|p| invalidated.iter().any(|inv| inv.invalidates(p)))
            })
            .map(|(key, _)| key.clone())
            .collect();

        for key in &doomed {
            tags.remove(key);
            self.entries.invalidate(key);
        }

        if !doomed.is_empty() {
            debug!(
                "invalidated {} cached queries for [{}]",
                doomed.len(),
                invalidated
                    .iter()
                    .map(Tag::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            );
        }
        doomed.len()
    }

    pub fn clear(&self) {
        self.entries.invalidate_all();
        self.tags
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl fmt::Debug for QueryCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryCache")
            .field("entries", &self.entries.entry_count())
            .finish()
    }
}
