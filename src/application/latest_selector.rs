// Latest-record selection over an unordered feed snapshot
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

use crate::application::errors::FeedError;
use crate::domain::telemetry::TimestampedRecord;

/// Most recent record per entity, plus the data-quality issues met while building it
#[derive(Debug, Clone, PartialEq)]
pub struct Selection<R> {
    latest: BTreeMap<String, R>,
    issues: Vec<FeedError>,
}

impl<R> Default for Selection<R> {
    fn default() -> Self {
        Self {
            latest: BTreeMap::new(),
            issues: Vec::new(),
        }
    }
}

impl<R> Selection<R> {
    pub fn is_empty(&self) -> bool {
        self.latest.is_empty()
    }

    pub fn len(&self) -> usize {
        self.latest.len()
    }

    pub fn get(&self, entity_id: &str) -> Option<&R> {
        self.latest.get(entity_id)
    }

    /// Records ordered by entity id
    pub fn records(&self) -> impl Iterator<Item = &R> {
        self.latest.values()
    }

    pub fn issues(&self) -> &[FeedError] {
        &self.issues
    }

    fn with_issues(mut self, mut issues: Vec<FeedError>) -> Self {
        issues.append(&mut self.issues);
        self.issues = issues;
        self
    }
}

/// Keep, per entity, the record with the greatest timestamp.
///
/// Single pass; a stored record is replaced only by a strictly newer one, so on equal
/// timestamps the first record in iteration order is kept. Snapshot order is not
/// meaningful, so callers must not depend on which of two tied records wins.
/// Records with an unparsable timestamp never win and are reported as issues.
pub fn select_latest<R, I>(records: I) -> Selection<R>
where
    R: TimestampedRecord,
    I: IntoIterator<Item = R>,
{
    let mut best: HashMap<String, (DateTime<Utc>, R)> = HashMap::new();
    let mut issues = Vec::new();

    for record in records {
        let Some(timestamp) = record.timestamp() else {
            issues.push(FeedError::malformed(
                record.entity_id(),
                format!("unparsable timestamp {:?}", record.raw_timestamp()),
            ));
            continue;
        };

        let newer = best
            .get(record.entity_id())
            .is_none_or(|(stored, _)| timestamp > *stored);
        if newer {
            best.insert(record.entity_id().to_string(), (timestamp, record));
        }
    }

    Selection {
        latest: best
            .into_iter()
            .map(|(entity_id, (_, record))| (entity_id, record))
            .collect(),
        issues,
    }
}

/// Turn a raw collection snapshot into typed records.
///
/// Objects yield one record per child key, arrays one per non-null element (the
/// database returns arrays when child keys look like indices). Children that do not
/// deserialize are skipped and reported.
pub fn decode_snapshot<R: DeserializeOwned>(snapshot: Value) -> (Vec<R>, Vec<FeedError>) {
    let children: Vec<(String, Value)> = match snapshot {
        Value::Null => Vec::new(),
        Value::Object(map) => map.into_iter().collect(),
        Value::Array(items) => items
            .into_iter()
            .enumerate()
            .filter(|(_, value)| !value.is_null())
            .map(|(index, value)| (index.to_string(), value))
            .collect(),
        other => {
            return (
                Vec::new(),
                vec![FeedError::malformed(
                    "/",
                    format!("expected a collection, got {}", other),
                )],
            );
        }
    };

    let mut records = Vec::with_capacity(children.len());
    let mut issues = Vec::new();

    for (key, value) in children {
        match serde_json::from_value::<R>(value) {
            Ok(record) => records.push(record),
            Err(e) => issues.push(FeedError::malformed(key, e.to_string())),
        }
    }

    (records, issues)
}

/// Decode a snapshot and reduce it to the latest record per entity.
pub fn reduce_snapshot<R>(snapshot: Value) -> Selection<R>
where
    R: TimestampedRecord + DeserializeOwned,
{
    let (records, decode_issues) = decode_snapshot::<R>(snapshot);
    let selection = select_latest(records).with_issues(decode_issues);

    for issue in selection.issues() {
        tracing::warn!("Skipping feed record: {}", issue);
    }

    selection
}
