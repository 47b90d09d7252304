use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{de::DeserializeOwned, Serialize};

/// A record kind persisted through a document store.
///
/// `KIND` partitions the store, `primary_key` identifies one record within
/// its kind and `index` lists the fields listings may filter on.
pub trait Record: Serialize + DeserializeOwned + Send + Sync + 'static {
    const KIND: &'static str;

    fn primary_key(&self) -> String;

    /// Non-empty filterable fields of this record.
    fn index(&self) -> BTreeMap<String, String> {
        BTreeMap::new()
    }

    /// `(create_time, update_time)`
    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>);

    fn set_timestamps(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>);
}

/// Collect the non-empty `(field, value)` pairs into an index map.
pub fn index_of<'a>(fields: impl IntoIterator<Item = (&'a str, &'a str)>) -> BTreeMap<String, String> {
    fields
        .into_iter()
        .filter(|(_, v)| !v.is_empty())
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
