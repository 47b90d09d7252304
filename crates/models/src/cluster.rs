use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{index_of, Record};

/// A managed cluster. Delivery targets only read its display alias.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub update_time: DateTime<Utc>,
}

impl Record for Cluster {
    const KIND: &'static str = "vela_cluster";

    fn primary_key(&self) -> String { self.name.clone() }

    fn index(&self) -> BTreeMap<String, String> {
        index_of([("name", self.name.as_str())])
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) { (self.create_time, self.update_time) }

    fn set_timestamps(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>) {
        self.create_time = create_time;
        self.update_time = update_time;
    }
}
