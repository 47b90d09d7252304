use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::record::{index_of, Record};

/// A project groups delivery targets and pins the namespace they deploy into.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub update_time: DateTime<Utc>,
}

impl Record for Project {
    const KIND: &'static str = "vela_project";

    fn primary_key(&self) -> String { self.name.clone() }

    fn index(&self) -> BTreeMap<String, String> {
        index_of([("name", self.name.as_str()), ("namespace", self.namespace.as_str())])
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) { (self.create_time, self.update_time) }

    fn set_timestamps(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>) {
        self.create_time = create_time;
        self.update_time = update_time;
    }
}
