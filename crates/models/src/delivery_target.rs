use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::ModelError;
use crate::record::{index_of, Record};

/// Longest accepted delivery target name.
pub const MAX_NAME_LEN: usize = 32;

/// Where a delivery target deploys: a cluster and a namespace inside it.
/// This is a reference by name, never an owning link to the cluster record.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterTarget {
    #[serde(default)]
    pub cluster_name: String,
    #[serde(default)]
    pub namespace: String,
}

/// Persisted delivery target.
///
/// `project` and `namespace` are copied from the owning project when the
/// target is created and are not changed afterwards.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTarget {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub project: String,
    #[serde(default)]
    pub namespace: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterTarget>,
    /// Opaque to this layer; consumers own its meaning.
    #[serde(default)]
    pub variable: Map<String, Value>,
    #[serde(default)]
    pub create_time: DateTime<Utc>,
    #[serde(default)]
    pub update_time: DateTime<Utc>,
}

impl Record for DeliveryTarget {
    const KIND: &'static str = "vela_delivery_target";

    fn primary_key(&self) -> String { self.name.clone() }

    fn index(&self) -> BTreeMap<String, String> {
        index_of([
            ("name", self.name.as_str()),
            ("project", self.project.as_str()),
            ("namespace", self.namespace.as_str()),
        ])
    }

    fn timestamps(&self) -> (DateTime<Utc>, DateTime<Utc>) { (self.create_time, self.update_time) }

    fn set_timestamps(&mut self, create_time: DateTime<Utc>, update_time: DateTime<Utc>) {
        self.create_time = create_time;
        self.update_time = update_time;
    }
}

/// Names are lowercase DNS labels: `[a-z0-9]([-a-z0-9]*[a-z0-9])?`.
pub fn validate_name(name: &str) -> Result<(), ModelError> {
    if name.trim().is_empty() {
        return Err(ModelError::Validation("name required".into()));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(ModelError::Validation(format!("name longer than {MAX_NAME_LEN} characters")));
    }
    let valid_char = |c: char| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-';
    if !name.chars().all(valid_char) || name.starts_with('-') || name.ends_with('-') {
        return Err(ModelError::Validation(format!("invalid name {name:?}: must be a lowercase DNS label")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_name_accepts_dns_labels() {
        assert!(validate_name("t1").is_ok());
        assert!(validate_name("prod-eu-1").is_ok());
    }

    #[test]
    fn validate_name_rejects_bad_names() {
        assert!(validate_name("").is_err());
        assert!(validate_name("Upper").is_err());
        assert!(validate_name("-lead").is_err());
        assert!(validate_name("trail-").is_err());
        assert!(validate_name("has space").is_err());
        assert!(validate_name(&"a".repeat(MAX_NAME_LEN + 1)).is_err());
    }

    #[test]
    fn index_skips_empty_fields() {
        let t = DeliveryTarget { name: "t1".into(), project: "proj-a".into(), ..Default::default() };
        let idx = t.index();
        assert_eq!(idx.get("name").map(String::as_str), Some("t1"));
        assert_eq!(idx.get("project").map(String::as_str), Some("proj-a"));
        assert!(!idx.contains_key("namespace"));
    }

    #[test]
    fn serializes_in_camel_case() {
        let t = DeliveryTarget {
            name: "t1".into(),
            cluster: Some(ClusterTarget { cluster_name: "c1".into(), namespace: "ns".into() }),
            ..Default::default()
        };
        let v = serde_json::to_value(&t).unwrap();
        assert_eq!(v["cluster"]["clusterName"], "c1");
        assert!(v.get("createTime").is_some());
        let back: DeliveryTarget = serde_json::from_value(v).unwrap();
        assert_eq!(back, t);
    }
}
