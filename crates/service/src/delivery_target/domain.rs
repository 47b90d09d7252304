use chrono::{DateTime, Utc};
use models::{ClusterTarget, DeliveryTarget, Project};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Create input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDeliveryTargetRequest {
    pub name: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    pub project: String,
    #[serde(default)]
    pub cluster: Option<ClusterTarget>,
    #[serde(default)]
    pub variable: Map<String, Value>,
}

/// Update input; only these fields of a stored target are mutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDeliveryTargetRequest {
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub cluster: Option<ClusterTarget>,
    #[serde(default)]
    pub variable: Map<String, Value>,
}

/// Project summary embedded in target responses.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectBase {
    pub name: String,
    pub alias: String,
    pub description: String,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
}

impl From<Project> for ProjectBase {
    fn from(p: Project) -> Self {
        Self {
            name: p.name,
            alias: p.alias,
            description: p.description,
            namespace: p.namespace,
            owner: p.owner,
            create_time: p.create_time,
            update_time: p.update_time,
        }
    }
}

/// Externally visible shape of a delivery target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeliveryTargetBase {
    pub name: String,
    pub alias: String,
    pub description: String,
    /// Unset when the owning project could not be looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<ProjectBase>,
    pub namespace: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster: Option<ClusterTarget>,
    /// Unset when the referenced cluster could not be looked up.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cluster_alias: Option<String>,
    pub variable: Map<String, Value>,
    pub create_time: DateTime<Utc>,
    pub update_time: DateTime<Utc>,
    pub app_num: i64,
}

impl DeliveryTargetBase {
    /// Plain field copy, before any enrichment.
    pub(crate) fn from_model(target: &DeliveryTarget) -> Self {
        Self {
            name: target.name.clone(),
            alias: target.alias.clone(),
            description: target.description.clone(),
            project: None,
            namespace: target.namespace.clone(),
            cluster: target.cluster.clone(),
            cluster_alias: None,
            variable: target.variable.clone(),
            create_time: target.create_time,
            update_time: target.update_time,
            app_num: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailDeliveryTargetResponse {
    #[serde(flatten)]
    pub base: DeliveryTargetBase,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTargetResponse {
    pub targets: Vec<DeliveryTargetBase>,
    pub total: u64,
}

impl From<CreateDeliveryTargetRequest> for DeliveryTarget {
    /// `project` and `namespace` are left empty: they come from the project lookup.
    fn from(req: CreateDeliveryTargetRequest) -> Self {
        DeliveryTarget {
            name: req.name,
            alias: req.alias,
            description: req.description,
            cluster: req.cluster,
            variable: req.variable,
            ..Default::default()
        }
    }
}

/// Apply the mutable fields of an update onto a loaded target.
pub(crate) fn apply_update(target: &mut DeliveryTarget, req: UpdateDeliveryTargetRequest) {
    target.alias = req.alias;
    target.description = req.description;
    target.cluster = req.cluster;
    target.variable = req.variable;
}
