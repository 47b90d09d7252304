use std::sync::Arc;

use async_trait::async_trait;
use common::pagination::Pagination;
use models::{delivery_target, Cluster, ClusterTarget, DeliveryTarget};
use tracing::{error, info, instrument, warn};

use super::domain::{
    apply_update, CreateDeliveryTargetRequest, DeliveryTargetBase, DetailDeliveryTargetResponse, ListTargetResponse,
    ProjectBase, UpdateDeliveryTargetRequest,
};
use super::errors::TargetError;
use super::project::ProjectService;
use crate::errors::StoreError;
use crate::storage::{IndexFilter, ListOptions, Repository, SortKey, SortOption};

/// Number of applications deployed to a target, reported as `appNum`.
#[async_trait]
pub trait AppCounter: Send + Sync {
    async fn count_apps(&self, target: &DeliveryTarget) -> i64;
}

/// Placeholder counter until applications record their targets.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoAppCounter;

#[async_trait]
impl AppCounter for NoAppCounter {
    async fn count_apps(&self, _target: &DeliveryTarget) -> i64 { 0 }
}

/// Delivery target business service independent of web framework.
///
/// Holds no state between calls. Response conversion looks up the owning
/// project and the referenced cluster's alias on a best-effort basis: a
/// failed lookup is logged and leaves the field unset.
pub struct DeliveryTargetService<P: ProjectService> {
    targets: Repository<DeliveryTarget>,
    clusters: Repository<Cluster>,
    projects: Arc<P>,
    app_counter: Arc<dyn AppCounter>,
}

impl<P: ProjectService> DeliveryTargetService<P> {
    pub fn new(targets: Repository<DeliveryTarget>, clusters: Repository<Cluster>, projects: Arc<P>) -> Self {
        Self { targets, clusters, projects, app_counter: Arc::new(NoAppCounter) }
    }

    pub fn with_app_counter(mut self, app_counter: Arc<dyn AppCounter>) -> Self {
        self.app_counter = app_counter;
        self
    }

    /// List targets, newest first, optionally restricted to one project.
    ///
    /// `page`/`page_size` of 0 return every match. `total` counts all
    /// matches regardless of the window. Stored entries that cannot be
    /// decoded are skipped.
    #[instrument(skip(self))]
    pub async fn list(&self, page: u32, page_size: u32, project: &str) -> Result<ListTargetResponse, TargetError> {
        let mut filter = IndexFilter::new();
        if !project.is_empty() {
            filter = filter.with("project", project);
        }
        let opts = ListOptions {
            pagination: Pagination::new(page, page_size),
            sort_by: vec![SortOption::descending(SortKey::CreateTime)],
        };

        let rows = self.targets.list(&filter, &opts).await?;
        let mut targets = Vec::with_capacity(rows.len());
        for row in rows {
            match row {
                Ok(target) => targets.push(self.convert(&target).await),
                Err(e) => warn!(error = %e, "skip_malformed_delivery_target"),
            }
        }
        let total = self.targets.count(&filter).await?;
        Ok(ListTargetResponse { targets, total })
    }

    #[instrument(skip(self))]
    pub async fn get(&self, name: &str) -> Result<DeliveryTarget, TargetError> {
        self.targets.get(name).await.map_err(|e| not_found_or(e, name))
    }

    /// Response view of an already loaded target. Never fails on enrichment.
    pub async fn detail(&self, target: &DeliveryTarget) -> Result<DetailDeliveryTargetResponse, TargetError> {
        Ok(DetailDeliveryTargetResponse { base: self.convert(target).await })
    }

    /// Create a target in the named project.
    ///
    /// `project` and `namespace` are taken from the project record. A failed
    /// existence check is reported as [`TargetError::AlreadyExists`].
    ///
    /// # Examples
    /// ```
    /// use service::delivery_target::{DeliveryTargetService, project::mock::MockProjectService};
    /// use service::delivery_target::domain::CreateDeliveryTargetRequest;
    /// use service::storage::{MemoryDocumentStore, Repository};
    /// use std::sync::Arc;
    /// let store = Arc::new(MemoryDocumentStore::new());
    /// let projects = Arc::new(MockProjectService::default().with_project("proj-a", "ns-a"));
    /// let svc = DeliveryTargetService::new(Repository::new(store.clone()), Repository::new(store), projects);
    /// let req = CreateDeliveryTargetRequest { name: "t1".into(), project: "proj-a".into(), ..Default::default() };
    /// let detail = tokio_test::block_on(svc.create(req)).unwrap();
    /// assert_eq!(detail.base.namespace, "ns-a");
    /// ```
    #[instrument(skip(self, req), fields(name = %req.name, project = %req.project))]
    pub async fn create(&self, req: CreateDeliveryTargetRequest) -> Result<DetailDeliveryTargetResponse, TargetError> {
        delivery_target::validate_name(&req.name)?;
        if req.project.trim().is_empty() {
            return Err(TargetError::Validation("project required".into()));
        }
        let project_name = req.project.clone();
        let mut target = DeliveryTarget::from(req);

        match self.targets.is_exist(&target.name).await {
            Ok(false) => {}
            Ok(true) => return Err(TargetError::AlreadyExists(target.name)),
            Err(e) => {
                error!(error = %e, "check delivery target name is exist failure");
                return Err(TargetError::AlreadyExists(target.name));
            }
        }

        let project = self.projects.get_project(&project_name).await?;
        target.namespace = project.namespace;
        target.project = project.name;

        self.targets.add(&mut target).await?;
        info!(name = %target.name, project = %target.project, namespace = %target.namespace, "delivery_target_created");
        self.detail(&target).await
    }

    /// Replace alias, description, cluster and variable; identity fields stay.
    #[instrument(skip(self, target, req), fields(name = %target.name))]
    pub async fn update(
        &self,
        mut target: DeliveryTarget,
        req: UpdateDeliveryTargetRequest,
    ) -> Result<DetailDeliveryTargetResponse, TargetError> {
        apply_update(&mut target, req);
        self.targets.put(&mut target).await?;
        info!(name = %target.name, "delivery_target_updated");
        self.detail(&target).await
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, name: &str) -> Result<(), TargetError> {
        self.targets.delete(name).await.map_err(|e| not_found_or(e, name))?;
        info!(name, "delivery_target_deleted");
        Ok(())
    }

    async fn convert(&self, target: &DeliveryTarget) -> DeliveryTargetBase {
        let mut base = DeliveryTargetBase::from_model(target);
        base.app_num = self.app_counter.count_apps(target).await;
        base.project = self.project_summary(&target.project).await;
        if let Some(cluster) = &target.cluster {
            base.cluster_alias = self.cluster_alias(cluster).await;
        }
        base
    }

    async fn project_summary(&self, name: &str) -> Option<ProjectBase> {
        match self.projects.get_project(name).await {
            Ok(project) => Some(project.into()),
            Err(e) => {
                error!(project = name, error = %e, "query project info failure");
                None
            }
        }
    }

    async fn cluster_alias(&self, cluster: &ClusterTarget) -> Option<String> {
        if cluster.cluster_name.is_empty() {
            return None;
        }
        match self.clusters.get(&cluster.cluster_name).await {
            Ok(c) => Some(c.alias),
            Err(e) => {
                error!(cluster = %cluster.cluster_name, error = %e, "query cluster info failure");
                None
            }
        }
    }
}

fn not_found_or(e: StoreError, name: &str) -> TargetError {
    match e {
        StoreError::RecordNotExist => TargetError::NotFound(name.to_string()),
        other => other.into(),
    }
}
