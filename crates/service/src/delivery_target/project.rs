use async_trait::async_trait;
use models::Project;
use tracing::instrument;

use super::errors::TargetError;
use crate::errors::StoreError;
use crate::storage::Repository;

/// Project lookup consumed by the delivery target usecase.
#[async_trait]
pub trait ProjectService: Send + Sync {
    /// Fails with [`TargetError::ProjectNotFound`] when no such project exists.
    async fn get_project(&self, name: &str) -> Result<Project, TargetError>;
}

/// Reads projects from the shared document store.
#[derive(Clone)]
pub struct StoreProjectService {
    projects: Repository<Project>,
}

impl StoreProjectService {
    pub fn new(projects: Repository<Project>) -> Self { Self { projects } }
}

#[async_trait]
impl ProjectService for StoreProjectService {
    #[instrument(skip(self))]
    async fn get_project(&self, name: &str) -> Result<Project, TargetError> {
        match self.projects.get(name).await {
            Ok(project) => Ok(project),
            Err(StoreError::RecordNotExist) => Err(TargetError::ProjectNotFound(name.to_string())),
            Err(e) => Err(e.into()),
        }
    }
}

/// Simple in-memory mock for tests and doc examples
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockProjectService {
        projects: Mutex<HashMap<String, Project>>,
    }

    impl MockProjectService {
        pub fn with_project(self, name: &str, namespace: &str) -> Self {
            let project = Project { name: name.to_string(), alias: name.to_uppercase(), namespace: namespace.to_string(), ..Default::default() };
            self.projects.lock().unwrap().insert(name.to_string(), project);
            self
        }
    }

    #[async_trait]
    impl ProjectService for MockProjectService {
        async fn get_project(&self, name: &str) -> Result<Project, TargetError> {
            let projects = self.projects.lock().unwrap();
            projects.get(name).cloned().ok_or_else(|| TargetError::ProjectNotFound(name.to_string()))
        }
    }
}
