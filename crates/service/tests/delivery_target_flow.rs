use service::bootstrap;
use service::delivery_target::domain::{CreateDeliveryTargetRequest, UpdateDeliveryTargetRequest};
use service::delivery_target::TargetError;
use service::storage::Repository;
use models::{Cluster, ClusterTarget, Project};

async fn seed(store: std::sync::Arc<dyn service::storage::DocumentStore>) -> anyhow::Result<()> {
    let projects: Repository<Project> = Repository::new(store.clone());
    let mut p = Project { name: "proj-a".into(), alias: "Project A".into(), namespace: "ns-a".into(), ..Default::default() };
    projects.add(&mut p).await?;

    let clusters: Repository<Cluster> = Repository::new(store);
    let mut c = Cluster { name: "c2".into(), alias: "Second".into(), ..Default::default() };
    clusters.add(&mut c).await?;
    Ok(())
}

#[tokio::test]
async fn memory_backend_end_to_end() -> anyhow::Result<()> {
    let mut cfg = configs::load_from_str("[logging]\nfilter = \"warn\"\n")?;
    cfg.normalize_and_validate()?;
    let (store, svc) = bootstrap::init(&cfg).await?;
    seed(store).await?;

    // cluster c1 is unknown: create still succeeds, alias stays unset
    let req = CreateDeliveryTargetRequest {
        name: "t1".into(),
        alias: "Target One".into(),
        project: "proj-a".into(),
        cluster: Some(ClusterTarget { cluster_name: "c1".into(), namespace: String::new() }),
        ..Default::default()
    };
    let detail = svc.create(req).await?;
    assert_eq!(detail.base.namespace, "ns-a");
    assert_eq!(detail.base.project.as_ref().map(|p| p.name.as_str()), Some("proj-a"));
    assert_eq!(detail.base.app_num, 0);
    assert_eq!(detail.base.cluster.as_ref().map(|c| c.cluster_name.as_str()), Some("c1"));
    assert_eq!(detail.base.cluster_alias, None);

    let missing = CreateDeliveryTargetRequest { name: "t2".into(), project: "nope".into(), ..Default::default() };
    let err = svc.create(missing).await.unwrap_err();
    assert!(matches!(err, TargetError::ProjectNotFound(_)));
    assert_eq!(err.http_status(), 404);

    let loaded = svc.get("t1").await?;
    let update = UpdateDeliveryTargetRequest {
        alias: "Renamed".into(),
        cluster: Some(ClusterTarget { cluster_name: "c2".into(), namespace: "apps".into() }),
        ..Default::default()
    };
    let detail = svc.update(loaded, update).await?;
    assert_eq!(detail.base.cluster_alias.as_deref(), Some("Second"));
    assert_eq!(detail.base.namespace, "ns-a");

    let list = svc.list(1, 10, "proj-a").await?;
    assert_eq!(list.total, 1);
    assert_eq!(list.targets[0].alias, "Renamed");

    svc.delete("t1").await?;
    assert!(matches!(svc.get("t1").await, Err(TargetError::NotFound(_))));
    assert!(matches!(svc.delete("t1").await, Err(TargetError::NotFound(_))));
    Ok(())
}

#[tokio::test]
async fn file_backend_survives_reopen() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join(format!("delivery_targets_{}.json", uuid::Uuid::new_v4()));
    let toml = format!("[store]\nbackend = \"file\"\ndata_file = {:?}\n", path.display().to_string());
    let mut cfg = configs::load_from_str(&toml)?;
    cfg.normalize_and_validate()?;

    let store = bootstrap::open_store(&cfg).await?;
    seed(store.clone()).await?;
    let svc = bootstrap::build_delivery_target_service(store);
    svc.create(CreateDeliveryTargetRequest { name: "t1".into(), project: "proj-a".into(), ..Default::default() }).await?;

    let reopened = bootstrap::build_delivery_target_service(bootstrap::open_store(&cfg).await?);
    let target = reopened.get("t1").await?;
    assert_eq!(target.namespace, "ns-a");

    let _ = tokio::fs::remove_file(&path).await;
    Ok(())
}
