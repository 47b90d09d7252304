//! Persisted records of the delivery target usecase layer.
//!
//! Each record kind implements [`record::Record`], which names its kind,
//! its primary key and the index fields a document store filters on.

pub mod errors;
pub mod db;
pub mod record;
pub mod document;
pub mod cluster;
pub mod project;
pub mod delivery_target;

pub use cluster::Cluster;
pub use delivery_target::{ClusterTarget, DeliveryTarget};
pub use project::Project;
pub use record::Record;
