//! Delivery target usecase: three-layer split (domain, errors, service) plus
//! the project lookup it depends on.

pub mod domain;
pub mod errors;
pub mod project;
pub mod service;

pub use errors::TargetError;
pub use project::{ProjectService, StoreProjectService};
pub use service::{AppCounter, DeliveryTargetService, NoAppCounter};
