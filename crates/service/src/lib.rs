//! Service layer for delivery targets.
//! - `storage`: document store abstraction, its backends and typed repositories.
//! - `delivery_target`: the delivery target usecase and its project lookup.
//! - `bootstrap`: wiring from configuration.

pub mod errors;
pub mod storage;
pub mod delivery_target;
pub mod bootstrap;
#[cfg(test)]
pub mod test_support;

pub use delivery_target::DeliveryTargetService;
pub use errors::StoreError;
