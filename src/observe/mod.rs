pub mod reconcile;
pub mod registry;
pub mod throttle;
