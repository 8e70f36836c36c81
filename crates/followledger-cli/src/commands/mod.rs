pub mod enrich;
pub mod reconcile;
