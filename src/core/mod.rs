pub mod edit;
pub mod reconcile;
pub mod resolve;
pub mod summary;
pub mod tracker;
pub mod validate;
