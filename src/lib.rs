pub mod domain;
pub mod infra;
pub mod store;
pub mod types;
