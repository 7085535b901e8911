pub mod provider;
pub mod repo;
