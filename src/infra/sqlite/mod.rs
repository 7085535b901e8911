pub mod provider;
pub mod queries;
pub mod repo;
pub mod schema;
