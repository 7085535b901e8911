//! Server side of a paging, sorting and filtering data grid.
//!
//! A [`DataSource`](usecase::services::data_source::DataSource) answers the
//! grid's page requests (`skip`, `take`, `sort[0][...]`,
//! `filter[filters][i][...]`) from a
//! [`DataProvider`](usecase::ports::provider::DataProvider) and returns the
//! page as `{"__count": <size>, "results": [...]}`.

pub mod config;
pub mod domain;
pub mod infra;
pub mod usecase;
