pub mod column;
pub mod dataset;
pub mod page;
pub mod property;
pub mod record;
pub mod value;
