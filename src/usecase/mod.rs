pub mod ports;
pub mod request;
pub mod services;
