pub mod config;
pub mod message;
pub mod mode;
pub mod session;
pub mod store;
