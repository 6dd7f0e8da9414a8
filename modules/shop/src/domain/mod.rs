pub mod error;
pub mod locks;
pub mod ports;
pub mod repo;
pub mod service;
