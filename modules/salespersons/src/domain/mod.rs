pub mod cascade;
pub mod dependencies;
pub mod error;
pub mod force;
pub mod identity;
pub mod ports;
pub mod repo;
pub mod service;
