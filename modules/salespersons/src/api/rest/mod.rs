pub mod dto;
pub mod error;
pub mod guard;
pub mod handlers;
pub mod openapi;
pub mod routes;
