//! Real-estate listing service: property types and the properties that use them.

pub mod api;
pub mod app;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod logging;
pub mod middleware;
pub mod routes;
pub mod seed;
pub mod store;
