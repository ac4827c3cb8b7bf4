pub mod applications;
pub mod config;
pub mod db;
pub mod error;
pub mod openapi;
pub mod telemetry;
