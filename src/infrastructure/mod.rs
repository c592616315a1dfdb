//! Infrastructure layer - Storage backends, security and services

pub mod api_key;
pub mod auth;
pub mod logging;
pub mod permission;
pub mod repository;
pub mod storage;
pub mod user;
