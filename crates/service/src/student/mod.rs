//! Student module: three-layer architecture (domain, repository, service).
//!
//! Centralizes student create/list/get/update/delete business logic under the service crate.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::StudentService;
