//! Auth module: three-layer architecture (domain, repository, service).
//!
//! Registration, login, session tokens and password changes live here,
//! independent of the web framework.

pub mod domain;
pub mod errors;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::AuthService;
