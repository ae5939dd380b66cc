//! Shared request/response types for the storefront backend and its clients.

pub mod dashboards;
pub mod domain;
pub mod shared;
