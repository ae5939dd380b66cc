pub mod config;
pub mod data;
pub mod error;
pub mod id;
pub mod pagination;
pub mod state;
