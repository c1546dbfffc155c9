//! SeaORM entities for the status page datastore.

pub mod auth_request;
pub mod event;
pub mod profile;
pub mod service;
pub mod status;
