//! Directory module - typed entities and the raw-record normalizer.

mod directory_model;
mod directory_service;


pub use directory_model::{Company, CompanyStatus, Directory, Founder, Vehicle};
pub use directory_service::{
    build_directory, COMPANIES_TABLE, FOUNDERS_TABLE, ROUNDS_TABLE, VEHICLES_TABLE,
};
