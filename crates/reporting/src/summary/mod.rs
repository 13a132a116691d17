//! Summary module - the flattened round list and per-company aggregates.

mod summary_model;
mod summary_service;


pub use summary_model::{CompanyAggregates, OwnershipTotal, OwnershipValue, Summary};
pub use summary_service::{aggregate_company, build_summaries, qualifying};
