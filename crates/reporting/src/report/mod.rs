//! Report module - page planning and rendering.

mod format;
mod report_model;
mod report_service;

#[cfg(test)]
mod report_service_tests;

pub use format::{currency, ownership};
pub use report_model::{
    CompanyPage, CompanySort, FinancingRow, Quarter, ReportOptions, ReportPlan, VehicleSection,
};
pub use report_service::{plan_report, AttachmentFetcher, ReportRenderer};
