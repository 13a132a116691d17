//! Quarterbook Reporting Crate
//!
//! Turns raw Airtable records into one paginated quarterly report PDF.
//!
//! # Pipeline
//!
//! ```text
//! +------------------+
//! |  Raw records     |  (quarterbook-airtable)
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Directory     |  typed company / vehicle / founder maps
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |    Summaries     |  flattened investment rounds, date-sorted
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   ReportPlan     |  pure: ordering, filters, page content
//! +------------------+
//!          |
//!          v
//! +------------------+
//! |   PdfSurface     |  cells, paragraphs, images; one PDF out
//! +------------------+
//! ```
//!
//! Data flows strictly one way; every stage is a read-only snapshot of
//! the previous one. The plan step is pure so ordering and inclusion
//! rules can be tested without a PDF device.
//!
//! # Core Types
//!
//! - [`Directory`] - retained companies, vehicles, and founders
//! - [`Summary`] - one flattened investment round (join key: company name)
//! - [`OwnershipTotal`] - `Known(p)` or `Unknown`; a single bad round
//!   poisons the whole aggregate
//! - [`ReportPlan`] - the page sequence, ready to render
//! - [`PdfSurface`] - the drawing surface wrapper

pub mod directory;
pub mod errors;
pub mod pdf;
pub mod report;
pub mod summary;
pub(crate) mod util;

pub use directory::{build_directory, Company, CompanyStatus, Directory, Founder, Vehicle};
pub use errors::{ReportError, Result};
pub use pdf::PdfSurface;
pub use report::{
    plan_report, AttachmentFetcher, CompanyPage, CompanySort, FinancingRow, Quarter,
    ReportOptions, ReportPlan, ReportRenderer, VehicleSection,
};
pub use summary::{
    aggregate_company, build_summaries, CompanyAggregates, OwnershipTotal, OwnershipValue, Summary,
};
