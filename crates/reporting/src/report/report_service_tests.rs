use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::*;
use crate::directory::{Company, CompanyStatus, Directory, Founder, Vehicle};
use crate::errors::{ReportError, Result};
use crate::summary::{OwnershipTotal, OwnershipValue, Summary};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
}

fn company(name: &str, vehicles: &[&str], valuation: Option<Decimal>) -> Company {
    Company {
        name: name.to_string(),
        location: Some("Berlin".to_string()),
        ceo: None,
        vehicles: vehicles.iter().map(|v| v.to_string()).collect(),
        description: Some("Builds things.".to_string()),
        quarterly_update: Some("Shipped.".to_string()),
        logo_url: Some(format!("mem://{}.bmp", name)),
        website: Some("https://example.com".to_string()),
        initial_investment: Some(date("2020-01-15")),
        status: CompanyStatus::Active,
        valuation,
    }
}

fn vehicle(name: &str) -> Vehicle {
    Vehicle {
        name: name.to_string(),
        logo_url: Some(format!("mem://{}.bmp", name)),
    }
}

fn summary(company_name: &str, vehicle_id: &str, date_s: &str, ownership: Option<OwnershipValue>) -> Summary {
    Summary {
        company_name: company_name.to_string(),
        round_label: Some("Seed".to_string()),
        vehicle: Some(vehicle_id.to_string()),
        date: date(date_s),
        round_size: Some(dec!(1000000)),
        entry_valuation: Some(dec!(5000000)),
        invested: Some(dec!(250000)),
        fair_value: Some(dec!(400000)),
        ownership,
    }
}

fn options() -> ReportOptions {
    ReportOptions {
        cutoff: date("2021-09-30"),
        period_label: "Q3 2021".to_string(),
        sort: CompanySort::ValuationDesc,
        active_only: true,
    }
}

fn two_company_directory() -> Directory {
    let mut directory = Directory::default();
    directory.vehicles.insert("veh1".to_string(), vehicle("Fund I"));
    directory
        .companies
        .insert("recA".to_string(), company("Alpha", &["veh1"], Some(dec!(500))));
    directory
        .companies
        .insert("recB".to_string(), company("Beta", &["veh1"], Some(dec!(100))));
    directory
}

#[test]
fn test_one_cover_per_vehicle_sorted_by_name() {
    let mut directory = Directory::default();
    directory.vehicles.insert("veh2".to_string(), vehicle("Fund II"));
    directory.vehicles.insert("veh1".to_string(), vehicle("Fund I"));
    directory.vehicles.insert("veh3".to_string(), vehicle("Fund III"));

    let plan = plan_report(&directory, &[], &options()).unwrap();

    let names: Vec<_> = plan.sections.iter().map(|s| s.vehicle_name.as_str()).collect();
    assert_eq!(names, vec!["Fund I", "Fund II", "Fund III"]);
}

#[test]
fn test_valuation_descending_order() {
    let directory = two_company_directory();
    let plan = plan_report(&directory, &[], &options()).unwrap();

    let pages: Vec<_> = plan.sections[0]
        .companies
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(pages, vec!["Alpha", "Beta"]);
}

#[test]
fn test_name_ascending_order_for_earlier_edition() {
    let mut directory = Directory::default();
    directory.vehicles.insert("veh1".to_string(), vehicle("Fund I"));
    // Beta is worth more, but the earlier edition sorts by name.
    directory
        .companies
        .insert("recA".to_string(), company("Alpha", &["veh1"], Some(dec!(100))));
    directory
        .companies
        .insert("recB".to_string(), company("Beta", &["veh1"], Some(dec!(900))));

    let mut opts = options();
    opts.sort = CompanySort::NameAsc;
    let plan = plan_report(&directory, &[], &opts).unwrap();

    let pages: Vec<_> = plan.sections[0]
        .companies
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(pages, vec!["Alpha", "Beta"]);
}

#[test]
fn test_company_invested_after_cutoff_is_excluded() {
    let mut directory = two_company_directory();
    if let Some(c) = directory.companies.get_mut("recB") {
        c.initial_investment = Some(date("2021-12-01"));
    }

    let plan = plan_report(&directory, &[], &options()).unwrap();

    let pages: Vec<_> = plan.sections[0]
        .companies
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(pages, vec!["Alpha"]);
}

#[test]
fn test_non_active_company_is_excluded_when_tracking_status() {
    let mut directory = two_company_directory();
    if let Some(c) = directory.companies.get_mut("recB") {
        c.status = CompanyStatus::Other("Exited".to_string());
    }

    let plan = plan_report(&directory, &[], &options()).unwrap();
    let pages: Vec<_> = plan.sections[0]
        .companies
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(pages, vec!["Alpha"]);

    // The earlier edition does not track status at all.
    let mut opts = options();
    opts.active_only = false;
    let plan = plan_report(&directory, &[], &opts).unwrap();
    assert_eq!(plan.sections[0].companies.len(), 2);
}

#[test]
fn test_company_outside_the_vehicle_gets_no_page() {
    let mut directory = two_company_directory();
    if let Some(c) = directory.companies.get_mut("recB") {
        c.vehicles = vec!["vehOther".to_string()];
    }

    let plan = plan_report(&directory, &[], &options()).unwrap();
    assert_eq!(plan.sections[0].companies.len(), 1);
}

#[test]
fn test_missing_company_logo_is_an_error() {
    let mut directory = two_company_directory();
    if let Some(c) = directory.companies.get_mut("recA") {
        c.logo_url = None;
    }

    let result = plan_report(&directory, &[], &options());
    assert!(matches!(result, Err(ReportError::MissingField { .. })));
}

#[test]
fn test_missing_initial_investment_is_an_error() {
    let mut directory = two_company_directory();
    if let Some(c) = directory.companies.get_mut("recA") {
        c.initial_investment = None;
    }

    let result = plan_report(&directory, &[], &options());
    assert!(matches!(result, Err(ReportError::MissingField { .. })));
}

#[test]
fn test_page_carries_rows_aggregates_and_ceo() {
    let mut directory = two_company_directory();
    directory
        .founders
        .insert("recF".to_string(), Founder { full_name: Some("Ada Lovelace".to_string()) });
    if let Some(c) = directory.companies.get_mut("recA") {
        c.ceo = Some("recF".to_string());
    }

    let summaries = vec![
        summary("Alpha", "veh1", "2021-01-01", Some(OwnershipValue::Fraction(dec!(0.05)))),
        summary("Alpha", "veh1", "2021-03-01", Some(OwnershipValue::Fraction(dec!(0.02)))),
        // Postdates the cutoff; must not appear in the table.
        summary("Alpha", "veh1", "2021-12-01", Some(OwnershipValue::Fraction(dec!(0.50)))),
    ];

    let plan = plan_report(&directory, &summaries, &options()).unwrap();
    let page = &plan.sections[0].companies[0];

    assert_eq!(page.ceo.as_deref(), Some("Ada Lovelace"));
    assert_eq!(page.rows.len(), 2);
    assert_eq!(page.ownership, OwnershipTotal::Known(dec!(0.07)));
    assert_eq!(page.invested_total, dec!(500000));
    assert_eq!(page.fair_value_total, dec!(800000));
}

#[test]
fn test_poisoned_ownership_reaches_the_page_as_unknown() {
    let directory = two_company_directory();
    let summaries = vec![
        summary("Alpha", "veh1", "2021-01-01", Some(OwnershipValue::Fraction(dec!(0.05)))),
        summary("Alpha", "veh1", "2021-02-01", None),
    ];

    let plan = plan_report(&directory, &summaries, &options()).unwrap();
    assert_eq!(plan.sections[0].companies[0].ownership, OwnershipTotal::Unknown);
}

// ---------------------------------------------------------------------------
// Rendering
// ---------------------------------------------------------------------------

/// Stub fetcher serving a tiny in-memory bitmap for every URL.
struct StubFetcher;

#[async_trait]
impl AttachmentFetcher for StubFetcher {
    async fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
        Ok(tiny_bmp())
    }
}

/// A valid 2x2 24-bit BMP, built by hand so the test needs no assets.
fn tiny_bmp() -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(b"BM");
    bytes.extend_from_slice(&70u32.to_le_bytes()); // file size: 54 header + 16 pixel bytes
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&54u32.to_le_bytes()); // pixel data offset
    bytes.extend_from_slice(&40u32.to_le_bytes()); // BITMAPINFOHEADER
    bytes.extend_from_slice(&2i32.to_le_bytes()); // width
    bytes.extend_from_slice(&2i32.to_le_bytes()); // height
    bytes.extend_from_slice(&1u16.to_le_bytes()); // planes
    bytes.extend_from_slice(&24u16.to_le_bytes()); // bits per pixel
    bytes.extend_from_slice(&0u32.to_le_bytes()); // no compression
    bytes.extend_from_slice(&16u32.to_le_bytes()); // pixel data size
    bytes.extend_from_slice(&2835i32.to_le_bytes()); // 72 dpi
    bytes.extend_from_slice(&2835i32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    bytes.extend_from_slice(&0u32.to_le_bytes());
    for _ in 0..2 {
        bytes.extend_from_slice(&[0xFF; 6]); // two white pixels
        bytes.extend_from_slice(&[0, 0]); // row padding to 4 bytes
    }
    bytes
}

#[tokio::test]
async fn test_render_emits_cover_plus_detail_pages() {
    let directory = two_company_directory();
    let summaries = vec![summary(
        "Alpha",
        "veh1",
        "2021-01-01",
        Some(OwnershipValue::Fraction(dec!(0.05))),
    )];
    let opts = options();
    let plan = plan_report(&directory, &summaries, &opts).unwrap();

    let renderer = ReportRenderer::new(Arc::new(StubFetcher));
    let pdf = renderer.render(&plan, &opts).await.unwrap();

    // One cover for Fund I plus one detail page per company.
    assert_eq!(pdf.page_count(), 3);
}

#[tokio::test]
async fn test_rendered_document_is_saved_to_disk() {
    let directory = two_company_directory();
    let opts = options();
    let plan = plan_report(&directory, &[], &opts).unwrap();

    let renderer = ReportRenderer::new(Arc::new(StubFetcher));
    let pdf = renderer.render(&plan, &opts).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("2021-Q3.pdf");
    pdf.save(&path).unwrap();

    let bytes = std::fs::read(&path).unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}
