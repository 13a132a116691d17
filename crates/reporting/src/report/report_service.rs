//! Plans the page sequence and renders it onto the PDF surface.
//!
//! Planning is pure: it resolves ordering, inclusion filters, and page
//! content from the directory and summaries, so every layout decision
//! is testable without a PDF device or the network. Rendering walks
//! the plan, downloading logos through the [`AttachmentFetcher`] seam
//! and issuing surface calls.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};

use quarterbook_airtable::AirtableClient;

use crate::directory::{Company, Directory, COMPANIES_TABLE, VEHICLES_TABLE};
use crate::errors::{ReportError, Result};
use crate::pdf::{Align, FontStyle, Ln, PdfSurface};
use crate::report::format::{currency, ownership};
use crate::report::report_model::{
    CompanyPage, CompanySort, FinancingRow, ReportOptions, ReportPlan, VehicleSection,
};
use crate::summary::{aggregate_company, qualifying, Summary};

/// Downloads attachment content (logos) during rendering.
#[async_trait]
pub trait AttachmentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>>;
}

#[async_trait]
impl AttachmentFetcher for AirtableClient {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        Ok(self.fetch_bytes(url).await?)
    }
}

/// Build the page sequence: vehicles by name, and within each vehicle
/// the companies that pass the inclusion filters, in the configured
/// order.
pub fn plan_report(
    directory: &Directory,
    summaries: &[Summary],
    options: &ReportOptions,
) -> Result<ReportPlan> {
    let mut vehicles: Vec<(&String, _)> = directory.vehicles.iter().collect();
    vehicles.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));

    let mut companies: Vec<(&String, &Company)> = directory.companies.iter().collect();
    match options.sort {
        CompanySort::NameAsc => {
            companies.sort_by(|a, b| a.1.name.cmp(&b.1.name).then_with(|| a.0.cmp(b.0)));
        }
        CompanySort::ValuationDesc => {
            companies.sort_by(|a, b| {
                b.1.valuation
                    .unwrap_or_default()
                    .cmp(&a.1.valuation.unwrap_or_default())
                    .then_with(|| a.1.name.cmp(&b.1.name))
            });
        }
    }

    let mut sections = Vec::new();
    for (vehicle_id, vehicle) in &vehicles {
        let logo_url = vehicle
            .logo_url
            .clone()
            .ok_or_else(|| ReportError::missing(VEHICLES_TABLE, vehicle_id, "Logo"))?;

        let mut pages = Vec::new();
        for (company_id, company) in &companies {
            if !company.vehicles.iter().any(|v| v == *vehicle_id) {
                continue;
            }
            if options.active_only && !company.status.is_active() {
                continue;
            }
            let initial_investment = company.initial_investment.ok_or_else(|| {
                ReportError::missing(COMPANIES_TABLE, company_id, "Initial Investment")
            })?;
            if initial_investment > options.cutoff {
                continue;
            }
            pages.push(company_page(directory, summaries, options, company_id, company)?);
        }

        debug!(
            "Vehicle '{}': {} company pages",
            vehicle.name,
            pages.len()
        );
        sections.push(VehicleSection {
            vehicle_name: vehicle.name.clone(),
            logo_url,
            companies: pages,
        });
    }

    Ok(ReportPlan { sections })
}

fn company_page(
    directory: &Directory,
    summaries: &[Summary],
    options: &ReportOptions,
    company_id: &str,
    company: &Company,
) -> Result<CompanyPage> {
    let logo_url = company
        .logo_url
        .clone()
        .ok_or_else(|| ReportError::missing(COMPANIES_TABLE, company_id, "Logo"))?;
    let aggregates =
        aggregate_company(summaries, &company.name, options.cutoff, &directory.vehicles);
    let rows = qualifying(summaries, &company.name, options.cutoff, &directory.vehicles)
        .map(FinancingRow::from)
        .collect();

    Ok(CompanyPage {
        name: company.name.clone(),
        logo_url,
        ceo: directory.ceo_name(company).map(str::to_string),
        location: company.location.clone(),
        website: company.website.clone(),
        ownership: aggregates.ownership,
        description: company.description.clone(),
        update: company.quarterly_update.clone(),
        rows,
        invested_total: aggregates.invested,
        fair_value_total: aggregates.fair_value,
    })
}

/// Financing table column widths, mm.
const COL_ROUND: f32 = 52.0;
const COL_DATE: f32 = 30.0;
const COL_SIZE: f32 = 30.0;
const COL_VALUATION: f32 = 30.0;
const COL_INVESTED: f32 = 27.0;
const COL_FAIR_VALUE: f32 = 27.0;

const BODY_SIZE: f32 = 12.0;
const ROW_HEIGHT: f32 = 7.0;
/// Header-cell shade (the legacy 200/255 gray).
const HEADER_GRAY: f32 = 200.0 / 255.0;

/// Renders a [`ReportPlan`] onto a fresh [`PdfSurface`].
pub struct ReportRenderer {
    fetcher: Arc<dyn AttachmentFetcher>,
}

impl ReportRenderer {
    pub fn new(fetcher: Arc<dyn AttachmentFetcher>) -> Self {
        Self { fetcher }
    }

    pub async fn render(&self, plan: &ReportPlan, options: &ReportOptions) -> Result<PdfSurface> {
        let mut pdf = PdfSurface::new(&options.period_label)?;
        for section in &plan.sections {
            self.cover_page(&mut pdf, section, options).await?;
            for page in &section.companies {
                self.detail_page(&mut pdf, page).await?;
            }
        }
        info!(
            "Rendered {} pages across {} vehicles",
            pdf.page_count(),
            plan.sections.len()
        );
        Ok(pdf)
    }

    async fn cover_page(
        &self,
        pdf: &mut PdfSurface,
        section: &VehicleSection,
        options: &ReportOptions,
    ) -> Result<()> {
        let logo = self.fetcher.fetch(&section.logo_url).await?;

        pdf.add_page();
        pdf.set_font(FontStyle::Regular, BODY_SIZE);
        pdf.image(&logo, &section.logo_url, 87.95, Some(100.0), 40.0)?;
        pdf.set_y(150.0);
        pdf.cell(0.0, 10.0, &section.vehicle_name, false, Ln::NewLine, Align::Center, false);
        pdf.cell(0.0, ROW_HEIGHT, "Operational Summaries", false, Ln::NewLine, Align::Center, false);
        pdf.cell(0.0, ROW_HEIGHT, &options.period_label, false, Ln::NewLine, Align::Center, false);
        Ok(())
    }

    async fn detail_page(&self, pdf: &mut PdfSurface, page: &CompanyPage) -> Result<()> {
        let logo = self.fetcher.fetch(&page.logo_url).await?;

        pdf.add_page();
        pdf.set_font(FontStyle::Regular, BODY_SIZE);
        pdf.image(&logo, &page.logo_url, 77.95, None, 60.0)?;

        // Overview block: CEO/location on one line, website/ownership
        // on the next.
        pdf.set_font(FontStyle::Bold, BODY_SIZE);
        pdf.set_y(60.0);
        pdf.cell(0.0, ROW_HEIGHT, "Overview", false, Ln::NewLine, Align::Left, false);
        pdf.set_font(FontStyle::Regular, BODY_SIZE);
        let ceo_line = format!("CEO: {}", page.ceo.as_deref().unwrap_or(""));
        let location_line = format!("Location: {}", page.location.as_deref().unwrap_or(""));
        let website_line = format!("Website: {}", page.website.as_deref().unwrap_or(""));
        let ownership_line = format!("Ownership: {}", ownership(&page.ownership));
        pdf.cell(0.0, ROW_HEIGHT, &ceo_line, false, Ln::Right, Align::Left, false);
        pdf.cell(0.0, ROW_HEIGHT, &location_line, false, Ln::NewLine, Align::Right, false);
        pdf.cell(0.0, ROW_HEIGHT, &website_line, false, Ln::Right, Align::Left, false);
        pdf.cell(0.0, ROW_HEIGHT, &ownership_line, false, Ln::NewLine, Align::Right, false);

        pdf.ln(1.0);
        pdf.multi_cell(0.0, ROW_HEIGHT, page.description.as_deref().unwrap_or(""), Align::Left);

        self.financing_table(pdf, page);

        pdf.ln(1.0);
        pdf.set_font(FontStyle::Bold, BODY_SIZE);
        pdf.cell(0.0, ROW_HEIGHT, "Operational Update", false, Ln::NewLine, Align::Left, false);
        pdf.set_font(FontStyle::Regular, BODY_SIZE);
        pdf.multi_cell(0.0, ROW_HEIGHT, page.update.as_deref().unwrap_or(""), Align::Left);
        Ok(())
    }

    fn financing_table(&self, pdf: &mut PdfSurface, page: &CompanyPage) {
        pdf.ln(1.0);
        pdf.set_font(FontStyle::Bold, BODY_SIZE);
        pdf.cell(0.0, ROW_HEIGHT, "Financing (Unaudited)", false, Ln::Below, Align::Left, false);

        pdf.set_fill_gray(HEADER_GRAY);
        pdf.cell(COL_ROUND, ROW_HEIGHT, "Investment Round", true, Ln::Right, Align::Left, true);
        pdf.cell(COL_DATE, ROW_HEIGHT, "Date", true, Ln::Right, Align::Left, true);
        pdf.cell(COL_SIZE, ROW_HEIGHT, "Round Size", true, Ln::Right, Align::Left, true);
        pdf.cell(COL_VALUATION, ROW_HEIGHT, "Post or Cap", true, Ln::Right, Align::Left, true);
        pdf.cell(COL_INVESTED, ROW_HEIGHT, "Invested", true, Ln::Right, Align::Left, true);
        pdf.cell(COL_FAIR_VALUE, ROW_HEIGHT, "Fair Value", true, Ln::NewLine, Align::Left, true);

        pdf.set_font(FontStyle::Regular, BODY_SIZE);
        for row in &page.rows {
            let label = row.label.as_deref().unwrap_or("??");
            let date = row.date.format("%Y-%m-%d").to_string();
            pdf.cell(COL_ROUND, ROW_HEIGHT, label, true, Ln::Right, Align::Left, false);
            pdf.cell(COL_DATE, ROW_HEIGHT, &date, true, Ln::Right, Align::Left, false);
            pdf.cell(COL_SIZE, ROW_HEIGHT, &currency(row.round_size), true, Ln::Right, Align::Left, false);
            pdf.cell(COL_VALUATION, ROW_HEIGHT, &currency(row.entry_valuation), true, Ln::Right, Align::Left, false);
            pdf.cell(COL_INVESTED, ROW_HEIGHT, &currency(row.invested), true, Ln::Right, Align::Left, false);
            pdf.cell(COL_FAIR_VALUE, ROW_HEIGHT, &currency(row.fair_value), true, Ln::NewLine, Align::Left, false);
        }

        // Running totals, unbordered.
        pdf.set_font(FontStyle::Bold, BODY_SIZE);
        pdf.cell(COL_ROUND, ROW_HEIGHT, "Total", false, Ln::Right, Align::Left, false);
        pdf.cell(COL_DATE, ROW_HEIGHT, "", false, Ln::Right, Align::Left, false);
        pdf.cell(COL_SIZE, ROW_HEIGHT, "", false, Ln::Right, Align::Left, false);
        pdf.cell(COL_VALUATION, ROW_HEIGHT, "", false, Ln::Right, Align::Left, false);
        pdf.cell(COL_INVESTED, ROW_HEIGHT, &currency(Some(page.invested_total)), false, Ln::Right, Align::Left, false);
        pdf.cell(COL_FAIR_VALUE, ROW_HEIGHT, &currency(Some(page.fair_value_total)), false, Ln::NewLine, Align::Left, false);
        pdf.set_font(FontStyle::Regular, BODY_SIZE);
    }
}
