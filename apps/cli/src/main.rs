//! Quarterly report generator.
//!
//! One run: fetch the four tables, normalize, join, plan the page
//! sequence, render, write `{year}-{quarter}.pdf` to the working
//! directory.

mod config;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use quarterbook_airtable::AirtableClient;
use quarterbook_reporting::directory::{
    COMPANIES_TABLE, FOUNDERS_TABLE, ROUNDS_TABLE, VEHICLES_TABLE,
};
use quarterbook_reporting::{
    build_directory, build_summaries, plan_report, CompanySort, Quarter, ReportOptions,
    ReportRenderer,
};

use config::Config;

/// Generate the quarterly operational report for one quarter.
#[derive(Parser, Debug)]
#[command(name = "quarterbook", version)]
struct Args {
    /// Report quarter: Q1, Q2, Q3 or Q4.
    quarter: String,
    /// Report year, e.g. 2022.
    year: i32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    dotenvy::dotenv().ok();
    init_tracing();
    let config = Config::from_env()?;

    let quarter: Quarter = args.quarter.parse()?;
    let cutoff = quarter.cutoff(args.year)?;
    let output = PathBuf::from(quarter.file_name(args.year));
    tracing::info!(
        "Generating {} report (cutoff {})",
        quarter.period_label(args.year),
        cutoff
    );

    let client = Arc::new(AirtableClient::new(
        config.api_url,
        config.base_id,
        config.api_key,
    ));
    let companies = client.fetch_all(COMPANIES_TABLE).await?;
    let vehicles = client.fetch_all(VEHICLES_TABLE).await?;
    let founders = client.fetch_all(FOUNDERS_TABLE).await?;
    let rounds = client.fetch_all(ROUNDS_TABLE).await?;

    let directory = build_directory(&companies, &vehicles, &founders)?;
    let summaries = build_summaries(&rounds, &directory)?;

    let options = ReportOptions {
        cutoff,
        period_label: quarter.period_label(args.year),
        sort: CompanySort::ValuationDesc,
        active_only: true,
    };
    let plan = plan_report(&directory, &summaries, &options)?;

    let renderer = ReportRenderer::new(client);
    let pdf = renderer.render(&plan, &options).await?;
    pdf.save(&output)?;
    tracing::info!("Wrote {}", output.display());
    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}
