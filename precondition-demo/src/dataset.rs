//! Sample data served by the demo: a couple of emission reports to edit
//! concurrently, and a large emissions table to page through.

use anyhow::anyhow;
use chrono::{Days, NaiveDate, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use precondition::report::{EmissionReport, ReportStatus};

const COMPANIES: [&str; 5] = [
    "EcoTech",
    "GreenEnergy",
    "SustainCorp",
    "BioFutures",
    "EarthFriendly",
];

const SOURCES: [&str; 5] = [
    "electricity",
    "transportation",
    "manufacturing",
    "heating",
    "waste",
];

/// A single daily emission measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emission {
    pub id: u64,
    pub company_id: u32,
    pub company_name: String,
    pub date: NaiveDate,
    pub co2_tons: f64,
    pub source: String,
}

/// Returns the reports every demo run starts from.
pub fn seed_reports() -> Vec<EmissionReport> {
    vec![
        EmissionReport {
            id: 1,
            title: "Annual Emissions Report 2023".to_owned(),
            description: "Corporate carbon footprint analysis".to_owned(),
            co2_total: 1500.5,
            status: ReportStatus::Draft,
            created_at: NaiveDate::from_ymd_opt(2023, 10, 15).expect("valid seed date"),
            updated_at: Utc
                .with_ymd_and_hms(2023, 12, 20, 14, 30, 0)
                .single()
                .expect("valid seed timestamp"),
            updated_by: None,
        },
        EmissionReport {
            id: 2,
            title: "Emissions Q1 2024".to_owned(),
            description: "First quarter emissions".to_owned(),
            co2_total: 420.8,
            status: ReportStatus::Published,
            created_at: NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid seed date"),
            updated_at: Utc
                .with_ymd_and_hms(2024, 2, 2, 9, 15, 0)
                .single()
                .expect("valid seed timestamp"),
            updated_by: None,
        },
    ]
}

/// Generates `count` emission rows, one per day starting from 2020-01-01.
///
/// The same `seed` always yields the same rows. Fails when `count` days
/// from the start date fall outside the supported calendar.
pub fn generate_emissions(count: u64, seed: u64) -> anyhow::Result<Vec<Emission>> {
    let mut rng = StdRng::seed_from_u64(seed);
    let start = NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid start date");

    start
        .checked_add_days(Days::new(count.saturating_sub(1)))
        .ok_or_else(|| anyhow!("{count} emissions fall outside the supported date range"))?;

    let rows = (1..=count)
        .map(|id| {
            let tons: f64 = rng.gen_range(50.0..250.0);

            Emission {
                id,
                company_id: rng.gen_range(1..=5),
                company_name: COMPANIES[rng.gen_range(0..COMPANIES.len())].to_owned(),
                // In range: the last date was checked above.
                date: start + Days::new(id - 1),
                co2_tons: (tons * 10.0).round() / 10.0,
                source: SOURCES[rng.gen_range(0..SOURCES.len())].to_owned(),
            }
        })
        .collect();

    Ok(rows)
}
