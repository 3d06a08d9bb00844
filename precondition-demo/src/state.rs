use std::sync::Arc;

use chrono::Utc;

use precondition::pagination::Limits;
use precondition::report::EmissionReport;
use precondition::store::{InMemory, Store};
use precondition::tracing::{InstrumentedStore, StoreExt};
use precondition::Resource;

use crate::config::Config;
use crate::dataset::{self, Emission};

pub(crate) type ReportStore = InstrumentedStore<InMemory<EmissionReport>>;

/// Shared state of the HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub(crate) reports: ReportStore,
    pub(crate) emissions: Arc<Vec<Emission>>,
    pub(crate) limits: Limits,
}

impl AppState {
    /// Builds the state described by `config`, seeding the report store
    /// and generating the emissions dataset.
    pub async fn new(config: &Config) -> anyhow::Result<Self> {
        let emissions =
            dataset::generate_emissions(config.emissions_count, config.emissions_seed)?;

        let state = Self {
            reports: InMemory::<EmissionReport>::default().with_tracing(),
            emissions: Arc::new(emissions),
            limits: config.limits(),
        };

        for report in dataset::seed_reports() {
            state.reports.insert(report).await?;
        }

        Ok(state)
    }

    /// Restores every report to its seeded content, stamped as modified now.
    ///
    /// Tokens handed out before the reset are never accepted again.
    pub(crate) async fn reset_reports(&self) -> anyhow::Result<()> {
        let now = Utc::now();

        for mut report in dataset::seed_reports() {
            report.set_last_modified(now);
            self.reports.insert(report).await?;
        }

        Ok(())
    }
}
