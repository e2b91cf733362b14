use chrono::NaiveDate;
use hourglass_rs::{SafeTimeProvider, TimeSource};
use tracing::{info, warn};

use crate::aggregate::{retain_outstanding, Aggregator};
use crate::config::SimplifyConfig;
use crate::identity::merge_by_name;
use crate::normalize::{parse_report_date, TransactionNormalizer};
use crate::report::{Report, REPORT_DATE_OPTION};
use crate::summary::AgingSummary;

/// turns aging detail reports into collections summaries
///
/// The engine holds only configuration; each call to
/// [`AgingEngine::simplify`] builds and drops its own accumulators.
#[derive(Debug, Clone, Default)]
pub struct AgingEngine {
    config: SimplifyConfig,
}

impl AgingEngine {
    pub fn new(config: SimplifyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SimplifyConfig {
        &self.config
    }

    /// as-of date: configured override, then the report's own date, then today (utc)
    pub fn as_of_date(&self, report: &Report, time_provider: &SafeTimeProvider) -> NaiveDate {
        if let Some(as_of) = self.config.as_of_override {
            return as_of;
        }
        match report.option(REPORT_DATE_OPTION).and_then(parse_report_date) {
            Some(as_of) => as_of,
            None => {
                let today = time_provider.now().date_naive();
                warn!(%today, "report has no usable report_date; aging against today");
                today
            }
        }
    }

    /// simplify one report
    pub fn simplify(&self, report: &Report, time_provider: &SafeTimeProvider) -> AgingSummary {
        let as_of = self.as_of_date(report, time_provider);
        let normalizer =
            TransactionNormalizer::for_report(report, as_of, self.config.unknown_customer_label.as_str());
        let transactions = normalizer.extract(report);
        let transaction_count = transactions.len();

        let mut aggregator = Aggregator::new();
        aggregator.extend(transactions);
        let mut customers = aggregator.finish();

        let merge = self.config.merges_names();
        if merge {
            customers = merge_by_name(customers);
        }
        let customers = retain_outstanding(customers);

        let summary = AgingSummary::assemble(report.generated_at().cloned(), customers, merge);
        info!(
            %as_of,
            transactions = transaction_count,
            customers = summary.rows.len(),
            merged = merge,
            "simplified aging report"
        );
        summary
    }
}

/// simplify with the default configuration on the system clock
pub fn simplify_ar_aging(report: &Report) -> AgingSummary {
    let time = SafeTimeProvider::new(TimeSource::System);
    AgingEngine::default().simplify(report, &time)
}
