/// name merge - fold sub-account customers into one collections row
use ar_aging::chrono::{TimeZone, Utc};
use ar_aging::{AgingEngine, Report, SafeTimeProvider, SimplifyConfig, TimeSource};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let report = Report::from_json(
        r#"{
          "Columns": {"Column": [
            {"MetaData": [{"Value": "cust_name"}]},
            {"MetaData": [{"Value": "due_date"}]},
            {"MetaData": [{"Value": "subt_open_bal"}]}
          ]},
          "Rows": {"Row": [{"type": "Section", "Rows": {"Row": [
            {"type": "Data", "ColData": [{"value": "Beta Corp", "id": "A1"}, {"value": "2024-05-01"}, {"value": "10"}]},
            {"type": "Data", "ColData": [{"value": "beta corp"}, {"value": "2024-02-01"}, {"value": "5"}]}
          ]}}]}
        }"#,
    )?;

    // no report_date in the header, so the clock decides the as-of date
    let time = SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()));

    for config in [SimplifyConfig::reference_keyed(), SimplifyConfig::name_merge()] {
        let engine = AgingEngine::new(config.clone());
        let summary = engine.simplify(&report, &time);
        println!("{:?}: {} row(s)", config.identity, summary.rows.len());
        for row in &summary.rows {
            println!(
                "  {} owes {} -> {}",
                row.customer,
                row.total_balance,
                row.recommended_action.map(|a| a.as_str()).unwrap_or("-")
            );
        }
    }

    Ok(())
}
