/// quick start - simplify a small aging report
use ar_aging::{simplify_ar_aging, Report};

const REPORT: &str = r#"{
  "Header": {
    "Time": "2024-03-01T09:30:00-08:00",
    "Option": [{"Name": "report_date", "Value": "2024-03-01"}]
  },
  "Columns": {"Column": [
    {"ColTitle": "Transaction Type", "MetaData": [{"Name": "ColKey", "Value": "txn_type"}]},
    {"ColTitle": "Num", "MetaData": [{"Name": "ColKey", "Value": "doc_num"}]},
    {"ColTitle": "Customer", "MetaData": [{"Name": "ColKey", "Value": "cust_name"}]},
    {"ColTitle": "Due Date", "MetaData": [{"Name": "ColKey", "Value": "due_date"}]},
    {"ColTitle": "Open Balance", "MetaData": [{"Name": "ColKey", "Value": "subt_open_bal"}]}
  ]},
  "Rows": {"Row": [{
    "type": "Section",
    "Rows": {"Row": [
      {"type": "Data", "ColData": [{"value": "Invoice"}, {"value": "1001"}, {"value": "Acme:HQ", "id": "58"}, {"value": "2024-02-15"}, {"value": "100.00"}]},
      {"type": "Data", "ColData": [{"value": "Invoice"}, {"value": "0950"}, {"value": "Acme", "id": "58"}, {"value": "2023-11-01"}, {"value": "50.00"}]},
      {"type": "Data", "ColData": [{"value": "Credit Memo"}, {"value": "CM-4"}, {"value": "Beta Corp", "id": "61"}, {"value": ""}, {"value": "-20.00"}]}
    ]}
  }]}
}"#;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let report = Report::from_json(REPORT)?;
    let summary = simplify_ar_aging(&report);

    println!("{}", summary.to_json_pretty()?);

    Ok(())
}
