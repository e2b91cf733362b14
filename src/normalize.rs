use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::decimal::Money;
use crate::identity::clean_customer_name;
use crate::report::columns::{CUST_NAME, DOC_NUM, DUE_DATE, OPEN_BALANCE, TXN_TYPE};
use crate::report::{ColumnIndex, Report, Row};
use crate::types::{BucketKey, CustomerRef};

/// one open line from the aging report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgingTransaction {
    pub customer_display_name: String,
    pub customer_ref: Option<CustomerRef>,
    pub doc_num: Option<String>,
    pub txn_type: String,
    pub due_date: Option<NaiveDate>,
    pub days_past_due: i64,
    pub bucket: BucketKey,
    pub amount: Money,
}

/// parse a report date: full ISO-8601 timestamp first, then a bare date
pub fn parse_report_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.date_naive());
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, format) {
            return Some(dt.date());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// whole calendar days from due date to as-of date; zero without a due date
pub fn days_past_due(as_of: NaiveDate, due_date: Option<NaiveDate>) -> i64 {
    due_date.map(|due| (as_of - due).num_days()).unwrap_or(0)
}

/// turns data rows into aging transactions against a fixed as-of date
#[derive(Debug, Clone)]
pub struct TransactionNormalizer {
    index: ColumnIndex,
    as_of: NaiveDate,
    unknown_customer: String,
}

impl TransactionNormalizer {
    pub fn new(index: ColumnIndex, as_of: NaiveDate, unknown_customer: impl Into<String>) -> Self {
        Self {
            index,
            as_of,
            unknown_customer: unknown_customer.into(),
        }
    }

    /// resolve columns for this report
    pub fn for_report(report: &Report, as_of: NaiveDate, unknown_customer: impl Into<String>) -> Self {
        let index = ColumnIndex::from_columns(&report.columns);
        let missing = index.missing_recognized();
        if index.is_empty() {
            warn!("report has no column metadata; every row will be dropped");
        } else if !missing.is_empty() {
            warn!(?missing, "report is missing recognized columns");
        }
        debug!(columns = index.len(), %as_of, "resolved report columns");
        Self::new(index, as_of, unknown_customer)
    }

    /// normalize one data row; zero-balance rows yield nothing
    pub fn normalize_row(&self, row: &Row) -> Option<AgingTransaction> {
        let index = &self.index;

        let amount = index
            .text(row, OPEN_BALANCE)
            .map(|text| Money::parse_lenient(&text))
            .unwrap_or(Money::ZERO);
        if amount.is_zero() {
            debug!(doc_num = ?index.text(row, DOC_NUM), "dropping zero-balance row");
            return None;
        }

        let name_cell = index.cell(row, CUST_NAME);
        let raw_name = name_cell
            .and_then(|cell| cell.text())
            .filter(|name| !name.is_empty())
            .map(|name| name.into_owned())
            .unwrap_or_else(|| self.unknown_customer.clone());
        let customer_ref = name_cell.and_then(|cell| cell.id()).map(|id| id.into_owned());

        let due_date = index.text(row, DUE_DATE).and_then(|text| parse_report_date(&text));
        let days = days_past_due(self.as_of, due_date);

        Some(AgingTransaction {
            customer_display_name: clean_customer_name(&raw_name),
            customer_ref,
            doc_num: index.text(row, DOC_NUM).map(|d| d.into_owned()),
            txn_type: index.text(row, TXN_TYPE).map(|t| t.into_owned()).unwrap_or_default(),
            due_date,
            days_past_due: days,
            bucket: BucketKey::for_days(days),
            amount,
        })
    }

    /// every non-zero data row in report order
    pub fn extract(&self, report: &Report) -> Vec<AgingTransaction> {
        report
            .data_rows()
            .filter_map(|row| self.normalize_row(row))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn as_of() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
    }

    fn report(rows: serde_json::Value) -> Report {
        serde_json::from_value(json!({
            "Columns": {"Column": [
                {"MetaData": [{"Name": "ColKey", "Value": "tx_date"}]},
                {"MetaData": [{"Name": "ColKey", "Value": "txn_type"}]},
                {"MetaData": [{"Name": "ColKey", "Value": "doc_num"}]},
                {"MetaData": [{"Name": "ColKey", "Value": "cust_name"}]},
                {"MetaData": [{"Name": "ColKey", "Value": "due_date"}]},
                {"MetaData": [{"Name": "ColKey", "Value": "subt_open_bal"}]}
            ]},
            "Rows": {"Row": [{"type": "Section", "Rows": {"Row": rows}}]}
        }))
        .unwrap()
    }

    fn data(cells: serde_json::Value) -> serde_json::Value {
        json!({"type": "Data", "ColData": cells})
    }

    #[test]
    fn test_parse_report_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 2, 15);
        assert_eq!(parse_report_date("2024-02-15"), expected);
        assert_eq!(parse_report_date("2024-02-15T23:59:59"), expected);
        assert_eq!(parse_report_date("2024-02-15T23:59:59.250"), expected);
        assert_eq!(parse_report_date("2024-02-15 08:00:00"), expected);
        assert_eq!(parse_report_date("2024-02-15T10:00:00-08:00"), expected);
        assert_eq!(parse_report_date("2024-02-15T10:00:00Z"), expected);
        assert_eq!(parse_report_date("N/A"), None);
        assert_eq!(parse_report_date(""), None);
        assert_eq!(parse_report_date("2024-02-30"), None);
    }

    #[test]
    fn test_days_past_due() {
        assert_eq!(days_past_due(as_of(), NaiveDate::from_ymd_opt(2024, 2, 15)), 15);
        assert_eq!(days_past_due(as_of(), NaiveDate::from_ymd_opt(2023, 11, 1)), 121);
        assert_eq!(days_past_due(as_of(), NaiveDate::from_ymd_opt(2024, 3, 31)), -30);
        assert_eq!(days_past_due(as_of(), None), 0);
    }

    #[test]
    fn test_normalize_full_row() {
        let report = report(json!([data(json!([
            {"value": "2024-01-15"},
            {"value": "Invoice"},
            {"value": "1001"},
            {"value": "Acme:HQ", "id": "58"},
            {"value": "2024-02-15"},
            {"value": "100.00"}
        ]))]));
        let normalizer = TransactionNormalizer::for_report(&report, as_of(), "Unknown");
        let txns = normalizer.extract(&report);

        assert_eq!(txns.len(), 1);
        let txn = &txns[0];
        assert_eq!(txn.customer_display_name, "Acme");
        assert_eq!(txn.customer_ref.as_deref(), Some("58"));
        assert_eq!(txn.doc_num.as_deref(), Some("1001"));
        assert_eq!(txn.txn_type, "Invoice");
        assert_eq!(txn.days_past_due, 15);
        assert_eq!(txn.bucket, BucketKey::Days1To20);
        assert_eq!(txn.amount, Money::from_decimal(dec!(100.00)));
    }

    #[test]
    fn test_zero_and_unparsable_amounts_are_dropped() {
        let report = report(json!([
            data(json!([{}, {"value": "Invoice"}, {"value": "1"}, {"value": "Zero"}, {"value": ""}, {"value": "0.00"}])),
            data(json!([{}, {"value": "Invoice"}, {"value": "2"}, {"value": "Bad"}, {"value": ""}, {"value": "twelve"}])),
            data(json!([{}, {"value": "Invoice"}, {"value": "3"}, {"value": "Short"}]))
        ]));
        let normalizer = TransactionNormalizer::for_report(&report, as_of(), "Unknown");
        assert!(normalizer.extract(&report).is_empty());
    }

    #[test]
    fn test_unparsable_due_date_is_current() {
        let report = report(json!([data(json!([
            {}, {"value": "Invoice"}, {"value": "9"}, {"value": "Delta"}, {"value": "N/A"}, {"value": "25.00"}
        ]))]));
        let txns = TransactionNormalizer::for_report(&report, as_of(), "Unknown").extract(&report);
        assert_eq!(txns[0].due_date, None);
        assert_eq!(txns[0].days_past_due, 0);
        assert_eq!(txns[0].bucket, BucketKey::Current);
    }

    #[test]
    fn test_missing_customer_and_type_defaults() {
        let report = report(json!([data(json!([
            {}, {}, {}, {"value": ""}, {"value": "2024-01-01"}, {"value": -20}
        ]))]));
        let txns = TransactionNormalizer::for_report(&report, as_of(), "Unknown").extract(&report);
        assert_eq!(txns[0].customer_display_name, "Unknown");
        assert_eq!(txns[0].customer_ref, None);
        assert_eq!(txns[0].doc_num, None);
        assert_eq!(txns[0].txn_type, "");
        assert_eq!(txns[0].amount, Money::from_major(-20));
        assert_eq!(txns[0].bucket, BucketKey::Days46To60);
    }
}
