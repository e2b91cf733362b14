use chrono::NaiveDate;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::Value;

use crate::aggregate::CustomerAggregate;
use crate::decimal::Money;
use crate::policy::{displayed_buckets, recommend};
use crate::types::{BucketKey, BucketTotals, CollectionAction, CustomerRef};

fn money_number<S: Serializer>(amount: &Money, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(amount.to_f64())
}

fn bucket_numbers<S: Serializer>(totals: &BucketTotals, serializer: S) -> Result<S::Ok, S::Error> {
    let mut map = serializer.serialize_map(Some(BucketKey::ALL.len()))?;
    for (bucket, amount) in totals.iter() {
        map.serialize_entry(bucket.as_str(), &amount.to_f64())?;
    }
    map.end()
}

/// summary envelope; amounts stay exact until serialized
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgingSummary {
    /// report header time, passed through untouched
    pub generated_at: Option<Value>,
    pub rows: Vec<SummaryRow>,
}

/// one customer in the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub customer: String,
    pub external_ref: Option<CustomerRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_refs: Option<Vec<CustomerRef>>,
    #[serde(serialize_with = "money_number")]
    pub total_balance: Money,
    #[serde(serialize_with = "bucket_numbers")]
    pub buckets: BucketTotals,
    #[serde(serialize_with = "money_number")]
    pub credits: Money,
    pub recommended_bucket: Option<BucketKey>,
    pub recommended_action: Option<CollectionAction>,
    pub oldest_invoice: Option<OldestInvoice>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OldestInvoice {
    pub doc_num: Option<String>,
    pub txn_type: String,
    /// serialized as YYYY-MM-DD
    pub due_date: Option<NaiveDate>,
    pub days_past_due: i64,
    #[serde(serialize_with = "money_number")]
    pub amount: Money,
}

impl SummaryRow {
    /// apply the recommendation policy and shape the row
    pub fn from_aggregate(customer: CustomerAggregate, include_refs: bool) -> Self {
        let recommendation = recommend(&customer);
        let buckets = displayed_buckets(&customer, recommendation.as_ref());

        // the oldest line may come from a different source record after a merge
        let external_ref = recommendation
            .as_ref()
            .and_then(|rec| rec.oldest.customer_ref.clone())
            .or_else(|| customer.external_ref.clone());

        let (recommended_bucket, recommended_action, oldest_invoice) = match recommendation {
            Some(rec) => (
                Some(rec.bucket),
                Some(rec.action),
                Some(OldestInvoice {
                    doc_num: rec.oldest.doc_num,
                    txn_type: rec.oldest.txn_type,
                    due_date: rec.oldest.due_date,
                    days_past_due: rec.oldest.days_past_due,
                    amount: rec.oldest.amount,
                }),
            ),
            None => (None, None, None),
        };

        Self {
            customer: customer.display_name,
            external_ref,
            external_refs: include_refs.then(|| customer.external_refs.into_iter().collect()),
            total_balance: customer.total_balance,
            buckets,
            credits: customer.credits_total,
            recommended_bucket,
            recommended_action,
            oldest_invoice,
        }
    }
}

impl AgingSummary {
    /// build rows and order them by descending balance; ties keep input order
    pub fn assemble(generated_at: Option<Value>, customers: Vec<CustomerAggregate>, include_refs: bool) -> Self {
        let mut rows: Vec<SummaryRow> = customers
            .into_iter()
            .map(|customer| SummaryRow::from_aggregate(customer, include_refs))
            .collect();
        rows.sort_by(|a, b| b.total_balance.cmp(&a.total_balance));
        Self { generated_at, rows }
    }

    pub fn row(&self, customer: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|row| row.customer == customer)
    }

    pub fn total_outstanding(&self) -> Money {
        self.rows.iter().map(|row| row.total_balance).sum()
    }

    pub fn to_json_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::AgingTransaction;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn customer(name: &str, reference: Option<&str>, lines: &[(i64, Money)]) -> CustomerAggregate {
        let mut agg = CustomerAggregate::new(name);
        for (i, (days, amount)) in lines.iter().enumerate() {
            agg.record(AgingTransaction {
                customer_display_name: name.to_string(),
                customer_ref: reference.map(str::to_string),
                doc_num: Some(format!("{}", 1000 + i)),
                txn_type: "Invoice".to_string(),
                due_date: NaiveDate::from_ymd_opt(2024, 3, 1).map(|d| d - chrono::Duration::days(*days)),
                days_past_due: *days,
                bucket: BucketKey::for_days(*days),
                amount: *amount,
            });
        }
        agg
    }

    #[test]
    fn test_rows_sorted_descending_and_stable() {
        let customers = vec![
            customer("Small", None, &[(5, Money::from_major(10))]),
            customer("Big", None, &[(5, Money::from_major(500))]),
            customer("TieA", None, &[(5, Money::from_major(50))]),
            customer("TieB", None, &[(5, Money::from_major(50))]),
        ];
        let summary = AgingSummary::assemble(None, customers, false);
        let names: Vec<_> = summary.rows.iter().map(|r| r.customer.as_str()).collect();
        assert_eq!(names, vec!["Big", "TieA", "TieB", "Small"]);
        assert_eq!(summary.total_outstanding(), Money::from_major(610));
    }

    #[test]
    fn test_json_shape() {
        let customers = vec![customer(
            "Acme",
            Some("58"),
            &[(15, Money::from_decimal(dec!(100.00))), (121, Money::from_decimal(dec!(50.00)))],
        )];
        let summary = AgingSummary::assemble(Some(json!("2024-03-01T08:15:00-08:00")), customers, false);
        let value = summary.to_json_value().unwrap();

        assert_eq!(
            value,
            json!({
                "generated_at": "2024-03-01T08:15:00-08:00",
                "rows": [{
                    "customer": "Acme",
                    "external_ref": "58",
                    "total_balance": 150.0,
                    "buckets": {
                        "current": 0.0, "1-20": 0.0, "21-30": 0.0, "31-45": 0.0,
                        "46-60": 0.0, "61-90": 0.0, "91+": 150.0
                    },
                    "credits": 0.0,
                    "recommended_bucket": "91+",
                    "recommended_action": "Collections Review",
                    "oldest_invoice": {
                        "doc_num": "1001",
                        "txn_type": "Invoice",
                        "due_date": "2023-11-01",
                        "days_past_due": 121,
                        "amount": 50.0
                    }
                }]
            })
        );
    }

    #[test]
    fn test_refs_listed_only_when_requested() {
        let summary = AgingSummary::assemble(None, vec![customer("Acme", Some("58"), &[(5, Money::from_major(1))])], true);
        assert_eq!(summary.rows[0].external_refs, Some(vec!["58".to_string()]));

        let summary = AgingSummary::assemble(None, vec![customer("Acme", Some("58"), &[(5, Money::from_major(1))])], false);
        let value = summary.to_json_value().unwrap();
        assert!(value["rows"][0].get("external_refs").is_none());
    }
}
