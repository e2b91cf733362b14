use crate::aggregate::CustomerAggregate;
use crate::normalize::AgingTransaction;
use crate::types::{BucketKey, BucketTotals, CollectionAction};

/// collections recommendation for one customer
#[derive(Debug, Clone, PartialEq)]
pub struct Recommendation {
    pub bucket: BucketKey,
    pub action: CollectionAction,
    /// the line the recommendation is based on
    pub oldest: AgingTransaction,
}

/// the most overdue line: higher bucket rank, then more days past due;
/// the first-seen line wins remaining ties
pub fn select_oldest(transactions: &[AgingTransaction]) -> Option<&AgingTransaction> {
    transactions.iter().reduce(|best, txn| {
        if (txn.bucket.rank(), txn.days_past_due) > (best.bucket.rank(), best.days_past_due) {
            txn
        } else {
            best
        }
    })
}

/// recommendation from a customer's debit lines, if it has any
pub fn recommend(customer: &CustomerAggregate) -> Option<Recommendation> {
    select_oldest(&customer.positive_transactions)
        .filter(|txn| txn.amount.is_positive())
        .map(|txn| Recommendation {
            bucket: txn.bucket,
            action: txn.bucket.action(),
            oldest: txn.clone(),
        })
}

/// buckets as shown to users: the whole balance under the recommended
/// bucket, or the raw subtotals when there is no recommendation
pub fn displayed_buckets(customer: &CustomerAggregate, recommendation: Option<&Recommendation>) -> BucketTotals {
    match recommendation {
        Some(rec) => BucketTotals::concentrated(rec.bucket, customer.total_balance),
        None => customer.bucket_totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decimal::Money;

    fn txn(doc: &str, days: i64, amount: i64) -> AgingTransaction {
        AgingTransaction {
            customer_display_name: "Acme".to_string(),
            customer_ref: None,
            doc_num: Some(doc.to_string()),
            txn_type: "Invoice".to_string(),
            due_date: None,
            days_past_due: days,
            bucket: BucketKey::for_days(days),
            amount: Money::from_major(amount),
        }
    }

    #[test]
    fn test_higher_bucket_wins() {
        let txns = vec![txn("a", 15, 100), txn("b", 121, 50), txn("c", 60, 10)];
        assert_eq!(select_oldest(&txns).unwrap().doc_num.as_deref(), Some("b"));
    }

    #[test]
    fn test_days_break_bucket_ties() {
        let txns = vec![txn("a", 32, 1), txn("b", 44, 1), txn("c", 40, 1)];
        assert_eq!(select_oldest(&txns).unwrap().doc_num.as_deref(), Some("b"));
    }

    #[test]
    fn test_first_seen_wins_full_ties() {
        let txns = vec![txn("a", 100, 1), txn("b", 100, 999), txn("c", 100, 5)];
        assert_eq!(select_oldest(&txns).unwrap().doc_num.as_deref(), Some("a"));
        assert!(select_oldest(&[]).is_none());
    }

    #[test]
    fn test_collapse_concentrates_total() {
        let mut customer = CustomerAggregate::new("Acme");
        customer.record(txn("a", 15, 100));
        customer.record(txn("b", 121, 50));
        customer.record(txn("credit", 0, -30));

        let rec = recommend(&customer).unwrap();
        assert_eq!(rec.bucket, BucketKey::Days91Plus);
        assert_eq!(rec.action, CollectionAction::CollectionsReview);

        let shown = displayed_buckets(&customer, Some(&rec));
        assert_eq!(shown[BucketKey::Days91Plus], Money::from_major(120));
        let nonzero: Vec<_> = shown.iter().filter(|(_, amount)| !amount.is_zero()).collect();
        assert_eq!(nonzero.len(), 1);
        // the ledger view is untouched
        assert_eq!(customer.bucket_totals.total(), customer.total_balance);
    }

    #[test]
    fn test_no_debits_means_raw_buckets() {
        let mut customer = CustomerAggregate::new("Acme");
        customer.record(txn("credit", 10, -30));
        assert!(recommend(&customer).is_none());
        assert_eq!(displayed_buckets(&customer, None), customer.bucket_totals);
    }
}
