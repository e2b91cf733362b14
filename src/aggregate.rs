use std::collections::{BTreeSet, HashMap};

use tracing::debug;

use crate::decimal::Money;
use crate::identity::CustomerKey;
use crate::normalize::AgingTransaction;
use crate::types::{BucketTotals, CustomerRef};

/// running totals for one resolved customer
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerAggregate {
    pub display_name: String,
    /// reference of the first source record that carried one
    pub external_ref: Option<CustomerRef>,
    /// every reference folded into this customer
    pub external_refs: BTreeSet<CustomerRef>,
    pub total_balance: Money,
    pub bucket_totals: BucketTotals,
    /// sum of amounts at or below zero
    pub credits_total: Money,
    /// debit lines kept for the recommendation policy only
    pub positive_transactions: Vec<AgingTransaction>,
}

impl CustomerAggregate {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            external_ref: None,
            external_refs: BTreeSet::new(),
            total_balance: Money::ZERO,
            bucket_totals: BucketTotals::new(),
            credits_total: Money::ZERO,
            positive_transactions: Vec::new(),
        }
    }

    /// fold one transaction into the totals
    pub fn record(&mut self, txn: AgingTransaction) {
        self.total_balance += txn.amount;
        self.bucket_totals.add(txn.bucket, txn.amount);

        if let Some(reference) = &txn.customer_ref {
            if self.external_ref.is_none() {
                self.external_ref = Some(reference.clone());
            }
            self.external_refs.insert(reference.clone());
        }

        let differs = self.display_name != txn.customer_display_name;
        if txn.amount.is_positive() {
            self.positive_transactions.push(txn);
        } else {
            self.credits_total += txn.amount;
        }

        // prefer the casing seen on a debit line
        if differs {
            if let Some(first) = self.positive_transactions.first() {
                self.display_name = first.customer_display_name.clone();
            }
        }
    }

    /// fold another customer into this one; the longer display name wins
    pub fn absorb(&mut self, other: CustomerAggregate) {
        if other.display_name.chars().count() > self.display_name.chars().count() {
            self.display_name = other.display_name;
        }
        if self.external_ref.is_none() {
            self.external_ref = other.external_ref;
        }
        self.external_refs.extend(other.external_refs);
        self.total_balance += other.total_balance;
        self.bucket_totals.absorb(&other.bucket_totals);
        self.credits_total += other.credits_total;
        self.positive_transactions.extend(other.positive_transactions);
    }

    /// something is still owed
    pub fn is_outstanding(&self) -> bool {
        self.total_balance.is_positive()
    }
}

/// groups transactions into customers in first-seen order
#[derive(Debug, Default)]
pub struct Aggregator {
    slots: HashMap<CustomerKey, usize>,
    customers: Vec<CustomerAggregate>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, txn: AgingTransaction) {
        let key = CustomerKey::for_transaction(&txn);
        let slot = match self.slots.get(&key) {
            Some(&slot) => slot,
            None => {
                self.customers.push(CustomerAggregate::new(txn.customer_display_name.clone()));
                self.slots.insert(key, self.customers.len() - 1);
                self.customers.len() - 1
            }
        };
        self.customers[slot].record(txn);
    }

    pub fn extend<I: IntoIterator<Item = AgingTransaction>>(&mut self, txns: I) {
        for txn in txns {
            self.add(txn);
        }
    }

    /// all customers, including those with nothing owed
    pub fn finish(self) -> Vec<CustomerAggregate> {
        self.customers
    }
}

/// drop customers whose final balance is zero or a net credit
pub fn retain_outstanding(customers: Vec<CustomerAggregate>) -> Vec<CustomerAggregate> {
    let before = customers.len();
    let kept: Vec<_> = customers.into_iter().filter(CustomerAggregate::is_outstanding).collect();
    debug!(dropped = before - kept.len(), "dropped settled or credit-only customers");
    kept
}
