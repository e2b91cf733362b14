use std::collections::HashMap;

use caseless::default_case_fold_str;

use tracing::debug;

use crate::aggregate::CustomerAggregate;
use crate::normalize::AgingTransaction;
use crate::types::CustomerRef;

/// separator between a parent customer and its sub-account
const SUB_ACCOUNT_SEPARATOR: char = ':';

/// presentation name: parent segment only, whitespace collapsed
pub fn clean_customer_name(raw: &str) -> String {
    let parent = raw.split(SUB_ACCOUNT_SEPARATOR).next().unwrap_or(raw);
    let collapsed = collapse_whitespace(parent);
    if collapsed.is_empty() {
        raw.trim().to_string()
    } else {
        collapsed
    }
}

/// comparison key for a name: whitespace collapsed, full unicode case fold
pub fn canonical_name(name: &str) -> String {
    default_case_fold_str(&collapse_whitespace(name))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// aggregation key in the reference-keyed pass
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CustomerKey {
    Reference(CustomerRef),
    Name(String),
}

impl CustomerKey {
    pub fn for_transaction(txn: &AgingTransaction) -> Self {
        match &txn.customer_ref {
            Some(reference) => CustomerKey::Reference(reference.clone()),
            None => CustomerKey::Name(canonical_name(&txn.customer_display_name)),
        }
    }
}

/// collapse aggregates whose display names canonicalize to the same key,
/// keeping first-seen order
pub fn merge_by_name(aggregates: Vec<CustomerAggregate>) -> Vec<CustomerAggregate> {
    let before = aggregates.len();
    let mut slots: HashMap<String, usize> = HashMap::new();
    let mut merged: Vec<CustomerAggregate> = Vec::with_capacity(before);

    for aggregate in aggregates {
        let key = canonical_name(&aggregate.display_name);
        match slots.get(&key) {
            Some(&slot) => merged[slot].absorb(aggregate),
            None => {
                slots.insert(key, merged.len());
                merged.push(aggregate);
            }
        }
    }

    debug!(before, after = merged.len(), "merged customers by name");
    merged
}
