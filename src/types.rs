use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Index, IndexMut};

use crate::decimal::Money;

/// stable customer identifier supplied by the accounting system
pub type CustomerRef = String;

/// aging bucket, ordered from least to most overdue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BucketKey {
    #[serde(rename = "current")]
    Current,
    #[serde(rename = "1-20")]
    Days1To20,
    #[serde(rename = "21-30")]
    Days21To30,
    #[serde(rename = "31-45")]
    Days31To45,
    #[serde(rename = "46-60")]
    Days46To60,
    #[serde(rename = "61-90")]
    Days61To90,
    #[serde(rename = "91+")]
    Days91Plus,
}

/// collections action attached to a bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CollectionAction {
    #[serde(rename = "No Action")]
    NoAction,
    #[serde(rename = "Accounting Outreach")]
    AccountingOutreach,
    #[serde(rename = "CSM/AE Outreach")]
    CsmAeOutreach,
    #[serde(rename = "Management Escalation")]
    ManagementEscalation,
    #[serde(rename = "Demand Letter")]
    DemandLetter,
    #[serde(rename = "Collections Review")]
    CollectionsReview,
}

impl BucketKey {
    /// all buckets in rank order
    pub const ALL: [BucketKey; 7] = [
        BucketKey::Current,
        BucketKey::Days1To20,
        BucketKey::Days21To30,
        BucketKey::Days31To45,
        BucketKey::Days46To60,
        BucketKey::Days61To90,
        BucketKey::Days91Plus,
    ];

    /// classify a days-past-due figure; each upper bound is inclusive
    pub fn for_days(days_past_due: i64) -> Self {
        match days_past_due {
            d if d <= 0 => BucketKey::Current,
            d if d <= 20 => BucketKey::Days1To20,
            d if d <= 30 => BucketKey::Days21To30,
            d if d <= 45 => BucketKey::Days31To45,
            d if d <= 60 => BucketKey::Days46To60,
            d if d <= 90 => BucketKey::Days61To90,
            _ => BucketKey::Days91Plus,
        }
    }

    /// position in the fixed order, 0 for current through 6 for 91+
    pub fn rank(self) -> usize {
        self as usize
    }

    pub fn action(self) -> CollectionAction {
        match self {
            BucketKey::Current => CollectionAction::NoAction,
            BucketKey::Days1To20 | BucketKey::Days21To30 => CollectionAction::AccountingOutreach,
            BucketKey::Days31To45 => CollectionAction::CsmAeOutreach,
            BucketKey::Days46To60 => CollectionAction::ManagementEscalation,
            BucketKey::Days61To90 => CollectionAction::DemandLetter,
            BucketKey::Days91Plus => CollectionAction::CollectionsReview,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BucketKey::Current => "current",
            BucketKey::Days1To20 => "1-20",
            BucketKey::Days21To30 => "21-30",
            BucketKey::Days31To45 => "31-45",
            BucketKey::Days46To60 => "46-60",
            BucketKey::Days61To90 => "61-90",
            BucketKey::Days91Plus => "91+",
        }
    }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl CollectionAction {
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionAction::NoAction => "No Action",
            CollectionAction::AccountingOutreach => "Accounting Outreach",
            CollectionAction::CsmAeOutreach => "CSM/AE Outreach",
            CollectionAction::ManagementEscalation => "Management Escalation",
            CollectionAction::DemandLetter => "Demand Letter",
            CollectionAction::CollectionsReview => "Collections Review",
        }
    }
}

impl fmt::Display for CollectionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// per-bucket subtotals; every bucket is always present
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BucketTotals([Money; 7]);

impl BucketTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// the full amount under one bucket, zero elsewhere
    pub fn concentrated(bucket: BucketKey, amount: Money) -> Self {
        let mut totals = Self::new();
        totals[bucket] = amount;
        totals
    }

    pub fn add(&mut self, bucket: BucketKey, amount: Money) {
        self[bucket] += amount;
    }

    /// fold another set of subtotals into this one
    pub fn absorb(&mut self, other: &BucketTotals) {
        for bucket in BucketKey::ALL {
            self[bucket] += other[bucket];
        }
    }

    pub fn total(&self) -> Money {
        self.0.iter().sum()
    }

    /// (bucket, amount) pairs in rank order
    pub fn iter(&self) -> impl Iterator<Item = (BucketKey, Money)> + '_ {
        BucketKey::ALL.into_iter().map(move |bucket| (bucket, self[bucket]))
    }
}

impl Index<BucketKey> for BucketTotals {
    type Output = Money;

    fn index(&self, bucket: BucketKey) -> &Money {
        &self.0[bucket.rank()]
    }
}

impl IndexMut<BucketKey> for BucketTotals {
    fn index_mut(&mut self, bucket: BucketKey) -> &mut Money {
        &mut self.0[bucket.rank()]
    }
}

/// how customers are grouped into aggregates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum IdentityStrategy {
    /// group by external reference, falling back to the canonical name
    #[default]
    ReferenceKeyed,
    /// reference-keyed pass followed by a merge on canonical name
    NameMerge,
}
