pub mod aggregate;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod identity;
pub mod logging;
pub mod normalize;
pub mod policy;
pub mod report;
pub mod summary;
pub mod types;

// re-export key types
pub use aggregate::{Aggregator, CustomerAggregate};
pub use config::SimplifyConfig;
pub use decimal::Money;
pub use engine::{simplify_ar_aging, AgingEngine};
pub use errors::{AgingError, Result};
pub use identity::{canonical_name, clean_customer_name, CustomerKey};
pub use normalize::{AgingTransaction, TransactionNormalizer};
pub use policy::Recommendation;
pub use report::{ColumnIndex, Report};
pub use summary::{AgingSummary, OldestInvoice, SummaryRow};
pub use types::{BucketKey, BucketTotals, CollectionAction, CustomerRef, IdentityStrategy};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
