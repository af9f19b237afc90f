use std::collections::BTreeSet;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const COL_DATE: &str = "date";
pub const COL_AMOUNT: &str = "transaction_amount";
pub const COL_USER: &str = "user_id";
pub const COL_MERCHANT: &str = "enrichment_merchant_name";
pub const COL_CATEGORY: &str = "boshh_subscription_category";
pub const COL_DESCRIPTION: &str = "description";

/// Columns every input file must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    COL_DATE,
    COL_AMOUNT,
    COL_USER,
    COL_MERCHANT,
    COL_CATEGORY,
    COL_DESCRIPTION,
];

// ---------------------------------------------------------------------------
// Transaction – one row of the source file
// ---------------------------------------------------------------------------

/// A single categorised bank transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    /// ISO-8601 date kept as text; sorts chronologically as a string.
    pub date: Option<String>,
    /// Signed amount in GBP.
    pub amount: f64,
    pub user_id: Option<String>,
    pub merchant: Option<String>,
    /// Category with the `Subscription - ` prefix already stripped.
    pub category: Option<String>,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// TransactionTable – the complete loaded dataset
// ---------------------------------------------------------------------------

/// The full parsed dataset with values pre-computed for the filter widgets.
///
/// Never mutated after construction; every filter produces a list of row
/// indices into `rows`.
#[derive(Debug, Clone)]
pub struct TransactionTable {
    pub rows: Vec<Transaction>,
    /// Sorted distinct non-null categories.
    pub categories: Vec<String>,
    /// Sorted distinct non-null merchant names.
    pub merchants: Vec<String>,
    /// `(min, max)` over finite amounts, `(0.0, 0.0)` when there are none.
    pub amount_bounds: (f64, f64),
}

impl TransactionTable {
    /// Build the column indices from loaded rows.
    pub fn from_rows(rows: Vec<Transaction>) -> Self {
        let mut categories: BTreeSet<String> = BTreeSet::new();
        let mut merchants: BTreeSet<String> = BTreeSet::new();
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;

        for tx in &rows {
            if let Some(c) = &tx.category {
                categories.insert(c.clone());
            }
            if let Some(m) = &tx.merchant {
                merchants.insert(m.clone());
            }
            if tx.amount.is_finite() {
                min = min.min(tx.amount);
                max = max.max(tx.amount);
            }
        }

        let amount_bounds = if min <= max { (min, max) } else { (0.0, 0.0) };

        TransactionTable {
            rows,
            categories: categories.into_iter().collect(),
            merchants: merchants.into_iter().collect(),
            amount_bounds,
        }
    }

    /// Number of transactions.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
