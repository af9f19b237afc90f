use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    fn below(&mut self, n: usize) -> usize {
        (self.next_u64() % n as u64) as usize
    }
}

/// (raw category label, merchants, typical monthly price)
const CATALOGUE: &[(&str, &[&str], f64)] = &[
    ("Subscription - Streaming", &["Netflix", "Disney+", "Now TV"], 10.99),
    ("Subscription – Music", &["Spotify", "Apple Music"], 11.99),
    ("Subscription - Cloud Storage", &["iCloud", "Google One", "Dropbox"], 2.99),
    ("Subscription - News", &["The Times", "The Guardian"], 8.0),
    ("Subscription - Fitness", &["PureGym", "Strava"], 24.99),
    ("Subscription - Software", &["Adobe", "Microsoft 365"], 19.97),
    ("Gaming", &["Xbox Game Pass", "PlayStation Plus"], 12.99),
];

struct Row {
    date: String,
    amount: f64,
    user_id: String,
    merchant: Option<String>,
    category: Option<String>,
    description: String,
}

fn generate(rng: &mut SimpleRng, users: usize) -> Vec<Row> {
    let mut rows = Vec::new();
    for u in 0..users {
        let user_id = format!("user-{u:04}");
        // Between 1 and 6 distinct subscriptions per user.
        let n_subs = 1 + rng.below(6);
        for _ in 0..n_subs {
            let (category, merchants, price) = CATALOGUE[rng.below(CATALOGUE.len())];
            let merchant = merchants[rng.below(merchants.len())];
            let day = 1 + rng.below(28);
            let months = 1 + rng.below(6);
            for m in 0..months {
                let jitter = (rng.next_f64() - 0.5) * price * 0.2;
                let amount = ((price + jitter) * 100.0).round() / 100.0;
                rows.push(Row {
                    date: format!("2024-{:02}-{day:02}", m + 1),
                    amount,
                    user_id: user_id.clone(),
                    // A few rows arrive without enrichment.
                    merchant: (rng.below(20) != 0).then(|| merchant.to_string()),
                    category: (rng.below(25) != 0).then(|| category.to_string()),
                    description: format!("{} {}", merchant.to_uppercase(), day),
                });
            }
        }
    }
    rows
}

fn write_csv(path: &str, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV")?;
    writer.write_record([
        "date",
        "transaction_amount",
        "user_id",
        "enrichment_merchant_name",
        "boshh_subscription_category",
        "description",
    ])?;
    for r in rows {
        let amount = format!("{:.2}", r.amount);
        writer.write_record([
            r.date.as_str(),
            amount.as_str(),
            r.user_id.as_str(),
            r.merchant.as_deref().unwrap_or(""),
            r.category.as_deref().unwrap_or(""),
            r.description.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &str, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("date", DataType::Utf8, false),
        Field::new("transaction_amount", DataType::Float64, false),
        Field::new("user_id", DataType::Utf8, false),
        Field::new("enrichment_merchant_name", DataType::Utf8, true),
        Field::new("boshh_subscription_category", DataType::Utf8, true),
        Field::new("description", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.date.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(Float64Array::from(
                rows.iter().map(|r| r.amount).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.user_id.as_str()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.merchant.as_deref()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.category.as_deref()).collect::<Vec<_>>(),
            )),
            Arc::new(StringArray::from(
                rows.iter().map(|r| r.description.as_str()).collect::<Vec<_>>(),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate(&mut rng, 250);

    let csv_path = "newboshhhsubscriptioncategory.csv";
    let parquet_path = "sample_transactions.parquet";
    write_csv(csv_path, &rows)?;
    write_parquet(parquet_path, &rows)?;

    println!(
        "Wrote {} transactions for 250 users to {csv_path} and {parquet_path}",
        rows.len()
    );
    Ok(())
}
