use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use arrow::util::display::array_value_to_string;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde::Deserialize;
use serde_json::Value as JsonValue;

use super::error::LoadError;
use super::model::{
    COL_AMOUNT, COL_CATEGORY, COL_DATE, COL_DESCRIPTION, COL_MERCHANT, COL_USER,
    REQUIRED_COLUMNS, Transaction, TransactionTable,
};
use super::normalize::normalize_optional;

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a transaction table from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row with the six required columns (the usual export)
/// * `.json`    – `[{ "date": ..., "transaction_amount": ..., ... }, ...]`
/// * `.parquet` – one column per field, as written by Pandas or Polars
///
/// Categories are normalised here, once, for the whole column.
pub fn load_file(path: &Path) -> Result<TransactionTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let raw = match ext.as_str() {
        "csv" => load_csv(path)?,
        "json" => load_json(path)?,
        "parquet" | "pq" => load_parquet(path)?,
        other => bail!(LoadError::UnsupportedExtension(other.to_string())),
    };

    Ok(build_table(raw))
}

/// A row as read from disk, before amount checks and normalisation.
#[derive(Debug)]
struct RawRow {
    date: Option<String>,
    amount: Option<f64>,
    user_id: Option<String>,
    merchant: Option<String>,
    category: Option<String>,
    description: Option<String>,
}

/// Rows without an amount can never pass the range filter and would not
/// move the bounds, so they are dropped up front.
fn build_table(raw: Vec<RawRow>) -> TransactionTable {
    let total = raw.len();
    let rows: Vec<Transaction> = raw
        .into_iter()
        .filter_map(|r| {
            Some(Transaction {
                amount: r.amount?,
                date: r.date,
                user_id: r.user_id,
                merchant: r.merchant,
                category: normalize_optional(r.category),
                description: r.description,
            })
        })
        .collect();

    let skipped = total - rows.len();
    if skipped > 0 {
        log::warn!("Skipped {skipped} of {total} rows with no transaction_amount");
    }
    TransactionTable::from_rows(rows)
}

/// Cell values read as missing, matching the default `na_values` of the
/// pandas exports this dashboard is fed from.
const NA_TOKENS: [&str; 19] = [
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

fn is_na(s: &str) -> bool {
    NA_TOKENS.contains(&s.trim())
}

/// Text cell with missing-value markers mapped to `None`.
fn present(cell: Option<String>) -> Option<String> {
    cell.filter(|s| !is_na(s))
}

/// Keep finite amounts only; NaN and infinities count as missing.
fn finite(v: f64) -> Option<f64> {
    v.is_finite().then_some(v)
}

/// Parse an amount cell. Missing markers give `None`; anything else that is
/// not a number is fatal.
fn parse_amount(s: &str, row: usize) -> Result<Option<f64>> {
    if is_na(s) {
        return Ok(None);
    }
    let v = s.trim().parse::<f64>().map_err(|_| LoadError::InvalidAmount {
        row,
        value: s.to_string(),
    })?;
    Ok(finite(v))
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// One CSV record; columns beyond these are ignored and empty cells are `None`.
#[derive(Debug, Deserialize)]
struct CsvRow {
    date: Option<String>,
    transaction_amount: Option<String>,
    user_id: Option<String>,
    enrichment_merchant_name: Option<String>,
    boshh_subscription_category: Option<String>,
    description: Option<String>,
}

fn load_csv(path: &Path) -> Result<Vec<RawRow>> {
    let mut reader = csv::Reader::from_path(path).context("opening CSV")?;
    let headers = reader.headers().context("reading CSV headers")?.clone();

    for col in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == col) {
            bail!(LoadError::MissingColumn(col));
        }
    }

    let mut rows = Vec::new();
    for (row_no, result) in reader.deserialize::<CsvRow>().enumerate() {
        let rec = result.with_context(|| format!("CSV row {row_no}"))?;
        let amount = match rec.transaction_amount.as_deref() {
            Some(s) => parse_amount(s, row_no)?,
            None => None,
        };
        rows.push(RawRow {
            date: present(rec.date),
            amount,
            user_id: present(rec.user_id),
            merchant: present(rec.enrichment_merchant_name),
            category: present(rec.boshh_subscription_category),
            description: present(rec.description),
        });
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   {
///     "date": "2024-03-01",
///     "transaction_amount": 9.99,
///     "user_id": "u-0001",
///     "enrichment_merchant_name": "Netflix",
///     "boshh_subscription_category": "Subscription - Streaming",
///     "description": "NETFLIX.COM"
///   },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Vec<RawRow>> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root
        .as_array()
        .context("Expected top-level JSON array")?;

    let mut rows = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or(LoadError::NotARecord { row: i })?;

        for col in REQUIRED_COLUMNS {
            if !obj.contains_key(col) {
                bail!(LoadError::MissingColumn(col));
            }
        }

        let amount = match &obj[COL_AMOUNT] {
            JsonValue::Null => None,
            JsonValue::Number(n) => n.as_f64().and_then(finite),
            JsonValue::String(s) => parse_amount(s, i)?,
            other => bail!(LoadError::InvalidAmount {
                row: i,
                value: other.to_string(),
            }),
        };

        rows.push(RawRow {
            date: json_text(&obj[COL_DATE]),
            amount,
            user_id: json_text(&obj[COL_USER]),
            merchant: json_text(&obj[COL_MERCHANT]),
            category: json_text(&obj[COL_CATEGORY]),
            description: json_text(&obj[COL_DESCRIPTION]),
        });
    }
    Ok(rows)
}

fn json_text(val: &JsonValue) -> Option<String> {
    match val {
        JsonValue::Null => None,
        JsonValue::String(s) => present(Some(s.clone())),
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per transaction field.
///
/// `transaction_amount` may be any float or integer type. Text columns are
/// read as Utf8/LargeUtf8; anything else (integer ids, Date32 dates) is
/// rendered with Arrow's display formatting.
fn load_parquet(path: &Path) -> Result<Vec<RawRow>> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)
        .context("reading parquet metadata")?;
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();

    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        let schema = batch.schema();

        let column = |name: &'static str| -> Result<ArrayRef> {
            let idx = schema
                .index_of(name)
                .map_err(|_| LoadError::MissingColumn(name))?;
            Ok(batch.column(idx).clone())
        };
        let date = column(COL_DATE)?;
        let amount = column(COL_AMOUNT)?;
        let user = column(COL_USER)?;
        let merchant = column(COL_MERCHANT)?;
        let category = column(COL_CATEGORY)?;
        let description = column(COL_DESCRIPTION)?;

        for row in 0..batch.num_rows() {
            let row_no = rows.len();
            rows.push(RawRow {
                date: arrow_text(&date, row)?,
                amount: arrow_amount(&amount, row, row_no)?,
                user_id: arrow_text(&user, row)?,
                merchant: arrow_text(&merchant, row)?,
                category: arrow_text(&category, row)?,
                description: arrow_text(&description, row)?,
            });
        }
    }

    Ok(rows)
}

// -- Arrow helpers --

fn arrow_text(col: &ArrayRef, row: usize) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let text = match col.data_type() {
        DataType::Utf8 => col.as_string::<i32>().value(row).to_string(),
        DataType::LargeUtf8 => col.as_string::<i64>().value(row).to_string(),
        _ => array_value_to_string(col, row).context("formatting parquet cell")?,
    };
    Ok(present(Some(text)))
}

fn arrow_amount(col: &ArrayRef, row: usize, row_no: usize) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let v = match col.data_type() {
        DataType::Float64 => col.as_primitive::<Float64Type>().value(row),
        DataType::Float32 => col.as_primitive::<Float32Type>().value(row) as f64,
        DataType::Int64 => col.as_primitive::<Int64Type>().value(row) as f64,
        DataType::Int32 => col.as_primitive::<Int32Type>().value(row) as f64,
        DataType::Utf8 | DataType::LargeUtf8 => {
            return match arrow_text(col, row)? {
                Some(s) => parse_amount(&s, row_no),
                None => Ok(None),
            };
        }
        other => bail!(LoadError::UnsupportedAmountType {
            row: row_no,
            data_type: format!("{other:?}"),
        }),
    };
    // Pandas writes missing floats as NaN rather than null.
    Ok(finite(v))
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use std::path::PathBuf;

    use super::*;
    use crate::data::filter::AmountRange;

    const HEADER: &str = concat!(
        "date,transaction_amount,user_id,",
        "enrichment_merchant_name,boshh_subscription_category,description"
    );

    fn write_file(dir: &tempfile::TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        let mut f = std::fs::File::create(&path).unwrap();
        f.write_all(body.as_bytes()).unwrap();
        path
    }

    #[test]
    fn loads_csv_and_normalises_categories() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER},extra\n\
             2024-01-02,9.99,u1,Netflix,Subscription - Streaming,NETFLIX.COM,x\n\
             2024-01-03,4.50,u2,,Subscription – Music,SPOTIFY,y\n\
             2024-01-04,-3,u2,Spotify,,refund,z\n"
        );
        let path = write_file(&dir, "tx.csv", &body);

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 3);
        assert_eq!(table.rows[0].category.as_deref(), Some("Streaming"));
        assert_eq!(table.rows[1].category.as_deref(), Some("Music"));
        assert_eq!(table.rows[1].merchant, None);
        assert_eq!(table.rows[2].category, None);
        assert_eq!(table.categories, vec!["Music", "Streaming"]);
        assert_eq!(table.amount_bounds, (-3.0, 9.99));
    }

    #[test]
    fn csv_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "tx.csv",
            "date,transaction_amount,user_id,description\n2024-01-01,1.0,u1,x\n",
        );
        let err = load_file(&path).unwrap_err();
        let load_err = err.downcast_ref::<LoadError>().unwrap();
        assert!(matches!(
            load_err,
            LoadError::MissingColumn("enrichment_merchant_name")
        ));
    }

    #[test]
    fn csv_blank_amount_skipped_but_garbage_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let ok = write_file(
            &dir,
            "ok.csv",
            &format!("{HEADER}\n2024-01-01,,u1,A,B,C\n2024-01-02,2.5,u1,A,B,C\n"),
        );
        let table = load_file(&ok).unwrap();
        assert_eq!(table.len(), 1);
        assert_eq!(table.rows[0].amount, 2.5);

        let bad = write_file(
            &dir,
            "bad.csv",
            &format!("{HEADER}\n2024-01-01,twelve,u1,A,B,C\n"),
        );
        let err = load_file(&bad).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::InvalidAmount { row: 0, .. })
        ));
    }

    #[test]
    fn loads_json_records() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"[
            {"date": "2024-02-01", "transaction_amount": 12.0, "user_id": 42,
             "enrichment_merchant_name": "iCloud",
             "boshh_subscription_category": "Subscription - Cloud",
             "description": null},
            {"date": null, "transaction_amount": null, "user_id": "7",
             "enrichment_merchant_name": null, "boshh_subscription_category": null,
             "description": "dropped"}
        ]"#;
        let path = write_file(&dir, "tx.json", body);

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        let tx = &table.rows[0];
        assert_eq!(tx.user_id.as_deref(), Some("42"));
        assert_eq!(tx.category.as_deref(), Some("Cloud"));
        assert_eq!(tx.description, None);
    }

    #[test]
    fn json_non_object_row_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tx.json", "[1, 2]");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::NotARecord { row: 0 })
        ));
    }

    #[test]
    fn loads_parquet_with_numeric_ids() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, Int64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_DATE, DataType::Utf8, true),
            Field::new(COL_AMOUNT, DataType::Float64, true),
            Field::new(COL_USER, DataType::Int64, true),
            Field::new(COL_MERCHANT, DataType::Utf8, true),
            Field::new(COL_CATEGORY, DataType::Utf8, true),
            Field::new(COL_DESCRIPTION, DataType::Utf8, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec![Some("2024-05-01"), None])),
                Arc::new(Float64Array::from(vec![Some(7.99), Some(f64::NAN)])),
                Arc::new(Int64Array::from(vec![Some(101), Some(102)])),
                Arc::new(StringArray::from(vec![Some("Audible"), None])),
                Arc::new(StringArray::from(vec![Some("Subscription - Books"), None])),
                Arc::new(StringArray::from(vec![None::<&str>, None])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        let tx = &table.rows[0];
        assert_eq!(tx.user_id.as_deref(), Some("101"));
        assert_eq!(tx.category.as_deref(), Some("Books"));
        assert_eq!(tx.date.as_deref(), Some("2024-05-01"));
        assert_eq!(tx.amount, 7.99);
    }

    #[test]
    fn csv_na_markers_are_missing_values() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{HEADER}\n\
             2024-01-01,NA,u1,Netflix,Subscription - Streaming,x\n\
             2024-01-02,N/A,u1,Netflix,Subscription - Streaming,x\n\
             2024-01-03,null,u1,Netflix,Subscription - Streaming,x\n\
             2024-01-04,6.5,NA,N/A,null,NaN\n"
        );
        let path = write_file(&dir, "tx.csv", &body);

        let table = load_file(&path).unwrap();
        assert_eq!(table.len(), 1);
        let tx = &table.rows[0];
        assert_eq!(tx.amount, 6.5);
        assert_eq!(tx.user_id, None);
        assert_eq!(tx.merchant, None);
        assert_eq!(tx.category, None);
        assert_eq!(tx.description, None);
        assert!(table.merchants.is_empty());
    }

    #[test]
    fn non_finite_amounts_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "tx.csv",
            &format!("{HEADER}\n2024-01-01,NaN,u1,A,B,C\n2024-01-02,inf,u1,A,B,C\n"),
        );

        let table = load_file(&path).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.amount_bounds, (0.0, 0.0));

        // The slider range stays usable on an empty table.
        let range = AmountRange::new(0.0, 1.0).clamped(table.amount_bounds);
        assert_eq!(range, AmountRange::new(0.0, 0.0));
    }

    #[test]
    fn json_missing_column_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let body = r#"[
            {"date": "2024-02-01", "transaction_amount": 12.0, "user_id": "u1",
             "enrichment_merchant_name": "iCloud", "description": "ICLOUD"}
        ]"#;
        let path = write_file(&dir, "tx.json", body);

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn("boshh_subscription_category"))
        ));
    }

    #[test]
    fn parquet_missing_column_is_fatal() {
        use std::sync::Arc;

        use arrow::array::{Float64Array, StringArray};
        use arrow::datatypes::{Field, Schema};
        use arrow::record_batch::RecordBatch;
        use parquet::arrow::ArrowWriter;

        let schema = Arc::new(Schema::new(vec![
            Field::new(COL_DATE, DataType::Utf8, true),
            Field::new(COL_AMOUNT, DataType::Float64, true),
        ]));
        let batch = RecordBatch::try_new(
            schema.clone(),
            vec![
                Arc::new(StringArray::from(vec!["2024-05-01"])),
                Arc::new(Float64Array::from(vec![7.99])),
            ],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tx.parquet");
        let file = std::fs::File::create(&path).unwrap();
        let mut writer = ArrowWriter::try_new(file, schema, None).unwrap();
        writer.write(&batch).unwrap();
        writer.close().unwrap();

        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::MissingColumn("user_id"))
        ));
    }

    #[test]
    fn unknown_extension_and_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "tx.xlsx", "");
        let err = load_file(&path).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<LoadError>(),
            Some(LoadError::UnsupportedExtension(ext)) if ext == "xlsx"
        ));

        assert!(load_file(&dir.path().join("absent.csv")).is_err());
    }
}
