use std::path::Path;
use std::sync::OnceLock;

use anyhow::Result;

use super::loader::load_file;
use super::model::TransactionTable;

// ---------------------------------------------------------------------------
// Process-wide dataset
// ---------------------------------------------------------------------------

static DATASET: OnceLock<TransactionTable> = OnceLock::new();

/// Load the dataset once for the lifetime of the process.
///
/// The table is never reloaded: later calls return the first table no matter
/// which path they pass. Picking up a changed file requires a restart.
pub fn init(path: &Path) -> Result<&'static TransactionTable> {
    if let Some(table) = DATASET.get() {
        log::debug!("Dataset already loaded; ignoring {}", path.display());
        return Ok(table);
    }

    let table = load_file(path)?;
    log::info!(
        "Loaded {} transactions from {} ({} categories, {} merchants, amounts {:.2}..={:.2})",
        table.len(),
        path.display(),
        table.categories.len(),
        table.merchants.len(),
        table.amount_bounds.0,
        table.amount_bounds.1,
    );
    Ok(DATASET.get_or_init(|| table))
}
