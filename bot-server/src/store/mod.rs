//! Record Store
//!
//! The durable record is one spreadsheet row per complaint. The tabular
//! backend is consumed through the [`RecordStore`] trait — raw header/row
//! operations with no business logic — and [`repository::ComplaintRepository`]
//! layers the complaint contracts on top (schema check, id generation,
//! linear-scan lookup, partial update, range scan).
//!
//! Lookup is O(n) per call by design: hundreds to low thousands of rows.

pub mod repository;
pub mod sheets;

use async_trait::async_trait;

use crate::utils::AppResult;
pub use repository::{ComplaintRepository, NewComplaint};
pub use sheets::SheetsStore;

/// Raw tabular backend.
///
/// Row indices are 1-based (row 1 is the header), column indices 0-based,
/// matching the backend's own addressing.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Read the header row (row 1). Empty when the sheet is blank.
    async fn read_header(&self) -> AppResult<Vec<String>>;

    /// Overwrite the header row. Data rows are untouched.
    async fn write_header(&self, header: &[String]) -> AppResult<()>;

    /// Append one row after the last non-empty row.
    async fn append_row(&self, row: &[String]) -> AppResult<()>;

    /// Read every row including the header.
    async fn read_all(&self) -> AppResult<Vec<Vec<String>>>;

    /// Read a single column top to bottom (id scans).
    async fn read_column(&self, col: usize) -> AppResult<Vec<String>>;

    /// Overwrite individual cells of one row. Batched into a single
    /// request, but not atomic with any preceding read.
    async fn update_cells(&self, row: usize, values: &[(usize, String)]) -> AppResult<()>;
}
