//! Complaint repository
//!
//! Domain contracts over the raw [`RecordStore`]: schema alignment, pretty
//! id generation, append-by-header-order create, linear-scan lookup,
//! batched partial update and date-range scans.

use std::sync::Arc;

use chrono::NaiveDateTime;
use shared::complaint::{columns, Complaint};

use super::RecordStore;
use crate::utils::time::parse_stored_date;
use crate::utils::{AppError, AppResult};

/// Fields supplied at creation. Lifecycle fields start empty and are filled
/// by later transitions.
#[derive(Debug, Clone, Default)]
pub struct NewComplaint {
    pub id: String,
    pub created_at: String,
    pub branch: String,
    pub parent_name: String,
    pub student_name: String,
    pub phone: String,
    pub category: String,
    pub description: String,
    pub status: String,
    pub sender: String,
    pub sender_user_id: String,
}

impl NewComplaint {
    /// Value for a named column; unknown columns default to empty string.
    fn field(&self, column: &str) -> String {
        match column {
            columns::ID => self.id.clone(),
            columns::DATE => self.created_at.clone(),
            columns::BRANCH => self.branch.clone(),
            columns::PARENT => self.parent_name.clone(),
            columns::STUDENT => self.student_name.clone(),
            columns::PHONE => self.phone.clone(),
            columns::CATEGORY => self.category.clone(),
            columns::COMPLAINT_TEXT => self.description.clone(),
            columns::STATUS => self.status.clone(),
            columns::SENDER => self.sender.clone(),
            columns::SENDER_USER_ID => self.sender_user_id.clone(),
            _ => String::new(),
        }
    }
}

/// Repository over one complaints sheet.
#[derive(Clone)]
pub struct ComplaintRepository {
    store: Arc<dyn RecordStore>,
}

impl ComplaintRepository {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    /// Align the header row with the expected schema.
    ///
    /// Best-effort: callers log failures and carry on, data rows are never
    /// touched.
    pub async fn ensure_schema(&self) -> AppResult<()> {
        let current: Vec<String> = self
            .store
            .read_header()
            .await?
            .iter()
            .map(|h| h.trim().to_string())
            .collect();
        let expected: Vec<String> = columns::EXPECTED.iter().map(|c| c.to_string()).collect();

        if current != expected {
            tracing::info!("Header row out of sync, rewriting to the expected schema");
            self.store.write_header(&expected).await?;
        }
        Ok(())
    }

    /// Next human-readable id `A-<n>`.
    ///
    /// Scans the id column for the highest existing counter; best-effort,
    /// not race-free — two near-simultaneous previews can draw the same id.
    pub async fn next_id(&self) -> AppResult<String> {
        let ids = self.store.read_column(0).await?;
        let last = ids
            .iter()
            .filter_map(|v| v.trim().strip_prefix("A-"))
            .filter_map(|n| n.parse::<u64>().ok())
            .max();
        Ok(match last {
            Some(n) => format!("A-{}", n + 1),
            None => "A-1".to_string(),
        })
    }

    /// Append one record positioned by the current header order. Missing
    /// fields default to empty string. Never retries.
    pub async fn create(&self, record: &NewComplaint) -> AppResult<()> {
        let header = self.store.read_header().await?;
        if header.is_empty() {
            return Err(AppError::store("sheet has no header row"));
        }
        let row: Vec<String> = header.iter().map(|h| record.field(h.trim())).collect();
        self.store.append_row(&row).await?;
        tracing::info!(id = %record.id, "Complaint stored");
        Ok(())
    }

    /// First row whose first column equals `id` (trimmed, case-sensitive),
    /// with its 1-based row position.
    pub async fn find_by_id(&self, id: &str) -> AppResult<Option<(usize, Complaint)>> {
        let rows = self.store.read_all().await?;
        for (i, row) in rows.iter().enumerate().skip(1) {
            let cell = row.first().map(|c| c.trim()).unwrap_or_default();
            if !cell.is_empty() && cell == id.trim() {
                return Ok(Some((i + 1, Complaint::from_row(row))));
            }
        }
        Ok(None)
    }

    /// Overwrite the named columns of the record's row. The locate and the
    /// write are separate requests; a concurrent external edit in between
    /// can be lost silently.
    pub async fn update_by_id(&self, id: &str, updates: &[(&str, String)]) -> AppResult<()> {
        let Some((row, _)) = self.find_by_id(id).await? else {
            return Err(AppError::not_found(format!("complaint {id}")));
        };
        let header = self.store.read_header().await?;

        let cells: Vec<(usize, String)> = header
            .iter()
            .enumerate()
            .filter_map(|(col, name)| {
                updates
                    .iter()
                    .find(|(key, _)| *key == name.trim())
                    .map(|(_, value)| (col, value.clone()))
            })
            .collect();

        self.store.update_cells(row, &cells).await?;
        tracing::info!(id = %id, fields = cells.len(), "Complaint updated");
        Ok(())
    }

    /// Raw table including the header row (exports).
    pub async fn all_rows(&self) -> AppResult<Vec<Vec<String>>> {
        self.store.read_all().await
    }

    /// All records.
    pub async fn scan_all(&self) -> AppResult<Vec<Complaint>> {
        let rows = self.store.read_all().await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter(|r| !r.is_empty())
            .map(|r| Complaint::from_row(r))
            .collect())
    }

    /// Records whose creation date parses and falls inside the inclusive
    /// range. Unparseable dates are excluded.
    pub async fn scan_range(
        &self,
        from: NaiveDateTime,
        to: NaiveDateTime,
    ) -> AppResult<Vec<Complaint>> {
        let all = self.scan_all().await?;
        Ok(all
            .into_iter()
            .filter(|c| {
                parse_stored_date(&c.created_at)
                    .map(|d| from <= d && d <= to)
                    .unwrap_or(false)
            })
            .collect())
    }
}
