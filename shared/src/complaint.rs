//! Complaint record model
//!
//! The complaint is the unit of work tracked end-to-end. One row per
//! complaint in the record store; the column order is fixed and readers
//! match status values exactly.

use serde::{Deserialize, Serialize};

/// Fixed column schema of the complaints sheet.
///
/// Order matters: `create` positions values by this order and `find_by_id`
/// matches on the first column.
pub mod columns {
    pub const ID: &str = "ID";
    pub const DATE: &str = "Date";
    pub const BRANCH: &str = "Branch";
    pub const PARENT: &str = "Parent";
    pub const STUDENT: &str = "Student";
    pub const PHONE: &str = "Phone";
    pub const CATEGORY: &str = "Category";
    pub const COMPLAINT_TEXT: &str = "ComplaintText";
    pub const STATUS: &str = "Status";
    pub const CALL_TIME: &str = "CallTime";
    pub const RESOLUTION: &str = "Resolution";
    pub const RESPONSIBLE_PERSON: &str = "ResponsiblePerson";
    pub const RESOLUTION_TIME: &str = "ResolutionTime";
    pub const NOTIFICATION_TIME: &str = "NotificationTime";
    pub const NOTIFIED_BY: &str = "NotifiedBy";
    pub const SENDER: &str = "Sender";
    pub const SENDER_USER_ID: &str = "SenderUserId";

    /// Expected header row, in order.
    pub const EXPECTED: [&str; 17] = [
        ID,
        DATE,
        BRANCH,
        PARENT,
        STUDENT,
        PHONE,
        CATEGORY,
        COMPLAINT_TEXT,
        STATUS,
        CALL_TIME,
        RESOLUTION,
        RESPONSIBLE_PERSON,
        RESOLUTION_TIME,
        NOTIFICATION_TIME,
        NOTIFIED_BY,
        SENDER,
        SENDER_USER_ID,
    ];
}

/// Complaint lifecycle status.
///
/// Forward-only progression, no defined path backward:
/// `Submitted → Acknowledged → PendingNotification → Closed`.
///
/// The stored string values are matched exactly by every reader.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum ComplaintStatus {
    /// Ожидает обзвона — created, intake group not yet called the parent
    Submitted,
    /// Принята — parent called, forwarded for resolution authoring
    Acknowledged,
    /// Ожидает уведомления — resolution recorded, parent not yet informed
    PendingNotification,
    /// Закрыта — parent informed, complaint closed
    Closed,
}

impl ComplaintStatus {
    /// Exact stored string value.
    pub fn as_str(&self) -> &'static str {
        match self {
            ComplaintStatus::Submitted => "Ожидает обзвона",
            ComplaintStatus::Acknowledged => "Принята",
            ComplaintStatus::PendingNotification => "Ожидает уведомления",
            ComplaintStatus::Closed => "Закрыта",
        }
    }

    /// Parse a stored cell value (trimmed, exact match).
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "Ожидает обзвона" => Some(ComplaintStatus::Submitted),
            "Принята" => Some(ComplaintStatus::Acknowledged),
            "Ожидает уведомления" => Some(ComplaintStatus::PendingNotification),
            "Закрыта" => Some(ComplaintStatus::Closed),
            _ => None,
        }
    }

    /// The only legal successor, if any.
    pub fn next(&self) -> Option<Self> {
        match self {
            ComplaintStatus::Submitted => Some(ComplaintStatus::Acknowledged),
            ComplaintStatus::Acknowledged => Some(ComplaintStatus::PendingNotification),
            ComplaintStatus::PendingNotification => Some(ComplaintStatus::Closed),
            ComplaintStatus::Closed => None,
        }
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Attached media kind
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Photo,
    Video,
    Document,
}

/// Opaque media reference (gateway file handle + MIME type).
///
/// Set once at creation; at most one media item per complaint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MediaRef {
    pub kind: MediaKind,
    /// Gateway file handle, opaque to the core
    pub file_id: String,
    pub mime: String,
}

/// Submitter identity, captured at creation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Submitter {
    pub full_name: String,
    /// `@username`, empty when the account has none
    pub username: String,
    pub user_id: i64,
}

impl Submitter {
    /// Display form used in record rows and group messages.
    pub fn display(&self) -> String {
        format!("{} {}", self.full_name, self.username)
            .trim()
            .to_string()
    }
}

/// Complaint entity.
///
/// Submission fields are immutable after creation (edits restart the intake
/// flow). Lifecycle fields are each written during exactly one transition
/// and never reset.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Complaint {
    /// `A-<n>` or a timestamp-derived fallback; assigned once
    pub id: String,
    /// Creation time, display format `%d.%m.%Y %H:%M`
    pub created_at: String,
    pub branch: String,
    pub parent_name: String,
    pub student_name: String,
    pub phone: String,
    pub category: String,
    pub description: String,
    pub status: Option<ComplaintStatus>,
    /// Set when intake staff confirm the parent was called
    pub call_at: String,
    pub resolution_text: String,
    pub resolution_by: String,
    pub resolution_at: String,
    pub notified_at: String,
    pub notified_by: String,
    pub submitted_by: Submitter,
}

impl Complaint {
    /// Map a raw row (ordered by [`columns::EXPECTED`]) into a complaint.
    /// Missing trailing cells default to empty.
    pub fn from_row(row: &[String]) -> Self {
        let cell = |i: usize| row.get(i).map(|s| s.trim().to_string()).unwrap_or_default();
        Complaint {
            id: cell(0),
            created_at: cell(1),
            branch: cell(2),
            parent_name: cell(3),
            student_name: cell(4),
            phone: cell(5),
            category: cell(6),
            description: cell(7),
            status: ComplaintStatus::parse(&cell(8)),
            call_at: cell(9),
            resolution_text: cell(10),
            resolution_by: cell(11),
            resolution_at: cell(12),
            notified_at: cell(13),
            notified_by: cell(14),
            submitted_by: Submitter {
                full_name: cell(15),
                username: String::new(),
                user_id: cell(16).parse().unwrap_or_default(),
            },
        }
    }
}
