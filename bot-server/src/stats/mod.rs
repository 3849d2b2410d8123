//! Statistics and reporting
//!
//! Shared aggregation over complaint records plus the two surfaces built on
//! it: the admin statistics menu (private chat) and the periodic leadership
//! reports.

pub mod export;
pub mod report;
pub mod view;

use shared::{Complaint, ComplaintStatus};

use crate::utils::time::parse_stored_date;

/// Per-status tally of a record set.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct StatusCounts {
    pub total: usize,
    pub submitted: usize,
    pub acknowledged: usize,
    pub pending_notification: usize,
    pub closed: usize,
}

impl StatusCounts {
    pub fn tally<'a, I: IntoIterator<Item = &'a Complaint>>(complaints: I) -> Self {
        let mut counts = Self::default();
        for complaint in complaints {
            counts.total += 1;
            match complaint.status {
                Some(ComplaintStatus::Submitted) => counts.submitted += 1,
                Some(ComplaintStatus::Acknowledged) => counts.acknowledged += 1,
                Some(ComplaintStatus::PendingNotification) => counts.pending_notification += 1,
                Some(ComplaintStatus::Closed) => counts.closed += 1,
                None => {}
            }
        }
        counts
    }

    /// Closure progress, rendered as a whole percent.
    pub fn progress(&self) -> String {
        if self.total == 0 {
            return "0%".to_string();
        }
        format!("{}%", (self.closed * 100 + self.total / 2) / self.total)
    }
}

/// Analytical footer: busiest and quietest branch plus the last activity
/// date. Empty input gets the "no data" note instead.
pub fn summary_footer(complaints: &[Complaint]) -> String {
    if complaints.is_empty() {
        return "\n⚠️ Нет данных для анализа.".to_string();
    }

    let mut per_branch: Vec<(String, usize)> = Vec::new();
    for complaint in complaints {
        let branch = if complaint.branch.is_empty() {
            "Без филиала".to_string()
        } else {
            complaint.branch.clone()
        };
        match per_branch.iter_mut().find(|(b, _)| *b == branch) {
            Some((_, n)) => *n += 1,
            None => per_branch.push((branch, 1)),
        }
    }
    let (max_branch, max_count) = per_branch
        .iter()
        .max_by_key(|(_, n)| *n)
        .cloned()
        .unwrap_or_default();
    let (min_branch, min_count) = per_branch
        .iter()
        .min_by_key(|(_, n)| *n)
        .cloned()
        .unwrap_or_default();

    let last_activity = complaints
        .iter()
        .filter_map(|c| parse_stored_date(&c.created_at))
        .max()
        .map(|d| d.format("%d.%m.%Y").to_string())
        .unwrap_or_else(|| "—".to_string());

    format!(
        "\n━━━━━━━━━━━━━━━━━━━\n\
         🏆 <b>Больше всего жалоб:</b> {max_branch} ({max_count})\n\
         📉 <b>Меньше всего жалоб:</b> {min_branch} ({min_count})\n\
         📅 <b>Последняя активность:</b> {last_activity}"
    )
}
