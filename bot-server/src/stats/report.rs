//! Periodic leadership reports
//!
//! Weekly and monthly summaries for the leadership group: one line per
//! branch with resolved/in-progress counts and an efficiency percentage,
//! an overall footer, and the raw period rows attached as CSV.

use chrono::NaiveDate;
use shared::{Complaint, ComplaintStatus};
use shared::complaint::columns;

use crate::core::AppState;
use crate::stats::export::csv_bytes;
use crate::utils::AppResult;

/// Per-branch rollup of one reporting period.
#[derive(Debug, Clone, PartialEq)]
pub struct BranchSummary {
    pub branch: String,
    pub total: usize,
    pub resolved: usize,
    pub in_progress: usize,
    /// Resolved share, one decimal place
    pub efficiency: f64,
}

/// Group a record set by branch. Records without a branch are collected
/// under "Без филиала". Resolved means closed.
pub fn summarize_by_branch(complaints: &[Complaint]) -> Vec<BranchSummary> {
    let mut summaries: Vec<BranchSummary> = Vec::new();
    for complaint in complaints {
        let branch = if complaint.branch.is_empty() {
            "Без филиала".to_string()
        } else {
            complaint.branch.clone()
        };
        let resolved = complaint.status == Some(ComplaintStatus::Closed);
        match summaries.iter_mut().find(|s| s.branch == branch) {
            Some(summary) => {
                summary.total += 1;
                if resolved {
                    summary.resolved += 1;
                }
            }
            None => summaries.push(BranchSummary {
                branch,
                total: 1,
                resolved: usize::from(resolved),
                in_progress: 0,
                efficiency: 0.0,
            }),
        }
    }
    for summary in &mut summaries {
        summary.in_progress = summary.total - summary.resolved;
        summary.efficiency =
            (summary.resolved as f64 / summary.total as f64 * 1000.0).round() / 10.0;
    }
    summaries
}

/// Render the report text for a period.
pub fn build_text_report(complaints: &[Complaint], date_from: &str, date_to: &str) -> String {
    let summaries = summarize_by_branch(complaints);
    let mut text = format!("📅 Отчёт по жалобам ({date_from} — {date_to})\n\n");

    if summaries.is_empty() {
        text.push_str("Нет жалоб за указанный период.");
        return text;
    }

    for summary in &summaries {
        text.push_str(&format!(
            "🏫 {}: {} жалоб | ✅ Решено: {} | ⏳ В работе: {} | 📈 Эффективность: {}%\n",
            summary.branch, summary.total, summary.resolved, summary.in_progress, summary.efficiency
        ));
    }

    let total: usize = summaries.iter().map(|s| s.total).sum();
    let resolved: usize = summaries.iter().map(|s| s.resolved).sum();
    let avg_eff = (summaries.iter().map(|s| s.efficiency).sum::<f64>()
        / summaries.len() as f64
        * 10.0)
        .round()
        / 10.0;
    text.push_str(&format!(
        "\n📊 Итого: {total} жалоб, решено {resolved} ({avg_eff}% эффективности)"
    ));
    text
}

fn period_csv(complaints: &[Complaint]) -> Vec<u8> {
    let mut rows: Vec<Vec<String>> =
        vec![columns::EXPECTED.iter().map(|c| c.to_string()).collect()];
    for c in complaints {
        rows.push(vec![
            c.id.clone(),
            c.created_at.clone(),
            c.branch.clone(),
            c.parent_name.clone(),
            c.student_name.clone(),
            c.phone.clone(),
            c.category.clone(),
            c.description.clone(),
            c.status.map(|s| s.to_string()).unwrap_or_default(),
            c.call_at.clone(),
            c.resolution_text.clone(),
            c.resolution_by.clone(),
            c.resolution_at.clone(),
            c.notified_at.clone(),
            c.notified_by.clone(),
            c.submitted_by.full_name.clone(),
            c.submitted_by.user_id.to_string(),
        ]);
    }
    csv_bytes(&rows)
}

/// Build and deliver the report for an inclusive date range to the
/// leadership group. A store read failure is reported there instead.
pub async fn send_period_report(state: &AppState, from: NaiveDate, to: NaiveDate) -> AppResult<()> {
    let leaders = state.config.group_leaders_id;
    let range_from = from.and_hms_opt(0, 0, 0).expect("valid time");
    let range_to = to.and_hms_opt(23, 59, 59).expect("valid time");

    let complaints = match state.repo.scan_range(range_from, range_to).await {
        Ok(complaints) => complaints,
        Err(e) => {
            tracing::error!(error = %e, "Report data fetch failed");
            state
                .gateway
                .send_message(leaders, "⚠️ Ошибка при получении данных для отчёта.", None)
                .await?;
            return Ok(());
        }
    };

    let from_label = from.format("%Y-%m-%d").to_string();
    let to_label = to.format("%Y-%m-%d").to_string();
    let text = build_text_report(&complaints, &from_label, &to_label);
    state.gateway.send_message(leaders, &text, None).await?;

    if !complaints.is_empty() {
        let file_name = format!("report_{from_label}_to_{to_label}.csv");
        state
            .gateway
            .send_document_bytes(leaders, &file_name, period_csv(&complaints), "")
            .await?;
    }
    tracing::info!(%from_label, %to_label, records = complaints.len(), "Period report sent");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::test_support::state_with_doubles;
    use crate::testing::seed_complaint_at;

    fn complaint(branch: &str, status: ComplaintStatus) -> Complaint {
        Complaint {
            branch: branch.into(),
            status: Some(status),
            ..Complaint::default()
        }
    }

    #[test]
    fn branch_summaries_compute_efficiency() {
        let complaints = vec![
            complaint("Ганга", ComplaintStatus::Closed),
            complaint("Ганга", ComplaintStatus::Closed),
            complaint("Ганга", ComplaintStatus::Submitted),
            complaint("", ComplaintStatus::Acknowledged),
        ];
        let summaries = summarize_by_branch(&complaints);
        let ganga = summaries.iter().find(|s| s.branch == "Ганга").unwrap();
        assert_eq!(ganga.total, 3);
        assert_eq!(ganga.resolved, 2);
        assert_eq!(ganga.in_progress, 1);
        assert_eq!(ganga.efficiency, 66.7);
        assert!(summaries.iter().any(|s| s.branch == "Без филиала"));
    }

    #[test]
    fn empty_period_report_says_so() {
        let text = build_text_report(&[], "2025-01-01", "2025-01-07");
        assert!(text.contains("Нет жалоб за указанный период."));
    }

    #[test]
    fn report_text_has_per_branch_lines_and_totals() {
        let complaints = vec![
            complaint("Ганга", ComplaintStatus::Closed),
            complaint("Ракат", ComplaintStatus::Submitted),
        ];
        let text = build_text_report(&complaints, "2025-01-01", "2025-01-07");
        assert!(text.contains("🏫 Ганга: 1 жалоб | ✅ Решено: 1"));
        assert!(text.contains("🏫 Ракат: 1 жалоб | ✅ Решено: 0"));
        assert!(text.contains("📊 Итого: 2 жалоб, решено 1 (50% эффективности)"));
    }

    #[tokio::test]
    async fn period_report_filters_by_date_and_attaches_csv() {
        let (state, gateway, _) = state_with_doubles();
        seed_complaint_at(&state.repo, "A-1", ComplaintStatus::Closed, "02.01.2025 10:00").await;
        seed_complaint_at(&state.repo, "A-2", ComplaintStatus::Submitted, "09.01.2025 10:00").await;

        let from = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 1, 7).unwrap();
        send_period_report(&state, from, to).await.unwrap();

        let sent = gateway.sent_to(state.config.group_leaders_id).await;
        assert!(sent[0].text.contains("Отчёт по жалобам (2025-01-01 — 2025-01-07)"));
        assert!(sent[0].text.contains("Итого: 1 жалоб"));

        let docs = gateway.documents.lock().await;
        assert_eq!(docs.len(), 1);
        assert!(docs[0].1.starts_with("report_2025-01-01"));
        let csv = String::from_utf8(docs[0].2.clone()).unwrap();
        assert!(csv.contains("A-1"));
        assert!(!csv.contains("A-2"));
    }

    #[tokio::test]
    async fn empty_period_sends_text_only() {
        let (state, gateway, _) = state_with_doubles();
        let from = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let to = NaiveDate::from_ymd_opt(2025, 6, 30).unwrap();
        send_period_report(&state, from, to).await.unwrap();

        assert_eq!(gateway.sent_to(state.config.group_leaders_id).await.len(), 1);
        assert!(gateway.documents.lock().await.is_empty());
    }
}
