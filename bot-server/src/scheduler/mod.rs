//! Escalation scheduler
//!
//! Three periodic loops, registered as background tasks:
//!
//! - a scan every 10 minutes that reminds the intake group about complaints
//!   still waiting for a call after 2 hours (complaints older than 3 days
//!   are left alone, they are visible in the reports already)
//! - a weekly report every Monday 09:00 covering the previous Mon..Sun week
//! - a monthly report on the 1st at 09:00 covering the previous month
//!
//! Reminder de-duplication is process-local: a restart may repeat one
//! reminder per stuck complaint, which is acceptable.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Datelike, Duration as ChronoDuration, NaiveDate, NaiveDateTime};
use shared::{Complaint, ComplaintStatus};
use tokio_util::sync::CancellationToken;

use crate::core::{AppState, BackgroundTasks, TaskKind};
use crate::stats::report::send_period_report;
use crate::utils::time::{next_monthly_fire, next_weekly_fire, now_local, parse_stored_date, seconds_until};
use crate::utils::AppResult;

const SCAN_INTERVAL: Duration = Duration::from_secs(600);
const ERROR_BACKOFF: Duration = Duration::from_secs(60);
/// Waiting longer than this for a call triggers a reminder.
const STUCK_AFTER_HOURS: i64 = 2;
/// Older than this is left to the reports instead.
const STALE_AFTER_DAYS: i64 = 3;

/// Register all scheduler loops.
pub fn register(state: Arc<AppState>, tasks: &mut BackgroundTasks) {
    let token = tasks.shutdown_token();
    tasks.spawn("stuck-scan", TaskKind::Periodic, stuck_scan_loop(state.clone(), token));

    let token = tasks.shutdown_token();
    tasks.spawn("weekly-report", TaskKind::Periodic, weekly_report_loop(state.clone(), token));

    let token = tasks.shutdown_token();
    tasks.spawn("monthly-report", TaskKind::Periodic, monthly_report_loop(state, token));
}

/// Complaints still waiting for a call: older than the escalation threshold
/// but not stale yet. Rows with unparseable dates are skipped.
pub fn stuck_complaints(complaints: &[Complaint], now: NaiveDateTime) -> Vec<&Complaint> {
    complaints
        .iter()
        .filter(|c| c.status == Some(ComplaintStatus::Submitted))
        .filter(|c| {
            parse_stored_date(&c.created_at)
                .map(|created| {
                    let age = now - created;
                    age > ChronoDuration::hours(STUCK_AFTER_HOURS)
                        && age <= ChronoDuration::days(STALE_AFTER_DAYS)
                })
                .unwrap_or(false)
        })
        .collect()
}

/// One scan pass: remind the intake group about newly-stuck complaints.
/// Returns the number of reminders sent.
pub async fn run_stuck_scan(state: &AppState, notified: &mut HashSet<String>) -> AppResult<usize> {
    let complaints = state.repo.scan_all().await?;
    let now = now_local(state.config.timezone).naive_local();

    let mut sent = 0;
    for complaint in stuck_complaints(&complaints, now) {
        if notified.contains(&complaint.id) {
            continue;
        }
        let text = format!(
            "🔔 Напоминание:\n\
             Жалоба <b>{}</b> ожидает обзвона более 2 часов.\n\
             🕓 Создана: {}",
            complaint.id, complaint.created_at
        );
        state
            .gateway
            .send_message(state.config.group_complaints_id, &text, None)
            .await?;
        notified.insert(complaint.id.clone());
        sent += 1;
    }
    if sent > 0 {
        tracing::info!(reminders = sent, "Stuck-complaint reminders sent");
    }
    Ok(sent)
}

async fn stuck_scan_loop(state: Arc<AppState>, token: CancellationToken) {
    let mut notified: HashSet<String> = HashSet::new();
    loop {
        let backoff = match run_stuck_scan(&state, &mut notified).await {
            Ok(_) => SCAN_INTERVAL,
            Err(e) => {
                tracing::error!(error = %e, "Stuck-complaint scan failed");
                ERROR_BACKOFF
            }
        };
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(backoff) => {}
        }
    }
}

/// Week covered by a Monday fire: the previous Mon..Sun.
pub fn weekly_range(fire_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let to = fire_date - ChronoDuration::days(1);
    (to - ChronoDuration::days(6), to)
}

/// Month covered by a first-of-month fire: the whole previous month.
pub fn monthly_range(fire_date: NaiveDate) -> (NaiveDate, NaiveDate) {
    let to = fire_date - ChronoDuration::days(1);
    let from = to.with_day(1).unwrap_or(to);
    (from, to)
}

async fn weekly_report_loop(state: Arc<AppState>, token: CancellationToken) {
    loop {
        let now = now_local(state.config.timezone).naive_local();
        let fire = next_weekly_fire(now);
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(Duration::from_secs(seconds_until(now, fire))) => {}
        }

        let (from, to) = weekly_range(fire.date());
        if let Err(e) = send_period_report(&state, from, to).await {
            tracing::error!(error = %e, "Weekly report failed");
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(ERROR_BACKOFF) => {}
            }
        }
    }
}

async fn monthly_report_loop(state: Arc<AppState>, token: CancellationToken) {
    loop {
        let now = now_local(state.config.timezone).naive_local();
        let fire = next_monthly_fire(now);
        tokio::select! {
            _ = token.cancelled() => return,
            _ = tokio::time::sleep(Duration::from_secs(seconds_until(now, fire))) => {}
        }

        let (from, to) = monthly_range(fire.date());
        if let Err(e) = send_period_report(&state, from, to).await {
            tracing::error!(error = %e, "Monthly report failed");
            tokio::select! {
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(ERROR_BACKOFF) => {}
            }
        }
    }
}
