//! Inline-action payloads
//!
//! Every interactive button carries an opaque payload string. Lifecycle
//! actions embed the complaint id (`called:A-12`) so a handler can resolve
//! its context statelessly from the record store.

/// Parsed inline-action payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackPayload {
    /// Intake: branch chosen (`branch:<name>`)
    Branch(String),
    /// Intake: category chosen (`cat:<code>`)
    Category(String),
    /// Intake: attach a photo
    AddPhoto,
    /// Intake: attach a video
    AddVideo,
    /// Intake: skip media attachment
    SkipMedia,
    /// Intake: confirm and submit the draft
    ConfirmSend,
    /// Intake: discard the draft and restart the form
    EditForm,
    /// Lifecycle: parent was called (`called:<id>`)
    Called(String),
    /// Lifecycle: start entering a resolution (`solution:<id>`)
    Solution(String),
    /// Lifecycle: parent was notified of the resolution (`notify_parent:<id>`)
    NotifyParent(String),
    /// Statistics: per-branch breakdown
    StatsByBranch,
    /// Statistics: per-category breakdown
    StatsByCategory,
    /// Statistics: last-7-days breakdown
    StatsByDate,
    /// Statistics: full CSV export
    StatsDownload,
}

impl CallbackPayload {
    /// Parse a raw payload string. Unknown payloads return `None` and are
    /// ignored by the dispatcher.
    pub fn parse(data: &str) -> Option<Self> {
        if let Some((action, rest)) = data.split_once(':') {
            let rest = rest.to_string();
            return match action {
                "branch" => Some(CallbackPayload::Branch(rest)),
                "cat" => Some(CallbackPayload::Category(rest)),
                "called" => Some(CallbackPayload::Called(rest)),
                "solution" => Some(CallbackPayload::Solution(rest)),
                "notify_parent" => Some(CallbackPayload::NotifyParent(rest)),
                _ => None,
            };
        }
        match data {
            "add_photo" => Some(CallbackPayload::AddPhoto),
            "add_video" => Some(CallbackPayload::AddVideo),
            "skip_media" => Some(CallbackPayload::SkipMedia),
            "confirm_send" => Some(CallbackPayload::ConfirmSend),
            "edit_form" => Some(CallbackPayload::EditForm),
            "stats_by_branch" => Some(CallbackPayload::StatsByBranch),
            "stats_by_category" => Some(CallbackPayload::StatsByCategory),
            "stats_by_date" => Some(CallbackPayload::StatsByDate),
            "stats_download" => Some(CallbackPayload::StatsDownload),
            _ => None,
        }
    }

    /// Encode back to the wire payload string.
    pub fn encode(&self) -> String {
        match self {
            CallbackPayload::Branch(b) => format!("branch:{b}"),
            CallbackPayload::Category(c) => format!("cat:{c}"),
            CallbackPayload::AddPhoto => "add_photo".into(),
            CallbackPayload::AddVideo => "add_video".into(),
            CallbackPayload::SkipMedia => "skip_media".into(),
            CallbackPayload::ConfirmSend => "confirm_send".into(),
            CallbackPayload::EditForm => "edit_form".into(),
            CallbackPayload::Called(id) => format!("called:{id}"),
            CallbackPayload::Solution(id) => format!("solution:{id}"),
            CallbackPayload::NotifyParent(id) => format!("notify_parent:{id}"),
            CallbackPayload::StatsByBranch => "stats_by_branch".into(),
            CallbackPayload::StatsByCategory => "stats_by_category".into(),
            CallbackPayload::StatsByDate => "stats_by_date".into(),
            CallbackPayload::StatsDownload => "stats_download".into(),
        }
    }
}
