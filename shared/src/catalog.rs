//! Fixed catalogs — branches and complaint categories
//!
//! Both lists are product-fixed; changing them means changing the sheet
//! data readers expect, so they live here rather than in config.

use serde::{Deserialize, Serialize};

/// School branches offered at the first intake step.
pub const BRANCHES: [&str; 5] = ["Ракат", "Ганга", "Паркент", "Чиланзар", "Сергели"];

/// Complaint category.
///
/// The short code travels inside inline-action payloads; the title is what
/// gets stored and displayed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Teacher,
    Schedule,
    Payment,
    Infrastructure,
    Safety,
    Administration,
    Other,
}

impl Category {
    /// All categories, in the fixed display order.
    pub const ALL: [Category; 7] = [
        Category::Teacher,
        Category::Schedule,
        Category::Payment,
        Category::Infrastructure,
        Category::Safety,
        Category::Administration,
        Category::Other,
    ];

    /// Payload code
    pub fn code(&self) -> &'static str {
        match self {
            Category::Teacher => "teacher",
            Category::Schedule => "schedule",
            Category::Payment => "payment",
            Category::Infrastructure => "infrastructure",
            Category::Safety => "safety",
            Category::Administration => "administration",
            Category::Other => "other",
        }
    }

    /// Stored/displayed title
    pub fn title(&self) -> &'static str {
        match self {
            Category::Teacher => "Учитель — поведение/качество",
            Category::Schedule => "Расписание — занятия/замены",
            Category::Payment => "Оплата — квитанции/возвраты",
            Category::Infrastructure => "Инфраструктура — класс/оборудование",
            Category::Safety => "Безопасность — инциденты",
            Category::Administration => "Администрация — общие вопросы",
            Category::Other => "Другое",
        }
    }

    /// Resolve a payload code; unknown codes fall back to [`Category::Other`].
    pub fn from_code(code: &str) -> Category {
        Category::ALL
            .into_iter()
            .find(|c| c.code() == code)
            .unwrap_or(Category::Other)
    }
}
