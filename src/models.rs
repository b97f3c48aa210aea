//! Data models for the survey dashboard client.
//!
//! This module contains the data structures exchanged with the survey
//! service REST API and the derived statistics types shared across
//! the dashboard views.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the fixed semantic question groupings used by the survey.
///
/// The set and its order are process-wide constants. Every numeric chart
/// and table emits categories in this order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CanonicalCategory {
    Comfort,
    Engagement,
    Conflicts,
    Stress,
    Support,
    OpenFeedback,
}

impl CanonicalCategory {
    /// All canonical categories in display order.
    pub const ALL: [CanonicalCategory; 6] = [
        CanonicalCategory::Comfort,
        CanonicalCategory::Engagement,
        CanonicalCategory::Conflicts,
        CanonicalCategory::Stress,
        CanonicalCategory::Support,
        CanonicalCategory::OpenFeedback,
    ];

    /// The canonical slug used as a question code on the wire.
    pub fn slug(&self) -> &'static str {
        match self {
            CanonicalCategory::Comfort => "comfort",
            CanonicalCategory::Engagement => "engagement",
            CanonicalCategory::Conflicts => "conflicts",
            CanonicalCategory::Stress => "stress",
            CanonicalCategory::Support => "support",
            CanonicalCategory::OpenFeedback => "open_feedback",
        }
    }

    /// The single display label for this category.
    ///
    /// Labels are the localized names the service has always shown;
    /// some legacy data sources use them verbatim as question codes.
    pub fn label(&self) -> &'static str {
        match self {
            CanonicalCategory::Comfort => "Комфорт",
            CanonicalCategory::Engagement => "Вовлеченность",
            CanonicalCategory::Conflicts => "Конфликтность",
            CanonicalCategory::Stress => "Стресс",
            CanonicalCategory::Support => "Поддержка",
            CanonicalCategory::OpenFeedback => "Доп. отзывы",
        }
    }
}

impl fmt::Display for CanonicalCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

/// A question category: canonical, or an unrecognized code preserved as-is.
///
/// Unrecognized codes are never dropped; they become their own category
/// with the raw code as its label.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Category {
    Canonical(CanonicalCategory),
    Other(String),
}

impl Category {
    /// Display label: fixed label for canonical categories, the raw code otherwise.
    pub fn label(&self) -> &str {
        match self {
            Category::Canonical(c) => c.label(),
            Category::Other(code) => code,
        }
    }

    pub fn is_open_feedback(&self) -> bool {
        matches!(self, Category::Canonical(CanonicalCategory::OpenFeedback))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Canonical(c) => write!(f, "{}", c),
            Category::Other(code) => write!(f, "{}", code),
        }
    }
}

/// Per-question statistics as reported by the service.
///
/// `question_code` is not guaranteed unique: legacy numeric ids, canonical
/// slugs and full label text may all refer to the same semantic question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawQuestionStat {
    pub question_code: String,
    pub average: f64,
    pub count: i64,
}

/// A free-text answer. Contributes only to the open-feedback count,
/// never to a numeric value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAnswer {
    pub question_code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_text: Option<String>,
    pub text_value: String,
    pub submitted_at: DateTime<Utc>,
}

/// Category-level statistics derived from raw stats and open answers.
/// Recomputed on every fetch, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatedStat {
    pub category: Category,
    pub label: String,
    /// Weighted mean of all merged (average, count) pairs.
    pub value: f64,
    pub count: u64,
}

/// Group statistics response from `/curator/groups/{id}/statistics`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupStatistics {
    pub group_id: i64,
    pub group_name: String,
    pub total_submissions: u64,
    pub question_stats: Vec<RawQuestionStat>,
    #[serde(default)]
    pub open_answers: Vec<OpenAnswer>,
}

/// A study group as listed by the curator and survey endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,
    pub name: String,
    #[serde(default, alias = "faculty_name", skip_serializing_if = "Option::is_none")]
    pub faculty: Option<String>,
    pub year: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submission_count: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupList {
    pub groups: Vec<Group>,
}

/// A faculty record from the admin CRUD endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Faculty {
    pub id: i64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub group_count: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyList {
    pub faculties: Vec<Faculty>,
}

/// Global counters from `/admin/statistics/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallStatistics {
    pub total_submissions: u64,
    pub total_faculties: u64,
    pub total_groups: u64,
}

/// Per-faculty rollup from `/admin/statistics/all`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FacultyStatistics {
    pub faculty: String,
    pub total_submissions: u64,
    pub total_groups: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminStatistics {
    pub overall: OverallStatistics,
    #[serde(default)]
    pub faculties: Vec<FacultyStatistics>,
}

/// Survey question definition from `/surveys/questions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
    pub code: String,
    pub text: String,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub category: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Numeric,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionList {
    pub questions: Vec<SurveyQuestion>,
}

/// One submitted answer. Exactly one of `numeric_value`/`text_value`
/// is non-null; numeric answers lie in the closed range [1, 5].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmittedAnswer {
    pub question_code: String,
    pub question_text: String,
    pub numeric_value: Option<i32>,
    pub text_value: Option<String>,
}

impl SubmittedAnswer {
    /// Lower and upper bounds of the numeric answer domain.
    pub const NUMERIC_MIN: i32 = 1;
    pub const NUMERIC_MAX: i32 = 5;

    /// Validate the mutual-exclusion and range invariants.
    pub fn validate(&self) -> Result<(), String> {
        match (self.numeric_value, &self.text_value) {
            (Some(_), Some(_)) => Err(format!(
                "answer for '{}' has both numeric and text values",
                self.question_code
            )),
            (None, None) => Err(format!(
                "answer for '{}' has neither numeric nor text value",
                self.question_code
            )),
            (Some(n), None) if !(Self::NUMERIC_MIN..=Self::NUMERIC_MAX).contains(&n) => {
                Err(format!(
                    "numeric answer for '{}' is {} (must be {}..={})",
                    self.question_code,
                    n,
                    Self::NUMERIC_MIN,
                    Self::NUMERIC_MAX
                ))
            }
            _ => Ok(()),
        }
    }
}

/// Request body for `/surveys/submit-group`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitRequest {
    pub group_id: i64,
    pub answers: Vec<SubmittedAnswer>,
}

/// Identity response from `/auth/user`.
///
/// `raw` carries provider claims; `raw.groups` holds slash-delimited
/// hierarchical group paths (e.g. `/org/Curators`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserResponse {
    pub user: UserInfo,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub raw: RawClaims,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawClaims {
    #[serde(default)]
    pub groups: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_order_is_fixed() {
        let slugs: Vec<&str> = CanonicalCategory::ALL.iter().map(|c| c.slug()).collect();
        assert_eq!(
            slugs,
            vec![
                "comfort",
                "engagement",
                "conflicts",
                "stress",
                "support",
                "open_feedback"
            ]
        );
    }

    #[test]
    fn test_category_label_passthrough() {
        let cat = Category::Other("custom_code".to_string());
        assert_eq!(cat.label(), "custom_code");

        let canonical = Category::Canonical(CanonicalCategory::Comfort);
        assert_eq!(canonical.label(), "Комфорт");
    }

    #[test]
    fn test_answer_validation_range() {
        let answer = SubmittedAnswer {
            question_code: "comfort".to_string(),
            question_text: String::new(),
            numeric_value: Some(6),
            text_value: None,
        };
        assert!(answer.validate().is_err());

        let answer = SubmittedAnswer {
            numeric_value: Some(5),
            ..answer
        };
        assert!(answer.validate().is_ok());
    }

    #[test]
    fn test_answer_validation_mutual_exclusion() {
        let both = SubmittedAnswer {
            question_code: "open_feedback".to_string(),
            question_text: String::new(),
            numeric_value: Some(3),
            text_value: Some("text".to_string()),
        };
        assert!(both.validate().is_err());

        let neither = SubmittedAnswer {
            numeric_value: None,
            text_value: None,
            ..both.clone()
        };
        assert!(neither.validate().is_err());

        let text_only = SubmittedAnswer {
            numeric_value: None,
            text_value: Some("text".to_string()),
            ..both
        };
        assert!(text_only.validate().is_ok());
    }

    #[test]
    fn test_group_faculty_alias() {
        let json = r#"{"id": 1, "name": "Б-101", "faculty_name": "Биология", "year": 2}"#;
        let group: Group = serde_json::from_str(json).unwrap();
        assert_eq!(group.faculty.as_deref(), Some("Биология"));
    }

    #[test]
    fn test_question_type_deserialization() {
        let json = r#"{"code": "comfort", "text": "Насколько комфортно?", "type": "numeric", "category": "climate"}"#;
        let question: SurveyQuestion = serde_json::from_str(json).unwrap();
        assert_eq!(question.question_type, QuestionType::Numeric);
    }
}
