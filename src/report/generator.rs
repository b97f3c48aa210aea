//! Markdown and JSON rendering of dashboard views.
//!
//! This module turns the fetched and aggregated data into the text the
//! CLI prints (or writes to a file). JSON output is the same view
//! serialized verbatim.

use crate::analysis;
use crate::models::{
    AdminStatistics, AggregatedStat, Faculty, Group, GroupStatistics, OpenAnswer, SurveyQuestion,
};
use anyhow::Result;
use serde::Serialize;

/// The composed curator view for one group.
#[derive(Debug, Clone, Serialize)]
pub struct CuratorView {
    pub group_id: i64,
    pub group_name: String,
    pub total_submissions: u64,
    /// Full aggregation including the open-feedback row.
    pub categories: Vec<AggregatedStat>,
    pub open_answers: Vec<OpenAnswer>,
}

impl CuratorView {
    /// Build the view from a statistics response.
    pub fn from_statistics(statistics: GroupStatistics) -> Self {
        let categories =
            analysis::aggregate(&statistics.question_stats, &statistics.open_answers);
        Self {
            group_id: statistics.group_id,
            group_name: statistics.group_name,
            total_submissions: statistics.total_submissions,
            categories,
            open_answers: statistics.open_answers,
        }
    }
}

/// The composed admin view. Each dataset is independently optional so a
/// single failed fetch leaves only its section unavailable.
#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub statistics: Option<AdminStatistics>,
    pub faculties: Option<Vec<Faculty>>,
    pub groups: Option<Vec<Group>>,
}

/// Generate the curator dashboard as Markdown.
pub fn generate_curator_markdown(view: &CuratorView) -> String {
    let mut output = String::new();

    output.push_str(&format!("# Статистика группы: {}\n\n", view.group_name));
    output.push_str(&format!("- **Всего ответов:** {}\n", view.total_submissions));
    output.push_str(&format!("- **Группа:** {} (id {})\n\n", view.group_name, view.group_id));

    output.push_str(&generate_category_table(&view.categories));

    let numeric = analysis::numeric_only(&view.categories);
    if !numeric.is_empty() {
        output.push_str("## Средние баллы\n\n");
        for stat in &numeric {
            output.push_str(&format!(
                "- {}: {:.2} ({} отв.)\n",
                stat.label, stat.value, stat.count
            ));
        }
        output.push('\n');
    }

    output.push_str(&generate_open_answers_section(&view.open_answers));

    output
}

/// Generate the per-category statistics table.
fn generate_category_table(categories: &[AggregatedStat]) -> String {
    let mut section = String::new();

    section.push_str("## Детальная статистика\n\n");

    if categories.is_empty() {
        section.push_str("Нет данных по вопросам.\n\n");
        return section;
    }

    section.push_str("| Вопрос | Средний балл | Количество ответов |\n");
    section.push_str("|:---|:---:|:---:|\n");

    for stat in categories {
        // Open feedback carries no meaningful numeric value
        let value = if stat.category.is_open_feedback() {
            "-".to_string()
        } else {
            format!("{:.2}", stat.value)
        };
        section.push_str(&format!("| {} | {} | {} |\n", stat.label, value, stat.count));
    }
    section.push('\n');

    section
}

/// Generate the open text answers section.
fn generate_open_answers_section(answers: &[OpenAnswer]) -> String {
    if answers.is_empty() {
        return String::new();
    }

    let mut section = String::new();

    section.push_str("## Текстовые ответы\n\n");
    for answer in answers {
        let label = crate::analysis::registry::resolve(&answer.question_code);
        let question = answer
            .question_text
            .clone()
            .unwrap_or_else(|| label.label().to_string());
        section.push_str(&format!(
            "- **{}** ({}): {}\n",
            question,
            answer.submitted_at.format("%Y-%m-%d %H:%M"),
            answer.text_value
        ));
    }
    section.push('\n');

    section
}

/// Generate the admin dashboard as Markdown.
pub fn generate_admin_markdown(view: &AdminView) -> String {
    let mut output = String::new();

    output.push_str("# Административная панель\n\n");

    match &view.statistics {
        Some(stats) => {
            output.push_str("## Общая статистика\n\n");
            output.push_str(&format!(
                "- **Всего ответов:** {}\n",
                stats.overall.total_submissions
            ));
            output.push_str(&format!(
                "- **Факультетов:** {}\n",
                stats.overall.total_faculties
            ));
            output.push_str(&format!("- **Групп:** {}\n\n", stats.overall.total_groups));

            if !stats.faculties.is_empty() {
                output.push_str("### Статистика по факультетам\n\n");
                output.push_str("| Факультет | Групп | Ответов |\n");
                output.push_str("|:---|:---:|:---:|\n");
                for faculty in &stats.faculties {
                    output.push_str(&format!(
                        "| {} | {} | {} |\n",
                        faculty.faculty, faculty.total_groups, faculty.total_submissions
                    ));
                }
                output.push('\n');
            }
        }
        None => output.push_str("## Общая статистика\n\n_Раздел недоступен._\n\n"),
    }

    match &view.faculties {
        Some(faculties) => {
            output.push_str("## Факультеты\n\n");
            output.push_str("| ID | Название | Описание | Групп |\n");
            output.push_str("|:---:|:---|:---|:---:|\n");
            for faculty in faculties {
                output.push_str(&format!(
                    "| {} | {} | {} | {} |\n",
                    faculty.id,
                    faculty.name,
                    faculty.description.as_deref().unwrap_or("-"),
                    faculty.group_count
                ));
            }
            output.push('\n');
        }
        None => output.push_str("## Факультеты\n\n_Раздел недоступен._\n\n"),
    }

    match &view.groups {
        Some(groups) => {
            output.push_str("## Группы\n\n");
            output.push_str("| ID | Название | Факультет | Курс | Ответов |\n");
            output.push_str("|:---:|:---|:---|:---:|:---:|\n");
            for group in groups {
                output.push_str(&format!(
                    "| {} | {} | {} | {} | {} |\n",
                    group.id,
                    group.name,
                    group.faculty.as_deref().unwrap_or("-"),
                    group.year,
                    group
                        .submission_count
                        .map(|c| c.to_string())
                        .unwrap_or_else(|| "-".to_string())
                ));
            }
            output.push('\n');
        }
        None => output.push_str("## Группы\n\n_Раздел недоступен._\n\n"),
    }

    output
}

/// Generate the survey question list as Markdown.
pub fn generate_questions_markdown(questions: &[SurveyQuestion]) -> String {
    let mut output = String::new();

    output.push_str("# Вопросы опроса\n\n");

    for (i, question) in questions.iter().enumerate() {
        let kind = match question.question_type {
            crate::models::QuestionType::Numeric => "1..5",
            crate::models::QuestionType::Text => "текст",
        };
        output.push_str(&format!(
            "{}. **{}** (`{}`, {})\n",
            i + 1,
            question.text,
            question.code,
            kind
        ));
    }
    output.push('\n');

    output
}

/// Generate the group list as Markdown.
pub fn generate_groups_markdown(groups: &[Group]) -> String {
    let mut output = String::new();

    output.push_str("# Группы\n\n");
    output.push_str("| ID | Название | Факультет | Курс |\n");
    output.push_str("|:---:|:---|:---|:---:|\n");

    for group in groups {
        output.push_str(&format!(
            "| {} | {} | {} | {} |\n",
            group.id,
            group.name,
            group.faculty.as_deref().unwrap_or("-"),
            group.year
        ));
    }
    output.push('\n');

    output
}

/// Serialize any view as pretty JSON.
pub fn generate_json<T: Serialize>(view: &T) -> Result<String> {
    serde_json::to_string_pretty(view).map_err(Into::into)
}
