//! Respondent flow: list questions/groups, submit answers.
//!
//! Submissions are anonymous, so there is no access gate here. Answers
//! are validated against the fetched survey definition before the POST:
//! numeric questions take an integer in [1, 5], text questions take
//! free text, and every answer carries exactly one of the two.

use crate::api::ApiClient;
use crate::dashboard::{Output, EXIT_OK};
use crate::models::{QuestionType, SubmitRequest, SubmittedAnswer, SurveyQuestion};
use crate::report;
use anyhow::{bail, Context, Result};
use tracing::info;

/// List the survey questions.
pub async fn list_questions(client: &ApiClient, output: &Output) -> Result<i32> {
    let spinner = output.spinner("Загрузка вопросов...");
    let questions = client
        .survey_questions()
        .await
        .context("Failed to load survey questions")?
        .questions;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let markdown = report::generate_questions_markdown(&questions);
    output.emit(&questions, markdown)?;
    Ok(EXIT_OK)
}

/// List the groups a survey can be submitted for.
pub async fn list_groups(client: &ApiClient, output: &Output) -> Result<i32> {
    let spinner = output.spinner("Загрузка групп...");
    let groups = client
        .survey_groups()
        .await
        .context("Failed to load survey groups")?
        .groups;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let markdown = report::generate_groups_markdown(&groups);
    output.emit(&groups, markdown)?;
    Ok(EXIT_OK)
}

/// Submit answers for a group.
pub async fn submit(
    client: &ApiClient,
    group_id: i64,
    raw_answers: &[String],
    output: &Output,
) -> Result<i32> {
    let questions = client
        .survey_questions()
        .await
        .context("Failed to load survey questions")?
        .questions;

    let answers = parse_answers(raw_answers, &questions)?;
    info!(group_id, answers = answers.len(), "submitting survey");

    let request = SubmitRequest { group_id, answers };
    client
        .submit_group(&request)
        .await
        .context("Failed to submit survey")?;

    if !output.quiet {
        println!("✅ Спасибо за участие! Ваши ответы отправлены анонимно.");
    }
    Ok(EXIT_OK)
}

/// Parse `code=value` pairs against the survey definition.
fn parse_answers(
    raw_answers: &[String],
    questions: &[SurveyQuestion],
) -> Result<Vec<SubmittedAnswer>> {
    let mut answers = Vec::with_capacity(raw_answers.len());

    for raw in raw_answers {
        let (code, value) = raw
            .split_once('=')
            .with_context(|| format!("Answer '{}' is not in code=value form", raw))?;

        let question = questions
            .iter()
            .find(|q| q.code == code)
            .with_context(|| format!("Unknown question code: '{}'", code))?;

        let answer = match question.question_type {
            QuestionType::Numeric => {
                let numeric: i32 = value.trim().parse().with_context(|| {
                    format!("Answer for '{}' must be an integer, got '{}'", code, value)
                })?;
                SubmittedAnswer {
                    question_code: question.code.clone(),
                    question_text: question.text.clone(),
                    numeric_value: Some(numeric),
                    text_value: None,
                }
            }
            QuestionType::Text => SubmittedAnswer {
                question_code: question.code.clone(),
                question_text: question.text.clone(),
                numeric_value: None,
                text_value: Some(value.to_string()),
            },
        };

        if let Err(message) = answer.validate() {
            bail!("{}", message);
        }

        answers.push(answer);
    }

    Ok(answers)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn questions() -> Vec<SurveyQuestion> {
        vec![
            SurveyQuestion {
                code: "comfort".to_string(),
                text: "Насколько комфортно вам в группе?".to_string(),
                question_type: QuestionType::Numeric,
                category: "climate".to_string(),
            },
            SurveyQuestion {
                code: "open_feedback".to_string(),
                text: "Что ещё вы хотите рассказать?".to_string(),
                question_type: QuestionType::Text,
                category: "feedback".to_string(),
            },
        ]
    }

    #[test]
    fn test_parse_numeric_answer() {
        let answers =
            parse_answers(&["comfort=4".to_string()], &questions()).unwrap();
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].numeric_value, Some(4));
        assert_eq!(answers[0].text_value, None);
        assert_eq!(answers[0].question_text, "Насколько комфортно вам в группе?");
    }

    #[test]
    fn test_parse_text_answer() {
        let answers =
            parse_answers(&["open_feedback=всё хорошо".to_string()], &questions()).unwrap();
        assert_eq!(answers[0].numeric_value, None);
        assert_eq!(answers[0].text_value.as_deref(), Some("всё хорошо"));
    }

    #[test]
    fn test_numeric_out_of_range_rejected() {
        assert!(parse_answers(&["comfort=6".to_string()], &questions()).is_err());
        assert!(parse_answers(&["comfort=0".to_string()], &questions()).is_err());
    }

    #[test]
    fn test_non_integer_numeric_rejected() {
        assert!(parse_answers(&["comfort=high".to_string()], &questions()).is_err());
    }

    #[test]
    fn test_unknown_code_rejected() {
        assert!(parse_answers(&["mystery=3".to_string()], &questions()).is_err());
    }

    #[test]
    fn test_text_value_with_equals_sign_kept_whole() {
        let answers =
            parse_answers(&["open_feedback=a=b".to_string()], &questions()).unwrap();
        assert_eq!(answers[0].text_value.as_deref(), Some("a=b"));
    }
}
