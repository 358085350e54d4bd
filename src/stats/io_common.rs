// Primitives shared by the flat (one respondent per row) readers.

use std::path::Path;

use survey_analytics::builder::{Builder, FormUpdate, SectionTemplate, PROFILE_FIELDS};

use crate::stats::*;

const ID_COLUMN: &str = "_id";

/// What a column of a flat export holds.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum Column {
    Id,
    Profile(String),
    Answer {
        survey_key: String,
        question_id: String,
        sub_question: Option<String>,
    },
    Ignored,
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Reads the header row. Columns that are neither a profile field nor an answer are ignored.
pub fn parse_header(path: &str, names: &[String]) -> Vec<Column> {
    let file_name = simplify_file_name(path);
    names
        .iter()
        .map(|raw| {
            let name = raw.trim();
            if name == ID_COLUMN {
                return Column::Id;
            }
            if PROFILE_FIELDS.contains(&name) {
                return Column::Profile(name.to_string());
            }
            let parts: Vec<&str> = name.split('/').collect();
            match parts.as_slice() {
                [s, q] if !s.is_empty() && !q.is_empty() => Column::Answer {
                    survey_key: s.to_string(),
                    question_id: q.to_string(),
                    sub_question: None,
                },
                [s, q, sub] if !s.is_empty() && !q.is_empty() && !sub.is_empty() => {
                    Column::Answer {
                        survey_key: s.to_string(),
                        question_id: q.to_string(),
                        sub_question: Some(sub.to_string()),
                    }
                }
                _ => {
                    warn!("{}: ignoring column {:?}", file_name, raw);
                    Column::Ignored
                }
            }
        })
        .collect()
}

/// The survey modules described by a header, with their questions in column order.
/// The text of a question is its id: flat exports do not carry it.
pub fn header_templates(columns: &[Column]) -> Vec<SectionTemplate> {
    let mut res: Vec<SectionTemplate> = Vec::new();
    for c in columns.iter() {
        if let Column::Answer {
            survey_key,
            question_id,
            ..
        } = c
        {
            let idx = match res.iter().position(|t| t.key == *survey_key) {
                Some(idx) => idx,
                None => {
                    res.push(SectionTemplate {
                        key: survey_key.clone(),
                        topic: String::new(),
                        subject: String::new(),
                        questions: vec![],
                    });
                    res.len() - 1
                }
            };
            let t = &mut res[idx];
            if !t.questions.iter().any(|(qid, _)| qid == question_id) {
                t.questions.push((question_id.clone(), question_id.clone()));
            }
        }
    }
    res
}

/// Assembles one submission out of the cells of a row. Blank cells are left unanswered.
pub fn flat_row_to_submission(
    columns: &[Column],
    templates: &[SectionTemplate],
    cells: &[String],
) -> StatResult<Submission> {
    let mut builder = Builder::new(templates);
    let mut id: Option<String> = None;
    for (col, cell) in columns.iter().zip(cells.iter()) {
        let value = cell.trim();
        if value.is_empty() {
            continue;
        }
        match col {
            Column::Id => id = Some(value.to_string()),
            Column::Profile(field) => builder.set_profile(field, value).context(AnalyticsSnafu {})?,
            Column::Answer {
                survey_key,
                question_id,
                sub_question: None,
            } => builder
                .update(FormUpdate::Choice {
                    section: survey_key.clone(),
                    question_id: question_id.clone(),
                    value: cell.clone(),
                })
                .context(AnalyticsSnafu {})?,
            Column::Answer {
                survey_key,
                question_id,
                sub_question: Some(sub),
            } => builder
                .update(FormUpdate::Text {
                    section: survey_key.clone(),
                    question_id: question_id.clone(),
                    sub_question: sub.clone(),
                    value: cell.clone(),
                })
                .context(AnalyticsSnafu {})?,
            Column::Ignored => {}
        }
    }
    let mut s = builder.build();
    s.id = id;
    Ok(s)
}

/// Reads all the rows of a flat export. The first row is the header.
pub fn flat_rows_to_submissions(path: &str, rows: &[Vec<String>]) -> StatResult<Vec<Submission>> {
    let (header, body) = rows.split_first().context(MissingHeaderSnafu {
        path: path.to_string(),
    })?;
    let columns = parse_header(path, header);
    let templates = header_templates(&columns);
    debug!(
        "flat_rows_to_submissions: {}: columns: {:?}",
        simplify_file_name(path),
        columns
    );
    let mut res: Vec<Submission> = Vec::new();
    for row in body.iter() {
        if row.iter().all(|c| c.trim().is_empty()) {
            continue;
        }
        res.push(flat_row_to_submission(&columns, &templates, row)?);
    }
    info!(
        "flat_rows_to_submissions: {}: {} submissions",
        simplify_file_name(path),
        res.len()
    );
    Ok(res)
}
