use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use survey_analytics::dashboard::{admin_overview, search_users};
use survey_analytics::presentation::{to_chart_series, ChartKind, ChartSeries};
use survey_analytics::session::Session;
use survey_analytics::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;
use crate::stats::config_reader::*;

pub mod config_reader;
mod io_common;
mod io_csv;
mod io_json;
mod io_xlsx;

#[derive(Debug, Snafu)]
pub enum StatError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("The workbook {path} has no worksheet"))]
    EmptyExcel { path: String },
    #[snafu(display("Cannot find worksheet {name} in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Cannot read the cell on line {lineno}: {content}"))]
    ExcelWrongCellType { lineno: u64, content: String },
    #[snafu(display("Error opening file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing the JSON content of {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error writing the summary to {path}"))]
    WritingSummary {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error opening file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno}"))]
    CsvLineParse { source: csv::Error, lineno: usize },
    #[snafu(display("The file {path} has no header row"))]
    MissingHeader { path: String },
    #[snafu(display("Expected a positive number for {field}"))]
    ParsingJsonNumber { field: String },
    #[snafu(display("Cannot find the directory of the configuration file"))]
    MissingParentDir {},
    #[snafu(display("{source}"))]
    Analytics { source: AnalyticsErrors },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type StatResult<T> = Result<T, StatError>;

/// The documents that surveystat can produce.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Report {
    Question,
    Catalog,
    Wards,
    Overview,
    Users,
}

impl Report {
    pub fn parse(s: &str) -> StatResult<Report> {
        match s.to_lowercase().as_str() {
            "question" => Ok(Report::Question),
            "catalog" => Ok(Report::Catalog),
            "wards" => Ok(Report::Wards),
            "overview" => Ok(Report::Overview),
            "users" => Ok(Report::Users),
            x => whatever!("unknown report: {}", x),
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Report::Question => "question",
            Report::Catalog => "catalog",
            Report::Wards => "wards",
            Report::Overview => "overview",
            Report::Users => "users",
        }
    }
}

fn read_submissions(sources: &[FileSource]) -> StatResult<Vec<Submission>> {
    let mut data: Vec<Submission> = Vec::new();
    for cfs in sources.iter() {
        info!("Attempting to read submission file {:?}", cfs.file_path);
        let mut file_data = match cfs.provider.as_str() {
            "json" => io_json::read_json_submissions(&cfs.file_path)?,
            "csv" => io_csv::read_csv_submissions(&cfs.file_path)?,
            "xlsx" => io_xlsx::read_xlsx_submissions(&cfs.file_path, cfs)?,
            x => whatever!("Provider not implemented {:?}", x),
        };
        data.append(&mut file_data);
    }
    Ok(data)
}

fn read_session(settings: &RunSettings) -> StatResult<Session> {
    match settings.session_path.as_ref() {
        Some(p) => io_json::read_session(p),
        None => Ok(Session::Unauthenticated),
    }
}

fn read_users(settings: &RunSettings) -> StatResult<Vec<User>> {
    match settings.users_path.as_ref() {
        Some(p) => io_json::read_users(p),
        None => whatever!("the {} report needs the list of users (--users)", settings.report.name()),
    }
}

fn ids(respondents: &[RespondentProfile]) -> Vec<String> {
    respondents.iter().map(|r| r.id.clone()).collect()
}

fn tally_to_json(tally: &AnswerTally) -> JSValue {
    let buckets: Vec<JSValue> = tally
        .buckets
        .iter()
        .map(|b| {
            let mut js = json!({
                "answer": b.answer,
                "fullAnswer": b.full_answer,
                "count": b.count,
                "percentage": b.percentage,
                "isOther": b.is_other,
            });
            if b.is_other {
                let others: Vec<JSValue> = b
                    .other_answers
                    .iter()
                    .map(|o| {
                        json!({
                            "answer": o.answer,
                            "count": o.count,
                            "respondents": ids(&o.respondents),
                        })
                    })
                    .collect();
                let all: Vec<String> = b
                    .other_answers
                    .iter()
                    .flat_map(|o| ids(&o.respondents))
                    .collect();
                js["respondents"] = json!(all);
                js["otherAnswers"] = JSValue::Array(others);
            } else {
                js["respondents"] = json!(ids(tally.respondents_for(&b.full_answer)));
            }
            js
        })
        .collect();
    json!({
        "subQuestion": tally.sub_question,
        "answered": tally.answered,
        "buckets": buckets,
    })
}

fn chart_to_json(series: &ChartSeries) -> JSValue {
    let points: Vec<JSValue> = series
        .points
        .iter()
        .map(|p| {
            json!({
                "label": p.label,
                "fullLabel": p.full_label,
                "count": p.count,
                "percentage": p.percentage,
                "color": p.color,
                "isOther": p.is_other,
            })
        })
        .collect();
    json!({
        "kind": series.kind.name(),
        "title": series.title,
        "height": series.height,
        "points": points,
    })
}

fn question_to_json(q: &QuestionDescriptor) -> JSValue {
    json!({
        "id": q.id,
        "text": q.text,
        "isMultiPart": q.is_multi_part,
        "subQuestions": q.sub_questions,
    })
}

fn user_to_json(u: &User) -> JSValue {
    json!({
        "id": u.id,
        "username": u.username,
        "email": u.email,
        "roles": u.roles,
        "createdAt": u.created_at,
    })
}

fn output_config(settings: &RunSettings, respondents: u64) -> OutputConfig {
    OutputConfig {
        report: settings.report_name.clone(),
        survey: settings.survey_key.clone(),
        question: settings.question_id.clone(),
        ward: settings.ward.to_string(),
        respondents,
    }
}

fn build_summary_js(settings: &RunSettings, stats: &SurveyStats) -> JSValue {
    let tallies: Vec<&AnswerTally> = stats
        .analysis
        .as_ref()
        .map(|a| a.tallies())
        .unwrap_or_default();
    let mut js = json!({
        "config": output_config(settings, stats.total_respondents),
        "question": stats.question.as_ref().map(question_to_json),
        "results": tallies.iter().map(|t| tally_to_json(t)).collect::<Vec<JSValue>>(),
    });
    if let Some(kind) = settings.chart {
        let charts: Vec<JSValue> = tallies
            .iter()
            .map(|t| chart_to_json(&to_chart_series(t, kind)))
            .collect();
        js["chart"] = JSValue::Array(charts);
    }
    js
}

fn question_report(settings: &RunSettings, coll: &[Submission]) -> StatResult<JSValue> {
    let survey_key = match settings.survey_key.as_ref() {
        Some(x) => x,
        None => whatever!("no survey selected: use --survey or selection.surveyKey"),
    };
    let question_id = match settings.question_id.as_ref() {
        Some(x) => x,
        None => whatever!("no question selected: use --question or selection.questionId"),
    };
    let stats = run_survey_stats(coll, survey_key, question_id, &settings.ward, &settings.rules)
        .context(AnalyticsSnafu {})?;
    if stats.question.is_none() {
        warn!(
            "No answer found for question {:?} of survey {:?} in ward {}",
            question_id, survey_key, settings.ward
        );
    }
    Ok(build_summary_js(settings, &stats))
}

fn catalog_report(settings: &RunSettings, coll: &[Submission]) -> JSValue {
    let filtered = filter_by_ward(coll, &settings.ward);
    let surveys: Vec<JSValue> = list_survey_modules(&filtered)
        .iter()
        .filter(|m| settings.survey_key.as_ref().map(|k| *k == m.key).unwrap_or(true))
        .map(|m| {
            let questions: Vec<JSValue> = build_question_catalog(&filtered, &m.key)
                .iter()
                .map(question_to_json)
                .collect();
            json!({
                "key": m.key,
                "topic": m.topic,
                "subject": m.subject,
                "questions": questions,
            })
        })
        .collect();
    json!({
        "config": output_config(settings, filtered.len() as u64),
        "surveys": surveys,
    })
}

fn wards_report(settings: &RunSettings, coll: &[Submission]) -> JSValue {
    json!({
        "config": output_config(settings, coll.len() as u64),
        "wards": distinct_wards(coll),
    })
}

fn overview_report(settings: &RunSettings, coll: &[Submission]) -> StatResult<JSValue> {
    let session = read_session(settings)?;
    let users = read_users(settings)?;
    let o = admin_overview(&session, coll, &users).context(AnalyticsSnafu {})?;
    Ok(json!({
        "totalUsers": o.total_users,
        "totalSubmissions": o.total_submissions,
        "topWard": o.top_ward.as_ref().map(|(w, c)| json!({"ward": w, "count": c})),
        "maleCount": o.male_count,
        "femaleCount": o.female_count,
        "adminCount": o.admin_count,
        "recentUsers": o.recent_users.iter().map(user_to_json).collect::<Vec<JSValue>>(),
    }))
}

fn users_report(settings: &RunSettings) -> StatResult<JSValue> {
    let session = read_session(settings)?;
    let users = read_users(settings)?;
    let found = search_users(&session, &users, &settings.search).context(AnalyticsSnafu {})?;
    Ok(json!({
        "search": settings.search,
        "users": found.iter().map(user_to_json).collect::<Vec<JSValue>>(),
    }))
}

/// Reads the data and produces the document of the selected report.
pub fn compute_summary(settings: &RunSettings) -> StatResult<JSValue> {
    let coll = match settings.report {
        // The user list does not depend on the submissions.
        Report::Users => vec![],
        _ => read_submissions(&settings.sources)?,
    };
    info!(
        "compute_summary: report {}: {} submissions",
        settings.report.name(),
        coll.len()
    );
    match settings.report {
        Report::Question => question_report(settings, &coll),
        Report::Catalog => Ok(catalog_report(settings, &coll)),
        Report::Wards => Ok(wards_report(settings, &coll)),
        Report::Overview => overview_report(settings, &coll),
        Report::Users => users_report(settings),
    }
}

fn write_summary(pretty_js: &str, out: &Option<String>) -> StatResult<()> {
    match out.as_deref() {
        None | Some("stdout") => {
            println!("{}", pretty_js);
            Ok(())
        }
        Some(path) => {
            if let Some(dir) = Path::new(path).parent() {
                if !dir.as_os_str().is_empty() {
                    fs::create_dir_all(dir).context(WritingSummarySnafu { path })?;
                }
            }
            info!("Writing summary to {:?}", path);
            fs::write(path, pretty_js).context(WritingSummarySnafu { path })
        }
    }
}

// Objects keep their insertion order, the comparison with a reference must not depend on it.
fn sorted_keys(js: &JSValue) -> JSValue {
    match js {
        JSValue::Object(m) => {
            let mut entries: Vec<(&String, &JSValue)> = m.iter().collect();
            entries.sort_by(|a, b| a.0.cmp(b.0));
            JSValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k.clone(), sorted_keys(v)))
                    .collect(),
            )
        }
        JSValue::Array(l) => JSValue::Array(l.iter().map(sorted_keys).collect()),
        x => x.clone(),
    }
}

/// Compares a summary with the reference file. Differences are printed and fail the run.
pub fn check_reference(summary: &JSValue, reference_path: &str) -> StatResult<()> {
    let pretty_js_stats = serde_json::to_string_pretty(&sorted_keys(summary)).context(ParsingJsonSnafu {
        path: "summary".to_string(),
    })?;
    let summary_ref = read_summary(reference_path)?;
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&sorted_keys(&summary_ref)).context(ParsingJsonSnafu {
            path: reference_path.to_string(),
        })?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary");
        print_diff(
            pretty_js_summary_ref.as_str(),
            pretty_js_stats.as_ref(),
            "\n",
        );
        whatever!("Difference detected between calculated summary and reference summary")
    }
    Ok(())
}

/// Runs the analysis described by a configuration file, and optionally checks it against a reference.
pub fn run_analysis(config_path: &str, reference: Option<&str>) -> StatResult<JSValue> {
    let config = read_config(config_path)?;
    let settings = settings_from_config(config_path, &config)?;
    let summary = compute_summary(&settings)?;
    if let Some(r) = reference {
        check_reference(&summary, r)?;
    }
    Ok(summary)
}

pub fn run_from_args(args: &Args) -> StatResult<()> {
    let settings = settings_from_args(args)?;
    let summary = compute_summary(&settings)?;
    let pretty_js = serde_json::to_string_pretty(&summary).context(ParsingJsonSnafu {
        path: "summary".to_string(),
    })?;
    write_summary(&pretty_js, &settings.out)?;
    if let Some(r) = args.reference.as_ref() {
        check_reference(&summary, r)?;
    }
    Ok(())
}
