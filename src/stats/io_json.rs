// Readers for the JSON payloads of the survey service.

use serde::Deserialize;
use serde_json::Value as JSValue;

use crate::stats::*;

#[derive(Debug, Clone, Deserialize)]
struct WireAnswer {
    #[serde(rename = "questionId")]
    question_id: Option<JSValue>,
    #[serde(rename = "questionText")]
    question_text: Option<JSValue>,
    answer: Option<JSValue>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireSurvey {
    #[serde(rename = "surveyKey")]
    survey_key: Option<JSValue>,
    topic: Option<JSValue>,
    subject: Option<JSValue>,
    #[serde(default)]
    answers: Vec<WireAnswer>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireSubmission {
    #[serde(rename = "_id")]
    id: Option<JSValue>,
    name: Option<JSValue>,
    age: Option<JSValue>,
    gender: Option<JSValue>,
    #[serde(rename = "wardNumber")]
    ward_number: Option<JSValue>,
    address: Option<JSValue>,
    #[serde(rename = "phoneNumber")]
    phone_number: Option<JSValue>,
    caste: Option<JSValue>,
    class: Option<JSValue>,
    #[serde(rename = "educationLevel")]
    education_level: Option<JSValue>,
    #[serde(rename = "religiousAffiliation")]
    religious_affiliation: Option<JSValue>,
    #[serde(rename = "familyNumber")]
    family_number: Option<JSValue>,
    #[serde(rename = "currentJob")]
    current_job: Option<JSValue>,
    #[serde(rename = "residencyStatus")]
    residency_status: Option<JSValue>,
    date: Option<JSValue>,
    time: Option<JSValue>,
    #[serde(default)]
    surveys: Vec<WireSurvey>,
}

#[derive(Debug, Clone, Deserialize)]
struct WireUser {
    #[serde(rename = "_id")]
    id: Option<JSValue>,
    username: Option<String>,
    email: Option<String>,
    role: Option<JSValue>,
    #[serde(rename = "createdAt")]
    created_at: Option<JSValue>,
}

/// The textual form of a value. Numbers and booleans are common in hand-edited exports.
fn js_text(v: &JSValue) -> String {
    match v {
        JSValue::Null => String::new(),
        JSValue::String(s) => s.clone(),
        JSValue::Bool(b) => b.to_string(),
        JSValue::Number(n) => n.to_string(),
        JSValue::Array(l) => l.iter().map(js_text).collect::<Vec<String>>().join(","),
        JSValue::Object(_) => v.to_string(),
    }
}

fn opt_text(v: &Option<JSValue>) -> Option<String> {
    v.as_ref().and_then(|x| match x {
        JSValue::Null => None,
        _ => Some(js_text(x)),
    })
}

/// Decides the shape of an answer: objects are keyed sub-answers, everything else is a single value.
pub fn answer_from_json(v: &Option<JSValue>) -> Answer {
    match v {
        Some(JSValue::Object(m)) => Answer::from_parts(
            m.iter()
                .map(|(k, x)| (k.clone(), js_text(x)))
                .collect(),
        ),
        Some(x) => Answer::Scalar(js_text(x)),
        None => Answer::Scalar(String::new()),
    }
}

fn to_submission(w: WireSubmission) -> Submission {
    let mut surveys: Vec<SurveyModuleResponse> = Vec::new();
    for ws in w.surveys.iter() {
        let survey_key = match opt_text(&ws.survey_key) {
            Some(k) if !k.is_empty() => k,
            _ => {
                warn!("submission {:?}: skipping a survey without key", w.id);
                continue;
            }
        };
        let mut answers: Vec<AnswerEntry> = Vec::new();
        for wa in ws.answers.iter() {
            match opt_text(&wa.question_id) {
                Some(qid) if !qid.is_empty() => answers.push(AnswerEntry {
                    question_id: qid,
                    question_text: opt_text(&wa.question_text).unwrap_or_default(),
                    answer: answer_from_json(&wa.answer),
                }),
                _ => warn!(
                    "submission {:?}: survey {}: skipping an answer without question id",
                    w.id, survey_key
                ),
            }
        }
        surveys.push(SurveyModuleResponse {
            survey_key,
            topic: opt_text(&ws.topic).unwrap_or_default(),
            subject: opt_text(&ws.subject).unwrap_or_default(),
            answers,
        });
    }
    Submission {
        id: opt_text(&w.id),
        name: opt_text(&w.name),
        age: opt_text(&w.age),
        gender: opt_text(&w.gender),
        ward_number: opt_text(&w.ward_number),
        address: opt_text(&w.address),
        phone_number: opt_text(&w.phone_number),
        caste: opt_text(&w.caste),
        class: opt_text(&w.class),
        education_level: opt_text(&w.education_level),
        religious_affiliation: opt_text(&w.religious_affiliation),
        family_number: opt_text(&w.family_number),
        current_job: opt_text(&w.current_job),
        residency_status: opt_text(&w.residency_status),
        date: opt_text(&w.date),
        time: opt_text(&w.time),
        surveys,
    }
}

fn to_user(w: WireUser) -> User {
    let roles: Vec<String> = match w.role.as_ref() {
        Some(JSValue::Array(l)) => l.iter().map(js_text).collect(),
        Some(JSValue::Null) | None => vec![],
        Some(x) => vec![js_text(x)],
    };
    User {
        id: opt_text(&w.id).unwrap_or_default(),
        username: w.username.unwrap_or_default(),
        email: w.email.unwrap_or_default(),
        roles,
        created_at: opt_text(&w.created_at),
    }
}

fn read_js(path: &str) -> StatResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: path.to_string(),
    })
}

// The payload is either wrapped in an object under the given key, or a bare array.
fn unwrap_list(js: JSValue, key: &str, path: &str) -> StatResult<JSValue> {
    match js {
        JSValue::Object(mut m) => match m.remove(key) {
            Some(l) => Ok(l),
            None => whatever!("{}: expected a list or an object with a {:?} entry", path, key),
        },
        l @ JSValue::Array(_) => Ok(l),
        _ => whatever!("{}: expected a list or an object with a {:?} entry", path, key),
    }
}

pub fn parse_submissions(js: JSValue, path: &str) -> StatResult<Vec<Submission>> {
    let list = unwrap_list(js, "userData", path)?;
    let wire: Vec<WireSubmission> = serde_json::from_value(list).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    Ok(wire.into_iter().map(to_submission).collect())
}

pub fn read_json_submissions(path: &str) -> StatResult<Vec<Submission>> {
    let res = parse_submissions(read_js(path)?, path)?;
    info!("read_json_submissions: {:?}: {} submissions", path, res.len());
    Ok(res)
}

pub fn parse_users(js: JSValue, path: &str) -> StatResult<Vec<User>> {
    let list = unwrap_list(js, "users", path)?;
    let wire: Vec<WireUser> = serde_json::from_value(list).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    Ok(wire.into_iter().map(to_user).collect())
}

pub fn read_users(path: &str) -> StatResult<Vec<User>> {
    let res = parse_users(read_js(path)?, path)?;
    info!("read_users: {:?}: {} users", path, res.len());
    Ok(res)
}

/// `{"user": {...}}`, a bare user, or `null` for nobody.
pub fn parse_session(js: JSValue, path: &str) -> StatResult<Session> {
    let user_js = match js {
        JSValue::Null => return Ok(Session::Unauthenticated),
        JSValue::Object(mut m) if m.contains_key("user") => match m.remove("user") {
            Some(JSValue::Null) | None => return Ok(Session::Unauthenticated),
            Some(u) => u,
        },
        x => x,
    };
    let wire: WireUser = serde_json::from_value(user_js).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    Ok(Session::Authenticated(to_user(wire)))
}

pub fn read_session(path: &str) -> StatResult<Session> {
    let res = parse_session(read_js(path)?, path)?;
    info!("read_session: {:?}: {}", path, res.landing_page());
    Ok(res)
}
