// ********* Input data structures ***********

use std::error::Error;
use std::fmt::Display;

/// The answer given to one question of a survey module.
///
/// The shape is decided once, when the submission is read. Readers should go through
/// [Answer::from_parts] for keyed answers so that the classification rule stays in one place.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum Answer {
    /// A single choice (or a free text written in a single field).
    Scalar(String),
    /// Several labeled free-text sub-answers, in the order they were written.
    /// Labels are never empty.
    MultiPart(Vec<(String, String)>),
}

impl Answer {
    /// Builds an answer out of a keyed collection of sub-answers.
    ///
    /// Entries with an empty label are dropped. If nothing remains, the answer is a blank scalar.
    pub fn from_parts(parts: Vec<(String, String)>) -> Answer {
        let kept: Vec<(String, String)> = parts.into_iter().filter(|(k, _)| !k.is_empty()).collect();
        if kept.is_empty() {
            Answer::Scalar(String::new())
        } else {
            Answer::MultiPart(kept)
        }
    }

    pub fn is_multi_part(&self) -> bool {
        matches!(self, Answer::MultiPart(_))
    }

    /// The sub-answer written for the given label, if any.
    pub fn sub_answer(&self, label: &str) -> Option<&str> {
        match self {
            Answer::MultiPart(parts) => parts
                .iter()
                .find(|(k, _)| k == label)
                .map(|(_, v)| v.as_str()),
            Answer::Scalar(_) => None,
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnswerEntry {
    pub question_id: String,
    pub question_text: String,
    pub answer: Answer,
}

/// One questionnaire module (for example `Survey1`) filled in as part of a submission.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyModuleResponse {
    pub survey_key: String,
    pub topic: String,
    pub subject: String,
    pub answers: Vec<AnswerEntry>,
}

/// One filled-out questionnaire, tied to one surveyed person.
///
/// The identity fields are optional: field workers regularly leave some of them blank.
#[derive(Eq, PartialEq, Debug, Clone, Default)]
pub struct Submission {
    pub id: Option<String>,
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub ward_number: Option<String>,
    pub address: Option<String>,
    pub phone_number: Option<String>,
    pub caste: Option<String>,
    pub class: Option<String>,
    pub education_level: Option<String>,
    pub religious_affiliation: Option<String>,
    pub family_number: Option<String>,
    pub current_job: Option<String>,
    pub residency_status: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub surveys: Vec<SurveyModuleResponse>,
}

impl Submission {
    /// The module answered for the given key, if this person answered it.
    pub fn module(&self, survey_key: &str) -> Option<&SurveyModuleResponse> {
        self.surveys.iter().find(|s| s.survey_key == survey_key)
    }
}

/// A registered account (field worker or administrator).
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub roles: Vec<String>,
    pub created_at: Option<String>,
}

impl User {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }
}

// ******** Output data structures *********

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SurveyModuleInfo {
    pub key: String,
    pub topic: String,
    pub subject: String,
}

/// A question as it appears across all the submissions of one survey module.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct QuestionDescriptor {
    pub id: String,
    pub text: String,
    pub is_multi_part: bool,
    /// Union of the sub-question labels seen across all respondents, in first-seen order.
    pub sub_questions: Vec<String>,
}

/// The fixed profile shape used when attributing answers to people.
/// Missing fields are empty strings.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct RespondentProfile {
    pub id: String,
    pub name: String,
    pub age: String,
    pub gender: String,
    pub ward_number: String,
    pub address: String,
    pub phone_number: String,
    pub caste: String,
    pub education_level: String,
}

/// One of the answers collapsed into the "other" bucket.
#[derive(PartialEq, Debug, Clone)]
pub struct OtherAnswer {
    pub answer: String,
    pub count: u64,
    pub respondents: Vec<RespondentProfile>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct AnswerBucket {
    /// Display text, possibly truncated.
    pub answer: String,
    pub full_answer: String,
    pub count: u64,
    /// Share of the filtered respondents, rounded to one decimal.
    pub percentage: f64,
    pub is_other: bool,
    /// Only filled for the "other" bucket, in rank order.
    pub other_answers: Vec<OtherAnswer>,
}

/// The distribution of answers for one question, or for one sub-question of a multi-part question.
#[derive(PartialEq, Debug, Clone)]
pub struct AnswerTally {
    pub sub_question: Option<String>,
    pub buckets: Vec<AnswerBucket>,
    /// Who gave which answer, keyed by the full answer text, in rank order.
    pub respondents_by_answer: Vec<(String, Vec<RespondentProfile>)>,
    /// Number of respondents with a non-blank answer.
    pub answered: u64,
    /// Denominator of the percentages: all the respondents after filtering.
    pub total_respondents: u64,
}

impl AnswerTally {
    /// The people who gave exactly this (full, untruncated) answer.
    pub fn respondents_for(&self, full_answer: &str) -> &[RespondentProfile] {
        self.respondents_by_answer
            .iter()
            .find(|(a, _)| a == full_answer)
            .map(|(_, r)| r.as_slice())
            .unwrap_or(&[])
    }

    /// The answers collapsed into the "other" bucket, empty if there is none.
    pub fn other_answers(&self) -> &[OtherAnswer] {
        self.buckets
            .iter()
            .find(|b| b.is_other)
            .map(|b| b.other_answers.as_slice())
            .unwrap_or(&[])
    }
}

#[derive(PartialEq, Debug, Clone)]
pub enum QuestionAnalysis {
    Single(AnswerTally),
    /// One tally per sub-question, in the order of the descriptor.
    MultiPart(Vec<AnswerTally>),
}

impl QuestionAnalysis {
    pub fn tallies(&self) -> Vec<&AnswerTally> {
        match self {
            QuestionAnalysis::Single(t) => vec![t],
            QuestionAnalysis::MultiPart(ts) => ts.iter().collect(),
        }
    }
}

/// The outcome of a full selection: ward filter, then question lookup, then aggregation.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyStats {
    pub ward: WardSelector,
    pub total_respondents: u64,
    pub question: Option<QuestionDescriptor>,
    pub analysis: Option<QuestionAnalysis>,
}

/// Errors that prevent an operation from completing.
///
/// Missing data is never an error: it simply leads to smaller or empty results.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum AnalyticsErrors {
    InvalidRules,
    NotAuthenticated,
    NotAuthorized,
    UnknownField(String),
    UnknownQuestion(String),
}

impl Error for AnalyticsErrors {}

impl Display for AnalyticsErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AnalyticsErrors::InvalidRules => {
                write!(f, "the number of top answers and the label length must be positive")
            }
            AnalyticsErrors::NotAuthenticated => write!(f, "no user is logged in"),
            AnalyticsErrors::NotAuthorized => write!(f, "this operation requires the admin role"),
            AnalyticsErrors::UnknownField(x) => write!(f, "unknown form field {:?}", x),
            AnalyticsErrors::UnknownQuestion(x) => write!(f, "unknown question {:?}", x),
        }
    }
}

// ********* Configuration **********

/// Label of the synthetic bucket that collapses the answers ranked beyond the top ones.
pub const OTHER_LABEL: &str = "Other opinions";

/// Restricts the respondents to one administrative ward.
#[derive(Eq, PartialEq, Debug, Clone, Hash)]
pub enum WardSelector {
    All,
    Ward(String),
}

impl WardSelector {
    /// `all` (in any case) and the empty string select every ward.
    pub fn parse(s: &str) -> WardSelector {
        let t = s.trim();
        if t.is_empty() || t.eq_ignore_ascii_case("all") {
            WardSelector::All
        } else {
            WardSelector::Ward(t.to_string())
        }
    }
}

impl Display for WardSelector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WardSelector::All => write!(f, "all"),
            WardSelector::Ward(w) => write!(f, "{}", w),
        }
    }
}

#[derive(Eq, PartialEq, Debug, Clone)]
pub struct AnalysisRules {
    /// How many distinct answers get their own bucket before the rest is collapsed.
    pub top_answers: usize,
    /// Display budget for an answer, in characters. Longer answers end with `...`.
    pub max_label_chars: usize,
}

impl AnalysisRules {
    pub const DEFAULT_RULES: AnalysisRules = AnalysisRules {
        top_answers: 7,
        max_label_chars: 30,
    };

    pub fn validate(&self) -> Result<(), AnalyticsErrors> {
        if self.top_answers == 0 || self.max_label_chars == 0 {
            Err(AnalyticsErrors::InvalidRules)
        } else {
            Ok(())
        }
    }
}
