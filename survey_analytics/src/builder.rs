pub use crate::config::*;

use std::collections::BTreeMap;

/// The profile fields a submission form may set, by their wire names.
pub const PROFILE_FIELDS: [&str; 15] = [
    "name",
    "age",
    "gender",
    "wardNumber",
    "address",
    "date",
    "time",
    "currentJob",
    "familyNumber",
    "phoneNumber",
    "caste",
    "class",
    "religiousAffiliation",
    "educationLevel",
    "residencyStatus",
];

/// The blank questionnaire of one survey module.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct SectionTemplate {
    pub key: String,
    pub topic: String,
    pub subject: String,
    /// (question id, question text)
    pub questions: Vec<(String, String)>,
}

/// One change made on the form.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum FormUpdate {
    /// Selects an option of a single-choice question. An empty value clears the selection.
    Choice {
        section: String,
        question_id: String,
        value: String,
    },
    /// Writes one labeled field of a multi-part question.
    Text {
        section: String,
        question_id: String,
        sub_question: String,
        value: String,
    },
}

// (section, question id, sub-question)
type AnswerKey = (String, String, Option<String>);

/// Collects the answers of one respondent while the form is being filled.
///
/// ```
/// use survey_analytics::builder::{Builder, FormUpdate, SectionTemplate};
/// # use survey_analytics::AnalyticsErrors;
///
/// let template = SectionTemplate {
///     key: "Survey1".to_string(),
///     topic: "Development".to_string(),
///     subject: "Priorities".to_string(),
///     questions: vec![("q1".to_string(), "Most urgent need?".to_string())],
/// };
/// let mut builder = Builder::new(&[template]);
/// builder.set_profile("wardNumber", "5")?;
/// builder.update(FormUpdate::Choice {
///     section: "Survey1".to_string(),
///     question_id: "q1".to_string(),
///     value: "Roads".to_string(),
/// })?;
///
/// let submission = builder.build();
/// assert_eq!(submission.ward_number.as_deref(), Some("5"));
/// # Ok::<(), AnalyticsErrors>(())
/// ```
pub struct Builder {
    pub(crate) _templates: Vec<SectionTemplate>,
    pub(crate) _profile: BTreeMap<String, String>,
    // Insertion order of the keys, so that multi-part answers keep the order they were written in.
    pub(crate) _order: Vec<AnswerKey>,
    pub(crate) _answers: BTreeMap<AnswerKey, String>,
}

impl Builder {
    pub fn new(templates: &[SectionTemplate]) -> Builder {
        Builder {
            _templates: templates.to_vec(),
            _profile: BTreeMap::new(),
            _order: Vec::new(),
            _answers: BTreeMap::new(),
        }
    }

    pub fn set_profile(&mut self, field: &str, value: &str) -> Result<(), AnalyticsErrors> {
        if !PROFILE_FIELDS.contains(&field) {
            return Err(AnalyticsErrors::UnknownField(field.to_string()));
        }
        self._profile.insert(field.to_string(), value.to_string());
        Ok(())
    }

    /// Applies one change to the stored answers.
    pub fn update(&mut self, update: FormUpdate) -> Result<(), AnalyticsErrors> {
        let (key, value) = match update {
            FormUpdate::Choice {
                section,
                question_id,
                value,
            } => ((section, question_id, None), value),
            FormUpdate::Text {
                section,
                question_id,
                sub_question,
                value,
            } => ((section, question_id, Some(sub_question)), value),
        };
        self.check_question(&key.0, &key.1)?;
        if key.2.is_none() && value.is_empty() {
            self._answers.remove(&key);
            self._order.retain(|k| *k != key);
            return Ok(());
        }
        if !self._answers.contains_key(&key) {
            self._order.push(key.clone());
        }
        self._answers.insert(key, value);
        Ok(())
    }

    fn check_question(&self, section: &str, question_id: &str) -> Result<(), AnalyticsErrors> {
        let known = self
            ._templates
            .iter()
            .filter(|t| t.key == section)
            .any(|t| t.questions.iter().any(|(qid, _)| qid == question_id));
        if known {
            Ok(())
        } else {
            Err(AnalyticsErrors::UnknownQuestion(format!(
                "{}/{}",
                section, question_id
            )))
        }
    }

    /// The submission as it would be sent. Unanswered questions are blank.
    pub fn build(&self) -> Submission {
        let field = |name: &str| self._profile.get(name).cloned();
        let mut surveys: Vec<SurveyModuleResponse> = Vec::new();
        for t in self._templates.iter() {
            let mut answers: Vec<AnswerEntry> = Vec::new();
            for (qid, text) in t.questions.iter() {
                let choice_key: AnswerKey = (t.key.clone(), qid.clone(), None);
                let parts: Vec<(String, String)> = self
                    ._order
                    .iter()
                    .filter(|(s, q, sub)| *s == t.key && q == qid && sub.is_some())
                    .filter_map(|k| {
                        let v = self._answers.get(k)?;
                        k.2.clone().map(|label| (label, v.clone()))
                    })
                    .collect();
                let answer = if !parts.is_empty() {
                    Answer::from_parts(parts)
                } else {
                    Answer::Scalar(self._answers.get(&choice_key).cloned().unwrap_or_default())
                };
                answers.push(AnswerEntry {
                    question_id: qid.clone(),
                    question_text: text.clone(),
                    answer,
                });
            }
            surveys.push(SurveyModuleResponse {
                survey_key: t.key.clone(),
                topic: t.topic.clone(),
                subject: t.subject.clone(),
                answers,
            });
        }
        Submission {
            id: None,
            name: field("name"),
            age: field("age"),
            gender: field("gender"),
            ward_number: field("wardNumber"),
            address: field("address"),
            phone_number: field("phoneNumber"),
            caste: field("caste"),
            class: field("class"),
            education_level: field("educationLevel"),
            religious_affiliation: field("religiousAffiliation"),
            family_number: field("familyNumber"),
            current_job: field("currentJob"),
            residency_status: field("residencyStatus"),
            date: field("date"),
            time: field("time"),
            surveys,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{build_question_catalog, run_question_analysis};

    fn templates() -> Vec<SectionTemplate> {
        vec![SectionTemplate {
            key: "Survey1".to_string(),
            topic: "विकास".to_string(),
            subject: "प्राथमिकता".to_string(),
            questions: vec![
                ("q1".to_string(), "पहिलो प्राथमिकता".to_string()),
                ("q2".to_string(), "सुझाव".to_string()),
            ],
        }]
    }

    fn choice(q: &str, v: &str) -> FormUpdate {
        FormUpdate::Choice {
            section: "Survey1".to_string(),
            question_id: q.to_string(),
            value: v.to_string(),
        }
    }

    fn text(q: &str, sub: &str, v: &str) -> FormUpdate {
        FormUpdate::Text {
            section: "Survey1".to_string(),
            question_id: q.to_string(),
            sub_question: sub.to_string(),
            value: v.to_string(),
        }
    }

    #[test]
    fn choices_and_texts() {
        let mut b = Builder::new(&templates());
        b.set_profile("name", "राम").unwrap();
        b.update(choice("q1", "सडक")).unwrap();
        b.update(choice("q1", "पानी")).unwrap();
        b.update(text("q2", "दोस्रो", "बाटो")).unwrap();
        b.update(text("q2", "पहिलो", "खानेपानी")).unwrap();
        b.update(text("q2", "दोस्रो", "पुल")).unwrap();

        let s = b.build();
        assert_eq!(s.name.as_deref(), Some("राम"));
        assert_eq!(s.age, None);
        let answers = &s.surveys[0].answers;
        assert_eq!(answers[0].answer, Answer::Scalar("पानी".to_string()));
        assert_eq!(
            answers[1].answer,
            Answer::MultiPart(vec![
                ("दोस्रो".to_string(), "पुल".to_string()),
                ("पहिलो".to_string(), "खानेपानी".to_string()),
            ])
        );
    }

    #[test]
    fn clearing_a_choice() {
        let mut b = Builder::new(&templates());
        b.update(choice("q1", "सडक")).unwrap();
        b.update(choice("q1", "")).unwrap();
        let s = b.build();
        assert_eq!(s.surveys[0].answers[0].answer, Answer::Scalar("".to_string()));
        assert_eq!(s.surveys[0].answers[1].answer, Answer::Scalar("".to_string()));
    }

    #[test]
    fn unknown_fields_and_questions() {
        let mut b = Builder::new(&templates());
        assert_eq!(
            b.set_profile("password", "x"),
            Err(AnalyticsErrors::UnknownField("password".to_string()))
        );
        assert_eq!(
            b.update(choice("q9", "x")),
            Err(AnalyticsErrors::UnknownQuestion("Survey1/q9".to_string()))
        );
    }

    #[test]
    fn built_submissions_feed_the_analysis() {
        let mut coll: Vec<Submission> = Vec::new();
        for (v, sub) in [("सडक", "बाटो"), ("सडक", ""), ("पानी", "धारा")] {
            let mut b = Builder::new(&templates());
            b.update(choice("q1", v)).unwrap();
            if !sub.is_empty() {
                b.update(text("q2", "पहिलो", sub)).unwrap();
            }
            coll.push(b.build());
        }
        let catalog = build_question_catalog(&coll, "Survey1");
        assert_eq!(catalog.len(), 2);
        assert!(!catalog[0].is_multi_part);
        assert!(catalog[1].is_multi_part);
        let analysis =
            run_question_analysis(&coll, "Survey1", &catalog[0], &AnalysisRules::DEFAULT_RULES)
                .unwrap();
        let counts: Vec<u64> = analysis.tallies()[0].buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1]);
    }
}
