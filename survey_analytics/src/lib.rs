mod config;
pub mod builder;
pub mod dashboard;
pub mod manual;
pub mod presentation;
pub mod session;

use log::{debug, info};

use std::{
    cmp::Ordering,
    collections::HashMap,
    ops::AddAssign,
};

pub use crate::config::*;

// **** Private structures ****

#[derive(Eq, PartialEq, Debug, Clone, Copy, PartialOrd, Ord, Hash)]
struct AnswerCount(u64);

impl AnswerCount {
    const EMPTY: AnswerCount = AnswerCount(0);
}

impl std::iter::Sum for AnswerCount {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        AnswerCount(iter.map(|vc| vc.0).sum())
    }
}

impl AddAssign for AnswerCount {
    fn add_assign(&mut self, rhs: AnswerCount) {
        self.0 += rhs.0;
    }
}

// A distinct answer, its count and the people who gave it.
type RankedAnswer = (String, AnswerCount, Vec<RespondentProfile>);

/// Counts the distinct answers, remembering the order in which they were first seen.
struct AnswerCounter {
    order: Vec<String>,
    entries: HashMap<String, (AnswerCount, Vec<RespondentProfile>)>,
}

impl AnswerCounter {
    fn new() -> AnswerCounter {
        AnswerCounter {
            order: Vec::new(),
            entries: HashMap::new(),
        }
    }

    fn record(&mut self, answer: &str, who: RespondentProfile) {
        if !self.entries.contains_key(answer) {
            self.order.push(answer.to_string());
        }
        let e = self
            .entries
            .entry(answer.to_string())
            .or_insert((AnswerCount::EMPTY, Vec::new()));
        e.0 += AnswerCount(1);
        e.1.push(who);
    }

    /// Sorted by decreasing count. Ties keep the first-seen order.
    fn ranked(mut self) -> Vec<RankedAnswer> {
        let mut res: Vec<RankedAnswer> = Vec::new();
        for answer in self.order.iter() {
            if let Some((count, respondents)) = self.entries.remove(answer) {
                res.push((answer.clone(), count, respondents));
            }
        }
        // sort_by is stable.
        res.sort_by(|a, b| b.1.cmp(&a.1));
        res
    }
}

/// Lists the survey modules present in the submissions, in the order they first appear.
pub fn list_survey_modules(coll: &[Submission]) -> Vec<SurveyModuleInfo> {
    let mut res: Vec<SurveyModuleInfo> = Vec::new();
    for s in coll.iter() {
        for m in s.surveys.iter() {
            if !res.iter().any(|info| info.key == m.survey_key) {
                res.push(SurveyModuleInfo {
                    key: m.survey_key.clone(),
                    topic: m.topic.clone(),
                    subject: m.subject.clone(),
                });
            }
        }
    }
    res
}

/// Builds the list of questions asked in one survey module, across all the submissions.
///
/// Questions come in the order they are first seen. A question is multi-part as soon as one
/// respondent gave a multi-part answer to it; its sub-questions are the union of all the labels
/// seen, in first-seen order.
pub fn build_question_catalog(coll: &[Submission], survey_key: &str) -> Vec<QuestionDescriptor> {
    let mut catalog: Vec<QuestionDescriptor> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for s in coll.iter() {
        let module = match s.module(survey_key) {
            Some(m) => m,
            None => continue,
        };
        for entry in module.answers.iter() {
            let labels: Vec<&String> = match &entry.answer {
                Answer::MultiPart(parts) => parts.iter().map(|(k, _)| k).collect(),
                Answer::Scalar(_) => Vec::new(),
            };
            if let Some(idx) = positions.get(&entry.question_id) {
                let existing = &mut catalog[*idx];
                if entry.answer.is_multi_part() && !existing.is_multi_part {
                    debug!(
                        "build_question_catalog: question {:?} becomes multi-part",
                        existing.id
                    );
                    existing.is_multi_part = true;
                }
                merge_labels(&mut existing.sub_questions, &labels);
            } else {
                let mut sub_questions: Vec<String> = Vec::new();
                merge_labels(&mut sub_questions, &labels);
                positions.insert(entry.question_id.clone(), catalog.len());
                catalog.push(QuestionDescriptor {
                    id: entry.question_id.clone(),
                    text: entry.question_text.clone(),
                    is_multi_part: entry.answer.is_multi_part(),
                    sub_questions,
                });
            }
        }
    }
    debug!(
        "build_question_catalog: survey {:?}: {} questions",
        survey_key,
        catalog.len()
    );
    catalog
}

fn merge_labels(dest: &mut Vec<String>, labels: &[&String]) {
    for l in labels.iter() {
        if !l.is_empty() && !dest.contains(*l) {
            dest.push((*l).clone());
        }
    }
}

/// Keeps the respondents of the selected ward. Selecting all the wards returns the input as-is.
pub fn filter_by_ward(coll: &[Submission], ward: &WardSelector) -> Vec<Submission> {
    match ward {
        WardSelector::All => coll.to_vec(),
        WardSelector::Ward(w) => coll
            .iter()
            .filter(|s| s.ward_number.as_deref().map(str::trim) == Some(w.trim()))
            .cloned()
            .collect(),
    }
}

/// The distinct ward identifiers found in the data.
///
/// Numeric identifiers (ASCII or Devanagari digits) come first in numeric order, the other ones
/// follow in lexicographic order. Identifiers are trimmed, blank ones are not listed.
pub fn distinct_wards(coll: &[Submission]) -> Vec<String> {
    let mut wards: Vec<String> = Vec::new();
    for s in coll.iter() {
        if let Some(w) = s.ward_number.as_deref().map(str::trim) {
            if !w.is_empty() && !wards.iter().any(|x| x == w) {
                wards.push(w.to_string());
            }
        }
    }
    wards.sort_by(|a, b| match (ward_value(a), ward_value(b)) {
        (Some(x), Some(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.cmp(b),
    });
    wards
}

fn ward_value(w: &str) -> Option<u64> {
    let t = w.trim();
    if t.is_empty() {
        return None;
    }
    let mut res: u64 = 0;
    for c in t.chars() {
        let d = match c {
            '0'..='9' => c as u64 - '0' as u64,
            // Devanagari digits
            '\u{0966}'..='\u{096F}' => c as u64 - 0x0966,
            _ => return None,
        };
        res = res.checked_mul(10)?.checked_add(d)?;
    }
    Some(res)
}

/// Projects a submission onto the profile shown next to attributed answers.
pub fn respondent_profile(s: &Submission) -> RespondentProfile {
    let field = |x: &Option<String>| x.clone().unwrap_or_default();
    let id = match s.id.as_ref() {
        Some(id) if !id.is_empty() => id.clone(),
        _ => derived_id(s),
    };
    RespondentProfile {
        id,
        name: field(&s.name),
        age: field(&s.age),
        gender: field(&s.gender),
        ward_number: field(&s.ward_number),
        address: field(&s.address),
        phone_number: field(&s.phone_number),
        caste: field(&s.caste),
        education_level: field(&s.education_level),
    }
}

// Submissions exported without their database id still need a stable handle.
fn derived_id(s: &Submission) -> String {
    let key = format!(
        "{}|{}|{}|{}",
        s.name.as_deref().unwrap_or(""),
        s.phone_number.as_deref().unwrap_or(""),
        s.date.as_deref().unwrap_or(""),
        s.time.as_deref().unwrap_or("")
    );
    let digest = sha256::digest(key.as_str());
    digest[..16].to_string()
}

/// Computes the distribution of the answers to one question.
///
/// Arguments:
/// * `coll` the respondents, already filtered. Their number is the denominator of all the percentages.
/// * `survey_key` the survey module the question belongs to
/// * `question` the question, as returned by [build_question_catalog]
/// * `rules` how many answers get their own bucket, and how long labels may be
pub fn run_question_analysis(
    coll: &[Submission],
    survey_key: &str,
    question: &QuestionDescriptor,
    rules: &AnalysisRules,
) -> Result<QuestionAnalysis, AnalyticsErrors> {
    rules.validate()?;
    info!(
        "run_question_analysis: Processing {:?} respondents, survey: {:?}, question: {:?}, rules: {:?}",
        coll.len(),
        survey_key,
        question.id,
        rules
    );

    if question.is_multi_part {
        let mut tallies: Vec<AnswerTally> = Vec::new();
        for sub_question in question.sub_questions.iter() {
            tallies.push(tally_answers(
                coll,
                survey_key,
                &question.id,
                Some(sub_question),
                rules,
            ));
        }
        Ok(QuestionAnalysis::MultiPart(tallies))
    } else {
        Ok(QuestionAnalysis::Single(tally_answers(
            coll,
            survey_key,
            &question.id,
            None,
            rules,
        )))
    }
}

/// Runs a full selection: ward filter, question lookup, then aggregation.
///
/// An unknown survey or question is not an error: the result simply has no question.
pub fn run_survey_stats(
    coll: &[Submission],
    survey_key: &str,
    question_id: &str,
    ward: &WardSelector,
    rules: &AnalysisRules,
) -> Result<SurveyStats, AnalyticsErrors> {
    rules.validate()?;
    let filtered = filter_by_ward(coll, ward);
    info!(
        "run_survey_stats: {} of {} respondents selected (ward: {})",
        filtered.len(),
        coll.len(),
        ward
    );

    let question: Option<QuestionDescriptor> = build_question_catalog(&filtered, survey_key)
        .into_iter()
        .find(|q| q.id == question_id);

    let analysis = match question.as_ref() {
        Some(q) => Some(run_question_analysis(&filtered, survey_key, q, rules)?),
        None => {
            info!(
                "run_survey_stats: no answer to question {:?} in survey {:?}",
                question_id, survey_key
            );
            None
        }
    };

    Ok(SurveyStats {
        ward: ward.clone(),
        total_respondents: filtered.len() as u64,
        question,
        analysis,
    })
}

// The trimmed answer of one respondent, or None for a non-response.
fn extract_answer<'a>(
    s: &'a Submission,
    survey_key: &str,
    question_id: &str,
    sub_question: Option<&str>,
) -> Option<&'a str> {
    let entry = s
        .module(survey_key)?
        .answers
        .iter()
        .find(|a| a.question_id == question_id)?;
    let raw: &str = match (sub_question, &entry.answer) {
        (None, Answer::Scalar(x)) => x.as_str(),
        (Some(label), a @ Answer::MultiPart(_)) => a.sub_answer(label)?,
        // The shape does not match the question
        _ => return None,
    };
    let t = raw.trim();
    if t.is_empty() {
        None
    } else {
        Some(t)
    }
}

fn tally_answers(
    coll: &[Submission],
    survey_key: &str,
    question_id: &str,
    sub_question: Option<&String>,
    rules: &AnalysisRules,
) -> AnswerTally {
    let total = coll.len() as u64;
    let mut counter = AnswerCounter::new();
    for s in coll.iter() {
        if let Some(a) = extract_answer(s, survey_key, question_id, sub_question.map(|x| x.as_str()))
        {
            counter.record(a, respondent_profile(s));
        }
    }
    let ranked = counter.ranked();
    let answered: AnswerCount = ranked.iter().map(|(_, c, _)| *c).sum();
    debug!(
        "tally_answers: question {:?} sub-question {:?}: {} distinct answers, {:?} answered out of {}",
        question_id,
        sub_question,
        ranked.len(),
        answered,
        total
    );

    let cutoff = rules.top_answers.min(ranked.len());
    let (top, rest) = ranked.split_at(cutoff);

    let mut buckets: Vec<AnswerBucket> = top
        .iter()
        .map(|(answer, count, _)| AnswerBucket {
            answer: truncate_label(answer, rules.max_label_chars),
            full_answer: answer.clone(),
            count: count.0,
            percentage: percentage(*count, total),
            is_other: false,
            other_answers: Vec::new(),
        })
        .collect();

    if !rest.is_empty() {
        let other_count: AnswerCount = rest.iter().map(|(_, c, _)| *c).sum();
        buckets.push(AnswerBucket {
            answer: format!("{} ({})", OTHER_LABEL, rest.len()),
            full_answer: OTHER_LABEL.to_string(),
            count: other_count.0,
            percentage: percentage(other_count, total),
            is_other: true,
            other_answers: rest
                .iter()
                .map(|(answer, count, respondents)| OtherAnswer {
                    answer: answer.clone(),
                    count: count.0,
                    respondents: respondents.clone(),
                })
                .collect(),
        });
    }

    AnswerTally {
        sub_question: sub_question.cloned(),
        buckets,
        respondents_by_answer: ranked.into_iter().map(|(a, _, r)| (a, r)).collect(),
        answered: answered.0,
        total_respondents: total,
    }
}

// count / total * 100, rounded to one decimal.
fn percentage(count: AnswerCount, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        ((count.0 as f64) * 1000.0 / (total as f64)).round() / 10.0
    }
}

fn truncate_label(answer: &str, max_chars: usize) -> String {
    if answer.chars().count() > max_chars {
        let head: String = answer.chars().take(max_chars).collect();
        format!("{}...", head)
    } else {
        answer.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn scalar(s: &str) -> Answer {
        Answer::Scalar(s.to_string())
    }

    fn parts(ps: &[(&str, &str)]) -> Answer {
        Answer::from_parts(
            ps.iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    fn respondent(id: &str, ward: &str, answers: Vec<(&str, Answer)>) -> Submission {
        Submission {
            id: Some(id.to_string()),
            name: Some(format!("name-{}", id)),
            ward_number: Some(ward.to_string()),
            surveys: vec![SurveyModuleResponse {
                survey_key: "Survey1".to_string(),
                topic: "विकास".to_string(),
                subject: "Development".to_string(),
                answers: answers
                    .into_iter()
                    .map(|(qid, answer)| AnswerEntry {
                        question_id: qid.to_string(),
                        question_text: format!("text of {}", qid),
                        answer,
                    })
                    .collect(),
            }],
            ..Default::default()
        }
    }

    const PRIORITIES: [&str; 10] = [
        "सडक",
        "सडक",
        "पानी",
        "पानी",
        "पानी",
        "शिक्षा",
        "विजुली",
        "सिँचाई",
        "स्वास्थ्य",
        "सडक",
    ];

    // The first four people live in ward 5, the others in ward 3.
    fn priorities() -> Vec<Submission> {
        PRIORITIES
            .iter()
            .enumerate()
            .map(|(idx, a)| {
                let ward = if idx < 4 { "5" } else { "3" };
                respondent(&format!("r{}", idx), ward, vec![("q1", scalar(a))])
            })
            .collect()
    }

    fn rules(k: usize) -> AnalysisRules {
        AnalysisRules {
            top_answers: k,
            max_label_chars: 30,
        }
    }

    fn single(a: QuestionAnalysis) -> AnswerTally {
        match a {
            QuestionAnalysis::Single(t) => t,
            x => panic!("expected a single-answer analysis: {:?}", x),
        }
    }

    #[test]
    fn top_answers_with_other_bucket() {
        init();
        let coll = priorities();
        let catalog = build_question_catalog(&coll, "Survey1");
        assert_eq!(catalog.len(), 1);
        let tally = single(run_question_analysis(&coll, "Survey1", &catalog[0], &rules(5)).unwrap());

        let summary: Vec<(&str, u64, f64, bool)> = tally
            .buckets
            .iter()
            .map(|b| (b.full_answer.as_str(), b.count, b.percentage, b.is_other))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("सडक", 3, 30.0, false),
                ("पानी", 3, 30.0, false),
                ("शिक्षा", 1, 10.0, false),
                ("विजुली", 1, 10.0, false),
                ("सिँचाई", 1, 10.0, false),
                (OTHER_LABEL, 1, 10.0, true),
            ]
        );
        assert_eq!(tally.buckets[5].answer, "Other opinions (1)");
        let others = tally.other_answers();
        assert_eq!(others.len(), 1);
        assert_eq!(others[0].answer, "स्वास्थ्य");
        assert_eq!(others[0].count, 1);
        assert_eq!(others[0].respondents[0].id, "r8");

        let total: u64 = tally.buckets.iter().map(|b| b.count).sum();
        assert_eq!(total, 10);
        assert_eq!(tally.answered, 10);
        assert_eq!(tally.total_respondents, 10);
    }

    #[test]
    fn ward_filter_changes_the_denominator() {
        init();
        let stats = run_survey_stats(
            &priorities(),
            "Survey1",
            "q1",
            &WardSelector::Ward("5".to_string()),
            &rules(5),
        )
        .unwrap();
        assert_eq!(stats.total_respondents, 4);
        let tally = single(stats.analysis.unwrap());
        let summary: Vec<(&str, u64, f64)> = tally
            .buckets
            .iter()
            .map(|b| (b.full_answer.as_str(), b.count, b.percentage))
            .collect();
        assert_eq!(summary, vec![("सडक", 2, 50.0), ("पानी", 2, 50.0)]);
        let ids: Vec<&str> = tally
            .respondents_for("सडक")
            .iter()
            .map(|r| r.id.as_str())
            .collect();
        assert_eq!(ids, vec!["r0", "r1"]);
    }

    #[test]
    fn no_other_bucket_when_few_answers() {
        let coll = priorities();
        let catalog = build_question_catalog(&coll, "Survey1");
        let tally = single(run_question_analysis(&coll, "Survey1", &catalog[0], &rules(6)).unwrap());
        assert_eq!(tally.buckets.len(), 6);
        assert!(tally.buckets.iter().all(|b| !b.is_other));
        assert!(tally.other_answers().is_empty());
    }

    #[test]
    fn ranking_is_descending() {
        let coll = priorities();
        let catalog = build_question_catalog(&coll, "Survey1");
        let tally = single(run_question_analysis(&coll, "Survey1", &catalog[0], &rules(2)).unwrap());
        let named: Vec<u64> = tally
            .buckets
            .iter()
            .filter(|b| !b.is_other)
            .map(|b| b.count)
            .collect();
        assert_eq!(named, vec![3, 3]);
        for o in tally.other_answers() {
            assert!(o.count <= 3);
        }
        assert_eq!(tally.other_answers().len(), 4);
        assert_eq!(tally.buckets[2].count, 4);
        assert_eq!(tally.buckets[2].percentage, 40.0);
    }

    #[test]
    fn blank_answers_are_not_counted() {
        let coll = vec![
            respondent("a", "1", vec![("q1", scalar("  हो "))]),
            respondent("b", "1", vec![("q1", scalar("   "))]),
            respondent("c", "1", vec![("q1", scalar("हो"))]),
            respondent("d", "1", vec![]),
            respondent("e", "1", vec![("q1", scalar("Ho"))]),
            respondent("f", "1", vec![("q1", scalar("ho"))]),
        ];
        let catalog = build_question_catalog(&coll, "Survey1");
        let tally = single(run_question_analysis(&coll, "Survey1", &catalog[0], &rules(7)).unwrap());
        let summary: Vec<(&str, u64, f64)> = tally
            .buckets
            .iter()
            .map(|b| (b.full_answer.as_str(), b.count, b.percentage))
            .collect();
        // Case-sensitive, trimmed; the denominator includes the people who did not answer.
        assert_eq!(
            summary,
            vec![("हो", 2, 33.3), ("Ho", 1, 16.7), ("ho", 1, 16.7)]
        );
        assert_eq!(tally.answered, 4);
        assert_eq!(tally.total_respondents, 6);
    }

    #[test]
    fn multi_part_questions() {
        init();
        let coll = vec![
            respondent(
                "a",
                "1",
                vec![("q2", parts(&[("पहिलो", "सडक"), ("दोस्रो", "पानी")]))],
            ),
            respondent(
                "b",
                "1",
                vec![("q2", parts(&[("पहिलो", "सडक"), ("तेस्रो", "विद्यालय")]))],
            ),
            // Not filled: the form sends an empty scalar.
            respondent("c", "2", vec![("q2", scalar(""))]),
            respondent("d", "2", vec![("q2", parts(&[("दोस्रो", "  ")]))]),
        ];
        let catalog = build_question_catalog(&coll, "Survey1");
        assert_eq!(
            catalog,
            vec![QuestionDescriptor {
                id: "q2".to_string(),
                text: "text of q2".to_string(),
                is_multi_part: true,
                sub_questions: vec![
                    "पहिलो".to_string(),
                    "दोस्रो".to_string(),
                    "तेस्रो".to_string()
                ],
            }]
        );

        let analysis =
            run_question_analysis(&coll, "Survey1", &catalog[0], &AnalysisRules::DEFAULT_RULES)
                .unwrap();
        let tallies = analysis.tallies();
        assert_eq!(tallies.len(), 3);
        assert_eq!(tallies[0].sub_question.as_deref(), Some("पहिलो"));
        assert_eq!(tallies[0].buckets.len(), 1);
        assert_eq!(tallies[0].buckets[0].count, 2);
        assert_eq!(tallies[0].buckets[0].percentage, 50.0);
        assert_eq!(tallies[1].answered, 1);
        assert_eq!(tallies[1].buckets[0].full_answer, "पानी");
        assert_eq!(tallies[2].buckets[0].full_answer, "विद्यालय");
        assert_eq!(tallies[2].buckets[0].percentage, 25.0);
    }

    #[test]
    fn question_first_seen_blank_becomes_multi_part() {
        let coll = vec![
            respondent("a", "1", vec![("q3", scalar(""))]),
            respondent("b", "1", vec![("q3", parts(&[("x", "1")]))]),
            respondent("c", "1", vec![("q3", parts(&[("y", "2"), ("x", "3")]))]),
        ];
        let catalog = build_question_catalog(&coll, "Survey1");
        assert!(catalog[0].is_multi_part);
        assert_eq!(catalog[0].sub_questions, vec!["x".to_string(), "y".to_string()]);
    }

    #[test]
    fn keyed_answer_without_labels_is_scalar() {
        assert_eq!(parts(&[("", "abc")]), scalar(""));
        assert_eq!(parts(&[]), scalar(""));
        let a = parts(&[("", "abc"), ("k", "v")]);
        assert_eq!(a, Answer::MultiPart(vec![("k".to_string(), "v".to_string())]));
    }

    #[test]
    fn mismatched_shapes_are_non_responses() {
        let coll = vec![
            respondent("a", "1", vec![("q1", scalar("हो"))]),
            respondent("b", "1", vec![("q1", parts(&[("k", "हो")]))]),
        ];
        let single_q = QuestionDescriptor {
            id: "q1".to_string(),
            text: "".to_string(),
            is_multi_part: false,
            sub_questions: vec![],
        };
        let tally = single(run_question_analysis(&coll, "Survey1", &single_q, &rules(7)).unwrap());
        assert_eq!(tally.answered, 1);
        assert_eq!(tally.buckets[0].percentage, 50.0);
    }

    #[test]
    fn long_answers_are_truncated() {
        let long = "क".repeat(45);
        let coll = vec![respondent("a", "1", vec![("q1", scalar(&long))])];
        let catalog = build_question_catalog(&coll, "Survey1");
        let tally = single(run_question_analysis(&coll, "Survey1", &catalog[0], &rules(7)).unwrap());
        assert_eq!(tally.buckets[0].answer, format!("{}...", "क".repeat(30)));
        assert_eq!(tally.buckets[0].full_answer, long);
        assert_eq!(tally.respondents_for(&long).len(), 1);
    }

    #[test]
    fn invalid_rules() {
        let coll = priorities();
        let res = run_survey_stats(&coll, "Survey1", "q1", &WardSelector::All, &rules(0));
        assert_eq!(res, Err(AnalyticsErrors::InvalidRules));
    }

    #[test]
    fn unknown_question_is_empty() {
        let coll = priorities();
        let stats =
            run_survey_stats(&coll, "Survey9", "q1", &WardSelector::All, &rules(5)).unwrap();
        assert_eq!(stats.total_respondents, 10);
        assert_eq!(stats.question, None);
        assert_eq!(stats.analysis, None);

        let empty = run_survey_stats(&[], "Survey1", "q1", &WardSelector::All, &rules(5)).unwrap();
        assert_eq!(empty.total_respondents, 0);
        assert!(build_question_catalog(&[], "Survey1").is_empty());
    }

    #[test]
    fn selecting_all_wards_keeps_everything() {
        let coll = priorities();
        assert_eq!(filter_by_ward(&coll, &WardSelector::All), coll);
        assert_eq!(WardSelector::parse(" ALL "), WardSelector::All);
        assert_eq!(WardSelector::parse(""), WardSelector::All);
        assert_eq!(
            WardSelector::parse("5"),
            WardSelector::Ward("5".to_string())
        );
        assert!(filter_by_ward(&coll, &WardSelector::Ward("05".to_string())).is_empty());
    }

    #[test]
    fn wards_are_sorted_numerically() {
        let coll: Vec<Submission> = ["10", "2", "बजार", "९", "2", "", "1", "Ka"]
            .iter()
            .enumerate()
            .map(|(idx, w)| respondent(&idx.to_string(), w, vec![]))
            .collect();
        assert_eq!(
            distinct_wards(&coll),
            vec!["1", "2", "९", "10", "Ka", "बजार"]
        );
    }

    #[test]
    fn padded_wards_are_one_ward() {
        let coll: Vec<Submission> = [" 5", "5", "5 ", " ", "3"]
            .iter()
            .enumerate()
            .map(|(idx, w)| respondent(&idx.to_string(), w, vec![]))
            .collect();
        assert_eq!(distinct_wards(&coll), vec!["3", "5"]);
        let filtered = filter_by_ward(&coll, &WardSelector::parse("5"));
        assert_eq!(filtered.len(), 3);
        assert_eq!(filtered[0].ward_number.as_deref(), Some(" 5"));
    }

    #[test]
    fn profile_defaults_and_stable_ids() {
        let s = Submission {
            name: Some("राम".to_string()),
            phone_number: Some("98000000".to_string()),
            ..Default::default()
        };
        let p = respondent_profile(&s);
        assert_eq!(p.name, "राम");
        assert_eq!(p.age, "");
        assert_eq!(p.ward_number, "");
        assert_eq!(p.id.len(), 16);
        assert_eq!(p.id, respondent_profile(&s.clone()).id);

        let other = Submission {
            name: Some("सीता".to_string()),
            ..s.clone()
        };
        assert_ne!(p.id, respondent_profile(&other).id);

        let with_id = Submission {
            id: Some("65f0".to_string()),
            ..s
        };
        assert_eq!(respondent_profile(&with_id).id, "65f0");
    }

    #[test]
    fn survey_modules_are_listed_once() {
        let mut coll = priorities();
        coll[3].surveys.push(SurveyModuleResponse {
            survey_key: "Survey2".to_string(),
            topic: "स्वास्थ्य".to_string(),
            subject: "Health".to_string(),
            answers: vec![],
        });
        let modules = list_survey_modules(&coll);
        let keys: Vec<&str> = modules.iter().map(|m| m.key.as_str()).collect();
        assert_eq!(keys, vec!["Survey1", "Survey2"]);
        assert_eq!(modules[1].subject, "Health");
    }
}
