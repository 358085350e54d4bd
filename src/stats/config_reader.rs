use crate::stats::*;

use serde::{Deserialize, Serialize};
use serde_json::Value as JSValue;

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "reportName")]
    pub report_name: String,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "chartKind")]
    pub chart_kind: Option<String>,
}

/// The description of the run, as it appears at the top of the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub report: String,
    pub survey: Option<String>,
    pub question: Option<String>,
    pub ward: String,
    pub respondents: u64,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: String,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct AuxSource {
    #[serde(rename = "filePath")]
    pub file_path: String,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct Selection {
    #[serde(rename = "surveyKey")]
    pub survey_key: Option<String>,
    #[serde(rename = "questionId")]
    pub question_id: Option<String>,
    pub ward: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StatRules {
    #[serde(rename = "topAnswers")]
    _top_answers: Option<JSValue>,
    #[serde(rename = "maxLabelLength")]
    _max_label_length: Option<JSValue>,
}

impl StatRules {
    /// The rules of the analysis. Missing entries take the default values.
    pub fn analysis_rules(&self) -> StatResult<AnalysisRules> {
        let defaults = AnalysisRules::DEFAULT_RULES;
        let res = AnalysisRules {
            top_answers: read_js_int(&self._top_answers, "topAnswers")?
                .unwrap_or(defaults.top_answers),
            max_label_chars: read_js_int(&self._max_label_length, "maxLabelLength")?
                .unwrap_or(defaults.max_label_chars),
        };
        res.validate().context(AnalyticsSnafu {})?;
        Ok(res)
    }
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct StatConfig {
    #[serde(rename = "outputSettings")]
    pub output_settings: OutputSettings,
    #[serde(rename = "dataSources")]
    pub data_sources: Vec<FileSource>,
    #[serde(rename = "usersSource")]
    pub users_source: Option<AuxSource>,
    #[serde(rename = "sessionSource")]
    pub session_source: Option<AuxSource>,
    pub selection: Selection,
    pub rules: Option<StatRules>,
}

/// Everything a run needs, once the configuration file and the command line are merged.
/// Paths are resolved.
#[derive(PartialEq, Debug, Clone)]
pub struct RunSettings {
    pub report: Report,
    pub report_name: String,
    pub sources: Vec<FileSource>,
    pub users_path: Option<String>,
    pub session_path: Option<String>,
    pub survey_key: Option<String>,
    pub question_id: Option<String>,
    pub ward: WardSelector,
    pub rules: AnalysisRules,
    pub chart: Option<ChartKind>,
    pub search: String,
    pub out: Option<String>,
}

pub fn read_config(config_path: &str) -> StatResult<StatConfig> {
    let config_str = fs::read_to_string(config_path).context(OpeningJsonSnafu {
        path: config_path.to_string(),
    })?;
    let config: StatConfig = serde_json::from_str(&config_str).context(ParsingJsonSnafu {
        path: config_path.to_string(),
    })?;
    info!("config: {:?}", config);
    Ok(config)
}

/// Turns a configuration file into settings. File paths are taken relative to the directory of the file.
pub fn settings_from_config(config_path: &str, config: &StatConfig) -> StatResult<RunSettings> {
    let root_p = Path::new(config_path)
        .parent()
        .context(MissingParentDirSnafu {})?;
    let resolve = |p: &str| -> String {
        let full: PathBuf = root_p.join(p);
        full.as_path().display().to_string()
    };

    if config.data_sources.is_empty() {
        whatever!("no data sources detected in {}", config_path);
    }

    let rules = match config.rules.as_ref() {
        Some(r) => r.analysis_rules()?,
        None => AnalysisRules::DEFAULT_RULES,
    };

    let chart = match config.output_settings.chart_kind.as_ref() {
        Some(c) => Some(parse_chart_kind(c)?),
        None => None,
    };

    Ok(RunSettings {
        report: Report::Question,
        report_name: config.output_settings.report_name.clone(),
        sources: config
            .data_sources
            .iter()
            .map(|src| FileSource {
                provider: src.provider.clone(),
                file_path: resolve(&src.file_path),
                worksheet_name: src.worksheet_name.clone(),
            })
            .collect(),
        users_path: config.users_source.as_ref().map(|s| resolve(&s.file_path)),
        session_path: config.session_source.as_ref().map(|s| resolve(&s.file_path)),
        survey_key: config.selection.survey_key.clone(),
        question_id: config.selection.question_id.clone(),
        ward: WardSelector::parse(config.selection.ward.as_deref().unwrap_or("all")),
        rules,
        chart,
        search: String::new(),
        out: config
            .output_settings
            .output_directory
            .as_ref()
            .map(|d| resolve(&format!("{}/summary.json", d))),
    })
}

/// Builds the settings out of the command line. Values given on the command line take precedence
/// over the configuration file.
pub fn settings_from_args(args: &Args) -> StatResult<RunSettings> {
    let mut settings = match args.config.as_ref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            settings_from_config(config_path, &config)?
        }
        None => RunSettings {
            report: Report::Question,
            report_name: "survey".to_string(),
            sources: vec![],
            users_path: None,
            session_path: None,
            survey_key: None,
            question_id: None,
            ward: WardSelector::All,
            rules: AnalysisRules::DEFAULT_RULES,
            chart: None,
            search: String::new(),
            out: None,
        },
    };

    if let Some(input) = args.input.as_ref() {
        settings.sources = vec![FileSource {
            provider: args.input_type.clone().unwrap_or_else(|| "json".to_string()),
            file_path: input.clone(),
            worksheet_name: args.excel_worksheet_name.clone(),
        }];
    } else if let Some(name) = args.excel_worksheet_name.as_ref() {
        for s in settings.sources.iter_mut() {
            s.worksheet_name = Some(name.clone());
        }
    }
    if settings.sources.is_empty() {
        whatever!("no input: provide a configuration file with --config or a data file with --input")
    }

    if let Some(r) = args.report.as_ref() {
        settings.report = Report::parse(r)?;
    }
    if let Some(x) = args.survey.as_ref() {
        settings.survey_key = Some(x.clone());
    }
    if let Some(x) = args.question.as_ref() {
        settings.question_id = Some(x.clone());
    }
    if let Some(x) = args.ward.as_ref() {
        settings.ward = WardSelector::parse(x);
    }
    if let Some(x) = args.top_answers {
        settings.rules.top_answers = x;
    }
    if let Some(x) = args.max_label_length {
        settings.rules.max_label_chars = x;
    }
    settings.rules.validate().context(AnalyticsSnafu {})?;
    if let Some(c) = args.chart.as_ref() {
        settings.chart = Some(parse_chart_kind(c)?);
    }
    if let Some(x) = args.users.as_ref() {
        settings.users_path = Some(x.clone());
    }
    if let Some(x) = args.session.as_ref() {
        settings.session_path = Some(x.clone());
    }
    if let Some(x) = args.search.as_ref() {
        settings.search = x.clone();
    }
    if let Some(x) = args.out.as_ref() {
        settings.out = Some(x.clone());
    }
    debug!("settings_from_args: {:?}", settings);
    Ok(settings)
}

fn parse_chart_kind(s: &str) -> StatResult<ChartKind> {
    match ChartKind::parse(s) {
        Some(c) => Ok(c),
        None => whatever!("unknown chart kind: {}", s),
    }
}

pub fn read_summary(path: &str) -> StatResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu {
        path: path.to_string(),
    })?;
    let js: JSValue = serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {
        path: path.to_string(),
    })?;
    debug!("read_summary: {:?}", js);
    Ok(js)
}

// Numbers may be written as JSON numbers or as strings.
fn read_js_int(x: &Option<JSValue>, field: &str) -> StatResult<Option<usize>> {
    match x {
        None | Some(JSValue::Null) => Ok(None),
        Some(JSValue::Number(n)) => n
            .as_u64()
            .map(|x| Some(x as usize))
            .context(ParsingJsonNumberSnafu { field }),
        Some(JSValue::String(s)) => s
            .trim()
            .parse::<usize>()
            .ok()
            .map(Some)
            .context(ParsingJsonNumberSnafu { field }),
        _ => None.context(ParsingJsonNumberSnafu { field }),
    }
}
