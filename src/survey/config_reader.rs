use crate::args::Args;
use crate::survey::io_common::{infer_input_type, resolve_path};
use crate::survey::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(rename = "className")]
    pub class_name: Option<String>,
    #[serde(rename = "schoolLevel")]
    pub school_level: Option<String>,
    #[serde(rename = "outputDirectory")]
    pub output_directory: Option<String>,
    #[serde(rename = "summaryPath")]
    pub summary_path: Option<String>,
    #[serde(rename = "tablePath")]
    pub table_path: Option<String>,
    #[serde(rename = "reportPath")]
    pub report_path: Option<String>,
    #[serde(rename = "sociogramPath")]
    pub sociogram_path: Option<String>,
}

/// The configuration echoed in the summary.
#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(rename = "className")]
    pub class_name: Option<String>,
    #[serde(rename = "schoolLevel")]
    pub school_level: Option<String>,
    pub sources: Vec<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Serialize, Deserialize)]
pub struct FileSource {
    pub provider: Option<String>,
    #[serde(rename = "filePath")]
    pub file_path: String,
    #[serde(rename = "excelWorksheetName")]
    pub excel_worksheet_name: Option<String>,
    #[serde(rename = "nameColumn")]
    pub name_column: Option<String>,
    #[serde(rename = "choicePrefix")]
    pub choice_prefix: Option<String>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutSettings {
    pub seed: Option<u64>,
    pub iterations: Option<u32>,
}

#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyConfig {
    #[serde(rename = "outputSettings", default)]
    pub output_settings: OutputSettings,
    #[serde(rename = "fileSources", default)]
    pub file_sources: Vec<FileSource>,
    #[serde(default)]
    pub layout: LayoutSettings,
}

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    Xlsx,
    Csv,
}

impl FromStr for InputType {
    type Err = String;

    fn from_str(s: &str) -> Result<InputType, String> {
        match s.trim().to_lowercase().as_str() {
            "xlsx" | "excel" => Ok(InputType::Xlsx),
            "csv" => Ok(InputType::Csv),
            _ => Err(s.to_string()),
        }
    }
}

/// One survey file, with everything needed to read it.
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct InputSource {
    pub path: String,
    pub input_type: InputType,
    pub worksheet: Option<String>,
    pub name_column: String,
    pub choice_prefix: String,
}

impl InputSource {
    pub fn columns(&self) -> TableColumns<'_> {
        TableColumns {
            name_column: &self.name_column,
            choice_prefix: &self.choice_prefix,
        }
    }
}

/// Everything a run needs, after merging the configuration file and the command line.
#[derive(PartialEq, Debug, Clone)]
pub struct SurveyPlan {
    pub class_name: Option<String>,
    pub level: Option<SchoolLevel>,
    pub sources: Vec<InputSource>,
    /// A file path, or "stdout".
    pub summary_path: Option<String>,
    pub reference_path: Option<String>,
    pub table_path: Option<PathBuf>,
    pub report_path: Option<PathBuf>,
    pub sociogram_path: Option<PathBuf>,
    pub layout: LayoutConfig,
}

impl Default for SurveyPlan {
    fn default() -> Self {
        SurveyPlan {
            class_name: None,
            level: None,
            sources: Vec::new(),
            summary_path: None,
            reference_path: None,
            table_path: None,
            report_path: None,
            sociogram_path: None,
            layout: LayoutConfig::DEFAULT_LAYOUT,
        }
    }
}

pub fn read_config(path: &str) -> SurveyResult<SurveyConfig> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    debug!("read_config: content: {:?}", contents);
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

pub fn read_summary(path: &str) -> SurveyResult<JSValue> {
    let contents = fs::read_to_string(path).context(OpeningJsonSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu { path })
}

fn input_type_for(provider: Option<&str>, path: &str) -> SurveyResult<InputType> {
    match provider {
        Some(p) => InputType::from_str(p).map_err(|input_type| SurveyError::UnknownInputType {
            input_type,
            path: path.to_string(),
        }),
        None => infer_input_type(path).context(UnknownInputTypeSnafu {
            input_type: "",
            path,
        }),
    }
}

fn parse_level(level: Option<&str>) -> SurveyResult<Option<SchoolLevel>> {
    match level {
        Some(l) => SchoolLevel::from_str(l).map(Some).context(SurveySnafu),
        None => Ok(None),
    }
}

/// Builds the plan of a run. The options of the command line take precedence over the ones of the
/// configuration file.
pub fn build_plan(args: &Args) -> SurveyResult<SurveyPlan> {
    let (config, root_dir) = match args.config.as_deref() {
        Some(config_path) => {
            let config = read_config(config_path)?;
            info!("config: {:?}", config);
            let root_dir = Path::new(config_path)
                .parent()
                .context(MissingParentDirSnafu { path: config_path })?
                .to_path_buf();
            (config, root_dir)
        }
        None => (SurveyConfig::default(), PathBuf::new()),
    };
    let settings = &config.output_settings;

    let default_columns = TableColumns::DEFAULT_COLUMNS;
    let sources: Vec<InputSource> = if let Some(input) = args.input.as_deref() {
        vec![InputSource {
            path: input.to_string(),
            input_type: input_type_for(args.input_type.as_deref(), input)?,
            worksheet: args.excel_worksheet_name.clone(),
            name_column: default_columns.name_column.to_string(),
            choice_prefix: default_columns.choice_prefix.to_string(),
        }]
    } else {
        let mut res: Vec<InputSource> = Vec::new();
        for fs_cfg in config.file_sources.iter() {
            let path = resolve_path(&root_dir, &fs_cfg.file_path)
                .display()
                .to_string();
            res.push(InputSource {
                input_type: input_type_for(fs_cfg.provider.as_deref(), &path)?,
                path,
                worksheet: fs_cfg.excel_worksheet_name.clone(),
                name_column: fs_cfg
                    .name_column
                    .clone()
                    .unwrap_or_else(|| default_columns.name_column.to_string()),
                choice_prefix: fs_cfg
                    .choice_prefix
                    .clone()
                    .unwrap_or_else(|| default_columns.choice_prefix.to_string()),
            });
        }
        res
    };

    let output_dir: PathBuf = match settings.output_directory.as_deref() {
        Some(d) => resolve_path(&root_dir, d),
        None => root_dir.clone(),
    };
    let from_config = |p: &Option<String>| p.as_deref().map(|s| resolve_path(&output_dir, s));
    let from_args = |p: &Option<String>| p.as_deref().map(PathBuf::from);

    let summary_path = match (args.out.as_deref(), settings.summary_path.as_deref()) {
        (Some(p), _) => Some(p.to_string()),
        (None, Some("stdout")) => Some("stdout".to_string()),
        (None, Some(p)) => Some(resolve_path(&output_dir, p).display().to_string()),
        (None, None) => None,
    };

    let defaults = LayoutConfig::DEFAULT_LAYOUT;
    let layout = LayoutConfig {
        seed: args.seed.or(config.layout.seed).unwrap_or(defaults.seed),
        iterations: config.layout.iterations.unwrap_or(defaults.iterations),
    };

    Ok(SurveyPlan {
        class_name: settings.class_name.clone(),
        level: parse_level(args.level.as_deref().or(settings.school_level.as_deref()))?,
        sources,
        summary_path,
        reference_path: args.reference.clone(),
        table_path: from_args(&args.table).or_else(|| from_config(&settings.table_path)),
        report_path: from_args(&args.report).or_else(|| from_config(&settings.report_path)),
        sociogram_path: from_args(&args.sociogram)
            .or_else(|| from_config(&settings.sociogram_path)),
        layout,
    })
}
