use log::{debug, info, warn};

use snafu::{prelude::*, Snafu};
use sociometry::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::survey::config_reader::*;

pub mod config_reader;
mod export;
mod io_common;
mod io_csv;
mod io_xlsx;
mod render;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum SurveyError {
    #[snafu(display("Error opening file {path}"))]
    OpeningExcel {
        source: calamine::XlsxError,
        path: String,
    },
    #[snafu(display("No worksheet found in {path}"))]
    EmptyExcel { path: String },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Error opening CSV file {path}"))]
    CsvOpen { source: csv::Error, path: String },
    #[snafu(display("Error reading line {lineno} of {path}"))]
    CsvLineParse {
        source: csv::Error,
        path: String,
        lineno: usize,
    },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error opening JSON file {path}"))]
    OpeningJson {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON file {path}"))]
    ParsingJson {
        source: serde_json::Error,
        path: String,
    },
    #[snafu(display("Error serializing the summary"))]
    WritingJson { source: serde_json::Error },
    #[snafu(display("Error writing {path}"))]
    WritingOutput {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error drawing the sociogram {path}"))]
    Rendering { source: BoxedError, path: String },
    #[snafu(display("Error writing the document {path}"))]
    Document { source: BoxedError, path: String },
    #[snafu(display("Cannot read {path}: unknown input type {input_type:?} (expected xlsx or csv)"))]
    UnknownInputType { input_type: String, path: String },
    #[snafu(display("The directory of {path} could not be determined"))]
    MissingParentDir { path: String },
    #[snafu(display("Error processing the survey"))]
    Survey { source: SociometryError },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type SurveyResult<T> = Result<T, SurveyError>;

pub(crate) type BoxedError = Box<dyn std::error::Error + Send + Sync>;

fn read_responses(source: &InputSource) -> SurveyResult<Vec<NominationRow>> {
    info!(
        "Attempting to read survey file {:?} ({:?})",
        source.path, source.input_type
    );
    let table = match source.input_type {
        InputType::Xlsx => io_xlsx::read_xlsx_table(&source.path, source.worksheet.as_deref())?,
        InputType::Csv => io_csv::read_csv_table(&source.path)?,
    };
    debug!(
        "read_responses: {:?}: {} columns, {} rows",
        source.path,
        table.header.len(),
        table.rows.len()
    );
    parse_table(&table, &source.columns()).context(SurveySnafu)
}

fn print_questionnaire(level: SchoolLevel) {
    println!("Sociometry questionnaire ({})", level);
    for (idx, question) in level.questions().iter().enumerate() {
        println!("{}. {}", idx + 1, question);
    }
    println!();
}

fn build_summary_js(plan: &SurveyPlan, agg: &Aggregation) -> JSValue {
    let c = OutputConfig {
        class_name: plan.class_name.clone(),
        school_level: plan.level.map(|l| l.code().to_string()),
        sources: plan
            .sources
            .iter()
            .map(|s| io_common::simplify_file_name(&s.path))
            .collect(),
    };
    let results: Vec<JSValue> = agg
        .roster
        .iter()
        .enumerate()
        .map(|(idx, e)| {
            json!({
                "rank": idx + 1,
                "name": e.name,
                "score": e.score,
                "category": e.category.label(),
                "color": e.category.color().name,
            })
        })
        .collect();
    let edges: Vec<JSValue> = agg.edges.iter().map(|e| json!([e.from, e.to])).collect();
    let unmatched: Vec<JSValue> = agg
        .unmatched
        .iter()
        .map(|u| json!({"respondent": u.respondent, "slot": u.slot, "value": u.value}))
        .collect();
    json!({
        "config": c,
        "results": results,
        "edges": edges,
        "unmatched": unmatched,
    })
}

fn write_text(path: &Path, contents: &str) -> SurveyResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    fs::write(path, contents).context(WritingOutputSnafu {
        path: path.display().to_string(),
    })
}

fn check_reference(reference_path: &str, pretty_js_stats: &str) -> SurveyResult<()> {
    let summary_ref = read_summary(reference_path)?;
    debug!("check_reference: reference summary: {:?}", summary_ref);
    let pretty_js_summary_ref =
        serde_json::to_string_pretty(&summary_ref).context(WritingJsonSnafu)?;
    if pretty_js_summary_ref != pretty_js_stats {
        warn!("Found differences with the reference summary {}", reference_path);
        print_diff(pretty_js_summary_ref.as_str(), pretty_js_stats, "\n");
        whatever!("Difference detected between calculated summary and reference summary")
    }
    info!("check_reference: summary matches {}", reference_path);
    Ok(())
}

fn output_path(p: &Option<PathBuf>) -> Option<(&Path, String)> {
    p.as_ref().map(|p| (p.as_path(), p.display().to_string()))
}

pub fn run_survey(plan: &SurveyPlan) -> SurveyResult<()> {
    info!("plan: {:?}", plan);

    if let Some(level) = plan.level {
        print_questionnaire(level);
    }

    if plan.sources.is_empty() {
        if plan.level.is_some() {
            return Ok(());
        }
        whatever!("No survey file provided: use --input or a configuration with fileSources")
    }

    let mut rows: Vec<NominationRow> = Vec::new();
    for source in plan.sources.iter() {
        let mut file_rows = read_responses(source)?;
        rows.append(&mut file_rows);
    }

    let agg = aggregate(&rows);
    info!(
        "run_survey: {} students, {} nominations, {} unmatched",
        agg.roster.len(),
        agg.edges.len(),
        agg.unmatched.len()
    );

    print!("{}", export::format_roster(&agg.roster));
    if !agg.unmatched.is_empty() {
        println!();
        println!(
            "{} nomination(s) did not match any student and were ignored:",
            agg.unmatched.len()
        );
        for u in agg.unmatched.iter() {
            println!("- {} (Pilihan {}): {:?}", u.respondent, u.slot, u.value);
        }
    }

    if let Some((path, display)) = output_path(&plan.table_path) {
        export::save_table_csv(path, &agg.roster)?;
        info!("Wrote table to {}", display);
    }

    if let Some((path, display)) = output_path(&plan.report_path) {
        let class_name = plan.class_name.as_deref();
        if io_common::has_extension(path, "docx") {
            export::save_document(path, &agg.roster, class_name, plan.level)?;
        } else {
            let report = export::build_report(&agg.roster, class_name, plan.level);
            write_text(path, &report)?;
        }
        info!("Wrote report to {}", display);
    }

    if let Some((path, display)) = output_path(&plan.sociogram_path) {
        let graph = layout::build(&agg.edges, &agg.roster, &plan.layout);
        render::save_sociogram(path, &graph)?;
        info!("Wrote sociogram to {}", display);
    }

    let result_js = build_summary_js(plan, &agg);
    let pretty_js_stats = serde_json::to_string_pretty(&result_js).context(WritingJsonSnafu)?;
    match plan.summary_path.as_deref() {
        Some("stdout") => {
            println!("{}", pretty_js_stats);
        }
        Some(p) => {
            write_text(Path::new(p), &pretty_js_stats)?;
            info!("Wrote summary to {}", p);
        }
        None => {
            debug!("run_survey: no summary output requested");
        }
    }

    // The reference summary, if provided for comparison
    if let Some(reference_path) = plan.reference_path.as_deref() {
        check_reference(reference_path, &pretty_js_stats)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use snafu::ErrorCompat;

    fn temp_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("sosiogram-{}-{}", name, std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn csv_plan(dir: &Path) -> SurveyPlan {
        let input = dir.join("jawaban.csv");
        fs::write(
            &input,
            "Nama Siswa,Pilihan 1,Pilihan 2\nAlice,Bob,Zorro\nBob,Carol,\nCarol,,\n",
        )
        .unwrap();
        SurveyPlan {
            class_name: Some("5A".to_string()),
            level: Some(SchoolLevel::Sd),
            sources: vec![InputSource {
                path: input.display().to_string(),
                input_type: InputType::Csv,
                worksheet: None,
                name_column: "Nama Siswa".to_string(),
                choice_prefix: "Pilihan".to_string(),
            }],
            summary_path: Some(dir.join("summary.json").display().to_string()),
            reference_path: None,
            table_path: Some(dir.join("out").join("hasil.csv")),
            report_path: Some(dir.join("hasil.md")),
            sociogram_path: Some(dir.join("sosiogram.png")),
            layout: LayoutConfig::DEFAULT_LAYOUT,
        }
    }

    #[test]
    fn summary_json() {
        let dir = temp_dir("summary");
        let plan = csv_plan(&dir);
        let rows = read_responses(&plan.sources[0]).unwrap();
        let js = build_summary_js(&plan, &aggregate(&rows));
        assert_eq!(js["config"]["className"], json!("5A"));
        assert_eq!(js["config"]["schoolLevel"], json!("SD"));
        assert_eq!(js["config"]["sources"], json!(["jawaban.csv"]));
        assert_eq!(
            js["results"][2],
            json!({"rank": 3, "name": "Alice", "score": 0, "category": "Isolated", "color": "red"})
        );
        assert_eq!(js["edges"], json!([["Alice", "Bob"], ["Bob", "Carol"]]));
        assert_eq!(
            js["unmatched"],
            json!([{"respondent": "Alice", "slot": 2, "value": "Zorro"}])
        );
    }

    #[test]
    fn end_to_end_with_reference() {
        let dir = temp_dir("e2e");
        let plan = csv_plan(&dir);
        run_survey(&plan).unwrap();

        let table = fs::read_to_string(dir.join("out").join("hasil.csv")).unwrap();
        assert!(table.starts_with("Nama,Skor Popularitas,Interpretasi\n"));
        let report = fs::read_to_string(dir.join("hasil.md")).unwrap();
        assert!(report.contains("| Alice | 0 | Isolated - Needs special attention |"));
        let image = fs::metadata(dir.join("sosiogram.png")).unwrap();
        assert!(image.len() > 0);

        // The summary that was just written is its own reference.
        let checked = SurveyPlan {
            reference_path: plan.summary_path.clone(),
            summary_path: None,
            table_path: None,
            report_path: None,
            sociogram_path: None,
            ..plan
        };
        run_survey(&checked).unwrap();
    }

    #[test]
    fn word_report() {
        let dir = temp_dir("docx");
        let path = dir.join("hasil_sosiometri.docx");
        let plan = SurveyPlan {
            summary_path: None,
            table_path: None,
            report_path: Some(path.clone()),
            sociogram_path: None,
            ..csv_plan(&dir)
        };
        run_survey(&plan).unwrap();
        let doc = docx_rs::read_docx(&fs::read(&path).unwrap()).unwrap();
        let js = serde_json::to_string(&doc).unwrap();
        assert!(js.contains("Hasil Sosiometri dan Interpretasi"));
        assert!(js.contains("Kelas: 5A"));
        assert!(js.contains("Isolated - Needs special attention"));
    }

    #[test]
    fn survey_error_chain() {
        let err = SurveyError::Survey {
            source: SociometryError::MalformedInput {
                missing_column: "Nama Siswa".to_string(),
            },
        };
        let messages: Vec<String> = err.iter_chain().map(|e| e.to_string()).collect();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], "Error processing the survey");
        assert_ne!(messages[0], messages[1]);
    }

    #[test]
    fn reference_mismatch_fails() {
        let dir = temp_dir("mismatch");
        let reference = dir.join("reference.json");
        fs::write(&reference, "{\"results\": []}").unwrap();
        let plan = SurveyPlan {
            reference_path: Some(reference.display().to_string()),
            summary_path: None,
            table_path: None,
            report_path: None,
            sociogram_path: None,
            ..csv_plan(&dir)
        };
        let err = run_survey(&plan).unwrap_err();
        assert!(matches!(err, SurveyError::Whatever { .. }));
    }

    #[test]
    fn missing_name_column_is_reported() {
        let dir = temp_dir("malformed");
        let input = dir.join("bad.csv");
        fs::write(&input, "Nama,Pilihan 1\nAlice,Bob\n").unwrap();
        let plan = SurveyPlan {
            sources: vec![InputSource {
                path: input.display().to_string(),
                input_type: InputType::Csv,
                worksheet: None,
                name_column: "Nama Siswa".to_string(),
                choice_prefix: "Pilihan".to_string(),
            }],
            summary_path: None,
            table_path: None,
            report_path: None,
            sociogram_path: None,
            ..csv_plan(&dir)
        };
        let err = run_survey(&plan).unwrap_err();
        assert!(matches!(
            err,
            SurveyError::Survey {
                source: SociometryError::MalformedInput { .. }
            }
        ));
    }

    #[test]
    fn questionnaire_only() {
        let plan = SurveyPlan {
            level: Some(SchoolLevel::Sma),
            ..SurveyPlan::default()
        };
        run_survey(&plan).unwrap();
        assert!(run_survey(&SurveyPlan::default()).is_err());
    }
}
