// Tabular outputs of a survey: CSV table, Word and Markdown reports, console listing.

use std::fmt::Write as FmtWrite;
use std::io::{Seek, Write};

use docx_rs::{Docx, Paragraph, Run, Style, StyleType, Table, TableCell, TableRow};

use crate::survey::*;

const REPORT_TITLE: &str = "Hasil Sosiometri dan Interpretasi";

pub const TABLE_HEADER: [&str; 3] = ["Nama", "Skor Popularitas", "Interpretasi"];

pub fn write_table_csv<W: Write>(
    wtr: &mut csv::Writer<W>,
    roster: &[RosterEntry],
) -> Result<(), csv::Error> {
    wtr.write_record(TABLE_HEADER)?;
    for e in roster.iter() {
        wtr.write_record([
            e.name.as_str(),
            e.score.to_string().as_str(),
            e.category.interpretation().as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn save_table_csv(path: &Path, roster: &[RosterEntry]) -> SurveyResult<()> {
    let display = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    let mut wtr = csv::Writer::from_path(path).context(CsvWriteSnafu { path: &display })?;
    write_table_csv(&mut wtr, roster).context(CsvWriteSnafu { path: &display })?;
    debug!("save_table_csv: {} rows written to {}", roster.len(), display);
    Ok(())
}

fn escape_cell(s: &str) -> String {
    s.replace('|', "\\|")
}

/// The results as a Markdown document.
pub fn build_report(
    roster: &[RosterEntry],
    class_name: Option<&str>,
    level: Option<SchoolLevel>,
) -> String {
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = writeln!(out, "# {}", REPORT_TITLE);
    let _ = writeln!(out);
    if let Some(name) = class_name {
        let _ = writeln!(out, "**Kelas:** {}", escape_cell(name));
    }
    if let Some(level) = level {
        let _ = writeln!(out, "**Jenjang:** {}", level.code());
    }
    if class_name.is_some() || level.is_some() {
        let _ = writeln!(out);
    }
    let _ = writeln!(out, "| {} | {} | {} |", TABLE_HEADER[0], TABLE_HEADER[1], TABLE_HEADER[2]);
    let _ = writeln!(out, "|---|---:|---|");
    for e in roster.iter() {
        let _ = writeln!(
            out,
            "| {} | {} | {} |",
            escape_cell(&e.name),
            e.score,
            e.category.interpretation()
        );
    }
    if let Some(level) = level {
        let _ = writeln!(out);
        let _ = writeln!(out, "## Pertanyaan");
        let _ = writeln!(out);
        for (idx, q) in level.questions().iter().enumerate() {
            let _ = writeln!(out, "{}. {}", idx + 1, q);
        }
    }
    out
}

fn text_cell(text: &str, bold: bool) -> TableCell {
    let run = Run::new().add_text(text);
    let run = if bold { run.bold() } else { run };
    TableCell::new().add_paragraph(Paragraph::new().add_run(run))
}

fn text_paragraph(text: &str) -> Paragraph {
    Paragraph::new().add_run(Run::new().add_text(text))
}

/// The results as a Word document: a heading and the three-column table.
pub fn build_document(
    roster: &[RosterEntry],
    class_name: Option<&str>,
    level: Option<SchoolLevel>,
) -> Docx {
    let heading_style = Style::new("Heading1", StyleType::Paragraph)
        .name("Heading 1")
        .size(32)
        .bold();
    let mut doc = Docx::new().add_style(heading_style).add_paragraph(
        Paragraph::new()
            .add_run(Run::new().add_text(REPORT_TITLE))
            .style("Heading1"),
    );
    if let Some(name) = class_name {
        doc = doc.add_paragraph(text_paragraph(&format!("Kelas: {}", name)));
    }
    if let Some(level) = level {
        doc = doc.add_paragraph(text_paragraph(&format!("Jenjang: {}", level.code())));
    }

    let mut rows = vec![TableRow::new(
        TABLE_HEADER.iter().map(|h| text_cell(h, true)).collect(),
    )];
    for e in roster.iter() {
        rows.push(TableRow::new(vec![
            text_cell(&e.name, false),
            text_cell(&e.score.to_string(), false),
            text_cell(&e.category.interpretation(), false),
        ]));
    }
    doc.add_table(Table::new(rows))
}

pub fn write_document<W: Write + Seek>(
    wtr: W,
    roster: &[RosterEntry],
    class_name: Option<&str>,
    level: Option<SchoolLevel>,
) -> Result<(), BoxedError> {
    build_document(roster, class_name, level)
        .build()
        .pack(wtr)
        .map_err(|e| Box::new(e) as BoxedError)
}

pub fn save_document(
    path: &Path,
    roster: &[RosterEntry],
    class_name: Option<&str>,
    level: Option<SchoolLevel>,
) -> SurveyResult<()> {
    let display = path.display().to_string();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).context(WritingOutputSnafu {
                path: parent.display().to_string(),
            })?;
        }
    }
    let file = fs::File::create(path).context(WritingOutputSnafu { path: &display })?;
    write_document(file, roster, class_name, level).context(DocumentSnafu { path: &display })?;
    debug!("save_document: {} rows written to {}", roster.len(), display);
    Ok(())
}

/// One line per student, for the console.
pub fn format_roster(roster: &[RosterEntry]) -> String {
    let width = roster.iter().map(|e| e.name.chars().count()).max().unwrap_or(0);
    let mut out = String::new();
    for (idx, e) in roster.iter().enumerate() {
        let _ = writeln!(
            out,
            "{:>3}. {:<width$} {:>3}  {}",
            idx + 1,
            e.name,
            e.score,
            e.category.interpretation(),
            width = width
        );
    }
    out
}
