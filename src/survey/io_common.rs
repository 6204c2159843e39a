use std::path::{Path, PathBuf};

use crate::survey::config_reader::InputType;

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}

/// Relative paths are taken relative to `root`.
pub fn resolve_path(root: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        root.join(p)
    }
}

/// Case-insensitive check of the extension of a path.
pub fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(extension))
        .unwrap_or(false)
}

pub fn infer_input_type(path: &str) -> Option<InputType> {
    let extension = Path::new(path).extension()?.to_str()?.to_lowercase();
    match extension.as_str() {
        "xlsx" | "xlsm" => Some(InputType::Xlsx),
        "csv" | "txt" => Some(InputType::Csv),
        _ => None,
    }
}

/// The text of a cell, or `None` for an empty cell.
pub fn normalize_cell(s: &str) -> Option<String> {
    // Spreadsheet exports sometimes start with a byte order mark.
    let trimmed = s.trim_start_matches('\u{feff}').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
