//! Numbered chooser for the input dataset.
//!
//! Used when a line-oriented command runs without `-f` or `--demo`: every
//! `*.csv`/`*.json` file below the working directory is listed and the user
//! answers with its number.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use walkdir::{DirEntry, WalkDir};

use crate::error::AppError;

/// Directory levels searched below the working directory.
const MAX_DEPTH: usize = 5;

/// Build and dependency directories never hold input data.
const SKIPPED_DIRS: [&str; 3] = [".git", "target", "node_modules"];

/// List data files under `.` and ask for one on stdin.
pub fn prompt_for_data_path() -> Result<PathBuf, AppError> {
    let files = discover_data_files();
    let stdin = io::stdin();
    choose_file(&files, &mut stdin.lock(), &mut io::stdout())
}

/// `*.csv` and `*.json` files under `.`, sorted by path.
pub fn discover_data_files() -> Vec<PathBuf> {
    data_files_under(Path::new("."))
}

/// Check `path` names an existing `.csv`/`.json` file.
pub fn validate_data_path(path: &Path) -> Result<PathBuf, AppError> {
    match path.metadata() {
        Err(_) => Err(AppError::new(2, format!("Data file not found: {}", path.display()))),
        Ok(meta) if !meta.is_file() => Err(AppError::new(
            2,
            format!("Not a regular file: {}", path.display()),
        )),
        Ok(_) if !is_data_file(path) => Err(AppError::new(
            2,
            format!("Unsupported input {}: use a .csv or .json file.", path.display()),
        )),
        Ok(_) => Ok(path.to_path_buf()),
    }
}

fn data_files_under(root: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(root)
        .max_depth(MAX_DEPTH)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_skipped_dir(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file() && is_data_file(e.path()))
        .map(DirEntry::into_path)
        .collect();
    files.sort();
    files
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_data_file(path: &Path) -> bool {
    matches!(
        path.extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .as_deref(),
        Some("csv" | "json")
    )
}

/// Print the numbered list to `out` and read one answer from `input`.
fn choose_file<R: BufRead, W: Write>(
    files: &[PathBuf],
    input: &mut R,
    out: &mut W,
) -> Result<PathBuf, AppError> {
    if files.is_empty() {
        return Err(AppError::new(
            2,
            "No .csv or .json files here; pass `-f <file>` or `--demo`.",
        ));
    }

    let io_err = |e: io::Error| AppError::new(2, format!("Terminal IO failed: {e}"));
    for (n, path) in files.iter().enumerate() {
        writeln!(out, "{:>3}) {}", n + 1, path.strip_prefix(".").unwrap_or(path).display())
            .map_err(io_err)?;
    }
    write!(out, "Dataset number [1-{}]: ", files.len()).map_err(io_err)?;
    out.flush().map_err(io_err)?;

    let mut answer = String::new();
    input.read_line(&mut answer).map_err(io_err)?;

    let choice = answer
        .trim()
        .parse::<usize>()
        .ok()
        .and_then(|n| n.checked_sub(1))
        .and_then(|i| files.get(i));
    match choice {
        Some(path) => validate_data_path(path),
        None => Err(AppError::new(
            2,
            format!("No dataset numbered '{}'.", answer.trim()),
        )),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::io::Cursor;

    use super::*;

    #[test]
    fn lists_data_files_and_skips_build_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("data")).unwrap();
        fs::create_dir_all(root.join("target")).unwrap();
        fs::write(root.join("data/states.csv"), "name,value\n").unwrap();
        fs::write(root.join("b.JSON"), "[]").unwrap();
        fs::write(root.join("notes.txt"), "").unwrap();
        fs::write(root.join("target/build.json"), "[]").unwrap();

        let names: Vec<String> = data_files_under(root)
            .iter()
            .map(|p| p.strip_prefix(root).unwrap().display().to_string())
            .collect();
        assert_eq!(names, ["b.JSON", "data/states.csv"]);
    }

    #[test]
    fn validate_rejects_dirs_and_other_extensions() {
        let dir = tempfile::tempdir().unwrap();
        let txt = dir.path().join("x.txt");
        fs::write(&txt, "").unwrap();
        let csv = dir.path().join("x.csv");
        fs::write(&csv, "").unwrap();

        assert!(validate_data_path(dir.path()).is_err());
        assert!(validate_data_path(&txt).is_err());
        assert!(validate_data_path(&dir.path().join("missing.csv")).is_err());
        assert_eq!(validate_data_path(&csv).unwrap(), csv);
    }

    #[test]
    fn numbered_answer_selects_file() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.json");
        fs::write(&a, "").unwrap();
        fs::write(&b, "[]").unwrap();
        let files = vec![a, b.clone()];

        let mut out = Vec::new();
        let picked = choose_file(&files, &mut Cursor::new("2\n"), &mut out).unwrap();
        assert_eq!(picked, b);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("  1) "));
        assert!(shown.ends_with("Dataset number [1-2]: "));
    }

    #[test]
    fn bad_answers_and_empty_lists_are_errors() {
        let files = vec![PathBuf::from("a.csv")];
        for answer in ["0\n", "3\n", "q\n", ""] {
            let err = choose_file(&files, &mut Cursor::new(answer), &mut Vec::new()).unwrap_err();
            assert_eq!(err.exit_code(), 2);
        }
        assert!(choose_file(&[], &mut Cursor::new("1\n"), &mut Vec::new()).is_err());
    }
}
