//! Locating the existing mock of an interface.

use std::{
    fs,
    path::{Path, PathBuf},
};

use mockgen_core::{Error, Result, contains_word};

/// How deep below the mock directory files are searched.
const MAX_DEPTH: usize = 8;

/// The single `.go` file under `dir` that mentions `qualified` as a whole
/// word, with its content.
pub fn find_mock(dir: &Path, qualified: &str) -> Result<(PathBuf, String)> {
    let not_found = || {
        Box::new(Error::MockNotFound {
            qualified: qualified.to_string(),
            dir: dir.to_path_buf(),
        })
    };
    if !dir.is_dir() {
        return Err(not_found());
    }

    let mut files = Vec::new();
    collect_go_files(dir, 0, &mut files)?;
    files.sort();

    let mut matches = Vec::new();
    for file in files {
        let content = fs::read_to_string(&file).map_err(|e| Error::io("read", &file, e))?;
        if contains_word(&content, qualified) {
            tracing::debug!(path = %file.display(), "found mock candidate");
            matches.push((file, content));
        }
    }

    match matches.len() {
        0 => Err(not_found()),
        1 => Ok(matches.remove(0)),
        _ => Err(Box::new(Error::AmbiguousMock {
            qualified: qualified.to_string(),
            dir: dir.to_path_buf(),
            candidates: matches.into_iter().map(|(path, _)| path).collect(),
        })),
    }
}

fn collect_go_files(dir: &Path, depth: usize, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| Error::io("read", dir, e))?;
    for entry in entries {
        let entry = entry.map_err(|e| Error::io("read", dir, e))?;
        let path = entry.path();
        let file_type = entry.file_type().map_err(|e| Error::io("read", &path, e))?;
        if file_type.is_dir() {
            if depth < MAX_DEPTH {
                collect_go_files(&path, depth + 1, out)?;
            }
        } else if path.extension().is_some_and(|ext| ext == "go") {
            out.push(path);
        }
    }
    Ok(())
}
