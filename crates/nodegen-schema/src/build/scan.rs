use crate::build::{BuildError, ModelBuilder, NotationParser};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Parse every model file directly inside `dir`.
pub fn scan(
    dir: &Path,
    parser: &impl NotationParser,
    builder: &mut ModelBuilder,
) -> Result<usize, BuildError> {
    let mut parsed = 0;

    for path in sorted_entries(dir)? {
        if accepts(parser, &path) && path.is_file() {
            parse_file(&path, parser, builder)?;
            parsed += 1;
        }
    }

    Ok(parsed)
}

/// Parse every model file under `dir`, descending into subdirectories.
pub fn deep_scan(
    dir: &Path,
    parser: &impl NotationParser,
    builder: &mut ModelBuilder,
) -> Result<usize, BuildError> {
    let mut parsed = 0;

    for path in sorted_entries(dir)? {
        if accepts(parser, &path) && path.is_file() {
            parse_file(&path, parser, builder)?;
            parsed += 1;
        } else if path.is_dir() {
            parsed += deep_scan(&path, parser, builder)?;
        }
    }

    Ok(parsed)
}

fn accepts(parser: &impl NotationParser, path: &Path) -> bool {
    path.file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.trim().ends_with(parser.extension()))
}

fn parse_file(
    path: &Path,
    parser: &impl NotationParser,
    builder: &mut ModelBuilder,
) -> Result<(), BuildError> {
    let source = fs::read_to_string(path).map_err(|source| BuildError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(path = %path.display(), "parsing model file");

    parser.parse(path, &source, builder)
}

// sorted so that population order does not depend on the filesystem
fn sorted_entries(dir: &Path) -> Result<Vec<PathBuf>, BuildError> {
    let io_err = |source| BuildError::Io {
        path: dir.to_path_buf(),
        source,
    };

    let mut entries = fs::read_dir(dir)
        .map_err(io_err)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(io_err)?;
    entries.sort();

    Ok(entries)
}
