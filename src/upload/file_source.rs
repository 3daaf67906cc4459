use crate::upload::types::FileHandle;
use ignore::Walk;
use std::path::{Path, PathBuf};

const IGNORED_FILES: [&str; 3] = [".DS_Store", "Thumbs.db", "desktop.ini"];

pub fn collect_files(paths: &[PathBuf]) -> Vec<FileHandle> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_dir() {
            for entry in Walk::new(path) {
                match entry {
                    Ok(entry) if entry.path().is_file() => push_file(entry.path(), &mut files),
                    Ok(_) => {}
                    Err(e) => tracing::warn!("skipping entry under {}: {}", path.display(), e),
                }
            }
        } else {
            push_file(path, &mut files);
        }
    }

    files
}

fn push_file(path: &Path, files: &mut Vec<FileHandle>) {
    if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
        if IGNORED_FILES.contains(&name) {
            return;
        }
    }

    match FileHandle::from_path(path) {
        Ok(handle) => files.push(handle),
        Err(e) => tracing::warn!("cannot add {}: {}", path.display(), e),
    }
}
