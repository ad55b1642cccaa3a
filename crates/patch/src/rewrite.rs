//! Whole-file rewrites that never leave a half-written source behind.
//!
//! Every transform runs against the full file contents in memory. The result
//! goes to a temporary sibling which only replaces the original after it has
//! been completely written and synced. When the transform fails the temporary
//! file is dropped (and removed) and the original stays byte-for-byte intact.

use std::io::Write;

use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;

/// Rewrites `path` with the output of `transform`.
///
/// Returns `false` without touching the file when the transform produced the
/// same contents it was given.
pub fn rewrite<F>(path: &Utf8Path, transform: F) -> Result<bool>
where
    F: FnOnce(&str) -> Result<String>,
{
    let input = fs::read_to_string(path)?;
    let output = transform(&input).with_context(|| format!("patching {path}"))?;
    if output == input {
        return Ok(false);
    }
    write_atomic(path, &output)?;
    Ok(true)
}

/// Applies an infallible line transform to each file, returning the ones that
/// changed.
pub fn rewrite_files<I, F>(files: I, transform: F) -> Result<Vec<Utf8PathBuf>>
where
    I: IntoIterator<Item = Utf8PathBuf>,
    F: Fn(&str) -> String,
{
    let mut changed = Vec::new();
    for file in files {
        if rewrite(&file, |input| Ok(transform(input)))? {
            changed.push(file);
        }
    }
    Ok(changed)
}

/// Writes `contents` to `path` through a temporary file in the same directory.
pub fn write_atomic(path: &Utf8Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };
    let mut tmp = tempfile::Builder::new()
        .prefix(".forge-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .with_context(|| format!("creating temporary file in {dir}"))?;
    tmp.write_all(contents.as_bytes())
        .with_context(|| format!("writing temporary file for {path}"))?;
    tmp.as_file()
        .sync_all()
        .with_context(|| format!("syncing temporary file for {path}"))?;
    if path.exists() {
        let permissions = fs::metadata(path)?.permissions();
        fs::set_permissions(tmp.path(), permissions)?;
    }
    tmp.persist(path)
        .map_err(|err| err.error)
        .with_context(|| format!("replacing {path}"))?;
    Ok(())
}

/// Joins lines back into file contents with a trailing newline.
pub fn join_lines<S: AsRef<str>>(lines: &[S]) -> String {
    let mut out = String::with_capacity(lines.iter().map(|l| l.as_ref().len() + 1).sum());
    for line in lines {
        out.push_str(line.as_ref());
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn fixture(dir: &TempDir, name: &str, contents: &str) -> Utf8PathBuf {
        let path = Utf8PathBuf::from_path_buf(dir.path().join(name)).unwrap();
        std::fs::write(&path, contents).unwrap();
        path
    }

    fn entries(dir: &TempDir) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn replaces_contents_with_transform_output() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "Foo.java", "class Foo {}\n");

        let changed = rewrite(&path, |input| Ok(input.replace("Foo", "Bar"))).unwrap();

        assert!(changed);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "class Bar {}\n");
        assert_eq!(entries(&dir), vec!["Foo.java"]);
    }

    #[test]
    fn failing_transform_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let original = "public interface Foo {\n}\r\n";
        let path = fixture(&dir, "Foo.java", original);

        let result = rewrite(&path, |_| anyhow::bail!("transform blew up"));

        assert!(result.is_err());
        assert_eq!(std::fs::read(&path).unwrap(), original.as_bytes());
        assert_eq!(entries(&dir), vec!["Foo.java"]);
    }

    #[test]
    fn unchanged_output_is_not_written() {
        let dir = TempDir::new().unwrap();
        let path = fixture(&dir, "Foo.java", "a\nb\n");

        let changed = rewrite(&path, |input| Ok(input.to_string())).unwrap();

        assert!(!changed);
    }

    #[test]
    fn join_lines_terminates_every_line() {
        assert_eq!(join_lines(&["a", "b"]), "a\nb\n");
        assert_eq!(join_lines::<&str>(&[]), "");
    }
}
