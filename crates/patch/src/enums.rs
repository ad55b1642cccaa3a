//! Public access to the wire value of generated enums.

use anyhow::Result;
use camino::Utf8PathBuf;
use fs_err as fs;
use tracing::debug;

use crate::layout::{java_files, GeneratedLayout};
use crate::rewrite::{join_lines, rewrite};

const BACKING_FIELDS: [&str; 2] = ["  private String name;", "  protected String name;"];
const PUBLIC_FIELD: &str = "  public final String value;";
const OLD_ASSIGNMENT: &str = "    this.name = name;";
const NEW_ASSIGNMENT: &str = "    this.value = name;";
const GETTER: [&str; 3] = [
    "  public String getValue() {",
    "    return this.value;",
    "  }",
];

pub fn run(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut changed = Vec::new();
    for file in java_files(&layout.model_dir())? {
        let source = fs::read_to_string(&file)?;
        if !is_enum(&source) {
            continue;
        }
        if rewrite(&file, |input| Ok(patch_enum(input)))? {
            changed.push(file);
        }
    }
    debug!(count = changed.len(), "patched enum files");
    Ok(changed)
}

pub fn is_enum(source: &str) -> bool {
    source.lines().any(|line| line.starts_with("public enum"))
}

pub fn patch_enum(source: &str) -> String {
    let mut out: Vec<&str> = Vec::new();
    let mut in_enum = false;
    for line in source.lines() {
        if !in_enum {
            in_enum = line.starts_with("public enum");
            out.push(line);
            continue;
        }
        if BACKING_FIELDS.contains(&line) {
            out.push(PUBLIC_FIELD);
            out.push("");
            out.extend(GETTER);
        } else if line == OLD_ASSIGNMENT {
            out.push(NEW_ASSIGNMENT);
        } else {
            out.push(line);
        }
    }
    join_lines(&out)
}
