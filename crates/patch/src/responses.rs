//! Opens up the generated response wrappers so handlers can build them
//! directly.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use anyhow::Result;
use camino::Utf8PathBuf;
use regex::Regex;

use crate::layout::{java_files, GeneratedLayout};
use crate::rewrite::{join_lines, rewrite_files};

const RESPONSE_DELEGATE_FILE: &str = "ResponseDelegate.java";

fn response_class_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^( +)class (\w+) extends ResponseDelegate \{$")
            .expect("invalid response class regex")
    })
}

pub fn run_response_delegate(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let files = java_files(&layout.support_dir())?
        .into_iter()
        .filter(|f| f.file_name() == Some(RESPONSE_DELEGATE_FILE));
    rewrite_files(files, patch_response_delegate)
}

pub fn run_response_types(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    rewrite_files(java_files(&layout.resources_dir())?, patch_response_types)
}

/// Replaces the leading `private`/`protected` modifier of a member line.
fn widen(line: &str) -> Option<String> {
    let indent = line.len() - line.trim_start().len();
    let body = &line[indent..];
    ["private ", "protected "].iter().find_map(|modifier| {
        body.strip_prefix(modifier)
            .map(|rest| format!("{}public {rest}", &line[..indent]))
    })
}

/// Widens the delegate's fields and constructors to `public`, up to its
/// first overridden method.
pub fn patch_response_delegate(source: &str) -> String {
    let mut out = Vec::new();
    let mut in_class = false;
    let mut done = false;
    for line in source.lines() {
        if done {
            out.push(line.to_string());
            continue;
        }
        if !in_class {
            in_class = line.starts_with("public class");
            out.push(line.to_string());
            continue;
        }
        if line.contains("@Override") {
            done = true;
            out.push(line.to_string());
            continue;
        }
        out.push(widen(line).unwrap_or_else(|| line.to_string()));
    }
    join_lines(&out)
}

fn copy_constructor(indent: &str, class_name: &str) -> [String; 3] {
    [
        format!("{indent}  public {class_name}(ResponseDelegate response) {{"),
        format!("{indent}    super(response.delegate, response.entity);"),
        format!("{indent}  }}"),
    ]
}

/// Response subclasses that already declare the copy constructor.
fn classes_with_copy_constructor(source: &str) -> BTreeSet<String> {
    let mut found = BTreeSet::new();
    let mut current: Option<(String, String)> = None;
    for line in source.lines() {
        if let Some(caps) = response_class_pattern().captures(line) {
            current = Some((caps[1].to_string(), caps[2].to_string()));
            continue;
        }
        if let Some((indent, name)) = &current {
            if line == copy_constructor(indent, name)[0] {
                found.insert(name.clone());
            }
        }
    }
    found
}

struct ResponseClass {
    indent: String,
    name: String,
}

/// Makes each response subclass constructible from outside the resource:
/// private constructors become public and a `(ResponseDelegate)` copy
/// constructor is added ahead of the first public member.
pub fn patch_response_types(source: &str) -> String {
    let existing = classes_with_copy_constructor(source);
    let mut out: Vec<String> = Vec::new();
    let mut current: Option<ResponseClass> = None;

    for line in source.lines() {
        if current.is_none() {
            if let Some(caps) = response_class_pattern().captures(line) {
                current = Some(ResponseClass {
                    indent: caps[1].to_string(),
                    name: caps[2].to_string(),
                });
            }
            out.push(line.to_string());
            continue;
        }
        let Some(class) = &current else {
            continue;
        };

        let member = line.trim_start();
        let constructor_prefix = format!("{}(", class.name);
        let is_constructor = |rest: &str| rest.starts_with(&constructor_prefix);

        if let Some(rest) = member
            .strip_prefix("private ")
            .or_else(|| member.strip_prefix("protected "))
        {
            if is_constructor(rest) {
                if let Some(widened) = widen(line) {
                    out.push(widened);
                    continue;
                }
            }
        }

        let closes_class = line == format!("{}}}", class.indent);
        let first_public = member.starts_with("public ")
            && !is_constructor(member.trim_start_matches("public "));
        if closes_class || first_public {
            if !existing.contains(&class.name) {
                out.extend(copy_constructor(&class.indent, &class.name));
                out.push(String::new());
            }
            current = None;
        }
        out.push(line.to_string());
    }
    join_lines(&out)
}
