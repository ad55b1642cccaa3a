//! Token substitutions over whole generated sources.

use std::sync::OnceLock;

use anyhow::Result;
use camino::Utf8PathBuf;
use fs_err as fs;
use regex::Regex;

use crate::layout::{java_files, GeneratedLayout};
use crate::rewrite::{join_lines, rewrite_files};

const PRIMITIVES: [(&str, &str); 8] = [
    ("boolean", "Boolean"),
    ("byte", "Byte"),
    ("char", "Character"),
    ("double", "Double"),
    ("float", "Float"),
    ("int", "Integer"),
    ("long", "Long"),
    ("short", "Short"),
];

const DATE_IMPORT: &str = "import java.util.Date;";
const OFFSET_DATE_TIME_IMPORT: &str = "import java.time.OffsetDateTime;";
const FILE_IMPORT: &str = "import java.io.File;";
const STREAMING_OUTPUT_IMPORT: &str = "import jakarta.ws.rs.core.StreamingOutput;";

fn primitive_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        PRIMITIVES
            .iter()
            .map(|(primitive, boxed)| {
                let re = Regex::new(&format!(r"\b{primitive}\b")).expect("invalid primitive regex");
                (re, *boxed)
            })
            .collect()
    })
}

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"([( .<,])Date([ ;>),])").expect("invalid date regex"))
}

fn file_response_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^ +public static (\w+) respond(\d+)With(\w+)\(File entity,$")
            .expect("invalid file response regex")
    })
}

fn model_and_resource_files(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut files = java_files(&layout.model_dir())?;
    files.extend(java_files(&layout.resources_dir())?);
    Ok(files)
}

pub fn run_boxed_types(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    rewrite_files(model_and_resource_files(layout)?, box_primitives)
}

pub fn run_dates(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let files = model_and_resource_files(layout)?
        .into_iter()
        .filter(|f| !f.as_str().ends_with("Deserializer.java"));
    rewrite_files(files, patch_dates)
}

pub fn run_jakarta_imports(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut files = java_files(&layout.resources_dir())?;
    files.extend(java_files(&layout.support_dir())?);
    rewrite_files(files, patch_jakarta_imports)
}

pub fn run_file_responses(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut candidates = Vec::new();
    for file in java_files(&layout.resources_dir())? {
        if imports_file(&fs::read_to_string(&file)?) {
            candidates.push(file);
        }
    }
    rewrite_files(candidates, patch_file_responses)
}

/// Replaces every primitive keyword with its boxed class.
pub fn box_primitives(source: &str) -> String {
    let lines: Vec<String> = source
        .lines()
        .map(|line| {
            primitive_patterns()
                .iter()
                .fold(line.to_string(), |acc, (re, boxed)| {
                    re.replace_all(&acc, *boxed).into_owned()
                })
        })
        .collect();
    join_lines(&lines)
}

/// Moves `java.util.Date` usages over to `java.time.OffsetDateTime` and drops
/// the pattern based `@JsonFormat` annotations that only applied to `Date`.
pub fn patch_dates(source: &str) -> String {
    let mut out = Vec::new();
    for line in source.lines() {
        if line == DATE_IMPORT {
            out.push(OFFSET_DATE_TIME_IMPORT.to_string());
            continue;
        }
        let trimmed = line.trim_start();
        if trimmed.starts_with("@JsonFormat(") && trimmed.contains("pattern") {
            continue;
        }
        out.push(replace_dates(line));
    }
    join_lines(&out)
}

/// A match consumes the delimiter after `Date`, so `<Date,Date>` needs a
/// second round before the line settles.
fn replace_dates(line: &str) -> String {
    let mut current = line.to_string();
    loop {
        let next = date_pattern()
            .replace_all(&current, "${1}OffsetDateTime${2}")
            .into_owned();
        if next == current {
            return current;
        }
        current = next;
    }
}

/// `javax.ws` -> `jakarta.ws`, on import lines only.
pub fn patch_jakarta_imports(source: &str) -> String {
    let lines: Vec<String> = source
        .lines()
        .map(|line| {
            if line.starts_with("import") {
                line.replace("javax.ws", "jakarta.ws")
            } else {
                line.to_string()
            }
        })
        .collect();
    join_lines(&lines)
}

/// Whether `java.io.File` is imported ahead of the type declaration.
pub fn imports_file(source: &str) -> bool {
    for line in source.lines() {
        if line.starts_with("public ") {
            return false;
        }
        if line == FILE_IMPORT {
            return true;
        }
    }
    false
}

/// Makes `respond<code>With<media>(File entity, ...)` factories take a
/// `StreamingOutput`. Sources that do not import `java.io.File` pass through.
pub fn patch_file_responses(source: &str) -> String {
    if !imports_file(source) {
        return source.to_string();
    }
    let lines: Vec<String> = source
        .lines()
        .map(|line| {
            if line == FILE_IMPORT {
                return STREAMING_OUTPUT_IMPORT.to_string();
            }
            match file_response_pattern().captures(line) {
                Some(caps) => format!(
                    "    public static {} respond{}With{}(StreamingOutput entity,",
                    &caps[1], &caps[2], &caps[3]
                ),
                None => line.to_string(),
            }
        })
        .collect();
    join_lines(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boxes_primitives_on_word_boundaries() {
        assert_eq!(box_primitives("int getCount()"), "Integer getCount()\n");
        assert_eq!(
            box_primitives("  void setFlags(boolean a, long b, char c);"),
            "  void setFlags(Boolean a, Long b, Character c);\n"
        );
    }

    #[test]
    fn boxing_leaves_longer_words_alone() {
        let source = "String printer = \"interval\";\nInteger shorten;\n";
        assert_eq!(box_primitives(source), source);
    }

    #[test]
    fn boxing_is_stable() {
        let once = box_primitives("int a;\ndouble b;\n");
        assert_eq!(box_primitives(&once), once);
    }

    #[test]
    fn dates_become_offset_date_times() {
        let source = "import java.util.Date;\n\npublic interface Event {\n  @JsonFormat(shape = JsonFormat.Shape.STRING, pattern = \"yyyy-MM-dd\")\n  Date getStart();\n\n  void setStart(Date start);\n\n  List<Date> getDays();\n}\n";
        let patched = patch_dates(source);
        assert_eq!(
            patched,
            "import java.time.OffsetDateTime;\n\npublic interface Event {\n  OffsetDateTime getStart();\n\n  void setStart(OffsetDateTime start);\n\n  List<OffsetDateTime> getDays();\n}\n"
        );
        assert_eq!(patch_dates(&patched), patched);
    }

    #[test]
    fn adjacent_date_arguments_are_all_replaced() {
        let source = "  Map<Date,Date> byDay;\n  void shift(Date from,Date to);\n  Pair<Date, Date> range;\n";
        let patched = patch_dates(source);
        assert_eq!(
            patched,
            "  Map<OffsetDateTime,OffsetDateTime> byDay;\n  void shift(OffsetDateTime from,OffsetDateTime to);\n  Pair<OffsetDateTime, OffsetDateTime> range;\n"
        );
        assert_eq!(patch_dates(&patched), patched);
    }

    #[test]
    fn dates_ignore_other_identifiers() {
        let source = "  String startDate;\n  Dates getDates();\n";
        assert_eq!(patch_dates(source), source);
    }

    #[test]
    fn jakarta_rewrites_import_lines_only() {
        let source = "import javax.ws.rs.core.Response;\n\n// see javax.ws docs\npublic class R {}\n";
        assert_eq!(
            patch_jakarta_imports(source),
            "import jakarta.ws.rs.core.Response;\n\n// see javax.ws docs\npublic class R {}\n"
        );
    }

    #[test]
    fn file_responses_take_streaming_output() {
        let source = "import java.io.File;\nimport java.util.List;\n\npublic interface Files {\n  class GetFileResponse extends ResponseDelegate {\n    public static GetFileResponse respond200WithApplicationOctetStream(File entity,\n        GetFileResponse.HeadersFor200 headers) {\n    }\n  }\n}\n";
        let patched = patch_file_responses(source);
        assert!(patched.starts_with("import jakarta.ws.rs.core.StreamingOutput;\n"));
        assert!(patched.contains(
            "    public static GetFileResponse respond200WithApplicationOctetStream(StreamingOutput entity,\n"
        ));
        assert!(!patched.contains("File entity"));
    }

    #[test]
    fn substitutions_settle_after_one_run() {
        let source = r#"package org.example.generated.resources;

import java.io.File;
import java.util.Date;
import java.util.Map;
import javax.ws.rs.GET;
import javax.ws.rs.core.Response;

public interface Exports {
  @GET
  GetExportsResponse getExports(int limit, Map<Date,Date> window);

  class GetExportsResponse extends ResponseDelegate {
    public static GetExportsResponse respond200WithApplicationOctetStream(File entity,
        GetExportsResponse.HeadersFor200 headers) {
    }
  }
}
"#;
        let passes: [(&str, fn(&str) -> String); 4] = [
            ("boxed types", box_primitives),
            ("dates", patch_dates),
            ("jakarta imports", patch_jakarta_imports),
            ("file responses", patch_file_responses),
        ];
        for (name, pass) in passes {
            let once = pass(source);
            assert_ne!(once, source, "{name} changed nothing");
            assert_eq!(pass(&once), once, "{name} changed its own output");
        }
    }

    #[test]
    fn file_import_after_declaration_does_not_count() {
        let source = "public interface X {\n}\nimport java.io.File;\n";
        assert!(!imports_file(source));
        assert_eq!(patch_file_responses(source), source);
    }
}
