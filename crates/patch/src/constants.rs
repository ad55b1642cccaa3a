//! Named constants for the JSON property names of model types and the URL
//! paths of resources.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use anyhow::Result;
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use regex::Regex;
use tracing::{debug, warn};

use crate::const_name::ConstantTable;
use crate::layout::{java_files, model_pairs, GeneratedLayout};
use crate::rewrite::{join_lines, rewrite, write_atomic};
use crate::PatchError;

pub const JSON_FIELD_CLASS: &str = "JsonField";
const ROOT_PATH_CONST: &str = "ROOT_PATH";

fn quoted_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#""((?:[^"\\]|\\.)*)""#).expect("invalid quoted string regex"))
}

fn json_property_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(\s*@JsonProperty\((?:value\s*=\s*)?)"((?:[^"\\]|\\.)*)""#)
            .expect("invalid json property regex")
    })
}

fn multiline_value_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"^(\s*value\s*=\s*)"((?:[^"\\]|\\.)*)""#).expect("invalid value regex")
    })
}

fn sub_path_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"^ {2}@Path\("([^"]+)"\)$"#).expect("invalid sub path regex"))
}

fn variable_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\{([^}]+)\}").expect("invalid path variable regex"))
}

pub fn run_field_constants(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let model_dir = layout.model_dir();
    let pairs = model_pairs(&model_dir)?;
    if pairs.is_empty() {
        warn!(dir = %model_dir, "no model types found, skipping JSON field constants");
        return Ok(Vec::new());
    }

    let mut names = BTreeSet::new();
    for pair in &pairs {
        names.extend(property_order(&fs::read_to_string(&pair.interface)?));
        names.extend(property_order(&fs::read_to_string(&pair.implementation)?));
    }
    let table = ConstantTable::build(names, "", &mut BTreeSet::new());
    debug!(constants = table.len(), "built JSON field table");

    let mut changed = Vec::new();
    let class_file = model_dir.join(format!("{JSON_FIELD_CLASS}.java"));
    let class_source = json_field_class(&layout.model_package(), &table);
    if !class_file.is_file() || fs::read_to_string(&class_file)? != class_source {
        write_atomic(&class_file, &class_source)?;
        changed.push(class_file);
    }

    for pair in pairs {
        for file in [pair.interface, pair.implementation] {
            if rewrite(&file, |input| Ok(patch_json_properties(input, &table)))? {
                changed.push(file);
            }
        }
    }
    Ok(changed)
}

/// Property names listed by the class level `@JsonPropertyOrder`.
pub fn property_order(source: &str) -> Vec<String> {
    let mut lines = source.lines();
    let Some(first) = lines.by_ref().find(|l| l.starts_with("@JsonPropertyOrder")) else {
        return Vec::new();
    };
    let mut names = Vec::new();
    let mut collect = |line: &str| {
        for caps in quoted_pattern().captures_iter(line) {
            let name = &caps[1];
            if !name.trim().is_empty() {
                names.push(name.to_string());
            }
        }
    };
    collect(first);
    if !first.contains("})") {
        for line in lines {
            if line.starts_with("})") {
                break;
            }
            collect(line);
        }
    }
    names
}

pub fn json_field_class(package: &str, table: &ConstantTable) -> String {
    let mut lines = vec![
        format!("package {package};"),
        String::new(),
        format!("public final class {JSON_FIELD_CLASS} {{"),
    ];
    for (value, name) in table.iter() {
        lines.push(format!("  public static final String {name} = \"{value}\";"));
    }
    lines.push("}".to_string());
    join_lines(&lines)
}

/// Points `@JsonProperty` names at `JsonField` constants. Names without a
/// constant keep their literal.
pub fn patch_json_properties(source: &str, table: &ConstantTable) -> String {
    let mut out = Vec::new();
    let mut in_annotation = false;
    for line in source.lines() {
        let trimmed = line.trim();
        if in_annotation {
            if trimmed == ")" {
                out.push(line.to_string());
            } else {
                out.push(replace_literal(multiline_value_pattern(), line, table));
            }
            in_annotation = !trimmed.ends_with(')');
            continue;
        }
        if trimmed == "@JsonProperty(" {
            in_annotation = true;
            out.push(line.to_string());
            continue;
        }
        out.push(replace_literal(json_property_pattern(), line, table));
    }
    join_lines(&out)
}

fn replace_literal(pattern: &Regex, line: &str, table: &ConstantTable) -> String {
    let Some(caps) = pattern.captures(line) else {
        return line.to_string();
    };
    let Some(name) = table.get(&caps[2]) else {
        return line.to_string();
    };
    let whole = caps.get(0).map_or(0..0, |m| m.range());
    format!(
        "{}{}{JSON_FIELD_CLASS}.{name}{}",
        &line[..whole.start],
        &caps[1],
        &line[whole.end..]
    )
}

pub fn run_url_constants(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut changed = Vec::new();
    for file in java_files(&layout.resources_dir())? {
        if rewrite(&file, |input| inject_url_constants(input, &file))? {
            debug!(file = %file, "injected URL constants");
            changed.push(file);
        }
    }
    Ok(changed)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub struct ResourcePaths {
    pub root: String,
    pub sub_paths: BTreeSet<String>,
    pub variables: BTreeSet<String>,
    /// Line index right after the type declaration.
    pub insert_at: usize,
}

fn add_variables(path: &str, variables: &mut BTreeSet<String>) {
    for caps in variable_pattern().captures_iter(path) {
        let name = caps[1].split(':').next().unwrap_or_default().trim();
        if !name.is_empty() {
            variables.insert(name.to_string());
        }
    }
}

/// Collects the root path, method sub-paths and path variables of a resource.
pub fn scan_resource(source: &str, file: &Utf8Path) -> Result<ResourcePaths> {
    let lines: Vec<&str> = source.lines().collect();
    let mut paths = ResourcePaths::default();
    let mut idx = 0;

    let mut root = None;
    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;
        if let Some(rest) = line.strip_prefix("@Path(\"") {
            root = rest.split('"').next().map(str::to_string);
            break;
        }
    }
    paths.root = root.ok_or_else(|| PatchError::MissingRootPath(file.to_path_buf()))?;
    add_variables(&paths.root, &mut paths.variables);

    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;
        if line.starts_with("public ") {
            break;
        }
    }
    paths.insert_at = idx;

    let mut reached_responses = false;
    while idx < lines.len() {
        let line = lines[idx];
        idx += 1;
        if let Some(caps) = sub_path_pattern().captures(line) {
            add_variables(&caps[1], &mut paths.variables);
            paths.sub_paths.insert(caps[1].to_string());
        } else if line.starts_with("  class") {
            reached_responses = true;
            break;
        }
    }
    if !reached_responses {
        return Err(PatchError::MissingResponseClasses(file.to_path_buf()).into());
    }
    Ok(paths)
}

/// The constant declarations placed at the top of a resource interface.
pub fn url_constant_block(paths: &ResourcePaths) -> Vec<String> {
    let mut taken = BTreeSet::from([ROOT_PATH_CONST.to_string()]);
    let sub_paths = ConstantTable::build(paths.sub_paths.iter().cloned(), "_PATH", &mut taken);
    let variables = ConstantTable::build(paths.variables.iter().cloned(), "_VAR", &mut taken);

    let mut block = vec![
        format!("  String {ROOT_PATH_CONST} = \"{}\";", paths.root),
        String::new(),
    ];
    for (path, name) in sub_paths.iter() {
        block.push(format!("  String {name} = {ROOT_PATH_CONST} + \"{path}\";"));
        block.push(String::new());
    }
    for (variable, name) in variables.iter() {
        block.push(format!("  String {name} = \"{variable}\";"));
        block.push(String::new());
    }
    block
}

/// Adds URL constants to a resource source unless it already has them.
pub fn inject_url_constants(source: &str, file: &Utf8Path) -> Result<String> {
    let marker = format!("  String {ROOT_PATH_CONST} = ");
    if source.lines().any(|line| line.starts_with(&marker)) {
        return Ok(source.to_string());
    }
    let paths = scan_resource(source, file)?;
    let lines: Vec<&str> = source.lines().collect();
    let mut out: Vec<String> = lines[..paths.insert_at].iter().map(|l| l.to_string()).collect();
    out.extend(url_constant_block(&paths));
    out.extend(lines[paths.insert_at..].iter().map(|l| l.to_string()));
    Ok(join_lines(&out))
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPL: &str = r#"package org.example.generated.model;

@JsonInclude(JsonInclude.Include.NON_NULL)
@JsonPropertyOrder({
    "userId",
    "displayName",
    "---"
})
public class UserImpl implements User {
  @JsonProperty("userId")
  private String userId;

  @JsonProperty(
      value = "displayName",
      access = JsonProperty.Access.READ_ONLY
  )
  private String displayName;

  @JsonProperty("---")
  private String dashes;
}
"#;

    const RESOURCE: &str = r#"package org.example.generated.resources;

import jakarta.ws.rs.Path;

@Path("/studies/{study-id}")
public interface Studies {
  @GET
  GetStudiesResponse getStudies();

  @GET
  @Path("/variables/{variableId}")
  GetStudiesVariablesByVariableIdResponse getStudiesVariablesByVariableId(
      @PathParam("variableId") String variableId);

  @GET
  @Path("/variables")
  GetStudiesVariablesResponse getStudiesVariables();

  class GetStudiesResponse extends ResponseDelegate {
  }
}
"#;

    fn table(names: &[&str]) -> ConstantTable {
        ConstantTable::build(names.iter().copied(), "", &mut BTreeSet::new())
    }

    #[test]
    fn reads_multiline_property_order() {
        assert_eq!(property_order(IMPL), vec!["userId", "displayName", "---"]);
    }

    #[test]
    fn reads_single_line_property_order() {
        let source = "@JsonPropertyOrder({\"a\", \"b\"})\npublic class AImpl {}\n";
        assert_eq!(property_order(source), vec!["a", "b"]);
    }

    #[test]
    fn constants_class_is_sorted_and_skips_unnamed() {
        let source = json_field_class("org.example.generated.model", &table(&["userId", "---", "displayName"]));
        assert_eq!(
            source,
            "package org.example.generated.model;\n\npublic final class JsonField {\n  public static final String DISPLAY_NAME = \"displayName\";\n  public static final String USER_ID = \"userId\";\n}\n"
        );
    }

    #[test]
    fn annotations_reference_constants() {
        let patched = patch_json_properties(IMPL, &table(&["userId", "displayName", "---"]));
        assert!(patched.contains("  @JsonProperty(JsonField.USER_ID)\n"));
        assert!(patched.contains("      value = JsonField.DISPLAY_NAME,\n      access = JsonProperty.Access.READ_ONLY\n  )\n"));
        assert!(patched.contains("  @JsonProperty(\"---\")\n"));
        assert!(patched.contains("    \"userId\",\n"));
        assert_eq!(patch_json_properties(&patched, &table(&["userId", "displayName"])), patched);
    }

    #[test]
    fn annotation_closed_on_value_line_ends_the_rewrite() {
        let source = "  @JsonProperty(\n      value = \"userId\")\n  private String userId;\n\n  @Schema(\n      value = \"userId\"\n  )\n  private String owner;\n";
        let patched = patch_json_properties(source, &table(&["userId"]));
        assert_eq!(
            patched,
            "  @JsonProperty(\n      value = JsonField.USER_ID)\n  private String userId;\n\n  @Schema(\n      value = \"userId\"\n  )\n  private String owner;\n"
        );
    }

    #[test]
    fn scans_resource_paths() {
        let paths = scan_resource(RESOURCE, Utf8Path::new("Studies.java")).unwrap();
        assert_eq!(paths.root, "/studies/{study-id}");
        assert_eq!(
            paths.sub_paths.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["/variables", "/variables/{variableId}"]
        );
        assert_eq!(
            paths.variables.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["study-id", "variableId"]
        );
        assert_eq!(paths.insert_at, 6);
    }

    #[test]
    fn injects_constant_block_after_declaration() {
        let patched = inject_url_constants(RESOURCE, Utf8Path::new("Studies.java")).unwrap();
        assert!(patched.contains(
            "public interface Studies {\n  String ROOT_PATH = \"/studies/{study-id}\";\n\n  String VARIABLES_PATH = ROOT_PATH + \"/variables\";\n\n  String VARIABLES_VARIABLE_ID_PATH = ROOT_PATH + \"/variables/{variableId}\";\n\n  String STUDY_ID_VAR = \"study-id\";\n\n  String VARIABLE_ID_VAR = \"variableId\";\n\n  @GET\n"
        ));
        let again = inject_url_constants(&patched, Utf8Path::new("Studies.java")).unwrap();
        assert_eq!(again, patched);
    }

    #[test]
    fn missing_root_path_is_an_error() {
        let err = scan_resource("public interface X {\n  class A extends ResponseDelegate {\n", Utf8Path::new("X.java"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PatchError>(),
            Some(PatchError::MissingRootPath(_))
        ));
    }

    #[test]
    fn missing_response_classes_is_an_error() {
        let err = scan_resource("@Path(\"/x\")\npublic interface X {\n}\n", Utf8Path::new("X.java"))
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PatchError>(),
            Some(PatchError::MissingResponseClasses(_))
        ));
    }
}
