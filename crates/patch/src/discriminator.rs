//! Typed discriminator values for polymorphic model interfaces.
//!
//! The generator declares `String _DISCRIMINATOR_TYPE_NAME = "<raw name>";`
//! on every interface in a discriminated hierarchy even when the
//! discriminator property is an enum. The implementation class carries the
//! real type, so the literal is swapped for the matching enum constant (or
//! `null` on the root type).

use std::sync::OnceLock;

use anyhow::Result;
use camino::Utf8PathBuf;
use fs_err as fs;
use regex::Regex;
use tracing::debug;

use crate::layout::{impl_path, is_impl, java_files, simple_name, GeneratedLayout};
use crate::rewrite::{join_lines, rewrite};
use crate::PatchError;

const FIELD_NAME: &str = "_DISCRIMINATOR_TYPE_NAME";
const INTERFACE_LITERAL_PREFIX: &str = "  String _DISCRIMINATOR_TYPE_NAME = \"";
const IMPL_FIELD_PREFIX: &str = "  private final ";
const IMPL_FIELD_SUFFIX: &str = "_DISCRIMINATOR_TYPE_NAME;";

pub fn run(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let mut changed = Vec::new();
    for file in java_files(&layout.model_dir())? {
        if is_impl(&file) {
            continue;
        }
        let source = fs::read_to_string(&file)?;
        if find_discriminator_line(&source).is_none() {
            continue;
        }

        let implementation = impl_path(&file);
        if !implementation.is_file() {
            return Err(PatchError::MissingImpl {
                interface: file,
                expected: implementation,
            }
            .into());
        }
        let impl_source = fs::read_to_string(&implementation)?;
        let type_name = discriminator_type(&impl_source)
            .ok_or_else(|| PatchError::MalformedImpl(implementation.clone()))?;
        if !is_custom_type(type_name) {
            debug!(file = %file, type_name, "builtin discriminator type, skipping");
            continue;
        }

        let interface_name = simple_name(&file).to_string();
        if rewrite(&file, |input| {
            Ok(patch_interface(input, type_name, &interface_name))
        })? {
            debug!(file = %file, type_name, "patched discriminator");
            changed.push(file);
        }
    }
    Ok(changed)
}

/// Index of the literal discriminator declaration inside the interface body.
fn find_discriminator_line(source: &str) -> Option<usize> {
    let mut in_interface = false;
    for (idx, line) in source.lines().enumerate() {
        if !in_interface {
            in_interface = line.starts_with("public interface");
        } else if line.starts_with(INTERFACE_LITERAL_PREFIX) {
            return Some(idx);
        }
    }
    None
}

/// Declared type of the implementation's discriminator field, e.g.
/// `  private final VariableType type = _DISCRIMINATOR_TYPE_NAME;`.
fn discriminator_type(impl_source: &str) -> Option<&str> {
    impl_source
        .lines()
        .skip_while(|line| !line.starts_with("public class"))
        .skip(1)
        .find(|line| line.starts_with(IMPL_FIELD_PREFIX) && line.ends_with(IMPL_FIELD_SUFFIX))
        .and_then(|line| {
            let rest = &line[IMPL_FIELD_PREFIX.len()..];
            rest.split(' ').next().filter(|ty| !ty.is_empty())
        })
}

/// Whether the discriminator type is an enum rather than a builtin.
///
/// Anything longer than seven characters counts as custom without looking at
/// the name.
pub fn is_custom_type(type_name: &str) -> bool {
    if type_name.len() > 7 {
        return true;
    }
    !matches!(
        type_name,
        "String"
            | "Byte"
            | "Short"
            | "Integer"
            | "Long"
            | "Float"
            | "Double"
            | "byte"
            | "short"
            | "int"
            | "long"
            | "float"
            | "double"
    )
}

/// `VariableType` + `API Variable` -> `VariableType.APIVARIABLE`.
pub fn enum_constant(type_name: &str, value: &str) -> String {
    static NON_WORD: OnceLock<Regex> = OnceLock::new();
    let re = NON_WORD.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("invalid non-word regex"));
    format!("{type_name}.{}", re.replace_all(value, "").to_uppercase())
}

/// Rewrites the discriminator declaration of one interface source.
pub fn patch_interface(source: &str, type_name: &str, interface_name: &str) -> String {
    let Some(target) = find_discriminator_line(source) else {
        return source.to_string();
    };
    let lines: Vec<String> = source
        .lines()
        .enumerate()
        .map(|(idx, line)| {
            if idx != target {
                return line.to_string();
            }
            let literal = &line[INTERFACE_LITERAL_PREFIX.len()..];
            let raw = literal.rfind('"').map_or(literal, |end| &literal[..end]);
            let value = raw.replace('_', "");
            let assigned = if value == interface_name {
                "null".to_string()
            } else {
                enum_constant(type_name, &value)
            };
            format!("  {type_name} {FIELD_NAME} = {assigned};")
        })
        .collect();
    join_lines(&lines)
}

#[cfg(test)]
mod tests {
    use super::*;

    const INTERFACE: &str = r#"package org.example.generated.model;

import com.fasterxml.jackson.annotation.JsonProperty;

@JsonTypeName("API_Variable")
public interface ApiVariable extends Variable {
  String _DISCRIMINATOR_TYPE_NAME = "API_Variable";

  @JsonProperty("type")
  VariableType getType();
}
"#;

    const IMPL: &str = r#"package org.example.generated.model;

@JsonTypeName("API_Variable")
public class ApiVariableImpl implements ApiVariable {
  @JsonProperty("type")
  private final VariableType type = _DISCRIMINATOR_TYPE_NAME;
}
"#;

    #[test]
    fn reads_type_from_impl_field() {
        assert_eq!(discriminator_type(IMPL), Some("VariableType"));
        assert_eq!(discriminator_type("public class Foo {\n}\n"), None);
    }

    #[test]
    fn subtype_gets_enum_constant() {
        let patched = patch_interface(INTERFACE, "VariableType", "Variable");
        assert!(patched
            .contains("  VariableType _DISCRIMINATOR_TYPE_NAME = VariableType.APIVARIABLE;\n"));
        assert!(!patched.contains("\"API_Variable\";"));
        assert!(patched.contains("@JsonTypeName(\"API_Variable\")"));
    }

    #[test]
    fn root_type_gets_null() {
        let source = "public interface Variable {\n  String _DISCRIMINATOR_TYPE_NAME = \"Variable\";\n}\n";
        let patched = patch_interface(source, "VariableType", "Variable");
        assert_eq!(
            patched,
            "public interface Variable {\n  VariableType _DISCRIMINATOR_TYPE_NAME = null;\n}\n"
        );
    }

    #[test]
    fn underscores_are_stripped_before_name_check() {
        let source = "public interface FooBar {\n  String _DISCRIMINATOR_TYPE_NAME = \"Foo_Bar\";\n}\n";
        let patched = patch_interface(source, "FooBarKind", "FooBar");
        assert!(patched.contains("FooBarKind _DISCRIMINATOR_TYPE_NAME = null;"));
    }

    #[test]
    fn non_word_characters_are_removed_from_constant() {
        assert_eq!(enum_constant("Kind", "date-time value"), "Kind.DATETIMEVALUE");
        assert_eq!(enum_constant("Kind", "Größe_cm"), "Kind.GRE_CM");
    }

    #[test]
    fn file_without_discriminator_is_untouched() {
        let source = "public interface Plain {\n  String getName();\n}\n";
        assert_eq!(patch_interface(source, "Kind", "Plain"), source);
    }

    #[test]
    fn patched_interface_is_not_patched_again() {
        let once = patch_interface(INTERFACE, "VariableType", "Variable");
        assert_eq!(patch_interface(&once, "VariableType", "Variable"), once);
    }

    #[test]
    fn builtin_names_are_not_custom() {
        for builtin in ["String", "Integer", "int", "double", "Long"] {
            assert!(!is_custom_type(builtin), "{builtin}");
        }
        assert!(is_custom_type("Kind"));
        assert!(is_custom_type("VariableType"));
        assert!(is_custom_type("Boolean"));
    }
}
