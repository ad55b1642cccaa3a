use anyhow::{anyhow, Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use fs_err as fs;
use walkdir::WalkDir;

use crate::PatchError;

const IMPL_SUFFIX: &str = "Impl";

/// Where the generator writes its output for one project package.
#[derive(Debug, Clone)]
pub struct GeneratedLayout {
    root: Utf8PathBuf,
    project_package: String,
}

impl GeneratedLayout {
    pub fn new(source_dir: &Utf8Path, project_package: &str) -> Self {
        let package_dir: Utf8PathBuf = project_package.split('.').collect();
        Self {
            root: source_dir.join(package_dir).join("generated"),
            project_package: project_package.to_string(),
        }
    }

    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    pub fn model_dir(&self) -> Utf8PathBuf {
        self.root.join("model")
    }

    pub fn resources_dir(&self) -> Utf8PathBuf {
        self.root.join("resources")
    }

    pub fn support_dir(&self) -> Utf8PathBuf {
        self.root.join("support")
    }

    pub fn model_package(&self) -> String {
        format!("{}.generated.model", self.project_package)
    }

    pub fn resource_package(&self) -> String {
        format!("{}.generated.resources", self.project_package)
    }

    pub fn support_package(&self) -> String {
        format!("{}.generated.support", self.project_package)
    }
}

/// `.java` files directly inside `dir`, sorted by name. A missing directory
/// has no files.
pub fn java_files(dir: &Utf8Path) -> Result<Vec<Utf8PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
    {
        let entry = entry.with_context(|| format!("listing {dir}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = Utf8PathBuf::from_path_buf(entry.into_path())
            .map_err(|p| anyhow!("non utf-8 path {}", p.display()))?;
        if path.extension() == Some("java") {
            files.push(path);
        }
    }
    Ok(files)
}

/// Java simple name of a source file (`Foo.java` -> `Foo`).
pub fn simple_name(path: &Utf8Path) -> &str {
    path.file_stem().unwrap_or_default()
}

pub fn is_impl(path: &Utf8Path) -> bool {
    simple_name(path).ends_with(IMPL_SUFFIX) && path.extension() == Some("java")
}

/// `Foo.java` -> `FooImpl.java` next to it.
pub fn impl_path(interface: &Utf8Path) -> Utf8PathBuf {
    interface.with_file_name(format!("{}{IMPL_SUFFIX}.java", simple_name(interface)))
}

/// `FooImpl.java` -> `Foo.java` next to it.
pub fn interface_path(implementation: &Utf8Path) -> Utf8PathBuf {
    let name = simple_name(implementation);
    let base = name.strip_suffix(IMPL_SUFFIX).unwrap_or(name);
    implementation.with_file_name(format!("{base}.java"))
}

pub fn declares_interface(source: &str) -> bool {
    source.lines().any(|line| line.starts_with("public interface"))
}

/// A generated model type: the interface and its `Impl` class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelPair {
    pub name: String,
    pub interface: Utf8PathBuf,
    pub implementation: Utf8PathBuf,
}

/// Pairs every model interface with its implementation.
///
/// Files that are neither (enums, generated constants, stream classes) are
/// ignored. Either half of a pair existing on its own is an error.
pub fn model_pairs(model_dir: &Utf8Path) -> Result<Vec<ModelPair>> {
    let mut pairs = Vec::new();
    for file in java_files(model_dir)? {
        if is_impl(&file) {
            let interface = interface_path(&file);
            if !interface.is_file() {
                return Err(PatchError::LoneImpl(file).into());
            }
            continue;
        }
        let implementation = impl_path(&file);
        if implementation.is_file() {
            pairs.push(ModelPair {
                name: simple_name(&file).to_string(),
                interface: file,
                implementation,
            });
            continue;
        }
        let source = fs::read_to_string(&file)?;
        if declares_interface(&source) {
            return Err(PatchError::MissingImpl {
                interface: file,
                expected: implementation,
            }
            .into());
        }
    }
    Ok(pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn utf8(dir: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap()
    }

    #[test]
    fn layout_follows_project_package() {
        let layout = GeneratedLayout::new(Utf8Path::new("src/main/java"), "org.example.demo");
        assert_eq!(
            layout.model_dir(),
            Utf8PathBuf::from("src/main/java/org/example/demo/generated/model")
        );
        assert_eq!(layout.support_package(), "org.example.demo.generated.support");
    }

    #[test]
    fn missing_directory_lists_nothing() {
        let dir = TempDir::new().unwrap();
        let files = java_files(&utf8(&dir).join("nope")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn lists_java_files_sorted() {
        let dir = TempDir::new().unwrap();
        let root = utf8(&dir);
        for name in ["b.java", "a.java", "notes.txt"] {
            std::fs::write(root.join(name), "").unwrap();
        }
        let names: Vec<_> = java_files(&root)
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.java", "b.java"]);
    }

    #[test]
    fn pairs_interfaces_with_impls() {
        let dir = TempDir::new().unwrap();
        let root = utf8(&dir);
        std::fs::write(root.join("Foo.java"), "public interface Foo {\n}\n").unwrap();
        std::fs::write(root.join("FooImpl.java"), "public class FooImpl {\n}\n").unwrap();
        std::fs::write(root.join("Color.java"), "public enum Color {\n}\n").unwrap();

        let pairs = model_pairs(&root).unwrap();

        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].name, "Foo");
        assert_eq!(pairs[0].implementation, root.join("FooImpl.java"));
    }

    #[test]
    fn lone_impl_is_rejected() {
        let dir = TempDir::new().unwrap();
        let root = utf8(&dir);
        std::fs::write(root.join("BarImpl.java"), "public class BarImpl {\n}\n").unwrap();

        let err = model_pairs(&root).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PatchError>(),
            Some(PatchError::LoneImpl(_))
        ));
    }

    #[test]
    fn interface_without_impl_is_rejected() {
        let dir = TempDir::new().unwrap();
        let root = utf8(&dir);
        std::fs::write(root.join("Baz.java"), "public interface Baz {\n}\n").unwrap();

        let err = model_pairs(&root).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PatchError>(),
            Some(PatchError::MissingImpl { .. })
        ));
    }
}
