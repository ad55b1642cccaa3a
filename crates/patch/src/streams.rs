//! `<Base>Stream` companions for model implementations, letting a handler
//! return a model type whose body is written straight to the response stream.

use anyhow::Result;
use camino::Utf8PathBuf;
use fs_err as fs;

use crate::layout::{is_impl, java_files, simple_name, GeneratedLayout};
use crate::rewrite::write_atomic;

/// Writes one stream class per `*Impl.java`. Returns the files written.
pub fn run(layout: &GeneratedLayout) -> Result<Vec<Utf8PathBuf>> {
    let package = layout.model_package();
    let mut written = Vec::new();
    for file in java_files(&layout.model_dir())? {
        if !is_impl(&file) {
            continue;
        }
        let impl_name = simple_name(&file);
        let base = &impl_name[..impl_name.len() - "Impl".len()];
        let class_name = format!("{base}Stream");
        let target = file.with_file_name(format!("{class_name}.java"));
        let source = stream_source(&package, &class_name, impl_name);

        if target.is_file() && fs::read_to_string(&target)? == source {
            continue;
        }
        write_atomic(&target, &source)?;
        written.push(target);
    }
    Ok(written)
}

pub fn stream_source(package: &str, class_name: &str, extends: &str) -> String {
    format!(
        "package {package};

import java.io.IOException;
import java.io.OutputStream;
import java.util.function.Consumer;

import jakarta.ws.rs.WebApplicationException;
import jakarta.ws.rs.core.StreamingOutput;

public class {class_name} extends {extends} implements StreamingOutput {{
  private final Consumer<OutputStream> _streamer;

  public {class_name}(Consumer<OutputStream> streamer) {{
    _streamer = streamer;
  }}

  @Override
  public void write(OutputStream output) throws IOException, WebApplicationException {{
    _streamer.accept(output);
  }}
}}
"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8Path;
    use tempfile::TempDir;

    #[test]
    fn generates_one_stream_per_impl() {
        let dir = TempDir::new().unwrap();
        let src = Utf8Path::from_path(dir.path()).unwrap();
        let layout = GeneratedLayout::new(src, "org.example");
        let model = layout.model_dir();
        std::fs::create_dir_all(&model).unwrap();
        std::fs::write(model.join("Foo.java"), "public interface Foo {}\n").unwrap();
        std::fs::write(model.join("FooImpl.java"), "public class FooImpl {}\n").unwrap();

        let written = run(&layout).unwrap();

        assert_eq!(written, vec![model.join("FooStream.java")]);
        let source = std::fs::read_to_string(model.join("FooStream.java")).unwrap();
        assert!(source.starts_with("package org.example.generated.model;\n"));
        assert!(source.contains(
            "public class FooStream extends FooImpl implements StreamingOutput {"
        ));
        assert!(run(&layout).unwrap().is_empty());
    }
}
