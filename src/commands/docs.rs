use anyhow::{Context, Result};
use forge_raml_driver::DocsDriver;

use crate::config::ForgeConfig;

pub fn run(cfg: &ForgeConfig) -> Result<()> {
    let driver = DocsDriver::detect()
        .context("raml2html not found on PATH; install it with `npm install -g raml2html raml2html-modern-theme`")?;
    let written = driver.run(
        &cfg.root_api_definition,
        &cfg.api_doc_output_file,
        std::slice::from_ref(&cfg.resource_docs_dir),
    )?;
    for file in written {
        println!("wrote {file}");
    }
    Ok(())
}
