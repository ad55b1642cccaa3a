use anyhow::{bail, Result};
use forge_exec::find_program;
use serde::Serialize;
use tracing::warn;

const REQUIRED: [&str; 4] = ["java", "mvn", "git", "npm"];
const OPTIONAL: [&str; 1] = ["docker"];

#[derive(Debug, Serialize)]
struct ToolCheck {
    tool: &'static str,
    required: bool,
    path: Option<String>,
}

#[derive(Debug, Serialize)]
struct DoctorReport {
    tools: Vec<ToolCheck>,
}

impl DoctorReport {
    fn collect<F>(locate: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = REQUIRED.iter().map(|tool| (*tool, true));
        let optional = OPTIONAL.iter().map(|tool| (*tool, false));
        let tools = required
            .chain(optional)
            .map(|(tool, required)| ToolCheck {
                tool,
                required,
                path: locate(tool),
            })
            .collect();
        Self { tools }
    }

    fn missing_required(&self) -> Vec<&'static str> {
        self.tools
            .iter()
            .filter(|check| check.required && check.path.is_none())
            .map(|check| check.tool)
            .collect()
    }
}

pub fn run(json: bool) -> Result<()> {
    let report = DoctorReport::collect(|tool| find_program(tool).map(|path| path.to_string()));
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        for check in &report.tools {
            println!(
                "{:<8} {}",
                check.tool,
                check.path.as_deref().unwrap_or("not found")
            );
        }
    }
    for check in &report.tools {
        if !check.required && check.path.is_none() {
            warn!(tool = check.tool, "not found on PATH; docker-build will not work");
        }
    }
    let missing = report.missing_required();
    if !missing.is_empty() {
        bail!("required tools missing from PATH: {}", missing.join(", "));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn docker_is_not_required() {
        let report = DoctorReport::collect(|tool| (tool != "docker").then(|| format!("/usr/bin/{tool}")));
        assert!(report.missing_required().is_empty());
    }

    #[test]
    fn every_missing_required_tool_is_listed() {
        let report = DoctorReport::collect(|tool| (tool == "git").then(|| "/usr/bin/git".to_string()));
        assert_eq!(report.missing_required(), ["java", "mvn", "npm"]);
    }
}
