use chrono::{DateTime, Utc};
use forge_install::InstallOutcome;
use serde::Serialize;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum StageResult {
    Installed {
        version: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        previous: Option<String>,
    },
    Completed,
    Applied {
        changed_files: u64,
        files: Vec<String>,
    },
    Skipped {
        reason: Option<String>,
    },
}

impl From<InstallOutcome> for StageResult {
    fn from(outcome: InstallOutcome) -> Self {
        match outcome {
            InstallOutcome::Installed { version } => Self::Installed {
                version,
                previous: None,
            },
            InstallOutcome::Updated { from, to } => Self::Installed {
                version: to,
                previous: from,
            },
            InstallOutcome::Skipped { version } => Self::Skipped {
                reason: Some(format!("{version} already installed")),
            },
        }
    }
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StageReport {
    pub stage: String,
    pub finished_at: DateTime<Utc>,
    #[serde(flatten)]
    pub result: StageResult,
}

/// What one pipeline invocation did, stage by stage.
#[derive(Debug, Clone, Serialize)]
pub struct PipelineSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub stages: Vec<StageReport>,
}

impl Default for PipelineSummary {
    fn default() -> Self {
        Self {
            started_at: Utc::now(),
            finished_at: None,
            stages: Vec::new(),
        }
    }
}

impl PipelineSummary {
    pub fn record(&mut self, stage: impl Into<String>, result: StageResult) {
        self.stages.push(StageReport {
            stage: stage.into(),
            finished_at: Utc::now(),
            result,
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == name)
    }

    /// Files changed across every patch pass.
    pub fn changed_files(&self) -> u64 {
        self.stages
            .iter()
            .map(|s| match &s.result {
                StageResult::Applied { changed_files, .. } => *changed_files,
                _ => 0,
            })
            .sum()
    }
}
