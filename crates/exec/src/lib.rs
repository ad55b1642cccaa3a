//! Blocking subprocess execution for the external tools the forge drives.

pub mod docker;
pub mod git;
pub mod maven;

use std::io::{self, Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{anyhow, Context, Result};
use camino::Utf8PathBuf;
use fs_err as fs;
use tracing::debug;

/// Where a child's output stream ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Redirect {
    /// Shares the parent's stream.
    Inherit,
    Null,
    /// Buffered and returned in [`ExecOutput`].
    Capture,
    /// Truncates and writes the file.
    File(Utf8PathBuf),
}

#[derive(Debug, thiserror::Error)]
pub enum ExecError {
    #[error("{program} exited with {}{}", describe_status(.code), describe_stderr(.stderr))]
    Failed {
        program: String,
        code: Option<i32>,
        stderr: String,
    },
}

fn describe_status(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("status {code}"),
        None => "no status (terminated by signal)".to_string(),
    }
}

fn describe_stderr(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(":\n{trimmed}")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
}

#[derive(Debug, Clone)]
pub struct ExecCommand {
    program: String,
    args: Vec<String>,
    cwd: Option<Utf8PathBuf>,
    stdout: Redirect,
    stderr: Redirect,
}

impl ExecCommand {
    /// Output goes to the console, stderr is captured for error reporting.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: None,
            stdout: Redirect::Inherit,
            stderr: Redirect::Capture,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn current_dir(mut self, dir: impl Into<Utf8PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdout(mut self, redirect: Redirect) -> Self {
        self.stdout = redirect;
        self
    }

    pub fn stderr(mut self, redirect: Redirect) -> Self {
        self.stderr = redirect;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[String] {
        &self.args
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Runs to completion. A non-zero exit is an [`ExecError::Failed`].
    pub fn run(&self) -> Result<ExecOutput> {
        debug!(cwd = ?self.cwd, "running {}", self.command_line());
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args)
            .stdin(Stdio::null())
            .stdout(stdio_for(&self.stdout))
            .stderr(stdio_for(&self.stderr));
        if let Some(dir) = &self.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd
            .spawn()
            .with_context(|| format!("spawning {}", self.program))?;
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, out, err) = thread::scope(|scope| -> Result<(ExitStatus, Vec<u8>, Vec<u8>)> {
            let out = scope.spawn(|| drain(stdout, &self.stdout));
            let err = scope.spawn(|| drain(stderr, &self.stderr));
            let status = child
                .wait()
                .with_context(|| format!("waiting for {}", self.program))?;
            let out = out
                .join()
                .map_err(|_| anyhow!("stdout reader for {} panicked", self.program))??;
            let err = err
                .join()
                .map_err(|_| anyhow!("stderr reader for {} panicked", self.program))??;
            Ok((status, out, err))
        })?;

        let output = ExecOutput {
            stdout: String::from_utf8_lossy(&out).into_owned(),
            stderr: String::from_utf8_lossy(&err).into_owned(),
        };
        if !status.success() {
            return Err(ExecError::Failed {
                program: self.program.clone(),
                code: status.code(),
                stderr: output.stderr,
            }
            .into());
        }
        Ok(output)
    }
}

fn stdio_for(redirect: &Redirect) -> Stdio {
    match redirect {
        Redirect::Inherit => Stdio::inherit(),
        Redirect::Null => Stdio::null(),
        Redirect::Capture | Redirect::File(_) => Stdio::piped(),
    }
}

/// Empties a child pipe into its destination, returning captured bytes.
fn drain<R: Read>(pipe: Option<R>, redirect: &Redirect) -> Result<Vec<u8>> {
    let Some(mut pipe) = pipe else {
        return Ok(Vec::new());
    };
    match redirect {
        Redirect::File(path) => {
            if let Some(parent) = path.parent().filter(|p| !p.as_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            let mut file = fs::File::create(path)?;
            io::copy(&mut pipe, &mut file).with_context(|| format!("writing {path}"))?;
            file.flush()?;
            Ok(Vec::new())
        }
        _ => {
            let mut buf = Vec::new();
            pipe.read_to_end(&mut buf)?;
            Ok(buf)
        }
    }
}

/// Locates `program` on `PATH`.
pub fn find_program(program: &str) -> Option<Utf8PathBuf> {
    which::which(program)
        .ok()
        .map(|path| {
            Utf8PathBuf::from_path_buf(path)
                .unwrap_or_else(|p| Utf8PathBuf::from(p.to_string_lossy().to_string()))
        })
}
