//! Launch-time self-update: upgrade the downloader package, then pull the
//! application checkout. Failures are logged and otherwise ignored.

use std::path::PathBuf;
use std::process::{ExitStatus, Stdio};

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::UpdateSettings;

#[derive(Debug, Error)]
pub enum UpdateError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{program} exited with {status}")]
    Failed {
        program: String,
        status: ExitStatus,
        stderr: String,
    },
}

/// One external command of the update sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateStep {
    pub label: &'static str,
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
}

/// Commands to run, in order, for the given settings.
pub fn plan(settings: &UpdateSettings) -> Vec<UpdateStep> {
    let mut steps = Vec::new();
    if !settings.enabled {
        return steps;
    }

    if settings.upgrade_downloader {
        steps.push(UpdateStep {
            label: "upgrade downloader",
            program: settings.python.clone(),
            args: ["-m", "pip", "install", "--upgrade", settings.package.as_str()]
                .into_iter()
                .map(String::from)
                .collect(),
            cwd: None,
        });
    }
    if settings.pull_self {
        steps.push(UpdateStep {
            label: "pull application",
            program: settings.git.clone(),
            args: vec!["pull".to_string()],
            cwd: settings.repo_dir.clone(),
        });
    }
    steps
}

pub async fn run_step(step: &UpdateStep) -> Result<(), UpdateError> {
    let mut cmd = Command::new(&step.program);
    cmd.args(&step.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    if let Some(dir) = &step.cwd {
        cmd.current_dir(dir);
    }

    let output = cmd.output().await.map_err(|source| UpdateError::Spawn {
        program: step.program.clone(),
        source,
    })?;

    if output.status.success() {
        Ok(())
    } else {
        Err(UpdateError::Failed {
            program: step.program.clone(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}

/// Runs every step in order; a failing step does not stop the next one.
pub async fn run(steps: &[UpdateStep]) {
    for step in steps {
        info!(step = step.label, program = %step.program, "running update step");
        match run_step(step).await {
            Ok(()) => info!(step = step.label, "update step finished"),
            Err(UpdateError::Failed { program, status, stderr }) => {
                warn!(step = step.label, %program, %status, %stderr, "update step failed");
            }
            Err(error) => warn!(step = step.label, %error, "update step failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn step(program: &str, args: &[&str]) -> UpdateStep {
        UpdateStep {
            label: "test",
            program: program.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            cwd: None,
        }
    }

    #[test]
    fn plan_upgrades_then_pulls() {
        let settings = UpdateSettings {
            python: "py".into(),
            repo_dir: Some(PathBuf::from("/srv/app")),
            ..UpdateSettings::default()
        };
        let steps = plan(&settings);

        assert_eq!(steps.len(), 2);
        assert_eq!(steps[0].program, "py");
        assert_eq!(steps[0].args, ["-m", "pip", "install", "--upgrade", "yt-dlp"]);
        assert_eq!(steps[1].program, "git");
        assert_eq!(steps[1].args, ["pull"]);
        assert_eq!(steps[1].cwd.as_deref(), Some(std::path::Path::new("/srv/app")));
    }

    #[test]
    fn plan_respects_switches() {
        let disabled = UpdateSettings {
            enabled: false,
            ..UpdateSettings::default()
        };
        assert!(plan(&disabled).is_empty());

        let pull_only = UpdateSettings {
            upgrade_downloader: false,
            ..UpdateSettings::default()
        };
        let steps = plan(&pull_only);
        assert_eq!(steps.len(), 1);
        assert_eq!(steps[0].label, "pull application");
    }

    #[tokio::test]
    async fn missing_program_is_a_spawn_error() {
        let result = run_step(&step("yt-queue-no-such-program", &[])).await;
        assert!(matches!(result, Err(UpdateError::Spawn { .. })));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn exit_status_decides_success() {
        assert!(run_step(&step("true", &[])).await.is_ok());
        assert!(matches!(
            run_step(&step("sh", &["-c", "echo boom >&2; exit 3"])).await,
            Err(UpdateError::Failed { stderr, .. }) if stderr == "boom"
        ));
    }

    #[tokio::test]
    async fn run_survives_failing_steps() {
        run(&[
            step("yt-queue-no-such-program", &[]),
            step("yt-queue-no-such-program-either", &["x"]),
        ])
        .await;
    }
}
