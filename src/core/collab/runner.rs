use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::core::launch::LaunchConfig;
use crate::core::progress::ProgressEvent;

/// Lifecycle events streamed from a running game process.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "payload")]
pub enum ProcessEvent {
    Debug(String),
    Data(String),
    Progress(ProgressEvent),
    Error(String),
    Close { code: Option<i32> },
}

#[derive(Debug, Clone, Error)]
pub enum RunnerError {
    #[error("failed to spawn game process: {0}")]
    Spawn(String),
}

/// Spawns the configured process and streams its lifecycle. The pipeline
/// builds a [`LaunchConfig`]; what executes it (a real JVM, a recorder in
/// tests) sits behind this trait.
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    async fn spawn(
        &self,
        config: &LaunchConfig,
        events: mpsc::UnboundedSender<ProcessEvent>,
    ) -> Result<u32, RunnerError>;
}

/// Default runner: invokes a Java binary with the assembled memory flags,
/// classpath and game arguments, forwarding stdout as `Data` and stderr as
/// `Error` events line by line.
pub struct CommandRunner {
    java_binary: PathBuf,
}

impl CommandRunner {
    pub fn new(java_binary: impl Into<PathBuf>) -> Self {
        Self {
            java_binary: java_binary.into(),
        }
    }
}

#[async_trait]
impl ProcessRunner for CommandRunner {
    async fn spawn(
        &self,
        config: &LaunchConfig,
        events: mpsc::UnboundedSender<ProcessEvent>,
    ) -> Result<u32, RunnerError> {
        if let Err(err) = tokio::fs::create_dir_all(&config.root_dir).await {
            return Err(RunnerError::Spawn(format!(
                "creating game directory {}: {err}",
                config.root_dir.display()
            )));
        }

        let mut command = Command::new(&self.java_binary);
        command
            .arg(format!("-Xms{}M", config.min_memory_mb))
            .arg(format!("-Xmx{}M", config.max_memory_mb))
            .args(&config.jvm_args)
            .arg("-cp")
            .arg(&config.classpath)
            .arg(&config.main_class)
            .args(&config.game_args)
            .current_dir(&config.root_dir)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        info!(
            version = %config.version_id,
            java = %self.java_binary.display(),
            "spawning game process"
        );
        let _ = events.send(ProcessEvent::Debug(format!(
            "launching {} via {}",
            config.version_id, config.main_class
        )));

        let mut child = command
            .spawn()
            .map_err(|err| RunnerError::Spawn(err.to_string()))?;
        let pid = child.id().unwrap_or_default();

        if let Some(stdout) = child.stdout.take() {
            let events = events.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stdout).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if events.send(ProcessEvent::Data(line)).is_err() {
                        break;
                    }
                }
            });
        }

        if let Some(stderr) = child.stderr.take() {
            let events = events.clone();
            tokio::spawn(async move {
                let mut lines = BufReader::new(stderr).lines();
                while let Ok(Some(line)) = lines.next_line().await {
                    if events.send(ProcessEvent::Error(line)).is_err() {
                        break;
                    }
                }
            });
        }

        tokio::spawn(async move {
            let code = match child.wait().await {
                Ok(status) => status.code(),
                Err(err) => {
                    warn!(%err, "waiting on game process failed");
                    None
                }
            };
            let _ = events.send(ProcessEvent::Close { code });
        });

        Ok(pid)
    }
}
