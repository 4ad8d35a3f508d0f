//! External diagram rendering.
//!
//! The renderer is a collaborating tool (`mmdc`), not part of the logical
//! model: it takes a diagram-script file and produces an image, or fails.
//! Failure is detected by the absence of the output file and is recoverable
//! per item; the batch loop logs and skips.

use crate::error::RenderError;
use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Invokes the external diagram renderer with a per-item timeout.
#[derive(Debug, Clone)]
pub struct Renderer {
    command: String,
    scale: u32,
    timeout: Duration,
}

impl Default for Renderer {
    fn default() -> Self {
        Self {
            command: "mmdc".to_string(),
            scale: 4,
            timeout: Duration::from_secs(10),
        }
    }
}

impl Renderer {
    pub fn new(command: impl Into<String>, scale: u32, timeout: Duration) -> Self {
        Self {
            command: command.into(),
            scale,
            timeout,
        }
    }

    /// Renders one diagram script to an image file.
    ///
    /// The child process is killed once the timeout elapses. Even a clean
    /// exit only counts as success if the output file actually exists.
    pub fn render(&self, script: &Path, image: &Path) -> Result<(), RenderError> {
        let mut child = Command::new(&self.command)
            .arg("-i")
            .arg(script)
            .arg("-o")
            .arg(image)
            .arg("-s")
            .arg(self.scale.to_string())
            .arg("-q")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn()
            .map_err(|e| RenderError::Spawn {
                command: self.command.clone(),
                source: e,
            })?;

        let started = Instant::now();
        loop {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(?status, script = %script.display(), "renderer exited");
                    break;
                }
                Ok(None) => {
                    if started.elapsed() >= self.timeout {
                        let _ = child.kill();
                        let _ = child.wait();
                        return Err(RenderError::Timeout {
                            script: script.to_path_buf(),
                            seconds: self.timeout.as_secs(),
                        });
                    }
                    std::thread::sleep(POLL_INTERVAL);
                }
                Err(e) => {
                    return Err(RenderError::Spawn {
                        command: self.command.clone(),
                        source: e,
                    });
                }
            }
        }

        if image.exists() {
            Ok(())
        } else {
            Err(RenderError::MissingOutput(image.to_path_buf()))
        }
    }
}
