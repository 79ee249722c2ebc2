//! Infrastructure implementation of the `CommandRunner` port.
//!
//! `TokioCommandRunner` runs one child at a time and forwards its output line
//! by line while it runs, so long package-manager and installer runs show
//! live progress.

use std::process::{Output, Stdio};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};

use crate::application::ports::CommandRunner;
use crate::domain::{CommandSpec, ProvisionError};

/// `tracing` target for child output lines (file log only).
pub const CHILD_OUTPUT_TARGET: &str = "child_output";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Stream {
    Stdout,
    Stderr,
}

/// Production `CommandRunner` backed by `tokio::process`.
///
/// Stdin is inherited so `sudo` can prompt for a password.
pub struct TokioCommandRunner {
    echo: bool,
}

impl TokioCommandRunner {
    /// `echo` controls whether child output is copied to the console.
    #[must_use]
    pub fn new(echo: bool) -> Self {
        Self { echo }
    }
}

impl CommandRunner for TokioCommandRunner {
    async fn run(&self, command: &CommandSpec) -> Result<Output> {
        let mut cmd = tokio::process::Command::new(&command.program);
        cmd.args(&command.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = &command.cwd {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| ProvisionError::Spawn {
            program: command.program.clone(),
            source,
        })?;

        let stdout_handle = child.stdout.take();
        let stderr_handle = child.stderr.take();

        let (status, stdout, stderr) = tokio::join!(
            child.wait(),
            forward(stdout_handle, Stream::Stdout, self.echo),
            forward(stderr_handle, Stream::Stderr, self.echo),
        );

        Ok(Output {
            status: status.with_context(|| format!("waiting for {}", command.program))?,
            stdout,
            stderr,
        })
    }
}

/// Copy `handle` line by line to the console and the log, returning the bytes read.
async fn forward<H>(handle: Option<H>, stream: Stream, echo: bool) -> Vec<u8>
where
    H: AsyncRead + Unpin,
{
    let mut captured = Vec::new();
    let Some(handle) = handle else {
        return captured;
    };
    let mut reader = BufReader::new(handle);
    let mut line = Vec::new();
    loop {
        line.clear();
        match reader.read_until(b'\n', &mut line).await {
            Ok(0) => break,
            Err(e) => {
                tracing::warn!(?stream, "stopped reading child output: {e}");
                break;
            }
            Ok(_) => {
                captured.extend_from_slice(&line);
                let text = String::from_utf8_lossy(&line);
                let text = text.trim_end_matches(['\n', '\r']);
                if echo {
                    match stream {
                        Stream::Stdout => println!("{text}"),
                        Stream::Stderr => eprintln!("{text}"),
                    }
                }
                tracing::debug!(target: CHILD_OUTPUT_TARGET, ?stream, "{text}");
            }
        }
    }
    captured
}
