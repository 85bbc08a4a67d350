/*!
 * Process Spawner
 * Handles OS-level fork/exec with minimal descriptor inheritance
 */

use super::descriptors::{close_inherited, DescriptorPolicy};
use crate::core::errors::{SpawnError, SpawnResult};
use crate::core::types::{Pid, EXEC_FAILURE_STATUS};
use log::{error, info};
use nix::unistd::{dup2, execvp, fork, pipe, ForkResult};
use std::ffi::CString;
use std::os::fd::{AsRawFd, OwnedFd};

/// Execution configuration for a spawn call.
#[derive(Debug, Clone)]
pub struct SpawnConfig {
    command: String,
    args: Vec<String>,
    stdin_pipe: bool,
}

impl SpawnConfig {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            args: Vec::new(),
            stdin_pipe: false,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Requests a pipe wired to the child's standard input.
    pub fn with_stdin_pipe(mut self) -> Self {
        self.stdin_pipe = true;
        self
    }

    pub fn command(&self) -> &str {
        &self.command
    }
}

/// A freshly launched child process.
///
/// Owned by the caller from the moment the spawn call returns; the spawner
/// keeps no handle to it. The optional stdin write end closes on drop.
#[derive(Debug)]
pub struct SpawnedProcess {
    pub pid: Pid,
    pub stdin: Option<OwnedFd>,
}

/// Launches child processes with controlled descriptor inheritance.
pub struct Spawner {
    policy: DescriptorPolicy,
}

impl Spawner {
    pub fn new() -> Self {
        Self {
            policy: DescriptorPolicy::standard(),
        }
    }

    pub fn with_policy(policy: DescriptorPolicy) -> Self {
        Self { policy }
    }

    /// Forks and execs `config.command` with `command` as argv[0].
    ///
    /// Pipe creation happens before the fork, so resource exhaustion fails
    /// cleanly with no child. Fork failure is the only other parent-visible
    /// error. Exec failure is confined to the child, which logs to stderr
    /// and terminates with the reserved status [`EXEC_FAILURE_STATUS`]
    /// rather than returning into two live copies of the caller's state;
    /// a reaping collaborator observes that status later.
    pub fn spawn(&self, config: &SpawnConfig) -> SpawnResult<SpawnedProcess> {
        // Argument vector is assembled before forking; the child must not
        // allocate between fork and exec.
        let argv = build_argv(config)?;

        let pipe_fds = if config.stdin_pipe {
            Some(pipe().map_err(|e| {
                error!("Out of file descriptors spawning {}", config.command);
                SpawnError::PipeExhausted(e.to_string())
            })?)
        } else {
            None
        };

        match unsafe { fork() } {
            Ok(ForkResult::Child) => {
                if let Some((ref read_end, _)) = pipe_fds {
                    let _ = dup2(read_end.as_raw_fd(), libc::STDIN_FILENO);
                }

                close_inherited(&self.policy);

                if let Err(e) = execvp(&argv[0], &argv) {
                    eprintln!(
                        "Failed to exec command '{}' with error '{}'",
                        config.command, e
                    );
                }
                unsafe { libc::_exit(EXEC_FAILURE_STATUS) }
            }
            Ok(ForkResult::Parent { child }) => {
                let pid = child.as_raw();
                info!("Spawned process '{}' (pid {})", config.command, pid);

                let stdin = pipe_fds.map(|(read_end, write_end)| {
                    drop(read_end);
                    write_end
                });
                Ok(SpawnedProcess { pid, stdin })
            }
            Err(e) => {
                error!("Failed to fork for command '{}'", config.command);
                Err(SpawnError::ForkFailed(e.to_string()))
            }
        }
    }
}

impl Default for Spawner {
    fn default() -> Self {
        Self::new()
    }
}

fn build_argv(config: &SpawnConfig) -> SpawnResult<Vec<CString>> {
    if config.command.trim().is_empty() {
        return Err(SpawnError::InvalidCommand("empty command".to_string()));
    }

    let mut argv = Vec::with_capacity(config.args.len() + 1);
    argv.push(to_cstring(&config.command)?);
    for arg in &config.args {
        argv.push(to_cstring(arg)?);
    }
    Ok(argv)
}

fn to_cstring(text: &str) -> SpawnResult<CString> {
    CString::new(text)
        .map_err(|_| SpawnError::InvalidCommand(format!("interior NUL byte in '{}'", text.escape_debug())))
}
