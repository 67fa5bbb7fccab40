//! Shared scripted connector double for integration tests
#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use hostkit::connection::{
    CommandError, ConnectionError, Connector, ExecOptions, FileStat, OsInfo,
};

/// Scripted response for one command pattern.
#[derive(Clone)]
pub enum Reply {
    /// Succeed with (stdout, stderr).
    Output(String, String),
    /// Exit non-zero with (exit code, stderr).
    Exit(i32, String),
    /// Fail at the transport layer.
    Transport(String),
    /// Never complete; used to exercise timeouts and cancellation.
    Hang,
    /// Exit non-zero for the first `failures` matching invocations, then
    /// succeed with `stdout`.
    FailThenSucceed { failures: u32, stdout: String },
}

pub fn out(stdout: &str) -> Reply {
    Reply::Output(stdout.to_string(), String::new())
}

pub fn exit(code: i32, stderr: &str) -> Reply {
    Reply::Exit(code, stderr.to_string())
}

/// Scripted [`Connector`] recording every invocation.
///
/// Command replies match by substring, first entry wins; unmatched
/// commands succeed with empty output.
#[derive(Default)]
pub struct FakeConnector {
    os: Option<OsInfo>,
    replies: Vec<(String, Reply)>,
    tools: Vec<String>,
    files: HashMap<String, Vec<u8>>,
    dirs: Vec<String>,
    calls: Mutex<Vec<String>>,
    attempt_counts: Mutex<HashMap<String, u32>>,
    last_options: Mutex<Option<ExecOptions>>,
}

impl FakeConnector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_os(mut self, id: &str) -> Self {
        self.os = Some(OsInfo {
            id: id.to_string(),
            version: "1".to_string(),
            arch: "x86_64".to_string(),
        });
        self
    }

    pub fn reply(mut self, pattern: &str, reply: Reply) -> Self {
        self.replies.push((pattern.to_string(), reply));
        self
    }

    pub fn tool(mut self, name: &str) -> Self {
        self.tools.push(name.to_string());
        self
    }

    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.files.insert(path.to_string(), contents.into());
        self
    }

    pub fn dir(mut self, path: &str) -> Self {
        self.dirs.push(path.to_string());
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn invocations_matching(&self, pattern: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| call.contains(pattern))
            .count()
    }

    pub fn last_options(&self) -> Option<ExecOptions> {
        self.last_options.lock().unwrap().clone()
    }
}

#[async_trait]
impl Connector for FakeConnector {
    async fn exec(
        &self,
        command: &str,
        options: &ExecOptions,
    ) -> Result<(String, String), ConnectionError> {
        self.calls.lock().unwrap().push(command.to_string());
        *self.last_options.lock().unwrap() = Some(options.clone());

        for (pattern, reply) in &self.replies {
            if !command.contains(pattern.as_str()) {
                continue;
            }
            return match reply {
                Reply::Output(stdout, stderr) => Ok((stdout.clone(), stderr.clone())),
                Reply::Exit(code, stderr) => Err(ConnectionError::CommandExit(CommandError {
                    exit_code: *code,
                    stdout: String::new(),
                    stderr: stderr.clone(),
                })),
                Reply::Transport(message) => Err(ConnectionError::Transport {
                    message: message.clone(),
                }),
                Reply::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
                Reply::FailThenSucceed { failures, stdout } => {
                    let mut counts = self.attempt_counts.lock().unwrap();
                    let seen = counts.entry(pattern.clone()).or_insert(0);
                    *seen += 1;
                    if *seen <= *failures {
                        Err(ConnectionError::CommandExit(CommandError {
                            exit_code: 1,
                            stdout: String::new(),
                            stderr: "transient failure".to_string(),
                        }))
                    } else {
                        Ok((stdout.clone(), String::new()))
                    }
                }
            };
        }

        Ok((String::new(), String::new()))
    }

    async fn lookup_path(&self, executable: &str) -> Result<String, ConnectionError> {
        self.calls.lock().unwrap().push(format!("lookup:{executable}"));
        if self.tools.iter().any(|tool| tool == executable) {
            Ok(format!("/usr/bin/{executable}"))
        } else {
            Err(ConnectionError::CommandExit(CommandError {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("{executable}: not found"),
            }))
        }
    }

    async fn get_os(&self) -> Result<OsInfo, ConnectionError> {
        self.os.clone().ok_or(ConnectionError::Transport {
            message: "os-release unavailable".to_string(),
        })
    }

    async fn read_file(&self, path: &str) -> Result<Vec<u8>, ConnectionError> {
        self.files.get(path).cloned().ok_or_else(|| {
            ConnectionError::CommandExit(CommandError {
                exit_code: 1,
                stdout: String::new(),
                stderr: format!("{path}: no such file or directory"),
            })
        })
    }

    async fn stat(&self, path: &str) -> Result<FileStat, ConnectionError> {
        if self.dirs.iter().any(|dir| dir == path) {
            Ok(FileStat {
                exists: true,
                is_dir: true,
            })
        } else if self.files.contains_key(path) {
            Ok(FileStat {
                exists: true,
                is_dir: false,
            })
        } else {
            Ok(FileStat::default())
        }
    }
}
