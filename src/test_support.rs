//! Test support utilities shared across unit and integration tests.

use std::ffi::OsString;
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::Mutex;

use crate::plan::CommandSpec;
use crate::remote::{CommandHandle, CommandOutput, Executor, RemoteError, SubmitFuture};

/// Scripted command runner that returns pre-seeded outputs in FIFO order.
///
/// Used to drive deterministic command outcomes without spawning processes.
#[derive(Clone, Debug, Default)]
pub struct ScriptedRunner {
    responses: std::rc::Rc<std::cell::RefCell<std::collections::VecDeque<CommandOutput>>>,
    invocations: std::rc::Rc<std::cell::RefCell<Vec<CommandInvocation>>>,
}

/// Records a single invocation made through [`ScriptedRunner`].
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct CommandInvocation {
    /// Program name as passed to the runner.
    pub program: String,
    /// Arguments passed to the program.
    pub args: Vec<OsString>,
}

impl CommandInvocation {
    /// Returns a shell-like command string for assertions.
    #[must_use]
    pub fn command_string(&self) -> String {
        let mut parts = Vec::with_capacity(self.args.len() + 1);
        parts.push(self.program.clone());
        parts.extend(
            self.args
                .iter()
                .map(|arg| arg.to_string_lossy().into_owned()),
        );
        parts.join(" ")
    }
}

impl ScriptedRunner {
    /// Creates a new runner with no queued responses.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all invocations recorded so far.
    #[must_use]
    pub fn invocations(&self) -> Vec<CommandInvocation> {
        self.invocations.borrow().clone()
    }

    /// Pushes a successful exit status.
    pub fn push_success(&self) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code: Some(0),
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    /// Pushes a specific exit code.
    pub fn push_exit_code(&self, code: i32) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: String::new(),
        });
    }

    /// Pushes a failing exit code with stderr text.
    pub fn push_failure(&self, code: i32) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code: Some(code),
            stdout: String::new(),
            stderr: String::from("simulated failure"),
        });
    }

    /// Pushes a response with no exit code to simulate abnormal termination.
    pub fn push_missing_exit_code(&self) {
        self.responses.borrow_mut().push_back(CommandOutput {
            code: None,
            stdout: String::new(),
            stderr: String::new(),
        });
    }
}

impl crate::remote::CommandRunner for ScriptedRunner {
    fn run(&self, program: &str, args: &[OsString]) -> Result<CommandOutput, RemoteError> {
        self.invocations.borrow_mut().push(CommandInvocation {
            program: program.to_owned(),
            args: args.to_vec(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| RemoteError::Spawn {
                program: program.to_owned(),
                message: String::from("no scripted response available"),
            })
    }
}

/// Error returned by [`RecordingExecutor`] when scripted to fail.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("scripted failure for '{0}'")]
pub struct ScriptedFailure(pub String);

/// Recorded submission: command name plus the dependency edge, if any.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RecordedSubmission {
    /// Name of the submitted command.
    pub name: String,
    /// Name of the command this submission depends on, when ordered.
    pub depends_on: Option<String>,
}

/// Executor double that records every submission and its dependency edge.
///
/// Submissions succeed unless the executor was built with
/// [`RecordingExecutor::failing_at`], in which case the named submission is
/// recorded and then fails.
#[derive(Clone, Debug, Default)]
pub struct RecordingExecutor {
    submissions: Arc<Mutex<Vec<RecordedSubmission>>>,
    fail_on: Option<String>,
}

impl RecordingExecutor {
    /// Creates an executor whose submissions all succeed.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an executor that fails the submission named `name`.
    #[must_use]
    pub fn failing_at(name: impl Into<String>) -> Self {
        Self {
            submissions: Arc::default(),
            fail_on: Some(name.into()),
        }
    }

    /// Returns a snapshot of all submissions recorded so far.
    pub async fn submissions(&self) -> Vec<RecordedSubmission> {
        self.submissions.lock().await.clone()
    }
}

impl Executor for RecordingExecutor {
    type Error = ScriptedFailure;

    fn submit<'a>(
        &'a self,
        spec: &'a CommandSpec,
        depends_on: Option<&'a CommandHandle>,
    ) -> SubmitFuture<'a, Self::Error> {
        Box::pin(async move {
            self.submissions.lock().await.push(RecordedSubmission {
                name: spec.name.clone(),
                depends_on: depends_on.map(|handle| handle.name.clone()),
            });
            match self.fail_on.as_deref() {
                Some(target) if target == spec.name => Err(ScriptedFailure(spec.name.clone())),
                _ => Ok(CommandHandle {
                    name: spec.name.clone(),
                }),
            }
        })
    }
}
