// Scripted bridge used by unit tests

use super::{CommandResult, DeviceBridge};
use crate::error::{LogpullError, Result};
use std::cell::RefCell;
use std::collections::HashMap;
use std::time::Duration;

enum Reply {
    Output(CommandResult),
    SpawnFailure(String),
}

/// Answers bridge calls from a table keyed by the space-joined arguments
///
/// Unscripted calls exit with status 1 and no output.
#[derive(Default)]
pub struct ScriptedBridge {
    replies: HashMap<String, Reply>,
    calls: RefCell<Vec<String>>,
}

impl ScriptedBridge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply to `args` with exit status 0 and `stdout`
    pub fn ok(mut self, args: &str, stdout: &str) -> Self {
        self.replies
            .insert(args.to_string(), Reply::Output(CommandResult::exited(0, stdout)));
        self
    }

    /// Reply to `args` with an arbitrary result
    pub fn reply(mut self, args: &str, result: CommandResult) -> Self {
        self.replies.insert(args.to_string(), Reply::Output(result));
        self
    }

    /// Fail `args` as if the executable could not be started
    pub fn spawn_failure(mut self, args: &str, reason: &str) -> Self {
        self.replies
            .insert(args.to_string(), Reply::SpawnFailure(reason.to_string()));
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl DeviceBridge for ScriptedBridge {
    async fn run(&self, args: &[&str], _timeout: Duration) -> Result<CommandResult> {
        let key = args.join(" ");
        self.calls.borrow_mut().push(key.clone());

        match self.replies.get(&key) {
            Some(Reply::Output(result)) => Ok(result.clone()),
            Some(Reply::SpawnFailure(reason)) => Err(LogpullError::BridgeSpawn {
                program: "adb".to_string(),
                reason: reason.clone(),
            }),
            None => Ok(CommandResult::exited(1, "")),
        }
    }
}
