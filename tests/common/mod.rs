// Shared helpers for integration tests: a shell-script stand-in for adb
#![allow(dead_code)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

pub const DEVICES_READY: &str = r"printf 'List of devices attached\nemulator-5554\tdevice\n\n'";
pub const DEVICES_NONE: &str = r"printf 'List of devices attached\n\n'";

pub const LOG_BODY: &str = "[INFO] start\n[ERROR] a\n[WARN] b\n[WARN] c\n";

/// Builder for a fake `adb` that answers from a `case "$*"` table
pub struct FakeAdb {
    arms: Vec<(String, String)>,
}

impl FakeAdb {
    pub fn new() -> Self {
        Self { arms: Vec::new() }
    }

    /// A device with the app installed and both a crash report and a log
    pub fn ready() -> Self {
        Self::new()
            .arm("\"version\"", "echo 'Android Debug Bridge version 1.0.41'")
            .arm("\"devices\"", DEVICES_READY)
            .arm(
                "\"shell pm list packages com.handnote.app\"",
                "echo 'package:com.handnote.app'",
            )
            .arm(
                "\"shell run-as com.handnote.app cat files/crash_report.txt\"",
                "echo 'java.lang.IllegalStateException: boom'",
            )
            .arm(
                "\"shell run-as com.handnote.app cat files/logs/app_\"*",
                &format!("printf '{}'", LOG_BODY.replace('\n', "\\n")),
            )
    }

    /// Add a `case` arm; `pattern` is shell syntax, `body` a shell command
    pub fn arm(mut self, pattern: &str, body: &str) -> Self {
        self.arms.push((pattern.to_string(), body.to_string()));
        self
    }

    /// Write the script into `dir` and return its path
    pub fn install(&self, dir: &Path) -> PathBuf {
        let mut script = String::from("#!/bin/sh\ncase \"$*\" in\n");
        for (pattern, body) in &self.arms {
            script.push_str(&format!("  {}) {} ;;\n", pattern, body));
        }
        script.push_str("  *) echo \"unexpected: $*\" >&2; exit 1 ;;\nesac\n");

        let path = dir.join("adb");
        fs::write(&path, script).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }
}
