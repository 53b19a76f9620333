use crate::error::{LogpullError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Directory name used for captures when no output directory is configured
pub const DEFAULT_OUTPUT_DIR_NAME: &str = "logs";

/// Settings for pulling logs from one application on one device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullConfig {
    /// Device bridge executable, resolved through PATH when not a path
    #[serde(default = "default_adb_program")]
    pub adb_program: String,

    /// Package name of the target application
    #[serde(default = "default_package")]
    pub package: String,

    /// Crash report location inside the app-private storage
    #[serde(default = "default_crash_report_path")]
    pub crash_report_path: String,

    /// Log directory inside the app-private storage
    #[serde(default = "default_remote_log_dir")]
    pub remote_log_dir: String,

    /// Log file name prefix
    #[serde(default = "default_log_prefix")]
    pub log_prefix: String,

    /// Log file name suffix
    #[serde(default = "default_log_suffix")]
    pub log_suffix: String,

    /// Local directory for save mode (defaults to `logs/` next to the executable)
    #[serde(default)]
    pub output_dir: Option<PathBuf>,

    /// Timeout for each preflight probe (in seconds)
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,

    /// Timeout for each fetch call (in seconds)
    #[serde(default = "default_fetch_timeout")]
    pub fetch_timeout_secs: u64,
}

// Default value functions for serde
fn default_adb_program() -> String {
    "adb".to_string()
}

fn default_package() -> String {
    "com.handnote.app".to_string()
}

fn default_crash_report_path() -> String {
    "files/crash_report.txt".to_string()
}

fn default_remote_log_dir() -> String {
    "files/logs".to_string()
}

fn default_log_prefix() -> String {
    "app_".to_string()
}

fn default_log_suffix() -> String {
    ".log".to_string()
}

fn default_probe_timeout() -> u64 {
    5
}

fn default_fetch_timeout() -> u64 {
    10
}

impl Default for PullConfig {
    fn default() -> Self {
        Self {
            adb_program: default_adb_program(),
            package: default_package(),
            crash_report_path: default_crash_report_path(),
            remote_log_dir: default_remote_log_dir(),
            log_prefix: default_log_prefix(),
            log_suffix: default_log_suffix(),
            output_dir: None,
            probe_timeout_secs: default_probe_timeout(),
            fetch_timeout_secs: default_fetch_timeout(),
        }
    }
}

impl PullConfig {
    /// Load a configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<PullConfig> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LogpullError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let mut config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(LogpullError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.expand_env_vars();
        config.validate()?;

        Ok(config)
    }

    fn parse_toml(contents: &str) -> Result<PullConfig> {
        toml::from_str(contents)
            .map_err(|e| LogpullError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    fn parse_json(contents: &str) -> Result<PullConfig> {
        serde_json::from_str(contents)
            .map_err(|e| LogpullError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.adb_program.trim().is_empty() {
            return Err(LogpullError::MissingConfigField("adb_program".to_string()));
        }

        if self.package.is_empty() {
            return Err(LogpullError::MissingConfigField("package".to_string()));
        }

        // Android package names: dot-separated segments of [A-Za-z0-9_]
        let valid_package = self.package.contains('.')
            && self.package.split('.').all(|segment| {
                !segment.is_empty()
                    && segment
                        .chars()
                        .all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if !valid_package {
            return Err(LogpullError::ConfigValidationError(format!(
                "Invalid package name: {}",
                self.package
            )));
        }

        // `adb shell` joins its arguments into one remote command line
        for (field, value) in [
            ("crash_report_path", &self.crash_report_path),
            ("remote_log_dir", &self.remote_log_dir),
            ("log_prefix", &self.log_prefix),
            ("log_suffix", &self.log_suffix),
        ] {
            if value.chars().any(char::is_whitespace) {
                return Err(LogpullError::ConfigValidationError(format!(
                    "{} must not contain whitespace: {:?}",
                    field, value
                )));
            }
        }

        if self.crash_report_path.is_empty() {
            return Err(LogpullError::MissingConfigField(
                "crash_report_path".to_string(),
            ));
        }

        if self.remote_log_dir.is_empty() {
            return Err(LogpullError::MissingConfigField("remote_log_dir".to_string()));
        }

        for (field, secs) in [
            ("probe_timeout_secs", self.probe_timeout_secs),
            ("fetch_timeout_secs", self.fetch_timeout_secs),
        ] {
            if secs == 0 || secs > 300 {
                return Err(LogpullError::ConfigValidationError(format!(
                    "{} must be between 1 and 300",
                    field
                )));
            }
        }

        if let Some(ref dir) = self.output_dir {
            if dir.exists() && !dir.is_dir() {
                return Err(LogpullError::ConfigValidationError(format!(
                    "Output path is not a directory: {}",
                    dir.display()
                )));
            }
        }

        Ok(())
    }

    /// Expand environment variables in configuration fields
    fn expand_env_vars(&mut self) {
        for field in [
            &mut self.adb_program,
            &mut self.package,
            &mut self.crash_report_path,
            &mut self.remote_log_dir,
            &mut self.log_prefix,
            &mut self.log_suffix,
        ] {
            *field = Self::expand_env_in_string(field);
        }

        if let Some(ref dir) = self.output_dir {
            let expanded = Self::expand_env_in_string(&dir.to_string_lossy());
            self.output_dir = Some(PathBuf::from(expanded));
        }
    }

    /// Expand `$VAR` and `${VAR}` references in a string
    ///
    /// `$VAR` takes the longest run of `[A-Za-z0-9_]`. Unset variables and
    /// malformed references are left as written.
    fn expand_env_in_string(s: &str) -> String {
        let mut result = String::with_capacity(s.len());
        let mut rest = s;

        while let Some(start) = rest.find('$') {
            result.push_str(&rest[..start]);
            let after = &rest[start + 1..];

            let (name, token_len) = if let Some(braced) = after.strip_prefix('{') {
                match braced.find('}') {
                    Some(end) => (&braced[..end], end + 2),
                    None => ("", 0),
                }
            } else {
                let end = after
                    .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());
                (&after[..end], end)
            };

            let token = &rest[start..start + 1 + token_len];
            match std::env::var(name) {
                Ok(value) if !name.is_empty() => result.push_str(&value),
                _ => result.push_str(token),
            }
            rest = &rest[start + 1 + token_len..];
        }

        result.push_str(rest);
        result
    }

    /// Remote path of the log file for a given day (`YYYY-MM-DD`)
    pub fn log_file_for_day(&self, day: &str) -> String {
        self.remote_log_path(&format!("{}{}{}", self.log_prefix, day, self.log_suffix))
    }

    /// Join a file name onto the remote log directory
    pub fn remote_log_path(&self, file_name: &str) -> String {
        format!("{}/{}", self.remote_log_dir.trim_end_matches('/'), file_name)
    }

    /// Whether a directory entry looks like one of the app's log files
    pub fn is_log_file_name(&self, name: &str) -> bool {
        name.starts_with(&self.log_prefix) && name.ends_with(&self.log_suffix)
    }

    /// Local directory that save mode writes into
    pub fn resolve_output_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.output_dir {
            return Ok(dir.clone());
        }

        let exe = std::env::current_exe()?;
        let base = exe.parent().ok_or_else(|| {
            LogpullError::ConfigError(format!(
                "Cannot determine directory of executable: {}",
                exe.display()
            ))
        })?;
        Ok(base.join(DEFAULT_OUTPUT_DIR_NAME))
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_pull_config_defaults() {
        let config = PullConfig::default();

        assert_eq!(config.adb_program, "adb");
        assert_eq!(config.package, "com.handnote.app");
        assert_eq!(config.crash_report_path, "files/crash_report.txt");
        assert_eq!(config.remote_log_dir, "files/logs");
        assert_eq!(config.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.fetch_timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_empty_package() {
        let config = PullConfig {
            package: String::new(),
            ..PullConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(LogpullError::MissingConfigField(_))
        ));
    }

    #[test]
    fn test_validate_malformed_package() {
        for package in ["handnote", "com..app", "com.hand note.app", "com.app;rm"] {
            let config = PullConfig {
                package: package.to_string(),
                ..PullConfig::default()
            };

            assert!(
                matches!(
                    config.validate(),
                    Err(LogpullError::ConfigValidationError(_))
                ),
                "package {:?} should be rejected",
                package
            );
        }
    }

    #[test]
    fn test_validate_whitespace_in_remote_path() {
        let config = PullConfig {
            remote_log_dir: "files/my logs".to_string(),
            ..PullConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(LogpullError::ConfigValidationError(_))
        ));
    }

    #[test]
    fn test_validate_zero_timeout() {
        let config = PullConfig {
            probe_timeout_secs: 0,
            ..PullConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(LogpullError::ConfigValidationError(_))
        ));
    }

    #[test]
    fn test_validate_output_dir_is_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("not-a-dir");
        fs::write(&file_path, "x").unwrap();

        let config = PullConfig {
            output_dir: Some(file_path),
            ..PullConfig::default()
        };

        assert!(matches!(
            config.validate(),
            Err(LogpullError::ConfigValidationError(_))
        ));
    }

    #[test]
    fn test_expand_env_vars() {
        std::env::set_var("LOGPULL_TEST_ADB", "/opt/platform-tools/adb");
        std::env::set_var("LOGPULL_TEST_OUT", "/tmp/captures");

        let mut config = PullConfig {
            adb_program: "${LOGPULL_TEST_ADB}".to_string(),
            output_dir: Some(PathBuf::from("$LOGPULL_TEST_OUT")),
            ..PullConfig::default()
        };

        config.expand_env_vars();

        assert_eq!(config.adb_program, "/opt/platform-tools/adb");
        assert_eq!(config.output_dir, Some(PathBuf::from("/tmp/captures")));
    }

    #[test]
    fn test_expand_env_vars_in_remote_fields() {
        std::env::set_var("LOGPULL_TEST_REMOTE_DIR", "files/diag");
        std::env::set_var("LOGPULL_TEST_PREFIX", "notes_");

        let mut config = PullConfig {
            crash_report_path: "$LOGPULL_TEST_REMOTE_DIR/crash.txt".to_string(),
            remote_log_dir: "$LOGPULL_TEST_REMOTE_DIR".to_string(),
            log_prefix: "${LOGPULL_TEST_PREFIX}".to_string(),
            ..PullConfig::default()
        };

        config.expand_env_vars();

        assert_eq!(config.crash_report_path, "files/diag/crash.txt");
        assert_eq!(config.remote_log_dir, "files/diag");
        assert_eq!(config.log_prefix, "notes_");
        assert_eq!(config.log_suffix, ".log");
    }

    #[test]
    fn test_expand_env_uses_whole_variable_name() {
        std::env::set_var("LOGPULL_SHADOW", "/short");
        std::env::remove_var("LOGPULL_SHADOWDIR");

        assert_eq!(
            PullConfig::expand_env_in_string("$LOGPULL_SHADOWDIR/captures"),
            "$LOGPULL_SHADOWDIR/captures"
        );
        assert_eq!(
            PullConfig::expand_env_in_string("$LOGPULL_SHADOW/captures"),
            "/short/captures"
        );
        assert_eq!(
            PullConfig::expand_env_in_string("${LOGPULL_SHADOW}DIR"),
            "/shortDIR"
        );
    }

    #[test]
    fn test_expand_env_leaves_unmatched_references() {
        assert_eq!(PullConfig::expand_env_in_string("cost $5"), "cost $5");
        assert_eq!(PullConfig::expand_env_in_string("a$"), "a$");
        assert_eq!(PullConfig::expand_env_in_string("${UNCLOSED"), "${UNCLOSED");
        assert_eq!(PullConfig::expand_env_in_string("${}"), "${}");
    }

    #[test]
    fn test_log_file_for_day() {
        let config = PullConfig {
            remote_log_dir: "files/logs/".to_string(),
            ..PullConfig::default()
        };

        assert_eq!(
            config.log_file_for_day("2024-03-09"),
            "files/logs/app_2024-03-09.log"
        );
    }

    #[test]
    fn test_is_log_file_name() {
        let config = PullConfig::default();

        assert!(config.is_log_file_name("app_2024-03-09.log"));
        assert!(config.is_log_file_name("app_2024-03-09_101500.log"));
        assert!(!config.is_log_file_name("crash_report.txt"));
        assert!(!config.is_log_file_name("app_2024-03-09.log.bak"));
    }

    #[test]
    fn test_resolve_output_dir_override() {
        let config = PullConfig {
            output_dir: Some(PathBuf::from("/tmp/somewhere")),
            ..PullConfig::default()
        };

        assert_eq!(
            config.resolve_output_dir().unwrap(),
            PathBuf::from("/tmp/somewhere")
        );
    }

    #[test]
    fn test_resolve_output_dir_next_to_executable() {
        let config = PullConfig::default();
        let dir = config.resolve_output_dir().unwrap();

        assert!(dir.ends_with(DEFAULT_OUTPUT_DIR_NAME));
    }

    #[test]
    fn test_parse_toml() {
        let toml_content = r#"
            package = "com.example.notes"
            probe_timeout_secs = 3
        "#;

        let config = PullConfig::parse_toml(toml_content).unwrap();
        assert_eq!(config.package, "com.example.notes");
        assert_eq!(config.probe_timeout_secs, 3);
        assert_eq!(config.fetch_timeout_secs, 10);
    }

    #[test]
    fn test_parse_json() {
        let json_content = r#"
            {
                "package": "com.example.notes",
                "remote_log_dir": "files/diag"
            }
        "#;

        let config = PullConfig::parse_json(json_content).unwrap();
        assert_eq!(config.package, "com.example.notes");
        assert_eq!(config.remote_log_dir, "files/diag");
        assert_eq!(config.log_prefix, "app_");
    }

    #[test]
    fn test_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logpull.toml");

        fs::write(&config_path, "package = \"com.example.notes\"\n").unwrap();

        let config = PullConfig::from_file(&config_path).unwrap();
        assert_eq!(config.package, "com.example.notes");
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logpull.json");

        fs::write(&config_path, r#"{ "fetch_timeout_secs": 0 }"#).unwrap();

        let result = PullConfig::from_file(&config_path);
        assert!(matches!(
            result,
            Err(LogpullError::ConfigValidationError(_))
        ));
    }

    #[test]
    fn test_from_file_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("logpull.yaml");

        fs::write(&config_path, "package: com.example.notes").unwrap();

        let result = PullConfig::from_file(&config_path);
        assert!(matches!(result, Err(LogpullError::InvalidConfig(_))));
    }
}
