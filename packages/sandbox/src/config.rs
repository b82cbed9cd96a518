// ABOUTME: Controller configuration for commands and stage timeouts
// ABOUTME: Timeouts default on and can be disabled per stage with None

use std::time::Duration;

/// Default timeout for the dependency install stage
const DEFAULT_INSTALL_TIMEOUT: Duration = Duration::from_secs(300);

/// Default timeout for the readiness wait after the dev server is spawned
const DEFAULT_READINESS_TIMEOUT: Duration = Duration::from_secs(120);

/// A command to run inside the sandbox
#[derive(Debug, Clone)]
pub struct SandboxCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl SandboxCommand {
    pub fn new(program: impl Into<String>, args: &[&str]) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|a| a.to_string()).collect(),
        }
    }

    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Configuration for the sandbox lifecycle controller.
///
/// A stuck install or a server that never reports readiness would otherwise
/// leave the view in a perpetual in-progress state, so both waits carry a
/// timeout by default. Setting a field to `None` disables that timeout and
/// restores the wait-forever behavior.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    pub install_command: SandboxCommand,
    pub dev_command: SandboxCommand,
    pub install_timeout: Option<Duration>,
    pub readiness_timeout: Option<Duration>,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            install_command: SandboxCommand::new("npm", &["install"]),
            dev_command: SandboxCommand::new("npm", &["run", "dev"]),
            install_timeout: Some(DEFAULT_INSTALL_TIMEOUT),
            readiness_timeout: Some(DEFAULT_READINESS_TIMEOUT),
        }
    }
}

impl ControllerConfig {
    /// Disable all stage timeouts
    pub fn without_timeouts(mut self) -> Self {
        self.install_timeout = None;
        self.readiness_timeout = None;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_enable_timeouts() {
        let config = ControllerConfig::default();
        assert!(config.install_timeout.is_some());
        assert!(config.readiness_timeout.is_some());
        assert_eq!(config.install_command.display(), "npm install");
        assert_eq!(config.dev_command.display(), "npm run dev");
    }

    #[test]
    fn test_without_timeouts() {
        let config = ControllerConfig::default().without_timeouts();
        assert!(config.install_timeout.is_none());
        assert!(config.readiness_timeout.is_none());
    }
}
