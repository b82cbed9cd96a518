// ABOUTME: Sandbox lifecycle orchestration for Sitewright previews
// ABOUTME: Owns the boot/mount/install/run state machine over an external sandbox engine

pub mod config;
pub mod controller;
pub mod engine;
pub mod error;
pub mod logs;
pub mod readiness;
pub mod session;

// Re-export commonly used types
pub use config::ControllerConfig;
pub use controller::SandboxController;
pub use engine::{SandboxEngine, SandboxHandle, ServerReady, SpawnedProcess};
pub use error::{Result, SandboxError};
pub use logs::{LogBuffer, LogEntry, LogSource, MAX_LOG_ENTRIES};
pub use readiness::ReadinessDetector;
pub use session::{SandboxSession, SessionEvent, SessionState};
