// ABOUTME: Error types for sandbox lifecycle operations
// ABOUTME: Every stage failure maps to one variant; the controller decides which are terminal

use thiserror::Error;

/// Main error type for sandbox operations
#[derive(Error, Debug)]
pub enum SandboxError {
    /// Environment allocation failed, terminal for the session
    #[error("Boot failed: {0}")]
    Boot(String),

    /// VFS shape rejected by the builder or the engine, terminal
    #[error("Mount failed: {0}")]
    Mount(String),

    /// Dependency install exited non-zero, terminal. Carries the tail of the
    /// session log for diagnosis.
    #[error("install failed: {message}")]
    Install { message: String },

    /// A process could not be spawned in the sandbox
    #[error("Failed to spawn '{command}': {error}")]
    Spawn { command: String, error: String },

    /// Live-edit write into the mounted filesystem failed; never terminal
    #[error("Write failed for '{path}': {error}")]
    Write { path: String, error: String },

    /// A stage exceeded its configured timeout
    #[error("{stage} timed out after {seconds} seconds")]
    Timeout { stage: String, seconds: u64 },

    /// The session was torn down while a start sequence was in flight
    #[error("Session cancelled")]
    Cancelled,

    /// A start was attempted while another start sequence holds the session
    #[error("A session is already starting")]
    AlreadyStarting,

    /// Any other engine-reported failure
    #[error("Engine error: {0}")]
    Engine(String),
}

/// Type alias for Results that return SandboxError
pub type Result<T> = std::result::Result<T, SandboxError>;
