// ABOUTME: Engine trait and handle abstraction for sandbox execution backends
// ABOUTME: Defines the boot/mount/spawn/write/teardown surface an engine must provide

use async_trait::async_trait;
use sitewright_files::VfsNode;
use tokio::sync::{mpsc, oneshot};

use crate::error::Result;

/// Readiness event emitted once the engine observes a spawned process bind a
/// network port.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerReady {
    pub port: u16,
    pub url: String,
}

/// A process spawned inside the sandbox.
///
/// Output arrives as arbitrary-sized, not-necessarily-line-aligned chunks in
/// arrival order; the channel closes when the process exits. The exit code
/// resolves once, when the process terminates.
#[derive(Debug)]
pub struct SpawnedProcess {
    pub output: mpsc::Receiver<String>,
    pub exit: oneshot::Receiver<i32>,
}

/// Factory for isolated execution environments.
///
/// The engine itself is a host-provided capability and is not reimplemented
/// here; this trait is the seam production code and tests plug into.
#[async_trait]
pub trait SandboxEngine: Send + Sync {
    /// Allocate a new isolated environment
    async fn boot(&self) -> Result<Box<dyn SandboxHandle>>;
}

/// Handle to one booted sandbox
#[async_trait]
pub trait SandboxHandle: Send + Sync {
    /// Mount the full virtual filesystem. One mount call establishes all
    /// initial state; subsequent mutation goes through `write_file` only.
    async fn mount(&self, tree: &VfsNode) -> Result<()>;

    /// Spawn a process inside the sandbox
    async fn spawn(&self, cmd: &str, args: &[String]) -> Result<SpawnedProcess>;

    /// Subscribe to server-ready events. Registered once per session; the
    /// readiness detector consumes the first event only.
    async fn server_ready(&self) -> mpsc::Receiver<ServerReady>;

    /// Write a single file into the mounted filesystem
    async fn write_file(&self, path: &str, content: &str) -> Result<()>;

    /// Discard the environment and stop all spawned processes
    async fn teardown(&self) -> Result<()>;
}
