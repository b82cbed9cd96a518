// ABOUTME: Sandbox lifecycle controller for one builder view
// ABOUTME: Drives boot → mount → install → run → ready and owns the session handle

use std::sync::Arc;

use sitewright_files::{build_vfs, ProjectFile};
use tokio::sync::{broadcast, mpsc, Mutex, RwLock};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::config::ControllerConfig;
use crate::engine::{SandboxEngine, SandboxHandle};
use crate::error::{Result, SandboxError};
use crate::logs::{LogBuffer, LogEntry, LogSource};
use crate::readiness::ReadinessDetector;
use crate::session::{SandboxSession, SessionEvent, SessionState};

/// Default capacity for the session event broadcast channel
/// Can be overridden via SITEWRIGHT_SESSION_EVENT_CHANNEL_SIZE environment variable
const DEFAULT_EVENT_CHANNEL_SIZE: usize = 200;

/// Orchestrates the sandbox lifecycle for a single builder view.
///
/// Owns at most one active session at a time; `start` first tears down any
/// prior session, and every stage failure is terminal for that session. The
/// only recovery path is an explicit user-initiated rebuild.
pub struct SandboxController {
    engine: Arc<dyn SandboxEngine>,
    config: ControllerConfig,
    session: Arc<RwLock<Option<SandboxSession>>>,
    files: Arc<RwLock<Vec<ProjectFile>>>,
    logs: Arc<RwLock<LogBuffer>>,
    /// Broadcast channel for real-time session events
    event_tx: broadcast::Sender<SessionEvent>,
    /// Serializes start sequences; a second start while one is in flight is
    /// rejected rather than queued
    start_lock: Mutex<()>,
}

impl SandboxController {
    /// Create a new controller over the given engine
    pub fn new(engine: Arc<dyn SandboxEngine>) -> Self {
        Self::with_config(engine, ControllerConfig::default())
    }

    pub fn with_config(engine: Arc<dyn SandboxEngine>, config: ControllerConfig) -> Self {
        // Read channel size from environment with validation
        let channel_size = std::env::var("SITEWRIGHT_SESSION_EVENT_CHANNEL_SIZE")
            .ok()
            .and_then(|v| v.parse::<usize>().ok())
            .filter(|&v| (10..=10000).contains(&v))
            .unwrap_or(DEFAULT_EVENT_CHANNEL_SIZE);

        let (event_tx, _) = broadcast::channel(channel_size);

        Self {
            engine,
            config,
            session: Arc::new(RwLock::new(None)),
            files: Arc::new(RwLock::new(Vec::new())),
            logs: Arc::new(RwLock::new(LogBuffer::new())),
            event_tx,
            start_lock: Mutex::new(()),
        }
    }

    /// Subscribe to session events for UI streaming
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.event_tx.subscribe()
    }

    /// Current session state, if a session is active
    pub async fn state(&self) -> Option<SessionState> {
        self.session.read().await.as_ref().map(|s| s.state)
    }

    /// Preview URL; set only while the session is Ready
    pub async fn preview_url(&self) -> Option<String> {
        self.session
            .read()
            .await
            .as_ref()
            .and_then(|s| s.preview_url.clone())
    }

    /// Id of the active session, if any
    pub async fn session_id(&self) -> Option<Uuid> {
        self.session.read().await.as_ref().map(|s| s.id)
    }

    /// The retained session log, oldest first
    pub async fn logs(&self) -> Vec<LogEntry> {
        self.logs.read().await.entries()
    }

    /// Snapshot of the in-memory project file list
    pub async fn files(&self) -> Vec<ProjectFile> {
        self.files.read().await.clone()
    }

    /// Build and start a new sandbox session for the given files.
    ///
    /// Any prior session is fully torn down before a new handle is allocated.
    /// A concurrent `start` while another start sequence is in flight is
    /// rejected with `AlreadyStarting`.
    pub async fn start(&self, files: Vec<ProjectFile>) -> Result<()> {
        let _guard = self
            .start_lock
            .try_lock()
            .map_err(|_| SandboxError::AlreadyStarting)?;

        self.teardown().await;

        {
            *self.files.write().await = files;
            self.logs.write().await.clear();
        }

        let session = SandboxSession::new();
        let session_id = session.id;
        info!("Starting sandbox session {}", session_id);
        {
            *self.session.write().await = Some(session);
        }
        self.broadcast_event(SessionEvent::State {
            session_id,
            state: SessionState::Loading,
        });

        match self.run_stages(session_id).await {
            Ok(()) => Ok(()),
            Err(SandboxError::Cancelled) => {
                info!("Session {} cancelled during start", session_id);
                Err(SandboxError::Cancelled)
            }
            Err(e) => {
                error!("Session {} failed: {}", session_id, e);
                self.push_log(session_id, LogSource::System, format!("Error: {}", e))
                    .await;
                self.fail_session(session_id).await;
                Err(e)
            }
        }
    }

    /// Release the sandbox handle and stop all spawned processes.
    ///
    /// Idempotent: a no-op when no session is active. Runs on view unmount
    /// and before any new `start`. Partially applied filesystem writes are
    /// not rolled back; the whole handle is discarded.
    pub async fn teardown(&self) {
        let taken = self.session.write().await.take();
        if let Some(session) = taken {
            info!("Tearing down session {}", session.id);
            if let Some(handle) = session.handle {
                if let Err(e) = handle.teardown().await {
                    warn!("Engine teardown for session {} failed: {}", session.id, e);
                }
            }
        }
    }

    /// Apply a single-file edit from the embedded editor.
    ///
    /// The in-memory file list is updated unconditionally so editor and tree
    /// state stay consistent regardless of sandbox status. If the session is
    /// Ready the edit is also written into the live sandbox for that path
    /// only; a failed write is logged and never reverts the in-memory edit.
    pub async fn update_file(&self, path: &str, content: &str) {
        {
            let mut files = self.files.write().await;
            match files.iter_mut().find(|f| f.path == path) {
                Some(file) => file.content = content.to_string(),
                None => files.push(ProjectFile::new(path, content)),
            }
        }

        let target = {
            let session = self.session.read().await;
            match session.as_ref() {
                Some(s) if s.state == SessionState::Ready => {
                    s.handle.clone().map(|handle| (s.id, handle))
                }
                _ => None,
            }
        };

        if let Some((session_id, handle)) = target {
            if let Err(e) = handle.write_file(path, content).await {
                let write_err = SandboxError::Write {
                    path: path.to_string(),
                    error: e.to_string(),
                };
                warn!("Live edit sync failed: {}", write_err);
                self.push_log(session_id, LogSource::System, format!("Error: {}", write_err))
                    .await;
            }
        }
    }

    // ==================== Stage sequence ====================

    async fn run_stages(&self, session_id: Uuid) -> Result<()> {
        // Boot: request a new isolated environment
        self.set_state(session_id, SessionState::Booting).await?;
        let handle: Arc<dyn SandboxHandle> = self
            .engine
            .boot()
            .await
            .map_err(|e| SandboxError::Boot(e.to_string()))?
            .into();
        self.store_handle(session_id, handle.clone()).await?;

        // Mount: one call establishes all initial filesystem state
        let tree = {
            let files = self.files.read().await;
            build_vfs(&files).map_err(|e| SandboxError::Mount(e.to_string()))?
        };
        handle
            .mount(&tree)
            .await
            .map_err(|e| SandboxError::Mount(e.to_string()))?;

        // Install: spawn the dependency install and wait for its exit
        self.set_state(session_id, SessionState::Installing).await?;
        self.run_install(session_id, &handle).await?;

        // Run: subscribe readiness first, then spawn the dev server
        let ready_rx = handle.server_ready().await;
        self.set_state(session_id, SessionState::Running).await?;
        let dev = handle
            .spawn(
                &self.config.dev_command.program,
                &self.config.dev_command.args,
            )
            .await?;
        let _ = self.pump_output(session_id, LogSource::DevServer, dev.output);

        // Readiness: the detector captures the signal exactly once
        self.await_readiness(session_id, ReadinessDetector::new(ready_rx))
            .await
    }

    async fn run_install(&self, session_id: Uuid, handle: &Arc<dyn SandboxHandle>) -> Result<()> {
        let install = handle
            .spawn(
                &self.config.install_command.program,
                &self.config.install_command.args,
            )
            .await?;
        let pump = self.pump_output(session_id, LogSource::Install, install.output);

        let exit = install.exit;
        let code = match self.config.install_timeout {
            Some(duration) => tokio::time::timeout(duration, exit)
                .await
                .map_err(|_| SandboxError::Timeout {
                    stage: "install".to_string(),
                    seconds: duration.as_secs(),
                })?,
            None => exit.await,
        }
        .map_err(|_| SandboxError::Engine("install process dropped without exit code".to_string()))?;

        if code != 0 {
            // The output stream closes when the process exits, so the pump
            // finishes once the final chunks are drained
            let _ = pump.await;
            let tail = self.logs.read().await.tail(5).join("\n");
            return Err(SandboxError::Install {
                message: format!("exit code {}\n{}", code, tail),
            });
        }

        Ok(())
    }

    async fn await_readiness(
        &self,
        session_id: Uuid,
        mut detector: ReadinessDetector,
    ) -> Result<()> {
        let ready = match self.config.readiness_timeout {
            Some(duration) => {
                tokio::time::timeout(duration, detector.wait())
                    .await
                    .map_err(|_| SandboxError::Timeout {
                        stage: "readiness wait".to_string(),
                        seconds: duration.as_secs(),
                    })?
            }
            None => detector.wait().await,
        };

        match ready {
            Some(ready) => {
                {
                    let mut session = self.session.write().await;
                    match session.as_mut() {
                        Some(s) if s.id == session_id => {
                            s.state = SessionState::Ready;
                            s.preview_url = Some(ready.url.clone());
                        }
                        _ => return Err(SandboxError::Cancelled),
                    }
                }
                info!(
                    "Session {} ready: dev server on port {} at {}",
                    session_id, ready.port, ready.url
                );
                self.push_log(
                    session_id,
                    LogSource::System,
                    format!("Dev server ready at {}", ready.url),
                )
                .await;
                self.broadcast_event(SessionEvent::State {
                    session_id,
                    state: SessionState::Ready,
                });
                self.broadcast_event(SessionEvent::Ready {
                    session_id,
                    url: ready.url,
                });
                Ok(())
            }
            None => {
                // The engine closed the subscription without a readiness
                // event; the session stays in Running.
                warn!(
                    "Session {} readiness subscription closed without an event",
                    session_id
                );
                Ok(())
            }
        }
    }

    // ==================== Session bookkeeping ====================

    /// Advance the session state, failing with Cancelled if the session was
    /// torn down while a stage await was in flight.
    async fn set_state(&self, session_id: Uuid, next: SessionState) -> Result<()> {
        {
            let mut session = self.session.write().await;
            match session.as_mut() {
                Some(s) if s.id == session_id => {
                    if next != SessionState::Ready {
                        s.preview_url = None;
                    }
                    info!(
                        "Session {} state: {} -> {}",
                        session_id,
                        s.state.as_str(),
                        next.as_str()
                    );
                    s.state = next;
                }
                _ => return Err(SandboxError::Cancelled),
            }
        }
        self.broadcast_event(SessionEvent::State {
            session_id,
            state: next,
        });
        Ok(())
    }

    async fn store_handle(&self, session_id: Uuid, handle: Arc<dyn SandboxHandle>) -> Result<()> {
        let mut session = self.session.write().await;
        match session.as_mut() {
            Some(s) if s.id == session_id => {
                s.handle = Some(handle);
                Ok(())
            }
            _ => Err(SandboxError::Cancelled),
        }
    }

    async fn fail_session(&self, session_id: Uuid) {
        let failed = {
            let mut session = self.session.write().await;
            match session.as_mut() {
                Some(s) if s.id == session_id => {
                    s.state = SessionState::Error;
                    s.preview_url = None;
                    true
                }
                _ => false,
            }
        };
        if failed {
            self.broadcast_event(SessionEvent::State {
                session_id,
                state: SessionState::Error,
            });
        }
    }

    async fn push_log(&self, session_id: Uuid, source: LogSource, message: String) {
        let entry = {
            let mut logs = self.logs.write().await;
            logs.push(source, message);
            logs.last().cloned()
        };
        if let Some(entry) = entry {
            self.broadcast_event(SessionEvent::Log { session_id, entry });
        }
    }

    /// Forward process output chunks into the session log in arrival order
    fn pump_output(
        &self,
        session_id: Uuid,
        source: LogSource,
        mut rx: mpsc::Receiver<String>,
    ) -> tokio::task::JoinHandle<()> {
        let logs = self.logs.clone();
        let event_tx = self.event_tx.clone();
        tokio::spawn(async move {
            while let Some(chunk) = rx.recv().await {
                let entry = {
                    let mut logs = logs.write().await;
                    logs.push(source, chunk);
                    logs.last().cloned()
                };
                if let Some(entry) = entry {
                    // SSE-style streaming is best-effort; ignore lagging or
                    // absent subscribers
                    let _ = event_tx.send(SessionEvent::Log { session_id, entry });
                }
            }
        })
    }

    /// Broadcast an event to all subscribers
    fn broadcast_event(&self, event: SessionEvent) {
        if let Err(e) = self.event_tx.send(event) {
            if self.event_tx.receiver_count() > 0 {
                warn!("Failed to broadcast session event: {}", e);
            }
        }
    }
}
