//! View controller: owns the dashboard state and serializes every change to it.
//!
//! A single consumer task holds the state exclusively. The loader, the push
//! stream and user actions only send it commands; readers get published
//! copies through a watch channel. Commands are handled one at a time in
//! arrival order, so updates are never lost or reordered.

use chrono::{DateTime, Utc};
use log::{debug, error, info};
use serde::Serialize;
use tokio::sync::{mpsc, oneshot, watch};

use crate::config::SyncConfig;
use crate::error::{ControllerError, FetchError};
use crate::focus::FocusStore;
use crate::loader::SnapshotLoader;
use crate::panel::PanelId;
use crate::snapshot::{apply_event, Snapshot, UpdateEvent};
use crate::store::KeyValueStore;
use crate::stream::{StreamClient, StreamHandle};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Phase {
    #[default]
    Loading,
    Ready(Snapshot),
}

/// Everything the dashboard shows, as of the last processed command
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardState {
    pub phase: Phase,
    pub focused: Option<PanelId>,
    pub last_error: Option<String>,
    pub ready_since: Option<DateTime<Utc>>,
    pub last_update_at: Option<DateTime<Utc>>,
    pub updates_applied: u64,
    pub updates_dropped: u64,
}

impl DashboardState {
    pub fn new(focused: Option<PanelId>) -> Self {
        DashboardState {
            focused,
            ..DashboardState::default()
        }
    }

    pub fn snapshot(&self) -> Option<&Snapshot> {
        match &self.phase {
            Phase::Loading => None,
            Phase::Ready(snapshot) => Some(snapshot),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready(_))
    }

    /// Bootstrap finished. Success enters Ready; failure leaves the phase
    /// alone and records the error. Once Ready, the snapshot changes only
    /// through push updates, so a late snapshot is ignored.
    pub fn on_loaded(&mut self, result: Result<Snapshot, FetchError>) {
        match result {
            Ok(_) if self.is_ready() => {}
            Ok(snapshot) => {
                self.phase = Phase::Ready(snapshot);
                self.last_error = None;
                self.ready_since = Some(Utc::now());
            }
            Err(e) => {
                self.last_error = Some(e.to_string());
            }
        }
    }

    /// Applies a push update. Updates arriving while Loading are dropped.
    pub fn on_update(&mut self, event: &UpdateEvent) -> bool {
        match &self.phase {
            Phase::Loading => {
                self.updates_dropped += 1;
                false
            }
            Phase::Ready(snapshot) => {
                self.phase = Phase::Ready(apply_event(snapshot, event));
                self.updates_applied += 1;
                self.last_update_at = Some(Utc::now());
                true
            }
        }
    }

    /// Clears focus if any panel is focused, otherwise focuses `panel`
    pub fn toggle_focus(&mut self, panel: PanelId) -> Option<PanelId> {
        self.focused = match self.focused {
            Some(_) => None,
            None => Some(panel),
        };
        self.focused
    }

    pub fn status(&self) -> StatusReport {
        StatusReport {
            phase: if self.is_ready() { "ready" } else { "loading" },
            focused: self.focused,
            last_error: self.last_error.clone(),
            ready_since: self.ready_since,
            last_update_at: self.last_update_at,
            updates_applied: self.updates_applied,
            updates_dropped: self.updates_dropped,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub phase: &'static str,
    pub focused: Option<PanelId>,
    pub last_error: Option<String>,
    pub ready_since: Option<DateTime<Utc>>,
    pub last_update_at: Option<DateTime<Utc>>,
    pub updates_applied: u64,
    pub updates_dropped: u64,
}

enum Command {
    Loaded(Result<Snapshot, FetchError>),
    Update(UpdateEvent),
    Select(PanelId, oneshot::Sender<Option<PanelId>>),
    Reload,
    Shutdown(oneshot::Sender<()>),
}

/// The consumer side: state, collaborators and the command inbox
pub struct ViewController {
    state: DashboardState,
    focus: FocusStore,
    loader: SnapshotLoader,
    stream: StreamHandle,
    load_in_flight: bool,
    // Weak so the loop ends once every handle is dropped
    commands_tx: mpsc::WeakUnboundedSender<Command>,
    commands: mpsc::UnboundedReceiver<Command>,
    published: watch::Sender<DashboardState>,
}

impl ViewController {
    /// Restores focus, starts the bootstrap load, opens the push stream and
    /// spawns the consumer task. Must be called inside a tokio runtime.
    pub fn start(config: SyncConfig) -> ControllerHandle {
        let focus = FocusStore::new(KeyValueStore::new(&config.state_dir));
        let state = DashboardState::new(focus.restore());
        info!("Starting dashboard, restored focus: {:?}", state.focused);

        let (commands_tx, commands) = mpsc::unbounded_channel();
        let (published, state_rx) = watch::channel(state.clone());

        let stream_tx = commands_tx.downgrade();
        let stream = StreamClient::open(&config.websocket_url, move |event| {
            if let Some(tx) = stream_tx.upgrade() {
                // Fails only once the controller has stopped
                let _ = tx.send(Command::Update(event));
            }
        });

        let mut controller = ViewController {
            state,
            focus,
            loader: SnapshotLoader::new(config.api_url),
            stream,
            load_in_flight: false,
            commands_tx: commands_tx.downgrade(),
            commands,
            published,
        };
        controller.spawn_load();
        tokio::spawn(controller.run());

        ControllerHandle {
            commands: commands_tx,
            state: state_rx,
        }
    }

    fn spawn_load(&mut self) {
        if self.load_in_flight {
            debug!("Bootstrap already in flight");
            return;
        }
        self.load_in_flight = true;
        let loader = self.loader.clone();
        let tx = self.commands_tx.clone();
        tokio::spawn(async move {
            let result = loader.load().await;
            if let Some(tx) = tx.upgrade() {
                let _ = tx.send(Command::Loaded(result));
            }
        });
    }

    fn publish(&self) {
        self.published.send_replace(self.state.clone());
    }

    async fn run(mut self) {
        while let Some(command) = self.commands.recv().await {
            match command {
                Command::Loaded(result) => {
                    self.load_in_flight = false;
                    if let Err(e) = &result {
                        error!("Dashboard bootstrap failed: {}", e);
                    }
                    self.state.on_loaded(result);
                    self.publish();
                }
                Command::Update(event) => {
                    if !self.state.on_update(&event) {
                        debug!(
                            "Dropped update for appointment {} received before bootstrap",
                            event.id
                        );
                    }
                    self.publish();
                }
                Command::Select(panel, reply) => {
                    let focused = self.state.toggle_focus(panel);
                    self.focus.persist(focused);
                    // Publish first so the caller reads its own change
                    self.publish();
                    let _ = reply.send(focused);
                }
                Command::Reload => {
                    if self.state.is_ready() {
                        debug!("Ignoring reload, the snapshot is already loaded");
                        continue;
                    }
                    self.state.last_error = None;
                    self.spawn_load();
                    self.publish();
                }
                Command::Shutdown(reply) => {
                    self.stream.close().await;
                    // Refuse further commands before acknowledging
                    self.commands.close();
                    let _ = reply.send(());
                    break;
                }
            }
        }
        self.stream.close().await;
        info!("Dashboard controller stopped");
    }
}

/// Cloneable handle for submitting actions and reading published state
#[derive(Clone)]
pub struct ControllerHandle {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<DashboardState>,
}

impl ControllerHandle {
    /// Latest published state
    pub fn current(&self) -> DashboardState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<DashboardState> {
        self.state.clone()
    }

    /// Waits until a snapshot is available, or until the pending bootstrap fails
    pub async fn wait_ready(&self) -> Result<Snapshot, ControllerError> {
        let mut rx = self.state.clone();
        loop {
            {
                let state = rx.borrow_and_update();
                if let Some(snapshot) = state.snapshot() {
                    return Ok(snapshot.clone());
                }
                if let Some(e) = &state.last_error {
                    return Err(ControllerError::Bootstrap(e.clone()));
                }
            }
            rx.changed().await.map_err(|_| ControllerError::Closed)?;
        }
    }

    /// Toggles focus and returns the new value
    pub async fn select(&self, panel: PanelId) -> Result<Option<PanelId>, ControllerError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(Command::Select(panel, reply))
            .map_err(|_| ControllerError::Closed)?;
        response.await.map_err(|_| ControllerError::Closed)
    }

    /// Retries a failed bootstrap. Ignored once the snapshot is loaded.
    pub fn reload(&self) -> Result<(), ControllerError> {
        self.commands.send(Command::Reload).map_err(|_| ControllerError::Closed)
    }

    /// Closes the push stream and stops the controller. Calling it again is a no-op.
    pub async fn shutdown(&self) {
        let (reply, done) = oneshot::channel();
        if self.commands.send(Command::Shutdown(reply)).is_ok() {
            let _ = done.await;
        }
    }
}
