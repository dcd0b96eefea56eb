//! Runs an [`EditSession`] on a tokio task
//!
//! Edits arrive over a channel and are timestamped on arrival; the task sleeps
//! until the session's next deadline and publishes a snapshot after every
//! step, so observers see the preview and code output change together.

use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, trace};

use crate::interaction::TriggerOutcome;

use super::edit::{EditSession, SessionEvent, SessionSnapshot};
use super::SessionError;

const COMMAND_BUFFER: usize = 64;

enum Command {
    EditConfig(String),
    EditStylesheet(String, oneshot::Sender<Result<(), SessionError>>),
    Select(usize, oneshot::Sender<Result<(), SessionError>>),
    Trigger(String, oneshot::Sender<TriggerOutcome>),
    Flush(oneshot::Sender<Vec<SessionEvent>>),
}

/// Handle to a session running on its own task
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::Sender<Command>,
    snapshots: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<EditSession>,
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Command::EditConfig(_) => f.write_str("EditConfig"),
            Command::EditStylesheet(..) => f.write_str("EditStylesheet"),
            Command::Select(index, _) => write!(f, "Select({index})"),
            Command::Trigger(id, _) => write!(f, "Trigger({id})"),
            Command::Flush(_) => f.write_str("Flush"),
        }
    }
}

/// Move a session onto a new task
///
/// Must be called from within a tokio runtime.
pub fn spawn(session: EditSession) -> SessionHandle {
    let (commands, rx) = mpsc::channel(COMMAND_BUFFER);
    let (publish, snapshots) = watch::channel(session.snapshot());
    let task = tokio::spawn(run(session, rx, publish));
    SessionHandle {
        commands,
        snapshots,
        task,
    }
}

async fn run(
    mut session: EditSession,
    mut commands: mpsc::Receiver<Command>,
    publish: watch::Sender<SessionSnapshot>,
) -> EditSession {
    loop {
        let deadline = session.next_deadline();
        let wake = async {
            match deadline {
                Some(at) => sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            command = commands.recv() => {
                let Some(command) = command else { break };
                trace!(?command, "session command");
                handle(&mut session, command);
            }
            _ = wake => {
                for event in session.poll(Instant::now()) {
                    debug!(?event, "session event");
                }
            }
        }

        publish.send_replace(session.snapshot());
    }
    debug!("session driver stopped");
    session
}

fn handle(session: &mut EditSession, command: Command) {
    let now = Instant::now();
    // Timers that expired while the command waited fire first
    for event in session.poll(now) {
        debug!(?event, "session event");
    }
    match command {
        Command::EditConfig(text) => session.edit_config(text, now),
        Command::EditStylesheet(text, reply) => {
            let _ = reply.send(session.edit_stylesheet(text, now));
        }
        Command::Select(index, reply) => {
            let _ = reply.send(session.select_template(index));
        }
        Command::Trigger(id, reply) => {
            let _ = reply.send(session.trigger(&id, now));
        }
        Command::Flush(reply) => {
            let _ = reply.send(session.flush());
        }
    }
}

impl SessionHandle {
    async fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .await
            .map_err(|_| SessionError::Closed)
    }

    async fn request<T>(
        &self,
        make: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(make(tx)).await?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Submit a raw configuration edit
    pub async fn edit_config(&self, text: impl Into<String>) -> Result<(), SessionError> {
        self.send(Command::EditConfig(text.into())).await
    }

    /// Submit a raw stylesheet edit
    pub async fn edit_stylesheet(&self, text: impl Into<String>) -> Result<(), SessionError> {
        let text = text.into();
        self.request(|reply| Command::EditStylesheet(text, reply))
            .await?
    }

    pub async fn select_template(&self, index: usize) -> Result<(), SessionError> {
        self.request(|reply| Command::Select(index, reply)).await?
    }

    /// Trigger an element of the mounted preview
    pub async fn trigger(&self, element_id: impl Into<String>) -> Result<TriggerOutcome, SessionError> {
        let id = element_id.into();
        self.request(|reply| Command::Trigger(id, reply)).await
    }

    /// Apply pending edits now
    pub async fn flush(&self) -> Result<Vec<SessionEvent>, SessionError> {
        self.request(Command::Flush).await
    }

    /// Latest published snapshot
    pub fn snapshot(&self) -> SessionSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every published snapshot
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the task and return the session as it was left
    pub async fn shutdown(self) -> Result<EditSession, SessionError> {
        drop(self.commands);
        self.task.await.map_err(|_| SessionError::Closed)
    }
}
