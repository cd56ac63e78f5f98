use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use log::{debug, info, warn};
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;

use super::message::decode_message;
use crate::snapshot::UpdateEvent;

/// How long `close()` waits for the peer to take the close frame
const CLOSE_TIMEOUT: Duration = Duration::from_secs(2);

/// Push-stream client delivering decoded update events to a callback
pub struct StreamClient;

impl StreamClient {
    /// Opens the push connection on a background task and returns at once.
    ///
    /// `on_event` runs on that task, once per well-formed update, in arrival
    /// order, and never concurrently with itself. Connect failures and
    /// dropped connections end the task; there is no reconnect.
    pub fn open<F>(url: &str, on_event: F) -> StreamHandle
    where
        F: FnMut(UpdateEvent) + Send + 'static,
    {
        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let task = tokio::spawn(run_stream(url.to_string(), on_event, shutdown_rx));
        StreamHandle {
            shutdown: Some(shutdown_tx),
            task: Some(task),
        }
    }
}

/// Handle to an open push connection. Dropping it also stops the stream.
#[derive(Debug)]
pub struct StreamHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<()>>,
}

impl StreamHandle {
    /// Stops the stream and waits for its task. No event is delivered after
    /// this returns. Safe to call more than once, and before the connection
    /// was ever established.
    pub async fn close(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            // Err means the task already finished
            let _ = shutdown.send(());
        }
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!("Push stream task ended abnormally: {}", e);
            }
        }
    }

    pub fn is_closed(&self) -> bool {
        self.task.as_ref().is_none_or(|task| task.is_finished())
    }
}

async fn run_stream<F>(url: String, mut on_event: F, mut shutdown: oneshot::Receiver<()>)
where
    F: FnMut(UpdateEvent) + Send + 'static,
{
    let connect = tokio_tungstenite::connect_async(url.as_str());
    let ws = tokio::select! {
        biased;
        _ = &mut shutdown => {
            debug!("Push stream closed before connecting to {}", url);
            return;
        }
        result = connect => match result {
            Ok((ws, _response)) => ws,
            Err(e) => {
                warn!("Could not connect push stream to {}: {}", url, e);
                return;
            }
        },
    };

    info!("Push stream connected to {}", url);
    let (mut write, mut read) = ws.split();

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => {
                match tokio::time::timeout(CLOSE_TIMEOUT, write.send(Message::Close(None))).await {
                    Ok(_) => debug!("Push stream to {} closed", url),
                    Err(_) => warn!("Push stream to {} did not take the close frame in time", url),
                }
                break;
            }
            message = read.next() => match message {
                Some(Ok(Message::Text(text))) => match decode_message(text.as_str()) {
                    Some(event) => on_event(event),
                    None => debug!("Ignoring push message: {}", text.as_str()),
                },
                Some(Ok(Message::Close(frame))) => {
                    info!("Push stream closed by server: {:?}", frame);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    warn!("Push stream error: {}", e);
                    break;
                }
                None => {
                    info!("Push stream ended");
                    break;
                }
            },
        }
    }
}
