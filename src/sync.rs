//! Message synchronization for one chat room.
//!
//! The engine owns the room's ordered message list and keeps it fresh by
//! polling: there is no push channel, so a timer re-fetches history every few
//! seconds and the screen layer redraws whatever arrives. Sent messages are
//! not inserted optimistically; they show up on the next fetch, exactly as
//! the server recorded them.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqwest::multipart::Form;
use tokio::task::JoinHandle;

use crate::api::client::ApiClient;
use crate::api::models::{Message, PendingAttachment};
use crate::error::{Error, Result};
use crate::upload;

/// Sync engine for a single room. Cheap to clone; clones share the message
/// list, so the refresh task and the screen see the same state.
#[derive(Clone)]
pub struct MessageSync {
    client: ApiClient,
    room_id: String,
    messages: Arc<Mutex<Vec<Message>>>,
}

impl MessageSync {
    pub fn new(client: ApiClient, room_id: &str) -> Result<Self> {
        let room_id = room_id.trim();
        if room_id.is_empty() {
            return Err(Error::ValidationFailed("room id is empty".to_string()));
        }
        Ok(Self {
            client,
            room_id: room_id.to_string(),
            messages: Arc::new(Mutex::new(Vec::new())),
        })
    }

    pub fn room_id(&self) -> &str {
        &self.room_id
    }

    /// Snapshot of the current list. A failed fetch never clears this, so
    /// the screen keeps showing the last good history through network blips.
    pub fn messages(&self) -> Vec<Message> {
        self.messages.lock().expect("message list lock").clone()
    }

    /// Fetches the room's history and replaces the shared list with it.
    ///
    /// The server is asked for timestamp order and the result is stable-sorted
    /// again locally, so ordering holds even if the server ignores the query
    /// parameter. On failure the previous list is left untouched and the
    /// error propagates for the caller to surface.
    ///
    /// Concurrent fetches are allowed and resolved last-applied-wins: there
    /// is no sequence token, so a slow older response can briefly overwrite a
    /// newer one until the next tick corrects it.
    pub async fn load_history(&self) -> Result<Vec<Message>> {
        let mut fetched = self.client.messages(&self.room_id).await?;
        fetched.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        *self.messages.lock().expect("message list lock") = fetched.clone();
        Ok(fetched)
    }

    /// Sends a message, with or without an attachment. Whitespace-only text
    /// with no attachment is rejected locally, before any network call, so
    /// the screen keeps the draft and no empty message reaches the server.
    ///
    /// On success callers re-invoke [`load_history`](Self::load_history) (or
    /// just wait for the next tick) to see the message; on failure the screen
    /// layer must leave the draft text in place.
    pub async fn send(
        &self,
        content: &str,
        attachment: Option<&PendingAttachment>,
    ) -> Result<Message> {
        let text = content.trim();
        match attachment {
            Some(pending) => upload::upload(&self.client, &self.room_id, text, pending).await,
            None => {
                if text.is_empty() {
                    return Err(Error::ValidationFailed("message is empty".to_string()));
                }
                let form = Form::new()
                    .text("type", "text")
                    .text("content", text.to_string());
                self.client.post_message(&self.room_id, form).await
            }
        }
    }

    /// Starts the polling loop: every `interval`, fetch history and hand the
    /// outcome to `on_update`. The first fetch happens one full interval
    /// after the call, so a handle stopped immediately causes zero requests.
    ///
    /// Fetch errors are delivered to `on_update` like results — the loop
    /// never gives up on its own.
    pub fn start_refresh<F>(&self, interval: Duration, on_update: F) -> RefreshHandle
    where
        F: Fn(Result<Vec<Message>>) + Send + 'static,
    {
        let sync = self.clone();
        let task = tokio::spawn(async move {
            let start = tokio::time::Instant::now() + interval;
            let mut ticker = tokio::time::interval_at(start, interval);
            loop {
                ticker.tick().await;
                let outcome = sync.load_history().await;
                if let Err(e) = &outcome {
                    log::warn!("refresh failed for room {}: {e}", sync.room_id);
                }
                on_update(outcome);
            }
        });
        RefreshHandle { task }
    }
}

/// Owner's handle to a running refresh loop. The screen layer stops it when
/// the room goes off-screen; dropping the handle stops the loop too, so a
/// navigated-away screen cannot leak periodic work.
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// Stops the loop. Safe to call any number of times.
    pub fn stop(&self) {
        self.task.abort();
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ClientConfig;

    fn client() -> ApiClient {
        // example.invalid never resolves; any test that gets a network-shaped
        // error instead of a local rejection would fail loudly.
        ApiClient::new(&ClientConfig::new("https://example.invalid")).unwrap()
    }

    #[test]
    fn rejects_blank_room_id() {
        assert!(matches!(
            MessageSync::new(client(), "   "),
            Err(Error::ValidationFailed(_))
        ));
        assert!(MessageSync::new(client(), "42").is_ok());
    }

    #[tokio::test]
    async fn whitespace_only_send_is_rejected_locally() {
        let sync = MessageSync::new(client(), "42").unwrap();
        let err = sync.send("   \n\t ", None).await.unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }

    #[test]
    fn empty_until_first_fetch() {
        let sync = MessageSync::new(client(), "42").unwrap();
        assert!(sync.messages().is_empty());
    }
}
