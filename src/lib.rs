//! Client core for the anymty anonymous chat service.
//!
//! This crate is everything below the screens of the mobile app: session
//! persistence, the authenticated HTTP transport, poll-based message
//! synchronization, and multipart attachment upload. A UI layer is expected
//! to sit on top, call into these types, and render what they return.
//!
//! Typical wiring:
//!
//! ```no_run
//! use std::time::Duration;
//! use anymty_client::{ApiClient, ClientConfig, MessageSync, SessionStore};
//!
//! # async fn run() -> anymty_client::Result<()> {
//! let config = ClientConfig::load();
//! let client = ApiClient::new(&config)?;
//! let store = SessionStore::open_default()?;
//! if let Some(session) = store.load()? {
//!     client.set_session(session);
//! }
//!
//! let sync = MessageSync::new(client.clone(), "42")?;
//! let history = sync.load_history().await?;
//! let handle = sync.start_refresh(
//!     Duration::from_millis(config.refresh_interval_ms),
//!     |outcome| {
//!         if let Ok(messages) = outcome {
//!             // redraw the chat screen
//!             let _ = messages;
//!         }
//!     },
//! );
//! # let _ = (history, handle);
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod error;
pub mod session;
pub mod sync;
pub mod upload;

pub use api::client::ApiClient;
pub use api::models::{ChatRoom, Message, MessageKind, PendingAttachment, Session};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_REFRESH_INTERVAL_MS};
pub use error::{Error, Result};
pub use session::SessionStore;
pub use sync::{MessageSync, RefreshHandle};
