use std::sync::{Arc, RwLock};

use reqwest::Client as HttpClient;
use serde::Deserialize;
use url::Url;

use crate::api::models::{ChatRoom, Message, Session};
use crate::config::ClientConfig;
use crate::error::{Error, Result};

/// The one place outbound HTTP happens. Holds the base URL and the current
/// session; every protected request goes through [`ApiClient::authed`], which
/// injects the bearer header or fails fast with [`Error::AuthMissing`] before
/// any network traffic. Anonymous endpoints (login, register) skip it.
///
/// Cheap to clone; clones share the session, so a login through one handle is
/// visible to all of them.
#[derive(Clone)]
pub struct ApiClient {
    http: HttpClient,
    base_url: Url,
    session: Arc<RwLock<Option<Session>>>,
}

#[derive(Deserialize)]
struct RegisterResponse {
    message: String,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new(),
            base_url: config.parsed_base_url()?,
            session: Arc::new(RwLock::new(None)),
        })
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().expect("session lock").clone()
    }

    /// Installs a session (e.g. one restored from a [`SessionStore`]).
    ///
    /// [`SessionStore`]: crate::session::SessionStore
    pub fn set_session(&self, session: Session) {
        *self.session.write().expect("session lock") = Some(session);
    }

    /// Drops the in-memory session. Subsequent protected calls fail locally
    /// with [`Error::AuthMissing`]. The caller clears the on-disk store.
    pub fn logout(&self) {
        *self.session.write().expect("session lock") = None;
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| Error::InvalidBaseUrl(format!("{path}: {e}")))
    }

    fn authed(&self, req: reqwest::RequestBuilder) -> Result<reqwest::RequestBuilder> {
        let guard = self.session.read().expect("session lock");
        match guard.as_ref() {
            Some(session) => {
                Ok(req.header("Authorization", format!("Bearer {}", session.token)))
            }
            None => Err(Error::AuthMissing),
        }
    }

    /// Sends the request and maps both transport errors and non-2xx statuses
    /// to [`Error::RequestFailed`]. No retries, no backoff.
    async fn execute(&self, req: reqwest::RequestBuilder) -> Result<reqwest::Response> {
        let resp = req.send().await.map_err(|e| {
            log::debug!("request error: {e}");
            Error::RequestFailed {
                status: None,
                body: Some(e.to_string()),
            }
        })?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.ok().filter(|b| !b.is_empty());
            return Err(Error::RequestFailed {
                status: Some(status.as_u16()),
                body,
            });
        }
        Ok(resp)
    }

    /// `POST /login/`. On success the session is installed on this client and
    /// returned; persisting it is up to the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let url = self.endpoint("login/")?;
        let body = serde_json::json!({ "email": email, "password": password });
        let resp = self.execute(self.http.post(url).json(&body)).await?;
        let session: Session = resp.json().await.map_err(|e| Error::RequestFailed {
            status: None,
            body: Some(format!("malformed login response: {e}")),
        })?;
        log::debug!("logged in as {}", session.username);
        self.set_session(session.clone());
        Ok(session)
    }

    /// `POST /register/`. The password/confirmation mismatch is caught here,
    /// before any network call, matching the server's own check.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        confirm_password: &str,
    ) -> Result<String> {
        if password != confirm_password {
            return Err(Error::ValidationFailed("passwords do not match".to_string()));
        }
        let url = self.endpoint("register/")?;
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "confirmPassword": confirm_password,
        });
        let resp = self.execute(self.http.post(url).json(&body)).await?;
        let parsed: RegisterResponse = resp.json().await.map_err(|e| Error::RequestFailed {
            status: None,
            body: Some(format!("malformed register response: {e}")),
        })?;
        Ok(parsed.message)
    }

    /// `GET /chatrooms/` (bearer-authenticated).
    pub async fn chat_rooms(&self) -> Result<Vec<ChatRoom>> {
        let url = self.endpoint("chatrooms/")?;
        let req = self.authed(self.http.get(url))?;
        let resp = self.execute(req).await?;
        resp.json().await.map_err(|e| Error::RequestFailed {
            status: None,
            body: Some(format!("malformed chatroom list: {e}")),
        })
    }

    /// `POST /chatrooms/` (bearer-authenticated).
    pub async fn create_chat_room(
        &self,
        name: &str,
        description: &str,
        public: bool,
    ) -> Result<ChatRoom> {
        let url = self.endpoint("chatrooms/")?;
        let body = serde_json::json!({
            "name": name,
            "description": description,
            "public": public,
        });
        let req = self.authed(self.http.post(url).json(&body))?;
        let resp = self.execute(req).await?;
        resp.json().await.map_err(|e| Error::RequestFailed {
            status: None,
            body: Some(format!("malformed chatroom response: {e}")),
        })
    }

    /// `GET /chatrooms/{id}/messages/?ordering=timestamp`. Server-side
    /// ordering keeps the client correct if pagination shows up later.
    pub async fn messages(&self, room_id: &str) -> Result<Vec<Message>> {
        let url = self.endpoint(&format!("chatrooms/{room_id}/messages/"))?;
        let req = self.authed(self.http.get(url).query(&[("ordering", "timestamp")]))?;
        let resp = self.execute(req).await?;
        resp.json().await.map_err(|e| Error::RequestFailed {
            status: None,
            body: Some(format!("malformed message list: {e}")),
        })
    }

    /// `POST /chatrooms/{id}/messages/` with a multipart body. Both plain
    /// text sends and attachment uploads come through here.
    pub async fn post_message(
        &self,
        room_id: &str,
        form: reqwest::multipart::Form,
    ) -> Result<Message> {
        let url = self.endpoint(&format!("chatrooms/{room_id}/messages/"))?;
        let req = self.authed(self.http.post(url).multipart(form))?;
        let resp = self.execute(req).await?;
        resp.json().await.map_err(|e| Error::RequestFailed {
            status: None,
            body: Some(format!("malformed message response: {e}")),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::new(&ClientConfig::new("https://example.invalid")).unwrap()
    }

    fn session() -> Session {
        Session {
            token: "tok".to_string(),
            refresh_token: "ref".to_string(),
            username: "u".to_string(),
        }
    }

    #[tokio::test]
    async fn protected_call_without_session_fails_before_network() {
        // example.invalid would error on contact; AuthMissing proves the
        // request never left the client.
        let client = client();
        assert!(matches!(client.chat_rooms().await, Err(Error::AuthMissing)));
        assert!(matches!(client.messages("1").await, Err(Error::AuthMissing)));
    }

    #[tokio::test]
    async fn register_rejects_mismatched_passwords_locally() {
        let client = client();
        let err = client.register("a@b.c", "pw1", "pw2").await.unwrap_err();
        assert!(matches!(err, Error::ValidationFailed(_)));
    }

    #[test]
    fn clones_share_the_session() {
        let a = client();
        let b = a.clone();
        a.set_session(session());
        assert_eq!(b.session(), Some(session()));
        b.logout();
        assert_eq!(a.session(), None);
    }
}
