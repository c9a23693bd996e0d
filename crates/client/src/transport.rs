//! Request/response pipeline shared by every API call.
//!
//! All requests go through [`Transport::send`], which applies the two
//! interceptors:
//!
//! - request side: attach `Authorization: Bearer <token>` when the session
//!   holds a token;
//! - response side: on 401 clear the session and emit
//!   [`SessionEvent::Expired`], then hand the error back to the caller.
//!
//! Navigation is not a concern here; routers subscribe to the events.

use api_types::error::ErrorResponse;
use reqwest::{
    Method, RequestBuilder, Response, StatusCode, Url,
    header::{self, HeaderMap, HeaderValue},
};
use serde::{Serialize, de::DeserializeOwned};
use tokio::sync::broadcast;

use crate::{
    error::{ClientError, Result},
    session::Session,
};

const EVENT_CAPACITY: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionEvent {
    /// The service rejected the token; it has been removed from the session.
    Expired,
}

/// Something the transport can resolve against its base URL.
pub trait Route {
    fn resolve(&self, base_url: &str) -> Result<Url>;
}

/// A fixed path such as `/api/expenses`.
impl Route for str {
    fn resolve(&self, base_url: &str) -> Result<Url> {
        let raw = format!("{base_url}/{}", self.trim_start_matches('/'));
        Url::parse(&raw).map_err(|err| ClientError::InvalidUrl(format!("{raw}: {err}")))
    }
}

/// One resource below a collection path. The id is escaped as a single
/// path segment, so `/` or `?` in it cannot reach another endpoint.
#[derive(Clone, Copy, Debug)]
pub struct Item<'a> {
    pub collection: &'a str,
    pub id: &'a str,
}

impl Route for Item<'_> {
    fn resolve(&self, base_url: &str) -> Result<Url> {
        if matches!(self.id, "" | "." | "..") {
            return Err(ClientError::InvalidUrl(format!(
                "invalid resource id \"{}\"",
                self.id
            )));
        }
        let mut url = self.collection.resolve(base_url)?;
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl(format!("{base_url} cannot hold a path")))?
            .pop_if_empty()
            .push(self.id);
        Ok(url)
    }
}

#[derive(Clone, Debug)]
pub struct Transport {
    http: reqwest::Client,
    base_url: String,
    session: Session,
    events: broadcast::Sender<SessionEvent>,
}

impl Transport {
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        Url::parse(base_url)
            .map_err(|err| ClientError::InvalidUrl(format!("{base_url}: {err}")))?;

        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
            events,
        })
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    async fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match self.session.get().await {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn inspect(&self, response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let message = response
            .json::<ErrorResponse>()
            .await
            .ok()
            .and_then(ErrorResponse::into_message);

        if status == StatusCode::UNAUTHORIZED {
            self.expire().await;
        }
        Err(ClientError::from_status(status, message))
    }

    async fn expire(&self) {
        self.session.remove().await;
        tracing::info!("session rejected by the service, token cleared");
        // Nobody listening is fine.
        let _ = self.events.send(SessionEvent::Expired);
    }

    /// Sends one request through both interceptors.
    pub async fn send<R: Route + ?Sized, B: Serialize + ?Sized>(
        &self,
        method: Method,
        route: &R,
        body: Option<&B>,
    ) -> Result<Response> {
        let url = route.resolve(&self.base_url)?;
        let path = url.path().to_string();
        tracing::debug!(%method, %url, "sending request");

        let mut request = self.http.request(method.clone(), url);
        if let Some(body) = body {
            request = request.json(body);
        }
        let request = self.authorize(request).await;

        let response = request.send().await.map_err(|err| {
            tracing::warn!(%method, %path, "request failed: {err}");
            ClientError::Transport(err)
        })?;

        self.inspect(response).await.inspect_err(|err| {
            tracing::warn!(%method, %path, "request rejected: {err}");
        })
    }

    pub async fn get_json<R: Route + ?Sized, T: DeserializeOwned>(&self, route: &R) -> Result<T> {
        let response = self.send(Method::GET, route, None::<&()>).await?;
        response.json::<T>().await.map_err(ClientError::Decode)
    }

    pub async fn send_json<R: Route + ?Sized, B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        method: Method,
        route: &R,
        body: Option<&B>,
    ) -> Result<T> {
        let response = self.send(method, route, body).await?;
        response.json::<T>().await.map_err(ClientError::Decode)
    }

    /// Sends a request whose response body is only an acknowledgement.
    pub async fn send_unit<R: Route + ?Sized, B: Serialize + ?Sized>(
        &self,
        method: Method,
        route: &R,
        body: Option<&B>,
    ) -> Result<()> {
        self.send(method, route, body).await.map(|_| ())
    }
}
