// Async HTTP client for a single REST task collection.
//
// `GET`/`POST` hit the collection URL, `PUT`/`DELETE` hit
// `{collection}/{id}`. No retries and no state beyond the HTTP client.

use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::{NewTask, TaskRecord, TaskUpdate};
use crate::transport::TransportConfig;

/// How much of an error body to keep in `RemoteRejection::message`.
const BODY_PREVIEW_LEN: usize = 200;

/// Async client for the task collection endpoint.
///
/// Cheap to share by reference; the inner `reqwest::Client` pools
/// connections.
#[derive(Debug, Clone)]
pub struct TaskClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl TaskClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `endpoint` (the collection URL, e.g.
    /// `http://localhost:3000/api/tasks`) from a transport config.
    pub fn new(endpoint: &str, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Self::from_reqwest(endpoint, http)
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(endpoint: &str, http: reqwest::Client) -> Result<Self, Error> {
        let endpoint = Self::normalize_endpoint(endpoint)?;
        Ok(Self { http, endpoint })
    }

    /// Parse the endpoint and strip trailing slashes so item URLs are
    /// always `{collection}/{id}`.
    fn normalize_endpoint(raw: &str) -> Result<Url, Error> {
        let mut url = Url::parse(raw)?;
        if url.cannot_be_a_base() {
            return Err(Error::InvalidEndpoint(raw.to_owned()));
        }
        let path = url.path().trim_end_matches('/').to_owned();
        url.set_path(&path);
        Ok(url)
    }

    /// The collection URL.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// `{collection}/{id}`, with `id` percent-encoded as a single segment.
    fn item_url(&self, id: &str) -> Result<Url, Error> {
        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidEndpoint(self.endpoint.to_string()))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    // ── Operations ───────────────────────────────────────────────────

    /// `GET {collection}`: the full collection in server order.
    pub async fn list(&self) -> Result<Vec<TaskRecord>, Error> {
        let url = self.endpoint.clone();
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        handle_response(resp).await
    }

    /// `POST {collection}`: create a record; the server assigns id and
    /// timestamps.
    pub async fn create(&self, task: &NewTask) -> Result<TaskRecord, Error> {
        let url = self.endpoint.clone();
        debug!("POST {url}");

        self.send_json(self.http.post(url), task).await
    }

    /// `PUT {collection}/{id}` with a partial body.
    pub async fn update(&self, id: &str, update: &TaskUpdate) -> Result<TaskRecord, Error> {
        let url = self.item_url(id)?;
        debug!("PUT {url}");

        self.send_json(self.http.put(url), update).await
    }

    /// `DELETE {collection}/{id}`. Any success status, including
    /// `204 No Content`, counts as deleted.
    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        let url = self.item_url(id)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        handle_empty(resp).await
    }

    async fn send_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        builder: reqwest::RequestBuilder,
        body: &B,
    ) -> Result<T, Error> {
        let resp = builder.json(body).send().await?;
        handle_response(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

async fn handle_response<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(rejection(status, resp).await);
    }

    let body = resp.text().await?;
    serde_json::from_str(&body).map_err(|e| {
        let preview = preview(&body);
        Error::Deserialization {
            message: format!("{e} (body preview: {preview:?})"),
            body,
        }
    })
}

async fn handle_empty(resp: reqwest::Response) -> Result<(), Error> {
    let status = resp.status();
    if status.is_success() {
        Ok(())
    } else {
        Err(rejection(status, resp).await)
    }
}

async fn rejection(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();
    let message = if raw.trim().is_empty() {
        status.to_string()
    } else {
        preview(&raw).to_owned()
    };
    Error::RemoteRejection {
        status: status.as_u16(),
        message,
    }
}

/// First `BODY_PREVIEW_LEN` bytes of `body`, cut on a char boundary.
fn preview(body: &str) -> &str {
    if body.len() <= BODY_PREVIEW_LEN {
        return body;
    }
    let mut end = BODY_PREVIEW_LEN;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
