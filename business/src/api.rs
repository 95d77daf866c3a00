//! Admin REST API client.
//!
//! Every endpoint answers with the same envelope:
//! `{"status": "ok" | "error", "msg": "...", "data": ..., "data2": ...}`.
//! A transport-level success can still carry `status: "error"`, so callers
//! always go through [`ApiEnvelope::into_result`].

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ConsoleConfig;
use crate::entity::{Entity, EntityId};
use crate::http::{Client, RequestBuilder, Response};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(String),
    #[error("API returned status: {0}")]
    Status(u16),
    #[error("Failed to parse response: {0}")]
    Decode(String),
    #[error("Failed to encode request: {0}")]
    Encode(String),
    #[error("{0}")]
    Server(String),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// The response wrapper shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(bound(deserialize = "T: DeserializeOwned, U: DeserializeOwned"))]
pub struct ApiEnvelope<T, U = Value> {
    pub status: String,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub data2: Option<U>,
}

impl<T, U> ApiEnvelope<T, U> {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }

    /// Returns `data`, or the server message as [`ApiError::Server`].
    ///
    /// A `null` data field becomes `T::default()`; the server sends `null`
    /// for empty lists and missing objects.
    pub fn into_result(self) -> ApiResult<T>
    where
        T: Default,
    {
        if self.is_ok() {
            Ok(self.data.unwrap_or_default())
        } else {
            Err(ApiError::Server(self.msg))
        }
    }

    /// Like [`into_result`](Self::into_result) but keeps `data2`.
    pub fn into_parts(self) -> ApiResult<(Option<T>, Option<U>)> {
        if self.is_ok() {
            Ok((self.data, self.data2))
        } else {
            Err(ApiError::Server(self.msg))
        }
    }
}

/// Result string of add/update/delete calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MutationOutcome {
    Affected,
    #[default]
    Unaffected,
}

impl MutationOutcome {
    pub fn is_affected(self) -> bool {
        matches!(self, Self::Affected)
    }
}

/// Authenticated client for one server.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    config: ConsoleConfig,
    user_agent: String,
}

impl ApiClient {
    pub fn new(config: ConsoleConfig) -> Self {
        Self {
            http: Client::new(),
            config,
            user_agent: console_utils::version_info::user_agent(),
        }
    }

    pub fn config(&self) -> &ConsoleConfig {
        &self.config
    }

    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/api/{}",
            self.config.server_url(),
            path.trim_start_matches('/')
        )
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let request = request.header("user-agent", self.user_agent.as_str());
        if let Some(token) = self.config.access_token() {
            request.bearer_auth(token)
        } else if let Some((id, secret)) = self.config.client_credentials() {
            request.basic_auth(id, secret)
        } else {
            request
        }
    }

    async fn send<T, U>(&self, request: RequestBuilder) -> ApiResult<ApiEnvelope<T, U>>
    where
        T: DeserializeOwned,
        U: DeserializeOwned,
    {
        let response = self
            .authorize(request)
            .send()
            .await
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        decode(&response)
    }

    /// GET `/api/{path}` with query parameters.
    pub async fn get<T, U>(&self, path: &str, query: &[(&str, &str)]) -> ApiResult<ApiEnvelope<T, U>>
    where
        T: DeserializeOwned,
        U: DeserializeOwned,
    {
        let mut request = self.http.get(self.endpoint(path));
        for (name, value) in query {
            request = request.query(*name, *value);
        }
        self.send(request).await
    }

    /// POST `/api/{path}` with a JSON body.
    pub async fn post_json<B, T, U>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        body: &B,
    ) -> ApiResult<ApiEnvelope<T, U>>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
        U: DeserializeOwned,
    {
        let mut request = self
            .http
            .post(self.endpoint(path))
            .json(body)
            .map_err(|e| ApiError::Encode(e.to_string()))?;
        for (name, value) in query {
            request = request.query(*name, *value);
        }
        self.send(request).await
    }

    /// POST `/api/{path}` with a form body.
    pub async fn post_form<T, U>(
        &self,
        path: &str,
        form: &[(&str, &str)],
    ) -> ApiResult<ApiEnvelope<T, U>>
    where
        T: DeserializeOwned,
        U: DeserializeOwned,
    {
        let request = self
            .http
            .post(self.endpoint(path))
            .form(form.iter().copied());
        self.send(request).await
    }
}

fn decode<T, U>(response: &Response) -> ApiResult<ApiEnvelope<T, U>>
where
    T: DeserializeOwned,
    U: DeserializeOwned,
{
    if !response.is_success() {
        log::warn!("API returned status {}", response.status);
        return Err(ApiError::Status(response.status));
    }
    response
        .json()
        .map_err(|e| ApiError::Decode(e.to_string()))
}

/// GET `/api/get-{kind}s?owner=`
pub async fn list_entities<E: Entity>(client: &ApiClient, owner: &str) -> ApiResult<Vec<E>> {
    let path = format!("get-{}", E::KIND.plural());
    client
        .get::<Vec<E>, Value>(&path, &[("owner", owner)])
        .await?
        .into_result()
}

/// GET `/api/get-{kind}?id=owner/name`; `None` when the server has no such entity.
pub async fn get_entity<E: Entity>(client: &ApiClient, id: &EntityId) -> ApiResult<Option<E>> {
    let path = format!("get-{}", E::KIND.singular());
    let id = id.to_string();
    client
        .get::<Option<E>, Value>(&path, &[("id", id.as_str())])
        .await?
        .into_result()
}

/// POST `/api/add-{kind}`
pub async fn add_entity<E: Entity>(client: &ApiClient, entity: &E) -> ApiResult<MutationOutcome> {
    let path = format!("add-{}", E::KIND.singular());
    log::info!("Adding {} {}", E::KIND, entity.id());
    client
        .post_json::<E, MutationOutcome, Value>(&path, &[], entity)
        .await?
        .into_result()
}

/// POST `/api/update-{kind}?id=owner/name`
///
/// `id` names the entity as the server knows it, which differs from
/// `entity.id()` when the edit renamed it.
pub async fn update_entity<E: Entity>(
    client: &ApiClient,
    id: &EntityId,
    entity: &E,
) -> ApiResult<MutationOutcome> {
    let path = format!("update-{}", E::KIND.singular());
    let id = id.to_string();
    log::info!("Updating {} {id}", E::KIND);
    client
        .post_json::<E, MutationOutcome, Value>(&path, &[("id", id.as_str())], entity)
        .await?
        .into_result()
}

/// POST `/api/delete-{kind}`
pub async fn delete_entity<E: Entity>(
    client: &ApiClient,
    entity: &E,
) -> ApiResult<MutationOutcome> {
    let path = format!("delete-{}", E::KIND.singular());
    log::info!("Deleting {} {}", E::KIND, entity.id());
    client
        .post_json::<E, MutationOutcome, Value>(&path, &[], entity)
        .await?
        .into_result()
}
