//! reqwest-backed [`RemoteResource`] for the `/products` collection.

use crate::config::Config;
use crate::framework::{RemoteError, RemoteResource};
use crate::model::{Product, ProductDraft, ProductId};
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument, warn};
use url::Url;

const COLLECTION: &str = "products";

/// HTTP client for the product REST API.
///
/// | Operation | Request                  |
/// |-----------|--------------------------|
/// | list      | `GET /products`          |
/// | create    | `POST /products`         |
/// | update    | `PUT /products/{id}`     |
/// | delete    | `DELETE /products/{id}`  |
///
/// Every call is exactly one request. Placeholder ids are refused with
/// [`RemoteError::NotFound`] before anything goes on the wire.
#[derive(Clone, Debug)]
pub struct HttpProductClient {
    base_url: Url,
    client: reqwest::Client,
}

impl HttpProductClient {
    /// Builds a client from the base URL and timeout in `config`.
    pub fn new(config: &Config) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| RemoteError::Transport(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(config.base_url.clone(), client))
    }

    /// Uses an existing reqwest client, e.g. one shared with other services.
    pub fn with_client(base_url: Url, client: reqwest::Client) -> Self {
        Self { base_url, client }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/products` or `{base}/products/{id}`, keeping any path prefix of the base.
    fn endpoint(&self, id: Option<&str>) -> Result<Url, RemoteError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| RemoteError::Transport(format!("{} cannot be a base URL", self.base_url)))?
            .pop_if_empty()
            .push(COLLECTION)
            .extend(id);
        Ok(url)
    }

    fn request(&self, method: Method, id: Option<&str>) -> Result<RequestBuilder, RemoteError> {
        let url = self.endpoint(id)?;
        debug!(%method, %url, "Sending request");
        Ok(self.client.request(method, url))
    }
}

#[async_trait]
impl RemoteResource<Product> for HttpProductClient {
    #[instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Product>, RemoteError> {
        let response = send(self.request(Method::GET, None)?).await?;
        match response.status() {
            status if status.is_success() => decode(response).await,
            _ => Err(server_error(response).await),
        }
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: ProductDraft) -> Result<Product, RemoteError> {
        let response = send(self.request(Method::POST, None)?.json(&draft)).await?;
        match response.status() {
            status if status.is_success() => decode(response).await,
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(validation_error(response).await)
            }
            _ => Err(server_error(response).await),
        }
    }

    #[instrument(skip(self, draft), fields(id = %id))]
    async fn update(&self, id: ProductId, draft: ProductDraft) -> Result<Product, RemoteError> {
        let remote_id = remote_id(&id)?;
        let response = send(self.request(Method::PUT, Some(remote_id))?.json(&draft)).await?;
        match response.status() {
            status if status.is_success() => decode(response).await,
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound(id.to_string())),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                Err(validation_error(response).await)
            }
            _ => Err(server_error(response).await),
        }
    }

    #[instrument(skip(self), fields(id = %id))]
    async fn delete(&self, id: ProductId) -> Result<(), RemoteError> {
        let remote_id = remote_id(&id)?;
        let response = send(self.request(Method::DELETE, Some(remote_id))?).await?;
        match response.status() {
            status if status.is_success() => Ok(()),
            StatusCode::NOT_FOUND | StatusCode::GONE => {
                debug!(status = response.status().as_u16(), "Already deleted");
                Ok(())
            }
            _ => Err(server_error(response).await),
        }
    }
}

fn remote_id(id: &ProductId) -> Result<&str, RemoteError> {
    match id {
        ProductId::Remote(id) => Ok(id),
        ProductId::Local(_) => {
            warn!(%id, "Refusing to send a placeholder id");
            Err(RemoteError::NotFound(id.to_string()))
        }
    }
}

async fn send(request: RequestBuilder) -> Result<Response, RemoteError> {
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            RemoteError::Transport(format!("Request timed out: {}", e))
        } else {
            RemoteError::Transport(e.to_string())
        }
    })?;
    debug!(status = response.status().as_u16(), "Received response");
    Ok(response)
}

async fn decode<V: DeserializeOwned>(response: Response) -> Result<V, RemoteError> {
    let status = response.status().as_u16();
    let body = response
        .bytes()
        .await
        .map_err(|e| RemoteError::Transport(e.to_string()))?;
    serde_json::from_slice(&body).map_err(|e| RemoteError::Server {
        status: Some(status),
        message: format!("Undecodable response body: {}", e),
    })
}

async fn server_error(response: Response) -> RemoteError {
    let status = response.status();
    RemoteError::Server {
        status: Some(status.as_u16()),
        message: message(response).await,
    }
}

async fn validation_error(response: Response) -> RemoteError {
    let status = response.status();
    RemoteError::Validation {
        status: status.as_u16(),
        message: message(response).await,
    }
}

/// The response body, or the canonical reason when the body is empty or unreadable.
async fn message(response: Response) -> String {
    let status = response.status();
    match response.text().await {
        Ok(text) if !text.trim().is_empty() => text,
        _ => status.canonical_reason().unwrap_or("Unknown status").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::framework::{EntityId, LocalKey};

    fn client(base: &str) -> HttpProductClient {
        HttpProductClient::new(&Config::new(Url::parse(base).unwrap())).unwrap()
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let http = client("https://api.example.com/v1/");
        assert_eq!(
            http.endpoint(None).unwrap().as_str(),
            "https://api.example.com/v1/products"
        );

        let http = client("https://api.example.com/v1");
        assert_eq!(
            http.endpoint(Some("abc")).unwrap().as_str(),
            "https://api.example.com/v1/products/abc"
        );
    }

    #[test]
    fn test_endpoint_escapes_id() {
        let http = client("http://localhost:3000");
        assert_eq!(
            http.endpoint(Some("a/b c")).unwrap().as_str(),
            "http://localhost:3000/products/a%2Fb%20c"
        );
    }

    #[tokio::test]
    async fn test_placeholder_ids_are_refused_without_a_request() {
        // Nothing listens on port 9; any real request would fail with Transport.
        let http = client("http://127.0.0.1:9");
        let id = ProductId::local(LocalKey(1));
        let err = http
            .update(id.clone(), ProductDraft::new("X", "Y", 1.0, 0, 0))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::NotFound("local_1".to_string()));
        assert_eq!(
            http.delete(id).await.unwrap_err(),
            RemoteError::NotFound("local_1".to_string())
        );
    }
}
