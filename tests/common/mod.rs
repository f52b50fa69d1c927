//! In-process product API used by the HTTP and end-to-end tests.

#![allow(dead_code)]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, put},
    Json, Router,
};
use catalog_sync::model::{Product, ProductDraft, ProductId};
use serde_json::json;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;
use url::Url;

#[derive(Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub next_id: u64,
    /// Canned response for the next request, whatever its route.
    pub fail_next: Option<(StatusCode, String)>,
    /// Delay applied before every response.
    pub delay: Option<Duration>,
    pub requests: usize,
}

pub type Shared = Arc<Mutex<Catalog>>;

pub struct TestServer {
    pub url: Url,
    pub catalog: Shared,
}

impl TestServer {
    pub fn fail_next(&self, status: StatusCode, body: &str) {
        self.catalog.lock().unwrap().fail_next = Some((status, body.to_string()));
    }

    pub fn set_delay(&self, delay: Duration) {
        self.catalog.lock().unwrap().delay = Some(delay);
    }

    pub fn products(&self) -> Vec<Product> {
        self.catalog.lock().unwrap().products.clone()
    }

    pub fn requests(&self) -> usize {
        self.catalog.lock().unwrap().requests
    }
}

pub fn product(id: &str, name: &str, category: &str, price: f64) -> Product {
    Product::new(id, ProductDraft::new(name, category, price, 10, 0))
}

/// Serves `/products` on an ephemeral port.
pub async fn spawn_server(initial: Vec<Product>) -> TestServer {
    let catalog: Shared = Arc::new(Mutex::new(Catalog {
        products: initial,
        next_id: 100,
        ..Default::default()
    }));

    let app = Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/:id", put(update_product).delete(delete_product))
        .with_state(catalog.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    TestServer {
        url: Url::parse(&format!("http://{}", addr)).unwrap(),
        catalog,
    }
}

/// A base URL nothing listens on.
pub async fn closed_url() -> Url {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    Url::parse(&format!("http://{}", addr)).unwrap()
}

/// Counts the request, waits for the configured delay and returns a canned failure if
/// one is armed.
async fn intercept(state: &Shared) -> Option<Response> {
    let (delay, canned) = {
        let mut catalog = state.lock().unwrap();
        catalog.requests += 1;
        (catalog.delay, catalog.fail_next.take())
    };
    if let Some(delay) = delay {
        tokio::time::sleep(delay).await;
    }
    canned.map(|(status, body)| (status, body).into_response())
}

async fn list_products(State(state): State<Shared>) -> Response {
    if let Some(response) = intercept(&state).await {
        return response;
    }
    let products = state.lock().unwrap().products.clone();
    Json(products).into_response()
}

async fn create_product(State(state): State<Shared>, Json(draft): Json<ProductDraft>) -> Response {
    if let Some(response) = intercept(&state).await {
        return response;
    }
    if draft.name.trim().is_empty() {
        return (StatusCode::UNPROCESSABLE_ENTITY, "name is required").into_response();
    }

    let mut catalog = state.lock().unwrap();
    catalog.next_id += 1;
    let id = catalog.next_id;
    let product = Product::new(ProductId::Remote(id.to_string()), draft.clone());
    catalog.products.push(product);

    // Ids go out as JSON numbers.
    let body = json!({
        "id": id,
        "name": draft.name,
        "category": draft.category,
        "price": draft.price,
        "stock": draft.stock,
        "sales": draft.sales,
    });
    (StatusCode::CREATED, Json(body)).into_response()
}

async fn update_product(
    State(state): State<Shared>,
    Path(id): Path<String>,
    Json(draft): Json<ProductDraft>,
) -> Response {
    if let Some(response) = intercept(&state).await {
        return response;
    }
    let mut catalog = state.lock().unwrap();
    let id = ProductId::Remote(id);
    match catalog.products.iter_mut().find(|p| p.id == id) {
        Some(existing) => {
            *existing = Product::new(id, draft);
            Json(existing.clone()).into_response()
        }
        None => (StatusCode::NOT_FOUND, "no such product").into_response(),
    }
}

async fn delete_product(State(state): State<Shared>, Path(id): Path<String>) -> Response {
    if let Some(response) = intercept(&state).await {
        return response;
    }
    let mut catalog = state.lock().unwrap();
    let id = ProductId::Remote(id);
    let before = catalog.products.len();
    catalog.products.retain(|p| p.id != id);
    if catalog.products.len() == before {
        StatusCode::NOT_FOUND.into_response()
    } else {
        StatusCode::NO_CONTENT.into_response()
    }
}
