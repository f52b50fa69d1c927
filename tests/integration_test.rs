mod common;

use axum::http::StatusCode;
use catalog_sync::config::Config;
use catalog_sync::framework::RemoteError;
use catalog_sync::lifecycle::CatalogSystem;
use catalog_sync::model::{DraftError, ProductForm, ProductId};
use catalog_sync::product_actor::ProductError;
use catalog_sync::view::ScreenState;
use common::{closed_url, product, spawn_server};

/// Full end-to-end test: real actor, real HTTP client, in-process API.
#[tokio::test]
async fn test_full_catalog_round_trip() {
    let server = spawn_server(vec![
        product("w1", "Widget", "Hardware", 4.0),
        product("g1", "Gadget", "Tools", 9.0),
    ])
    .await;
    let system = CatalogSystem::new(Config::new(server.url.clone())).expect("Failed to start");
    let client = &system.product_client;

    assert_eq!(client.screen("").await.unwrap(), ScreenState::Loading);

    let loaded = client.load_products().await.expect("Failed to load");
    assert_eq!(loaded.len(), 2);

    // Create from the form, the way the create dialog does.
    let form = ProductForm {
        name: "Sprocket".to_string(),
        category: "Hardware".to_string(),
        price: "1.25".to_string(),
        stock: "40".to_string(),
        sales: "0".to_string(),
    };
    let created = client
        .create_from_form(&form)
        .await
        .expect("Failed to create product");
    assert_eq!(created.id, ProductId::from("101"));

    let hardware = client.search("HARD").await.unwrap();
    let names: Vec<&str> = hardware.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, vec!["Sprocket", "Widget"]);

    // Edit form pre-filled from the row, with one field changed.
    let mut edit = ProductForm::from(&created);
    edit.stock = "39".to_string();
    let updated = client
        .update_from_form(created.id.clone(), &edit)
        .await
        .expect("Failed to update product");
    assert_eq!(updated.stock, 39);

    client
        .delete_product(ProductId::from("g1"))
        .await
        .expect("Failed to delete product");

    // The local snapshot converged to what the server holds.
    let mut local = client.products().await.unwrap();
    let mut remote = server.products();
    local.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
    remote.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
    assert_eq!(local, remote);

    match client.screen("tools").await.unwrap() {
        ScreenState::Rows(rows) => assert!(rows.is_empty()),
        other => panic!("expected rows, got {:?}", other),
    }

    system.shutdown().await.expect("Failed to shut down");
}

#[tokio::test]
async fn test_invalid_form_is_not_sent() {
    let server = spawn_server(vec![]).await;
    let system = CatalogSystem::new(Config::new(server.url.clone())).unwrap();

    let form = ProductForm {
        price: "cheap".to_string(),
        ..ProductForm::default()
    };
    let err = system
        .product_client
        .create_from_form(&form)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        ProductError::Draft(DraftError::Field { field: "price", .. })
    ));
    assert_eq!(server.requests(), 0);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_failed_delete_rolls_back() {
    let server = spawn_server(vec![
        product("a", "Alpha", "Hardware", 1.0),
        product("abc", "Widget", "Hardware", 2.0),
        product("c", "Gamma", "Tools", 3.0),
    ])
    .await;
    let system = CatalogSystem::new(Config::new(server.url.clone())).unwrap();
    let client = &system.product_client;
    let before = client.load_products().await.unwrap();

    server.fail_next(StatusCode::INTERNAL_SERVER_ERROR, "db down");
    let err = client
        .delete_product(ProductId::from("abc"))
        .await
        .unwrap_err();
    assert!(matches!(
        err.remote(),
        Some(RemoteError::Server {
            status: Some(500),
            ..
        })
    ));
    assert_eq!(client.products().await.unwrap(), before);

    system.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_api_shows_error_screen() {
    let system = CatalogSystem::new(Config::new(closed_url().await)).unwrap();
    let client = &system.product_client;

    let err = client.load_products().await.unwrap_err();
    assert!(matches!(err.remote(), Some(RemoteError::Transport(_))));
    assert!(matches!(
        client.screen("").await.unwrap(),
        ScreenState::Error(_)
    ));

    system.shutdown().await.unwrap();
}
