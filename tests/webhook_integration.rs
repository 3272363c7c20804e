//! Integration tests for the webhook listener.

#![cfg(feature = "webhook")]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use payment_crypto::api::CryptoPayClient;
use payment_crypto::webhook::{sign_body, Update, UpdateType, WebhookConfig};
use serde_json::json;
use tokio::sync::mpsc;
use tower::ServiceExt;

const TOKEN: &str = "12345:AAzQcZWQqQAbsfgPnOLr4FHC8Doa4L7KryC";

fn update_body(update_id: i64) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "update_id": update_id,
        "update_type": "invoice_paid",
        "request_date": "2024-01-15T10:30:00.000Z",
        "payload": {
            "invoice_id": 42,
            "hash": "IVabc",
            "currency_type": "crypto",
            "asset": "USDT",
            "amount": "10",
            "bot_invoice_url": "https://t.me/CryptoBot?start=IVabc",
            "status": "paid",
            "created_at": "2024-01-15T10:00:00.000Z",
            "paid_at": "2024-01-15T10:30:00.000Z"
        }
    }))
    .unwrap()
}

fn signed_request(uri: &str, body: Vec<u8>, signature: Option<String>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        builder = builder.header("crypto-pay-api-signature", signature);
    }
    builder.body(Body::from(body)).unwrap()
}

fn client() -> CryptoPayClient {
    CryptoPayClient::builder(TOKEN)
        .webhook(WebhookConfig::new().with_path("/hooks/crypto"))
        .build()
        .unwrap()
}

async fn recv(receiver: &mut mpsc::UnboundedReceiver<Update>) -> Update {
    tokio::time::timeout(Duration::from_secs(5), receiver.recv())
        .await
        .expect("update was not dispatched")
        .expect("channel closed")
}

// =============================================================================
// Router
// =============================================================================

#[tokio::test]
async fn test_valid_update_accepted_and_dispatched() {
    let client = client();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    client.on(UpdateType::InvoicePaid, move |update| {
        let _ = sender.send(update.clone());
    });

    let body = update_body(1);
    let signature = sign_body(TOKEN, &body);
    let response = client
        .webhook_router()
        .unwrap()
        .oneshot(signed_request("/hooks/crypto", body, Some(signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let update = recv(&mut receiver).await;
    assert_eq!(update.update_id, 1);
    assert_eq!(update.request_date, 1705314600000);
    let invoice = update.invoice().unwrap();
    assert_eq!(invoice.amount, 10.0);
    assert_eq!(invoice.paid_at, Some(1705314600000));
}

#[tokio::test]
async fn test_bad_signature_rejected() {
    let client = client();
    let called = Arc::new(Mutex::new(false));
    let flag = called.clone();
    client.on(UpdateType::InvoicePaid, move |_| *flag.lock().unwrap() = true);

    let body = update_body(2);
    let signature = sign_body("another-token", &body);
    let response = client
        .webhook_router()
        .unwrap()
        .oneshot(signed_request("/hooks/crypto", body, Some(signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(!*called.lock().unwrap());
}

#[tokio::test]
async fn test_missing_signature_rejected() {
    let response = client()
        .webhook_router()
        .unwrap()
        .oneshot(signed_request("/hooks/crypto", update_body(3), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_malformed_body_with_valid_signature() {
    let body = b"{\"hello\": \"world\"}".to_vec();
    let signature = sign_body(TOKEN, &body);
    let response = client()
        .webhook_router()
        .unwrap()
        .oneshot(signed_request("/hooks/crypto", body, Some(signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_paths_not_routed() {
    let body = update_body(4);
    let signature = sign_body(TOKEN, &body);
    let response = client()
        .webhook_router()
        .unwrap()
        .oneshot(signed_request("/elsewhere", body, Some(signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_default_path_is_token() {
    let client = CryptoPayClient::new(TOKEN).unwrap();
    let body = update_body(5);
    let signature = sign_body(TOKEN, &body);
    let response = client
        .webhook_router()
        .unwrap()
        .oneshot(signed_request(&format!("/{}", TOKEN), body, Some(signature)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_full_queue_answers_server_error() {
    let client = CryptoPayClient::builder(TOKEN)
        .webhook(
            WebhookConfig::new()
                .with_path("/hooks/crypto")
                .with_queue_capacity(1),
        )
        .build()
        .unwrap();

    let (started_tx, mut started) = mpsc::unbounded_channel();
    let (release_tx, release_rx) = std::sync::mpsc::channel::<()>();
    let release_rx = Mutex::new(release_rx);
    client.on(UpdateType::InvoicePaid, move |update| {
        let _ = started_tx.send(update.clone());
        // Blocks until the sender side is dropped.
        let _ = release_rx.lock().unwrap().recv();
    });

    let router = client.webhook_router().unwrap();
    let deliver = |update_id: i64| {
        let body = update_body(update_id);
        let signature = sign_body(TOKEN, &body);
        router
            .clone()
            .oneshot(signed_request("/hooks/crypto", body, Some(signature)))
    };

    // First update is taken by the dispatcher and stalls in the callback.
    assert_eq!(deliver(30).await.unwrap().status(), StatusCode::OK);
    assert_eq!(recv(&mut started).await.update_id, 30);

    // Second fills the queue, third is refused.
    assert_eq!(deliver(31).await.unwrap().status(), StatusCode::OK);
    assert_eq!(
        deliver(32).await.unwrap().status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );

    drop(release_tx);
    assert_eq!(recv(&mut started).await.update_id, 31);
}

#[tokio::test]
async fn test_updates_dispatched_in_order() {
    let client = client();
    let (sender, mut receiver) = mpsc::unbounded_channel();
    client.on(UpdateType::InvoicePaid, move |update| {
        let _ = sender.send(update.clone());
    });

    let router = client.webhook_router().unwrap();
    for update_id in 10..13 {
        let body = update_body(update_id);
        let signature = sign_body(TOKEN, &body);
        let response = router
            .clone()
            .oneshot(signed_request("/hooks/crypto", body, Some(signature)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    for expected in 10..13 {
        assert_eq!(recv(&mut receiver).await.update_id, expected);
    }
}

// =============================================================================
// Listener
// =============================================================================

#[tokio::test]
async fn test_listener_end_to_end() {
    let client = CryptoPayClient::builder(TOKEN)
        .webhook(
            WebhookConfig::new()
                .with_path("/hooks/crypto")
                .with_host("127.0.0.1".parse().unwrap())
                .with_port(0),
        )
        .build()
        .unwrap();

    let (sender, mut receiver) = mpsc::unbounded_channel();
    client.on(UpdateType::InvoicePaid, move |update| {
        let _ = sender.send(update.clone());
    });

    let server = client.start_webhook().await.unwrap();
    let url = format!("http://{}/hooks/crypto", server.local_addr());

    let body = update_body(20);
    let response = reqwest::Client::new()
        .post(&url)
        .header("crypto-pay-api-signature", sign_body(TOKEN, &body))
        .body(body)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(recv(&mut receiver).await.update_id, 20);

    server.shutdown();
}
