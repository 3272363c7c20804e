//! HTTP listener receiving webhook updates.
//!
//! Each POST to the webhook route is checked against the signature header,
//! parsed, normalized and queued for the dispatcher task, which runs the
//! registered callbacks one update at a time in arrival order.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::Router;
use tokio::net::TcpListener;
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::api::CryptoPayClient;
use crate::network::SIGNATURE_HEADER;
use crate::webhook::config::{validate_path, WebhookConfig, DEFAULT_QUEUE_CAPACITY};
use crate::webhook::error::{WebhookError, WebhookResult};
use crate::webhook::handlers::UpdateHandlers;
use crate::webhook::signature::SignatureVerifier;
use crate::webhook::types::{Update, UpdateType};

#[derive(Clone)]
struct WebhookState {
    verifier: Arc<SignatureVerifier>,
    sender: mpsc::Sender<Update>,
}

/// Build the webhook router and spawn its dispatcher task.
///
/// At most `queue_capacity` updates wait for dispatch; further deliveries
/// are answered with `500` so the sender retries them later.
pub fn router(
    token: &str,
    route: &str,
    queue_capacity: usize,
    handlers: UpdateHandlers,
) -> WebhookResult<Router> {
    validate_path(route)?;
    if queue_capacity == 0 {
        return Err(WebhookError::InvalidQueueCapacity);
    }
    let runtime = Handle::try_current().map_err(|_| WebhookError::NoRuntime)?;

    let (sender, receiver) = mpsc::channel(queue_capacity);
    runtime.spawn(run_dispatcher(handlers, receiver));

    let state = WebhookState {
        verifier: Arc::new(SignatureVerifier::new(token)),
        sender,
    };

    Ok(Router::new()
        .route(route, post(receive_update))
        .with_state(state))
}

async fn run_dispatcher(handlers: UpdateHandlers, mut receiver: mpsc::Receiver<Update>) {
    while let Some(update) = receiver.recv().await {
        let update_id = update.update_id;
        let handlers = handlers.clone();
        // Callbacks are synchronous; keep them off the async workers.
        match tokio::task::spawn_blocking(move || handlers.dispatch(&update)).await {
            Ok(completed) => {
                tracing::debug!(update_id, completed, "Dispatched webhook update");
            }
            Err(e) => {
                tracing::error!(update_id, error = %e, "Update dispatch task failed");
            }
        }
    }
    tracing::debug!("Webhook dispatcher stopped");
}

async fn receive_update(
    State(state): State<WebhookState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode, WebhookError> {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or(WebhookError::MissingSignature)?;

    if !state.verifier.verify(&body, signature) {
        return Err(WebhookError::SignatureMismatch);
    }

    let update = Update::parse(&body)?;
    tracing::info!(
        update_id = update.update_id,
        update_type = %update.update_type,
        "Received webhook update"
    );

    state.sender.try_send(update)?;
    Ok(StatusCode::OK)
}

/// A webhook listener bound to its address but not yet serving.
#[derive(Debug)]
pub struct WebhookListener {
    listener: TcpListener,
    router: Router,
}

impl WebhookListener {
    /// Bind the address configured for `client`.
    pub async fn bind(client: &CryptoPayClient) -> WebhookResult<Self> {
        let config = client.webhook.as_ref().ok_or(WebhookError::NotConfigured)?;
        let router = client.webhook_router()?;

        let addr = SocketAddr::new(config.host, config.port);
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| WebhookError::Bind { addr, source })?;

        Ok(Self { listener, router })
    }

    pub fn local_addr(&self) -> WebhookResult<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve on the current task until the listener fails.
    pub async fn run(self) -> WebhookResult<()> {
        axum::serve(self.listener, self.router).await?;
        Ok(())
    }

    /// Serve on a background task.
    pub fn spawn(self) -> WebhookResult<WebhookServer> {
        let local_addr = self.local_addr()?;
        tracing::info!(%local_addr, "Webhook listener started");

        let task = tokio::spawn(async move {
            if let Err(e) = self.run().await {
                tracing::error!(error = %e, "Webhook listener stopped");
            }
        });

        Ok(WebhookServer { local_addr, task })
    }
}

/// Handle to a running webhook listener.
///
/// Dropping the handle leaves the listener running.
#[derive(Debug)]
pub struct WebhookServer {
    local_addr: SocketAddr,
    task: JoinHandle<()>,
}

impl WebhookServer {
    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop accepting updates.
    pub fn shutdown(self) {
        self.task.abort();
    }
}

// =============================================================================
// Client integration
// =============================================================================

impl CryptoPayClient {
    /// Register a callback for an update type.
    ///
    /// Callbacks for the same type run in registration order. They run on a
    /// blocking thread, one update at a time. A callback that stalls holds up
    /// the queue; once it is full, new deliveries get `500` until it drains.
    pub fn on<F>(&self, update_type: UpdateType, callback: F)
    where
        F: Fn(&Update) + Send + Sync + 'static,
    {
        self.handlers.on(update_type, callback);
    }

    /// Webhook configuration, if enabled.
    pub fn webhook_config(&self) -> Option<&WebhookConfig> {
        self.webhook.as_ref()
    }

    /// Route the listener serves. Defaults to `/<token>`.
    pub fn webhook_path(&self) -> String {
        match &self.webhook {
            Some(config) => config.route(&self.token),
            None => WebhookConfig::default().route(&self.token),
        }
    }

    /// Build an axum router for mounting the webhook in an existing server.
    ///
    /// Fails with [`WebhookError::NoRuntime`] outside a Tokio runtime.
    pub fn webhook_router(&self) -> WebhookResult<Router> {
        let queue_capacity = self
            .webhook
            .as_ref()
            .map_or(DEFAULT_QUEUE_CAPACITY, |config| config.queue_capacity);
        router(
            &self.token,
            &self.webhook_path(),
            queue_capacity,
            self.handlers.clone(),
        )
    }

    /// Bind the configured address and start receiving updates.
    pub async fn start_webhook(&self) -> WebhookResult<WebhookServer> {
        WebhookListener::bind(self).await?.spawn()
    }
}
