//! Axum route guard that enforces page access on requests.
//!
//! The guard reads the [`Session`] placed in request extensions by the
//! upstream authenticator and checks the page gate for the request path.
//! Unauthenticated requests are redirected to the login page; requests the
//! session's role may not reach are redirected to the fallback page.

use axum::{
    body::Body,
    extract::{FromRequestParts, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Redirect, Response},
    Json,
};
use futures::future::BoxFuture;
use std::sync::Arc;
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::{debug, warn};

use super::gate::PageGate;
use super::scope::AccessScope;
use super::session::Session;
use crate::org::SharedTree;

/// Where unauthenticated requests are sent.
pub const DEFAULT_LOGIN_PATH: &str = "/login";
/// Where denied requests are sent.
pub const DEFAULT_FALLBACK_PATH: &str = "/dashboard";

// ═══════════════════════════════════════════════════════════════════════════════
// RBAC Context (extracted in handlers)
// ═══════════════════════════════════════════════════════════════════════════════

/// Authorization context resolved by the route guard.
///
/// Handlers filter their data through `scope` instead of re-deriving it from
/// the session.
#[derive(Debug, Clone)]
pub struct RbacContext {
    /// The authenticated session.
    pub session: Session,
    /// Units visible to the session, resolved against the tree at request time.
    pub scope: Arc<AccessScope>,
}

impl RbacContext {
    pub fn can_see_unit(&self, unit_id: &str) -> bool {
        self.scope.contains(unit_id)
    }
}

/// Axum extractor for `RbacContext`.
#[axum::async_trait]
impl<S> FromRequestParts<S> for RbacContext
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RbacContext>()
            .cloned()
            .ok_or_else(|| {
                let body = serde_json::json!({
                    "success": false,
                    "error": {
                        "code": "MISSING_RBAC_CONTEXT",
                        "message": "Authorization context not available. Ensure the page access layer is applied.",
                    }
                });
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Layer
// ═══════════════════════════════════════════════════════════════════════════════

/// Layer that wraps services with page access enforcement.
///
/// # Example
///
/// ```rust,ignore
/// use garrison_core::rbac::{PageGate, RequirePageAccessLayer};
///
/// let app = Router::new()
///     .route("/data", get(data_page))
///     .layer(RequirePageAccessLayer::new(Arc::new(PageGate::default()), tree.clone()));
/// ```
#[derive(Clone)]
pub struct RequirePageAccessLayer {
    gate: Arc<PageGate>,
    tree: SharedTree,
    login_path: Arc<str>,
    fallback_path: Arc<str>,
}

impl RequirePageAccessLayer {
    pub fn new(gate: Arc<PageGate>, tree: SharedTree) -> Self {
        Self {
            gate,
            tree,
            login_path: Arc::from(DEFAULT_LOGIN_PATH),
            fallback_path: Arc::from(DEFAULT_FALLBACK_PATH),
        }
    }

    pub fn with_login_path(mut self, path: &str) -> Self {
        self.login_path = Arc::from(path);
        self
    }

    pub fn with_fallback_path(mut self, path: &str) -> Self {
        self.fallback_path = Arc::from(path);
        self
    }
}

impl<S> Layer<S> for RequirePageAccessLayer {
    type Service = RequirePageAccessService<S>;

    fn layer(&self, inner: S) -> Self::Service {
        RequirePageAccessService {
            inner,
            gate: self.gate.clone(),
            tree: self.tree.clone(),
            login_path: self.login_path.clone(),
            fallback_path: self.fallback_path.clone(),
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tower Service
// ═══════════════════════════════════════════════════════════════════════════════

/// Service that checks the page gate per request.
#[derive(Clone)]
pub struct RequirePageAccessService<S> {
    inner: S,
    gate: Arc<PageGate>,
    tree: SharedTree,
    login_path: Arc<str>,
    fallback_path: Arc<str>,
}

impl<S> Service<Request<Body>> for RequirePageAccessService<S>
where
    S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = S::Error;
    type Future = BoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<Body>) -> Self::Future {
        let gate = self.gate.clone();
        let tree = self.tree.clone();
        let login_path = self.login_path.clone();
        let fallback_path = self.fallback_path.clone();
        let mut inner = self.inner.clone();

        Box::pin(async move {
            let path = request.uri().path().to_string();

            let Some(session) = request.extensions().get::<Session>().cloned() else {
                debug!(path = %path, "No session; redirecting to login");
                return Ok(Redirect::to(&login_path).into_response());
            };

            let decision = gate.decide(Some(session.role), &path);
            if decision.is_denied() {
                warn!(
                    role = %session.role,
                    home_unit_id = %session.home_unit_id,
                    path = %path,
                    "Page access denied"
                );
                metrics::counter!(
                    "garrison_page_access_denied_total",
                    "role" => session.role.id()
                )
                .increment(1);
                return Ok(Redirect::to(&fallback_path).into_response());
            }

            let scope = session.scope(&tree.snapshot());
            request.extensions_mut().insert(RbacContext {
                session,
                scope: Arc::new(scope),
            });

            inner.call(request).await
        })
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════════
