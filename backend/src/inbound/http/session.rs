//! Session helpers that resolve the authenticated tenant.
//!
//! The tenant id is written to the cookie session at login (outside this
//! service) and read back here; handlers never touch raw session keys.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, TenantId};

pub(crate) const TENANT_ID_KEY: &str = "tenant_id";

/// Newtype wrapper that exposes tenant-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    /// Construct a new wrapper from the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated tenant in the session cookie.
    pub fn persist_tenant(&self, tenant_id: &TenantId) -> Result<(), Error> {
        self.0
            .insert(TENANT_ID_KEY, tenant_id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// Fetch the current tenant from the session, if present and well formed.
    pub fn tenant_id(&self) -> Result<Option<TenantId>, Error> {
        let raw = self
            .0
            .get::<String>(TENANT_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|value| match TenantId::new(&value) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid tenant id in session cookie");
                None
            }
        }))
    }

    /// Require an authenticated tenant or return `401 Unauthorized`.
    pub fn require_tenant_id(&self) -> Result<TenantId, Error> {
        self.tenant_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}
