//! Shared server state and the cookie-keyed session registry

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use dashmap::DashMap;
use pdf_scan::{ArtifactStore, DocumentSession, ScanOptions};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Name of the cookie carrying the session id
pub const SESSION_COOKIE: &str = "pdfscan_session";

/// A session guarded for exclusive use by one request at a time
pub type SharedSession = Arc<Mutex<DocumentSession>>;

pub struct AppState {
    pub store: Arc<dyn ArtifactStore>,
    pub options: Arc<ScanOptions>,
    pub sessions: SessionRegistry,
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ArtifactStore>,
        options: ScanOptions,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            store,
            options: Arc::new(options),
            sessions: SessionRegistry::default(),
            max_upload_bytes,
        }
    }
}

/// Sessions by id. Each session has its own lock, so requests from the same
/// browser run one after another while different browsers never contend.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: DashMap<String, SharedSession>,
}

impl SessionRegistry {
    /// The registered session named by the request cookie
    pub fn find(&self, jar: &CookieJar) -> Option<SharedSession> {
        let id = jar.get(SESSION_COOKIE)?.value();
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    /// The caller's session if it has one, otherwise an empty session that is
    /// dropped with the request.
    ///
    /// Nothing is registered and no cookie is issued, so requests that only
    /// read or remove state cannot grow the registry.
    pub fn existing(&self, jar: &CookieJar) -> SharedSession {
        self.find(jar).unwrap_or_default()
    }

    /// Find the session named by the request cookie, or register a new one.
    ///
    /// Unknown ids are not adopted; a fresh id is issued instead.
    pub fn resolve(&self, jar: CookieJar) -> (CookieJar, SharedSession) {
        if let Some(session) = self.find(&jar) {
            return (jar, session);
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = SharedSession::default();
        self.sessions.insert(id.clone(), session.clone());
        log::debug!("Started session {}", id);

        let cookie = Cookie::build((SESSION_COOKIE, id))
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax);
        (jar.add(cookie), session)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
