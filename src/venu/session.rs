//! Session tracking for the application root.
//!
//! The provider owns every visitor's state: which screen their view router
//! is on and, once they authenticate, the session issued by the auth
//! collaborator. Handlers notify the provider on every session change and
//! the provider republishes those changes on a broadcast channel; the
//! listener spawned at startup consumes that stream for the lifetime of the
//! process and is aborted on shutdown.

use crate::supabase::auth::AuthSession;
use crate::venu::view::{Intent, Screen, ViewRouter};
use secrecy::SecretString;
use std::collections::HashMap;
use tokio::sync::{broadcast, RwLock};
use ulid::Ulid;
use uuid::Uuid;

/// The authenticated identity attached to one visitor.
#[derive(Debug, Clone)]
pub struct Session {
    pub user_id: Uuid,
    pub email: String,
    pub access_token: SecretString,
}

impl From<AuthSession> for Session {
    fn from(auth: AuthSession) -> Self {
        Self {
            user_id: auth.user_id,
            email: auth.email,
            access_token: auth.access_token,
        }
    }
}

/// Session-changed notification. Carries no tokens so it is safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    SignedIn { visitor: Ulid, user_id: Uuid },
    SignedOut { visitor: Ulid },
}

#[derive(Debug)]
struct Visitor {
    router: ViewRouter,
    session: Option<Session>,
}

impl Visitor {
    fn new() -> Self {
        Self {
            router: ViewRouter::new(),
            session: None,
        }
    }
}

/// Owns all per-visitor state for the lifetime of the application.
#[derive(Debug)]
pub struct SessionProvider {
    visitors: RwLock<HashMap<Ulid, Visitor>>,
    events: broadcast::Sender<SessionEvent>,
}

impl Default for SessionProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionProvider {
    #[must_use]
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(16);
        Self {
            visitors: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Subscribe to session-changed notifications.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    /// Register a visitor; their view router starts in the loading state.
    pub async fn ensure(&self, visitor: Ulid) {
        self.visitors
            .write()
            .await
            .entry(visitor)
            .or_insert_with(Visitor::new);
    }

    /// Complete a visitor's initial session lookup.
    pub async fn resolve(&self, visitor: Ulid, session: Option<Session>) {
        if let Some(state) = self.visitors.write().await.get_mut(&visitor) {
            state.router.resolve(session.is_some());
            state.session = session;
        }
    }

    /// Admit a brand-new visitor.
    ///
    /// A first-time browser carries no credential, so the initial lookup
    /// resolves to anonymous immediately.
    pub async fn admit(&self) -> Ulid {
        let visitor = Ulid::new();
        self.ensure(visitor).await;
        self.resolve(visitor, None).await;
        visitor
    }

    /// Apply a session change from the auth collaborator and notify
    /// subscribers.
    pub async fn session_changed(&self, visitor: Ulid, session: Option<Session>) {
        let event = {
            let mut visitors = self.visitors.write().await;
            let Some(state) = visitors.get_mut(&visitor) else {
                return;
            };

            state.router.set_authenticated(session.is_some());
            let event = match &session {
                Some(session) => SessionEvent::SignedIn {
                    visitor,
                    user_id: session.user_id,
                },
                None => SessionEvent::SignedOut { visitor },
            };
            state.session = session;
            event
        };

        // Nobody listening is fine; the channel is observability, not control
        let _ = self.events.send(event);
    }

    /// Apply a navigation intent for one visitor.
    pub async fn apply_intent(&self, visitor: Ulid, intent: Intent) {
        if let Some(state) = self.visitors.write().await.get_mut(&visitor) {
            state.router.apply(intent);
        }
    }

    /// Move a visitor to the terminal success screen after their row was
    /// inserted.
    pub async fn complete_submission(&self, visitor: Ulid) {
        self.apply_intent(visitor, Intent::SubmissionSucceeded).await;
    }

    /// The screen this visitor should currently see.
    pub async fn screen(&self, visitor: Ulid) -> Option<Screen> {
        self.visitors
            .read()
            .await
            .get(&visitor)
            .map(|state| state.router.screen())
    }

    /// The visitor's session, if they are authenticated.
    pub async fn session(&self, visitor: Ulid) -> Option<Session> {
        self.visitors
            .read()
            .await
            .get(&visitor)
            .and_then(|state| state.session.clone())
    }
}
