//! View routing driven by session events.

use std::sync::Arc;

use tokio::{
    sync::{Mutex, broadcast},
    task::JoinHandle,
};

use crate::{session::Session, transport::SessionEvent};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum View {
    Login,
    Signup,
    Home,
    Account,
}

impl View {
    pub fn requires_session(self) -> bool {
        matches!(self, Self::Home | Self::Account)
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Signup => "signup",
            Self::Home => "home",
            Self::Account => "account",
        }
    }
}

#[derive(Debug)]
struct RouterState {
    current: View,
    history: Vec<View>,
}

/// Tracks the current view and sends the user to login when the session ends.
#[derive(Clone, Debug)]
pub struct Router {
    inner: Arc<Mutex<RouterState>>,
}

impl Router {
    pub fn new(initial: View) -> Self {
        Self {
            inner: Arc::new(Mutex::new(RouterState {
                current: initial,
                history: Vec::new(),
            })),
        }
    }

    pub async fn current(&self) -> View {
        self.inner.lock().await.current
    }

    /// Every navigation performed so far, oldest first.
    pub async fn history(&self) -> Vec<View> {
        self.inner.lock().await.history.clone()
    }

    /// Moves to `view`. Returns `false` when already there.
    pub async fn navigate(&self, view: View) -> bool {
        let mut guard = self.inner.lock().await;
        if guard.current == view {
            return false;
        }
        guard.current = view;
        guard.history.push(view);
        true
    }

    /// Redirects to login unless the user is already on it.
    pub async fn on_session_expired(&self) -> bool {
        let navigated = self.navigate(View::Login).await;
        if navigated {
            tracing::info!("session expired, redirecting to login");
        }
        navigated
    }

    /// Protected-route check: views that need a session fall back to login.
    pub async fn guard(view: View, session: &Session) -> View {
        if view.requires_session() && session.get().await.is_none() {
            return View::Login;
        }
        view
    }

    /// Navigates to `view`, or to login if it is protected and there is no token.
    pub async fn open(&self, view: View, session: &Session) -> View {
        let target = Self::guard(view, session).await;
        self.navigate(target).await;
        target
    }

    /// Applies every event already queued on `events` without waiting.
    ///
    /// Returns whether any of them caused a navigation.
    pub async fn handle_pending(&self, events: &mut broadcast::Receiver<SessionEvent>) -> bool {
        let mut navigated = false;
        loop {
            match events.try_recv() {
                Ok(SessionEvent::Expired) | Err(broadcast::error::TryRecvError::Lagged(_)) => {
                    navigated |= self.on_session_expired().await;
                }
                Err(
                    broadcast::error::TryRecvError::Empty
                    | broadcast::error::TryRecvError::Closed,
                ) => break,
            }
        }
        navigated
    }

    /// Consumes transport events until the channel closes.
    pub fn follow(self, mut events: broadcast::Receiver<SessionEvent>) -> JoinHandle<()> {
        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(SessionEvent::Expired) => {
                        self.on_session_expired().await;
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!("router lagged behind {skipped} session events");
                        self.on_session_expired().await;
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }
}
