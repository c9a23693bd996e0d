//! HTTP client for the expense service.
//!
//! The client never keeps hidden globals: a [`Session`] is created by the
//! caller and injected into the [`Transport`], which every API façade shares.

pub use auth::AuthApi;
pub use error::{ClientError, Result};
pub use expenses::ExpenseRepository;
pub use navigation::{Router, View};
pub use session::{Session, TOKEN_KEY};
pub use transport::{Item, Route, SessionEvent, Transport};

mod auth;
mod error;
mod expenses;
mod navigation;
mod session;
mod transport;

/// Bundles the transport with the auth and expense façades.
#[derive(Clone, Debug)]
pub struct Client {
    transport: Transport,
    auth: AuthApi,
    expenses: ExpenseRepository,
}

impl Client {
    pub fn new(base_url: &str, session: Session) -> Result<Self> {
        let transport = Transport::new(base_url, session)?;
        Ok(Self {
            auth: AuthApi::new(transport.clone()),
            expenses: ExpenseRepository::new(transport.clone()),
            transport,
        })
    }

    pub fn auth(&self) -> &AuthApi {
        &self.auth
    }

    pub fn expenses(&self) -> &ExpenseRepository {
        &self.expenses
    }

    pub fn session(&self) -> &Session {
        self.transport.session()
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<SessionEvent> {
        self.transport.subscribe()
    }
}
