//! Backend collaborators - identity and document storage
//!
//! - `subscription`: RAII subscription handles and listener sets
//! - `identity`: Identity provider trait and the local session implementation
//! - `store`: Document store trait and the local JSON-file implementation

mod identity;
mod store;
mod subscription;

pub use identity::{IdentityProvider, LocalIdentity, SharedIdentity};
pub use store::{Document, LocalStore, SharedStore};
pub use subscription::Subscription;

/// Subscriptions that belong to one signed-in identity. Replacing the
/// scope drops every handle in it.
#[derive(Debug, Default)]
pub struct SessionScope {
    pub uid: Option<String>,
    subscriptions: Vec<Subscription>,
}

impl SessionScope {
    pub fn new(uid: Option<String>) -> Self {
        Self {
            uid,
            subscriptions: Vec::new(),
        }
    }

    pub fn hold(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }
}
