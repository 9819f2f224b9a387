//! # contract: collaborator interfaces for the sync pipeline
//!
//! This module defines the two traits the reconciliation core depends on —
//! [`PosClient`] for the point-of-sale backend and [`MailingList`] for the
//! listmonk subscriber service — together with the plain data types that
//! cross those boundaries.
//!
//! ## Interface & Extensibility
//! - Implement [`PosClient`] for new POS backends; implement [`MailingList`]
//!   for other subscriber stores.
//! - All methods are async. POS failures are opaque boxed errors; mailing
//!   list failures are classified ([`MailingListError`]) so the caller can
//!   distinguish remote validation rejections from transport faults.
//!
//! ## Mocking & Testing
//! - Both traits are annotated for `mockall`, so consumers can generate
//!   deterministic mocks for unit/integration tests.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{Map, Value};

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// A customer record as returned by the POS roster endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customer {
    pub server_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email_address: String,
    pub point: i64,
    pub phone_numbers: Vec<String>,
    /// Milliseconds since the Unix epoch; 0 means "no visit recorded".
    pub last_visit_date: i64,
    pub addresses: Vec<Address>,
}

/// A customer's postal address. Only `zip_code` participates in the sync.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Address {
    pub address: String,
    pub address2: String,
    pub city: String,
    pub state: String,
    pub zip_code: String,
}

/// A subscriber record in the mailing-list service, keyed by email.
#[derive(Debug, Clone, Deserialize)]
pub struct Subscriber {
    pub id: u32,
    pub email: String,
    pub name: String,
    pub status: String,
    #[serde(default)]
    pub lists: Vec<ListMembership>,
    /// Free-form attribute map; a prior sync stores `lastVisit`, `zipCode`
    /// and `phone` here.
    #[serde(default)]
    pub attribs: Map<String, Value>,
}

/// A list the subscriber belongs to. Extra listmonk fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ListMembership {
    pub id: u32,
}

/// Request payload to create a subscriber.
pub struct NewSubscriber<'a> {
    pub email: &'a str,
    pub name: &'a str,
    pub list_ids: Vec<u32>,
    pub attribs: Map<String, Value>,
    /// Skip the opt-in email; the POS relationship is the consent record.
    pub preconfirm: bool,
}

/// Request payload to update an existing subscriber in place.
pub struct SubscriberUpdate<'a> {
    pub id: u32,
    pub email: &'a str,
    pub name: &'a str,
    pub status: &'a str,
    pub list_ids: Vec<u32>,
    pub attribs: Map<String, Value>,
}

/// Error type for POS operations (opaque boxed error; the core only needs
/// to propagate these, never inspect them).
pub type PosError = Box<dyn std::error::Error + Send + Sync>;

/// Classified failure from the mailing-list service.
#[derive(Debug, thiserror::Error)]
pub enum MailingListError {
    /// The API answered with a non-success status and a message body.
    #[error("mailing list API error (code {code}): {message}")]
    Api { code: u16, message: String },
    /// The request never produced a usable API response.
    #[error("mailing list transport error: {0}")]
    Transport(String),
}

impl MailingListError {
    /// True for the one recoverable create failure: the remote rejected the
    /// address itself. Such customers are skipped rather than aborting the run.
    pub fn is_invalid_email(&self) -> bool {
        matches!(self, MailingListError::Api { code: 400, message } if message == "Invalid email.")
    }
}

/// Trait for the POS backend: token acquisition and roster listing.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait PosClient: Send + Sync {
    /// Exchange the configured credentials for a bearer token.
    async fn authenticate(&self) -> Result<String, PosError>;

    /// Fetch the full customer roster for the configured tenant.
    async fn list_customers(&self, token: &str) -> Result<Vec<Customer>, PosError>;
}

/// Trait for the mailing-list service: lookup and single-record mutations.
/// The implementor owns the server URL and credentials; the trait is agnostic
/// of authentication and transport details.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait MailingList: Send + Sync {
    /// Find subscribers matching a query expression
    /// (e.g. `email ILIKE 'a@b.c'`).
    async fn find_subscribers(&self, query: &str) -> Result<Vec<Subscriber>, MailingListError>;

    /// Create a new subscriber.
    async fn create_subscriber<'a>(
        &self,
        req: NewSubscriber<'a>,
    ) -> Result<Subscriber, MailingListError>;

    /// Update an existing subscriber in place.
    async fn update_subscriber<'a>(
        &self,
        req: SubscriberUpdate<'a>,
    ) -> Result<Subscriber, MailingListError>;
}
