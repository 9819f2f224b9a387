//! HTTP implementation of [`MailingList`] for a listmonk instance.
//!
//! Authentication is HTTP Basic with the API user and token. listmonk wraps
//! every successful response body in a `data` envelope and reports failures
//! as `{ "message": "..." }` with a non-2xx status; both shapes are handled
//! here so callers only ever see [`MailingListError`].

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::info;

use crate::config::ListmonkConfig;
use crate::contract::{
    MailingList, MailingListError, NewSubscriber, Subscriber, SubscriberUpdate,
};

#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Deserialize)]
struct SubscriberPage {
    results: Vec<Subscriber>,
}

#[derive(Deserialize)]
struct ApiMessage {
    message: String,
}

#[derive(Serialize)]
struct CreateBody<'a> {
    email: &'a str,
    name: &'a str,
    lists: &'a [u32],
    attribs: &'a Map<String, Value>,
    preconfirm_subscriptions: bool,
}

#[derive(Serialize)]
struct UpdateBody<'a> {
    email: &'a str,
    name: &'a str,
    status: &'a str,
    lists: &'a [u32],
    attribs: &'a Map<String, Value>,
}

pub struct ListmonkClient {
    http: Client,
    base_url: String,
    api_user: String,
    api_token: String,
}

impl ListmonkClient {
    pub fn new(config: &ListmonkConfig) -> Self {
        ListmonkClient {
            http: Client::new(),
            base_url: config.host.trim_end_matches('/').to_string(),
            api_user: config.api_user.clone(),
            api_token: config.api_token.clone(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/api/{}", self.base_url, path)
    }
}

fn transport(e: reqwest::Error) -> MailingListError {
    MailingListError::Transport(e.to_string())
}

/// Unwrap the `data` envelope, or map a non-success status to a typed API
/// error carrying the remote message.
async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, MailingListError> {
    let status = response.status();
    if !status.is_success() {
        let message = match response.json::<ApiMessage>().await {
            Ok(body) => body.message,
            Err(_) => status.to_string(),
        };
        return Err(MailingListError::Api {
            code: status.as_u16(),
            message,
        });
    }
    let envelope: Envelope<T> = response.json().await.map_err(transport)?;
    Ok(envelope.data)
}

#[async_trait]
impl MailingList for ListmonkClient {
    async fn find_subscribers(&self, query: &str) -> Result<Vec<Subscriber>, MailingListError> {
        let url = self.endpoint("subscribers");
        info!(url = %url, query = %query, "Querying listmonk subscribers");
        let response = self
            .http
            .get(&url)
            .basic_auth(&self.api_user, Some(&self.api_token))
            .query(&[("query", query), ("per_page", "all")])
            .send()
            .await
            .map_err(transport)?;
        let page: SubscriberPage = decode(response).await?;
        Ok(page.results)
    }

    async fn create_subscriber<'a>(
        &self,
        req: NewSubscriber<'a>,
    ) -> Result<Subscriber, MailingListError> {
        let url = self.endpoint("subscribers");
        info!(url = %url, email = %req.email, "Creating listmonk subscriber");
        let body = CreateBody {
            email: req.email,
            name: req.name,
            lists: &req.list_ids,
            attribs: &req.attribs,
            preconfirm_subscriptions: req.preconfirm,
        };
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.api_user, Some(&self.api_token))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }

    async fn update_subscriber<'a>(
        &self,
        req: SubscriberUpdate<'a>,
    ) -> Result<Subscriber, MailingListError> {
        let url = self.endpoint(&format!("subscribers/{}", req.id));
        info!(url = %url, email = %req.email, "Updating listmonk subscriber");
        let body = UpdateBody {
            email: req.email,
            name: req.name,
            status: req.status,
            lists: &req.list_ids,
            attribs: &req.attribs,
        };
        let response = self
            .http
            .put(&url)
            .basic_auth(&self.api_user, Some(&self.api_token))
            .json(&body)
            .send()
            .await
            .map_err(transport)?;
        decode(response).await
    }
}
