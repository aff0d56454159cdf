//! Reddit OAuth API provider.
//!
//! Authenticates a script app with the password grant and polls
//! `/message/unread` and `/r/{community}/new`.

use super::feed::FeedBuffer;
use super::listing::{Listing, MessageData, SubmissionData};
use super::{InboundMessage, InboundSubmission, Provider};
use crate::{MikasaError, MikasaResult};
use async_trait::async_trait;
use bot_config_and_utils::{Config, Credentials};
use parking_lot::Mutex;
use reqwest::header::USER_AGENT;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Page size for listing fetches (the API maximum).
const LISTING_LIMIT: &str = "100";

/// Refresh the token this long before it expires.
const TOKEN_REFRESH_MARGIN: Duration = Duration::from_secs(60);

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: Option<String>,
    #[serde(default)]
    expires_in: Option<u64>,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MeResponse {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ComposeResponse {
    json: ComposeBody,
}

#[derive(Debug, Deserialize)]
struct ComposeBody {
    #[serde(default)]
    errors: Vec<serde_json::Value>,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() + TOKEN_REFRESH_MARGIN < self.expires_at
    }
}

/// Authenticated session for one Reddit account.
pub struct RedditProvider {
    client: Client,
    credentials: Credentials,
    api_base: String,
    auth_url: String,
    community: String,
    token: Mutex<Option<AccessToken>>,
    inbox: FeedBuffer<InboundMessage>,
    submissions: FeedBuffer<InboundSubmission>,
}

impl RedditProvider {
    /// Log in with `credentials` and confirm the account name.
    pub async fn authenticate(credentials: Credentials, config: &Config) -> MikasaResult<Self> {
        let client = Client::builder().timeout(config.request_timeout()).build()?;

        let provider = Self {
            client,
            credentials,
            api_base: config.api_base_url()?.as_str().trim_end_matches('/').to_string(),
            auth_url: config.auth_url()?.to_string(),
            community: config.community.clone(),
            token: Mutex::new(None),
            inbox: FeedBuffer::default(),
            submissions: FeedBuffer::default(),
        };

        let account = provider.me().await?;
        info!(account = %account, community = %provider.community, "Authenticated");

        Ok(provider)
    }

    /// Name of the authenticated account.
    pub async fn me(&self) -> MikasaResult<String> {
        let me: MeResponse = self.get_json("api/v1/me", &[]).await?;
        Ok(me.name)
    }

    async fn fetch_token(&self) -> MikasaResult<AccessToken> {
        debug!(username = %self.credentials.username, "Requesting access token");

        let response: TokenResponse = self
            .client
            .post(&self.auth_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(USER_AGENT, &self.credentials.user_agent)
            .form(&[
                ("grant_type", "password"),
                ("username", self.credentials.username.as_str()),
                ("password", self.credentials.password.as_str()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if let Some(error) = response.error {
            return Err(MikasaError::Auth(error));
        }

        let value = response
            .access_token
            .ok_or_else(|| MikasaError::Auth("token response without access_token".to_string()))?;
        let lifetime = Duration::from_secs(response.expires_in.unwrap_or(3600));

        Ok(AccessToken {
            value,
            expires_at: Instant::now() + lifetime,
        })
    }

    /// Current bearer token, refreshed when close to expiry.
    async fn bearer(&self) -> MikasaResult<String> {
        let cached = self.token.lock().clone().filter(AccessToken::is_fresh);
        if let Some(token) = cached {
            return Ok(token.value);
        }

        let token = self.fetch_token().await?;
        let value = token.value.clone();
        *self.token.lock() = Some(token);
        Ok(value)
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.api_base, path)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> MikasaResult<T> {
        let bearer = self.bearer().await?;
        let value = self
            .client
            .get(self.endpoint(path))
            .bearer_auth(bearer)
            .header(USER_AGENT, &self.credentials.user_agent)
            .query(&[("raw_json", "1")])
            .query(query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(value)
    }

    async fn fetch_listing<T: DeserializeOwned>(&self, path: &str) -> MikasaResult<Vec<T>> {
        let listing: Listing<T> = self.get_json(path, &[("limit", LISTING_LIMIT)]).await?;
        Ok(listing.into_items())
    }
}

#[async_trait]
impl Provider for RedditProvider {
    async fn poll_inbox(&mut self) -> MikasaResult<Option<InboundMessage>> {
        if let Some(message) = self.inbox.pop() {
            return Ok(Some(message));
        }

        let fetched = self.fetch_listing::<MessageData>("message/unread").await?;
        let queued = self
            .inbox
            .absorb(fetched.into_iter().map(InboundMessage::from).collect());
        if queued > 0 {
            debug!(queued, "New inbox items");
        }

        Ok(self.inbox.pop())
    }

    async fn poll_submissions(&mut self) -> MikasaResult<Option<InboundSubmission>> {
        if let Some(submission) = self.submissions.pop() {
            return Ok(Some(submission));
        }

        let path = format!("r/{}/new", self.community);
        let fetched = self.fetch_listing::<SubmissionData>(&path).await?;
        let queued = self
            .submissions
            .absorb(fetched.into_iter().map(InboundSubmission::from).collect());
        if queued > 0 {
            debug!(queued, community = %self.community, "New submissions");
        }

        Ok(self.submissions.pop())
    }

    async fn send_message(&self, recipient: &str, subject: &str, body: &str) -> MikasaResult<()> {
        let bearer = self.bearer().await?;
        let response: ComposeResponse = self
            .client
            .post(self.endpoint("api/compose"))
            .bearer_auth(bearer)
            .header(USER_AGENT, &self.credentials.user_agent)
            .form(&[
                ("api_type", "json"),
                ("to", recipient),
                ("subject", subject),
                ("text", body),
            ])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        if !response.json.errors.is_empty() {
            let errors = serde_json::to_string(&response.json.errors)?;
            warn!(recipient, errors = %errors, "Message rejected");
            return Err(MikasaError::Provider(format!(
                "message to {recipient} rejected: {errors}"
            )));
        }

        debug!(recipient, subject, "Message sent");
        Ok(())
    }
}
