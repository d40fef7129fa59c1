//! HTTP client for the agent service.
//!
//! [`AgentRunClient::stream_run`] posts a run and turns the chunked body
//! into parsed items as bytes arrive. The listing endpoints are plain JSON
//! GETs; the session list is cached per agent for a short TTL.

mod models;

pub use models::{MemoryEntry, RunRequest, SessionSummary};

use futures::stream::{self, Stream, StreamExt};
use serde::de::DeserializeOwned;
use std::collections::VecDeque;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, warn};

use crate::adapters::ReqwestHttpClient;
use crate::cache::{Clock, TtlCache};
use crate::config::ClientConfig;
use crate::error::{CraftyError, CraftyResult, ErrorContext, NetworkError, ResultExt, StreamError};
use crate::run::RunState;
use crate::stream::{FinishStatus, ParseError, StreamEvent, StreamEventParser, StreamItem};
use crate::traits::{ByteStream, Headers, HttpClient, Response};

/// One item delivered by a run stream.
#[derive(Debug, Clone, PartialEq)]
pub enum RunStreamItem {
    /// A complete, well-formed event
    Event(StreamEvent),
    /// A balanced span that was not a valid event; the stream continues
    Malformed(ParseError),
    /// The body ended inside an object; always the last item
    Incomplete { leftover: String },
}

impl From<StreamItem> for RunStreamItem {
    fn from(item: StreamItem) -> Self {
        match item {
            Ok(event) => RunStreamItem::Event(event),
            Err(err) => RunStreamItem::Malformed(err),
        }
    }
}

impl RunStreamItem {
    /// Fold this item into a run's state.
    pub fn apply_to(&self, state: &mut RunState) {
        match self {
            RunStreamItem::Event(event) => state.apply(event),
            RunStreamItem::Malformed(err) => state.apply_parse_error(err),
            RunStreamItem::Incomplete { .. } => state.mark_incomplete(),
        }
    }
}

/// Items of a run, ending early with an `Err` if the transport fails.
pub type RunStream = Pin<Box<dyn Stream<Item = CraftyResult<RunStreamItem>> + Send>>;

/// Client for one agent service.
pub struct AgentRunClient {
    config: ClientConfig,
    http: Arc<dyn HttpClient>,
    sessions: Mutex<TtlCache<String, Vec<SessionSummary>>>,
}

impl std::fmt::Debug for AgentRunClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRunClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl AgentRunClient {
    /// Validate `config` and build a client on reqwest.
    pub fn new(config: ClientConfig) -> CraftyResult<Self> {
        config.validate()?;
        let http = ReqwestHttpClient::with_connect_timeout(config.connect_timeout)?;
        Ok(Self::with_http_client(config, Arc::new(http)))
    }

    /// Build a client on any [`HttpClient`], e.g. a mock.
    pub fn with_http_client(config: ClientConfig, http: Arc<dyn HttpClient>) -> Self {
        let sessions = Mutex::new(TtlCache::new(config.cache_ttl));
        Self {
            config,
            http,
            sessions,
        }
    }

    /// Drive session cache expiry from `clock`. Clears the cache.
    pub fn with_cache_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.sessions = Mutex::new(TtlCache::with_clock(self.config.cache_ttl, clock));
        self
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Start a run and stream its events.
    ///
    /// The returned stream yields parsed items in arrival order. A body cut
    /// off mid-object ends with [`RunStreamItem::Incomplete`]; a transport
    /// failure ends with an `Err`. Dropping the stream cancels the run's
    /// read loop.
    pub async fn stream_run(&self, request: &RunRequest) -> CraftyResult<RunStream> {
        let url = format!("{}/runs", self.agent_url(&request.agent_id));
        let body = request.form_body(self.config.user_id.as_deref());

        let mut headers = self.headers();
        headers.insert(
            "Content-Type".to_string(),
            "application/x-www-form-urlencoded".to_string(),
        );
        headers.insert("Accept".to_string(), "text/event-stream".to_string());

        // The run may create or extend a session
        self.lock_sessions().invalidate(&request.agent_id);

        debug!(agent = %request.agent_id, session = ?request.session_id, "starting run");
        let body_stream = self
            .http
            .post_stream(&url, &body, &headers)
            .await
            .with_context(|| run_context(request))?;

        Ok(read_run(body_stream))
    }

    /// List an agent's sessions. An unknown agent has none.
    pub async fn fetch_sessions(&self, agent_id: &str) -> CraftyResult<Vec<SessionSummary>> {
        let key = agent_id.to_string();
        let cached = self.lock_sessions().get(&key);
        if let Some(sessions) = cached {
            debug!(agent = %agent_id, "session list served from cache");
            return Ok(sessions);
        }

        let url = format!("{}/sessions", self.agent_url(agent_id));
        let sessions: Vec<SessionSummary> = self
            .get_list(&url)
            .await
            .with_context(|| ErrorContext::new("fetch_sessions").with_agent_id(agent_id))?;

        self.lock_sessions().insert(key, sessions.clone());
        Ok(sessions)
    }

    /// List what an agent remembers about a user. An unknown agent has none.
    pub async fn fetch_memories(
        &self,
        agent_id: &str,
        user_id: &str,
    ) -> CraftyResult<Vec<MemoryEntry>> {
        let url = format!(
            "{}/memories?user_id={}",
            self.agent_url(agent_id),
            urlencoding::encode(user_id)
        );
        self.get_list(&url)
            .await
            .with_context(|| ErrorContext::new("fetch_memories").with_agent_id(agent_id))
    }

    /// Whether the service answers its status endpoint with 2xx.
    pub async fn health_check(&self) -> bool {
        let url = format!("{}/v1/playground/status", self.config.base_url);
        match self.http.get(&url, &self.headers()).await {
            Ok(response) => response.is_success(),
            Err(err) => {
                debug!(error = %err, "health check failed");
                false
            }
        }
    }

    fn agent_url(&self, agent_id: &str) -> String {
        format!(
            "{}/v1/playground/agents/{}",
            self.config.base_url,
            urlencoding::encode(agent_id)
        )
    }

    fn headers(&self) -> Headers {
        let mut headers = Headers::new();
        if let Some(key) = &self.config.api_key {
            headers.insert("Authorization".to_string(), format!("Bearer {}", key));
        }
        headers
    }

    fn lock_sessions(&self) -> MutexGuard<'_, TtlCache<String, Vec<SessionSummary>>> {
        self.sessions
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    async fn get_list<T: DeserializeOwned>(&self, url: &str) -> CraftyResult<Vec<T>> {
        let response = self.http.get(url, &self.headers()).await?;
        if response.status == 404 {
            return Ok(Vec::new());
        }
        if !response.is_success() {
            return Err(NetworkError::from_status(response.status, response.text_lossy()).into());
        }
        parse_list(&response)
    }
}

fn run_context(request: &RunRequest) -> ErrorContext {
    let ctx = ErrorContext::new("stream_run").with_agent_id(&request.agent_id);
    match &request.session_id {
        Some(session_id) => ctx.with_session_id(session_id),
        None => ctx,
    }
}

/// Lists come back bare or wrapped in `{"data": [...]}`.
fn parse_list<T: DeserializeOwned>(response: &Response) -> CraftyResult<Vec<T>> {
    let value: serde_json::Value = response.json()?;
    let items = match value {
        serde_json::Value::Object(mut map) if map.contains_key("data") => {
            map.remove("data").unwrap_or_default()
        }
        other => other,
    };
    if items.is_null() {
        return Ok(Vec::new());
    }
    Ok(serde_json::from_value(items)?)
}

struct RunReader {
    body: ByteStream,
    parser: StreamEventParser,
    ready: VecDeque<StreamItem>,
    done: bool,
}

/// Turn a response body into run items.
fn read_run(body: ByteStream) -> RunStream {
    let mut parser = StreamEventParser::new();
    parser.start();
    let reader = RunReader {
        body,
        parser,
        ready: VecDeque::new(),
        done: false,
    };

    let items = stream::unfold(reader, |mut reader| async move {
        loop {
            if let Some(item) = reader.ready.pop_front() {
                return Some((Ok::<_, CraftyError>(RunStreamItem::from(item)), reader));
            }
            if reader.done {
                return None;
            }

            match reader.body.next().await {
                Some(Ok(chunk)) => {
                    let items = reader.parser.feed_bytes(&chunk);
                    reader.ready.extend(items);
                }
                Some(Err(err)) => {
                    warn!(error = %err, "run stream interrupted");
                    reader.done = true;
                    let err: CraftyError = StreamError::ConnectionLost {
                        message: err.to_string(),
                    }
                    .into();
                    return Some((Err(err), reader));
                }
                None => {
                    reader.done = true;
                    if let FinishStatus::Truncated { leftover } = reader.parser.finish() {
                        return Some((Ok(RunStreamItem::Incomplete { leftover }), reader));
                    }
                }
            }
        }
    });

    Box::pin(items)
}
