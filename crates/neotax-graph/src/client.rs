//! Neo4j connection client.

use std::path::Path;
use std::time::Duration;

use neo4rs::{Config, ConfigBuilder, Graph, Query, Row, Txn};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info, warn};

use neotax_core::{TaxonomyError, TaxonomyResult};

/// URI schemes the Bolt driver can open.
const SCHEMES: &[&str] = &["bolt", "bolt+s", "bolt+ssc", "neo4j", "neo4j+s", "neo4j+ssc"];

/// Configuration for connecting to Neo4j.
#[derive(Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Host name, or a full `bolt://` / `neo4j://` URI.
    pub host: String,
    pub bolt_port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
    /// Reconnection attempts after the first failure.
    pub max_retries: u32,
    pub retry_delay_secs: u64,
    /// Upper bound on a single connection attempt, handshake and ping included.
    pub connect_timeout_secs: u64,
    pub max_connections: usize,
}

impl std::fmt::Debug for GraphConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphConfig")
            .field("uri", &self.uri())
            .field("user", &self.user)
            .field("password", &"***")
            .field("database", &self.database)
            .field("max_retries", &self.max_retries)
            .field("retry_delay_secs", &self.retry_delay_secs)
            .field("connect_timeout_secs", &self.connect_timeout_secs)
            .field("max_connections", &self.max_connections)
            .finish()
    }
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            bolt_port: 7687,
            user: "neo4j".to_string(),
            password: "neo4j".to_string(),
            database: "neo4j".to_string(),
            max_retries: 3,
            retry_delay_secs: 5,
            connect_timeout_secs: 10,
            max_connections: 4,
        }
    }
}

#[derive(Deserialize, Default)]
struct ConfigFile {
    #[serde(default)]
    neo4j: GraphConfig,
}

impl GraphConfig {
    pub fn uri(&self) -> String {
        if self.host.contains("://") {
            self.host.clone()
        } else {
            format!("bolt://{}:{}", self.host, self.bolt_port)
        }
    }

    /// Build the driver configuration. Errors here are not transient and are never retried.
    fn driver_config(&self) -> TaxonomyResult<Config> {
        let uri = self.uri();
        let (scheme, address) = uri
            .split_once("://")
            .ok_or_else(|| TaxonomyError::Config(format!("invalid Neo4j URI '{uri}'")))?;
        if !SCHEMES.contains(&scheme) {
            return Err(TaxonomyError::Config(format!(
                "unsupported scheme '{scheme}' in '{uri}', expected one of {}",
                SCHEMES.join(", ")
            )));
        }
        let host = address.split(['/', '?']).next().unwrap_or_default();
        if host.is_empty() || host.starts_with(':') {
            return Err(TaxonomyError::Config(format!("missing host in Neo4j URI '{uri}'")));
        }

        ConfigBuilder::default()
            .uri(uri.as_str())
            .user(self.user.as_str())
            .password(self.password.as_str())
            .db(self.database.as_str())
            .max_connections(self.max_connections)
            .fetch_size(500)
            .build()
            .map_err(|e| TaxonomyError::Config(format!("invalid Neo4j configuration: {e}")))
    }

    /// Parse the `[neo4j]` table of a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(content: &str) -> TaxonomyResult<Self> {
        let file: ConfigFile = toml::from_str(content)
            .map_err(|e| TaxonomyError::Config(format!("invalid configuration: {e}")))?;
        Ok(file.neo4j)
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> TaxonomyResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            TaxonomyError::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }
}

/// Map a driver error into a store error with some context.
pub(crate) fn driver_error(context: &str, e: neo4rs::Error) -> TaxonomyError {
    TaxonomyError::Store(format!("{context}: {e}"))
}

/// Commit on success, roll back and return the first error otherwise.
pub(crate) async fn finish<T>(txn: Txn, outcome: TaxonomyResult<T>) -> TaxonomyResult<T> {
    match outcome {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| driver_error("Failed to commit transaction", e))?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback) = txn.rollback().await {
                warn!(error = %rollback, "Failed to roll back transaction");
            }
            Err(e)
        }
    }
}

/// Client for the taxonomy graph.
///
/// Created disconnected; every query fails with `NotConnected` until [`GraphClient::connect`]
/// succeeds.
#[derive(Clone)]
pub struct GraphClient {
    config: GraphConfig,
    graph: Option<Graph>,
}

impl std::fmt::Debug for GraphClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GraphClient")
            .field("uri", &self.config.uri())
            .field("user", &self.config.user)
            .field("connected", &self.graph.is_some())
            .finish()
    }
}

impl GraphClient {
    pub fn new(config: GraphConfig) -> Self {
        Self { config, graph: None }
    }

    /// Create a client and connect it.
    pub async fn connect_with(config: GraphConfig) -> TaxonomyResult<Self> {
        let mut client = Self::new(config);
        client.connect().await?;
        Ok(client)
    }

    /// Connect, retrying with a fixed delay up to `max_retries` times.
    ///
    /// Each attempt is cut off after `connect_timeout_secs`. Configuration errors fail at once.
    pub async fn connect(&mut self) -> TaxonomyResult<()> {
        let uri = self.config.uri();
        let timeout = Duration::from_secs(self.config.connect_timeout_secs.max(1));
        let mut attempts = 0;

        loop {
            attempts += 1;
            let neo4j_config = self.config.driver_config()?;
            let outcome = match tokio::time::timeout(timeout, Self::open(neo4j_config)).await {
                Ok(opened) => opened.map_err(|e| e.to_string()),
                Err(_) => Err(format!("no answer within {}s", timeout.as_secs())),
            };

            match outcome {
                Ok(graph) => {
                    info!(uri = %uri, user = %self.config.user, "Connected to Neo4j");
                    self.graph = Some(graph);
                    return Ok(());
                }
                Err(e) if attempts <= self.config.max_retries => {
                    debug!(attempts, "Connection attempt failed");
                    warn!(uri = %uri, error = %e, "Error while connecting to Neo4j");
                    warn!("Retrying in {} seconds", self.config.retry_delay_secs);
                    tokio::time::sleep(Duration::from_secs(self.config.retry_delay_secs)).await;
                }
                Err(e) => {
                    return Err(TaxonomyError::Connection(format!(
                        "Max attempts reached connecting to {uri}: {e}"
                    )));
                }
            }
        }
    }

    /// neo4rs builds its pool lazily, so a `RETURN 1` ping forces the bolt handshake.
    /// The ping runs in a transaction, which the driver does not retry on its own.
    async fn open(neo4j_config: Config) -> Result<Graph, neo4rs::Error> {
        let graph = Graph::connect(neo4j_config).await?;
        let mut txn = graph.start_txn().await?;
        txn.run(Query::new("RETURN 1".to_string())).await?;
        txn.commit().await?;
        Ok(graph)
    }

    pub fn is_connected(&self) -> bool {
        self.graph.is_some()
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// The underlying neo4rs graph, or `NotConnected`.
    pub fn inner(&self) -> TaxonomyResult<&Graph> {
        self.graph.as_ref().ok_or_else(|| {
            TaxonomyError::not_connected(format!(
                "connect to {} before running queries",
                self.config.uri()
            ))
        })
    }

    /// Start an explicit transaction. Statements in it are sent once, without driver retries.
    pub(crate) async fn begin(&self) -> TaxonomyResult<Txn> {
        self.inner()?
            .start_txn()
            .await
            .map_err(|e| driver_error("Failed to start transaction", e))
    }

    /// Execute a Cypher query that returns no results, in its own transaction.
    pub async fn execute(&self, query: Query) -> TaxonomyResult<()> {
        let mut txn = self.begin().await?;
        let outcome = txn
            .run(query)
            .await
            .map_err(|e| driver_error("Neo4j query execution failed", e));
        finish(txn, outcome).await
    }

    /// Execute a Cypher query in its own transaction and return results as rows.
    pub async fn query(&self, query: Query) -> TaxonomyResult<Vec<Row>> {
        let mut txn = self.begin().await?;
        let outcome = collect_rows(&mut txn, query).await;
        finish(txn, outcome).await
    }

    /// Execute a Cypher query and return a single scalar value.
    pub async fn query_scalar<T: DeserializeOwned>(
        &self,
        query: Query,
        field: &str,
    ) -> TaxonomyResult<Option<T>> {
        let rows = self.query(query).await?;
        match rows.into_iter().next() {
            Some(row) => row
                .get(field)
                .map(Some)
                .map_err(|e| TaxonomyError::Store(format!("Failed to get field '{field}': {e:?}"))),
            None => Ok(None),
        }
    }
}

/// Run `query` inside `txn` and drain its result stream.
pub(crate) async fn collect_rows(txn: &mut Txn, query: Query) -> TaxonomyResult<Vec<Row>> {
    let mut stream = txn
        .execute(query)
        .await
        .map_err(|e| driver_error("Neo4j query failed", e))?;

    let mut rows = Vec::new();
    while let Some(row) = stream
        .next(txn.handle())
        .await
        .map_err(|e| driver_error("Failed to read Neo4j result", e))?
    {
        rows.push(row);
    }
    Ok(rows)
}
