use std::{error::Error, fmt};

use mongodb::bson::{Document, doc};
use mongodb::{Client, Collection, Database};
use tokio::sync::RwLock;

#[derive(Debug)]
pub enum ConnectionError {
    /// The configured connection string is missing or blank.
    EmptyUri,
    /// An operation was attempted after the connection was closed.
    NotConnected,
    Mongo(Box<mongodb::error::Error>),
}

impl fmt::Display for ConnectionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyUri => write!(f, "connection string is missing or empty"),
            Self::NotConnected => write!(f, "not connected to MongoDB"),
            Self::Mongo(err) => write!(f, "MongoDB error: {err}"),
        }
    }
}

impl Error for ConnectionError {}

impl From<mongodb::error::Error> for ConnectionError {
    fn from(err: mongodb::error::Error) -> Self {
        Self::Mongo(Box::new(err))
    }
}

/// Owner of the single MongoDB client shared by all operations.
///
/// The client is established once at startup and closed once at shutdown.
/// Name resolution is pure binding off the live client; after [`close`]
/// every resolution fails with [`ConnectionError::NotConnected`] so callers
/// surface a failed envelope instead of panicking.
///
/// [`close`]: AtlasConnection::close
#[derive(Debug)]
pub struct AtlasConnection {
    client: RwLock<Option<Client>>,
}

impl AtlasConnection {
    /// Connects to the deployment named by `uri` and validates liveness with
    /// an admin `ping` before returning.
    ///
    /// # Errors
    /// Returns `ConnectionError` if the URI is blank, the client cannot be
    /// built, or the ping fails. Startup must treat this as fatal.
    pub async fn connect(uri: &str) -> Result<Self, ConnectionError> {
        if uri.trim().is_empty() {
            return Err(ConnectionError::EmptyUri);
        }
        let client = Client::with_uri_str(uri).await?;
        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        tracing::info!("connected to MongoDB deployment");
        Ok(Self {
            client: RwLock::new(Some(client)),
        })
    }

    /// Returns a clone of the live client.
    ///
    /// # Errors
    /// Returns `ConnectionError::NotConnected` after [`Self::close`].
    pub async fn client(&self) -> Result<Client, ConnectionError> {
        let guard = self.client.read().await;
        guard.clone().ok_or(ConnectionError::NotConnected)
    }

    /// Resolves a database handle by name.
    ///
    /// # Errors
    /// Returns `ConnectionError::NotConnected` after [`Self::close`].
    pub async fn database(&self, name: &str) -> Result<Database, ConnectionError> {
        Ok(self.client().await?.database(name))
    }

    /// Resolves a collection handle by database and collection name.
    ///
    /// # Errors
    /// Returns `ConnectionError::NotConnected` after [`Self::close`].
    pub async fn collection(
        &self,
        database: &str,
        collection: &str,
    ) -> Result<Collection<Document>, ConnectionError> {
        Ok(self.database(database).await?.collection(collection))
    }

    /// Shuts the client down. Idempotent; later calls are no-ops.
    pub async fn close(&self) {
        let client = self.client.write().await.take();
        if let Some(client) = client {
            client.shutdown().await;
            tracing::info!("MongoDB connection closed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn blank_uri_is_rejected_before_dialing() {
        let err = AtlasConnection::connect("   ").await.expect_err("must fail");
        assert!(matches!(err, ConnectionError::EmptyUri));
        assert_eq!(err.to_string(), "connection string is missing or empty");
    }

    #[test]
    fn not_connected_display_names_the_condition() {
        assert_eq!(
            ConnectionError::NotConnected.to_string(),
            "not connected to MongoDB"
        );
    }
}
