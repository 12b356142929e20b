//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::outbound::persistence::DbPool;

/// Credentials for the external payment gateway.
#[derive(Clone)]
pub struct PaymentGatewayConfig {
    pub api_base: String,
    pub secret_key: String,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) token_secret: Vec<u8>,
    pub(crate) db_pool: Option<DbPool>,
    pub(crate) payment: Option<PaymentGatewayConfig>,
}

impl ServerConfig {
    /// Construct a server configuration with the required settings.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, token_secret: Vec<u8>) -> Self {
        Self {
            bind_addr,
            token_secret,
            db_pool: None,
            payment: None,
        }
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without one, the server runs on the in-memory store.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Attach payment gateway credentials.
    ///
    /// Without them, the fixture gateway answers charge-intent requests.
    #[must_use]
    pub fn with_payment_gateway(mut self, payment: PaymentGatewayConfig) -> Self {
        self.payment = Some(payment);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
