use std::{fmt, time::Duration};

use crate::{
    transport::{ReqwestTransport, Transport},
    Client, Error, Result,
};

/// Connection parameters of a client.
#[derive(Clone, PartialEq)]
pub struct Configuration {
    pub(crate) host: String,
    pub(crate) slug: String,
    pub(crate) account_id: String,
    pub(crate) secret_key: String,
    pub(crate) request_timeout: Option<Duration>,
}

impl Configuration {
    /// Default base URL for API calls.
    pub const DEFAULT_HOST: &'static str = "https://api.databreakers.com";

    /// Default API version prefix.
    pub const DEFAULT_SLUG: &'static str = "/v1";

    /// Default host and slug for the given account.
    pub fn new(account_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Configuration {
            host: Self::DEFAULT_HOST.to_owned(),
            slug: Self::DEFAULT_SLUG.to_owned(),
            account_id: account_id.into(),
            secret_key: secret_key.into(),
            request_timeout: None,
        }
    }

    /// Return a copy pointing to another host.
    pub fn with_host(self, host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..self
        }
    }

    /// Return a copy using another API version prefix.
    pub fn with_slug(self, slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            ..self
        }
    }

    /// Base URL requests are sent to.
    pub fn host(&self) -> &str {
        &self.host
    }

    /// API version prefix of every path.
    pub fn slug(&self) -> &str {
        &self.slug
    }

    /// Account every request is made for.
    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    /// Key used to sign request paths.
    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    /// Timeout applied by the default transport, if any.
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout
    }
}

impl fmt::Debug for Configuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Configuration")
            .field("host", &self.host)
            .field("slug", &self.slug)
            .field("account_id", &self.account_id)
            .field("secret_key", &"<redacted>")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Configuration for [`Client`].
pub struct ClientConfig<'a> {
    pub(crate) configuration: Configuration,
    pub(crate) transport: Option<Box<dyn Transport + Send + Sync + 'a>>,
}

impl<'a> ClientConfig<'a> {
    /// Create a default configuration for the given account.
    ///
    /// ```
    /// # use databreakers::ClientConfig;
    /// ClientConfig::from_credentials("account-id", "secret-key");
    /// ```
    pub fn from_credentials(account_id: impl Into<String>, secret_key: impl Into<String>) -> Self {
        ClientConfig {
            configuration: Configuration::new(account_id, secret_key),
            transport: None,
        }
    }

    /// Override base URL for API calls. Clients should use the default setting in most cases.
    pub fn host(&mut self, host: impl Into<String>) -> &mut Self {
        self.configuration.host = host.into();
        self
    }

    /// Override the API version prefix.
    pub fn slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.configuration.slug = slug.into();
        self
    }

    /// Timeout of a single HTTP request. Only applies to the default transport.
    pub fn request_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.configuration.request_timeout = Some(timeout);
        self
    }

    /// Send requests through a custom transport instead of the default `reqwest` client.
    ///
    /// ```
    /// # use databreakers::{ClientConfig, HttpRequest, HttpResponse, TransportError};
    /// let mut config = ClientConfig::from_credentials("account-id", "secret-key");
    /// config.transport(|request: HttpRequest| -> Result<HttpResponse, TransportError> {
    ///     println!("{} {}", request.method, request.url);
    ///     Err(TransportError::new("offline"))
    /// });
    /// ```
    pub fn transport(&mut self, transport: impl Transport + Send + Sync + 'a) -> &mut Self {
        self.transport = Some(Box::new(transport));
        self
    }

    /// Create a new [`Client`] using the specified configuration.
    ///
    /// ```
    /// # use databreakers::{ClientConfig, Client};
    /// let client: Client = ClientConfig::from_credentials("account-id", "secret-key")
    ///     .to_client()
    ///     .unwrap();
    /// ```
    pub fn to_client(self) -> Result<Client<'a>> {
        let transport: Box<dyn Transport + Send + Sync + 'a> = match self.transport {
            Some(transport) => transport,
            None => Box::new(
                ReqwestTransport::new(self.configuration.request_timeout)
                    .map_err(|err| Error::TransportInit(std::sync::Arc::new(err)))?,
            ),
        };
        Ok(Client::new(self.configuration, transport))
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::{ClientConfig, Configuration};

    #[test]
    fn defaults() {
        let configuration = Configuration::new("acc", "secret");

        assert_eq!(configuration.host(), "https://api.databreakers.com");
        assert_eq!(configuration.slug(), "/v1");
        assert_eq!(configuration.account_id(), "acc");
        assert_eq!(configuration.secret_key(), "secret");
        assert_eq!(configuration.request_timeout(), None);
    }

    #[test]
    fn pure_setters_return_updated_copy() {
        let original = Configuration::new("acc", "secret");

        let updated = original
            .clone()
            .with_host("http://localhost:8080")
            .with_slug("/v2");

        assert_eq!(original.host(), Configuration::DEFAULT_HOST);
        assert_eq!(updated.host(), "http://localhost:8080");
        assert_eq!(updated.slug(), "/v2");
        assert_eq!(updated.account_id(), "acc");
    }

    #[test]
    fn debug_output_hides_secret_key() {
        let output = format!("{:?}", Configuration::new("acc", "very-secret"));

        assert!(output.contains("acc"));
        assert!(!output.contains("very-secret"));
    }

    #[test]
    fn builder_overrides() {
        let mut config = ClientConfig::from_credentials("acc", "secret");
        config
            .host("http://localhost")
            .slug("/v2")
            .request_timeout(Duration::from_secs(3));

        assert_eq!(config.configuration.host(), "http://localhost");
        assert_eq!(config.configuration.slug(), "/v2");
        assert_eq!(
            config.configuration.request_timeout(),
            Some(Duration::from_secs(3))
        );
    }
}
