use serde_json::Value;
use url::Url;

use crate::{
    hmac_signature, path_builder,
    transport::{HttpRequest, HttpResponse, Method, Transport, TransportError},
    Configuration, Error, Restriction, Result,
};

const ACCOUNT_ID_PARAMETER: &str = "accountId";
const CONTENT_TYPE: &str = "application/json; charset=utf-8";
const ERROR_MESSAGE_KEY: &str = "message";

/// Performs signed requests against templated paths.
///
/// Every call injects the configured account id, expands the path template, prefixes it with
/// the slug, signs it and hands it to the transport.
pub struct Api<'a> {
    configuration: Configuration,
    transport: Box<dyn Transport + Send + Sync + 'a>,
}

impl<'a> Api<'a> {
    /// Create the request layer over `transport`.
    pub fn new(
        configuration: Configuration,
        transport: Box<dyn Transport + Send + Sync + 'a>,
    ) -> Self {
        Api {
            configuration,
            transport,
        }
    }

    /// Send a GET. The restriction supplies the path parameters; its content is not sent.
    pub fn perform_get(
        &self,
        path_template: &str,
        restriction: Option<Restriction>,
    ) -> Result<Option<Value>> {
        self.perform(Method::Get, path_template, restriction)
    }

    /// Send the restriction's content as the JSON body.
    pub fn perform_post(
        &self,
        path_template: &str,
        restriction: Option<Restriction>,
    ) -> Result<Option<Value>> {
        self.perform(Method::Post, path_template, restriction)
    }

    /// Send a DELETE, with the restriction's content as the body if there is any.
    pub fn perform_delete(
        &self,
        path_template: &str,
        restriction: Option<Restriction>,
    ) -> Result<Option<Value>> {
        self.perform(Method::Delete, path_template, restriction)
    }

    /// Connection settings in use.
    pub fn configuration(&self) -> &Configuration {
        &self.configuration
    }

    /// Replace the host of subsequent requests.
    pub fn change_host(&mut self, host: impl Into<String>) -> &mut Self {
        self.configuration.host = host.into();
        self
    }

    /// Replace the API version prefix of subsequent requests.
    pub fn change_slug(&mut self, slug: impl Into<String>) -> &mut Self {
        self.configuration.slug = slug.into();
        self
    }

    fn perform(
        &self,
        method: Method,
        path_template: &str,
        restriction: Option<Restriction>,
    ) -> Result<Option<Value>> {
        let mut restriction = restriction.unwrap_or_default();
        let url = self.construct_url(path_template, &mut restriction)?;

        let content = restriction.into_content();
        let body = if method == Method::Get || content.is_empty() {
            None
        } else {
            Some(serde_json::to_string(&content).map_err(|err| {
                Error::invalid_argument(format!("unable to serialize request body: {err}"))
            })?)
        };

        log::debug!(target: "databreakers",
                    method:display = method,
                    path_template;
                    "sending request");

        let request = HttpRequest {
            method,
            url,
            headers: vec![("Content-Type".to_owned(), CONTENT_TYPE.to_owned())],
            body,
        };

        match self.transport.send(request) {
            Ok(response) => parse_response(&response),
            Err(err) => Err(request_failed(method, path_template, err)),
        }
    }

    fn construct_url(&self, path_template: &str, restriction: &mut Restriction) -> Result<String> {
        restriction.add_parameter(ACCOUNT_ID_PARAMETER, &self.configuration.account_id);
        let path = format!(
            "{}{}",
            self.configuration.slug,
            path_builder::build(path_template, restriction)?
        );
        let signed = hmac_signature::sign(&path, &self.configuration.secret_key)?;
        let url = format!("{}{}", self.configuration.host, signed);
        Url::parse(&url).map_err(Error::InvalidHost)?;
        Ok(url)
    }
}

fn parse_response(response: &HttpResponse) -> Result<Option<Value>> {
    if !response.is_json() || response.body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(Value::Null) => Ok(None),
        Ok(value) => {
            log::debug!(target: "databreakers", status = response.status; "received response");
            Ok(Some(value))
        }
        Err(err) => {
            log::warn!(target: "databreakers",
                       status = response.status;
                       "failed to parse response body: {:?}", err);
            Err(Error::RequestFailed {
                message: format!("unable to parse response body: {err}"),
                status: Some(response.status),
            })
        }
    }
}

fn request_failed(method: Method, path_template: &str, err: TransportError) -> Error {
    let message = err
        .response
        .as_ref()
        .and_then(error_message)
        .unwrap_or_else(|| err.message.clone());

    log::warn!(target: "databreakers",
               method:display = method,
               path_template,
               status:serde = err.status;
               "request failed: {}", message);

    Error::RequestFailed {
        message,
        status: err.status,
    }
}

/// The `message` field of a JSON error body.
fn error_message(response: &HttpResponse) -> Option<String> {
    let body: Value = serde_json::from_str(&response.body).ok()?;
    body.get(ERROR_MESSAGE_KEY)?.as_str().map(str::to_owned)
}
