//! HTTP transport used by [`Api`](crate::Api).
//!
//! The library only needs `send(request) -> response`. [`ReqwestTransport`] is the default
//! implementation; any closure with the right signature can be used instead, which is handy
//! for tests and for plugging in a different HTTP stack.
use std::{fmt, time::Duration};

use thiserror::Error;

/// HTTP methods used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `POST`
    Post,
    /// `DELETE`
    Delete,
}

impl Method {
    /// Upper-case method name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully built request: absolute signed URL, headers and body.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    /// HTTP method.
    pub method: Method,
    /// Absolute URL including the signature query parameters.
    pub url: String,
    /// Header names and values, in sending order.
    pub headers: Vec<(String, String)>,
    /// Serialized JSON body.
    pub body: Option<String>,
}

/// Response of the server, successful or not.
#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    /// HTTP status code.
    pub status: u16,
    /// Header names and values as received.
    pub headers: Vec<(String, String)>,
    /// Body decoded as text.
    pub body: String,
}

impl HttpResponse {
    /// First value of the header `name`, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// `true` if the response declares a JSON body.
    pub fn is_json(&self) -> bool {
        self.header("content-type")
            .is_some_and(|content_type| content_type.contains("application/json"))
    }
}

/// Failed HTTP call. Carries the response when the server answered with a non-2xx status.
#[derive(Error, Debug, Clone)]
#[error("{message}")]
pub struct TransportError {
    /// Human readable cause.
    pub message: String,
    /// HTTP status, if the server answered.
    pub status: Option<u16>,
    /// The non-2xx response, when there was one.
    pub response: Option<HttpResponse>,
}

impl TransportError {
    /// Failure without a response, e.g. a connection error.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            response: None,
        }
    }

    /// Failure carrying the server's non-2xx response.
    pub fn with_response(message: impl Into<String>, response: HttpResponse) -> Self {
        Self {
            message: message.into(),
            status: Some(response.status),
            response: Some(response),
        }
    }
}

/// Sends requests over the wire.
///
/// Implemented for closures `Fn(HttpRequest) -> Result<HttpResponse, TransportError>`.
pub trait Transport {
    /// Send `request`. Non-2xx responses are returned as errors.
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError>;
}

impl<T: Fn(HttpRequest) -> Result<HttpResponse, TransportError>> Transport for T {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        self(request)
    }
}

/// Blocking transport backed by `reqwest`.
pub struct ReqwestTransport {
    // Client holds a connection pool internally, so we're reusing the client between requests.
    client: reqwest::blocking::Client,
}

impl ReqwestTransport {
    /// Create a transport. `timeout` bounds each request as a whole.
    pub fn new(timeout: Option<Duration>) -> reqwest::Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for ReqwestTransport {
    fn send(&self, request: HttpRequest) -> Result<HttpResponse, TransportError> {
        let method = match request.method {
            Method::Get => reqwest::Method::GET,
            Method::Post => reqwest::Method::POST,
            Method::Delete => reqwest::Method::DELETE,
        };

        let mut builder = self.client.request(method, &request.url);
        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .map_err(|err| TransportError {
                status: err.status().map(|status| status.as_u16()),
                message: err.without_url().to_string(),
                response: None,
            })?;

        let status = response.status();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                Some((name.as_str().to_owned(), value.to_str().ok()?.to_owned()))
            })
            .collect();
        let body = response
            .text()
            .map_err(|err| TransportError::new(err.without_url().to_string()))?;

        let response = HttpResponse {
            status: status.as_u16(),
            headers,
            body,
        };

        if status.is_success() {
            Ok(response)
        } else {
            Err(TransportError::with_response(
                format!("server responded with status {status}"),
                response,
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tokio::runtime::Runtime;
    use wiremock::{
        matchers::{body_json, header, method, path},
        Mock, MockServer, ResponseTemplate,
    };

    use super::{HttpRequest, HttpResponse, Method, ReqwestTransport, Transport, TransportError};

    /// Start a mock server with one mounted mock. The server runs on its own thread, so the
    /// blocking transport can be used from the test thread.
    fn mock_server(runtime: &Runtime, mock: Mock) -> MockServer {
        runtime.block_on(async {
            let server = MockServer::start().await;
            mock.mount(&server).await;
            server
        })
    }

    fn response(content_type: &str) -> HttpResponse {
        HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_owned(), content_type.to_owned())],
            body: String::new(),
        }
    }

    #[test]
    fn detects_json_content_type_case_insensitively() {
        assert!(response("application/json; charset=utf-8").is_json());
        assert!(!response("text/html").is_json());
        assert_eq!(
            response("text/html").header("content-type"),
            Some("text/html")
        );
    }

    #[test]
    fn closures_are_transports() {
        let transport = |request: HttpRequest| {
            if request.method == Method::Delete {
                Err(TransportError::with_response("gone", response("application/json")))
            } else {
                Ok(response("application/json"))
            }
        };
        let request = |method| HttpRequest {
            method,
            url: "https://example.com".to_owned(),
            headers: vec![],
            body: None,
        };

        assert!(transport.send(request(Method::Get)).is_ok());
        let err = transport.send(request(Method::Delete)).unwrap_err();
        assert_eq!(err.status, Some(200));
        assert_eq!(err.to_string(), "gone");
    }

    #[test]
    fn reqwest_transport_passes_successful_response_through() {
        let runtime = Runtime::new().unwrap();
        let server = mock_server(
            &runtime,
            Mock::given(method("POST"))
                .and(path("/v1/acc/user/"))
                .and(header("Content-Type", "application/json; charset=utf-8"))
                .and(body_json(json!({"ids": ["a"]})))
                .respond_with(
                    ResponseTemplate::new(200)
                        .insert_header("X-Request-Id", "42")
                        .set_body_json(json!({"status": "ok"})),
                ),
        );

        let transport = ReqwestTransport::new(None).unwrap();
        let response = transport
            .send(HttpRequest {
                method: Method::Post,
                url: format!("{}/v1/acc/user/", server.uri()),
                headers: vec![(
                    "Content-Type".to_owned(),
                    "application/json; charset=utf-8".to_owned(),
                )],
                body: Some(r#"{"ids":["a"]}"#.to_owned()),
            })
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.header("x-request-id"), Some("42"));
        assert!(response.is_json());
        assert_eq!(
            serde_json::from_str::<serde_json::Value>(&response.body).unwrap(),
            json!({"status": "ok"})
        );
    }

    #[test]
    fn reqwest_transport_keeps_error_response() {
        let runtime = Runtime::new().unwrap();
        let server = mock_server(
            &runtime,
            Mock::given(method("DELETE"))
                .and(path("/v1/acc/items"))
                .respond_with(
                    ResponseTemplate::new(404).set_body_json(json!({"message": "no items"})),
                ),
        );

        let transport = ReqwestTransport::new(None).unwrap();
        let err = transport
            .send(HttpRequest {
                method: Method::Delete,
                url: format!("{}/v1/acc/items", server.uri()),
                headers: vec![],
                body: None,
            })
            .unwrap_err();

        assert_eq!(err.status, Some(404));
        let response = err.response.unwrap();
        assert_eq!(response.status, 404);
        assert!(response.is_json());
        assert!(response.body.contains("no items"), "{}", response.body);
    }

    #[test]
    fn reqwest_transport_reports_connection_failure_without_status() {
        // Nothing listens on the discard port.
        let transport = ReqwestTransport::new(Some(std::time::Duration::from_secs(5))).unwrap();
        let err = transport
            .send(HttpRequest {
                method: Method::Get,
                url: "http://127.0.0.1:9/".to_owned(),
                headers: vec![],
                body: None,
            })
            .unwrap_err();

        assert_eq!(err.status, None);
        assert!(err.response.is_none());
    }
}
