//! Thin HTTP layer over `reqwest`.
//!
//! Requests are described by a [`RequestBuilder`] (method, url, query pairs,
//! headers and an optional JSON or form body) and sent through a shared
//! `reqwest::Client`. Responses are read fully into a [`Response`] so callers
//! decode them without holding the connection.

use std::collections::HashMap;

/// HTTP method for requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// A fully buffered HTTP response.
#[derive(Debug, Clone)]
pub struct Response {
    pub status: u16,
    /// Response headers (lowercased keys)
    pub headers: HashMap<String, String>,
    pub body: Vec<u8>,
}

impl Response {
    /// Returns true if the status code is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Get a header value by name (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }

    pub fn text(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.body.clone())
    }

    pub fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

#[derive(Debug, Clone, thiserror::Error)]
#[error("HTTP error: {message}")]
pub struct HttpError {
    pub message: String,
}

impl HttpError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub type HttpResult<T> = Result<T, HttpError>;

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Json(Vec<u8>),
    Form(Vec<(String, String)>),
}

/// A builder for constructing HTTP requests.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    client: reqwest::Client,
    method: Method,
    url: String,
    query: Vec<(String, String)>,
    headers: HashMap<String, String>,
    basic_auth: Option<(String, String)>,
    body: Option<Body>,
}

impl RequestBuilder {
    fn new(client: reqwest::Client, method: Method, url: impl Into<String>) -> Self {
        Self {
            client,
            method,
            url: url.into(),
            query: Vec::new(),
            headers: HashMap::new(),
            basic_auth: None,
            body: None,
        }
    }

    /// Add a header to the request. Names are stored lowercased.
    pub fn header(mut self, name: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.headers
            .insert(name.as_ref().to_lowercase(), value.into());
        self
    }

    pub fn bearer_auth(self, token: impl AsRef<str>) -> Self {
        let value = format!("Bearer {}", token.as_ref());
        self.header("authorization", value)
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Append a query parameter.
    pub fn query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    /// Set the request body as JSON.
    pub fn json<T: serde::Serialize + ?Sized>(mut self, value: &T) -> Result<Self, serde_json::Error> {
        let json_bytes = serde_json::to_vec(value)?;
        self.body = Some(Body::Json(json_bytes));
        self.headers
            .insert("content-type".to_owned(), "application/json".to_owned());
        Ok(self)
    }

    /// Set the request body as `application/x-www-form-urlencoded` pairs.
    pub fn form<K, V>(mut self, fields: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let pairs = fields
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self.body = Some(Body::Form(pairs));
        self
    }

    pub async fn send(self) -> HttpResult<Response> {
        let mut request = match self.method {
            Method::Get => self.client.get(&self.url),
            Method::Post => self.client.post(&self.url),
        };

        if !self.query.is_empty() {
            request = request.query(&self.query);
        }

        for (name, value) in &self.headers {
            request = request.header(name, value);
        }

        if let Some((username, password)) = &self.basic_auth {
            request = request.basic_auth(username, Some(password));
        }

        request = match self.body {
            Some(Body::Json(bytes)) => request.body(bytes),
            Some(Body::Form(pairs)) => request.form(&pairs),
            None => request,
        };

        log::debug!("{:?} {}", self.method, self.url);

        let response = request
            .send()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?;

        // Extract status and headers before consuming the response
        let status = response.status().as_u16();
        let mut headers = HashMap::new();
        for (name, value) in response.headers() {
            if let Ok(v) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), v.to_owned());
            }
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| HttpError::new(e.to_string()))?
            .to_vec();

        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

/// Entry point for requests; cheap to clone, shares one connection pool.
#[derive(Debug, Clone, Default)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Get, url)
    }

    pub fn post(&self, url: impl Into<String>) -> RequestBuilder {
        RequestBuilder::new(self.inner.clone(), Method::Post, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_is_success() {
        let response = Response {
            status: 200,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(response.is_success());

        let response = Response {
            status: 404,
            headers: HashMap::new(),
            body: Vec::new(),
        };
        assert!(!response.is_success());
    }

    #[test]
    fn test_response_header_case_insensitive() {
        let mut headers = HashMap::new();
        headers.insert("content-type".to_owned(), "application/json".to_owned());

        let response = Response {
            status: 200,
            headers,
            body: Vec::new(),
        };

        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("Content-Type"), Some("application/json"));
    }

    #[test]
    fn test_response_json() {
        #[derive(Debug, serde::Deserialize, PartialEq)]
        struct Envelope {
            status: String,
        }

        let response = Response {
            status: 200,
            headers: HashMap::new(),
            body: br#"{"status": "ok"}"#.to_vec(),
        };

        let data: Envelope = response.json().unwrap();
        assert_eq!(
            data,
            Envelope {
                status: "ok".to_owned()
            }
        );
        assert_eq!(response.text().unwrap(), r#"{"status": "ok"}"#);
    }

    #[test]
    fn test_request_builder_lowercases_headers() {
        let builder = Client::new()
            .get("https://example.com")
            .header("Authorization", "Bearer token")
            .header("Accept", "application/json");

        assert_eq!(
            builder.headers.get("authorization"),
            Some(&"Bearer token".to_owned())
        );
        assert_eq!(
            builder.headers.get("accept"),
            Some(&"application/json".to_owned())
        );
    }

    #[test]
    fn test_request_builder_auth() {
        let builder = Client::new()
            .get("https://example.com")
            .bearer_auth("abc")
            .basic_auth("id", "secret");

        assert_eq!(
            builder.headers.get("authorization"),
            Some(&"Bearer abc".to_owned())
        );
        assert_eq!(
            builder.basic_auth,
            Some(("id".to_owned(), "secret".to_owned()))
        );
    }

    #[test]
    fn test_request_builder_json() {
        let builder = Client::new()
            .post("https://example.com")
            .json(&serde_json::json!({"name": "app"}))
            .unwrap();

        assert_eq!(
            builder.headers.get("content-type"),
            Some(&"application/json".to_owned())
        );
        assert!(matches!(builder.body, Some(Body::Json(_))));
    }

    #[test]
    fn test_request_builder_form_and_query() {
        let builder = Client::new()
            .post("https://example.com")
            .query("id", "admin/app")
            .form([("mfaType", "app"), ("passcode", "123456")]);

        assert_eq!(builder.query, [("id".to_owned(), "admin/app".to_owned())]);
        assert_eq!(
            builder.body,
            Some(Body::Form(vec![
                ("mfaType".to_owned(), "app".to_owned()),
                ("passcode".to_owned(), "123456".to_owned()),
            ]))
        );
        assert!(!builder.headers.contains_key("content-type"));
    }
}
