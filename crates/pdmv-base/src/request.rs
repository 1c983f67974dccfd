//! Request descriptor handed from the application clients to the transport.
//!
//! An [`ApiRequest`] is fully resolved: path parameters are already
//! interpolated and query pairs are already marshaled. The transport only
//! prefixes the server root and application name.

use serde_json::Value;
use std::fmt;
use url::form_urlencoded;

/// HTTP verb of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How query keys and values are percent-encoded.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryEncoding {
    /// Form encoding: reserved characters (commas included) are escaped.
    #[default]
    Standard,
    /// Form encoding, but `,` is left literal so joined lists stay readable.
    KeepCommas,
}

/// A resolved request against one application.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP verb.
    pub method: Method,

    /// Path relative to the application root, e.g. `api/relvals/get/ABC-1`.
    pub path: String,

    /// Query pairs in wire order.
    pub query: Vec<(String, String)>,

    /// Query encoding.
    pub query_encoding: QueryEncoding,

    /// JSON body.
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            query_encoding: QueryEncoding::Standard,
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).with_body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).with_body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Replace the query pairs.
    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    /// Append one query pair.
    pub fn with_query_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Select the query encoding.
    pub fn with_query_encoding(mut self, encoding: QueryEncoding) -> Self {
        self.query_encoding = encoding;
        self
    }

    /// Encoded query string, without the leading `?`.
    pub fn encoded_query(&self) -> String {
        self.query
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}={}",
                    encode_component(k, self.query_encoding),
                    encode_component(v, self.query_encoding)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Path followed by `?query` when there is a query.
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.encoded_query())
        }
    }
}

// Form encoding as the services parse it: `*` escaped, `~` left bare.
fn encode_component(raw: &str, encoding: QueryEncoding) -> String {
    let encoded = form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('*', "%2A")
        .replace("%7E", "~");
    match encoding {
        QueryEncoding::Standard => encoded,
        QueryEncoding::KeepCommas => encoded.replace("%2C", ","),
    }
}
