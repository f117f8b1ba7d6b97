use crate::model::{Category, Event, Id, User};

use http::header::{ACCEPT, CONTENT_TYPE};
use http::{Method, Request, StatusCode, Uri};
use http_body_util::BodyExt;
use hyper_rustls::HttpsConnectorBuilder;
use hyper_util::client::legacy::Client;
use hyper_util::client::legacy::connect::HttpConnector;
use hyper_util::rt::TokioExecutor;
use percent_encoding::{AsciiSet, CONTROLS, utf8_percent_encode};
use serde::de::DeserializeOwned;
use std::sync::Arc;
use thiserror::Error;

type HttpsClient = Client<hyper_rustls::HttpsConnector<HttpConnector>, String>;

const JSON: &str = "application/json";

/// Bytes that cannot appear raw inside one URL path segment.
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// The three collections the backend exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Collection {
    Users,
    Events,
    Categories,
}

impl Collection {
    pub fn path(self) -> &'static str {
        match self {
            Collection::Users => "users",
            Collection::Events => "events",
            Collection::Categories => "categories",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("No backend URL configured")]
    MissingUrl,

    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("TLS setup failed: {0}")]
    Tls(String),

    #[error("Failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: hyper_util::client::legacy::Error,
    },

    #[error("{method} {url} returned {status}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
    },

    #[error("Failed to read response body from {url}: {reason}")]
    Body { url: String, reason: String },

    #[error("Malformed JSON from {url}: {source}")]
    Json {
        url: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug)]
pub struct RestClient {
    base_url: String,
    client: HttpsClient,
}

impl RestClient {
    pub fn new(url: &str, insecure: bool) -> Result<Self, ClientError> {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(ClientError::MissingUrl);
        }

        let uri: Uri = trimmed.parse().map_err(|e: http::uri::InvalidUri| {
            ClientError::InvalidUrl {
                url: url.to_string(),
                reason: e.to_string(),
            }
        })?;
        if uri.scheme().is_none() || uri.host().is_none() {
            return Err(ClientError::InvalidUrl {
                url: url.to_string(),
                reason: "expected scheme and host, e.g. http://localhost:3000".to_string(),
            });
        }
        let is_https = uri.scheme_str() == Some("https");

        let tls_config = if insecure {
            log::warn!("Certificate verification disabled for {}", trimmed);
            rustls::ClientConfig::builder()
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
                .with_no_client_auth()
        } else {
            let mut root_store = rustls::RootCertStore::empty();
            let result = rustls_native_certs::load_native_certs();
            root_store.add_parsable_certificates(result.certs);

            // Plain http backends (the usual json-server setup) need no roots.
            if is_https && root_store.is_empty() {
                return Err(ClientError::Tls(
                    "No valid system certificates found.".to_string(),
                ));
            }

            rustls::ClientConfig::builder()
                .with_root_certificates(root_store)
                .with_no_client_auth()
        };

        let https_connector = HttpsConnectorBuilder::new()
            .with_tls_config(tls_config)
            .https_or_http()
            .enable_http1()
            .build();

        let client = Client::builder(TokioExecutor::new()).build(https_connector);
        Ok(Self {
            base_url: trimmed.to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn event_path(id: &Id) -> String {
        let segment = id.as_text();
        format!(
            "{}/{}",
            Collection::Events.path(),
            utf8_percent_encode(&segment, PATH_SEGMENT)
        )
    }

    // --- READ OPERATIONS ---

    pub async fn get_collection<T: DeserializeOwned>(
        &self,
        collection: Collection,
    ) -> Result<Vec<T>, ClientError> {
        let url = self.url_for(collection.path());
        let body = self.send(Method::GET, &url, None).await?;
        serde_json::from_slice(&body).map_err(|source| ClientError::Json { url, source })
    }

    pub async fn get_users(&self) -> Result<Vec<User>, ClientError> {
        self.get_collection(Collection::Users).await
    }

    pub async fn get_events(&self) -> Result<Vec<Event>, ClientError> {
        self.get_collection(Collection::Events).await
    }

    pub async fn get_categories(&self) -> Result<Vec<Category>, ClientError> {
        self.get_collection(Collection::Categories).await
    }

    // --- WRITE OPERATIONS ---

    pub async fn create_event(&self, event: &Event) -> Result<(), ClientError> {
        let url = self.url_for(Collection::Events.path());
        let body = to_json(&url, event)?;
        self.send(Method::POST, &url, Some(body)).await.map(|_| ())
    }

    pub async fn update_event(&self, event: &Event) -> Result<(), ClientError> {
        let url = self.url_for(&Self::event_path(&event.id));
        let body = to_json(&url, event)?;
        self.send(Method::PUT, &url, Some(body)).await.map(|_| ())
    }

    pub async fn delete_event(&self, id: &Id) -> Result<(), ClientError> {
        let url = self.url_for(&Self::event_path(id));
        self.send(Method::DELETE, &url, None).await.map(|_| ())
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<String>,
    ) -> Result<Vec<u8>, ClientError> {
        log::debug!("{} {}", method, url);

        let mut builder = Request::builder()
            .method(method.clone())
            .uri(url)
            .header(ACCEPT, JSON);
        if body.is_some() {
            builder = builder.header(CONTENT_TYPE, JSON);
        }
        let request = builder.body(body.unwrap_or_default())?;

        let response = self.client.request(request).await.map_err(|source| {
            log::warn!("{} {} failed: {}", method, url, source);
            ClientError::Transport {
                url: url.to_string(),
                source,
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            log::warn!("{} {} returned {}", method, url, status);
            return Err(ClientError::Status {
                method,
                url: url.to_string(),
                status,
            });
        }

        let collected = response
            .into_body()
            .collect()
            .await
            .map_err(|e| ClientError::Body {
                url: url.to_string(),
                reason: e.to_string(),
            })?;
        Ok(collected.to_bytes().to_vec())
    }
}

fn to_json(url: &str, event: &Event) -> Result<String, ClientError> {
    serde_json::to_string(event).map_err(|source| ClientError::Json {
        url: url.to_string(),
        source,
    })
}

#[derive(Debug)]
struct NoVerifier;
impl rustls::client::danger::ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _: &rustls::pki_types::CertificateDer<'_>,
        _: &[rustls::pki_types::CertificateDer<'_>],
        _: &rustls::pki_types::ServerName<'_>,
        _: &[u8],
        _: rustls::pki_types::UnixTime,
    ) -> Result<rustls::client::danger::ServerCertVerified, rustls::Error> {
        Ok(rustls::client::danger::ServerCertVerified::assertion())
    }
    fn verify_tls12_signature(
        &self,
        _: &[u8],
        _: &rustls::pki_types::CertificateDer<'_>,
        _: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }
    fn verify_tls13_signature(
        &self,
        _: &[u8],
        _: &rustls::pki_types::CertificateDer<'_>,
        _: &rustls::DigitallySignedStruct,
    ) -> Result<rustls::client::danger::HandshakeSignatureValid, rustls::Error> {
        Ok(rustls::client::danger::HandshakeSignatureValid::assertion())
    }
    fn supported_verify_schemes(&self) -> Vec<rustls::SignatureScheme> {
        use rustls::SignatureScheme::*;
        vec![
            RSA_PKCS1_SHA256,
            RSA_PKCS1_SHA384,
            RSA_PKCS1_SHA512,
            ECDSA_NISTP256_SHA256,
            RSA_PSS_SHA256,
            ED25519,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_relative_urls() {
        assert!(matches!(RestClient::new("  ", false), Err(ClientError::MissingUrl)));
        assert!(matches!(
            RestClient::new("localhost", false),
            Err(ClientError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn trailing_slash_is_dropped() {
        let client = RestClient::new("http://localhost:3000/", false).unwrap();
        assert_eq!(client.base_url(), "http://localhost:3000");
        assert_eq!(client.url_for("events"), "http://localhost:3000/events");
    }

    #[test]
    fn event_ids_are_encoded_as_one_path_segment() {
        assert_eq!(RestClient::event_path(&Id::from(5)), "events/5");
        assert_eq!(RestClient::event_path(&Id::from("a b")), "events/a%20b");
        assert_eq!(RestClient::event_path(&Id::from("x/y?z#w")), "events/x%2Fy%3Fz%23w");
        assert_eq!(RestClient::event_path(&Id::from("café")), "events/caf%C3%A9");
    }
}
