//! Azure Blob Storage backend.
//!
//! Talks to the Blob REST endpoints directly, authorizing every request with
//! a short-lived service SAS signed locally from the account key. The same
//! signing path produces the long-lived read URL returned to callers.
use super::{OUTPUT_PREFIX, OutputSink, TemplateSource};
use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{Duration, SecondsFormat, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;

/// Service version the SAS tokens are signed against.
const SAS_VERSION: &str = "2021-08-06";

const DOCX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Connection settings for one storage account and container.
#[derive(Debug, Clone)]
pub struct BlobConfig {
    pub account: String,
    /// Base64-encoded shared account key.
    pub key: String,
    pub endpoint_suffix: String,
    pub container: String,
    /// Blob name of the proposal template.
    pub template_blob: String,
}

impl BlobConfig {
    /// Parse an Azure storage connection string
    /// (`AccountName=...;AccountKey=...;EndpointSuffix=...`).
    pub fn from_connection_string(connection: &str, container: impl Into<String>) -> Result<Self> {
        let mut account = None;
        let mut key = None;
        let mut endpoint_suffix = "core.windows.net".to_string();

        for field in connection.split(';') {
            let Some((name, value)) = field.split_once('=') else {
                continue;
            };
            match name.trim() {
                "AccountName" => account = Some(value.to_string()),
                // Split at the first '=' only: base64 keys end in padding.
                "AccountKey" => key = Some(value.to_string()),
                "EndpointSuffix" => endpoint_suffix = value.to_string(),
                _ => {},
            }
        }

        Ok(Self {
            account: account
                .ok_or_else(|| Error::Config("connection string missing AccountName".into()))?,
            key: key.ok_or_else(|| Error::Config("connection string missing AccountKey".into()))?,
            endpoint_suffix,
            container: container.into(),
            template_blob: "plantilla/Plantilla-Propuesta.docx".to_string(),
        })
    }

    /// Read the connection string from `STORAGE_CONNECTION_STRING`.
    pub fn from_env(container: impl Into<String>) -> Result<Self> {
        let connection = std::env::var("STORAGE_CONNECTION_STRING")
            .map_err(|_| Error::Config("STORAGE_CONNECTION_STRING is not set".into()))?;
        Self::from_connection_string(&connection, container)
    }

    pub fn with_template_blob(mut self, blob: impl Into<String>) -> Self {
        self.template_blob = blob.into();
        self
    }

    fn blob_url(&self, blob: &str) -> String {
        format!(
            "https://{}.blob.{}/{}/{}",
            self.account, self.endpoint_suffix, self.container, blob
        )
    }

    /// Sign a read-only or write service SAS for one blob.
    ///
    /// `start`/`expiry` are RFC 3339 UTC timestamps. The string-to-sign
    /// follows the 2020-12-06+ service SAS layout.
    fn sign_sas(&self, blob: &str, permissions: &str, start: &str, expiry: &str) -> Result<String> {
        let canonical = format!("/blob/{}/{}/{}", self.account, self.container, blob);
        // 16 fields: sp, st, se, canonical resource, identifier, IP,
        // protocol, version, resource, snapshot, encryption scope and the
        // five response-header overrides, all blank here except resource "b".
        let string_to_sign = format!(
            "{permissions}\n{start}\n{expiry}\n{canonical}\n\n\n\n{SAS_VERSION}\nb\n\n\n\n\n\n\n"
        );

        let key = BASE64
            .decode(&self.key)
            .map_err(|e| Error::Config(format!("account key is not valid base64: {e}")))?;
        let mut mac = Hmac::<Sha256>::new_from_slice(&key)
            .map_err(|e| Error::Storage(format!("hmac init: {e}")))?;
        mac.update(string_to_sign.as_bytes());
        let signature = BASE64.encode(mac.finalize().into_bytes());

        Ok(format!(
            "sv={SAS_VERSION}&st={}&se={}&sr=b&sp={permissions}&sig={}",
            urlencoding::encode(start),
            urlencoding::encode(expiry),
            urlencoding::encode(&signature)
        ))
    }

    /// A fully signed URL for `blob`, valid for `ttl_minutes` from now.
    fn signed_blob_url(&self, blob: &str, permissions: &str, ttl_minutes: u32) -> Result<String> {
        let now = Utc::now();
        // Backdated start absorbs clock skew between us and the service.
        let start = (now - Duration::minutes(5)).to_rfc3339_opts(SecondsFormat::Secs, true);
        let expiry = (now + Duration::minutes(i64::from(ttl_minutes)))
            .to_rfc3339_opts(SecondsFormat::Secs, true);
        let token = self.sign_sas(blob, permissions, &start, &expiry)?;
        Ok(format!("{}?{token}", self.blob_url(blob)))
    }
}

/// Blob-backed template source and output sink.
pub struct BlobStore {
    config: BlobConfig,
    http: reqwest::blocking::Client,
}

impl BlobStore {
    pub fn new(config: BlobConfig) -> Self {
        Self {
            config,
            http: reqwest::blocking::Client::new(),
        }
    }

    pub fn from_env(container: impl Into<String>) -> Result<Self> {
        Ok(Self::new(BlobConfig::from_env(container)?))
    }
}

impl TemplateSource for BlobStore {
    fn fetch(&self) -> Result<Vec<u8>> {
        let url = self
            .config
            .signed_blob_url(&self.config.template_blob, "r", 10)?;
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| Error::Storage(format!("template download: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "template download returned {}",
                response.status()
            )));
        }
        let bytes = response
            .bytes()
            .map_err(|e| Error::Storage(format!("template download: {e}")))?;
        log::debug!(
            "downloaded template {} ({} bytes)",
            self.config.template_blob,
            bytes.len()
        );
        Ok(bytes.to_vec())
    }
}

impl OutputSink for BlobStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let name = format!("{OUTPUT_PREFIX}{filename}");
        let url = self.config.signed_blob_url(&name, "cw", 10)?;

        let response = self
            .http
            .put(url)
            .header("x-ms-blob-type", "BlockBlob")
            .header("Content-Type", DOCX_CONTENT_TYPE)
            .body(bytes.to_vec())
            .send()
            .map_err(|e| Error::Storage(format!("upload: {e}")))?;

        if !response.status().is_success() {
            return Err(Error::Storage(format!(
                "upload of {name} returned {}",
                response.status()
            )));
        }
        log::info!("uploaded {name} ({} bytes)", bytes.len());
        Ok(name)
    }

    fn signed_url(&self, name: &str, ttl_minutes: u32) -> Result<String> {
        self.config.signed_blob_url(name, "r", ttl_minutes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONNECTION: &str = "DefaultEndpointsProtocol=https;AccountName=propiasa;\
AccountKey=a2V5LWRlLXBydWViYQ==;EndpointSuffix=core.windows.net";

    #[test]
    fn test_parses_connection_string() {
        let config = BlobConfig::from_connection_string(CONNECTION, "propia").unwrap();
        assert_eq!(config.account, "propiasa");
        assert_eq!(config.key, "a2V5LWRlLXBydWViYQ==");
        assert_eq!(config.endpoint_suffix, "core.windows.net");
        assert_eq!(config.container, "propia");
    }

    #[test]
    fn test_missing_account_key_is_config_error() {
        let result = BlobConfig::from_connection_string("AccountName=x", "propia");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_endpoint_suffix_defaults() {
        let config =
            BlobConfig::from_connection_string("AccountName=x;AccountKey=aa==", "propia").unwrap();
        assert_eq!(config.endpoint_suffix, "core.windows.net");
    }

    #[test]
    fn test_blob_url_layout() {
        let config = BlobConfig::from_connection_string(CONNECTION, "propia").unwrap();
        assert_eq!(
            config.blob_url("propuestas/a.docx"),
            "https://propiasa.blob.core.windows.net/propia/propuestas/a.docx"
        );
    }

    #[test]
    fn test_sas_token_shape_and_stability() {
        let config = BlobConfig::from_connection_string(CONNECTION, "propia").unwrap();

        let a = config
            .sign_sas(
                "propuestas/a.docx",
                "r",
                "2026-01-01T00:00:00Z",
                "2026-01-02T00:00:00Z",
            )
            .unwrap();
        let b = config
            .sign_sas(
                "propuestas/a.docx",
                "r",
                "2026-01-01T00:00:00Z",
                "2026-01-02T00:00:00Z",
            )
            .unwrap();

        assert_eq!(a, b);
        assert!(a.starts_with(&format!("sv={SAS_VERSION}&st=2026-01-01T00%3A00%3A00Z&")));
        assert!(a.contains("&sr=b&sp=r&sig="));
        // Signature is percent-encoded base64, never empty.
        let sig = a.rsplit("sig=").next().unwrap();
        assert!(!sig.is_empty());
    }

    #[test]
    fn test_invalid_key_rejected_at_signing() {
        let config =
            BlobConfig::from_connection_string("AccountName=x;AccountKey=no-base64!", "propia")
                .unwrap();
        let result = config.sign_sas("b", "r", "st", "se");
        assert!(matches!(result, Err(Error::Config(_))));
    }
}
