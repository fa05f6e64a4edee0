/// Template input and document output.
///
/// The pipeline is wired against two narrow traits: a [`TemplateSource`]
/// that yields the template bytes and an [`OutputSink`] that persists the
/// finished document and hands out time-limited download URLs. The `client`
/// feature provides `blob::BlobStore`, which implements both against Azure
/// Blob Storage; [`MemoryStore`] implements both in process for tests and
/// embedding.
#[cfg(feature = "client")]
pub mod blob;

use crate::error::{Error, Result};
use std::collections::HashMap;
use std::sync::Mutex;

/// Folder prefix under which finished proposals are stored.
pub const OUTPUT_PREFIX: &str = "propuestas/";

/// Yields the bytes of the proposal template.
pub trait TemplateSource {
    fn fetch(&self) -> Result<Vec<u8>>;
}

/// Persists finished documents and issues download URLs for them.
pub trait OutputSink {
    /// Store `bytes` under `filename`, returning the full object name
    /// (output prefix included) to pass to [`OutputSink::signed_url`].
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String>;

    /// A read-only URL for a stored object, valid for `ttl_minutes`.
    fn signed_url(&self, name: &str, ttl_minutes: u32) -> Result<String>;
}

impl<T: TemplateSource + ?Sized> TemplateSource for &T {
    fn fetch(&self) -> Result<Vec<u8>> {
        (**self).fetch()
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &S {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        (**self).store(filename, bytes)
    }

    fn signed_url(&self, name: &str, ttl_minutes: u32) -> Result<String> {
        (**self).signed_url(name, ttl_minutes)
    }
}

/// In-process store: a fixed template plus a map of stored objects.
///
/// Signed URLs use a `memory://` scheme and perform no access control; the
/// type exists so the pipeline can run without network credentials.
#[derive(Debug, Default)]
pub struct MemoryStore {
    template: Vec<u8>,
    objects: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new(template: Vec<u8>) -> Self {
        Self {
            template,
            objects: Mutex::new(HashMap::new()),
        }
    }

    /// The stored bytes for `name`, if present.
    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .ok()
            .and_then(|objects| objects.get(name).cloned())
    }

    pub fn names(&self) -> Vec<String> {
        self.objects
            .lock()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl TemplateSource for MemoryStore {
    fn fetch(&self) -> Result<Vec<u8>> {
        if self.template.is_empty() {
            return Err(Error::Storage("no template loaded".to_string()));
        }
        Ok(self.template.clone())
    }
}

impl OutputSink for MemoryStore {
    fn store(&self, filename: &str, bytes: &[u8]) -> Result<String> {
        let name = format!("{OUTPUT_PREFIX}{filename}");
        self.objects
            .lock()
            .map_err(|_| Error::Storage("store poisoned".to_string()))?
            .insert(name.clone(), bytes.to_vec());
        Ok(name)
    }

    fn signed_url(&self, name: &str, ttl_minutes: u32) -> Result<String> {
        let exists = self
            .objects
            .lock()
            .map_err(|_| Error::Storage("store poisoned".to_string()))?
            .contains_key(name);
        if !exists {
            return Err(Error::Storage(format!("unknown object: {name}")));
        }
        Ok(format!("memory://{name}?expires_in={ttl_minutes}m"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_returns_template() {
        let store = MemoryStore::new(b"plantilla".to_vec());
        assert_eq!(store.fetch().unwrap(), b"plantilla");
    }

    #[test]
    fn test_empty_template_is_error() {
        let store = MemoryStore::default();
        assert!(matches!(store.fetch(), Err(Error::Storage(_))));
    }

    #[test]
    fn test_store_prefixes_and_keeps_bytes() {
        let store = MemoryStore::default();

        let name = store.store("doc.docx", b"contenido").unwrap();

        assert_eq!(name, "propuestas/doc.docx");
        assert_eq!(store.get(&name).unwrap(), b"contenido");
    }

    #[test]
    fn test_signed_url_requires_stored_object() {
        let store = MemoryStore::default();
        assert!(store.signed_url("propuestas/nada.docx", 60).is_err());

        let name = store.store("doc.docx", b"x").unwrap();
        let url = store.signed_url(&name, 1440).unwrap();
        assert_eq!(url, "memory://propuestas/doc.docx?expires_in=1440m");
    }
}
