//! A simple, volatile, in-memory implementation of [`CertificateResolver`].

use std::{collections::HashMap, io, path::PathBuf};

use orderer_config::orderer::{metadata::CertificateResolver, spec::CertificateRef};

/// An in-memory implementation of [`CertificateResolver`]. Resolving a reference that was never
/// inserted fails with `io::ErrorKind::NotFound`.
#[derive(Clone, Default)]
pub(crate) struct MemCerts(HashMap<PathBuf, Vec<u8>>);

impl MemCerts {
    /// Create a new, empty `MemCerts`.
    pub(crate) fn new() -> MemCerts {
        MemCerts(HashMap::new())
    }

    /// Make `path` resolve to `pem`.
    pub(crate) fn insert(&mut self, path: &str, pem: &[u8]) {
        self.0.insert(PathBuf::from(path), pem.to_vec());
    }
}

impl CertificateResolver for MemCerts {
    fn resolve(&self, cert: &CertificateRef) -> io::Result<Vec<u8>> {
        self.0.get(cert.path()).cloned().ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::NotFound,
                format!("no certificate at {}", cert),
            )
        })
    }
}
