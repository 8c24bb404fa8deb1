/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Per-algorithm encoding of ordering parameters into the `ConsensusType` value and its side values.
//!
//! The shape of the consensus metadata differs per [orderer type](OrdererType):
//! - `solo`: empty metadata, no side values.
//! - `kafka`: empty metadata, plus a `KafkaBrokers` side value that copies the brokers verbatim.
//! - `etcdraft`: a Borsh-serialized [`ConfigMetadata`] holding every consenter with its TLS certificates
//!   resolved into bytes, and the Raft options. No side values.
//!
//! ## Certificate references and resolved certificates
//!
//! Consenters are specified with [`CertificateRef`]s. These are resolved by a pluggable
//! [`CertificateResolver`] into [`ResolvedConsenter`]s, which only ever hold certificate bytes. The two
//! are distinct types, so a consenter whose certificates have not been resolved cannot be serialized.

use std::{
    fmt::{self, Display, Formatter},
    fs, io,
};

use borsh::{BorshDeserialize, BorshSerialize};

use crate::{
    error::OrdererConfigError,
    logging,
    types::values::KafkaBrokers,
};

use super::spec::{CertificateRef, Consenter, EtcdRaft, Orderer, OrdererType, RaftOptions};

/// Resolves [certificate references](CertificateRef) into certificate bytes.
pub trait CertificateResolver {
    fn resolve(&self, cert: &CertificateRef) -> io::Result<Vec<u8>>;
}

/// A [`CertificateResolver`] that treats certificate references as paths on the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct FileCertificateResolver;

impl CertificateResolver for FileCertificateResolver {
    fn resolve(&self, cert: &CertificateRef) -> io::Result<Vec<u8>> {
        fs::read(cert.path())
    }
}

/// Which of a consenter's two TLS certificates is being referred to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CertificateRole {
    Client,
    Server,
}

impl Display for CertificateRole {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CertificateRole::Client => f.write_str("client"),
            CertificateRole::Server => f.write_str("server"),
        }
    }
}

/// A Raft consenter whose TLS certificates have been resolved into bytes.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ResolvedConsenter {
    pub host: String,
    pub port: u32,
    pub client_tls_cert: Vec<u8>,
    pub server_tls_cert: Vec<u8>,
}

/// The consensus metadata of the `etcdraft` orderer type.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ConfigMetadata {
    pub consenters: Vec<ResolvedConsenter>,
    pub options: Option<RaftOptions>,
}

/// The result of encoding an orderer's consensus parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsensusEncoding {
    /// Opaque metadata to embed in the `ConsensusType` value.
    pub metadata: Vec<u8>,

    /// The `KafkaBrokers` side value. Only `Some` for the `kafka` orderer type.
    pub kafka_brokers: Option<KafkaBrokers>,
}

/// Encode the consensus parameters of `orderer` according to its orderer type.
///
/// For `etcdraft`, every consenter's certificates are resolved using `certs`. If any certificate cannot be
/// resolved, nothing is returned.
pub fn encode_consensus<R: CertificateResolver>(
    orderer: &Orderer,
    certs: &R,
) -> Result<ConsensusEncoding, OrdererConfigError> {
    match orderer.orderer_type {
        OrdererType::Solo => Ok(ConsensusEncoding {
            metadata: Vec::new(),
            kafka_brokers: None,
        }),
        OrdererType::Kafka => Ok(ConsensusEncoding {
            metadata: Vec::new(),
            kafka_brokers: Some(KafkaBrokers {
                brokers: orderer.kafka.brokers.clone(),
            }),
        }),
        OrdererType::EtcdRaft => Ok(ConsensusEncoding {
            metadata: marshal_etcd_raft_metadata(&orderer.etcd_raft, certs)?,
            kafka_brokers: None,
        }),
    }
}

/// Resolve the certificates of every consenter in `etcd_raft`, then serialize the resolved consenters
/// together with the Raft options.
pub fn marshal_etcd_raft_metadata<R: CertificateResolver>(
    etcd_raft: &EtcdRaft,
    certs: &R,
) -> Result<Vec<u8>, OrdererConfigError> {
    let consenters = etcd_raft
        .consenters
        .iter()
        .map(|consenter| resolve_consenter(consenter, certs))
        .collect::<Result<Vec<ResolvedConsenter>, OrdererConfigError>>()?;

    let metadata = ConfigMetadata {
        consenters,
        options: etcd_raft.options.clone(),
    };

    metadata
        .try_to_vec()
        .map_err(|err| OrdererConfigError::MetadataSerialization { source: err })
}

/// Deserialize the `etcdraft` consensus metadata stored in a `ConsensusType` value.
pub fn decode_etcd_raft_metadata(bytes: &[u8]) -> Result<ConfigMetadata, MetadataDecodeError> {
    ConfigMetadata::try_from_slice(bytes).map_err(MetadataDecodeError)
}

/// The `etcdraft` consensus metadata of a `ConsensusType` value could not be deserialized.
#[derive(Debug)]
pub struct MetadataDecodeError(pub io::Error);

impl Display for MetadataDecodeError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "unmarshaling etcdraft config metadata: {}", self.0)
    }
}

impl std::error::Error for MetadataDecodeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

fn resolve_consenter<R: CertificateResolver>(
    consenter: &Consenter,
    certs: &R,
) -> Result<ResolvedConsenter, OrdererConfigError> {
    let resolve = |cert: &CertificateRef,
                   role: CertificateRole|
     -> Result<Vec<u8>, OrdererConfigError> {
        let bytes = certs
            .resolve(cert)
            .map_err(|err| OrdererConfigError::CertificateResolution {
                host: consenter.host.clone(),
                port: consenter.port,
                role,
                source: err,
            })?;
        logging::log_resolve_consenter_cert(&consenter.host, consenter.port, role, cert, &bytes);
        Ok(bytes)
    };

    let client_tls_cert = resolve(&consenter.client_tls_cert, CertificateRole::Client)?;
    let server_tls_cert = resolve(&consenter.server_tls_cert, CertificateRole::Server)?;

    Ok(ResolvedConsenter {
        host: consenter.host.clone(),
        port: consenter.port,
        client_tls_cert,
        server_tls_cert,
    })
}
