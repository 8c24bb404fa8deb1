/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The error type returned by every fallible operation in this crate.

use std::{
    error::Error,
    fmt::{self, Display, Formatter},
    io,
};

use crate::{
    orderer::metadata::{CertificateRole, MetadataDecodeError},
    types::values::{CONSENSUS_TYPE_KEY, ORDERER_GROUP_KEY},
};

/// Errors that may be encountered when building, updating, or reading the `Orderer` group of a
/// [channel configuration](crate::types::config_tree::ChannelConfig).
///
/// No operation in this crate retries internally. Every error is returned unchanged to the caller, who
/// decides whether to discard the in-progress configuration transaction.
#[derive(Debug)]
pub enum OrdererConfigError {
    /// A policy map used to build an `Orderer` group does not define a required policy (usually
    /// `BlockValidation`).
    MissingPolicy { policy: String },

    /// A consensus type string does not name one of the known orderer types.
    UnknownOrdererType { orderer_type: String },

    /// A consensus state string or numeric code does not name one of the known consensus states.
    UnknownConsensusState { state: String },

    /// The TLS certificate of a Raft consenter could not be resolved into bytes.
    CertificateResolution {
        host: String,
        port: u32,
        role: CertificateRole,
        source: io::Error,
    },

    /// The Raft consensus metadata could not be serialized.
    MetadataSerialization { source: io::Error },

    /// A config value payload could not be serialized.
    SerializeValue { key: String, source: io::Error },

    /// An orderer organization already lists `endpoint` among its endpoints.
    DuplicateEndpoint { org: String, endpoint: String },

    /// A group that an operation expects to find in the configuration tree does not exist.
    MissingGroup { group: String },

    /// An orderer organization that an operation expects to find does not exist.
    MissingOrganization { org: String },

    /// A value that an operation expects to find in a group does not exist.
    MissingValue { group: String, key: String },

    /// A value stored in the configuration tree could not be decoded into its expected type.
    MalformedValue {
        group: String,
        key: String,
        source: io::Error,
    },

    /// An organization was specified without an MSP ID.
    MissingMspId { org: String },

    /// Building the subgroup of the orderer organization `org` failed.
    OrganizationGroup {
        org: String,
        source: Box<OrdererConfigError>,
    },
}

impl Display for OrdererConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OrdererConfigError::MissingPolicy { policy } => write!(f, "no {} policy defined", policy),
            OrdererConfigError::UnknownOrdererType { orderer_type } => {
                write!(f, "unknown orderer type '{}'", orderer_type)
            }
            OrdererConfigError::UnknownConsensusState { state } => {
                write!(f, "unknown consensus state '{}'", state)
            }
            OrdererConfigError::CertificateResolution {
                host,
                port,
                role,
                source,
            } => write!(
                f,
                "cannot load {} cert for consenter {}:{}: {}",
                role, host, port, source
            ),
            OrdererConfigError::MetadataSerialization { source } => {
                write!(f, "marshaling etcdraft config metadata: {}", source)
            }
            OrdererConfigError::SerializeValue { key, source } => {
                write!(f, "serializing config value {}: {}", key, source)
            }
            OrdererConfigError::DuplicateEndpoint { org, endpoint } => write!(
                f,
                "orderer org {} already contains endpoint {}",
                org, endpoint
            ),
            OrdererConfigError::MissingGroup { group } => {
                write!(f, "group {} does not exist in channel config", group)
            }
            OrdererConfigError::MissingOrganization { org } => {
                write!(f, "orderer org {} does not exist in channel config", org)
            }
            OrdererConfigError::MissingValue { group, key } => {
                write!(f, "value {} does not exist in group {}", key, group)
            }
            OrdererConfigError::MalformedValue { group, key, source } => {
                write!(f, "failed decoding value {} of group {}: {}", key, group, source)
            }
            OrdererConfigError::MissingMspId { org } => {
                write!(f, "org '{}' does not define an MSP ID", org)
            }
            OrdererConfigError::OrganizationGroup { org, source } => {
                write!(f, "org group '{}': {}", org, source)
            }
        }
    }
}

impl Error for OrdererConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            OrdererConfigError::CertificateResolution { source, .. }
            | OrdererConfigError::MetadataSerialization { source }
            | OrdererConfigError::SerializeValue { source, .. }
            | OrdererConfigError::MalformedValue { source, .. } => Some(source),
            OrdererConfigError::OrganizationGroup { source, .. } => Some(source.as_ref()),
            _ => None,
        }
    }
}

// Consensus metadata is only ever stored in the `ConsensusType` value of the `Orderer` group.
impl From<MetadataDecodeError> for OrdererConfigError {
    fn from(err: MetadataDecodeError) -> Self {
        OrdererConfigError::MalformedValue {
            group: ORDERER_GROUP_KEY.to_string(),
            key: CONSENSUS_TYPE_KEY.to_string(),
            source: err.0,
        }
    }
}
