/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Declarative specifications of an ordering service and its member organizations.
//!
//! These types are inputs only. They are never stored in the configuration tree as-is. Instead,
//! [`new_orderer_group`](super::builder::new_orderer_group) and friends translate them into config values.
//!
//! Specifications are constructed with the builder pattern, for example:
//!
//! ```ignore
//! let orderer =
//!     Orderer::builder()
//!     .orderer_type(OrdererType::EtcdRaft)
//!     .policies(policies)
//!     .addresses(vec!["orderer0.example.com:7050".to_string()])
//!     .batch_timeout(Duration::from_secs(2))
//!     .etcd_raft(etcd_raft)
//!     .organizations(vec![org])
//!     .build()
//! ```

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt::{self, Display, Formatter},
    path::{Path, PathBuf},
    str::FromStr,
    time::Duration,
};

use borsh::{BorshDeserialize, BorshSerialize};
use typed_builder::TypedBuilder;

use crate::{
    error::OrdererConfigError,
    types::{policies::Policy, values::BatchSize},
};

/// The consensus algorithm run by the ordering service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OrdererType {
    Solo,
    Kafka,
    EtcdRaft,
}

impl OrdererType {
    /// Get the string that identifies this orderer type inside a
    /// [`ConsensusType`](crate::types::values::ConsensusType) value.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OrdererType::Solo => "solo",
            OrdererType::Kafka => "kafka",
            OrdererType::EtcdRaft => "etcdraft",
        }
    }
}

impl Display for OrdererType {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrdererType {
    type Err = OrdererConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "solo" => Ok(OrdererType::Solo),
            "kafka" => Ok(OrdererType::Kafka),
            "etcdraft" => Ok(OrdererType::EtcdRaft),
            _ => Err(OrdererConfigError::UnknownOrdererType {
                orderer_type: s.to_string(),
            }),
        }
    }
}

/// The mode of operation of the ordering service.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ConsensusState {
    /// The ordering service orders transactions normally.
    #[default]
    Normal,

    /// The ordering service only accepts configuration transactions from orderer administrators, e.g.,
    /// while migrating between consensus types.
    Maintenance,
}

impl ConsensusState {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConsensusState::Normal => "STATE_NORMAL",
            ConsensusState::Maintenance => "STATE_MAINTENANCE",
        }
    }

    /// Get the numeric code that represents this state inside a
    /// [`ConsensusType`](crate::types::values::ConsensusType) value.
    pub const fn code(&self) -> i32 {
        match self {
            ConsensusState::Normal => 0,
            ConsensusState::Maintenance => 1,
        }
    }

    /// Get the state represented by the numeric `code`.
    pub fn from_code(code: i32) -> Result<ConsensusState, OrdererConfigError> {
        match code {
            0 => Ok(ConsensusState::Normal),
            1 => Ok(ConsensusState::Maintenance),
            _ => Err(OrdererConfigError::UnknownConsensusState {
                state: code.to_string(),
            }),
        }
    }
}

impl Display for ConsensusState {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConsensusState {
    type Err = OrdererConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STATE_NORMAL" => Ok(ConsensusState::Normal),
            "STATE_MAINTENANCE" => Ok(ConsensusState::Maintenance),
            _ => Err(OrdererConfigError::UnknownConsensusState {
                state: s.to_string(),
            }),
        }
    }
}

/// Specification of the ordering service behavior for a channel.
#[derive(Clone, Debug, TypedBuilder)]
#[builder(builder_method(doc = "
    Create a builder for building an [Orderer]. On the builder call the following methods to construct a valid [Orderer].

    Required:
    - `.orderer_type(...)`
    - `.policies(...)`

    Optional:
    - `.addresses(...)`
    - `.batch_size(...)`
    - `.batch_timeout(...)`
    - `.kafka(...)`
    - `.etcd_raft(...)`
    - `.organizations(...)`
    - `.max_channels(...)`
    - `.capabilities(...)`
    - `.state(...)`
"))]
pub struct Orderer {
    #[builder(setter(doc = "Set the consensus algorithm of the ordering service. Required."))]
    pub orderer_type: OrdererType,

    #[builder(setter(doc = "Set the policies of the `Orderer` group. Must include `BlockValidation`. Required."))]
    pub policies: BTreeMap<String, Policy>,

    #[builder(
        default,
        setter(doc = "Set the channel-scoped list of orderer addresses. Defaults to an empty list.")
    )]
    pub addresses: Vec<String>,

    #[builder(default, setter(doc = "Set the batch size parameters. Defaults to `BatchSize::default()`."))]
    pub batch_size: BatchSize,

    #[builder(
        default = Duration::from_secs(2),
        setter(doc = "Set the wait time between transactions. Defaults to 2 seconds.")
    )]
    pub batch_timeout: Duration,

    #[builder(default, setter(doc = "Set the Kafka brokers. Only used by the `kafka` orderer type."))]
    pub kafka: Kafka,

    #[builder(default, setter(doc = "Set the Raft consenters and options. Only used by the `etcdraft` orderer type."))]
    pub etcd_raft: EtcdRaft,

    #[builder(default, setter(doc = "Set the member organizations of the ordering service."))]
    pub organizations: Vec<Organization>,

    #[builder(
        default,
        setter(doc = "Set the maximum count of channels the orderer supports. Defaults to 0 (unlimited).")
    )]
    pub max_channels: u64,

    #[builder(
        default,
        setter(doc = "Set the capabilities the orderer supports. The value is only written if non-empty.")
    )]
    pub capabilities: BTreeSet<String>,

    #[builder(default, setter(doc = "Set the consensus state. Defaults to `ConsensusState::Normal`."))]
    pub state: ConsensusState,
}

/// Addresses of the Kafka brokers used by the `kafka` orderer type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Kafka {
    /// Addresses of *at least two* Kafka brokers in `IP:port` notation.
    pub brokers: Vec<String>,
}

/// Consenters and options of the `etcdraft` orderer type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EtcdRaft {
    pub consenters: Vec<Consenter>,
    pub options: Option<RaftOptions>,
}

/// A node participating in Raft consensus, with its TLS certificates given by reference.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct Consenter {
    #[builder(setter(into))]
    pub host: String,
    pub port: u32,
    #[builder(setter(into))]
    pub client_tls_cert: CertificateRef,
    #[builder(setter(into))]
    pub server_tls_cert: CertificateRef,
}

/// A reference to a PEM-encoded certificate that has not been loaded yet, e.g., its path on the local
/// filesystem.
///
/// References are resolved into bytes by a
/// [`CertificateResolver`](super::metadata::CertificateResolver).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CertificateRef(PathBuf);

impl CertificateRef {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Display for CertificateRef {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

impl From<&str> for CertificateRef {
    fn from(path: &str) -> Self {
        CertificateRef::new(path)
    }
}

impl From<PathBuf> for CertificateRef {
    fn from(path: PathBuf) -> Self {
        CertificateRef::new(path)
    }
}

/// Tuning options of the `etcdraft` orderer type. Serialized into the consensus metadata verbatim.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct RaftOptions {
    /// Time interval between two Raft ticks, in canonical duration text, e.g., `"500ms"`.
    pub tick_interval: String,

    /// Number of ticks that must pass without hearing from the leader before a follower campaigns.
    pub election_tick: u32,

    /// Number of ticks between leader heartbeats.
    pub heartbeat_tick: u32,

    /// Maximum number of in-flight append messages during optimistic replication.
    pub max_inflight_blocks: u32,

    /// Amount of bytes per snapshot.
    pub snapshot_interval_size: u32,
}

impl Default for RaftOptions {
    fn default() -> Self {
        RaftOptions {
            tick_interval: "500ms".to_string(),
            election_tick: 10,
            heartbeat_tick: 1,
            max_inflight_blocks: 5,
            snapshot_interval_size: 16 * 1024 * 1024,
        }
    }
}

/// Specification of a member organization of the ordering service.
#[derive(Clone, Debug, PartialEq, Eq, TypedBuilder)]
pub struct Organization {
    #[builder(setter(into))]
    pub name: String,

    /// ID of the organization's membership service provider. Must not be empty.
    #[builder(setter(into))]
    pub msp_id: String,

    #[builder(default)]
    pub policies: BTreeMap<String, Policy>,

    /// Endpoints of the organization's orderer nodes. Written only if non-empty.
    #[builder(default)]
    pub orderer_endpoints: Vec<String>,
}
