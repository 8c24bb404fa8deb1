/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Decoding the orderer configuration back out of a channel configuration tree.

use std::collections::{BTreeMap, BTreeSet};

use borsh::BorshDeserialize;

use crate::{
    error::OrdererConfigError,
    types::{
        config_tree::{decode_value, ChannelConfig, ConfigGroup},
        values::{
            BatchSize, BatchTimeout, Capabilities, ChannelRestrictions, ConsensusType, KafkaBrokers,
            OrdererAddresses, BATCH_SIZE_KEY, BATCH_TIMEOUT_KEY, CAPABILITIES_KEY,
            CHANNEL_GROUP_KEY, CHANNEL_RESTRICTIONS_KEY, CONSENSUS_TYPE_KEY, ENDPOINTS_KEY,
            KAFKA_BROKERS_KEY, ORDERER_ADDRESSES_KEY, ORDERER_GROUP_KEY,
        },
    },
};

use super::{
    metadata::{decode_etcd_raft_metadata, ConfigMetadata},
    spec::{ConsensusState, OrdererType},
};

/// The orderer configuration of a channel, as stored in its configuration tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrdererConfiguration {
    pub orderer_type: OrdererType,
    pub state: ConsensusState,
    pub batch_size: BatchSize,

    /// The batch timeout in canonical duration text.
    pub batch_timeout: String,
    pub max_channels: u64,

    /// Empty if no `Capabilities` value is stored.
    pub capabilities: BTreeSet<String>,

    /// The raw consensus metadata.
    pub consensus_metadata: Vec<u8>,

    /// The decoded consensus metadata. Only `Some` if `orderer_type` is `EtcdRaft`.
    pub etcd_raft: Option<ConfigMetadata>,

    /// Empty if no `KafkaBrokers` value is stored.
    pub kafka_brokers: Vec<String>,

    /// The channel-scoped orderer addresses. Empty if no `OrdererAddresses` value is stored.
    pub addresses: Vec<String>,

    /// The endpoints of every orderer organization, keyed by organization name.
    pub org_endpoints: BTreeMap<String, Vec<String>>,
}

/// Decode the orderer configuration of `config`.
pub fn orderer_configuration(
    config: &ChannelConfig,
) -> Result<OrdererConfiguration, OrdererConfigError> {
    let orderer_group = orderer_group(config)?;

    let consensus_type: ConsensusType = required_value(orderer_group, CONSENSUS_TYPE_KEY)?;
    let orderer_type: OrdererType = consensus_type.consensus_type.parse()?;
    let state = ConsensusState::from_code(consensus_type.state)?;

    let etcd_raft = match orderer_type {
        OrdererType::EtcdRaft => Some(decode_etcd_raft_metadata(&consensus_type.metadata)?),
        OrdererType::Solo | OrdererType::Kafka => None,
    };

    let batch_size: BatchSize = required_value(orderer_group, BATCH_SIZE_KEY)?;
    let batch_timeout: BatchTimeout = required_value(orderer_group, BATCH_TIMEOUT_KEY)?;
    let channel_restrictions: ChannelRestrictions =
        required_value(orderer_group, CHANNEL_RESTRICTIONS_KEY)?;

    let capabilities =
        decode_value::<Capabilities>(orderer_group, ORDERER_GROUP_KEY, CAPABILITIES_KEY)?
            .unwrap_or_default();
    let kafka_brokers =
        decode_value::<KafkaBrokers>(orderer_group, ORDERER_GROUP_KEY, KAFKA_BROKERS_KEY)?
            .unwrap_or_default();
    let addresses = decode_value::<OrdererAddresses>(
        &config.channel_group,
        CHANNEL_GROUP_KEY,
        ORDERER_ADDRESSES_KEY,
    )?
    .unwrap_or_default();

    let mut org_endpoints = BTreeMap::new();
    for (org_name, org_group) in orderer_group.groups() {
        let endpoints = decode_value::<OrdererAddresses>(org_group, org_name, ENDPOINTS_KEY)?
            .unwrap_or_default();
        org_endpoints.insert(org_name.clone(), endpoints.addresses);
    }

    Ok(OrdererConfiguration {
        orderer_type,
        state,
        batch_size,
        batch_timeout: batch_timeout.timeout,
        max_channels: channel_restrictions.max_count,
        capabilities: capabilities.capabilities,
        consensus_metadata: consensus_type.metadata,
        etcd_raft,
        kafka_brokers: kafka_brokers.brokers,
        addresses: addresses.addresses,
        org_endpoints,
    })
}

/// Get the endpoints of the orderer organization `org_name` in `config`. An organization without an
/// `Endpoints` value has no endpoints.
pub fn orderer_org_endpoints(
    config: &ChannelConfig,
    org_name: &str,
) -> Result<Vec<String>, OrdererConfigError> {
    let org_group = orderer_group(config)?.group(org_name).ok_or_else(|| {
        OrdererConfigError::MissingOrganization {
            org: org_name.to_string(),
        }
    })?;

    Ok(
        decode_value::<OrdererAddresses>(org_group, org_name, ENDPOINTS_KEY)?
            .unwrap_or_default()
            .addresses,
    )
}

fn orderer_group(config: &ChannelConfig) -> Result<&ConfigGroup, OrdererConfigError> {
    config
        .channel_group
        .group(ORDERER_GROUP_KEY)
        .ok_or_else(|| OrdererConfigError::MissingGroup {
            group: ORDERER_GROUP_KEY.to_string(),
        })
}

fn required_value<T: BorshDeserialize>(
    orderer_group: &ConfigGroup,
    key: &str,
) -> Result<T, OrdererConfigError> {
    decode_value::<T>(orderer_group, ORDERER_GROUP_KEY, key)?.ok_or_else(|| {
        OrdererConfigError::MissingValue {
            group: ORDERER_GROUP_KEY.to_string(),
            key: key.to_string(),
        }
    })
}
