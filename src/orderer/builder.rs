/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Construction of a brand new `Orderer` group.
//!
//! The `Orderer` group defines parameters of the ordering service, e.g., how large blocks should be and how
//! frequently they should be emitted, as well as the organizations of the ordering network. It is always
//! present in a channel configuration, and is created once, when the channel is first defined.
//!
//! Every group, value, and policy written by this module has `Admins` as its mod policy.

use std::collections::BTreeMap;

use crate::{
    error::OrdererConfigError,
    logging,
    types::{
        config_tree::{add_policies, add_value, ConfigGroup},
        policies::{Policy, ADMINS_POLICY_KEY, BLOCK_VALIDATION_POLICY_KEY},
        values::{
            duration_string, BatchTimeout, Capabilities, ChannelRestrictions, ConsensusType,
            BATCH_SIZE_KEY, BATCH_TIMEOUT_KEY, CAPABILITIES_KEY, CHANNEL_RESTRICTIONS_KEY,
            CONSENSUS_TYPE_KEY, KAFKA_BROKERS_KEY,
        },
    },
};

use super::{
    metadata::{encode_consensus, CertificateResolver},
    organizations::new_org_config_group,
    spec::Orderer,
};

/// Build the `Orderer` group of a channel configuration from `orderer`.
///
/// The returned group contains:
/// 1. The policies in `orderer.policies`, which must include `BlockValidation`.
/// 2. The standard orderer values (see [`add_orderer_values`]).
/// 3. One subgroup per organization in `orderer.organizations`, keyed by organization name.
///
/// `certs` is used to resolve the TLS certificates of Raft consenters if `orderer.orderer_type` is
/// `EtcdRaft`.
pub fn new_orderer_group<R: CertificateResolver>(
    orderer: &Orderer,
    certs: &R,
) -> Result<ConfigGroup, OrdererConfigError> {
    let result = build_orderer_group(orderer, certs);
    logging::log_new_orderer_group(orderer, result.as_ref().map(|_| ()));
    result
}

fn build_orderer_group<R: CertificateResolver>(
    orderer: &Orderer,
    certs: &R,
) -> Result<ConfigGroup, OrdererConfigError> {
    let mut orderer_group = ConfigGroup::new();
    orderer_group.mod_policy = ADMINS_POLICY_KEY.to_string();

    add_orderer_policies(&mut orderer_group, &orderer.policies, ADMINS_POLICY_KEY)?;

    add_orderer_values(&mut orderer_group, orderer, certs)?;

    for org in &orderer.organizations {
        let org_group =
            new_org_config_group(org).map_err(|err| OrdererConfigError::OrganizationGroup {
                org: org.name.clone(),
                source: Box::new(err),
            })?;
        orderer_group.replace_group(&org.name, org_group);
    }

    Ok(orderer_group)
}

/// Write the standard orderer values of `orderer` into `orderer_group`, replacing existing values under
/// the same keys. In order:
/// 1. `BatchSize`.
/// 2. `BatchTimeout`.
/// 3. `ChannelRestrictions`.
/// 4. `Capabilities`, only if `orderer.capabilities` is non-empty.
/// 5. `KafkaBrokers`, only if `orderer.orderer_type` is `Kafka`.
/// 6. `ConsensusType`.
///
/// If encoding the consensus metadata fails, values 1 to 4 have already been written, but `ConsensusType`
/// has not.
pub(crate) fn add_orderer_values<R: CertificateResolver>(
    orderer_group: &mut ConfigGroup,
    orderer: &Orderer,
    certs: &R,
) -> Result<(), OrdererConfigError> {
    add_value(
        orderer_group,
        BATCH_SIZE_KEY,
        &orderer.batch_size,
        ADMINS_POLICY_KEY,
    )?;

    add_value(
        orderer_group,
        BATCH_TIMEOUT_KEY,
        &BatchTimeout {
            timeout: duration_string(orderer.batch_timeout),
        },
        ADMINS_POLICY_KEY,
    )?;

    add_value(
        orderer_group,
        CHANNEL_RESTRICTIONS_KEY,
        &ChannelRestrictions {
            max_count: orderer.max_channels,
        },
        ADMINS_POLICY_KEY,
    )?;

    if !orderer.capabilities.is_empty() {
        add_value(
            orderer_group,
            CAPABILITIES_KEY,
            &Capabilities {
                capabilities: orderer.capabilities.clone(),
            },
            ADMINS_POLICY_KEY,
        )?;
    }

    let consensus = encode_consensus(orderer, certs)?;

    if let Some(kafka_brokers) = &consensus.kafka_brokers {
        add_value(
            orderer_group,
            KAFKA_BROKERS_KEY,
            kafka_brokers,
            ADMINS_POLICY_KEY,
        )?;
    }

    add_value(
        orderer_group,
        CONSENSUS_TYPE_KEY,
        &ConsensusType {
            consensus_type: orderer.orderer_type.as_str().to_string(),
            metadata: consensus.metadata,
            state: orderer.state.code(),
        },
        ADMINS_POLICY_KEY,
    )
}

/// Install `policies` into `orderer_group`, after checking that they include the `BlockValidation`
/// policy. Nothing is installed if the check fails.
pub(crate) fn add_orderer_policies(
    orderer_group: &mut ConfigGroup,
    policies: &BTreeMap<String, Policy>,
    mod_policy: &str,
) -> Result<(), OrdererConfigError> {
    if !policies.contains_key(BLOCK_VALIDATION_POLICY_KEY) {
        return Err(OrdererConfigError::MissingPolicy {
            policy: BLOCK_VALIDATION_POLICY_KEY.to_string(),
        });
    }

    add_policies(orderer_group, policies, mod_policy);
    Ok(())
}
