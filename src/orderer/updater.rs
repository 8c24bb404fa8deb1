/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! In-place update of the standard values of an existing `Orderer` group.

use crate::{
    error::OrdererConfigError,
    logging,
    types::{
        config_tree::{add_value, ChannelConfig},
        policies::ORDERER_ADMINS_POLICY_NAME,
        values::{OrdererAddresses, ORDERER_ADDRESSES_KEY, ORDERER_GROUP_KEY},
    },
};

use super::{builder::add_orderer_values, metadata::CertificateResolver, spec::Orderer};

/// Overwrite the orderer configuration of `config` with the values in `orderer`.
///
/// The following are replaced wholesale:
/// - The channel-scoped `OrdererAddresses` value of the `Channel` group, only if `orderer.addresses` is
///   non-empty. This value is written under the `/Channel/Orderer/Admins` mod policy.
/// - The standard orderer values of the `Orderer` group. These are the same values that
///   [`new_orderer_group`](super::builder::new_orderer_group) writes.
///
/// Everything else is left untouched: the organization subgroups and policies of the `Orderer` group
/// (including `orderer.organizations` and `orderer.policies`, which are ignored), and every sibling group.
/// A stale `KafkaBrokers` or `Capabilities` value is not removed when the new `orderer` does not write one.
///
/// Fails with [`MissingGroup`](OrdererConfigError::MissingGroup) if `config` has no `Orderer` group. In
/// that case, `config` is not modified.
pub fn update_orderer_configuration<R: CertificateResolver>(
    config: &mut ChannelConfig,
    orderer: &Orderer,
    certs: &R,
) -> Result<(), OrdererConfigError> {
    let result = update(config, orderer, certs);
    logging::log_update_orderer_configuration(orderer, result.as_ref().map(|_| ()));
    result
}

fn update<R: CertificateResolver>(
    config: &mut ChannelConfig,
    orderer: &Orderer,
    certs: &R,
) -> Result<(), OrdererConfigError> {
    if config.channel_group.group(ORDERER_GROUP_KEY).is_none() {
        return Err(OrdererConfigError::MissingGroup {
            group: ORDERER_GROUP_KEY.to_string(),
        });
    }

    if !orderer.addresses.is_empty() {
        add_value(
            &mut config.channel_group,
            ORDERER_ADDRESSES_KEY,
            &OrdererAddresses {
                addresses: orderer.addresses.clone(),
            },
            ORDERER_ADMINS_POLICY_NAME,
        )?;
    }

    let orderer_group = config
        .channel_group
        .group_mut(ORDERER_GROUP_KEY)
        .ok_or_else(|| OrdererConfigError::MissingGroup {
            group: ORDERER_GROUP_KEY.to_string(),
        })?;

    add_orderer_values(orderer_group, orderer, certs)
}
