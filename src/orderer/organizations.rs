/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Editing the member organizations of the ordering service, and their endpoints.

use crate::{
    error::OrdererConfigError,
    logging,
    types::{
        config_tree::{add_policies, add_value, decode_value, ChannelConfig, ConfigGroup},
        policies::ADMINS_POLICY_KEY,
        values::{MspValue, OrdererAddresses, ENDPOINTS_KEY, MSP_KEY, ORDERER_GROUP_KEY},
    },
};

use super::spec::Organization;

/// Add `org` to the `Orderer` group of `config`.
///
/// # Replacement
///
/// If the `Orderer` group already has a subgroup called `org.name`, that subgroup is *replaced* wholesale
/// by a subgroup built from `org`. Nothing from the old subgroup (e.g., endpoints added by
/// [`add_orderer_endpoint`]) is carried over, and this function does not fail merely because the
/// organization already exists.
pub fn add_orderer_org(
    config: &mut ChannelConfig,
    org: &Organization,
) -> Result<(), OrdererConfigError> {
    let result = install_org(config, org);
    let replaced = matches!(result, Ok(true));
    logging::log_add_orderer_org(&org.name, replaced, result.as_ref().map(|_| ()));
    result.map(|_| ())
}

// Returns whether an existing subgroup was replaced.
fn install_org(config: &mut ChannelConfig, org: &Organization) -> Result<bool, OrdererConfigError> {
    let orderer_group = config
        .channel_group
        .group_mut(ORDERER_GROUP_KEY)
        .ok_or_else(|| OrdererConfigError::MissingGroup {
            group: ORDERER_GROUP_KEY.to_string(),
        })?;

    let org_group =
        new_org_config_group(org).map_err(|err| OrdererConfigError::OrganizationGroup {
            org: org.name.clone(),
            source: Box::new(err),
        })?;

    Ok(orderer_group.replace_group(&org.name, org_group).is_some())
}

/// Append `endpoint` to the endpoints of the orderer organization `org_name` in `config`.
///
/// An organization without an `Endpoints` value is treated as having no endpoints. The endpoints are
/// written back in their existing order, with `endpoint` at the end.
///
/// Fails without modifying `config` if:
/// - `config` has no `Orderer` group ([`MissingGroup`](OrdererConfigError::MissingGroup)),
/// - the `Orderer` group has no subgroup called `org_name`
///   ([`MissingOrganization`](OrdererConfigError::MissingOrganization)),
/// - the existing `Endpoints` value cannot be decoded
///   ([`MalformedValue`](OrdererConfigError::MalformedValue)), or
/// - `endpoint` is already one of the organization's endpoints
///   ([`DuplicateEndpoint`](OrdererConfigError::DuplicateEndpoint)).
pub fn add_orderer_endpoint(
    config: &mut ChannelConfig,
    org_name: &str,
    endpoint: &str,
) -> Result<(), OrdererConfigError> {
    let result = append_endpoint(config, org_name, endpoint);
    logging::log_add_orderer_endpoint(org_name, endpoint, result.as_ref().map(|_| ()));
    result
}

fn append_endpoint(
    config: &mut ChannelConfig,
    org_name: &str,
    endpoint: &str,
) -> Result<(), OrdererConfigError> {
    let orderer_org_group = config
        .channel_group
        .group_mut(ORDERER_GROUP_KEY)
        .ok_or_else(|| OrdererConfigError::MissingGroup {
            group: ORDERER_GROUP_KEY.to_string(),
        })?
        .group_mut(org_name)
        .ok_or_else(|| OrdererConfigError::MissingOrganization {
            org: org_name.to_string(),
        })?;

    let mut endpoints =
        decode_value::<OrdererAddresses>(orderer_org_group, org_name, ENDPOINTS_KEY)?
            .unwrap_or_default();

    if endpoints.addresses.iter().any(|e| e == endpoint) {
        return Err(OrdererConfigError::DuplicateEndpoint {
            org: org_name.to_string(),
            endpoint: endpoint.to_string(),
        });
    }

    endpoints.addresses.push(endpoint.to_string());

    add_value(
        orderer_org_group,
        ENDPOINTS_KEY,
        &endpoints,
        ADMINS_POLICY_KEY,
    )
}

/// Build the subgroup of an orderer organization.
///
/// The subgroup contains the policies in `org.policies`, the organization's `MSP` value, and, only if
/// `org.orderer_endpoints` is non-empty, its `Endpoints` value.
pub fn new_org_config_group(org: &Organization) -> Result<ConfigGroup, OrdererConfigError> {
    if org.msp_id.is_empty() {
        return Err(OrdererConfigError::MissingMspId {
            org: org.name.clone(),
        });
    }

    let mut org_group = ConfigGroup::new();
    org_group.mod_policy = ADMINS_POLICY_KEY.to_string();

    add_policies(&mut org_group, &org.policies, ADMINS_POLICY_KEY);

    add_value(
        &mut org_group,
        MSP_KEY,
        &MspValue {
            msp_id: org.msp_id.clone(),
        },
        ADMINS_POLICY_KEY,
    )?;

    if !org.orderer_endpoints.is_empty() {
        add_value(
            &mut org_group,
            ENDPOINTS_KEY,
            &OrdererAddresses {
                addresses: org.orderer_endpoints.clone(),
            },
            ADMINS_POLICY_KEY,
        )?;
    }

    Ok(org_group)
}
