//! Standard policies, organizations, and orderer specifications shared between tests.

use std::collections::BTreeMap;

use orderer_config::{
    orderer::{
        new_orderer_group,
        spec::{Orderer, OrdererType, Organization},
    },
    types::{
        config_tree::{add_value, ChannelConfig, ConfigGroup},
        policies::{
            Policy, ADMINS_POLICY_KEY, BLOCK_VALIDATION_POLICY_KEY, READERS_POLICY_KEY,
            WRITERS_POLICY_KEY,
        },
        values::{ConsensusType, ORDERER_GROUP_KEY},
    },
};

use super::mem_certs::MemCerts;

/// Name of a sibling of the `Orderer` group, used to check that it is left untouched.
pub(crate) const APPLICATION_GROUP_KEY: &str = "Application";

/// Policies of an `Orderer` group, including `BlockValidation`.
pub(crate) fn orderer_policies() -> BTreeMap<String, Policy> {
    let mut policies = org_policies();
    policies.insert(
        BLOCK_VALIDATION_POLICY_KEY.to_string(),
        Policy::implicit_meta("ANY Writers"),
    );
    policies
}

/// Policies of an organization, without `BlockValidation`.
pub(crate) fn org_policies() -> BTreeMap<String, Policy> {
    BTreeMap::from([
        (
            ADMINS_POLICY_KEY.to_string(),
            Policy::implicit_meta("MAJORITY Admins"),
        ),
        (
            READERS_POLICY_KEY.to_string(),
            Policy::implicit_meta("ANY Readers"),
        ),
        (
            WRITERS_POLICY_KEY.to_string(),
            Policy::implicit_meta("ANY Writers"),
        ),
    ])
}

pub(crate) fn orderer_org(name: &str, endpoints: &[&str]) -> Organization {
    Organization::builder()
        .name(name)
        .msp_id(format!("{}MSP", name))
        .policies(org_policies())
        .orderer_endpoints(endpoints.iter().map(|e| e.to_string()).collect())
        .build()
}

pub(crate) fn solo_orderer(organizations: Vec<Organization>) -> Orderer {
    Orderer::builder()
        .orderer_type(OrdererType::Solo)
        .policies(orderer_policies())
        .organizations(organizations)
        .build()
}

/// A channel configuration holding a solo `Orderer` group with the organization `Org1`, and an
/// `Application` group with a single value.
pub(crate) fn solo_channel_config() -> ChannelConfig {
    let orderer = solo_orderer(vec![orderer_org("Org1", &["grpcs://org1:7050"])]);
    let orderer_group = new_orderer_group(&orderer, &MemCerts::new()).unwrap();

    let mut config = ChannelConfig::new();
    config
        .channel_group
        .replace_group(ORDERER_GROUP_KEY, orderer_group);
    config
        .channel_group
        .replace_group(APPLICATION_GROUP_KEY, application_group());
    config
}

pub(crate) fn application_group() -> ConfigGroup {
    let mut group = ConfigGroup::new();
    group.mod_policy = ADMINS_POLICY_KEY.to_string();
    add_value(
        &mut group,
        "Untouched",
        &ConsensusType {
            consensus_type: "unrelated".to_string(),
            metadata: vec![1, 2, 3],
            state: 0,
        },
        ADMINS_POLICY_KEY,
    )
    .unwrap();
    group
}
