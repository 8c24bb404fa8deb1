/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! The channel configuration tree and its generic manipulation primitives.
//!
//! A [`ChannelConfig`] owns a root [`ConfigGroup`], and every group exclusively owns its child groups,
//! values, and policies. Entries are kept in [`BTreeMap`]s so that the serialized form of a tree is
//! deterministic regardless of insertion order.
//!
//! ## Mutation semantics
//!
//! Every mutating method says in its name what it does to an entry that already exists under the same
//! key. This module only offers *replacement* (`replace_value`, `replace_policy`, `replace_group`).
//! Operations that need append or merge behavior (e.g., appending one orderer endpoint) must read the
//! existing entry, compute the new entry, and then replace.

use std::{
    collections::{btree_map, BTreeMap},
    io::{self, Read, Write},
};

use borsh::{BorshDeserialize, BorshSerialize};

use crate::error::OrdererConfigError;

use super::policies::Policy;

/// The root of a channel configuration tree.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ChannelConfig {
    /// Number of configuration updates applied to the channel so far. Not modified by this crate.
    pub sequence: u64,

    /// The `Channel` group, which holds the `Orderer` group and its siblings.
    pub channel_group: ConfigGroup,
}

impl ChannelConfig {
    /// Create a new `ChannelConfig` whose channel group is empty.
    pub fn new() -> ChannelConfig {
        ChannelConfig {
            sequence: 0,
            channel_group: ConfigGroup::new(),
        }
    }
}

/// A node of the configuration tree.
///
/// `ConfigGroup` implements [`BorshSerialize`] and [`BorshDeserialize`] by hand because it contains
/// itself. Its serialized form is `version`, `groups`, `values`, `policies`, then `mod_policy`, where
/// `groups` is a `u32` count followed by that many `(name, group)` pairs in ascending order of name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigGroup {
    pub version: u64,
    groups: BTreeMap<String, ConfigGroup>,
    values: BTreeMap<String, ConfigValue>,
    policies: BTreeMap<String, ConfigPolicy>,

    /// Name of the policy that must be satisfied to modify this group.
    pub mod_policy: String,
}

impl ConfigGroup {
    /// Create a new, empty `ConfigGroup` with an empty `mod_policy`.
    pub fn new() -> ConfigGroup {
        ConfigGroup::default()
    }

    /// Get a reference to the child group called `name`, if it exists.
    pub fn group(&self, name: &str) -> Option<&ConfigGroup> {
        self.groups.get(name)
    }

    /// Get a mutable reference to the child group called `name`, if it exists.
    pub fn group_mut(&mut self, name: &str) -> Option<&mut ConfigGroup> {
        self.groups.get_mut(name)
    }

    /// Install `group` as the child group called `name`, replacing any existing child group of that name
    /// wholesale. Returns the replaced group, if there was one.
    pub fn replace_group(&mut self, name: &str, group: ConfigGroup) -> Option<ConfigGroup> {
        self.groups.insert(name.to_string(), group)
    }

    /// Iterate through the child groups of this group in ascending order of their names.
    pub fn groups(&self) -> btree_map::Iter<'_, String, ConfigGroup> {
        self.groups.iter()
    }

    /// Get a reference to the value stored under `key`, if it exists.
    pub fn value(&self, key: &str) -> Option<&ConfigValue> {
        self.values.get(key)
    }

    /// Store `value` under `key`, replacing any existing value wholesale.
    pub fn replace_value(&mut self, key: &str, value: ConfigValue) -> Option<ConfigValue> {
        self.values.insert(key.to_string(), value)
    }

    /// Iterate through the values of this group in ascending order of their keys.
    pub fn values(&self) -> btree_map::Iter<'_, String, ConfigValue> {
        self.values.iter()
    }

    /// Get a reference to the policy stored under `name`, if it exists.
    pub fn policy(&self, name: &str) -> Option<&ConfigPolicy> {
        self.policies.get(name)
    }

    /// Store `policy` under `name`, replacing any existing policy wholesale.
    pub fn replace_policy(&mut self, name: &str, policy: ConfigPolicy) -> Option<ConfigPolicy> {
        self.policies.insert(name.to_string(), policy)
    }

    /// Iterate through the policies of this group in ascending order of their names.
    pub fn policies(&self) -> btree_map::Iter<'_, String, ConfigPolicy> {
        self.policies.iter()
    }
}

impl BorshSerialize for ConfigGroup {
    fn serialize<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        self.version.serialize(writer)?;

        let groups_len = u32::try_from(self.groups.len())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "too many child groups"))?;
        groups_len.serialize(writer)?;
        for (name, group) in &self.groups {
            name.serialize(writer)?;
            group.serialize(writer)?;
        }

        self.values.serialize(writer)?;
        self.policies.serialize(writer)?;
        self.mod_policy.serialize(writer)
    }
}

impl BorshDeserialize for ConfigGroup {
    fn deserialize_reader<R: Read>(reader: &mut R) -> io::Result<Self> {
        let version = u64::deserialize_reader(reader)?;

        let groups_len = u32::deserialize_reader(reader)?;
        let mut groups = BTreeMap::new();
        for _ in 0..groups_len {
            let name = String::deserialize_reader(reader)?;
            let group = ConfigGroup::deserialize_reader(reader)?;
            groups.insert(name, group);
        }

        Ok(ConfigGroup {
            version,
            groups,
            values: BTreeMap::deserialize_reader(reader)?,
            policies: BTreeMap::deserialize_reader(reader)?,
            mod_policy: String::deserialize_reader(reader)?,
        })
    }
}

/// An opaque serialized payload together with the policy it was written under.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ConfigValue {
    pub version: u64,
    pub value: Vec<u8>,
    pub mod_policy: String,
}

impl ConfigValue {
    /// Deserialize the payload of this value into a `T`.
    pub fn decode<T: BorshDeserialize>(&self) -> std::io::Result<T> {
        T::try_from_slice(&self.value)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ConfigPolicy {
    pub version: u64,
    pub policy: Policy,
    pub mod_policy: String,
}

/// Serialize `payload` and store it in `group` under `key`, replacing any existing value.
pub fn add_value<T: BorshSerialize>(
    group: &mut ConfigGroup,
    key: &str,
    payload: &T,
    mod_policy: &str,
) -> Result<(), OrdererConfigError> {
    let value = payload
        .try_to_vec()
        .map_err(|err| OrdererConfigError::SerializeValue {
            key: key.to_string(),
            source: err,
        })?;

    group.replace_value(
        key,
        ConfigValue {
            version: 0,
            value,
            mod_policy: mod_policy.to_string(),
        },
    );

    Ok(())
}

/// Decode the value stored in `group` under `key`, if it exists.
///
/// `group_name` is only used to give context to a [`MalformedValue`](OrdererConfigError::MalformedValue)
/// error.
pub fn decode_value<T: BorshDeserialize>(
    group: &ConfigGroup,
    group_name: &str,
    key: &str,
) -> Result<Option<T>, OrdererConfigError> {
    match group.value(key) {
        Some(value) => Ok(Some(value.decode::<T>().map_err(|err| {
            OrdererConfigError::MalformedValue {
                group: group_name.to_string(),
                key: key.to_string(),
                source: err,
            }
        })?)),
        None => Ok(None),
    }
}

/// Install every policy in `policies` into `group`, each under `mod_policy`, replacing existing policies
/// of the same names. Policies already in `group` but absent from `policies` are left untouched.
pub fn add_policies<'a>(
    group: &mut ConfigGroup,
    policies: impl IntoIterator<Item = (&'a String, &'a Policy)>,
    mod_policy: &str,
) {
    for (name, policy) in policies {
        group.replace_policy(
            name,
            ConfigPolicy {
                version: 0,
                policy: policy.clone(),
                mod_policy: mod_policy.to_string(),
            },
        );
    }
}
