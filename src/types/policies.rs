/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Policy definitions and the names of well-known policies.
//!
//! This crate stores policies in the configuration tree, but never evaluates them, and does not check
//! that their rules are well-formed.

use borsh::{BorshDeserialize, BorshSerialize};

/// Name of the policy that authorizes administrative changes.
pub const ADMINS_POLICY_KEY: &str = "Admins";

/// Name of the policy that authorizes reading from the channel.
pub const READERS_POLICY_KEY: &str = "Readers";

/// Name of the policy that authorizes writing to the channel.
pub const WRITERS_POLICY_KEY: &str = "Writers";

/// Name of the policy that decides whether blocks emitted by the ordering service are accepted.
///
/// Every policy set installed into the `Orderer` group must define this policy.
pub const BLOCK_VALIDATION_POLICY_KEY: &str = "BlockValidation";

/// Fully qualified name of the `Admins` policy of the `Orderer` group. Used as the mod policy of values
/// that live outside the `Orderer` group but are governed by it.
pub const ORDERER_ADMINS_POLICY_NAME: &str = "/Channel/Orderer/Admins";

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub enum PolicyType {
    /// A policy defined in terms of the policies of child groups, e.g., `"MAJORITY Admins"`.
    ImplicitMeta,

    /// A policy defined in terms of signatures from specific principals, e.g., `"OR('Org1.admin')"`.
    Signature,
}

/// A policy definition as stored in the configuration tree.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Policy {
    pub policy_type: PolicyType,
    pub rule: String,
}

impl Policy {
    /// Create an `ImplicitMeta` policy with the given `rule`.
    pub fn implicit_meta(rule: impl Into<String>) -> Policy {
        Policy {
            policy_type: PolicyType::ImplicitMeta,
            rule: rule.into(),
        }
    }

    /// Create a `Signature` policy with the given `rule`.
    pub fn signature(rule: impl Into<String>) -> Policy {
        Policy {
            policy_type: PolicyType::Signature,
            rule: rule.into(),
        }
    }
}
