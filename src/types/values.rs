/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Payload types of the well-known config values that this crate reads and writes, and their keys.
//!
//! Payloads are serialized with Borsh before they are stored in a
//! [`ConfigValue`](super::config_tree::ConfigValue). Anything else that needs to interpret them (e.g., a
//! peer validating a configuration transaction) must decode them with the same types.

use std::{collections::BTreeSet, time::Duration};

use borsh::{BorshDeserialize, BorshSerialize};

/// Name of the root group of a channel configuration, used when reporting errors about its values.
pub const CHANNEL_GROUP_KEY: &str = "Channel";

/// Key of the `Orderer` group inside the `Channel` group.
pub const ORDERER_GROUP_KEY: &str = "Orderer";

/* ↓↓↓ Keys of values in the `Orderer` group ↓↓↓ */

pub const BATCH_SIZE_KEY: &str = "BatchSize";
pub const BATCH_TIMEOUT_KEY: &str = "BatchTimeout";
pub const CHANNEL_RESTRICTIONS_KEY: &str = "ChannelRestrictions";
pub const CAPABILITIES_KEY: &str = "Capabilities";
pub const CONSENSUS_TYPE_KEY: &str = "ConsensusType";
pub const KAFKA_BROKERS_KEY: &str = "KafkaBrokers";

/* ↓↓↓ Keys of values in the `Channel` group ↓↓↓ */

/// Channel-scoped list of orderer addresses.
pub const ORDERER_ADDRESSES_KEY: &str = "OrdererAddresses";

/* ↓↓↓ Keys of values in organization groups ↓↓↓ */

/// Organization-scoped list of orderer endpoints.
pub const ENDPOINTS_KEY: &str = "Endpoints";
pub const MSP_KEY: &str = "MSP";

/// Parameters that decide when the ordering service cuts a batch of transactions into a block.
#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BatchSize {
    /// Maximum number of messages in a batch.
    pub max_message_count: u32,

    /// Maximum size of a batch in bytes, not including headers.
    pub absolute_max_bytes: u32,

    /// Preferred size of a batch in bytes.
    pub preferred_max_bytes: u32,
}

impl Default for BatchSize {
    fn default() -> Self {
        BatchSize {
            max_message_count: 500,
            absolute_max_bytes: 10 * 1024 * 1024,
            preferred_max_bytes: 2 * 1024 * 1024,
        }
    }
}

/// Time to wait after the first transaction of a batch arrives before cutting the batch.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct BatchTimeout {
    /// The timeout in [canonical duration text](duration_string).
    pub timeout: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ChannelRestrictions {
    /// Maximum number of channels the ordering service supports. 0 means unlimited.
    pub max_count: u64,
}

/// Set of capability flags that every member of the ordering service must support.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct Capabilities {
    pub capabilities: BTreeSet<String>,
}

/// Consensus algorithm, algorithm-specific metadata, and mode of operation of the ordering service.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct ConsensusType {
    /// Wire string of an [`OrdererType`](crate::orderer::spec::OrdererType).
    pub consensus_type: String,

    /// Opaque, algorithm-specific metadata. Empty for `solo` and `kafka`.
    pub metadata: Vec<u8>,

    /// Numeric code of a [`ConsensusState`](crate::orderer::spec::ConsensusState).
    pub state: i32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct KafkaBrokers {
    /// Addresses of the Kafka brokers in `IP:port` notation.
    pub brokers: Vec<String>,
}

/// List of orderer addresses. Stored under [`ORDERER_ADDRESSES_KEY`] in the `Channel` group and under
/// [`ENDPOINTS_KEY`] in orderer organization groups.
#[derive(Clone, Debug, Default, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct OrdererAddresses {
    pub addresses: Vec<String>,
}

/// Identity of the membership service provider of an organization.
#[derive(Clone, Debug, PartialEq, Eq, BorshSerialize, BorshDeserialize)]
pub struct MspValue {
    pub msp_id: String,
}

/// Render `duration` in the canonical textual form that ledger nodes parse batch timeouts from.
///
/// Durations of at least one second are written as hours, minutes, and (fractional) seconds, omitting
/// leading zero units: `"2s"`, `"1m30s"`, `"1h0m0s"`, `"1.5s"`. Shorter durations use a single unit:
/// `"500ms"`, `"1.5µs"`, `"10ns"`. The zero duration is `"0s"`.
pub fn duration_string(duration: Duration) -> String {
    let nanos = duration.as_nanos();

    if nanos == 0 {
        return "0s".to_string();
    }

    if nanos < 1_000 {
        return format!("{}ns", nanos);
    }

    if nanos < 1_000_000 {
        let (frac, int) = fmt_frac(nanos, 3);
        return format!("{}{}µs", int, frac);
    }

    if nanos < 1_000_000_000 {
        let (frac, int) = fmt_frac(nanos, 6);
        return format!("{}{}ms", int, frac);
    }

    let (frac, total_secs) = fmt_frac(nanos, 9);
    let secs = total_secs % 60;
    let total_mins = total_secs / 60;
    if total_mins == 0 {
        return format!("{}{}s", secs, frac);
    }

    let mins = total_mins % 60;
    let hours = total_mins / 60;
    if hours == 0 {
        format!("{}m{}{}s", mins, secs, frac)
    } else {
        format!("{}h{}m{}{}s", hours, mins, secs, frac)
    }
}

// Split `v` into its integer part and its fractional part when divided by `10^prec`. The fractional part
// is formatted with a leading '.' and without trailing zeros, or as an empty string if it is zero.
fn fmt_frac(v: u128, prec: u32) -> (String, u128) {
    let pow = 10u128.pow(prec);
    let frac = v % pow;
    let int = v / pow;
    if frac == 0 {
        return (String::new(), int);
    }

    let digits = format!("{:0width$}", frac, width = prec as usize);
    (format!(".{}", digits.trim_end_matches('0')), int)
}
