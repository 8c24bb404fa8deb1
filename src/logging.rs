/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Functions that log out configuration mutations.
//!
//! This crate logs using the [log](https://docs.rs/log/latest/log/) crate. To get these messages
//! printed onto a terminal or to a file, set up a
//! [logging implementation](https://docs.rs/log/latest/log/#available-logging-implementations).
//!
//! ## Log message format
//!
//! Log messages are CSVs (Comma Separated Values) with at least two values. The first two values are
//! always:
//! 1. The name of the event in PascalCase (defined in this module as constants).
//! 2. The time the event was emitted (as number of seconds since the Unix Epoch).
//!
//! The rest of the values differ depending on the kind of event. For example, the following snippet
//! is how resolving a Raft consenter's certificate is printed:
//!
//! ```text
//! ResolveConsenterCert, 1701329264, orderer0.example.com:7050, server, /certs/server.pem, fNGCJyk
//! ```
//!
//! In the snippet, the last value is the first seven characters of the Base64 encoding of the SHA256
//! hash of the resolved certificate. Certificate bytes are never logged.
//!
//! Successful mutations are logged at the `Info` level, failed mutations at the `Warn` level, and
//! certificate resolution at the `Debug` level.

use std::time::SystemTime;

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use sha2::{Digest, Sha256};

use crate::{
    error::OrdererConfigError,
    orderer::{
        metadata::CertificateRole,
        spec::{CertificateRef, Orderer},
    },
};

// Names of each event in PascalCase for printing:
pub const NEW_ORDERER_GROUP: &str = "NewOrdererGroup";
pub const UPDATE_ORDERER_CONFIGURATION: &str = "UpdateOrdererConfiguration";
pub const ADD_ORDERER_ORG: &str = "AddOrdererOrg";
pub const ADD_ORDERER_ENDPOINT: &str = "AddOrdererEndpoint";
pub const RESOLVE_CONSENTER_CERT: &str = "ResolveConsenterCert";

pub(crate) fn log_new_orderer_group(orderer: &Orderer, result: Result<(), &OrdererConfigError>) {
    match result {
        Ok(()) => log::info!(
            "{}, {}, {}, {}, {}",
            NEW_ORDERER_GROUP,
            secs_since_unix_epoch(),
            orderer.orderer_type,
            orderer.state,
            orderer.organizations.len()
        ),
        Err(err) => log::warn!(
            "{}, {}, {}, failed: {}",
            NEW_ORDERER_GROUP,
            secs_since_unix_epoch(),
            orderer.orderer_type,
            err
        ),
    }
}

pub(crate) fn log_update_orderer_configuration(
    orderer: &Orderer,
    result: Result<(), &OrdererConfigError>,
) {
    match result {
        Ok(()) => log::info!(
            "{}, {}, {}, {}, {}",
            UPDATE_ORDERER_CONFIGURATION,
            secs_since_unix_epoch(),
            orderer.orderer_type,
            orderer.state,
            orderer.addresses.len()
        ),
        Err(err) => log::warn!(
            "{}, {}, {}, failed: {}",
            UPDATE_ORDERER_CONFIGURATION,
            secs_since_unix_epoch(),
            orderer.orderer_type,
            err
        ),
    }
}

pub(crate) fn log_add_orderer_org(
    org: &str,
    replaced: bool,
    result: Result<(), &OrdererConfigError>,
) {
    match result {
        Ok(()) => log::info!(
            "{}, {}, {}, {}",
            ADD_ORDERER_ORG,
            secs_since_unix_epoch(),
            org,
            if replaced { "replaced" } else { "inserted" }
        ),
        Err(err) => log::warn!(
            "{}, {}, {}, failed: {}",
            ADD_ORDERER_ORG,
            secs_since_unix_epoch(),
            org,
            err
        ),
    }
}

pub(crate) fn log_add_orderer_endpoint(
    org: &str,
    endpoint: &str,
    result: Result<(), &OrdererConfigError>,
) {
    match result {
        Ok(()) => log::info!(
            "{}, {}, {}, {}",
            ADD_ORDERER_ENDPOINT,
            secs_since_unix_epoch(),
            org,
            endpoint
        ),
        Err(err) => log::warn!(
            "{}, {}, {}, {}, failed: {}",
            ADD_ORDERER_ENDPOINT,
            secs_since_unix_epoch(),
            org,
            endpoint,
            err
        ),
    }
}

pub(crate) fn log_resolve_consenter_cert(
    host: &str,
    port: u32,
    role: CertificateRole,
    cert: &CertificateRef,
    bytes: &[u8],
) {
    log::debug!(
        "{}, {}, {}:{}, {}, {}, {}",
        RESOLVE_CONSENTER_CERT,
        secs_since_unix_epoch(),
        host,
        port,
        role,
        cert,
        cert_fingerprint(bytes)
    )
}

// Get a more readable representation of a certificate by base64-encoding its SHA256 hash and taking the
// first 7 characters.
fn cert_fingerprint(bytes: &[u8]) -> String {
    let encoded = STANDARD_NO_PAD.encode(Sha256::digest(bytes));
    encoded[0..7].to_string()
}

fn secs_since_unix_epoch() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|duration| duration.as_secs())
        .unwrap_or(0)
}
