/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Builds and incrementally mutates the ordering-service subtree of a channel configuration.
//!
//! A channel configuration is a hierarchical tree of named [groups](types::config_tree::ConfigGroup),
//! [values](types::config_tree::ConfigValue), and [policies](types::config_tree::ConfigPolicy). The
//! `Orderer` group in this tree governs how transactions are sequenced into blocks, and which
//! organizations run the ordering service.
//!
//! The key operations of this crate are:
//! - [`new_orderer_group`](orderer::builder::new_orderer_group): build a brand new `Orderer` group from
//!   an [`Orderer`](orderer::spec::Orderer) specification.
//! - [`update_orderer_configuration`](orderer::updater::update_orderer_configuration): overwrite the
//!   standard orderer values of an existing tree in place.
//! - [`add_orderer_org`](orderer::organizations::add_orderer_org) and
//!   [`add_orderer_endpoint`](orderer::organizations::add_orderer_endpoint): edit the ordering service's
//!   member organizations.
//! - [`orderer_configuration`](orderer::reader::orderer_configuration): decode the standard orderer values
//!   back out of a tree.
//!
//! ## Raft certificates
//!
//! Raft (`etcdraft`) consenters are specified with [references](orderer::spec::CertificateRef) to their
//! TLS certificates. These references are resolved into bytes by a pluggable
//! [`CertificateResolver`](orderer::metadata::CertificateResolver) when the consensus metadata is
//! serialized. [`FileCertificateResolver`](orderer::metadata::FileCertificateResolver) reads them from
//! the local filesystem.
//!
//! ## Concurrency
//!
//! All operations are synchronous. A [`ChannelConfig`](types::config_tree::ChannelConfig) is mutated
//! through `&mut`, so exclusive access during a call is enforced by the borrow checker. A tree that was
//! passed to a call that returned an error may carry some of the writes made before the failing step, and
//! should be discarded.

pub mod error;

pub mod logging;

pub mod orderer;

pub mod types;

pub use error::OrdererConfigError;
