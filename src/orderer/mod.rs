/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Building, updating, and reading the `Orderer` group of a channel configuration.
//!
//! The submodules of this module are layered as follows:
//! - [`spec`] defines the declarative inputs.
//! - [`metadata`] encodes the consensus-type-specific parameters of an orderer.
//! - [`builder`] and [`updater`] both use `metadata` to write the standard orderer values.
//! - [`organizations`] edits orderer organization subgroups, independently of the rest.
//! - [`reader`] decodes everything back out.

pub mod builder;

pub mod metadata;

pub mod organizations;

pub mod reader;

pub mod spec;

pub mod updater;

pub use builder::new_orderer_group;
pub use organizations::{add_orderer_endpoint, add_orderer_org};
pub use reader::{orderer_configuration, orderer_org_endpoints};
pub use updater::update_orderer_configuration;
