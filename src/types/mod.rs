/*
    Copyright © 2023, ParallelChain Lab
    Licensed under the Apache License, Version 2.0: http://www.apache.org/licenses/LICENSE-2.0
*/

//! Types that make up a channel configuration tree, and the payloads stored in it.
//!
//! Types specific to the ordering service's declarative inputs can be found in [`crate::orderer::spec`].

pub mod config_tree;

pub mod policies;

pub mod values;
