//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![cfg_attr(
    feature = "testing",
    allow(dead_code, unused_variables, unused_imports)
)]
#![allow(type_alias_bounds)]

pub mod area;
pub mod collections;
pub mod config;
pub mod debug;
pub mod error;
pub mod events;
pub mod flood;
pub mod instance;
pub mod interface;
pub mod lsdb;
pub mod neighbor;
pub mod network;
pub mod notification;
pub mod ospfv2;
pub mod output;
pub mod packet;
pub mod protocol;
pub mod route;
pub mod southbound;
pub mod spf;
pub mod tasks;
pub mod version;
