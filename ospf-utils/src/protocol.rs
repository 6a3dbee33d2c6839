//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::str::FromStr;

use serde::{Deserialize, Serialize};

// The protocols a route can originate from. Kept as an enum (rather than
// collapsing to a single OSPFv2 constant) since the RIB-client interface and
// redistribution configuration both need to name other protocols.
#[allow(clippy::upper_case_acronyms)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
#[derive(Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    BGP,
    DIRECT,
    ISIS,
    OSPFV2,
    RIPV2,
    STATIC,
}

// ===== impl Protocol =====

impl std::fmt::Display for Protocol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Protocol::BGP => write!(f, "bgp"),
            Protocol::DIRECT => write!(f, "direct"),
            Protocol::ISIS => write!(f, "isis"),
            Protocol::OSPFV2 => write!(f, "ospfv2"),
            Protocol::RIPV2 => write!(f, "ripv2"),
            Protocol::STATIC => write!(f, "static"),
        }
    }
}

impl FromStr for Protocol {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_ref() {
            "bgp" => Ok(Protocol::BGP),
            "direct" => Ok(Protocol::DIRECT),
            "isis" => Ok(Protocol::ISIS),
            "ospfv2" => Ok(Protocol::OSPFV2),
            "ripv2" => Ok(Protocol::RIPV2),
            "static" => Ok(Protocol::STATIC),
            _ => Err(()),
        }
    }
}
