//
// Copyright (c) The Holo Core Contributors
//
// See LICENSE for license details.
//

use std::net::Ipv4Addr;

use ospf_utils::ip::{IpAddrKind, IpNetworkKind};
use ospf_utils::protocol::Protocol;
use ipnetwork::Ipv4Network;

use crate::area::AreaVersion;
use crate::instance::InstanceVersion;
use crate::interface::InterfaceVersion;
use crate::lsdb::LsdbVersion;
use crate::neighbor::NeighborVersion;
use crate::network::NetworkVersion;
use crate::packet::lsa::LsaVersion;
use crate::packet::PacketVersion;
use crate::southbound::rx::SouthboundRxVersion;
use crate::spf::SpfVersion;

// OSPF version-specific code.
//
// This crate only ships the OSPFv2 concretization of the trait, but the
// generic shape is kept so area/interface/neighbor/LSDB/SPF logic stays
// decoupled from the wire encoding.
pub trait Version
where
    Self: 'static
        + Send
        + Sync
        + Clone
        + Default
        + Eq
        + PartialEq
        + std::fmt::Debug
        + AreaVersion<Self>
        + LsdbVersion<Self>
        + InstanceVersion<Self>
        + InterfaceVersion<Self>
        + NeighborVersion<Self>
        + NetworkVersion<Self>
        + PacketVersion<Self>
        + LsaVersion<Self>
        + SouthboundRxVersion<Self>
        + SpfVersion<Self>,
{
    const PROTOCOL: Protocol;

    type IpAddr: IpAddrKind;
    type IpNetwork: IpNetworkKind<Self::IpAddr>;
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Ospfv2();

// ===== impl Ospfv2 =====

impl Version for Ospfv2 {
    const PROTOCOL: Protocol = Protocol::OSPFV2;

    type IpAddr = Ipv4Addr;
    type IpNetwork = Ipv4Network;
}
