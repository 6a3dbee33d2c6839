//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeSet;
use std::net::IpAddr;

use ipnetwork::IpNetwork;
use ospf_utils::ibus::IbusChannelsTx;
use ospf_utils::southbound::{Nexthop, RouteKeyMsg, RouteMsg, RouteOpaqueAttrs};

use crate::collections::Arena;
use crate::interface::Interface;
use crate::route::RouteNet;
use crate::version::Version;

// This engine is OSPFv2-only, so every `V::IpNetwork` is in practice an
// IPv4 prefix.
fn prefix_v4(network: IpNetwork) -> ipnetwork::Ipv4Network {
    match network {
        IpNetwork::V4(network) => network,
        IpNetwork::V6(..) => unreachable!("OSPFv2 prefixes are IPv4-only"),
    }
}

// ===== global functions =====

pub(crate) fn router_id_sub(ibus_tx: &IbusChannelsTx) {
    ibus_tx.router_id_sub();
}

pub(crate) fn hostname_sub(ibus_tx: &IbusChannelsTx) {
    ibus_tx.hostname_sub();
}

pub(crate) fn route_install<V>(
    ibus_tx: &IbusChannelsTx,
    destination: &V::IpNetwork,
    route: &RouteNet<V>,
    distance: u8,
    interfaces: &Arena<Interface<V>>,
) where
    V: Version,
{
    // Fill-in nexthops.
    let nexthops = route
        .nexthops
        .values()
        .map(|nexthop| match nexthop.addr {
            Some(addr) => {
                let iface = &interfaces[nexthop.iface_idx];
                let addr = match <V::IpAddr as Into<IpAddr>>::into(addr) {
                    IpAddr::V4(addr) => addr,
                    IpAddr::V6(..) => unreachable!("OSPFv2 addresses are IPv4-only"),
                };
                Nexthop::Address {
                    ifindex: iface.system.ifindex.unwrap(),
                    addr,
                }
            }
            None => {
                let iface = &interfaces[nexthop.iface_idx];
                Nexthop::Interface {
                    ifindex: iface.system.ifindex.unwrap(),
                }
            }
        })
        .collect::<BTreeSet<_>>();

    // Install route.
    let msg = RouteMsg {
        protocol: V::PROTOCOL,
        prefix: prefix_v4((*destination).into()),
        distance: distance.into(),
        metric: route.metric(),
        tag: route.tag,
        opaque_attrs: RouteOpaqueAttrs::Ospf {
            route_type: route.path_type.clone().into(),
        },
        nexthops,
    };
    ibus_tx.route_ip_add(msg);
}

pub(crate) fn route_uninstall<V>(
    ibus_tx: &IbusChannelsTx,
    destination: &V::IpNetwork,
    _route: &RouteNet<V>,
) where
    V: Version,
{
    // Uninstall route.
    let msg = RouteKeyMsg {
        protocol: V::PROTOCOL,
        prefix: prefix_v4((*destination).into()),
    };
    ibus_tx.route_ip_del(msg);
}
