//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

// Significant protocol events surfaced as structured tracing events rather
// than pushed over a management-plane notification channel. Severity follows
// the teacher's convention: state changes are informational, malformed input
// is a warning.

use std::net::Ipv4Addr;

use tracing::{info, warn};

use crate::error::InterfaceCfgError;
use crate::instance::InstanceUpView;
use crate::interface::Interface;
use crate::neighbor::Neighbor;
use crate::packet::PacketType;
use crate::packet::error::LsaValidationError;
use crate::version::Version;

// ===== global functions =====

pub(crate) fn if_state_change<V>(
    instance: &InstanceUpView<'_, V>,
    iface: &Interface<V>,
) where
    V: Version,
{
    info!(
        instance = %instance.name,
        interface = %iface.name,
        state = ?iface.state.ism_state,
        "interface state change"
    );
}

pub(crate) fn if_config_error<V>(
    instance: &InstanceUpView<'_, V>,
    ifname: &str,
    src: &Ipv4Addr,
    pkt_type: &PacketType,
    error: &InterfaceCfgError,
) where
    V: Version,
{
    warn!(
        instance = %instance.name,
        interface = %ifname,
        %src,
        pkt_type = ?pkt_type,
        %error,
        "interface configuration error"
    );
}

pub(crate) fn nbr_state_change<V>(
    instance: &InstanceUpView<'_, V>,
    iface: &Interface<V>,
    nbr: &Neighbor<V>,
) where
    V: Version,
{
    info!(
        instance = %instance.name,
        interface = %iface.name,
        router_id = %nbr.router_id,
        state = ?nbr.state,
        "neighbor state change"
    );
}

pub(crate) fn if_rx_bad_packet<V>(
    instance: &InstanceUpView<'_, V>,
    iface: &Interface<V>,
    src: V::IpAddr,
) where
    V: Version,
{
    warn!(
        instance = %instance.name,
        interface = %iface.name,
        %src,
        "received malformed packet"
    );
}

pub(crate) fn if_rx_bad_lsa<V>(
    instance: &InstanceUpView<'_, V>,
    src: V::IpAddr,
    error: LsaValidationError,
) where
    V: Version,
{
    warn!(
        instance = %instance.name,
        %src,
        %error,
        "received invalid LSA"
    );
}
