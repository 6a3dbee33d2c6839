//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use ipnetwork::Ipv4Network;
use serde::{Deserialize, Serialize};

use crate::area::AreaType;
use crate::interface::InterfaceType;
use crate::packet::PacketType;
use ospf_utils::crypto::CryptoAlgo;

// Default values, taken from RFC 2328 Appendix C.

pub const DFLT_HELLO_INTERVAL: u16 = 10;
pub const DFLT_DEAD_INTERVAL: u16 = 40;
pub const DFLT_RXMT_INTERVAL: u16 = 5;
pub const DFLT_TRANSMIT_DELAY: u16 = 1;
pub const DFLT_PRIORITY: u8 = 1;
pub const DFLT_COST: u16 = 10;
pub const DFLT_SPF_DELAY: u32 = 200;
pub const DFLT_SPF_HOLDDOWN: u32 = 1000;

// A single cryptographic authentication key. Supports MD5 and HMAC variants.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AuthKey {
    pub id: u64,
    pub algo: CryptoAlgo,
    pub string: String,
}

// Authentication method configured on an interface or virtual link.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum AuthCfg {
    ClearText(String),
    // Multiple keys may be configured at once to support key rollover. On
    // decode, a packet is accepted if its digest matches any configured key;
    // on encode, the key with the highest ID is used.
    Crypto(Vec<AuthKey>),
}

impl AuthCfg {
    pub fn crypto_keys(&self) -> &[AuthKey] {
        match self {
            AuthCfg::Crypto(keys) => keys,
            AuthCfg::ClearText(_) => &[],
        }
    }
}

// Static NBMA neighbor configuration.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct StaticNbrCfg {
    pub priority: u8,
    pub poll_interval: u16,
}

// Route redistribution configuration.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RedistributeCfg {
    pub metric: Option<u32>,
    pub metric_type: RedistributeMetricType,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum RedistributeMetricType {
    #[default]
    Type2,
    Type1,
}

// Area range (used for both summary-LSA aggregation and NSSA translation).
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct RangeCfg {
    pub advertise: bool,
    pub cost: Option<u32>,
}

impl Default for RangeCfg {
    fn default() -> RangeCfg {
        RangeCfg {
            advertise: true,
            cost: None,
        }
    }
}

// Per-area configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct AreaCfg {
    pub area_type: AreaType,
    pub ranges: BTreeMap<Ipv4Network, RangeCfg>,
    #[cfg(feature = "nssa")]
    pub nssa_translator_always: bool,
    #[cfg(feature = "nssa")]
    pub nssa_no_summary: bool,
}

impl Default for AreaCfg {
    fn default() -> AreaCfg {
        AreaCfg {
            area_type: AreaType::Normal,
            ranges: Default::default(),
            #[cfg(feature = "nssa")]
            nssa_translator_always: false,
            #[cfg(feature = "nssa")]
            nssa_no_summary: false,
        }
    }
}

// Per-interface configuration.
#[derive(Clone, Debug)]
pub struct InterfaceCfg {
    pub if_type: InterfaceType,
    pub passive: bool,
    pub priority: u8,
    pub hello_interval: u16,
    pub dead_interval: u16,
    pub rxmt_interval: u16,
    pub transmit_delay: u16,
    pub cost: u16,
    pub mtu_ignore: bool,
    pub auth: Option<AuthCfg>,
    pub static_nbrs: HashMap<Ipv4Addr, StaticNbrCfg>,
    pub instance_id: u8,
    pub trace_opts: Arc<ArcSwap<TraceOptionPacketResolved>>,
}

impl Default for InterfaceCfg {
    fn default() -> InterfaceCfg {
        InterfaceCfg {
            if_type: InterfaceType::Broadcast,
            passive: false,
            priority: DFLT_PRIORITY,
            hello_interval: DFLT_HELLO_INTERVAL,
            dead_interval: DFLT_DEAD_INTERVAL as u16,
            rxmt_interval: DFLT_RXMT_INTERVAL,
            transmit_delay: DFLT_TRANSMIT_DELAY,
            cost: DFLT_COST,
            mtu_ignore: false,
            auth: None,
            static_nbrs: Default::default(),
            instance_id: 0,
            trace_opts: trace_opts_default(),
        }
    }
}

// Virtual link configuration (RFC 2328 Section 15).
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct VirtualLinkCfg {
    pub transit_area_id: Ipv4Addr,
    pub router_id: Ipv4Addr,
    pub hello_interval: u16,
    pub dead_interval: u16,
    pub rxmt_interval: u16,
    pub transmit_delay: u16,
    pub auth: Option<AuthCfg>,
}

impl Default for VirtualLinkCfg {
    fn default() -> VirtualLinkCfg {
        VirtualLinkCfg {
            transit_area_id: Ipv4Addr::UNSPECIFIED,
            router_id: Ipv4Addr::UNSPECIFIED,
            hello_interval: DFLT_HELLO_INTERVAL,
            dead_interval: DFLT_DEAD_INTERVAL,
            rxmt_interval: DFLT_RXMT_INTERVAL,
            transmit_delay: DFLT_TRANSMIT_DELAY,
            auth: None,
        }
    }
}

// Route preference (administrative distance) by path type, used to break
// ties against routes learned from other protocols.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct Preference {
    pub intra_area: u8,
    pub inter_area: u8,
    pub external: u8,
}

impl Default for Preference {
    fn default() -> Preference {
        Preference {
            intra_area: 110,
            inter_area: 110,
            external: 110,
        }
    }
}

// Per-instance configuration.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InstanceCfg {
    pub enabled: bool,
    pub router_id: Option<Ipv4Addr>,
    pub preference: Preference,
    pub max_paths: u16,
    pub spf_initial_delay: u32,
    pub spf_short_delay: u32,
    pub spf_long_delay: u32,
    pub spf_hold_down: u32,
    pub spf_time_to_learn: u32,
    // RFC 3137: advertise all non-stub links with max-metric so transit
    // traffic routes around this router while keeping directly connected
    // stub networks reachable.
    pub stub_router: bool,
    pub extended_lsa: bool,
    pub redistribute: BTreeMap<String, RedistributeCfg>,
    pub trace_opts: InstanceTraceOptions,
}

impl Default for InstanceCfg {
    fn default() -> InstanceCfg {
        InstanceCfg {
            enabled: true,
            router_id: None,
            preference: Default::default(),
            max_paths: 1,
            spf_initial_delay: 0,
            spf_short_delay: DFLT_SPF_DELAY,
            spf_long_delay: DFLT_SPF_DELAY,
            spf_hold_down: DFLT_SPF_HOLDDOWN,
            spf_time_to_learn: DFLT_SPF_DELAY,
            stub_router: false,
            extended_lsa: false,
            redistribute: Default::default(),
            trace_opts: Default::default(),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct InstanceTraceOptions {
    pub ibus: bool,
}

// Runtime-reconfigurable packet tracing gate, resolved from instance/
// interface overlays and read without locking from the hot send/receive
// paths.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TraceOptionPacketType {
    pub tx: bool,
    pub rx: bool,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TraceOptionPacketResolved {
    pub hello: TraceOptionPacketType,
    pub dbdesc: TraceOptionPacketType,
    pub lsreq: TraceOptionPacketType,
    pub lsupd: TraceOptionPacketType,
    pub lsack: TraceOptionPacketType,
}

impl TraceOptionPacketResolved {
    pub fn tx(&self, pkt_type: PacketType) -> bool {
        match pkt_type {
            PacketType::Hello => self.hello.tx,
            PacketType::DbDesc => self.dbdesc.tx,
            PacketType::LsRequest => self.lsreq.tx,
            PacketType::LsUpdate => self.lsupd.tx,
            PacketType::LsAck => self.lsack.tx,
        }
    }

    pub fn rx(&self, pkt_type: PacketType) -> bool {
        match pkt_type {
            PacketType::Hello => self.hello.rx,
            PacketType::DbDesc => self.dbdesc.rx,
            PacketType::LsRequest => self.lsreq.rx,
            PacketType::LsUpdate => self.lsupd.rx,
            PacketType::LsAck => self.lsack.rx,
        }
    }
}

pub fn trace_opts_default() -> Arc<ArcSwap<TraceOptionPacketResolved>> {
    Arc::new(ArcSwap::from_pointee(TraceOptionPacketResolved::default()))
}

pub fn spf_delay(cfg: &InstanceCfg) -> Duration {
    Duration::from_millis(cfg.spf_short_delay as u64)
}
