//
// Copyright (c) The Holo Core Contributors
//
// See LICENSE for license details.
//

use std::time::{SystemTime, UNIX_EPOCH};

use ospf_utils::ip::AddressFamily;

use crate::instance::{Instance, InstanceVersion};
use crate::version::Ospfv2;

// ===== impl Ospfv2 =====

impl InstanceVersion<Self> for Ospfv2 {
    // RFC 2328's cryptographic authentication doesn't mandate a strictly
    // increasing sequence number across restarts.
    const STRICT_AUTH_SEQNO_CHECK: bool = false;

    fn address_family(_instance: &Instance<Self>) -> AddressFamily {
        // OSPFv2 supports only IPv4 routing.
        AddressFamily::Ipv4
    }

    fn initial_auth_seqno() -> u64 {
        // RFC 2328 Appendix D.3 allows seeding the non-decreasing sequence
        // number from a time-of-day clock as an alternative to persisting it
        // across restarts; this engine doesn't have a non-volatile store, so
        // the wall-clock reading at startup is what it uses.
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}
