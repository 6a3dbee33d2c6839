//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::sync::LazyLock as Lazy;

use num_derive::FromPrimitive;
use serde::{Deserialize, Serialize};

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum CryptoAlgo {
    ClearText,
    Md5,
    HmacSha1,
    HmacSha256,
}

// Cryptographic Protocol ID.
//
// IANA registry:
// https://www.iana.org/assignments/authentication-cryptographic-protocol-id/authentication-cryptographic-protocol-id.xhtml
#[derive(Clone, Copy, Debug, Eq, FromPrimitive, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum CryptoProtocolId {
    Ospfv2 = 0x03,
}

// A precomputed Apad value used in HMAC authentication.
//
// Apad is the hexadecimal value 0x878FE1F3 repeated (L/4) times, where L is
// the length of the hash, measured in bytes. Sized here for the largest
// supported digest (SHA-256, 32 bytes).
pub static HMAC_APAD: Lazy<Vec<u8>> = Lazy::new(|| {
    [0x87, 0x8F, 0xE1, 0xF3]
        .into_iter()
        .cycle()
        .take(32)
        .collect()
});

// ===== impl CryptoAlgo =====

impl CryptoAlgo {
    pub fn digest_size(&self) -> u8 {
        match self {
            CryptoAlgo::ClearText => unreachable!(),
            CryptoAlgo::Md5 => 16,
            CryptoAlgo::HmacSha1 => 20,
            CryptoAlgo::HmacSha256 => 32,
        }
    }
}
