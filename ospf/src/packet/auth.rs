//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use derive_new::new;
use hmac::Hmac;
use hmac::digest::block_buffer::Eager;
use hmac::digest::core_api::{
    BlockSizeUser, BufferKindUser, CoreProxy, FixedOutputCore, UpdateCore,
};
use hmac::digest::typenum::{IsLess, Le, NonZero, U256};
use hmac::digest::{Digest, HashMarker, Mac, OutputSizeUser};
use md5::Md5;
use ospf_utils::crypto::{CryptoAlgo, CryptoProtocolId, HMAC_APAD};
use sha1::Sha1;
use sha2::Sha256;

use crate::config::AuthKey;

// Authentication method in effect for an interface or virtual link.
#[derive(Clone, Debug)]
pub enum AuthMethod {
    // RFC 2328 simple text password.
    ClearText(String),
    // RFC 5709/7474 keyed MD5 or HMAC authentication. More than one key may
    // be active at once to support key rollover: on decode, the packet is
    // accepted if its digest matches any of them.
    Crypto(Vec<AuthKey>),
}

impl AuthMethod {
    // The key used to sign outgoing packets: the one with the highest ID.
    pub fn tx_key(&self) -> Option<&AuthKey> {
        match self {
            AuthMethod::Crypto(keys) => keys.iter().max_by_key(|k| k.id),
            AuthMethod::ClearText(_) => None,
        }
    }

    pub fn key_by_id(&self, key_id: u64) -> Option<&AuthKey> {
        match self {
            AuthMethod::Crypto(keys) => {
                keys.iter().find(|k| k.id == key_id)
            }
            AuthMethod::ClearText(_) => None,
        }
    }

    // Upper bound on the digest size across all active keys, used when
    // reserving room for the authentication trailer in outgoing packets.
    pub fn max_digest_size(&self) -> u8 {
        match self {
            AuthMethod::Crypto(keys) => keys
                .iter()
                .map(|k| k.algo.digest_size())
                .max()
                .unwrap_or(0),
            AuthMethod::ClearText(_) => 0,
        }
    }
}

#[derive(Clone, Copy, Debug, new)]
pub struct AuthEncodeCtx<'a> {
    // Authentication key.
    pub key: &'a AuthKey,
    // Authentication sequence number.
    pub seqno: &'a Arc<AtomicU64>,
    // Packet source.
    pub src_addr: Ipv4Addr,
}

#[derive(Clone, Copy, Debug, new)]
pub struct AuthDecodeCtx<'a> {
    // Authentication method.
    pub method: &'a AuthMethod,
    // Packet source.
    pub src_addr: Ipv4Addr,
}

// ===== helper functions =====

fn keyed_md5_digest(data: &[u8], key: &[u8]) -> Vec<u8> {
    // The authentication key needs to be 16-bytes long.
    let mut key = key.to_vec();
    key.resize(16, 0);

    let mut ctx = Md5::new();
    ctx.update(data);
    ctx.update(&key);
    ctx.finalize().to_vec()
}

fn hmac_sha_digest<H>(
    data: &[u8],
    key: &[u8],
    proto_id: Option<CryptoProtocolId>,
    src: Option<Ipv4Addr>,
) -> Vec<u8>
where
    H: CoreProxy,
    H::Core: HashMarker
        + UpdateCore
        + FixedOutputCore
        + BufferKindUser<BufferKind = Eager>
        + Default
        + Clone,
    <H::Core as BlockSizeUser>::BlockSize: IsLess<U256>,
    Le<<H::Core as BlockSizeUser>::BlockSize, U256>: NonZero,
{
    let mut key = key;
    let key_proto: Vec<u8>;

    // Append Cryptographic Protocol ID to the authentication key.
    if let Some(proto_id) = proto_id {
        let proto_id = proto_id as u16;
        key_proto = [key, &proto_id.to_be_bytes()].concat();
        key = &key_proto;
    }

    // Compute the message digest.
    let mut mac = Hmac::<H>::new_from_slice(key).unwrap();
    mac.update(data);
    let digest_size = H::Core::output_size();

    // RFC 7474 Section 5: "Initialize the first 4 octets of Apad to the IP
    // source address from the IP header of the incoming OSPFv2 packet. The
    // remainder of Apad will contain the value 0x878FE1F3 repeated (L - 4)/4
    // times".
    match src {
        Some(addr) => {
            mac.update(&addr.octets());
            mac.update(&HMAC_APAD[..digest_size - 4]);
        }
        None => {
            mac.update(&HMAC_APAD[..digest_size]);
        }
    }
    let digest = mac.finalize();
    digest.into_bytes().to_vec()
}

// ===== global functions =====

pub(crate) fn message_digest(
    data: &[u8],
    algo: CryptoAlgo,
    key: &[u8],
    proto_id: Option<CryptoProtocolId>,
    src: Option<Ipv4Addr>,
) -> Vec<u8> {
    match algo {
        CryptoAlgo::Md5 => keyed_md5_digest(data, key),
        CryptoAlgo::HmacSha1 => {
            hmac_sha_digest::<Sha1>(data, key, proto_id, src)
        }
        CryptoAlgo::HmacSha256 => {
            hmac_sha_digest::<Sha256>(data, key, proto_id, src)
        }
        CryptoAlgo::ClearText => {
            // Clear-text authentication doesn't use a message digest.
            unreachable!()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AuthKey;

    fn key(id: u64, algo: CryptoAlgo) -> AuthKey {
        AuthKey {
            id,
            algo,
            string: "HOLO".to_owned(),
        }
    }

    #[test]
    fn tx_key_picks_highest_id() {
        let method = AuthMethod::Crypto(vec![
            key(1, CryptoAlgo::Md5),
            key(3, CryptoAlgo::Md5),
            key(2, CryptoAlgo::Md5),
        ]);
        assert_eq!(method.tx_key().unwrap().id, 3);
    }

    #[test]
    fn key_by_id_finds_any_configured_key() {
        // RFC 2328 key rollover: a packet is accepted if its digest matches
        // any configured key, not just the one used for transmission.
        let method = AuthMethod::Crypto(vec![
            key(1, CryptoAlgo::Md5),
            key(2, CryptoAlgo::HmacSha1),
        ]);
        assert_eq!(method.key_by_id(1).unwrap().algo, CryptoAlgo::Md5);
        assert_eq!(method.key_by_id(2).unwrap().algo, CryptoAlgo::HmacSha1);
        assert!(method.key_by_id(99).is_none());
    }

    #[test]
    fn max_digest_size_is_the_largest_among_active_keys() {
        let method = AuthMethod::Crypto(vec![
            key(1, CryptoAlgo::Md5),
            key(2, CryptoAlgo::HmacSha256),
        ]);
        assert_eq!(method.max_digest_size(), CryptoAlgo::HmacSha256.digest_size());
    }

    #[test]
    fn cleartext_method_has_no_crypto_keys() {
        let method = AuthMethod::ClearText("secret".to_owned());
        assert!(method.tx_key().is_none());
        assert_eq!(method.max_digest_size(), 0);
    }

    #[test]
    fn keyed_md5_digest_depends_on_key_and_data() {
        let data = b"hello ospf";
        let d1 = keyed_md5_digest(data, b"key-one");
        let d2 = keyed_md5_digest(data, b"key-two");
        let d3 = keyed_md5_digest(data, b"key-one");
        assert_eq!(d1, d3);
        assert_ne!(d1, d2);
        assert_eq!(d1.len(), 16);
    }

    #[test]
    fn hmac_sha_digest_changes_with_source_address() {
        let data = b"hello ospf";
        let key = b"shared-secret";
        let d1 = hmac_sha_digest::<Sha1>(
            data,
            key,
            None,
            Some(Ipv4Addr::new(10, 0, 0, 1)),
        );
        let d2 = hmac_sha_digest::<Sha1>(
            data,
            key,
            None,
            Some(Ipv4Addr::new(10, 0, 0, 2)),
        );
        assert_ne!(d1, d2);
        assert_eq!(d1.len(), 20);
    }
}
