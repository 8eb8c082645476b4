//! Wire format shared by the server and the clients.
//!
//! Two fixed-size messages: a 6 byte peer endpoint (IPv4 address then port,
//! both network byte order) exchanged during registration, and a 4 byte
//! big-endian round counter carried during the peer exchange. The all-zero
//! endpoint is the sentinel for "no peer pending".

use crate::error::{Error, Result};
use std::net::{Ipv4Addr, SocketAddrV4};

/// Size of an encoded peer endpoint.
pub const ENDPOINT_LEN: usize = 6;

/// Size of an encoded round counter.
pub const ROUND_LEN: usize = 4;

/// "No peer pending". Encodes to all zero bytes.
pub const SENTINEL: SocketAddrV4 = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, 0);

pub fn encode_endpoint(endpoint: SocketAddrV4) -> [u8; ENDPOINT_LEN] {
    let mut buf = [0u8; ENDPOINT_LEN];
    buf[..4].copy_from_slice(&endpoint.ip().octets());
    buf[4..].copy_from_slice(&endpoint.port().to_be_bytes());
    buf
}

pub fn decode_endpoint(buf: &[u8]) -> Result<SocketAddrV4> {
    if buf.len() != ENDPOINT_LEN {
        return Err(Error::MessageSize {
            want: ENDPOINT_LEN,
            got: buf.len(),
        });
    }

    let ip = Ipv4Addr::new(buf[0], buf[1], buf[2], buf[3]);
    let port = u16::from_be_bytes([buf[4], buf[5]]);
    Ok(SocketAddrV4::new(ip, port))
}

pub fn encode_round(round: u32) -> [u8; ROUND_LEN] {
    round.to_be_bytes()
}

pub fn decode_round(buf: &[u8]) -> Result<u32> {
    if buf.len() != ROUND_LEN {
        return Err(Error::MessageSize {
            want: ROUND_LEN,
            got: buf.len(),
        });
    }

    Ok(u32::from_be_bytes([buf[0], buf[1], buf[2], buf[3]]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_roundtrip() {
        let max = SocketAddrV4::new(Ipv4Addr::new(255, 255, 255, 255), 65535);
        for endpoint in [SENTINEL, "192.0.2.7:9000".parse().unwrap(), max] {
            assert_eq!(decode_endpoint(&encode_endpoint(endpoint)).unwrap(), endpoint);
        }
    }

    #[test]
    fn sentinel_encodes_to_all_zero() {
        assert_eq!(encode_endpoint(SENTINEL), [0u8; ENDPOINT_LEN]);
    }

    #[test]
    fn round_roundtrip() {
        for round in [0, 1, u32::MAX] {
            assert_eq!(decode_round(&encode_round(round)).unwrap(), round);
        }
    }

    #[test]
    fn wrong_length_is_rejected() {
        assert!(decode_endpoint(&[0u8; 5]).is_err());
        assert!(decode_endpoint(&[0u8; 7]).is_err());
        assert!(decode_round(&[0u8; 3]).is_err());
        assert!(decode_round(&[0u8; 5]).is_err());
    }
}
