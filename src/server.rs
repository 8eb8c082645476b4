//! Pairing rendezvous server.
//!
//! Pairs registrants two at a time in arrival order. The first of a pair is
//! told "no peer yet" (the sentinel) and becomes the pending peer; the
//! second is told the pending peer's observed address, which completes the
//! pair and clears the slot for the next one.

use crate::error::{Error, Result};
use crate::proto;
use std::net::{SocketAddr, SocketAddrV4, ToSocketAddrs, UdpSocket};

/// Pairing state. Holds at most one pending peer at any time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Pairing {
    AwaitingFirst,
    AwaitingSecond(SocketAddrV4),
}

impl Pairing {
    /// Reply owed to a registration from `sender`, and the state that
    /// follows. The reply reflects the state before `sender` is recorded.
    fn register(self, sender: SocketAddrV4) -> (SocketAddrV4, Pairing) {
        match self {
            Pairing::AwaitingFirst => (proto::SENTINEL, Pairing::AwaitingSecond(sender)),
            Pairing::AwaitingSecond(pending) => (pending, Pairing::AwaitingFirst),
        }
    }
}

/// Udp rendezvous server.
///
/// Answers every registration with the current pairing slot, so a pair of
/// clients ends up knowing each other's public endpoints after one
/// registration each.
pub struct Server {
    socket: UdpSocket,
    pairing: Pairing,
}

impl Server {
    pub fn new<A: ToSocketAddrs>(listen_addr: A) -> Result<Self> {
        let socket = UdpSocket::bind(listen_addr).map_err(Error::Socket)?;

        Ok(Self {
            socket,
            pairing: Pairing::AwaitingFirst,
        })
    }

    /// Address the socket ended up bound to.
    pub fn local_addr(&self) -> Result<SocketAddr> {
        self.socket.local_addr().map_err(Error::Socket)
    }

    pub fn run(mut self) -> Result<()> {
        // registration payloads carry nothing, only the source matters
        let mut buf = [0u8; proto::ENDPOINT_LEN];

        loop {
            let (_, from) = self.socket.recv_from(&mut buf).map_err(Error::Recv)?;

            let from = match from {
                SocketAddr::V4(addr) => addr,
                SocketAddr::V6(_) => continue,
            };

            let (reply, next) = self.pairing.register(from);
            self.socket
                .send_to(&proto::encode_endpoint(reply), from)
                .map_err(Error::Send)?;

            match next {
                Pairing::AwaitingSecond(pending) => log::debug!("pending {}", pending),
                Pairing::AwaitingFirst => log::debug!("paired {} <-> {}", reply, from),
            }

            self.pairing = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(n: u8) -> SocketAddrV4 {
        SocketAddrV4::new([10, 0, 0, n].into(), 4000 + n as u16)
    }

    #[test]
    fn first_gets_sentinel_second_gets_first() {
        let (reply, state) = Pairing::AwaitingFirst.register(addr(1));
        assert_eq!(reply, proto::SENTINEL);
        assert_eq!(state, Pairing::AwaitingSecond(addr(1)));

        let (reply, state) = state.register(addr(2));
        assert_eq!(reply, addr(1));
        assert_eq!(state, Pairing::AwaitingFirst);
    }

    #[test]
    fn slot_is_clear_after_every_pair() {
        let mut state = Pairing::AwaitingFirst;
        for pair in 0..4u8 {
            let (reply, next) = state.register(addr(2 * pair));
            assert_eq!(reply, proto::SENTINEL);

            let (reply, next) = next.register(addr(2 * pair + 1));
            assert_eq!(reply, addr(2 * pair));
            assert_eq!(next, Pairing::AwaitingFirst);

            state = next;
        }
    }
}
