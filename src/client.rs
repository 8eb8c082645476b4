//! Punch client.
//!
//! Registers with the rendezvous server, learns its role from the reply,
//! then ping-pongs a round counter directly with the peer to verify the
//! punched path.

use crate::error::{Error, Result};
use crate::proto;
use socket2::{Domain, Protocol, Socket, Type};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, UdpSocket};
use std::num::NonZeroU32;

/// Which side of the punched path this client takes, decided by the server
/// reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    /// Registered first. Keeps waiting on the socket whose registration
    /// already opened an outbound NAT mapping, and learns the peer from the
    /// first packet that arrives through it.
    Listener,
    /// Registered second. Knows the peer from the server reply and opens
    /// the exchange with a send from a fresh socket.
    Initiator,
}

impl Role {
    fn from_reply(reply: SocketAddrV4) -> Self {
        if reply == proto::SENTINEL {
            Role::Listener
        } else {
            Role::Initiator
        }
    }

    /// Even iterations receive, odd iterations send.
    fn first_iteration(self) -> u64 {
        match self {
            Role::Listener => 0,
            Role::Initiator => 1,
        }
    }

    /// The initiator's bound is one higher because its schedule starts at
    /// iteration 1; both roles end up performing `2 * passes` actions.
    fn total_iterations(self, passes: u32) -> u64 {
        let both_ways = 2 * u64::from(passes);
        match self {
            Role::Listener => both_ways,
            Role::Initiator => both_ways + 1,
        }
    }
}

/// Punch-through client.
///
/// # example
/// ```no_run
/// use punch::Client;
/// use std::num::NonZeroU32;
///
/// let server_addr = "203.0.113.9:9000".parse().unwrap();
/// let passes = NonZeroU32::new(3).unwrap();
/// let rounds = Client::new(server_addr, passes).unwrap().run().unwrap();
/// assert_eq!(rounds, [0, 1, 2]);
/// ```
pub struct Client {
    socket: UdpSocket,
    server_addr: SocketAddrV4,
    passes: u32,
}

impl Client {
    /// Bind an ephemeral local socket for talking to the rendezvous server.
    pub fn new(server_addr: SocketAddrV4, passes: NonZeroU32) -> Result<Self> {
        Ok(Self {
            socket: new_socket()?,
            server_addr,
            passes: passes.get(),
        })
    }

    /// Register, take a role from the server reply, then run the exchange.
    ///
    /// Returns the rounds received from the peer, in order. Every receive
    /// blocks without timeout; a lost datagram hangs the run.
    pub fn run(self) -> Result<Vec<u32>> {
        let Self {
            socket,
            server_addr,
            passes,
        } = self;

        socket
            .send_to(&proto::encode_endpoint(proto::SENTINEL), server_addr)
            .map_err(Error::Send)?;

        // one spare byte so an oversized reply shows up in the length
        let mut buf = [0u8; proto::ENDPOINT_LEN + 1];
        let (n, _) = socket.recv_from(&mut buf).map_err(Error::Recv)?;
        let reply = proto::decode_endpoint(&buf[..n])?;

        let role = Role::from_reply(reply);
        log::debug!("{:?}, reply {}", role, reply);

        let exchange = match role {
            Role::Listener => Exchange {
                socket,
                peer: None,
                iteration: role.first_iteration(),
                total: role.total_iterations(passes),
            },
            Role::Initiator => {
                // the registration socket has no further use, the exchange
                // runs on a fresh one
                drop(socket);

                Exchange {
                    socket: new_socket()?,
                    peer: Some(reply),
                    iteration: role.first_iteration(),
                    total: role.total_iterations(passes),
                }
            }
        };

        exchange.run()
    }
}

fn new_socket() -> Result<UdpSocket> {
    let socket =
        Socket::new(Domain::IPV4, Type::DGRAM, Some(Protocol::UDP)).map_err(Error::Socket)?;
    let local_addr: SocketAddr = (Ipv4Addr::UNSPECIFIED, 0).into();
    socket.bind(&local_addr.into()).map_err(Error::Socket)?;

    Ok(socket.into())
}

/// One side of the ping-pong exchange.
struct Exchange {
    socket: UdpSocket,
    peer: Option<SocketAddrV4>,
    iteration: u64,
    total: u64,
}

impl Exchange {
    fn run(mut self) -> Result<Vec<u32>> {
        let mut received = Vec::new();

        while self.iteration < self.total {
            if self.iteration % 2 == 0 {
                let round = self.recv_round()?;
                println!("received {}", round);
                received.push(round);
            } else {
                self.send_round((self.iteration / 2) as u32)?;
            }

            self.iteration += 1;
        }

        Ok(received)
    }

    fn recv_round(&mut self) -> Result<u32> {
        // one spare byte so an oversized datagram shows up in the length
        let mut buf = [0u8; proto::ROUND_LEN + 1];
        let (n, from) = self.socket.recv_from(&mut buf).map_err(Error::Recv)?;

        if self.peer.is_none() {
            if let SocketAddr::V4(addr) = from {
                self.peer = Some(addr);
            }
        }

        proto::decode_round(&buf[..n])
    }

    fn send_round(&mut self, round: u32) -> Result<()> {
        let peer = self
            .peer
            .expect("peer address is learned before the first send");
        self.socket
            .send_to(&proto::encode_round(round), peer)
            .map_err(Error::Send)?;

        Ok(())
    }
}
