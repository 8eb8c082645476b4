//!A minimal UDP NAT hole punching demo: a rendezvous server that pairs
//!clients two at a time, and a punch client that verifies the punched path
//!with a short ping-pong exchange.
//!
//!To reach a node behind a NAT or a stateful firewall, which only allows
//!outbound connections, the node must send traffic first. The server sits
//!on a public address and observes every registrant's public endpoint.
//!
//!## How pairing works
//!Clients register by sending one datagram to the server, and the server
//!answers each one immediately. The first client of a pair is told "no
//!peer yet" and keeps waiting on the socket whose registration already
//!opened an outbound mapping. The second is told the first's observed
//!endpoint and opens the exchange by sending to it. Both NATs then hold a
//!mapping for the peer and the direct path carries traffic.
//!
//!Everything is blocking and single threaded. There are no timeouts and no
//!retries; a lost datagram anywhere hangs the run.
//!
//!## Feature flags
//!For convenience, the crate includes both client and server code by
//!default. Mostly you only use one of them, set features to `client` or
//!`server` instead.
//!
//!- `client`: punch client
//!- `server`: rendezvous server

mod error;
pub use error::{Error, Result};

pub mod proto;

#[cfg(feature = "client")]
mod client;
#[cfg(feature = "client")]
pub use client::Client;

#[cfg(feature = "server")]
mod server;
#[cfg(feature = "server")]
pub use server::Server;
