use punch::{Client, Error, Result, Server};
use std::net::{Ipv4Addr, SocketAddr, SocketAddrV4, ToSocketAddrs};
use std::num::{NonZeroU16, NonZeroU32};
use std::process;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(name = "punch")]
enum Opt {
    /// Run the rendezvous server
    Server(ServerOpt),
    /// Punch through to a peer registered at the same server
    Client(ClientOpt),
}

#[derive(StructOpt, Debug)]
struct ServerOpt {
    /// Port to listen on
    port: NonZeroU16,
}

#[derive(StructOpt, Debug)]
struct ClientOpt {
    /// Rendezvous server host name or IPv4 address
    addr: String,

    /// Rendezvous server port
    port: NonZeroU16,

    /// Number of ping-pong passes to run with the peer
    passes: NonZeroU32,
}

fn main() {
    env_logger::init();

    let opt: Opt = StructOpt::from_args();

    let result = match opt {
        Opt::Server(opt) => run_server(opt),
        Opt::Client(opt) => run_client(opt),
    };

    if let Err(err) = result {
        eprintln!("{}", err);
        process::exit(err.exit_code());
    }
}

fn run_server(opt: ServerOpt) -> Result<()> {
    let listen_addr = SocketAddrV4::new(Ipv4Addr::UNSPECIFIED, opt.port.get());
    Server::new(listen_addr)?.run()
}

fn run_client(opt: ClientOpt) -> Result<()> {
    let server_addr = resolve_ipv4(&opt.addr, opt.port.get())?;
    Client::new(server_addr, opt.passes)?.run()?;

    Ok(())
}

fn resolve_ipv4(host: &str, port: u16) -> Result<SocketAddrV4> {
    (host, port)
        .to_socket_addrs()
        .map_err(|_| Error::Resolve(host.to_string()))?
        .find_map(|addr| match addr {
            SocketAddr::V4(addr) => Some(addr),
            SocketAddr::V6(_) => None,
        })
        .ok_or_else(|| Error::Resolve(host.to_string()))
}
