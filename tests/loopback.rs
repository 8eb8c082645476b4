use punch::{Client, Server};
use std::net::{SocketAddr, SocketAddrV4};
use std::num::NonZeroU32;
use std::thread;
use std::time::Duration;

fn spawn_server() -> SocketAddrV4 {
    let server = Server::new("127.0.0.1:0").unwrap();
    let server_addr = match server.local_addr().unwrap() {
        SocketAddr::V4(addr) => addr,
        SocketAddr::V6(_) => unreachable!(),
    };

    thread::spawn(move || server.run().unwrap());

    server_addr
}

fn run_pair(server_addr: SocketAddrV4, passes: u32) -> (Vec<u32>, Vec<u32>) {
    let passes = NonZeroU32::new(passes).unwrap();

    let first = thread::spawn(move || Client::new(server_addr, passes).unwrap().run().unwrap());
    // let the first client register and become the listener
    thread::sleep(Duration::from_millis(50));
    let second = thread::spawn(move || Client::new(server_addr, passes).unwrap().run().unwrap());

    (first.join().unwrap(), second.join().unwrap())
}

#[test]
fn pairs_two_clients_and_converges() {
    let server_addr = spawn_server();

    let (first, second) = run_pair(server_addr, 3);
    assert_eq!(first, vec![0, 1, 2]);
    assert_eq!(second, vec![0, 1, 2]);
}

#[test]
fn single_pass_converges_on_round_zero() {
    let server_addr = spawn_server();

    let (first, second) = run_pair(server_addr, 1);
    assert_eq!(first, vec![0]);
    assert_eq!(second, vec![0]);
}

#[test]
fn server_pairs_consecutive_arrivals() {
    let server_addr = spawn_server();

    // two pairs back to back against the same server; the slot must reset
    // between them
    for _ in 0..2 {
        let (first, second) = run_pair(server_addr, 2);
        assert_eq!(first, vec![0, 1]);
        assert_eq!(second, vec![0, 1]);
    }
}
