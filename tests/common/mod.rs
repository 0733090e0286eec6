//! Shared test helpers: an in-process fake device
//!
//! The fake device accepts one TCP connection, reads each request frame,
//! reports it on a channel and answers according to a script.

#![allow(dead_code)]

use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam::channel::{unbounded, Receiver, Sender};
use pro_os_connect::protocol::{
    checksum, Command, Node, ProtocolHeader, StatusCode, TransportHeader, TRANSPORT_HEADER_SIZE,
};
use pro_os_connect::Config;

/// What the fake device does with one request
pub enum Reply {
    /// Answer with this status and payload, echoing the request command
    Frame { status: StatusCode, payload: Vec<u8> },
    /// Write raw bytes, in the given chunks, with a pause between them
    Chunks { chunks: Vec<Vec<u8>>, pause: Duration },
    /// Send nothing and keep the connection open
    Silent { hold: Duration },
    /// Answer OK with the request's own payload
    Echo,
    /// Close the connection without answering
    Hangup,
}

impl Reply {
    pub fn ok(payload: impl Into<Vec<u8>>) -> Self {
        Reply::Frame {
            status: StatusCode::Ok,
            payload: payload.into(),
        }
    }

    pub fn status(status: StatusCode) -> Self {
        Reply::Frame {
            status,
            payload: Vec::new(),
        }
    }
}

/// A request as seen by the device
#[derive(Debug, Clone)]
pub struct Captured {
    pub header: ProtocolHeader,
    pub payload: Vec<u8>,
}

pub struct FakeDevice {
    pub port: u16,
    pub requests: Receiver<Captured>,
    handle: JoinHandle<()>,
}

impl FakeDevice {
    /// Start a device that serves `replies` in order on one connection
    pub fn start(replies: Vec<Reply>) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (tx, rx) = unbounded();

        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().unwrap();
            serve(stream, replies, tx);
        });

        Self {
            port,
            requests: rx,
            handle,
        }
    }

    pub fn config(&self) -> Config {
        Config::builder()
            .host("127.0.0.1")
            .port(self.port)
            .timeout(Duration::from_secs(2))
            .poll_interval(Duration::from_millis(20))
            .build()
    }

    pub fn join(self) {
        self.handle.join().unwrap();
    }
}

fn serve(mut stream: TcpStream, replies: Vec<Reply>, tx: Sender<Captured>) {
    for reply in replies {
        let Some(request) = read_request(&mut stream) else {
            return;
        };
        let command = request.header.command;
        let echoed = request.payload.clone();
        let _ = tx.send(request);

        match reply {
            Reply::Frame { status, payload } => {
                let frame = response_frame(command, status, &payload);
                if stream.write_all(&frame).is_err() {
                    return;
                }
            }
            Reply::Chunks { chunks, pause } => {
                for chunk in chunks {
                    if stream.write_all(&chunk).is_err() {
                        return;
                    }
                    let _ = stream.flush();
                    thread::sleep(pause);
                }
            }
            Reply::Silent { hold } => thread::sleep(hold),
            Reply::Echo => {
                let frame = response_frame(command, StatusCode::Ok, &echoed);
                if stream.write_all(&frame).is_err() {
                    return;
                }
            }
            Reply::Hangup => return,
        }
    }

    // Keep the socket open until the client hangs up
    let mut sink = [0u8; 256];
    while matches!(stream.read(&mut sink), Ok(n) if n > 0) {}
}

fn read_request(stream: &mut TcpStream) -> Option<Captured> {
    let mut header = [0u8; TRANSPORT_HEADER_SIZE];
    stream.read_exact(&mut header).ok()?;
    let transport = TransportHeader::from_bytes(&header);

    let mut packet = vec![0u8; transport.payload_length as usize];
    stream.read_exact(&mut packet).ok()?;

    let protocol: [u8; 12] = packet[..12].try_into().ok()?;
    Some(Captured {
        header: ProtocolHeader::from_bytes(&protocol),
        payload: packet[12..].to_vec(),
    })
}

/// Build a well-formed device response
pub fn response_frame(command: Command, status: StatusCode, payload: &[u8]) -> Vec<u8> {
    let header = ProtocolHeader {
        command,
        status,
        from_addr: Node::ProOs,
        to_addr: Node::Client,
    };
    let mut packet = header.to_bytes().to_vec();
    packet.extend_from_slice(payload);

    let transport = TransportHeader::for_packet(&packet);
    let mut frame = transport.to_bytes().to_vec();
    frame.extend_from_slice(&packet);
    frame
}

/// Build a response whose packet CRC is deliberately wrong
pub fn response_frame_bad_crc(command: Command, status: StatusCode, payload: &[u8]) -> Vec<u8> {
    let header = ProtocolHeader {
        command,
        status,
        from_addr: Node::ProOs,
        to_addr: Node::Client,
    };
    let mut packet = header.to_bytes().to_vec();
    packet.extend_from_slice(payload);

    let mut transport = TransportHeader::for_packet(&packet);
    transport.payload_crc = checksum(&packet) ^ 0xDEAD_BEEF;
    transport.header_crc = checksum(&transport.to_bytes()[..12]);

    let mut frame = transport.to_bytes().to_vec();
    frame.extend_from_slice(&packet);
    frame
}
