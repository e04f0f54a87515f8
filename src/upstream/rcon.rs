//! Minimal RCON client for game-server consoles.
//!
//! Wire format (little endian): `i32 length | i32 request id | i32 type | body | 0x00 0x00`,
//! where `length` counts everything after itself. One session is one TCP
//! connection: connect, authenticate, run commands in order, close.

use super::error::FailureReason;
use std::io;
use thiserror::Error;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

/// Login request.
pub const PACKET_AUTH: i32 = 3;
/// Command request, also the type of an auth reply.
pub const PACKET_EXEC: i32 = 2;
/// Command reply.
pub const PACKET_RESPONSE: i32 = 0;

/// Largest body a server sends in one packet.
pub const MAX_BODY_LEN: usize = 4096;

/// Bytes counted by `length` besides the body: id, type, two NUL terminators.
const FRAME_OVERHEAD: usize = 10;

#[derive(Debug, Error)]
pub enum RconError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("authentication rejected")]
    AuthRejected,

    #[error("malformed packet: {0}")]
    Malformed(String),
}

impl From<RconError> for FailureReason {
    fn from(e: RconError) -> Self {
        match e {
            RconError::Io(io) => match io.kind() {
                io::ErrorKind::ConnectionRefused => FailureReason::ConnectionRefused,
                io::ErrorKind::TimedOut => FailureReason::Timeout,
                _ => FailureReason::ProtocolError(io.to_string()),
            },
            other => FailureReason::ProtocolError(other.to_string()),
        }
    }
}

/// One decoded frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Packet {
    pub id: i32,
    pub kind: i32,
    pub body: String,
}

/// Encode a frame, length prefix included.
pub fn encode_packet(id: i32, kind: i32, body: &str) -> Vec<u8> {
    let length = (body.len() + FRAME_OVERHEAD) as i32;
    let mut buf = Vec::with_capacity(body.len() + FRAME_OVERHEAD + 4);
    buf.extend_from_slice(&length.to_le_bytes());
    buf.extend_from_slice(&id.to_le_bytes());
    buf.extend_from_slice(&kind.to_le_bytes());
    buf.extend_from_slice(body.as_bytes());
    buf.extend_from_slice(&[0, 0]);
    buf
}

/// Decode the bytes that follow the length prefix.
pub fn decode_packet(frame: &[u8]) -> Result<Packet, RconError> {
    if frame.len() < FRAME_OVERHEAD {
        return Err(RconError::Malformed(format!(
            "frame of {} bytes is shorter than the header",
            frame.len()
        )));
    }
    let id = i32::from_le_bytes([frame[0], frame[1], frame[2], frame[3]]);
    let kind = i32::from_le_bytes([frame[4], frame[5], frame[6], frame[7]]);
    let body = &frame[8..frame.len() - 2];
    // Servers differ on whether the body itself is NUL terminated
    let body = match body.iter().position(|&b| b == 0) {
        Some(end) => &body[..end],
        None => body,
    };
    Ok(Packet {
        id,
        kind,
        body: String::from_utf8_lossy(body).into_owned(),
    })
}

/// An open console connection.
pub struct RconConnection {
    stream: TcpStream,
    next_id: i32,
}

impl RconConnection {
    pub async fn connect(host: &str, port: u16) -> Result<Self, RconError> {
        let stream = TcpStream::connect((host, port)).await?;
        stream.set_nodelay(true)?;
        Ok(Self { stream, next_id: 1 })
    }

    fn allocate_id(&mut self) -> i32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    async fn write_packet(&mut self, id: i32, kind: i32, body: &str) -> Result<(), RconError> {
        self.stream.write_all(&encode_packet(id, kind, body)).await?;
        self.stream.flush().await?;
        Ok(())
    }

    async fn read_packet(&mut self) -> Result<Packet, RconError> {
        let length = self.stream.read_i32_le().await?;
        if length < FRAME_OVERHEAD as i32 || length as usize > MAX_BODY_LEN + FRAME_OVERHEAD {
            return Err(RconError::Malformed(format!("invalid length {}", length)));
        }
        let mut frame = vec![0u8; length as usize];
        self.stream.read_exact(&mut frame).await?;
        decode_packet(&frame)
    }

    /// Log in. An auth reply carrying id -1 means the password was wrong.
    pub async fn authenticate(&mut self, password: &str) -> Result<(), RconError> {
        let id = self.allocate_id();
        self.write_packet(id, PACKET_AUTH, password).await?;
        loop {
            let packet = self.read_packet().await?;
            // Source servers send an empty RESPONSE before the auth reply
            if packet.kind == PACKET_RESPONSE {
                continue;
            }
            if packet.id == -1 {
                return Err(RconError::AuthRejected);
            }
            if packet.id == id {
                return Ok(());
            }
            return Err(RconError::Malformed(format!(
                "auth reply for unknown id {}",
                packet.id
            )));
        }
    }

    /// Send one command and return the text of its single reply.
    pub async fn execute(&mut self, command: &str) -> Result<String, RconError> {
        let id = self.allocate_id();
        self.write_packet(id, PACKET_EXEC, command).await?;
        loop {
            let packet = self.read_packet().await?;
            if packet.id == id {
                return Ok(packet.body);
            }
            tracing::debug!(expected = id, got = packet.id, "Skipping stray RCON packet");
        }
    }

    pub async fn close(mut self) -> Result<(), RconError> {
        self.stream.shutdown().await?;
        Ok(())
    }
}

/// Run `commands` over one fresh connection and return their replies in order.
///
/// The connection is shut down whether or not authentication or any command
/// failed. If the surrounding future is dropped (timeout), dropping the
/// stream closes the socket.
pub async fn run_session(
    host: &str,
    port: u16,
    password: &str,
    commands: &[String],
) -> Result<Vec<String>, RconError> {
    let mut conn = RconConnection::connect(host, port).await?;

    let outcome = async {
        conn.authenticate(password).await?;
        let mut replies = Vec::with_capacity(commands.len());
        for command in commands {
            replies.push(conn.execute(command).await?);
        }
        Ok::<_, RconError>(replies)
    }
    .await;

    if let Err(e) = conn.close().await {
        tracing::debug!(error = %e, "RCON shutdown failed");
    }
    outcome
}
