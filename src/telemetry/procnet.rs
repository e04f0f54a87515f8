//! Parser for Linux `/proc/net/tcp` and `/proc/net/tcp6`.

use super::Connection;
use std::net::{Ipv4Addr, Ipv6Addr};

fn state_name(code: &str) -> &'static str {
    match code {
        "01" => "ESTABLISHED",
        "02" => "SYN_SENT",
        "03" => "SYN_RECV",
        "04" => "FIN_WAIT1",
        "05" => "FIN_WAIT2",
        "06" => "TIME_WAIT",
        "07" => "CLOSE",
        "08" => "CLOSE_WAIT",
        "09" => "LAST_ACK",
        "0A" => "LISTEN",
        "0B" => "CLOSING",
        _ => "UNKNOWN",
    }
}

/// Addresses are printed as host-order 32-bit words.
fn decode_address(hex: &str) -> Option<String> {
    match hex.len() {
        8 => {
            let word = u32::from_str_radix(hex, 16).ok()?;
            Some(Ipv4Addr::from(word.to_le_bytes()).to_string())
        }
        32 => {
            let mut bytes = [0u8; 16];
            for (i, chunk) in bytes.chunks_mut(4).enumerate() {
                let word = u32::from_str_radix(&hex[i * 8..i * 8 + 8], 16).ok()?;
                chunk.copy_from_slice(&word.to_le_bytes());
            }
            Some(Ipv6Addr::from(bytes).to_string())
        }
        _ => None,
    }
}

fn decode_endpoint(field: &str) -> Option<(String, u16)> {
    let (addr, port) = field.split_once(':')?;
    Some((decode_address(addr)?, u16::from_str_radix(port, 16).ok()?))
}

/// Parse the contents of a `/proc/net/tcp*` file. Malformed lines are skipped.
pub fn parse_proc_net_tcp(content: &str, protocol: &str) -> Vec<Connection> {
    content
        .lines()
        .skip(1)
        .filter_map(|line| {
            let mut fields = line.split_whitespace().skip(1);
            let (local_address, local_port) = decode_endpoint(fields.next()?)?;
            let (peer_address, peer_port) = decode_endpoint(fields.next()?)?;
            let state = state_name(fields.next()?);
            Some(Connection {
                protocol: protocol.to_string(),
                local_address,
                local_port,
                peer_address,
                peer_port,
                state: state.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TCP4: &str = "  sl  local_address rem_address   st tx_queue rx_queue tr tm->when retrnsmt   uid  timeout inode
   0: 0100007F:1F90 00000000:0000 0A 00000000:00000000 00:00000000 00000000  1000        0 12345 1 0000000000000000 100 0 0 10 0
   1: 0F02000A:0016 0202000A:C350 01 00000000:00000000 02:000A7B5A 00000000     0        0 23456 4 0000000000000000 20 4 29 10 -1
   garbage line
";

    #[test]
    fn test_parse_ipv4_listen_and_established() {
        let conns = parse_proc_net_tcp(TCP4, "tcp");
        assert_eq!(conns.len(), 2);

        assert_eq!(conns[0].local_address, "127.0.0.1");
        assert_eq!(conns[0].local_port, 8080);
        assert_eq!(conns[0].state, "LISTEN");

        assert_eq!(conns[1].local_address, "10.0.2.15");
        assert_eq!(conns[1].local_port, 22);
        assert_eq!(conns[1].peer_address, "10.0.2.2");
        assert_eq!(conns[1].peer_port, 50000);
        assert_eq!(conns[1].state, "ESTABLISHED");
        assert_eq!(conns[1].protocol, "tcp");
    }

    #[test]
    fn test_parse_ipv6_loopback() {
        let content = "header\n   0: 00000000000000000000000001000000:0035 00000000000000000000000000000000:0000 0A 0 0 0 0 0 0 0\n";
        let conns = parse_proc_net_tcp(content, "tcp6");
        assert_eq!(conns.len(), 1);
        assert_eq!(conns[0].local_address, "::1");
        assert_eq!(conns[0].local_port, 53);
        assert_eq!(conns[0].peer_address, "::");
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_proc_net_tcp("", "tcp").is_empty());
    }
}
