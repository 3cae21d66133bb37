/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::net::{Ipv4Addr, SocketAddrV4};

use crate::error::FtpPassiveReplyError;

/// Decode the data endpoint from the text of a 227 reply.
///
/// The text looks like `Entering Passive Mode (h1,h2,h3,h4,p1,p2).`, but the
/// wording is not standardized, so the first run of six comma separated
/// octets closed by `)` is used wherever it appears.
pub fn decode_pasv_reply(text: &[u8]) -> Result<SocketAddrV4, FtpPassiveReplyError> {
    let mut offset = 0;
    while let Some(p) = text[offset..].iter().position(u8::is_ascii_digit) {
        let start = offset + p;
        if let Some(addr) = scan_address(&text[start..]) {
            if addr.port() == 0 {
                return Err(FtpPassiveReplyError::ZeroPort);
            }
            return Ok(addr);
        }
        // skip the whole digit run, never restart inside it
        offset = start + digit_run_len(&text[start..]);
    }
    Err(FtpPassiveReplyError::NoAddressFound)
}

fn digit_run_len(s: &[u8]) -> usize {
    s.iter().take_while(|c| c.is_ascii_digit()).count()
}

fn scan_octet(s: &[u8]) -> Option<(u8, usize)> {
    let len = digit_run_len(s);
    if len == 0 || len > 3 {
        return None;
    }
    let v = s[..len]
        .iter()
        .fold(0u16, |acc, c| acc * 10 + (c - b'0') as u16);
    u8::try_from(v).ok().map(|v| (v, len))
}

fn scan_address(s: &[u8]) -> Option<SocketAddrV4> {
    let mut fields = [0u8; 6];
    let mut offset = 0;
    for (i, field) in fields.iter_mut().enumerate() {
        let (v, len) = scan_octet(&s[offset..])?;
        *field = v;
        offset += len;

        let delimiter = if i < 5 { b',' } else { b')' };
        if s.get(offset) != Some(&delimiter) {
            return None;
        }
        offset += 1;
    }

    let ip = Ipv4Addr::new(fields[0], fields[1], fields[2], fields[3]);
    let port = ((fields[4] as u16) << 8) + (fields[5] as u16);
    Some(SocketAddrV4::new(ip, port))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard() {
        let addr = decode_pasv_reply(b"Entering Passive Mode (192,168,1,1,200,10).").unwrap();
        assert_eq!(*addr.ip(), Ipv4Addr::new(192, 168, 1, 1));
        assert_eq!(addr.port(), 51210);
    }

    #[test]
    fn without_trailing_dot() {
        let addr = decode_pasv_reply(b"Entering Passive Mode (127,0,0,1,4,56)").unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::LOCALHOST, 1080));
    }

    #[test]
    fn digits_before_tuple() {
        let addr = decode_pasv_reply(b"=1 Ok, 1234,5 (10,0,0,2,195,149).").unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 2), 50069));
    }

    #[test]
    fn first_tuple_wins() {
        let addr = decode_pasv_reply(b"(10,0,0,1,0,21) (10,0,0,2,0,22)").unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(10, 0, 0, 1), 21));
    }

    #[test]
    fn no_partial_run_match() {
        // "1192" must not be read as "192"
        assert_eq!(
            decode_pasv_reply(b"(1192,168,1,1,200,10)"),
            Err(FtpPassiveReplyError::NoAddressFound)
        );
    }

    #[test]
    fn invalid() {
        assert_eq!(
            decode_pasv_reply(b"Entering Passive Mode"),
            Err(FtpPassiveReplyError::NoAddressFound)
        );
        assert_eq!(
            decode_pasv_reply(b"Entering Passive Mode (192,168,1,1,200)."),
            Err(FtpPassiveReplyError::NoAddressFound)
        );
        assert_eq!(
            decode_pasv_reply(b"Entering Passive Mode (192,168,1,1,200,10."),
            Err(FtpPassiveReplyError::NoAddressFound)
        );
        assert_eq!(
            decode_pasv_reply(b"Entering Passive Mode (192,168,1,256,200,10)."),
            Err(FtpPassiveReplyError::NoAddressFound)
        );
        assert_eq!(
            decode_pasv_reply(b"Entering Passive Mode (192, 168, 1, 1, 200, 10)."),
            Err(FtpPassiveReplyError::NoAddressFound)
        );
        assert_eq!(decode_pasv_reply(b""), Err(FtpPassiveReplyError::NoAddressFound));
    }

    #[test]
    fn zero_port() {
        assert_eq!(
            decode_pasv_reply(b"Entering Passive Mode (192,168,1,1,0,0)."),
            Err(FtpPassiveReplyError::ZeroPort)
        );
    }
}
