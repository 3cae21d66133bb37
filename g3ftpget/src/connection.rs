/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::{IpAddr, Ipv4Addr, SocketAddr, SocketAddrV4};
use std::str::FromStr;

use async_trait::async_trait;
use tokio::net::{TcpSocket, TcpStream};

use g3_ftp_client::FtpConnectionProvider;

#[derive(Default)]
pub(crate) struct LocalConnectionProvider {
    bind_ip: Option<Ipv4Addr>,
}

impl LocalConnectionProvider {
    pub(crate) fn set_bind_ip(&mut self, ip: Ipv4Addr) {
        self.bind_ip = Some(ip);
    }

    async fn connect(&self, addr: SocketAddrV4) -> io::Result<TcpStream> {
        let socket = TcpSocket::new_v4()?;
        if let Some(ip) = self.bind_ip {
            socket.bind(SocketAddr::new(IpAddr::V4(ip), 0))?;
        }
        socket.connect(SocketAddr::V4(addr)).await
    }
}

#[async_trait]
impl FtpConnectionProvider<TcpStream, io::Error> for LocalConnectionProvider {
    async fn resolve_host(&mut self, host: &str) -> io::Result<Ipv4Addr> {
        if let Ok(ip) = Ipv4Addr::from_str(host) {
            return Ok(ip);
        }

        for addr in tokio::net::lookup_host((host, 0)).await? {
            if let SocketAddr::V4(addr) = addr {
                return Ok(*addr.ip());
            }
        }
        Err(io::Error::new(
            io::ErrorKind::AddrNotAvailable,
            format!("no ipv4 address resolved for host {host}"),
        ))
    }

    async fn new_control_connection(&mut self, addr: SocketAddrV4) -> io::Result<TcpStream> {
        self.connect(addr).await
    }

    async fn new_data_connection(&mut self, addr: SocketAddrV4) -> io::Result<TcpStream> {
        self.connect(addr).await
    }
}
