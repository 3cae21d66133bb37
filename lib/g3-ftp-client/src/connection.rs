/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::error::Error;
use std::net::{Ipv4Addr, SocketAddrV4};

use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

#[async_trait]
pub trait FtpConnectionProvider<T: AsyncRead + AsyncWrite, E: Error> {
    async fn resolve_host(&mut self, host: &str) -> Result<Ipv4Addr, E>;
    async fn new_control_connection(&mut self, addr: SocketAddrV4) -> Result<T, E>;
    async fn new_data_connection(&mut self, addr: SocketAddrV4) -> Result<T, E>;
}
