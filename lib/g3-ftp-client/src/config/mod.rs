/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "yaml")]
mod yaml;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpControlConfig {
    /// ceiling of the captured text of a single reply
    pub max_reply_len: usize,
    pub max_multi_lines: usize,
    pub command_timeout: Duration,
}

impl Default for FtpControlConfig {
    fn default() -> Self {
        FtpControlConfig {
            max_reply_len: 65536,
            max_multi_lines: 128,
            command_timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpTransferConfig {
    pub buffer_size: usize,
    pub data_idle_timeout: Duration,
    pub end_wait_timeout: Duration,
}

impl Default for FtpTransferConfig {
    fn default() -> Self {
        FtpTransferConfig {
            buffer_size: 16384,
            data_idle_timeout: Duration::from_secs(60),
            end_wait_timeout: Duration::from_secs(2),
        }
    }
}

/// Where to connect the data connection after a 227 reply.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FtpPassiveAddressPolicy {
    /// Use the address in the 227 reply, or the control peer address if
    /// the server reports an unspecified address.
    #[default]
    ServerReported,
    /// Always use the control peer address, only take the port from the reply.
    ControlPeer,
}

impl FtpPassiveAddressPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FtpPassiveAddressPolicy::ServerReported => "server",
            FtpPassiveAddressPolicy::ControlPeer => "control",
        }
    }
}

impl fmt::Display for FtpPassiveAddressPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FtpPassiveAddressPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "server" | "server_reported" => Ok(FtpPassiveAddressPolicy::ServerReported),
            "control" | "control_peer" => Ok(FtpPassiveAddressPolicy::ControlPeer),
            _ => Err(()),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpClientConfig {
    pub control: FtpControlConfig,
    pub transfer: FtpTransferConfig,
    pub connect_timeout: Duration,
    pub greeting_timeout: Duration,
    pub passive_address: FtpPassiveAddressPolicy,
}

impl Default for FtpClientConfig {
    fn default() -> Self {
        FtpClientConfig {
            control: FtpControlConfig::default(),
            transfer: FtpTransferConfig::default(),
            connect_timeout: Duration::from_secs(30),
            greeting_timeout: Duration::from_secs(10),
            passive_address: FtpPassiveAddressPolicy::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn passive_address_policy() {
        assert_eq!(
            FtpPassiveAddressPolicy::from_str("Server").unwrap(),
            FtpPassiveAddressPolicy::ServerReported
        );
        assert_eq!(
            FtpPassiveAddressPolicy::from_str("control-peer").unwrap(),
            FtpPassiveAddressPolicy::ControlPeer
        );
        assert!(FtpPassiveAddressPolicy::from_str("active").is_err());
        assert_eq!(FtpPassiveAddressPolicy::ControlPeer.to_string(), "control");
    }

    #[test]
    fn control_defaults() {
        let config = FtpControlConfig::default();
        assert_eq!(config.max_reply_len, 64 * 1024);
        assert_eq!(config.max_multi_lines, 128);
        assert_eq!(config.command_timeout, Duration::from_secs(10));
    }
}
