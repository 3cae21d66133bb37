/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::fmt;

pub const FTP_DEFAULT_PORT: u16 = 21;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpTarget {
    host: String,
    port: u16,
    url_path: String,
}

impl FtpTarget {
    pub fn new(host: &str, url_path: &str) -> Self {
        FtpTarget {
            host: host.to_string(),
            port: FTP_DEFAULT_PORT,
            url_path: url_path.to_string(),
        }
    }

    pub fn set_port(&mut self, port: u16) {
        self.port = port;
    }

    #[inline]
    pub fn host(&self) -> &str {
        &self.host
    }

    #[inline]
    pub fn port(&self) -> u16 {
        self.port
    }

    #[inline]
    pub fn url_path(&self) -> &str {
        &self.url_path
    }
}

impl fmt::Display for FtpTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.port == FTP_DEFAULT_PORT {
            write!(f, "ftp://{}/{}", self.host, self.url_path)
        } else {
            write!(f, "ftp://{}:{}/{}", self.host, self.port, self.url_path)
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct FtpCredentials {
    user: String,
    password: String,
}

impl FtpCredentials {
    pub fn new(user: &str, password: &str) -> Self {
        FtpCredentials {
            user: user.to_string(),
            password: password.to_string(),
        }
    }

    #[inline]
    pub fn user(&self) -> &str {
        &self.user
    }

    #[inline]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for FtpCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FtpCredentials")
            .field("user", &self.user)
            .field("password", &"******")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_target() {
        let mut target = FtpTarget::new("ftp.example.net", "pub/file.txt");
        assert_eq!(target.to_string(), "ftp://ftp.example.net/pub/file.txt");
        target.set_port(2121);
        assert_eq!(target.to_string(), "ftp://ftp.example.net:2121/pub/file.txt");
    }

    #[test]
    fn debug_credentials() {
        let credentials = FtpCredentials::new("alice", "secret");
        let s = format!("{credentials:?}");
        assert!(s.contains("alice"));
        assert!(!s.contains("secret"));
    }
}
