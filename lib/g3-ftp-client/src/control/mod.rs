/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;
use std::net::SocketAddrV4;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufStream};

use crate::FtpControlConfig;
use crate::error::{FtpCommandError, FtpRawResponseError};

mod command;
pub use command::FtpCommand;

mod parser;
pub use parser::{FtpReplyParseState, FtpReplyParser};

mod response;
pub use response::FtpReply;

pub(crate) struct FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite,
{
    config: FtpControlConfig,
    stream: BufStream<T>,
}

impl<T> FtpControlChannel<T>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    pub(crate) fn new(stream: T, config: FtpControlConfig) -> Self {
        FtpControlChannel {
            config,
            stream: BufStream::new(stream),
        }
    }

    pub(crate) async fn read_reply(&mut self) -> Result<FtpReply, FtpRawResponseError> {
        let mut parser =
            FtpReplyParser::new(self.config.max_reply_len, self.config.max_multi_lines);
        loop {
            let buf = self
                .stream
                .fill_buf()
                .await
                .map_err(FtpRawResponseError::ReadFailed)?;
            if buf.is_empty() {
                return Err(FtpRawResponseError::ConnectionClosed);
            }
            let nr = parser.feed(buf)?;
            self.stream.consume(nr);
            if parser.finished() {
                break;
            }
        }

        match parser.into_reply() {
            Some(reply) => {
                crate::debug::log_rsp(&reply);
                Ok(reply)
            }
            None => Err(FtpRawResponseError::ConnectionClosed),
        }
    }

    pub(crate) async fn timed_read_reply(
        &mut self,
        stage: &'static str,
    ) -> Result<FtpReply, FtpRawResponseError> {
        match tokio::time::timeout(self.config.command_timeout, self.read_reply()).await {
            Ok(r) => r,
            Err(_) => Err(FtpRawResponseError::ReadResponseTimedOut(stage)),
        }
    }

    pub(crate) async fn wait_greetings(&mut self) -> Result<(), FtpCommandError> {
        loop {
            let reply = self.read_reply().await?;
            return match reply.code() {
                120 => continue,
                220 => Ok(()),
                421 => Err(FtpCommandError::ServiceNotAvailable(FtpCommand::GREETING)),
                n => Err(FtpCommandError::UnexpectedReplyCode(
                    FtpCommand::GREETING,
                    220,
                    n,
                )),
            };
        }
    }

    pub(crate) async fn send_username(&mut self, name: &str) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::USER;
        self.send_cmd1(cmd, name)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("send username").await?;
        match reply.code() {
            331 => Ok(()),
            421 => Err(FtpCommandError::ServiceNotAvailable(cmd)),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, 331, n)),
        }
    }

    pub(crate) async fn send_password(&mut self, pass: &str) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::PASS;
        self.send_cmd1(cmd, pass)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("send password").await?;
        match reply.code() {
            230 => Ok(()),
            421 => Err(FtpCommandError::ServiceNotAvailable(cmd)),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, 230, n)),
        }
    }

    pub(crate) async fn request_pasv_addr(&mut self) -> Result<SocketAddrV4, FtpCommandError> {
        let cmd = FtpCommand::PASV;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("request pasv addr").await?;
        match reply.code() {
            227 => crate::passive::decode_pasv_reply(reply.text())
                .map_err(|e| FtpCommandError::InvalidPassiveReply(cmd, e)),
            421 => Err(FtpCommandError::ServiceNotAvailable(cmd)),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, 227, n)),
        }
    }

    pub(crate) async fn start_retrieve(&mut self, path: &str) -> Result<u16, FtpCommandError> {
        let cmd = FtpCommand::RETR;
        self.send_cmd1(cmd, path)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("start retrieve").await?;
        match reply.code() {
            125 | 150 => Ok(reply.code()),
            421 => Err(FtpCommandError::ServiceNotAvailable(cmd)),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, 150, n)),
        }
    }

    /// Wait for the reply sent after the data connection has been closed.
    pub(crate) async fn wait_retrieve(&mut self) -> Result<u16, FtpCommandError> {
        let reply = self.read_reply().await?;
        match reply.code() {
            226 | 250 => Ok(reply.code()),
            421 => Err(FtpCommandError::ServiceNotAvailable(FtpCommand::RETR)),
            n => Err(FtpCommandError::UnexpectedReplyCode(
                FtpCommand::RETR,
                226,
                n,
            )),
        }
    }

    pub(crate) async fn send_quit(&mut self) -> Result<(), FtpCommandError> {
        let cmd = FtpCommand::QUIT;
        self.send_cmd(cmd)
            .await
            .map_err(FtpCommandError::SendFailed)?;

        let reply = self.timed_read_reply("send quit").await?;
        match reply.code() {
            221 => Ok(()),
            n => Err(FtpCommandError::UnexpectedReplyCode(cmd, 221, n)),
        }
    }

    pub(crate) async fn shutdown(&mut self) -> io::Result<()> {
        self.stream.shutdown().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    fn channel(stream: tokio_test::io::Mock) -> FtpControlChannel<tokio_test::io::Mock> {
        FtpControlChannel::new(stream, FtpControlConfig::default())
    }

    #[tokio::test]
    async fn read_split_reply() {
        let stream = tokio_test::io::Builder::new()
            .read(b"220-Welcome to")
            .read(b" the server\r\n22")
            .read(b"0 Ready\r\n")
            .build();
        let mut control = channel(stream);
        let reply = control.read_reply().await.unwrap();
        assert_eq!(reply.code(), 220);
        assert!(reply.is_multiline());
        assert_eq!(reply.text(), b"Welcome to the server\r\n220 Ready");
    }

    #[tokio::test]
    async fn read_two_replies_in_one_read() {
        let stream = tokio_test::io::Builder::new()
            .read(b"120 Wait a moment\r\n220 Ready\r\n")
            .build();
        let mut control = channel(stream);
        let reply = control.read_reply().await.unwrap();
        assert_eq!(reply.code(), 120);
        let reply = control.read_reply().await.unwrap();
        assert_eq!(reply.code(), 220);
        assert_eq!(reply.text(), b"Ready");
    }

    #[tokio::test]
    async fn read_closed() {
        let stream = tokio_test::io::Builder::new().read(b"220-Welcome\r\n").build();
        let mut control = channel(stream);
        let e = control.read_reply().await.unwrap_err();
        assert!(matches!(e, FtpRawResponseError::ConnectionClosed));
    }

    #[tokio::test]
    async fn read_malformed() {
        let stream = tokio_test::io::Builder::new().read(b"22 Ready\r\n").build();
        let mut control = channel(stream);
        let e = control.read_reply().await.unwrap_err();
        assert!(matches!(e, FtpRawResponseError::MalformedReply(_)));
    }

    #[tokio::test]
    async fn greetings_after_delay() {
        let stream = tokio_test::io::Builder::new()
            .read(b"120 Service ready in 1 minute\r\n")
            .read(b"220 Ready\r\n")
            .build();
        let mut control = channel(stream);
        control.wait_greetings().await.unwrap();
    }

    #[tokio::test]
    async fn greetings_not_available() {
        let stream = tokio_test::io::Builder::new()
            .read(b"421 Too many users\r\n")
            .build();
        let mut control = channel(stream);
        let e = control.wait_greetings().await.unwrap_err();
        assert!(matches!(
            e,
            FtpCommandError::ServiceNotAvailable(FtpCommand::GREETING)
        ));
    }

    #[tokio::test]
    async fn pasv() {
        let stream = tokio_test::io::Builder::new()
            .write(b"PASV\r\n")
            .read(b"227 Entering Passive Mode (192,168,1,1,200,10).\r\n")
            .build();
        let mut control = channel(stream);
        let addr = control.request_pasv_addr().await.unwrap();
        assert_eq!(addr, SocketAddrV4::new(Ipv4Addr::new(192, 168, 1, 1), 51210));
    }

    #[tokio::test]
    async fn pasv_invalid() {
        let stream = tokio_test::io::Builder::new()
            .write(b"PASV\r\n")
            .read(b"227 Entering Passive Mode\r\n")
            .build();
        let mut control = channel(stream);
        let e = control.request_pasv_addr().await.unwrap_err();
        assert!(matches!(
            e,
            FtpCommandError::InvalidPassiveReply(FtpCommand::PASV, _)
        ));
    }

    #[tokio::test]
    async fn retrieve_unavailable() {
        let stream = tokio_test::io::Builder::new()
            .write(b"RETR /missing.txt\r\n")
            .read(b"550 Failed to open file.\r\n")
            .build();
        let mut control = channel(stream);
        let e = control.start_retrieve("/missing.txt").await.unwrap_err();
        assert!(matches!(
            e,
            FtpCommandError::UnexpectedReplyCode(FtpCommand::RETR, 150, 550)
        ));
    }
}
