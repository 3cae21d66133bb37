/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod config;
pub use config::{FtpClientConfig, FtpControlConfig, FtpPassiveAddressPolicy, FtpTransferConfig};

mod connection;
pub use connection::FtpConnectionProvider;

mod control;
pub use control::{FtpCommand, FtpReply, FtpReplyParseState, FtpReplyParser};

mod debug;
pub use debug::{FTP_DEBUG_LOG_LEVEL, FTP_DEBUG_LOG_TARGET};

mod error;
pub use error::{
    FtpCommandError, FtpConnectError, FtpPassiveReplyError, FtpRawResponseError,
    FtpReplyParseError, FtpSessionError, FtpTransferError,
};

mod passive;
pub use passive::decode_pasv_reply;

mod session;
pub use session::{FtpRetrieveSummary, FtpSession, FtpSessionState, fetch_file};

mod target;
pub use target::{FTP_DEFAULT_PORT, FtpCredentials, FtpTarget};

mod transfer;
