/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

mod command;
mod connect;
mod passive;
mod response;
mod session;
mod transfer;

pub use command::FtpCommandError;
pub use connect::FtpConnectError;
pub use passive::FtpPassiveReplyError;
pub use response::{FtpRawResponseError, FtpReplyParseError};
pub use session::FtpSessionError;
pub use transfer::FtpTransferError;
