/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use super::{FtpPassiveReplyError, FtpRawResponseError};
use crate::control::FtpCommand;

#[derive(Debug, Error)]
pub enum FtpCommandError {
    #[error("unable to send command: {0:?}")]
    SendFailed(io::Error),
    #[error("unable to recv reply: {0}")]
    RecvFailed(#[from] FtpRawResponseError),
    #[error("service not available")]
    ServiceNotAvailable(FtpCommand),
    #[error("unexpected reply code ({0} -> {2}, expecting {1})")]
    UnexpectedReplyCode(FtpCommand, u16, u16),
    #[error("invalid reply to command {0}: {1}")]
    InvalidPassiveReply(FtpCommand, FtpPassiveReplyError),
}
