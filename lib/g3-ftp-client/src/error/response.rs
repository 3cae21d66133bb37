/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FtpReplyParseError {
    #[error("reply code has only {0} digits")]
    IncompleteCode(usize),
    #[error("reply code has more than 3 digits")]
    CodeTooLong,
    #[error("unexpected byte 0x{0:02x} in reply code")]
    InvalidCodeByte(u8),
    #[error("invalid reply code {0}")]
    InvalidReplyCode(u16),
    #[error("reply too long")]
    ReplyTooLong,
    #[error("too many lines")]
    TooManyLines,
}

#[derive(Debug, Error)]
pub enum FtpRawResponseError {
    #[error("read failed: {0:?}")]
    ReadFailed(io::Error),
    #[error("connection closed")]
    ConnectionClosed,
    #[error("malformed reply: {0}")]
    MalformedReply(#[from] FtpReplyParseError),
    #[error("read response for stage '{0}' timed out")]
    ReadResponseTimedOut(&'static str),
}
