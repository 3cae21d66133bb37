/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

use super::{
    FtpCommandError, FtpConnectError, FtpPassiveReplyError, FtpRawResponseError, FtpTransferError,
};
use crate::control::FtpCommand;
use crate::session::FtpSessionState;

/// Every variant is terminal for the session that returned it.
#[derive(Debug, Error)]
pub enum FtpSessionError<E: std::error::Error> {
    #[error("connect error: {0}")]
    Connect(FtpConnectError<E>),
    #[error("malformed reply: {0}")]
    MalformedReply(FtpRawResponseError),
    #[error("unexpected reply code {actual} to {command} in state {state}, expecting {expected}")]
    UnexpectedReplyCode {
        state: FtpSessionState,
        command: FtpCommand,
        expected: u16,
        actual: u16,
    },
    #[error("service not available (421) when waiting reply to {command} in state {state}")]
    ServiceNotAvailable {
        state: FtpSessionState,
        command: FtpCommand,
    },
    #[error("malformed passive reply: {0}")]
    MalformedPassiveReply(FtpPassiveReplyError),
    #[error("transfer io error: {0}")]
    TransferIo(FtpTransferError),
    #[error("sink error: {0:?}")]
    Sink(io::Error),
    #[error("operation '{operation}' is not allowed in state {state}")]
    InvalidState {
        state: FtpSessionState,
        operation: &'static str,
    },
}

impl<E: std::error::Error> FtpSessionError<E> {
    pub(crate) fn from_command(state: FtpSessionState, e: FtpCommandError) -> Self {
        match e {
            FtpCommandError::SendFailed(e) => {
                FtpSessionError::TransferIo(FtpTransferError::ControlWriteFailed(e))
            }
            FtpCommandError::RecvFailed(e) => e.into(),
            FtpCommandError::ServiceNotAvailable(command) => {
                FtpSessionError::ServiceNotAvailable { state, command }
            }
            FtpCommandError::UnexpectedReplyCode(command, expected, actual) => {
                FtpSessionError::UnexpectedReplyCode {
                    state,
                    command,
                    expected,
                    actual,
                }
            }
            FtpCommandError::InvalidPassiveReply(_, e) => FtpSessionError::MalformedPassiveReply(e),
        }
    }

    /// The server replied 421 and is closing the control connection.
    pub fn is_service_not_available(&self) -> bool {
        matches!(self, FtpSessionError::ServiceNotAvailable { .. })
    }

    /// The server refused the credentials sent by USER / PASS.
    pub fn is_authentication_failure(&self) -> bool {
        match self {
            FtpSessionError::UnexpectedReplyCode { command, .. } => {
                *command == FtpCommand::USER || *command == FtpCommand::PASS
            }
            _ => false,
        }
    }
}

impl<E: std::error::Error> From<FtpConnectError<E>> for FtpSessionError<E> {
    fn from(e: FtpConnectError<E>) -> Self {
        FtpSessionError::Connect(e)
    }
}

impl<E: std::error::Error> From<FtpRawResponseError> for FtpSessionError<E> {
    fn from(e: FtpRawResponseError) -> Self {
        match e {
            FtpRawResponseError::ReadFailed(e) => {
                FtpSessionError::TransferIo(FtpTransferError::ControlReadFailed(e))
            }
            FtpRawResponseError::ReadResponseTimedOut(stage) => {
                FtpSessionError::TransferIo(FtpTransferError::ControlReadTimedOut(stage))
            }
            _ => FtpSessionError::MalformedReply(e),
        }
    }
}

impl<E: std::error::Error> From<FtpTransferError> for FtpSessionError<E> {
    fn from(e: FtpTransferError) -> Self {
        match e {
            FtpTransferError::SinkWriteFailed(e) => FtpSessionError::Sink(e),
            _ => FtpSessionError::TransferIo(e),
        }
    }
}
