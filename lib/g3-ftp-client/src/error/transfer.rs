/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::io;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtpTransferError {
    #[error("control write failed: {0:?}")]
    ControlWriteFailed(io::Error),
    #[error("control read failed: {0:?}")]
    ControlReadFailed(io::Error),
    #[error("control read for stage '{0}' timed out")]
    ControlReadTimedOut(&'static str),
    #[error("data read failed: {0:?}")]
    DataReadFailed(io::Error),
    #[error("data read timed out")]
    DataReadTimedOut,
    #[error("sink write failed: {0:?}")]
    SinkWriteFailed(io::Error),
}
