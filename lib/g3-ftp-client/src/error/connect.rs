/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FtpConnectError<E: std::error::Error> {
    #[error("resolve failed: {0}")]
    ResolveFailed(E),
    #[error("control connect failed: {0}")]
    ControlConnectFailed(E),
    #[error("data connect failed: {0}")]
    DataConnectFailed(E),
    #[error("timed out to connect")]
    ConnectTimedOut,
    #[error("timed out to receive greetings")]
    GreetingTimedOut,
}
