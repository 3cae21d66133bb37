/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FtpPassiveReplyError {
    #[error("no (h1,h2,h3,h4,p1,p2) address found")]
    NoAddressFound,
    #[error("zero data port")]
    ZeroPort,
}
