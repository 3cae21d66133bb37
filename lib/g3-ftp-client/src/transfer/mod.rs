/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::config::FtpTransferConfig;
use crate::error::FtpTransferError;

/// Raw data transfer over a passive data connection.
///
/// RETR has no length framing, the peer closing the data connection is the
/// only end of transfer signal.
pub(crate) struct FtpDataTransfer<T: AsyncRead> {
    io: T,
    buf: Vec<u8>,
    idle_timeout: Duration,
}

impl<T> FtpDataTransfer<T>
where
    T: AsyncRead + Unpin,
{
    pub(crate) fn new(io: T, config: &FtpTransferConfig) -> Self {
        FtpDataTransfer {
            io,
            buf: vec![0u8; config.buffer_size.max(1)],
            idle_timeout: config.data_idle_timeout,
        }
    }

    pub(crate) async fn receive_to_end<W>(mut self, sink: &mut W) -> Result<u64, FtpTransferError>
    where
        W: AsyncWrite + Unpin,
    {
        let mut total: u64 = 0;
        loop {
            let nr = match tokio::time::timeout(self.idle_timeout, self.io.read(&mut self.buf)).await
            {
                Ok(Ok(nr)) => nr,
                Ok(Err(e)) => return Err(FtpTransferError::DataReadFailed(e)),
                Err(_) => return Err(FtpTransferError::DataReadTimedOut),
            };
            if nr == 0 {
                break;
            }

            sink.write_all(&self.buf[..nr])
                .await
                .map_err(FtpTransferError::SinkWriteFailed)?;
            total += nr as u64;
        }

        sink.flush()
            .await
            .map_err(FtpTransferError::SinkWriteFailed)?;
        sink.shutdown()
            .await
            .map_err(FtpTransferError::SinkWriteFailed)?;
        Ok(total)
    }
}
