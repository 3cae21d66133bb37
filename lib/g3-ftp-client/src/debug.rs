/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use log::Level;

use crate::control::{FtpCommand, FtpReply};

pub const FTP_DEBUG_LOG_LEVEL: Level = Level::Debug;
pub const FTP_DEBUG_LOG_TARGET: &str = "ftp";

pub(crate) fn log_cmd(cmd: FtpCommand, param: Option<&str>) {
    if !log::log_enabled!(target: FTP_DEBUG_LOG_TARGET, FTP_DEBUG_LOG_LEVEL) {
        return;
    }

    match param {
        Some(_) if cmd == FtpCommand::PASS => {
            log::log!(target: FTP_DEBUG_LOG_TARGET, FTP_DEBUG_LOG_LEVEL, "> {cmd} ******")
        }
        Some(p) => log::log!(target: FTP_DEBUG_LOG_TARGET, FTP_DEBUG_LOG_LEVEL, "> {cmd} {p}"),
        None => log::log!(target: FTP_DEBUG_LOG_TARGET, FTP_DEBUG_LOG_LEVEL, "> {cmd}"),
    }
}

pub(crate) fn log_rsp(reply: &FtpReply) {
    if !log::log_enabled!(target: FTP_DEBUG_LOG_TARGET, FTP_DEBUG_LOG_LEVEL) {
        return;
    }

    let code = reply.code();
    let delimiter = if reply.is_multiline() { '-' } else { ' ' };
    for (i, line) in reply.lines().enumerate() {
        let line = String::from_utf8_lossy(line);
        if i == 0 {
            log::log!(
                target: FTP_DEBUG_LOG_TARGET,
                FTP_DEBUG_LOG_LEVEL,
                "< {code}{delimiter}{line}"
            );
        } else {
            log::log!(target: FTP_DEBUG_LOG_TARGET, FTP_DEBUG_LOG_LEVEL, "< {line}");
        }
    }
}
