/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use std::borrow::Cow;

/// A complete FTP reply.
///
/// The text is everything after the `<code> ` or `<code>-` prefix of the
/// first line, without the line ending of the last line. For multi-line
/// replies the inner line endings and the code prefix of the last line
/// are kept as received.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FtpReply {
    code: u16,
    text: Vec<u8>,
    multiline: bool,
}

impl FtpReply {
    pub(crate) fn new(code: u16, text: Vec<u8>, multiline: bool) -> Self {
        FtpReply {
            code,
            text,
            multiline,
        }
    }

    #[inline]
    pub fn code(&self) -> u16 {
        self.code
    }

    #[inline]
    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.text)
    }

    #[inline]
    pub fn is_multiline(&self) -> bool {
        self.multiline
    }

    /// Iterate over the lines of the reply text, without line endings.
    pub fn lines(&self) -> impl Iterator<Item = &[u8]> {
        self.text
            .split(|c| *c == b'\n')
            .map(|line| line.strip_suffix(b"\r").unwrap_or(line))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lines() {
        let reply = FtpReply::new(211, b"Features:\r\n UTF8\n211 End".to_vec(), true);
        let lines: Vec<&[u8]> = reply.lines().collect();
        assert_eq!(lines, vec![&b"Features:"[..], &b" UTF8"[..], &b"211 End"[..]]);
        assert_eq!(reply.text_lossy(), "Features:\r\n UTF8\n211 End");
    }

    #[test]
    fn single_line() {
        let reply = FtpReply::new(220, b"ready".to_vec(), false);
        assert_eq!(reply.lines().count(), 1);
        assert!(!reply.is_multiline());
    }
}
