/*
 * SPDX-License-Identifier: Apache-2.0
 * Copyright 2023-2025 ByteDance and/or its affiliates.
 */

use super::FtpReply;
use crate::error::FtpReplyParseError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FtpReplyParseState {
    /// waiting for the 3 digits code and the following ' ' or '-'
    AwaitCode,
    /// skipping to the end of the last line
    AwaitLineEnd,
    /// scanning multi-line body for the "<code> " terminator line
    AwaitMatchingCode,
    Done,
}

/// Incremental parser for one FTP reply.
///
/// The parser may be fed with chunks of any size, and it will never consume
/// bytes after the end of the current reply, so the caller can keep the
/// remaining data in its read buffer for the next reply.
pub struct FtpReplyParser {
    state: FtpReplyParseState,
    code: [u8; 3],
    code_len: usize,
    multiline: bool,
    line_pos: usize,
    line_matched: bool,
    line_count: usize,
    text: Vec<u8>,
    max_text_len: usize,
    max_lines: usize,
}

impl FtpReplyParser {
    pub fn new(max_text_len: usize, max_lines: usize) -> Self {
        FtpReplyParser {
            state: FtpReplyParseState::AwaitCode,
            code: [0u8; 3],
            code_len: 0,
            multiline: false,
            line_pos: 0,
            line_matched: false,
            line_count: 1,
            text: Vec::new(),
            max_text_len,
            max_lines,
        }
    }

    #[inline]
    pub fn state(&self) -> FtpReplyParseState {
        self.state
    }

    #[inline]
    pub fn finished(&self) -> bool {
        self.state == FtpReplyParseState::Done
    }

    /// Feed data to the parser, and return how many bytes have been consumed.
    pub fn feed(&mut self, data: &[u8]) -> Result<usize, FtpReplyParseError> {
        let mut offset = 0;
        while offset < data.len() {
            match self.state {
                FtpReplyParseState::AwaitCode => {
                    self.feed_code_byte(data[offset])?;
                    offset += 1;
                }
                FtpReplyParseState::AwaitLineEnd => {
                    let left = &data[offset..];
                    match memchr::memchr(b'\n', left) {
                        Some(p) => {
                            self.capture(&left[..p])?;
                            if self.text.last() == Some(&b'\r') {
                                self.text.pop();
                            }
                            self.state = FtpReplyParseState::Done;
                            return Ok(offset + p + 1);
                        }
                        None => {
                            self.capture(left)?;
                            offset = data.len();
                        }
                    }
                }
                FtpReplyParseState::AwaitMatchingCode => {
                    self.feed_body_byte(data[offset])?;
                    offset += 1;
                }
                FtpReplyParseState::Done => break,
            }
        }
        Ok(offset)
    }

    fn feed_code_byte(&mut self, b: u8) -> Result<(), FtpReplyParseError> {
        match b {
            b'0'..=b'9' => {
                if self.code_len >= 3 {
                    return Err(FtpReplyParseError::CodeTooLong);
                }
                self.code[self.code_len] = b;
                self.code_len += 1;
                Ok(())
            }
            b' ' | b'-' => {
                if self.code_len != 3 {
                    return Err(FtpReplyParseError::IncompleteCode(self.code_len));
                }
                self.check_code()?;
                if b == b' ' {
                    self.state = FtpReplyParseState::AwaitLineEnd;
                } else {
                    self.multiline = true;
                    // the rest of the first line is never a terminator
                    self.line_pos = 4;
                    self.line_matched = false;
                    self.state = FtpReplyParseState::AwaitMatchingCode;
                }
                Ok(())
            }
            _ => Err(FtpReplyParseError::InvalidCodeByte(b)),
        }
    }

    fn check_code(&self) -> Result<(), FtpReplyParseError> {
        // RFC 959: first digit 1-5, second digit 0-5
        if !(b'1'..=b'5').contains(&self.code[0]) || !(b'0'..=b'5').contains(&self.code[1]) {
            return Err(FtpReplyParseError::InvalidReplyCode(self.code_u16()));
        }
        Ok(())
    }

    fn feed_body_byte(&mut self, b: u8) -> Result<(), FtpReplyParseError> {
        self.capture(&[b])?;

        if b == b'\n' {
            self.line_count += 1;
            if self.line_count > self.max_lines {
                return Err(FtpReplyParseError::TooManyLines);
            }
            self.line_pos = 0;
            self.line_matched = true;
            return Ok(());
        }

        match self.line_pos {
            0..=2 => {
                if b != self.code[self.line_pos] {
                    self.line_matched = false;
                }
            }
            3 => {
                if self.line_matched && b == b' ' {
                    self.state = FtpReplyParseState::AwaitLineEnd;
                }
            }
            _ => {}
        }
        if self.line_pos < 4 {
            self.line_pos += 1;
        }
        Ok(())
    }

    fn capture(&mut self, data: &[u8]) -> Result<(), FtpReplyParseError> {
        if self.text.len() + data.len() > self.max_text_len {
            return Err(FtpReplyParseError::ReplyTooLong);
        }
        self.text.extend_from_slice(data);
        Ok(())
    }

    fn code_u16(&self) -> u16 {
        self.code[..self.code_len]
            .iter()
            .fold(0u16, |acc, c| acc * 10 + (c - b'0') as u16)
    }

    /// Get the reply, only available after the parser has finished.
    pub fn into_reply(self) -> Option<FtpReply> {
        if self.finished() {
            Some(FtpReply::new(self.code_u16(), self.text, self.multiline))
        } else {
            None
        }
    }
}
