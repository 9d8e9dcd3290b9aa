use bytes::{Buf, BufMut, Bytes, BytesMut};
use tracing::{debug, trace};

use crate::codec::{checksum_step, ESC, ESC_ESC, ESC_SEP, HDR, MAX_PAYLOAD, SEP, TRL};
use crate::error::FrameError;

/// Where the decoder is inside the current frame candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Dropping bytes until the SEP HDR pattern is seen.
    Scanning { last_was_sep: bool },
    /// The next byte is the unescaped payload length.
    Length,
    /// Collecting payload bytes until the declared count is unescaped.
    Payload { escaped: bool },
    /// Expecting the trailer SEP.
    TrailerSep,
    /// Expecting the trailer TRL tag.
    TrailerTag,
    /// Collecting the four big-endian checksum bytes.
    Checksum { wire: u32, seen: u8 },
}

/// Incremental frame decoder.
///
/// Fed one byte ([`push`](Self::push)) or one buffer
/// ([`decode`](Self::decode)) at a time, so the caller decides how to block,
/// time out, or cancel. One decoder consumes one byte stream; a frame in
/// progress is never interleaved with bytes of another.
///
/// Corrupt candidates (bad trailer, bad checksum) are counted in
/// [`frames_rejected`](Self::frames_rejected) and scanning resumes at the
/// next byte. They are not surfaced as errors: the stream is expected to
/// carry line noise, and the decode loop must ride across it.
#[derive(Debug)]
pub struct FrameDecoder {
    state: State,
    want: usize,
    payload: BytesMut,
    crc: u32,
    frames_decoded: u64,
    frames_rejected: u64,
}

impl FrameDecoder {
    pub fn new() -> Self {
        Self {
            state: State::Scanning {
                last_was_sep: false,
            },
            want: 0,
            payload: BytesMut::with_capacity(MAX_PAYLOAD),
            crc: 0,
            frames_decoded: 0,
            frames_rejected: 0,
        }
    }

    /// Feed one byte; returns the payload when this byte completes a valid
    /// frame.
    pub fn push(&mut self, byte: u8) -> Option<Bytes> {
        match self.state {
            State::Scanning { last_was_sep } => {
                if last_was_sep && byte == HDR {
                    self.state = State::Length;
                } else {
                    self.state = State::Scanning {
                        last_was_sep: byte == SEP,
                    };
                }
                None
            }
            State::Length => {
                self.want = byte as usize;
                self.payload.clear();
                self.crc = 0;
                self.state = if self.want == 0 {
                    State::TrailerSep
                } else {
                    State::Payload { escaped: false }
                };
                None
            }
            State::Payload { escaped } => {
                let unescaped = if escaped {
                    match byte {
                        ESC_SEP => SEP,
                        ESC_ESC => ESC,
                        // Unknown escape codes pass their second byte through.
                        other => other,
                    }
                } else if byte == ESC {
                    self.state = State::Payload { escaped: true };
                    return None;
                } else {
                    byte
                };

                self.crc = checksum_step(self.crc, unescaped);
                self.payload.put_u8(unescaped);
                self.state = if self.payload.len() == self.want {
                    State::TrailerSep
                } else {
                    State::Payload { escaped: false }
                };
                None
            }
            State::TrailerSep => {
                if byte == SEP {
                    self.state = State::TrailerTag;
                } else {
                    self.reject(FrameError::TrailerMismatch);
                }
                None
            }
            State::TrailerTag => {
                if byte == TRL {
                    self.state = State::Checksum { wire: 0, seen: 0 };
                } else {
                    self.reject(FrameError::TrailerMismatch);
                }
                None
            }
            State::Checksum { wire, seen } => {
                let wire = (wire << 8) | u32::from(byte);
                let seen = seen + 1;
                if seen < 4 {
                    self.state = State::Checksum { wire, seen };
                    return None;
                }

                if wire == self.crc {
                    self.frames_decoded += 1;
                    self.state = State::Scanning {
                        last_was_sep: false,
                    };
                    trace!(len = self.payload.len(), "frame decoded");
                    Some(self.payload.split().freeze())
                } else {
                    self.reject(FrameError::ChecksumMismatch {
                        got: wire,
                        computed: self.crc,
                    });
                    None
                }
            }
        }
    }

    /// Drain bytes from `src` until a frame completes or `src` is exhausted.
    ///
    /// On success the remaining bytes stay in `src` for the next call.
    pub fn decode(&mut self, src: &mut BytesMut) -> Option<Bytes> {
        while !src.is_empty() {
            let byte = src.get_u8();
            if let Some(payload) = self.push(byte) {
                return Some(payload);
            }
        }
        None
    }

    /// Frames successfully decoded over this decoder's lifetime.
    pub fn frames_decoded(&self) -> u64 {
        self.frames_decoded
    }

    /// Corrupt frame candidates rejected (bad trailer or checksum).
    pub fn frames_rejected(&self) -> u64 {
        self.frames_rejected
    }

    /// True when the decoder is between frames, scanning for a header.
    pub fn is_scanning(&self) -> bool {
        matches!(self.state, State::Scanning { .. })
    }

    fn reject(&mut self, err: FrameError) {
        self.frames_rejected += 1;
        debug!(error = %err, "rejected frame candidate, rescanning");
        self.state = State::Scanning {
            last_was_sep: false,
        };
    }
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}
