//! Character set handling for both directions of the bridge.
//!
//! A [`Charset`] is fixed when the bridge is built. Submitted lines are
//! encoded with it on the way into the program, and program output is decoded
//! with a [`StreamDecoder`] created from it on the way back to the widget.
//!
//! The decoder is a streaming one: a multi-byte character whose bytes arrive
//! in two separate flushes is held inside the decoder until it is complete, so
//! it still comes out as one character.
//!
//! # Example
//!
//! ```
//! use widget_console::Charset;
//!
//! let sjis = Charset::for_label("shift_jis").unwrap();
//! assert_eq!(sjis.name(), "Shift_JIS");
//! assert_eq!(sjis.encode("abc"), b"abc".to_vec());
//! ```

use crate::config::DecodePolicy;
use crate::error::{BridgeError, Result};
use encoding_rs::{CoderResult, DecoderResult, EncoderResult, Encoding};
use tracing::warn;

/// Scratch size for the encoder loop.
const ENCODE_CHUNK: usize = 1024;

/// An immutable character set used for encoding input and decoding output.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Charset {
    encoding: &'static Encoding,
}

impl Charset {
    /// Resolve a WHATWG encoding label such as `"utf-8"`, `"latin1"` or
    /// `"shift_jis"`.
    ///
    /// # Errors
    ///
    /// Returns [`BridgeError::UnsupportedCharset`] when the label is unknown,
    /// or when it names an encoding that can only be decoded (UTF-16 and the
    /// `replacement` encoding), since submitted lines must be encoded with
    /// the same charset the output is decoded with.
    pub fn for_label(label: &str) -> Result<Self> {
        let encoding = Encoding::for_label(label.trim().as_bytes())
            .ok_or_else(|| BridgeError::UnsupportedCharset(label.to_string()))?;
        if encoding.output_encoding() != encoding {
            return Err(BridgeError::UnsupportedCharset(format!(
                "{label} ({} cannot be used for encoding)",
                encoding.name()
            )));
        }
        Ok(Self { encoding })
    }

    /// The canonical name of the encoding.
    pub fn name(&self) -> &'static str {
        self.encoding.name()
    }

    /// Encode text for the program's input.
    ///
    /// Characters the charset cannot represent are written as `?`.
    pub fn encode(&self, text: &str) -> Vec<u8> {
        if self.encoding == encoding_rs::UTF_8 {
            return text.as_bytes().to_vec();
        }

        let mut encoder = self.encoding.new_encoder();
        let mut out = Vec::with_capacity(text.len());
        let mut chunk = [0u8; ENCODE_CHUNK];
        let mut src = text;
        loop {
            let (result, read, written) =
                encoder.encode_from_utf8_without_replacement(src, &mut chunk, true);
            out.extend_from_slice(&chunk[..written]);
            src = &src[read..];
            match result {
                EncoderResult::InputEmpty => break,
                EncoderResult::OutputFull => {}
                EncoderResult::Unmappable(_) => out.push(b'?'),
            }
        }
        out
    }

    /// Create a streaming decoder for program output.
    ///
    /// Byte order marks are not interpreted: every byte the program writes is
    /// decoded with this charset.
    pub fn new_decoder(&self, policy: DecodePolicy) -> StreamDecoder {
        StreamDecoder {
            charset: *self,
            decoder: self.encoding.new_decoder_without_bom_handling(),
            policy,
        }
    }
}

impl Default for Charset {
    fn default() -> Self {
        Self {
            encoding: encoding_rs::UTF_8,
        }
    }
}

/// Incremental decoder that keeps incomplete trailing sequences between calls.
pub struct StreamDecoder {
    charset: Charset,
    decoder: encoding_rs::Decoder,
    policy: DecodePolicy,
}

impl StreamDecoder {
    /// Decode the next chunk of program output.
    ///
    /// Bytes that end in the middle of a character are retained and completed
    /// by the next call.
    ///
    /// # Errors
    ///
    /// With [`DecodePolicy::Strict`], a malformed sequence fails with
    /// [`BridgeError::Decode`]. With [`DecodePolicy::Replace`] it becomes
    /// U+FFFD and decoding continues.
    pub fn decode(&mut self, bytes: &[u8]) -> Result<String> {
        self.decode_chunk(bytes, false)
    }

    /// End the stream: bytes of an unfinished character still held by the
    /// decoder are reported according to the policy. The decoder starts over
    /// afterwards.
    ///
    /// # Errors
    ///
    /// With [`DecodePolicy::Strict`], a held partial sequence fails with
    /// [`BridgeError::Decode`].
    pub fn finish(&mut self) -> Result<String> {
        let tail = self.decode_chunk(&[], true);
        self.decoder = self.charset.encoding.new_decoder_without_bom_handling();
        tail
    }

    fn decode_chunk(&mut self, bytes: &[u8], last: bool) -> Result<String> {
        match self.policy {
            DecodePolicy::Replace => Ok(self.decode_replacing(bytes, last)),
            DecodePolicy::Strict => self.decode_strict(bytes, last),
        }
    }

    fn decode_replacing(&mut self, bytes: &[u8], last: bool) -> String {
        let mut text = String::new();
        let mut src = bytes;
        let mut replaced = false;
        loop {
            text.reserve(
                self.decoder
                    .max_utf8_buffer_length(src.len())
                    .unwrap_or(src.len() * 3 + 4),
            );
            let (result, read, had_replacements) =
                self.decoder.decode_to_string(src, &mut text, last);
            replaced |= had_replacements;
            src = &src[read..];
            if let CoderResult::InputEmpty = result {
                break;
            }
        }
        if replaced {
            warn!(
                charset = self.charset.name(),
                "replaced malformed bytes in program output"
            );
        }
        text
    }

    fn decode_strict(&mut self, bytes: &[u8], last: bool) -> Result<String> {
        let mut text = String::new();
        let mut src = bytes;
        loop {
            text.reserve(
                self.decoder
                    .max_utf8_buffer_length_without_replacement(src.len())
                    .unwrap_or(src.len() * 3 + 4),
            );
            let (result, read) =
                self.decoder
                    .decode_to_string_without_replacement(src, &mut text, last);
            src = &src[read..];
            match result {
                DecoderResult::InputEmpty => return Ok(text),
                DecoderResult::OutputFull => {}
                DecoderResult::Malformed(_, _) => {
                    return Err(BridgeError::Decode {
                        charset: self.charset.name(),
                    });
                }
            }
        }
    }
}
