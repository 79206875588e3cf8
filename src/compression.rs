// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

//! Page decompression. `UNCOMPRESSED` is a passthrough; `SNAPPY` and
//! `GZIP` are implemented. Every other codec named by the format is a
//! recognized but unsupported codec, not a format error.

use std::io::Read;

use crate::basic::Compression;
use crate::errors::Result;

/// Decompresses whole-page payloads.
pub trait Codec {
  /// Decompresses `input` into `output`, appending to whatever `output`
  /// already holds. `uncompressed_len` is the page header's declared
  /// uncompressed size, used to preallocate.
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, uncompressed_len: usize) -> Result<()>;
}

struct SnappyCodec;

impl Codec for SnappyCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, uncompressed_len: usize) -> Result<()> {
    let start = output.len();
    output.resize(start + uncompressed_len, 0);
    let mut decoder = snap::raw::Decoder::new();
    let decompressed_len = decoder
      .decompress(input, &mut output[start..])
      .map_err(|e| general_err!("SNAPPY decompression failed: {}", e))?;
    output.truncate(start + decompressed_len);
    Ok(())
  }
}

struct GzipCodec;

impl Codec for GzipCodec {
  fn decompress(&mut self, input: &[u8], output: &mut Vec<u8>, uncompressed_len: usize) -> Result<()> {
    output.reserve(uncompressed_len);
    let mut decoder = flate2::read::GzDecoder::new(input);
    decoder.read_to_end(output).map_err(|e| general_err!("GZIP decompression failed: {}", e))?;
    Ok(())
  }
}

/// Returns a `Codec` for `codec`, or `None` for `UNCOMPRESSED` (callers
/// should treat page bytes as already-decoded in that case). Any codec
/// this crate doesn't implement is an `UnsupportedCodec` error, never a
/// format/corruption error.
pub fn create_codec(codec: Compression) -> Result<Option<Box<dyn Codec>>> {
  match codec {
    Compression::UNCOMPRESSED => Ok(None),
    Compression::SNAPPY => Ok(Some(Box::new(SnappyCodec))),
    Compression::GZIP => Ok(Some(Box::new(GzipCodec))),
    other => Err(nyi_err!("unsupported compression codec {}", other)),
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_uncompressed_returns_none() {
    assert!(create_codec(Compression::UNCOMPRESSED).unwrap().is_none());
  }

  #[test]
  fn test_unsupported_codec_is_nyi() {
    assert!(create_codec(Compression::LZ4).is_err());
  }

  #[test]
  fn test_gzip_round_trip() {
    use std::io::Write;
    let original = b"the quick brown fox jumps over the lazy dog".to_vec();
    let mut encoder = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(&original).unwrap();
    let compressed = encoder.finish().unwrap();

    let mut codec = create_codec(Compression::GZIP).unwrap().unwrap();
    let mut out = Vec::new();
    codec.decompress(&compressed, &mut out, original.len()).unwrap();
    assert_eq!(out, original);
  }

  #[test]
  fn test_snappy_round_trip() {
    let original = b"the quick brown fox jumps over the lazy dog".to_vec();
    let mut encoder = snap::raw::Encoder::new();
    let compressed = encoder.compress_vec(&original).unwrap();

    let mut codec = create_codec(Compression::SNAPPY).unwrap().unwrap();
    let mut out = Vec::new();
    codec.decompress(&compressed, &mut out, original.len()).unwrap();
    assert_eq!(out, original);
  }
}
