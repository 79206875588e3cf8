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

//! Reads the file footer: magic bytes at both ends, an 8-byte trailer
//! holding the footer length, and the Thrift-compact-encoded `FileMetaData`
//! itself.

use std::io::Read;

use parquet_format_safe::FileMetaData as TFileMetaData;
use thrift::protocol::TCompactInputProtocol;

use crate::errors::Result;
use crate::file::metadata::{parse_file_metadata, ParquetMetaData};
use crate::file::reader::{ChunkReader, Length};

/// 4-byte magic at the start and end of every Parquet file.
pub const PARQUET_MAGIC: [u8; 4] = [b'P', b'A', b'R', b'1'];
/// Trailer: a 4-byte little-endian footer length followed by the magic.
const FOOTER_SIZE: u64 = 8;

/// Parses the footer out of `chunk_reader`, validating the leading and
/// trailing magic bytes.
pub fn parse_metadata<R: ChunkReader + Length>(chunk_reader: &R) -> Result<ParquetMetaData> {
  let file_size = chunk_reader.len();
  if file_size < (PARQUET_MAGIC.len() as u64) * 2 + FOOTER_SIZE {
    return Err(general_err!("file is too small to be a valid Parquet file ({} bytes)", file_size));
  }

  let mut head_magic = [0u8; 4];
  chunk_reader.get_read(0, 4)?.read_exact(&mut head_magic)?;
  if head_magic != PARQUET_MAGIC {
    return Err(general_err!("invalid Parquet file: leading magic bytes are not 'PAR1'"));
  }

  let mut trailer = [0u8; FOOTER_SIZE as usize];
  chunk_reader.get_read(file_size - FOOTER_SIZE, FOOTER_SIZE as usize)?.read_exact(&mut trailer)?;
  if trailer[4..8] != PARQUET_MAGIC {
    return Err(general_err!("invalid Parquet file: trailing magic bytes are not 'PAR1'"));
  }

  let metadata_len = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]) as u64;
  let footer_start =
    file_size.checked_sub(FOOTER_SIZE + metadata_len).ok_or_else(|| general_err!("footer length out of bounds"))?;
  if footer_start < PARQUET_MAGIC.len() as u64 {
    return Err(general_err!("footer length out of bounds"));
  }

  let mut buf = vec![0u8; metadata_len as usize];
  chunk_reader.get_read(footer_start, metadata_len as usize)?.read_exact(&mut buf)?;

  let mut protocol = TCompactInputProtocol::new(&buf[..]);
  let t_file_metadata = TFileMetaData::read_from_in_protocol(&mut protocol)
    .map_err(|e| general_err!("could not parse file metadata: {}", e))?;

  parse_file_metadata(t_file_metadata)
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::file::reader::SliceableCursor;

  #[test]
  fn test_too_small_file_is_general_error() {
    let reader = SliceableCursor::new(vec![0u8; 4]);
    assert!(parse_metadata(&reader).is_err());
  }

  #[test]
  fn test_bad_leading_magic_is_rejected() {
    let mut data = vec![0u8; 4]; // wrong magic
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(&PARQUET_MAGIC);
    let reader = SliceableCursor::new(data);
    assert!(parse_metadata(&reader).is_err());
  }

  #[test]
  fn test_bad_trailing_magic_is_rejected() {
    let mut data = Vec::new();
    data.extend_from_slice(&PARQUET_MAGIC);
    data.extend_from_slice(&0u32.to_le_bytes());
    data.extend_from_slice(b"XXXX");
    let reader = SliceableCursor::new(data);
    assert!(parse_metadata(&reader).is_err());
  }
}
