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

//! Contains the Parquet-level enums mirrored from the on-disk Thrift
//! definitions: physical types, repetitions, encodings, compression codecs
//! and page types. Each has a `From<parquet_format_safe::...>` conversion so
//! the rest of the crate never has to look at the raw Thrift ints.

use std::fmt;

use parquet_format_safe as format;

/// Physical type for leaf-level primitive columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
  BOOLEAN,
  INT32,
  INT64,
  INT96,
  FLOAT,
  DOUBLE,
  BYTE_ARRAY,
  FIXED_LEN_BYTE_ARRAY,
}

impl fmt::Display for Type {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<format::Type> for Type {
  fn from(value: format::Type) -> Self {
    match value {
      format::Type::BOOLEAN => Type::BOOLEAN,
      format::Type::INT32 => Type::INT32,
      format::Type::INT64 => Type::INT64,
      format::Type::INT96 => Type::INT96,
      format::Type::FLOAT => Type::FLOAT,
      format::Type::DOUBLE => Type::DOUBLE,
      format::Type::BYTE_ARRAY => Type::BYTE_ARRAY,
      format::Type::FIXED_LEN_BYTE_ARRAY => Type::FIXED_LEN_BYTE_ARRAY,
      _ => panic!("unknown physical type {:?}", value),
    }
  }
}

/// Repetition of a schema element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Repetition {
  REQUIRED,
  OPTIONAL,
  REPEATED,
}

impl fmt::Display for Repetition {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<format::FieldRepetitionType> for Repetition {
  fn from(value: format::FieldRepetitionType) -> Self {
    match value {
      format::FieldRepetitionType::REQUIRED => Repetition::REQUIRED,
      format::FieldRepetitionType::OPTIONAL => Repetition::OPTIONAL,
      format::FieldRepetitionType::REPEATED => Repetition::REPEATED,
      _ => panic!("unknown repetition type {:?}", value),
    }
  }
}

/// Converted (logical) type annotation carried on a schema element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalType {
  NONE,
  UTF8,
  MAP,
  MAP_KEY_VALUE,
  LIST,
  ENUM,
  DECIMAL,
  DATE,
  TIME_MILLIS,
  TIME_MICROS,
  TIMESTAMP_MILLIS,
  TIMESTAMP_MICROS,
  UINT_8,
  UINT_16,
  UINT_32,
  UINT_64,
  INT_8,
  INT_16,
  INT_32,
  INT_64,
  JSON,
  BSON,
  INTERVAL,
}

impl fmt::Display for LogicalType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<Option<format::ConvertedType>> for LogicalType {
  fn from(value: Option<format::ConvertedType>) -> Self {
    match value {
      None => LogicalType::NONE,
      Some(format::ConvertedType::UTF8) => LogicalType::UTF8,
      Some(format::ConvertedType::MAP) => LogicalType::MAP,
      Some(format::ConvertedType::MAP_KEY_VALUE) => LogicalType::MAP_KEY_VALUE,
      Some(format::ConvertedType::LIST) => LogicalType::LIST,
      Some(format::ConvertedType::ENUM) => LogicalType::ENUM,
      Some(format::ConvertedType::DECIMAL) => LogicalType::DECIMAL,
      Some(format::ConvertedType::DATE) => LogicalType::DATE,
      Some(format::ConvertedType::TIME_MILLIS) => LogicalType::TIME_MILLIS,
      Some(format::ConvertedType::TIME_MICROS) => LogicalType::TIME_MICROS,
      Some(format::ConvertedType::TIMESTAMP_MILLIS) => LogicalType::TIMESTAMP_MILLIS,
      Some(format::ConvertedType::TIMESTAMP_MICROS) => LogicalType::TIMESTAMP_MICROS,
      Some(format::ConvertedType::UINT_8) => LogicalType::UINT_8,
      Some(format::ConvertedType::UINT_16) => LogicalType::UINT_16,
      Some(format::ConvertedType::UINT_32) => LogicalType::UINT_32,
      Some(format::ConvertedType::UINT_64) => LogicalType::UINT_64,
      Some(format::ConvertedType::INT_8) => LogicalType::INT_8,
      Some(format::ConvertedType::INT_16) => LogicalType::INT_16,
      Some(format::ConvertedType::INT_32) => LogicalType::INT_32,
      Some(format::ConvertedType::INT_64) => LogicalType::INT_64,
      Some(format::ConvertedType::JSON) => LogicalType::JSON,
      Some(format::ConvertedType::BSON) => LogicalType::BSON,
      Some(format::ConvertedType::INTERVAL) => LogicalType::INTERVAL,
      Some(other) => panic!("unknown converted type {:?}", other),
    }
  }
}

/// Encoding used for an individual page's values or its levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Encoding {
  PLAIN,
  PLAIN_DICTIONARY,
  RLE,
  BIT_PACKED,
  DELTA_BINARY_PACKED,
  DELTA_LENGTH_BYTE_ARRAY,
  DELTA_BYTE_ARRAY,
  RLE_DICTIONARY,
}

impl fmt::Display for Encoding {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<format::Encoding> for Encoding {
  fn from(value: format::Encoding) -> Self {
    match value {
      format::Encoding::PLAIN => Encoding::PLAIN,
      format::Encoding::PLAIN_DICTIONARY => Encoding::PLAIN_DICTIONARY,
      format::Encoding::RLE => Encoding::RLE,
      format::Encoding::BIT_PACKED => Encoding::BIT_PACKED,
      format::Encoding::DELTA_BINARY_PACKED => Encoding::DELTA_BINARY_PACKED,
      format::Encoding::DELTA_LENGTH_BYTE_ARRAY => Encoding::DELTA_LENGTH_BYTE_ARRAY,
      format::Encoding::DELTA_BYTE_ARRAY => Encoding::DELTA_BYTE_ARRAY,
      format::Encoding::RLE_DICTIONARY => Encoding::RLE_DICTIONARY,
      other => panic!("unsupported encoding {:?}", other),
    }
  }
}

/// Compression codec for a column chunk's pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Compression {
  UNCOMPRESSED,
  SNAPPY,
  GZIP,
  LZO,
  BROTLI,
  LZ4,
  ZSTD,
}

impl fmt::Display for Compression {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<format::CompressionCodec> for Compression {
  fn from(value: format::CompressionCodec) -> Self {
    match value {
      format::CompressionCodec::UNCOMPRESSED => Compression::UNCOMPRESSED,
      format::CompressionCodec::SNAPPY => Compression::SNAPPY,
      format::CompressionCodec::GZIP => Compression::GZIP,
      format::CompressionCodec::LZO => Compression::LZO,
      format::CompressionCodec::BROTLI => Compression::BROTLI,
      format::CompressionCodec::LZ4 => Compression::LZ4,
      format::CompressionCodec::ZSTD => Compression::ZSTD,
      other => panic!("unsupported compression codec {:?}", other),
    }
  }
}

/// Kind of page as laid out in a column chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageType {
  DATA_PAGE,
  INDEX_PAGE,
  DICTIONARY_PAGE,
  DATA_PAGE_V2,
}

impl fmt::Display for PageType {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{:?}", self)
  }
}

impl From<format::PageType> for PageType {
  fn from(value: format::PageType) -> Self {
    match value {
      format::PageType::DATA_PAGE => PageType::DATA_PAGE,
      format::PageType::INDEX_PAGE => PageType::INDEX_PAGE,
      format::PageType::DICTIONARY_PAGE => PageType::DICTIONARY_PAGE,
      format::PageType::DATA_PAGE_V2 => PageType::DATA_PAGE_V2,
      other => panic!("unknown page type {:?}", other),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_type_display() {
    assert_eq!(Type::INT32.to_string(), "INT32");
    assert_eq!(Type::FIXED_LEN_BYTE_ARRAY.to_string(), "FIXED_LEN_BYTE_ARRAY");
  }

  #[test]
  fn test_encoding_from_format() {
    assert_eq!(Encoding::from(format::Encoding::PLAIN_DICTIONARY), Encoding::PLAIN_DICTIONARY);
    assert_eq!(Encoding::from(format::Encoding::RLE_DICTIONARY), Encoding::RLE_DICTIONARY);
  }

  #[test]
  fn test_logical_type_from_converted_type() {
    assert_eq!(LogicalType::from(None), LogicalType::NONE);
    assert_eq!(LogicalType::from(Some(format::ConvertedType::INT_32)), LogicalType::INT_32);
  }
}
