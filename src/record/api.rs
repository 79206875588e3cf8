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

//! Contains the `Row` enum used to represent a decoded Parquet record.

use std::fmt;

use crate::basic::{LogicalType, Type as PhysicalType};
use crate::data_type::{ByteArray, Int96};

/// Shortcut to generate a 'not yet implemented' panic for a physical/logical
/// type combination this crate doesn't know how to interpret.
macro_rules! nyi {
  ($physical_type:ident, $logical_type:ident, $value:ident) => {{
    unimplemented!("conversion for physical type {}, logical type {}, value {:?}", $physical_type, $logical_type, $value);
  }};
}

/// A decoded, nested Parquet record: an ordered list of named fields.
#[derive(Clone, Debug, PartialEq)]
pub struct Row {
  fields: Vec<(String, RowField)>,
}

impl Row {
  pub fn new(fields: Vec<(String, RowField)>) -> Self {
    Row { fields }
  }

  pub fn fields(&self) -> &[(String, RowField)] {
    &self.fields
  }
}

pub fn make_row(fields: Vec<(String, RowField)>) -> Row {
  Row::new(fields)
}

impl fmt::Display for Row {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "{{")?;
    for (i, (key, value)) in self.fields.iter().enumerate() {
      key.fmt(f)?;
      write!(f, ": ")?;
      value.fmt(f)?;
      if i < self.fields.len() - 1 {
        write!(f, ", ")?;
      }
    }
    write!(f, "}}")
  }
}

/// A single field value in a `Row`.
#[derive(Clone, Debug, PartialEq)]
pub enum RowField {
  Null,
  Bool(bool),
  Byte(i8),
  Short(i16),
  Int(i32),
  Long(i64),
  Float(f32),
  Double(f64),
  Str(String),
  Bytes(ByteArray),
  /// Milliseconds since the Unix epoch, converted from an INT96 Julian-day
  /// timestamp.
  Timestamp(u64),
  Group(Row),
  List(Vec<RowField>),
  Map(Vec<(RowField, RowField)>),
}

impl RowField {
  /// Converts a BOOLEAN value. Logical type never changes the interpretation.
  pub fn convert_bool(_physical_type: PhysicalType, _logical_type: LogicalType, value: bool) -> Self {
    RowField::Bool(value)
  }

  /// Converts an INT32 value, narrowing to `Byte`/`Short` for the INT_8/
  /// INT_16 logical types.
  pub fn convert_int32(physical_type: PhysicalType, logical_type: LogicalType, value: i32) -> Self {
    match logical_type {
      LogicalType::INT_8 => RowField::Byte(value as i8),
      LogicalType::INT_16 => RowField::Short(value as i16),
      LogicalType::INT_32 | LogicalType::NONE => RowField::Int(value),
      _ => nyi!(physical_type, logical_type, value),
    }
  }

  /// Converts an INT64 value.
  pub fn convert_int64(physical_type: PhysicalType, logical_type: LogicalType, value: i64) -> Self {
    match logical_type {
      LogicalType::INT_64 | LogicalType::NONE => RowField::Long(value),
      _ => nyi!(physical_type, logical_type, value),
    }
  }

  /// Converts an INT96 nanosecond Julian-day timestamp into milliseconds
  /// since the Unix epoch.
  pub fn convert_int96(_physical_type: PhysicalType, _logical_type: LogicalType, value: Int96) -> Self {
    const JULIAN_TO_UNIX_EPOCH_DAYS: u64 = 2_440_588;
    const MILLIS_PER_DAY: u64 = 86_400_000;
    const NANOS_PER_DAY: u64 = MILLIS_PER_DAY * 1_000_000;

    let days_since_epoch = value.data()[2] as u64 - JULIAN_TO_UNIX_EPOCH_DAYS;
    let nanoseconds: u64 = ((value.data()[1] as u64) << 32) + value.data()[0] as u64;
    let nanos = days_since_epoch * NANOS_PER_DAY + nanoseconds;

    RowField::Timestamp(nanos / 1_000_000)
  }

  /// Converts a FLOAT value.
  pub fn convert_float(_physical_type: PhysicalType, _logical_type: LogicalType, value: f32) -> Self {
    RowField::Float(value)
  }

  /// Converts a DOUBLE value.
  pub fn convert_double(_physical_type: PhysicalType, _logical_type: LogicalType, value: f64) -> Self {
    RowField::Double(value)
  }

  /// Converts a BYTE_ARRAY value into a UTF-8 `Str` for the UTF8/ENUM/JSON
  /// logical types, or a raw `Bytes` otherwise.
  pub fn convert_byte_array(physical_type: PhysicalType, logical_type: LogicalType, value: ByteArray) -> Self {
    match physical_type {
      PhysicalType::BYTE_ARRAY | PhysicalType::FIXED_LEN_BYTE_ARRAY => match logical_type {
        LogicalType::UTF8 | LogicalType::ENUM | LogicalType::JSON => {
          match String::from_utf8(value.data().to_vec()) {
            Ok(s) => RowField::Str(s),
            Err(_) => RowField::Bytes(value),
          }
        }
        LogicalType::BSON | LogicalType::NONE => RowField::Bytes(value),
        _ => nyi!(physical_type, logical_type, value),
      },
      _ => nyi!(physical_type, logical_type, value),
    }
  }
}

impl fmt::Display for RowField {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match *self {
      RowField::Null => write!(f, "null"),
      RowField::Bool(value) => write!(f, "{}", value),
      RowField::Byte(value) => write!(f, "{}", value),
      RowField::Short(value) => write!(f, "{}", value),
      RowField::Int(value) => write!(f, "{}", value),
      RowField::Long(value) => write!(f, "{}", value),
      RowField::Float(value) => write!(f, "{:?}", value),
      RowField::Double(value) => write!(f, "{:?}", value),
      RowField::Str(ref value) => write!(f, "\"{}\"", value),
      RowField::Bytes(ref value) => write!(f, "{:?}", value.data()),
      RowField::Timestamp(value) => write!(f, "{}", value),
      RowField::Group(ref row) => write!(f, "{}", row),
      RowField::List(ref fields) => {
        write!(f, "[")?;
        for (i, field) in fields.iter().enumerate() {
          field.fmt(f)?;
          if i < fields.len() - 1 {
            write!(f, ", ")?;
          }
        }
        write!(f, "]")
      }
      RowField::Map(ref pairs) => {
        write!(f, "{{")?;
        for (i, (key, value)) in pairs.iter().enumerate() {
          key.fmt(f)?;
          write!(f, " -> ")?;
          value.fmt(f)?;
          if i < pairs.len() - 1 {
            write!(f, ", ")?;
          }
        }
        write!(f, "}}")
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_row_convert_bool() {
    let row = RowField::convert_bool(PhysicalType::BOOLEAN, LogicalType::NONE, true);
    assert_eq!(row, RowField::Bool(true));
  }

  #[test]
  fn test_row_convert_int32() {
    assert_eq!(RowField::convert_int32(PhysicalType::INT32, LogicalType::INT_8, 111), RowField::Byte(111));
    assert_eq!(RowField::convert_int32(PhysicalType::INT32, LogicalType::INT_16, 222), RowField::Short(222));
    assert_eq!(RowField::convert_int32(PhysicalType::INT32, LogicalType::INT_32, 333), RowField::Int(333));
    assert_eq!(RowField::convert_int32(PhysicalType::INT32, LogicalType::NONE, 444), RowField::Int(444));
  }

  #[test]
  fn test_row_convert_int64() {
    assert_eq!(RowField::convert_int64(PhysicalType::INT64, LogicalType::INT_64, 1111), RowField::Long(1111));
    assert_eq!(RowField::convert_int64(PhysicalType::INT64, LogicalType::NONE, 2222), RowField::Long(2222));
  }

  #[test]
  fn test_row_convert_int96() {
    let value = Int96::from(vec![0, 0, 2454923]);
    let row = RowField::convert_int96(PhysicalType::INT96, LogicalType::NONE, value);
    assert_eq!(row, RowField::Timestamp(1238544000000));
  }

  #[test]
  fn test_row_convert_byte_array_utf8() {
    let value = ByteArray::from(vec![b'A', b'B', b'C', b'D']);
    let row = RowField::convert_byte_array(PhysicalType::BYTE_ARRAY, LogicalType::UTF8, value);
    assert_eq!(row, RowField::Str("ABCD".to_string()));
  }

  #[test]
  fn test_row_convert_byte_array_none() {
    let value = ByteArray::from(vec![1, 2, 3, 4, 5]);
    let row = RowField::convert_byte_array(PhysicalType::BYTE_ARRAY, LogicalType::NONE, value.clone());
    assert_eq!(row, RowField::Bytes(value));
  }

  #[test]
  fn test_row_display() {
    assert_eq!(format!("{}", RowField::Null), "null");
    assert_eq!(format!("{}", RowField::Bool(true)), "true");
    assert_eq!(format!("{}", RowField::Int(3)), "3");
    assert_eq!(format!("{}", RowField::Str("abc".to_string())), "\"abc\"");

    let fields = vec![
      ("x".to_string(), RowField::Null),
      ("y".to_string(), RowField::Int(2)),
      ("z".to_string(), RowField::Str("abc".to_string())),
    ];
    let row = RowField::Group(Row::new(fields));
    assert_eq!(format!("{}", row), "{x: null, y: 2, z: \"abc\"}");

    let row = RowField::List(vec![RowField::Int(2), RowField::Int(1), RowField::Null]);
    assert_eq!(format!("{}", row), "[2, 1, null]");

    let row = RowField::Map(vec![(RowField::Int(1), RowField::Float(1.2)), (RowField::Int(2), RowField::Float(4.5))]);
    assert_eq!(format!("{}", row), "{1 -> 1.2, 2 -> 4.5}");
  }
}
