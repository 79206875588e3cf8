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

//! Common Result and Error types for the crate.

use std::io;

use quick_error::quick_error;

quick_error! {
  /// The error type for this crate.
  #[derive(Debug)]
  pub enum ParquetError {
    /// General Parquet error: format, data validity, etc.
    General(message: String) {
      display("Parquet error: {}", message)
    }
    /// Underlying data was not enough to complete a decode.
    EOF(message: String) {
      display("Unexpected EOF: {}", message)
    }
    /// Feature is not yet implemented in this decoder.
    NYI(message: String) {
      display("NYI: {}", message)
    }
    /// A requested column path does not exist in the file's schema.
    UnknownColumn(path: String) {
      display("unknown column: {}", path)
    }
    /// Wraps an I/O error.
    Io(err: io::Error) {
      from()
      display("IO error: {}", err)
      source(err)
    }
    /// Wraps a Thrift compact-protocol deserialization error.
    Thrift(err: thrift::Error) {
      from()
      display("Thrift error: {}", err)
      source(err)
    }
  }
}

/// A specialized `Result` for Parquet errors.
pub type Result<T> = ::std::result::Result<T, ParquetError>;

/// Shortcut to generate a general parquet error.
macro_rules! general_err {
  ($fmt:expr) => (ParquetError::General($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (ParquetError::General(format!($fmt, $($args),*)));
}

/// Shortcut to generate an 'end of file' parquet error.
macro_rules! eof_err {
  ($fmt:expr) => (ParquetError::EOF($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (ParquetError::EOF(format!($fmt, $($args),*)));
}

/// Shortcut to generate a 'not yet implemented' parquet error.
macro_rules! nyi_err {
  ($fmt:expr) => (ParquetError::NYI($fmt.to_owned()));
  ($fmt:expr, $($args:expr),*) => (ParquetError::NYI(format!($fmt, $($args),*)));
}
