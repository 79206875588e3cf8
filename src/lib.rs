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

//! A read-only decoder for the Apache Parquet columnar file format:
//! footer/schema parsing, page decompression, PLAIN/dictionary value
//! decoding, and a flat Row API built on top of the column readers.
//!
//! `DATA_PAGE_V2`, `INDEX_PAGE`, the `DELTA_*` encodings, standalone
//! `BIT_PACKED` value encoding and nested (repeated) record assembly are
//! out of scope; see `SPEC_FULL.md` and `DESIGN.md` for the full rationale.

#[macro_use]
mod errors;

pub mod basic;
pub mod column;
pub mod compression;
pub mod data_type;
pub mod encodings;
pub mod file;
pub mod record;
pub mod schema;
pub mod util;

pub use crate::errors::{ParquetError, Result};
