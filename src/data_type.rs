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

//! Physical value representations and the marker types used to select a
//! decoder implementation for a given physical type at compile time.

use std::fmt;

use crate::basic::Type;
use crate::util::memory::ByteBufferPtr;

/// A variable-length byte sequence, as produced by BYTE_ARRAY and
/// FIXED_LEN_BYTE_ARRAY columns.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct ByteArray {
  data: Option<ByteBufferPtr>,
}

impl ByteArray {
  pub fn new() -> Self {
    ByteArray { data: None }
  }

  pub fn data(&self) -> &[u8] {
    self.data.as_ref().map(|b| b.as_ref()).unwrap_or(&[])
  }

  pub fn set_data(&mut self, data: ByteBufferPtr) {
    self.data = Some(data);
  }

  pub fn len(&self) -> usize {
    self.data().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

impl From<Vec<u8>> for ByteArray {
  fn from(v: Vec<u8>) -> Self {
    let mut b = ByteArray::new();
    b.set_data(ByteBufferPtr::new(v));
    b
  }
}

impl From<&str> for ByteArray {
  fn from(v: &str) -> Self {
    ByteArray::from(v.as_bytes().to_vec())
  }
}

impl fmt::Debug for ByteArray {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    f.debug_struct("ByteArray").field("data", &self.data()).finish()
  }
}

/// A 96-bit value (12 bytes), used historically to encode timestamps.
/// Interpreting the three packed `u32`s as a timestamp is the caller's
/// responsibility; this type only carries the raw words.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Int96 {
  value: [u32; 3],
}

impl Int96 {
  pub fn new() -> Self {
    Int96 { value: [0; 3] }
  }

  pub fn data(&self) -> &[u32] {
    &self.value
  }

  pub fn set_data(&mut self, data: Vec<u32>) {
    assert_eq!(data.len(), 3, "Int96 must be initialized from exactly 3 u32 words");
    self.value.copy_from_slice(&data);
  }
}

impl fmt::Debug for Int96 {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    write!(f, "Int96 {{ {:?} }}", self.value)
  }
}

impl From<Vec<u32>> for Int96 {
  fn from(v: Vec<u32>) -> Self {
    let mut i = Int96::new();
    i.set_data(v);
    i
  }
}

/// A marker type binding a Rust value representation (`T`) to a Parquet
/// physical type (`get_physical_type()`). Each supported physical type has
/// exactly one implementor; decoders are generic over `DataType` rather than
/// over the value type directly so that `type_length`/dictionary handling
/// can be specialized per physical type without runtime dispatch.
pub trait DataType: 'static {
  type T: std::fmt::Debug + Default + Clone + PartialEq;

  fn get_physical_type() -> Type;
}

macro_rules! make_type {
  ($name:ident, $value_ty:ty, $physical_type:expr) => {
    #[derive(Clone, Debug, PartialEq)]
    pub struct $name {}

    impl DataType for $name {
      type T = $value_ty;

      fn get_physical_type() -> Type {
        $physical_type
      }
    }
  };
}

make_type!(BoolType, bool, Type::BOOLEAN);
make_type!(Int32Type, i32, Type::INT32);
make_type!(Int64Type, i64, Type::INT64);
make_type!(Int96Type, Int96, Type::INT96);
make_type!(FloatType, f32, Type::FLOAT);
make_type!(DoubleType, f64, Type::DOUBLE);
make_type!(ByteArrayType, ByteArray, Type::BYTE_ARRAY);
make_type!(FixedLenByteArrayType, ByteArray, Type::FIXED_LEN_BYTE_ARRAY);
