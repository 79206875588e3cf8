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

//! Synthetic data generators shared by unit tests across the crate.

use rand::distributions::Standard;
use rand::prelude::Distribution;
use rand::Rng;

/// Generates `n` random values of `T` uniformly distributed over `T`'s
/// default range. Used to build test-only pages without relying on any
/// fixture files.
pub fn random_numbers<T>(n: usize) -> Vec<T>
where
  Standard: Distribution<T>,
{
  let mut rng = rand::thread_rng();
  (0..n).map(|_| rng.gen()).collect()
}

/// Generates `n` random `bool`s.
pub fn random_bools(n: usize) -> Vec<bool> {
  let mut rng = rand::thread_rng();
  (0..n).map(|_| rng.gen_bool(0.5)).collect()
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_random_numbers_len() {
    let v: Vec<i32> = random_numbers(10);
    assert_eq!(v.len(), 10);
  }

  #[test]
  fn test_random_bools_len() {
    assert_eq!(random_bools(7).len(), 7);
  }
}
