// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer tests.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::cast_possible_wrap)]

mod enrollment_tests;
mod helpers;
