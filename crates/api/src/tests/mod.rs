// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Service boundary tests.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod fallback_tests;
mod helpers;
