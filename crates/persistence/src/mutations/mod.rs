// Copyright (C) 2026 CertRoster Contributors
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Write operations, one module per entity.
//!
//! The enrollment mutations are the only place capacity is enforced at
//! write time; everything else is plain Diesel DSL inserts and updates.

pub mod audit;
pub mod bootstrap;
pub mod enrollments;
pub mod notifications;
