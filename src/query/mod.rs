// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

pub mod builder;
pub mod normalize;

pub use builder::{build, QueryDocument};
pub use normalize::normalize;
