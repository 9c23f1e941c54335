// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

pub mod config;
pub mod executor;
pub mod http;
pub mod query_client;

pub use config::{ClientConfig, ConfigError, ModelService};
pub use executor::GraphqlExecutor;
pub use http::HttpExecutor;
pub use query_client::QueryClient;
