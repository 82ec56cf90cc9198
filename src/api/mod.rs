// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod query;
pub mod server;

pub use errors::{ApiError, ErrorResponse};
pub use query::{query_handler, QueryApiRequest, QueryApiResponse, QueryInput};
pub use server::{create_app, start_server, ApiConfig, AppState, HealthResponse};
