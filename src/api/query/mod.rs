// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Question answering API endpoint
//!
//! Provides POST /query, which runs a question through search, article
//! aggregation and answer generation.

pub mod handler;
pub mod request;
pub mod response;

pub use handler::query_handler;
pub use request::{QueryApiRequest, QueryInput};
pub use response::QueryApiResponse;
