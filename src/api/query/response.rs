// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Query API response types

use serde::{Deserialize, Serialize};

/// Response body for a successful POST /query
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QueryApiResponse {
    pub answer: String,
}

impl QueryApiResponse {
    pub fn new(answer: impl Into<String>) -> Self {
        Self {
            answer: answer.into(),
        }
    }
}
