//! Common types used throughout RocketReserver
//!
//! This module contains shared type definitions, type aliases,
//! and utility types used across multiple modules.

use serde::{Deserialize, Deserializer, Serialize};

// ============================================================================
// Type Aliases
// ============================================================================

/// JSON value type (re-exported from serde_json)
pub type JsonValue = serde_json::Value;

// ============================================================================
// Response Envelope
// ============================================================================

/// A GraphQL-style response envelope
///
/// A response that arrives at all is a success at the transport level, but it
/// may still carry application-level errors alongside (or instead of) data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<D> {
    /// Payload, absent when the server could not resolve the operation
    pub data: Option<D>,
    /// Application-level errors
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub errors: Vec<ResponseError>,
}

/// Servers may send `"errors": null` on success
fn null_as_empty<'de, De>(deserializer: De) -> Result<Vec<ResponseError>, De::Error>
where
    De: Deserializer<'de>,
{
    Ok(Option::<Vec<ResponseError>>::deserialize(deserializer)?.unwrap_or_default())
}

impl<D> Response<D> {
    /// Create a response carrying data and no errors
    pub fn ok(data: D) -> Self {
        Self {
            data: Some(data),
            errors: Vec::new(),
        }
    }

    /// Create a response carrying only errors
    pub fn from_errors(errors: Vec<ResponseError>) -> Self {
        Self { data: None, errors }
    }

    /// Attach an application-level error
    #[must_use]
    pub fn with_error(mut self, error: ResponseError) -> Self {
        self.errors.push(error);
        self
    }

    /// Check if the response carries application-level errors
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Message of the first error, if any
    pub fn first_error_message(&self) -> Option<&str> {
        self.errors.first().map(|e| e.message.as_str())
    }
}

/// An application-level error reported by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseError {
    /// Human-readable message
    pub message: String,
    /// Path to the field that failed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<JsonValue>>,
    /// Server-specific extensions (error codes, etc.)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extensions: Option<JsonValue>,
}

impl ResponseError {
    /// Create an error with just a message
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            path: None,
            extensions: None,
        }
    }

    /// Error code from `extensions.code`, if present
    pub fn code(&self) -> Option<&str> {
        self.extensions
            .as_ref()
            .and_then(|ext| ext.get("code"))
            .and_then(JsonValue::as_str)
    }
}

// ============================================================================
// Backoff Type
// ============================================================================

/// Type of backoff for retries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BackoffType {
    /// Constant delay between retries
    Constant,
    /// Linear increase in delay
    Linear,
    /// Exponential increase in delay
    #[default]
    Exponential,
}
