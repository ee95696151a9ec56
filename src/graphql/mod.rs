//! GraphQL client module
//!
//! # Overview
//!
//! Operations are plain structs implementing [`Operation`]: a name, a document,
//! a variables object and the type their `data` decodes into. The
//! [`GraphQlClient`] posts them as `{operationName, query, variables}` and
//! decodes the `{data, errors}` envelope into a [`Response`](crate::types::Response).
//!
//! The client also implements [`PageExecutor`](crate::pagination::PageExecutor)
//! for every operation, so it can drive a pagination engine directly.

mod client;
mod types;

pub use client::GraphQlClient;
pub use types::{GraphQlRequest, Operation, OperationKind};
