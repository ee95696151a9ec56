//! GraphQL operation types

use crate::types::JsonValue;
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Whether an operation reads or writes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A typed GraphQL operation
///
/// Implementors pair a document with the shape of its `data` payload.
/// Mutations are sent exactly once; queries use the client's retry policy.
pub trait Operation: Send + Sync {
    /// Decoded `data` payload
    type Data: DeserializeOwned + Clone + Send + Sync + 'static;

    /// Operation name, sent as `operationName`
    const NAME: &'static str;

    /// GraphQL document text
    const DOCUMENT: &'static str;

    /// Query or mutation
    const KIND: OperationKind = OperationKind::Query;

    /// Variables object for this invocation
    fn variables(&self) -> JsonValue {
        JsonValue::Object(Default::default())
    }
}

/// Wire body of a GraphQL POST
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphQlRequest<'a> {
    pub operation_name: &'a str,
    pub query: &'a str,
    pub variables: JsonValue,
}

impl<'a> GraphQlRequest<'a> {
    /// Build the request body for an operation
    pub fn for_operation<O: Operation>(operation: &O) -> Self {
        Self {
            operation_name: O::NAME,
            query: O::DOCUMENT,
            variables: operation.variables(),
        }
    }
}
