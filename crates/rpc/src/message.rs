//! Wire envelopes exchanged over an RPC connection.
//!
//! Each frame is one JSON object on its own line. A request carries a
//! correlation `id`, a `pattern` naming the command and a `data` payload.
//! The reply echoes the `id` and carries either `response` or `err`.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::error;

use catalog_app::domain::products::ProductsServiceError;

/// Selects the command a request is routed to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pattern {
    pub cmd: String,
}

/// Incoming request frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RpcRequest {
    #[serde(default)]
    pub id: Value,
    pub pattern: Pattern,
    #[serde(default)]
    pub data: Value,
}

/// Error payload returned in place of a response.
///
/// `status` is the HTTP-equivalent code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcError {
    pub message: String,
    pub status: u16,
}

impl RpcError {
    pub const BAD_REQUEST: u16 = 400;
    pub const NOT_FOUND: u16 = 404;
    pub const INTERNAL_SERVER_ERROR: u16 = 500;

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: Self::BAD_REQUEST,
        }
    }

    pub fn internal() -> Self {
        Self {
            message: "Internal server error".to_string(),
            status: Self::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ProductsServiceError> for RpcError {
    fn from(e: ProductsServiceError) -> Self {
        match e {
            ProductsServiceError::NotFound(_) => Self {
                message: e.to_string(),
                status: Self::NOT_FOUND,
            },
            ProductsServiceError::SomeProductsNotFound => Self::bad_request(e.to_string()),
            ProductsServiceError::Sql(source) => {
                error!(error = %source, "product storage failure");

                Self::internal()
            }
        }
    }
}

/// Outgoing reply frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RpcReply {
    Response { id: Value, response: Value },
    Error { id: Value, err: RpcError },
}

impl RpcReply {
    pub fn ok(id: Value, response: Value) -> Self {
        Self::Response { id, response }
    }

    pub fn err(id: Value, err: RpcError) -> Self {
        Self::Error { id, err }
    }

    pub fn id(&self) -> &Value {
        match self {
            Self::Response { id, .. } | Self::Error { id, .. } => id,
        }
    }
}
