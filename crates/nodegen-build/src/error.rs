use nodegen_schema::node::NodeError;
use thiserror::Error as ThisError;

///
/// GenerateError
///
/// Every variant aborts the whole run; no artifact of a failed run is
/// handed to a sink.
///

#[derive(Debug, ThisError)]
pub enum GenerateError {
    #[error(
        "attribute '{property}' on '{class}' has type '{ty}', which is not one of Boolean, Double, Integer, Long, String"
    )]
    UnresolvedAttributeType {
        class: String,
        property: String,
        ty: String,
    },

    #[error("'{value}' is not a valid identifier for {context}")]
    InvalidIdentifier { context: String, value: String },

    #[error("'{value}' is not a valid path for {context}")]
    InvalidPath { context: String, value: String },

    #[error("generated code for '{artifact}' does not parse: {source}")]
    Syntax {
        artifact: String,
        #[source]
        source: syn::Error,
    },

    #[error(transparent)]
    Node(#[from] NodeError),
}
