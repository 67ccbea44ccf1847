use thiserror::Error;

/// Errors reported by [`RedBlackTree`](crate::RedBlackTree) and [`NodeRef`](crate::NodeRef).
///
/// Missing keys are not errors: lookups return the NIL sentinel and deletes of absent keys do
/// nothing.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// An iteration style name was not one of `pre`, `in` or `post`.
    #[error("unrecognized iteration style `{0}` (expected `pre`, `in` or `post`)")]
    InvalidIterationStyle(String),

    /// A key was requested from the NIL sentinel.
    #[error("the NIL sentinel carries no key")]
    NilSentinel,
}
