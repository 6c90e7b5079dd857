//! API exposure layers
//!
//! Each exposure consumes a shared executor and produces an Axum `Router`.

pub mod graphql;

pub use graphql::GraphQLExposure;
