//! Shared fixtures for the integration tests
//!
//! A fixed dynamic schema with resolvers covering every result shape the
//! executor has to deal with.

#![allow(dead_code)]

use async_graphql::Value as GqlValue;
use async_graphql::dynamic::{
    Field, FieldFuture, FieldValue, InputValue, Object, Schema, TypeRef,
};
use async_trait::async_trait;
use qexec::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Item returned by the `items` field
#[derive(Debug, Clone)]
pub struct FixtureItem {
    pub name: &'static str,
    pub price: i32,
}

pub const ITEMS: [FixtureItem; 3] = [
    FixtureItem { name: "pen", price: 2 },
    FixtureItem { name: "book", price: 15 },
    FixtureItem { name: "lamp", price: 40 },
];

/// Schema with:
/// - `hello(name: String): String!`
/// - `withNullableNull: String`
/// - `withNonNullableNull: String!`
/// - `items: [Item!]!`
/// - `viewer: String` (the `x-viewer` request header)
pub fn hello_schema() -> Schema {
    let item = Object::new("Item")
        .field(Field::new("name", TypeRef::named_nn(TypeRef::STRING), |ctx| {
            FieldFuture::new(async move {
                let item = ctx.parent_value.try_downcast_ref::<FixtureItem>()?;
                Ok(Some(GqlValue::from(item.name)))
            })
        }))
        .field(Field::new("price", TypeRef::named_nn(TypeRef::INT), |ctx| {
            FieldFuture::new(async move {
                let item = ctx.parent_value.try_downcast_ref::<FixtureItem>()?;
                Ok(Some(GqlValue::from(item.price)))
            })
        }));

    let query = Object::new("Query")
        .field(
            Field::new("hello", TypeRef::named_nn(TypeRef::STRING), |ctx| {
                FieldFuture::new(async move {
                    let greeting = match ctx.args.get("name") {
                        Some(name) if !name.is_null() => format!("Hello, {}!", name.string()?),
                        _ => "Hello!".to_string(),
                    };
                    Ok(Some(GqlValue::from(greeting)))
                })
            })
            .argument(InputValue::new("name", TypeRef::named(TypeRef::STRING))),
        )
        .field(Field::new(
            "withNullableNull",
            TypeRef::named(TypeRef::STRING),
            |_| FieldFuture::new(async move { Ok(None::<GqlValue>) }),
        ))
        .field(Field::new(
            "withNonNullableNull",
            TypeRef::named_nn(TypeRef::STRING),
            |_| FieldFuture::new(async move { Ok(None::<GqlValue>) }),
        ))
        .field(Field::new(
            "items",
            TypeRef::named_nn_list_nn("Item"),
            |_| {
                FieldFuture::new(async move {
                    Ok(Some(FieldValue::list(
                        ITEMS.iter().cloned().map(FieldValue::owned_any),
                    )))
                })
            },
        ))
        .field(Field::new(
            "viewer",
            TypeRef::named(TypeRef::STRING),
            |ctx| {
                FieldFuture::new(async move {
                    let viewer = ctx
                        .data_opt::<RequestContext>()
                        .and_then(|context| context.header("x-viewer"))
                        .map(|viewer| GqlValue::from(viewer.to_string()));
                    Ok(viewer)
                })
            },
        ));

    Schema::build("Query", None, None)
        .register(item)
        .register(query)
        .finish()
        .expect("fixture schema should be valid")
}

pub fn executor() -> QueryExecutor {
    QueryExecutor::new(hello_schema())
}

/// Engine that is never reachable
pub struct UnavailableEngine;

#[async_trait]
impl ExecutionEngine for UnavailableEngine {
    async fn run(&self, _request: &ExecutionRequest) -> Result<ExecutionOutcome, EngineError> {
        Err(EngineError::Unavailable {
            message: "engine is down".to_string(),
        })
    }
}

/// Engine returning a canned outcome, counting its calls
pub struct CannedEngine {
    outcome: ExecutionOutcome,
    calls: AtomicUsize,
}

impl CannedEngine {
    pub fn new(outcome: ExecutionOutcome) -> Self {
        Self {
            outcome,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExecutionEngine for CannedEngine {
    async fn run(&self, _request: &ExecutionRequest) -> Result<ExecutionOutcome, EngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.outcome.clone())
    }
}

/// `{ hello: "Hello!" , broken: null }` with one resolver error on `broken`
pub fn partial_outcome() -> ExecutionOutcome {
    ExecutionOutcome::from_data(json!({ "hello": "Hello!", "broken": null })).with_errors(vec![
        ExecutionError::new("broken resolver failed", ErrorType::DataFetchingException)
            .with_location(1, 9)
            .with_path(vec![PathSegment::Field("broken".to_string())]),
    ])
}
