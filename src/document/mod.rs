//! Navigable result documents
//!
//! A [`DocumentView`] wraps the response document of a successful execution
//! (`{"data": ..., "extensions": ...}`) and evaluates path expressions
//! against it on demand. Evaluation is delegated to `jsonpath_lib`; this
//! module adds the definite/indefinite distinction so that a missing node is
//! never confused with a node that holds `null`.

pub mod path;

pub use path::{PathExpression, Segment};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::Arc;

use crate::core::{ExecutionOutcome, ExecutorResult, PathError, TypeCoercionError};

/// Options controlling path evaluation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PathOptions {
    /// Read a missing last property of an existing object as `null`
    /// instead of failing with [`PathError::NotFound`]
    #[serde(default)]
    pub default_leaf_to_null: bool,
}

/// Read-only, lazily navigated view of a result document
///
/// Cloning is cheap: the document is shared.
#[derive(Debug, Clone)]
pub struct DocumentView {
    root: Arc<Value>,
    options: PathOptions,
}

impl DocumentView {
    pub fn new(root: Value) -> Self {
        Self::with_options(root, PathOptions::default())
    }

    pub fn with_options(root: Value, options: PathOptions) -> Self {
        Self {
            root: Arc::new(root),
            options,
        }
    }

    /// View over the response document of `outcome`
    ///
    /// Paths address the document root, so data is read as `data.field`.
    pub fn from_outcome(outcome: ExecutionOutcome, options: PathOptions) -> Self {
        let mut root = Map::new();
        if let Some(data) = outcome.data {
            root.insert("data".to_string(), data);
        }
        if let Some(extensions) = outcome.extensions {
            root.insert("extensions".to_string(), Value::Object(extensions));
        }
        Self::with_options(Value::Object(root), options)
    }

    pub fn options(&self) -> PathOptions {
        self.options
    }

    /// Read the value at `path` and deserialize it into `T`
    pub fn read<T: DeserializeOwned>(&self, path: &str) -> ExecutorResult<T> {
        let expression = PathExpression::parse(path)?;
        self.read_path(&expression)
    }

    /// Like [`read`](Self::read) with an already parsed expression
    pub fn read_path<T: DeserializeOwned>(&self, expression: &PathExpression) -> ExecutorResult<T> {
        let value = self.select(expression)?;
        coerce(expression, value)
    }

    /// Read the raw JSON value at `path`
    pub fn read_value(&self, path: &str) -> ExecutorResult<Value> {
        let expression = PathExpression::parse(path)?;
        Ok(self.select(&expression)?)
    }

    /// True when `path` is valid and addresses an existing node
    ///
    /// Indefinite paths exist when they match at least one node.
    pub fn exists(&self, path: &str) -> bool {
        let Ok(expression) = PathExpression::parse(path) else {
            return false;
        };
        match self.evaluate(&expression) {
            Ok(matches) => !matches.is_empty(),
            Err(_) => false,
        }
    }

    /// Evaluate `expression`
    ///
    /// Definite paths yield the single addressed node (which may be `null`)
    /// or [`PathError::NotFound`]. Indefinite paths always yield an array of
    /// every match, empty when nothing matched.
    pub fn select(&self, expression: &PathExpression) -> Result<Value, PathError> {
        let matches = self.evaluate(expression)?;

        if !expression.is_definite() {
            return Ok(Value::Array(matches.into_iter().cloned().collect()));
        }

        if let Some(value) = matches.into_iter().next() {
            return Ok(value.clone());
        }

        if self.options.default_leaf_to_null && self.parent_is_object(expression)? {
            return Ok(Value::Null);
        }

        Err(PathError::NotFound {
            path: expression.as_str().to_string(),
        })
    }

    /// The whole document
    pub fn json(&self) -> &Value {
        &self.root
    }

    pub fn into_json(self) -> Value {
        Arc::try_unwrap(self.root).unwrap_or_else(|shared| (*shared).clone())
    }

    fn evaluate(&self, expression: &PathExpression) -> Result<Vec<&Value>, PathError> {
        jsonpath_lib::select(&self.root, &expression.normalized()).map_err(|e| {
            PathError::Invalid {
                path: expression.as_str().to_string(),
                message: format!("{:?}", e),
            }
        })
    }

    fn parent_is_object(&self, expression: &PathExpression) -> Result<bool, PathError> {
        if !matches!(expression.last(), Some(Segment::Member(_))) {
            return Ok(false);
        }
        let Some(parent) = expression.parent() else {
            return Ok(false);
        };
        Ok(self
            .evaluate(&parent)?
            .first()
            .is_some_and(|value| value.is_object()))
    }
}

fn coerce<T: DeserializeOwned>(expression: &PathExpression, value: Value) -> ExecutorResult<T> {
    serde_json::from_value(value).map_err(|e| {
        TypeCoercionError {
            path: expression.as_str().to_string(),
            target_type: std::any::type_name::<T>(),
            message: e.to_string(),
        }
        .into()
    })
}
