// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Built-in task kinds and the factory that instantiates them.

mod factory;
mod json_parse;
mod literal;
mod median;
mod multiply;
mod result_task;
mod sum;

#[cfg(test)]
pub(crate) mod stub;

pub use factory::TaskFactory;
pub use json_parse::JsonParseTask;
pub use literal::LiteralTask;
pub use median::MedianTask;
pub use multiply::MultiplyTask;
pub use result_task::ResultTask;
pub use sum::SumTask;

use serde_json::{Number, Value};

use crate::errors::TaskError;
use crate::pipeline::TaskResult;

/// Read a number from a JSON number or a numeric string.
pub(crate) fn as_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Wrap an `f64` as a JSON number, rejecting NaN and infinities.
pub(crate) fn number_value(n: f64) -> Result<Value, TaskError> {
    Number::from_f64(n)
        .map(Value::Number)
        .ok_or_else(|| TaskError::failed(format!("result {} is not a finite number", n)))
}

/// The single input of a one-input task, with predecessor errors turned into
/// `TaskError::Upstream`.
pub(crate) fn single_input(inputs: &[TaskResult]) -> Result<&Value, TaskError> {
    match inputs {
        [input] => match input.task_error() {
            Some(error) => Err(TaskError::Upstream(error.to_string())),
            None => Ok(&input.value),
        },
        _ => Err(TaskError::invalid_input(format!(
            "expected exactly 1 input, got {}",
            inputs.len()
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_as_number_accepts_numeric_strings() {
        assert_eq!(as_number(&json!(3)), Some(3.0));
        assert_eq!(as_number(&json!(" 101.5 ")), Some(101.5));
        assert_eq!(as_number(&json!("abc")), None);
        assert_eq!(as_number(&json!(null)), None);
    }

    #[test]
    fn test_single_input_propagates_upstream_error() {
        let inputs = vec![TaskResult::error("timeout")];
        assert_eq!(
            single_input(&inputs),
            Err(TaskError::Upstream("timeout".into()))
        );
    }

    #[test]
    fn test_single_input_rejects_fan_in() {
        let inputs = vec![TaskResult::ok(json!(1)), TaskResult::ok(json!(2))];
        assert!(matches!(
            single_input(&inputs),
            Err(TaskError::InvalidInput(_))
        ));
    }
}
