use bigsky_domain::{Error, FailureKind, Operator, Outcome, ValidationRule, scalar_text};
use serde_json::{Map, Value};

/// One recorded line of argument validation
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub message: String,
    pub outcome: Outcome,
}

/// Checks `rule` against decoded and normalized tool-call arguments. A key
/// that is absent or `null` counts as missing.
pub fn check(args: &Map<String, Value>, rule: &ValidationRule) -> bool {
    let actual = args.get(&rule.arg_name).filter(|value| !value.is_null());
    let expected = rule.expected_value.as_ref().unwrap_or(&Value::Null);

    match (rule.operator, actual) {
        (Operator::IsNull, actual) => actual.is_none(),
        (_, None) => false,
        (Operator::Equal, Some(actual)) => equals(actual, expected, rule.case_sensitive),
        (Operator::Include, Some(Value::Array(items))) => {
            items.iter().any(|item| equals(item, expected, rule.case_sensitive))
        }
        (Operator::Include, Some(actual)) => equals(actual, expected, rule.case_sensitive),
    }
}

/// Lines recorded for `rule`: a missing-value failure first when the key is
/// required but absent, then the operator result.
pub fn validate(args: &Map<String, Value>, rule: &ValidationRule) -> Vec<Check> {
    let arg = &rule.arg_name;
    let expected = rule.expected_text();
    let mut checks = Vec::with_capacity(2);

    let missing = args.get(arg).is_none_or(Value::is_null);
    if rule.operator != Operator::IsNull && missing {
        checks.push(Check {
            message: format!("should include {arg} in the arguments with value {expected}"),
            outcome: Outcome::failure(FailureKind::MissingValue, Error::MissingValue(arg.clone())),
        });
    }

    let outcome = if check(args, rule) {
        Outcome::Pass
    } else {
        Outcome::failure(FailureKind::WrongValue, Error::WrongValue(arg.clone()))
    };
    checks.push(Check { message: format!("{arg} is {} {expected}", rule.operator), outcome });

    checks
}

fn equals(actual: &Value, expected: &Value, case_sensitive: bool) -> bool {
    if case_sensitive {
        actual == expected
    } else {
        scalar_text(actual).to_lowercase() == scalar_text(expected).to_lowercase()
    }
}
