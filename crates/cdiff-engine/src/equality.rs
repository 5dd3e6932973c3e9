//! Value equality: the single rule deciding whether two values differ.
//!
//! Arrays and objects are both treated as keyed containers (a list's keys are
//! its indices), so key order never matters and `[]` equals `{}`. Top-level
//! scalars compare by their string form, so `5` equals `"5"`. One quirk is
//! kept on purpose: `null`, `false` and `""` all have the empty string as
//! their string form and therefore compare equal. Below the top level, scalar
//! leaves compare strictly.

use std::borrow::Cow;

use serde_json::{Map, Number, Value};

/// Borrowed keyed view over an array or object.
#[derive(Clone, Copy, Debug)]
pub(crate) enum Container<'a> {
    List(&'a [Value]),
    Map(&'a Map<String, Value>),
}

impl<'a> Container<'a> {
    /// View `value` as a container, or `None` for scalars and null.
    pub(crate) fn of(value: &'a Value) -> Option<Self> {
        match value {
            Value::Array(items) => Some(Self::List(items)),
            Value::Object(map) => Some(Self::Map(map)),
            _ => None,
        }
    }

    pub(crate) fn len(&self) -> usize {
        match self {
            Self::List(items) => items.len(),
            Self::Map(map) => map.len(),
        }
    }

    /// Look up by key; list keys are canonical decimal indices.
    pub(crate) fn get(&self, key: &str) -> Option<&'a Value> {
        match self {
            Self::List(items) => key
                .parse::<usize>()
                .ok()
                .filter(|i| i.to_string() == key)
                .and_then(|i| items.get(i)),
            Self::Map(map) => map.get(key),
        }
    }

    pub(crate) fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Entries in container order.
    pub(crate) fn entries(&self) -> Box<dyn Iterator<Item = (Cow<'a, str>, &'a Value)> + 'a> {
        match *self {
            Self::List(items) => Box::new(
                items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (Cow::Owned(i.to_string()), v)),
            ),
            Self::Map(map) => Box::new(map.iter().map(|(k, v)| (Cow::Borrowed(k.as_str()), v))),
        }
    }

    /// Values in container order.
    pub(crate) fn values(&self) -> Box<dyn Iterator<Item = &'a Value> + 'a> {
        match *self {
            Self::List(items) => Box::new(items.iter()),
            Self::Map(map) => Box::new(map.values()),
        }
    }
}

/// Keys of `a` followed by the keys only `b` has, each once.
pub(crate) fn union_keys<'a>(a: Option<Container<'a>>, b: Option<Container<'a>>) -> Vec<Cow<'a, str>> {
    let mut keys: Vec<Cow<'a, str>> = Vec::new();
    if let Some(a) = a {
        keys.extend(a.entries().map(|(k, _)| k));
    }
    if let Some(b) = b {
        for (k, _) in b.entries() {
            if !a.is_some_and(|a| a.contains_key(&k)) {
                keys.push(k);
            }
        }
    }
    keys
}

/// Returns `true` if `a` and `b` differ.
pub fn value_changed(a: &Value, b: &Value) -> bool {
    if a == b {
        return false;
    }
    match (Container::of(a), Container::of(b)) {
        (Some(a), Some(b)) => !containers_equal(a, b),
        (None, None) => scalar_string(a) != scalar_string(b),
        _ => true,
    }
}

/// Deep container equality ignoring key order.
fn containers_equal(a: Container<'_>, b: Container<'_>) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.entries().all(|(key, av)| match b.get(&key) {
        None => false,
        Some(bv) => match (Container::of(av), Container::of(bv)) {
            (Some(ac), Some(bc)) => containers_equal(ac, bc),
            _ => av == bv,
        },
    })
}

/// String form of a scalar, as used for top-level comparison.
///
/// Containers have no string form and yield an empty string; callers only
/// pass scalars here.
pub fn scalar_string(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::Bool(true) => Cow::Borrowed("1"),
        Value::Bool(false) => Cow::Borrowed(""),
        Value::Number(n) => Cow::Owned(number_string(n)),
        Value::String(s) => Cow::Borrowed(s),
        Value::Array(_) | Value::Object(_) => Cow::Borrowed(""),
    }
}

/// Significant digits kept when a float is turned into a string.
const FLOAT_PRECISION: i32 = 14;

fn number_string(n: &Number) -> String {
    if n.is_i64() || n.is_u64() {
        return n.to_string();
    }
    match n.as_f64() {
        Some(f) => float_string(f),
        None => n.to_string(),
    }
}

/// Render a float with 14 significant digits and no trailing zeros, so `5.0`
/// reads as `5` and `0.1 + 0.2` as `0.3`. Exponents of 14 and above or below
/// -4 switch to `1.0E+15` notation.
fn float_string(f: f64) -> String {
    let scientific = format!("{:.*e}", (FLOAT_PRECISION - 1) as usize, f);
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((&scientific, "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if mantissa.starts_with('-') { "-" } else { "" };
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = match digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };

    if exponent < -4 || exponent >= FLOAT_PRECISION {
        let (lead, rest) = digits.split_at(1);
        let rest = if rest.is_empty() { "0" } else { rest };
        let exponent_sign = if exponent < 0 { '-' } else { '+' };
        format!("{sign}{lead}.{rest}E{exponent_sign}{}", exponent.abs())
    } else if exponent < 0 {
        let zeros = "0".repeat((-exponent - 1) as usize);
        format!("{sign}0.{zeros}{digits}")
    } else {
        let int_len = exponent as usize + 1;
        if digits.len() <= int_len {
            format!("{sign}{digits}{}", "0".repeat(int_len - digits.len()))
        } else {
            format!("{sign}{}.{}", &digits[..int_len], &digits[int_len..])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn identical_values_unchanged() {
        for v in [json!(null), json!(1), json!("a"), json!([1, [2]]), json!({"a": {"b": [1]}})] {
            assert!(!value_changed(&v, &v));
        }
    }

    #[test]
    fn key_order_ignored() {
        assert!(!value_changed(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!value_changed(
            &json!({"x": {"a": [1, 2], "b": null}}),
            &json!({"x": {"b": null, "a": [1, 2]}})
        ));
    }

    #[test]
    fn scalar_coercion() {
        assert!(!value_changed(&json!(5), &json!("5")));
        assert!(value_changed(&json!(5), &json!("6")));
        assert!(!value_changed(&json!(5.0), &json!(5)));
        assert!(!value_changed(&json!(1.5), &json!("1.5")));
        assert!(!value_changed(&json!(true), &json!("1")));
    }

    #[test]
    fn float_string_forms() {
        let cases = [
            (json!(5.0), "5"),
            (json!(-2.5), "-2.5"),
            (json!(0.0), "0"),
            (json!(0.1 + 0.2), "0.3"),
            (json!(123456789.12345678), "123456789.12346"),
            (json!(1e13), "10000000000000"),
            (json!(1e14), "1.0E+14"),
            (json!(1e15), "1.0E+15"),
            (json!(2.5e20), "2.5E+20"),
            (json!(0.0001), "0.0001"),
            (json!(0.00001), "1.0E-5"),
            (json!(-1.25e-7), "-1.25E-7"),
        ];
        for (value, expected) in cases {
            assert_eq!(scalar_string(&value), expected, "{value}");
        }
    }

    #[test]
    fn large_float_against_digit_string() {
        assert!(value_changed(&json!(1e15), &json!("1000000000000000")));
        assert!(!value_changed(&json!(1e15), &json!("1.0E+15")));
        assert!(!value_changed(&json!(1000000000000000_i64), &json!("1000000000000000")));
    }

    #[test]
    fn null_and_empty_string_quirk() {
        assert!(!value_changed(&json!(null), &json!("")));
        assert!(!value_changed(&json!(false), &json!(null)));
        assert!(value_changed(&json!(null), &json!("0")));
        assert!(value_changed(&json!(null), &json!(0)));
    }

    #[test]
    fn empty_containers_equal() {
        assert!(!value_changed(&json!([]), &json!({})));
    }

    #[test]
    fn list_equals_index_keyed_object() {
        assert!(!value_changed(&json!(["a", "b"]), &json!({"1": "b", "0": "a"})));
        assert!(value_changed(&json!(["a"]), &json!({"00": "a"})));
    }

    #[test]
    fn list_order_matters() {
        assert!(value_changed(&json!([1, 2]), &json!([2, 1])));
    }

    #[test]
    fn container_versus_scalar() {
        assert!(value_changed(&json!([]), &json!(null)));
        assert!(value_changed(&json!(""), &json!({})));
        assert!(value_changed(&json!({"a": 1}), &json!("a")));
    }

    #[test]
    fn missing_key_detected() {
        assert!(value_changed(&json!({"a": 1}), &json!({"b": 1})));
        assert!(value_changed(&json!({"a": 1}), &json!({"a": 1, "b": null})));
    }

    #[test]
    fn nested_leaves_compare_strictly() {
        assert!(value_changed(&json!({"a": 5}), &json!({"a": "5"})));
        assert!(value_changed(&json!([null]), &json!([""])));
    }

    fn arb_value() -> impl Strategy<Value = Value> {
        let leaf = prop_oneof![
            Just(Value::Null),
            any::<bool>().prop_map(Value::Bool),
            any::<i64>().prop_map(Value::from),
            "[a-z0-9]{0,6}".prop_map(Value::from),
        ];
        leaf.prop_recursive(4, 32, 6, |inner| {
            prop_oneof![
                prop::collection::vec(inner.clone(), 0..5).prop_map(Value::Array),
                prop::collection::btree_map("[a-z]{1,4}", inner, 0..5)
                    .prop_map(|m| Value::Object(m.into_iter().collect())),
            ]
        })
    }

    fn reversed_keys(value: &Value) -> Value {
        match value {
            Value::Object(map) => Value::Object(
                map.iter()
                    .rev()
                    .map(|(k, v)| (k.clone(), reversed_keys(v)))
                    .collect(),
            ),
            Value::Array(items) => Value::Array(items.iter().map(reversed_keys).collect()),
            other => other.clone(),
        }
    }

    proptest! {
        #[test]
        fn equality_is_reflexive(v in arb_value()) {
            prop_assert!(!value_changed(&v, &v));
        }

        #[test]
        fn equality_ignores_key_order(v in arb_value()) {
            prop_assert!(!value_changed(&v, &reversed_keys(&v)));
        }

        #[test]
        fn equality_is_symmetric(a in arb_value(), b in arb_value()) {
            prop_assert_eq!(value_changed(&a, &b), value_changed(&b, &a));
        }
    }
}
