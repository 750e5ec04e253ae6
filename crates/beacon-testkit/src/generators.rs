//! Proptest generators for property-based testing.

use proptest::prelude::*;

use beacon_core::{Call, CallCategory, PropertyMap, Value};

/// Method names covering every dispatch group, underscore aliases included.
pub fn method_name() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("setAccount"),
        Just("_setAccount"),
        Just("identify"),
        Just("set"),
        Just("setOnce"),
        Just("unset"),
        Just("trackEvent"),
        Just("_trackEvent"),
        Just("trackPageview"),
        Just("bogus"),
    ]
    .prop_map(String::from)
}

/// A queue of method names, up to `max_len` long.
pub fn method_queue(max_len: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(method_name(), 0..=max_len)
}

/// Build calls whose single argument is their position in `methods`.
pub fn indexed_calls(methods: &[String]) -> Vec<Call> {
    methods
        .iter()
        .enumerate()
        .map(|(i, method)| Call::new(method.as_str()).arg(i as u64))
        .collect()
}

/// The position a call built by [`indexed_calls`] carries.
pub fn call_index(call: &Call) -> Option<usize> {
    call.args().first()?.as_value()?.as_u64().map(|i| i as usize)
}

/// Positions in the order calls must be dispatched.
///
/// Reference model: last account call, then configuration, then tracking.
pub fn expected_order(methods: &[String]) -> Vec<usize> {
    let category = |i: &usize| CallCategory::of(&methods[*i]);
    let all = 0..methods.len();

    let account = all
        .clone()
        .filter(|i| category(i) == CallCategory::Account)
        .last();
    let config = all
        .clone()
        .filter(|i| category(i) == CallCategory::Config);
    let tracking = all.filter(|i| category(i) == CallCategory::Tracking);

    account.into_iter().chain(config).chain(tracking).collect()
}

/// A scalar JSON value.
pub fn scalar() -> impl Strategy<Value = Value> {
    prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::from),
        any::<i64>().prop_map(Value::from),
        "[a-zA-Z0-9 ]{0,16}".prop_map(Value::from),
    ]
}

/// A flat property map.
pub fn property_map(max_len: usize) -> impl Strategy<Value = PropertyMap> {
    prop::collection::btree_map("[a-z][a-z0-9_]{0,11}", scalar(), 0..=max_len)
        .prop_map(|props| props.into_iter().collect())
}
