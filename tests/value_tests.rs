//! Tests for value rendering, equality and JSON import.

use std::collections::BTreeMap;

use nbcheck::{
    tabular::{DataFrame, Series},
    value::{DType, Number, NumericScalar, Value, ValueError},
};
use serde_json::json;

#[test]
fn scalars_render_like_the_notebook() {
    assert_eq!(Value::Float(1.0).to_string(), "1.0");
    assert_eq!(Value::Float(0.1).to_string(), "0.1");
    assert_eq!(Value::Float(f64::NAN).to_string(), "nan");
    assert_eq!(Value::Float(f64::NEG_INFINITY).to_string(), "-inf");
    assert_eq!(Value::Int(-3).to_string(), "-3");
    assert_eq!(Value::Bool(true).to_string(), "True");
    assert_eq!(Value::None.to_string(), "None");
    assert_eq!(Value::from(NumericScalar::int64(7)).to_string(), "7");
    assert_eq!(Value::from(NumericScalar::float64(2.0)).to_string(), "2.0");
}

#[test]
fn strings_are_quoted_only_inside_containers() {
    assert_eq!(Value::from("hello").to_string(), "hello");
    assert_eq!(Value::from("hello").repr(), "'hello'");
    assert_eq!(Value::from("it's").repr(), "\"it's\"");

    let list = Value::List(vec![Value::Int(1), Value::from("a"), Value::Float(2.5)]);
    assert_eq!(list.to_string(), "[1, 'a', 2.5]");
}

#[test]
fn tuples_and_dicts_render_with_their_literal_syntax() {
    assert_eq!(Value::Tuple(vec![Value::Int(1)]).to_string(), "(1,)");
    assert_eq!(Value::Tuple(vec![Value::Int(1), Value::Int(2)]).to_string(), "(1, 2)");

    let mut map = BTreeMap::new();
    map.insert("b".to_string(), Value::Bool(false));
    map.insert("a".to_string(), Value::Int(1));
    assert_eq!(Value::Dict(map).to_string(), "{'a': 1, 'b': False}");
}

#[test]
fn numbers_compare_across_kinds() {
    assert_eq!(Value::Int(1), Value::Float(1.0));
    assert_eq!(Value::Bool(true), Value::Int(1));
    assert_eq!(Value::from(NumericScalar::int64(3)), Value::Int(3));
    assert_eq!(Value::from(NumericScalar::float64(0.5)), Value::Float(0.5));
    assert_ne!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Int(1), Value::from("1"));
}

#[test]
fn containers_require_the_same_kind() {
    let items = vec![Value::Int(1), Value::Int(2)];
    assert_ne!(Value::List(items.clone()), Value::Tuple(items.clone()));
    assert_eq!(
        Value::List(items),
        Value::List(vec![Value::Float(1.0), Value::Float(2.0)])
    );
}

#[test]
fn type_names_follow_the_notebook_classes() {
    let scalar = Value::from(NumericScalar::int64(1));
    assert_eq!(scalar.type_name(), "int64");
    assert_eq!(scalar.qualified_type_name(), "numpy.int64");
    assert_eq!(Value::from(NumericScalar::bool_(true)).type_name(), "bool_");
    assert_eq!(Value::Int(1).qualified_type_name(), "int");
    assert_eq!(Value::None.type_name(), "NoneType");

    let series = Value::from(Series::new(vec![1i64]));
    assert_eq!(series.type_name(), "Series");
    assert_eq!(series.qualified_type_name(), "pandas.core.series.Series");
}

#[test]
fn booleans_are_instances_of_int_but_not_the_reverse() {
    assert!(Value::Bool(true).is_instance_of(&Value::Int(0)));
    assert!(!Value::Int(1).is_instance_of(&Value::Bool(true)));
    assert!(!Value::Int(1).is_instance_of(&Value::Float(1.0)));
    assert!(Value::from(vec![1i64]).is_instance_of(&Value::List(vec![])));
}

#[test]
fn scalars_reject_payloads_their_dtype_cannot_hold() {
    let err = NumericScalar::new(DType::Int64, Number::Float(1.5)).unwrap_err();
    assert!(matches!(err, ValueError::InvalidScalar { dtype: DType::Int64, .. }));

    let coerced = NumericScalar::new(DType::Float32, Number::Int(2)).expect("int into float");
    assert!(coerced.value().is_float());
    assert_eq!(coerced.dtype(), DType::Float32);
}

#[test]
fn series_prints_index_values_and_footer() {
    let series = Series::new(vec![1i64, 20, 3]).with_name("x");
    assert_eq!(series.dtype(), DType::Int64);
    assert_eq!(series.to_string(), "0     1\n1    20\n2     3\nName: x, dtype: int64");

    let empty = Series::new(Vec::<i64>::new());
    assert_eq!(empty.to_string(), "Series([], dtype: object)");
}

#[test]
fn series_dtype_is_inferred_from_values() {
    assert_eq!(Series::new(vec![1.0, 2.0]).dtype(), DType::Float64);
    assert_eq!(Series::new(vec![true, false]).dtype(), DType::Bool);
    assert_eq!(Series::new(vec!["a", "b"]).dtype(), DType::Object);
    assert_eq!(
        Series::new(vec![Value::Int(1), Value::Float(2.5)]).dtype(),
        DType::Float64
    );
}

#[test]
fn frame_rejects_ragged_columns_and_bad_index() {
    let ragged = DataFrame::new(vec![("a", vec![1i64, 2]), ("b", vec![3i64])]);
    assert!(matches!(ragged, Err(ValueError::Shape(_))));

    let frame = DataFrame::new(vec![("a", vec![1i64, 2])]).expect("frame");
    assert!(frame.clone().with_index(vec!["x"]).is_err());

    let indexed = frame.with_index(vec!["x", "y"]).expect("index");
    assert_eq!(indexed.columns()[0].index(), indexed.index());
}

#[test]
fn json_maps_onto_value_kinds() {
    let value = Value::from_json(&json!([1, 2.5, "s", null, true])).expect("decode");
    assert_eq!(
        value,
        Value::List(vec![
            Value::Int(1),
            Value::Float(2.5),
            Value::from("s"),
            Value::None,
            Value::Bool(true),
        ])
    );

    let dict = Value::from_json(&json!({"a": 1})).expect("decode");
    assert!(matches!(dict, Value::Dict(_)));
}

#[test]
fn json_tags_encode_tuples_scalars_series_and_frames() {
    let tuple = Value::from_json(&json!({"$type": "tuple", "items": [1, 2]})).expect("tuple");
    assert!(matches!(tuple, Value::Tuple(ref items) if items.len() == 2));

    let scalar =
        Value::from_json(&json!({"$type": "numpy", "dtype": "int64", "value": 4})).expect("scalar");
    assert_eq!(scalar.qualified_type_name(), "numpy.int64");

    let series = Value::from_json(&json!({
        "$type": "series",
        "name": "price",
        "index": ["a", "b"],
        "values": [1.5, 2.5]
    }))
    .expect("series");
    let Value::Series(series) = series else {
        panic!("expected a series");
    };
    assert_eq!(series.name(), Some("price"));
    assert_eq!(series.index(), &[Value::from("a"), Value::from("b")]);

    let frame = Value::from_json(&json!({
        "$type": "frame",
        "columns": {"a": [1, 2], "b": [3, 4]}
    }))
    .expect("frame");
    let Value::Frame(frame) = frame else {
        panic!("expected a frame");
    };
    assert_eq!(frame.shape(), (2, 2));
}

#[test]
fn json_import_reports_bad_tags() {
    let err = Value::from_json(&json!({"$type": "set", "items": []})).unwrap_err();
    assert_eq!(err, ValueError::UnknownTag("set".to_string()));

    let err = Value::from_json(&json!({"$type": "numpy", "dtype": "int128", "value": 1}))
        .unwrap_err();
    assert_eq!(err, ValueError::UnknownDType("int128".to_string()));

    let err = Value::from_json(&json!({"$type": "tuple"})).unwrap_err();
    assert!(matches!(err, ValueError::MissingField { field: "items", .. }));

    let err = Value::from_json(&json!({"$type": "numpy", "dtype": "int64", "value": 1.5}))
        .unwrap_err();
    assert!(matches!(err, ValueError::InvalidScalar { .. }));
}

#[test]
fn large_ints_are_not_rounded_when_compared_to_floats() {
    let big = 9_007_199_254_740_993i64; // 2^53 + 1
    assert_ne!(Value::Int(big), Value::Float(9_007_199_254_740_992.0));
    assert_eq!(Value::Int(big - 1), Value::Float(9_007_199_254_740_992.0));
    assert_ne!(Value::Int(i64::MAX), Value::Float(9_223_372_036_854_775_808.0));
    assert_ne!(Value::Int(2), Value::Float(2.5));
    assert_eq!(Value::Bool(false), Value::Float(0.0));
}

#[test]
fn extreme_floats_use_exponent_notation() {
    assert_eq!(Value::Float(1e-7).to_string(), "1e-07");
    assert_eq!(Value::Float(-2.5e-5).to_string(), "-2.5e-05");
    assert_eq!(Value::Float(1.5e20).to_string(), "1.5e+20");
    assert_eq!(Value::Float(1e16).to_string(), "1e+16");
    assert_eq!(Value::Float(1e-4).to_string(), "0.0001");
    assert_eq!(Value::Float(1e15).to_string(), "1000000000000000.0");
    assert_eq!(Value::Float(0.0).to_string(), "0.0");
    assert_eq!(Value::Float(1.5e300).to_string(), "1.5e+300");
}
