//! Tests for the built-in series and frame comparator.

use nbcheck::{
    grade::{PandasStyleComparator, TabularComparator, TabularOptions},
    tabular::{DataFrame, Series},
};

fn compare_series(left: &Series, right: &Series, options: &TabularOptions) -> Result<(), String> {
    PandasStyleComparator
        .assert_series_equal(left, right, "s", options)
        .map_err(|e| e.to_string())
}

fn compare_frames(
    left: &DataFrame,
    right: &DataFrame,
    options: &TabularOptions,
) -> Result<(), String> {
    PandasStyleComparator
        .assert_frame_equal(left, right, "df", options)
        .map_err(|e| e.to_string())
}

#[test]
fn identical_series_pass() {
    let s = Series::new(vec![1.5, 2.5]).with_name("price");
    assert!(compare_series(&s, &s.clone(), &TabularOptions::default()).is_ok());
}

#[test]
fn length_difference_lists_both_indexes() {
    let left = Series::new(vec![1i64, 2]);
    let right = Series::new(vec![1i64, 2, 3]);

    let err = compare_series(&left, &right, &TabularOptions::default()).unwrap_err();
    assert_eq!(
        err,
        "s are different\n\ns length are different\n[left]:  2, [0, 1]\n[right]: 3, [0, 1, 2]"
    );
}

#[test]
fn dtype_difference_is_an_attribute_mismatch() {
    let left = Series::new(vec![1i64, 2]);
    let right = Series::new(vec![1.0, 2.0]);

    let err = compare_series(&left, &right, &TabularOptions::default()).unwrap_err();
    assert_eq!(
        err,
        "Attributes of s are different\n\nAttribute \"dtype\" are different\n[left]:  \
         int64\n[right]: float64"
    );

    let relaxed = TabularOptions {
        check_dtype: false,
        ..TabularOptions::default()
    };
    assert!(compare_series(&left, &right, &relaxed).is_ok());
}

#[test]
fn name_difference_shows_both_names() {
    let left = Series::new(vec![1i64]).with_name("a");
    let right = Series::new(vec![1i64]).with_name("b");

    let err = compare_series(&left, &right, &TabularOptions::default()).unwrap_err();
    assert!(err.contains("Attribute \"name\" are different"));
    assert!(err.contains("[left]:  'a'\n[right]: 'b'"));

    let relaxed = TabularOptions {
        check_names: false,
        ..TabularOptions::default()
    };
    assert!(compare_series(&left, &right, &relaxed).is_ok());
}

#[test]
fn value_difference_lists_only_differing_rows() {
    let left = Series::new(vec![1.0, 2.0, 3.0]);
    let right = Series::new(vec![1.0, 2.0, 4.0]);

    let err = compare_series(&left, &right, &TabularOptions::default()).unwrap_err();
    assert_eq!(
        err,
        "s values are different (33.33333 %)\n[index]: [2]\n[left]:  [3.0]\n[right]: [4.0]"
    );
}

#[test]
fn float_values_use_the_tolerance_unless_exact() {
    let left = Series::new(vec![1.0, 2.0]);
    let right = Series::new(vec![1.0, 2.0 + 1e-9]);
    assert!(compare_series(&left, &right, &TabularOptions::default()).is_ok());

    let exact = TabularOptions {
        check_exact: true,
        ..TabularOptions::default()
    };
    let err = compare_series(&left, &right, &exact).unwrap_err();
    assert!(err.starts_with("s values are different (50.0 %)"));
}

#[test]
fn aligned_missing_values_are_equal() {
    let left = Series::new(vec![1.0, f64::NAN]);
    let right = Series::new(vec![1.0, f64::NAN]);
    assert!(compare_series(&left, &right, &TabularOptions::default()).is_ok());

    let shifted = Series::new(vec![f64::NAN, 1.0]);
    assert!(compare_series(&left, &shifted, &TabularOptions::default()).is_err());
}

#[test]
fn index_difference_is_reported_before_values() {
    let left = Series::new(vec![1i64, 2])
        .with_index(vec!["a", "b"])
        .expect("index");
    let right = Series::new(vec![1i64, 2]);

    let err = compare_series(&left, &right, &TabularOptions::default()).unwrap_err();
    assert_eq!(
        err,
        "s.index are different\n\ns.index values are different (100.0 %)\n[left]:  Index(['a', \
         'b'], dtype='object')\n[right]: Index([0, 1], dtype='int64')"
    );

    let relaxed = TabularOptions {
        check_index: false,
        ..TabularOptions::default()
    };
    assert!(compare_series(&left, &right, &relaxed).is_ok());
}

#[test]
fn frame_shape_difference_is_reported_first() {
    let left = DataFrame::new(vec![("a", vec![1i64, 2])]).expect("frame");
    let right = DataFrame::new(vec![("a", vec![1i64, 2]), ("b", vec![3i64, 4])]).expect("frame");

    let err = compare_frames(&left, &right, &TabularOptions::default()).unwrap_err();
    assert_eq!(
        err,
        "df are different\n\ndf shape mismatch\n[left]:  (2, 1)\n[right]: (2, 2)"
    );
}

#[test]
fn column_order_matters_unless_check_like() {
    let left = DataFrame::new(vec![("b", vec![3i64, 4]), ("a", vec![1i64, 2])]).expect("frame");
    let right = DataFrame::new(vec![("a", vec![1i64, 2]), ("b", vec![3i64, 4])]).expect("frame");

    let err = compare_frames(&left, &right, &TabularOptions::default()).unwrap_err();
    assert_eq!(
        err,
        "df.columns are different\n\ndf.columns values are different (100.0 %)\n[left]:  \
         Index(['b', 'a'], dtype='object')\n[right]: Index(['a', 'b'], dtype='object')"
    );

    let like = TabularOptions {
        check_like: true,
        ..TabularOptions::default()
    };
    assert!(compare_frames(&left, &right, &like).is_ok());
}

#[test]
fn column_value_difference_names_the_column() {
    let left = DataFrame::new(vec![("a", vec![1i64, 2]), ("b", vec![3i64, 4])]).expect("frame");
    let right = DataFrame::new(vec![("a", vec![1i64, 2]), ("b", vec![3i64, 5])]).expect("frame");

    let err = PandasStyleComparator
        .assert_frame_equal(&left, &right, "df", &TabularOptions::default())
        .unwrap_err();
    assert_eq!(err.obj(), "df");
    assert_eq!(
        err.message(),
        "df.iloc[:, 1] (column name=\"b\") values are different (50.0 %)\n[index]: [1]\n[left]:  \
         [4]\n[right]: [5]"
    );
}

#[test]
fn identical_frames_pass() {
    let frame = DataFrame::new(vec![("x", vec![0.5, 1.5]), ("y", vec![2.5, 3.5])])
        .expect("frame")
        .with_index(vec!["r1", "r2"])
        .expect("index");
    assert!(compare_frames(&frame, &frame.clone(), &TabularOptions::default()).is_ok());
}

#[test]
fn check_like_ignores_row_order() {
    let left = DataFrame::new(vec![("a", vec![2i64, 1]), ("b", vec![4i64, 3])])
        .expect("frame")
        .with_index(vec![1i64, 0])
        .expect("index");
    let right = DataFrame::new(vec![("a", vec![1i64, 2]), ("b", vec![3i64, 4])]).expect("frame");

    let err = compare_frames(&left, &right, &TabularOptions::default()).unwrap_err();
    assert!(err.starts_with("df.index are different"));
    assert!(err.contains("[left]:  Index([1, 0], dtype='int64')"));

    let like = TabularOptions {
        check_like: true,
        ..TabularOptions::default()
    };
    assert!(compare_frames(&left, &right, &like).is_ok());
}

#[test]
fn check_like_still_compares_aligned_values() {
    let left = DataFrame::new(vec![("a", vec![2i64, 9])])
        .expect("frame")
        .with_index(vec!["y", "x"])
        .expect("index");
    let right = DataFrame::new(vec![("a", vec![1i64, 2])])
        .expect("frame")
        .with_index(vec!["x", "y"])
        .expect("index");
    let like = TabularOptions {
        check_like: true,
        ..TabularOptions::default()
    };

    let err = compare_frames(&left, &right, &like).unwrap_err();
    assert_eq!(
        err,
        "df.iloc[:, 0] (column name=\"a\") values are different (50.0 %)\n[index]: \
         ['x']\n[left]:  [9]\n[right]: [1]"
    );
}

#[test]
fn check_like_reports_differing_row_labels_sorted() {
    let left = DataFrame::new(vec![("a", vec![1i64, 2])])
        .expect("frame")
        .with_index(vec![5i64, 0])
        .expect("index");
    let right = DataFrame::new(vec![("a", vec![1i64, 2])]).expect("frame");
    let like = TabularOptions {
        check_like: true,
        ..TabularOptions::default()
    };

    let err = compare_frames(&left, &right, &like).unwrap_err();
    assert!(err.contains("[left]:  Index([0, 5], dtype='int64')"));
    assert!(err.contains("[right]: Index([0, 1], dtype='int64')"));
}

#[test]
fn label_messages_show_the_index_dtype() {
    let left = Series::new(vec![1i64, 2])
        .with_index(vec![0.5, 1.5])
        .expect("index");
    let right = Series::new(vec![1i64, 2]);

    let err = compare_series(&left, &right, &TabularOptions::default()).unwrap_err();
    assert!(err.contains("[left]:  Index([0.5, 1.5], dtype='float64')"));
    assert!(err.contains("[right]: Index([0, 1], dtype='int64')"));
}
