use polars::prelude::*;

use crate::error::Result;

const ROW_ORDER: &str = "__climalog_row";

/// Sorts by `column` descending, nulls last. Ties keep their relative order.
pub fn sort_descending(df: DataFrame, column: &str) -> Result<DataFrame> {
    let sorted = df
        .lazy()
        .sort(
            [column],
            SortMultipleOptions::default()
                .with_order_descending(true)
                .with_nulls_last(true)
                .with_maintain_order(true),
        )
        .collect()?;
    Ok(sorted)
}

/// Joins `right` onto `left` by `key`, returning rows in the order of `left`.
/// Right-hand columns whose names collide with left-hand ones get a `_right`
/// suffix; left-hand names are never changed.
///
/// Null keys match nothing, not even another null: a row without a timestamp
/// survives a left join with null right-hand columns and is dropped by an
/// inner join.
pub fn join_in_left_order(
    left: &DataFrame,
    right: &DataFrame,
    key: &str,
    how: JoinType,
) -> Result<DataFrame> {
    let joined = left
        .clone()
        .lazy()
        .with_row_index(ROW_ORDER, None)
        .join(
            right.clone().lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(how),
        )
        .sort(
            [ROW_ORDER],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()?;

    Ok(joined.drop(ROW_ORDER)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn left() -> DataFrame {
        df![
            "date_time" => [Some("2024-01-01 00:15"), None, Some("2024-01-01 00:00")],
            "kwh" => [2.0, 9.0, 1.0],
        ]
        .unwrap()
    }

    fn right() -> DataFrame {
        df![
            "date_time" => [None, Some("2024-01-01 00:00"), Some("2024-01-01 00:15")],
            "kwh" => [99.0, 10.0, 20.0],
        ]
        .unwrap()
    }

    #[test]
    fn null_keys_never_pair() {
        let inner = join_in_left_order(&left(), &right(), "date_time", JoinType::Inner).unwrap();
        assert_eq!(inner.height(), 2);
        assert_eq!(inner.column("date_time").unwrap().null_count(), 0);

        let joined = join_in_left_order(&left(), &right(), "date_time", JoinType::Left).unwrap();
        assert_eq!(joined.height(), 3);
        let matched: Vec<Option<f64>> = joined
            .column("kwh_right")
            .unwrap()
            .f64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(matched, vec![Some(20.0), None, Some(10.0)]);
    }

    #[test]
    fn clashing_columns_are_suffixed_on_the_right_only() {
        let joined = join_in_left_order(&left(), &right(), "date_time", JoinType::Left).unwrap();
        assert_eq!(joined.get_column_names(), ["date_time", "kwh", "kwh_right"]);
        assert!(joined.column(ROW_ORDER).is_err());
    }

    #[test]
    fn descending_sort_puts_nulls_last() {
        let sorted = sort_descending(left(), "date_time").unwrap();
        let keys: Vec<Option<&str>> = sorted
            .column("date_time")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(
            keys,
            vec![Some("2024-01-01 00:15"), Some("2024-01-01 00:00"), None]
        );
    }
}
