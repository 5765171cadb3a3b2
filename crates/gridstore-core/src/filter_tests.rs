//! Tests for the filter module

#[cfg(test)]
mod tests {
    use crate::error::Error;
    use crate::filter::*;
    use crate::schema::Row;
    use serde_json::{json, Value};

    fn filter(column: &str, operator: FilterOp, value: Option<&str>) -> Filter {
        Filter {
            column: column.to_string(),
            operator,
            value: value.map(String::from),
        }
    }

    fn row(pairs: &[(&str, Value)]) -> Row {
        let mut map = Row::new();
        for (key, value) in pairs {
            map.insert((*key).to_string(), value.clone());
        }
        map
    }

    // =========================================================================
    // Wire format
    // =========================================================================

    #[test]
    fn test_operator_wire_names() {
        let parsed: Filter = serde_json::from_str(
            r#"{"column": "name", "operator": "starts_with", "value": "a"}"#,
        )
        .unwrap();
        assert_eq!(parsed.operator, FilterOp::StartsWith);

        let parsed: Filter =
            serde_json::from_str(r#"{"column": "name", "operator": "is_not_empty"}"#).unwrap();
        assert_eq!(parsed.operator, FilterOp::IsNotEmpty);
        assert_eq!(parsed.value, None);

        let parsed: Filter = serde_json::from_str(
            r#"{"column": "n", "operator": "greater_than_or_equal", "value": "5"}"#,
        )
        .unwrap();
        assert_eq!(parsed.operator, FilterOp::GreaterThanOrEqual);
    }

    #[test]
    fn test_unknown_operator_is_rejected() {
        let result: Result<Filter, _> =
            serde_json::from_str(r#"{"column": "a", "operator": "regex", "value": "x"}"#);
        assert!(result.is_err());
    }

    // =========================================================================
    // SQL translation (columnar mode)
    // =========================================================================

    #[test]
    fn test_sql_contains() {
        let (sql, params) = filter("name", FilterOp::Contains, Some("ada")).to_sql();
        assert_eq!(sql, "`name` LIKE ?");
        assert_eq!(params, vec!["%ada%"]);
    }

    #[test]
    fn test_sql_equals() {
        let (sql, params) = filter("name", FilterOp::Equals, Some("ada")).to_sql();
        assert_eq!(sql, "`name` = ?");
        assert_eq!(params, vec!["ada"]);
    }

    #[test]
    fn test_sql_prefix_suffix() {
        let (sql, params) = filter("name", FilterOp::StartsWith, Some("a")).to_sql();
        assert_eq!(sql, "`name` LIKE ?");
        assert_eq!(params, vec!["a%"]);

        let (sql, params) = filter("name", FilterOp::EndsWith, Some("a")).to_sql();
        assert_eq!(sql, "`name` LIKE ?");
        assert_eq!(params, vec!["%a"]);
    }

    #[test]
    fn test_sql_emptiness() {
        let (sql, params) = filter("name", FilterOp::IsEmpty, None).to_sql();
        assert_eq!(sql, "(`name` IS NULL OR `name` = '')");
        assert!(params.is_empty());

        let (sql, params) = filter("name", FilterOp::IsNotEmpty, None).to_sql();
        assert_eq!(sql, "(`name` IS NOT NULL AND `name` != '')");
        assert!(params.is_empty());
    }

    #[test]
    fn test_sql_numeric_comparisons_cast() {
        let (sql, params) = filter("n", FilterOp::GreaterThan, Some("1")).to_sql();
        assert_eq!(sql, "CAST(`n` AS DECIMAL) > ?");
        assert_eq!(params, vec!["1"]);

        let (sql, _) = filter("n", FilterOp::LessThanOrEqual, Some("1")).to_sql();
        assert_eq!(sql, "CAST(`n` AS DECIMAL) <= ?");
    }

    #[test]
    fn test_where_clause_joins_with_and() {
        let filters = vec![
            filter("a", FilterOp::Contains, Some("x")),
            filter("b", FilterOp::GreaterThan, Some("2")),
        ];
        let columns = vec!["a".to_string(), "b".to_string()];

        let (clause, params) = where_clause(&filters, &columns).unwrap().unwrap();
        assert_eq!(clause, "`a` LIKE ? AND CAST(`b` AS DECIMAL) > ?");
        assert_eq!(params, vec!["%x%", "2"]);
    }

    #[test]
    fn test_where_clause_empty_filter_list() {
        let columns = vec!["a".to_string()];
        assert!(where_clause(&[], &columns).unwrap().is_none());
    }

    #[test]
    fn test_where_clause_rejects_unknown_column() {
        let filters = vec![filter("nope", FilterOp::Equals, Some("x"))];
        let columns = vec!["a".to_string()];
        assert!(matches!(
            where_clause(&filters, &columns).unwrap_err(),
            Error::UnknownColumn(name) if name == "nope"
        ));
    }

    // =========================================================================
    // In-memory evaluation (JSON-blob mode)
    // =========================================================================

    #[test]
    fn test_contains_is_case_insensitive() {
        let r = row(&[("name", json!("Ada Lovelace"))]);
        assert!(filter("name", FilterOp::Contains, Some("lovelace")).matches(&r));
        assert!(!filter("name", FilterOp::Contains, Some("turing")).matches(&r));
    }

    #[test]
    fn test_contains_renders_numbers() {
        let r = row(&[("n", json!(1234))]);
        assert!(filter("n", FilterOp::Contains, Some("23")).matches(&r));
    }

    #[test]
    fn test_starts_and_ends_with() {
        let r = row(&[("name", json!("Ada"))]);
        assert!(filter("name", FilterOp::StartsWith, Some("ad")).matches(&r));
        assert!(filter("name", FilterOp::EndsWith, Some("DA")).matches(&r));
        assert!(!filter("name", FilterOp::StartsWith, Some("da")).matches(&r));
    }

    #[test]
    fn test_loose_equality_number_vs_string() {
        // "42" under columnar mode is an exact string match; under JSON mode
        // the untyped payload keeps 42 as a number and loose equality must
        // still agree.
        let r = row(&[("n", json!(42))]);
        assert!(filter("n", FilterOp::Equals, Some("42")).matches(&r));
        assert!(!filter("n", FilterOp::Equals, Some("43")).matches(&r));

        let r = row(&[("n", json!("42"))]);
        assert!(filter("n", FilterOp::Equals, Some("42")).matches(&r));
    }

    #[test]
    fn test_loose_equality_null_never_equals_text() {
        let r = row(&[("n", Value::Null)]);
        assert!(!filter("n", FilterOp::Equals, Some("null")).matches(&r));
        assert!(!filter("n", FilterOp::Equals, Some("")).matches(&r));
    }

    #[test]
    fn test_is_empty() {
        assert!(filter("x", FilterOp::IsEmpty, None).matches(&row(&[("x", Value::Null)])));
        assert!(filter("x", FilterOp::IsEmpty, None).matches(&row(&[("x", json!(""))])));
        // Missing column counts as empty.
        assert!(filter("x", FilterOp::IsEmpty, None).matches(&row(&[("y", json!(1))])));
        assert!(!filter("x", FilterOp::IsEmpty, None).matches(&row(&[("x", json!("v"))])));

        assert!(filter("x", FilterOp::IsNotEmpty, None).matches(&row(&[("x", json!(0))])));
        assert!(!filter("x", FilterOp::IsNotEmpty, None).matches(&row(&[("x", Value::Null)])));
    }

    #[test]
    fn test_numeric_comparisons() {
        let r = row(&[("n", json!("10"))]);
        assert!(filter("n", FilterOp::GreaterThan, Some("9")).matches(&r));
        assert!(!filter("n", FilterOp::GreaterThan, Some("10")).matches(&r));
        assert!(filter("n", FilterOp::GreaterThanOrEqual, Some("10")).matches(&r));
        assert!(filter("n", FilterOp::LessThan, Some("11")).matches(&r));
        assert!(filter("n", FilterOp::LessThanOrEqual, Some("10")).matches(&r));
    }

    #[test]
    fn test_numeric_comparison_unparsable_is_false() {
        let r = row(&[("n", json!("abc"))]);
        assert!(!filter("n", FilterOp::GreaterThan, Some("1")).matches(&r));
        assert!(!filter("n", FilterOp::LessThan, Some("1")).matches(&r));
    }

    #[test]
    fn test_numeric_comparison_null_coerces_to_zero() {
        let r = row(&[("n", Value::Null)]);
        assert!(filter("n", FilterOp::LessThan, Some("1")).matches(&r));
        assert!(filter("n", FilterOp::GreaterThanOrEqual, Some("0")).matches(&r));
    }

    #[test]
    fn test_numeric_comparison_missing_column_is_false() {
        let r = row(&[("other", json!(5))]);
        assert!(!filter("n", FilterOp::GreaterThan, Some("0")).matches(&r));
        assert!(!filter("n", FilterOp::LessThan, Some("0")).matches(&r));
    }

    #[test]
    fn test_all_filters_and_combined() {
        let r = row(&[("a", json!("alpha")), ("b", json!(7))]);
        let filters = vec![
            filter("a", FilterOp::Contains, Some("alp")),
            filter("b", FilterOp::GreaterThan, Some("5")),
        ];
        assert!(filters.iter().all(|f| f.matches(&r)));

        let filters = vec![
            filter("a", FilterOp::Contains, Some("alp")),
            filter("b", FilterOp::GreaterThan, Some("9")),
        ];
        assert!(!filters.iter().all(|f| f.matches(&r)));
    }
}
