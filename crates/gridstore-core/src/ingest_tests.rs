//! Tests for the ingest module

#[cfg(test)]
mod tests {
    use crate::ingest::*;
    use crate::schema::{Row, StorageMode};
    use proptest::prelude::*;
    use serde_json::json;

    // =========================================================================
    // Adaptive chunk batch sizing
    // =========================================================================

    #[test]
    fn test_chunk_batch_size_very_wide() {
        // 50_000 budget, 10-row floor
        assert_eq!(chunk_batch_size(1200, JSON_BATCH_SIZE), 41);
        assert_eq!(chunk_batch_size(10_000, JSON_BATCH_SIZE), 10);
    }

    #[test]
    fn test_chunk_batch_size_wide() {
        // 100_000 budget, 50-row floor
        assert_eq!(chunk_batch_size(501, JSON_BATCH_SIZE), 199);
        assert_eq!(chunk_batch_size(1000, JSON_BATCH_SIZE), 100);
    }

    #[test]
    fn test_chunk_batch_size_medium() {
        // 200_000 budget, 100-row floor
        assert_eq!(chunk_batch_size(101, JSON_BATCH_SIZE), 1980);
        assert_eq!(chunk_batch_size(500, JSON_BATCH_SIZE), 400);
    }

    #[test]
    fn test_chunk_batch_size_falls_through_to_default() {
        assert_eq!(chunk_batch_size(50, JSON_BATCH_SIZE), 1000);
        assert_eq!(chunk_batch_size(100, COLUMNAR_BATCH_SIZE), 100);
        assert_eq!(chunk_batch_size(3, 250), 250);
    }

    #[test]
    fn test_default_batch_sizes() {
        assert_eq!(default_batch_size(StorageMode::JsonBlob), 1000);
        assert_eq!(default_batch_size(StorageMode::Columnar), 100);
    }

    // =========================================================================
    // INSERT statement rendering
    // =========================================================================

    #[test]
    fn test_columnar_insert_sql() {
        let columns = vec!["a".to_string(), "b".to_string()];
        let sql = columnar_insert_sql("data_table", &columns, 3);
        assert_eq!(
            sql,
            "INSERT INTO `data_table` (`a`, `b`) VALUES (?, ?), (?, ?), (?, ?)"
        );
    }

    #[test]
    fn test_json_insert_sql() {
        let sql = json_insert_sql("data_table", 2);
        assert_eq!(sql, "INSERT INTO `data_table` (json_data) VALUES (?), (?)");
    }

    #[test]
    fn test_insert_sql_quotes_identifiers() {
        let columns = vec!["weird`name".to_string()];
        let sql = columnar_insert_sql("t", &columns, 1);
        assert!(sql.contains("`weirdname`"));
    }

    // =========================================================================
    // Batching arithmetic
    // =========================================================================

    fn sample_rows(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| {
                let mut row = Row::new();
                row.insert("n".to_string(), json!(i));
                row
            })
            .collect()
    }

    proptest! {
        /// Splitting into groups covers every row exactly once, whatever the
        /// row count and group size.
        #[test]
        fn prop_batches_cover_all_rows(rows in 0usize..5000, batch in 1usize..2000) {
            let data = sample_rows(rows);
            let total: usize = data.chunks(batch).map(<[Row]>::len).sum();
            prop_assert_eq!(total, rows);

            let batches = data.chunks(batch).count();
            prop_assert_eq!(batches, rows.div_ceil(batch));
        }

        /// The adaptive size never drops below its tier floor.
        #[test]
        fn prop_chunk_batch_size_respects_floor(columns in 101usize..20_000) {
            let size = chunk_batch_size(columns, JSON_BATCH_SIZE);
            prop_assert!(size >= 10);
            if columns <= 500 {
                prop_assert!(size >= 100);
            } else if columns <= 1000 {
                prop_assert!(size >= 50);
            }
        }
    }
}
