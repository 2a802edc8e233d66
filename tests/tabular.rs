#[cfg(test)]
mod codec {
    use tabula_engine::tabular::codec::{format_line, parse_line};

    #[test]
    fn round_trip_preserves_fields() {
        let fields = vec![
            "plain".to_string(),
            "with, comma".to_string(),
            "with \"quotes\"".to_string(),
            "".to_string(),
            " spaced ".to_string(),
        ];

        assert_eq!(parse_line(&format_line(&fields)), fields);
    }

    #[test]
    fn format_quotes_every_field_and_doubles_quotes() {
        let line = format_line(&["a", "b\"c"]);
        assert_eq!(line, "\"a\",\"b\"\"c\"\n");
    }

    #[test]
    fn parse_handles_mixed_quoting() {
        let fields = parse_line("plain,\"quoted, with comma\",tail\n");
        assert_eq!(fields, vec!["plain", "quoted, with comma", "tail"]);
    }

    #[test]
    fn parse_keeps_trailing_empty_field() {
        assert_eq!(parse_line("a,"), vec!["a", ""]);
    }
}

#[cfg(test)]
mod table {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use tabula_engine::tabular::{Table, TableOptions, TabularError};

    fn _table(columns: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        let mut table = Table::new(TableOptions::default());
        table
            .set_columns(columns.iter().map(|c| c.to_string()).collect())
            .unwrap();
        for row in rows {
            table
                .append_record(row.iter().map(|v| v.to_string()).collect())
                .unwrap();
        }
        table
    }

    fn _sample_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    const PEOPLE: &str = "id,name,city\n1,Jansen,Lahore\n2,Bonega,Quito\n3,Maharashtra,Pune\n";

    #[test]
    fn from_path_reads_header_columns() {
        let file = _sample_file(PEOPLE);
        let table = Table::from_path(file.path(), TableOptions::default()).unwrap();

        assert_eq!(table.columns(), vec!["id", "name", "city"]);
        assert_eq!(table.record_count(), 3);
    }

    #[test]
    fn from_path_duplicate_header_fails() {
        let file = _sample_file("id,name,id\n1,Jansen,2\n");
        let result = Table::from_path(file.path(), TableOptions::default());

        assert!(matches!(result, Err(TabularError::Schema(_))));
    }

    #[test]
    fn from_path_headerless_synthesizes_positional_columns() {
        let file = _sample_file("1,Jansen\n2,Bonega\n");
        let options = TableOptions {
            has_header: false,
            ..TableOptions::default()
        };
        let table = Table::from_path(file.path(), options).unwrap();

        assert_eq!(table.columns(), vec!["0", "1"]);
        assert_eq!(table.get(0).unwrap().get("1"), "Jansen");
    }

    #[test]
    fn get_negative_position_fetches_last_row() {
        let file = _sample_file(PEOPLE);
        let table = Table::from_path(file.path(), TableOptions::default()).unwrap();

        assert_eq!(table.get(-1).unwrap().get("name"), "Maharashtra");
    }

    #[test]
    fn get_out_of_bounds_fails() {
        let file = _sample_file(PEOPLE);
        let table = Table::from_path(file.path(), TableOptions::default()).unwrap();

        assert!(matches!(table.get(3), Err(TabularError::Bounds(3))));
    }

    #[test]
    fn get_on_empty_table_fails() {
        let table = _table(vec!["id"], vec![]);

        assert!(matches!(table.get(-1), Err(TabularError::Bounds(-1))));
        assert!(matches!(table.get(0), Err(TabularError::Bounds(0))));
    }

    #[test]
    fn get_is_idempotent() {
        let file = _sample_file(PEOPLE);
        let mut table = Table::from_path(file.path(), TableOptions::default()).unwrap();
        table.add_column("country", "unknown");

        let first = table.get(1).unwrap().get_all();
        let second = table.get(1).unwrap().get_all();

        assert_eq!(first, second);
    }

    #[test]
    fn mutating_a_fetched_record_leaves_the_table_alone() {
        let file = _sample_file(PEOPLE);
        let table = Table::from_path(file.path(), TableOptions::default()).unwrap();

        let mut record = table.get(0).unwrap();
        record.set("name", "Overwritten");

        assert_eq!(table.get(0).unwrap().get("name"), "Jansen");
    }

    #[test]
    fn trim_option_strips_field_whitespace() {
        let file = _sample_file("id,name\n1,  Jansen  \n");

        let trimmed = Table::from_path(file.path(), TableOptions::default()).unwrap();
        assert_eq!(trimmed.get(0).unwrap().get("name"), "Jansen");

        let raw = Table::from_path(
            file.path(),
            TableOptions {
                trim: false,
                ..TableOptions::default()
            },
        )
        .unwrap();
        assert_eq!(raw.get(0).unwrap().get("name"), "  Jansen  ");
    }

    #[test]
    fn indexed_mode_matches_materialized_mode() {
        let file = _sample_file(PEOPLE);
        let materialized = Table::from_path(file.path(), TableOptions::default()).unwrap();
        let indexed = Table::from_path(
            file.path(),
            TableOptions {
                preload: false,
                ..TableOptions::default()
            },
        )
        .unwrap();

        assert_eq!(materialized.record_count(), indexed.record_count());
        for position in 0..materialized.record_count() {
            assert_eq!(
                materialized.get(position as isize).unwrap().get_all(),
                indexed.get(position as isize).unwrap().get_all(),
            );
        }
    }

    #[test]
    fn append_record_with_no_values_fills_empty_strings() {
        let mut table = _table(vec!["id", "name"], vec![vec!["1", "Jansen"]]);
        table.append_record(vec![]).unwrap();

        let record = table.get(-1).unwrap();
        assert_eq!(record.get("id"), "");
        assert_eq!(record.get("name"), "");
    }

    #[test]
    fn append_record_width_mismatch_fails() {
        let mut table = _table(vec!["id", "name"], vec![]);
        let result = table.append_record(vec!["1".to_string()]);

        assert!(matches!(result, Err(TabularError::Schema(_))));
    }

    #[test]
    fn insert_record_splices_at_position() {
        let mut table = _table(
            vec!["id"],
            vec![vec!["1"], vec!["3"]],
        );
        table.insert_record(vec!["2".to_string()], 1).unwrap();

        let ids: Vec<String> = (0..3).map(|i| table.get(i).unwrap().get("id")).collect();
        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn indexed_table_rejects_new_records() {
        let file = _sample_file(PEOPLE);
        let mut table = Table::from_path(
            file.path(),
            TableOptions {
                preload: false,
                ..TableOptions::default()
            },
        )
        .unwrap();

        let result = table.append_record(vec![
            "4".to_string(),
            "Rango".to_string(),
            "Denver".to_string(),
        ]);
        assert!(matches!(result, Err(TabularError::Argument(_))));
    }

    #[test]
    fn delete_record_works_in_both_modes() {
        let file = _sample_file(PEOPLE);

        for preload in [true, false] {
            let mut table = Table::from_path(
                file.path(),
                TableOptions {
                    preload,
                    ..TableOptions::default()
                },
            )
            .unwrap();

            table.delete_record(1).unwrap();

            assert_eq!(table.record_count(), 2);
            assert_eq!(table.get(0).unwrap().get("name"), "Jansen");
            assert_eq!(table.get(1).unwrap().get("name"), "Maharashtra");
        }
    }

    #[test]
    fn set_columns_rejects_duplicates() {
        let mut table = Table::new(TableOptions::default());
        let result = table.set_columns(vec!["a".to_string(), "a".to_string()]);

        assert!(matches!(result, Err(TabularError::Schema(_))));
    }
}

#[cfg(test)]
mod mutators {
    use std::sync::Arc;

    use tabula_engine::tabular::{JoinMatcher, Table, TableOptions, TabularError};

    fn _table(columns: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        let mut table = Table::new(TableOptions::default());
        table
            .set_columns(columns.iter().map(|c| c.to_string()).collect())
            .unwrap();
        for row in rows {
            table
                .append_record(row.iter().map(|v| v.to_string()).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn add_column_fills_unset_values() {
        let mut table = _table(vec!["id"], vec![vec!["1"]]);
        table.add_column("status", "new");

        assert_eq!(table.columns(), vec!["id", "status"]);
        assert_eq!(table.get(0).unwrap().get("status"), "new");
    }

    #[test]
    fn delete_column_removes_key_and_header_entry() {
        let mut table = _table(vec!["id", "name"], vec![vec!["1", "Jansen"]]);
        table.delete_column("name");

        assert_eq!(table.columns(), vec!["id"]);
        let record = table.get(0).unwrap();
        assert_eq!(record.get("name"), "");
        assert!(!record.get_all().contains_key("name"));
    }

    #[test]
    fn merge_joins_values_and_drops_sources() {
        let mut table = _table(
            vec!["first", "last", "age"],
            vec![vec!["Jane", "Doe", "44"]],
        );
        table
            .combine_columns(
                vec!["first".to_string(), "last".to_string()],
                "full",
                " ",
            )
            .unwrap();

        let record = table.get(0).unwrap();
        assert_eq!(record.get("full"), "Jane Doe");

        let all = record.get_all();
        assert!(!all.contains_key("first"));
        assert!(!all.contains_key("last"));
        assert_eq!(table.columns(), vec!["age", "full"]);
    }

    #[test]
    fn merge_of_undeclared_column_fails() {
        let mut table = _table(vec!["first"], vec![]);
        let result = table.combine_columns(
            vec!["first".to_string(), "ghost".to_string()],
            "full",
            " ",
        );

        assert!(matches!(result, Err(TabularError::Argument(_))));
    }

    #[test]
    fn chain_keeps_header_and_record_keys_consistent() {
        let mut table = _table(
            vec!["id", "first", "last"],
            vec![vec!["1", "Jane", "Doe"]],
        );
        table.add_column("status", "new");
        table.delete_column("id");
        table
            .combine_columns(vec!["first".to_string(), "last".to_string()], "full", " ")
            .unwrap();

        let record = table.get(0).unwrap();
        assert_eq!(record.columns(), table.columns());
    }

    #[test]
    fn mutators_apply_in_registration_order() {
        let mut table = _table(vec!["id", "name"], vec![vec!["1", "Jansen"]]);
        table.delete_column("name");
        table.add_column("name", "replaced");

        assert_eq!(table.columns(), vec!["id", "name"]);
        assert_eq!(table.get(0).unwrap().get("name"), "replaced");
    }

    #[test]
    fn join_fills_named_columns_by_key() {
        let mut orders = _table(
            vec!["order_id", "customer_id", "customer_name"],
            vec![vec!["100", "7", ""], vec!["101", "8", ""]],
        );
        let customers = Arc::new(_table(
            vec!["id", "name"],
            vec![vec!["7", "Jansen"], vec!["8", "Bonega"]],
        ));

        orders
            .join_on(
                customers,
                "customer_id",
                "id",
                vec!["customer_name".to_string()],
                vec!["name".to_string()],
            )
            .unwrap();

        assert_eq!(orders.get(0).unwrap().get("customer_name"), "Jansen");
        assert_eq!(orders.get(1).unwrap().get("customer_name"), "Bonega");
    }

    #[test]
    fn join_appends_columns_when_no_targets_named() {
        let mut orders = _table(
            vec!["order_id", "customer_id"],
            vec![vec!["100", "7"]],
        );
        let customers = Arc::new(_table(
            vec!["id", "name", "city"],
            vec![vec!["7", "Jansen", "Lahore"]],
        ));

        orders
            .join_on(
                customers,
                "customer_id",
                "id",
                vec![],
                vec!["name".to_string(), "city".to_string()],
            )
            .unwrap();

        assert_eq!(
            orders.columns(),
            vec!["order_id", "customer_id", "name", "city"]
        );
        let record = orders.get(0).unwrap();
        assert_eq!(record.get("name"), "Jansen");
        assert_eq!(record.get("city"), "Lahore");
        assert_eq!(record.columns(), orders.columns());
    }

    #[test]
    fn join_appends_empty_values_when_nothing_matches() {
        let mut orders = _table(vec!["order_id", "customer_id"], vec![vec!["100", "99"]]);
        let customers = Arc::new(_table(vec!["id", "name"], vec![vec!["7", "Jansen"]]));

        orders
            .join_on(customers, "customer_id", "id", vec![], vec!["name".to_string()])
            .unwrap();

        let record = orders.get(0).unwrap();
        assert_eq!(record.get("name"), "");
        assert_eq!(record.columns(), orders.columns());
    }

    #[test]
    fn join_last_match_wins() {
        let mut this = _table(vec!["id", "name"], vec![vec!["1", ""]]);
        let that = Arc::new(_table(
            vec!["id", "name"],
            vec![vec!["1", "First"], vec!["2", "Other"], vec!["1", "Last"]],
        ));

        this.join_on(
            that,
            "id",
            "id",
            vec!["name".to_string()],
            vec!["name".to_string()],
        )
        .unwrap();

        assert_eq!(this.get(0).unwrap().get("name"), "Last");
    }

    #[test]
    fn join_with_comparator_matches_arbitrarily() {
        let mut this = _table(vec!["code", "label"], vec![vec!["a-1", ""]]);
        let that = Arc::new(_table(
            vec!["prefix", "label"],
            vec![vec!["a", "Alpha"], vec!["b", "Beta"]],
        ));

        this.join(
            that,
            JoinMatcher::comparator(|this, that| {
                this.get("code").starts_with(&that.get("prefix"))
            }),
            vec!["label".to_string()],
            vec!["label".to_string()],
        )
        .unwrap();

        assert_eq!(this.get(0).unwrap().get("label"), "Alpha");
    }

    #[test]
    fn join_mismatched_column_lists_fail() {
        let mut this = _table(vec!["id", "name"], vec![]);
        let that = Arc::new(_table(vec!["id", "name"], vec![]));

        let result = this.join_on(
            that,
            "id",
            "id",
            vec!["name".to_string()],
            vec!["name".to_string(), "id".to_string()],
        );
        assert!(matches!(result, Err(TabularError::Argument(_))));
    }

    #[test]
    fn join_undeclared_columns_fail() {
        let mut this = _table(vec!["id"], vec![]);
        let that = Arc::new(_table(vec!["id"], vec![]));

        let result = this.join_on(
            Arc::clone(&that),
            "id",
            "id",
            vec!["ghost".to_string()],
            vec!["id".to_string()],
        );
        assert!(matches!(result, Err(TabularError::Argument(_))));

        let result = this.join_on(
            that,
            "id",
            "id",
            vec![],
            vec!["ghost".to_string()],
        );
        assert!(matches!(result, Err(TabularError::Argument(_))));
    }
}

#[cfg(test)]
mod formatters {
    use tabula_engine::tabular::{Formatter, Table, TableOptions};

    fn _table(columns: Vec<&str>, rows: Vec<Vec<&str>>) -> Table {
        let mut table = Table::new(TableOptions::default());
        table
            .set_columns(columns.iter().map(|c| c.to_string()).collect())
            .unwrap();
        for row in rows {
            table
                .append_record(row.iter().map(|v| v.to_string()).collect())
                .unwrap();
        }
        table
    }

    #[test]
    fn numeric_strips_everything_but_digits_and_point() {
        assert_eq!(Formatter::Numeric.format("$1,234.50"), "1234.50");
    }

    #[test]
    fn alphanumeric_strips_symbols() {
        assert_eq!(Formatter::Alphanumeric.format("a-b c_3!"), "abc_3");
    }

    #[test]
    fn date_reformats_known_shapes() {
        let formatter = Formatter::date("%d/%m/%Y");
        assert_eq!(formatter.format("2024-01-15"), "15/01/2024");
        assert_eq!(formatter.format("2024-01-15 08:30:00"), "15/01/2024");
    }

    #[test]
    fn date_falls_back_to_original_value() {
        let formatter = Formatter::date("%Y-%m-%d");
        assert_eq!(formatter.format("not a date"), "not a date");
        assert_eq!(formatter.format(""), "");
    }

    #[test]
    fn formatter_applies_on_every_read() {
        let mut table = _table(vec!["amount"], vec![vec!["$12.50"]]);
        table.set_formatter("amount", Formatter::Numeric);

        assert_eq!(table.get(0).unwrap().get("amount"), "12.50");
    }

    #[test]
    fn formatter_registered_late_reaches_issued_records() {
        let mut table = _table(vec!["amount"], vec![vec!["$12.50"]]);
        let record = table.get(0).unwrap();

        table.set_formatter("amount", Formatter::Numeric);

        assert_eq!(record.get("amount"), "12.50");
    }

    #[test]
    fn custom_formatter_runs_closure() {
        let mut table = _table(vec!["name"], vec![vec!["jansen"]]);
        table.set_formatter("name", Formatter::custom(|v| v.to_uppercase()));

        assert_eq!(table.get(0).unwrap().get("name"), "JANSEN");
    }

    #[test]
    fn missing_column_reads_as_empty_string() {
        let table = _table(vec!["id"], vec![vec!["1"]]);
        assert_eq!(table.get(0).unwrap().get("ghost"), "");
    }

    #[test]
    fn set_without_overwrite_keeps_existing_value() {
        let table = _table(vec!["id", "name"], vec![vec!["1", "Jansen"]]);

        let mut record = table.get(0).unwrap();
        record.set_with("name", "Bonega", false);
        assert_eq!(record.get("name"), "Jansen");

        record.set_with("name", "Bonega", true);
        assert_eq!(record.get("name"), "Bonega");
    }

    #[test]
    fn set_without_overwrite_fills_empty_value() {
        let table = _table(vec!["id", "name"], vec![vec!["1", ""]]);

        let mut record = table.get(0).unwrap();
        record.set_with("name", "Bonega", false);
        assert_eq!(record.get("name"), "Bonega");
    }
}
