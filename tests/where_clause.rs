#[cfg(test)]
mod tests {
    use strata::{Driver, Specification, Value, Where};

    fn values(filter: &Where) -> Vec<Value> {
        filter.parameters().into_iter().map(|v| v.value).collect()
    }

    #[test]
    fn comparators() {
        let cases = [
            (Specification::equality("a", 1), "`a` = ?"),
            (Specification::inequality("a", 1), "`a` <> ?"),
            (Specification::less_than("a", 1), "`a` < ?"),
            (Specification::more_than("a", 1), "`a` > ?"),
            (Specification::less_than_or_equal("a", 1), "`a` <= ?"),
            (Specification::more_than_or_equal("a", 1), "`a` >= ?"),
            (Specification::starts_with("a", "x"), "`a` LIKE ?"),
            (Specification::ends_with("a", "x"), "`a` LIKE ?"),
            (Specification::contains("a", "x"), "`a` LIKE ?"),
        ];
        for (spec, expected) in cases {
            let filter = Where::of(Some(spec));
            assert_eq!(filter.sql(Driver::MySql), format!("WHERE {}", expected));
            assert_eq!(filter.parameters().len(), 1);
        }
    }

    #[test]
    fn null_checks_bind_nothing() {
        let filter = Where::of(Some(Specification::is_null("deleted_at")));
        assert_eq!(filter.sql(Driver::Sqlite), r#"WHERE "deleted_at" IS NULL"#);
        assert!(filter.parameters().is_empty());
        let filter = Where::of(Some(Specification::is_not_null("deleted_at")));
        assert_eq!(filter.sql(Driver::Postgres), r#"WHERE "deleted_at" IS NOT NULL"#);
        assert!(filter.parameters().is_empty());
    }

    #[test]
    fn in_keeps_the_order() {
        let filter = Where::of(Some(Specification::is_in("id", ["c", "a", "b"])));
        assert_eq!(filter.sql(Driver::MySql), "WHERE `id` IN (?, ?, ?)");
        assert_eq!(filter.sql(Driver::Postgres), r#"WHERE "id" IN ($1, $2, $3)"#);
        assert_eq!(
            values(&filter),
            [
                Value::String("c".into()),
                Value::String("a".into()),
                Value::String("b".into())
            ]
        );
    }

    #[test]
    fn composites_are_parenthesized() {
        let filter = Where::of(Some(
            Specification::equality("a", 1).and(Specification::equality("b", 2)),
        ));
        assert_eq!(filter.sql(Driver::Sqlite), r#"WHERE ("a" = ? AND "b" = ?)"#);
        let filter = Where::of(Some(
            Specification::equality("a", 1)
                .or(Specification::less_than("b", 2))
                .and(Specification::contains("c", "x").not()),
        ));
        assert_eq!(
            filter.sql(Driver::Sqlite),
            r#"WHERE (("a" = ? OR "b" < ?) AND NOT("c" LIKE ?))"#
        );
        assert_eq!(
            filter.sql(Driver::Postgres),
            r#"WHERE (("a" = $1 OR "b" < $2) AND NOT("c" LIKE $3))"#
        );
        assert_eq!(
            values(&filter),
            [Value::Int(1), Value::Int(2), Value::String("%x%".into())]
        );
    }

    #[test]
    fn not_wraps_the_inner_rendering() {
        let inner = Specification::is_in("id", [1, 2]);
        let plain = Where::of(Some(inner.clone())).sql(Driver::MySql);
        let negated = Where::of(Some(inner.not())).sql(Driver::MySql);
        assert_eq!(
            negated,
            format!("WHERE NOT({})", plain.trim_start_matches("WHERE "))
        );
    }

    #[test]
    fn placeholders_match_parameters() {
        let spec = Specification::is_in("a", [1, 2, 3])
            .or(Specification::is_null("b").and(Specification::starts_with("c", "x")))
            .and(
                Specification::more_than_or_equal("d", 4)
                    .not()
                    .or(Specification::is_in("e", Vec::<i64>::new())),
            )
            .or(Specification::ends_with("t.f", "y"));
        let filter = Where::of(Some(spec));
        let parameters = filter.parameters();
        assert_eq!(filter.sql(Driver::MySql).matches('?').count(), parameters.len());
        assert_eq!(filter.sql(Driver::Sqlite).matches('?').count(), parameters.len());
        let postgres = filter.sql(Driver::Postgres);
        let mut position = 0;
        for i in 1..=parameters.len() {
            let found = postgres[position..]
                .find(&format!("${}", i))
                .expect("Placeholders must appear in order");
            position += found + 1;
        }
        assert!(!postgres.contains(&format!("${}", parameters.len() + 1)));
        assert_eq!(
            values(&filter),
            [
                Value::Int(1),
                Value::Int(2),
                Value::Int(3),
                Value::String("x%".into()),
                Value::Int(4),
                Value::String("%y".into()),
            ]
        );
    }
}
