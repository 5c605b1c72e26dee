#[cfg(test)]
mod tests {
    use strata::{
        Builder, ColumnName, Direction, Driver, Join, ParameterType, Select, Specification,
        TableName, TypedValue, Value,
    };

    fn column(name: &str) -> ColumnName {
        ColumnName::new(name).unwrap()
    }

    fn table(name: &str) -> TableName {
        TableName::new(name).unwrap()
    }

    #[test]
    fn star_by_default() {
        let select = Select::from(table("users"));
        assert_eq!(select.sql(Driver::MySql), "SELECT * FROM `users`");
        assert_eq!(select.sql(Driver::Postgres), r#"SELECT * FROM "users""#);
        assert!(select.parameters(Driver::Sqlite).is_empty());
        assert!(!select.normalize(Driver::Sqlite).lazy);
    }

    #[test]
    fn aliased_join() {
        let u = table("users").aliased("u").unwrap();
        let o = table("orders").aliased("o").unwrap();
        let amount = column("total").in_table(o.clone()).aliased("amount").unwrap();
        let select = Select::from(u.clone())
            .join(
                Join::left(o.clone())
                    .on(column("id").in_table(u.clone()), column("user_id").in_table(o)),
            )
            .column(column("name").in_table(u))
            .column(amount.clone())
            .filter(
                Specification::more_than("o.total", 100)
                    .and(Specification::is_not_null("u.name")),
            )
            .order_by(amount, Direction::Desc)
            .limit(10)
            .offset(20);
        assert_eq!(
            select.sql(Driver::Sqlite),
            concat!(
                r#"SELECT "u"."name", "o"."total" AS "amount" FROM "users" AS "u" "#,
                r#"LEFT JOIN "orders" AS "o" ON "u"."id" = "o"."user_id" "#,
                r#"WHERE ("o"."total" > ? AND "u"."name" IS NOT NULL) "#,
                r#"ORDER BY "amount" DESC LIMIT 10 OFFSET 20"#,
            )
        );
        assert_eq!(
            select.sql(Driver::MySql),
            concat!(
                "SELECT `u`.`name`, `o`.`total` AS `amount` FROM `users` AS `u` ",
                "LEFT JOIN `orders` AS `o` ON `u`.`id` = `o`.`user_id` ",
                "WHERE (`o`.`total` > ? AND `u`.`name` IS NOT NULL) ",
                "ORDER BY `amount` DESC LIMIT 10 OFFSET 20",
            )
        );
        assert_eq!(
            select.sql(Driver::Postgres),
            concat!(
                r#"SELECT "u"."name", "o"."total" AS "amount" FROM "users" AS "u" "#,
                r#"LEFT JOIN "orders" AS "o" ON "u"."id" = "o"."user_id" "#,
                r#"WHERE ("o"."total" > $1 AND "u"."name" IS NOT NULL) "#,
                r#"ORDER BY "amount" DESC LIMIT 10 OFFSET 20"#,
            )
        );
        assert_eq!(select.parameters(Driver::MySql)[0].value, Value::Int(100));
    }

    #[test]
    fn join_without_condition() {
        let select = Select::from(table("a")).join(Join::left(table("b")));
        assert_eq!(select.sql(Driver::MySql), "SELECT * FROM `a` LEFT JOIN `b`");
    }

    #[test]
    fn count_replaces_the_columns() {
        let select = Select::from(table("users"))
            .column(column("id"))
            .count(column("total"))
            .filter(Specification::equality("active", true));
        assert_eq!(
            select.sql(Driver::Postgres),
            r#"SELECT COUNT(1) AS "total" FROM "users" WHERE "active" = $1"#
        );
        let select = select.column(column("id"));
        assert_eq!(
            select.sql(Driver::Postgres),
            r#"SELECT "id" FROM "users" WHERE "active" = $1"#
        );
    }

    #[test]
    fn offset_needs_a_limit() {
        let select = Select::from(table("t")).order_by(column("id"), Direction::Asc);
        assert_eq!(
            select.clone().offset(5).sql(Driver::Sqlite),
            r#"SELECT * FROM "t" ORDER BY "id" ASC"#
        );
        assert_eq!(
            select.limit(1).sql(Driver::Sqlite),
            r#"SELECT * FROM "t" ORDER BY "id" ASC LIMIT 1"#
        );
    }

    #[test]
    fn projected_values_come_first() {
        let select = Select::from(table("t"))
            .column(TypedValue::new(column("tag"), 7, ParameterType::String))
            .column(column("id"))
            .filter(Specification::equality("id", 5));
        let normalized = select.normalize(Driver::Postgres);
        assert_eq!(
            normalized.sql,
            r#"SELECT $1 AS "tag", "id" FROM "t" WHERE "id" = $2"#
        );
        assert_eq!(normalized.parameters[0].ty, ParameterType::String);
        assert_eq!(normalized.parameters[0].value, Value::Int(7));
        assert_eq!(normalized.parameters[1].value, Value::Int(5));
        assert_eq!(
            select.sql(Driver::MySql),
            "SELECT ? AS `tag`, `id` FROM `t` WHERE `id` = ?"
        );
    }

    #[test]
    fn on_demand_is_lazy() {
        let select = Select::on_demand(table("t")).limit(3);
        assert!(select.is_lazy());
        for driver in Driver::ALL {
            assert!(select.normalize(driver).lazy);
        }
    }

    #[test]
    fn same_builder_for_every_driver() {
        let select = Select::from(table("t")).filter(
            Specification::equality("a", "x").or(Specification::equality("b", "y")),
        );
        let before = select.clone();
        let rendered: Vec<_> = Driver::ALL.iter().map(|d| select.sql(*d)).collect();
        assert_eq!(select, before);
        assert_eq!(
            rendered,
            [
                "SELECT * FROM `t` WHERE (`a` = ? OR `b` = ?)",
                r#"SELECT * FROM "t" WHERE ("a" = $1 OR "b" = $2)"#,
                r#"SELECT * FROM "t" WHERE ("a" = ? OR "b" = ?)"#,
            ]
        );
        assert_eq!(select.sql(Driver::MySql), rendered[0]);
    }
}
