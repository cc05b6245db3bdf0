#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        AggregateFunction, Criteria, DeleteContext, ExistContext, Grouping, Paging, Record,
        RenderError, SelectContext, SqlWriter, StatementBuilder, UpdateContext, UpsertContext,
        Value,
    };
    use strata_mysql::MySqlSqlWriter;
    use strata_tests::{catalog, execute_tests, init_logs};

    const WRITER: MySqlSqlWriter = MySqlSqlWriter {};

    #[test]
    fn mysql() {
        init_logs();
        execute_tests(&WRITER);
    }

    #[test]
    fn positional_parameters() {
        let metadata = catalog();
        let plan = ExistContext::new(&metadata, "Member")
            .criteria(Criteria::equal("Kind", "user"))
            .build()
            .expect("Failed to build the exist");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the exist"),
            indoc! {"
                SELECT t.`Id`
                FROM `Members` t
                WHERE t.`Kind` = ?
                LIMIT 1;
            "}
            .trim()
        );

        let plan = SelectContext::new(&metadata, "Member")
            .features(WRITER.features())
            .criteria(Criteria::equal("Kind", "user"))
            .grouping(
                Grouping::by(["UserId"])
                    .aggregate(AggregateFunction::Count, None, "Total")
                    .having(Criteria::greater_than("Total", 5i64)),
            )
            .paging(Paging::page(1, 20))
            .build()
            .expect("Failed to build the grouped select");
        let (sql, bound) = WRITER
            .render_bound(&plan)
            .expect("Failed to render the grouped select");
        assert_eq!(sql.matches('?').count(), 4);
        assert_eq!(bound, ["p1", "p2", "p1", "p2"]);
        let parameters = plan.base().collection().expect("Own parameters");
        let values: Vec<_> = bound
            .iter()
            .map(|v| parameters.get(v).and_then(|v| v.value.clone()))
            .collect();
        assert_eq!(
            values,
            [
                Some(Value::Varchar(Some("user".into()))),
                Some(Value::Int64(Some(5))),
                Some(Value::Varchar(Some("user".into()))),
                Some(Value::Int64(Some(5))),
            ]
        );
    }

    #[test]
    fn joined_update() {
        let metadata = catalog();
        let record = Record::new()
            .with("Id", 7i64)
            .with("Email", "alice@example.com")
            .with("Name", "Alice");
        let plan = UpdateContext::new(&metadata, "User", record)
            .features(WRITER.features())
            .build()
            .expect("Failed to build the update");
        assert!(plan.slaves().is_empty());
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the update"),
            indoc! {"
                UPDATE `Users` t
                LEFT JOIN `Principals` t1 ON t1.`Id` = t.`Id`
                SET t1.`Email` = ?, t.`Name` = ?
                WHERE t.`Id` = ?;
            "}
            .trim()
        );
    }

    #[test]
    fn joined_delete() {
        let metadata = catalog();
        let plan = DeleteContext::new(&metadata, "User")
            .features(WRITER.features())
            .record(Record::new().with("Id", 7i64))
            .build()
            .expect("Failed to build the delete");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the delete"),
            indoc! {"
                DELETE t, t1
                FROM `Users` t
                LEFT JOIN `Principals` t1 ON t1.`Id` = t.`Id`
                WHERE t.`Id` = ?;
            "}
            .trim()
        );
    }

    #[test]
    fn upsert_on_duplicate_key() {
        let metadata = catalog();
        let plan = UpsertContext::new(
            &metadata,
            "Principal",
            Record::new().with("Email", "bob@example.com"),
        )
        .features(WRITER.features())
        .build()
        .expect("Failed to build the upsert");
        let sql = WRITER
            .render_plan(&plan)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to render the upsert");
        assert_eq!(
            sql,
            [
                indoc! {"
                    INSERT INTO `Principals` (`Email`, `Status`) VALUES
                    (?, ?)
                    ON DUPLICATE KEY UPDATE
                    `Email` = VALUES(`Email`);
                "}
                .trim(),
                indoc! {"
                    SELECT t1.`Id`
                    FROM `Principals` t1
                    WHERE t1.`Email` = ?;
                "}
                .trim(),
            ]
        );

        let plan = UpsertContext::new(
            &metadata,
            "Principal",
            Record::new().with("Id", 1i64).with("Email", "bob@example.com"),
        )
        .features(WRITER.features())
        .condition(Criteria::equal("Status", 1i32))
        .build()
        .expect("Failed to build the conditional upsert");
        let error = WRITER
            .render(&plan)
            .expect_err("A conditional upsert cannot be written");
        assert!(matches!(
            error.downcast_ref::<RenderError>(),
            Some(RenderError::Unsupported { dialect: "mysql", .. })
        ));
    }
}
