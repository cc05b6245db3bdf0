#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Context, Criteria, Expression, InsertContext, Operator, Record, RenderError,
        SelectContext, Sorting, SqlWriter, StatementBuilder,
    };
    use strata_sqlite::SqliteSqlWriter;
    use strata_tests::{catalog, execute_tests, init_logs};

    const WRITER: SqliteSqlWriter = SqliteSqlWriter {};

    #[test]
    fn sqlite() {
        init_logs();
        execute_tests(&WRITER);
    }

    #[test]
    fn aliased_tables() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "Member")
            .criteria(Criteria::like("Label", "%lead%"))
            .sort(Sorting::descending("Kind"))
            .build()
            .expect("Failed to build the select");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the select"),
            indoc! {r#"
                SELECT t."Id", t."user_id" AS "UserId", t."Kind", t."Label"
                FROM "Members" AS t
                WHERE t."Label" LIKE :p1
                ORDER BY t."Kind" DESC;
            "#}
            .trim()
        );
    }

    #[test]
    fn insert_returning() {
        let metadata = catalog();
        let record = Record::new()
            .with("Email", "alice@example.com")
            .with("Name", "Alice")
            .with("RoleId", 3i32);
        let plan = InsertContext::new(&metadata, "User")
            .features(WRITER.features())
            .record(record)
            .build()
            .expect("Failed to build the insert");
        let sql = WRITER
            .render_plan(&plan)
            .into_iter()
            .collect::<Result<Vec<_>, _>>()
            .expect("Failed to render the insert");
        assert_eq!(
            sql,
            [
                indoc! {r#"
                    INSERT INTO "Principals" ("Email", "Status") VALUES
                    (:p1, :p2)
                    RETURNING "Id";
                "#}
                .trim(),
                indoc! {r#"
                    INSERT INTO "Users" ("Id", "Name", "role_id") VALUES
                    (:p1, :p2, :p3);
                "#}
                .trim(),
            ]
        );
    }

    #[test]
    fn functions() {
        let mut out = String::new();
        WRITER
            .write_expression(
                &mut Context::default(),
                &mut out,
                &Expression::call("lower", vec![Expression::call("guid", vec![])]),
            )
            .expect("Failed to write the call");
        assert_eq!(out, "LOWER(LOWER(HEX(RANDOMBLOB(16))))");

        let mut out = String::new();
        let error = WRITER
            .write_expression(
                &mut Context::default(),
                &mut out,
                &Expression::binary(
                    Operator::BitwiseXor,
                    Expression::field("t", "Status"),
                    Expression::constant(1i32),
                ),
            )
            .expect_err("There is no XOR operator");
        assert!(matches!(
            error.downcast_ref::<RenderError>(),
            Some(RenderError::Unsupported { dialect: "sqlite", .. })
        ));
    }
}
