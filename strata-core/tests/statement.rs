#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        AggregateFunction, BuildError, Criteria, ExistContext, GenericSqlWriter, Grouping, Paging,
        Parse, Record, Schema, SelectContext, Sorting, SqlWriter, StatementBuilder, UpdateContext,
        UpsertContext, Value,
    };
    use strata_tests::catalog;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    #[test]
    fn select_joined() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "User")
            .features(WRITER.features())
            .schema(Schema::parse("Name, Role{Name}").expect("Valid schema"))
            .criteria(Criteria::equal("Role.Name", "admin"))
            .sort(Sorting::ascending("Name"))
            .build()
            .expect("Failed to build the select");
        assert!(plan.slaves().is_empty());
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the select"),
            indoc! {r#"
                SELECT t."Name", t1."Name" AS "Role.Name"
                FROM "Users" t
                INNER JOIN "Roles" t1 ON t1."Id" = t."role_id"
                WHERE t1."Name" = @p1
                ORDER BY t."Name" ASC;
            "#}
            .trim()
        );
    }

    #[test]
    fn select_inherited() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "User")
            .schema(Schema::parse("Name, Email, Role.Name").expect("Valid schema"))
            .criteria(Criteria::and([
                Criteria::equal("Status", 1i32),
                Criteria::is_in("Id", [1i64, 2, 3]),
            ]))
            .build()
            .expect("Failed to build the select");
        let sql = WRITER.render(&plan).expect("Failed to render the select");
        assert_eq!(
            sql,
            indoc! {r#"
                SELECT t."Name", t1."Email", t2."Name" AS "Role.Name"
                FROM "Users" t
                LEFT JOIN "Principals" t1 ON t1."Id" = t."Id"
                INNER JOIN "Roles" t2 ON t2."Id" = t."role_id"
                WHERE t1."Status" = @p1 AND t."Id" IN (@p2, @p3, @p4);
            "#}
            .trim()
        );
        assert_eq!(WRITER.render(&plan).expect("Rendered again"), sql);
    }

    #[test]
    fn select_filters() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "Member")
            .criteria(Criteria::and([
                Criteria::between("UserId", Some(1i64.into()), Some(5i64.into())),
                Criteria::not_in("Kind", ["user"]),
                Criteria::between("Id", None, Some(100i64.into())),
                Criteria::between("Id", None, None),
            ]))
            .build()
            .expect("Failed to build the select");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the select"),
            indoc! {r#"
                SELECT t."Id", t."user_id" AS "UserId", t."Kind", t."Label"
                FROM "Members" t
                WHERE t."user_id" BETWEEN @p1 AND @p2 AND t."Kind" != @p3 AND t."Id" <= @p4;
            "#}
            .trim()
        );

        let plan = SelectContext::new(&metadata, "Member")
            .criteria(Criteria::or([
                Criteria::equal("Label", Value::Null),
                Criteria::and([
                    Criteria::equal("Kind", "user"),
                    Criteria::greater_than("UserId", 3i64),
                ]),
            ]))
            .build()
            .expect("Failed to build the select");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the select"),
            indoc! {r#"
                SELECT t."Id", t."user_id" AS "UserId", t."Kind", t."Label"
                FROM "Members" t
                WHERE t."Label" IS NULL OR (t."Kind" = @p1 AND t."user_id" > @p2);
            "#}
            .trim()
        );
    }

    #[test]
    fn select_grouped() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "Member")
            .criteria(Criteria::equal("Kind", "user"))
            .grouping(
                Grouping::by(["UserId"])
                    .aggregate(AggregateFunction::Count, None, "Total")
                    .having(Criteria::greater_than("Total", 5i64)),
            )
            .sort(Sorting::descending("Total"))
            .paging(Paging::page(2, 10))
            .build()
            .expect("Failed to build the grouped select");
        let (sql, bound) = WRITER
            .render_bound(&plan)
            .expect("Failed to render the grouped select");
        assert_eq!(
            sql,
            indoc! {r#"
                SELECT COUNT(*) FROM (SELECT t."user_id" AS "UserId", COUNT(*) AS "Total"
                FROM "Members" t
                WHERE t."Kind" = @p1
                GROUP BY t."user_id"
                HAVING COUNT(*) > @p2) AS "counted";
                SELECT t."user_id" AS "UserId", COUNT(*) AS "Total"
                FROM "Members" t
                WHERE t."Kind" = @p1
                GROUP BY t."user_id"
                HAVING COUNT(*) > @p2
                ORDER BY COUNT(*) DESC
                LIMIT 10 OFFSET 10;
            "#}
            .trim()
        );
        assert_eq!(bound, ["p1", "p2", "p1", "p2"]);
        let parameters = plan.base().collection().expect("Own parameters");
        assert_eq!(
            parameters.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            ["p1", "p2"]
        );
        assert_eq!(
            parameters.get("p1").and_then(|v| v.value.clone()),
            Some(Value::Varchar(Some("user".into())))
        );

        let error = SelectContext::new(&metadata, "User")
            .grouping(Grouping::by(["Role"]))
            .build()
            .expect_err("Navigations are not grouping keys");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::NotGroupable { .. })
        ));
    }

    #[test]
    fn select_distinct() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "Member")
            .schema(Schema::parse("Kind").expect("Valid schema"))
            .distinct()
            .paging(Paging::page(1, 5))
            .build()
            .expect("Failed to build the distinct select");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the distinct select"),
            indoc! {r#"
                SELECT COUNT(*) FROM (SELECT DISTINCT t."Kind"
                FROM "Members" t) AS "counted";
                SELECT DISTINCT t."Kind"
                FROM "Members" t
                LIMIT 5;
            "#}
            .trim()
        );

        let plan = SelectContext::new(&metadata, "Member")
            .schema(Schema::parse("Kind").expect("Valid schema"))
            .distinct()
            .paging(Paging::limit(5))
            .build()
            .expect("Failed to build the distinct select");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the distinct select"),
            indoc! {r#"
                SELECT DISTINCT t."Kind"
                FROM "Members" t
                LIMIT 5;
            "#}
            .trim()
        );
    }

    #[test]
    fn exist_navigation() {
        let metadata = catalog();
        let plan = ExistContext::new(&metadata, "User")
            .criteria(Criteria::exists(
                "Members",
                Some(Criteria::like("Label", "%lead%")),
            ))
            .build()
            .expect("Failed to build the exist");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the exist"),
            indoc! {r#"
                SELECT t."Id"
                FROM "Users" t
                WHERE EXISTS (SELECT 1
                FROM "Members" t1
                WHERE t1."user_id" = t."Id" AND t1."Kind" = 'user' AND t1."Label" LIKE @p1
                LIMIT 1)
                LIMIT 1;
            "#}
            .trim()
        );

        let plan = ExistContext::new(&metadata, "User")
            .criteria(Criteria::not_exists("Manager", None))
            .build()
            .expect("Failed to build the exist");
        let sql = WRITER.render(&plan).expect("Failed to render the exist");
        assert!(sql.contains(indoc! {r#"
            WHERE NOT EXISTS (SELECT 1
            FROM "Users" t1
            WHERE t1."Id" = t."manager_id"
            LIMIT 1)"#}));

        let plan = ExistContext::new(&metadata, "User")
            .criteria(Criteria::exists("ManagerId", None))
            .build()
            .expect("Failed to build the exist");
        let sql = WRITER.render(&plan).expect("Failed to render the exist");
        assert!(sql.contains(r#"WHERE t."manager_id" IS NOT NULL"#));
    }

    #[test]
    fn upsert_merge() {
        let metadata = catalog();
        let plan = UpsertContext::new(
            &metadata,
            "Principal",
            Record::new()
                .with("Id", 5i64)
                .with("Email", "carol@example.com"),
        )
        .features(WRITER.features())
        .build()
        .expect("Failed to build the upsert");
        assert_eq!(plan.flatten().len(), 1);
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the upsert"),
            indoc! {r#"
                MERGE INTO "Principals" t
                USING (SELECT @p1 AS "Id", @p2 AS "Email", @p3 AS "Status") AS src
                ON t."Id" = src."Id"
                WHEN MATCHED THEN UPDATE SET "Email" = src."Email"
                WHEN NOT MATCHED THEN INSERT ("Id", "Email", "Status") VALUES (src."Id", src."Email", src."Status");
            "#}
            .trim()
        );

        let plan = UpsertContext::new(
            &metadata,
            "Principal",
            Record::new()
                .with("Id", 5i64)
                .with("Email", "carol@example.com")
                .with("Status", Value::Int32(None)),
        )
        .features(WRITER.features())
        .build()
        .expect("Failed to build the upsert");
        let sql = WRITER.render(&plan).expect("Failed to render the upsert");
        assert!(sql.contains(
            r#"WHEN MATCHED THEN UPDATE SET "Email" = src."Email", "Status" = src."Status""#
        ));
    }

    #[test]
    fn update_split() {
        let metadata = catalog();
        let plan = UpdateContext::new(&metadata, "User", Record::new().with("Status", 0i32))
            .features(WRITER.features())
            .criteria(Criteria::equal("Role.Name", "guest"))
            .build()
            .expect("Failed to build the update");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the update"),
            indoc! {r#"
                UPDATE "Principals" t
                SET "Status" = @p2
                WHERE EXISTS (SELECT 1
                FROM "Users" t1
                INNER JOIN "Roles" t2 ON t2."Id" = t1."role_id"
                WHERE t2."Name" = @p1 AND t1."Id" = t."Id");
            "#}
            .trim()
        );
        let (_, bound) = WRITER.render_bound(&plan).expect("Failed to render the update");
        assert_eq!(bound, ["p2", "p1"]);
        let parameters = plan.base().collection().expect("Own parameters");
        assert_eq!(
            parameters.iter().map(|v| v.name.as_str()).collect::<Vec<_>>(),
            bound
        );
    }

    #[test]
    fn build_errors() {
        let metadata = catalog();
        let error = UpdateContext::new(&metadata, "User", Record::new().with("Created", 0i64))
            .criteria(Criteria::equal("Name", "Bob"))
            .build()
            .expect_err("Created is never updated, nothing is left to write");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::EmptyData(..))
        ));
        let error = SelectContext::new(&metadata, "User")
            .criteria(Criteria::equal("Role.Missing", 1i32))
            .build()
            .expect_err("Missing is not a member of Role");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::UnresolvedPath { .. })
        ));
    }
}
