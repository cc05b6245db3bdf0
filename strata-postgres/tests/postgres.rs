#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata_core::{
        Criteria, DeleteContext, ExecuteContext, ExistContext, Paging, Record, SelectContext,
        SqlWriter, StatementBuilder, UpsertContext,
    };
    use strata_postgres::PostgresSqlWriter;
    use strata_tests::{catalog, execute_tests, init_logs};

    const WRITER: PostgresSqlWriter = PostgresSqlWriter {};

    #[test]
    fn postgres() {
        init_logs();
        execute_tests(&WRITER);
    }

    #[test]
    fn numbered_parameters() {
        let metadata = catalog();
        let plan = SelectContext::new(&metadata, "Member")
            .features(WRITER.features())
            .criteria(Criteria::is_in("Kind", ["user", "admin"]))
            .paging(Paging::page(2, 10))
            .build()
            .expect("Failed to build the select");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the select"),
            indoc! {r#"
                SELECT COUNT(*)
                FROM "Members" t
                WHERE t."Kind" IN ($1, $2);
                SELECT t."Id", t."user_id" AS "UserId", t."Kind", t."Label"
                FROM "Members" t
                WHERE t."Kind" IN ($1, $2)
                LIMIT 10 OFFSET 10;
            "#}
            .trim()
        );

        let plan = ExistContext::new(&metadata, "Member")
            .criteria(Criteria::equal("Kind", "user"))
            .build()
            .expect("Failed to build the exist");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the exist"),
            indoc! {r#"
                SELECT t."Id"
                FROM "Members" t
                WHERE t."Kind" = $1
                LIMIT 1;
            "#}
            .trim()
        );
    }

    #[test]
    fn upsert_on_conflict() {
        let metadata = catalog();
        let plan = UpsertContext::new(
            &metadata,
            "Principal",
            Record::new().with("Email", "bob@example.com"),
        )
        .features(WRITER.features())
        .build()
        .expect("Failed to build the upsert");
        assert!(plan.slaves().is_empty());
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the upsert"),
            indoc! {r#"
                INSERT INTO "Principals" ("Email", "Status") VALUES
                ($1, $2)
                ON CONFLICT ("Id") DO UPDATE SET
                "Email" = EXCLUDED."Email"
                RETURNING "Id";
            "#}
            .trim()
        );
    }

    #[test]
    fn delete_captures_keys() {
        let metadata = catalog();
        let plan = DeleteContext::new(&metadata, "User")
            .features(WRITER.features())
            .record(Record::new().with("Id", 7i64))
            .build()
            .expect("Failed to build the delete");
        let sql: Vec<_> = WRITER
            .render_plan(&plan)
            .into_iter()
            .collect::<Result<_, _>>()
            .expect("Failed to render the delete");
        assert_eq!(
            sql,
            [
                indoc! {r#"
                    CREATE TEMPORARY TABLE IF NOT EXISTS "deleted_User" ("Id" BIGINT NOT NULL);
                    DELETE FROM "deleted_User";
                    WITH "captured" AS (DELETE FROM "Users" t
                    WHERE t."Id" = $1
                    RETURNING "Id")
                    INSERT INTO "deleted_User" SELECT * FROM "captured";
                "#}
                .trim(),
                indoc! {r#"
                    DELETE FROM "Principals" t1
                    WHERE t1."Id" IN (SELECT "Id"
                    FROM "deleted_User");
                "#}
                .trim(),
            ]
        );
    }

    #[test]
    fn call_routines() {
        let metadata = catalog();
        let plan = ExecuteContext::new(&metadata, "Purge", Record::new())
            .build()
            .expect("Failed to build the call");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the call"),
            r#"CALL "purge_principals"($1, $2);"#
        );
        let plan = ExecuteContext::new(&metadata, "CountMembers", Record::new().with("UserId", 3i64))
            .build()
            .expect("Failed to build the call");
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the call"),
            r#"SELECT "count_members"($1) AS "Total";"#
        );
    }
}
