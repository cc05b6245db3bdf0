#[cfg(test)]
mod tests {
    use indoc::indoc;
    use strata::{
        Context, GenericSqlWriter, InsertContext, Record, SqlWriter, StatementBuilder, Value,
    };
    use strata_tests::catalog;
    use time::macros::datetime;
    use uuid::Uuid;

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    fn literal(value: impl Into<Value>) -> String {
        let mut out = String::new();
        WRITER.write_value(&mut Context::default(), &mut out, &value.into());
        out
    }

    #[test]
    fn literals() {
        let id = Uuid::from_u128(0x67e5_5044_10b1_426f_9247_bb68_0e5f_e0c8);
        assert_eq!(literal(id), "'67e55044-10b1-426f-9247-bb680e5fe0c8'");
        assert_eq!(
            literal(datetime!(2026-03-04 10:20:30 +02:00)),
            "'2026-03-04T08:20:30.0'"
        );
        assert_eq!(literal(f32::NEG_INFINITY), "CAST('-inf' AS DOUBLE PRECISION)");
        assert_eq!(literal(f64::NAN), "CAST('NaN' AS DOUBLE PRECISION)");
    }

    #[test]
    fn insert_parameters() {
        let metadata = catalog();
        let created = datetime!(2026-01-15 09:30);
        let record = Record::new()
            .with("Email", "dave@example.com")
            .with("Created", created);
        let mut plan = InsertContext::new(&metadata, "Principal")
            .features(WRITER.features())
            .record(record.clone())
            .build()
            .expect("Failed to build the insert");
        let parameters = plan.base().collection().expect("Own parameters");
        assert!(parameters.iter().all(|v| v.value.is_none() || v.binding.is_none()));
        plan.bind(&record).expect("Failed to bind the insert");
        let parameters = plan.base().collection().expect("Own parameters");
        assert!(
            parameters
                .iter()
                .any(|v| v.value == Some(Value::Timestamp(Some(created))))
        );
        assert_eq!(
            WRITER.render(&plan).expect("Failed to render the insert"),
            indoc! {r#"
                INSERT INTO "Principals" ("Email", "Status", "created_at") VALUES
                (@p1, @p2, @p3)
                RETURNING "Id";
            "#}
            .trim()
        );
    }
}
