#[cfg(test)]
mod tests {
    use strata_core::{
        AggregateFunction, ConditionExpression, Context, DataType, Expression, GenericSqlWriter,
        Operator, RenderError, Result, SqlWriter, Value,
    };
    use time::macros::{date, datetime, time};

    const WRITER: GenericSqlWriter = GenericSqlWriter {};

    fn write(expression: &Expression) -> Result<String> {
        let mut out = String::new();
        WRITER.write_expression(&mut Context::default(), &mut out, expression)?;
        Ok(out)
    }

    fn literal(value: impl Into<Value>) -> String {
        let mut out = String::new();
        WRITER.write_value(&mut Context::default(), &mut out, &value.into());
        out
    }

    fn a() -> Expression {
        Expression::field("t", "a")
    }
    fn b() -> Expression {
        Expression::field("t", "b")
    }
    fn c() -> Expression {
        Expression::field("t", "c")
    }

    #[test]
    fn arithmetic() {
        let expr = Expression::binary(
            Operator::Multiply,
            Expression::binary(Operator::Plus, a(), b()),
            Expression::constant(3i32),
        );
        assert_eq!(write(&expr).unwrap(), r#"(t."a" + t."b") * 3"#);

        let expr = Expression::binary(
            Operator::Plus,
            a(),
            Expression::binary(Operator::Multiply, b(), Expression::constant(3i32)),
        );
        assert_eq!(write(&expr).unwrap(), r#"t."a" + t."b" * 3"#);

        let expr = Expression::binary(
            Operator::Minus,
            a(),
            Expression::binary(Operator::Minus, b(), c()),
        );
        assert_eq!(write(&expr).unwrap(), r#"t."a" - (t."b" - t."c")"#);

        let expr = Expression::binary(
            Operator::Minus,
            Expression::binary(Operator::Minus, a(), b()),
            c(),
        );
        assert_eq!(write(&expr).unwrap(), r#"t."a" - t."b" - t."c""#);

        let expr = Expression::negate(a());
        assert_eq!(write(&expr).unwrap(), r#"-t."a""#);
        let expr = Expression::negate(Expression::binary(Operator::Plus, a(), b()));
        assert_eq!(write(&expr).unwrap(), r#"-(t."a" + t."b")"#);
    }

    #[test]
    fn comparisons() {
        let expr = Expression::equal(a(), Expression::null());
        assert_eq!(write(&expr).unwrap(), r#"t."a" IS NULL"#);
        let expr = Expression::not_equal(a(), Expression::null());
        assert_eq!(write(&expr).unwrap(), r#"t."a" IS NOT NULL"#);
        let expr = Expression::less_than_or_equal(a(), Expression::parameter("p1"));
        assert_eq!(write(&expr).unwrap(), r#"t."a" <= @p1"#);
        let expr = Expression::is_in(
            a(),
            vec![Expression::constant(1i32), Expression::constant(2i32)],
        );
        assert_eq!(write(&expr).unwrap(), r#"t."a" IN (1, 2)"#);
        let expr = Expression::not_in(a(), vec![Expression::constant("x")]);
        assert_eq!(write(&expr).unwrap(), r#"t."a" NOT IN ('x')"#);
        let expr = Expression::between(
            a(),
            Expression::constant(1i32),
            Expression::constant(5i32),
        );
        assert_eq!(write(&expr).unwrap(), r#"t."a" BETWEEN 1 AND 5"#);
        let expr = Expression::like(a(), Expression::constant("%x%"));
        assert_eq!(write(&expr).unwrap(), r#"t."a" LIKE '%x%'"#);
    }

    #[test]
    fn conditions() {
        let expr = Expression::and(vec![
            Expression::equal(a(), Expression::constant(1i32)),
            Expression::or(vec![
                Expression::equal(b(), Expression::constant(2i32)),
                Expression::equal(c(), Expression::constant(3i32)),
            ]),
        ]);
        assert_eq!(
            write(&expr).unwrap(),
            r#"t."a" = 1 AND (t."b" = 2 OR t."c" = 3)"#
        );

        let expr = Expression::or(vec![
            Expression::and(vec![Expression::equal(a(), Expression::constant(1i32))]),
            Expression::equal(b(), Expression::constant(2i32)),
        ]);
        assert_eq!(write(&expr).unwrap(), r#"t."a" = 1 OR t."b" = 2"#);

        let expr = Expression::not(Expression::and(vec![
            Expression::equal(a(), Expression::constant(1i32)),
            Expression::equal(b(), Expression::constant(2i32)),
        ]));
        assert_eq!(write(&expr).unwrap(), r#"NOT (t."a" = 1 AND t."b" = 2)"#);

        let expr = Expression::not(Expression::equal(a(), Expression::constant(1i32)));
        assert_eq!(write(&expr).unwrap(), r#"NOT t."a" = 1"#);

        assert_eq!(write(&Expression::and(vec![])).unwrap(), "true");

        let expr = Expression::and(vec![Expression::or(vec![
            Expression::equal(a(), Expression::constant(1i32)),
            Expression::and(vec![
                Expression::equal(b(), Expression::constant(2i32)),
                Expression::equal(c(), Expression::constant(3i32)),
            ]),
        ])]);
        assert_eq!(
            write(&expr).unwrap(),
            r#"t."a" = 1 OR (t."b" = 2 AND t."c" = 3)"#
        );
    }

    #[test]
    fn condition_splicing() {
        let condition = ConditionExpression::and()
            .with(Expression::and(vec![
                Expression::equal(a(), Expression::constant(1i32)),
                Expression::equal(b(), Expression::constant(2i32)),
            ]))
            .with(Expression::or(vec![Expression::equal(
                c(),
                Expression::constant(3i32),
            )]))
            .with(Expression::or(vec![]));
        assert_eq!(condition.len(), 3);
        assert!(
            condition
                .items
                .iter()
                .all(|v| !matches!(v, Expression::Condition(..)))
        );
        assert_eq!(
            write(&Expression::Condition(condition)).unwrap(),
            r#"t."a" = 1 AND t."b" = 2 AND t."c" = 3"#
        );

        let condition = ConditionExpression::and().with(Expression::or(vec![
            Expression::equal(a(), Expression::constant(1i32)),
            Expression::equal(b(), Expression::constant(2i32)),
        ]));
        assert_eq!(condition.len(), 1);
        assert_eq!(
            write(&Expression::Condition(condition)).unwrap(),
            r#"t."a" = 1 OR t."b" = 2"#
        );
    }

    #[test]
    fn values() {
        assert_eq!(literal("it's"), "'it''s'");
        assert_eq!(literal(vec![0xCAu8, 0xFE]), "X'CAFE'");
        assert_eq!(literal(date!(2026 - 03 - 04)), "'2026-03-04'");
        assert_eq!(literal(time!(10:20:30.5)), "'10:20:30.5'");
        assert_eq!(literal(time!(10:20:30)), "'10:20:30.0'");
        assert_eq!(
            literal(datetime!(2026-03-04 10:20:30.125)),
            "'2026-03-04T10:20:30.125'"
        );
        assert_eq!(literal(-42i64), "-42");
        assert_eq!(literal(1.5f64), "1.5");
        assert_eq!(literal(true), "true");
        assert_eq!(literal(Value::Int32(None)), "NULL");
        assert_eq!(
            literal(f64::INFINITY),
            "CAST('inf' AS DOUBLE PRECISION)"
        );
        assert_eq!(
            literal(Value::List(
                Some(vec![Value::Int32(Some(1)), Value::Int32(Some(2))]),
                Box::new(Value::Int32(None)),
            )),
            "[1,2]"
        );
    }

    #[test]
    fn identifiers() {
        let expr = Expression::field("t", "we\"ird");
        assert_eq!(write(&expr).unwrap(), r#"t."we""ird""#);
        let mut out = String::new();
        let mut context = Context::default();
        context.qualify_columns = false;
        WRITER.write_expression(&mut context, &mut out, &a()).unwrap();
        assert_eq!(out, r#""a""#);
    }

    #[test]
    fn functions() {
        let expr = Expression::call("lower", vec![Expression::call("guid", vec![])]);
        assert_eq!(write(&expr).unwrap(), "LOWER(GEN_RANDOM_UUID())");
        let expr = Expression::call("now", vec![]).aliased("When");
        assert_eq!(write(&expr).unwrap(), r#"NOW() AS "When""#);
        assert_eq!(write(&Expression::count_all()).unwrap(), "COUNT(*)");
        let expr = Expression::call("coalesce", vec![a(), Expression::constant(0i32)]);
        assert_eq!(write(&expr).unwrap(), r#"COALESCE(t."a", 0)"#);
    }

    #[test]
    fn aggregate_types() {
        assert_eq!(AggregateFunction::Count.data_type(None), DataType::Int64);
        assert_eq!(
            AggregateFunction::Count.data_type(Some(&DataType::String(10))),
            DataType::Int64
        );
        assert_eq!(
            AggregateFunction::Sum.data_type(Some(&DataType::Int16)),
            DataType::Int64
        );
        assert_eq!(
            AggregateFunction::Sum.data_type(Some(&DataType::Decimal(10, 2))),
            DataType::Decimal(10, 2)
        );
        assert_eq!(
            AggregateFunction::Maximum.data_type(Some(&DataType::Date)),
            DataType::Date
        );
        assert_eq!(
            AggregateFunction::Average.data_type(Some(&DataType::Int32)),
            DataType::Float64
        );
    }

    #[test]
    fn sequences() {
        let expr = Expression::next_value("department_seq");
        assert_eq!(write(&expr).unwrap(), r#"NEXT VALUE FOR "department_seq""#);
        let expr = Expression::current_value("department_seq");
        assert_eq!(write(&expr).unwrap(), "CURRVAL('department_seq')");
        assert_eq!(write(&Expression::current_value("")).unwrap(), "LASTVAL()");
        let error = write(&Expression::next_value("")).expect_err("Identities have no next");
        assert!(matches!(
            error.downcast_ref::<RenderError>(),
            Some(RenderError::Unsupported {
                dialect: "generic",
                ..
            })
        ));
    }

    #[test]
    fn unsupported() {
        let error = write(&Expression::unary(Operator::Plus, a())).expect_err("Not unary");
        assert!(matches!(
            error.downcast_ref::<RenderError>(),
            Some(RenderError::Unsupported { .. })
        ));
        let error = write(&Expression::binary(Operator::Not, a(), b())).expect_err("Not binary");
        assert!(error.to_string().contains("generic"));
    }
}
