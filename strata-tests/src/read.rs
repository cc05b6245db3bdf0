use crate::catalog;
use strata_core::{
    AggregateContext, AggregateFunction, Binding, BuildError, Criteria, ExistContext, Grouping,
    Paging, Parse, Schema, SelectContext, Sorting, SqlWriter, Statement, StatementBuilder, Value,
};

pub fn select(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = SelectContext::new(&metadata, "User")
        .features(writer.features())
        .schema(Schema::parse("Name, Role{Name}, Members{Label}").expect("Invalid schema"))
        .criteria(Criteria::equal("Role.Name", "admin"))
        .sort(Sorting::ascending("Name"))
        .build()
        .expect("Failed to build the user select");
    let Statement::Select(select) = &plan else {
        panic!("Expected a select, got {}", plan);
    };
    assert_eq!(select.from.len(), 1, "Role is joined once");
    assert!(select.selects("Role.Name"));
    assert!(select.selects("Id"), "The key correlating the members is selected");
    assert_eq!(plan.slaves().len(), 1);

    let mut members = plan.slaves()[0].clone();
    assert_eq!(members.alias(), "Members");
    let parameters = members.base().collection().expect("Own parameters");
    assert!(
        parameters
            .iter()
            .any(|v| v.binding == Some(Binding::Master("Id".into())))
    );
    members.bind_master(&strata_core::Record::new().with("Id", 5i64));
    let bound = members.base().collection().expect("Own parameters");
    assert!(bound.iter().any(|v| v.value == Some(Value::Int64(Some(5)))));

    for (i, sql) in writer.render_plan(&plan).into_iter().enumerate() {
        let sql = sql.unwrap_or_else(|e| panic!("Statement {} failed to render: {:#}", i, e));
        assert!(sql.ends_with(';'));
    }
    let sql = writer.render(&plan).expect("Failed to render the user select");
    assert!(sql.contains("JOIN"));
    assert!(sql.contains("ORDER BY"));
}

pub fn paged(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = SelectContext::new(&metadata, "Member")
        .features(writer.features())
        .criteria(Criteria::is_in("Kind", ["user", "admin"]))
        .paging(Paging::page(3, 10))
        .build()
        .expect("Failed to build the paged select");
    let sql = writer.render(&plan).expect("Failed to render the paged select");
    let count = sql.find("COUNT(*)").expect("The total is counted");
    let page = sql.find("LIMIT 10 OFFSET 20").expect("The page is read");
    assert!(count < page);
    assert_eq!(sql.matches(" IN (").count(), 2);
}

/// Parameters are collected in the order their placeholders first appear.
pub fn grouped(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = SelectContext::new(&metadata, "Member")
        .features(writer.features())
        .criteria(Criteria::equal("Kind", "user"))
        .grouping(
            Grouping::by(["UserId"])
                .aggregate(AggregateFunction::Sum, Some("Id"), "Total")
                .having(Criteria::greater_than("Total", 5i64)),
        )
        .sort(Sorting::ascending("Total"))
        .paging(Paging::page(2, 10))
        .build()
        .expect("Failed to build the grouped select");
    let (sql, bound) = writer
        .render_bound(&plan)
        .expect("Failed to render the grouped select");
    assert!(sql.contains("GROUP BY "));
    assert!(sql.contains("\nHAVING SUM("));
    assert_eq!(sql.matches("HAVING").count(), 2, "The count wraps the grouped select");
    assert_eq!(bound.len(), 4);
    let mut first = Vec::new();
    for name in &bound {
        if !first.contains(name) {
            first.push(name.clone());
        }
    }
    let parameters = plan.base().collection().expect("Own parameters");
    assert_eq!(
        parameters.iter().map(|v| v.name.clone()).collect::<Vec<_>>(),
        first
    );
}

pub fn empty_list(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = SelectContext::new(&metadata, "Member")
        .criteria(Criteria::and([
            Criteria::is_in("Kind", Vec::<Value>::new()),
            Criteria::equal("Label", Value::Null),
        ]))
        .build()
        .expect("Failed to build the select");
    let sql = writer.render(&plan).expect("Failed to render the select");
    assert!(!sql.contains(" IN "));
    assert!(sql.contains(" IS NULL"));
}

pub fn exist(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = ExistContext::new(&metadata, "User")
        .criteria(Criteria::exists(
            "Members",
            Some(Criteria::like("Label", "%lead%")),
        ))
        .build()
        .expect("Failed to build the exist");
    assert!(matches!(plan, Statement::Exist(..)));
    let sql = writer.render(&plan).expect("Failed to render the exist");
    assert!(sql.contains("EXISTS (SELECT"));
    assert!(sql.contains("LIMIT 1"));
}

pub fn aggregate(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = AggregateContext::new(&metadata, "Member", AggregateFunction::Count, None)
        .criteria(Criteria::greater_than("UserId", 10i64))
        .build()
        .expect("Failed to build the aggregate");
    let Statement::Aggregate(aggregate) = &plan else {
        panic!("Expected an aggregate, got {}", plan);
    };
    assert!(aggregate.select.selects(strata_core::AGGREGATE_LABEL));
    let sql = writer.render(&plan).expect("Failed to render the aggregate");
    assert!(sql.starts_with("SELECT COUNT(*) AS "));
}

pub fn failures(_writer: &dyn SqlWriter) {
    let metadata = catalog();
    let error = SelectContext::new(&metadata, "User")
        .sort(Sorting::descending("Notes"))
        .build()
        .expect_err("Notes is not sortable");
    assert!(matches!(
        error.downcast_ref::<BuildError>(),
        Some(BuildError::NotSortable { .. })
    ));
    let error = SelectContext::new(&metadata, "User")
        .criteria(Criteria::equal("Members.Label", "x"))
        .build()
        .expect_err("One-to-many members cannot be compared directly");
    assert!(matches!(
        error.downcast_ref::<BuildError>(),
        Some(BuildError::IllegalNavigation { .. })
    ));
    let error = SelectContext::new(&metadata, "Nobody")
        .build()
        .expect_err("Nobody is not an entity");
    assert!(matches!(
        error.downcast_ref::<BuildError>(),
        Some(BuildError::UnknownEntity(..))
    ));
}
