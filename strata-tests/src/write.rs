use crate::catalog;
use strata_core::{
    Binding, BuildError, Criteria, DeleteContext, ExecuteContext, Image, InsertContext, Parse,
    Record, Schema, SqlWriter, Statement, StatementBuilder, UpdateContext, UpsertContext, Value,
    WriteOptions,
};
use time::macros::datetime;

fn user() -> Record {
    Record::new()
        .with("Email", "alice@example.com")
        .with("Name", "Alice")
        .with("RoleId", 3i32)
}

fn rendered(writer: &dyn SqlWriter, plan: &Statement) -> Vec<String> {
    writer
        .render_plan(plan)
        .into_iter()
        .enumerate()
        .map(|(i, v)| v.unwrap_or_else(|e| panic!("Statement {} failed to render: {:#}", i, e)))
        .collect()
}

pub fn insert(writer: &dyn SqlWriter) {
    let features = writer.features();
    let metadata = catalog();
    let plan = InsertContext::new(&metadata, "User")
        .features(features)
        .record(user())
        .build()
        .expect("Failed to build the user insert");
    let flat = plan.flatten();
    if features.returning {
        assert_eq!(flat.len(), 2);
        assert!(plan.returning().is_some_and(|v| !v.is_empty()));
    } else {
        assert_eq!(flat.len(), 3);
        assert!(matches!(flat[1], Statement::Select(..)));
    }
    assert_eq!(flat[0].table().map(|v| v.name.as_str()), Some("Principals"));
    let Some(&last) = flat.last() else {
        unreachable!();
    };
    assert_eq!(last.table().map(|v| v.name.as_str()), Some("Users"));

    // The key generated by the first level reaches the second one through the master row
    let mut record = user();
    let row = Record::new().with("Id", 42i64);
    flat[if features.returning { 0 } else { 1 }].bind_returned(&mut record, &row);
    assert_eq!(record.value("Id"), Some(&Value::Int64(Some(42))));
    let mut users = last.clone();
    users.bind_master(&row);
    let parameters = users.base().collection().expect("Own parameters");
    assert!(parameters.iter().any(|v| {
        v.binding == Some(Binding::Master("Id".into())) && v.value == Some(Value::Int64(Some(42)))
    }));

    let sql = rendered(writer, &plan);
    assert!(sql[0].starts_with("INSERT INTO "));
    assert!(!sql[0].contains("DEFAULT VALUES"));
}

pub fn insert_children(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let record = user().with(
        "Members",
        vec![
            Record::new().with("Label", "first"),
            Record::new().with("Label", "second"),
        ],
    );
    let plan = InsertContext::new(&metadata, "User")
        .features(writer.features())
        .record(record)
        .build()
        .expect("Failed to build the insert with children");
    let children: Vec<_> = plan
        .flatten()
        .into_iter()
        .filter(|v| matches!(v, Statement::Insert(..)) && v.alias().starts_with("Members."))
        .collect();
    assert_eq!(children.len(), 2);
    let parameters = children[1].base().collection().expect("Own parameters");
    assert!(
        parameters
            .iter()
            .any(|v| v.binding == Some(Binding::Master("Id".into())))
    );
    assert!(
        parameters
            .iter()
            .any(|v| v.value == Some(Value::Varchar(Some("user".into()))))
    );
    rendered(writer, &plan);
}

pub fn insert_many(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let records = ["red", "green", "blue"].map(|v| Record::new().with("Label", v));
    let plan = InsertContext::new(&metadata, "Member")
        .features(writer.features())
        .options(WriteOptions {
            suppress_sequence: true,
            ..Default::default()
        })
        .records(records)
        .build()
        .expect("Failed to build the batch insert");
    let Statement::Insert(insert) = &plan else {
        panic!("Expected an insert, got {}", plan);
    };
    assert_eq!(insert.rows.len(), 3);
    assert!(plan.slaves().is_empty());
    let sql = writer.render(&plan).expect("Failed to render the batch insert");
    assert_eq!(sql.matches("),\n(").count(), 2);
}

pub fn insert_slot(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let record = Record::new().with("Message", "started").with("year", 2026i32);
    let mut plan = InsertContext::new(&metadata, "Log")
        .features(writer.features())
        .record(record.clone())
        .build()
        .expect("Failed to build the log insert");
    plan.bind(&record).expect("Failed to bind the log insert");
    let sql = writer.render(&plan).expect("Failed to render the log insert");
    assert!(sql.contains("log_2026"));
}

pub fn update(writer: &dyn SqlWriter) {
    let features = writer.features();
    let metadata = catalog();
    let record = user().with("Id", 7i64);
    let plan = UpdateContext::new(&metadata, "User", record.clone())
        .features(features)
        .build()
        .expect("Failed to build the user update");
    let flat = plan.flatten();
    if features.multi_table_update {
        assert_eq!(flat.len(), 1);
    } else {
        assert_eq!(flat.len(), 2);
        assert_eq!(flat[0].table().map(|v| v.name.as_str()), Some("Principals"));
        assert_eq!(flat[1].table().map(|v| v.name.as_str()), Some("Users"));
    }
    for sql in rendered(writer, &plan) {
        assert!(sql.starts_with("UPDATE "));
        assert!(sql.contains("\nWHERE "));
    }

    let error = UpdateContext::new(&metadata, "User", user())
        .features(features)
        .build()
        .expect_err("The key is required");
    assert!(matches!(
        error.downcast_ref::<BuildError>(),
        Some(BuildError::MissingPrimaryKey { .. })
    ));
}

pub fn update_bulk(writer: &dyn SqlWriter) {
    let features = writer.features();
    let metadata = catalog();
    let plan = UpdateContext::new(&metadata, "User", Record::new().with("Status", 0i32))
        .features(features)
        .criteria(Criteria::equal("Role.Name", "guest"))
        .build()
        .expect("Failed to build the bulk update");
    assert_eq!(plan.flatten().len(), 1);
    let (sql, bound) = writer
        .render_bound(&plan)
        .expect("Failed to render the bulk update");
    if !features.multi_table_update {
        assert!(sql.contains("EXISTS (SELECT 1"));
    }
    let parameters = plan.base().collection().expect("Own parameters");
    assert_eq!(
        parameters.iter().map(|v| v.name.clone()).collect::<Vec<_>>(),
        bound,
        "The assigned value is bound before the filter"
    );

    let error = UpdateContext::new(&metadata, "User", Record::new().with("Id", 1i64))
        .features(features)
        .criteria(Criteria::equal("Name", "Bob"))
        .build()
        .expect_err("Writing the key needs the option");
    assert!(matches!(
        error.downcast_ref::<BuildError>(),
        Some(BuildError::PrimaryKeyWrite { .. })
    ));
}

pub fn upsert(writer: &dyn SqlWriter) {
    let features = writer.features();
    let metadata = catalog();
    let plan = UpsertContext::new(
        &metadata,
        "Principal",
        Record::new().with("Email", "bob@example.com"),
    )
    .features(features)
    .build()
    .expect("Failed to build the upsert");
    let flat = plan.flatten();
    if features.upsert_returning {
        assert_eq!(flat.len(), 1);
    } else {
        assert_eq!(flat.len(), 2);
        assert!(matches!(flat[1], Statement::Select(..)));
    }
    let sql = rendered(writer, &plan);
    assert!(sql[0].contains("Email"));

    let error = UpsertContext::new(&metadata, "Role", Record::new().with("Name", "guest"))
        .features(features)
        .build()
        .expect_err("Role keys are not generated");
    assert!(matches!(
        error.downcast_ref::<BuildError>(),
        Some(BuildError::MissingPrimaryKey { .. })
    ));
}

pub fn delete(writer: &dyn SqlWriter) {
    let features = writer.features();
    let metadata = catalog();
    let plan = DeleteContext::new(&metadata, "User")
        .features(features)
        .record(Record::new().with("Id", 7i64))
        .build()
        .expect("Failed to build the user delete");
    let flat = plan.flatten();
    if features.multi_table_delete {
        assert_eq!(flat.len(), 1);
    } else {
        assert_eq!(flat.len(), 2);
        let captured = plan
            .returning()
            .and_then(|v| v.into.as_ref())
            .expect("The deleted keys are captured");
        assert_eq!(captured.name, "deleted_User");
        assert!(
            plan.returning()
                .is_some_and(|v| v.members.iter().all(|m| m.image == Image::Deleted))
        );
        assert_eq!(flat[1].table().map(|v| v.name.as_str()), Some("Principals"));
    }
    for sql in rendered(writer, &plan) {
        assert!(sql.contains("DELETE "));
    }
}

pub fn delete_cascade(writer: &dyn SqlWriter) {
    let features = writer.features();
    let metadata = catalog();
    let plan = DeleteContext::new(&metadata, "User")
        .features(features)
        .schema(Schema::parse("Members").expect("Invalid schema"))
        .criteria(Criteria::equal("Role.Name", "guest"))
        .build()
        .expect("Failed to build the cascading delete");
    let flat = plan.flatten();
    if features.multi_table_delete {
        assert_eq!(flat.len(), 1);
    } else {
        assert_eq!(flat.len(), 3);
        assert_eq!(flat[2].alias(), "Members");
    }
    rendered(writer, &plan);
}

pub fn execute(writer: &dyn SqlWriter) {
    let metadata = catalog();
    let plan = ExecuteContext::new(
        &metadata,
        "Purge",
        Record::new().with("Before", datetime!(2026-01-01 00:00)),
    )
    .build()
    .expect("Failed to build the procedure call");
    let Statement::Execute(call) = &plan else {
        panic!("Expected an execution, got {}", plan);
    };
    assert_eq!(call.arguments.len(), 2);
    let sql = writer.render(&plan).expect("Failed to render the call");
    assert!(sql.starts_with("CALL "));

    let plan = ExecuteContext::new(
        &metadata,
        "CountMembers",
        Record::new().with("UserId", 7i64),
    )
    .build()
    .expect("Failed to build the function call");
    let Statement::Execute(call) = &plan else {
        panic!("Expected an execution, got {}", plan);
    };
    assert_eq!(call.arguments.len(), 1);
    assert_eq!(call.result.as_deref(), Some("Total"));
    let sql = writer.render(&plan).expect("Failed to render the call");
    assert!(sql.starts_with("SELECT "));
}
