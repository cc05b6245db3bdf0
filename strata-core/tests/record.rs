#[cfg(test)]
mod tests {
    use strata_core::{
        BuildError, Data, Record, Slot, Value, fill_slots, join_path, slot_names, split_path,
        substitute_slots,
    };

    fn record() -> Record {
        Record::new()
            .with("Name", "Alice")
            .with("Role", Record::new().with("Name", "admin"))
            .with(
                "Members",
                vec![
                    Record::new().with("Label", "first"),
                    Record::new().with("Label", "second"),
                ],
            )
    }

    #[test]
    fn resolve() {
        let record = record();
        assert_eq!(record.value("name"), Some(&Value::Varchar(Some("Alice".into()))));
        assert_eq!(
            record.resolve("Role.Name").and_then(Data::as_value),
            Some(&Value::Varchar(Some("admin".into())))
        );
        assert_eq!(
            record.resolve("Members.1.Label").and_then(Data::as_value),
            Some(&Value::Varchar(Some("second".into())))
        );
        assert!(record.resolve("Members.2.Label").is_none());
        assert!(record.resolve("Members.Label").is_none());
        assert!(record.resolve("Name.Length").is_none());
    }

    #[test]
    fn assign() {
        let mut record = record();
        assert!(record.assign("Id", Value::Int64(Some(7))));
        assert!(record.assign("Role.Id", Value::Int32(Some(3))));
        assert!(record.assign("Members.0.Id", Value::Int64(Some(11))));
        assert!(record.assign("Manager.Id", Value::Int64(Some(2))));
        assert!(!record.assign("Members.5.Id", Value::Int64(Some(1))));
        assert!(!record.assign("Name.Id", Value::Int64(Some(1))));
        assert_eq!(record.value("Id"), Some(&Value::Int64(Some(7))));
        assert_eq!(
            record.resolve("Members.0.Id").and_then(Data::as_value),
            Some(&Value::Int64(Some(11)))
        );
        assert_eq!(
            record.resolve("Manager.Id").and_then(Data::as_value),
            Some(&Value::Int64(Some(2)))
        );
        record.set("NAME", "Bob");
        assert_eq!(record.value("Name"), Some(&Value::Varchar(Some("Bob".into()))));
    }

    #[test]
    fn paths() {
        assert_eq!(split_path("Role.Department.Name"), ("Role", Some("Department.Name")));
        assert_eq!(split_path("Name"), ("Name", None));
        assert_eq!(join_path("", "Name"), "Name");
        assert_eq!(join_path("Role", "Name"), "Role.Name");
    }

    #[test]
    fn slots() {
        assert_eq!(slot_names("log_${year}_${month}"), ["year", "month"]);
        assert!(slot_names("logs").is_empty());

        let record = Record::new().with("year", 2026i32).with("month", "03");
        assert_eq!(
            substitute_slots("log_${year}_${month}", &record).unwrap(),
            "log_2026_03"
        );
        let error = substitute_slots("log_${day}", &record).expect_err("No day in the record");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::UnresolvedPath { .. })
        ));

        let slots = [
            Slot {
                name: "year".into(),
                value: Some(Value::Int32(Some(2026))),
            },
            Slot {
                name: "month".into(),
                value: None,
            },
        ];
        assert_eq!(fill_slots("log_${year}_${month}", &slots), "log_2026_${month}");
    }
}
