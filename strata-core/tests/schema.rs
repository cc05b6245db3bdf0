#[cfg(test)]
mod tests {
    use strata_core::{BuildError, Paging, Parse, Schema, SchemaMember, Sorting};

    #[test]
    fn parse_nested() {
        let schema = Schema::parse("Name, Role{Name}, Members:2/10(~Label, Kind){*, !Notes}")
            .expect("Valid schema");
        assert!(!schema.wildcard);
        assert_eq!(schema.members.len(), 3);
        assert_eq!(schema.members[0].name, "Name");
        assert!(schema.members[0].schema.is_none());

        let role = schema.member("Role").expect("Role is selected");
        let role = role.schema.as_ref().expect("Role has its schema");
        assert_eq!(role.members.len(), 1);
        assert_eq!(role.members[0].name, "Name");

        let members = schema.member("members").expect("Names are case insensitive");
        assert_eq!(members.paging, Some(Paging::page(2, 10)));
        assert_eq!(
            members.sorting,
            [Sorting::descending("Label"), Sorting::ascending("Kind")]
        );
        let children = members.schema.as_ref().expect("Members has its schema");
        assert!(children.wildcard);
        assert!(children.members.is_empty());
        assert!(children.is_excluded("Notes"));
    }

    #[test]
    fn parse_dotted() {
        let schema = Schema::parse("Role.Name, Role.Department{Name}").expect("Valid schema");
        assert_eq!(schema.members.len(), 1);
        let role = schema.members[0].schema.as_ref().expect("Nested members");
        assert_eq!(role.members.len(), 2);
        assert_eq!(role.members[0].name, "Name");
        assert_eq!(role.members[1].name, "Department");
        assert!(role.members[1].schema.is_some());
        let built = Schema::new()
            .with("Role.Name")
            .with(SchemaMember::new("Role.Department").children(Schema::new().with("Name")));
        assert_eq!(schema, built);
    }

    #[test]
    fn parse_empty() {
        let schema = Schema::parse("").expect("Empty schema");
        assert!(schema.is_empty());
        let schema = Schema::parse("  *  ").expect("Wildcard schema");
        assert_eq!(schema, Schema::all());
    }

    #[test]
    fn parse_errors() {
        let error = Schema::parse("Name,").expect_err("Missing member");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidSchema { position: 5, .. })
        ));
        let error = Schema::parse("Name}").expect_err("Unbalanced brace");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidSchema { position: 4, .. })
        ));
        let error = Schema::parse("Members(~)").expect_err("Empty sorting");
        assert!(matches!(
            error.downcast_ref::<BuildError>(),
            Some(BuildError::InvalidSchema { .. })
        ));
        assert!(Schema::parse("Members:x/10").is_err());
        assert!(Schema::parse("Role{Name").is_err());
    }

    #[test]
    fn paging() {
        assert_eq!(Paging::parse("5").expect("Valid paging"), Paging::limit(5));
        assert_eq!(
            Paging::parse(" 3 / 20 ").expect("Valid paging"),
            Paging::page(3, 20)
        );
        assert_eq!(Paging::page(3, 20).offset(), 40);
        assert_eq!(Paging::page(0, 20).offset(), 0);
        assert_eq!(Paging::limit(7).offset(), 0);
        assert!(!Paging::limit(7).total);
        assert!(Paging::page(1, 7).total);
    }

    #[test]
    fn sorting() {
        assert_eq!(
            Sorting::parse("~Created").expect("Valid sorting"),
            Sorting::descending("Created")
        );
        assert_eq!(
            Sorting::parse("Name").expect("Valid sorting"),
            Sorting::ascending("Name")
        );
    }
}
