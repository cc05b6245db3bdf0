use strata_core::{
    CommandDef, ComplexProperty, ConstraintActor, DataType, Direction, Entity, MetadataCatalog,
    Multiplicity, Sequence, SimplexProperty,
};

/// Metadata shared by the scenarios.
///
/// `User` extends `Principal` (identity key `Id`), reaches its `Role` through `RoleId` and owns
/// its `Members`. `Department` draws its key from the named sequence `department_seq`, `Log` is
/// partitioned by the `year` slot.
pub fn catalog() -> MetadataCatalog {
    MetadataCatalog::new()
        .with_entity(
            Entity::new("Principal", "Principals")
                .key(["Id"])
                .property(
                    SimplexProperty::new("Id", DataType::Int64)
                        .required()
                        .sequence(Sequence::identity()),
                )
                .property(SimplexProperty::new("Email", DataType::String(120)).required())
                .property(SimplexProperty::new("Status", DataType::Int32).default_value(1i32))
                .property(
                    SimplexProperty::new("Created", DataType::DateTime)
                        .field("created_at")
                        .immutable(),
                ),
        )
        .with_entity(
            Entity::new("User", "Users")
                .inherits("Principal")
                .property(SimplexProperty::new("Name", DataType::String(80)).required())
                .property(SimplexProperty::new("RoleId", DataType::Int32).field("role_id"))
                .property(SimplexProperty::new("Notes", DataType::String(0)).unsortable())
                .property(
                    ComplexProperty::new("Role", "Role", Multiplicity::One).link("RoleId", "Id"),
                )
                .property(
                    ComplexProperty::new("Members", "Member", Multiplicity::Many)
                        .link("Id", "UserId")
                        .constraint("Kind", ConstraintActor::Foreign, "user"),
                )
                .property(
                    ComplexProperty::new("Manager", "User", Multiplicity::ZeroOrOne)
                        .link("ManagerId", "Id"),
                )
                .property(SimplexProperty::new("ManagerId", DataType::Int64).field("manager_id")),
        )
        .with_entity(
            Entity::new("Role", "Roles")
                .key(["Id"])
                .property(SimplexProperty::new("Id", DataType::Int32).required())
                .property(SimplexProperty::new("Name", DataType::String(40)).required())
                .property(
                    ComplexProperty::new("Department", "Department", Multiplicity::ZeroOrOne)
                        .link("DepartmentId", "Id"),
                )
                .property(
                    SimplexProperty::new("DepartmentId", DataType::Int32).field("department_id"),
                ),
        )
        .with_entity(
            Entity::new("Member", "Members")
                .key(["Id"])
                .property(
                    SimplexProperty::new("Id", DataType::Int64)
                        .required()
                        .sequence(Sequence::identity()),
                )
                .property(SimplexProperty::new("UserId", DataType::Int64).field("user_id"))
                .property(SimplexProperty::new("Kind", DataType::String(16)))
                .property(SimplexProperty::new("Label", DataType::String(0))),
        )
        .with_entity(
            Entity::new("Department", "Departments")
                .key(["Id"])
                .property(
                    SimplexProperty::new("Id", DataType::Int32)
                        .required()
                        .sequence(Sequence::named("department_seq")),
                )
                .property(SimplexProperty::new("Name", DataType::String(60))),
        )
        .with_entity(
            Entity::new("Log", "log_${year}")
                .key(["Id"])
                .property(
                    SimplexProperty::new("Id", DataType::Int64)
                        .required()
                        .sequence(Sequence::identity()),
                )
                .property(SimplexProperty::new("Message", DataType::String(0))),
        )
        .with_command(
            CommandDef::procedure("Purge")
                .routine("purge_principals")
                .parameter("Before", DataType::DateTime, Direction::Input)
                .parameter("Removed", DataType::Int32, Direction::Output),
        )
        .with_command(
            CommandDef::function("CountMembers")
                .routine("count_members")
                .parameter("UserId", DataType::Int64, Direction::Input)
                .parameter("Total", DataType::Int32, Direction::ReturnValue),
        )
}
