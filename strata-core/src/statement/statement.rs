use crate::{
    AggregateStatement, Binding, BuildError, Data, DeleteStatement, ExecutionStatement, ExistStatement,
    InsertStatement, Record, Result, ReturningClause, SelectStatement,
    StatementBase, TableIdentifier, UpdateStatement, UpsertStatement, Value,
};
use std::fmt::{self, Display, Formatter};

/// Root of a statement tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Select(SelectStatement),
    Insert(InsertStatement),
    Update(UpdateStatement),
    Delete(DeleteStatement),
    Upsert(UpsertStatement),
    Exist(ExistStatement),
    Execute(ExecutionStatement),
    Aggregate(AggregateStatement),
}

impl Statement {
    pub fn base(&self) -> &StatementBase {
        match self {
            Statement::Select(v) => &v.base,
            Statement::Insert(v) => &v.base,
            Statement::Update(v) => &v.base,
            Statement::Delete(v) => &v.base,
            Statement::Upsert(v) => &v.base,
            Statement::Exist(v) => &v.select.base,
            Statement::Execute(v) => &v.base,
            Statement::Aggregate(v) => &v.select.base,
        }
    }
    pub fn base_mut(&mut self) -> &mut StatementBase {
        match self {
            Statement::Select(v) => &mut v.base,
            Statement::Insert(v) => &mut v.base,
            Statement::Update(v) => &mut v.base,
            Statement::Delete(v) => &mut v.base,
            Statement::Upsert(v) => &mut v.base,
            Statement::Exist(v) => &mut v.select.base,
            Statement::Execute(v) => &mut v.base,
            Statement::Aggregate(v) => &mut v.select.base,
        }
    }
    pub fn alias(&self) -> &str {
        &self.base().alias
    }
    pub fn table(&self) -> Option<&TableIdentifier> {
        match self {
            Statement::Select(v) => v.table.as_ref(),
            Statement::Insert(v) => Some(&v.table),
            Statement::Update(v) => Some(&v.table),
            Statement::Delete(v) => Some(&v.table),
            Statement::Upsert(v) => Some(&v.table),
            Statement::Exist(v) => v.select.table.as_ref(),
            Statement::Execute(..) => None,
            Statement::Aggregate(v) => v.select.table.as_ref(),
        }
    }
    pub fn returning(&self) -> Option<&ReturningClause> {
        match self {
            Statement::Insert(v) => v.returning.as_ref(),
            Statement::Update(v) => v.returning.as_ref(),
            Statement::Delete(v) => v.returning.as_ref(),
            Statement::Upsert(v) => v.returning.as_ref(),
            _ => None,
        }
    }
    pub fn slaves(&self) -> &[Statement] {
        &self.base().slaves
    }
    pub fn slaves_mut(&mut self) -> &mut Vec<Statement> {
        &mut self.base_mut().slaves
    }

    /// This statement followed by all of its slaves, depth first, in execution order.
    pub fn flatten(&self) -> Vec<&Statement> {
        let mut result = vec![self];
        for slave in self.slaves() {
            result.extend(slave.flatten());
        }
        result
    }

    /// Resolve the parameters and slots reading from the write record.
    ///
    /// Parameters whose member is missing from the record are bound to `NULL`, slots are required.
    pub fn bind(&mut self, record: &Record) -> Result<()> {
        let base = self.base_mut();
        if let Some(parameters) = base.parameters.collection_mut() {
            for parameter in parameters.iter_mut() {
                if let Some(Binding::Data(path)) = &parameter.binding {
                    parameter.value = Some(lookup(record, path));
                }
            }
        }
        for slot in base.slots.iter_mut() {
            let value = record.value(&slot.name).cloned().ok_or_else(|| {
                BuildError::UnresolvedPath {
                    entity: base.alias.clone(),
                    path: format!("${{{}}}", slot.name),
                }
            })?;
            slot.value = Some(value);
        }
        Ok(())
    }

    /// Resolve the parameters reading from the row produced by the master statement.
    pub fn bind_master(&mut self, row: &Record) {
        if let Some(parameters) = self.base_mut().parameters.collection_mut() {
            for parameter in parameters.iter_mut() {
                if let Some(Binding::Master(member)) = &parameter.binding {
                    parameter.value = Some(lookup(row, member));
                }
            }
        }
    }

    /// Copy the values returned by this statement into the write record.
    ///
    /// The row is keyed by the labels the statement returns (its returning members, or the members
    /// of a follow up select), each value lands into the member path the field serializes.
    pub fn bind_returned(&self, record: &mut Record, row: &Record) {
        let labels: Vec<(&str, &str)> = match self {
            Statement::Select(v) => v
                .members
                .iter()
                .filter_map(|v| {
                    let label = v.label()?;
                    let member = v.as_field().and_then(|f| f.token.as_deref());
                    Some((label, member.unwrap_or(label)))
                })
                .collect(),
            _ => self
                .returning()
                .map(|v| {
                    v.members
                        .iter()
                        .map(|v| {
                            let label = v.field.label();
                            (label, v.field.token.as_deref().unwrap_or(label))
                        })
                        .collect()
                })
                .unwrap_or_default(),
        };
        for (label, member) in labels {
            if let Some(value) = row.value(label) {
                record.assign(member, value.clone());
            }
        }
    }
}

fn lookup(record: &Record, path: &str) -> Value {
    match record.resolve(path) {
        Some(Data::Value(v)) => v.clone(),
        _ => Value::Null,
    }
}

impl Display for Statement {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let kind = match self {
            Statement::Select(..) => "Select",
            Statement::Insert(..) => "Insert",
            Statement::Update(..) => "Update",
            Statement::Delete(..) => "Delete",
            Statement::Upsert(..) => "Upsert",
            Statement::Exist(..) => "Exist",
            Statement::Execute(..) => "Execute",
            Statement::Aggregate(..) => "Aggregate",
        };
        write!(f, "{}({})", kind, self.alias())
    }
}

impl From<SelectStatement> for Statement {
    fn from(value: SelectStatement) -> Self {
        Statement::Select(value)
    }
}

impl From<InsertStatement> for Statement {
    fn from(value: InsertStatement) -> Self {
        Statement::Insert(value)
    }
}

impl From<UpdateStatement> for Statement {
    fn from(value: UpdateStatement) -> Self {
        Statement::Update(value)
    }
}

impl From<DeleteStatement> for Statement {
    fn from(value: DeleteStatement) -> Self {
        Statement::Delete(value)
    }
}

impl From<UpsertStatement> for Statement {
    fn from(value: UpsertStatement) -> Self {
        Statement::Upsert(value)
    }
}
