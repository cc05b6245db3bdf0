use crate::{AggregateFunction, Criteria, Metadata, Record, Schema};

/// Capabilities of the target engine, consulted by the builders to pick native constructs or
/// multi statement fallbacks.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Features {
    /// `RETURNING` (or equivalent) on insert, update and delete.
    pub returning: bool,
    /// A single `UPDATE` can write the columns of joined tables.
    pub multi_table_update: bool,
    /// A single `DELETE` can remove rows of joined tables.
    pub multi_table_delete: bool,
    /// The upsert statement can return the values it wrote.
    pub upsert_returning: bool,
}

impl Features {
    pub const NONE: Features = Features {
        returning: false,
        multi_table_update: false,
        multi_table_delete: false,
        upsert_returning: false,
    };
}

/// Whether a returned value is read before or after the write.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Image {
    #[default]
    Inserted,
    Deleted,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturningRequest {
    pub member: String,
    pub image: Image,
}

#[derive(Default, Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Skip the navigation constraints when writing links.
    pub ignore_constraint: bool,
    /// Do not retrieve the values generated by sequences.
    pub suppress_sequence: bool,
    /// Allow bulk updates to write the primary key.
    pub update_primary_key: bool,
    pub returning: Vec<ReturningRequest>,
}

impl WriteOptions {
    pub fn returning(mut self, member: impl Into<String>, image: Image) -> Self {
        self.returning.push(ReturningRequest {
            member: member.into(),
            image,
        });
        self
    }
}

/// Page of rows to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paging {
    /// One based page number.
    pub index: u32,
    pub size: u32,
    /// Count the rows of every page first.
    pub total: bool,
}

impl Paging {
    pub fn page(index: u32, size: u32) -> Self {
        Self {
            index: index.max(1),
            size,
            total: true,
        }
    }
    pub fn limit(size: u32) -> Self {
        Self {
            index: 1,
            size,
            total: false,
        }
    }
    pub fn offset(&self) -> u64 {
        (self.index.max(1) as u64 - 1) * self.size as u64
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sorting {
    pub member: String,
    pub descending: bool,
}

impl Sorting {
    pub fn ascending(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            descending: false,
        }
    }
    pub fn descending(member: impl Into<String>) -> Self {
        Self {
            member: member.into(),
            descending: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupAggregate {
    pub function: AggregateFunction,
    /// Missing member means `*`.
    pub member: Option<String>,
    pub distinct: bool,
    pub alias: String,
}

#[derive(Default, Debug, Clone, PartialEq)]
pub struct Grouping {
    pub keys: Vec<String>,
    pub aggregates: Vec<GroupAggregate>,
    /// May reference the aggregates by alias.
    pub having: Option<Criteria>,
}

impl Grouping {
    pub fn by<S: Into<String>>(keys: impl IntoIterator<Item = S>) -> Self {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }
    pub fn aggregate(
        mut self,
        function: AggregateFunction,
        member: Option<&str>,
        alias: impl Into<String>,
    ) -> Self {
        self.aggregates.push(GroupAggregate {
            function,
            member: member.map(Into::into),
            distinct: false,
            alias: alias.into(),
        });
        self
    }
    pub fn having(mut self, criteria: Criteria) -> Self {
        self.having = Some(criteria);
        self
    }
}

macro_rules! context_common {
    () => {
        pub fn features(mut self, features: Features) -> Self {
            self.features = features;
            self
        }
        pub fn schema(mut self, schema: Schema) -> Self {
            self.schema = Some(schema);
            self
        }
    };
}

macro_rules! context_criteria {
    () => {
        pub fn criteria(mut self, criteria: Criteria) -> Self {
            self.criteria = Some(criteria);
            self
        }
    };
}

macro_rules! context_options {
    () => {
        pub fn options(mut self, options: WriteOptions) -> Self {
            self.options = options;
            self
        }
    };
}

pub struct SelectContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub features: Features,
    pub entity: String,
    /// Missing schema selects every simplex member.
    pub schema: Option<Schema>,
    pub criteria: Option<Criteria>,
    pub sorting: Vec<Sorting>,
    pub grouping: Option<Grouping>,
    pub paging: Option<Paging>,
    pub distinct: bool,
}

impl<'a> SelectContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, entity: impl Into<String>) -> Self {
        Self {
            metadata,
            features: Features::NONE,
            entity: entity.into(),
            schema: None,
            criteria: None,
            sorting: Vec::new(),
            grouping: None,
            paging: None,
            distinct: false,
        }
    }
    context_common!();
    context_criteria!();
    pub fn sort(mut self, sorting: Sorting) -> Self {
        self.sorting.push(sorting);
        self
    }
    pub fn grouping(mut self, grouping: Grouping) -> Self {
        self.grouping = Some(grouping);
        self
    }
    pub fn paging(mut self, paging: Paging) -> Self {
        self.paging = Some(paging);
        self
    }
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

/// Records inserted into an entity.
///
/// The plan writes one table per level of the inheritance chain, root ancestor first, so that
/// the key the root generates is bound into the derived tables.
pub struct InsertContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub features: Features,
    pub entity: String,
    /// Restricts the one-to-many children written along with the records.
    pub schema: Option<Schema>,
    pub data: Vec<Record>,
    pub options: WriteOptions,
}

impl<'a> InsertContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, entity: impl Into<String>) -> Self {
        Self {
            metadata,
            features: Features::NONE,
            entity: entity.into(),
            schema: None,
            data: Vec::new(),
            options: Default::default(),
        }
    }
    context_common!();
    context_options!();
    pub fn record(mut self, record: Record) -> Self {
        self.data.push(record);
        self
    }
    pub fn records(mut self, records: impl IntoIterator<Item = Record>) -> Self {
        self.data.extend(records);
        self
    }
}

pub struct UpdateContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub features: Features,
    pub entity: String,
    pub schema: Option<Schema>,
    pub data: Record,
    /// Bulk update filter, the primary key in `data` is used when missing.
    pub criteria: Option<Criteria>,
    pub options: WriteOptions,
}

impl<'a> UpdateContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, entity: impl Into<String>, data: Record) -> Self {
        Self {
            metadata,
            features: Features::NONE,
            entity: entity.into(),
            schema: None,
            data,
            criteria: None,
            options: Default::default(),
        }
    }
    context_common!();
    context_criteria!();
    context_options!();
}

pub struct UpsertContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub features: Features,
    pub entity: String,
    pub schema: Option<Schema>,
    pub data: Record,
    /// Extra predicate the existing row must satisfy to be updated.
    pub condition: Option<Criteria>,
    pub options: WriteOptions,
}

impl<'a> UpsertContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, entity: impl Into<String>, data: Record) -> Self {
        Self {
            metadata,
            features: Features::NONE,
            entity: entity.into(),
            schema: None,
            data,
            condition: None,
            options: Default::default(),
        }
    }
    context_common!();
    context_options!();
    pub fn condition(mut self, condition: Criteria) -> Self {
        self.condition = Some(condition);
        self
    }
}

pub struct DeleteContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub features: Features,
    pub entity: String,
    /// Children deleted along with the rows.
    pub schema: Option<Schema>,
    pub criteria: Option<Criteria>,
    /// Primary key of the row to delete when there is no criteria.
    pub data: Option<Record>,
    pub options: WriteOptions,
}

impl<'a> DeleteContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, entity: impl Into<String>) -> Self {
        Self {
            metadata,
            features: Features::NONE,
            entity: entity.into(),
            schema: None,
            criteria: None,
            data: None,
            options: Default::default(),
        }
    }
    context_common!();
    context_criteria!();
    context_options!();
    pub fn record(mut self, record: Record) -> Self {
        self.data = Some(record);
        self
    }
}

pub struct ExistContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub entity: String,
    pub criteria: Option<Criteria>,
}

impl<'a> ExistContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, entity: impl Into<String>) -> Self {
        Self {
            metadata,
            entity: entity.into(),
            criteria: None,
        }
    }
    context_criteria!();
}

pub struct AggregateContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub entity: String,
    pub function: AggregateFunction,
    /// Possibly navigation qualified, missing member means `*`.
    pub member: Option<String>,
    pub distinct: bool,
    pub criteria: Option<Criteria>,
}

impl<'a> AggregateContext<'a> {
    pub fn new(
        metadata: &'a dyn Metadata,
        entity: impl Into<String>,
        function: AggregateFunction,
        member: Option<&str>,
    ) -> Self {
        Self {
            metadata,
            entity: entity.into(),
            function,
            member: member.map(Into::into),
            distinct: false,
            criteria: None,
        }
    }
    context_criteria!();
    pub fn distinct(mut self) -> Self {
        self.distinct = true;
        self
    }
}

pub struct ExecuteContext<'a> {
    pub metadata: &'a dyn Metadata,
    pub command: String,
    /// Values of the input parameters, by parameter name.
    pub data: Record,
}

impl<'a> ExecuteContext<'a> {
    pub fn new(metadata: &'a dyn Metadata, command: impl Into<String>, data: Record) -> Self {
        Self {
            metadata,
            command: command.into(),
            data,
        }
    }
}

/// Operation requested by the caller.
pub enum AccessContext<'a> {
    Select(SelectContext<'a>),
    Insert(InsertContext<'a>),
    Update(UpdateContext<'a>),
    Upsert(UpsertContext<'a>),
    Delete(DeleteContext<'a>),
    Exist(ExistContext<'a>),
    Aggregate(AggregateContext<'a>),
    Execute(ExecuteContext<'a>),
}
