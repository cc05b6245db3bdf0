use crate::{ParameterCollection, Slot};
use std::cell::RefCell;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlCreateTable,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlExecute,
    SqlInsertInto,
    SqlInsertIntoOnConflict,
    SqlInsertIntoValues,
    SqlJoin,
    SqlMerge,
    SqlReturning,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectGroupBy,
    SqlSelectHaving,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateSet,
    SqlUpdateWhere,
}

/// State of the writer while rendering one statement.
///
/// `counter` is the nesting depth of condition groups, groups below the top level are parenthesized.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Context<'p> {
    pub counter: u32,
    pub fragment: Fragment,
    pub qualify_columns: bool,
    /// Parameters of the statement being written, hosted sub statements use the same.
    pub parameters: Option<&'p ParameterCollection>,
    /// Values of the `${name}` slots of the table names.
    pub slots: &'p [Slot],
    /// Names of the parameters in the order their placeholders are written.
    pub bound: Option<&'p RefCell<Vec<String>>>,
}

impl<'p> Context<'p> {
    pub fn new(fragment: Fragment, qualify_columns: bool) -> Self {
        Self {
            counter: 0,
            fragment,
            qualify_columns,
            parameters: None,
            slots: &[],
            bound: None,
        }
    }
    pub fn with_parameters(mut self, parameters: Option<&'p ParameterCollection>) -> Self {
        self.parameters = parameters;
        self
    }
    pub fn with_slots(mut self, slots: &'p [Slot]) -> Self {
        self.slots = slots;
        self
    }
    pub fn with_bound(mut self, bound: Option<&'p RefCell<Vec<String>>>) -> Self {
        self.bound = bound;
        self
    }
    /// Note the placeholder of a parameter just written.
    pub fn bind(&self, name: &str) {
        if let Some(bound) = self.bound {
            bound.borrow_mut().push(name.to_owned());
        }
    }
    pub fn update_from(&mut self, context: &Context) {
        self.counter = context.counter;
    }
    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s, 'p> {
        ContextUpdater {
            current: Context { fragment, ..*self },
            previous: self,
        }
    }
}

impl Default for Context<'_> {
    fn default() -> Self {
        Context::new(Fragment::None, true)
    }
}

pub struct ContextUpdater<'a, 'p> {
    pub current: Context<'p>,
    pub previous: &'a mut Context<'p>,
}

impl<'a, 'p> Drop for ContextUpdater<'a, 'p> {
    fn drop(&mut self) {
        self.previous.update_from(&self.current);
    }
}
