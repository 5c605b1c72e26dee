use crate::Parameter;
use std::ops::{Deref, DerefMut};

/// Statement part currently being written.
#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fragment {
    #[default]
    None,
    SqlCommentOnColumn,
    SqlCreateTable,
    SqlCreateTableConstraint,
    SqlDeleteFrom,
    SqlDeleteFromWhere,
    SqlDropTable,
    SqlInsertInto,
    SqlInsertIntoValues,
    SqlJoin,
    SqlSelect,
    SqlSelectFrom,
    SqlSelectOrderBy,
    SqlSelectWhere,
    SqlUpdate,
    SqlUpdateWhere,
}

/// Writing state of one statement.
///
/// Parameters are accumulated in placeholder order, so the number of parameters emitted so far,
/// plus the parameters of the statements written before this one, is the number of the last
/// placeholder.
#[derive(Default, Debug, Clone, PartialEq)]
pub struct Context {
    pub fragment: Fragment,
    pub parameters: Vec<Parameter>,
    /// Parameters bound by preceding statements of the same text.
    pub offset: usize,
}

impl Context {
    pub fn new(fragment: Fragment) -> Self {
        Self {
            fragment,
            parameters: Vec::new(),
            offset: 0,
        }
    }
    #[must_use]
    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
    /// Number of the last placeholder written.
    pub fn placeholder(&self) -> usize {
        self.offset + self.parameters.len()
    }
    /// Enter a fragment, the previous one is restored when the updater is dropped.
    pub fn switch_fragment<'s>(&'s mut self, fragment: Fragment) -> ContextUpdater<'s> {
        let previous = self.fragment;
        self.fragment = fragment;
        ContextUpdater {
            current: self,
            previous,
        }
    }
    pub fn push_parameter(&mut self, parameter: Parameter) -> usize {
        self.parameters.push(parameter);
        self.parameters.len()
    }
}

pub struct ContextUpdater<'a> {
    current: &'a mut Context,
    previous: Fragment,
}

impl<'a> Deref for ContextUpdater<'a> {
    type Target = Context;
    fn deref(&self) -> &Context {
        self.current
    }
}

impl<'a> DerefMut for ContextUpdater<'a> {
    fn deref_mut(&mut self) -> &mut Context {
        self.current
    }
}

impl<'a> Drop for ContextUpdater<'a> {
    fn drop(&mut self) {
        self.current.fragment = self.previous;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn switch_fragment_restores_previous() {
        let mut context = Context::new(Fragment::SqlSelect);
        {
            let mut context = context.switch_fragment(Fragment::SqlSelectWhere);
            assert_eq!(context.fragment, Fragment::SqlSelectWhere);
            assert_eq!(context.push_parameter(Parameter::of(1)), 1);
        }
        assert_eq!(context.fragment, Fragment::SqlSelect);
        assert_eq!(context.parameters.len(), 1);
    }
}
