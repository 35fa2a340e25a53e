use crate::span::SpanLoc;
use crate::typesystem::TypeId;
use crate::utils::canonical_name;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScopeEntry {
    ty: TypeId,
    defining_point: Option<SpanLoc>,
}

impl ScopeEntry {
    pub fn get_type(&self) -> TypeId {
        self.ty
    }

    /// Predefined entries have no location.
    pub fn defining_point(&self) -> Option<SpanLoc> {
        self.defining_point
    }
}

// Entries are kept in declaration order, parameter lists are built from it.
#[derive(Debug, Default)]
struct ScopeItem {
    index: HashMap<String, usize>,
    entries: Vec<(String, ScopeEntry)>,
}

impl ScopeItem {
    fn get(&self, name: &str) -> Option<&ScopeEntry> {
        self.index.get(name).map(|idx| &self.entries[*idx].1)
    }
}

/// The stack of lexical scopes. The bottom scope is the outermost one and
/// holds the predefined names together with the program-level declarations.
#[derive(Debug)]
pub struct Scope {
    stack: Vec<ScopeItem>,
}

impl Default for Scope {
    fn default() -> Self {
        Self::new()
    }
}

impl Scope {
    pub fn new() -> Scope {
        Scope {
            stack: vec![ScopeItem::default()],
        }
    }

    pub fn push_scope(&mut self) {
        self.stack.push(ScopeItem::default());
    }

    pub fn pop_scope(&mut self) {
        assert!(self.stack.len() > 1, "cannot pop the outermost scope");
        self.stack.pop();
    }

    pub fn is_outermost(&self) -> bool {
        self.stack.len() == 1
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    fn current(&self) -> &ScopeItem {
        // The outermost scope is never popped.
        &self.stack[self.stack.len() - 1]
    }

    /// Adds `name` to the innermost scope. Returns false, leaving the existing
    /// binding untouched, if the innermost scope already has that name.
    pub fn define(&mut self, name: &str, ty: TypeId, defining_point: Option<SpanLoc>) -> bool {
        let name = canonical_name(name);
        let last = self.stack.len() - 1;
        let current = &mut self.stack[last];
        if current.index.contains_key(&name) {
            return false;
        }
        current.index.insert(name.clone(), current.entries.len());
        current.entries.push((name, ScopeEntry { ty, defining_point }));
        true
    }

    pub fn lookup(&self, name: &str) -> Option<TypeId> {
        let name = canonical_name(name);
        self.stack
            .iter()
            .rev()
            .find_map(|scope| scope.get(&name))
            .map(|entry| entry.get_type())
    }

    pub fn lookup_current_scope(&self, name: &str) -> Option<&ScopeEntry> {
        self.current().get(&canonical_name(name))
    }

    /// Snapshot of the innermost scope, in declaration order.
    pub fn current_scope_entries(&self) -> Vec<(String, TypeId)> {
        self.current()
            .entries
            .iter()
            .map(|(name, entry)| (name.clone(), entry.get_type()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::typesystem::TypeSystem;

    #[test]
    fn redefinition_keeps_first_binding() {
        let ts = TypeSystem::new();
        let mut scope = Scope::new();

        assert!(scope.define("X", ts.get_integer_type(), None));
        assert!(!scope.define("x", ts.get_real_type(), None));
        assert_eq!(scope.lookup("x"), Some(ts.get_integer_type()));
    }

    #[test]
    fn shadowing_is_undone_on_pop() {
        let ts = TypeSystem::new();
        let mut scope = Scope::new();

        scope.define("a", ts.get_integer_type(), None);
        scope.push_scope();
        assert!(scope.define("A", ts.get_bool_type(), None));
        assert_eq!(scope.lookup("a"), Some(ts.get_bool_type()));
        scope.pop_scope();
        assert_eq!(scope.lookup("a"), Some(ts.get_integer_type()));
        assert!(scope.is_outermost());
    }

    #[test]
    fn entries_keep_declaration_order() {
        let ts = TypeSystem::new();
        let mut scope = Scope::new();
        scope.push_scope();

        scope.define("zeta", ts.get_char_type(), None);
        scope.define("alpha", ts.get_real_type(), None);
        scope.define("Mid", ts.get_integer_type(), None);

        let names: Vec<String> = scope
            .current_scope_entries()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn missing_name() {
        let scope = Scope::new();
        assert_eq!(scope.lookup("nothere"), None);
        assert!(scope.lookup_current_scope("nothere").is_none());
    }

    #[test]
    #[should_panic]
    fn outermost_scope_cannot_be_popped() {
        let mut scope = Scope::new();
        scope.pop_scope();
    }
}
