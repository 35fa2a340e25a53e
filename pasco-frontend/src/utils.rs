use std::sync::Mutex;

lazy_static! {
    // Shared by tree nodes and type descriptors.
    static ref NEXT_IDENTIFIER: Mutex<usize> = Mutex::new(0usize);
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct Identifier(usize);

impl Identifier {
    // Only meaningful for dumps and debugging.
    pub fn get_number(&self) -> usize {
        self.0
    }
}

pub fn new_id() -> Identifier {
    let mut next = match NEXT_IDENTIFIER.lock() {
        Ok(guard) => guard,
        // The counter is never left half-updated.
        Err(poisoned) => poisoned.into_inner(),
    };
    let id = Identifier(*next);
    *next += 1;
    id
}

/// Identifiers are case-insensitive. This is the form used for storage and lookup.
pub fn canonical_name(name: &str) -> String {
    name.to_lowercase()
}
