#[macro_use]
extern crate lazy_static;

pub mod utils;
#[macro_use]
pub mod span;
pub mod ast;
pub mod diagnostics;
pub mod dump;
pub mod limits;
pub mod required;
pub mod scope;
pub mod semantic;
pub mod typesystem;
pub mod visitor;
