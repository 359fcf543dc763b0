mod insert;

pub use insert::InsertInterpreter;
