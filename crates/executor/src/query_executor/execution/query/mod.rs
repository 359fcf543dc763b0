mod select;
mod select_with_union;

pub use select::SelectInterpreter;
pub use select_with_union::SelectWithUnionInterpreter;
