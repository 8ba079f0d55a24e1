//! Result presentation: the top-level printer and tuple-set layout.

mod printer;
mod tupleset;

pub use printer::{render_result, type_name};
pub use tupleset::{TupleSet, TupleSlice, TupleValue};
