mod closure;
mod value;

pub use closure::Closure;
pub use value::{Range, Value};
