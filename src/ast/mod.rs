//! Expression trees: host expressions and the SQL-bound nodes translation produces.

pub mod builders;
pub mod expr;
pub mod sql;
pub mod values;

pub use expr::*;
pub use sql::*;
pub use values::*;
