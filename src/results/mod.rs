mod cursor;
mod row;

pub use cursor::Cursor;
pub use row::{ColumnIndex, Row};
