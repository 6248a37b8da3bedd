pub mod cursor;
pub mod declaration;

pub use cursor::{Cursor, ParseError};
pub use declaration::{parse_declaration, DeclaredMatcher};
