mod flavor;
pub use flavor::Flavor;

mod ident;
pub use ident::Ident;

mod limit;
pub use limit::{IntoLimit, Limit};

mod select;
pub use select::Select;

mod templates;
pub use templates::Templates;

/// Portable positional placeholder used in every generated statement.
pub const PLACEHOLDER: char = '?';

/// Column alias the scalar of a `find_number` query is read from.
pub const NUM_ALIAS: &str = "__num__";

/// `?, ?, ?` with `n` placeholders.
pub fn placeholders(n: usize) -> String {
    let mut ret = String::with_capacity(n * 3);
    let mut s = "";
    for _ in 0..n {
        ret.push_str(s);
        ret.push(PLACEHOLDER);
        s = ", ";
    }
    ret
}
