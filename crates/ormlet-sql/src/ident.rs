use std::fmt;

/// A backtick-quoted identifier.
///
/// Embedded backticks are doubled, so the rendered identifier can never
/// terminate early and splice SQL into a statement.
#[derive(Debug, Clone, Copy)]
pub struct Ident<S>(pub S);

impl<S: AsRef<str>> fmt::Display for Ident<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("`")?;
        for (i, part) in self.0.as_ref().split('`').enumerate() {
            if i > 0 {
                f.write_str("``")?;
            }
            f.write_str(part)?;
        }
        f.write_str("`")
    }
}
