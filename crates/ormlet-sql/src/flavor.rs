use std::borrow::Cow;
use std::fmt::Write;

/// SQL dialect a statement is sent to. Only placeholder syntax differs
/// between the flavors; generated statements are otherwise shared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flavor {
    Mysql,
    Postgresql,
    Sqlite,
}

impl Flavor {
    /// Rewrites the portable `?` placeholders into the flavor's native
    /// positional syntax.
    ///
    /// Question marks inside string literals and quoted identifiers are left
    /// untouched.
    pub fn translate<'a>(&self, sql: &'a str) -> Cow<'a, str> {
        if *self == Flavor::Mysql || !sql.contains('?') {
            return Cow::Borrowed(sql);
        }

        let mut dst = String::with_capacity(sql.len() + 8);
        let mut quote: Option<char> = None;
        let mut n = 0;

        for ch in sql.chars() {
            match quote {
                Some(q) => {
                    if ch == q {
                        quote = None;
                    }
                    dst.push(ch);
                }
                None => match ch {
                    '\'' | '"' | '`' => {
                        quote = Some(ch);
                        dst.push(ch);
                    }
                    '?' => {
                        n += 1;
                        match self {
                            Flavor::Postgresql => write!(&mut dst, "${n}"),
                            Flavor::Sqlite => write!(&mut dst, "?{n}"),
                            Flavor::Mysql => write!(&mut dst, "?"),
                        }
                        .expect("writing to a String cannot fail");
                    }
                    _ => dst.push(ch),
                },
            }
        }

        Cow::Owned(dst)
    }
}
