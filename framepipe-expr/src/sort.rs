use framepipe_result::{Error, Result};

/// A parsed sort directive: a column name plus a direction.
///
/// The directive grammar is the column name itself for ascending order, or
/// the name suffixed with the literal `" desc"` for descending.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub descending: bool,
}

impl SortSpec {
    /// Parse a `"col"` or `"col desc"` sort directive.
    pub fn parse(directive: &str) -> Result<Self> {
        let (column, descending) = match directive.strip_suffix(" desc") {
            Some(column) => (column, true),
            None => (directive, false),
        };
        if column.is_empty() {
            return Err(Error::Parse(format!(
                "malformed sort directive {directive:?}: expected \"column\" or \"column desc\""
            )));
        }
        Ok(Self {
            column: column.to_string(),
            descending,
        })
    }
}
