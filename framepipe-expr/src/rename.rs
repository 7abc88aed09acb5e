use framepipe_result::{Error, Result};

/// A parsed `"old = new"` column rename mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameSpec {
    pub old_name: String,
    pub new_name: String,
}

impl RenameSpec {
    /// Parse a mapping of the exact form `"old_name = new_name"`.
    ///
    /// The separator is a single space, an equals sign, and a single space.
    /// Both names must be non-empty and the separator must occur exactly once.
    pub fn parse(mapping: &str) -> Result<Self> {
        let (old_name, new_name) = mapping.split_once(" = ").ok_or_else(|| {
            Error::Parse(format!(
                "malformed rename mapping {mapping:?}: expected \"old_name = new_name\""
            ))
        })?;
        if old_name.is_empty() || new_name.is_empty() || new_name.contains(" = ") {
            return Err(Error::Parse(format!(
                "malformed rename mapping {mapping:?}: expected \"old_name = new_name\""
            )));
        }
        Ok(Self {
            old_name: old_name.to_string(),
            new_name: new_name.to_string(),
        })
    }
}
