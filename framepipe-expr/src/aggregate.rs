use framepipe_result::{Error, Result};

/// Aggregation functions the grouped-summarize stage supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateKind {
    Sum,
    Mean,
    Count,
    Min,
    Max,
}

impl AggregateKind {
    /// Resolve a function name from an aggregation spec.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "sum" => Ok(Self::Sum),
            "mean" => Ok(Self::Mean),
            "count" => Ok(Self::Count),
            "min" => Ok(Self::Min),
            "max" => Ok(Self::Max),
            other => Err(Error::UnknownAggregation(other.to_string())),
        }
    }
}

/// A parsed `"new_column = function_name(source_column)"` aggregation spec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateSpec {
    /// Output column name (left of `=`).
    pub alias: String,
    /// Aggregation function to apply.
    pub kind: AggregateKind,
    /// Column the function is applied to within each group.
    pub source: String,
}

impl AggregateSpec {
    /// Parse an aggregation spec of the exact form
    /// `"new_column = function_name(source_column)"`.
    pub fn parse(spec: &str) -> Result<Self> {
        let malformed = || {
            Error::Parse(format!(
                "malformed aggregation spec {spec:?}: expected \"new_column = function_name(source_column)\""
            ))
        };
        let (alias, call) = spec.split_once(" = ").ok_or_else(malformed)?;
        let call = call.strip_suffix(')').ok_or_else(malformed)?;
        let (function, source) = call.split_once('(').ok_or_else(malformed)?;
        if alias.is_empty() || function.is_empty() || source.is_empty() || source.contains('(') {
            return Err(malformed());
        }
        Ok(Self {
            alias: alias.to_string(),
            kind: AggregateKind::from_name(function)?,
            source: source.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_spec() {
        let spec = AggregateSpec::parse("total = sum(amount)").unwrap();
        assert_eq!(spec.alias, "total");
        assert_eq!(spec.kind, AggregateKind::Sum);
        assert_eq!(spec.source, "amount");
    }

    #[test]
    fn rejects_missing_parens() {
        assert!(matches!(
            AggregateSpec::parse("total = sum amount"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(matches!(
            AggregateSpec::parse("total: sum(amount)"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn rejects_empty_source() {
        assert!(matches!(
            AggregateSpec::parse("total = sum()"),
            Err(Error::Parse(_))
        ));
    }

    #[test]
    fn unknown_function_is_its_own_error() {
        assert!(matches!(
            AggregateSpec::parse("m = median(x)"),
            Err(Error::UnknownAggregation(name)) if name == "median"
        ));
    }
}
