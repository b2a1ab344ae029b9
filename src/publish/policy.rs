use clap::ValueEnum;

/// How publishing treats the rows already in the destination table
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum WritePolicy {
    /// Drop and recreate the table, so each run fully replaces its contents
    #[default]
    Replace,
    /// Create the table only if it is missing and add rows to it
    Append,
}

impl WritePolicy {
    /// DDL prefix used to ensure the table under this policy
    pub fn create_clause(&self) -> &'static str {
        match self {
            Self::Replace => "CREATE OR REPLACE TABLE",
            Self::Append => "CREATE TABLE IF NOT EXISTS",
        }
    }
}

impl std::fmt::Display for WritePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Replace => write!(f, "replace"),
            Self::Append => write!(f, "append"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_display() {
        assert_eq!(WritePolicy::from_str("Replace", true), Ok(WritePolicy::Replace));
        assert_eq!(WritePolicy::from_str("append", false), Ok(WritePolicy::Append));
        assert!(WritePolicy::from_str("upsert", true).is_err());
        assert_eq!(WritePolicy::default().to_string(), "replace");
    }
}
