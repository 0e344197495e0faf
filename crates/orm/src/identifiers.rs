//! SQL identifier helpers.
//!
//! Schema and table names cannot be bound as query parameters, so every
//! dynamic identifier goes through [`quote_ident`].

/// Quote a PostgreSQL identifier, doubling embedded quotes
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// `"schema"."table"`
pub fn qualified_table(schema: &str, table: &str) -> String {
    format!("{}.{}", quote_ident(schema), quote_ident(table))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quotes_and_escapes() {
        assert_eq!(quote_ident("company"), "\"company\"");
        assert_eq!(quote_ident("we\"ird"), "\"we\"\"ird\"");
    }

    #[test]
    fn qualifies_camel_case_tables() {
        assert_eq!(
            qualified_table("workspace_1a", "calendarEvent"),
            "\"workspace_1a\".\"calendarEvent\""
        );
    }
}
