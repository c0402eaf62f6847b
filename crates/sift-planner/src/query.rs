//! Search statement synthesis.
//!
//! A statement is built once as a list of quoted column references; the
//! executable SQL and the display text are two renderings of that list that
//! differ only in the `LIKE` operand (`?` versus the quoted literal).

use thiserror::Error;

/// Errors raised while planning a table's search.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("table {table} has no searchable columns")]
    NoSearchableColumns { table: String },
}

/// A parameterized search statement for one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchStatement {
    /// Statement text with one `?` placeholder per column. This is what runs.
    pub sql: String,
    /// Bound values, one per placeholder, in placeholder order.
    pub params: Vec<String>,
    /// The statement with each placeholder replaced by its quoted value.
    /// For operators only; never executed.
    pub display: String,
}

/// MySQL reserved words that commonly appear as table or schema names.
const RESERVED: &[&str] = &[
    "add", "all", "alter", "and", "as", "asc", "between", "by", "call", "case", "change",
    "check", "column", "condition", "constraint", "create", "cross", "database", "default",
    "delete", "desc", "distinct", "drop", "dual", "else", "exists", "fetch", "for", "from",
    "fulltext", "function", "group", "groups", "having", "in", "index", "inner", "insert",
    "interval", "into", "is", "join", "key", "keys", "kill", "lag", "lead", "left", "like",
    "limit", "lines", "load", "lock", "match", "not", "on", "option", "or", "order", "out",
    "outer", "primary", "procedure", "range", "rank", "read", "references", "release",
    "rename", "repeat", "replace", "require", "return", "right", "row", "rows", "schema",
    "select", "set", "show", "signal", "spatial", "sql", "system", "table", "to", "trigger",
    "union", "unique", "update", "usage", "use", "using", "values", "when", "where", "while",
    "window", "with", "write",
];

/// Build the search statement for `schema.table` over `columns`.
///
/// Every column gets a `LIKE` predicate bound to `%term%`; predicates are
/// OR-joined so a row matches when any column contains the term.
pub fn build_search<S: AsRef<str>>(
    schema: &str,
    table: &str,
    columns: &[S],
    term: &str,
    row_limit: usize,
) -> Result<SearchStatement, PlanError> {
    if columns.is_empty() {
        return Err(PlanError::NoSearchableColumns {
            table: table.to_string(),
        });
    }

    let target = format!("{}.{}", qualify(schema), qualify(table));
    let quoted: Vec<String> = columns.iter().map(|c| quote_ident(c.as_ref())).collect();
    let value = format!("%{}%", term);

    let sql = render(&target, &quoted, "?", row_limit);
    let display = render(&target, &quoted, &format!("'{}'", value), row_limit);

    Ok(SearchStatement {
        sql,
        params: vec![value; quoted.len()],
        display,
    })
}

fn render(target: &str, columns: &[String], operand: &str, row_limit: usize) -> String {
    let predicates = columns
        .iter()
        .map(|c| format!("{} LIKE {}", c, operand))
        .collect::<Vec<_>>()
        .join(" OR ");
    format!(
        "SELECT t.* FROM {} t WHERE {} LIMIT {};",
        target, predicates, row_limit
    )
}

/// Backtick-quote an identifier, doubling embedded backticks.
fn quote_ident(ident: &str) -> String {
    format!("`{}`", ident.replace('`', "``"))
}

/// Emit plain identifiers bare and quote everything else.
fn qualify(ident: &str) -> String {
    if is_plain_ident(ident) {
        ident.to_string()
    } else {
        quote_ident(ident)
    }
}

fn is_plain_ident(ident: &str) -> bool {
    !ident.is_empty()
        && ident
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !ident.chars().all(|c| c.is_ascii_digit())
        && !RESERVED.contains(&ident.to_ascii_lowercase().as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_users_statement() {
        let stmt = build_search("db", "users", &["id", "email"], "bob", 20).unwrap();

        assert_eq!(
            stmt.sql,
            "SELECT t.* FROM db.users t WHERE `id` LIKE ? OR `email` LIKE ? LIMIT 20;"
        );
        assert_eq!(stmt.params, vec!["%bob%", "%bob%"]);
        assert_eq!(
            stmt.display,
            "SELECT t.* FROM db.users t WHERE `id` LIKE '%bob%' OR `email` LIKE '%bob%' LIMIT 20;"
        );
    }

    #[test]
    fn test_display_has_one_literal_per_param() {
        let columns = ["a", "b", "c", "d"];
        let stmt = build_search("shop", "wide", &columns, "x1", 5).unwrap();

        assert_eq!(stmt.params.len(), columns.len());
        assert_eq!(stmt.sql.matches('?').count(), columns.len());
        assert!(!stmt.display.contains('?'));
        assert_eq!(stmt.display.matches("'%x1%'").count(), stmt.params.len());
    }

    #[test]
    fn test_term_never_in_executed_sql() {
        let stmt = build_search("db", "users", &["email"], "o'brien", 20).unwrap();
        assert!(!stmt.sql.contains("o'brien"));
        assert_eq!(stmt.params, vec!["%o'brien%"]);
        assert!(stmt.display.contains("'%o'brien%'"));
    }

    #[test]
    fn test_row_limit_in_statement() {
        let stmt = build_search("db", "logs", &["msg"], "err", 3).unwrap();
        assert!(stmt.sql.ends_with("LIMIT 3;"));
        assert!(stmt.display.ends_with("LIMIT 3;"));
    }

    #[test]
    fn test_identifier_quoting() {
        let stmt = build_search("my-db", "order", &["weird`col"], "x", 1).unwrap();
        assert_eq!(
            stmt.sql,
            "SELECT t.* FROM `my-db`.`order` t WHERE `weird``col` LIKE ? LIMIT 1;"
        );

        let stmt = build_search("shop", "2024", &["id"], "x", 1).unwrap();
        assert!(stmt.sql.contains("FROM shop.`2024` t"));

        let stmt = build_search("shop", "line_items$v2", &["id"], "x", 1).unwrap();
        assert!(stmt.sql.contains("FROM shop.line_items$v2 t"));
    }

    #[test]
    fn test_empty_columns_rejected() {
        let columns: [&str; 0] = [];
        let err = build_search("db", "empty", &columns, "x", 20).unwrap_err();
        assert_eq!(
            err,
            PlanError::NoSearchableColumns {
                table: "empty".to_string()
            }
        );
    }
}
