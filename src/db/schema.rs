pub const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

/// Splits a SQL script into executable statements. SQLite's `execute` only
/// runs one statement at a time, so the bootstrap script is applied piecewise.
pub fn split_sql_statements(sql: &str) -> Vec<String> {
    let mut statements = Vec::new();
    let mut current = String::new();
    let mut in_single_quote = false;
    let mut in_double_quote = false;
    let mut in_line_comment = false;
    let mut prev = '\0';

    for ch in sql.chars() {
        if in_line_comment {
            if ch == '\n' {
                in_line_comment = false;
            }
            prev = ch;
            continue;
        }

        match ch {
            '-' if prev == '-' && !in_single_quote && !in_double_quote => {
                current.pop();
                in_line_comment = true;
                prev = ch;
                continue;
            }
            '\'' if !in_double_quote && prev != '\\' => {
                in_single_quote = !in_single_quote;
            }
            '"' if !in_single_quote => {
                in_double_quote = !in_double_quote;
            }
            ';' if !in_single_quote && !in_double_quote => {
                let stmt = current.trim();
                if !stmt.is_empty() {
                    statements.push(stmt.to_string());
                }
                current.clear();
                prev = ch;
                continue;
            }
            _ => {}
        }

        current.push(ch);
        prev = ch;
    }

    let tail = current.trim();
    if !tail.is_empty() {
        statements.push(tail.to_string());
    }

    statements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_semicolons() {
        let stmts = split_sql_statements("CREATE TABLE a (x TEXT); CREATE TABLE b (y TEXT);");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].starts_with("CREATE TABLE a"));
    }

    #[test]
    fn ignores_semicolons_inside_quotes() {
        let stmts = split_sql_statements("INSERT INTO a VALUES ('x;y'); SELECT 1");
        assert_eq!(stmts.len(), 2);
        assert!(stmts[0].contains("'x;y'"));
    }

    #[test]
    fn strips_line_comments() {
        let stmts = split_sql_statements("-- header comment\nSELECT 1;\n-- trailing");
        assert_eq!(stmts, vec!["SELECT 1".to_string()]);
    }

    #[test]
    fn schema_file_produces_statements() {
        let stmts = split_sql_statements(SCHEMA_SQL);
        assert!(stmts.len() >= 4);
        assert!(stmts.iter().all(|s| !s.trim().is_empty()));
    }
}
