//! Text-level cleanup applied before the script reaches the grammar.
//!
//! These are plain pattern matches over raw text. They do not understand
//! comments or string literals, so a `CREATE SCHEMA` inside a comment is
//! removed as well.

use regex::Regex;
use std::sync::OnceLock;

fn create_schema_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\bCREATE\s+SCHEMA\s+(\[[^\]]+\]|\w+)(\s+AUTHORIZATION\s+(\[[^\]]+\]|\w+))?\s*;?",
        )
        .expect("valid CREATE SCHEMA pattern")
    })
}

fn batch_separator_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?im)^\s*GO\s*;?\s*$").expect("valid GO pattern"))
}

fn binary_max_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(VARBINARY)\s*\(\s*MAX\s*\)").expect("valid VARBINARY(MAX) pattern")
    })
}

fn index_kind_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(PRIMARY\s+KEY|UNIQUE)\s+(?:NONCLUSTERED|CLUSTERED)\b")
            .expect("valid CLUSTERED pattern")
    })
}

fn key_column_list_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(PRIMARY\s+KEY|UNIQUE)(\s*\()([^)]*)\)").expect("valid key list pattern")
    })
}

fn sort_order_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?i)\s+(?:ASC|DESC)\b").expect("valid sort order pattern"))
}

fn index_options_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(
            r"(?i)\bWITH\s*\(\s*(?:PAD_INDEX|STATISTICS_NORECOMPUTE|IGNORE_DUP_KEY|ALLOW_ROW_LOCKS|ALLOW_PAGE_LOCKS|OPTIMIZE_FOR_SEQUENTIAL_KEY|FILLFACTOR|DATA_COMPRESSION)\b[^)]*\)",
        )
        .expect("valid index options pattern")
    })
}

fn filegroup_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)\b(?:TEXTIMAGE_ON|ON)\s+(?:\[PRIMARY\]|PRIMARY\b)")
            .expect("valid filegroup pattern")
    })
}

/// Remove `CREATE SCHEMA` statements. Schema qualification on table names is untouched.
pub fn strip_create_schema(sql: &str) -> String {
    create_schema_pattern().replace_all(sql, "").into_owned()
}

/// Remove `GO` batch separator lines
pub fn strip_batch_separators(sql: &str) -> String {
    batch_separator_pattern().replace_all(sql, "").into_owned()
}

/// `VARBINARY(MAX)` becomes `VARBINARY`; an absent length already means unbounded
pub fn normalize_binary_max(sql: &str) -> String {
    binary_max_pattern().replace_all(sql, "$1").into_owned()
}

/// Drop `CLUSTERED`/`NONCLUSTERED` and per-column `ASC`/`DESC` from key
/// constraints. Only the key columns matter here.
pub fn normalize_key_constraints(sql: &str) -> String {
    let without_kind = index_kind_pattern().replace_all(sql, "$1");
    key_column_list_pattern()
        .replace_all(&without_kind, |caps: &regex::Captures<'_>| {
            format!(
                "{}{}{})",
                &caps[1],
                &caps[2],
                sort_order_pattern().replace_all(&caps[3], "")
            )
        })
        .into_owned()
}

/// Remove `WITH (PAD_INDEX = ...)` index options and `ON [PRIMARY]` /
/// `TEXTIMAGE_ON [PRIMARY]` filegroup clauses. Named filegroups other than
/// `PRIMARY` are left for the grammar to reject.
pub fn strip_storage_clauses(sql: &str) -> String {
    let without_options = index_options_pattern().replace_all(sql, "");
    filegroup_pattern().replace_all(&without_options, "").into_owned()
}

/// Full preprocessing applied by the SQL Server parser
pub fn preprocess(sql: &str) -> String {
    let sql = strip_batch_separators(&strip_create_schema(sql));
    let sql = strip_storage_clauses(&sql);
    normalize_key_constraints(&normalize_binary_max(&sql))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_create_schema() {
        let sql = "CREATE SCHEMA sales;\nCREATE TABLE sales.Orders (Id INT);";
        let cleaned = strip_create_schema(sql);
        assert!(!cleaned.to_uppercase().contains("CREATE SCHEMA"));
        assert!(cleaned.contains("CREATE TABLE sales.Orders"));
    }

    #[test]
    fn test_strip_bracketed_schema_with_authorization() {
        let sql = "create schema [Billing] authorization [dbo]\nCREATE TABLE [Billing].[Invoices] (Id INT);";
        let cleaned = strip_create_schema(sql);
        assert!(!cleaned.to_lowercase().contains("create schema"));
        assert!(cleaned.contains("[Billing].[Invoices]"));
    }

    #[test]
    fn test_strip_batch_separators() {
        let sql = "CREATE TABLE A (Id INT);\nGO\nCREATE TABLE B (Id INT);\n  go  \n";
        let cleaned = strip_batch_separators(sql);
        assert!(!cleaned.lines().any(|l| l.trim().eq_ignore_ascii_case("go")));
        assert!(cleaned.contains("CREATE TABLE B"));
    }

    #[test]
    fn test_varbinary_max() {
        assert_eq!(
            normalize_binary_max("Photo VARBINARY(MAX) NULL, Hash varbinary ( max )"),
            "Photo VARBINARY NULL, Hash varbinary"
        );
        assert_eq!(normalize_binary_max("Hash VARBINARY(32)"), "Hash VARBINARY(32)");
    }

    #[test]
    fn test_key_constraints_lose_index_kind_and_sort_order() {
        let sql = "CONSTRAINT PK_T PRIMARY KEY CLUSTERED ([Id] ASC, [Line] DESC)";
        assert_eq!(
            normalize_key_constraints(sql),
            "CONSTRAINT PK_T PRIMARY KEY ([Id], [Line])"
        );
        assert_eq!(
            normalize_key_constraints("Code CHAR(3) UNIQUE NONCLUSTERED, Ascent INT"),
            "Code CHAR(3) UNIQUE, Ascent INT"
        );
    }

    #[test]
    fn test_strip_storage_clauses() {
        let sql = "PRIMARY KEY (Id) WITH (PAD_INDEX = OFF, ALLOW_ROW_LOCKS = ON) ON [PRIMARY]\n) ON [PRIMARY] TEXTIMAGE_ON [PRIMARY];";
        let cleaned = strip_storage_clauses(sql);
        assert!(!cleaned.contains("PRIMARY]"));
        assert!(!cleaned.contains("PAD_INDEX"));
        assert!(cleaned.starts_with("PRIMARY KEY (Id)"));

        let fk = "REFERENCES A (Id) ON DELETE CASCADE";
        assert_eq!(strip_storage_clauses(fk), fk);
    }

    #[test]
    fn test_column_named_go_is_kept() {
        let sql = "CREATE TABLE A (\n  GoLive DATETIME\n);";
        assert_eq!(strip_batch_separators(sql), sql);
    }
}
