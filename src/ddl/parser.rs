//! DDL parsing behind a narrow, grammar-agnostic interface.
//!
//! [`DdlParser`] is the only thing downstream code depends on. The SQL Server
//! implementation uses `sqlparser`'s MS SQL dialect and recovers at statement
//! boundaries so that every syntax error in a script is reported at once.

use regex::Regex;
use sqlparser::ast::Statement;
use sqlparser::dialect::MsSqlDialect;
use sqlparser::parser::{Parser, ParserError};
use sqlparser::tokenizer::Token;
use std::sync::OnceLock;
use tracing::{debug, info};

use super::metadata::TableMetadata;
use super::preprocess::preprocess;
use super::visitor::TableCollector;
use crate::error::{ParseDiagnostic, ParseError};

/// Turns DDL text into flat table records.
pub trait DdlParser {
    /// Parse a script. Either every table is returned or nothing is.
    fn parse(&self, sql: &str) -> Result<Vec<TableMetadata>, ParseError>;
}

/// SQL Server (T-SQL) DDL parser
#[derive(Debug, Default, Clone, Copy)]
pub struct SqlServerDdlParser;

impl SqlServerDdlParser {
    pub fn new() -> Self {
        Self
    }

    fn parse_statements(&self, sql: &str) -> Result<Vec<Statement>, ParseError> {
        let dialect = MsSqlDialect {};
        let mut parser = Parser::new(&dialect)
            .try_with_sql(sql)
            .map_err(|e| ParseError::new(vec![diagnostic_from(&e)]))?;

        let mut statements = Vec::new();
        let mut diagnostics = Vec::new();

        loop {
            while parser.consume_token(&Token::SemiColon) {}
            if parser.peek_token().token == Token::EOF {
                break;
            }

            match parser.parse_statement() {
                Ok(statement) => statements.push(statement),
                Err(e) => {
                    diagnostics.push(diagnostic_from(&e));
                    skip_to_statement_end(&mut parser);
                }
            }
        }

        if diagnostics.is_empty() {
            Ok(statements)
        } else {
            Err(ParseError::new(diagnostics))
        }
    }
}

impl DdlParser for SqlServerDdlParser {
    fn parse(&self, sql: &str) -> Result<Vec<TableMetadata>, ParseError> {
        let cleaned = preprocess(sql);
        let statements = self.parse_statements(&cleaned)?;
        debug!("Parsed {} statements", statements.len());

        let tables = TableCollector::collect(&statements);
        info!("Extracted {} tables from DDL", tables.len());
        Ok(tables)
    }
}

/// Parse SQL Server DDL with the default parser
pub fn parse_ddl(sql: &str) -> Result<Vec<TableMetadata>, ParseError> {
    SqlServerDdlParser::new().parse(sql)
}

fn skip_to_statement_end(parser: &mut Parser<'_>) {
    loop {
        match parser.next_token().token {
            Token::SemiColon | Token::EOF => break,
            _ => {}
        }
    }
}

fn position_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\s*(?:at\s+)?Line: (\d+), Column: (\d+)").expect("valid position pattern")
    })
}

fn diagnostic_from(error: &ParserError) -> ParseDiagnostic {
    let raw = match error {
        ParserError::TokenizerError(msg) | ParserError::ParserError(msg) => msg.clone(),
        other => other.to_string(),
    };

    let (line, column) = position_pattern()
        .captures(&raw)
        .map(|caps| {
            let line = caps[1].parse().unwrap_or(0);
            let column = caps[2].parse().unwrap_or(0);
            (line, column)
        })
        .unwrap_or((0, 0));

    let message = position_pattern().replace_all(&raw, "").trim().to_string();

    ParseDiagnostic {
        line,
        column,
        message,
    }
}
