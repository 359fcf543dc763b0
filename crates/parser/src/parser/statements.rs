use indexmap::IndexMap;
use sqlgate_common::{Error, Result};
use sqlparser::tokenizer::Token;

use super::helpers::ParserHelpers;
use crate::ast::{
    AlterCommand, AlterQuery, CheckQuery, ColumnDeclaration, ColumnDefault, ColumnDefaultKind,
    CreateQuery, CreateTableQuery, DescribeQuery, DropKind, DropQuery, DropTarget, ExistsQuery,
    ExtensionStatement, InsertQuery, KillFilterColumn, KillQueryQuery, OptimizeQuery,
    RenameElement, RenameQuery, SelectItem, SelectQuery, SelectWithUnionQuery, SetQuery,
    ShowCreateDatabaseQuery, ShowCreateTableQuery, ShowProcessListQuery, ShowTablesQuery,
    Statement, SystemCommand, SystemQuery, UseQuery,
};

pub struct StatementParser;

impl StatementParser {
    pub fn parse(tokens: &[&Token]) -> Result<Statement> {
        let mut idx = 0;
        let statement = Self::parse_statement(tokens, &mut idx)?;
        ParserHelpers::expect_end(tokens, idx)?;
        Ok(statement)
    }

    fn parse_statement(tokens: &[&Token], idx: &mut usize) -> Result<Statement> {
        let leading = match tokens.first() {
            Some(Token::Word(w)) => w.value.to_ascii_uppercase(),
            Some(other) => {
                return Err(Error::parse_error(format!(
                    "Statement cannot start with '{}'",
                    other
                )));
            }
            None => return Err(Error::parse_error("Empty statement")),
        };

        match leading.as_str() {
            "SELECT" => Ok(Statement::SelectWithUnion(Self::parse_select_with_union(
                tokens, idx,
            )?)),
            "INSERT" => Ok(Statement::Insert(Self::parse_insert(tokens, idx)?)),
            "CREATE" | "ATTACH" => Ok(Statement::Create(Self::parse_create(tokens, idx)?)),
            "DROP" | "DETACH" | "TRUNCATE" => Ok(Statement::Drop(Self::parse_drop(tokens, idx)?)),
            "RENAME" => Ok(Statement::Rename(Self::parse_rename(tokens, idx)?)),
            "SHOW" => Self::parse_show(tokens, idx),
            "USE" => {
                *idx += 1;
                let database = ParserHelpers::parse_identifier(tokens, idx)?;
                Ok(Statement::Use(UseQuery { database }))
            }
            "SET" => Ok(Statement::Set(Self::parse_set(tokens, idx)?)),
            "OPTIMIZE" => Ok(Statement::Optimize(Self::parse_optimize(tokens, idx)?)),
            "EXISTS" => {
                *idx += 1;
                let temporary = ParserHelpers::consume_keyword(tokens, idx, "TEMPORARY");
                ParserHelpers::consume_keyword(tokens, idx, "TABLE");
                let table = ParserHelpers::parse_table_name(tokens, idx)?;
                Ok(Statement::Exists(ExistsQuery { table, temporary }))
            }
            "DESC" | "DESCRIBE" => {
                *idx += 1;
                ParserHelpers::consume_keyword(tokens, idx, "TABLE");
                let table = ParserHelpers::parse_table_name(tokens, idx)?;
                Ok(Statement::Describe(DescribeQuery { table }))
            }
            "ALTER" => Ok(Statement::Alter(Self::parse_alter(tokens, idx)?)),
            "CHECK" => {
                *idx += 1;
                ParserHelpers::expect_keyword(tokens, idx, "TABLE")?;
                let table = ParserHelpers::parse_table_name(tokens, idx)?;
                Ok(Statement::Check(CheckQuery { table }))
            }
            "KILL" => Ok(Statement::KillQuery(Self::parse_kill_query(tokens, idx)?)),
            "SYSTEM" => Ok(Statement::System(Self::parse_system(tokens, idx)?)),
            "EXPLAIN" | "WATCH" => {
                *idx = tokens.len();
                let mut id = leading.to_ascii_lowercase();
                id[..1].make_ascii_uppercase();
                Ok(Statement::Extension(ExtensionStatement {
                    id: format!("{}Query", id),
                    text: ParserHelpers::render_tokens(tokens),
                }))
            }
            other => Err(Error::parse_error(format!(
                "Unrecognized statement starting with {}",
                other
            ))),
        }
    }

    pub fn parse_select_with_union(
        tokens: &[&Token],
        idx: &mut usize,
    ) -> Result<SelectWithUnionQuery> {
        let mut selects = vec![Self::parse_select(tokens, idx)?];
        while ParserHelpers::consume_keyword(tokens, idx, "UNION") {
            if !ParserHelpers::consume_keyword(tokens, idx, "ALL") {
                return Err(Error::unsupported_feature(
                    "Only UNION ALL is supported".to_string(),
                ));
            }
            selects.push(Self::parse_select(tokens, idx)?);
        }
        Ok(SelectWithUnionQuery { selects })
    }

    fn parse_select(tokens: &[&Token], idx: &mut usize) -> Result<SelectQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "SELECT")?;

        let mut projection = vec![Self::parse_select_item(tokens, idx)?];
        while ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
            projection.push(Self::parse_select_item(tokens, idx)?);
        }

        let from = if ParserHelpers::consume_keyword(tokens, idx, "FROM") {
            Some(ParserHelpers::parse_table_name(tokens, idx)?)
        } else {
            None
        };

        let limit = if ParserHelpers::consume_keyword(tokens, idx, "LIMIT") {
            Some(ParserHelpers::parse_number(tokens, idx)?)
        } else {
            None
        };

        Ok(SelectQuery {
            projection,
            from,
            limit,
        })
    }

    fn parse_select_item(tokens: &[&Token], idx: &mut usize) -> Result<SelectItem> {
        if ParserHelpers::consume_token(tokens, idx, &Token::Mul) {
            return Ok(SelectItem::Wildcard);
        }

        if ParserHelpers::is_literal_start(tokens.get(*idx)) {
            let value = ParserHelpers::parse_literal(tokens, idx)?;
            let alias = Self::parse_alias(tokens, idx)?;
            return Ok(SelectItem::Literal { value, alias });
        }

        let name = ParserHelpers::parse_identifier(tokens, idx)?;
        let alias = Self::parse_alias(tokens, idx)?;
        Ok(SelectItem::Column { name, alias })
    }

    fn parse_alias(tokens: &[&Token], idx: &mut usize) -> Result<Option<String>> {
        if ParserHelpers::consume_keyword(tokens, idx, "AS") {
            return ParserHelpers::parse_identifier(tokens, idx).map(Some);
        }
        Ok(None)
    }

    fn parse_insert(tokens: &[&Token], idx: &mut usize) -> Result<InsertQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "INSERT")?;
        ParserHelpers::expect_keyword(tokens, idx, "INTO")?;
        ParserHelpers::consume_keyword(tokens, idx, "TABLE");
        let table = ParserHelpers::parse_table_name(tokens, idx)?;

        let mut columns = Vec::new();
        if ParserHelpers::consume_token(tokens, idx, &Token::LParen) {
            loop {
                columns.push(ParserHelpers::parse_identifier(tokens, idx)?);
                if !ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
                    break;
                }
            }
            ParserHelpers::expect_token(tokens, idx, &Token::RParen)?;
        }

        ParserHelpers::expect_keyword(tokens, idx, "VALUES")?;

        let mut rows = Vec::new();
        loop {
            ParserHelpers::expect_token(tokens, idx, &Token::LParen)?;
            let mut row = vec![ParserHelpers::parse_literal(tokens, idx)?];
            while ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
                row.push(ParserHelpers::parse_literal(tokens, idx)?);
            }
            ParserHelpers::expect_token(tokens, idx, &Token::RParen)?;
            rows.push(row);
            if !ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
                break;
            }
        }

        Ok(InsertQuery {
            table,
            columns,
            rows,
        })
    }

    fn parse_create(tokens: &[&Token], idx: &mut usize) -> Result<CreateQuery> {
        *idx += 1;

        if ParserHelpers::consume_keyword(tokens, idx, "DATABASE") {
            let if_not_exists =
                ParserHelpers::consume_keywords(tokens, idx, &["IF", "NOT", "EXISTS"])?;
            let name = ParserHelpers::parse_identifier(tokens, idx)?;
            return Ok(CreateQuery::Database {
                name,
                if_not_exists,
            });
        }

        let is_temporary = ParserHelpers::consume_keyword(tokens, idx, "TEMPORARY");
        ParserHelpers::expect_keyword(tokens, idx, "TABLE")?;
        let if_not_exists = ParserHelpers::consume_keywords(tokens, idx, &["IF", "NOT", "EXISTS"])?;
        let table = ParserHelpers::parse_table_name(tokens, idx)?;

        ParserHelpers::expect_token(tokens, idx, &Token::LParen)?;
        let mut columns = vec![Self::parse_column_declaration(tokens, idx)?];
        while ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
            columns.push(Self::parse_column_declaration(tokens, idx)?);
        }
        ParserHelpers::expect_token(tokens, idx, &Token::RParen)?;

        let engine = if ParserHelpers::consume_keyword(tokens, idx, "ENGINE") {
            ParserHelpers::consume_token(tokens, idx, &Token::Eq);
            let clause = ParserHelpers::render_tokens(&tokens[*idx..]);
            *idx = tokens.len();
            if clause.is_empty() {
                return Err(Error::parse_error("Expected engine name after ENGINE"));
            }
            Some(clause)
        } else {
            None
        };

        Ok(CreateQuery::Table(CreateTableQuery {
            table,
            if_not_exists,
            is_temporary,
            columns,
            engine,
        }))
    }

    fn parse_column_declaration(tokens: &[&Token], idx: &mut usize) -> Result<ColumnDeclaration> {
        let name = ParserHelpers::parse_identifier(tokens, idx)?;
        let data_type = ParserHelpers::parse_data_type(tokens, idx)?;

        let kind = if ParserHelpers::consume_keyword(tokens, idx, "DEFAULT") {
            Some(ColumnDefaultKind::Default)
        } else if ParserHelpers::consume_keyword(tokens, idx, "MATERIALIZED") {
            Some(ColumnDefaultKind::Materialized)
        } else if ParserHelpers::consume_keyword(tokens, idx, "ALIAS") {
            Some(ColumnDefaultKind::Alias)
        } else {
            None
        };

        let default = match kind {
            Some(kind) => Some(ColumnDefault {
                kind,
                expression: ParserHelpers::parse_literal(tokens, idx)?,
            }),
            None => None,
        };

        Ok(ColumnDeclaration {
            name,
            data_type,
            default,
        })
    }

    fn parse_drop(tokens: &[&Token], idx: &mut usize) -> Result<DropQuery> {
        let kind = if ParserHelpers::consume_keyword(tokens, idx, "DROP") {
            DropKind::Drop
        } else if ParserHelpers::consume_keyword(tokens, idx, "DETACH") {
            DropKind::Detach
        } else {
            ParserHelpers::expect_keyword(tokens, idx, "TRUNCATE")?;
            DropKind::Truncate
        };

        if kind != DropKind::Truncate && ParserHelpers::consume_keyword(tokens, idx, "DATABASE") {
            let if_exists = ParserHelpers::consume_keywords(tokens, idx, &["IF", "EXISTS"])?;
            let name = ParserHelpers::parse_identifier(tokens, idx)?;
            return Ok(DropQuery {
                kind,
                target: DropTarget::Database(name),
                if_exists,
                is_temporary: false,
            });
        }

        let is_temporary = ParserHelpers::consume_keyword(tokens, idx, "TEMPORARY");
        if kind == DropKind::Truncate {
            ParserHelpers::consume_keyword(tokens, idx, "TABLE");
        } else {
            ParserHelpers::expect_keyword(tokens, idx, "TABLE")?;
        }
        let if_exists = ParserHelpers::consume_keywords(tokens, idx, &["IF", "EXISTS"])?;
        let table = ParserHelpers::parse_table_name(tokens, idx)?;

        Ok(DropQuery {
            kind,
            target: DropTarget::Table(table),
            if_exists,
            is_temporary,
        })
    }

    fn parse_rename(tokens: &[&Token], idx: &mut usize) -> Result<RenameQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "RENAME")?;
        ParserHelpers::expect_keyword(tokens, idx, "TABLE")?;

        let mut elements = Vec::new();
        loop {
            let from = ParserHelpers::parse_table_name(tokens, idx)?;
            ParserHelpers::expect_keyword(tokens, idx, "TO")?;
            let to = ParserHelpers::parse_table_name(tokens, idx)?;
            elements.push(RenameElement { from, to });
            if !ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
                break;
            }
        }

        Ok(RenameQuery { elements })
    }

    fn parse_show(tokens: &[&Token], idx: &mut usize) -> Result<Statement> {
        ParserHelpers::expect_keyword(tokens, idx, "SHOW")?;

        if ParserHelpers::consume_keyword(tokens, idx, "PROCESSLIST") {
            return Ok(Statement::ShowProcessList(ShowProcessListQuery));
        }

        if ParserHelpers::consume_keyword(tokens, idx, "DATABASES") {
            return Ok(Statement::ShowTables(ShowTablesQuery {
                databases: true,
                ..ShowTablesQuery::default()
            }));
        }

        if ParserHelpers::consume_keyword(tokens, idx, "CREATE") {
            if ParserHelpers::consume_keyword(tokens, idx, "DATABASE") {
                let database = ParserHelpers::parse_identifier(tokens, idx)?;
                return Ok(Statement::ShowCreateDatabase(ShowCreateDatabaseQuery {
                    database,
                }));
            }
            let temporary = ParserHelpers::consume_keyword(tokens, idx, "TEMPORARY");
            ParserHelpers::consume_keyword(tokens, idx, "TABLE");
            let table = ParserHelpers::parse_table_name(tokens, idx)?;
            return Ok(Statement::ShowCreateTable(ShowCreateTableQuery {
                table,
                temporary,
            }));
        }

        let temporary = ParserHelpers::consume_keyword(tokens, idx, "TEMPORARY");
        ParserHelpers::expect_keyword(tokens, idx, "TABLES")?;

        let from = if ParserHelpers::consume_keyword(tokens, idx, "FROM")
            || ParserHelpers::consume_keyword(tokens, idx, "IN")
        {
            Some(ParserHelpers::parse_identifier(tokens, idx)?)
        } else {
            None
        };

        let like = if ParserHelpers::consume_keyword(tokens, idx, "LIKE") {
            Some(ParserHelpers::parse_string(tokens, idx)?)
        } else {
            None
        };

        Ok(Statement::ShowTables(ShowTablesQuery {
            databases: false,
            temporary,
            from,
            like,
        }))
    }

    fn parse_set(tokens: &[&Token], idx: &mut usize) -> Result<SetQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "SET")?;

        let mut changes = IndexMap::new();
        loop {
            let name = ParserHelpers::parse_identifier(tokens, idx)?;
            ParserHelpers::expect_token(tokens, idx, &Token::Eq)?;
            let value = ParserHelpers::parse_literal(tokens, idx)?;
            changes.insert(name, value);
            if !ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
                break;
            }
        }

        Ok(SetQuery { changes })
    }

    fn parse_optimize(tokens: &[&Token], idx: &mut usize) -> Result<OptimizeQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "OPTIMIZE")?;
        ParserHelpers::expect_keyword(tokens, idx, "TABLE")?;
        let table = ParserHelpers::parse_table_name(tokens, idx)?;

        let partition = if ParserHelpers::consume_keyword(tokens, idx, "PARTITION") {
            let value = if ParserHelpers::is_literal_start(tokens.get(*idx)) {
                ParserHelpers::parse_literal(tokens, idx)?.to_setting_string()
            } else {
                ParserHelpers::parse_identifier(tokens, idx)?
            };
            Some(value)
        } else {
            None
        };
        let is_final = ParserHelpers::consume_keyword(tokens, idx, "FINAL");
        let deduplicate = ParserHelpers::consume_keyword(tokens, idx, "DEDUPLICATE");

        Ok(OptimizeQuery {
            table,
            partition,
            is_final,
            deduplicate,
        })
    }

    fn parse_alter(tokens: &[&Token], idx: &mut usize) -> Result<AlterQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "ALTER")?;
        ParserHelpers::expect_keyword(tokens, idx, "TABLE")?;
        let table = ParserHelpers::parse_table_name(tokens, idx)?;

        let mut commands = vec![Self::parse_alter_command(tokens, idx)?];
        while ParserHelpers::consume_token(tokens, idx, &Token::Comma) {
            commands.push(Self::parse_alter_command(tokens, idx)?);
        }

        Ok(AlterQuery { table, commands })
    }

    fn parse_alter_command(tokens: &[&Token], idx: &mut usize) -> Result<AlterCommand> {
        if ParserHelpers::consume_keyword(tokens, idx, "ADD") {
            ParserHelpers::expect_keyword(tokens, idx, "COLUMN")?;
            let if_not_exists =
                ParserHelpers::consume_keywords(tokens, idx, &["IF", "NOT", "EXISTS"])?;
            let column = Self::parse_column_declaration(tokens, idx)?;
            let after = if ParserHelpers::consume_keyword(tokens, idx, "AFTER") {
                Some(ParserHelpers::parse_identifier(tokens, idx)?)
            } else {
                None
            };
            return Ok(AlterCommand::AddColumn {
                column,
                if_not_exists,
                after,
            });
        }

        if ParserHelpers::consume_keyword(tokens, idx, "DROP") {
            ParserHelpers::expect_keyword(tokens, idx, "COLUMN")?;
            let if_exists = ParserHelpers::consume_keywords(tokens, idx, &["IF", "EXISTS"])?;
            let name = ParserHelpers::parse_identifier(tokens, idx)?;
            return Ok(AlterCommand::DropColumn { name, if_exists });
        }

        Err(Error::unsupported_feature(format!(
            "ALTER command starting with {}",
            ParserHelpers::render_tokens(&tokens[(*idx).min(tokens.len())..])
        )))
    }

    fn parse_kill_query(tokens: &[&Token], idx: &mut usize) -> Result<KillQueryQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "KILL")?;
        ParserHelpers::expect_keyword(tokens, idx, "QUERY")?;
        ParserHelpers::expect_keyword(tokens, idx, "WHERE")?;

        let column_name = ParserHelpers::parse_identifier(tokens, idx)?;
        let column = match column_name.to_ascii_lowercase().as_str() {
            "query_id" => KillFilterColumn::QueryId,
            "user" => KillFilterColumn::User,
            other => {
                return Err(Error::unsupported_feature(format!(
                    "KILL QUERY can filter by query_id or user, not {}",
                    other
                )));
            }
        };
        ParserHelpers::expect_token(tokens, idx, &Token::Eq)?;
        let value = ParserHelpers::parse_string(tokens, idx)?;

        let mut sync = false;
        if ParserHelpers::consume_keyword(tokens, idx, "SYNC") {
            sync = true;
        } else {
            ParserHelpers::consume_keyword(tokens, idx, "ASYNC");
        }
        let test = ParserHelpers::consume_keyword(tokens, idx, "TEST");

        Ok(KillQueryQuery {
            column,
            value,
            sync,
            test,
        })
    }

    fn parse_system(tokens: &[&Token], idx: &mut usize) -> Result<SystemQuery> {
        ParserHelpers::expect_keyword(tokens, idx, "SYSTEM")?;

        let words: Vec<String> = tokens[*idx..]
            .iter()
            .map(|t| match t {
                Token::Word(w) => w.value.to_ascii_uppercase(),
                other => other.to_string(),
            })
            .collect();
        let command = match words.join(" ").as_str() {
            "SHUTDOWN" => SystemCommand::Shutdown,
            "KILL" => SystemCommand::Kill,
            "DROP DNS CACHE" => SystemCommand::DropDnsCache,
            "DROP MARK CACHE" => SystemCommand::DropMarkCache,
            "DROP UNCOMPRESSED CACHE" => SystemCommand::DropUncompressedCache,
            "RELOAD DICTIONARIES" => SystemCommand::ReloadDictionaries,
            "RELOAD CONFIG" => SystemCommand::ReloadConfig,
            "STOP MERGES" => SystemCommand::StopMerges,
            "START MERGES" => SystemCommand::StartMerges,
            other => {
                return Err(Error::parse_error(format!("Unknown SYSTEM query: {}", other)));
            }
        };
        *idx = tokens.len();

        Ok(SystemQuery { command })
    }
}
