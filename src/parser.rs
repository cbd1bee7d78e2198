use crate::ast::*;
use crate::error::ParseError;
use crate::tokenizer::{Keyword, Location, Symbol, Token, TokenKind};

/// Why a production did not match: the index of the token it stopped at and
/// what it wanted to see there.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Failure {
    at: usize,
    expected: String,
}

/// Result of a grammar production started at some cursor.
///
/// On success it carries the node and the cursor just past it. A failure
/// carries no cursor at all, so the caller still holds the one it started
/// from and can try another production there.
type Parsed<T> = Result<(T, usize), Failure>;

type Production = fn(&Parser<'_>, usize) -> Parsed<Statement>;

/// Statement alternatives, tried in this order at the same cursor.
const STATEMENTS: [Production; 3] = [
    |parser, cursor| {
        let (select, next) = parser.parse_select(cursor)?;
        Ok((Statement::Select(select), next))
    },
    |parser, cursor| {
        let (insert, next) = parser.parse_insert(cursor)?;
        Ok((Statement::Insert(insert), next))
    },
    |parser, cursor| {
        let (create, next) = parser.parse_create_table(cursor)?;
        Ok((Statement::CreateTable(create), next))
    },
];

/// A backtracking recursive-descent parser over a token slice.
pub struct Parser<'a> {
    tokens: &'a [Token],
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self { tokens }
    }

    /// Parses the whole token sequence as a script.
    ///
    /// Every statement must be followed by at least one `;`, and every token
    /// must belong to some statement.
    pub fn parse(&self) -> Result<Ast, ParseError> {
        if self.tokens.is_empty() {
            return Err(self.error(Failure {
                at: 0,
                expected: "statement".into(),
            }));
        }

        let mut statements = Vec::new();
        let mut cursor = 0;

        while cursor < self.tokens.len() {
            let (statement, next) = self
                .parse_statement(cursor)
                .map_err(|failure| self.error(failure))?;
            cursor = next;

            let mut terminated = false;
            while self.is_symbol(cursor, Symbol::Semicolon) {
                cursor += 1;
                terminated = true;
            }
            if !terminated {
                return Err(self.error(Failure {
                    at: cursor,
                    expected: "semicolon".into(),
                }));
            }

            statements.push(statement);
        }

        Ok(Ast { statements })
    }

    //helpers
    fn token(&self, cursor: usize) -> Option<&'a Token> {
        self.tokens.get(cursor)
    }

    fn is_symbol(&self, cursor: usize, symbol: Symbol) -> bool {
        self.token(cursor).is_some_and(|token| token.is_symbol(symbol))
    }

    fn fail<T>(&self, at: usize, expected: impl Into<String>) -> Parsed<T> {
        Err(Failure {
            at,
            expected: expected.into(),
        })
    }

    /// Turns a failure into a located error. At end of input the location of
    /// the last token is used.
    fn error(&self, failure: Failure) -> ParseError {
        let found = self.token(failure.at);
        let location = found
            .or_else(|| self.tokens.last())
            .map(|token| token.location)
            .unwrap_or_else(Location::default);

        ParseError {
            location,
            expected: failure.expected,
            found: found.map(|token| token.value.clone()),
        }
    }

    fn consume(&self, cursor: usize, keyword: Keyword) -> Parsed<&'a Token> {
        match self.token(cursor) {
            Some(token) if token.is_keyword(keyword) => Ok((token, cursor + 1)),
            _ => self.fail(cursor, keyword.as_str().to_uppercase()),
        }
    }

    fn consume_symbol(&self, cursor: usize, symbol: Symbol) -> Parsed<&'a Token> {
        match self.token(cursor) {
            Some(token) if token.is_symbol(symbol) => Ok((token, cursor + 1)),
            _ => self.fail(cursor, format!("'{}'", symbol.as_str())),
        }
    }

    fn consume_kind(&self, cursor: usize, kind: TokenKind, expected: &str) -> Parsed<&'a Token> {
        match self.token(cursor) {
            Some(token) if token.kind == kind => Ok((token, cursor + 1)),
            _ => self.fail(cursor, expected),
        }
    }

    fn consume_ident(&self, cursor: usize, expected: &str) -> Parsed<Token> {
        let (token, next) = self.consume_kind(cursor, TokenKind::Identifier, expected)?;
        Ok((token.clone(), next))
    }

    // productions

    /// Tries each statement kind at `cursor`. If none matches, reports the
    /// alternative that got furthest, or a generic expectation when none got
    /// past the first token.
    fn parse_statement(&self, cursor: usize) -> Parsed<Statement> {
        let mut furthest: Option<Failure> = None;

        for production in STATEMENTS {
            match production(self, cursor) {
                Ok(parsed) => return Ok(parsed),
                Err(failure) => {
                    if furthest.as_ref().is_none_or(|best| failure.at > best.at) {
                        furthest = Some(failure);
                    }
                }
            }
        }

        match furthest {
            Some(failure) if failure.at > cursor => Err(failure),
            _ => self.fail(cursor, "statement"),
        }
    }

    fn parse_expression(&self, cursor: usize) -> Parsed<Expression> {
        match self.token(cursor) {
            Some(token)
                if matches!(
                    token.kind,
                    TokenKind::Number | TokenKind::String | TokenKind::Identifier
                ) =>
            {
                Ok((Expression::Literal(token.clone()), cursor + 1))
            }
            _ => self.fail(cursor, "expression"),
        }
    }

    /// `expr (',' expr)*`
    fn parse_expressions(&self, cursor: usize) -> Parsed<Vec<Expression>> {
        let (first, mut next) = self.parse_expression(cursor)?;
        let mut expressions = vec![first];

        while self.is_symbol(next, Symbol::Comma) {
            let (expression, after) = self.parse_expression(next + 1)?;
            expressions.push(expression);
            next = after;
        }

        Ok((expressions, next))
    }

    fn parse_select(&self, cursor: usize) -> Parsed<SelectStatement> {
        let (_, next) = self.consume(cursor, Keyword::Select)?;
        let (items, next) = self.parse_expressions(next)?;
        let (_, next) = self.consume(next, Keyword::From)?;
        let (from, next) = self.consume_ident(next, "table name")?;

        Ok((SelectStatement { items, from }, next))
    }

    fn parse_insert(&self, cursor: usize) -> Parsed<InsertStatement> {
        let (_, next) = self.consume(cursor, Keyword::Insert)?;
        let (_, next) = self.consume(next, Keyword::Into)?;
        let (table, next) = self.consume_ident(next, "table name")?;
        let (_, next) = self.consume(next, Keyword::Values)?;
        let (_, next) = self.consume_symbol(next, Symbol::LeftParen)?;
        let (values, next) = self.parse_expressions(next)?;
        let (_, next) = self.consume_symbol(next, Symbol::RightParen)?;

        Ok((InsertStatement { table, values }, next))
    }

    /// `identifier keyword`. Any keyword is accepted in the type slot; the
    /// engine decides which ones name a data type.
    fn parse_column_def(&self, cursor: usize) -> Parsed<ColumnDefinition> {
        let (name, next) = self.consume_ident(cursor, "column name")?;
        let (data_type, next) = self.consume_kind(next, TokenKind::Keyword, "data type")?;

        Ok((
            ColumnDefinition {
                name,
                data_type: data_type.clone(),
            },
            next,
        ))
    }

    fn parse_create_table(&self, cursor: usize) -> Parsed<CreateTableStatement> {
        let (_, next) = self.consume(cursor, Keyword::Create)?;
        let (_, next) = self.consume(next, Keyword::Table)?;
        let (name, next) = self.consume_ident(next, "table name")?;
        let (_, mut next) = self.consume_symbol(next, Symbol::LeftParen)?;

        let mut columns = vec![];
        loop {
            let (column, after) = self.parse_column_def(next)?;
            columns.push(column);
            next = after;

            if self.is_symbol(next, Symbol::Comma) {
                next += 1;
                continue;
            }
            let (_, after) = self.consume_symbol(next, Symbol::RightParen)?;
            next = after;
            break;
        }

        Ok((CreateTableStatement { name, columns }, next))
    }
}

/// Parses a token sequence in one call.
pub fn parse(tokens: &[Token]) -> Result<Ast, ParseError> {
    Parser::new(tokens).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::tokenize;
    use proptest::prelude::*;

    fn parse_sql(sql: &str) -> Result<Ast, ParseError> {
        let tokens = tokenize(sql).unwrap();
        parse(&tokens)
    }

    fn values(expressions: &[Expression]) -> Vec<&str> {
        expressions.iter().map(|e| e.token().value.as_str()).collect()
    }

    #[test]
    fn test_parse_create_table() {
        let ast = parse_sql("CREATE TABLE users (id INT, name TEXT);").unwrap();

        match &ast.statements[..] {
            [Statement::CreateTable(ct)] => {
                assert_eq!(ct.name.value, "users");
                assert_eq!(ct.columns.len(), 2);
                assert_eq!(ct.columns[0].name.value, "id");
                assert!(ct.columns[0].data_type.is_keyword(Keyword::Int));
                assert_eq!(ct.columns[1].name.value, "name");
                assert!(ct.columns[1].data_type.is_keyword(Keyword::Text));
            }
            other => panic!("Expected CreateTable, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_insert() {
        let ast = parse_sql("INSERT INTO users VALUES (1, 'Alice', bob);").unwrap();

        let [Statement::Insert(insert)] = &ast.statements[..] else {
            panic!("Expected Insert");
        };
        assert_eq!(insert.table.value, "users");
        assert_eq!(values(&insert.values), vec!["1", "Alice", "bob"]);
        assert_eq!(insert.values[0].token().kind, TokenKind::Number);
        assert_eq!(insert.values[1].token().kind, TokenKind::String);
    }

    #[test]
    fn test_parse_select() {
        let ast = parse_sql("select id, name from users;").unwrap();

        let [Statement::Select(select)] = &ast.statements[..] else {
            panic!("Expected Select");
        };
        assert_eq!(values(&select.items), vec!["id", "name"]);
        assert_eq!(select.from.value, "users");
    }

    #[test]
    fn test_parse_script_keeps_order() {
        let ast = parse_sql(
            "CREATE TABLE t (a INT);;\nINSERT INTO t VALUES (1);\nSELECT a FROM t;",
        )
        .unwrap();

        assert_eq!(ast.statements.len(), 3);
        assert!(matches!(ast.statements[0], Statement::CreateTable(_)));
        assert!(matches!(ast.statements[1], Statement::Insert(_)));
        assert!(matches!(ast.statements[2], Statement::Select(_)));
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_sql("SELECT a FROM t").unwrap_err();
        assert_eq!(err.expected, "semicolon");
        assert_eq!(err.found, None);

        let err = parse_sql("SELECT a FROM t SELECT b FROM t;").unwrap_err();
        assert_eq!(err.expected, "semicolon");
        assert_eq!(err.found.as_deref(), Some("select"));
        assert_eq!(err.location, Location { line: 0, column: 16 });
    }

    #[test]
    fn test_missing_from() {
        let err = parse_sql("SELECT a b;").unwrap_err();
        assert_eq!(err.expected, "FROM");
        assert_eq!(err.found.as_deref(), Some("b"));
    }

    #[test]
    fn test_insert_missing_paren_reports_furthest_failure() {
        let err = parse_sql("INSERT INTO t VALUES (1, 2;").unwrap_err();
        assert_eq!(err.expected, "')'");
        assert_eq!(err.found.as_deref(), Some(";"));
    }

    #[test]
    fn test_create_table_bad_column_list() {
        let err = parse_sql("CREATE TABLE t (a INT b TEXT);").unwrap_err();
        assert_eq!(err.expected, "')'");
        assert_eq!(err.found.as_deref(), Some("b"));

        let err = parse_sql("CREATE TABLE t ();").unwrap_err();
        assert_eq!(err.expected, "column name");

        let err = parse_sql("CREATE TABLE t (a float);").unwrap_err();
        assert_eq!(err.expected, "data type");
    }

    #[test]
    fn test_any_keyword_fills_type_slot() {
        let ast = parse_sql("CREATE TABLE t (a SELECT);").unwrap();
        let [Statement::CreateTable(ct)] = &ast.statements[..] else {
            panic!("Expected CreateTable");
        };
        assert!(ct.columns[0].data_type.is_keyword(Keyword::Select));
    }

    #[test]
    fn test_unknown_statement() {
        let err = parse_sql("FROM t;").unwrap_err();
        assert_eq!(err.expected, "statement");
        assert_eq!(err.found.as_deref(), Some("from"));
    }

    #[test]
    fn test_star_and_where_are_not_parsed() {
        let err = parse_sql("SELECT * FROM t;").unwrap_err();
        assert_eq!(err.expected, "expression");

        let err = parse_sql("SELECT a FROM t WHERE;").unwrap_err();
        assert_eq!(err.expected, "semicolon");
        assert_eq!(err.found.as_deref(), Some("where"));
    }

    #[test]
    fn test_empty_script() {
        let err = parse(&[]).unwrap_err();
        assert_eq!(err.expected, "statement");
        assert_eq!(err.location, Location::default());

        let err = parse_sql(";").unwrap_err();
        assert_eq!(err.expected, "statement");
    }

    #[test]
    fn test_failed_alternative_does_not_move_cursor() {
        let tokens = tokenize("INSERT INTO t VALUES (1);").unwrap();
        let parser = Parser::new(&tokens);

        // SELECT fails at the first token; INSERT must start from the same place
        assert_eq!(parser.parse_select(0).unwrap_err().at, 0);
        let (insert, next) = parser.parse_insert(0).unwrap();
        assert_eq!(insert.table.value, "t");
        assert_eq!(next, tokens.len() - 1);
    }

    proptest! {
        #[test]
        fn prop_statement_either_consumes_or_fails(
            words in proptest::collection::vec(
                prop_oneof![
                    Just("select"), Just("insert"), Just("into"), Just("values"),
                    Just("create"), Just("table"), Just("from"), Just("int"),
                    Just("a"), Just("1"), Just("'x'"), Just(","), Just("("), Just(")"),
                ],
                0..12,
            )
        ) {
            let tokens = tokenize(&words.join(" ")).unwrap();
            let parser = Parser::new(&tokens);
            for production in STATEMENTS {
                match production(&parser, 0) {
                    Ok((_, next)) => prop_assert!(next > 0 && next <= tokens.len()),
                    Err(failure) => prop_assert!(failure.at <= tokens.len()),
                }
            }
        }
    }
}
