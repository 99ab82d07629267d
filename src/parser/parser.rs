use crate::error::SyntaxError;
use crate::ir::ast;
use crate::span::Span;

use super::lexer::{Token, TokenKind};

/// Resultado del análisis sintáctico. `ast` solo está ausente cuando el
/// prólogo INICIO { no pudo reconocerse; los errores internos devuelven
/// igualmente el AST parcial construido.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseOutcome {
    pub success: bool,
    pub ast: Option<ast::Program>,
    pub errors: Vec<SyntaxError>,
}

pub fn parse_tokens(tokens: Vec<Token>) -> ParseOutcome {
    Parser::new(tokens).parse_program()
}

/// Descenso recursivo predictivo sobre la secuencia de tokens. El cursor
/// solo avanza: ante un error se registra y se fuerza el progreso, nunca se
/// retrocede ni se reintenta otra producción.
struct Parser {
    tokens: Vec<Token>,
    position: usize,
    errors: Vec<SyntaxError>,
    last_span: Span,
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            position: 0,
            errors: Vec::new(),
            last_span: Span::default(),
        }
    }

    // Program := 'INICIO' '{' Body '}' 'FIN'
    fn parse_program(mut self) -> ParseOutcome {
        if self.expect_keyword("INICIO").is_none() {
            return self.into_outcome(None);
        }
        if self.expect(TokenKind::LBrace).is_none() {
            return self.into_outcome(None);
        }

        let body = self.parse_body();
        self.expect(TokenKind::RBrace);
        self.expect_keyword("FIN");

        self.into_outcome(Some(ast::Program { body }))
    }

    // Body := Statement*  (termina en '}' o al agotarse los tokens)
    fn parse_body(&mut self) -> Vec<ast::Statement> {
        let mut body = Vec::new();

        loop {
            let Some(tok) = self.peek().cloned() else {
                self.exhausted("'}'");
                break;
            };
            if tok.kind == TokenKind::RBrace {
                break;
            }

            let statement = match (tok.kind, tok.text.as_str()) {
                (TokenKind::Keyword, "int") => self.parse_declaration(),
                (TokenKind::Identifier, _) => self.parse_assignment(),
                (TokenKind::Keyword, "for") => self.parse_for_loop(),
                (TokenKind::Keyword, "vacio") => self.parse_function_decl(),
                _ => {
                    // Un token suelto se descarta y el cuerpo continúa
                    self.errors.push(SyntaxError::UnexpectedStatementStart {
                        found: tok.text.clone(),
                        line: tok.span.line,
                        column: tok.span.column,
                    });
                    self.advance();
                    None
                }
            };

            if let Some(statement) = statement {
                body.push(statement);
            }
        }

        body
    }

    // Declaration := 'int' IDENT '=' Expression
    fn parse_declaration(&mut self) -> Option<ast::Statement> {
        self.advance(); // int
        let identifier = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::Equal)?;
        let expr = self.parse_expression()?;
        Some(ast::Statement::Declaration { identifier, expr })
    }

    // Assignment := IDENT '=' Expression
    fn parse_assignment(&mut self) -> Option<ast::Statement> {
        let identifier = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::Equal)?;
        let expr = self.parse_expression()?;
        Some(ast::Statement::Assignment { identifier, expr })
    }

    // ForLoop := 'for' '(' NUMBER ')' '{' Body '}'
    fn parse_for_loop(&mut self) -> Option<ast::Statement> {
        self.advance(); // for
        self.expect(TokenKind::LParen)?;
        let number = self.expect(TokenKind::Number)?;
        let iterations = self.parse_int(&number)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_body();
        self.expect(TokenKind::RBrace)?;
        Some(ast::Statement::ForLoop { iterations, body })
    }

    // FunctionDecl := 'vacio' IDENT '(' ')' '{' Body '}'
    fn parse_function_decl(&mut self) -> Option<ast::Statement> {
        self.advance(); // vacio
        let name = self.expect(TokenKind::Identifier)?.text;
        self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::RParen)?;
        self.expect(TokenKind::LBrace)?;
        let body = self.parse_body();
        self.expect(TokenKind::RBrace)?;
        Some(ast::Statement::FunctionDecl { name, body })
    }

    // Expression := Term (('+'|'-') Term)*
    // Acumulación iterativa: garantiza asociatividad a la izquierda y
    // profundidad de pila acotada
    fn parse_expression(&mut self) -> Option<ast::Expression> {
        let mut node = self.parse_term()?;

        loop {
            let op = match self.peek() {
                Some(tok) if tok.kind == TokenKind::AddSub => {
                    if tok.text == "+" {
                        ast::BinaryOperator::Add
                    } else {
                        ast::BinaryOperator::Subtract
                    }
                }
                _ => break,
            };
            self.advance();
            let right = self.parse_term()?;
            node = ast::Expression::BinaryOp {
                left: Box::new(node),
                op,
                right: Box::new(right),
            };
        }

        Some(node)
    }

    // Term := Factor (('*'|'/') Factor)*
    fn parse_term(&mut self) -> Option<ast::Expression> {
        let mut node = self.parse_factor()?;

        loop {
            let op = match self.peek() {
                Some(tok) if tok.kind == TokenKind::MulDiv => {
                    if tok.text == "*" {
                        ast::BinaryOperator::Multiply
                    } else {
                        ast::BinaryOperator::Divide
                    }
                }
                _ => break,
            };
            self.advance();
            let right = self.parse_factor()?;
            node = ast::Expression::BinaryOp {
                left: Box::new(node),
                op,
                right: Box::new(right),
            };
        }

        Some(node)
    }

    // Factor := NUMBER | IDENT | '(' Expression ')'
    fn parse_factor(&mut self) -> Option<ast::Expression> {
        let Some(tok) = self.peek().cloned() else {
            self.exhausted("una expresión");
            return None;
        };

        match tok.kind {
            TokenKind::Number => {
                self.advance();
                self.parse_int(&tok).map(ast::Expression::Number)
            }
            TokenKind::Identifier => {
                self.advance();
                Some(ast::Expression::Variable(tok.text))
            }
            TokenKind::LParen => {
                self.advance();
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen)?;
                Some(expr)
            }
            _ => {
                // No se consume: un '}' aquí debe cerrar el bloque en el
                // llamador en lugar de perderse en la recuperación
                self.unexpected("un número, una variable o '('", &tok);
                None
            }
        }
    }

    fn parse_int(&mut self, tok: &Token) -> Option<i64> {
        match tok.text.parse::<i64>() {
            Ok(value) => Some(value),
            Err(_) => {
                self.errors.push(SyntaxError::NumericOverflow {
                    literal: tok.text.clone(),
                    line: tok.span.line,
                    column: tok.span.column,
                });
                None
            }
        }
    }

    /// Consumo con recuperación: si el token actual no coincide se registra
    /// el error y se avanza de todos modos para garantizar el progreso
    fn expect(&mut self, kind: TokenKind) -> Option<Token> {
        let Some(tok) = self.peek().cloned() else {
            self.exhausted(describe(kind));
            return None;
        };
        if tok.kind == kind {
            self.advance();
            Some(tok)
        } else {
            self.unexpected(describe(kind), &tok);
            self.advance();
            None
        }
    }

    fn expect_keyword(&mut self, keyword: &str) -> Option<Token> {
        let expected = format!("'{keyword}'");
        let Some(tok) = self.peek().cloned() else {
            self.exhausted(&expected);
            return None;
        };
        if tok.kind == TokenKind::Keyword && tok.text == keyword {
            self.advance();
            Some(tok)
        } else {
            self.unexpected(&expected, &tok);
            self.advance();
            None
        }
    }

    fn unexpected(&mut self, expected: &str, tok: &Token) {
        self.errors.push(SyntaxError::UnexpectedToken {
            expected: expected.to_string(),
            found: tok.text.clone(),
            line: tok.span.line,
            column: tok.span.column,
        });
    }

    fn exhausted(&mut self, expected: &str) {
        self.errors.push(SyntaxError::UnterminatedBlock {
            expected: expected.to_string(),
            line: self.last_span.line,
            column: self.last_span.column,
        });
    }

    // Métodos auxiliares
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        if let Some(tok) = self.tokens.get(self.position) {
            self.last_span = tok.span;
            self.position += 1;
        }
    }

    fn into_outcome(self, ast: Option<ast::Program>) -> ParseOutcome {
        ParseOutcome {
            success: self.errors.is_empty(),
            ast,
            errors: self.errors,
        }
    }
}

fn describe(kind: TokenKind) -> &'static str {
    match kind {
        TokenKind::Keyword => "una palabra clave",
        TokenKind::Identifier => "un identificador",
        TokenKind::Number => "un número",
        TokenKind::AddSub => "'+' o '-'",
        TokenKind::MulDiv => "'*' o '/'",
        TokenKind::Equal => "'='",
        TokenKind::LParen => "'('",
        TokenKind::RParen => "')'",
        TokenKind::LBrace => "'{'",
        TokenKind::RBrace => "'}'",
        TokenKind::Invalid => "un token válido",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::ast::{BinaryOperator, Expression, Program, Statement};
    use crate::parser::lexer::tokenize;

    fn parse(source: &str) -> ParseOutcome {
        parse_tokens(tokenize(source))
    }

    #[test]
    fn declaracion_simple() {
        let outcome = parse("INICIO { int x = 5 } FIN");
        assert!(outcome.success);
        assert!(outcome.errors.is_empty());
        assert_eq!(
            outcome.ast,
            Some(Program {
                body: vec![Statement::Declaration {
                    identifier: "x".to_string(),
                    expr: Expression::Number(5),
                }],
            })
        );
    }

    #[test]
    fn asignacion_y_ciclo() {
        let outcome = parse("INICIO { x = x + 10 for (3) { x = x * 2 } } FIN");
        assert!(outcome.success);

        let body = outcome.ast.unwrap().body;
        assert_eq!(
            body[0],
            Statement::Assignment {
                identifier: "x".to_string(),
                expr: Expression::BinaryOp {
                    left: Box::new(Expression::Variable("x".to_string())),
                    op: BinaryOperator::Add,
                    right: Box::new(Expression::Number(10)),
                },
            }
        );
        let Statement::ForLoop { iterations, body: inner } = &body[1] else {
            panic!("se esperaba un ForLoop, hay {:?}", body[1]);
        };
        assert_eq!(*iterations, 3);
        assert_eq!(
            inner[0],
            Statement::Assignment {
                identifier: "x".to_string(),
                expr: Expression::BinaryOp {
                    left: Box::new(Expression::Variable("x".to_string())),
                    op: BinaryOperator::Multiply,
                    right: Box::new(Expression::Number(2)),
                },
            }
        );
    }

    #[test]
    fn expresion_faltante_reporta_un_solo_error() {
        let outcome = parse("INICIO {\nint y =\n} FIN");
        assert!(!outcome.success);
        assert_eq!(outcome.errors.len(), 1);
        // El error apunta al '}' encontrado donde debía iniciar la expresión
        assert!(matches!(
            &outcome.errors[0],
            SyntaxError::UnexpectedToken { found, line: 3, column: 1, .. } if found == "}"
        ));
        // El prólogo sí se reconoció: hay AST parcial
        assert_eq!(outcome.ast, Some(Program { body: vec![] }));
    }

    #[test]
    fn token_invalido_se_salta_y_se_continua() {
        let outcome = parse("INICIO { @@@ int z = 1 } FIN");
        assert!(!outcome.success);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            SyntaxError::UnexpectedStatementStart { found, line: 1, .. } if found == "@@@"
        ));
        assert_eq!(
            outcome.ast.unwrap().body,
            vec![Statement::Declaration {
                identifier: "z".to_string(),
                expr: Expression::Number(1),
            }]
        );
    }

    #[test]
    fn entrada_agotada_reporta_bloque_sin_cerrar() {
        let outcome = parse("INICIO { /* sin cerrar");
        assert!(!outcome.success);
        assert!(!outcome.errors.is_empty());
        assert!(outcome
            .errors
            .iter()
            .all(|e| matches!(e, SyntaxError::UnterminatedBlock { .. })));
        assert_eq!(outcome.ast, Some(Program { body: vec![] }));
    }

    #[test]
    fn cuerpo_vacio_es_valido() {
        let outcome = parse("INICIO { } FIN");
        assert!(outcome.success);
        assert_eq!(outcome.ast, Some(Program { body: vec![] }));
    }

    #[test]
    fn sin_inicio_no_hay_ast() {
        let outcome = parse("int x = 5");
        assert!(!outcome.success);
        assert_eq!(outcome.ast, None);
        assert!(matches!(
            &outcome.errors[0],
            SyntaxError::UnterminatedBlock { expected, .. } if expected == "'INICIO'"
        ));
    }

    #[test]
    fn resta_asociativa_a_la_izquierda() {
        let outcome = parse("INICIO { x = 1 - 2 - 3 } FIN");
        let body = outcome.ast.unwrap().body;
        let Statement::Assignment { expr, .. } = &body[0] else {
            panic!("se esperaba una asignación");
        };
        // (1 - 2) - 3, nunca 1 - (2 - 3)
        assert_eq!(
            *expr,
            Expression::BinaryOp {
                left: Box::new(Expression::BinaryOp {
                    left: Box::new(Expression::Number(1)),
                    op: BinaryOperator::Subtract,
                    right: Box::new(Expression::Number(2)),
                }),
                op: BinaryOperator::Subtract,
                right: Box::new(Expression::Number(3)),
            }
        );
    }

    #[test]
    fn precedencia_de_termino_sobre_suma() {
        let outcome = parse("INICIO { x = 1 + 2 * 3 } FIN");
        let body = outcome.ast.unwrap().body;
        let Statement::Assignment { expr, .. } = &body[0] else {
            panic!("se esperaba una asignación");
        };
        assert_eq!(
            *expr,
            Expression::BinaryOp {
                left: Box::new(Expression::Number(1)),
                op: BinaryOperator::Add,
                right: Box::new(Expression::BinaryOp {
                    left: Box::new(Expression::Number(2)),
                    op: BinaryOperator::Multiply,
                    right: Box::new(Expression::Number(3)),
                }),
            }
        );
    }

    #[test]
    fn parentesis_agrupan() {
        let outcome = parse("INICIO { x = (1 + 2) * 3 } FIN");
        let body = outcome.ast.unwrap().body;
        let Statement::Assignment { expr, .. } = &body[0] else {
            panic!("se esperaba una asignación");
        };
        assert_eq!(
            *expr,
            Expression::BinaryOp {
                left: Box::new(Expression::BinaryOp {
                    left: Box::new(Expression::Number(1)),
                    op: BinaryOperator::Add,
                    right: Box::new(Expression::Number(2)),
                }),
                op: BinaryOperator::Multiply,
                right: Box::new(Expression::Number(3)),
            }
        );
    }

    #[test]
    fn funcion_con_cuerpo_anidado() {
        let outcome = parse("INICIO { vacio doble() { int a = 1 a = a / 2 } } FIN");
        assert!(outcome.success);
        let body = outcome.ast.unwrap().body;
        let Statement::FunctionDecl { name, body: inner } = &body[0] else {
            panic!("se esperaba una función");
        };
        assert_eq!(name, "doble");
        assert_eq!(inner.len(), 2);
    }

    #[test]
    fn ciclos_anidados() {
        let outcome = parse("INICIO { for (2) { for (4) { x = 1 } } } FIN");
        assert!(outcome.success);
        let body = outcome.ast.unwrap().body;
        let Statement::ForLoop { iterations, body: inner } = &body[0] else {
            panic!("se esperaba un ForLoop");
        };
        assert_eq!(*iterations, 2);
        let Statement::ForLoop { iterations, .. } = &inner[0] else {
            panic!("se esperaba un ForLoop interno");
        };
        assert_eq!(*iterations, 4);
    }

    #[test]
    fn desbordamiento_numerico() {
        let outcome = parse("INICIO { int x = 99999999999999999999 } FIN");
        assert!(!outcome.success);
        assert_eq!(outcome.errors.len(), 1);
        assert!(matches!(
            &outcome.errors[0],
            SyntaxError::NumericOverflow { literal, .. }
                if literal == "99999999999999999999"
        ));
        // La declaración no produce nodo
        assert_eq!(outcome.ast, Some(Program { body: vec![] }));
    }

    #[test]
    fn declaracion_sin_identificador_se_recupera() {
        let outcome = parse("INICIO { int = 5 int w = 2 } FIN");
        assert!(!outcome.success);
        // La segunda declaración sobrevive a la recuperación
        assert_eq!(
            outcome.ast.unwrap().body,
            vec![Statement::Declaration {
                identifier: "w".to_string(),
                expr: Expression::Number(2),
            }]
        );
    }

    #[test]
    fn basura_no_cuelga_el_parser() {
        // Progreso forzado: siempre termina, con errores acumulados
        let outcome = parse("INICIO { for ( x ) { = = = ) ( } int k = (1 } FIN");
        assert!(!outcome.success);
        assert!(!outcome.errors.is_empty());
    }

    #[test]
    fn errores_en_orden_de_deteccion() {
        let outcome = parse("INICIO {\n@@\nint a =\n} FIN");
        assert!(!outcome.success);
        let lines: Vec<usize> = outcome
            .errors
            .iter()
            .map(|e| match e {
                SyntaxError::UnexpectedToken { line, .. }
                | SyntaxError::UnexpectedStatementStart { line, .. }
                | SyntaxError::UnterminatedBlock { line, .. }
                | SyntaxError::NumericOverflow { line, .. } => *line,
            })
            .collect();
        let mut sorted = lines.clone();
        sorted.sort();
        assert_eq!(lines, sorted);
    }

    #[test]
    fn reanalisis_identico() {
        let tokens = tokenize("INICIO { int x = 5 @@ } FIN");
        let first = parse_tokens(tokens.clone());
        let second = parse_tokens(tokens);
        assert_eq!(first, second);
    }
}
