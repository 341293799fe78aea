use super::ast::*;
use super::lexer::{tokenize, Token, TokenKind};

/// Recursive-descent parser over a flat token sequence.
///
/// Precedence, loosest to tightest: declarations/block-headers,
/// assignment, logical, comparison, additive, multiplicative, primary.
/// The parser produces no diagnostics of its own: malformed input
/// either panics here or further down in the evaluator.
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
}

/// Parse an entire source string into a [`Program`].
pub fn parse(source: &str) -> Program {
    Parser::new(tokenize(source)).parse_program()
}

impl Parser {
    fn new(tokens: Vec<Token>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn peek_next_kind(&self) -> Option<TokenKind> {
        self.tokens.get(self.pos + 1).map(|t| t.kind)
    }

    fn pop(&mut self) -> Token {
        let tok = self.tokens[self.pos].clone();
        self.pos += 1;
        tok
    }

    fn parse_program(&mut self) -> Program {
        let mut body = Vec::new();
        while self.peek().is_some() {
            body.push(self.parse_statement());
        }
        Program { body }
    }

    fn parse_statement(&mut self) -> Expr {
        self.parse_expression()
    }

    fn parse_expression(&mut self) -> Expr {
        match self.peek_kind() {
            Some(TokenKind::DeclareVar) => self.parse_var_declare(),
            Some(TokenKind::DeclareFunc) => self.parse_func_declare(),
            Some(TokenKind::If) => self.parse_conditional(),
            Some(TokenKind::While) => self.parse_while(),
            _ => self.parse_assignment(),
        }
    }

    fn parse_while(&mut self) -> Expr {
        self.pop(); // while / khi
        let condition = Box::new(self.parse_logical());
        let body = self.parse_block();
        Expr::WhileLoop { condition, body }
    }

    fn parse_conditional(&mut self) -> Expr {
        self.pop(); // if / nếu
        let condition = Box::new(self.parse_logical());
        let true_body = self.parse_block();

        let mut false_body = Vec::new();
        if self.peek_kind() == Some(TokenKind::Else) {
            self.pop(); // else / hay
            if self.peek_kind() == Some(TokenKind::If) {
                false_body.push(self.parse_conditional());
            } else {
                false_body = self.parse_block();
            }
        }

        Expr::Conditional {
            condition,
            true_body,
            false_body,
        }
    }

    fn parse_block(&mut self) -> Vec<Expr> {
        self.pop(); // {
        let mut statements = Vec::new();
        while self.peek_kind() != Some(TokenKind::CloseCurly) && self.peek().is_some() {
            statements.push(self.parse_statement());
        }
        self.pop(); // }
        statements
    }

    fn parse_assignment(&mut self) -> Expr {
        let expr = self.parse_logical();
        if self.peek().map(|t| t.text.as_str()) == Some("=") {
            self.pop(); // =
            let rhs = self.parse_expression();
            return Expr::Binary {
                left: Box::new(expr),
                right: Box::new(rhs),
                operator: "=".to_owned(),
            };
        }
        expr
    }

    fn parse_var_declare(&mut self) -> Expr {
        self.pop(); // let / cho
        let name = self.pop().text;
        self.pop(); // =
        let value = Box::new(self.parse_expression());
        Expr::VarDeclare { name, value }
    }

    fn parse_func_declare(&mut self) -> Expr {
        self.pop(); // fn / hàm

        let mut name = String::new();
        if self.peek_kind() == Some(TokenKind::Identifier) {
            name = self.pop().text;
        }

        self.pop(); // (
        let mut params = Vec::new();
        while self.peek_kind() != Some(TokenKind::CloseRound) {
            params.push(self.pop().text);
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pop();
            }
        }
        self.pop(); // )

        let body = self.parse_block();
        Expr::FuncDeclare { name, params, body }
    }

    fn parse_identifier_or_call(&mut self) -> Expr {
        if self.peek_next_kind() == Some(TokenKind::OpenRound) {
            let name = self.pop().text;
            self.pop(); // (
            let mut args = Vec::new();
            while self.peek_kind() != Some(TokenKind::CloseRound) {
                args.push(self.parse_expression());
                if self.peek_kind() == Some(TokenKind::Comma) {
                    self.pop();
                }
            }
            self.pop(); // )
            return Expr::FuncCall { name, args };
        }

        if self.peek_next_kind() == Some(TokenKind::OpenSquare) {
            let name = self.pop().text;
            self.pop(); // [
            let index = Box::new(self.parse_expression());
            self.pop(); // ]
            return Expr::ArrayAccess { name, index };
        }

        Expr::Identifier(self.pop().text)
    }

    fn parse_logical(&mut self) -> Expr {
        let mut left = self.parse_comparison();
        while let Some(op) = self.peek().map(|t| t.text.clone()) {
            if op != "&&" && op != "||" {
                break;
            }
            self.pop();
            let right = self.parse_comparison();
            left = Expr::Binary {
                left: Box::new(left),
                right: Box::new(right),
                operator: op,
            };
        }
        left
    }

    fn parse_comparison(&mut self) -> Expr {
        let mut left = self.parse_additive();
        while let Some(op) = self.peek().map(|t| t.text.clone()) {
            if !matches!(op.as_str(), "==" | "!=" | "<" | ">" | "<=" | ">=") {
                break;
            }
            self.pop();
            let right = self.parse_additive();
            left = Expr::Binary {
                left: Box::new(left),
                right: Box::new(right),
                operator: op,
            };
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        while let Some(op) = self.peek().map(|t| t.text.clone()) {
            if op != "+" && op != "-" {
                break;
            }
            self.pop();
            let right = self.parse_multiplicative();
            left = Expr::Binary {
                left: Box::new(left),
                right: Box::new(right),
                operator: op,
            };
        }
        left
    }

    /// Right-hand side recurses into this same level rather than into
    /// the primary level, making `*`/`/` right-associative. This is a
    /// known quirk of the reference implementation; preserve it.
    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_primary();
        while let Some(op) = self.peek().map(|t| t.text.clone()) {
            if op != "*" && op != "/" {
                break;
            }
            self.pop();
            let right = self.parse_multiplicative();
            left = Expr::Binary {
                left: Box::new(left),
                right: Box::new(right),
                operator: op,
            };
        }
        left
    }

    fn parse_array_literal(&mut self) -> Expr {
        self.pop(); // [
        let mut values = Vec::new();
        while self.peek_kind() != Some(TokenKind::CloseSquare) {
            values.push(self.parse_expression());
            if self.peek_kind() == Some(TokenKind::Comma) {
                self.pop();
            }
        }
        self.pop(); // ]
        Expr::ArrayLiteral(values)
    }

    fn parse_grouped(&mut self) -> Expr {
        self.pop(); // (
        let expr = self.parse_logical();
        self.pop(); // )
        expr
    }

    /// A leading `-` has no dedicated grammar production; the evaluator
    /// instead treats `NullLiteral - rhs` as `0 - rhs` (see
    /// `Expr::Binary` arithmetic dispatch), so the parser just
    /// synthesizes that left-hand side.
    fn parse_unary_minus(&mut self) -> Expr {
        self.pop(); // -
        let right = self.parse_primary();
        Expr::Binary {
            left: Box::new(Expr::NullLiteral),
            right: Box::new(right),
            operator: "-".to_owned(),
        }
    }

    fn parse_not(&mut self) -> Expr {
        self.pop(); // !
        let expr = self.parse_expression();
        Expr::Binary {
            left: Box::new(expr),
            right: Box::new(Expr::Identifier("true".to_owned())),
            operator: "!=".to_owned(),
        }
    }

    fn parse_primary(&mut self) -> Expr {
        let kind = match self.peek_kind() {
            Some(kind) => kind,
            None => panic!("unexpected end of input"),
        };
        match kind {
            TokenKind::Number => {
                let text = self.pop().text;
                Expr::IntLiteral(text.parse().expect("lexer only emits decimal digits"))
            }
            TokenKind::String => Expr::StringLiteral(self.pop().text),
            TokenKind::Break => {
                self.pop();
                Expr::Break
            }
            TokenKind::Return => {
                self.pop();
                Expr::Return
            }
            TokenKind::Not => self.parse_not(),
            TokenKind::Identifier => self.parse_identifier_or_call(),
            TokenKind::OpenSquare => self.parse_array_literal(),
            TokenKind::OpenRound => self.parse_grouped(),
            TokenKind::BinaryOperator if self.peek().map(|t| t.text.as_str()) == Some("-") => {
                self.parse_unary_minus()
            }
            other => panic!("unexpected token in primary expression: {:?}", other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_arithmetic_precedence() {
        let program = parse("1 + 2 * 3");
        assert_eq!(
            program.body,
            vec![Expr::Binary {
                left: Box::new(Expr::IntLiteral(1)),
                right: Box::new(Expr::Binary {
                    left: Box::new(Expr::IntLiteral(2)),
                    right: Box::new(Expr::IntLiteral(3)),
                    operator: "*".to_owned(),
                }),
                operator: "+".to_owned(),
            }]
        );
    }

    #[test]
    fn parses_variable_declaration() {
        let program = parse("let a = 10");
        assert_eq!(
            program.body,
            vec![Expr::VarDeclare {
                name: "a".to_owned(),
                value: Box::new(Expr::IntLiteral(10)),
            }]
        );
    }

    #[test]
    fn parses_bilingual_variable_declaration_identically() {
        assert_eq!(parse("let a = 1"), parse("cho a = 1"));
    }

    #[test]
    fn parses_function_call() {
        let program = parse("sum(1, 2)");
        assert_eq!(
            program.body,
            vec![Expr::FuncCall {
                name: "sum".to_owned(),
                args: vec![Expr::IntLiteral(1), Expr::IntLiteral(2)],
            }]
        );
    }

    #[test]
    fn parses_array_access() {
        let program = parse("a[0]");
        assert_eq!(
            program.body,
            vec![Expr::ArrayAccess {
                name: "a".to_owned(),
                index: Box::new(Expr::IntLiteral(0)),
            }]
        );
    }

    #[test]
    fn parses_not_as_not_equal_true() {
        let program = parse("!false");
        assert_eq!(
            program.body,
            vec![Expr::Binary {
                left: Box::new(Expr::Identifier("false".to_owned())),
                right: Box::new(Expr::Identifier("true".to_owned())),
                operator: "!=".to_owned(),
            }]
        );
    }

    #[test]
    fn parses_else_if_chain_as_nested_conditional() {
        let program = parse("if a { 1 } else if b { 2 } else { 3 }");
        match &program.body[0] {
            Expr::Conditional { false_body, .. } => {
                assert_eq!(false_body.len(), 1);
                assert!(matches!(false_body[0], Expr::Conditional { .. }));
            }
            other => panic!("expected conditional, got {:?}", other),
        }
    }

    #[test]
    fn leading_minus_desugars_to_null_minus_rhs() {
        let program = parse("-3 + 5");
        assert_eq!(
            program.body,
            vec![Expr::Binary {
                left: Box::new(Expr::Binary {
                    left: Box::new(Expr::NullLiteral),
                    right: Box::new(Expr::IntLiteral(3)),
                    operator: "-".to_owned(),
                }),
                right: Box::new(Expr::IntLiteral(5)),
                operator: "+".to_owned(),
            }]
        );
    }

    #[test]
    fn assignment_is_right_associative() {
        let program = parse("a = b = 1");
        match &program.body[0] {
            Expr::Binary { operator, right, .. } => {
                assert_eq!(operator, "=");
                assert!(matches!(**right, Expr::Binary { .. }));
            }
            other => panic!("expected assignment, got {:?}", other),
        }
    }
}
