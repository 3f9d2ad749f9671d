/// Expression parsing methods.
///
/// This chunk implements the expression grammar using a precedence ladder:
/// `not` → comparison → additive → multiplicative → power → unary → postfix → primary.
///
/// ## Notes
/// - Comparisons parse into a single chained [`Expr::Compare`] node (left
///   operand, operator list, comparand list) rather than nested binaries, so
///   `a < b <= c` keeps its ordered comparand sequence.
impl<'a> Parser<'a> {
    // ========================================================================
    // Expressions
    // ========================================================================

    fn expression(&mut self) -> Result<Spanned<Expr>, CompileError> {
        self.not_expr()
    }

    fn not_expr(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.match_keyword(KeywordId::Not) {
            let start = self.tokens[self.pos - 1].span.start;
            let expr = self.not_expr()?;
            let span = Span::new(start, expr.span.end);
            Ok(Spanned::new(Expr::Unary(UnaryOp::Not, Box::new(expr)), span))
        } else {
            self.comparison()
        }
    }

    fn comparison(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let left = self.additive()?;

        let mut ops = Vec::new();
        let mut comparators = Vec::new();

        loop {
            let op = if self.match_op(OperatorId::EqEq) {
                CompareOp::Eq
            } else if self.match_op(OperatorId::NotEq) {
                CompareOp::NotEq
            } else if self.match_op(OperatorId::Lt) {
                CompareOp::Lt
            } else if self.match_op(OperatorId::LtEq) {
                CompareOp::LtEq
            } else if self.match_op(OperatorId::Gt) {
                CompareOp::Gt
            } else if self.match_op(OperatorId::GtEq) {
                CompareOp::GtEq
            } else {
                break;
            };

            ops.push(op);
            comparators.push(self.additive()?);
        }

        if ops.is_empty() {
            return Ok(left);
        }

        let end = comparators.last().map(|c| c.span).unwrap_or(left.span);
        let span = left.span.merge(end);
        Ok(Spanned::new(
            Expr::Compare(CompareExpr {
                left: Box::new(left),
                ops,
                comparators,
            }),
            span,
        ))
    }

    fn additive(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.multiplicative()?;

        loop {
            let op = if self.match_op(OperatorId::Plus) {
                BinaryOp::Add
            } else if self.match_op(OperatorId::Minus) {
                BinaryOp::Sub
            } else {
                break;
            };

            let right = self.multiplicative()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }

        Ok(left)
    }

    fn multiplicative(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.power()?;

        loop {
            let op = if self.match_op(OperatorId::Star) {
                BinaryOp::Mul
            } else if self.match_op(OperatorId::SlashSlash) {
                BinaryOp::FloorDiv
            } else if self.match_op(OperatorId::Slash) {
                BinaryOp::Div
            } else if self.match_op(OperatorId::Percent) {
                BinaryOp::Mod
            } else {
                break;
            };

            let right = self.power()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), op, Box::new(right)), span);
        }

        Ok(left)
    }

    fn power(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut left = self.unary()?;

        // Right-associative: 2**3**2 = 2**(3**2)
        if self.match_op(OperatorId::StarStar) {
            let right = self.power()?;
            let span = left.span.merge(right.span);
            left = Spanned::new(Expr::Binary(Box::new(left), BinaryOp::Pow, Box::new(right)), span);
        }

        Ok(left)
    }

    fn unary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        if self.match_op(OperatorId::Minus) {
            let start = self.tokens[self.pos - 1].span.start;
            let expr = self.unary()?;
            let span = Span::new(start, expr.span.end);
            Ok(Spanned::new(Expr::Unary(UnaryOp::Neg, Box::new(expr)), span))
        } else {
            self.postfix()
        }
    }

    fn postfix(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let mut expr = self.primary()?;

        loop {
            if self.match_punct(PunctuationId::Dot) {
                let name = self.identifier()?;
                let span = Span::new(expr.span.start, self.tokens[self.pos - 1].span.end);
                expr = Spanned::new(Expr::Attribute(Box::new(expr), name), span);
            } else if self.match_punct(PunctuationId::LParen) {
                let args = self.call_args()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after arguments")?;
                let span = Span::new(expr.span.start, self.tokens[self.pos - 1].span.end);
                expr = Spanned::new(Expr::Call(Box::new(expr), args), span);
            } else {
                break;
            }
        }

        Ok(expr)
    }

    fn call_args(&mut self) -> Result<Vec<CallArg>, CompileError> {
        let mut args = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                // Named argument: `name=value`
                if let TokenKind::Ident(name) = &self.peek().kind {
                    if self.peek_next().kind == TokenKind::Operator(OperatorId::Eq) {
                        let name = name.clone();
                        self.advance(); // consume name
                        self.advance(); // consume '='
                        let value = self.expression()?;
                        args.push(CallArg::Named(name, value));
                    } else {
                        args.push(CallArg::Positional(self.expression()?));
                    }
                } else {
                    args.push(CallArg::Positional(self.expression()?));
                }

                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        Ok(args)
    }

    fn primary(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let span = self.current_span();

        match &self.peek().kind {
            TokenKind::Int(n) => {
                let n = *n;
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::Int(n)), span))
            }
            TokenKind::Float(f) => {
                let f = *f;
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::Float(f)), span))
            }
            TokenKind::String(s) => {
                let s = s.clone();
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::String(s)), span))
            }
            TokenKind::Keyword(KeywordId::True) => {
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::Bool(true)), span))
            }
            TokenKind::Keyword(KeywordId::False) => {
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::Bool(false)), span))
            }
            TokenKind::Keyword(KeywordId::None) => {
                self.advance();
                Ok(Spanned::new(Expr::Literal(Literal::None), span))
            }
            TokenKind::Ident(name) => {
                let name = name.clone();
                self.advance();
                Ok(Spanned::new(Expr::Ident(name), span))
            }
            TokenKind::Punctuation(PunctuationId::LParen) => {
                self.advance();
                let inner = self.expression()?;
                self.expect_punct(PunctuationId::RParen, "Expected ')' after expression")?;
                let full = Span::new(span.start, self.tokens[self.pos - 1].span.end);
                Ok(Spanned::new(Expr::Paren(Box::new(inner)), full))
            }
            _ => Err(CompileError::syntax(
                format!("Expected expression, found {:?}", self.peek().kind),
                span,
            )),
        }
    }
}
