/// Statement parsing methods.
///
/// This chunk parses every statement form, including class and function
/// definitions (which are statements in this language and therefore nest),
/// as well as indentation-based blocks.
///
/// ## Notes
/// - Block parsing relies on `Indent` / `Dedent` layout tokens produced by the lexer.
impl<'a> Parser<'a> {
    // ========================================================================
    // Statements
    // ========================================================================

    fn block(&mut self) -> Result<Vec<Spanned<Statement>>, CompileError> {
        let mut stmts = Vec::new();
        self.skip_newlines();
        while !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            stmts.push(self.statement()?);
            self.skip_newlines();
        }
        Ok(stmts)
    }

    fn statement(&mut self) -> Result<Spanned<Statement>, CompileError> {
        let start = self.current_span().start;

        let stmt = if self.check_keyword(KeywordId::Import) {
            Statement::Import(self.import_stmt()?)
        } else if self.check_keyword(KeywordId::Class) {
            Statement::Class(self.class_decl()?)
        } else if self.check_keyword(KeywordId::Def) {
            Statement::Function(self.function_decl()?)
        } else if self.check_keyword(KeywordId::Return) {
            self.return_stmt()?
        } else if self.check_keyword(KeywordId::Pass) {
            self.advance();
            Statement::Pass
        } else {
            self.assignment_or_expr_stmt()?
        };

        let end = self.tokens[self.pos.saturating_sub(1)].span.end;
        Ok(Spanned::new(stmt, Span::new(start, end)))
    }

    fn import_stmt(&mut self) -> Result<ImportStmt, CompileError> {
        self.expect_keyword(KeywordId::Import, "Expected 'import'")?;
        let module = self.identifier()?;
        Ok(ImportStmt { module })
    }

    /// Parse a class declaration: `class Name(Base, ...):` with the base list
    /// optional.
    fn class_decl(&mut self) -> Result<ClassDecl, CompileError> {
        self.expect_keyword(KeywordId::Class, "Expected 'class'")?;
        let name = self.identifier()?;

        let bases = if self.match_punct(PunctuationId::LParen) {
            let mut bases = Vec::new();
            if !self.check_punct(PunctuationId::RParen) {
                loop {
                    bases.push(self.base_ref()?);
                    if !self.match_punct(PunctuationId::Comma) {
                        break;
                    }
                }
            }
            self.expect_punct(PunctuationId::RParen, "Expected ')' after base list")?;
            bases
        } else {
            Vec::new()
        };

        self.expect_punct(PunctuationId::Colon, "Expected ':' after class header")?;
        self.expect(&TokenKind::Newline, "Expected newline after ':'")?;
        self.expect(&TokenKind::Indent, "Expected indented block")?;
        let body = self.block()?;
        self.expect(&TokenKind::Dedent, "Expected dedent after class body")?;

        Ok(ClassDecl { name, bases, body })
    }

    /// Parse a base-capability reference: a dotted name such as `Base` or
    /// `testkit.TestCase`.
    fn base_ref(&mut self) -> Result<Spanned<Expr>, CompileError> {
        let span = self.current_span();
        let name = self.identifier()?;
        let mut expr = Spanned::new(Expr::Ident(name), span);

        while self.match_punct(PunctuationId::Dot) {
            let attr = self.identifier()?;
            let end = self.tokens[self.pos - 1].span.end;
            let span = Span::new(expr.span.start, end);
            expr = Spanned::new(Expr::Attribute(Box::new(expr), attr), span);
        }

        Ok(expr)
    }

    fn function_decl(&mut self) -> Result<FunctionDecl, CompileError> {
        self.expect_keyword(KeywordId::Def, "Expected 'def'")?;
        let name = self.identifier()?;

        self.expect_punct(PunctuationId::LParen, "Expected '(' after function name")?;
        let mut params = Vec::new();
        if !self.check_punct(PunctuationId::RParen) {
            loop {
                params.push(self.identifier()?);
                if !self.match_punct(PunctuationId::Comma) {
                    break;
                }
            }
        }
        self.expect_punct(PunctuationId::RParen, "Expected ')' after parameters")?;

        self.expect_punct(PunctuationId::Colon, "Expected ':' after function header")?;
        self.expect(&TokenKind::Newline, "Expected newline after ':'")?;
        self.expect(&TokenKind::Indent, "Expected indented block")?;
        let body = self.block()?;
        self.expect(&TokenKind::Dedent, "Expected dedent after function body")?;

        Ok(FunctionDecl { name, params, body })
    }

    fn return_stmt(&mut self) -> Result<Statement, CompileError> {
        self.expect_keyword(KeywordId::Return, "Expected 'return'")?;
        let expr = if !self.check(&TokenKind::Newline) && !self.check(&TokenKind::Dedent) && !self.is_at_end() {
            Some(self.expression()?)
        } else {
            None
        };
        Ok(Statement::Return(expr))
    }

    fn assignment_or_expr_stmt(&mut self) -> Result<Statement, CompileError> {
        // Look for `ident = expr` (assignment); everything else is an
        // expression statement.
        if let TokenKind::Ident(_) = &self.peek().kind {
            if self.peek_next().kind == TokenKind::Operator(OperatorId::Eq) {
                let name = self.identifier()?;
                self.advance(); // consume '='
                let value = self.expression()?;
                return Ok(Statement::Assign(AssignStmt { name, value }));
            }
        }

        let expr = self.expression()?;
        Ok(Statement::Expr(expr))
    }
}
