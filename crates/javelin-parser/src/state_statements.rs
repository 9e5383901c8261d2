//! Statement parsing. Every method here is total: malformed input
//! produces diagnostics and error nodes, never an abort.

use crate::ast::{
    AssertData, BlockData, CatchClauseData, DoData, EmptyStatementData, ErrorNodeData,
    ExpressionStatementData, ForData, ForeachData, IfData, JumpData, LabeledData, LocalDeclData,
    Node, NodeBase, NodeIndex, NodeList, ParameterData, ReturnData, SwitchCaseData, SwitchData,
    SynchronizedData, ThrowData, TryData, WhileData,
};
use crate::completion::tracker::{MarkerKind, Production};
use crate::state::ParserState;
use javelin_common::diagnostics::diagnostic_codes;
use javelin_scanner::{token_is_modifier, token_is_primitive_type, SyntaxKind};

impl ParserState {
    pub(crate) fn parse_statement(&mut self) -> NodeIndex {
        if !self.enter() {
            // Too deep; consume one token so the caller makes progress.
            let node = self.error_node_here();
            self.next_token();
            return node;
        }
        let result = self.parse_statement_inner();
        self.exit();
        result
    }

    fn parse_statement_inner(&mut self) -> NodeIndex {
        let start = self.token_start();
        match self.token {
            SyntaxKind::OpenBraceToken => self.parse_block(),
            SyntaxKind::SemicolonToken => {
                self.next_token();
                self.arena.add(Node::EmptyStatement(EmptyStatementData {
                    base: NodeBase::new(start, self.prev_end(start)),
                }))
            }
            SyntaxKind::IfKeyword => self.parse_if(),
            SyntaxKind::WhileKeyword => self.parse_while(),
            SyntaxKind::DoKeyword => self.parse_do(),
            SyntaxKind::ForKeyword => self.parse_for(),
            SyntaxKind::SwitchKeyword => self.parse_switch(),
            SyntaxKind::TryKeyword => self.parse_try(),
            SyntaxKind::ReturnKeyword => {
                self.next_token();
                let expression = if self.at(SyntaxKind::SemicolonToken) || self.at_eof() {
                    NodeIndex::NONE
                } else {
                    self.parse_expression()
                };
                self.eat_statement_end();
                self.arena.add(Node::ReturnStatement(ReturnData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    expression,
                }))
            }
            SyntaxKind::ThrowKeyword => {
                self.next_token();
                let expression = self.parse_expression();
                self.eat_statement_end();
                self.arena.add(Node::ThrowStatement(ThrowData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    expression,
                }))
            }
            SyntaxKind::BreakKeyword => {
                self.next_token();
                let label = self.parse_optional_identifier();
                self.eat_statement_end();
                self.arena.add(Node::BreakStatement(JumpData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    label,
                }))
            }
            SyntaxKind::ContinueKeyword => {
                self.next_token();
                let label = self.parse_optional_identifier();
                self.eat_statement_end();
                self.arena.add(Node::ContinueStatement(JumpData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    label,
                }))
            }
            SyntaxKind::SynchronizedKeyword => self.parse_synchronized(),
            SyntaxKind::AssertKeyword if self.options.assert_is_keyword => self.parse_assert(),
            SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::EnumKeyword => {
                self.parse_type_declaration()
            }
            _ => self.parse_declaration_or_expression_statement(),
        }
    }

    pub(crate) fn parse_block(&mut self) -> NodeIndex {
        let start = self.token_start();
        if !self.parse_expected(SyntaxKind::OpenBraceToken) {
            return self.error_node_here();
        }
        let mut statements = NodeList::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            let before = self.token_start();
            let statement = self.parse_statement();
            statements.push(statement);
            if statement.is_none() && self.token_start() == before {
                // No progress; drop the offending token.
                self.next_token();
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add(Node::Block(BlockData {
            base: NodeBase::new(start, self.prev_end(start)),
            statements,
        }))
    }

    fn parse_if(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        self.push_marker(MarkerKind::InsideCondition, 0, NodeIndex::NONE);
        let condition = self.parse_expression();
        self.pop_marker(MarkerKind::InsideCondition);
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::IfHeader, condition);

        let then_statement = self.parse_statement();
        let else_statement = if self.eat(SyntaxKind::ElseKeyword) {
            self.parse_statement()
        } else {
            NodeIndex::NONE
        };
        let node = self.arena.add(Node::IfStatement(IfData {
            base: NodeBase::new(start, self.prev_end(start)),
            condition,
            then_statement,
            else_statement,
        }));
        self.reduce(Production::IfStatement, node);
        node
    }

    fn parse_while(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::WhileHeader, condition);
        let body = self.parse_statement();
        let node = self.arena.add(Node::WhileStatement(WhileData {
            base: NodeBase::new(start, self.prev_end(start)),
            condition,
            body,
        }));
        self.reduce(Production::WhileStatement, node);
        node
    }

    fn parse_do(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        let body = self.parse_statement();
        self.parse_expected(SyntaxKind::WhileKeyword);
        // The `while` of a do-statement opened a header marker that has
        // no header reduction of its own.
        self.parse_expected(SyntaxKind::OpenParenToken);
        let condition = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::WhileHeader, condition);
        self.eat_statement_end();
        self.arena.add(Node::DoStatement(DoData {
            base: NodeBase::new(start, self.prev_end(start)),
            body,
            condition,
        }))
    }

    fn parse_for(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);

        // Enhanced for: `Type name : expr`.
        if let Some(parameter) = self.try_parse_foreach_parameter() {
            self.next_token(); // colon
            let expression = self.parse_expression();
            self.parse_expected(SyntaxKind::CloseParenToken);
            self.reduce(Production::ForHeader, expression);
            let body = self.parse_statement();
            let node = self.arena.add(Node::ForeachStatement(ForeachData {
                base: NodeBase::new(start, self.prev_end(start)),
                parameter,
                expression,
                body,
            }));
            self.reduce(Production::ForStatement, node);
            return node;
        }

        let mut initializers = NodeList::new();
        if !self.at(SyntaxKind::SemicolonToken) {
            if self.at_local_declaration() {
                initializers.push(self.parse_local_declaration(false));
            } else {
                loop {
                    initializers.push(self.parse_expression_statement_no_semicolon());
                    if !self.eat(SyntaxKind::CommaToken) {
                        break;
                    }
                }
            }
        }
        self.parse_expected(SyntaxKind::SemicolonToken);

        self.push_marker(MarkerKind::InsideForConditional, 0, NodeIndex::NONE);
        let condition = if self.at(SyntaxKind::SemicolonToken) {
            NodeIndex::NONE
        } else {
            self.parse_expression()
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        self.pop_marker(MarkerKind::InsideForConditional);

        let mut updates = NodeList::new();
        if !self.at(SyntaxKind::CloseParenToken) {
            loop {
                updates.push(self.parse_expression_statement_no_semicolon());
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::ForHeader, condition);

        let body = self.parse_statement();
        let node = self.arena.add(Node::ForStatement(ForData {
            base: NodeBase::new(start, self.prev_end(start)),
            initializers,
            condition,
            updates,
            body,
        }));
        self.reduce(Production::ForStatement, node);
        node
    }

    fn try_parse_foreach_parameter(&mut self) -> Option<NodeIndex> {
        if !self.options.enhanced_for {
            return None;
        }
        let is_foreach = self.look_ahead(|s| {
            while token_is_modifier(s.token) || s.token == SyntaxKind::AtToken {
                s.next_token();
                if s.prev_token == SyntaxKind::AtToken {
                    s.next_token();
                }
            }
            let type_ref = s.parse_type();
            if type_ref.is_none() || s.token != SyntaxKind::Identifier {
                return false;
            }
            s.next_token();
            s.token == SyntaxKind::ColonToken
        });
        if !is_foreach {
            return None;
        }

        let start = self.token_start();
        let (modifiers, annotations) = self.parse_modifiers_and_annotations();
        let type_ref = self.parse_type();
        let name = self.parse_identifier();
        Some(self.arena.add(Node::Parameter(ParameterData {
            base: NodeBase::new(start, self.prev_end(start)),
            modifiers,
            annotations,
            type_ref,
            name,
            varargs: false,
        })))
    }

    fn parse_switch(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::SwitchHeader, expression);

        let mut statements = NodeList::new();
        self.parse_expected(SyntaxKind::OpenBraceToken);
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            let case_start = self.token_start();
            match self.token {
                SyntaxKind::CaseKeyword => {
                    self.next_token();
                    let label = self.parse_expression();
                    self.parse_expected(SyntaxKind::ColonToken);
                    statements.push(self.arena.add(Node::SwitchCase(SwitchCaseData {
                        base: NodeBase::new(case_start, self.prev_end(case_start)),
                        expression: label,
                    })));
                }
                SyntaxKind::DefaultKeyword => {
                    self.next_token();
                    self.parse_expected(SyntaxKind::ColonToken);
                    statements.push(self.arena.add(Node::SwitchCase(SwitchCaseData {
                        base: NodeBase::new(case_start, self.prev_end(case_start)),
                        expression: NodeIndex::NONE,
                    })));
                }
                _ => {
                    let before = self.token_start();
                    statements.push(self.parse_statement());
                    if self.token_start() == before {
                        self.next_token();
                    }
                }
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add(Node::SwitchStatement(SwitchData {
            base: NodeBase::new(start, self.prev_end(start)),
            expression,
            statements,
        }))
    }

    fn parse_try(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        let try_block = self.parse_block();

        let mut catch_clauses = NodeList::new();
        while self.at(SyntaxKind::CatchKeyword) {
            catch_clauses.push(self.parse_catch_clause());
        }
        let finally_block = if self.eat(SyntaxKind::FinallyKeyword) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };
        let node = self.arena.add(Node::TryStatement(TryData {
            base: NodeBase::new(start, self.prev_end(start)),
            try_block,
            catch_clauses,
            finally_block,
        }));
        self.reduce(Production::TryStatement, node);
        node
    }

    fn parse_catch_clause(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        self.push_marker(MarkerKind::InsideCatchParen, 0, NodeIndex::NONE);

        let parameter_start = self.token_start();
        let (modifiers, annotations) = self.parse_modifiers_and_annotations();
        let type_ref = self.parse_catch_type();
        let name = self.parse_optional_identifier();
        let parameter = self.arena.add(Node::Parameter(ParameterData {
            base: NodeBase::new(parameter_start, self.prev_end(parameter_start)),
            modifiers,
            annotations,
            type_ref,
            name,
            varargs: false,
        }));

        self.pop_marker(MarkerKind::InsideCatchParen);
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::CatchHeader, parameter);

        let block = if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_block()
        } else {
            NodeIndex::NONE
        };
        self.arena.add(Node::CatchClause(CatchClauseData {
            base: NodeBase::new(start, self.prev_end(start)),
            parameter,
            block,
        }))
    }

    fn parse_synchronized(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.parse_expected(SyntaxKind::OpenParenToken);
        let expression = self.parse_expression();
        self.parse_expected(SyntaxKind::CloseParenToken);
        self.reduce(Production::SynchronizedHeader, expression);
        let body = self.parse_block();
        self.arena.add(Node::SynchronizedStatement(SynchronizedData {
            base: NodeBase::new(start, self.prev_end(start)),
            expression,
            body,
        }))
    }

    fn parse_assert(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        let condition = self.parse_expression();
        let message = if self.eat(SyntaxKind::ColonToken) {
            self.parse_expression()
        } else {
            NodeIndex::NONE
        };
        self.eat_statement_end();
        self.arena.add(Node::AssertStatement(AssertData {
            base: NodeBase::new(start, self.prev_end(start)),
            condition,
            message,
        }))
    }

    /// Local declaration vs. labeled statement vs. expression statement.
    fn parse_declaration_or_expression_statement(&mut self) -> NodeIndex {
        // Label: `name :` not followed by anything case-like.
        if self.at(SyntaxKind::Identifier) {
            let is_label = self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::ColonToken
            });
            if is_label {
                return self.parse_labeled_statement();
            }
        }

        // A modifier run ending in `class`/`interface`/`enum` is a local
        // type declaration, not a variable declaration.
        if token_is_modifier(self.token)
            && self.look_ahead(|s| {
                while token_is_modifier(s.token) {
                    s.next_token();
                }
                matches!(
                    s.token,
                    SyntaxKind::ClassKeyword
                        | SyntaxKind::InterfaceKeyword
                        | SyntaxKind::EnumKeyword
                )
            })
        {
            return self.parse_type_declaration();
        }

        if self.at_local_declaration() {
            return self.parse_local_declaration(true);
        }

        let start = self.token_start();
        let node = self.parse_expression_statement_no_semicolon();
        self.eat_statement_end();
        if node.is_none() {
            // parse_expression reported; swallow one token for progress.
            let error = self.error_node_here();
            if !self.at_eof() && !self.at(SyntaxKind::CloseBraceToken) {
                self.next_token();
            }
            return error;
        }
        let _ = start;
        node
    }

    fn parse_labeled_statement(&mut self) -> NodeIndex {
        let start = self.token_start();
        let label = self.parse_identifier();
        self.next_token(); // colon
        self.reduce(Production::StatementLabel, label);
        let statement = self.parse_statement();
        self.pop_marker(MarkerKind::LabelDefinition);
        self.arena.add(Node::LabeledStatement(LabeledData {
            base: NodeBase::new(start, self.prev_end(start)),
            label,
            statement,
        }))
    }

    /// Expression wrapped as a statement, semicolon not consumed. Used
    /// for `for` headers and as the tail of ordinary statements.
    fn parse_expression_statement_no_semicolon(&mut self) -> NodeIndex {
        let start = self.token_start();
        let expression = self.parse_expression();
        if expression.is_none() {
            return NodeIndex::NONE;
        }
        self.arena.add(Node::ExpressionStatement(ExpressionStatementData {
            base: NodeBase::new(start, self.prev_end(start)),
            expression,
        }))
    }

    /// Whether the current position starts a local variable declaration.
    pub(crate) fn at_local_declaration(&mut self) -> bool {
        if token_is_primitive_type(self.token)
            || self.at(SyntaxKind::FinalKeyword)
            || self.at(SyntaxKind::AtToken)
        {
            return true;
        }
        if !self.at(SyntaxKind::Identifier) {
            return false;
        }
        self.look_ahead(|s| {
            let type_ref = s.parse_type();
            type_ref.is_some() && s.token == SyntaxKind::Identifier
        })
    }

    pub(crate) fn parse_local_declaration(&mut self, eat_semicolon: bool) -> NodeIndex {
        let start = self.token_start();
        let (modifiers, annotations) = self.parse_modifiers_and_annotations();
        let type_ref = self.parse_type();
        let declarators = self.parse_variable_declarators();
        if eat_semicolon {
            self.eat_statement_end();
        }
        self.arena.add(Node::LocalDeclaration(LocalDeclData {
            base: NodeBase::new(start, self.prev_end(start)),
            modifiers,
            annotations,
            type_ref,
            declarators,
        }))
    }

    /// Missing semicolons do not abort: a semicolon is consumed when
    /// present, and its absence is only a diagnostic when the next token
    /// cannot start a statement anyway.
    fn eat_statement_end(&mut self) {
        if self.eat(SyntaxKind::SemicolonToken) || self.at_eof() {
            return;
        }
        if self.at(SyntaxKind::CloseBraceToken) {
            return;
        }
        self.error_at_current(diagnostic_codes::UNEXPECTED_TOKEN, "expected `;`");
    }

    pub(crate) fn error_node_here(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.arena.add(Node::ErrorNode(ErrorNodeData {
            base: NodeBase::new(start, self.token_end()),
        }))
    }
}
