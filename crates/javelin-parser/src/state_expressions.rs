//! Expression parsing: precedence climbing over the binary operator
//! table, with the postfix chain (selectors, calls, indexing) handling
//! the receiver captures the completion layer depends on.

use crate::ast::{
    AllocationData, ArrayAccessData, ArrayCreationData, ArrayInitializerData, AssignmentData,
    BinaryExprData, CastData, ClassLiteralData, ConditionalData, FieldAccessData, InstanceofData,
    LiteralData, MethodInvocationData, NamedTypeData, Node, NodeBase, NodeIndex, NodeList,
    ParenthesizedData, SuperData, ThisData, UnaryExprData,
};
use crate::completion::tracker::{MarkerKind, Production};
use crate::state::ParserState;
use javelin_common::diagnostics::diagnostic_codes;
use javelin_scanner::{token_is_assignment_operator, token_is_primitive_type, SyntaxKind};

/// Binding power of a binary operator token; `None` for non-operators.
fn binary_precedence(kind: SyntaxKind) -> Option<u8> {
    Some(match kind {
        SyntaxKind::BarBarToken => 1,
        SyntaxKind::AmpersandAmpersandToken => 2,
        SyntaxKind::BarToken => 3,
        SyntaxKind::CaretToken => 4,
        SyntaxKind::AmpersandToken => 5,
        SyntaxKind::EqualsEqualsToken | SyntaxKind::BangEqualsToken => 6,
        SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken
        | SyntaxKind::InstanceofKeyword => 7,
        SyntaxKind::LessThanLessThanToken
        | SyntaxKind::GreaterThanGreaterThanToken
        | SyntaxKind::GreaterThanGreaterThanGreaterThanToken => 8,
        SyntaxKind::PlusToken | SyntaxKind::MinusToken => 9,
        SyntaxKind::AsteriskToken | SyntaxKind::SlashToken | SyntaxKind::PercentToken => 10,
        _ => return None,
    })
}

impl ParserState {
    pub(crate) fn parse_expression(&mut self) -> NodeIndex {
        if !self.enter() {
            return NodeIndex::NONE;
        }
        let result = self.parse_assignment();
        self.exit();
        result
    }

    fn parse_assignment(&mut self) -> NodeIndex {
        let start = self.token_start();
        let left = self.parse_ternary();
        if left.is_some() && token_is_assignment_operator(self.token) {
            let operator = self.token;
            self.note_expression(left);
            self.next_token();
            self.push_marker(MarkerKind::InsideAssignment, 0, left);
            let right = self.parse_assignment();
            self.pop_marker(MarkerKind::InsideAssignment);
            let node = self.arena.add(Node::Assignment(AssignmentData {
                base: NodeBase::new(start, self.prev_end(start)),
                left,
                operator,
                right,
            }));
            self.reduce(Production::AssignmentExpression, node);
            return self.note_expression(node);
        }
        left
    }

    fn parse_ternary(&mut self) -> NodeIndex {
        let start = self.token_start();
        let condition = self.parse_binary(0);
        if condition.is_some() && self.at(SyntaxKind::QuestionToken) {
            self.note_expression(condition);
            self.next_token();
            let when_true = self.parse_expression();
            self.parse_expected(SyntaxKind::ColonToken);
            let when_false = self.parse_ternary();
            let node = self.arena.add(Node::Conditional(ConditionalData {
                base: NodeBase::new(start, self.prev_end(start)),
                condition,
                when_true,
                when_false,
            }));
            self.reduce(Production::ConditionalExpression, node);
            return self.note_expression(node);
        }
        condition
    }

    fn parse_binary(&mut self, min_precedence: u8) -> NodeIndex {
        let start = self.token_start();
        let mut left = self.parse_unary();
        loop {
            if left.is_none() {
                return left;
            }
            let Some(precedence) = binary_precedence(self.token) else {
                return left;
            };
            if precedence < min_precedence {
                return left;
            }

            if self.at(SyntaxKind::InstanceofKeyword) {
                self.note_expression(left);
                self.next_token();
                let type_ref = self.parse_type();
                let node = self.arena.add(Node::Instanceof(InstanceofData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    expression: left,
                    type_ref,
                }));
                self.reduce(Production::InstanceofExpression, node);
                left = self.note_expression(node);
                continue;
            }

            let operator = self.token;
            self.note_expression(left);
            self.next_token();
            let right = self.parse_binary(precedence + 1);
            let node = self.arena.add(Node::Binary(BinaryExprData {
                base: NodeBase::new(start, self.prev_end(start)),
                left,
                operator,
                right,
            }));
            self.reduce(Production::BinaryExpression, node);
            left = self.note_expression(node);
        }
    }

    fn parse_unary(&mut self) -> NodeIndex {
        let start = self.token_start();
        let is_cast = self.token == SyntaxKind::OpenParenToken && self.at_cast();
        match self.token {
            SyntaxKind::PlusToken
            | SyntaxKind::MinusToken
            | SyntaxKind::BangToken
            | SyntaxKind::TildeToken
            | SyntaxKind::PlusPlusToken
            | SyntaxKind::MinusMinusToken => {
                let operator = self.token;
                self.next_token();
                let operand = self.parse_unary();
                let node = self.arena.add(Node::Unary(UnaryExprData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    operator,
                    operand,
                    prefix: true,
                }));
                self.reduce(Production::UnaryExpression, node);
                self.note_expression(node)
            }
            SyntaxKind::OpenParenToken if is_cast => {
                self.push_marker(MarkerKind::CastStatement, 0, NodeIndex::NONE);
                self.next_token();
                let type_ref = self.parse_type();
                self.parse_expected(SyntaxKind::CloseParenToken);
                let expression = self.parse_unary();
                let node = self.arena.add(Node::Cast(CastData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    type_ref,
                    expression,
                }));
                self.reduce(Production::CastExpression, node);
                self.note_expression(node)
            }
            _ => self.parse_postfix(),
        }
    }

    /// `(Type) operand` look-ahead: a parenthesized type followed by a
    /// token that can start a unary expression.
    fn at_cast(&mut self) -> bool {
        self.look_ahead(|s| {
            s.next_token();
            if token_is_primitive_type(s.token) {
                return true;
            }
            if s.token != SyntaxKind::Identifier {
                return false;
            }
            let type_ref = s.parse_type();
            if type_ref.is_none() || s.token != SyntaxKind::CloseParenToken {
                return false;
            }
            s.next_token();
            matches!(
                s.token,
                SyntaxKind::Identifier
                    | SyntaxKind::NumericLiteral
                    | SyntaxKind::StringLiteral
                    | SyntaxKind::CharLiteral
                    | SyntaxKind::OpenParenToken
                    | SyntaxKind::BangToken
                    | SyntaxKind::TildeToken
                    | SyntaxKind::ThisKeyword
                    | SyntaxKind::SuperKeyword
                    | SyntaxKind::NewKeyword
                    | SyntaxKind::TrueKeyword
                    | SyntaxKind::FalseKeyword
                    | SyntaxKind::NullKeyword
            )
        })
    }

    fn parse_postfix(&mut self) -> NodeIndex {
        let start = self.token_start();
        let mut expression = self.parse_primary();
        loop {
            if expression.is_none() {
                return expression;
            }
            match self.token {
                SyntaxKind::DotToken => {
                    self.note_expression(expression);
                    expression = self.parse_selector(start, expression);
                }
                SyntaxKind::OpenBracketToken => {
                    // `Name[].class` turns the name into an array type.
                    let empty = self.look_ahead(|s| {
                        s.next_token();
                        s.token == SyntaxKind::CloseBracketToken
                    });
                    if empty {
                        let dims = self.parse_dims();
                        expression = self.arena.add(Node::NamedType(NamedTypeData {
                            base: NodeBase::new(start, self.prev_end(start)),
                            name: expression,
                            type_arguments: None,
                            dims,
                        }));
                        continue;
                    }
                    self.note_expression(expression);
                    self.next_token();
                    let index = self.parse_expression();
                    self.parse_expected(SyntaxKind::CloseBracketToken);
                    expression = self.arena.add(Node::ArrayAccess(ArrayAccessData {
                        base: NodeBase::new(start, self.prev_end(start)),
                        array: expression,
                        index,
                    }));
                    self.note_expression(expression);
                }
                SyntaxKind::PlusPlusToken | SyntaxKind::MinusMinusToken => {
                    let operator = self.token;
                    self.next_token();
                    expression = self.arena.add(Node::Unary(UnaryExprData {
                        base: NodeBase::new(start, self.prev_end(start)),
                        operator,
                        operand: expression,
                        prefix: false,
                    }));
                    self.note_expression(expression);
                }
                SyntaxKind::OpenParenToken => {
                    // Unqualified call: the primary was the selector.
                    let arguments = self.parse_arguments();
                    expression = self.arena.add(Node::MethodInvocation(MethodInvocationData {
                        base: NodeBase::new(start, self.prev_end(start)),
                        receiver: NodeIndex::NONE,
                        name: expression,
                        type_arguments: None,
                        arguments,
                    }));
                    self.note_expression(expression);
                }
                _ => return expression,
            }
        }
    }

    /// Everything after `receiver.`: member name, call, `new`, `this`,
    /// `class`, explicit type arguments.
    fn parse_selector(&mut self, start: u32, receiver: NodeIndex) -> NodeIndex {
        let receiver_is_type = matches!(
            self.arena.get(receiver),
            Some(Node::PrimitiveType(_) | Node::NamedType(_))
        );
        self.set_selector_receiver(receiver, receiver_is_type);
        self.next_token();

        match self.token {
            SyntaxKind::NewKeyword => {
                self.next_token();
                self.parse_allocation(start, receiver)
            }
            SyntaxKind::ClassKeyword => {
                self.next_token();
                let node = self.arena.add(Node::ClassLiteral(ClassLiteralData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    type_ref: receiver,
                }));
                self.note_expression(node)
            }
            SyntaxKind::ThisKeyword => {
                self.next_token();
                let node = self.arena.add(Node::This(ThisData {
                    base: NodeBase::new(start, self.prev_end(start)),
                }));
                self.note_expression(node)
            }
            SyntaxKind::LessThanToken => {
                // Explicit type arguments: `receiver.<T>name(...)`.
                self.push_marker(MarkerKind::ParameterizedMethodInvocation, 0, receiver);
                let type_arguments = self.parse_type_arguments();
                self.pop_marker(MarkerKind::ParameterizedMethodInvocation);
                let name = self.parse_identifier();
                let arguments = if self.at(SyntaxKind::OpenParenToken) {
                    self.parse_arguments()
                } else {
                    NodeList::new()
                };
                let node = self.arena.add(Node::MethodInvocation(MethodInvocationData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    receiver,
                    name,
                    type_arguments: Some(type_arguments),
                    arguments,
                }));
                self.note_expression(node)
            }
            _ => {
                let name = self.parse_identifier();
                if self.at(SyntaxKind::OpenParenToken) {
                    let arguments = self.parse_arguments();
                    let node = self.arena.add(Node::MethodInvocation(MethodInvocationData {
                        base: NodeBase::new(start, self.prev_end(start)),
                        receiver,
                        name,
                        type_arguments: None,
                        arguments,
                    }));
                    return self.note_expression(node);
                }
                let node = self.arena.add(Node::FieldAccess(FieldAccessData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    receiver,
                    name,
                }));
                self.note_expression(node)
            }
        }
    }

    /// `( expr, ... )`. Keeps the session's open-call argument list
    /// current so an invocation completion can report its siblings.
    pub(crate) fn parse_arguments(&mut self) -> NodeList {
        let saved = self
            .completion_session()
            .and_then(|s| s.enclosing_call_arguments.clone());
        self.with_session(|s| s.enclosing_call_arguments = Some(NodeList::new()));

        self.next_token();
        let mut arguments = NodeList::new();
        if !self.at(SyntaxKind::CloseParenToken) && !self.at_eof() {
            loop {
                let argument = self.parse_expression();
                if argument.is_some() {
                    arguments.push(argument);
                    let snapshot = arguments.clone();
                    self.with_session(|s| s.enclosing_call_arguments = Some(snapshot));
                }
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.parse_expected(SyntaxKind::CloseParenToken);

        self.with_session(|s| s.enclosing_call_arguments = saved);
        arguments
    }

    fn parse_primary(&mut self) -> NodeIndex {
        let start = self.token_start();
        match self.token {
            SyntaxKind::NumericLiteral
            | SyntaxKind::StringLiteral
            | SyntaxKind::CharLiteral
            | SyntaxKind::TrueKeyword
            | SyntaxKind::FalseKeyword
            | SyntaxKind::NullKeyword => {
                let token = self.token;
                let node = self.arena.add(Node::Literal(LiteralData {
                    base: NodeBase::new(start, self.token_end()),
                    token,
                    text: self.scanner.token_value().to_string(),
                }));
                self.note_expression(node);
                self.next_token();
                node
            }
            SyntaxKind::ThisKeyword => {
                let node = self.arena.add(Node::This(ThisData {
                    base: NodeBase::new(start, self.token_end()),
                }));
                self.note_expression(node);
                self.next_token();
                node
            }
            SyntaxKind::SuperKeyword => {
                let node = self.arena.add(Node::Super(SuperData {
                    base: NodeBase::new(start, self.token_end()),
                }));
                self.note_expression(node);
                self.next_token();
                node
            }
            SyntaxKind::OpenParenToken => {
                self.next_token();
                let inner = self.parse_expression();
                self.parse_expected(SyntaxKind::CloseParenToken);
                let node = self.arena.add(Node::Parenthesized(ParenthesizedData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    expression: inner,
                }));
                self.note_expression(node)
            }
            SyntaxKind::NewKeyword => {
                self.next_token();
                self.parse_allocation(start, NodeIndex::NONE)
            }
            SyntaxKind::Identifier => {
                let node = self.parse_identifier();
                self.note_expression(node);
                node
            }
            kind if token_is_primitive_type(kind) || kind == SyntaxKind::VoidKeyword => {
                // `int.class`, `void.class`, `int[].class`.
                let type_ref = self.parse_type();
                self.note_expression(type_ref);
                type_ref
            }
            _ => {
                self.error_at_current(
                    diagnostic_codes::EXPRESSION_EXPECTED,
                    "expression expected",
                );
                NodeIndex::NONE
            }
        }
    }

    /// After `new` (already consumed): class instance creation or array
    /// creation. `qualifier` is the enclosing-instance expression of
    /// `outer.new Inner()`, usually `NONE`.
    pub(crate) fn parse_allocation(&mut self, start: u32, qualifier: NodeIndex) -> NodeIndex {
        if token_is_primitive_type(self.token) {
            let element_keyword = self.token;
            let element_start = self.token_start();
            self.next_token();
            let element_type = self.arena.add(Node::PrimitiveType(
                crate::ast::PrimitiveTypeData {
                    base: NodeBase::new(element_start, self.prev_end(element_start)),
                    keyword: element_keyword,
                    dims: 0,
                },
            ));
            return self.parse_array_creation(start, element_type);
        }

        let type_start = self.token_start();
        let name = self.parse_type_name();
        let type_arguments = if self.at(SyntaxKind::LessThanToken) {
            self.push_marker(MarkerKind::ParameterizedAllocation, 0, NodeIndex::NONE);
            Some(self.parse_type_arguments())
        } else {
            None
        };
        let type_ref = self.arena.add(Node::NamedType(NamedTypeData {
            base: NodeBase::new(type_start, self.prev_end(type_start)),
            name,
            type_arguments,
            dims: 0,
        }));

        if self.at(SyntaxKind::OpenBracketToken) {
            let node = self.parse_array_creation(start, type_ref);
            return node;
        }

        let arguments = if self.at(SyntaxKind::OpenParenToken) {
            self.parse_arguments()
        } else {
            NodeList::new()
        };
        let body = if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_anonymous_body()
        } else {
            NodeIndex::NONE
        };
        let node = self.arena.add(Node::ClassInstanceCreation(AllocationData {
            base: NodeBase::new(start, self.prev_end(start)),
            qualifier,
            type_ref,
            type_arguments: None,
            arguments,
            body,
        }));
        self.reduce(Production::AllocationExpression, node);
        self.note_expression(node)
    }

    fn parse_array_creation(&mut self, start: u32, element_type: NodeIndex) -> NodeIndex {
        let mut dim_expressions = NodeList::new();
        let mut dims = 0u32;
        while self.at(SyntaxKind::OpenBracketToken) {
            self.next_token();
            if self.at(SyntaxKind::CloseBracketToken) {
                self.next_token();
            } else {
                let dimension = self.parse_expression();
                dim_expressions.push(dimension);
                self.parse_expected(SyntaxKind::CloseBracketToken);
            }
            dims += 1;
        }
        let initializer = if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_array_initializer()
        } else {
            NodeIndex::NONE
        };
        let node = self.arena.add(Node::ArrayCreation(ArrayCreationData {
            base: NodeBase::new(start, self.prev_end(start)),
            element_type,
            dim_expressions,
            dims,
            initializer,
        }));
        self.reduce(Production::ArrayCreationExpression, node);
        self.note_expression(node)
    }

    pub(crate) fn parse_array_initializer(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        let mut expressions = NodeList::new();
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            let element = if self.at(SyntaxKind::OpenBraceToken) {
                self.parse_array_initializer()
            } else {
                self.parse_expression()
            };
            if element.is_none() {
                self.skip_until(&[SyntaxKind::CommaToken, SyntaxKind::CloseBraceToken]);
            }
            expressions.push(element);
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add(Node::ArrayInitializer(ArrayInitializerData {
            base: NodeBase::new(start, self.prev_end(start)),
            expressions,
        }))
    }
}
