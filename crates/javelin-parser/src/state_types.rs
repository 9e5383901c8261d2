//! Type and name parsing.

use crate::ast::{
    NamedTypeData, Node, NodeBase, NodeIndex, NodeList, PrimitiveTypeData, QualifiedNameData,
    UnionTypeData, WildcardBound, WildcardData,
};
use crate::completion::tracker::{MarkerKind, Production};
use crate::state::ParserState;
use javelin_common::diagnostics::diagnostic_codes;
use javelin_scanner::{token_is_primitive_type, SyntaxKind};

impl ParserState {
    /// Type reference: primitive or named, with optional type arguments
    /// and array dims. Returns `NONE` (with a diagnostic) when the
    /// current token cannot start a type.
    pub(crate) fn parse_type(&mut self) -> NodeIndex {
        let start = self.token_start();
        if token_is_primitive_type(self.token) || self.at(SyntaxKind::VoidKeyword) {
            let keyword = self.token;
            self.next_token();
            let dims = self.parse_dims();
            return self.arena.add(Node::PrimitiveType(PrimitiveTypeData {
                base: NodeBase::new(start, self.prev_end(start)),
                keyword,
                dims,
            }));
        }
        if self.at(SyntaxKind::Identifier) {
            let name = self.parse_type_name();
            let type_arguments = if self.at(SyntaxKind::LessThanToken) {
                Some(self.parse_type_arguments())
            } else {
                None
            };
            let dims = self.parse_dims();
            return self.arena.add(Node::NamedType(NamedTypeData {
                base: NodeBase::new(start, self.prev_end(start)),
                name,
                type_arguments,
                dims,
            }));
        }
        self.error_at_current(diagnostic_codes::TYPE_EXPECTED, "type expected");
        NodeIndex::NONE
    }

    /// Possibly-qualified name in a type position (`a.b.C`).
    pub(crate) fn parse_type_name(&mut self) -> NodeIndex {
        self.parse_name_chain(true)
    }

    /// Possibly-qualified name in a package/import position.
    pub(crate) fn parse_name(&mut self) -> NodeIndex {
        self.parse_name_chain(false)
    }

    fn parse_name_chain(&mut self, is_type: bool) -> NodeIndex {
        let start = self.token_start();
        let mut name = self.parse_identifier();
        while self.at(SyntaxKind::DotToken) && name.is_some() {
            // `.*` belongs to the import, `.class`/`.this` to the
            // expression grammar; stop before either.
            let continues = self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::Identifier
            });
            if !continues {
                break;
            }
            self.note_expression(name);
            self.set_selector_receiver(name, is_type);
            self.next_token();
            let part = self.parse_identifier();
            if part.is_none() {
                break;
            }
            name = self.arena.add(Node::QualifiedName(QualifiedNameData {
                base: NodeBase::new(start, self.prev_end(start)),
                qualifier: name,
                name: part,
            }));
        }
        name
    }

    /// `<` type (`,` type)* `>`. Handles `>>`/`>>>` closing several
    /// nested lists at once.
    pub(crate) fn parse_type_arguments(&mut self) -> NodeList {
        self.push_marker(MarkerKind::ParameterizedTypeRef, 0, NodeIndex::NONE);
        self.next_token();
        let mut arguments = NodeList::new();
        if !self.at_type_argument_close() {
            loop {
                let argument = if self.at(SyntaxKind::QuestionToken) {
                    self.parse_wildcard()
                } else {
                    self.parse_type()
                };
                if argument.is_none() {
                    break;
                }
                arguments.push(argument);
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.close_type_argument_list();
        self.reduce(Production::TypeArguments, NodeIndex::NONE);
        arguments
    }

    fn at_type_argument_close(&self) -> bool {
        self.pending_close_angles > 0
            || matches!(
                self.token,
                SyntaxKind::GreaterThanToken
                    | SyntaxKind::GreaterThanGreaterThanToken
                    | SyntaxKind::GreaterThanGreaterThanGreaterThanToken
            )
    }

    pub(crate) fn close_type_argument_list(&mut self) {
        if self.pending_close_angles > 0 {
            self.pending_close_angles -= 1;
            return;
        }
        match self.token {
            SyntaxKind::GreaterThanToken => {
                self.next_token();
            }
            SyntaxKind::GreaterThanGreaterThanToken => {
                self.pending_close_angles = 1;
                self.next_token();
            }
            SyntaxKind::GreaterThanGreaterThanGreaterThanToken => {
                self.pending_close_angles = 2;
                self.next_token();
            }
            _ => {
                self.error_at_current(diagnostic_codes::UNEXPECTED_TOKEN, "expected `>`");
            }
        }
    }

    fn parse_wildcard(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        let (bound_kind, bound) = match self.token {
            SyntaxKind::ExtendsKeyword => {
                self.next_token();
                (WildcardBound::Extends, self.parse_type())
            }
            SyntaxKind::SuperKeyword => {
                self.next_token();
                (WildcardBound::Super, self.parse_type())
            }
            _ => (WildcardBound::None, NodeIndex::NONE),
        };
        // The `extends` above pushed a heritage marker it will never
        // see a clause reduction for.
        if bound_kind == WildcardBound::Extends {
            self.pop_marker(MarkerKind::NextTypeRefIsClass);
        }
        self.arena.add(Node::Wildcard(WildcardData {
            base: NodeBase::new(start, self.prev_end(start)),
            bound_kind,
            bound,
        }))
    }

    /// `[]` pairs after a type.
    pub(crate) fn parse_dims(&mut self) -> u32 {
        let mut dims = 0;
        while self.at(SyntaxKind::OpenBracketToken) {
            let closes = self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::CloseBracketToken
            });
            if !closes {
                break;
            }
            self.next_token();
            self.next_token();
            dims += 1;
        }
        dims
    }

    /// Catch-parameter type: `A | B | C` union alternatives.
    pub(crate) fn parse_catch_type(&mut self) -> NodeIndex {
        let start = self.token_start();
        let first = self.parse_type();
        if !self.at(SyntaxKind::BarToken) {
            return first;
        }
        let mut types = NodeList::new();
        types.push(first);
        while self.eat(SyntaxKind::BarToken) {
            types.push(self.parse_type());
        }
        self.arena.add(Node::UnionType(UnionTypeData {
            base: NodeBase::new(start, self.prev_end(start)),
            types,
        }))
    }

    /// End offset for a node that began at `start`: the end of the last
    /// consumed token, never before `start` (empty constructs at EOF).
    pub(crate) fn prev_end(&self, start: u32) -> u32 {
        self.prev_token_end.max(start)
    }
}
