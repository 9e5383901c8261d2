//! Compilation-unit and declaration parsing.

use crate::ast::{
    AnnotationData, AnnotationStyle, CompilationUnitData, EnumConstantData, FieldDeclData,
    ImportData, InitializerData, MemberValuePairData, MethodDeclData, ModifierFlags, Node,
    NodeBase, NodeIndex, NodeList, PackageData, ParameterData, TypeDeclData, TypeDeclKeyword,
    TypeParameterData, VariableDeclaratorData,
};
use crate::completion::tracker::{MarkerKind, Production};
use crate::state::ParserState;
use javelin_common::diagnostics::diagnostic_codes;
use javelin_scanner::{token_is_modifier, SyntaxKind};

fn modifier_flag(kind: SyntaxKind) -> ModifierFlags {
    match kind {
        SyntaxKind::PublicKeyword => ModifierFlags::PUBLIC,
        SyntaxKind::ProtectedKeyword => ModifierFlags::PROTECTED,
        SyntaxKind::PrivateKeyword => ModifierFlags::PRIVATE,
        SyntaxKind::StaticKeyword => ModifierFlags::STATIC,
        SyntaxKind::FinalKeyword => ModifierFlags::FINAL,
        SyntaxKind::AbstractKeyword => ModifierFlags::ABSTRACT,
        SyntaxKind::NativeKeyword => ModifierFlags::NATIVE,
        SyntaxKind::SynchronizedKeyword => ModifierFlags::SYNCHRONIZED,
        SyntaxKind::TransientKeyword => ModifierFlags::TRANSIENT,
        SyntaxKind::VolatileKeyword => ModifierFlags::VOLATILE,
        SyntaxKind::StrictfpKeyword => ModifierFlags::STRICTFP,
        _ => ModifierFlags::empty(),
    }
}

impl ParserState {
    pub(crate) fn parse_compilation_unit(&mut self) -> NodeIndex {
        let start = self.token_start();
        let mut package = NodeIndex::NONE;
        let mut imports = NodeList::new();
        let mut types = NodeList::new();

        while !self.at_eof() {
            let before = self.token_start();
            match self.token {
                SyntaxKind::PackageKeyword => {
                    let declaration = self.parse_package();
                    if package.is_none() {
                        package = declaration;
                    } else {
                        self.error_at_current(
                            diagnostic_codes::DECLARATION_EXPECTED,
                            "duplicate package declaration",
                        );
                    }
                }
                SyntaxKind::ImportKeyword => imports.push(self.parse_import()),
                SyntaxKind::SemicolonToken => {
                    self.next_token();
                }
                _ => types.push(self.parse_type_declaration()),
            }
            if self.token_start() == before && !self.at_eof() {
                self.next_token();
            }
        }

        self.arena.add(Node::CompilationUnit(CompilationUnitData {
            base: NodeBase::new(start, self.prev_end(start)),
            package,
            imports,
            types,
        }))
    }

    fn parse_package(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        self.with_session(|s| s.in_import_or_package = true);
        let name = self.parse_name();
        self.with_session(|s| s.in_import_or_package = false);
        self.parse_expected(SyntaxKind::SemicolonToken);
        self.arena.add(Node::PackageDeclaration(PackageData {
            base: NodeBase::new(start, self.prev_end(start)),
            name,
            annotations: NodeList::new(),
        }))
    }

    fn parse_import(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token();
        let is_static = self.eat(SyntaxKind::StaticKeyword);
        self.with_session(|s| s.in_import_or_package = true);
        let name = self.parse_name();
        self.with_session(|s| s.in_import_or_package = false);
        let on_demand = if self.at(SyntaxKind::DotToken) {
            self.next_token();
            self.parse_expected(SyntaxKind::AsteriskToken)
        } else {
            false
        };
        self.parse_expected(SyntaxKind::SemicolonToken);
        self.arena.add(Node::ImportDeclaration(ImportData {
            base: NodeBase::new(start, self.prev_end(start)),
            name,
            is_static,
            on_demand,
        }))
    }

    // =========================================================================
    // Type declarations
    // =========================================================================

    pub(crate) fn parse_type_declaration(&mut self) -> NodeIndex {
        let start = self.token_start();
        let (modifiers, annotations) = self.parse_modifiers_and_annotations();

        let keyword = match self.token {
            SyntaxKind::ClassKeyword => TypeDeclKeyword::Class,
            SyntaxKind::InterfaceKeyword => TypeDeclKeyword::Interface,
            SyntaxKind::EnumKeyword if self.options.source_level >= 5 => TypeDeclKeyword::Enum,
            SyntaxKind::AtToken => {
                // `@interface` annotation type.
                self.next_token();
                if !self.parse_expected(SyntaxKind::InterfaceKeyword) {
                    return self.error_node_here();
                }
                return self.parse_type_declaration_rest(
                    start,
                    modifiers,
                    annotations,
                    TypeDeclKeyword::Annotation,
                );
            }
            _ => {
                self.error_at_current(
                    diagnostic_codes::DECLARATION_EXPECTED,
                    "type declaration expected",
                );
                return self.error_node_here();
            }
        };
        self.next_token();
        self.parse_type_declaration_rest(start, modifiers, annotations, keyword)
    }

    fn parse_type_declaration_rest(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        annotations: NodeList,
        keyword: TypeDeclKeyword,
    ) -> NodeIndex {
        let name = self.parse_identifier();

        let type_parameters = if self.at(SyntaxKind::LessThanToken) {
            Some(self.parse_type_parameters())
        } else {
            None
        };

        self.with_session(|s| s.in_declaration_header = true);
        let mut superclass = NodeIndex::NONE;
        let mut interfaces = NodeList::new();
        if self.at(SyntaxKind::ExtendsKeyword) {
            self.next_token();
            if keyword == TypeDeclKeyword::Interface {
                loop {
                    interfaces.push(self.parse_type());
                    if !self.eat(SyntaxKind::CommaToken) {
                        break;
                    }
                }
            } else {
                superclass = self.parse_type();
            }
            self.reduce(Production::HeritageClause, superclass);
        }
        if self.at(SyntaxKind::ImplementsKeyword) {
            self.next_token();
            loop {
                interfaces.push(self.parse_type());
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.reduce(Production::HeritageClause, NodeIndex::NONE);
        }
        self.with_session(|s| s.in_declaration_header = false);

        let mut members = NodeList::new();
        let mut has_open_brace = false;
        if self.at(SyntaxKind::OpenBraceToken) {
            has_open_brace = true;
            self.with_session(|s| s.pending_brace_marker = Some(MarkerKind::TypeDelimiter));
            self.next_token();
            if keyword == TypeDeclKeyword::Enum {
                self.parse_enum_constants(&mut members);
            }
            self.parse_member_list(&mut members);
            self.parse_expected(SyntaxKind::CloseBraceToken);
        } else {
            self.error_at_current(diagnostic_codes::UNEXPECTED_TOKEN, "expected `{`");
        }

        self.arena.add(Node::TypeDeclaration(TypeDeclData {
            base: NodeBase::new(start, self.prev_end(start)),
            keyword,
            modifiers,
            annotations,
            name,
            type_parameters,
            superclass,
            interfaces,
            members,
            has_open_brace,
        }))
    }

    fn parse_enum_constants(&mut self, members: &mut NodeList) {
        while self.at(SyntaxKind::Identifier)
            || (self.at(SyntaxKind::AtToken) && !self.at_annotation_interface())
        {
            let start = self.token_start();
            let mut annotations = NodeList::new();
            while self.at(SyntaxKind::AtToken) && !self.at_annotation_interface() {
                annotations.push(self.parse_annotation());
            }
            let name = self.parse_identifier();
            if name.is_none() {
                break;
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
            members.push(self.arena.add(Node::EnumConstant(EnumConstantData {
                base: NodeBase::new(start, self.prev_end(start)),
                annotations,
                name,
                arguments,
                body,
            })));
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        // A `;` separates constants from ordinary members.
        self.eat(SyntaxKind::SemicolonToken);
    }

    fn parse_member_list(&mut self, members: &mut NodeList) {
        while !self.at(SyntaxKind::CloseBraceToken) && !self.at_eof() {
            let before = self.token_start();
            members.push(self.parse_member());
            if self.token_start() == before && !self.at_eof() {
                self.next_token();
            }
        }
    }

    fn parse_member(&mut self) -> NodeIndex {
        let start = self.token_start();
        let is_static_initializer = self.token == SyntaxKind::StaticKeyword
            && self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::OpenBraceToken
            });
        match self.token {
            SyntaxKind::SemicolonToken => {
                self.next_token();
                NodeIndex::NONE
            }
            SyntaxKind::OpenBraceToken => {
                // Instance initializer.
                let body = self.parse_initializer_body();
                self.arena.add(Node::Initializer(InitializerData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    modifiers: ModifierFlags::empty(),
                    body,
                }))
            }
            SyntaxKind::StaticKeyword if is_static_initializer => {
                self.next_token();
                let body = self.parse_initializer_body();
                self.arena.add(Node::Initializer(InitializerData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    modifiers: ModifierFlags::STATIC,
                    body,
                }))
            }
            _ => self.parse_field_or_method(start),
        }
    }

    fn parse_initializer_body(&mut self) -> NodeIndex {
        self.with_session(|s| s.pending_brace_marker = Some(MarkerKind::MethodDelimiter));
        self.parse_block()
    }

    fn parse_field_or_method(&mut self, start: u32) -> NodeIndex {
        let (modifiers, annotations) = self.parse_modifiers_and_annotations();

        // Nested type?
        if matches!(
            self.token,
            SyntaxKind::ClassKeyword | SyntaxKind::InterfaceKeyword | SyntaxKind::EnumKeyword
        ) || self.at_annotation_interface()
        {
            return self.parse_nested_type(start, modifiers, annotations);
        }

        let type_parameters = if self.at(SyntaxKind::LessThanToken) {
            let parameters = Some(self.parse_type_parameters());
            self.with_session(|s| s.after_type_parameters = true);
            parameters
        } else {
            None
        };

        // Constructor: identifier directly followed by `(`.
        let is_constructor = self.at(SyntaxKind::Identifier)
            && self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::OpenParenToken
            });
        if is_constructor {
            self.with_session(|s| s.in_method_name = true);
            let name = self.parse_identifier();
            self.with_session(|s| {
                s.in_method_name = false;
                s.after_type_parameters = false;
            });
            return self.parse_method_rest(
                start,
                modifiers,
                annotations,
                type_parameters,
                NodeIndex::NONE,
                name,
                true,
            );
        }

        self.with_session(|s| s.in_declaration_header = true);
        let type_ref = self.parse_type();
        self.with_session(|s| {
            s.in_declaration_header = false;
            s.after_type_parameters = false;
        });
        if type_ref.is_none() {
            self.skip_until(&[
                SyntaxKind::SemicolonToken,
                SyntaxKind::CloseBraceToken,
                SyntaxKind::OpenBraceToken,
            ]);
            self.eat(SyntaxKind::SemicolonToken);
            return self.error_node_here();
        }

        // A type completion with nothing after it is a complete member.
        let names_completion = match self.arena.get(type_ref) {
            Some(Node::Completion(_)) => true,
            Some(Node::NamedType(data)) => {
                self.arena.get(data.name).is_some_and(Node::is_completion)
            }
            _ => false,
        };
        if names_completion
            && (self.at(SyntaxKind::SemicolonToken)
                || self.at(SyntaxKind::CloseBraceToken)
                || self.at_eof())
        {
            self.eat(SyntaxKind::SemicolonToken);
            return self.arena.add(Node::FieldDeclaration(FieldDeclData {
                base: NodeBase::new(start, self.prev_end(start)),
                modifiers,
                annotations,
                type_ref,
                declarators: NodeList::new(),
            }));
        }

        let is_method = self.at(SyntaxKind::Identifier)
            && self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::OpenParenToken
            });
        if is_method {
            self.with_session(|s| s.in_method_name = true);
            let name = self.parse_identifier();
            self.with_session(|s| s.in_method_name = false);
            return self.parse_method_rest(
                start,
                modifiers,
                annotations,
                type_parameters,
                type_ref,
                name,
                false,
            );
        }

        let declarators = self.parse_variable_declarators();
        if !self.eat(SyntaxKind::SemicolonToken)
            && !self.at(SyntaxKind::CloseBraceToken)
            && !self.at_eof()
        {
            self.error_at_current(diagnostic_codes::UNEXPECTED_TOKEN, "expected `;`");
        }
        self.arena.add(Node::FieldDeclaration(FieldDeclData {
            base: NodeBase::new(start, self.prev_end(start)),
            modifiers,
            annotations,
            type_ref,
            declarators,
        }))
    }

    fn parse_nested_type(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        annotations: NodeList,
    ) -> NodeIndex {
        let keyword = match self.token {
            SyntaxKind::ClassKeyword => TypeDeclKeyword::Class,
            SyntaxKind::InterfaceKeyword => TypeDeclKeyword::Interface,
            SyntaxKind::EnumKeyword => TypeDeclKeyword::Enum,
            _ => {
                self.next_token(); // `@`
                self.next_token(); // `interface`
                return self.parse_type_declaration_rest(
                    start,
                    modifiers,
                    annotations,
                    TypeDeclKeyword::Annotation,
                );
            }
        };
        self.next_token();
        self.parse_type_declaration_rest(start, modifiers, annotations, keyword)
    }

    #[allow(clippy::too_many_arguments)]
    fn parse_method_rest(
        &mut self,
        start: u32,
        modifiers: ModifierFlags,
        annotations: NodeList,
        type_parameters: Option<NodeList>,
        return_type: NodeIndex,
        name: NodeIndex,
        is_constructor: bool,
    ) -> NodeIndex {
        let parameters = self.parse_parameters();

        let mut throws = NodeList::new();
        if self.at(SyntaxKind::ThrowsKeyword) {
            self.with_session(|s| s.in_declaration_header = true);
            self.next_token();
            loop {
                throws.push(self.parse_type());
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.reduce(Production::ThrowsClause, NodeIndex::NONE);
            self.with_session(|s| s.in_declaration_header = false);
        }

        let mut body = NodeIndex::NONE;
        let mut has_open_brace = false;
        if self.at(SyntaxKind::OpenBraceToken) {
            has_open_brace = true;
            self.with_session(|s| s.pending_brace_marker = Some(MarkerKind::MethodDelimiter));
            if self.wants_diet_body() {
                self.skip_block();
            } else {
                body = self.parse_block();
            }
        } else if !self.eat(SyntaxKind::SemicolonToken)
            && !self.at(SyntaxKind::CloseBraceToken)
            && !self.at_eof()
        {
            self.error_at_current(diagnostic_codes::UNEXPECTED_TOKEN, "expected `{` or `;`");
        }

        self.arena.add(Node::MethodDeclaration(MethodDeclData {
            base: NodeBase::new(start, self.prev_end(start)),
            modifiers,
            annotations,
            type_parameters,
            return_type,
            name,
            parameters,
            throws,
            body,
            is_constructor,
            has_open_brace,
        }))
    }

    fn parse_parameters(&mut self) -> NodeList {
        let mut parameters = NodeList::new();
        if !self.parse_expected(SyntaxKind::OpenParenToken) {
            return parameters;
        }
        self.with_session(|s| s.in_declaration_header = true);
        if !self.at(SyntaxKind::CloseParenToken) && !self.at_eof() {
            loop {
                let start = self.token_start();
                let (modifiers, annotations) = self.parse_modifiers_and_annotations();
                let type_ref = self.parse_type();
                if type_ref.is_none() {
                    self.skip_until(&[SyntaxKind::CommaToken, SyntaxKind::CloseParenToken]);
                    if !self.eat(SyntaxKind::CommaToken) {
                        break;
                    }
                    continue;
                }
                let varargs = self.eat(SyntaxKind::EllipsisToken);
                self.with_session(|s| s.in_parameter_name = true);
                let name = self.parse_optional_identifier();
                self.with_session(|s| s.in_parameter_name = false);
                parameters.push(self.arena.add(Node::Parameter(ParameterData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    modifiers,
                    annotations,
                    type_ref,
                    name,
                    varargs,
                })));
                if !self.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.with_session(|s| s.in_declaration_header = false);
        self.parse_expected(SyntaxKind::CloseParenToken);
        parameters
    }

    fn parse_type_parameters(&mut self) -> NodeList {
        self.push_marker(MarkerKind::ParameterizedTypeRef, 0, NodeIndex::NONE);
        self.next_token();
        let mut parameters = NodeList::new();
        while self.at(SyntaxKind::Identifier) {
            let start = self.token_start();
            let name = self.parse_identifier();
            let mut bounds = NodeList::new();
            if self.eat(SyntaxKind::ExtendsKeyword) {
                loop {
                    bounds.push(self.parse_type());
                    if !self.eat(SyntaxKind::AmpersandToken) {
                        break;
                    }
                }
                self.pop_marker(MarkerKind::NextTypeRefIsClass);
            }
            parameters.push(self.arena.add(Node::TypeParameter(TypeParameterData {
                base: NodeBase::new(start, self.prev_end(start)),
                name,
                bounds,
            })));
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        // A bound like `Comparable<T>>` may already have banked the
        // closing `>` out of a `>>` token.
        self.close_type_argument_list();
        self.reduce(Production::TypeArguments, NodeIndex::NONE);
        parameters
    }

    pub(crate) fn parse_variable_declarators(&mut self) -> NodeList {
        let mut declarators = NodeList::new();
        loop {
            let start = self.token_start();
            self.with_session(|s| s.in_declarator = true);
            let name = self.parse_identifier();
            if name.is_none() {
                self.with_session(|s| s.in_declarator = false);
                break;
            }
            let extra_dims = self.parse_dims();
            let initializer = if self.at(SyntaxKind::EqualsToken) {
                self.next_token();
                if self.at(SyntaxKind::OpenBraceToken) {
                    self.parse_array_initializer()
                } else {
                    self.parse_expression()
                }
            } else {
                self.with_session(|s| s.in_declarator = false);
                NodeIndex::NONE
            };
            declarators.push(self.arena.add(Node::VariableDeclarator(
                VariableDeclaratorData {
                    base: NodeBase::new(start, self.prev_end(start)),
                    name,
                    extra_dims,
                    initializer,
                },
            )));
            if !self.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        declarators
    }

    /// Anonymous class body after an allocation's argument list.
    pub(crate) fn parse_anonymous_body(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.with_session(|s| s.pending_brace_marker = Some(MarkerKind::TypeDelimiter));
        self.next_token();
        let mut members = NodeList::new();
        self.parse_member_list(&mut members);
        self.parse_expected(SyntaxKind::CloseBraceToken);
        self.arena.add(Node::TypeDeclaration(TypeDeclData {
            base: NodeBase::new(start, self.prev_end(start)),
            keyword: TypeDeclKeyword::Class,
            modifiers: ModifierFlags::empty(),
            annotations: NodeList::new(),
            name: NodeIndex::NONE,
            type_parameters: None,
            superclass: NodeIndex::NONE,
            interfaces: NodeList::new(),
            members,
            has_open_brace: true,
        }))
    }

    // =========================================================================
    // Modifiers and annotations
    // =========================================================================

    pub(crate) fn parse_modifiers_and_annotations(&mut self) -> (ModifierFlags, NodeList) {
        let mut modifiers = ModifierFlags::empty();
        let mut annotations = NodeList::new();
        loop {
            if token_is_modifier(self.token) {
                // `static {` and `synchronized (` are statements or
                // initializers, not modifiers; the callers that care
                // check before getting here.
                modifiers |= modifier_flag(self.token);
                self.next_token();
            } else if self.at(SyntaxKind::AtToken) && !self.at_annotation_interface() {
                annotations.push(self.parse_annotation());
            } else {
                break;
            }
        }
        (modifiers, annotations)
    }

    pub(crate) fn at_annotation_interface(&mut self) -> bool {
        self.at(SyntaxKind::AtToken)
            && self.look_ahead(|s| {
                s.next_token();
                s.token == SyntaxKind::InterfaceKeyword
            })
    }

    pub(crate) fn parse_annotation(&mut self) -> NodeIndex {
        let start = self.token_start();
        self.next_token(); // `@`

        // The header flag suppresses the invocation markers the `(`
        // would otherwise open.
        let was_header = self
            .completion_session()
            .is_some_and(|s| s.in_declaration_header);
        self.with_session(|s| s.in_declaration_header = true);
        let name = self.parse_type_name();
        self.with_session(|s| s.in_declaration_header = was_header);

        let mut style = AnnotationStyle::Marker;
        let mut member_values = NodeList::new();
        if self.at(SyntaxKind::OpenParenToken) {
            self.push_marker(
                MarkerKind::BetweenAnnotationAndRightParen,
                self.paren_depth,
                NodeIndex::NONE,
            );
            self.next_token();
            if self.at(SyntaxKind::CloseParenToken) {
                style = AnnotationStyle::Normal;
            } else {
                let is_pair = self.look_ahead(|s| {
                    if s.token != SyntaxKind::Identifier {
                        return false;
                    }
                    s.next_token();
                    s.token == SyntaxKind::EqualsToken
                });
                if is_pair || self.at_completion_token() {
                    style = AnnotationStyle::Normal;
                    loop {
                        member_values.push(self.parse_member_value_pair());
                        if !self.eat(SyntaxKind::CommaToken) {
                            break;
                        }
                    }
                } else {
                    style = AnnotationStyle::SingleMember;
                    member_values.push(self.parse_member_value());
                }
            }
            self.parse_expected(SyntaxKind::CloseParenToken);
            self.reduce(Production::AnnotationArguments, NodeIndex::NONE);
        }

        self.arena.add(Node::Annotation(AnnotationData {
            base: NodeBase::new(start, self.prev_end(start)),
            style,
            name,
            member_values,
        }))
    }

    fn parse_member_value_pair(&mut self) -> NodeIndex {
        let start = self.token_start();
        let name = self.parse_identifier();
        let value = if self.eat(SyntaxKind::EqualsToken) {
            let value = self.parse_member_value();
            self.pop_marker(MarkerKind::AttributeValue);
            value
        } else {
            NodeIndex::NONE
        };
        self.arena.add(Node::MemberValuePair(MemberValuePairData {
            base: NodeBase::new(start, self.prev_end(start)),
            name,
            value,
        }))
    }

    fn parse_member_value(&mut self) -> NodeIndex {
        if self.at(SyntaxKind::OpenBraceToken) {
            self.parse_array_initializer()
        } else if self.at(SyntaxKind::AtToken) {
            self.parse_annotation()
        } else {
            self.parse_expression()
        }
    }

    /// Whether the current token is the flagged completion identifier.
    pub(crate) fn at_completion_token(&self) -> bool {
        self.scanner.is_completion_identifier()
    }
}
