//! The fat `Node` enum and its per-variant data structs.

use super::{ModifierFlags, NodeBase, NodeIndex, NodeList};
use crate::completion::CompletionData;
use javelin_scanner::SyntaxKind;
use serde::{Deserialize, Serialize};

// =============================================================================
// Names, literals, simple expressions
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IdentifierData {
    pub base: NodeBase,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct QualifiedNameData {
    pub base: NodeBase,
    pub qualifier: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LiteralData {
    pub base: NodeBase,
    /// Token kind of the literal (numeric/string/char/true/false/null).
    pub token: SyntaxKind,
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThisData {
    pub base: NodeBase,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SuperData {
    pub base: NodeBase,
}

// =============================================================================
// Compound expressions
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BinaryExprData {
    pub base: NodeBase,
    pub left: NodeIndex,
    pub operator: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InstanceofData {
    pub base: NodeBase,
    pub expression: NodeIndex,
    pub type_ref: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnaryExprData {
    pub base: NodeBase,
    pub operator: SyntaxKind,
    pub operand: NodeIndex,
    /// Prefix (`++x`) vs. postfix (`x++`).
    pub prefix: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssignmentData {
    pub base: NodeBase,
    pub left: NodeIndex,
    pub operator: SyntaxKind,
    pub right: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ConditionalData {
    pub base: NodeBase,
    pub condition: NodeIndex,
    pub when_true: NodeIndex,
    pub when_false: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CastData {
    pub base: NodeBase,
    pub type_ref: NodeIndex,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParenthesizedData {
    pub base: NodeBase,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldAccessData {
    pub base: NodeBase,
    pub receiver: NodeIndex,
    pub name: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrayAccessData {
    pub base: NodeBase,
    pub array: NodeIndex,
    pub index: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodInvocationData {
    pub base: NodeBase,
    /// Receiver expression; `NONE` for an unqualified call.
    pub receiver: NodeIndex,
    pub name: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AllocationData {
    pub base: NodeBase,
    /// Enclosing-instance qualifier in `outer.new Inner()`; usually `NONE`.
    pub qualifier: NodeIndex,
    pub type_ref: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub arguments: NodeList,
    /// Anonymous class body, if any.
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrayCreationData {
    pub base: NodeBase,
    pub element_type: NodeIndex,
    pub dim_expressions: NodeList,
    pub dims: u32,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ArrayInitializerData {
    pub base: NodeBase,
    pub expressions: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ClassLiteralData {
    pub base: NodeBase,
    pub type_ref: NodeIndex,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PrimitiveTypeData {
    pub base: NodeBase,
    pub keyword: SyntaxKind,
    pub dims: u32,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NamedTypeData {
    pub base: NodeBase,
    /// Identifier or QualifiedName.
    pub name: NodeIndex,
    pub type_arguments: Option<NodeList>,
    pub dims: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WildcardBound {
    None,
    Extends,
    Super,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WildcardData {
    pub base: NodeBase,
    pub bound_kind: WildcardBound,
    pub bound: NodeIndex,
}

/// Union type in a multi-catch parameter (`A | B`).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnionTypeData {
    pub base: NodeBase,
    pub types: NodeList,
}

// =============================================================================
// Declarations
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompilationUnitData {
    pub base: NodeBase,
    pub package: NodeIndex,
    pub imports: NodeList,
    pub types: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PackageData {
    pub base: NodeBase,
    pub name: NodeIndex,
    pub annotations: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ImportData {
    pub base: NodeBase,
    pub name: NodeIndex,
    pub is_static: bool,
    pub on_demand: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDeclKeyword {
    Class,
    Interface,
    Enum,
    Annotation,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeDeclData {
    pub base: NodeBase,
    pub keyword: TypeDeclKeyword,
    pub modifiers: ModifierFlags,
    pub annotations: NodeList,
    pub name: NodeIndex,
    pub type_parameters: Option<NodeList>,
    pub superclass: NodeIndex,
    pub interfaces: NodeList,
    pub members: NodeList,
    /// Whether the body's `{` was actually present in the source.
    pub has_open_brace: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FieldDeclData {
    pub base: NodeBase,
    pub modifiers: ModifierFlags,
    pub annotations: NodeList,
    pub type_ref: NodeIndex,
    pub declarators: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct VariableDeclaratorData {
    pub base: NodeBase,
    pub name: NodeIndex,
    pub extra_dims: u32,
    pub initializer: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MethodDeclData {
    pub base: NodeBase,
    pub modifiers: ModifierFlags,
    pub annotations: NodeList,
    pub type_parameters: Option<NodeList>,
    /// `NONE` for constructors.
    pub return_type: NodeIndex,
    pub name: NodeIndex,
    pub parameters: NodeList,
    pub throws: NodeList,
    pub body: NodeIndex,
    pub is_constructor: bool,
    /// Whether the body's `{` was actually present in the source.
    pub has_open_brace: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ParameterData {
    pub base: NodeBase,
    pub modifiers: ModifierFlags,
    pub annotations: NodeList,
    pub type_ref: NodeIndex,
    pub name: NodeIndex,
    pub varargs: bool,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TypeParameterData {
    pub base: NodeBase,
    pub name: NodeIndex,
    pub bounds: NodeList,
}

/// Instance or static initializer block in a type body.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InitializerData {
    pub base: NodeBase,
    pub modifiers: ModifierFlags,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EnumConstantData {
    pub base: NodeBase,
    pub annotations: NodeList,
    pub name: NodeIndex,
    pub arguments: NodeList,
    pub body: NodeIndex,
}

// =============================================================================
// Annotations
// =============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnnotationStyle {
    Marker,
    SingleMember,
    Normal,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AnnotationData {
    pub base: NodeBase,
    pub style: AnnotationStyle,
    pub name: NodeIndex,
    /// MemberValuePair nodes for normal annotations, a single expression
    /// for single-member annotations.
    pub member_values: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MemberValuePairData {
    pub base: NodeBase,
    pub name: NodeIndex,
    pub value: NodeIndex,
}

// =============================================================================
// Statements
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct BlockData {
    pub base: NodeBase,
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LocalDeclData {
    pub base: NodeBase,
    pub modifiers: ModifierFlags,
    pub annotations: NodeList,
    pub type_ref: NodeIndex,
    pub declarators: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ExpressionStatementData {
    pub base: NodeBase,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct IfData {
    pub base: NodeBase,
    pub condition: NodeIndex,
    pub then_statement: NodeIndex,
    pub else_statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WhileData {
    pub base: NodeBase,
    pub condition: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DoData {
    pub base: NodeBase,
    pub body: NodeIndex,
    pub condition: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForData {
    pub base: NodeBase,
    pub initializers: NodeList,
    pub condition: NodeIndex,
    pub updates: NodeList,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ForeachData {
    pub base: NodeBase,
    pub parameter: NodeIndex,
    pub expression: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchData {
    pub base: NodeBase,
    pub expression: NodeIndex,
    /// Interleaved SwitchCase and statement nodes, in source order.
    pub statements: NodeList,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SwitchCaseData {
    pub base: NodeBase,
    /// `NONE` for `default:`.
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TryData {
    pub base: NodeBase,
    pub try_block: NodeIndex,
    pub catch_clauses: NodeList,
    pub finally_block: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CatchClauseData {
    pub base: NodeBase,
    pub parameter: NodeIndex,
    pub block: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ReturnData {
    pub base: NodeBase,
    pub expression: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ThrowData {
    pub base: NodeBase,
    pub expression: NodeIndex,
}

/// `break` or `continue`; the statement kind is the enum variant.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JumpData {
    pub base: NodeBase,
    pub label: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LabeledData {
    pub base: NodeBase,
    pub label: NodeIndex,
    pub statement: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SynchronizedData {
    pub base: NodeBase,
    pub expression: NodeIndex,
    pub body: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AssertData {
    pub base: NodeBase,
    pub condition: NodeIndex,
    pub message: NodeIndex,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmptyStatementData {
    pub base: NodeBase,
}

/// Placeholder for an unparsable region; keeps ranges monotone so the
/// recovery machinery can still position siblings.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorNodeData {
    pub base: NodeBase,
}

// =============================================================================
// Node enum
// =============================================================================

#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum Node {
    // Names and literals
    Identifier(IdentifierData),
    QualifiedName(QualifiedNameData),
    Literal(LiteralData),
    This(ThisData),
    Super(SuperData),

    // Expressions
    Binary(BinaryExprData),
    Instanceof(InstanceofData),
    Unary(UnaryExprData),
    Assignment(AssignmentData),
    Conditional(ConditionalData),
    Cast(CastData),
    Parenthesized(ParenthesizedData),
    FieldAccess(FieldAccessData),
    ArrayAccess(ArrayAccessData),
    MethodInvocation(MethodInvocationData),
    ClassInstanceCreation(AllocationData),
    ArrayCreation(ArrayCreationData),
    ArrayInitializer(ArrayInitializerData),
    ClassLiteral(ClassLiteralData),

    // Types
    PrimitiveType(PrimitiveTypeData),
    NamedType(NamedTypeData),
    Wildcard(WildcardData),
    UnionType(UnionTypeData),

    // Declarations
    CompilationUnit(CompilationUnitData),
    PackageDeclaration(PackageData),
    ImportDeclaration(ImportData),
    TypeDeclaration(TypeDeclData),
    FieldDeclaration(FieldDeclData),
    VariableDeclarator(VariableDeclaratorData),
    MethodDeclaration(MethodDeclData),
    Parameter(ParameterData),
    TypeParameter(TypeParameterData),
    Initializer(InitializerData),
    EnumConstant(EnumConstantData),
    Annotation(AnnotationData),
    MemberValuePair(MemberValuePairData),

    // Statements
    Block(BlockData),
    LocalDeclaration(LocalDeclData),
    ExpressionStatement(ExpressionStatementData),
    IfStatement(IfData),
    WhileStatement(WhileData),
    DoStatement(DoData),
    ForStatement(ForData),
    ForeachStatement(ForeachData),
    SwitchStatement(SwitchData),
    SwitchCase(SwitchCaseData),
    TryStatement(TryData),
    CatchClause(CatchClauseData),
    ReturnStatement(ReturnData),
    ThrowStatement(ThrowData),
    BreakStatement(JumpData),
    ContinueStatement(JumpData),
    LabeledStatement(LabeledData),
    SynchronizedStatement(SynchronizedData),
    AssertStatement(AssertData),
    EmptyStatement(EmptyStatementData),
    ErrorNode(ErrorNodeData),

    // The one completion node
    Completion(CompletionData),
}

impl Node {
    /// Shared base (source range) of any node.
    pub fn base(&self) -> &NodeBase {
        match self {
            Node::Identifier(d) => &d.base,
            Node::QualifiedName(d) => &d.base,
            Node::Literal(d) => &d.base,
            Node::This(d) => &d.base,
            Node::Super(d) => &d.base,
            Node::Binary(d) => &d.base,
            Node::Instanceof(d) => &d.base,
            Node::Unary(d) => &d.base,
            Node::Assignment(d) => &d.base,
            Node::Conditional(d) => &d.base,
            Node::Cast(d) => &d.base,
            Node::Parenthesized(d) => &d.base,
            Node::FieldAccess(d) => &d.base,
            Node::ArrayAccess(d) => &d.base,
            Node::MethodInvocation(d) => &d.base,
            Node::ClassInstanceCreation(d) => &d.base,
            Node::ArrayCreation(d) => &d.base,
            Node::ArrayInitializer(d) => &d.base,
            Node::ClassLiteral(d) => &d.base,
            Node::PrimitiveType(d) => &d.base,
            Node::NamedType(d) => &d.base,
            Node::Wildcard(d) => &d.base,
            Node::UnionType(d) => &d.base,
            Node::CompilationUnit(d) => &d.base,
            Node::PackageDeclaration(d) => &d.base,
            Node::ImportDeclaration(d) => &d.base,
            Node::TypeDeclaration(d) => &d.base,
            Node::FieldDeclaration(d) => &d.base,
            Node::VariableDeclarator(d) => &d.base,
            Node::MethodDeclaration(d) => &d.base,
            Node::Parameter(d) => &d.base,
            Node::TypeParameter(d) => &d.base,
            Node::Initializer(d) => &d.base,
            Node::EnumConstant(d) => &d.base,
            Node::Annotation(d) => &d.base,
            Node::MemberValuePair(d) => &d.base,
            Node::Block(d) => &d.base,
            Node::LocalDeclaration(d) => &d.base,
            Node::ExpressionStatement(d) => &d.base,
            Node::IfStatement(d) => &d.base,
            Node::WhileStatement(d) => &d.base,
            Node::DoStatement(d) => &d.base,
            Node::ForStatement(d) => &d.base,
            Node::ForeachStatement(d) => &d.base,
            Node::SwitchStatement(d) => &d.base,
            Node::SwitchCase(d) => &d.base,
            Node::TryStatement(d) => &d.base,
            Node::CatchClause(d) => &d.base,
            Node::ReturnStatement(d) => &d.base,
            Node::ThrowStatement(d) => &d.base,
            Node::BreakStatement(d) => &d.base,
            Node::ContinueStatement(d) => &d.base,
            Node::LabeledStatement(d) => &d.base,
            Node::SynchronizedStatement(d) => &d.base,
            Node::AssertStatement(d) => &d.base,
            Node::EmptyStatement(d) => &d.base,
            Node::ErrorNode(d) => &d.base,
            Node::Completion(d) => &d.base,
        }
    }

    pub fn is_completion(&self) -> bool {
        matches!(self, Node::Completion(_))
    }

    /// Whether this node can stand in statement position.
    pub fn is_statement(&self) -> bool {
        matches!(
            self,
            Node::Block(_)
                | Node::LocalDeclaration(_)
                | Node::ExpressionStatement(_)
                | Node::IfStatement(_)
                | Node::WhileStatement(_)
                | Node::DoStatement(_)
                | Node::ForStatement(_)
                | Node::ForeachStatement(_)
                | Node::SwitchStatement(_)
                | Node::TryStatement(_)
                | Node::ReturnStatement(_)
                | Node::ThrowStatement(_)
                | Node::BreakStatement(_)
                | Node::ContinueStatement(_)
                | Node::LabeledStatement(_)
                | Node::SynchronizedStatement(_)
                | Node::AssertStatement(_)
                | Node::EmptyStatement(_)
        )
    }
}
