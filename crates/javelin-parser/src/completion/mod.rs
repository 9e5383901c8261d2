//! The completion layer.
//!
//! A parse started with a cursor (via [`crate::ParserState::for_completion`])
//! carries a `CompletionSession`. The session owns:
//!
//! - the context-marker stack, kept in sync with token shifts and
//!   production completions (`tracker`);
//! - the completion-node synthesizer, a priority-ordered recognizer chain
//!   that fires exactly once when the cursor boundary is crossed
//!   (`synthesizer`);
//! - the orphan reattachment engine, which splices an unattached
//!   completion node into the recovered tree (`attach`);
//! - the recovery coordinator, a small state machine governing diet-mode
//!   parsing and end-of-file clamping once the cursor has been passed
//!   (`coordinator`).

pub mod attach;
pub mod coordinator;
pub mod keywords;
pub mod synthesizer;
pub mod tracker;

use crate::ast::{NodeBase, NodeIndex, NodeList};
use coordinator::RecoveryCoordinator;
use javelin_scanner::SyntaxKind;
use serde::{Deserialize, Serialize};
use tracker::{Marker, MarkerStack};

/// The variant of completion node that was synthesized.
///
/// Each variant corresponds to one recognizer in the synthesizer's
/// priority chain (several recognizers can produce more than one).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum CompletionKind {
    /// Bare name in expression or statement position.
    NameReference,
    /// Name after a package/type qualifier (`a.b.c|`).
    QualifiedNameReference,
    /// Member name after a dot on an expression receiver (`expr.na|`).
    MemberAccess,
    /// Trailing argument position inside a call's argument list.
    MessageSend,
    /// Type name in a type position (extends clause, field type, ...).
    TypeReference,
    /// Type name after a package/type qualifier in type position.
    QualifiedTypeReference,
    /// Exception type in a catch parameter or throws clause.
    ExceptionReference,
    /// Type position at the start of a member declaration.
    FieldType,
    /// Return type position in a method header.
    MethodReturnType,
    /// Keyword-only position; candidates carried on the node.
    Keyword,
    /// Label after `break`.
    BreakLabel,
    /// Label after `continue`.
    ContinueLabel,
    /// Type after `new`.
    AllocationExpression,
    /// Type after `expr.new`.
    QualifiedAllocation,
    /// Member after a type/array receiver, only `class` is legal.
    ClassLiteralAccess,
    /// Member-value name inside an annotation argument list.
    MemberValueName,
    /// Annotation type name after `@`.
    AnnotationName,
    /// Type argument position inside `<...>`.
    ParameterizedType,
    /// Method selector in a header (constructor-like position).
    MethodName,
    /// Parameter name position in a declaration header.
    ArgumentName,
}

impl CompletionKind {
    /// Whether this kind stands in a type position.
    pub fn is_type_position(self) -> bool {
        matches!(
            self,
            CompletionKind::TypeReference
                | CompletionKind::QualifiedTypeReference
                | CompletionKind::ExceptionReference
                | CompletionKind::FieldType
                | CompletionKind::MethodReturnType
                | CompletionKind::AllocationExpression
                | CompletionKind::QualifiedAllocation
                | CompletionKind::ParameterizedType
                | CompletionKind::AnnotationName
        )
    }
}

/// Payload of the single completion node in a parse.
///
/// Lifecycle: created the instant the cursor boundary is detected, may be
/// wrapped by synthesized enclosing nodes during reattachment, never
/// duplicated or destroyed once created. `orphan` is true until the node
/// is linked into the tree; the transition to false happens at most once.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CompletionData {
    pub base: NodeBase,
    pub kind: CompletionKind,
    /// Identifier characters before the cursor (possibly empty).
    pub prefix: String,
    /// Receiver/qualifier sub-expression, if any.
    pub receiver: NodeIndex,
    /// Candidate keywords for keyword completions.
    pub keywords: Vec<SyntaxKind>,
    /// Sibling arguments of the enclosing call, for invocation completion.
    pub arguments: Option<NodeList>,
    pub orphan: bool,
}

/// Per-request completion state carried by the parser.
///
/// One session serves one parse; instances are never shared across
/// requests and are discarded (not reset) after use.
#[derive(Debug)]
pub struct CompletionSession {
    /// Insertion index: cursor offset + 1.
    pub cursor: u32,
    pub markers: MarkerStack,
    pub coordinator: RecoveryCoordinator,
    /// The single completion node; `NONE` until the synthesizer fires.
    pub node: NodeIndex,
    /// Set once the synthesizer has run; all later triggers are no-ops.
    pub fired: bool,
    /// Marker stack captured at fire time, for reattachment.
    pub marker_snapshot: Vec<Marker>,
    /// Receiver expression recorded by the parser before a `.`-name parse.
    pub selector_receiver: NodeIndex,
    /// The recorded receiver is a type (class-literal position).
    pub selector_is_type: bool,
    /// Parser is inside a declaration header; suppresses the
    /// invocation-marker push for `(` after an identifier.
    pub in_declaration_header: bool,
    /// Next `=` belongs to a variable declarator, not an assignment.
    pub in_declarator: bool,
    /// Parsing the selector name of a method declaration.
    pub in_method_name: bool,
    /// Parsing a parameter name in a declaration header.
    pub in_parameter_name: bool,
    /// A type-parameter header (`<T>`) was just closed; the next type is
    /// necessarily a method return type.
    pub after_type_parameters: bool,
    /// Parsing a package or import name chain.
    pub in_import_or_package: bool,
    /// Marker the next `{` should open (type body, method body), set by
    /// the declaration parser just before consuming the brace.
    pub pending_brace_marker: Option<tracker::MarkerKind>,
    /// Argument list of the innermost open call at fire time.
    pub enclosing_call_arguments: Option<NodeList>,
}

impl CompletionSession {
    pub fn new(cursor: u32) -> CompletionSession {
        CompletionSession {
            cursor,
            markers: MarkerStack::new(),
            coordinator: RecoveryCoordinator::new(),
            node: NodeIndex::NONE,
            fired: false,
            marker_snapshot: Vec::new(),
            selector_receiver: NodeIndex::NONE,
            selector_is_type: false,
            in_declaration_header: false,
            in_declarator: false,
            in_method_name: false,
            in_parameter_name: false,
            after_type_parameters: false,
            in_import_or_package: false,
            pending_brace_marker: None,
            enclosing_call_arguments: None,
        }
    }
}
