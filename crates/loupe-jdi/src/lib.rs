//! Debug value source boundary for loupe.
//!
//! `loupe-view` consumes this crate to obtain variables and values from a
//! paused debuggee. The engine never talks to a live VM directly; it goes
//! through the [`ValueSource`] trait so backends can range from a real wire
//! connection to the in-memory [`MockValueSource`] used in tests.

mod mock;

use thiserror::Error;

pub use mock::MockValueSource;

pub type ThreadId = u64;

/// Stable identity of a composite value for the lifetime of one pause.
pub type ValueId = u64;

/// Placeholder for names, values, and signatures the backend cannot resolve.
pub const UNKNOWN: &str = "<unknown>";

/// Display text for void-typed values, e.g. the return value of a `void`
/// method.
pub const NO_EXPLICIT_RETURN_VALUE: &str = "no explicit return value";

/// Classification of a backend value.
///
/// Formatting and leaf detection branch on exactly this tag, so it is a
/// closed set rather than something recovered from signature parsing at
/// each call site.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Primitive value with a one-character JNI signature code.
    Primitive,
    /// Plain object instance.
    Object,
    /// Array instance, any element type.
    Array,
    /// `java.lang.String` instance. Always displayed as a leaf.
    Str,
    /// Backend-internal reference-list pseudo collection.
    ReferenceList,
    /// Backend-internal all-instances pseudo collection.
    AllInstances,
}

/// Snapshot of one value inside the paused process.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugValue {
    pub kind: ValueKind,
    /// JNI-style type signature. Empty when the backend cannot determine
    /// it; may also carry the literal [`UNKNOWN`] sentinel.
    pub signature: String,
    /// Reference type name. Empty for primitives and unresolved types.
    pub type_name: String,
    /// Raw value text as rendered by the backend.
    pub text: String,
    /// Unique identity, defined only for composite values.
    pub id: Option<ValueId>,
    /// Defined iff `kind == ValueKind::Array`.
    pub array_length: Option<usize>,
    pub has_children: bool,
}

impl DebugValue {
    pub fn primitive(signature: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            kind: ValueKind::Primitive,
            signature: signature.into(),
            type_name: String::new(),
            text: text.into(),
            id: None,
            array_length: None,
            has_children: false,
        }
    }

    pub fn object(id: ValueId, type_name: impl Into<String>, text: impl Into<String>) -> Self {
        let type_name = type_name.into();
        Self {
            kind: ValueKind::Object,
            signature: object_signature(&type_name),
            type_name,
            text: text.into(),
            id: Some(id),
            array_length: None,
            has_children: false,
        }
    }

    /// Whether this value can have child variables at all (objects, arrays,
    /// strings, and the backend pseudo collections).
    pub fn is_composite(&self) -> bool {
        !matches!(self.kind, ValueKind::Primitive)
    }

    pub fn is_string(&self) -> bool {
        matches!(self.kind, ValueKind::Str)
    }

    /// The signature code for primitive values (`'I'`, `'B'`, ...), `None`
    /// for everything else.
    pub fn primitive_signature(&self) -> Option<char> {
        let mut chars = self.signature.chars();
        match (chars.next(), chars.next()) {
            (Some(code), None) => Some(code),
            _ => None,
        }
    }
}

fn object_signature(type_name: &str) -> String {
    format!("L{};", type_name.replace('.', "/"))
}

/// A named binding to a value within a scope.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugVariable {
    /// `None` when the backend could not resolve the name.
    pub name: Option<String>,
    pub synthetic: bool,
    pub is_final: bool,
    /// Present for field variables; used to disambiguate shadowed names.
    pub field: Option<FieldInfo>,
    /// `None` when the value could not be read.
    pub value: Option<DebugValue>,
}

impl DebugVariable {
    /// A plain, non-synthetic, non-final local variable.
    pub fn new(name: impl Into<String>, value: DebugValue) -> Self {
        Self {
            name: Some(name.into()),
            synthetic: false,
            is_final: false,
            field: None,
            value: Some(value),
        }
    }
}

/// Field-variable metadata needed to disambiguate names shadowed through
/// inheritance.
#[derive(Clone, Debug, PartialEq)]
pub struct FieldInfo {
    /// Qualified name of the declaring type, when resolvable.
    pub declaring_type: Option<String>,
    /// Every field name visible on the receiving type, shadowed names
    /// included.
    pub receiver_field_names: Vec<String>,
}

#[derive(Clone, Debug, Error)]
pub enum SourceError {
    #[error("value source is disconnected")]
    Disconnected,
    #[error("unknown value id {0}")]
    UnknownValueId(ValueId),
    #[error("variable information unavailable: {0}")]
    Unavailable(String),
    #[error("{0}")]
    Other(String),
}

/// Minimal, mock-friendly interface to the debugger backend.
///
/// Implementations are expected to be synchronous and fail fast; the view
/// treats every error here as "no data" rather than surfacing it to the
/// consumer.
pub trait ValueSource {
    /// Variables of the thread's top stack frame, in declaration order.
    ///
    /// `Ok(None)` means variable information is unavailable for the frame
    /// (native methods, missing debug info). This is an expected condition,
    /// not an error.
    fn top_frame_variables(
        &mut self,
        thread: ThreadId,
    ) -> Result<Option<Vec<DebugVariable>>, SourceError>;

    /// Child variables of a composite value, in declaration order.
    fn children(&mut self, value: &DebugValue) -> Result<Vec<DebugVariable>, SourceError>;
}
