//! Length and count sources resolved against a partially decoded instance.

use std::fmt;
use std::sync::Arc;

use crate::error::CodecError;
use crate::instance::StructInstance;

/// Signature of a computed length or count.
///
/// The closure sees the instance decoded so far; only fields declared
/// before the dependent field are populated.
pub type DependentFn = dyn Fn(&StructInstance) -> Result<usize, CodecError> + Send + Sync;

/// A value derived from earlier fields of the same struct.
#[derive(Clone)]
pub enum Dependent {
    /// The integer value of a named field
    Field(String),
    /// A closure over the instance, with the fields it reads listed up front
    Computed {
        depends_on: Vec<String>,
        f: Arc<DependentFn>,
    },
}

impl Dependent {
    /// Uses the integer value of `name` directly.
    pub fn field(name: impl Into<String>) -> Self {
        Dependent::Field(name.into())
    }

    /// Wraps a closure that reads the fields named in `depends_on`.
    ///
    /// The names are checked against the schema at build time, so a closure
    /// reading a later field is rejected before any buffer is decoded.
    pub fn computed<F>(depends_on: &[&str], f: F) -> Self
    where
        F: Fn(&StructInstance) -> Result<usize, CodecError> + Send + Sync + 'static,
    {
        Dependent::Computed {
            depends_on: depends_on.iter().map(|s| s.to_string()).collect(),
            f: Arc::new(f),
        }
    }

    /// Returns the names of the fields this value reads.
    pub fn dependencies(&self) -> Vec<&str> {
        match self {
            Dependent::Field(name) => vec![name.as_str()],
            Dependent::Computed { depends_on, .. } => {
                depends_on.iter().map(String::as_str).collect()
            }
        }
    }

    /// Evaluates against the instance decoded so far.
    pub fn evaluate(&self, instance: &StructInstance) -> Result<usize, CodecError> {
        match self {
            Dependent::Field(name) => instance.usize_of(name),
            Dependent::Computed { f, .. } => f(instance),
        }
    }
}

impl fmt::Debug for Dependent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependent::Field(name) => f.debug_tuple("Field").field(name).finish(),
            Dependent::Computed { depends_on, .. } => f
                .debug_struct("Computed")
                .field("depends_on", depends_on)
                .finish_non_exhaustive(),
        }
    }
}

/// Repetition of a field: fixed at declaration or read from earlier fields.
#[derive(Debug, Clone)]
pub enum Count {
    Static(usize),
    Dynamic(Dependent),
}

impl Default for Count {
    fn default() -> Self {
        Count::Static(1)
    }
}

impl Count {
    /// Returns the fixed count, if any.
    pub fn as_static(&self) -> Option<usize> {
        match self {
            Count::Static(n) => Some(*n),
            Count::Dynamic(_) => None,
        }
    }
}
