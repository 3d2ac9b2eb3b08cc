//! Structural type references used as service and implementation keys.

use std::fmt;
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reference to a type in the modelled type system.
///
/// Type references identify services and implementations everywhere in the
/// engine. They are purely structural: two references are equal when their
/// names and arguments are equal.
///
/// # Variants
///
/// - **Named**: a type definition, optionally applied to generic arguments
/// - **Param**: the n-th unbound generic parameter of the enclosing definition
/// - **All**: a request for every implementation of the element type
///
/// A `Named` reference whose arguments mention a `Param` anywhere is *open*.
/// `IRepo<T0>` is how the open definition `IRepo<>` is written.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::TypeRef;
///
/// let closed = TypeRef::generic("IRepo", [TypeRef::named("Int32")]);
/// let open = TypeRef::open("IRepo", 1);
///
/// assert!(!closed.is_open());
/// assert!(open.is_open());
/// assert_eq!(closed.definition(), open);
/// assert_eq!(closed.to_string(), "IRepo<Int32>");
/// assert_eq!(TypeRef::all(closed).to_string(), "[IRepo<Int32>]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeRef {
    /// A named type with its generic arguments (empty for non-generic types)
    Named { name: Arc<str>, args: Vec<TypeRef> },
    /// Unbound generic parameter, by position
    Param(usize),
    /// Collection request: every implementation of the element type
    All(Box<TypeRef>),
}

impl TypeRef {
    pub fn named(name: &str) -> Self {
        TypeRef::Named { name: Arc::from(name), args: Vec::new() }
    }

    pub fn generic<I>(name: &str, args: I) -> Self
    where
        I: IntoIterator<Item = TypeRef>,
    {
        TypeRef::Named { name: Arc::from(name), args: args.into_iter().collect() }
    }

    /// The open definition of `name` with `arity` unbound parameters.
    pub fn open(name: &str, arity: usize) -> Self {
        TypeRef::generic(name, (0..arity).map(TypeRef::Param))
    }

    pub fn param(index: usize) -> Self {
        TypeRef::Param(index)
    }

    pub fn all(element: TypeRef) -> Self {
        TypeRef::All(Box::new(element))
    }

    /// Definition name, or `None` for parameters and collections.
    pub fn name(&self) -> Option<&str> {
        match self {
            TypeRef::Named { name, .. } => Some(name),
            _ => None,
        }
    }

    pub fn args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Named { args, .. } => args,
            _ => &[],
        }
    }

    pub fn is_generic(&self) -> bool {
        !self.args().is_empty()
    }

    /// Whether an unbound parameter appears anywhere in this reference.
    pub fn is_open(&self) -> bool {
        match self {
            TypeRef::Named { args, .. } => args.iter().any(TypeRef::is_open),
            TypeRef::Param(_) => true,
            TypeRef::All(element) => element.is_open(),
        }
    }

    pub fn is_multi(&self) -> bool {
        matches!(self, TypeRef::All(_))
    }

    /// Strips the collection wrapper, if any.
    pub fn element(&self) -> &TypeRef {
        match self {
            TypeRef::All(element) => element,
            other => other,
        }
    }

    /// The open definition this reference instantiates.
    ///
    /// Non-generic references, parameters and collections return themselves.
    pub fn definition(&self) -> TypeRef {
        match self {
            TypeRef::Named { name, args } if !args.is_empty() => TypeRef::Named {
                name: name.clone(),
                args: (0..args.len()).map(TypeRef::Param).collect(),
            },
            other => other.clone(),
        }
    }

    /// Replaces every `Param(i)` with `args[i]`.
    ///
    /// Parameters without a matching argument are left untouched.
    pub fn substitute(&self, args: &[TypeRef]) -> TypeRef {
        match self {
            TypeRef::Named { name, args: own } => TypeRef::Named {
                name: name.clone(),
                args: own.iter().map(|a| a.substitute(args)).collect(),
            },
            TypeRef::Param(i) => args.get(*i).cloned().unwrap_or(TypeRef::Param(*i)),
            TypeRef::All(element) => TypeRef::All(Box::new(element.substitute(args))),
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Named { name, args } => {
                f.write_str(name)?;
                if !args.is_empty() {
                    f.write_str("<")?;
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            f.write_str(", ")?;
                        }
                        write!(f, "{}", arg)?;
                    }
                    f.write_str(">")?;
                }
                Ok(())
            }
            TypeRef::Param(i) => write!(f, "T{}", i),
            TypeRef::All(element) => write!(f, "[{}]", element),
        }
    }
}

impl From<&str> for TypeRef {
    fn from(name: &str) -> Self {
        TypeRef::named(name)
    }
}
