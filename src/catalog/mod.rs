//! Type catalog: the discovered types the engine can choose from.
//!
//! The catalog is filled once, before resolution starts, by whatever scanner
//! the host uses. It keeps every loaded type (interfaces and value types
//! included, so hierarchies can be walked) in insertion order; insertion
//! order is the last tie-break when candidates are otherwise equal.

use std::sync::Arc;

use crate::internal::Map;
use crate::key::TypeRef;
use crate::lifetime::Lifetime;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub mod hierarchy;

/// What kind of type a [`TypeDef`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum TypeKind {
    /// Concrete, instantiable reference type
    Class,
    /// Abstract class; never a candidate itself
    Abstract,
    Interface,
    /// Value type; never resolvable as a service
    Value,
}

/// A constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Parameter {
    pub name: String,
    pub ty: TypeRef,
    /// Has a default value and may be left to it
    #[cfg_attr(feature = "serde", serde(default))]
    pub optional: bool,
    /// Explicitly excluded from auto-wiring
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignored: bool,
}

impl Parameter {
    pub fn new(name: &str, ty: impl Into<TypeRef>) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.into(),
            optional: false,
            ignored: false,
        }
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }
}

/// A public constructor, parameters in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Constructor {
    pub params: Vec<Parameter>,
}

impl Constructor {
    pub fn new<I>(params: I) -> Self
    where
        I: IntoIterator<Item = Parameter>,
    {
        Self { params: params.into_iter().collect() }
    }
}

/// Export marker: the type offers itself to the convention pass.
///
/// With no explicit services the type is exported as itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Export {
    #[cfg_attr(feature = "serde", serde(default))]
    pub services: Vec<TypeRef>,
    /// Register as one of many implementations instead of the single winner
    #[cfg_attr(feature = "serde", serde(default))]
    pub multi: bool,
}

impl Export {
    pub fn as_self() -> Self {
        Self::default()
    }

    pub fn as_service(service: impl Into<TypeRef>) -> Self {
        Self { services: vec![service.into()], multi: false }
    }

    pub fn also(mut self, service: impl Into<TypeRef>) -> Self {
        self.services.push(service.into());
        self
    }

    pub fn multi(mut self) -> Self {
        self.multi = true;
        self
    }
}

/// Metadata for one discovered type.
///
/// Generic definitions declare their `arity`; their base, interfaces and
/// constructor parameters may mention `TypeRef::Param(i)` for the i-th
/// parameter.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{Lifetime, Parameter, TypeDef, TypeRef};
///
/// let repo = TypeDef::class("Repo")
///     .arity(1)
///     .implements(TypeRef::generic("IRepo", [TypeRef::param(0)]))
///     .ctor([Parameter::new("db", "Database")])
///     .lifetime(Lifetime::Scoped);
///
/// assert!(repo.is_generic_definition());
/// assert_eq!(repo.self_ref(), TypeRef::open("Repo", 1));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeDef {
    pub name: Arc<str>,
    pub kind: TypeKind,
    #[cfg_attr(feature = "serde", serde(default))]
    pub arity: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: Option<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interfaces: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub constructors: Vec<Constructor>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub lifetime: Option<Lifetime>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub export: Option<Export>,
    /// Extra dependencies that must resolve besides the constructor
    #[cfg_attr(feature = "serde", serde(default))]
    pub seeks: Vec<TypeRef>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub ignored: bool,
    #[cfg_attr(feature = "serde", serde(default = "default_public"))]
    pub public: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub nested: bool,
}

#[cfg(feature = "serde")]
fn default_public() -> bool {
    true
}

impl TypeDef {
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: Arc::from(name),
            kind,
            arity: 0,
            base: None,
            interfaces: Vec::new(),
            constructors: Vec::new(),
            lifetime: None,
            export: None,
            seeks: Vec::new(),
            ignored: false,
            public: true,
            nested: false,
        }
    }

    pub fn class(name: &str) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn abstract_class(name: &str) -> Self {
        Self::new(name, TypeKind::Abstract)
    }

    pub fn interface(name: &str) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn value(name: &str) -> Self {
        Self::new(name, TypeKind::Value)
    }

    pub fn arity(mut self, arity: usize) -> Self {
        self.arity = arity;
        self
    }

    pub fn extends(mut self, base: impl Into<TypeRef>) -> Self {
        self.base = Some(base.into());
        self
    }

    pub fn implements(mut self, interface: impl Into<TypeRef>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    pub fn constructor(mut self, ctor: Constructor) -> Self {
        self.constructors.push(ctor);
        self
    }

    /// Adds a public constructor taking `params`.
    pub fn ctor<I>(self, params: I) -> Self
    where
        I: IntoIterator<Item = Parameter>,
    {
        self.constructor(Constructor::new(params))
    }

    pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
        self.lifetime = Some(lifetime);
        self
    }

    pub fn export(mut self, export: Export) -> Self {
        self.export = Some(export);
        self
    }

    pub fn seeks(mut self, dependency: impl Into<TypeRef>) -> Self {
        self.seeks.push(dependency.into());
        self
    }

    pub fn ignored(mut self) -> Self {
        self.ignored = true;
        self
    }

    pub fn internal(mut self) -> Self {
        self.public = false;
        self
    }

    pub fn nested(mut self) -> Self {
        self.nested = true;
        self
    }

    pub fn is_generic_definition(&self) -> bool {
        self.arity > 0
    }

    /// Interfaces and abstract classes are resolved through candidates.
    pub fn is_abstract(&self) -> bool {
        matches!(self.kind, TypeKind::Interface | TypeKind::Abstract)
    }

    /// The definition applied to its own parameters: `Repo<T0>`, or `Repo`.
    pub fn self_ref(&self) -> TypeRef {
        TypeRef::Named {
            name: self.name.clone(),
            args: (0..self.arity).map(TypeRef::Param).collect(),
        }
    }

    /// Constructors as declared; a type declaring none has an implicit
    /// parameterless one.
    pub fn public_constructors(&self) -> Vec<Constructor> {
        if self.constructors.is_empty() {
            vec![Constructor::default()]
        } else {
            self.constructors.clone()
        }
    }
}

/// The set of loaded types.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{TypeCatalog, TypeDef, TypeRef};
///
/// let catalog = TypeCatalog::new()
///     .with(TypeDef::interface("IClock"))
///     .with(TypeDef::class("SystemClock").implements("IClock"))
///     .with(TypeDef::value("Int32"));
///
/// assert_eq!(catalog.len(), 3);
/// assert!(catalog.get("SystemClock").is_some());
/// assert_eq!(catalog.position("IClock"), Some(0));
/// assert!(catalog.def_of(&TypeRef::named("Missing")).is_none());
/// ```
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    types: Vec<TypeDef>,
    index: Map<Arc<str>, usize>,
}

impl TypeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a definition; a definition with the same name is replaced in place.
    pub fn add(&mut self, def: TypeDef) -> &mut Self {
        if let Some(&pos) = self.index.get(&def.name) {
            tracing::warn!(type_name = %def.name, "replacing duplicate type definition in catalog");
            self.types[pos] = def;
        } else {
            self.index.insert(def.name.clone(), self.types.len());
            self.types.push(def);
        }
        self
    }

    pub fn with(mut self, def: TypeDef) -> Self {
        self.add(def);
        self
    }

    pub fn extend<I>(&mut self, defs: I) -> &mut Self
    where
        I: IntoIterator<Item = TypeDef>,
    {
        for def in defs {
            self.add(def);
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&TypeDef> {
        self.index.get(name).map(|&pos| &self.types[pos])
    }

    /// Definition behind a named reference.
    pub fn def_of(&self, ty: &TypeRef) -> Option<&TypeDef> {
        ty.name().and_then(|name| self.get(name))
    }

    /// Insertion position, the final deterministic tie-break.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TypeDef> {
        self.types.iter()
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Types eligible as implementations: public, top-level classes that
    /// `is_ignored` does not exclude. Value types, interfaces, abstract and
    /// nested types never qualify.
    pub fn candidates<F>(&self, is_ignored: F) -> Vec<&TypeDef>
    where
        F: Fn(&TypeDef) -> bool,
    {
        self.types
            .iter()
            .filter(|def| def.kind == TypeKind::Class && def.public && !def.nested)
            .filter(|def| !is_ignored(def))
            .collect()
    }

    /// Loads a catalog from the JSON array a scanner emitted.
    #[cfg(feature = "config")]
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let defs: Vec<TypeDef> = serde_json::from_str(json)?;
        let mut catalog = Self::new();
        catalog.extend(defs);
        Ok(catalog)
    }
}

impl FromIterator<TypeDef> for TypeCatalog {
    fn from_iter<I: IntoIterator<Item = TypeDef>>(iter: I) -> Self {
        let mut catalog = Self::new();
        catalog.extend(iter);
        catalog
    }
}
