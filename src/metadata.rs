//! Metadata reader: lifetime declarations, export markers, ignore markers
//! and "seek" dependencies attached to discovered types.
//!
//! The engine only ever asks this trait, never the [`TypeDef`] fields
//! directly, so hosts can source markers from anywhere (attributes parsed by
//! a scanner, a side configuration file, test fakes).

use crate::catalog::{Export, Parameter, TypeDef};
use crate::key::TypeRef;
use crate::lifetime::Lifetime;

/// Capability query over type metadata.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{DeclaredMetadata, Lifetime, MetadataReader, TypeDef};
///
/// let def = TypeDef::class("Cache").lifetime(Lifetime::Singleton);
/// assert_eq!(DeclaredMetadata.lifetime_of(&def), Some(Lifetime::Singleton));
/// assert!(!DeclaredMetadata.is_type_ignored(&def));
/// ```
pub trait MetadataReader: Send + Sync {
    /// Lifetime declared on a service or implementation type.
    fn lifetime_of(&self, def: &TypeDef) -> Option<Lifetime>;

    /// Export marker used by the convention pass.
    fn export_of(&self, def: &TypeDef) -> Option<Export>;

    /// Dependencies that must resolve in addition to the constructor.
    fn seeks_of(&self, def: &TypeDef) -> Vec<TypeRef>;

    /// Type excluded from auto-wiring altogether.
    fn is_type_ignored(&self, def: &TypeDef) -> bool;

    /// Constructor parameter excluded from auto-wiring.
    fn is_parameter_ignored(&self, param: &Parameter) -> bool;
}

/// Reads the markers carried on the definitions themselves.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeclaredMetadata;

impl MetadataReader for DeclaredMetadata {
    fn lifetime_of(&self, def: &TypeDef) -> Option<Lifetime> {
        def.lifetime
    }

    fn export_of(&self, def: &TypeDef) -> Option<Export> {
        def.export.clone()
    }

    fn seeks_of(&self, def: &TypeDef) -> Vec<TypeRef> {
        def.seeks.clone()
    }

    fn is_type_ignored(&self, def: &TypeDef) -> bool {
        def.ignored
    }

    fn is_parameter_ignored(&self, param: &Parameter) -> bool {
        param.ignored
    }
}
