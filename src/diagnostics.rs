//! Rendering of dependency chains for operator-facing errors.

use crate::key::TypeRef;

/// Renders a chain like `A => {IB=B} => C.`
///
/// Each `(service, implementation)` step prints as the bare name when the
/// service is its own implementation and as `{Service=Implementation}`
/// otherwise. The type that failed, if any, closes the chain.
///
/// # Examples
///
/// ```rust
/// use ferrous_autowire::{render_chain, TypeRef};
///
/// let a = TypeRef::named("A");
/// let ib = TypeRef::named("IB");
/// let b = TypeRef::named("B");
/// let c = TypeRef::named("C");
///
/// assert_eq!(render_chain([(&a, &a), (&ib, &b)], Some(&c)), "A => {IB=B} => C.");
/// assert_eq!(render_chain([], Some(&c)), "C.");
/// ```
pub fn render_chain<'a, I>(steps: I, failing: Option<&TypeRef>) -> String
where
    I: IntoIterator<Item = (&'a TypeRef, &'a TypeRef)>,
{
    let mut parts: Vec<String> = steps
        .into_iter()
        .map(|(service, implementation)| {
            if service == implementation {
                service.to_string()
            } else {
                format!("{{{}={}}}", service, implementation)
            }
        })
        .collect();
    if let Some(failing) = failing {
        parts.push(failing.to_string());
    }
    let mut chain = parts.join(" => ");
    chain.push('.');
    chain
}
