//! Term extraction from compile-time component lists.
//!
//! A builder signature is a tuple of [`TermArg`] types. Each element maps to
//! exactly one [`Term`], in declaration order:
//!
//! | element            | access          | operator   |
//! |--------------------|-----------------|------------|
//! | `&T`               | `In`            | `And`      |
//! | `&mut T`, `T`      | `InOut`         | `And`      |
//! | `Option<&T>`       | `In`            | `Optional` |
//! | `Option<&mut T>`   | `InOut`         | `Optional` |
//!
//! Tags (zero-sized components) are never accessed, so any tag element maps
//! to `InOut::None`.
//!
//! By-value elements need a `TermArg` impl for the type itself, which
//! [`component!`](crate::component!) provides.

use crate::component::Component;
use crate::term::{InOut, Term, TermOper};

/// A type that can appear in a builder signature.
pub trait TermArg {
    fn term() -> Term;
}

/// A list of [`TermArg`]s.
pub trait Signature {
    /// The terms for this signature, in declaration order.
    fn terms() -> Vec<Term>;
}

fn access_term<T: Component>(inout: InOut) -> Term {
    let meta = T::meta();
    let inout = if meta.is_tag() { InOut::None } else { inout };
    Term::of::<T>().with_inout(inout)
}

/// The term for `T` used by value. Called by [`component!`](crate::component!).
#[doc(hidden)]
#[must_use]
pub fn owned_term<T: Component>() -> Term {
    access_term::<T>(InOut::InOut)
}

impl<T: Component> TermArg for &T {
    fn term() -> Term {
        access_term::<T>(InOut::In)
    }
}

impl<T: Component> TermArg for &mut T {
    fn term() -> Term {
        access_term::<T>(InOut::InOut)
    }
}

impl<T: Component> TermArg for Option<&T> {
    fn term() -> Term {
        access_term::<T>(InOut::In).with_oper(TermOper::Optional)
    }
}

impl<T: Component> TermArg for Option<&mut T> {
    fn term() -> Term {
        access_term::<T>(InOut::InOut).with_oper(TermOper::Optional)
    }
}

impl Signature for () {
    fn terms() -> Vec<Term> {
        Vec::new()
    }
}

macro_rules! impl_signature {
    ($($arg:ident),+) => {
        impl<$($arg: TermArg),+> Signature for ($($arg,)+) {
            fn terms() -> Vec<Term> {
                vec![$($arg::term()),+]
            }
        }
    };
}

impl_signature!(A);
impl_signature!(A, B);
impl_signature!(A, B, C);
impl_signature!(A, B, C, D);
impl_signature!(A, B, C, D, E);
impl_signature!(A, B, C, D, E, F);
impl_signature!(A, B, C, D, E, F, G);
impl_signature!(A, B, C, D, E, F, G, H);
impl_signature!(A, B, C, D, E, F, G, H, I);
impl_signature!(A, B, C, D, E, F, G, H, I, J);
impl_signature!(A, B, C, D, E, F, G, H, I, J, K);
impl_signature!(A, B, C, D, E, F, G, H, I, J, K, L);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{TermId, TermSource};

    struct Position {
        _x: f32,
    }
    struct Velocity {
        _x: f32,
    }
    struct Mass {
        _kg: f32,
    }
    struct Player;

    crate::component!(Position, Velocity, Mass, Player);

    fn names(terms: &[Term]) -> Vec<&'static str> {
        terms.iter().filter_map(Term::type_name).collect()
    }

    #[test]
    fn test_empty_signature() {
        assert!(<() as Signature>::terms().is_empty());
    }

    #[test]
    fn test_value_and_ref_access() {
        let terms = <(Position, &Velocity)>::terms();
        assert_eq!(names(&terms), vec!["Position", "Velocity"]);
        assert_eq!(terms[0].inout, InOut::InOut);
        assert_eq!(terms[1].inout, InOut::In);
        assert!(terms.iter().all(|t| t.src == TermSource::SelfRef));
        assert!(terms.iter().all(|t| t.oper == TermOper::And));
    }

    #[test]
    fn test_mut_ref_is_read_write() {
        let terms = <(&mut Mass,)>::terms();
        assert_eq!(terms[0].inout, InOut::InOut);
    }

    #[test]
    fn test_optional_elements() {
        let terms = <(Option<&Velocity>, Option<&mut Mass>)>::terms();
        assert_eq!(terms[0].oper, TermOper::Optional);
        assert_eq!(terms[0].inout, InOut::In);
        assert_eq!(terms[1].oper, TermOper::Optional);
        assert_eq!(terms[1].inout, InOut::InOut);
    }

    #[test]
    fn test_tag_elements_have_no_access() {
        let terms = <(Player, &Player)>::terms();
        assert!(terms.iter().all(|t| t.inout == InOut::None));
    }

    #[test]
    fn test_declaration_order_is_preserved() {
        let terms = <(&Mass, Position, &Velocity, Option<&Position>)>::terms();
        assert_eq!(
            names(&terms),
            vec!["Mass", "Position", "Velocity", "Position"]
        );
    }

    #[test]
    fn test_terms_are_unresolved() {
        let terms = <(Position,)>::terms();
        assert!(matches!(terms[0].id, TermId::Type(_)));
    }
}
