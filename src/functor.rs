//! Structural interpretations of symbolic expressions.
//!
//! Both consumers of [`Hom`] expressions in this crate, the
//! [diagram builder](crate::wiring::build::DiagramFunctor) and the
//! [compiler](crate::compile::Compiler), are functors out of the free symmetric monoidal category
//! on the generators: they send objects to objects and morphisms to morphisms, preserving
//! composition and tensor products.
use crate::expr::{Hom, Ob};

/// A structure-preserving interpretation of [`Ob`] and [`Hom`] expressions.
///
/// Implementations are expected to pattern match exhaustively on [`Hom`]; there is no default
/// action on arrows.
pub trait Functor<O, A> {
    /// Image of object expressions
    type Object;

    /// Image of morphism expressions
    type Arrow;

    type Error;

    /// Action on objects
    fn map_object(&mut self, a: &Ob<O>) -> Result<Self::Object, Self::Error>;

    /// Action on arrows
    fn map_arrow(&mut self, f: &Hom<O, A>) -> Result<Self::Arrow, Self::Error>;
}
