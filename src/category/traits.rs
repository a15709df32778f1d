/// Morphisms of a category, with fallible composition.
pub trait Arrow: Sized {
    type Object;

    /// Why two arrows failed to compose.
    type Error;

    fn source(&self) -> Self::Object;
    fn target(&self) -> Self::Object;

    /// the identity morphism on `a`
    fn identity(a: &Self::Object) -> Self;

    /// Compose morphisms in diagrammatic order: `self ; other`
    ///
    /// # Errors
    ///
    /// Returns an error if `self.target() != other.source()`.
    fn compose(&self, other: &Self) -> Result<Self, Self::Error>;
}

pub trait Monoidal: Arrow {
    /// the monoidal unit
    fn unit() -> Self::Object;

    /// `f \otimes g` of two morphisms
    fn tensor(&self, other: &Self) -> Self;
}

pub trait SymmetricMonoidal: Monoidal {
    /// Construct the symmetry `\sigma_{a,b}` from `a` and `b`.
    fn twist(a: &Self::Object, b: &Self::Object) -> Self;
}

/// Supply of commutative comonoids (copying and deleting) on every object.
pub trait Cartesian: SymmetricMonoidal {
    /// `Δ_n : a → a^{⊗n}`
    fn mcopy(a: &Self::Object, n: usize) -> Self;

    /// `◊ : a → I`
    fn delete(a: &Self::Object) -> Self;
}

/// Supply of commutative monoids (merging and creating) on every object.
pub trait Cocartesian: SymmetricMonoidal {
    /// `∇_n : a^{⊗n} → a`
    fn mmerge(a: &Self::Object, n: usize) -> Self;

    /// `□ : I → a`
    fn create(a: &Self::Object) -> Self;
}
