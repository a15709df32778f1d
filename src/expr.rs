//! Symbolic morphism expressions of a symmetric monoidal category.
//!
//! An [`Hom`] is a syntax tree over generating morphisms, built with composition, tensor
//! product and the structural morphisms (identities, braidings, copying, merging, ...).
//! Expressions are produced by the caller and consumed read-only by the two interpretations in
//! this crate: [`crate::wiring::build`] and [`crate::compile`].
//!
//! ```rust
//! use wiring_diagrams::expr::{Hom, Ob};
//!
//! let a: Ob<&str> = Ob::generator("A");
//! let b: Ob<&str> = Ob::generator("B");
//! let f: Hom<&str, &str> = Hom::generator("f", a.clone(), b.clone());
//! let g = Hom::generator("g", b.clone(), a.clone());
//!
//! let h = Hom::compose(f, g);
//! assert_eq!(h.dom(), a);
//! assert_eq!(h.codom(), a);
//! ```
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExprError {
    /// A tensor product had a factor which is not a generating object.
    #[error("object is not a flat tensor product of generators")]
    NonFlatObject,
}

/// Object expressions: the monoidal unit, generating objects, and their tensor products.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Ob<O> {
    Unit,
    Generator(O),
    Otimes(Vec<Ob<O>>),
}

impl<O> Ob<O> {
    pub fn generator(o: impl Into<O>) -> Self {
        Ob::Generator(o.into())
    }

    /// Tensor product in normal form: nested products are flattened and units dropped.
    pub fn otimes(obs: impl IntoIterator<Item = Ob<O>>) -> Self {
        let mut factors = Vec::new();
        for ob in obs {
            match ob {
                Ob::Unit => {}
                Ob::Generator(o) => factors.push(Ob::Generator(o)),
                Ob::Otimes(inner) => match Ob::otimes(inner) {
                    Ob::Unit => {}
                    Ob::Otimes(xs) => factors.extend(xs),
                    x => factors.push(x),
                },
            }
        }
        match factors.len() {
            0 => Ob::Unit,
            1 => factors.pop().unwrap_or(Ob::Unit),
            _ => Ob::Otimes(factors),
        }
    }

    /// The number of generating objects in this object.
    pub fn arity(&self) -> usize {
        match self {
            Ob::Unit => 0,
            Ob::Generator(_) => 1,
            Ob::Otimes(xs) => xs.iter().map(Ob::arity).sum(),
        }
    }
}

impl<O: Clone> Ob<O> {
    /// Flatten into the list of generating objects, one per port.
    ///
    /// Every factor of a tensor product must itself be a generator: normalize with
    /// [`Ob::otimes`] first if the object was built by hand.
    pub fn ports(&self) -> Result<Vec<O>, ExprError> {
        match self {
            Ob::Unit => Ok(vec![]),
            Ob::Generator(o) => Ok(vec![o.clone()]),
            Ob::Otimes(xs) => xs
                .iter()
                .map(|x| match x {
                    Ob::Generator(o) => Ok(o.clone()),
                    _ => Err(ExprError::NonFlatObject),
                })
                .collect(),
        }
    }

    /// The `n`-fold tensor power `A ⊗ ... ⊗ A`
    pub fn repeat(&self, n: usize) -> Self {
        Ob::otimes(std::iter::repeat(self.clone()).take(n))
    }
}

/// Morphism expressions.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Hom<O, A> {
    /// A generating morphism `value : dom → codom`
    Generator { value: A, dom: Ob<O>, codom: Ob<O> },
    Id(Ob<O>),
    /// Composition in diagrammatic order
    Compose(Vec<Hom<O, A>>),
    Otimes(Vec<Hom<O, A>>),
    /// The symmetry `σ_{A,B} : A ⊗ B → B ⊗ A`
    Braid(Ob<O>, Ob<O>),
    /// `Δ_n : A → A^{⊗n}`
    Mcopy { ob: Ob<O>, n: usize },
    /// `◊ : A → I`
    Delete(Ob<O>),
    /// `∇_n : A^{⊗n} → A`
    Mmerge { ob: Ob<O>, n: usize },
    /// `□ : I → A`
    Create(Ob<O>),
    /// A linear map given by a scalar or matrix coefficient `value`
    Linear { value: A, dom: Ob<O>, codom: Ob<O> },
}

impl<O, A> Hom<O, A> {
    pub fn generator(value: impl Into<A>, dom: Ob<O>, codom: Ob<O>) -> Self {
        Hom::Generator {
            value: value.into(),
            dom,
            codom,
        }
    }

    pub fn linear(value: impl Into<A>, dom: Ob<O>, codom: Ob<O>) -> Self {
        Hom::Linear {
            value: value.into(),
            dom,
            codom,
        }
    }

    pub fn id(ob: Ob<O>) -> Self {
        Hom::Id(ob)
    }

    /// Binary composite `f ; g`. Types are not checked here.
    pub fn compose(f: Self, g: Self) -> Self {
        Hom::Compose(vec![f, g])
    }

    pub fn compose_all(fs: impl IntoIterator<Item = Self>) -> Self {
        Hom::Compose(fs.into_iter().collect())
    }

    pub fn otimes(f: Self, g: Self) -> Self {
        Hom::Otimes(vec![f, g])
    }

    pub fn otimes_all(fs: impl IntoIterator<Item = Self>) -> Self {
        Hom::Otimes(fs.into_iter().collect())
    }

    pub fn braid(a: Ob<O>, b: Ob<O>) -> Self {
        Hom::Braid(a, b)
    }

    pub fn mcopy(ob: Ob<O>, n: usize) -> Self {
        Hom::Mcopy { ob, n }
    }

    pub fn delete(ob: Ob<O>) -> Self {
        Hom::Delete(ob)
    }

    pub fn mmerge(ob: Ob<O>, n: usize) -> Self {
        Hom::Mmerge { ob, n }
    }

    pub fn create(ob: Ob<O>) -> Self {
        Hom::Create(ob)
    }
}

impl<O: Clone, A> Hom<O, A> {
    /// The domain of this morphism.
    ///
    /// An empty composite is treated as the identity on the unit.
    pub fn dom(&self) -> Ob<O> {
        match self {
            Hom::Generator { dom, .. } | Hom::Linear { dom, .. } => dom.clone(),
            Hom::Id(a) | Hom::Delete(a) => a.clone(),
            Hom::Compose(fs) => fs.first().map(Hom::dom).unwrap_or(Ob::Unit),
            Hom::Otimes(fs) => Ob::otimes(fs.iter().map(Hom::dom)),
            Hom::Braid(a, b) => Ob::otimes([a.clone(), b.clone()]),
            Hom::Mcopy { ob, .. } => ob.clone(),
            Hom::Mmerge { ob, n } => ob.repeat(*n),
            Hom::Create(_) => Ob::Unit,
        }
    }

    /// The codomain of this morphism.
    pub fn codom(&self) -> Ob<O> {
        match self {
            Hom::Generator { codom, .. } | Hom::Linear { codom, .. } => codom.clone(),
            Hom::Id(a) | Hom::Create(a) => a.clone(),
            Hom::Compose(fs) => fs.last().map(Hom::codom).unwrap_or(Ob::Unit),
            Hom::Otimes(fs) => Ob::otimes(fs.iter().map(Hom::codom)),
            Hom::Braid(a, b) => Ob::otimes([b.clone(), a.clone()]),
            Hom::Mcopy { ob, n } => ob.repeat(*n),
            Hom::Mmerge { ob, .. } => ob.clone(),
            Hom::Delete(_) => Ob::Unit,
        }
    }
}
