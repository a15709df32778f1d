//! Build wiring diagrams from symbolic expressions.
//!
//! The builder interprets each [`Hom`] constructor by the corresponding operation of
//! [`crate::category`] on [`WiringDiagram`]s, so for example
//! `build(&Hom::compose(f, g))` is `build(&f)? >> build(&g)?`. Composites are flattened:
//! nested diagrams created while composing are substituted into their parent.
use thiserror::Error;

use super::diagram::*;
use crate::category::*;
use crate::expr::{ExprError, Hom, Ob};
use crate::functor::Functor;
use crate::util::log;

type Diagram<O, A> = WiringDiagram<A, O, ()>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error(transparent)]
    Object(#[from] ExprError),

    #[error(transparent)]
    Wiring(#[from] WiringError),

    /// A composite of zero morphisms has no well-defined domain.
    #[error("cannot build an empty composite")]
    EmptyComposite,
}

/// The functor from expressions to wiring diagrams.
///
/// Objects map to their lists of generating objects (one port each), generators and linear
/// maps to single atomic boxes labelled by their value, and structural morphisms to diagrams
/// containing only wires.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiagramFunctor;

impl<O: Clone + PartialEq, A: Clone> Functor<O, A> for DiagramFunctor {
    type Object = Vec<O>;
    type Arrow = Diagram<O, A>;
    type Error = BuildError;

    fn map_object(&mut self, a: &Ob<O>) -> Result<Self::Object, Self::Error> {
        ports(a)
    }

    fn map_arrow(&mut self, f: &Hom<O, A>) -> Result<Self::Arrow, Self::Error> {
        let diagram = match f {
            Hom::Generator { value, dom, codom } | Hom::Linear { value, dom, codom } => {
                Diagram::<O, A>::singleton(value.clone(), ports(dom)?, ports(codom)?)
            }
            Hom::Id(a) => Diagram::<O, A>::identity(&ports(a)?),
            Hom::Compose(fs) => {
                let (first, rest) = fs.split_first().ok_or(BuildError::EmptyComposite)?;
                let mut acc = self.map_arrow(first)?;
                for g in rest {
                    acc = acc.compose(&self.map_arrow(g)?)?;
                }
                acc
            }
            Hom::Otimes(fs) => {
                let mut acc = Diagram::<O, A>::identity(&Diagram::<O, A>::unit());
                for g in fs {
                    acc = acc.tensor(&self.map_arrow(g)?);
                }
                acc
            }
            Hom::Braid(a, b) => Diagram::<O, A>::twist(&ports(a)?, &ports(b)?),
            Hom::Mcopy { ob, n } => Diagram::<O, A>::mcopy(&ports(ob)?, *n),
            Hom::Delete(a) => Diagram::<O, A>::delete(&ports(a)?),
            Hom::Mmerge { ob, n } => Diagram::<O, A>::mmerge(&ports(ob)?, *n),
            Hom::Create(a) => Diagram::<O, A>::create(&ports(a)?),
        };
        Ok(diagram)
    }
}

fn ports<O: Clone>(a: &Ob<O>) -> Result<Vec<O>, BuildError> {
    Ok(a.ports()?)
}

/// Build the wiring diagram of an expression.
///
/// The boundary of the result is the flattened domain and codomain of `f`. Fails if some
/// object is not a flat tensor product of generators, or if a composite is ill-typed.
pub fn build<O: Clone + PartialEq, A: Clone>(
    f: &Hom<O, A>,
) -> Result<WiringDiagram<A, O, ()>, BuildError> {
    let d = DiagramFunctor.map_arrow(f)?;
    log::debug!(
        "built wiring diagram with {} boxes and {} wires",
        d.nboxes(),
        d.nwires()
    );
    Ok(d)
}
