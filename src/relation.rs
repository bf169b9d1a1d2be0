use crate::Instance;
use std::{fmt, mem::discriminant, rc::Rc};

/// State of a to-one / belongs-to relation property.
///
/// `NotLoaded` ("never evaluated") is distinct from `Absent` ("known to have
/// no related row"): an outer-join miss or a null foreign key produces
/// `Absent`, while a relation the query never touched stays `NotLoaded`.
/// A `Stub` carries only the related primary key, decoded from a bare
/// foreign-key column; it is superseded when a nested join later delivers the
/// full instance, whereas a `Loaded` value is never downgraded.
#[derive(Clone, Default)]
pub enum Relation {
    #[default]
    NotLoaded,
    Absent,
    Stub(Instance),
    Loaded(Instance),
}

impl Relation {
    /// The related instance, if any has been materialized (stub or full).
    pub fn instance(&self) -> Option<&Instance> {
        match self {
            Relation::Stub(v) | Relation::Loaded(v) => Some(v),
            _ => None,
        }
    }
    pub fn is_loaded(&self) -> bool {
        matches!(self, Relation::Loaded(..))
    }
    pub fn is_stub(&self) -> bool {
        matches!(self, Relation::Stub(..))
    }
    /// Whether the query produced any verdict for this relation.
    pub fn is_evaluated(&self) -> bool {
        !matches!(self, Relation::NotLoaded)
    }
}

impl PartialEq for Relation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Relation::Stub(lhs), Relation::Stub(rhs))
            | (Relation::Loaded(lhs), Relation::Loaded(rhs)) => Rc::ptr_eq(lhs, rhs),
            _ => discriminant(self) == discriminant(other),
        }
    }
}

impl fmt::Debug for Relation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Relation::NotLoaded => "Relation::NotLoaded",
            Relation::Absent => "Relation::Absent",
            Relation::Stub(..) => "Relation::Stub(..)",
            Relation::Loaded(..) => "Relation::Loaded(..)",
        })
    }
}
