//! Endorsement and collection policy expressions.
//!
//! Policies are built as a small expression tree and only turned into the
//! Fabric policy language at the edge, through [`fmt::Display`].

use std::fmt;

/// A boolean policy over organization memberships.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PolicyExpr {
    /// Membership of a single organization, e.g. `'Org1MSP.member'`.
    Single(Principal),
    /// Satisfied if any sub-expression is.
    AnyOf(Vec<PolicyExpr>),
    /// Satisfied if at least `n` sub-expressions are.
    OutOf(usize, Vec<PolicyExpr>),
}

/// The member role of one organization's MSP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Principal {
    /// 1-based organization index.
    pub org: usize,
}

impl fmt::Display for Principal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'Org{}MSP.member'", self.org)
    }
}

impl PolicyExpr {
    pub fn member(org: usize) -> Self {
        Self::Single(Principal { org })
    }

    /// Membership of each organization in `orgs`.
    pub fn members(orgs: impl IntoIterator<Item = usize>) -> Vec<Self> {
        orgs.into_iter().map(Self::member).collect()
    }

    pub fn any_of(orgs: impl IntoIterator<Item = usize>) -> Self {
        Self::AnyOf(Self::members(orgs))
    }

    pub fn out_of(n: usize, orgs: impl IntoIterator<Item = usize>) -> Self {
        Self::OutOf(n, Self::members(orgs))
    }
}

fn write_args(f: &mut fmt::Formatter<'_>, args: &[PolicyExpr]) -> fmt::Result {
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            f.write_str(", ")?;
        }
        write!(f, "{arg}")?;
    }
    Ok(())
}

impl fmt::Display for PolicyExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Single(principal) => write!(f, "{principal}"),
            Self::AnyOf(args) => {
                f.write_str("OR(")?;
                write_args(f, args)?;
                f.write_str(")")
            }
            Self::OutOf(n, args) => {
                write!(f, "OutOf({n}, ")?;
                write_args(f, args)?;
                f.write_str(")")
            }
        }
    }
}
