//! Interned names with dense, insertion-ordered indices.

use lasso::Rodeo;

/// A handle to a name interned in an [`Interner`].
///
/// Handles are handed out densely starting at zero, in the order names are
/// first interned, so the raw value doubles as a stable table index.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Ident(u32);

impl Ident {
    /// Returns the raw `u32` index of this identifier.
    pub fn as_raw(self) -> u32 {
        self.0
    }
}

// SAFETY: `Ident` wraps a `u32` which is always a valid `usize` on 32-bit and
// 64-bit platforms. `try_from_usize` rejects values that don't fit in `u32`.
unsafe impl lasso::Key for Ident {
    fn into_usize(self) -> usize {
        self.0 as usize
    }

    fn try_from_usize(int: usize) -> Option<Self> {
        u32::try_from(int).ok().map(Ident)
    }
}

/// Single-owner string interner backed by [`lasso::Rodeo`].
///
/// Used for name tables whose index order is part of the output, such as the
/// tile-type name table. The owner of a compile run holds the only
/// `&mut` handle, so no locking is involved.
#[derive(Debug)]
pub struct Interner {
    rodeo: Rodeo<Ident>,
}

impl Interner {
    /// Creates a new empty interner.
    pub fn new() -> Self {
        Self {
            rodeo: Rodeo::new(),
        }
    }

    /// Interns a string, returning its [`Ident`]. If the string was already
    /// interned, returns the existing identifier without allocating.
    pub fn get_or_intern(&mut self, s: &str) -> Ident {
        self.rodeo.get_or_intern(s)
    }

    /// Returns the number of distinct interned strings.
    pub fn len(&self) -> usize {
        self.rodeo.len()
    }

    /// Returns `true` if nothing has been interned yet.
    pub fn is_empty(&self) -> bool {
        self.rodeo.is_empty()
    }

    /// Iterates the interned strings in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Ident, &str)> {
        self.rodeo.iter()
    }
}

impl Default for Interner {
    fn default() -> Self {
        Self::new()
    }
}
