//! Stacks of single bits packed into an integer.
//!
//! Three instances track nested context: whether the innermost open
//! construct is a loop head (`cond`), a command's argument list (`cmdarg`),
//! and whether a `->` is waiting for its body at the current paren level
//! (`paren`). Brackets push a clear bit and pop it on close, which is what
//! makes `foo(bar do ... end)` bind the `do` to `bar`.

use thiserror::Error;

/// Popped an empty stack.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("bit stack underflow")]
pub struct BitStackUnderflow;

/// A stack of booleans, top at bit 0.
///
/// Bits pushed beyond 64 levels fall off the bottom; the depth count keeps
/// push/pop pairing honest regardless.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct BitStack {
    bits: u64,
    depth: u32,
}

impl BitStack {
    pub const fn new() -> Self {
        BitStack { bits: 0, depth: 0 }
    }

    #[inline]
    pub fn push(&mut self, bit: bool) {
        self.bits = (self.bits << 1) | u64::from(bit);
        self.depth = self.depth.saturating_add(1);
    }

    /// Remove and return the top bit.
    #[inline]
    pub fn pop(&mut self) -> Result<bool, BitStackUnderflow> {
        if self.depth == 0 {
            return Err(BitStackUnderflow);
        }
        let top = self.top();
        self.bits >>= 1;
        self.depth -= 1;
        Ok(top)
    }

    /// Pop only if something was pushed. Closing brackets use this so a stray
    /// `)` cannot underflow.
    #[inline]
    pub fn pop_if_any(&mut self) {
        if self.depth > 0 {
            self.bits >>= 1;
            self.depth -= 1;
        }
    }

    /// The top bit; `false` on an empty stack.
    #[inline]
    pub const fn top(&self) -> bool {
        self.bits & 1 == 1
    }

    /// Overwrite the top bit. Works at depth zero, where the implicit
    /// bottom level is written.
    #[inline]
    pub fn set_top(&mut self, bit: bool) {
        self.bits = (self.bits & !1) | u64::from(bit);
    }

    #[inline]
    pub const fn depth(&self) -> u32 {
        self.depth
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.depth == 0
    }

    /// Raw packed bits, top at bit 0.
    #[inline]
    pub const fn bits(&self) -> u64 {
        self.bits
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
