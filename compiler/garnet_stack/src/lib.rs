//! Stack safety for the recursive corners of the lexer.
//!
//! Most of the lexer is iterative: interpolation nesting lives on an explicit
//! stack whose depth is bounded by [`NestingLimit`]. The one place that still
//! recurses on input shape is the meta/control escape chain (`\M-\C-\M-x`),
//! which runs under [`ensure_sufficient_stack`].
//!
//! # Platform Support
//!
//! - **Native targets**: `stacker` grows the stack on demand.
//! - **WASM targets**: passthrough.

use thiserror::Error;

/// Minimum stack space to keep available (100KB red zone).
const RED_ZONE: usize = 100 * 1024;

/// Stack space to allocate when growing (1MB).
const STACK_PER_RECURSION: usize = 1024 * 1024;

/// Default ceiling for [`NestingLimit`].
pub const DEFAULT_MAX_NESTING: u32 = 10_000;

/// Run `f`, growing the stack first if less than the red zone remains.
#[inline]
#[cfg(not(target_arch = "wasm32"))]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_PER_RECURSION, f)
}

/// WASM version, calls `f` directly.
#[inline]
#[cfg(target_arch = "wasm32")]
pub fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    f()
}

/// Nesting went past the configured ceiling.
#[derive(Copy, Clone, Debug, Error, PartialEq, Eq)]
#[error("nesting depth {depth} exceeds the limit of {limit}")]
pub struct NestingExceeded {
    pub depth: u32,
    pub limit: u32,
}

/// Counter for constructs that nest without recursing on the call stack.
///
/// The interpolation stack grows on the heap, so `stacker` cannot bound it.
/// The lexer enters the limit when it pushes an interpolation frame and
/// leaves it when the matching `}` pops the frame.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NestingLimit {
    depth: u32,
    limit: u32,
}

impl NestingLimit {
    pub const fn new(limit: u32) -> Self {
        NestingLimit { depth: 0, limit }
    }

    /// Record one more level of nesting.
    pub fn enter(&mut self) -> Result<(), NestingExceeded> {
        if self.depth >= self.limit {
            return Err(NestingExceeded {
                depth: self.depth + 1,
                limit: self.limit,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leave one level. Leaving at depth zero is a no-op.
    pub fn exit(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    #[inline]
    pub const fn depth(&self) -> u32 {
        self.depth
    }
}

impl Default for NestingLimit {
    fn default() -> Self {
        NestingLimit::new(DEFAULT_MAX_NESTING)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests;
