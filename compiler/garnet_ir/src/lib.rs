//! Garnet IR - types shared between the lexer and its consumers.
//!
//! - Spans (byte offsets) and source ranges (line/column pairs)
//! - Names for interned identifiers
//! - Tokens: kind, semantic value, location, flags
//!
//! Types that contain floats store them as u64 bits for Hash compatibility.
//! Identifiers use interned [`Name`] for O(1) equality.

/// Compile-time assertion that a type has a specific size.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod interner;
mod name;
mod span;
mod token;

pub use interner::{InternError, SharedInterner, StringInterner, StringLookup};
pub use name::Name;
pub use span::{SourcePos, SourceRange, Span, SpanError};
pub use token::{NumberSuffix, NumericValue, Token, TokenFlags, TokenKind, TokenValue};
