//! Diagnostic system for lexer and scope errors.
//!
//! - Error codes for searchability
//! - Clear messages (what went wrong)
//! - Primary range (where it went wrong)
//! - Notes and suggestions (how to fix)
//!
//! Rendering follows the classic compiler layout: `file:line:col`, severity
//! and code, then the offending source line with a caret underline.

mod diagnostic;
pub mod emitter;
mod error_code;
pub mod queue;

pub use diagnostic::{Diagnostic, Label, Severity};
pub use emitter::{ColorMode, TerminalEmitter};
pub use error_code::ErrorCode;
pub use queue::{DiagnosticConfig, DiagnosticQueue};
