//! Pipeline building blocks for texture conversion.
//!
//! The stages themselves are sequenced in [`crate::convert`]; the modules
//! here hold what each stage needs.
//!
//! ## Data Flow
//!
//! ```text
//!            ┌─ .dds ─▶ nvdecompress ─┐
//! input ─────┤                        ├─▶ cuttlefish ─▶ DivinityMachine ─▶ EternalTextureCompressor ─▶ rename
//!            └─ other ────────────────┘    (P.dds)        (P.tga|P.png)        (in place)
//! ```
//!
//! 1. [`input`]: check the path is a regular file, derive its name
//! 2. [`naming`]: target format, transform output extension, final path
//! 3. [`invoke`]: build argument lists and run the tools with output discarded
//! 4. [`cleanup`]: drop guards that delete intermediates on every exit path

pub mod cleanup;
pub mod input;
pub mod invoke;
pub mod naming;
