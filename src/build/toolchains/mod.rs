//! Toolchain descriptors
//!
//! Only the Windows provider consults toolchains; on Unix-like hosts the
//! compilers are whatever CMake finds on PATH.

pub mod msvc;

pub use msvc::{ToolchainDescriptor, ToolchainRegistry, DEFAULT_TOOLCHAIN};
