//! External linkage names for resolved methods.
//!
//! A pure function of a method's resolved signature: the code generator uses
//! it to name symbols so that overloads across classes never collide.

pub mod mangle;
