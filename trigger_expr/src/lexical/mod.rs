//! Pass 1: constant scanners
//!
//! Small pure scanners for everything that can stand as an operand: numbers,
//! `{host:key.func(params)}` function macros, and built-in, user and LLD macro
//! references. Each takes the source and a byte offset and reports what it found
//! together with the offset just past it. The syntax pass drives them.

pub mod charset;
pub mod constant;
pub mod function_macro;
pub mod item_key;
pub mod macro_ref;
pub mod number;
pub mod params;

pub use constant::{parse_constant, ConstantScan};
pub use function_macro::{
    parse_function_macro, FunctionMacro, FunctionMacroFault, FunctionMacroMismatch,
};
pub use item_key::{validate_item_key, ItemKeyError};
pub use macro_ref::{is_lld_macro, is_user_macro};
pub use number::{parse_number, Number};
pub use params::{scan_function_params, ParamScanError, ParamState};
