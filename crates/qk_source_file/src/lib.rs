// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

//! Management of Qiskit script sources for parsing and semantic analysis. The main `struct`s here
//! are `SourceFile`, which contains the path to a source file, its text, and the tree produced by
//! the parser, and `SourceString`, which does the same for source that did not come from a file.
//!
//! `report_error` formats error messages using the external crate `ariadne`.

mod api;
mod source_file;

pub use source_file::{ErrorTrait, SourceFile, SourceString, SourceTrait};

pub use api::{
    inner_print_compiler_errors, parse_source_file, parse_source_string, print_compiler_errors,
    report_error,
};
