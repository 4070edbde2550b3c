// Copyright contributors to the qiskit-script-analyzer project
// SPDX-License-Identifier: Apache-2.0

// It might be nice to put these functions in lib.rs.
// But they are also used in this crate, so we put them here.

use ariadne::Config;
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io;
use std::ops::Range;
use std::path::{Path, PathBuf};

use crate::source_file::{range_to_span, read_source_file, ErrorTrait, SourceFile, SourceString};

/// Read source from `file_path` and parse it to the syntax tree.
pub fn parse_source_file<P: AsRef<Path>>(file_path: P) -> io::Result<SourceFile> {
    let file_path = file_path.as_ref();
    let source = read_source_file(file_path)?;
    let syntax_ast = qk_syntax::parse_text(&source);
    Ok(SourceFile::new(file_path, source, syntax_ast))
}

/// Parse `source` to the syntax tree. `fake_file_path` is only used when printing
/// diagnostics, and defaults to "no file".
pub fn parse_source_string<T: ToString>(source: T, fake_file_path: Option<&str>) -> SourceString {
    let source = source.to_string();
    let syntax_ast = qk_syntax::parse_text(&source);
    let fake_file_path = PathBuf::from(fake_file_path.unwrap_or("no file"));
    SourceString::new(source, fake_file_path, syntax_ast)
}

/// Print compiler errors. Diagnostics include text taken from `source`.
/// The file `info_file_path` is only used for printing error messages. In particular,
/// it does not need to correspond to an existing file.
pub fn inner_print_compiler_errors<T: ErrorTrait>(
    errors: &[T],
    info_file_path: &Path,
    source: &str,
) -> io::Result<()> {
    let file_path_str = info_file_path.to_string_lossy();
    for err in errors.iter() {
        let err_string = err.message();
        let err_span = range_to_span(&err.range(), source);
        report_error(&err_string, &err_span, &file_path_str, source)?;
        eprintln!();
    }
    Ok(())
}

pub fn print_compiler_errors<T: ErrorTrait>(errors: &[T], file_path: &Path) -> io::Result<()> {
    let source = read_source_file(file_path)?;
    inner_print_compiler_errors(errors, file_path, &source)
}

/// `span` is a range of characters, not bytes.
pub fn report_error(
    message: &str,
    span: &Range<usize>,
    file_path: &str,
    source: &str,
) -> io::Result<()> {
    let mut colors = ColorGenerator::new();
    let a = colors.next();
    let offset = span.start;
    Report::build(ReportKind::Error, file_path, offset)
        .with_message(message)
        .with_config(Config::default().with_compact(true))
        .with_label(
            Label::new((file_path, span.clone()))
                .with_message("Near this point")
                .with_color(a),
        )
        .finish()
        .eprint((file_path, Source::from(source)))
}
