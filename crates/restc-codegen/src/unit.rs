//! # Output Assembler
//!
//! Builds the complete header for one schema source in memory. Nothing is
//! written here; a unit is either fully assembled or not produced at all.
//!
//! ## Layout
//!
//! 1. Header guard `__<STEM>_HH__`.
//! 2. Fixed includes.
//! 3. `namespace unc {` and `namespace <ns> {`.
//! 4. Each class in file order: constructor, virtual destructor, marshal
//!    accessors and aggregate, unmarshal accessors and aggregate.
//! 5. Namespace closers and the guard closer.

use std::path::{Path, PathBuf};

use restc_core::Direction;
use restc_schema::{ClassDef, Schema};

use crate::contract::{INCLUDES, ROOT_NAMESPACE};
use crate::emit::{ClassEmitter, CodeBuffer};
use crate::error::CodegenError;

/// Ordered output lines for one schema source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedUnit {
    source: PathBuf,
    guard: String,
    lines: Vec<String>,
}

impl GeneratedUnit {
    /// Assemble the header for a validated schema.
    pub fn assemble(schema: &Schema) -> Result<Self, CodegenError> {
        let guard = header_guard(schema.path())?;
        let namespace = schema.namespace();
        let mut out = CodeBuffer::new();

        out.line(format!("#ifndef {guard}"));
        out.line(format!("#define {guard}"));
        out.line("");
        for include in INCLUDES {
            out.line(include);
        }
        out.line("");
        out.line(format!("namespace {ROOT_NAMESPACE} {{"));
        out.line(format!("namespace {namespace} {{"));
        out.line("");

        for class in schema.classes() {
            class_body(schema, class, &mut out)?;
            out.line("");
        }

        out.line(format!("}}  // namespace {namespace}"));
        out.line(format!("}}  // namespace {ROOT_NAMESPACE}"));
        out.line("");
        out.line(format!("#endif  // {guard}"));

        let lines = out.into_lines();
        tracing::debug!(
            path = %schema.path().display(),
            classes = schema.classes().len(),
            lines = lines.len(),
            "assembled unit"
        );
        Ok(Self {
            source: schema.path().to_path_buf(),
            guard,
            lines,
        })
    }

    /// Schema source the unit was generated from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Header guard macro.
    pub fn guard(&self) -> &str {
        &self.guard
    }

    /// Output lines in order, without terminators.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// The unit as file contents, newline-terminated.
    pub fn render(&self) -> String {
        let mut text = self.lines.join("\n");
        text.push('\n');
        text
    }
}

fn class_body(schema: &Schema, class: &ClassDef, out: &mut CodeBuffer) -> Result<(), CodegenError> {
    let name = &class.name;
    out.line(format!("class {name} {{"));
    out.line(" public:");

    let mut body = CodeBuffer::with_depth(1);
    body.line(format!("{name}() {{}}"));
    body.line(format!("virtual ~{name}() {{}}"));
    body.line("");

    let emitter = ClassEmitter::new(schema, class);
    for direction in Direction::both() {
        emitter.emit_direction(direction, &mut body)?;
    }

    let mut lines = body.into_lines();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    for line in lines {
        out.line(line);
    }
    out.line("};");
    Ok(())
}

/// `__<STEM>_HH__` for a source path: the file stem upper-cased, with every
/// character outside `[A-Za-z0-9_]` replaced by `_`.
pub fn header_guard(source: &Path) -> Result<String, CodegenError> {
    let stem = source
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| CodegenError::SourcePath {
            path: source.to_path_buf(),
        })?;
    let sanitized: String = stem
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    Ok(format!("__{sanitized}_HH__"))
}
