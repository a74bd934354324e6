//! # Schema Source Reader
//!
//! Loads an INI-style schema source and hands out one named [`Section`] at a
//! time as an ordered key/value mapping.
//!
//! ## Lookup Semantics
//!
//! - `[DEFAULT]` keys are inherited by every section as fallbacks.
//! - Values may reference other keys of the same section (or `DEFAULT`) as
//!   `%(name)s`; `%%` is a literal percent sign.
//! - Each key resolves independently. A key whose interpolation fails is
//!   stored as an error for that key alone; the rest of the section is still
//!   readable, and the error surfaces only when that key is requested.
//! - Reading a section that does not exist fails with
//!   [`ResolutionError::SectionNotFound`].
//!
//! ## Section Roles
//!
//! Roles are inferred from the keys a section defines itself (inherited
//! `DEFAULT` keys do not count): `namespace` marks a code section,
//! `ipc_key_struct` a class section, `type` a field section.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;

use crate::error::{ResolutionError, SchemaError};

/// Name of the section whose keys every other section inherits.
pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Nested `%(name)s` references deeper than this are rejected.
const MAX_INTERPOLATION_DEPTH: usize = 10;

/// Keys only a class section defines. Any one of them makes the section a
/// class, so a class missing the rest fails on the missing key.
pub const CLASS_KEYS: &[&str] = &[
    "name",
    "rest_type",
    "ipc_key_struct",
    "ipc_val_struct",
    "set_sections",
    "get_sections",
    "set_method",
    "get_method",
];

/// The role a section plays in a schema source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SectionRole {
    /// Supplies the target namespace (`namespace`).
    Code,
    /// Describes one output class (any of [`CLASS_KEYS`]).
    Class,
    /// Describes one schema node (`type`).
    Field,
}

impl SectionRole {
    fn markers(&self) -> &'static [&'static str] {
        match self {
            Self::Code => &["namespace"],
            Self::Class => CLASS_KEYS,
            Self::Field => &["type"],
        }
    }

    fn all() -> [SectionRole; 3] {
        [Self::Code, Self::Class, Self::Field]
    }
}

impl std::fmt::Display for SectionRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Code => f.write_str("code"),
            Self::Class => f.write_str("class"),
            Self::Field => f.write_str("field"),
        }
    }
}

#[derive(Debug, Clone, Default)]
struct RawSection {
    entries: IndexMap<String, String>,
}

/// A parsed schema source file.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    path: PathBuf,
    defaults: RawSection,
    sections: IndexMap<String, RawSection>,
}

impl SchemaSource {
    /// Read and parse the schema source at `path`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::Io`] if the file cannot be read, [`SchemaError::Syntax`]
    /// if it is not well-formed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SchemaError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| SchemaError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &text)
    }

    /// Parse schema source text. `path` identifies the source in errors.
    pub fn parse(path: impl Into<PathBuf>, text: &str) -> Result<Self, SchemaError> {
        let path = path.into();
        let mut defaults = RawSection::default();
        let mut sections: IndexMap<String, RawSection> = IndexMap::new();
        let mut current: Option<String> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }

            let syntax = |message: String| SchemaError::Syntax {
                path: path.clone(),
                line: line_no,
                message,
            };

            if let Some(header) = line.strip_prefix('[') {
                let name = header
                    .strip_suffix(']')
                    .ok_or_else(|| syntax(format!("unterminated section header {line:?}")))?
                    .trim();
                if name.is_empty() {
                    return Err(syntax("empty section name".to_string()));
                }
                if name != DEFAULT_SECTION {
                    if sections.contains_key(name) {
                        return Err(syntax(format!("duplicate section [{name}]")));
                    }
                    sections.insert(name.to_string(), RawSection::default());
                }
                current = Some(name.to_string());
                continue;
            }

            let Some(section_name) = current.as_deref() else {
                return Err(syntax(format!("key outside of any section: {line:?}")));
            };

            let split_at = line
                .find(['=', ':'])
                .ok_or_else(|| syntax(format!("expected 'key = value', got {line:?}")))?;
            let key = line[..split_at].trim();
            let value = line[split_at + 1..].trim();
            if key.is_empty() {
                return Err(syntax("empty key".to_string()));
            }

            let target = if section_name == DEFAULT_SECTION {
                &mut defaults
            } else {
                match sections.get_mut(section_name) {
                    Some(s) => s,
                    None => return Err(syntax(format!("unknown section [{section_name}]"))),
                }
            };
            if target.entries.contains_key(key) {
                return Err(syntax(format!(
                    "duplicate key '{key}' in section [{section_name}]"
                )));
            }
            target.entries.insert(key.to_string(), value.to_string());
        }

        tracing::debug!(
            path = %path.display(),
            sections = sections.len(),
            "parsed schema source"
        );

        Ok(Self {
            path,
            defaults,
            sections,
        })
    }

    /// Path this source was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Section names in file order, excluding `DEFAULT`.
    pub fn section_names(&self) -> impl Iterator<Item = &str> {
        self.sections.keys().map(String::as_str)
    }

    /// Whether a section with this name exists.
    pub fn contains(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    /// Role of a section, inferred from the keys it defines itself.
    ///
    /// Returns `Ok(None)` for sections with no role marker and an
    /// [`SchemaError::Invalid`] for sections carrying more than one.
    pub fn role(&self, section: &str) -> Result<Option<SectionRole>, SchemaError> {
        let raw = self.sections.get(section).ok_or_else(|| {
            SchemaError::from(ResolutionError::SectionNotFound {
                path: self.path.clone(),
                section: section.to_string(),
            })
        })?;
        let roles: Vec<SectionRole> = SectionRole::all()
            .into_iter()
            .filter(|r| r.markers().iter().any(|key| raw.entries.contains_key(*key)))
            .collect();
        match roles.as_slice() {
            [] => Ok(None),
            [one] => Ok(Some(*one)),
            many => Err(SchemaError::invalid(
                &self.path,
                section,
                format!(
                    "ambiguous section role: defines markers for {}",
                    many.iter()
                        .map(|r| r.to_string())
                        .collect::<Vec<_>>()
                        .join(" and ")
                ),
            )),
        }
    }

    /// Load every option under `section`, resolving each key independently.
    ///
    /// # Errors
    ///
    /// [`ResolutionError::SectionNotFound`] when the section does not exist.
    /// Per-key failures do not fail the read; they are returned by
    /// [`Section::get`] for the affected key.
    pub fn read(&self, section: &str) -> Result<Section, ResolutionError> {
        let raw = self
            .sections
            .get(section)
            .ok_or_else(|| ResolutionError::SectionNotFound {
                path: self.path.clone(),
                section: section.to_string(),
            })?;

        let mut values = IndexMap::new();
        for key in raw.entries.keys() {
            values.insert(key.clone(), self.lookup(raw, section, key));
        }
        for key in self.defaults.entries.keys() {
            if !values.contains_key(key) {
                values.insert(key.clone(), self.lookup(raw, section, key));
            }
        }

        tracing::trace!(section, keys = values.len(), "read section");

        Ok(Section {
            path: self.path.clone(),
            name: section.to_string(),
            values,
        })
    }

    fn lookup(&self, raw: &RawSection, section: &str, key: &str) -> Result<String, ResolutionError> {
        let interpolation_error = |reason: String| ResolutionError::Interpolation {
            path: self.path.clone(),
            section: section.to_string(),
            key: key.to_string(),
            reason,
        };
        let value = self.raw_value(raw, key).ok_or_else(|| ResolutionError::KeyNotFound {
            path: self.path.clone(),
            section: section.to_string(),
            key: key.to_string(),
        })?;
        self.interpolate(raw, value, 1).map_err(interpolation_error)
    }

    fn raw_value<'a>(&'a self, raw: &'a RawSection, key: &str) -> Option<&'a str> {
        raw.entries
            .get(key)
            .or_else(|| self.defaults.entries.get(key))
            .map(String::as_str)
    }

    fn interpolate(&self, raw: &RawSection, value: &str, depth: usize) -> Result<String, String> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(format!(
                "interpolation deeper than {MAX_INTERPOLATION_DEPTH} levels (recursive reference?)"
            ));
        }

        let mut out = String::with_capacity(value.len());
        let mut rest = value;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            let tail = &rest[pos + 1..];
            if let Some(after) = tail.strip_prefix('%') {
                out.push('%');
                rest = after;
            } else if let Some(body) = tail.strip_prefix('(') {
                let close = body
                    .find(")s")
                    .ok_or_else(|| format!("malformed reference in {value:?}"))?;
                let name = &body[..close];
                let referenced = self
                    .raw_value(raw, name)
                    .ok_or_else(|| format!("bad reference '%({name})s': no such key"))?;
                out.push_str(&self.interpolate(raw, referenced, depth + 1)?);
                rest = &body[close + 2..];
            } else {
                return Err(format!("'%' must be followed by '%' or '(' in {value:?}"));
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

/// One section's resolved options, in file order (own keys, then inherited).
#[derive(Debug, Clone)]
pub struct Section {
    path: PathBuf,
    name: String,
    values: IndexMap<String, Result<String, ResolutionError>>,
}

impl Section {
    /// Section name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Source path the section came from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Keys present in this section, including inherited ones.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    /// Look up an optional key.
    ///
    /// Returns `Ok(None)` when the key is absent and the stored error when
    /// the key is present but failed to resolve.
    pub fn get(&self, key: &str) -> Result<Option<&str>, ResolutionError> {
        match self.values.get(key) {
            None => Ok(None),
            Some(Ok(v)) => Ok(Some(v.as_str())),
            Some(Err(e)) => Err(e.clone()),
        }
    }

    /// Look up a required key.
    pub fn require(&self, key: &str) -> Result<&str, ResolutionError> {
        self.get(key)?.ok_or_else(|| ResolutionError::KeyNotFound {
            path: self.path.clone(),
            section: self.name.clone(),
            key: key.to_string(),
        })
    }
}

/// Split a comma-separated list, trimming entries and dropping empty ones.
pub fn split_list(value: &str) -> Vec<&str> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}
