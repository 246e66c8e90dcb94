use std::fmt::{Display, Formatter};
use std::io::Write;

use num_enum::{IntoPrimitive, TryFromPrimitive};
use rime_error::{RimeResult, rime_err};
use rime_literal::StructLike;

use crate::{AvroRecordWriter, AvroSchema};

/// File metadata key holding the table format version.
pub const FORMAT_VERSION_KEY: &str = "format-version";
/// File metadata key holding the version of the library that wrote the file.
pub const RIME_VERSION_KEY: &str = "rime-version";

/// The table format version written into every file's metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, IntoPrimitive, TryFromPrimitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FormatVersion {
    V1 = 1,
    V2 = 2,
    V3 = 3,
}

// A `#[default]` variant would make `TryFromPrimitive` accept every value.
#[allow(clippy::derivable_impls)]
impl Default for FormatVersion {
    fn default() -> Self {
        Self::V2
    }
}

impl FormatVersion {
    /// Parse the decimal string stored in file metadata.
    pub fn parse(value: &str) -> RimeResult<Self> {
        let number: u8 = value
            .trim()
            .parse()
            .map_err(|_| rime_err!("Invalid format version '{value}'"))?;
        Self::try_from(number).map_err(|_| rime_err!("Unsupported format version {number}"))
    }
}

impl Display for FormatVersion {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", u8::from(*self))
    }
}

/// The version of the library writing a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildInfo {
    version: String,
}

impl BuildInfo {
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
        }
    }

    /// The version this crate was compiled as.
    pub fn from_build() -> Self {
        Self::new(env!("CARGO_PKG_VERSION"))
    }

    pub fn version(&self) -> &str {
        &self.version
    }
}

impl Display for BuildInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.version)
    }
}

/// Configuration for writing records into an Avro container file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AvroWriteOptions {
    format_version: FormatVersion,
    build_info: Option<BuildInfo>,
    extra_metadata: Vec<(String, String)>,
}

impl AvroWriteOptions {
    /// Set the format version recorded under `format-version`.
    pub fn with_format_version(mut self, format_version: FormatVersion) -> Self {
        self.format_version = format_version;
        self
    }

    /// Record the writing library's version under `rime-version`.
    pub fn with_build_info(mut self, build_info: BuildInfo) -> Self {
        self.build_info = Some(build_info);
        self
    }

    /// Add a further string entry to the file metadata.
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_metadata.push((key.into(), value.into()));
        self
    }

    pub fn format_version(&self) -> FormatVersion {
        self.format_version
    }

    pub fn build_info(&self) -> Option<&BuildInfo> {
        self.build_info.as_ref()
    }

    pub fn extra_metadata(&self) -> &[(String, String)] {
        &self.extra_metadata
    }

    /// Write every row of `rows` to `sink` as one deflate-compressed Avro container.
    ///
    /// On success the flushed sink is returned. On failure the sink is dropped and whatever was
    /// written to it must be discarded.
    pub fn write<'r, W, R, I>(&self, schema: &AvroSchema, sink: W, rows: I) -> RimeResult<W>
    where
        W: Write,
        R: StructLike + ?Sized + 'r,
        I: IntoIterator<Item = &'r R>,
    {
        let mut writer = AvroRecordWriter::try_new(schema, self, sink)?;
        for row in rows {
            writer.append(row)?;
        }
        writer.finish()
    }
}
