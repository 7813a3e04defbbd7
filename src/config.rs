//! Line-oriented `KEY = value` configuration.
//!
//! Blank lines and `#` comments are skipped, the first occurrence of a key
//! wins, and multi-valued keys are split on whitespace.

use std::{
    fmt,
    path::{Path, PathBuf},
    str::FromStr,
};

use crate::{
    engine::SearchParams,
    errors::{SearchError, SearchResult},
    types::ByteBlock,
};

pub const KEY_TARGET: &str = "HEXA_WPA_PASSPHRASE";
pub const KEY_HEX_STRINGS: &str = "HEXA_STRINGS";
pub const KEY_ASCII_STRINGS: &str = "ASCII_STRINGS";
pub const KEY_RADIX64_STRINGS: &str = "RADIX64_STRINGS";
pub const KEY_GROWTH_ROUNDS: &str = "GROWTH_ROUNDS";
pub const KEY_STEPS: &str = "STEPS_PER_CANDIDATE";
pub const KEY_RANDOM_SEED: &str = "RANDOM_SEED";
pub const KEY_MAX_TRIES: &str = "MAX_TRIES";
pub const KEY_BUILTIN_SEEDS: &str = "BUILTIN_SEEDS";

/// Raw key/value pairs in file order.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    path: PathBuf,
    entries: Vec<(String, String)>,
}

impl ConfigFile {
    /// Read and parse a config file.
    ///
    /// # Errors
    ///
    /// `SearchError::ConfigIo` if the file cannot be read, `SearchError::ConfigSyntax`
    /// on the first malformed line.
    pub fn load(path: impl AsRef<Path>) -> SearchResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .map_err(|source| SearchError::ConfigIo { path: path.to_path_buf(), source })?;
        Self::parse(path, &text)
    }

    /// Parse config text; `path` only labels errors.
    ///
    /// # Errors
    ///
    /// `SearchError::ConfigSyntax` for a line without `=`, or with an empty key or value.
    pub fn parse(path: impl AsRef<Path>, text: &str) -> SearchResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries = Vec::new();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let syntax = || SearchError::ConfigSyntax { path: path.clone(), line: idx + 1 };
            let (key, value) = line.split_once('=').ok_or_else(syntax)?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                return Err(syntax());
            }
            entries.push((key.to_owned(), value.to_owned()));
        }
        let cfg = Self { path, entries };
        for (k, v) in &cfg.entries {
            tracing::debug!(path = %cfg.path.display(), "config {k} = '{v}'");
        }
        Ok(cfg)
    }

    /// First value stored under `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }

    /// Whitespace-separated values of the first `key` line; empty when absent.
    #[must_use]
    pub fn get_multiple(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| v.split_whitespace().map(str::to_owned).collect())
            .unwrap_or_default()
    }

    /// Parse the value of `key`, `None` when absent.
    ///
    /// # Errors
    ///
    /// `SearchError::ConfigValue` if the value does not parse as `T`.
    pub fn get_parsed<T: FromStr>(&self, key: &str) -> SearchResult<Option<T>> {
        self.get(key)
            .map(|v| {
                v.parse::<T>()
                    .map_err(|_| SearchError::ConfigValue { key: key.to_owned(), value: v.to_owned() })
            })
            .transpose()
    }

    /// `true`/`false`, `yes`/`no` or `1`/`0`; `None` when absent.
    ///
    /// # Errors
    ///
    /// `SearchError::ConfigValue` for anything else.
    pub fn get_bool(&self, key: &str) -> SearchResult<Option<bool>> {
        let Some(v) = self.get(key) else { return Ok(None) };
        match v.to_ascii_lowercase().as_str() {
            "true" | "yes" | "1" => Ok(Some(true)),
            "false" | "no" | "0" => Ok(Some(false)),
            _ => Err(SearchError::ConfigValue { key: key.to_owned(), value: v.to_owned() }),
        }
    }
}

/// How a seed literal was written in the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedEncoding {
    Hex,
    Ascii,
    Radix64,
}

impl fmt::Display for SeedEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hex => "hexadecimal",
            Self::Ascii => "ascii",
            Self::Radix64 => "radix64",
        })
    }
}

/// A decoded seed literal together with its source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedLiteral {
    pub encoding: SeedEncoding,
    pub text: String,
    pub bytes: ByteBlock,
}

impl SeedLiteral {
    /// # Errors
    ///
    /// Hex and radix64 literals that fail to decode.
    pub fn decode(encoding: SeedEncoding, text: &str) -> SearchResult<Self> {
        let bytes = match encoding {
            SeedEncoding::Hex => ByteBlock::from_hex(text)?,
            SeedEncoding::Ascii => ByteBlock::from_ascii(text),
            SeedEncoding::Radix64 => ByteBlock::from_base64(text)?,
        };
        Ok(Self { encoding, text: text.to_owned(), bytes })
    }
}

/// Everything the search needs, resolved from a config file.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub target: ByteBlock,
    pub literals: Vec<SeedLiteral>,
    pub params: SearchParams,
}

impl SearchConfig {
    /// Config with default parameters and no literals.
    #[must_use]
    pub fn new(target: ByteBlock) -> Self {
        Self { target, literals: Vec::new(), params: SearchParams::default() }
    }

    /// Load and resolve a config file.
    ///
    /// # Errors
    ///
    /// Any I/O, syntax, missing-target, value or literal decoding error.
    pub fn load(path: impl AsRef<Path>) -> SearchResult<Self> {
        Self::from_file(&ConfigFile::load(path)?)
    }

    /// # Errors
    ///
    /// `SearchError::MissingKey` without a target, plus value and decoding errors.
    pub fn from_file(file: &ConfigFile) -> SearchResult<Self> {
        let target_hex = file.get(KEY_TARGET).ok_or(SearchError::MissingKey(KEY_TARGET))?;
        let target = ByteBlock::from_hex(target_hex)?;

        let mut literals = Vec::new();
        for (key, encoding) in [
            (KEY_HEX_STRINGS, SeedEncoding::Hex),
            (KEY_ASCII_STRINGS, SeedEncoding::Ascii),
            (KEY_RADIX64_STRINGS, SeedEncoding::Radix64),
        ] {
            for text in file.get_multiple(key) {
                literals.push(SeedLiteral::decode(encoding, &text)?);
            }
        }

        let defaults = SearchParams::default();
        let params = SearchParams {
            growth_rounds: file.get_parsed(KEY_GROWTH_ROUNDS)?.unwrap_or(defaults.growth_rounds),
            steps_per_candidate: file.get_parsed(KEY_STEPS)?.unwrap_or(defaults.steps_per_candidate),
            rng_seed: file.get_parsed(KEY_RANDOM_SEED)?.unwrap_or(defaults.rng_seed),
            max_tries: file.get_parsed(KEY_MAX_TRIES)?.or(defaults.max_tries),
            builtin_seeds: file.get_bool(KEY_BUILTIN_SEEDS)?.unwrap_or(defaults.builtin_seeds),
            trace_probability: defaults.trace_probability,
        };

        Ok(Self { target, literals, params })
    }
}
