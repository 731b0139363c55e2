//! Job configuration and characteristic resolution.
//!
//! A job carries explicit values for some characteristics; anything it leaves
//! unset is asked of a [`Resolver`], which supplies the environment default.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{HarnessError, HarnessResult};

/// Target platform of the compiled harness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    AnyCpu,
    X86,
    X64,
    Arm,
    Arm64,
}

impl Platform {
    pub const ALL: [Platform; 5] = [
        Platform::AnyCpu,
        Platform::X86,
        Platform::X64,
        Platform::Arm,
        Platform::Arm64,
    ];

    /// Lowercase name used by the compiler's `/platform:` flag, `Display`
    /// and `FromStr`.
    pub fn token(self) -> &'static str {
        match self {
            Platform::AnyCpu => "anycpu",
            Platform::X86 => "x86",
            Platform::X64 => "x64",
            Platform::Arm => "arm",
            Platform::Arm64 => "arm64",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

impl FromStr for Platform {
    type Err = HarnessError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Platform::ALL
            .into_iter()
            .find(|p| p.token().eq_ignore_ascii_case(s))
            .ok_or_else(|| HarnessError::Characteristic {
                name: Characteristic::Platform.to_string(),
                reason: format!("unknown platform `{s}`"),
            })
    }
}

/// A named, resolvable configuration value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Characteristic {
    Platform,
    GcServer,
    GcConcurrent,
}

impl fmt::Display for Characteristic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Characteristic::Platform => "Platform",
            Characteristic::GcServer => "GcServer",
            Characteristic::GcConcurrent => "GcConcurrent",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CharacteristicValue {
    Platform(Platform),
    Bool(bool),
}

/// Supplies values for characteristics a job leaves unset.
pub trait Resolver {
    fn resolve(&self, job: &JobConfiguration, characteristic: Characteristic)
    -> Option<CharacteristicValue>;
}

/// Environment defaults: AnyCpu, workstation GC, concurrent GC on.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultResolver;

impl Resolver for DefaultResolver {
    fn resolve(
        &self,
        _job: &JobConfiguration,
        characteristic: Characteristic,
    ) -> Option<CharacteristicValue> {
        Some(match characteristic {
            Characteristic::Platform => CharacteristicValue::Platform(Platform::AnyCpu),
            Characteristic::GcServer => CharacteristicValue::Bool(false),
            Characteristic::GcConcurrent => CharacteristicValue::Bool(true),
        })
    }
}

/// Named characteristics for one benchmark job. Queried read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobConfiguration {
    pub id: String,
    values: BTreeMap<Characteristic, CharacteristicValue>,
}

impl JobConfiguration {
    pub fn new(id: impl Into<String>) -> Self {
        JobConfiguration {
            id: id.into(),
            values: BTreeMap::new(),
        }
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.values
            .insert(Characteristic::Platform, CharacteristicValue::Platform(platform));
        self
    }

    pub fn with_gc_server(mut self, enabled: bool) -> Self {
        self.values
            .insert(Characteristic::GcServer, CharacteristicValue::Bool(enabled));
        self
    }

    pub fn with_gc_concurrent(mut self, enabled: bool) -> Self {
        self.values
            .insert(Characteristic::GcConcurrent, CharacteristicValue::Bool(enabled));
        self
    }

    /// Explicitly set value, if any.
    pub fn get(&self, characteristic: Characteristic) -> Option<CharacteristicValue> {
        self.values.get(&characteristic).copied()
    }

    /// Explicit value first, then the resolver's.
    pub fn resolve_value(
        &self,
        characteristic: Characteristic,
        resolver: &dyn Resolver,
    ) -> HarnessResult<CharacteristicValue> {
        self.get(characteristic)
            .or_else(|| resolver.resolve(self, characteristic))
            .ok_or_else(|| HarnessError::Characteristic {
                name: characteristic.to_string(),
                reason: "no value set and resolver has no default".into(),
            })
    }

    pub fn resolve_platform(&self, resolver: &dyn Resolver) -> HarnessResult<Platform> {
        match self.resolve_value(Characteristic::Platform, resolver)? {
            CharacteristicValue::Platform(p) => Ok(p),
            other => Err(mismatch(Characteristic::Platform, other)),
        }
    }

    pub fn resolve_flag(
        &self,
        characteristic: Characteristic,
        resolver: &dyn Resolver,
    ) -> HarnessResult<bool> {
        match self.resolve_value(characteristic, resolver)? {
            CharacteristicValue::Bool(b) => Ok(b),
            other => Err(mismatch(characteristic, other)),
        }
    }
}

fn mismatch(characteristic: Characteristic, value: CharacteristicValue) -> HarnessError {
    HarnessError::Characteristic {
        name: characteristic.to_string(),
        reason: format!("resolved to a value of the wrong kind: {value:?}"),
    }
}
