//! Gesture template store
//!
//! Templates are recorded by an external tool into a JSON file mapping
//! each gesture name to its four stage keyframes. The library loads the
//! file once, skips entries it cannot use, and is shared read-only
//! between sessions.

use crate::landmarks::{Landmark, SIGNATURE_INDICES};
use anyhow::{Context, Result, bail};
use std::fmt;
use std::fs;
use std::path::Path;

/// Progression stages of a gesture, in match order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    Mid1,
    Mid2,
    End,
}

impl Stage {
    /// JSON key of this stage in the store
    pub fn key(self) -> &'static str {
        match self {
            Stage::Start => "start",
            Stage::Mid1 => "mid1",
            Stage::Mid2 => "mid2",
            Stage::End => "end",
        }
    }

    /// Next stage in the sequence, `None` after `End`
    pub fn next(self) -> Option<Stage> {
        match self {
            Stage::Start => Some(Stage::Mid1),
            Stage::Mid1 => Some(Stage::Mid2),
            Stage::Mid2 => Some(Stage::End),
            Stage::End => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Why a store entry was rejected
#[derive(Debug)]
pub enum TemplateError {
    EmptyName,
    NotAnObject,
    MissingStage(Stage),
    WrongShape { stage: Stage, coords: usize },
    BadNumber(Stage),
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::EmptyName => write!(f, "empty gesture name"),
            TemplateError::NotAnObject => write!(f, "entry is not an object"),
            TemplateError::MissingStage(stage) => write!(f, "missing '{}' keyframe", stage),
            TemplateError::WrongShape { stage, coords } => write!(
                f,
                "'{}' keyframe has {} coordinates, expected {}",
                stage,
                coords,
                SIGNATURE_INDICES.len() * 3
            ),
            TemplateError::BadNumber(stage) => {
                write!(f, "'{}' keyframe contains a non-numeric value", stage)
            }
        }
    }
}

impl std::error::Error for TemplateError {}

/// A recorded gesture: name plus one keyframe per stage
#[derive(Debug, Clone)]
pub struct GestureTemplate {
    pub name: String,
    keyframes: [Vec<Landmark>; 4],
}

impl GestureTemplate {
    pub fn new(name: impl Into<String>, keyframes: [Vec<Landmark>; 4]) -> Self {
        Self {
            name: name.into(),
            keyframes,
        }
    }

    /// Keyframe recorded for a stage
    pub fn keyframe(&self, stage: Stage) -> &[Landmark] {
        &self.keyframes[stage as usize]
    }

    /// Transcript word for this gesture: the name up to the first '_'.
    /// Variant templates of one sign ("hello_1", "hello_2") share a word.
    pub fn word(&self) -> &str {
        self.name.split('_').next().unwrap_or(&self.name)
    }
}

/// Immutable template collection, in store order
#[derive(Debug)]
pub struct GestureLibrary {
    templates: Vec<GestureTemplate>,
}

impl GestureLibrary {
    /// Load the store file, skipping entries that fail to parse.
    ///
    /// Fails when the file is unreadable or nothing usable remains.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading gesture store {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing gesture store {}", path.display()))
    }

    /// Parse store JSON. Entry order in the file is preserved, which keeps
    /// the idle scan deterministic.
    pub fn from_json(raw: &str) -> Result<Self> {
        let root: serde_json::Value = serde_json::from_str(raw)?;
        let Some(entries) = root.as_object() else {
            bail!("store root must be a JSON object");
        };

        let mut templates = Vec::with_capacity(entries.len());
        for (name, value) in entries {
            match parse_template(name, value) {
                Ok(template) => templates.push(template),
                Err(e) => eprintln!("Skipping gesture '{}': {}", name, e),
            }
        }

        if templates.is_empty() {
            bail!("no usable gesture templates in store");
        }
        Ok(Self { templates })
    }

    /// Build a library directly from templates, keeping their order
    pub fn from_templates(templates: Vec<GestureTemplate>) -> Self {
        Self { templates }
    }

    /// Templates in store order
    pub fn iter(&self) -> impl Iterator<Item = &GestureTemplate> {
        self.templates.iter()
    }

    pub fn get(&self, name: &str) -> Option<&GestureTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}

fn parse_template(name: &str, value: &serde_json::Value) -> Result<GestureTemplate, TemplateError> {
    if name.trim().is_empty() {
        return Err(TemplateError::EmptyName);
    }
    let obj = value.as_object().ok_or(TemplateError::NotAnObject)?;

    let fetch = |stage: Stage| -> Result<Vec<Landmark>, TemplateError> {
        let raw = obj
            .get(stage.key())
            .ok_or(TemplateError::MissingStage(stage))?;
        parse_keyframe(stage, raw)
    };

    Ok(GestureTemplate::new(
        name,
        [
            fetch(Stage::Start)?,
            fetch(Stage::Mid1)?,
            fetch(Stage::Mid2)?,
            fetch(Stage::End)?,
        ],
    ))
}

/// Parse one stage keyframe. The recorder writes nested rows of
/// [x, y, z]; a flat coordinate array is accepted as well.
fn parse_keyframe(stage: Stage, value: &serde_json::Value) -> Result<Vec<Landmark>, TemplateError> {
    let Some(items) = value.as_array() else {
        return Err(TemplateError::BadNumber(stage));
    };

    let mut coords = Vec::with_capacity(SIGNATURE_INDICES.len() * 3);
    for item in items {
        match item {
            serde_json::Value::Array(row) => {
                for v in row {
                    coords.push(number(stage, v)?);
                }
            }
            other => coords.push(number(stage, other)?),
        }
    }

    if coords.len() != SIGNATURE_INDICES.len() * 3 {
        return Err(TemplateError::WrongShape {
            stage,
            coords: coords.len(),
        });
    }

    Ok(coords
        .chunks_exact(3)
        .map(|c| Landmark::new(c[0], c[1], c[2]))
        .collect())
}

fn number(stage: Stage, value: &serde_json::Value) -> Result<f32, TemplateError> {
    value
        .as_f64()
        .map(|f| f as f32)
        .ok_or(TemplateError::BadNumber(stage))
}
