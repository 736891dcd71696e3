//! Tag based scooter construction.
//!
//! Variants are looked up in a registry of constructors keyed by tag. The
//! built-in variants are registered by [`ScooterFactory::default`]; more can
//! be added with [`ScooterFactory::register`] before the factory is shared.

use std::collections::HashMap;

use super::{Scooter, ScooterError, ScooterKind};
use crate::Money;
use crate::model::ScooterId;

/// A named extra parameter value.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Number(f64),
    Text(String),
}

/// Variant specific parameters, by name.
pub type ExtraParams = HashMap<String, ParamValue>;

/// Attributes shared by every variant.
#[derive(Debug, Clone)]
pub struct ScooterSpec {
    pub id: ScooterId,
    pub model: String,
    pub battery_level: f64,
    pub hourly_rate: Money,
}

/// Builds a scooter of one variant from the shared attributes and the extras.
pub type Constructor = fn(ScooterSpec, &ExtraParams) -> Result<Scooter, ScooterError>;

pub struct ScooterFactory {
    constructors: HashMap<&'static str, Constructor>,
}

impl ScooterFactory {
    /// A factory with no variants registered.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) the constructor for `tag`. Tags are matched
    /// case-insensitively, so `tag` should be lowercase.
    pub fn register(&mut self, tag: &'static str, constructor: Constructor) -> &mut Self {
        self.constructors.insert(tag, constructor);
        self
    }

    /// Registered tags, sorted.
    pub fn tags(&self) -> Vec<&'static str> {
        let mut tags: Vec<_> = self.constructors.keys().copied().collect();
        tags.sort_unstable();
        tags
    }

    /// Create a scooter of the variant registered under `tag`.
    pub fn create(
        &self,
        tag: &str,
        spec: ScooterSpec,
        params: &ExtraParams,
    ) -> Result<Scooter, ScooterError> {
        let constructor = self
            .constructors
            .get(tag.to_lowercase().as_str())
            .ok_or_else(|| ScooterError::UnknownVariant(tag.to_string(), self.tags().join(", ")))?;
        constructor(spec, params)
    }
}

impl Default for ScooterFactory {
    fn default() -> Self {
        let mut factory = Self::empty();
        factory
            .register("city", build_city)
            .register("off_road", build_off_road)
            .register("foldable", build_foldable);
        factory
    }
}

fn build_city(spec: ScooterSpec, params: &ExtraParams) -> Result<Scooter, ScooterError> {
    let max_speed = number(params, "city", "max_speed")?;
    build(spec, ScooterKind::City { max_speed })
}

fn build_off_road(spec: ScooterSpec, params: &ExtraParams) -> Result<Scooter, ScooterError> {
    let tire_type = text(params, "off_road", "tire_type")?;
    build(spec, ScooterKind::OffRoad { tire_type })
}

fn build_foldable(spec: ScooterSpec, params: &ExtraParams) -> Result<Scooter, ScooterError> {
    let weight = number(params, "foldable", "weight")?;
    build(spec, ScooterKind::Foldable { weight })
}

fn build(spec: ScooterSpec, kind: ScooterKind) -> Result<Scooter, ScooterError> {
    Scooter::new(
        spec.id,
        spec.model,
        spec.battery_level,
        spec.hourly_rate,
        kind,
    )
}

fn param<'a>(
    params: &'a ExtraParams,
    tag: &str,
    name: &'static str,
) -> Result<&'a ParamValue, ScooterError> {
    params.get(name).ok_or_else(|| ScooterError::MissingParameter {
        tag: tag.to_string(),
        param: name,
    })
}

fn number(params: &ExtraParams, tag: &str, name: &'static str) -> Result<f64, ScooterError> {
    match param(params, tag, name)? {
        ParamValue::Number(value) => Ok(*value),
        ParamValue::Text(_) => Err(ScooterError::InvalidParameter {
            tag: tag.to_string(),
            param: name,
        }),
    }
}

fn text(params: &ExtraParams, tag: &str, name: &'static str) -> Result<String, ScooterError> {
    match param(params, tag, name)? {
        ParamValue::Text(value) => Ok(value.clone()),
        ParamValue::Number(_) => Err(ScooterError::InvalidParameter {
            tag: tag.to_string(),
            param: name,
        }),
    }
}
