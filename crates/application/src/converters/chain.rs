//! Cascading text-to-type converter chain
//!
//! Converters are tried in order; the first one accepting the target type
//! performs the conversion. Composite converters (optionals, lists) convert
//! their elements through the chain again.

use std::fmt;
use std::sync::Arc;

use stepwise_domain::{Parameter, TargetType, Value};

use crate::error::{ResolutionError, ResolutionResult};
use crate::ports::{SilentStepMonitor, StepMonitor};

const LIST_SEPARATOR: char = ',';

/// Converts resolved text to one family of target types.
pub trait ParameterConverter: Send + Sync {
    /// Name reported to the step monitor.
    fn name(&self) -> &str;

    /// Returns true if this converter handles `target`.
    fn accepts(&self, target: &TargetType) -> bool;

    /// Converts `text` to `target`.
    ///
    /// # Errors
    /// Returns `ResolutionError::Conversion` if the text is not a valid
    /// representation of the target type.
    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        chain: &ParameterConverters,
    ) -> ResolutionResult<Parameter>;

    /// Composite converters delegate element conversion back to the chain
    /// and are not reported to the step monitor themselves.
    fn is_composite(&self) -> bool {
        false
    }
}

/// The ordered converter chain.
#[derive(Clone)]
pub struct ParameterConverters {
    converters: Vec<Arc<dyn ParameterConverter>>,
    monitor: Arc<dyn StepMonitor>,
}

impl ParameterConverters {
    /// Creates a chain with the built-in converters.
    #[must_use]
    pub fn new(monitor: Arc<dyn StepMonitor>) -> Self {
        Self {
            converters: vec![
                Arc::new(NumberConverter),
                Arc::new(BooleanConverter),
                Arc::new(EnumConverter),
                Arc::new(StringConverter),
                Arc::new(ObjectConverter),
                Arc::new(OptionalConverter),
                Arc::new(ListConverter),
            ],
            monitor,
        }
    }

    /// Replaces the step monitor.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<dyn StepMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Adds a converter in front of the existing ones.
    #[must_use]
    pub fn add_converter(mut self, converter: impl ParameterConverter + 'static) -> Self {
        self.converters.insert(0, Arc::new(converter));
        self
    }

    /// Converts `text` to `target` with the first accepting converter.
    ///
    /// # Errors
    /// Returns `ResolutionError::NoConverter` if no converter accepts the
    /// target, or the error of the converter that failed.
    pub fn convert(&self, text: &str, target: &TargetType) -> ResolutionResult<Parameter> {
        let converter = self
            .converters
            .iter()
            .find(|converter| converter.accepts(target))
            .ok_or_else(|| ResolutionError::NoConverter(target.clone()))?;

        let converted = converter.convert(text, target, self)?;
        if !converter.is_composite() {
            self.monitor
                .converted_value_of_type(text, target, &converted, converter.name());
        }
        Ok(converted)
    }
}

impl Default for ParameterConverters {
    fn default() -> Self {
        Self::new(Arc::new(SilentStepMonitor))
    }
}

impl fmt::Debug for ParameterConverters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterConverters")
            .field(
                "converters",
                &self.converters.iter().map(|c| c.name()).collect::<Vec<_>>(),
            )
            .finish_non_exhaustive()
    }
}

/// Integers and floating point numbers.
struct NumberConverter;

impl ParameterConverter for NumberConverter {
    fn name(&self) -> &str {
        "NumberConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::Integer | TargetType::Float)
    }

    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        _: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        let trimmed = text.trim();
        let value = if matches!(target, TargetType::Integer) {
            trimmed
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|e| ResolutionError::conversion(text, target, e.to_string()))?
        } else {
            trimmed
                .parse::<f64>()
                .map(Value::Float)
                .map_err(|e| ResolutionError::conversion(text, target, e.to_string()))?
        };
        Ok(Parameter::Value(value))
    }
}

struct BooleanConverter;

impl ParameterConverter for BooleanConverter {
    fn name(&self) -> &str {
        "BooleanConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::Boolean)
    }

    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        _: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        let trimmed = text.trim();
        if trimmed.eq_ignore_ascii_case("true") {
            Ok(Parameter::Value(Value::Bool(true)))
        } else if trimmed.eq_ignore_ascii_case("false") {
            Ok(Parameter::Value(Value::Bool(false)))
        } else {
            Err(ResolutionError::conversion(
                text,
                target,
                "expected 'true' or 'false'",
            ))
        }
    }
}

/// Enumeration constants: exact name first, then a case-insensitive match
/// with `-` and spaces read as `_`.
struct EnumConverter;

impl EnumConverter {
    fn normalize(name: &str) -> String {
        name.trim().replace(['-', ' '], "_").to_uppercase()
    }
}

impl ParameterConverter for EnumConverter {
    fn name(&self) -> &str {
        "EnumConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::Enum { .. })
    }

    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        _: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        let TargetType::Enum { variants, .. } = target else {
            return Err(ResolutionError::NoConverter(target.clone()));
        };
        let trimmed = text.trim();
        let normalized = Self::normalize(trimmed);
        variants
            .iter()
            .find(|variant| *variant == trimmed)
            .or_else(|| {
                variants
                    .iter()
                    .find(|variant| Self::normalize(variant) == normalized)
            })
            .map(|variant| Parameter::Value(Value::from(variant.as_str())))
            .ok_or_else(|| {
                ResolutionError::conversion(
                    text,
                    target,
                    format!("expected one of [{}]", variants.join(", ")),
                )
            })
    }
}

/// Text, with line breaks normalized to `\n`.
struct StringConverter;

impl ParameterConverter for StringConverter {
    fn name(&self) -> &str {
        "StringConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::String)
    }

    fn convert(
        &self,
        text: &str,
        _: &TargetType,
        _: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        let normalized = text.replace("\r\n", "\n").replace('\r', "\n");
        Ok(Parameter::Value(Value::String(normalized)))
    }
}

/// Hands the text over unchanged.
struct ObjectConverter;

impl ParameterConverter for ObjectConverter {
    fn name(&self) -> &str {
        "ObjectConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::Object)
    }

    fn convert(
        &self,
        text: &str,
        _: &TargetType,
        _: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        Ok(Parameter::Value(Value::from(text)))
    }
}

/// Blank text is an empty optional; anything else converts the inner type.
struct OptionalConverter;

impl ParameterConverter for OptionalConverter {
    fn name(&self) -> &str {
        "OptionalConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::Optional(_))
    }

    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        chain: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        let TargetType::Optional(inner) = target else {
            return Err(ResolutionError::NoConverter(target.clone()));
        };
        if text.trim().is_empty() {
            return Ok(Parameter::Optional(None));
        }
        let value = chain.convert(text, inner)?;
        Ok(Parameter::Optional(Some(Box::new(value))))
    }

    fn is_composite(&self) -> bool {
        true
    }
}

/// Comma separated elements; blank text is an empty list.
struct ListConverter;

impl ParameterConverter for ListConverter {
    fn name(&self) -> &str {
        "ListConverter"
    }

    fn accepts(&self, target: &TargetType) -> bool {
        matches!(target, TargetType::List(_))
    }

    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        chain: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        let TargetType::List(inner) = target else {
            return Err(ResolutionError::NoConverter(target.clone()));
        };
        if text.trim().is_empty() {
            return Ok(Parameter::List(Vec::new()));
        }
        text.split(LIST_SEPARATOR)
            .map(|item| chain.convert(item.trim(), inner))
            .collect::<ResolutionResult<Vec<_>>>()
            .map(Parameter::List)
    }

    fn is_composite(&self) -> bool {
        true
    }
}

type ConvertFn = dyn Fn(&str, &TargetType) -> ResolutionResult<Parameter> + Send + Sync;
type AcceptsFn = dyn Fn(&TargetType) -> bool + Send + Sync;

/// A converter assembled from closures, for custom target types such as
/// sub-steps.
pub struct FunctionalConverter {
    name: String,
    accepts: Box<AcceptsFn>,
    convert: Box<ConvertFn>,
}

impl FunctionalConverter {
    /// Creates a converter from an acceptance predicate and a conversion.
    pub fn new<A, C>(name: impl Into<String>, accepts: A, convert: C) -> Self
    where
        A: Fn(&TargetType) -> bool + Send + Sync + 'static,
        C: Fn(&str, &TargetType) -> ResolutionResult<Parameter> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            accepts: Box::new(accepts),
            convert: Box::new(convert),
        }
    }

    /// Creates a converter for exactly one target type.
    pub fn for_target<C>(name: impl Into<String>, target: TargetType, convert: C) -> Self
    where
        C: Fn(&str) -> ResolutionResult<Parameter> + Send + Sync + 'static,
    {
        Self::new(
            name,
            move |candidate| *candidate == target,
            move |text, _| convert(text),
        )
    }
}

impl ParameterConverter for FunctionalConverter {
    fn name(&self) -> &str {
        &self.name
    }

    fn accepts(&self, target: &TargetType) -> bool {
        (self.accepts)(target)
    }

    fn convert(
        &self,
        text: &str,
        target: &TargetType,
        _: &ParameterConverters,
    ) -> ResolutionResult<Parameter> {
        (self.convert)(text, target)
    }
}
