//! Placeholder-aware parameter conversion
//!
//! Every step argument passes through [`ParameterConvertersDecorator`]
//! before it reaches a step: placeholders are resolved first, and only the
//! resolved result is converted to the target type.

use stepwise_domain::{DataWrapper, Parameter, TargetType, Value};
use tracing::trace;

use super::chain::ParameterConverters;
use super::table::ExamplesTableConverter;
use crate::error::ResolutionResult;
use crate::placeholder::PlaceholderResolver;

/// Resolves placeholders in raw step arguments and converts the result.
#[derive(Clone)]
pub struct ParameterConvertersDecorator {
    converters: ParameterConverters,
    placeholders: PlaceholderResolver,
    tables: ExamplesTableConverter,
}

impl ParameterConvertersDecorator {
    /// Creates a decorator over the base chain.
    #[must_use]
    pub const fn new(
        converters: ParameterConverters,
        placeholders: PlaceholderResolver,
        tables: ExamplesTableConverter,
    ) -> Self {
        Self {
            converters,
            placeholders,
            tables,
        }
    }

    /// Converts `raw` to `target`.
    ///
    /// - sub-steps go straight to the base chain, unresolved;
    /// - `Null` stays null;
    /// - a non-string value the target already accepts is returned as-is;
    /// - otherwise the text is resolved, and a null or already-accepted
    ///   non-string result is returned as-is;
    /// - tables and data payloads are built from the resolved value;
    /// - everything else is converted from the resolved text by the chain.
    ///
    /// # Errors
    /// Propagates resolution failures and conversion failures of the chain.
    pub fn convert(&self, raw: &Value, target: &TargetType) -> ResolutionResult<Parameter> {
        if matches!(target, TargetType::SubSteps) {
            return self.converters.convert(&raw.to_string(), target);
        }
        if raw.is_null() {
            return Ok(Parameter::null());
        }
        if let Some(parameter) = Self::accept_as_is(raw, target)? {
            return Ok(parameter);
        }

        let resolved = self.placeholders.resolve(&raw.to_string())?;
        trace!(target_type = %target, resolved = %resolved, "Resolved step parameter");
        if resolved.is_null() {
            return Ok(Parameter::null());
        }
        if let Some(parameter) = Self::accept_as_is(&resolved, target)? {
            return Ok(parameter);
        }

        match target {
            TargetType::ExamplesTable => self
                .tables
                .convert(&resolved.to_string())
                .map(Parameter::Table),
            TargetType::DataWrapper => Ok(Parameter::Data(DataWrapper::try_from(resolved)?)),
            _ => self.converters.convert(&resolved.to_string(), target),
        }
    }

    /// Returns the parameter for a non-string value that needs no
    /// conversion.
    fn accept_as_is(value: &Value, target: &TargetType) -> ResolutionResult<Option<Parameter>> {
        if value.is_string() {
            return Ok(None);
        }
        match (value, target) {
            (Value::Bytes(_), TargetType::DataWrapper) => {
                Ok(Some(Parameter::Data(DataWrapper::try_from(value.clone())?)))
            }
            _ if target.accepts(value) => Ok(Some(Parameter::Value(value.clone()))),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::converters::FunctionalConverter;
    use crate::error::ResolutionError;
    use crate::expression::{ExpressionAdaptor, FunctionalExpressionProcessor};
    use crate::ports::{ExpressionProcessor, StoryLoader, StoryLoaderError, VariableStore};
    use crate::variable_resolver::{DynamicVariables, VariableResolver};
    use indexmap::IndexMap;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use stepwise_domain::SubSteps;

    struct NoResources;

    impl StoryLoader for NoResources {
        fn load_resource_as_text(&self, path: &str) -> Result<String, StoryLoaderError> {
            Err(StoryLoaderError::NotFound(path.to_string()))
        }
    }

    /// Counts store lookups.
    struct CountingStore {
        values: HashMap<String, Value>,
        lookups: AtomicUsize,
    }

    impl VariableStore for CountingStore {
        fn get(&self, name: &str) -> Option<Value> {
            self.lookups.fetch_add(1, Ordering::SeqCst);
            self.values.get(name).cloned()
        }
    }

    fn decorator_with(
        entries: &[(&str, Value)],
        converters: ParameterConverters,
    ) -> (ParameterConvertersDecorator, Arc<CountingStore>) {
        let store = Arc::new(CountingStore {
            values: entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), v.clone()))
                .collect(),
            lookups: AtomicUsize::new(0),
        });
        let variables = VariableResolver::new(
            store.clone() as Arc<dyn VariableStore>,
            Arc::new(DynamicVariables::new()),
            Arc::new(false),
        );
        let bytes = FunctionalExpressionProcessor::fallible("bytes", |args| {
            Ok(Value::from(args[0].clone().into_bytes()))
        });
        let processors: Vec<Arc<dyn ExpressionProcessor>> = vec![Arc::new(bytes)];
        let placeholders = PlaceholderResolver::new(
            variables,
            ExpressionAdaptor::new(processors, Arc::new(false)),
        );
        let tables = ExamplesTableConverter::new(Arc::new(NoResources), placeholders.clone());
        (
            ParameterConvertersDecorator::new(converters, placeholders, tables),
            store,
        )
    }

    fn decorator(entries: &[(&str, Value)]) -> ParameterConvertersDecorator {
        decorator_with(entries, ParameterConverters::default()).0
    }

    #[test]
    fn test_text_is_resolved_then_converted() {
        let decorator = decorator(&[("answer", Value::from("42"))]);
        assert_eq!(
            decorator
                .convert(&Value::from("${answer}"), &TargetType::Integer)
                .unwrap(),
            Parameter::Value(Value::Integer(42))
        );
    }

    #[test]
    fn test_null_stays_null() {
        let decorator = decorator(&[]);
        assert!(decorator
            .convert(&Value::Null, &TargetType::Integer)
            .unwrap()
            .is_null());
        assert!(decorator
            .convert(&Value::from("#{null}"), &TargetType::String)
            .unwrap()
            .is_null());
    }

    #[test]
    fn test_accepted_raw_value_skips_resolution() {
        let (decorator, store) = decorator_with(&[], ParameterConverters::default());
        assert_eq!(
            decorator
                .convert(&Value::Integer(7), &TargetType::Integer)
                .unwrap(),
            Parameter::Value(Value::Integer(7))
        );
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_unaccepted_raw_value_is_converted_from_text() {
        let decorator = decorator(&[]);
        assert_eq!(
            decorator
                .convert(&Value::Integer(7), &TargetType::String)
                .unwrap(),
            Parameter::Value(Value::from("7"))
        );
    }

    #[test]
    fn test_resolved_structure_is_returned_as_is() {
        let map = Value::from(IndexMap::from([("k".to_string(), Value::from("v"))]));
        let decorator = decorator(&[("map", map.clone())]);
        assert_eq!(
            decorator
                .convert(&Value::from("${map}"), &TargetType::Object)
                .unwrap(),
            Parameter::Value(map)
        );
    }

    #[test]
    fn test_blank_optional() {
        let decorator = decorator(&[]);
        assert_eq!(
            decorator
                .convert(&Value::from(" "), &TargetType::optional(TargetType::Integer))
                .unwrap(),
            Parameter::Optional(None)
        );
    }

    #[test]
    fn test_data_wrapper_from_text_and_bytes() {
        let decorator = decorator(&[("payload", Value::from("text"))]);
        let from_text = decorator
            .convert(&Value::from("${payload}"), &TargetType::DataWrapper)
            .unwrap();
        assert_eq!(from_text.as_data().unwrap().bytes(), b"text");

        let from_bytes = decorator
            .convert(&Value::from(vec![0xff_u8]), &TargetType::DataWrapper)
            .unwrap();
        assert_eq!(from_bytes.as_data().unwrap().bytes(), &[0xff_u8]);

        let from_expression = decorator
            .convert(&Value::from("#{bytes(raw)}"), &TargetType::DataWrapper)
            .unwrap();
        assert_eq!(from_expression.as_data().unwrap().bytes(), b"raw");
    }

    #[test]
    fn test_data_wrapper_rejects_other_types() {
        let decorator = decorator(&[("flag", Value::Bool(true))]);
        let error = decorator
            .convert(&Value::from("${flag}"), &TargetType::DataWrapper)
            .unwrap_err();
        assert!(matches!(error, ResolutionError::Domain(_)));
    }

    #[test]
    fn test_table_target() {
        let decorator = decorator(&[("x", Value::from("1"))]);
        let parameter = decorator
            .convert(&Value::from("|a|\n|${x}|"), &TargetType::ExamplesTable)
            .unwrap();
        assert_eq!(parameter.as_table().unwrap().row(0).unwrap()["a"], "1");
    }

    #[test]
    fn test_sub_steps_bypass_resolution() {
        let converters = ParameterConverters::default().add_converter(
            FunctionalConverter::for_target("SubStepsConverter", TargetType::SubSteps, |text| {
                Ok(Parameter::SubSteps(SubSteps::new(text, || Ok(()))))
            }),
        );
        let (decorator, store) = decorator_with(&[("x", Value::from("1"))], converters);
        let parameter = decorator
            .convert(&Value::from("|step ${x}|"), &TargetType::SubSteps)
            .unwrap();
        match parameter {
            Parameter::SubSteps(steps) => assert_eq!(steps.source(), "|step ${x}|"),
            other => panic!("unexpected parameter: {other:?}"),
        }
        assert_eq!(store.lookups.load(Ordering::SeqCst), 0);
    }
}
