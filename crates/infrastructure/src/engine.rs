//! Engine assembly
//!
//! Wires the scoped variable store, the built-in dynamic variables and
//! string functions, the converter chain and the placeholder-aware
//! decorator from an [`EngineConfig`].

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use stepwise_application::ports::{
    DynamicVariable, ExecutionMode, ExpressionProcessor, StepMonitor, StoryLoader, VariableStore,
};
use stepwise_application::{
    DynamicVariables, ExamplesTableConverter, ExpressionAdaptor, ParameterConverter,
    ParameterConverters, ParameterConvertersDecorator, PlaceholderResolver, ResolutionResult,
    VariableResolver, string_expression_processors,
};
use stepwise_domain::{Parameter, TargetType, Value};
use tracing::info;

use crate::adapters::TracingStepMonitor;
use crate::config::EngineConfig;
use crate::persistence::{FileStoryLoader, SharedVariables};

/// The assembled resolution pipeline.
#[derive(Clone)]
pub struct Engine {
    variables: SharedVariables,
    dry_run: Arc<AtomicBool>,
    placeholders: PlaceholderResolver,
    decorator: ParameterConvertersDecorator,
}

impl Engine {
    /// Creates an engine with the default collaborators.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::builder(config.clone()).build()
    }

    /// Starts assembling an engine with custom collaborators.
    #[must_use]
    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder::new(config)
    }

    /// Returns the variable store shared with step code.
    #[must_use]
    pub const fn variables(&self) -> &SharedVariables {
        &self.variables
    }

    /// Switches dry-run mode on or off.
    pub fn set_dry_run(&self, dry_run: bool) {
        self.dry_run.store(dry_run, Ordering::Relaxed);
    }

    /// Returns true if the engine is in dry-run mode.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        self.dry_run.is_dry_run()
    }

    /// Resolves every placeholder in `text`.
    ///
    /// # Errors
    /// See [`PlaceholderResolver::resolve`].
    pub fn resolve(&self, text: &str) -> ResolutionResult<Value> {
        self.placeholders.resolve(text)
    }

    /// Resolves and converts a raw step argument.
    ///
    /// # Errors
    /// See [`ParameterConvertersDecorator::convert`].
    pub fn convert(&self, raw: &Value, target: &TargetType) -> ResolutionResult<Parameter> {
        self.decorator.convert(raw, target)
    }
}

/// Collects custom collaborators before building an [`Engine`].
pub struct EngineBuilder {
    config: EngineConfig,
    monitor: Arc<dyn StepMonitor>,
    story_loader: Option<Arc<dyn StoryLoader>>,
    processors: Vec<Arc<dyn ExpressionProcessor>>,
    dynamic_variables: DynamicVariables,
    converters: ParameterConverters,
}

impl EngineBuilder {
    fn new(config: EngineConfig) -> Self {
        Self {
            config,
            monitor: Arc::new(TracingStepMonitor::new()),
            story_loader: None,
            processors: Vec::new(),
            dynamic_variables: DynamicVariables::with_builtins(),
            converters: ParameterConverters::default(),
        }
    }

    /// Replaces the conversion monitor.
    #[must_use]
    pub fn with_monitor(mut self, monitor: Arc<dyn StepMonitor>) -> Self {
        self.monitor = monitor;
        self
    }

    /// Replaces the file-based resource loader.
    #[must_use]
    pub fn with_story_loader(mut self, story_loader: Arc<dyn StoryLoader>) -> Self {
        self.story_loader = Some(story_loader);
        self
    }

    /// Adds an expression processor, tried before the built-in functions.
    #[must_use]
    pub fn with_expression_processor(
        mut self,
        processor: impl ExpressionProcessor + 'static,
    ) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    /// Registers a dynamic variable, replacing a built-in of the same name.
    #[must_use]
    pub fn with_dynamic_variable(
        mut self,
        name: impl Into<String>,
        variable: impl DynamicVariable + 'static,
    ) -> Self {
        self.dynamic_variables.register(name, variable);
        self
    }

    /// Adds a converter in front of the built-in ones.
    #[must_use]
    pub fn with_converter(mut self, converter: impl ParameterConverter + 'static) -> Self {
        self.converters = self.converters.add_converter(converter);
        self
    }

    /// Builds the engine.
    #[must_use]
    pub fn build(self) -> Engine {
        let config = self.config;
        let variables = SharedVariables::new(config.batch_values());
        let dry_run = Arc::new(AtomicBool::new(config.dry_run));
        let execution_mode: Arc<dyn ExecutionMode> = dry_run.clone();
        let store: Arc<dyn VariableStore> = Arc::new(variables.clone());

        let resolver = VariableResolver::new(
            store,
            Arc::new(self.dynamic_variables),
            execution_mode.clone(),
        )
        .with_max_passes(config.max_variable_passes)
        .with_max_resolved_len(config.max_resolved_len);

        let mut processors = self.processors;
        processors.push(Arc::new(string_expression_processors()));
        let placeholders =
            PlaceholderResolver::new(resolver, ExpressionAdaptor::new(processors, execution_mode))
                .with_max_rounds(config.max_resolution_rounds)
                .with_max_resolved_len(config.max_resolved_len);

        let story_loader: Arc<dyn StoryLoader> = match self.story_loader {
            Some(story_loader) => story_loader,
            None => Arc::new(FileStoryLoader::new(config.resource_root.clone())),
        };
        let tables = ExamplesTableConverter::new(story_loader, placeholders.clone());
        let decorator = ParameterConvertersDecorator::new(
            self.converters.with_monitor(self.monitor),
            placeholders.clone(),
            tables,
        );

        info!(
            dry_run = config.dry_run,
            resource_root = %config.resource_root.display(),
            "Resolution engine ready"
        );
        Engine {
            variables,
            dry_run,
            placeholders,
            decorator,
        }
    }
}
