//! Explicit registration of controllers and pluggable components.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use crate::application::{ApplicationError, ports::Controller};
use crate::domain::{ActionSpec, AppConfig, ParamKind, RouteMatch};

/// Controllers known to a dispatcher, keyed by id.
#[derive(Default)]
pub struct ControllerRegistry {
    controllers: BTreeMap<String, Box<dyn Controller>>,
}

impl ControllerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a controller. Ids must be unique.
    pub fn register(&mut self, controller: Box<dyn Controller>) -> Result<(), ApplicationError> {
        let id = controller.id().to_string();
        if self.controllers.contains_key(&id) {
            return Err(ApplicationError::DuplicateController { id });
        }
        self.controllers.insert(id, controller);
        Ok(())
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, controller: Box<dyn Controller>) -> Result<Self, ApplicationError> {
        self.register(controller)?;
        Ok(self)
    }

    pub fn get(&self, id: &str) -> Option<&dyn Controller> {
        self.controllers.get(id).map(Box::as_ref)
    }

    /// Controller and action spec for a matched route.
    pub fn resolve(&self, route: &RouteMatch) -> Option<(&dyn Controller, &ActionSpec)> {
        let controller = self.get(&route.controller)?;
        let action = controller.action(&route.action)?;
        Some((controller, action))
    }

    /// Controllers in id order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn Controller> {
        self.controllers.values().map(Box::as_ref)
    }

    pub fn len(&self) -> usize {
        self.controllers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controllers.is_empty()
    }

    /// One line per action, e.g. `hello/index [message="hello world"]`.
    pub fn signatures(&self) -> Vec<String> {
        self.iter()
            .flat_map(|c| {
                c.actions()
                    .iter()
                    .map(move |a| action_signature(c.id(), a))
            })
            .collect()
    }

    /// Help text listing every route this registry can run.
    pub fn usage(&self) -> String {
        let mut out = String::from("Usage: gantry run <route> [args...] [--name=value...]\n");
        if self.is_empty() {
            return out;
        }
        out.push_str("\nAvailable routes:\n");
        for line in self.signatures() {
            let _ = writeln!(out, "  {line}");
        }
        out
    }
}

impl std::fmt::Debug for ControllerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.controllers.keys()).finish()
    }
}

/// `controller/action <required> [optional=default]`, plus the allowed
/// methods when restricted.
pub fn action_signature(controller: &str, action: &ActionSpec) -> String {
    let mut line = format!("{controller}/{}", action.id);
    for param in &action.params {
        let name = match param.kind {
            ParamKind::Int => format!("{}:int", param.name),
            ParamKind::Str => param.name.to_string(),
        };
        match param.default {
            Some(default) => {
                let _ = write!(line, " [{name}={default:?}]");
            }
            None => {
                let _ = write!(line, " <{name}>");
            }
        }
    }
    if let Some(allow) = &action.allow {
        let methods: Vec<_> = allow.iter().map(|m| m.as_str()).collect();
        let _ = write!(line, " ({})", methods.join("|"));
    }
    line
}

/// Constructor for one implementation of a component.
pub type Constructor<T> = fn(&AppConfig) -> T;

/// Implementations of one component, selected by the key configured in
/// [`AppConfig::components`].
pub struct ComponentRegistry<T> {
    component: &'static str,
    constructors: BTreeMap<&'static str, Constructor<T>>,
}

impl<T> ComponentRegistry<T> {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            constructors: BTreeMap::new(),
        }
    }

    pub fn register(mut self, key: &'static str, constructor: Constructor<T>) -> Self {
        self.constructors.insert(key, constructor);
        self
    }

    pub fn component(&self) -> &'static str {
        self.component
    }

    pub fn keys(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.constructors.keys().copied()
    }

    /// Construct the implementation `config` selects.
    pub fn build(&self, config: &AppConfig) -> Result<T, ApplicationError> {
        let key = config.component(self.component).ok_or_else(|| {
            ApplicationError::ComponentNotConfigured {
                component: self.component.to_string(),
            }
        })?;
        let constructor =
            self.constructors
                .get(key)
                .ok_or_else(|| ApplicationError::ComponentNotRegistered {
                    component: self.component.to_string(),
                    key: key.to_string(),
                })?;
        Ok(constructor(config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ActionError, ActionResult, BoundParams, HttpMethod, ParamSpec};
    use crate::application::ports::ActionContext;

    struct Hello {
        actions: Vec<ActionSpec>,
    }

    impl Hello {
        fn boxed() -> Box<dyn Controller> {
            Box::new(Self {
                actions: vec![
                    ActionSpec::new("index")
                        .param(ParamSpec::str("message").with_default("hello world")),
                    ActionSpec::new("drop")
                        .param(ParamSpec::int("id"))
                        .allow(&[HttpMethod::Post]),
                ],
            })
        }
    }

    impl Controller for Hello {
        fn id(&self) -> &str {
            "hello"
        }

        fn actions(&self) -> &[ActionSpec] {
            &self.actions
        }

        fn run(
            &self,
            _action: &str,
            _ctx: &ActionContext<'_>,
            params: &BoundParams,
        ) -> Result<ActionResult, ActionError> {
            Ok(ActionResult::Text(params.str("message").to_string()))
        }
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let mut registry = ControllerRegistry::new();
        registry.register(Hello::boxed()).unwrap();
        assert_eq!(
            registry.register(Hello::boxed()),
            Err(ApplicationError::DuplicateController { id: "hello".into() })
        );
    }

    #[test]
    fn resolve_finds_controller_and_action() {
        let registry = ControllerRegistry::new().with(Hello::boxed()).unwrap();
        let (controller, action) = registry.resolve(&RouteMatch::from_route("hello")).unwrap();
        assert_eq!((controller.id(), action.id), ("hello", "index"));
        assert!(registry.resolve(&RouteMatch::from_route("hello/nope")).is_none());
        assert!(registry.resolve(&RouteMatch::from_route("bye")).is_none());
    }

    #[test]
    fn signatures_describe_params_and_methods() {
        let registry = ControllerRegistry::new().with(Hello::boxed()).unwrap();
        assert_eq!(
            registry.signatures(),
            [
                "hello/index [message=\"hello world\"]",
                "hello/drop <id:int> (POST)",
            ]
        );
        assert!(registry.usage().contains("  hello/index"));
    }

    #[test]
    fn required_string_param_has_no_kind_suffix() {
        let spec = ActionSpec::new("resolve").param(ParamSpec::str("alias"));
        assert_eq!(action_signature("alias", &spec), "alias/resolve <alias>");
    }
}
