//! Lifecycle hooks recognized by the source transformer.
//!
//! The set is closed: hooks are configured data, never discovered from the
//! agent source. A method whose name is not in the set is left untouched.

use serde::{Deserialize, Serialize};

/// Base-call template used when a hook does not provide its own.
///
/// Placeholders: `{class}` (agent class name), `{hook}` (method name) and
/// `{args}` (forwarded parameters joined with `, `).
pub const DEFAULT_CALL_TEMPLATE: &str = "await super({class}, self).{hook}({args})";

/// A named callback slot the agent may override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifecycleHook {
    /// Method name, e.g. `on_step`.
    pub name: String,
    /// Canonical parameter names after `self`.
    #[serde(default)]
    pub params: Vec<String>,
    #[serde(default = "default_call_template")]
    pub call_template: String,
}

fn default_call_template() -> String {
    DEFAULT_CALL_TEMPLATE.to_string()
}

impl LifecycleHook {
    #[must_use]
    pub fn new(name: &str, params: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            params: params.iter().map(ToString::to_string).collect(),
            call_template: default_call_template(),
        }
    }

    /// Render the base-class call for `class_name`, forwarding `args` by name.
    #[must_use]
    pub fn render_call(&self, class_name: &str, args: &[String]) -> String {
        self.call_template
            .replace("{class}", class_name)
            .replace("{hook}", &self.name)
            .replace("{args}", &args.join(", "))
    }

    /// The hooks `AresBot` chains through from its own `BotAI` overrides.
    #[must_use]
    pub fn ares_defaults() -> Vec<Self> {
        vec![
            Self::new("on_start", &[]),
            Self::new("on_step", &["iteration"]),
            Self::new("on_end", &["game_result"]),
            Self::new("on_unit_created", &["unit"]),
            Self::new("on_unit_destroyed", &["unit_tag"]),
            Self::new("on_unit_took_damage", &["unit", "amount_damage_taken"]),
            Self::new("on_building_construction_complete", &["unit"]),
            Self::new("on_unit_type_changed", &["unit", "previous_type"]),
            Self::new("on_upgrade_complete", &["upgrade"]),
        ]
    }
}

/// Look up a hook by method name.
#[must_use]
pub fn find_hook<'a>(hooks: &'a [LifecycleHook], name: &str) -> Option<&'a LifecycleHook> {
    hooks.iter().find(|hook| hook.name == name)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("on_start", "await super(MyBot, self).on_start()")]
    #[case("on_step", "await super(MyBot, self).on_step(iteration)")]
    #[case(
        "on_unit_took_damage",
        "await super(MyBot, self).on_unit_took_damage(unit, amount_damage_taken)"
    )]
    fn canonical_calls(#[case] name: &str, #[case] expected: &str) {
        let hooks = LifecycleHook::ares_defaults();
        let hook = find_hook(&hooks, name).expect("hook should be known");
        assert_eq!(hook.render_call("MyBot", &hook.params), expected);
    }

    #[test]
    fn forwards_declared_names() {
        let hook = LifecycleHook::new("on_end", &["game_result"]);
        let call = hook.render_call("CompetitiveBot", &["result".to_string()]);
        assert_eq!(call, "await super(CompetitiveBot, self).on_end(result)");
    }

    #[test]
    fn unknown_hook_is_absent() {
        let hooks = LifecycleHook::ares_defaults();
        assert!(find_hook(&hooks, "on_game_paused").is_none());
    }

    #[test]
    fn template_defaults_when_deserialized() {
        let hook: LifecycleHook =
            serde_json::from_str(r#"{"name":"on_step","params":["iteration"]}"#).unwrap();
        assert_eq!(hook.call_template, DEFAULT_CALL_TEMPLATE);
    }
}
