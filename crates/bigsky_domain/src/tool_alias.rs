use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::{AssistantId, Error, Result, ToolName};

pub type AliasTable = HashMap<AssistantId, HashMap<ToolName, ToolName>>;

const ROUTER_ALIASES: &[(&str, &str)] = &[
    ("show_color_picker", "change_assistant:big-sky-color"),
    ("show_font_picker", "change_assistant:big-sky-font"),
    ("change_agent:big-sky-font", "change_assistant:big-sky-font"),
    ("change_agent:big-sky-color", "change_assistant:big-sky-color"),
    ("navigate_to_page", "change_assistant:big-sky-page"),
    ("ask_a_wordpress_expert", "change_assistant:big-sky-help"),
    ("help", "change_assistant:big-sky-help"),
    ("add_page", "change_assistant:big-sky-page"),
    ("add_pattern", "change_assistant:big-sky-pattern"),
];

lazy_static! {
    static ref BUILTIN_ALIASES: AliasTable = {
        let router = ROUTER_ALIASES
            .iter()
            .map(|(alias, canonical)| (ToolName::new(alias), ToolName::new(canonical)))
            .collect();
        HashMap::from([
            (AssistantId::new("router"), router),
            (AssistantId::new("color"), HashMap::new()),
        ])
    };
}

/// Maps tool names that changed across schema revisions onto their current
/// name. Tables are scoped per assistant and fixed once built.
#[derive(Debug, Clone)]
pub struct ToolNameResolver {
    aliases: AliasTable,
}

impl Default for ToolNameResolver {
    fn default() -> Self {
        Self { aliases: BUILTIN_ALIASES.clone() }
    }
}

impl ToolNameResolver {
    pub fn new(aliases: AliasTable) -> Result<Self> {
        let resolver = Self { aliases };
        resolver.check_fixed_points()?;
        Ok(resolver)
    }

    /// Merges `extra` over the built-in tables. Later entries win.
    pub fn with_aliases(mut self, extra: AliasTable) -> Result<Self> {
        for (assistant, table) in extra {
            self.aliases.entry(assistant).or_default().extend(table);
        }
        self.check_fixed_points()?;
        Ok(self)
    }

    pub fn resolve(&self, assistant: &AssistantId, tool_name: &ToolName) -> ToolName {
        self.aliases
            .get(assistant)
            .and_then(|table| table.get(tool_name))
            .unwrap_or(tool_name)
            .clone()
    }

    // Canonical names must never be aliases themselves, otherwise resolving
    // twice would differ from resolving once.
    fn check_fixed_points(&self) -> Result<()> {
        for (assistant, table) in &self.aliases {
            if let Some((alias, canonical)) = table
                .iter()
                .find(|(alias, canonical)| alias != canonical && table.contains_key(*canonical))
            {
                return Err(Error::ChainedAlias {
                    assistant: assistant.clone(),
                    alias: alias.clone(),
                    canonical: canonical.clone(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn router() -> AssistantId {
        AssistantId::new("router")
    }

    #[test]
    fn test_resolve_alias() {
        let fixture = ToolNameResolver::default();
        let actual = fixture.resolve(&router(), &ToolName::new("navigate_to_page"));
        let expected = ToolName::new("change_assistant:big-sky-page");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_resolve_unknown_name_is_unchanged() {
        let fixture = ToolNameResolver::default();
        let actual = fixture.resolve(&router(), &ToolName::new("start_over"));
        let expected = ToolName::new("start_over");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_resolve_is_scoped_per_assistant() {
        let fixture = ToolNameResolver::default();
        let actual = fixture.resolve(&AssistantId::new("color"), &ToolName::new("help"));
        let expected = ToolName::new("help");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_every_alias_resolves_to_a_fixed_point() {
        let fixture = ToolNameResolver::default();
        for (alias, canonical) in ROUTER_ALIASES {
            let once = fixture.resolve(&router(), &ToolName::new(alias));
            let twice = fixture.resolve(&router(), &once);
            assert_eq!(once, ToolName::new(canonical));
            assert_eq!(twice, once);
        }
    }

    #[test]
    fn test_with_aliases_extends_builtin_table() {
        let extra = HashMap::from([(
            AssistantId::new("color"),
            HashMap::from([(ToolName::new("set_palette"), ToolName::new("update_colors"))]),
        )]);
        let fixture = ToolNameResolver::default().with_aliases(extra).unwrap();

        let actual = fixture.resolve(&AssistantId::new("color"), &ToolName::new("set_palette"));
        let expected = ToolName::new("update_colors");
        assert_eq!(actual, expected);

        let actual = fixture.resolve(&router(), &ToolName::new("add_page"));
        let expected = ToolName::new("change_assistant:big-sky-page");
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_chained_alias_is_rejected() {
        let fixture = HashMap::from([(
            router(),
            HashMap::from([
                (ToolName::new("a"), ToolName::new("b")),
                (ToolName::new("b"), ToolName::new("c")),
            ]),
        )]);
        let actual = ToolNameResolver::new(fixture);
        assert!(matches!(actual, Err(Error::ChainedAlias { .. })));
    }
}
