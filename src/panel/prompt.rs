//! Prompt panel: editing the planner and generator templates.

use crate::model::{PromptKind, PromptPatch, PromptTemplates};

/// Placeholders a template may reference, with what they expand to.
pub const PROMPT_VARIABLES: [(&str, &str); 5] = [
    ("{{USER_QUERY}}", "The user's current query"),
    ("{{AGENT_NAME}}", "The name of your agent"),
    ("{{PREV_CONTEXT}}", "Previous conversation context"),
    ("{{TOOLS}}", "Available tools list"),
    ("{{KNOWLEDGE}}", "Knowledge base information"),
];

/// Working copies of both templates. Nothing reaches the draft until `save`.
#[derive(Debug, Clone, Default)]
pub struct PromptPanel {
    templates: PromptTemplates,
}

impl PromptPanel {
    /// Opens the panel on the given templates.
    pub fn from_templates(templates: &PromptTemplates) -> Self {
        Self {
            templates: templates.clone(),
        }
    }

    pub fn text(&self, kind: PromptKind) -> &str {
        match kind {
            PromptKind::Planner => &self.templates.planner,
            PromptKind::Generator => &self.templates.generator,
        }
    }

    pub fn set(&mut self, kind: PromptKind, text: impl Into<String>) {
        *self.slot(kind) = text.into();
    }

    pub fn reset(&mut self, kind: PromptKind) {
        *self.slot(kind) = kind.default_text().to_string();
    }

    /// Appends `variable` to the template, separated by a space.
    pub fn insert_variable(&mut self, kind: PromptKind, variable: &str) {
        let slot = self.slot(kind);
        slot.push(' ');
        slot.push_str(variable);
    }

    pub fn save(&self) -> PromptPatch {
        PromptPatch {
            planner: self.templates.planner.clone(),
            generator: self.templates.generator.clone(),
        }
    }

    fn slot(&mut self, kind: PromptKind) -> &mut String {
        match kind {
            PromptKind::Planner => &mut self.templates.planner,
            PromptKind::Generator => &mut self.templates.generator,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opens_on_defaults() {
        let panel = PromptPanel::default();

        assert_eq!(panel.text(PromptKind::Planner), PromptKind::Planner.default_text());
        assert_eq!(panel.text(PromptKind::Generator), PromptKind::Generator.default_text());
    }

    #[test]
    fn insert_variable_appends_with_space() {
        let mut panel = PromptPanel::default();
        panel.set(PromptKind::Generator, "Use");
        panel.insert_variable(PromptKind::Generator, PROMPT_VARIABLES[3].0);

        assert_eq!(panel.text(PromptKind::Generator), "Use {{TOOLS}}");
        assert_eq!(panel.text(PromptKind::Planner), PromptKind::Planner.default_text());
    }

    #[test]
    fn reset_restores_only_that_template() {
        let mut panel = PromptPanel::default();
        panel.set(PromptKind::Planner, "custom planner");
        panel.set(PromptKind::Generator, "custom generator");
        panel.reset(PromptKind::Planner);

        let patch = panel.save();
        assert_eq!(patch.planner, PromptKind::Planner.default_text());
        assert_eq!(patch.generator, "custom generator");
    }
}
