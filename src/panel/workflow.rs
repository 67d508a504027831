//! Workflow panel: execution limits and memory handling.

use crate::model::{MemoryStrategy, WorkflowParams, WorkflowPatch};

#[derive(Debug, Clone, Default)]
pub struct WorkflowPanel {
    params: WorkflowParams,
}

impl WorkflowPanel {
    pub fn from_params(params: &WorkflowParams) -> Self {
        Self {
            params: params.clone(),
        }
    }

    pub fn params(&self) -> &WorkflowParams {
        &self.params
    }

    /// Takes the raw text of the max-steps field.
    ///
    /// Anything that isn't a number falls back to the default; numbers are
    /// clamped into range. Returns the value kept.
    pub fn set_max_steps_input(&mut self, input: &str) -> u8 {
        let value = input
            .trim()
            .parse::<i64>()
            .ok()
            .filter(|n| *n != 0)
            .map_or(WorkflowParams::DEFAULT_STEPS, |n| {
                let clamped = n.clamp(
                    i64::from(WorkflowParams::MIN_STEPS),
                    i64::from(WorkflowParams::MAX_STEPS),
                );
                u8::try_from(clamped).unwrap_or(WorkflowParams::DEFAULT_STEPS)
            });
        self.params.max_steps = value;
        value
    }

    pub fn set_memory_strategy(&mut self, strategy: MemoryStrategy) {
        self.params.memory_strategy = strategy;
    }

    pub fn set_advanced_mode(&mut self, on: bool) {
        self.params.advanced_mode = on;
    }

    pub fn save(&self) -> WorkflowPatch {
        WorkflowPatch {
            max_steps: self.params.max_steps,
            memory_strategy: self.params.memory_strategy,
            advanced_mode: self.params.advanced_mode,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_steps_input_parsing() {
        let mut panel = WorkflowPanel::default();

        assert_eq!(panel.set_max_steps_input("7"), 7);
        assert_eq!(panel.set_max_steps_input("abc"), 5);
        assert_eq!(panel.set_max_steps_input("11"), 10);
        assert_eq!(panel.set_max_steps_input("-3"), 1);
        // Zero reads as "nothing entered", like an empty field.
        assert_eq!(panel.set_max_steps_input("0"), 5);
        assert_eq!(panel.set_max_steps_input(" 3 "), 3);
        assert_eq!(panel.params().max_steps, 3);
    }

    #[test]
    fn save_carries_every_field() {
        let mut panel = WorkflowPanel::default();
        panel.set_max_steps_input("8");
        panel.set_memory_strategy(MemoryStrategy::Summary);
        panel.set_advanced_mode(true);

        assert_eq!(
            panel.save(),
            WorkflowPatch {
                max_steps: 8,
                memory_strategy: MemoryStrategy::Summary,
                advanced_mode: true,
            }
        );
    }
}
