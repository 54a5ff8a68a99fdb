//! Drives one encounter instance from spawn to cleanup.
//!
//! The order is fixed: intro, option menu, pre-option phase, selected
//! dialogue, option phase, rewards, outro, post-option phase. Each step is
//! awaited before the next starts. A phase that returns
//! [`PhaseOutcome::Halt`] stops the sequence where it is without undoing
//! anything.

use crate::config::EncounterSettings;
use crate::dialogue::DialogueLine;
use crate::encounter::{EncounterInstance, MysteryEncounter};
use crate::errors::{EncounterResult, FlowError};
use crate::option::{EncounterOption, OptionPhase, PhaseContext, PhaseOutcome};
use crate::rng::EncounterRng;
use crate::scene::{RunState, SeenEncounter};
use crate::services::{EncounterServices, OptionView};
use std::sync::Arc;

/// Where the phase sequence can stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    PreOptionPhase,
    OptionPhase,
    PostOptionPhase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
    Completed,
    /// The named phase returned `Halt`.
    Halted(FlowStep),
}

pub struct EncounterSession {
    instance: EncounterInstance,
    settings: EncounterSettings,
}

impl EncounterSession {
    /// Creates the instance for this wave, runs the encounter's init hook
    /// under the instance seed and logs the encounter as seen.
    #[tracing::instrument(skip_all, fields(encounter = %definition.encounter_type(), wave = run.wave_index))]
    pub fn start(
        definition: Arc<MysteryEncounter>,
        run: &mut RunState,
        run_seed: u64,
        settings: EncounterSettings,
    ) -> Self {
        let mut instance = EncounterInstance::new(Arc::clone(&definition), run_seed, run.wave_index, &settings);
        let mut rng = instance.seed().rng();

        if let Some(on_init) = definition.on_init() {
            on_init(run, &mut instance, &mut rng);
        }
        instance.populate_dialogue_tokens_from_requirements(run, &mut rng);

        run.encounters.encounter_log.push(SeenEncounter {
            encounter_type: definition.encounter_type(),
            tier: definition.tier(),
            wave_index: run.wave_index,
            selected_option: None,
        });
        tracing::info!(offset = instance.seed_offset(), "encounter started");

        Self { instance, settings }
    }

    pub fn instance(&self) -> &EncounterInstance {
        &self.instance
    }

    pub fn instance_mut(&mut self) -> &mut EncounterInstance {
        &mut self.instance
    }

    pub fn into_instance(self) -> EncounterInstance {
        self.instance
    }

    fn definition(&self) -> Arc<MysteryEncounter> {
        Arc::clone(self.instance.definition())
    }

    fn option_rng(&self) -> EncounterRng {
        self.instance.seed().rng()
    }

    pub async fn show_intro(&mut self, services: &mut EncounterServices) {
        let definition = self.definition();
        show_lines(&definition.dialogue().intro, &self.instance, services).await;
    }

    /// Builds the option menu and hands it to the presentation layer.
    /// Every call after the first counts as a re-entry and moves the seed
    /// offset forward.
    pub async fn present_options(
        &mut self,
        run: &RunState,
        services: &mut EncounterServices,
    ) -> Vec<OptionView> {
        self.instance.enter_option_select(self.settings.reentry_seed_step);
        let definition = self.definition();

        let eligibility: Vec<bool> = (0..definition.options().len())
            .map(|index| {
                matches!(self.instance.populate_option_tokens(index, run), Some(Ok(_)))
            })
            .collect();
        let views: Vec<OptionView> = definition
            .options()
            .iter()
            .zip(eligibility)
            .enumerate()
            .map(|(index, (option, enabled))| option_view(index, option, enabled, &self.instance, services))
            .collect();

        services.presentation.show_option_select(views.clone()).await;
        views
    }

    /// Re-validates and runs option `index` up to and including its option
    /// phase.
    #[tracing::instrument(skip(self, run, services))]
    pub async fn select_option(
        &mut self,
        index: usize,
        run: &mut RunState,
        services: &mut EncounterServices,
    ) -> EncounterResult<FlowOutcome> {
        let definition = self.definition();
        let option = definition.option(index).ok_or(FlowError::OptionOutOfRange {
            index,
            count: definition.options().len(),
        })?;
        if !option.is_actionable() {
            return Err(FlowError::OptionNotActionable(index).into());
        }

        let roles = option
            .resolve_roles(run, &mut self.option_rng())
            .map_err(|reason| {
                tracing::debug!(?reason, "selected option is not eligible");
                FlowError::OptionNotSelectable(index)
            })?;

        self.instance.selected_option = Some(index);
        self.instance.roles = Some(roles);
        record_selection(run, &self.instance, index);
        tracing::info!(index, offset = self.instance.seed_offset(), "option selected");

        self.instance.set_selected_role_tokens(run);

        let offset = self.instance.seed_offset();
        if let Some(phase) = option.pre_option_phase() {
            let mut rng = self.instance.seed().at_offset(offset).rng();
            if self.run_phase(phase, run, &mut rng, services).await == PhaseOutcome::Halt {
                return Ok(halted(FlowStep::PreOptionPhase));
            }
        }

        show_lines(&option.dialogue().selected, &self.instance, services).await;

        if let Some(phase) = option.option_phase() {
            let seed = self
                .instance
                .seed()
                .at_offset(offset.wrapping_mul(self.settings.option_phase_seed_multiplier));
            let mut rng = seed.rng();
            if self.run_phase(phase, run, &mut rng, services).await == PhaseOutcome::Halt {
                return Ok(halted(FlowStep::OptionPhase));
            }
        }
        Ok(FlowOutcome::Completed)
    }

    /// Pays out whatever the option registered, shows the outro and runs the
    /// post-option phase.
    #[tracing::instrument(skip_all)]
    pub async fn conclude(
        &mut self,
        run: &mut RunState,
        services: &mut EncounterServices,
    ) -> EncounterResult<FlowOutcome> {
        let index = self.instance.selected_option.ok_or(FlowError::NoOptionSelected)?;
        let definition = self.definition();
        let option = definition.option(index).ok_or(FlowError::OptionOutOfRange {
            index,
            count: definition.options().len(),
        })?;

        // Reward rolls ignore re-entries so they match however the menu was used.
        let reward_seed = self
            .instance
            .seed()
            .at_offset(run.wave_index as u64 * self.settings.wave_seed_multiplier);
        let mut reward_rng = reward_seed.rng();
        self.instance
            .execute_rewards(run, &mut reward_rng, services.rewards.as_mut());

        show_lines(&definition.dialogue().outro, &self.instance, services).await;

        if let Some(phase) = option.post_option_phase() {
            let offset = self.instance.seed_offset();
            let seed = self
                .instance
                .seed()
                .at_offset(offset.wrapping_mul(self.settings.post_phase_seed_multiplier));
            let mut rng = seed.rng();
            if self.run_phase(phase, run, &mut rng, services).await == PhaseOutcome::Halt {
                return Ok(halted(FlowStep::PostOptionPhase));
            }
        }
        tracing::info!("encounter concluded");
        Ok(FlowOutcome::Completed)
    }

    async fn run_phase(
        &mut self,
        phase: &dyn OptionPhase,
        run: &mut RunState,
        rng: &mut EncounterRng,
        services: &mut EncounterServices,
    ) -> PhaseOutcome {
        let mut ctx = PhaseContext {
            run,
            encounter: &mut self.instance,
            rng,
            services,
        };
        phase.run(&mut ctx).await
    }
}

fn halted(step: FlowStep) -> FlowOutcome {
    tracing::info!(?step, "phase halted the encounter flow");
    FlowOutcome::Halted(step)
}

fn record_selection(run: &mut RunState, instance: &EncounterInstance, index: usize) {
    let encounter_type = instance.definition().encounter_type();
    if let Some(entry) = run
        .encounters
        .encounter_log
        .iter_mut()
        .rev()
        .find(|entry| entry.encounter_type == encounter_type && entry.wave_index == instance.wave_index)
    {
        entry.selected_option = Some(index);
    }
}

fn option_view(
    index: usize,
    option: &EncounterOption,
    enabled: bool,
    instance: &EncounterInstance,
    services: &EncounterServices,
) -> OptionView {
    let mode = option.mode();
    let dialogue = option.dialogue();
    let greyed_out = !enabled && mode.greys_out_when_unmet();
    let special = enabled && option.has_requirements() && mode.highlights_when_met();

    let (label_key, tooltip_key) = if greyed_out {
        (
            dialogue.disabled_button_label.as_ref().or(dialogue.button_label.as_ref()),
            dialogue
                .disabled_button_tooltip
                .as_ref()
                .or(dialogue.button_tooltip.as_ref()),
        )
    } else {
        (dialogue.button_label.as_ref(), dialogue.button_tooltip.as_ref())
    };
    let resolve = |key: &String| services.dialogue.resolve(key, &instance.dialogue_tokens);

    OptionView {
        index,
        label: label_key
            .map(resolve)
            .unwrap_or_else(|| format!("Option {}", index + 1)),
        enabled,
        greyed_out,
        special,
        tooltip: tooltip_key.map(resolve),
    }
}

async fn show_lines(lines: &[DialogueLine], instance: &EncounterInstance, services: &mut EncounterServices) {
    for line in lines {
        let text = services.dialogue.resolve(&line.text, &instance.dialogue_tokens);
        let text = match &line.speaker {
            Some(speaker) => {
                let speaker = services.dialogue.resolve(speaker, &instance.dialogue_tokens);
                format!("{speaker}: {text}")
            }
            None => text,
        };
        services.presentation.show_text(text).await;
    }
}
