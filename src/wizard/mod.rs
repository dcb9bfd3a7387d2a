use crate::bundle::{GeneratedBundle, TemplateKind};
use crate::errors::WizardError;
use crate::generate::Dispatcher;

pub const DEFAULT_MAX_PROMPT_CHARS: usize = 220;

/// One payload per step, so a bundle can only exist once deployed.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Prompt,
    Template { prompt: String, template: TemplateKind },
    Generating { prompt: String, template: TemplateKind, ticket: GenerationTicket },
    Deployed { prompt: String, template: TemplateKind, bundle: GeneratedBundle },
}

impl Step {
    pub fn index(&self) -> u8 {
        match self {
            Step::Prompt => 0,
            Step::Template { .. } => 1,
            Step::Generating { .. } => 2,
            Step::Deployed { .. } => 3,
        }
    }
}

/// Issued when generation starts; a result is only applied if its ticket
/// still matches the live session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationTicket {
    epoch: u64,
}

#[derive(Debug)]
pub struct WizardSession {
    step: Step,
    /// Bumped by `start_over`; outstanding tickets from older epochs are stale.
    epoch: u64,
    max_prompt_chars: usize,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_PROMPT_CHARS)
    }
}

impl WizardSession {
    pub fn new(max_prompt_chars: usize) -> Self {
        Self { step: Step::Prompt, epoch: 0, max_prompt_chars }
    }

    pub fn step(&self) -> &Step {
        &self.step
    }

    pub fn step_index(&self) -> u8 {
        self.step.index()
    }

    /// Empty before step 1 and after a restart.
    pub fn prompt(&self) -> &str {
        match &self.step {
            Step::Prompt => "",
            Step::Template { prompt, .. } | Step::Generating { prompt, .. } | Step::Deployed { prompt, .. } => prompt,
        }
    }

    pub fn template(&self) -> TemplateKind {
        match &self.step {
            Step::Prompt => TemplateKind::default(),
            Step::Template { template, .. } | Step::Generating { template, .. } | Step::Deployed { template, .. } => *template,
        }
    }

    pub fn bundle(&self) -> Option<&GeneratedBundle> {
        match &self.step {
            Step::Deployed { bundle, .. } => Some(bundle),
            _ => None,
        }
    }

    /// Checks a description without changing state.
    pub fn validate_prompt(&self, text: &str) -> Result<String, WizardError> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Err(WizardError::EmptyPrompt);
        }
        let len = trimmed.chars().count();
        if len > self.max_prompt_chars {
            return Err(WizardError::PromptTooLong { len, max: self.max_prompt_chars });
        }
        Ok(trimmed.to_string())
    }

    /// Step 0 → 1.
    pub fn submit_prompt(&mut self, text: &str) -> Result<(), WizardError> {
        self.expect(0, "submit a description")?;
        let prompt = self.validate_prompt(text)?;
        self.step = Step::Template { prompt, template: TemplateKind::default() };
        Ok(())
    }

    /// Optional pick while at step 1.
    pub fn choose_template(&mut self, kind: TemplateKind) -> Result<(), WizardError> {
        match &mut self.step {
            Step::Template { template, .. } => {
                *template = kind;
                Ok(())
            }
            other => Err(WizardError::InvalidTransition { action: "choose a template", step: other.index() }),
        }
    }

    /// Step 1 → 2.
    pub fn begin_generation(&mut self) -> Result<GenerationTicket, WizardError> {
        self.expect(1, "start building")?;
        let ticket = GenerationTicket { epoch: self.epoch };
        let (prompt, template) = (self.prompt().to_string(), self.template());
        self.step = Step::Generating { prompt, template, ticket };
        Ok(ticket)
    }

    /// Step 2 → 3. Returns false, leaving the session untouched, when the
    /// ticket predates a restart or generation is not in progress.
    pub fn complete_generation(&mut self, ticket: GenerationTicket, bundle: GeneratedBundle) -> bool {
        match &self.step {
            Step::Generating { prompt, template, ticket: live } if *live == ticket && ticket.epoch == self.epoch => {
                let (prompt, template) = (prompt.clone(), *template);
                self.step = Step::Deployed { prompt, template, bundle };
                true
            }
            _ => {
                tracing::debug!(?ticket, step = self.step_index(), "discarding stale generation result");
                false
            }
        }
    }

    /// Back to step 0 from anywhere, dropping everything collected.
    pub fn start_over(&mut self) {
        self.epoch += 1;
        self.step = Step::Prompt;
    }

    /// Drives steps 1 → 2 → 3 with the dispatcher.
    pub async fn run_generation(&mut self, dispatcher: &Dispatcher) -> Result<&GeneratedBundle, WizardError> {
        let ticket = self.begin_generation()?;
        let bundle = dispatcher.generate(self.prompt(), self.template(), &[]).await;
        self.complete_generation(ticket, bundle);
        self.bundle().ok_or(WizardError::InvalidTransition { action: "finish building", step: self.step_index() })
    }

    fn expect(&self, step: u8, action: &'static str) -> Result<(), WizardError> {
        if self.step_index() == step {
            Ok(())
        } else {
            Err(WizardError::InvalidTransition { action, step: self.step_index() })
        }
    }
}
