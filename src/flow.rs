use crate::catalog::TableTitleCatalog;
use crate::classify::{classify, Outcome};
use crate::consent::{build_consent_form, ConsentFormSpec};
use crate::donation::DonationSink;
use crate::logsink::LogSink;
use crate::model::{DataFrame, NamedTables, Translatable, ValidationResult};
use crate::platform::Platform;
use crate::progress::ProgressTracker;
use crate::session::{FlowSession, SessionReport, TurnOutcome};
use serde::Serialize;
use tracing::{info, warn};

pub const ACCEPTED_EXTENSIONS: &str = "application/zip, text/plain";

/// Render request for the UI channel. The flow suspends after emitting one of
/// these and resumes only through `Flow::resume`.
#[derive(Debug, Clone, Serialize)]
pub enum FlowRequest {
    FileInput {
        platform: String,
        description: Translatable,
        extensions: String,
        progress: f64,
    },
    Confirm {
        platform: String,
        text: Translatable,
        ok: Translatable,
        cancel: Translatable,
        progress: f64,
    },
    ConsentForm {
        platform: String,
        form: ConsentFormSpec,
        progress: f64,
    },
    EndPage,
}

/// Typed response delivered by the UI channel. A payload that does not match
/// the pending request takes the negative branch for that state.
#[derive(Debug, Clone)]
pub enum ResumePayload {
    FileSelected(Vec<u8>),
    Skipped,
    ConfirmYes,
    ConfirmNo,
    ConsentAccepted(String),
    ConsentDeclined,
}

enum State {
    SelectFile { index: usize, retries: u32 },
    RetryConfirm { index: usize, retries: u32 },
    Consent { index: usize, retries: u32, tables: NamedTables },
    End,
    Done,
}

/// The donation flow state machine. Platforms run strictly sequentially:
/// `SELECT_FILE -> CLASSIFY -> {RETRY_CONFIRM <-> SELECT_FILE | CONSENT} ->
/// {DONATED | SKIPPED}`, then a terminal end page after the last platform.
///
/// A driver loop renders `current_request()`, waits for the UI channel, and
/// feeds the response back through `resume()`. Logs are drained and donated
/// under the session tracking key at every transition; sink failures are
/// logged and swallowed, never surfaced into the state machine.
pub struct Flow {
    platforms: Vec<Box<dyn Platform>>,
    session: FlowSession,
    tracker: ProgressTracker,
    logs: LogSink,
    sink: Box<dyn DonationSink>,
    state: State,
}

impl Flow {
    pub fn new(
        platforms: Vec<Box<dyn Platform>>,
        session: FlowSession,
        logs: LogSink,
        sink: Box<dyn DonationSink>,
    ) -> Self {
        let mut tracker = ProgressTracker::new(platforms.len());
        let state = if platforms.is_empty() {
            State::End
        } else {
            tracker.advance();
            State::SelectFile {
                index: 0,
                retries: 0,
            }
        };

        let mut flow = Self {
            platforms,
            session,
            tracker,
            logs,
            sink,
            state,
        };
        info!("starting the donation flow");
        if let State::SelectFile { .. } = flow.state {
            info!("prompt for file for {}", flow.platforms[0].name());
        }
        flow.donate_logs();
        flow
    }

    /// The pending render request, or `None` once the flow has finished.
    pub fn current_request(&self) -> Option<FlowRequest> {
        match &self.state {
            State::SelectFile { index, .. } => Some(FlowRequest::FileInput {
                platform: self.platforms[*index].name().to_string(),
                description: file_prompt_description(),
                extensions: ACCEPTED_EXTENSIONS.to_string(),
                progress: self.tracker.current(),
            }),
            State::RetryConfirm { index, .. } => {
                let platform = self.platforms[*index].name();
                Some(FlowRequest::Confirm {
                    platform: platform.to_string(),
                    text: retry_confirmation_text(platform),
                    ok: Translatable::new("Try again", "Probeer opnieuw"),
                    cancel: Translatable::new("Continue", "Verder"),
                    progress: self.tracker.current(),
                })
            }
            State::Consent { index, tables, .. } => {
                let platform = self.platforms[*index].name();
                Some(FlowRequest::ConsentForm {
                    platform: platform.to_string(),
                    form: build_consent_form(platform, tables),
                    progress: self.tracker.current(),
                })
            }
            State::End => Some(FlowRequest::EndPage),
            State::Done => None,
        }
    }

    /// Advance the machine with the UI channel's response. Donates the log
    /// snapshot once on entry (after the resume) and once on exit (before the
    /// next render request).
    pub fn resume(&mut self, payload: ResumePayload) {
        self.donate_logs();

        let state = std::mem::replace(&mut self.state, State::Done);
        self.state = match state {
            State::SelectFile { index, retries } => self.on_select_file(index, retries, payload),
            State::RetryConfirm { index, retries } => {
                self.on_retry_confirm(index, retries, payload)
            }
            State::Consent {
                index,
                retries,
                tables,
            } => self.on_consent(index, retries, tables, payload),
            State::End | State::Done => State::Done,
        };

        self.donate_logs();
    }

    pub fn is_done(&self) -> bool {
        matches!(self.state, State::Done)
    }

    pub fn progress(&self) -> f64 {
        self.tracker.current()
    }

    pub fn report(&self) -> SessionReport {
        self.session.report()
    }

    fn on_select_file(&mut self, index: usize, retries: u32, payload: ResumePayload) -> State {
        let name = self.platforms[index].name().to_string();

        let ResumePayload::FileSelected(bytes) = payload else {
            info!("skipped {name}");
            self.tracker.advance();
            return self.end_turn(index, TurnOutcome::Skipped, retries);
        };

        let (validation, tables) = match self.platforms[index].extract(&bytes) {
            Ok(result) => result,
            Err(err) => {
                // Pipeline failure is indistinguishable from an unrecognized
                // package as far as the flow is concerned.
                warn!("extraction failed for {name}: {err:#}");
                (ValidationResult::unrecognized(), NamedTables::new())
            }
        };

        match classify(&validation, &tables) {
            Outcome::HasData => {
                info!("payload for {name}; prompt consent");
                self.tracker.advance();
                State::Consent {
                    index,
                    retries,
                    tables,
                }
            }
            Outcome::ValidEmpty => {
                info!("valid package for {name}; no payload; prompt consent");
                self.tracker.advance();
                State::Consent {
                    index,
                    retries,
                    tables: empty_result_set(),
                }
            }
            Outcome::InvalidPackage | Outcome::AbortRetry => {
                info!("not a valid {name} package; no payload; prompt retry confirmation");
                State::RetryConfirm { index, retries }
            }
        }
    }

    fn on_retry_confirm(&mut self, index: usize, retries: u32, payload: ResumePayload) -> State {
        match payload {
            ResumePayload::ConfirmYes => {
                // Retry keeps the progress value from the original file prompt.
                info!("retry requested for {}", self.platforms[index].name());
                State::SelectFile {
                    index,
                    retries: retries + 1,
                }
            }
            _ => {
                info!("skipped during retry {}", self.platforms[index].name());
                self.tracker.advance();
                self.end_turn(index, TurnOutcome::Skipped, retries)
            }
        }
    }

    fn on_consent(
        &mut self,
        index: usize,
        retries: u32,
        _tables: NamedTables,
        payload: ResumePayload,
    ) -> State {
        let name = self.platforms[index].name().to_string();
        match payload {
            ResumePayload::ConsentAccepted(accepted) => {
                info!("data donated; {name}");
                self.donate(&name, &accepted);
                self.end_turn(index, TurnOutcome::Donated, retries)
            }
            _ => {
                info!("skipped after reviewing consent: {name}");
                self.end_turn(index, TurnOutcome::Skipped, retries)
            }
        }
    }

    fn end_turn(&mut self, index: usize, outcome: TurnOutcome, retries: u32) -> State {
        let name = self.platforms[index].name().to_string();
        self.session.record_turn(&name, outcome, retries);

        let next = index + 1;
        if next < self.platforms.len() {
            info!("prompt for file for {}", self.platforms[next].name());
            self.tracker.advance();
            State::SelectFile {
                index: next,
                retries: 0,
            }
        } else {
            State::End
        }
    }

    fn donate(&self, key: &str, payload: &str) {
        if let Err(err) = self.sink.donate(key, payload) {
            warn!("donation failed for {key}: {err:#}");
        }
    }

    fn donate_logs(&self) {
        let lines = self.logs.donation_payload();
        let payload =
            serde_json::to_string(&lines).unwrap_or_else(|_| "[\"no logs\"]".to_string());
        if let Err(err) = self.sink.donate(&self.session.tracking_key(), &payload) {
            warn!("log donation failed: {err:#}");
        }
    }
}

/// Single-row placeholder shown when a recognized package held nothing
/// extractable.
pub fn empty_result_set() -> NamedTables {
    let mut tables = NamedTables::new();
    tables.insert(
        "empty",
        TableTitleCatalog::title("empty_result_set"),
        DataFrame::single_column("No data found", vec!["No data found".to_string()]),
    );
    tables
}

fn file_prompt_description() -> Translatable {
    Translatable::new(
        "Please select this file so we can extract relevant information for our research.",
        "Je kan deze file nu selecteren zodat wij er relevante informatie uit kunnen halen voor ons onderzoek.",
    )
}

fn retry_confirmation_text(platform: &str) -> Translatable {
    Translatable::new(
        format!(
            "Unfortunately, we cannot process your {platform} file. Continue, if you are sure \
             that you selected the right file. Try again to select a different file."
        ),
        format!(
            "Helaas, kunnen we uw {platform} bestand niet verwerken. Weet u zeker dat u het \
             juiste bestand heeft gekozen? Ga dan verder. Probeer opnieuw als u een ander \
             bestand wilt kiezen."
        ),
    )
}
