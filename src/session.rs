// Session loop: deck selection once, then one card per word until the user
// quits. Each card moves through AwaitWord -> Lookup -> Edit ->
// ResolvePicture -> Submit; every step is paced by the user and failures in
// a step only degrade that step.

use std::fmt::Display;
use std::io;

use tracing::{debug, warn};

use crate::config::Config;
use crate::draft::CardDraft;
use crate::editor;
use crate::error::Error;
use crate::toolkit::Toolkit;
use crate::ui::Prompter;

/// States of the session state machine.
#[derive(Debug)]
pub enum Step {
    SelectDeck,
    AwaitWord,
    Lookup(String),
    Edit(CardDraft),
    ResolvePicture(CardDraft),
    Submit(CardDraft),
    Quit,
}

/// Check the flashcard application is reachable, then run the session until
/// the user quits. Only the startup check is fatal.
pub fn run_session<P: Prompter, T: Toolkit>(
    config: &Config,
    prompter: &mut P,
    toolkit: &mut T,
) -> Result<(), Error> {
    toolkit.connect(config)?;

    match toolkit.note_fields(config) {
        Ok(fields) => debug!(?fields, note_type = %config.note_type, "note type fields"),
        Err(e) => report(prompter, "Could not read the note type", e),
    }

    Session::new(config, prompter, toolkit).run()
}

pub struct Session<'a, P, T> {
    config: &'a Config,
    prompter: &'a mut P,
    toolkit: &'a mut T,
    /// Chosen in `SelectDeck`, then fixed for the session.
    deck: String,
}

impl<'a, P: Prompter, T: Toolkit> Session<'a, P, T> {
    pub fn new(config: &'a Config, prompter: &'a mut P, toolkit: &'a mut T) -> Self {
        Self {
            config,
            prompter,
            toolkit,
            deck: config.default_deck.clone(),
        }
    }

    /// Drive the state machine until `Quit`. End of input at any prompt is
    /// treated like the quit sentinel.
    pub fn run(mut self) -> Result<(), Error> {
        let mut step = Step::SelectDeck;
        loop {
            step = match step {
                Step::Quit => return Ok(()),
                step => match self.advance(step) {
                    Ok(next) => next,
                    Err(Error::UserAbort) => Step::Quit,
                    Err(e) => return Err(e),
                },
            };
        }
    }

    fn advance(&mut self, step: Step) -> Result<Step, Error> {
        match step {
            Step::SelectDeck => {
                self.deck = self.select_deck()?;
                self.prompter.say(&format!("Using deck: {}", self.deck));
                Ok(Step::AwaitWord)
            }
            Step::AwaitWord => self.await_word(),
            Step::Lookup(word) => Ok(self.lookup(&word)),
            Step::Edit(mut draft) => {
                editor::edit_draft(self.prompter, &mut draft).map_err(|e| discard(&draft, e))?;
                Ok(Step::ResolvePicture(draft))
            }
            Step::ResolvePicture(draft) => self.resolve_picture(draft),
            Step::Submit(draft) => self.submit(draft),
            Step::Quit => Ok(Step::Quit),
        }
    }

    fn select_deck(&mut self) -> Result<String, Error> {
        let decks = match self.toolkit.deck_names() {
            Ok(decks) => decks,
            Err(e) => {
                report(self.prompter, "Could not list decks", e);
                Vec::new()
            }
        };
        if decks.is_empty() {
            return Ok(self.config.default_deck.clone());
        }

        let default = decks
            .iter()
            .position(|d| *d == self.config.default_deck)
            .unwrap_or(0);
        let choice = self.prompter.select("Select deck", &decks, default)?;
        Ok(decks
            .get(choice)
            .cloned()
            .unwrap_or_else(|| self.config.default_deck.clone()))
    }

    fn await_word(&mut self) -> Result<Step, Error> {
        self.prompter.say(&"-".repeat(40));
        let prompt = format!("Enter word (or '{}')", self.config.quit_sentinel);
        let answer = self.prompter.input(&prompt)?;
        let word = answer.trim();

        if word.eq_ignore_ascii_case(&self.config.quit_sentinel) {
            return Ok(Step::Quit);
        }
        if word.is_empty() {
            return Ok(Step::AwaitWord);
        }
        Ok(Step::Lookup(word.to_string()))
    }

    fn lookup(&mut self, word: &str) -> Step {
        let Some(mut draft) = CardDraft::new(word) else {
            return Step::AwaitWord;
        };
        let config = self.config;

        match self.toolkit.lookup(config, word) {
            Ok(found) => {
                self.prompter
                    .say(&format!("Definitions found: {}", found.definitions.len()));
                draft.fill_from(found);
            }
            Err(e) => report(self.prompter, "Lookup failed, fields left empty", e),
        }

        match self.toolkit.fetch_audio(config, word) {
            Ok(audio) => draft.audio = Some(audio),
            Err(e) => report(self.prompter, "No pronunciation audio", e),
        }

        if let Err(e) = self.toolkit.open_references(config, word) {
            report(self.prompter, "Could not open the browser", e);
        }

        Step::Edit(draft)
    }

    fn resolve_picture(&mut self, mut draft: CardDraft) -> Result<Step, Error> {
        let answer = self
            .prompter
            .input("Picture (URL or Path)")
            .map_err(|e| discard(&draft, e))?;

        match self.toolkit.resolve_picture(self.config, draft.word(), &answer) {
            Ok(picture) => draft.picture = picture,
            Err(e) => report(self.prompter, "No picture", e),
        }

        let add = self
            .prompter
            .confirm("Add card?", true)
            .map_err(|e| discard(&draft, e))?;
        if !add {
            draft.discard_media();
            self.prompter.say("Card skipped.");
            return Ok(Step::AwaitWord);
        }
        Ok(Step::Submit(draft))
    }

    fn submit(&mut self, draft: CardDraft) -> Result<Step, Error> {
        let choices = ["Retry".to_string(), "Abandon this card".to_string()];
        loop {
            match self.toolkit.submit(self.config, &draft, &self.deck) {
                Ok(id) => {
                    self.prompter.say(&format!("Card added! ID: {id}"));
                    draft.discard_media();
                    return Ok(Step::AwaitWord);
                }
                Err(e) => {
                    report(self.prompter, "Failed to add card", e);
                    let choice = self
                        .prompter
                        .select("What now?", &choices, 0)
                        .map_err(|e| discard(&draft, e))?;
                    if choice != 0 {
                        draft.discard_media();
                        self.prompter.say("Card abandoned.");
                        return Ok(Step::AwaitWord);
                    }
                }
            }
        }
    }
}

/// Tell the user about a recovered failure and log it.
fn report<P: Prompter>(prompter: &mut P, what: &str, err: impl Display) {
    warn!(error = %err, "{what}");
    prompter.warn(&format!("{what}: {err}"));
}

/// Drop a draft's downloaded media when its card is interrupted.
fn discard(draft: &CardDraft, err: io::Error) -> Error {
    draft.discard_media();
    err.into()
}
