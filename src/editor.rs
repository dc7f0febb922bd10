// Interactive editor: walks the draft's fields in a fixed order and lets the
// user replace each one. A blank answer keeps what the lookup found.

use std::io;

use crate::draft::CardDraft;
use crate::ui::{self, Prompter};

/// Values longer than this are printed on their own before the prompt.
const INLINE_LIMIT: usize = 60;

/// Apply an answer to a field: blank keeps `current`, anything else replaces
/// it verbatim.
pub fn apply_answer(current: &str, answer: String) -> String {
    if answer.trim().is_empty() {
        current.to_string()
    } else {
        answer
    }
}

/// Prompt for a new value of `label`, showing `current` as the default.
pub fn edit_field<P: Prompter>(p: &mut P, label: &str, current: &str) -> io::Result<String> {
    let prompt = if current.contains("<br>") || current.chars().count() > INLINE_LIMIT {
        p.say(&format!("{label}:\n{}", current.replace("<br>", "\n")));
        format!("Edit {label} (Enter to keep)")
    } else if current.is_empty() {
        label.to_string()
    } else {
        format!("Edit {label} [{current}]")
    };
    let answer = p.input(&prompt)?;
    Ok(apply_answer(current, answer))
}

/// Edit every user-facing field of the draft in order.
pub fn edit_draft<P: Prompter>(p: &mut P, draft: &mut CardDraft) -> io::Result<()> {
    p.say(&ui::heading(&format!("Card Details: {}", draft.word())));

    draft.translation = edit_field(p, "Definition", &draft.translation)?;
    draft.ipa = edit_field(p, "IPA", &draft.ipa)?;
    draft.pos = edit_field(p, "PoS", &draft.pos)?;
    draft.examples = edit_field(p, "Examples", &draft.examples)?;
    draft.notes = edit_field(p, "Notes", &draft.notes)?;
    Ok(())
}
