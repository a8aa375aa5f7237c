//! Prompt Composer: profile framing, then graph facts, then the question.
//!
//! Pure and deterministic: the same inputs always produce the same prompt.

use std::fmt::Write;

use crate::context::ContextFact;
use crate::generation::prompts::{
    ANSWER_INSTRUCTION, CONTEXT_HEADER, NO_CONTEXT_LINE, PREPARED_ANSWERS_HEADER, PROFILE_HEADER,
    QUESTION_HEADER,
};
use crate::llm_client::prompts::GROUNDING_INSTRUCTION;
use crate::profile::Profile;

pub fn compose_prompt(profile: &Profile, question: &str, facts: &[ContextFact]) -> String {
    let question = question.trim();
    let relevant = profile.relevant_answer(question);
    let mut prompt = String::new();

    // Writing into a String cannot fail.
    let _ = writeln!(prompt, "{PROFILE_HEADER}");
    let _ = writeln!(prompt, "Name: {}", profile.name);
    let _ = writeln!(prompt, "Role: {}", profile.role);
    let _ = writeln!(prompt, "Experience: {}", profile.experience);
    let _ = writeln!(prompt);

    let _ = writeln!(prompt, "{PREPARED_ANSWERS_HEADER}");
    for answer in &profile.answers {
        let _ = writeln!(prompt, "[{}]", answer.category);
        let _ = writeln!(prompt, "{}", collapse_whitespace(&answer.answer));
    }
    if let Some(answer) = relevant {
        let _ = writeln!(
            prompt,
            "Most relevant prepared answer for this question: [{}]",
            answer.category
        );
    }
    let _ = writeln!(prompt);

    let _ = writeln!(prompt, "{CONTEXT_HEADER}");
    if facts.is_empty() {
        let _ = writeln!(prompt, "{NO_CONTEXT_LINE}");
    } else {
        for fact in facts {
            let _ = writeln!(prompt, "- {}: {}", fact.key, fact.value);
        }
    }
    let _ = writeln!(prompt);

    if relevant.is_none() && facts.is_empty() {
        let _ = writeln!(prompt, "{}", collapse_whitespace(GROUNDING_INSTRUCTION));
        let _ = writeln!(prompt);
    }

    let _ = writeln!(prompt, "{QUESTION_HEADER}");
    let _ = writeln!(prompt, "{question}");
    let _ = writeln!(prompt);
    let _ = write!(prompt, "{ANSWER_INSTRUCTION}");

    prompt
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
