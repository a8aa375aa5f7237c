// Section headers and fixed text for the interview answer prompt.
// The system prompt lives in llm_client::prompts.

pub const PROFILE_HEADER: &str = "CANDIDATE PROFILE (this is you):";

pub const PREPARED_ANSWERS_HEADER: &str =
    "PREPARED ANSWERS (your own words; reuse their substance, rephrase naturally):";

pub const CONTEXT_HEADER: &str =
    "KNOWLEDGE GRAPH FACTS (supplementary, most relevant first):";

pub const NO_CONTEXT_LINE: &str = "No knowledge graph facts are available for this question.";

pub const QUESTION_HEADER: &str = "INTERVIEW QUESTION:";

pub const ANSWER_INSTRUCTION: &str =
    "Answer the interview question above in the first person, as spoken dialogue.";
