// Ask API: the request handler that sequences speech, context, prompt,
// generation and synthesis for one interview question.

pub mod handlers;
pub mod input;
pub mod pipeline;
