// Speech adapters: uploaded audio → question text, answer text → audio.
// Both are optional; the ask pipeline degrades when either fails.

pub mod audio;
pub mod stt;
pub mod tts;
