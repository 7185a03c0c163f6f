/// Build the chat-backend extraction instruction for one chunk.
pub fn build_chat_prompt(chunk_text: &str) -> String {
    format!(
        "Extract demographic information about the patient, including their age, location, \
health, and any relevant personal details, from the following conversation between a doctor \
and a patient:\n\
{chunk_text}"
    )
}

/// Build the completion-backend extraction instruction for one chunk.
pub fn build_completion_prompt(chunk_text: &str) -> String {
    format!(
        "Extract any demographic and health information about the patient from the following \
conversation between a doctor and a patient:\n\
{chunk_text}\n\
\n\
Demographic and health information:"
    )
}
