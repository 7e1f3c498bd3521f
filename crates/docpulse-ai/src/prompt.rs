//! Prompt template and reply parsing for grounded document questions

/// Topic assigned when the model does not label one.
pub const DEFAULT_TOPIC: &str = "General";

/// Build the grounded Q&A prompt.
///
/// The model is instructed to answer only from the supplied document and to
/// reply in a fixed two-line format so the answer and topic can be split
/// apart without structured-output support.
pub fn build_prompt(document_text: &str, question: &str) -> String {
    format!(
        "You are a helpful assistant answering questions about a document.\n\
         Use ONLY the document content below to answer. If the document does not\n\
         contain the answer, say so.\n\n\
         DOCUMENT:\n{document_text}\n\n\
         QUESTION: {question}\n\n\
         Reply in exactly this format:\n\
         ANSWER: <your answer>\n\
         TOPIC: <a short topic label for this question, 1-3 words>"
    )
}

/// Split a model reply into (answer, topic).
///
/// The reply is split on the first "TOPIC:" marker; a leading "ANSWER:"
/// prefix is stripped from the answer half. A missing or empty topic falls
/// back to [`DEFAULT_TOPIC`].
pub fn parse_reply(reply: &str) -> (String, String) {
    let (answer_part, topic_part) = match reply.split_once("TOPIC:") {
        Some((a, t)) => (a, Some(t)),
        None => (reply, None),
    };

    let answer = answer_part
        .trim()
        .strip_prefix("ANSWER:")
        .map(str::trim)
        .unwrap_or_else(|| answer_part.trim())
        .to_string();

    let topic = topic_part
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TOPIC)
        .to_string();

    (answer, topic)
}
