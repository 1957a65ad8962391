use crate::domain::RankedDocument;

/// Returned instead of an empty context block so the generator can tell the
/// model that no grounding is available.
pub const NO_CONTEXT_SENTINEL: &str = "No relevant documents found for context";

/// Wraps each surviving document in an indexed delimiter, in reranked order.
pub fn assemble_context(documents: &[RankedDocument]) -> String {
    if documents.is_empty() {
        return NO_CONTEXT_SENTINEL.to_string();
    }

    let mut context = String::new();
    for (i, ranked) in documents.iter().enumerate() {
        let tag = i + 1;
        context.push_str(&format!(
            "<Relevant Document #{tag}>\n{}\n</Relevant Document #{tag}>\n",
            ranked.document.text
        ));
    }
    context
}
