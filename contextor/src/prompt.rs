//! Prompt builder: labeled context block + a single question prompt.

use rag_store::Metadata;

/// Separator placed between context sections.
pub const SECTION_SEPARATOR: &str = "\n\n---\n\n";

const PREAMBLE: &str = "You are a helpful assistant specialized in MkDocs documentation.";
const INSTRUCTION: &str = "Provide a clear, accurate answer based on the context above:";

/// Source label for a chunk: its `file_path`, or `Unknown`.
pub fn source_label(metadata: &Metadata) -> &str {
    metadata
        .get("file_path")
        .and_then(|v| v.as_str())
        .unwrap_or("Unknown")
}

/// Builds the context block, one `[Source: ...]` section per chunk, in ranking order.
///
/// Returns an empty string when there are no chunks.
///
/// # Example
/// ```
/// # use contextor::prompt::build_context_block;
/// let docs = vec!["pip install mkdocs".to_string()];
/// let metas = vec![serde_json::Map::new()];
/// assert_eq!(build_context_block(&docs, &metas), "[Source: Unknown]\npip install mkdocs");
/// ```
pub fn build_context_block(documents: &[String], metadatas: &[Metadata]) -> String {
    documents
        .iter()
        .zip(metadatas)
        .map(|(doc, meta)| format!("[Source: {}]\n{}", source_label(meta), doc))
        .collect::<Vec<_>>()
        .join(SECTION_SEPARATOR)
}

/// Builds the final prompt sent to the model.
pub fn build_prompt(question: &str, context: &str) -> String {
    format!(
        "{PREAMBLE}\n\nContext from MkDocs documentation:\n{context}\n\nQuestion: {question}\n\n{INSTRUCTION}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn meta(v: serde_json::Value) -> Metadata {
        v.as_object().cloned().unwrap_or_default()
    }

    #[test]
    fn sections_are_labeled_and_separated() {
        let docs = vec!["Install with pip.".to_string(), "Use mkdocs.yml.".to_string()];
        let metas = vec![
            meta(json!({"file_path": "docs/install.md"})),
            meta(json!({"title": "no path here"})),
        ];

        let block = build_context_block(&docs, &metas);
        assert_eq!(
            block,
            "[Source: docs/install.md]\nInstall with pip.\n\n---\n\n[Source: Unknown]\nUse mkdocs.yml."
        );
    }

    #[test]
    fn non_string_file_path_falls_back_to_unknown() {
        assert_eq!(source_label(&meta(json!({"file_path": 7}))), "Unknown");
    }

    #[test]
    fn prompt_has_preamble_context_question_and_instruction() {
        let p = build_prompt("How do I install MkDocs?", "[Source: a.md]\ntext");
        assert!(p.starts_with(PREAMBLE));
        assert!(p.contains("Context from MkDocs documentation:\n[Source: a.md]\ntext"));
        assert!(p.contains("\n\nQuestion: How do I install MkDocs?\n\n"));
        assert!(p.ends_with(INSTRUCTION));
    }

    #[test]
    fn empty_context_still_yields_prompt() {
        let block = build_context_block(&[], &[]);
        assert!(block.is_empty());
        let p = build_prompt("q", &block);
        assert!(p.contains("Context from MkDocs documentation:\n\n\nQuestion: q"));
    }
}
