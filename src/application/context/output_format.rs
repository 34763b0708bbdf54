//! NDJSON output-format provider.
//!
//! Injects the wire contract the stream decoder depends on. Every prompt
//! that will be decoded as a stream must carry this fragment; without it
//! the model has no reason to emit one object per line.

use async_trait::async_trait;

use crate::domain::context::{
    ContextError, ContextPayload, ContextProvider, MetadataEntry, PayloadKind,
};

/// Renders the NDJSON contract plus the target schema as a system fragment.
pub struct OutputFormatProvider;

#[async_trait]
impl ContextProvider for OutputFormatProvider {
    fn name(&self) -> &'static str {
        "output_format"
    }

    fn payload_kind(&self) -> PayloadKind {
        PayloadKind::OutputFormat
    }

    fn priority(&self) -> i32 {
        1
    }

    async fn provide(&self, payload: &ContextPayload) -> Result<Vec<MetadataEntry>, ContextError> {
        let ContextPayload::OutputFormat(ctx) = payload else {
            return Ok(Vec::new());
        };

        let schema = serde_json::to_string_pretty(&ctx.schema)
            .map_err(|e| ContextError::lookup(self.name(), e.to_string()))?;

        let contract = format!(
            "## Output format: NDJSON (newline-delimited JSON)\n\
             **Important**: respond in NDJSON only.\n\n\
             - The output must consist of NDJSON data lines only; never add prose, whitespace runs, comments, or explanations.\n\
             - Emit only RFC 8259 conformant JSON.\n\
             - Remove all markdown syntax (no ```json fences, no #, no **).\n\
             - Each line must contain exactly one complete JSON object.\n\
             - Separate objects with the newline character (`\\n`) only.\n\
             - Newlines inside string values must be written as the escape sequence `\\n`, never as a literal line break.\n\
             - Each JSON object must be independently parseable.\n\
             - Never wrap the output in an array (`[]`) or a parent object.\n\
             - Do not echo the JSON schema; generate data that conforms to it.\n\
             - Do not invent values that the schema does not allow.\n\n\
             Every output line must follow this JSON schema:\n{schema}\n"
        );

        Ok(vec![MetadataEntry::system(contract)])
    }
}
