//! Channel views of an accepted response

use super::voice::VoiceSummarizer;
use crate::contract::get_contract;
use crate::security::{RegexSecretScanner, mask_json};
use crate::validation::{JsonIsland, extract_json};
use chrono::Utc;
use outguard_kernel::VoiceBudget;
use outguard_kernel::governance::{
    ContractType, DetailPayload, FormatOptions, FormattedOutput, SecretScanner,
};
use serde_json::Value;
use std::sync::Arc;

/// Derives the markdown, voice and detail views of a response.
#[derive(Clone)]
pub struct ResponseFormatter {
    scanner: Arc<dyn SecretScanner>,
    voice: VoiceSummarizer,
}

impl Default for ResponseFormatter {
    fn default() -> Self {
        Self::new(Arc::new(RegexSecretScanner::default()), VoiceBudget::default())
    }
}

impl ResponseFormatter {
    pub fn new(scanner: Arc<dyn SecretScanner>, budget: VoiceBudget) -> Self {
        Self {
            scanner,
            voice: VoiceSummarizer::new(budget),
        }
    }

    /// Format `text` for every channel.
    pub fn format(&self, text: &str, contract_type: ContractType, options: FormatOptions) -> FormattedOutput {
        let mut markdown = if options.secrets_detected {
            self.scanner.mask(text).masked
        } else {
            text.to_string()
        };
        let mut secrets_detected = options.secrets_detected;

        let mut json_data = None;
        if let Some(JsonIsland {
            span,
            parsed: Ok(value),
        }) = extract_json(&markdown)
        {
            let masked = mask_json(self.scanner.as_ref(), &value);
            if masked != value {
                secrets_detected = true;
                let pretty = markdown[span.clone()].contains('\n');
                let rendered = if pretty {
                    serde_json::to_string_pretty(&masked)
                } else {
                    serde_json::to_string(&masked)
                };
                markdown.replace_range(span, &rendered.unwrap_or_default());
            }
            json_data = Some(masked);
        }
        let has_json = json_data.is_some();

        let voice_script = self.voice.script(
            &markdown,
            get_contract(contract_type).voice,
            json_data.as_ref(),
            secrets_detected,
        );

        let content = match &json_data {
            Some(json) if options.json_only => json.clone(),
            _ => Value::String(markdown.clone()),
        };

        FormattedOutput {
            voice_script,
            detail_payload: DetailPayload {
                contract_type,
                content,
                json_data: json_data.clone(),
                timestamp: Utc::now(),
            },
            markdown,
            has_json,
            json_data,
            secrets_warning: secrets_detected,
        }
    }
}
