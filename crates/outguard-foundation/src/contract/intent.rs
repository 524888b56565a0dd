//! Intent heuristics: contract detection, json-only and incident flags
//!
//! Pure keyword matching over the lower-cased prompt. Words and phrases
//! match whole tokens only, so "login" never counts as "log" and "also json"
//! never counts as "so json".

use outguard_kernel::governance::ContractType;

// =============================================================================
// Keyword tables
// =============================================================================

struct KeywordGroup {
    contract_type: ContractType,
    words: &'static [&'static str],
    phrases: &'static [&'static str],
}

const INCIDENT_WORDS: &[&str] = &[
    "incidente",
    "incident",
    "outage",
    "downtime",
    "indisponível",
    "indisponivel",
    "sev1",
    "sev2",
    "p1",
];

const INCIDENT_PHRASES: &[&str] = &[
    "fora do ar",
    "produção parou",
    "producao parou",
    "production down",
    "server down",
    "servidor caiu",
    "site caiu",
    "site down",
];

const JSON_ONLY_PHRASES: &[&str] = &[
    "apenas json",
    "somente json",
    "só json",
    "so json",
    "json puro",
    "only json",
    "json only",
    "json-only",
    "pure json",
    "just json",
    "raw json",
];

// Verbs that turn a mention of "json" into a repair request
const JSON_FIX_VERBS: &[&str] = &[
    "fix",
    "repair",
    "validate",
    "format",
    "corrigir",
    "corrija",
    "corrige",
    "conserta",
    "consertar",
    "arruma",
    "arrumar",
    "validar",
    "formatar",
];

/// Prompt keyword groups, in detection priority order.
static PROMPT_GROUPS: [KeywordGroup; 5] = [
    KeywordGroup {
        contract_type: ContractType::LogAnalysis,
        words: &["log", "logs", "stacktrace", "traceback"],
        phrases: &["stack trace", "error log", "log de erro"],
    },
    KeywordGroup {
        contract_type: ContractType::SpreadsheetAnalysis,
        words: &["planilha", "spreadsheet", "csv", "excel", "xlsx"],
        phrases: &["tabela de dados"],
    },
    KeywordGroup {
        contract_type: ContractType::DocumentSummary,
        words: &[
            "documento",
            "document",
            "pdf",
            "contrato",
            "resuma",
            "resumir",
            "summarize",
            "summarise",
        ],
        phrases: &[],
    },
    KeywordGroup {
        contract_type: ContractType::VisualTroubleshooting,
        words: &["screenshot", "print", "imagem", "image", "foto", "photo", "tela", "screen"],
        phrases: &["captura de tela"],
    },
    KeywordGroup {
        contract_type: ContractType::ActionExecution,
        words: &[
            "execute", "executar", "executa", "deploy", "restart", "reiniciar", "agendar",
            "schedule",
        ],
        phrases: &["abrir chamado", "abra um chamado", "open a ticket", "create a ticket"],
    },
];

// =============================================================================
// Prompt normalisation
// =============================================================================

struct NormalizedPrompt {
    /// Lower-cased, whitespace collapsed to single spaces
    text: String,
}

impl NormalizedPrompt {
    fn new(prompt: &str) -> Self {
        Self {
            text: prompt
                .to_lowercase()
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" "),
        }
    }

    fn tokens(&self) -> impl Iterator<Item = &str> {
        split_tokens(&self.text)
    }

    fn has_word(&self, words: &[&str]) -> bool {
        self.tokens().any(|token| words.contains(&token))
    }

    /// A phrase matches a run of consecutive tokens.
    fn has_phrase(&self, phrases: &[&str]) -> bool {
        let tokens: Vec<&str> = self.tokens().collect();
        phrases.iter().any(|phrase| {
            let wanted: Vec<&str> = split_tokens(phrase).collect();
            !wanted.is_empty() && tokens.windows(wanted.len()).any(|window| window == wanted.as_slice())
        })
    }

    fn matches(&self, words: &[&str], phrases: &[&str]) -> bool {
        self.has_word(words) || self.has_phrase(phrases)
    }
}

fn split_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty())
}

// =============================================================================
// File categories
// =============================================================================

/// Map an attachment type (MIME type or bare extension) to a contract.
fn file_category(file_type: &str) -> Option<ContractType> {
    let lower = file_type.trim().to_lowercase();
    let ty = lower.trim_start_matches('.');

    if ty == "json" || ty.ends_with("/json") || ty.ends_with("+json") {
        Some(ContractType::JsonFix)
    } else if ty == "log" || ty.ends_with("/x-log") || ty == "text/log" {
        Some(ContractType::LogAnalysis)
    } else if matches!(ty, "csv" | "tsv" | "xls" | "xlsx" | "ods")
        || ty.ends_with("/csv")
        || ty.contains("spreadsheet")
        || ty.contains("ms-excel")
        || ty.contains("tab-separated")
    {
        Some(ContractType::SpreadsheetAnalysis)
    } else if matches!(ty, "pdf" | "doc" | "docx" | "txt" | "md" | "rtf" | "odt")
        || ty == "application/pdf"
        || ty == "application/msword"
        || ty.contains("wordprocessing")
        || ty == "text/plain"
        || ty == "text/markdown"
    {
        Some(ContractType::DocumentSummary)
    } else if ty.starts_with("image/")
        || matches!(ty, "png" | "jpg" | "jpeg" | "gif" | "webp" | "bmp")
    {
        Some(ContractType::VisualTroubleshooting)
    } else {
        None
    }
}

/// File-derived contracts, in detection priority order.
const FILE_PRIORITY: [ContractType; 5] = [
    ContractType::JsonFix,
    ContractType::LogAnalysis,
    ContractType::SpreadsheetAnalysis,
    ContractType::DocumentSummary,
    ContractType::VisualTroubleshooting,
];

// =============================================================================
// Public API
// =============================================================================

/// Pick the contract for a prompt and its attachments.
///
/// Priority: incident keywords, then the category of the attached files,
/// then prompt keywords, then [`ContractType::GeneralChat`]. `file_types`
/// is ignored unless `has_files` is set.
#[must_use]
pub fn detect_intent<S: AsRef<str>>(prompt: &str, has_files: bool, file_types: &[S]) -> ContractType {
    let normalized = NormalizedPrompt::new(prompt);

    if normalized.matches(INCIDENT_WORDS, INCIDENT_PHRASES) {
        return ContractType::Incident;
    }

    if has_files {
        let categories: Vec<ContractType> = file_types
            .iter()
            .filter_map(|ty| file_category(ty.as_ref()))
            .collect();
        if let Some(ty) = FILE_PRIORITY.into_iter().find(|ty| categories.contains(ty)) {
            return ty;
        }
    }

    if normalized.has_word(&["json"]) && normalized.has_word(JSON_FIX_VERBS) {
        return ContractType::JsonFix;
    }

    PROMPT_GROUPS
        .iter()
        .find(|group| normalized.matches(group.words, group.phrases))
        .map_or(ContractType::GeneralChat, |group| group.contract_type)
}

/// Whether the prompt explicitly asks for a JSON-only answer.
#[must_use]
pub fn is_json_requested(prompt: &str) -> bool {
    NormalizedPrompt::new(prompt).has_phrase(JSON_ONLY_PHRASES)
}

/// Whether the prompt describes an operational incident.
#[must_use]
pub fn is_incident(prompt: &str) -> bool {
    NormalizedPrompt::new(prompt).matches(INCIDENT_WORDS, INCIDENT_PHRASES)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NO_FILES: &[&str] = &[];

    #[test]
    fn plain_question_is_general_chat() {
        assert_eq!(
            detect_intent("Qual a capital da França?", false, NO_FILES),
            ContractType::GeneralChat
        );
        assert_eq!(detect_intent("", false, NO_FILES), ContractType::GeneralChat);
    }

    #[test]
    fn incident_wins_over_everything() {
        assert_eq!(
            detect_intent("Incidente: o log mostra timeout", true, &["text/csv"]),
            ContractType::Incident
        );
        assert_eq!(
            detect_intent("checkout está fora do ar", false, NO_FILES),
            ContractType::Incident
        );
    }

    #[test]
    fn files_win_over_prompt_keywords() {
        assert_eq!(
            detect_intent("analise a planilha", true, &["image/png"]),
            ContractType::VisualTroubleshooting
        );
        assert_eq!(
            detect_intent("what is wrong here?", true, &["image/png", "application/json"]),
            ContractType::JsonFix
        );
        assert_eq!(detect_intent("veja", true, &[".log"]), ContractType::LogAnalysis);
        assert_eq!(
            detect_intent("veja", true, &["application/pdf"]),
            ContractType::DocumentSummary
        );
    }

    #[test]
    fn file_types_are_ignored_without_files() {
        assert_eq!(
            detect_intent("hello", false, &["image/png"]),
            ContractType::GeneralChat
        );
    }

    #[test]
    fn unknown_attachment_falls_back_to_prompt() {
        assert_eq!(
            detect_intent("read this log", true, &["application/octet-stream"]),
            ContractType::LogAnalysis
        );
    }

    #[test]
    fn prompt_keywords() {
        assert_eq!(
            detect_intent("Corrija este JSON: {a:1}", false, NO_FILES),
            ContractType::JsonFix
        );
        assert_eq!(
            detect_intent("Here is the stack trace", false, NO_FILES),
            ContractType::LogAnalysis
        );
        assert_eq!(
            detect_intent("resuma o contrato", false, NO_FILES),
            ContractType::DocumentSummary
        );
        assert_eq!(
            detect_intent("please restart the worker", false, NO_FILES),
            ContractType::ActionExecution
        );
    }

    #[test]
    fn single_words_match_whole_tokens() {
        assert_eq!(
            detect_intent("My login page is slow", false, NO_FILES),
            ContractType::GeneralChat
        );
        assert_eq!(
            detect_intent("the JSON looks fine, thanks", false, NO_FILES),
            ContractType::GeneralChat
        );
    }

    #[test]
    fn json_only_phrases() {
        assert!(is_json_requested("Responda APENAS  JSON, por favor"));
        assert!(is_json_requested("give me json only"));
        assert!(is_json_requested("só json"));
        assert!(!is_json_requested("explain this json"));
    }

    #[test]
    fn phrases_match_whole_tokens() {
        assert!(!is_json_requested("Can you also json-encode this list?"));
        assert!(!is_json_requested("the raw jsonl export"));
        assert!(is_json_requested("reply with JSON-only output"));
        assert!(!is_incident("the webserver downloads are slow"));
        assert!(is_incident("our server down again?"));
    }

    #[test]
    fn incident_flag() {
        assert!(is_incident("SEV1 on payments"));
        assert!(is_incident("Production down since 10:00"));
        assert!(!is_incident("how do I deploy?"));
    }
}
