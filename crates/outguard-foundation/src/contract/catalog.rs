//! Static contract catalog and instruction prompt rendering

use outguard_kernel::governance::{Contract, ContractType, OutputRule, RuleCheck, VoiceStyle};

// =============================================================================
// Directives
// =============================================================================

/// Appended to instruction and correction prompts in json-only mode.
pub const JSON_ONLY_DIRECTIVE: &str = "JSON-ONLY MODE: reply with a single valid JSON value and nothing else. No prose, no markdown, no code fences.";

/// Appended to instruction and correction prompts for operational incidents.
pub const INCIDENT_DIRECTIVE: &str = "INCIDENT MODE: be direct and factual. Lead with the impact, then the next steps. No speculation.";

const SECRETS_DIRECTIVE: &str =
    "Never include API keys, passwords, email addresses or phone numbers in the answer.";

// =============================================================================
// Rules
// =============================================================================

const NON_EMPTY: OutputRule =
    OutputRule::enforced("Do not return an empty answer.", RuleCheck::NonEmpty);
const USER_LANGUAGE: OutputRule = OutputRule::advisory("Answer in the user's language.");

static GENERAL_CHAT_RULES: [OutputRule; 3] = [
    USER_LANGUAGE,
    NON_EMPTY,
    OutputRule::advisory("Prefer short paragraphs or bullet lists."),
];

static JSON_FIX_RULES: [OutputRule; 3] = [
    OutputRule::enforced("Return the corrected JSON document.", RuleCheck::RequiresJson),
    OutputRule::advisory("Keep every original key unless it is invalid."),
    OutputRule::advisory("Do not surround the JSON with explanations."),
];

static LOG_ANALYSIS_RULES: [OutputRule; 5] = [
    USER_LANGUAGE,
    NON_EMPTY,
    OutputRule::advisory("List the errors found in the log, most severe first."),
    OutputRule::enforced(
        "When returning JSON, include the keys \"summary\" and \"errors\".",
        RuleCheck::RequiredKeys(&["summary", "errors"]),
    ),
    OutputRule::advisory("Point to the most likely root cause."),
];

static SPREADSHEET_RULES: [OutputRule; 4] = [
    NON_EMPTY,
    OutputRule::advisory("Describe the columns and the volume of data."),
    OutputRule::enforced(
        "When returning JSON, include the keys \"summary\" and \"insights\".",
        RuleCheck::RequiredKeys(&["summary", "insights"]),
    ),
    OutputRule::advisory("Quote figures exactly as they appear in the data."),
];

static DOCUMENT_SUMMARY_RULES: [OutputRule; 4] = [
    USER_LANGUAGE,
    NON_EMPTY,
    OutputRule::enforced("Keep the summary under 400 words.", RuleCheck::MaxWords(400)),
    OutputRule::advisory("Open with the purpose of the document, then its key points."),
];

static VISUAL_RULES: [OutputRule; 4] = [
    NON_EMPTY,
    OutputRule::advisory("Describe what is visible before diagnosing."),
    OutputRule::enforced(
        "When returning JSON, include the keys \"diagnosis\" and \"steps\".",
        RuleCheck::RequiredKeys(&["diagnosis", "steps"]),
    ),
    OutputRule::advisory("Give the fix as numbered steps."),
];

static ACTION_RULES: [OutputRule; 3] = [
    OutputRule::enforced("Describe the action as a JSON object.", RuleCheck::RequiresJson),
    OutputRule::enforced(
        "Include the keys \"action\" and \"parameters\".",
        RuleCheck::RequiredKeys(&["action", "parameters"]),
    ),
    OutputRule::advisory("Never claim the action was already executed."),
];

static INCIDENT_RULES: [OutputRule; 4] = [
    NON_EMPTY,
    OutputRule::advisory("State the impact in one sentence."),
    OutputRule::enforced(
        "When returning JSON, include the keys \"severity\", \"impact\" and \"next_steps\".",
        RuleCheck::RequiredKeys(&["severity", "impact", "next_steps"]),
    ),
    OutputRule::advisory("Give concrete next steps with an owner when known."),
];

// =============================================================================
// Catalog
// =============================================================================

static GENERAL_CHAT: Contract = Contract {
    contract_type: ContractType::GeneralChat,
    title: "General conversation",
    output_rules: &GENERAL_CHAT_RULES,
    voice: VoiceStyle::Summarize,
};

static JSON_FIX: Contract = Contract {
    contract_type: ContractType::JsonFix,
    title: "JSON repair",
    output_rules: &JSON_FIX_RULES,
    voice: VoiceStyle::JsonChangeCount,
};

static LOG_ANALYSIS: Contract = Contract {
    contract_type: ContractType::LogAnalysis,
    title: "Log analysis",
    output_rules: &LOG_ANALYSIS_RULES,
    voice: VoiceStyle::Canned(
        "Log analysis complete. The details and likely causes are in the chat.",
    ),
};

static SPREADSHEET_ANALYSIS: Contract = Contract {
    contract_type: ContractType::SpreadsheetAnalysis,
    title: "Spreadsheet analysis",
    output_rules: &SPREADSHEET_RULES,
    voice: VoiceStyle::Canned("Spreadsheet analysis complete. The insights are in the chat."),
};

static DOCUMENT_SUMMARY: Contract = Contract {
    contract_type: ContractType::DocumentSummary,
    title: "Document summary",
    output_rules: &DOCUMENT_SUMMARY_RULES,
    voice: VoiceStyle::Summarize,
};

static VISUAL_TROUBLESHOOTING: Contract = Contract {
    contract_type: ContractType::VisualTroubleshooting,
    title: "Visual troubleshooting",
    output_rules: &VISUAL_RULES,
    voice: VoiceStyle::Summarize,
};

static ACTION_EXECUTION: Contract = Contract {
    contract_type: ContractType::ActionExecution,
    title: "Action execution",
    output_rules: &ACTION_RULES,
    voice: VoiceStyle::Canned(
        "The action is ready. Review the details in the chat before running it.",
    ),
};

static INCIDENT: Contract = Contract {
    contract_type: ContractType::Incident,
    title: "Incident response",
    output_rules: &INCIDENT_RULES,
    voice: VoiceStyle::Summarize,
};

/// Look up the static definition of a contract.
#[must_use]
pub fn get_contract(contract_type: ContractType) -> &'static Contract {
    match contract_type {
        ContractType::GeneralChat => &GENERAL_CHAT,
        ContractType::JsonFix => &JSON_FIX,
        ContractType::LogAnalysis => &LOG_ANALYSIS,
        ContractType::SpreadsheetAnalysis => &SPREADSHEET_ANALYSIS,
        ContractType::DocumentSummary => &DOCUMENT_SUMMARY,
        ContractType::VisualTroubleshooting => &VISUAL_TROUBLESHOOTING,
        ContractType::ActionExecution => &ACTION_EXECUTION,
        ContractType::Incident => &INCIDENT,
    }
}

/// Render a contract's rules as a numbered list, one rule per line.
pub fn numbered_rules(contract: &Contract) -> String {
    contract
        .output_rules
        .iter()
        .enumerate()
        .map(|(idx, rule)| format!("{}. {}", idx + 1, rule.text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the instruction block prepended to a user prompt.
///
/// The block names the contract, lists its rules in order and appends the
/// json-only and incident directives when flagged.
#[must_use]
pub fn build_contract_prompt(contract_type: ContractType, json_only: bool, incident: bool) -> String {
    let contract = get_contract(contract_type);
    let mut prompt = format!(
        "## Output contract: {}\nFollow these rules:\n{}\n{}",
        contract.title,
        numbered_rules(contract),
        SECRETS_DIRECTIVE
    );
    if json_only {
        prompt.push('\n');
        prompt.push_str(JSON_ONLY_DIRECTIVE);
    }
    if incident {
        prompt.push('\n');
        prompt.push_str(INCIDENT_DIRECTIVE);
    }
    prompt
}
