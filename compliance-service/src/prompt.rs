//! Analysis prompts

use crate::mapping::RuleNameMapping;

pub const SYSTEM_PROMPT: &str = "You are an expert in compliance and tone-of-voice review.";

/// One `- <rule> (Rule Name: <name>)` line per mapping entry
pub fn render_rule_listing(mapping: &RuleNameMapping) -> String {
    mapping
        .iter()
        .map(|(rule, name)| format!("- {} (Rule Name: {})", rule, name))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_user_prompt(document_text: &str, ruleset: &str, rule_listing: &str) -> String {
    format!(
        r#"
Document Content:
{document_text}

Rules for {ruleset}:
{rule_listing}

Analyze the document for compliance with the rules. For any violations, reference the 'Rule Name' exactly as provided in the list of rules (do not invent or modify Rule Names).

Format the report as follows:
- State whether the document is "Compliant" or "Non-Compliant".
- Provide details for any violations, referencing only the Rule Names provided, using the following format:
    (number) Rule Name: State the Rule Name associated with the violation (as provided in the rules list).
    Explanation: Provide a short explanation for the violation.

Rules that have not been violated should not be featured in your report, and do not mention which rules have not been violated.
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_listing() {
        let mut mapping = RuleNameMapping::default();
        mapping.insert("no slang", "NoSlang");
        mapping.insert("formal address", "Formal");
        mapping.insert("no slang", "NoSlang2");

        assert_eq!(
            render_rule_listing(&mapping),
            "- no slang (Rule Name: NoSlang2)\n- formal address (Rule Name: Formal)"
        );
    }

    #[test]
    fn test_user_prompt_carries_inputs() {
        let prompt = render_user_prompt("Hey dude.", "Tone", "- no slang (Rule Name: NoSlang)");
        assert!(prompt.contains("Document Content:\nHey dude.\n"));
        assert!(prompt.contains("Rules for Tone:\n- no slang (Rule Name: NoSlang)\n"));
        assert!(prompt.contains("\"Compliant\" or \"Non-Compliant\""));
    }
}
