//! Prompt construction for the classification oracle.

use finder_core::Catalog;

/// System instruction enumerating the catalog.
///
/// The oracle must answer with a single JSON object and pick ids strictly
/// from the listed services; ambiguity maps to an empty id, which the
/// validation boundary turns into a failed result.
pub fn system_instruction(catalog: &Catalog) -> String {
    let mut prompt = String::from(
        "You are an intent classifier for a customer service line. Analyze the \
         REQUEST and reply with exactly one JSON object of the form \
         {\"service_id\": \"<id>\", \"service_name\": \"<name>\"}, choosing \
         strictly one of the services listed below. If no service clearly \
         matches, reply {\"service_id\": \"\", \"service_name\": \"\"}. Do not \
         add any text, explanation, prefix, or suffix outside the JSON.\n\n\
         VALID SERVICES:\n",
    );
    for (id, name) in catalog.iter() {
        prompt.push_str(&format!("- ID {}: {}\n", id, name));
    }
    prompt
}

/// User message wrapping the utterance.
pub fn user_message(utterance: &str) -> String {
    format!(
        "REQUEST: '{}'\n\nReply in the format: {{\"service_id\": string, \"service_name\": string}}",
        utterance
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_instruction_lists_every_service() {
        let catalog = Catalog::default();
        let prompt = system_instruction(&catalog);

        for (id, name) in catalog.iter() {
            assert!(prompt.contains(&format!("- ID {}: {}", id, name)));
        }
        assert!(prompt.contains("service_id"));
    }

    #[test]
    fn user_message_embeds_the_utterance() {
        let message = user_message("where is my card");
        assert!(message.contains("REQUEST: 'where is my card'"));
    }
}
