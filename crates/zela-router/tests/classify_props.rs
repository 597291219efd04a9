// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use proptest::prelude::*;
use zela_core::LastAction;
use zela_router::{ContextSignals, IntentDetails, IntentKind, classify};

fn signals() -> impl Strategy<Value = ContextSignals> {
    (
        any::<bool>(),
        prop_oneof![
            Just(None),
            Just(Some(LastAction::ExtractingTransaction)),
            Just(Some(LastAction::Confirming)),
            Just(Some(LastAction::Editing)),
            Just(Some(LastAction::Question)),
        ],
    )
        .prop_map(|(has_pending_extraction, last_action)| ContextSignals {
            has_pending_extraction,
            last_action,
        })
}

proptest! {
    #[test]
    fn classify_is_total_and_bounded(text in "\\PC{0,200}", ctx in signals()) {
        let result = classify(&text, Some(&ctx));
        prop_assert!((0.0..=1.0).contains(&result.confidence));
        prop_assert!(!result.reason.is_empty());
    }

    #[test]
    fn classify_is_deterministic(text in "\\PC{0,80}", ctx in signals()) {
        prop_assert_eq!(classify(&text, Some(&ctx)), classify(&text, Some(&ctx)));
    }

    #[test]
    fn pending_reply_only_with_pending_extraction(text in "(sim|nao|ok|cancela)( [a-z]{1,6}){0,2}") {
        let result = classify(&text, None);
        let is_pending_reply = matches!(result.details, IntentDetails::PendingReply { .. });
        prop_assert!(!is_pending_reply);
    }

    #[test]
    fn deletion_identifier_is_uppercase(id in "[a-z]{2}[0-9][a-z]{2}") {
        let result = classify(&format!("excluir transação {id}"), None);
        prop_assert_eq!(result.kind, IntentKind::DeletionRequest);
        prop_assert_eq!(result.details, IntentDetails::Deletion { identifier: Some(id.to_ascii_uppercase()) });
    }
}

#[test]
fn huge_message_is_classified() {
    let text = format!("gastei 10 {}", "x ".repeat(50_000));
    assert_eq!(classify(&text, None).kind, IntentKind::Transaction);
}
