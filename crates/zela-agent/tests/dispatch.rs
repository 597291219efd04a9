// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end dispatcher tests over in-memory SQLite and a scripted assistant.

use chrono::NaiveDate;
use zela_agent::{DispatchOutcome, format};
use zela_core::types::{
    ExtractedSchedule, ExtractedTransaction, InboundMessage, NewTransaction, ScheduleKind,
    TransactionExtraction, TransactionKind,
};
use zela_core::{LastAction, StorageAdapter, encode_identifier};
use zela_identity::canonicalize;
use zela_router::IntentKind;
use zela_test_utils::{AssistantCall, TestHarness, harness_today};

const SENDER: &str = "5561981474690";
const OTHER: &str = "5511987654321";

fn expense(description: &str, amount: f64) -> ExtractedTransaction {
    ExtractedTransaction {
        description: description.to_string(),
        amount,
        category: "alimentação".to_string(),
        kind: TransactionKind::Saida,
        method: None,
    }
}

fn income(description: &str, amount: f64) -> ExtractedTransaction {
    ExtractedTransaction {
        description: description.to_string(),
        amount,
        category: "salário".to_string(),
        kind: TransactionKind::Entrada,
        method: None,
    }
}

fn extraction(transactions: Vec<ExtractedTransaction>, quality: f32) -> TransactionExtraction {
    TransactionExtraction {
        transactions,
        quality,
    }
}

async fn harness() -> TestHarness {
    TestHarness::new().await.expect("harness should build")
}

/// Inserts a row directly, bypassing the dispatcher.
async fn seed(h: &TestHarness, owner: &str, amount: f64) -> i64 {
    h.storage
        .insert_transaction(&NewTransaction {
            owner: owner.to_string(),
            description: "mercado".to_string(),
            amount,
            category: "alimentação".to_string(),
            kind: TransactionKind::Saida,
            method: None,
            occurred_at: harness_today().and_hms_opt(9, 0, 0).unwrap(),
            original_message: None,
        })
        .await
        .unwrap()
}

#[tokio::test]
async fn group_messages_are_ignored() {
    let h = harness().await;
    let outcome = h
        .dispatcher
        .handle(&InboundMessage {
            sender: SENDER.to_string(),
            text: "gastei 50 no mercado".to_string(),
            is_group: true,
            channel: "zapi".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(outcome, DispatchOutcome::Ignored);
    assert!(h.assistant.calls().await.is_empty());
}

#[tokio::test]
async fn malformed_sender_is_rejected_without_side_effects() {
    let h = harness().await;
    let outcome = h.send("not-a-phone", "gastei 50").await.unwrap();
    assert_eq!(outcome, DispatchOutcome::Rejected);
    assert!(h.assistant.calls().await.is_empty());
}

#[tokio::test]
async fn confident_extraction_is_recorded_under_canonical_owner() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(vec![expense("mercado", 50.0)], 0.95))
        .await;

    let outcome = h
        .send("whatsapp:+5561981474690", "gastei 50 no mercado")
        .await
        .unwrap();
    let DispatchOutcome::Replied {
        recipient,
        reply,
        intent,
    } = outcome
    else {
        panic!("expected a reply");
    };
    assert_eq!(recipient.digits(), SENDER);
    assert_eq!(intent, IntentKind::Transaction);

    let rows = h.storage.list_transactions(SENDER, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].owner, SENDER);
    assert_eq!(rows[0].occurred_on, "2026-03-07");
    assert_eq!(
        rows[0].original_message.as_deref(),
        Some("gastei 50 no mercado")
    );

    let code = encode_identifier(rows[0].id).unwrap();
    assert!(reply.contains(&code), "reply should show identifier {code}");

    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    assert_eq!(ctx.messages.len(), 2);
    assert_eq!(ctx.last_action, Some(LastAction::ExtractingTransaction));
}

#[tokio::test]
async fn several_transactions_in_one_message() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(
            vec![expense("café", 5.0), income("freela", 300.0), expense("nada", 0.0)],
            0.9,
        ))
        .await;

    let reply = h.reply(SENDER, "café 5 e recebi 300 de freela").await;
    assert!(reply.starts_with("*2 Transações Registradas"));
    assert_eq!(h.storage.list_transactions(SENDER, 10).await.unwrap().len(), 2);
}

#[tokio::test]
async fn low_quality_extraction_waits_for_confirmation() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(vec![expense("uber", 23.9)], 0.4))
        .await;

    let prompt = h.reply(SENDER, "uber 23,90").await;
    assert!(prompt.contains("está correto?"));
    assert!(h.storage.list_transactions(SENDER, 10).await.unwrap().is_empty());

    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    let pending = ctx.pending_extraction.expect("pending extraction");
    assert_eq!(pending.original_message.as_deref(), Some("uber 23,90"));
    assert_eq!(ctx.last_action, Some(LastAction::Confirming));

    // Confirmation arrives through the Twilio-prefixed spelling of the number.
    let saved = h.reply("whatsapp:+5561981474690", "sim").await;
    assert!(saved.contains("Registrada"));

    let rows = h.storage.list_transactions(SENDER, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].original_message.as_deref(), Some("uber 23,90"));
    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    assert!(ctx.pending_extraction.is_none());

    // Only the first message reached the extractor.
    let extractions = h
        .assistant
        .calls()
        .await
        .into_iter()
        .filter(|c| matches!(c, AssistantCall::ExtractTransactions { .. }))
        .count();
    assert_eq!(extractions, 1);
}

#[tokio::test]
async fn rejected_pending_extraction_is_discarded() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(vec![expense("uber", 23.9)], 0.4))
        .await;
    h.reply(SENDER, "uber 23,90").await;

    let reply = h.reply(SENDER, "não").await;
    assert_eq!(reply, format::pending_discarded());
    assert!(h.storage.list_transactions(SENDER, 10).await.unwrap().is_empty());

    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    assert!(ctx.pending_extraction.is_none());
    assert_eq!(ctx.last_action, Some(LastAction::Editing));
}

#[tokio::test]
async fn confirmation_threshold_is_configurable() {
    let h = TestHarness::builder()
        .with_confirm_threshold(0.0)
        .build()
        .await
        .unwrap();
    h.assistant
        .push_extraction(extraction(vec![expense("uber", 23.9)], 0.1))
        .await;
    h.reply(SENDER, "uber 23,90").await;
    assert_eq!(h.storage.list_transactions(SENDER, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn nothing_extracted_yields_not_understood() {
    let h = harness().await;
    let outcome = h.send(SENDER, "bom dia").await.unwrap();
    assert_eq!(
        outcome,
        DispatchOutcome::Replied {
            recipient: canonicalize(SENDER),
            reply: format::not_understood(),
            intent: IntentKind::Unknown,
        }
    );
}

#[tokio::test]
async fn extractor_failure_degrades_to_not_understood() {
    let h = harness().await;
    h.assistant.push_extraction_error("timeout").await;
    let reply = h.reply(SENDER, "gastei 50").await;
    assert_eq!(reply, format::not_understood());
}

#[tokio::test]
async fn balance_sums_every_spelling_of_the_owner() {
    let h = harness().await;
    seed(&h, SENDER, 40.0).await;
    // Row stored before the ninth digit was added.
    seed(&h, "556181474690", 10.0).await;
    seed(&h, OTHER, 999.0).await;

    let reply = h.reply(SENDER, "qual meu saldo").await;
    assert!(reply.contains("R$ 50,00"), "{reply}");
    assert!(!reply.contains("999"));
}

#[tokio::test]
async fn today_and_month_commands_use_the_clock() {
    let h = harness().await;
    seed(&h, SENDER, 12.5).await;

    let today = h.reply(SENDER, "/hoje").await;
    assert!(today.contains("Resumo do Dia"));
    assert!(today.contains("R$ 12,50"));

    let month = h.reply(SENDER, "mes").await;
    assert!(month.contains("Resumo do Mês"));
    assert!(month.contains("R$ 12,50"));
}

#[tokio::test]
async fn unknown_slash_command_is_reported() {
    let h = harness().await;
    let reply = h.reply(SENDER, "/xyz").await;
    assert_eq!(reply, format::unrecognized_command("xyz"));
}

#[tokio::test]
async fn help_phrase_gets_menu() {
    let h = harness().await;
    let outcome = h.send(SENDER, "como funciona isso").await.unwrap();
    let DispatchOutcome::Replied { intent, reply, .. } = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(intent, IntentKind::Help);
    assert!(reply.contains("Zela"));
}

#[tokio::test]
async fn owner_deletes_own_transaction() {
    let h = harness().await;
    let id = seed(&h, SENDER, 40.0).await;
    let code = encode_identifier(id).unwrap();

    let reply = h.reply(SENDER, &format!("Excluir Transação {code}")).await;
    assert_eq!(reply, format::transaction_deleted(&code));
    assert!(h.storage.get_transaction(id).await.unwrap().is_none());
}

#[tokio::test]
async fn nine_digit_sender_deletes_pre_migration_row() {
    let h = harness().await;
    let id = seed(&h, "556181474690", 40.0).await;
    let code = encode_identifier(id).unwrap();

    let reply = h.reply("whatsapp:+5561981474690", &format!("excluir {code}")).await;
    assert_eq!(reply, format::transaction_deleted(&code));
    assert!(h.storage.get_transaction(id).await.unwrap().is_none());
}

#[tokio::test]
async fn foreign_transaction_looks_missing_and_survives() {
    let h = harness().await;
    let id = seed(&h, OTHER, 40.0).await;
    let code = encode_identifier(id).unwrap();

    let reply = h.reply(SENDER, &format!("excluir {code}")).await;
    assert_eq!(reply, format::transaction_not_found(&code));
    assert!(h.storage.get_transaction(id).await.unwrap().is_some());

    let missing = h.reply(SENDER, "excluir ZZZZ9").await;
    assert_eq!(missing, format::transaction_not_found("ZZZZ9"));
}

#[tokio::test]
async fn deletion_without_identifier_lists_recent() {
    let h = harness().await;
    let id = seed(&h, SENDER, 40.0).await;
    seed(&h, OTHER, 1.0).await;

    let reply = h.reply(SENDER, "quero apagar uma transação").await;
    assert!(reply.contains(&encode_identifier(id).unwrap()));
    assert_eq!(reply.matches("🆔").count(), 1);
    assert!(!reply.contains("R$ 1,00"));
}

#[tokio::test]
async fn schedule_is_created_for_sender() {
    let h = harness().await;
    let due = NaiveDate::from_ymd_opt(2026, 3, 10).unwrap();
    h.assistant
        .push_schedule(Some(ExtractedSchedule {
            description: "aluguel".to_string(),
            amount: 1200.0,
            due_date: due,
            kind: ScheduleKind::Pagamento,
            category: Some("moradia".to_string()),
        }))
        .await;

    let reply = h.reply(SENDER, "agendar pagamento do aluguel 1200 para dia 10").await;
    assert!(reply.contains("Agendamento Criado"));

    let schedules = h.storage.list_schedules(SENDER, None).await.unwrap();
    assert_eq!(schedules.len(), 1);
    assert_eq!(schedules[0].due_date, "2026-03-10");
    assert_eq!(schedules[0].owner, SENDER);

    let calls = h.assistant.calls().await;
    assert!(calls.iter().any(|c| matches!(
        c,
        AssistantCall::ExtractSchedule { today, .. } if *today == harness_today()
    )));
}

#[tokio::test]
async fn schedule_keyword_without_schedule_falls_back_to_transaction() {
    let h = harness().await;
    h.assistant.push_schedule(None).await;
    h.assistant
        .push_extraction(extraction(vec![expense("conta de luz", 120.0)], 0.9))
        .await;

    let outcome = h.send(SENDER, "paguei a conta de luz 120").await.unwrap();
    let DispatchOutcome::Replied { intent, .. } = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(intent, IntentKind::Transaction);
    assert_eq!(h.storage.list_transactions(SENDER, 10).await.unwrap().len(), 1);
    assert!(h.storage.list_schedules(SENDER, None).await.unwrap().is_empty());
}

#[tokio::test]
async fn question_gets_history_and_recent_transactions() {
    let h = harness().await;
    seed(&h, SENDER, 40.0).await;
    seed(&h, OTHER, 1.0).await;
    h.assistant.push_answer("Você gastou R$ 40,00 este mês.").await;

    let reply = h.reply(SENDER, "quanto gastei com mercado?").await;
    assert_eq!(reply, "Você gastou R$ 40,00 este mês.");

    let calls = h.assistant.calls().await;
    let Some(AssistantCall::Answer {
        question,
        history,
        recent,
    }) = calls.last()
    else {
        panic!("expected an answer call, got {calls:?}");
    };
    assert_eq!(question, "quanto gastei com mercado?");
    assert!(history.contains("quanto gastei com mercado?"));
    assert_eq!(*recent, 1);

    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    assert_eq!(ctx.last_action, Some(LastAction::Question));
}

#[tokio::test]
async fn follow_up_stays_in_question_mode() {
    let h = harness().await;
    h.assistant.push_answer("Depende da sua renda.").await;
    h.assistant.push_answer("Tente guardar 10%.").await;

    h.reply(SENDER, "quanto devo poupar?").await;
    let outcome = h.send(SENDER, "e no meu caso").await.unwrap();
    let DispatchOutcome::Replied { intent, reply, .. } = outcome else {
        panic!("expected a reply");
    };
    assert_eq!(intent, IntentKind::Question);
    assert_eq!(reply, "Tente guardar 10%.");
}

#[tokio::test]
async fn failed_or_empty_answer_uses_fallback() {
    let h = harness().await;
    h.assistant.push_answer_error("rate limited").await;
    h.assistant.push_answer("   ").await;

    assert_eq!(h.reply(SENDER, "o que é CDI?").await, format::question_fallback());
    assert_eq!(h.reply(SENDER, "e selic?").await, format::question_fallback());
}

#[tokio::test]
async fn unavailable_context_store_still_answers() {
    let h = TestHarness::builder()
        .with_failing_context()
        .build()
        .await
        .unwrap();
    h.assistant
        .push_extraction(extraction(vec![expense("mercado", 50.0)], 0.95))
        .await;

    let reply = h.reply(SENDER, "gastei 50 no mercado").await;
    assert!(reply.contains("Registrada"));
    assert_eq!(h.storage.list_transactions(SENDER, 10).await.unwrap().len(), 1);
}

#[tokio::test]
async fn contexts_are_isolated_per_subscriber() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(vec![expense("uber", 23.9)], 0.4))
        .await;
    h.reply(SENDER, "uber 23,90").await;

    // "sim" from someone else has no pending extraction to confirm.
    let reply = h.reply(OTHER, "sim").await;
    assert_eq!(reply, format::not_understood());
    assert!(h.storage.list_transactions(SENDER, 10).await.unwrap().is_empty());
    assert!(h.storage.list_transactions(OTHER, 10).await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn simultaneous_confirmations_save_the_batch_once() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(vec![expense("mercado", 50.0)], 0.3))
        .await;
    let prompt = h.reply(SENDER, "gastei 50 no mercado").await;
    assert!(prompt.contains("está correto?"));

    let (a, b) = tokio::join!(h.send(SENDER, "sim"), h.send(SENDER, "sim"));
    assert!(a.is_ok() && b.is_ok());

    let rows = h.storage.list_transactions(SENDER, 10).await.unwrap();
    assert_eq!(rows.len(), 1);
    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    assert!(ctx.pending_extraction.is_none());
}

#[tokio::test]
async fn failed_confirmation_keeps_batch_without_partial_rows() {
    let h = harness().await;
    h.assistant
        .push_extraction(extraction(
            vec![expense("mercado", 50.0), expense("uber", 18.0)],
            0.3,
        ))
        .await;
    h.reply(SENDER, "mercado 50 e uber 18").await;

    h.execute_sql(
        "CREATE TRIGGER reject_uber BEFORE INSERT ON transactions \
         WHEN NEW.description = 'uber' BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
    )
    .await
    .unwrap();

    let failed = h.reply(SENDER, "sim").await;
    assert_eq!(failed, format::temporary_failure());
    assert!(h.storage.list_transactions(SENDER, 10).await.unwrap().is_empty());
    let ctx = h.contexts.get(&canonicalize(SENDER)).await.unwrap().unwrap();
    assert_eq!(
        ctx.pending_extraction.map(|p| p.transactions.len()),
        Some(2)
    );

    h.execute_sql("DROP TRIGGER reject_uber;").await.unwrap();

    let saved = h.reply(SENDER, "sim").await;
    assert!(saved.starts_with("*2 Transações Registradas"));
    assert_eq!(h.storage.list_transactions(SENDER, 10).await.unwrap().len(), 2);
}
