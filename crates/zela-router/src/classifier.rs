// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rule-table intent classification.
//!
//! Decides which pipeline handles a message before any LLM call is made.
//! Rules are evaluated in table order and the first match wins; keyword sets
//! overlap ("paguei a conta" has both a schedule keyword and a payment verb),
//! so the order is part of the behavior. No network, no side effects.

use zela_core::LastAction;

use crate::intent::{CommandToken, ContextSignals, IntentDetails, IntentKind, IntentResult};
use crate::text::{fold, has_any_phrase, scan_window, starts_with_phrase, words};

/// Help-seeking phrases (whole words, folded).
const HELP_PHRASES: &[&str] = &[
    "ajuda", "help", "socorro", "menu", "tutorial", "instrucoes",
    "como funciona", "como usar", "como uso", "como eu uso",
    "o que voce faz", "o que voce pode fazer", "nao sei usar",
];

/// Balance inquiries.
const BALANCE_PHRASES: &[&str] = &[
    "saldo", "balanco", "quanto tenho", "quanto eu tenho", "quanto sobrou",
    "quanto me resta", "quanto resta",
];

/// Deletion requests.
const DELETION_PHRASES: &[&str] = &[
    "excluir", "exclua", "exclui", "deletar", "delete", "apagar", "apague",
    "remover", "remova",
];

/// Future-dated obligations.
const SCHEDULE_PHRASES: &[&str] = &[
    "agendar", "agende", "agendamento", "agendamentos", "lembrar", "lembre",
    "lembrete", "lembretes", "boleto", "boletos", "conta", "contas",
    "pagamento", "pagamentos", "recebimento", "recebimentos", "para dia",
    "no dia", "vencimento", "vencimentos", "vence", "marcar", "programar",
];

/// Words accepting a pending extraction.
const CONFIRM_WORDS: &[&str] = &[
    "sim", "s", "ok", "isso", "certo", "correto", "confirmo", "confirma",
    "confirmar", "pode", "salva", "salvar", "registra", "registrar", "beleza",
    "blz",
];

/// Words rejecting a pending extraction.
const REJECT_WORDS: &[&str] = &[
    "nao", "n", "cancela", "cancelar", "descarta", "descartar", "errado",
];

/// Words that open a question.
const INTERROGATIVES: &[&str] = &[
    "quanto", "quanta", "quantos", "quantas", "qual", "quais", "como",
    "quando", "onde", "quem", "porque", "por que", "o que", "sera", "posso",
    "devo", "tenho como",
];

/// Vocabulary that suggests an income or expense when no digit is present.
const TRANSACTION_WORDS: &[&str] = &[
    "gastei", "paguei", "comprei", "recebi", "ganhei", "transferi",
    "depositei", "vendi", "pix", "salario", "gasto", "despesa", "receita",
    "reais", "real", "mil",
];

/// A pending-reply must be short to count as one.
const MAX_REPLY_WORDS: usize = 4;

/// A digit-free follow-up after a question stays a question up to this length.
const MAX_FOLLOW_UP_WORDS: usize = 6;

/// Identifiers are five characters over `A-Z0-9`.
const IDENTIFIER_LEN: usize = 5;

/// Message as seen by the rules.
struct Probe<'a> {
    raw: &'a str,
    folded: &'a str,
    words: &'a [&'a str],
    signals: ContextSignals,
}

/// One row of the decision table.
struct Rule {
    kind: IntentKind,
    confidence: f32,
    reason: &'static str,
    detect: fn(&Probe<'_>) -> Option<IntentDetails>,
}

/// Evaluated top to bottom; the first rule that detects wins.
const RULES: &[Rule] = &[
    Rule {
        kind: IntentKind::Command,
        confidence: 1.0,
        reason: "short command",
        detect: detect_command,
    },
    Rule {
        kind: IntentKind::Help,
        confidence: 0.9,
        reason: "help phrase",
        detect: detect_help,
    },
    Rule {
        kind: IntentKind::Balance,
        confidence: 0.9,
        reason: "balance phrase",
        detect: detect_balance,
    },
    Rule {
        kind: IntentKind::DeletionRequest,
        confidence: 0.9,
        reason: "deletion phrase",
        detect: detect_deletion,
    },
    Rule {
        kind: IntentKind::Schedule,
        confidence: 0.8,
        reason: "schedule keyword",
        detect: detect_schedule,
    },
    Rule {
        kind: IntentKind::Transaction,
        confidence: 0.85,
        reason: "reply to pending extraction",
        detect: detect_pending_reply,
    },
    Rule {
        kind: IntentKind::Question,
        confidence: 0.7,
        reason: "interrogative",
        detect: detect_question,
    },
    Rule {
        kind: IntentKind::Question,
        confidence: 0.5,
        reason: "follow-up to a question",
        detect: detect_follow_up,
    },
    Rule {
        kind: IntentKind::Transaction,
        confidence: 0.6,
        reason: "value or transaction verb",
        detect: detect_transaction,
    },
];

/// Classifies an inbound message.
///
/// `context` is read only for its pending extraction and last action. Never
/// fails: without any signal the result is [`IntentKind::Unknown`], which the
/// dispatcher still tries against the transaction extractor.
pub fn classify(text: &str, context: Option<&ContextSignals>) -> IntentResult {
    let raw = text.trim();
    if raw.is_empty() {
        return IntentResult {
            kind: IntentKind::Unknown,
            confidence: 1.0,
            details: IntentDetails::None,
            reason: "empty message",
        };
    }

    // Every rule, raw or folded, sees the same bounded prefix.
    let raw = scan_window(raw);
    let folded = fold(raw);
    let words = words(&folded);
    let probe = Probe {
        raw,
        folded: folded.trim(),
        words: &words,
        signals: context.copied().unwrap_or_default(),
    };

    RULES
        .iter()
        .find_map(|rule| {
            (rule.detect)(&probe).map(|details| IntentResult {
                kind: rule.kind,
                confidence: rule.confidence,
                details,
                reason: rule.reason,
            })
        })
        .unwrap_or(IntentResult {
            kind: IntentKind::Unknown,
            confidence: 0.3,
            details: IntentDetails::None,
            reason: "no signal",
        })
}

fn detect_command(p: &Probe<'_>) -> Option<IntentDetails> {
    let (slashed, body) = match p.folded.strip_prefix('/') {
        Some(rest) => (true, rest),
        None => (false, p.folded),
    };
    let token = body.trim().trim_end_matches(['!', '.', '?']);
    if let Some(comando) = CommandToken::parse(token) {
        return Some(IntentDetails::Command { comando });
    }
    if slashed && !token.is_empty() && !token.contains(char::is_whitespace) {
        return Some(IntentDetails::Command {
            comando: CommandToken::Unrecognized(token.to_string()),
        });
    }
    None
}

fn detect_help(p: &Probe<'_>) -> Option<IntentDetails> {
    has_any_phrase(p.words, HELP_PHRASES).then_some(IntentDetails::None)
}

fn detect_balance(p: &Probe<'_>) -> Option<IntentDetails> {
    has_any_phrase(p.words, BALANCE_PHRASES).then_some(IntentDetails::None)
}

fn detect_deletion(p: &Probe<'_>) -> Option<IntentDetails> {
    if !has_any_phrase(p.words, DELETION_PHRASES) {
        return None;
    }
    Some(IntentDetails::Deletion {
        identifier: find_identifier(p.raw),
    })
}

/// Picks the identifier out of "Excluir Transação ABC12".
///
/// A five-character alphanumeric token qualifies if it contains a digit or
/// was typed in capitals; digit-bearing tokens are preferred.
fn find_identifier(raw: &str) -> Option<String> {
    let candidates: Vec<&str> = raw
        .split_whitespace()
        .map(|t| t.trim_matches(|c: char| !c.is_ascii_alphanumeric()))
        .filter(|t| t.len() == IDENTIFIER_LEN && t.bytes().all(|b| b.is_ascii_alphanumeric()))
        .filter(|t| !DELETION_PHRASES.contains(&t.to_ascii_lowercase().as_str()))
        .collect();

    candidates
        .iter()
        .find(|t| t.bytes().any(|b| b.is_ascii_digit()))
        .or_else(|| {
            candidates
                .iter()
                .find(|t| t.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()))
        })
        .map(|t| t.to_ascii_uppercase())
}

fn detect_schedule(p: &Probe<'_>) -> Option<IntentDetails> {
    has_any_phrase(p.words, SCHEDULE_PHRASES).then_some(IntentDetails::None)
}

fn detect_pending_reply(p: &Probe<'_>) -> Option<IntentDetails> {
    if !p.signals.has_pending_extraction || p.words.len() > MAX_REPLY_WORDS {
        return None;
    }
    let first = p.words.first()?;
    if REJECT_WORDS.contains(first) {
        Some(IntentDetails::PendingReply { accepted: false })
    } else if CONFIRM_WORDS.contains(first) {
        Some(IntentDetails::PendingReply { accepted: true })
    } else {
        None
    }
}

fn detect_question(p: &Probe<'_>) -> Option<IntentDetails> {
    let interrogative = p.raw.contains('?')
        || INTERROGATIVES
            .iter()
            .any(|q| starts_with_phrase(p.words, q));
    interrogative.then_some(IntentDetails::None)
}

fn detect_follow_up(p: &Probe<'_>) -> Option<IntentDetails> {
    let follow_up = p.signals.last_action == Some(LastAction::Question)
        && p.words.len() <= MAX_FOLLOW_UP_WORDS
        && !p.raw.chars().any(|c| c.is_ascii_digit());
    follow_up.then_some(IntentDetails::None)
}

fn detect_transaction(p: &Probe<'_>) -> Option<IntentDetails> {
    let signal = p.raw.chars().any(|c| c.is_ascii_digit())
        || has_any_phrase(p.words, TRANSACTION_WORDS);
    signal.then_some(IntentDetails::None)
}
