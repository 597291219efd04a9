// SPDX-FileCopyrightText: 2026 Zela Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! WhatsApp reply texts.
//!
//! WhatsApp renders `*bold*`, so headings are starred. Amounts are always
//! Brazilian reais (`R$ 1.234,56`) and dates `dd/mm/yyyy`.

use chrono::NaiveDate;
use zela_core::encode_identifier;
use zela_core::types::{
    ExtractedSchedule, ExtractedTransaction, LedgerSummary, ScheduleKind, TransactionKind,
    TransactionRecord,
};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// WhatsApp rejects longer bodies.
pub const MAX_MESSAGE_CHARS: usize = 4096;

/// `R$ 1.234,56`; negative amounts get a leading minus.
pub fn brl(amount: f64) -> String {
    let cents = (amount.abs() * 100.0).round() as u64;
    let (units, frac) = (cents / 100, cents % 100);
    let digits = units.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(c);
    }
    let sign = if amount < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}R$ {grouped},{frac:02}")
}

pub fn date_br(date: NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}

/// Five-character row code, or `N/A` past the encodable range.
pub fn identifier(id: i64) -> String {
    encode_identifier(id).unwrap_or_else(|| "N/A".to_string())
}

/// Capitalizes each word: `alimentação fora` -> `Alimentação Fora`.
fn title_case(text: &str) -> String {
    text.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn kind_label(kind: TransactionKind) -> &'static str {
    match kind {
        TransactionKind::Entrada => "💰 Receita",
        TransactionKind::Saida => "🔴 Despesa",
    }
}

fn transaction_block(tx: &ExtractedTransaction, date: NaiveDate) -> String {
    format!(
        "📄 *Descrição:* {}\n💰 *Valor:* {}\n🔄 *Tipo:* {}\n🏷️ *Categoria:* {}\n📅 *Data:* {}\n",
        tx.description,
        brl(tx.amount),
        kind_label(tx.kind),
        title_case(&tx.category),
        date_br(date),
    )
}

/// Confirmation for one or more freshly stored transactions.
pub fn transactions_registered(
    stored: &[(i64, ExtractedTransaction)],
    date: NaiveDate,
    panel_url: &str,
) -> String {
    match stored {
        [(id, tx)] => {
            let code = identifier(*id);
            format!(
                "*Transação Registrada Com Sucesso!*\n\n*Identificador:* {code}\n\n\
                 *Resumo Da Transação:*\n{RULE}\n{}\n\
                 ❌ *Para Excluir Diga:* \"Excluir Transação {code}\"\n\n\
                 📊 *Consulte Gráficos E Relatórios Completos Em:*\n{panel_url}",
                transaction_block(tx, date),
            )
        }
        many => {
            let mut out = format!("*{} Transações Registradas Com Sucesso!*\n\n", many.len());
            for (n, (id, tx)) in many.iter().enumerate() {
                out.push_str(&format!("*Transação {}*\n{RULE}\n", n + 1));
                out.push_str(&transaction_block(tx, date));
                out.push_str(&format!("🆔 *Identificador:* {}\n\n", identifier(*id)));
            }
            out.push_str(&format!(
                "📊 *Consulte Gráficos E Relatórios Completos Em:*\n{panel_url}"
            ));
            out
        }
    }
}

/// Asks the user to confirm a low-confidence extraction.
pub fn confirmation_prompt(transactions: &[ExtractedTransaction], date: NaiveDate) -> String {
    let mut out = String::from("🤔 *Entendi assim, está correto?*\n\n");
    for tx in transactions {
        out.push_str(&transaction_block(tx, date));
        out.push('\n');
    }
    out.push_str("Responda *sim* para salvar ou *não* para descartar.");
    out
}

pub fn pending_discarded() -> String {
    "👍 Tudo bem, descartei essas transações. Pode me mandar de novo do jeito certo.".to_string()
}

pub fn balance(summary: &LedgerSummary) -> String {
    format!(
        "💼 *Seu Saldo*\n{RULE}\n💰 Receitas: {}\n🔴 Despesas: {}\n📊 *Saldo:* {}\n📝 Transações: {}",
        brl(summary.income),
        brl(summary.expenses),
        brl(summary.balance),
        summary.count,
    )
}

pub fn day_summary(summary: &LedgerSummary) -> String {
    format!(
        "📊 *Resumo do Dia*\n\n💸 Gasto hoje: {}\n💰 Recebido hoje: {}\n📝 Transações: {}",
        brl(summary.expenses),
        brl(summary.income),
        summary.count,
    )
}

pub fn month_summary(summary: &LedgerSummary, panel_url: &str) -> String {
    format!(
        "📅 *Resumo do Mês*\n{RULE}\n💰 Receitas: {}\n🔴 Despesas: {}\n📊 *Saldo do mês:* {}\n📝 Transações: {}\n\n\
         Relatórios completos em:\n{panel_url}",
        brl(summary.income),
        brl(summary.expenses),
        brl(summary.balance),
        summary.count,
    )
}

pub fn schedule_registered(id: i64, schedule: &ExtractedSchedule) -> String {
    let label = match schedule.kind {
        ScheduleKind::Pagamento => "💸 Pagamento",
        ScheduleKind::Recebimento => "💰 Recebimento",
    };
    format!(
        "⏰ *Agendamento Criado!*\n{RULE}\n📄 *Descrição:* {}\n💰 *Valor:* {}\n🔄 *Tipo:* {label}\n📅 *Vencimento:* {}\n🆔 *Número:* {id}\n\n\
         Vou te lembrar quando estiver perto do vencimento.",
        schedule.description,
        brl(schedule.amount),
        date_br(schedule.due_date),
    )
}

pub fn transaction_deleted(code: &str) -> String {
    format!("🗑️ Transação *{code}* excluída com sucesso.")
}

/// Same text whether the row is missing or belongs to someone else.
pub fn transaction_not_found(code: &str) -> String {
    format!(
        "❓ Não encontrei a transação *{code}*.\n\nEnvie \"excluir\" para ver suas últimas transações e seus identificadores."
    )
}

/// Recent transactions with their identifiers, for picking one to delete.
pub fn recent_transactions(records: &[TransactionRecord]) -> String {
    if records.is_empty() {
        return "📭 Você ainda não tem transações registradas.".to_string();
    }
    let mut out = String::from("🗂️ *Suas Últimas Transações*\n\n");
    for r in records {
        let sign = match r.kind {
            TransactionKind::Entrada => "+",
            TransactionKind::Saida => "-",
        };
        out.push_str(&format!(
            "🆔 *{}* · {} · {sign}{}\n",
            identifier(r.id),
            r.description,
            brl(r.amount),
        ));
    }
    out.push_str("\nPara excluir diga: \"Excluir Transação ABC12\" (com o identificador).");
    out
}

pub fn help_menu(panel_url: &str) -> String {
    format!(
        "👋 *Olá! Eu sou a Zela, sua assistente financeira.*\n\n\
         💸 *Registrar gastos e receitas*\n\
         • \"Gastei 50 reais no mercado\"\n\
         • \"Recebi 500 de salário\"\n\n\
         ⏰ *Agendar pagamentos*\n\
         • \"Tenho que pagar 300 de aluguel no dia 5\"\n\n\
         📊 *Consultar*\n\
         • \"saldo\", \"/hoje\", \"/mes\"\n\
         • \"Quanto gastei esse mês?\"\n\n\
         🗑️ *Excluir*\n\
         • \"Excluir Transação ABC12\"\n\n\
         Digite /comandos para ver todos os comandos.\n\
         Painel completo: {panel_url}"
    )
}

pub fn examples() -> String {
    "📌 *Exemplos*\n\n\
     • \"Comprei livro por 40 reais\"\n\
     • \"Paguei 120 de luz no débito\"\n\
     • \"Uber 23,90\"\n\
     • \"Recebi 1.500 de freela\"\n\
     • \"Agende recebimento de 800 para dia 10\"\n\
     • \"Quanto gastei com alimentação?\""
        .to_string()
}

pub fn commands() -> String {
    "⌨️ *Comandos*\n\n\
     • /ajuda: menu de ajuda\n\
     • /exemplos: exemplos de mensagens\n\
     • /hoje: resumo do dia\n\
     • /mes: resumo do mês\n\
     • saldo: saldo total\n\
     • excluir: últimas transações para exclusão"
        .to_string()
}

pub fn unrecognized_command(token: &str) -> String {
    format!("❓ Comando \"{token}\" não reconhecido.\n\nDigite \"/ajuda\" para ver comandos disponíveis.")
}

/// Nothing financial could be read from the message.
pub fn not_understood() -> String {
    "Desculpe, não consegui entender sua mensagem 😊.\n\n\
     💡 *Dicas:*\n\
     • Para registrar gasto: \"comprei café por 5 reais\"\n\
     • Para registrar receita: \"recebi 500 reais\"\n\
     • Para ver saldo: \"saldo\"\n\
     • Para ajuda: \"ajuda\" ou \"/ajuda\""
        .to_string()
}

/// Fallback when the assistant fails or answers nothing.
pub fn question_fallback() -> String {
    "Desculpe, não consegui entender sua pergunta 😊. Poderia reformular de outra forma? \
     Estou aqui para ajudar com suas finanças ou dúvidas sobre o Zela!"
        .to_string()
}

pub fn temporary_failure() -> String {
    "⚠️ Tive um problema para processar sua mensagem agora. Tente novamente em instantes.".to_string()
}

/// Splits `text` into chunks of at most `max` characters, preferring line breaks.
pub fn split_message(text: &str, max: usize) -> Vec<String> {
    if max == 0 || text.chars().count() <= max {
        return vec![text.to_string()];
    }
    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;
    for line in text.split_inclusive('\n') {
        let line_len = line.chars().count();
        if current_len + line_len > max && !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if line_len > max {
            let chars: Vec<char> = line.chars().collect();
            for piece in chars.chunks(max) {
                chunks.push(piece.iter().collect());
            }
            continue;
        }
        current.push_str(line);
        current_len += line_len;
    }
    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
