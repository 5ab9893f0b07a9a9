use std::collections::BTreeSet;

use bicho_core::bet::dto::{BetItem, Colocacao, GameType};
use bicho_core::bet::modality;
use bicho_core::bet::store::BetStore;
use bicho_core::flow::dto::{Step, ValueMode};
use bicho_core::flow::machine::ColocacaoFlow;
use bicho_core::helpers::money::format_brl;
use bicho_core::lottery::dto::LotteryCatalog;
use bicho_core::lottery::selector::available_bancas;
use chrono::{Datelike, NaiveDate, NaiveDateTime, Weekday};
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};

use crate::bet::dto::{BetAction, BetSession, CartAction};
use crate::bet::session::booking_dates;

/// Value presets in cents.
const VALUE_PRESETS: [u32; 6] = [100, 200, 500, 1000, 2000, 5000];

pub type Screen = (String, InlineKeyboardMarkup);

fn button(label: impl Into<String>, action: BetAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), action.to_data())
}

fn cart_button(label: impl Into<String>, action: CartAction) -> InlineKeyboardButton {
    InlineKeyboardButton::callback(label.into(), action.to_data())
}

fn chunk_rows(buttons: Vec<InlineKeyboardButton>, per_row: usize) -> Vec<Vec<InlineKeyboardButton>> {
    buttons.chunks(per_row).map(|c| c.to_vec()).collect()
}

fn nav_row() -> Vec<InlineKeyboardButton> {
    vec![
        button("⬅️ Voltar", BetAction::Back),
        button("✖️ Cancelar", BetAction::Cancel),
    ]
}

fn weekday_label(day: Weekday) -> &'static str {
    match day {
        Weekday::Mon => "Seg",
        Weekday::Tue => "Ter",
        Weekday::Wed => "Qua",
        Weekday::Thu => "Qui",
        Weekday::Fri => "Sex",
        Weekday::Sat => "Sáb",
        Weekday::Sun => "Dom",
    }
}

pub fn format_date(data: NaiveDate) -> String {
    format!("{} {}", weekday_label(data.weekday()), data.format("%d/%m"))
}

/// Renders whatever the session is waiting for.
pub fn render(
    session: &BetSession,
    store: &BetStore,
    catalog: &LotteryCatalog,
    now: NaiveDateTime,
) -> Screen {
    let setup = &session.setup;
    let tipo = session
        .flow
        .as_ref()
        .map(|f| f.selection().tipo)
        .or(setup.tipo);

    match (&session.flow, tipo) {
        (_, None) => tipo_screen(),
        (Some(_), Some(tipo)) if session.adding_modality => match &setup.modalidade {
            None => modalidade_screen(tipo),
            Some(code) => colocacao_screen(code),
        },
        (Some(flow), Some(_)) => flow_screen(session, flow, store, catalog, now),
        (None, Some(tipo)) => match (&setup.modalidade, &setup.colocacao) {
            (None, _) => modalidade_screen(tipo),
            (Some(code), None) => colocacao_screen(code),
            (Some(_), Some(_)) => date_screen(now.date()),
        },
    }
}

fn tipo_screen() -> Screen {
    let row: Vec<_> = GameType::ALL
        .iter()
        .map(|t| button(t.label(), BetAction::Tipo(*t)))
        .collect();
    (
        "🎯 Nova aposta\n\nEscolha o jogo:".to_string(),
        InlineKeyboardMarkup::new(vec![row, vec![button("✖️ Cancelar", BetAction::Cancel)]]),
    )
}

fn modalidade_screen(tipo: GameType) -> Screen {
    let buttons = modality::for_game(tipo)
        .map(|m| button(m.label, BetAction::Modalidade(m.code.to_string())))
        .collect();
    let mut rows = chunk_rows(buttons, 2);
    rows.push(nav_row());
    (
        format!("🎯 {}\n\nEscolha a modalidade:", tipo.label()),
        InlineKeyboardMarkup::new(rows),
    )
}

fn colocacao_screen(code: &str) -> Screen {
    let Some(modalidade) = modality::find(code) else {
        return tipo_screen();
    };
    let buttons = modalidade
        .colocacoes
        .iter()
        .filter_map(|c| c.parse::<Colocacao>().ok())
        .map(|c| {
            let label = format!("{} (x{})", c.label(), modalidade.multiplicador(&c));
            button(label, BetAction::Colocacao(c))
        })
        .collect();
    let mut rows = chunk_rows(buttons, 1);
    rows.push(nav_row());
    (
        format!("🎯 {}\n\nEscolha a colocação:", modalidade.label),
        InlineKeyboardMarkup::new(rows),
    )
}

fn date_screen(today: NaiveDate) -> Screen {
    let buttons = booking_dates(today)
        .into_iter()
        .map(|d| {
            let label = if d == today {
                format!("Hoje {}", d.format("%d/%m"))
            } else {
                format_date(d)
            };
            button(label, BetAction::Data(d))
        })
        .collect();
    let mut rows = chunk_rows(buttons, 3);
    rows.push(nav_row());
    (
        "📅 Para qual dia é a aposta?".to_string(),
        InlineKeyboardMarkup::new(rows),
    )
}

fn header(flow: &ColocacaoFlow) -> String {
    let selection = flow.selection();
    let modalidade = flow
        .modalidade()
        .map(|m| m.label)
        .unwrap_or(selection.modalidade.as_str());
    format!(
        "🎯 {} · {} · {}\n📅 {}",
        selection.tipo.label(),
        modalidade,
        selection.colocacao.label(),
        format_date(selection.data)
    )
}

fn flow_screen(
    session: &BetSession,
    flow: &ColocacaoFlow,
    store: &BetStore,
    catalog: &LotteryCatalog,
    now: NaiveDateTime,
) -> Screen {
    match flow.step() {
        Step::Palpite => palpite_screen(flow),
        Step::Valor => valor_screen(flow, session.valor),
        Step::Resumo => resumo_screen(flow),
        Step::Loterias => loterias_screen(session, flow, store, catalog, now),
        Step::Finished => (
            "✅ Apostas adicionadas ao carrinho.".to_string(),
            InlineKeyboardMarkup::new(Vec::<Vec<InlineKeyboardButton>>::new()),
        ),
    }
}

fn palpite_screen(flow: &ColocacaoFlow) -> Screen {
    let selection = flow.selection();
    let hint = flow.modalidade().map(|m| m.hint()).unwrap_or_default();
    let listed = if selection.palpites.is_empty() {
        "Nenhum palpite ainda.".to_string()
    } else {
        selection.palpites.join(", ")
    };
    let text = format!(
        "{}\n\n✍️ Digite seus palpites ({}).\nVários de uma vez: separe por espaço ou vírgula.\n\nPalpites: {}",
        header(flow),
        hint,
        listed
    );

    let removals = selection
        .palpites
        .iter()
        .map(|p| button(format!("🗑️ {}", p), BetAction::RemovePalpite(p.clone())))
        .collect();
    let mut rows = chunk_rows(removals, 3);
    let mut actions = vec![button("🎲 Surpresinha", BetAction::Surpresinha)];
    if flow.can_advance() {
        actions.push(button("➡️ Continuar", BetAction::Next));
    }
    rows.push(actions);
    rows.push(nav_row());
    (text, InlineKeyboardMarkup::new(rows))
}

fn valor_screen(flow: &ColocacaoFlow, valor: Option<f64>) -> Screen {
    let palpites = flow.selection().palpites.len();
    let mut text = format!(
        "{}\n\n💰 Quanto quer apostar? Escolha ou digite um valor.\nPalpites: {}",
        header(flow),
        palpites
    );

    let mut rows = chunk_rows(
        VALUE_PRESETS
            .iter()
            .map(|cents| button(format_brl(*cents as f64 / 100.0), BetAction::Valor(*cents)))
            .collect(),
        3,
    );

    if let Some(v) = valor {
        text.push_str(&format!(
            "\n\nValor escolhido: {}\nEsse valor vale para todos os palpites juntos ou para cada um?",
            format_brl(v)
        ));
        rows.push(vec![
            button("👥 Dividir entre todos", BetAction::Modo(ValueMode::Todos)),
            button("👤 Para cada", BetAction::Modo(ValueMode::Cada)),
        ]);
    }
    rows.push(nav_row());
    (text, InlineKeyboardMarkup::new(rows))
}

fn resumo_screen(flow: &ColocacaoFlow) -> Screen {
    let text = match flow.resumo() {
        Ok(resumo) => format!(
            "{}\n\n🧾 Resumo\nPalpites: {} ({})\nValor por palpite: {}\nMultiplicador: x{}\nTotal por sorteio: {}\nPrêmio por acerto: {}",
            header(flow),
            resumo.palpites,
            flow.selection().palpites.join(", "),
            format_brl(resumo.valor_unitario),
            resumo.multiplicador,
            format_brl(resumo.total),
            format_brl(resumo.premio)
        ),
        Err(e) => format!("{}\n\n⚠️ {}", header(flow), e),
    };
    let rows = vec![
        vec![button("🎰 Escolher loterias", BetAction::Push)],
        nav_row(),
    ];
    (text, InlineKeyboardMarkup::new(rows))
}

fn loterias_screen(
    session: &BetSession,
    flow: &ColocacaoFlow,
    store: &BetStore,
    catalog: &LotteryCatalog,
    now: NaiveDateTime,
) -> Screen {
    let available = available_bancas(catalog, flow.selection().data, now);
    let selection = &session.lotteries;

    let mut text = format!(
        "{}\n\n📝 {} aposta(s) aguardando, {} por sorteio.\n🎰 Escolha as loterias.",
        header(flow),
        store.pending_items().len(),
        format_brl(store.pending_total())
    );
    if available.is_empty() {
        text.push_str("\n\n⏰ Nenhuma loteria aberta para esta data.");
    } else {
        text.push_str(&format!("\nSelecionadas: {}", selection.len()));
    }

    let mut rows = Vec::new();
    for banca in &available {
        let mark = if selection.is_banca_fully_selected(banca) { "☑️" } else { "🏦" };
        rows.push(vec![button(
            format!("{} {}", mark, banca.banca.nome),
            BetAction::ToggleBanca(banca.banca.id.clone()),
        )]);
        let slots = banca
            .loterias
            .iter()
            .map(|l| {
                let mark = if selection.is_selected(&l.id) { "✅" } else { "▫️" };
                button(format!("{} {}", mark, l.horario), BetAction::ToggleLoteria(l.id.clone()))
            })
            .collect();
        rows.extend(chunk_rows(slots, 4));
    }

    rows.push(vec![button("➕ Outra modalidade", BetAction::MoreModality)]);
    if !selection.is_empty() {
        rows.push(vec![button("🛒 Adicionar ao carrinho", BetAction::Confirm)]);
    }
    rows.push(nav_row());
    (text, InlineKeyboardMarkup::new(rows))
}

fn describe_item(index: usize, item: &BetItem, catalog: &LotteryCatalog) -> String {
    let line = &item.line;
    let modalidade = modality::find(&line.modalidade)
        .map(|m| m.label)
        .unwrap_or(line.modalidade.as_str());
    let loterias = item
        .loterias
        .iter()
        .map(|id| catalog.loteria(id).map(|l| l.nome.as_str()).unwrap_or(id.as_str()))
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "{}. {} · {} · {}\n   Palpites: {}\n   {} x {} sorteio(s)\n   Loterias: {}\n   Subtotal: {}",
        index + 1,
        modalidade,
        line.colocacao.label(),
        format_date(line.data),
        line.palpites.join(", "),
        format_brl(line.stake_per_draw()),
        item.horarios.len(),
        loterias,
        format_brl(item.total())
    )
}

/// Cart view with per-item and per-lottery removal.
pub fn cart_screen(store: &BetStore, catalog: &LotteryCatalog) -> Screen {
    if store.items().is_empty() {
        return (
            "🛒 Seu carrinho está vazio.\n\nUse /apostar para começar.".to_string(),
            InlineKeyboardMarkup::new(Vec::<Vec<InlineKeyboardButton>>::new()),
        );
    }

    let body = store
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| describe_item(i, item, catalog))
        .collect::<Vec<_>>()
        .join("\n\n");
    let text = format!(
        "🛒 Carrinho ({} aposta(s))\n\n{}\n\n💵 Total: {}",
        store.items().len(),
        body,
        format_brl(store.total())
    );

    let removals = store
        .items()
        .iter()
        .enumerate()
        .map(|(i, item)| cart_button(format!("🗑️ Aposta {}", i + 1), CartAction::Remove(item.id.clone())))
        .collect();
    let mut rows = chunk_rows(removals, 3);

    let loterias: BTreeSet<&str> = store
        .items()
        .iter()
        .flat_map(|item| item.loterias.iter().map(String::as_str))
        .collect();
    let lottery_buttons = loterias
        .into_iter()
        .map(|id| {
            let nome = catalog.loteria(id).map(|l| l.nome.as_str()).unwrap_or(id);
            cart_button(format!("❌ {}", nome), CartAction::RemoveLoteria(id.to_string()))
        })
        .collect();
    rows.extend(chunk_rows(lottery_buttons, 2));

    rows.push(vec![
        cart_button("✅ Finalizar", CartAction::Checkout),
        cart_button("🧹 Limpar", CartAction::Clear),
    ]);
    (text, InlineKeyboardMarkup::new(rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bicho_core::bet::dto::BetLine;

    const CATALOG: &str = r#"(bancas: [
        (id: "ptrio", nome: "PT Rio", loterias: [
            (id: "ptrio-1120", nome: "PT 11:20", horario: "11:20"),
            (id: "ptrio-1820", nome: "PT 18:20", horario: "18:20"),
        ]),
    ])"#;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 22)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn callback_data(markup: &InlineKeyboardMarkup) -> Vec<String> {
        markup
            .inline_keyboard
            .iter()
            .flatten()
            .filter_map(|b| match &b.kind {
                teloxide::types::InlineKeyboardButtonKind::CallbackData(data) => Some(data.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_format_date_uses_portuguese_weekdays() {
        let saturday = NaiveDate::from_ymd_opt(2026, 10, 24).unwrap();
        assert_eq!(format_date(saturday), "Sáb 24/10");
    }

    #[test]
    fn test_empty_session_asks_for_game() {
        let catalog = LotteryCatalog::from_ron_str(CATALOG).unwrap();
        let (text, markup) = render(&BetSession::default(), &BetStore::new(), &catalog, now());
        assert!(text.contains("Escolha o jogo"));
        assert!(callback_data(&markup).contains(&"bet_tipo:quininha".to_string()));
    }

    #[test]
    fn test_colocacao_screen_lists_offered_positions() {
        let catalog = LotteryCatalog::from_ron_str(CATALOG).unwrap();
        let mut session = BetSession::default();
        session.setup.tipo = Some(GameType::Loterias);
        session.setup.modalidade = Some("milhar".to_string());

        let (text, markup) = render(&session, &BetStore::new(), &catalog, now());
        assert!(text.contains("Escolha a colocação"));
        let data = callback_data(&markup);
        assert!(data.contains(&BetAction::Colocacao(Colocacao::new(1, 1).unwrap()).to_data()));
        assert!(data.contains(&BetAction::Colocacao(Colocacao::new(1, 5).unwrap()).to_data()));
    }

    #[test]
    fn test_date_screen_offers_booking_window() {
        let catalog = LotteryCatalog::from_ron_str(CATALOG).unwrap();
        let mut session = BetSession::default();
        session.setup.tipo = Some(GameType::Loterias);
        session.setup.modalidade = Some("milhar".to_string());
        session.setup.colocacao = Some(Colocacao::new(1, 1).unwrap());

        let (_, markup) = render(&session, &BetStore::new(), &catalog, now());
        let data = callback_data(&markup);
        assert!(data.contains(&"bet_data:2026-10-22".to_string()));
        assert!(data.contains(&"bet_data:2026-10-28".to_string()));
        assert!(!data.contains(&"bet_data:2026-10-29".to_string()));
    }

    #[test]
    fn test_cart_lists_distinct_lotteries() {
        let catalog = LotteryCatalog::from_ron_str(CATALOG).unwrap();
        let mut store = BetStore::new();
        for palpite in ["1234", "5678"] {
            store.add_pending_item(BetLine {
                tipo: GameType::Loterias,
                data: now().date(),
                modalidade: "milhar".to_string(),
                colocacao: Colocacao::new(1, 1).unwrap(),
                palpites: vec![palpite.to_string()],
                valor_unitario: 1.0,
                multiplicador: 4000.0,
            });
        }
        store
            .finalize_pending_items(&["ptrio-1820".to_string()], &["18:20".to_string()])
            .unwrap();

        let (text, markup) = cart_screen(&store, &catalog);
        assert!(text.contains("PT 18:20"));
        assert!(text.contains("R$ 2,00"));
        let data = callback_data(&markup);
        assert_eq!(data.iter().filter(|d| d.starts_with("cart_rmlot:")).count(), 1);
        assert!(data.contains(&"cart_checkout".to_string()));
    }
}
