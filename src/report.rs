//! Settlement option computation and printable report rendering.
//!
//! Everything here is pure and synchronous: `compute_options` derives the
//! three settlement options from the claim form, `render_report` fills the
//! print template by literal `{{TOKEN}}` substitution. Handlers own template
//! readiness and delivery.

use crate::models::ClaimForm;
use chrono::Local;
use regex::Regex;
use serde::Serialize;

/// Daily rental-car rate in BRL.
pub const DAILY_RENTAL_RATE: f64 = 75.0;
/// Cash agreement payout ratio over the net base value.
pub const CASH_AGREEMENT_RATE: f64 = 0.65;
/// Advance workshop payment ratio over the workshop estimate (or base value).
pub const WORKSHOP_ADVANCE_RATE: f64 = 0.59;

/// Literal rendered for absent optional values.
pub const NOT_INFORMED: &str = "Não informado";

const AWAIT_REPAIR_LABEL: &str = "Opção 1 (Aguardar Reparo)";
const CASH_AGREEMENT_LABEL: &str = "Opção 2 (Acordo em Dinheiro)";
const WORKSHOP_ADVANCE_LABEL: &str = "Opção 3 (Oficina Antecipada)";

const AWAIT_REPAIR_TERM: &str = "15 dias úteis";
const CASH_AGREEMENT_TERM: &str = "7 a 10 dias após acordo assinado";
const WORKSHOP_ADVANCE_TERM: &str = "Até 10 dias após finalização do serviço";

const AWAIT_REPAIR_PROS: [&str; 2] = ["Veículo reparado", "Sem desembolso imediato"];
const AWAIT_REPAIR_CONS: [&str; 2] = ["Aguardar reparo", "Sem dinheiro em mãos"];
const CASH_AGREEMENT_PROS: [&str; 2] = ["Dinheiro imediato", "Liberdade de escolha"];
const CASH_AGREEMENT_CONS: [&str; 2] = ["Valor pode ser menor", "Responsabilidade pelo reparo"];

const RECOMMENDED_BADGE: &str = r#"<span class="badge-recomendada">✓ RECOMENDADA</span>"#;
const RECOMMENDED_CLASS: &str = "recomendada";

const FALLBACK_BENEFICIARY: &str = "Associado";

/// Option 1: wait for the insurer-managed repair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AwaitRepairOption {
    pub cost: f64,
    pub rental_car_cost: f64,
    pub total: f64,
}

/// Option 2: cash settlement at a fixed discount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CashAgreementOption {
    pub value: f64,
}

/// Option 3: advance payment to the workshop.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkshopAdvanceOption {
    pub value: f64,
    pub rental_car_cost: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    /// 1-based option number.
    pub option: u8,
    pub label: String,
    pub amount: f64,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SettlementOptions {
    /// Net value after deducting participation from the settlement value.
    pub base_value: f64,
    pub await_repair: AwaitRepairOption,
    pub cash_agreement: CashAgreementOption,
    pub workshop_advance: WorkshopAdvanceOption,
    pub recommended: Recommendation,
}

/// Computes the three settlement options and the recommendation.
pub fn compute_options(form: &ClaimForm) -> SettlementOptions {
    let base_value = form.settlement_value - form.participation_value;
    let rental_car_cost = f64::from(form.rental_days) * DAILY_RENTAL_RATE;

    let await_repair = AwaitRepairOption {
        cost: base_value,
        rental_car_cost,
        total: base_value + rental_car_cost,
    };

    let cash_agreement = CashAgreementOption {
        value: base_value * CASH_AGREEMENT_RATE,
    };

    let workshop_base = if form.workshop_estimate > 0.0 {
        form.workshop_estimate
    } else {
        base_value
    };
    let workshop_value = workshop_base * WORKSHOP_ADVANCE_RATE;
    let workshop_advance = WorkshopAdvanceOption {
        value: workshop_value,
        rental_car_cost,
        total: workshop_value + rental_car_cost,
    };

    let recommended = recommend(&[
        (1, AWAIT_REPAIR_LABEL, await_repair.total),
        (2, CASH_AGREEMENT_LABEL, cash_agreement.value),
        (3, WORKSHOP_ADVANCE_LABEL, workshop_advance.total),
    ]);

    SettlementOptions {
        base_value,
        await_repair,
        cash_agreement,
        workshop_advance,
        recommended,
    }
}

/// Running-minimum reduction over the fixed option order; a strictly lower
/// amount wins, so the first option keeps exact ties.
fn recommend(candidates: &[(u8, &str, f64)]) -> Recommendation {
    let mut best = &candidates[0];
    for candidate in &candidates[1..] {
        if candidate.2 < best.2 {
            best = candidate;
        }
    }
    let (option, label, amount) = *best;
    Recommendation {
        option,
        label: label.to_string(),
        amount,
        text: format!(
            "{} é mais vantajosa (menor valor: {})",
            label,
            format_currency(amount)
        ),
    }
}

/// Formats a BRL amount the way the page's `Intl.NumberFormat('pt-BR')` does:
/// `R$ 1.234,56`. Non-finite input renders as zero.
pub fn format_currency(value: f64) -> String {
    let value = if value.is_finite() { value } else { 0.0 };
    let negative = value < 0.0;
    let cents = (value.abs() * 100.0).round() as u64;
    let whole = (cents / 100).to_string();
    let frac = cents % 100;

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(digit);
    }

    let sign = if negative { "-" } else { "" };
    format!("{}R$ {},{:02}", sign, grouped, frac)
}

/// Reformats `YYYY-MM-DD` as `DD/MM/YYYY`; empty input renders the
/// "not informed" literal and anything unparsable is echoed back.
pub fn format_date(value: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return NOT_INFORMED.to_string();
    }
    match chrono::NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        Ok(date) => date.format("%d/%m/%Y").to_string(),
        Err(_) => trimmed.to_string(),
    }
}

fn text_or_not_informed(value: &str) -> String {
    if value.is_empty() {
        NOT_INFORMED.to_string()
    } else {
        value.to_string()
    }
}

fn list_html(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", item))
        .collect()
}

fn recommendation_class(recommended: bool) -> String {
    if recommended {
        RECOMMENDED_CLASS.to_string()
    } else {
        String::new()
    }
}

fn recommendation_badge(recommended: bool) -> String {
    if recommended {
        RECOMMENDED_BADGE.to_string()
    } else {
        String::new()
    }
}

/// Fills the print template by replacing every occurrence of each known
/// `{{TOKEN}}`. Tokens the template does not contain are ignored; tokens this
/// table does not know stay in the output untouched.
pub fn render_report(form: &ClaimForm, options: &SettlementOptions, template: &str) -> String {
    let recommended = options.recommended.option;
    let generated_at = Local::now().format("%d/%m/%Y %H:%M:%S").to_string();

    let workshop_estimate = if form.workshop_estimate > 0.0 {
        format_currency(form.workshop_estimate)
    } else {
        NOT_INFORMED.to_string()
    };

    let replacements: Vec<(&str, String)> = vec![
        ("{{NOME_BENEFICIARIO}}", text_or_not_informed(&form.beneficiary_name)),
        ("{{PLACA}}", text_or_not_informed(&form.plate)),
        ("{{VEICULO}}", text_or_not_informed(&form.vehicle)),
        ("{{DATA_SINISTRO}}", format_date(&form.incident_date)),
        ("{{VALOR_REGULAGEM}}", format_currency(form.settlement_value)),
        ("{{VALOR_PARTICIPACAO}}", format_currency(form.participation_value)),
        ("{{ORCAMENTO_OFICINA}}", workshop_estimate),
        ("{{DIAS_REPARACAO}}", text_or_not_informed(&form.repair_days)),
        ("{{DIAS_CARRO_RESERVA}}", form.rental_days.to_string()),
        ("{{VALOR_BASE}}", format_currency(options.base_value)),
        ("{{OPCAO1_PRAZO}}", AWAIT_REPAIR_TERM.to_string()),
        ("{{OPCAO1_CUSTO}}", format_currency(options.await_repair.cost)),
        (
            "{{OPCAO1_CARRO_RESERVA}}",
            format_currency(options.await_repair.rental_car_cost),
        ),
        ("{{OPCAO1_TOTAL}}", format_currency(options.await_repair.total)),
        ("{{OPCAO1_VANTAGENS}}", list_html(&AWAIT_REPAIR_PROS)),
        ("{{OPCAO1_DESVANTAGENS}}", list_html(&AWAIT_REPAIR_CONS)),
        ("{{OPCAO1_RECOMENDADA}}", recommendation_class(recommended == 1)),
        ("{{OPCAO1_BADGE}}", recommendation_badge(recommended == 1)),
        ("{{OPCAO2_VALOR}}", format_currency(options.cash_agreement.value)),
        ("{{OPCAO2_PRAZO}}", CASH_AGREEMENT_TERM.to_string()),
        ("{{OPCAO2_VANTAGENS}}", list_html(&CASH_AGREEMENT_PROS)),
        ("{{OPCAO2_DESVANTAGENS}}", list_html(&CASH_AGREEMENT_CONS)),
        ("{{OPCAO2_RECOMENDADA}}", recommendation_class(recommended == 2)),
        ("{{OPCAO2_BADGE}}", recommendation_badge(recommended == 2)),
        ("{{OPCAO3_VALOR}}", format_currency(options.workshop_advance.value)),
        ("{{OPCAO3_PRAZO}}", WORKSHOP_ADVANCE_TERM.to_string()),
        (
            "{{OPCAO3_CARRO_RESERVA}}",
            format_currency(options.workshop_advance.rental_car_cost),
        ),
        ("{{OPCAO3_TOTAL}}", format_currency(options.workshop_advance.total)),
        ("{{OPCAO3_RECOMENDADA}}", recommendation_class(recommended == 3)),
        ("{{OPCAO3_BADGE}}", recommendation_badge(recommended == 3)),
        ("{{RECOMENDACAO}}", options.recommended.text.clone()),
        // Reserved for a future financing breakdown block.
        ("{{FINANCIAMENTO_SECTION}}", String::new()),
        ("{{DATA_GERACAO}}", generated_at),
    ];

    let mut content = template.to_string();
    for (token, value) in &replacements {
        content = content.replace(token, value);
    }
    content
}

/// Download filename: `Relatorio_SMA_<name>.html` with whitespace runs
/// collapsed to underscores.
pub fn report_file_name(beneficiary_name: &str) -> String {
    let name = if beneficiary_name.trim().is_empty() {
        FALLBACK_BENEFICIARY
    } else {
        beneficiary_name
    };
    let whitespace = Regex::new(r"\s+").unwrap();
    format!("Relatorio_SMA_{}.html", whitespace.replace_all(name.trim(), "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_formats_pt_br() {
        assert_eq!(format_currency(0.0), "R$ 0,00");
        assert_eq!(format_currency(0.5), "R$ 0,50");
        assert_eq!(format_currency(520.0), "R$ 520,00");
        assert_eq!(format_currency(1025.0), "R$ 1.025,00");
        assert_eq!(format_currency(1234567.89), "R$ 1.234.567,89");
        assert_eq!(format_currency(-75.0), "-R$ 75,00");
    }

    #[test]
    fn currency_clamps_non_finite_to_zero() {
        assert_eq!(format_currency(f64::NAN), "R$ 0,00");
        assert_eq!(format_currency(f64::INFINITY), "R$ 0,00");
    }

    #[test]
    fn date_reformats_iso_to_br() {
        assert_eq!(format_date("2024-03-05"), "05/03/2024");
        assert_eq!(format_date(""), NOT_INFORMED);
        assert_eq!(format_date("   "), NOT_INFORMED);
        // Unparsable dates are echoed rather than dropped.
        assert_eq!(format_date("05/03/2024"), "05/03/2024");
    }

    #[test]
    fn exact_ties_keep_the_earliest_option() {
        let recommendation = recommend(&[
            (1, AWAIT_REPAIR_LABEL, 100.0),
            (2, CASH_AGREEMENT_LABEL, 100.0),
            (3, WORKSHOP_ADVANCE_LABEL, 150.0),
        ]);
        assert_eq!(recommendation.option, 1);

        let recommendation = recommend(&[
            (1, AWAIT_REPAIR_LABEL, 200.0),
            (2, CASH_AGREEMENT_LABEL, 150.0),
            (3, WORKSHOP_ADVANCE_LABEL, 150.0),
        ]);
        assert_eq!(recommendation.option, 2);
        assert!(recommendation.text.contains("R$ 150,00"));
    }

    #[test]
    fn file_name_sanitizes_whitespace() {
        assert_eq!(
            report_file_name("João da Silva"),
            "Relatorio_SMA_João_da_Silva.html"
        );
        assert_eq!(report_file_name(""), "Relatorio_SMA_Associado.html");
        assert_eq!(
            report_file_name("  Ana\t Maria  "),
            "Relatorio_SMA_Ana_Maria.html"
        );
    }
}
