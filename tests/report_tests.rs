/// Worked-example tests for settlement option computation and report rendering
use rust_sma_api::models::ClaimForm;
use rust_sma_api::report::{compute_options, render_report, NOT_INFORMED};

fn claim_form(
    settlement_value: f64,
    participation_value: f64,
    workshop_estimate: f64,
    rental_days: u32,
) -> ClaimForm {
    ClaimForm {
        beneficiary_name: "João da Silva".to_string(),
        plate: "ABC1D23".to_string(),
        vehicle: "Gol 1.6".to_string(),
        incident_date: "2024-03-05".to_string(),
        settlement_value,
        participation_value,
        workshop_estimate,
        repair_days: "12".to_string(),
        rental_days,
    }
}

#[test]
fn worked_example_matches_expected_values() {
    let options = compute_options(&claim_form(1000.0, 200.0, 0.0, 3));

    assert_eq!(options.base_value, 800.0);
    assert_eq!(options.await_repair.cost, 800.0);
    assert_eq!(options.await_repair.rental_car_cost, 225.0);
    assert_eq!(options.await_repair.total, 1025.0);
    assert_eq!(options.cash_agreement.value, 520.0);
    // workshop estimate absent: option 3 falls back to the base value
    assert_eq!(options.workshop_advance.value, 472.0);
    assert_eq!(options.workshop_advance.total, 697.0);

    // 520 < 697 < 1025: the cash agreement is the cheapest option
    assert_eq!(options.recommended.option, 2);
    assert_eq!(options.recommended.amount, 520.0);
    assert!(options.recommended.text.contains("Opção 2 (Acordo em Dinheiro)"));
    assert!(options.recommended.text.contains("R$ 520,00"));
}

#[test]
fn workshop_estimate_drives_option_three_when_positive() {
    let options = compute_options(&claim_form(1000.0, 200.0, 600.0, 0));
    assert_eq!(options.workshop_advance.value, 354.0);
    assert_eq!(options.workshop_advance.total, 354.0);
    assert_eq!(options.recommended.option, 3);
}

#[test]
fn all_zero_options_recommend_the_first() {
    // Every option computes to 0; the running minimum keeps the earliest.
    let options = compute_options(&claim_form(0.0, 0.0, 0.0, 0));
    assert_eq!(options.await_repair.total, 0.0);
    assert_eq!(options.cash_agreement.value, 0.0);
    assert_eq!(options.workshop_advance.total, 0.0);
    assert_eq!(options.recommended.option, 1);
}

#[test]
fn rental_days_only_affect_options_one_and_three() {
    let without_rental = compute_options(&claim_form(1000.0, 200.0, 0.0, 0));
    let with_rental = compute_options(&claim_form(1000.0, 200.0, 0.0, 4));

    assert_eq!(
        with_rental.cash_agreement.value,
        without_rental.cash_agreement.value
    );
    assert_eq!(
        with_rental.await_repair.total,
        without_rental.await_repair.total + 300.0
    );
    assert_eq!(
        with_rental.workshop_advance.total,
        without_rental.workshop_advance.total + 300.0
    );
}

#[test]
fn report_substitutes_every_known_token() {
    let form = claim_form(1000.0, 200.0, 0.0, 3);
    let options = compute_options(&form);
    let template = "\
        <h1>{{NOME_BENEFICIARIO}} - {{PLACA}}</h1>\
        <p>{{DATA_SINISTRO}}</p>\
        <p>{{VALOR_BASE}}</p>\
        <p>{{OPCAO1_TOTAL}} / {{OPCAO2_VALOR}} / {{OPCAO3_TOTAL}}</p>\
        <ul>{{OPCAO1_VANTAGENS}}</ul>\
        <footer>{{RECOMENDACAO}}</footer>";

    let document = render_report(&form, &options, template);

    assert!(document.contains("João da Silva - ABC1D23"));
    assert!(document.contains("05/03/2024"));
    assert!(document.contains("R$ 800,00"));
    assert!(document.contains("R$ 1.025,00"));
    assert!(document.contains("R$ 520,00"));
    assert!(document.contains("R$ 697,00"));
    assert!(document.contains("<li>Veículo reparado</li>"));
    assert!(document.contains("mais vantajosa"));
    assert!(!document.contains("{{"));
}

#[test]
fn badge_and_class_render_only_on_recommended_option() {
    let form = claim_form(1000.0, 200.0, 600.0, 0);
    let options = compute_options(&form);
    assert_eq!(options.recommended.option, 3);

    let template =
        "1[{{OPCAO1_RECOMENDADA}}|{{OPCAO1_BADGE}}] 2[{{OPCAO2_RECOMENDADA}}|{{OPCAO2_BADGE}}] \
         3[{{OPCAO3_RECOMENDADA}}|{{OPCAO3_BADGE}}]";
    let document = render_report(&form, &options, template);

    assert!(document.contains("1[|]"));
    assert!(document.contains("2[|]"));
    assert!(document.contains("3[recomendada|"));
    assert!(document.contains("RECOMENDADA"));
}

#[test]
fn unknown_tokens_survive_and_other_tokens_still_substitute() {
    let form = claim_form(1000.0, 200.0, 0.0, 0);
    let options = compute_options(&form);
    let template = "{{VALOR_BASE}} {{TOKEN_DESCONHECIDO}} {{VEICULO}}";

    let document = render_report(&form, &options, template);

    assert!(document.contains("R$ 800,00"));
    assert!(document.contains("{{TOKEN_DESCONHECIDO}}"));
    assert!(document.contains("Gol 1.6"));
}

#[test]
fn absent_optional_fields_render_not_informed() {
    let form = ClaimForm::default();
    let options = compute_options(&form);
    let template = "{{NOME_BENEFICIARIO}}|{{DATA_SINISTRO}}|{{ORCAMENTO_OFICINA}}|{{DIAS_REPARACAO}}";

    let document = render_report(&form, &options, template);

    let expected = format!(
        "{}|{}|{}|{}",
        NOT_INFORMED, NOT_INFORMED, NOT_INFORMED, NOT_INFORMED
    );
    assert_eq!(document, expected);
}

#[test]
fn financing_section_renders_empty() {
    let form = claim_form(1000.0, 200.0, 0.0, 0);
    let options = compute_options(&form);
    let document = render_report(&form, &options, "[{{FINANCIAMENTO_SECTION}}]");
    assert_eq!(document, "[]");
}

#[test]
fn generation_timestamp_is_filled_in_local_format() {
    let form = claim_form(1000.0, 200.0, 0.0, 0);
    let options = compute_options(&form);
    let document = render_report(&form, &options, "{{DATA_GERACAO}}");

    let pattern = regex::Regex::new(r"^\d{2}/\d{2}/\d{4} \d{2}:\d{2}:\d{2}$").unwrap();
    assert!(
        pattern.is_match(&document),
        "unexpected timestamp: {}",
        document
    );
}

#[test]
fn empty_template_renders_empty_document() {
    let form = claim_form(1000.0, 200.0, 0.0, 0);
    let options = compute_options(&form);
    assert_eq!(render_report(&form, &options, ""), "");
}
