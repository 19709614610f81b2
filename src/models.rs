use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

// ============ Lenient numeric parsing ============
//
// Form values arrive as whatever the calculator page had in its inputs:
// JSON numbers, numeric strings, empty strings, or nothing at all. Anything
// that does not parse becomes 0 instead of a deserialization fault, and
// non-finite values are clamped to 0 so the wire record never carries
// NaN/Infinity.

pub(crate) fn money_from_value(value: &Value) -> f64 {
    let parsed = match value {
        Value::Number(n) => n.as_f64().unwrap_or(0.0),
        Value::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
        _ => 0.0,
    };
    if parsed.is_finite() {
        parsed
    } else {
        0.0
    }
}

/// Parses a day count the way the page's `parseInt(...) || 0` does.
pub fn parse_days(text: &str) -> u32 {
    let trimmed = text.trim();
    if let Ok(days) = trimmed.parse::<u32>() {
        return days;
    }
    match trimmed.parse::<f64>() {
        Ok(days) if days.is_finite() && days > 0.0 => days.trunc() as u32,
        _ => 0,
    }
}

pub(crate) fn days_from_value(value: &Value) -> u32 {
    match value {
        Value::Number(n) => {
            if let Some(days) = n.as_u64() {
                days.min(u64::from(u32::MAX)) as u32
            } else {
                match n.as_f64() {
                    Some(days) if days.is_finite() && days > 0.0 => days.trunc() as u32,
                    _ => 0,
                }
            }
        }
        Value::String(s) => parse_days(s),
        _ => 0,
    }
}

fn lenient_money<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(money_from_value(&value))
}

fn lenient_days<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(days_from_value(&value))
}

// Text fields tolerate null and scalar values the same way the page's
// `value || ''` fallback does.
fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    })
}

// ============ Form Input ============

/// Claim form data as collected by the calculator page.
///
/// Every field is optional on the wire; missing text fields become empty
/// strings and missing or unparsable numeric fields become 0.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimForm {
    /// Beneficiary (associate) name.
    #[serde(
        default,
        rename = "nome_beneficiario",
        deserialize_with = "lenient_string"
    )]
    pub beneficiary_name: String,
    /// Vehicle license plate.
    #[serde(default, rename = "placa", deserialize_with = "lenient_string")]
    pub plate: String,
    /// Vehicle model description.
    #[serde(default, rename = "veiculo", deserialize_with = "lenient_string")]
    pub vehicle: String,
    /// Incident date in `YYYY-MM-DD` form.
    #[serde(default, rename = "data_sinistro", deserialize_with = "lenient_string")]
    pub incident_date: String,
    /// Insurer-assessed settlement value.
    #[serde(default, rename = "valor_regulagem", deserialize_with = "lenient_money")]
    pub settlement_value: f64,
    /// Policyholder participation (deductible).
    #[serde(
        default,
        rename = "valor_participacao",
        deserialize_with = "lenient_money"
    )]
    pub participation_value: f64,
    /// Workshop repair estimate, 0 when not quoted.
    #[serde(
        default,
        rename = "orcamento_oficina",
        deserialize_with = "lenient_money"
    )]
    pub workshop_estimate: f64,
    /// Estimated repair duration. Kept as entered; the report prints it
    /// verbatim and the submission record parses it as a day count.
    #[serde(default, rename = "dias_reparacao", deserialize_with = "lenient_string")]
    pub repair_days: String,
    /// Rental car days.
    #[serde(
        default,
        rename = "dias_carro_reserva",
        deserialize_with = "lenient_days"
    )]
    pub rental_days: u32,
}

// ============ Calculation Result (external engine) ============

/// Result object produced by the page's calculation engine.
///
/// The structure is pass-through: only the paths read for submission are
/// typed, everything else rides along in `raw`. Every level is optional so a
/// partial result never faults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationResult {
    #[serde(default, rename = "calculos")]
    pub calculations: Option<CalculationTotals>,
    #[serde(default, rename = "opcoes")]
    pub options: Option<ResultOptions>,
    #[serde(default, rename = "recomendacao")]
    pub recommendation: Option<String>,
    #[serde(default, rename = "acordo_associado")]
    pub associated_agreement: Option<AssociatedAgreement>,
    #[serde(default, rename = "validacao_contraproposta")]
    pub counter_offer_limits: Option<CounterOfferLimits>,
    /// Any additional fields the engine produced.
    #[serde(flatten)]
    pub raw: serde_json::Map<String, Value>,
}

impl CalculationResult {
    /// Net base value (`calculos.valor_liquido`), 0 when absent.
    pub fn net_value(&self) -> f64 {
        self.calculations.as_ref().map(|c| c.net_value).unwrap_or(0.0)
    }

    pub fn financing(&self) -> Option<&Financing> {
        self.associated_agreement.as_ref()?.financing.as_ref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CalculationTotals {
    #[serde(default, rename = "valor_liquido", deserialize_with = "lenient_money")]
    pub net_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultOptions {
    #[serde(default, rename = "opcao_1_aguardar_reparo")]
    pub await_repair: Option<AwaitRepairResult>,
    #[serde(default, rename = "opcao_2_acordo_dinheiro")]
    pub cash_agreement: Option<CashAgreementResult>,
    #[serde(default, rename = "opcao_3_oficina_antecipada")]
    pub workshop_advance: Option<WorkshopAdvanceResult>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AwaitRepairResult {
    #[serde(
        default,
        rename = "custo_carro_reserva",
        deserialize_with = "lenient_money"
    )]
    pub rental_car_cost: f64,
    #[serde(default, rename = "custo_total", deserialize_with = "lenient_money")]
    pub total_cost: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CashAgreementResult {
    #[serde(default, rename = "valor_receber", deserialize_with = "lenient_money")]
    pub amount_received: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkshopAdvanceResult {
    #[serde(default, rename = "valor_total", deserialize_with = "lenient_money")]
    pub total_value: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AssociatedAgreement {
    #[serde(default, rename = "financiamento")]
    pub financing: Option<Financing>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Financing {
    #[serde(default, rename = "valor_operacao", deserialize_with = "lenient_money")]
    pub operation_value: f64,
    #[serde(
        default,
        rename = "taxa_mensal_pct",
        deserialize_with = "lenient_money"
    )]
    pub monthly_rate_pct: f64,
    #[serde(default, rename = "total_geral", deserialize_with = "lenient_money")]
    pub grand_total: f64,
    #[serde(
        default,
        rename = "custo_financeiro",
        deserialize_with = "lenient_money"
    )]
    pub financial_cost: f64,
    #[serde(
        default,
        rename = "percentual_custo",
        deserialize_with = "lenient_money"
    )]
    pub cost_pct: f64,
    #[serde(default, rename = "parcelas")]
    pub installments: Vec<Installment>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Installment {
    #[serde(default, rename = "vencimento", deserialize_with = "lenient_string")]
    pub due_date: String,
    #[serde(default, rename = "valor", deserialize_with = "lenient_money")]
    pub amount: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CounterOfferLimits {
    #[serde(default, rename = "limiteMin", deserialize_with = "lenient_money")]
    pub min: f64,
    #[serde(default, rename = "limiteMax", deserialize_with = "lenient_money")]
    pub max: f64,
}

// ============ Submission Record (spreadsheet API wire format) ============

/// Flat row-shaped record the spreadsheet-recording API expects.
///
/// Field names follow the API's column mapping exactly; the `camelCase`
/// rename produces the wire names (`nomeBeneficiario`, `parcela1Data`, ...).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionRecord {
    // Beneficiary (columns B..E)
    pub nome_beneficiario: String,
    pub placa_veiculo: String,
    pub modelo_veiculo: String,
    pub data_abertura_sinistro: String,

    // Claim values (columns F..H)
    pub valor_regulagem: f64,
    pub valor_participacao: f64,
    pub orcamento_oficina: f64,

    // Counter-offer and limits (columns I..K)
    pub valor_contraproposta: f64,
    pub valor_minimo_contraproposta: f64,
    pub valor_maximo_contraproposta: f64,

    // Durations (columns L..M)
    pub dias_reparacao: u32,
    pub dias_carro_reserva: u32,

    // Computed values (columns N..O)
    pub valor_carro_reserva: f64,
    pub valor_base: f64,

    // Settlement options (columns P..S)
    pub opcao1_valor: f64,
    pub opcao2_valor: f64,
    pub opcao3_valor: f64,
    pub opcao_recomendada: String,

    // Financing (columns T..Y)
    pub valor_operacao: f64,
    pub taxa_juros: f64,
    pub total_pagar: f64,
    pub custo_financeiro: f64,
    pub percentual_custo: f64,
    pub numero_parcelas: u32,

    // Installments (columns Z..AG), fixed four positional slots
    pub parcela1_data: String,
    pub parcela1_valor: f64,
    pub parcela2_data: String,
    pub parcela2_valor: f64,
    pub parcela3_data: String,
    pub parcela3_valor: f64,
    pub parcela4_data: String,
    pub parcela4_valor: f64,
}

// ============ API payloads ============

/// Response body of the spreadsheet-recording API.
///
/// Only `success` and `error` are contractual; anything else passes through.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SheetsApiResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(flatten)]
    pub raw: serde_json::Map<String, Value>,
}

/// Request body for `POST /api/v1/calculations`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionRequest {
    #[serde(default)]
    pub form: ClaimForm,
    #[serde(default)]
    pub result: CalculationResult,
    #[serde(default, rename = "contraproposta", deserialize_with = "lenient_money")]
    pub counter_offer: f64,
}

/// Request body for `POST /api/v1/calculations/counter-offer`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CounterOfferRequest {
    #[serde(default, rename = "contraproposta", deserialize_with = "lenient_money")]
    pub counter_offer: f64,
}

/// Successful submission outcome returned to the page.
#[derive(Debug, Clone, Serialize)]
pub struct SubmissionOutcome {
    pub success: bool,
    pub record: SubmissionRecord,
    pub response: SheetsApiResponse,
}
