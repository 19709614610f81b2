//! Result submitter: flattens a form/result pair into the spreadsheet row
//! shape and sends it, remembering the pair per session so a counter-offer
//! can be re-submitted later.

use crate::errors::AppError;
use crate::models::{
    parse_days, CalculationResult, ClaimForm, SubmissionOutcome, SubmissionRecord,
};
use crate::session::SessionStore;
use crate::sheets_client::SheetsClient;

/// Builds the flat record the spreadsheet API expects.
///
/// Missing or partial calculation results are never a fault: every nested
/// path defaults to 0 or empty, and the workshop-estimate column falls back
/// to the settlement value when no estimate was quoted.
pub fn build_submission_record(
    form: &ClaimForm,
    result: &CalculationResult,
    counter_offer: f64,
) -> SubmissionRecord {
    let options = result.options.as_ref();
    let financing = result.financing();
    let limits = result.counter_offer_limits.as_ref();

    let installments: &[crate::models::Installment] = financing
        .map(|f| f.installments.as_slice())
        .unwrap_or(&[]);
    let installment_date =
        |index: usize| installments.get(index).map(|p| p.due_date.clone()).unwrap_or_default();
    let installment_amount = |index: usize| installments.get(index).map(|p| p.amount).unwrap_or(0.0);

    SubmissionRecord {
        nome_beneficiario: form.beneficiary_name.clone(),
        placa_veiculo: form.plate.clone(),
        modelo_veiculo: form.vehicle.clone(),
        data_abertura_sinistro: form.incident_date.clone(),

        valor_regulagem: form.settlement_value,
        valor_participacao: form.participation_value,
        orcamento_oficina: if form.workshop_estimate != 0.0 {
            form.workshop_estimate
        } else {
            form.settlement_value
        },

        valor_contraproposta: if counter_offer.is_finite() {
            counter_offer
        } else {
            0.0
        },
        valor_minimo_contraproposta: limits.map(|l| l.min).unwrap_or(0.0),
        valor_maximo_contraproposta: limits.map(|l| l.max).unwrap_or(0.0),

        dias_reparacao: parse_days(&form.repair_days),
        dias_carro_reserva: form.rental_days,

        valor_carro_reserva: options
            .and_then(|o| o.await_repair.as_ref())
            .map(|o| o.rental_car_cost)
            .unwrap_or(0.0),
        valor_base: result.net_value(),

        opcao1_valor: options
            .and_then(|o| o.await_repair.as_ref())
            .map(|o| o.total_cost)
            .unwrap_or(0.0),
        opcao2_valor: options
            .and_then(|o| o.cash_agreement.as_ref())
            .map(|o| o.amount_received)
            .unwrap_or(0.0),
        opcao3_valor: options
            .and_then(|o| o.workshop_advance.as_ref())
            .map(|o| o.total_value)
            .unwrap_or(0.0),
        opcao_recomendada: result.recommendation.clone().unwrap_or_default(),

        valor_operacao: financing.map(|f| f.operation_value).unwrap_or(0.0),
        taxa_juros: financing.map(|f| f.monthly_rate_pct).unwrap_or(0.0),
        total_pagar: financing.map(|f| f.grand_total).unwrap_or(0.0),
        custo_financeiro: financing.map(|f| f.financial_cost).unwrap_or(0.0),
        percentual_custo: financing.map(|f| f.cost_pct).unwrap_or(0.0),
        numero_parcelas: installments.len() as u32,

        parcela1_data: installment_date(0),
        parcela1_valor: installment_amount(0),
        parcela2_data: installment_date(1),
        parcela2_valor: installment_amount(1),
        parcela3_data: installment_date(2),
        parcela3_valor: installment_amount(2),
        parcela4_data: installment_date(3),
        parcela4_valor: installment_amount(3),
    }
}

#[derive(Clone)]
pub struct SubmissionService {
    sheets: SheetsClient,
    sessions: SessionStore,
}

impl SubmissionService {
    pub fn new(sheets: SheetsClient, sessions: SessionStore) -> Self {
        Self { sheets, sessions }
    }

    /// Submits one calculation to the spreadsheet API.
    ///
    /// The form/result pair is remembered before any network I/O, matching
    /// the page lifecycle: a counter-offer may follow even a failed
    /// submission.
    pub async fn submit(
        &self,
        session_id: &str,
        form: ClaimForm,
        result: CalculationResult,
        counter_offer: f64,
    ) -> Result<SubmissionOutcome, AppError> {
        self.sessions
            .remember(session_id, form.clone(), result.clone())
            .await;

        let record = build_submission_record(&form, &result, counter_offer);
        if let Ok(payload) = serde_json::to_string(&record) {
            tracing::debug!("Outgoing submission record: {}", payload);
        }

        let response = self.sheets.record_calculation(&record).await?;

        Ok(SubmissionOutcome {
            success: true,
            record,
            response,
        })
    }

    /// Re-submits the session's last calculation with a revised
    /// counter-offer. Fails without network I/O when the session has no
    /// prior calculation.
    pub async fn resubmit_with_counter_offer(
        &self,
        session_id: &str,
        counter_offer: f64,
    ) -> Result<SubmissionOutcome, AppError> {
        let Some(previous) = self.sessions.last(session_id).await else {
            tracing::warn!(
                "Counter-offer for session '{}' without a prior calculation",
                session_id
            );
            return Err(AppError::NoPriorCalculation);
        };

        self.submit(session_id, previous.form, previous.result, counter_offer)
            .await
    }
}
