//! Persisted ledger format
//!
//! The ledger is stored as a UTF-8 JSON object:
//!
//! ```json
//! {
//!   "fondo_inicial": 100000,
//!   "meta": { "institucion": "SLEP Petorca" },
//!   "resumen": { "saldo_anterior": 0, "recibido_anterior": 0, "gasto_traslado": 0 },
//!   "gastos": [
//!     { "fecha": "2025-03-04", "monto": 4500, "detalle": "Resmas",
//!       "tipo_doc": "Boleta", "nro_doc": "1234", "proveedor": "Librería",
//!       "nombre_doc": "boleta.pdf" }
//!   ]
//! }
//! ```
//!
//! The reader is deliberately loose: absent keys default, unknown keys are
//! ignored, numbers may be integers, floats or numeric strings, and older
//! payloads (`descripcion`, `n_doc`, `documento`) are understood. Attachment
//! bytes are never written.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{RendicionError, RendicionResult};
use crate::models::{DocumentMeta, ExpenseRecord, Ledger, Money, ReportMeta, SummaryInputs};

pub const KEY_PREVIOUS_BALANCE: &str = "saldo_anterior";
pub const KEY_PREVIOUS_RECEIVED: &str = "recibido_anterior";
pub const KEY_TRANSPORT_EXPENSE: &str = "gasto_traslado";

const DATE_FORMAT: &str = "%Y-%m-%d";

/// A number that may arrive as JSON number or numeric string
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseAmount {
    Number(f64),
    Text(String),
}

impl LooseAmount {
    fn to_money(&self) -> Option<Money> {
        match self {
            Self::Number(n) => Money::from_f64_rounded(*n),
            Self::Text(s) => Money::parse(s).ok(),
        }
    }
}

/// A text field that may arrive as string, number or boolean
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum LooseText {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
}

impl LooseText {
    fn into_string(self) -> String {
        match self {
            Self::Text(s) => s,
            Self::Number(n) => n.to_string(),
            Self::Flag(b) => b.to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawLedger {
    fondo_inicial: Option<LooseAmount>,
    meta: Option<BTreeMap<String, Option<LooseText>>>,
    resumen: Option<BTreeMap<String, Option<LooseAmount>>>,
    gastos: Option<Vec<RawExpense>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawExpense {
    fecha: Option<LooseText>,
    monto: Option<LooseAmount>,
    detalle: Option<LooseText>,
    descripcion: Option<LooseText>,
    tipo_doc: Option<LooseText>,
    nro_doc: Option<LooseText>,
    n_doc: Option<LooseText>,
    proveedor: Option<LooseText>,
    nombre_doc: Option<LooseText>,
    documento: Option<LooseText>,
}

#[derive(Serialize)]
struct PersistedLedger<'a> {
    fondo_inicial: Money,
    meta: &'a ReportMeta,
    resumen: BTreeMap<&'static str, Money>,
    gastos: Vec<PersistedExpense<'a>>,
}

#[derive(Serialize)]
struct PersistedExpense<'a> {
    fecha: String,
    monto: Money,
    detalle: &'a str,
    tipo_doc: &'a str,
    nro_doc: &'a str,
    proveedor: &'a str,
    nombre_doc: Option<&'a str>,
}

/// Parse a persisted ledger payload
///
/// Fails with [`RendicionError::Format`] when the payload is not a JSON
/// object of the expected shape or when a record breaks a ledger invariant.
pub fn parse_ledger(source: &str) -> RendicionResult<Ledger> {
    let value: serde_json::Value = serde_json::from_str(source)
        .map_err(|e| RendicionError::Format(format!("Invalid ledger payload: {}", e)))?;
    if !value.is_object() {
        return Err(RendicionError::Format(
            "Invalid ledger payload: top level must be an object".into(),
        ));
    }
    let raw: RawLedger = serde_json::from_value(value)
        .map_err(|e| RendicionError::Format(format!("Invalid ledger payload: {}", e)))?;

    let initial_fund = match &raw.fondo_inicial {
        Some(value) => amount_field(value, "fondo_inicial")?,
        None => Money::zero(),
    };

    let meta: ReportMeta = raw
        .meta
        .unwrap_or_default()
        .into_iter()
        .filter_map(|(key, value)| value.map(|v| (key, v.into_string())))
        .collect();

    let summary_inputs = summary_inputs_from(raw.resumen.unwrap_or_default())?;

    let records = raw
        .gastos
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, raw)| expense_from(index, raw))
        .collect::<RendicionResult<Vec<_>>>()?;

    let mut running = Money::zero();
    for (index, record) in records.iter().enumerate() {
        running = running.checked_add(record.amount).ok_or_else(|| {
            RendicionError::Format(format!(
                "gastos[{}]: monto {} overflows the ledger total",
                index, record.amount
            ))
        })?;
    }

    Ok(Ledger::from_parts(initial_fund, records, meta, summary_inputs))
}

/// Serialize a ledger to the persisted format
///
/// Attachment bytes are dropped; only the attachment's display name is kept.
pub fn serialize_ledger(ledger: &Ledger) -> RendicionResult<Vec<u8>> {
    let inputs = ledger.summary_inputs();
    let persisted = PersistedLedger {
        fondo_inicial: ledger.initial_fund(),
        meta: ledger.meta(),
        resumen: BTreeMap::from([
            (KEY_PREVIOUS_BALANCE, inputs.previous_balance),
            (KEY_PREVIOUS_RECEIVED, inputs.previous_received),
            (KEY_TRANSPORT_EXPENSE, inputs.transport_expense),
        ]),
        gastos: ledger
            .records()
            .iter()
            .map(|r| PersistedExpense {
                fecha: r.date.format(DATE_FORMAT).to_string(),
                monto: r.amount,
                detalle: &r.description,
                tipo_doc: &r.document.document_type,
                nro_doc: &r.document.document_number,
                proveedor: &r.document.supplier,
                nombre_doc: r.attachment_name.as_deref(),
            })
            .collect(),
    };

    let mut bytes = serde_json::to_vec_pretty(&persisted)?;
    bytes.push(b'\n');
    Ok(bytes)
}

fn amount_field(value: &LooseAmount, field: &str) -> RendicionResult<Money> {
    checked_amount(value).map_err(|msg| RendicionError::Format(format!("{}: {}", field, msg)))
}

fn checked_amount(value: &LooseAmount) -> Result<Money, String> {
    let amount = value.to_money().ok_or_else(|| "not a number".to_string())?;
    if amount.is_negative() {
        return Err(format!("negative amount {}", amount));
    }
    Ok(amount)
}

fn summary_inputs_from(
    resumen: BTreeMap<String, Option<LooseAmount>>,
) -> RendicionResult<SummaryInputs> {
    let get = |key: &str| -> RendicionResult<Money> {
        match resumen.get(key) {
            Some(Some(value)) => value.to_money().ok_or_else(|| {
                RendicionError::Format(format!("resumen.{}: not a number", key))
            }),
            _ => Ok(Money::zero()),
        }
    };

    Ok(SummaryInputs {
        previous_balance: get(KEY_PREVIOUS_BALANCE)?,
        previous_received: get(KEY_PREVIOUS_RECEIVED)?,
        transport_expense: get(KEY_TRANSPORT_EXPENSE)?,
    })
}

fn expense_from(index: usize, raw: RawExpense) -> RendicionResult<ExpenseRecord> {
    let at = |msg: String| RendicionError::Format(format!("gastos[{}]: {}", index, msg));

    let date_text = raw
        .fecha
        .map(LooseText::into_string)
        .ok_or_else(|| at("missing fecha".into()))?;
    let date = parse_date(&date_text).ok_or_else(|| at(format!("invalid fecha '{}'", date_text)))?;

    let amount = match &raw.monto {
        Some(value) => checked_amount(value).map_err(|msg| at(format!("monto: {}", msg)))?,
        None => Money::zero(),
    };

    let description = non_empty(raw.detalle)
        .or_else(|| non_empty(raw.descripcion))
        .unwrap_or_default();

    let document = DocumentMeta::new(
        text(raw.tipo_doc),
        non_empty(raw.nro_doc).or_else(|| non_empty(raw.n_doc)).unwrap_or_default(),
        text(raw.proveedor),
    );

    let attachment_name = non_empty(raw.nombre_doc)
        .or_else(|| non_empty(raw.documento).and_then(|path| file_name(&path)));

    let mut record = ExpenseRecord::new(date, amount, description).with_document(document);
    record.attachment_name = attachment_name;
    Ok(record)
}

fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    // Accept timestamps such as "2025-03-04T00:00:00" by keeping the date part
    let date_part = s.get(..10).unwrap_or(s);
    NaiveDate::parse_from_str(date_part, DATE_FORMAT).ok()
}

/// Last component of a path written on any platform
fn file_name(path: &str) -> Option<String> {
    path.rsplit(['/', '\\'])
        .next()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
}

fn text(value: Option<LooseText>) -> String {
    value.map(LooseText::into_string).unwrap_or_default()
}

fn non_empty(value: Option<LooseText>) -> Option<String> {
    value
        .map(LooseText::into_string)
        .filter(|s| !s.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Attachment;

    fn sample_ledger() -> Ledger {
        let mut ledger = Ledger::new();
        ledger.set_initial_fund(Money::from_units(100000)).unwrap();
        ledger.set_meta("institucion", "SLEP Petorca");
        ledger.set_meta("responsable", "María Pérez");
        ledger.set_summary_inputs(SummaryInputs {
            previous_balance: Money::from_units(1200),
            previous_received: Money::from_units(98000),
            transport_expense: Money::from_units(3500),
        });
        ledger
            .add_expense(
                ExpenseRecord::new(
                    NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(),
                    Money::from_units(20000),
                    "Artículos de aseo",
                )
                .with_document(DocumentMeta::new("Factura", "88123", "Comercial Ñuble"))
                .with_attachment(Attachment::new("factura.pdf", vec![0xde, 0xad])),
            )
            .unwrap();
        ledger
            .add_expense(ExpenseRecord::new(
                NaiveDate::from_ymd_opt(2025, 3, 2).unwrap(),
                Money::from_units(5000),
                "Taxi",
            ))
            .unwrap();
        ledger
    }

    #[test]
    fn test_round_trip_keeps_everything_but_attachment_bytes() {
        let ledger = sample_ledger();
        let bytes = serialize_ledger(&ledger).unwrap();
        let loaded = parse_ledger(std::str::from_utf8(&bytes).unwrap()).unwrap();

        assert_eq!(loaded.initial_fund(), ledger.initial_fund());
        assert_eq!(loaded.meta(), ledger.meta());
        assert_eq!(loaded.summary_inputs(), ledger.summary_inputs());
        assert_eq!(loaded.len(), 2);

        for (a, b) in loaded.records().iter().zip(ledger.records()) {
            assert_eq!(a.date, b.date);
            assert_eq!(a.amount, b.amount);
            assert_eq!(a.description, b.description);
            assert_eq!(a.document, b.document);
            assert_eq!(a.attachment_name, b.attachment_name);
            assert!(a.attachment.is_none());
        }
    }

    #[test]
    fn test_serialized_keys_and_no_attachment_bytes() {
        let bytes = serialize_ledger(&sample_ledger()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();

        assert_eq!(value["fondo_inicial"], 100000);
        assert_eq!(value["resumen"]["gasto_traslado"], 3500);
        let first = &value["gastos"][0];
        assert_eq!(first["fecha"], "2025-03-09");
        assert_eq!(first["detalle"], "Artículos de aseo");
        assert_eq!(first["nombre_doc"], "factura.pdf");
        assert!(first.get("bytes_doc").is_none());
        // Non-ASCII text is written as-is
        assert!(std::str::from_utf8(&bytes).unwrap().contains("Ñuble"));
    }

    #[test]
    fn test_missing_keys_default() {
        let ledger = parse_ledger("{}").unwrap();
        assert!(ledger.is_empty());
        assert!(ledger.initial_fund().is_zero());
        assert!(ledger.meta().is_empty());
        assert_eq!(ledger.summary_inputs(), SummaryInputs::default());
    }

    #[test]
    fn test_legacy_payload() {
        let source = r#"{
            "fondo_inicial": 50000.0,
            "gastos": [
                {"fecha": "2024-11-05", "monto": 1500.4, "descripcion": "Café",
                 "documento": "C:\\docs\\boleta 1.jpg"},
                {"fecha": "2024-11-06", "monto": "2.500", "detalle": "", "descripcion": "Pan",
                 "n_doc": 991, "extra": [1, 2]}
            ],
            "unknown": true
        }"#;
        let ledger = parse_ledger(source).unwrap();

        assert_eq!(ledger.initial_fund().units(), 50000);
        let first = &ledger.records()[0];
        assert_eq!(first.description, "Café");
        assert_eq!(first.attachment_name.as_deref(), Some("boleta 1.jpg"));
        assert_eq!(first.amount.units(), 1500);
        let second = &ledger.records()[1];
        assert_eq!(second.description, "Pan");
        assert_eq!(second.amount.units(), 2500);
        assert_eq!(second.document.document_number, "991");
        assert!(second.attachment_name.is_none());
    }

    #[test]
    fn test_legacy_document_path_keeps_file_name() {
        let source = r#"{"gastos": [{"fecha": "2024-11-05", "monto": 10, "detalle": "x",
                          "documento": "/home/ana/recibos/boleta.png"}]}"#;
        let ledger = parse_ledger(source).unwrap();
        assert_eq!(
            ledger.records()[0].attachment_name.as_deref(),
            Some("boleta.png")
        );
    }

    #[test]
    fn test_null_fields_are_absent() {
        let source = r#"{"meta": {"a": null, "b": "x"}, "gastos": [
            {"fecha": "2024-01-01T00:00:00", "monto": 1, "detalle": "x", "nombre_doc": null}
        ]}"#;
        let ledger = parse_ledger(source).unwrap();
        assert_eq!(ledger.meta().len(), 1);
        assert_eq!(ledger.records()[0].date, NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
        assert!(ledger.records()[0].attachment_name.is_none());
    }

    #[test]
    fn test_malformed_payloads_are_format_errors() {
        let cases = [
            "",
            "{\"fondo_inicial\": 100",
            "[1, 2, 3]",
            "[]",
            "42",
            r#"{"gastos": {"fecha": "2024-01-01"}}"#,
            r#"{"gastos": [{"monto": 5, "detalle": "x"}]}"#,
            r#"{"gastos": [{"fecha": "05/11/2024", "monto": 5, "detalle": "x"}]}"#,
            r#"{"gastos": [{"fecha": "2024-11-05", "monto": -5, "detalle": "x"}]}"#,
            r#"{"gastos": [{"fecha": "2024-11-05", "monto": "mucho", "detalle": "x"}]}"#,
            r#"{"resumen": {"saldo_anterior": "n/a"}}"#,
        ];
        for source in cases {
            let err = parse_ledger(source).unwrap_err();
            assert!(err.is_format(), "expected format error for {:?}, got {}", source, err);
        }
    }

    #[test]
    fn test_missing_detalle_defaults_to_empty() {
        let source = r#"{"gastos": [
            {"fecha": "2025-01-01", "monto": 5},
            {"fecha": "2025-01-02", "monto": 7, "detalle": "", "descripcion": "  "}
        ]}"#;
        let ledger = parse_ledger(source).unwrap();

        assert_eq!(ledger.len(), 2);
        assert!(ledger.records().iter().all(|r| r.description.is_empty()));
        assert_eq!(ledger.compute_totals().total_amount.units(), 12);
    }

    #[test]
    fn test_total_overflow_is_format_error() {
        let source = r#"{"gastos": [
            {"fecha": "2025-01-01", "monto": 5000000000000000000, "detalle": "a"},
            {"fecha": "2025-01-02", "monto": 5000000000000000000, "detalle": "b"}
        ]}"#;
        let err = parse_ledger(source).unwrap_err();
        assert!(err.is_format());
        assert!(err.to_string().contains("gastos[1]"));
    }

    #[test]
    fn test_format_error_names_record_index() {
        let source = r#"{"gastos": [
            {"fecha": "2024-11-05", "monto": 5, "detalle": "ok"},
            {"fecha": "2024-13-40", "monto": 5, "detalle": "bad"}
        ]}"#;
        let err = parse_ledger(source).unwrap_err();
        assert!(err.to_string().contains("gastos[1]"));
    }
}
