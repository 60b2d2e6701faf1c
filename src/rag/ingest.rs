//! Offline ingestion of insurance policy records.
//!
//! Each record is flattened into one text block, embedded with the active
//! provider and stored as a `DocumentChunk` alongside a few lookup fields.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{json, Map, Value};

use super::store::DocumentChunk;
use crate::llm::{LlmProvider, ProviderError};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InsuranceRecord {
    pub policy_number: String,
    pub name: String,
    pub age: u32,
    pub insurance_type: String,
    pub plan: String,
    pub premium: f64,
    pub coverage: f64,
    pub start_date: String,
    pub end_date: String,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claim {
    pub claim_id: String,
    pub date: String,
    pub amount: f64,
    pub reason: String,
    pub status: String,
}

pub fn parse_records(json: &str) -> Result<Vec<InsuranceRecord>, serde_json::Error> {
    serde_json::from_str(json)
}

/// Whole amounts print without a fraction (`₹12000`), others as-is (`₹15000.5`).
fn format_amount(amount: f64) -> String {
    format!("₹{}", amount)
}

/// Render a record as the text that gets embedded and returned as context.
pub fn flatten_record(record: &InsuranceRecord) -> String {
    let claims = if record.claims.is_empty() {
        "No claim history".to_string()
    } else {
        record
            .claims
            .iter()
            .enumerate()
            .map(|(i, c)| {
                format!(
                    "Claim {}: ID {}, Date {}, Amount {}, Reason: {}, Status: {}",
                    i + 1,
                    c.claim_id,
                    c.date,
                    format_amount(c.amount),
                    c.reason,
                    c.status
                )
            })
            .collect::<Vec<_>>()
            .join("; ")
    };

    [
        format!("Policy Number: {}.", record.policy_number),
        format!("Customer Name: {}, Age: {}.", record.name, record.age),
        format!("Insurance Type: {}.", record.insurance_type),
        format!("Plan: {}.", record.plan),
        format!(
            "Premium: {}, Coverage: {}.",
            format_amount(record.premium),
            format_amount(record.coverage)
        ),
        format!("Policy Period: {} to {}.", record.start_date, record.end_date),
        format!("Claims: {}.", claims),
    ]
    .join("\n")
}

fn record_metadata(record: &InsuranceRecord) -> Map<String, Value> {
    let mut metadata = Map::new();
    metadata.insert("policyNumber".to_string(), json!(record.policy_number));
    metadata.insert("customerName".to_string(), json!(record.name));
    metadata.insert("insuranceType".to_string(), json!(record.insurance_type));
    metadata
}

pub struct Ingestor {
    provider: Arc<dyn LlmProvider>,
}

impl Ingestor {
    pub fn new(provider: Arc<dyn LlmProvider>) -> Self {
        Self { provider }
    }

    /// Embed every record. Stops at the first provider failure so a partial
    /// batch is never written.
    pub async fn run(&self, records: &[InsuranceRecord]) -> Result<Vec<DocumentChunk>, ProviderError> {
        let mut documents = Vec::with_capacity(records.len());
        for record in records {
            let text = flatten_record(record);
            let embedding = self.provider.embed(&text).await?;
            tracing::info!("Generated embedding for {}", record.name);
            documents.push(DocumentChunk {
                text,
                embedding,
                metadata: record_metadata(record),
            });
        }
        Ok(documents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rag::testing::StubProvider;

    const SAMPLE: &str = r#"[
        {
            "policyNumber": "P1",
            "name": "Asha Rao",
            "age": 42,
            "insuranceType": "Home",
            "plan": "Gold",
            "premium": 12000,
            "coverage": 500000,
            "startDate": "2024-01-01",
            "endDate": "2025-01-01",
            "claims": [
                {"claimId": "C9", "date": "2024-06-02", "amount": 15000.5, "reason": "Theft", "status": "Approved"}
            ]
        },
        {
            "policyNumber": "P2",
            "name": "Vikram Shah",
            "age": 30,
            "insuranceType": "Auto",
            "plan": "Basic",
            "premium": 4000,
            "coverage": 200000,
            "startDate": "2024-03-01",
            "endDate": "2025-03-01"
        }
    ]"#;

    #[test]
    fn flattens_record_with_claims() {
        let records = parse_records(SAMPLE).unwrap();
        let text = flatten_record(&records[0]);

        assert!(text.starts_with("Policy Number: P1."));
        assert!(text.contains("Customer Name: Asha Rao, Age: 42."));
        assert!(text.contains("Premium: ₹12000, Coverage: ₹500000."));
        assert!(text.contains(
            "Claim 1: ID C9, Date 2024-06-02, Amount ₹15000.5, Reason: Theft, Status: Approved"
        ));
        assert_eq!(text, text.trim());
    }

    #[test]
    fn missing_claims_read_as_no_history() {
        let records = parse_records(SAMPLE).unwrap();
        assert!(flatten_record(&records[1]).ends_with("Claims: No claim history."));
    }

    #[tokio::test]
    async fn ingestor_embeds_each_record_with_lookup_fields() {
        let provider = Arc::new(StubProvider::new(vec![0.5, 0.5]));
        let records = parse_records(SAMPLE).unwrap();

        let documents = Ingestor::new(provider.clone()).run(&records).await.unwrap();

        assert_eq!(documents.len(), 2);
        assert_eq!(provider.embed_calls(), 2);
        assert_eq!(documents[0].embedding, vec![0.5, 0.5]);
        assert_eq!(documents[1].metadata["policyNumber"], "P2");
        assert_eq!(documents[1].metadata["insuranceType"], "Auto");
        assert_eq!(documents[0].text, flatten_record(&records[0]));
    }

    #[tokio::test]
    async fn provider_failure_aborts_the_batch() {
        let provider = Arc::new(StubProvider::failing_embed("quota exceeded"));
        let records = parse_records(SAMPLE).unwrap();

        let err = Ingestor::new(provider).run(&records).await.unwrap_err();
        assert_eq!(err.to_string(), "quota exceeded");
    }
}
